use std::{
    convert::Infallible,
    ffi::{CString, OsStr, OsString},
    os::unix::ffi::{OsStrExt, OsStringExt},
};

use nix::unistd::execve;

use crate::{
    config::LaunchConfig,
    env::expand_search_path,
    mount::{Mounter, MountTable, TmpfsMounter, WritableDirEnsurer},
    LaunchError, LaunchResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Prepares the system for the delegate executable and then replaces the current process with it.
///
/// Preparation is two steps: optionally make the configured directory writable, then build the
/// delegate's environment with an expanded `PATH`. The original argument list is handed to the
/// delegate unchanged.
#[derive(Debug, Clone)]
pub struct Launcher<M = TmpfsMounter> {
    config: LaunchConfig,
    ensurer: WritableDirEnsurer<M>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Launcher {
    /// Creates a launcher that remounts with the real `mount(2)` call.
    pub fn new(config: LaunchConfig) -> Self {
        Self::with_mounter(config, TmpfsMounter)
    }
}

impl<M> Launcher<M>
where
    M: Mounter,
{
    /// Creates a launcher that remounts with `mounter`.
    pub fn with_mounter(config: LaunchConfig, mounter: M) -> Self {
        let table = MountTable::new(config.get_mount_table_path().clone());
        Self {
            ensurer: WritableDirEnsurer::with_mounter(table, mounter),
            config,
        }
    }

    /// Returns the configuration of this launcher.
    pub fn get_config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Runs every preparation step and returns the environment for the delegate.
    pub fn prepare<I, S>(&self, env: I) -> LaunchResult<Vec<OsString>>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        if self.config.get_ensure_writable() {
            self.ensurer
                .ensure_writable(self.config.get_writable_dir())?;
        } else {
            tracing::debug!(
                "writable directory workaround disabled, leaving {} as is",
                self.config.get_writable_dir().display()
            );
        }

        Ok(expand_search_path(
            env,
            self.config.get_extra_search_dirs(),
        ))
    }

    /// Prepares the system and execs into the delegate with `args` and the prepared environment.
    ///
    /// On success this never returns. Any error comes either from preparation or from `execve(2)`
    /// itself, in which case the current process is still intact and should exit.
    pub fn launch<A, T, I, S>(&self, args: A, env: I) -> LaunchResult<Infallible>
    where
        A: IntoIterator<Item = T>,
        T: Into<OsString>,
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let env = self.prepare(env)?;

        let delegate = self.config.get_delegate_path();
        let path = to_cstring(delegate.as_os_str())?;
        let argv = args
            .into_iter()
            .map(|arg| {
                let arg: OsString = arg.into();
                CString::new(arg.into_vec())
            })
            .collect::<Result<Vec<_>, _>>()?;
        let envp = env
            .into_iter()
            .map(|entry| CString::new(entry.into_vec()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("exec {} with {} args", delegate.display(), argv.len());
        execve(&path, &argv, &envp).map_err(|source| LaunchError::Exec {
            path: delegate.clone(),
            source,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn to_cstring(value: &OsStr) -> LaunchResult<CString> {
    Ok(CString::new(value.as_bytes())?)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
