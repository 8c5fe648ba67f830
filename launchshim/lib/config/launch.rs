use std::{ffi::OsStr, path::PathBuf};

use getset::{CopyGetters, Getters};
use typed_builder::TypedBuilder;

use crate::{env::lookup_var, LaunchError, LaunchResult};

use super::{
    DEFAULT_DELEGATE_PATH, DEFAULT_EXTRA_SEARCH_DIRS, DEFAULT_MOUNT_TABLE_PATH,
    DEFAULT_WRITABLE_DIR, ENSURE_WRITABLE_ENV_VAR,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Configuration for a single launch.
///
/// Every field defaults to the fixed production value, so `LaunchConfig::default()` describes the
/// shim as deployed. Tests and alternative deployments override individual fields through the
/// builder.
///
/// ## Examples
///
/// ```
/// use launchshim::config::LaunchConfig;
///
/// let config = LaunchConfig::builder()
///     .delegate_path("/usr/bin/true")
///     .ensure_writable(true)
///     .build();
///
/// assert!(config.get_ensure_writable());
/// assert_eq!(config.get_writable_dir().to_str(), Some("/etc/cni/net.d"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder, Getters, CopyGetters)]
pub struct LaunchConfig {
    /// The executable to exec into.
    #[builder(default = PathBuf::from(DEFAULT_DELEGATE_PATH), setter(into))]
    #[getset(get = "pub with_prefix")]
    delegate_path: PathBuf,

    /// The directory that must be writable before the delegate starts.
    #[builder(default = PathBuf::from(DEFAULT_WRITABLE_DIR), setter(into))]
    #[getset(get = "pub with_prefix")]
    writable_dir: PathBuf,

    /// The mount table consulted to decide whether a remount is needed.
    #[builder(default = PathBuf::from(DEFAULT_MOUNT_TABLE_PATH), setter(into))]
    #[getset(get = "pub with_prefix")]
    mount_table_path: PathBuf,

    /// Directories prepended to the search path, in order.
    #[builder(default = DEFAULT_EXTRA_SEARCH_DIRS.iter().map(|d| d.to_string()).collect())]
    #[getset(get = "pub with_prefix")]
    extra_search_dirs: Vec<String>,

    /// Whether to convert `writable_dir` into a tmpfs before launching.
    #[builder(default)]
    #[getset(get_copy = "pub with_prefix")]
    ensure_writable: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LaunchConfig {
    /// Builds the default configuration, applying any overrides found in `env`.
    ///
    /// `env` is a sequence of `KEY=VALUE` entries. Only `LAUNCHSHIM_ENSURE_WRITABLE` is
    /// recognised; when it appears more than once the first occurrence wins.
    pub fn from_env<I, S>(env: I) -> LaunchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup_var(env, ENSURE_WRITABLE_ENV_VAR) {
            config.ensure_writable = parse_toggle(ENSURE_WRITABLE_ENV_VAR, &value)?;
        }

        Ok(config)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn parse_toggle(key: &str, value: &OsStr) -> LaunchResult<bool> {
    let text = value.to_string_lossy();
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LaunchError::InvalidConfigValue {
            key: key.to_string(),
            value: text.into_owned(),
        }),
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for LaunchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
