use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs::{self, OpenOptions},
    io::{self, Write},
    os::unix::fs::OpenOptionsExt,
    path::Path,
};

#[cfg(target_os = "linux")]
use nix::mount::{mount, MsFlags};

use crate::{config::RESTORED_FILE_MODE, LaunchError, LaunchResult};

use super::MountTable;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The regular files directly inside a directory, keyed by file name.
///
/// Ordered by name so restoration happens in a deterministic order.
pub type DirectorySnapshot = BTreeMap<OsString, Vec<u8>>;

/// Mounts an in-memory filesystem over a directory.
pub trait Mounter {
    /// Mounts a fresh, empty tmpfs at `dir`, hiding whatever was there before.
    fn mount_tmpfs(&self, dir: &Path) -> LaunchResult<()>;
}

/// A [`Mounter`] that issues the real `mount(2)` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TmpfsMounter;

/// Makes a directory writable by moving it onto a tmpfs while keeping its regular files.
///
/// The operation is idempotent: once the directory shows up in the mount table, further calls do
/// nothing. Only regular files directly inside the directory survive the remount; subdirectories,
/// symlinks and device nodes are dropped.
///
/// A failure after the remount leaves the directory mounted but only partially repopulated. No
/// rollback is attempted and the caller is expected to abort.
#[derive(Debug, Clone)]
pub struct WritableDirEnsurer<M = TmpfsMounter> {
    table: MountTable,
    mounter: M,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl WritableDirEnsurer {
    /// Creates an ensurer that consults `table` and mounts with [`TmpfsMounter`].
    pub fn new(table: MountTable) -> Self {
        Self::with_mounter(table, TmpfsMounter)
    }
}

impl<M> WritableDirEnsurer<M>
where
    M: Mounter,
{
    /// Creates an ensurer that consults `table` and mounts with `mounter`.
    pub fn with_mounter(table: MountTable, mounter: M) -> Self {
        Self { table, mounter }
    }

    /// Returns the mount table this ensurer consults.
    pub fn get_table(&self) -> &MountTable {
        &self.table
    }

    /// Ensures `dir` is backed by its own writable mount, preserving its regular files.
    pub fn ensure_writable(&self, dir: impl AsRef<Path>) -> LaunchResult<()> {
        let dir = dir.as_ref();
        if self.table.is_mounted(dir)? {
            tracing::debug!("{} is already a mountpoint, nothing to do", dir.display());
            return Ok(());
        }

        let snapshot = snapshot_regular_files(dir)?;

        tracing::info!(
            "mounting tmpfs on {} and restoring {} files",
            dir.display(),
            snapshot.len()
        );
        self.mounter.mount_tmpfs(dir)?;

        restore_snapshot(dir, &snapshot)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Reads every regular file directly inside `dir` into memory.
///
/// Entries are classified by their own file type, so a symlink to a regular file is skipped.
pub fn snapshot_regular_files(dir: &Path) -> LaunchResult<DirectorySnapshot> {
    let list_err = |source: io::Error| LaunchError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut snapshot = DirectorySnapshot::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if !entry.file_type().map_err(list_err)?.is_file() {
            tracing::debug!("not preserving non-regular entry {}", path.display());
            continue;
        }

        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(source) => return Err(LaunchError::ReadFile { path, source }),
        };
        snapshot.insert(entry.file_name(), contents);
    }

    Ok(snapshot)
}

/// Writes every snapshot entry into `dir` with mode `0644`.
pub fn restore_snapshot(dir: &Path, snapshot: &DirectorySnapshot) -> LaunchResult<()> {
    for (name, contents) in snapshot {
        let path = dir.join(name);
        if let Err(source) = write_restored_file(&path, contents) {
            return Err(LaunchError::WriteFile { path, source });
        }
    }

    Ok(())
}

fn write_restored_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(RESTORED_FILE_MODE)
        .open(path)?;
    file.write_all(contents)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Mounter for TmpfsMounter {
    fn mount_tmpfs(&self, dir: &Path) -> LaunchResult<()> {
        #[cfg(target_os = "linux")]
        {
            mount(
                Some("tmpfs"),
                dir,
                Some("tmpfs"),
                MsFlags::empty(),
                None::<&str>,
            )
            .map_err(|source| LaunchError::Mount {
                path: dir.to_path_buf(),
                source,
            })
        }

        #[cfg(not(target_os = "linux"))]
        {
            Err(LaunchError::Mount {
                path: dir.to_path_buf(),
                source: nix::Error::ENOSYS,
            })
        }
    }
}

impl<M> Mounter for &M
where
    M: Mounter + ?Sized,
{
    fn mount_tmpfs(&self, dir: &Path) -> LaunchResult<()> {
        (**self).mount_tmpfs(dir)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::os::unix::{ffi::OsStringExt, fs::PermissionsExt};

    use super::*;

    #[test]
    fn test_snapshot_regular_files_only() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("10-bridge.conflist"), b"{}")?;
        fs::write(dir.path().join("empty"), b"")?;
        fs::create_dir(dir.path().join("subdir"))?;
        fs::write(dir.path().join("subdir").join("nested"), b"nested")?;
        std::os::unix::fs::symlink("empty", dir.path().join("link"))?;

        let snapshot = snapshot_regular_files(dir.path())?;
        let names: Vec<_> = snapshot.keys().cloned().collect();
        assert_eq!(names, vec![OsString::from("10-bridge.conflist"), OsString::from("empty")]);
        assert_eq!(snapshot[&OsString::from("10-bridge.conflist")], b"{}");
        assert!(snapshot[&OsString::from("empty")].is_empty());

        Ok(())
    }

    #[test]
    fn test_snapshot_missing_dir_is_list_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        match snapshot_regular_files(&missing) {
            Err(LaunchError::ListDirectory { path, source }) => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn test_restore_snapshot_writes_bytes_and_mode() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut snapshot = DirectorySnapshot::new();
        snapshot.insert(OsString::from("binary"), vec![0x00, 0xff, 0x80, b'\n']);
        snapshot.insert(OsString::from_vec(b"name-\xe9".to_vec()), b"latin1".to_vec());

        restore_snapshot(dir.path(), &snapshot)?;

        assert_eq!(fs::read(dir.path().join("binary"))?, vec![0x00, 0xff, 0x80, b'\n']);
        assert_eq!(
            fs::read(dir.path().join(OsString::from_vec(b"name-\xe9".to_vec())))?,
            b"latin1"
        );

        // Restored files never carry more than 0644, whatever the umask.
        let mode = fs::metadata(dir.path().join("binary"))?.permissions().mode() & 0o777;
        assert_eq!(mode & !RESTORED_FILE_MODE, 0);

        Ok(())
    }

    #[test]
    fn test_restore_snapshot_into_missing_dir_is_write_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        let mut snapshot = DirectorySnapshot::new();
        snapshot.insert(OsString::from("file"), b"data".to_vec());

        match restore_snapshot(&missing, &snapshot) {
            Err(LaunchError::WriteFile { path, .. }) => assert_eq!(path, missing.join("file")),
            other => panic!("unexpected result: {other:?}"),
        }
        Ok(())
    }
}
