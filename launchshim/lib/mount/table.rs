use std::{
    fs, io,
    os::unix::ffi::OsStrExt,
    path::{Path, PathBuf},
};

use getset::Getters;

use crate::{config::DEFAULT_MOUNT_TABLE_PATH, LaunchError, LaunchResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Index of the mountpoint field in a mountinfo line.
///
/// The layout is `mount-id parent-id major:minor root mountpoint options ...`.
const MOUNTPOINT_FIELD: usize = 4;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A handle to a kernel mount table in mountinfo format.
///
/// The table is read fresh on every query; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct MountTable {
    /// The mountinfo file to read, normally `/proc/self/mountinfo`.
    path: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MountTable {
    /// Creates a handle to the mount table at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns whether `mountpoint` appears as a mountpoint in the table.
    ///
    /// The comparison is exact: no normalization is applied, so `/etc/cni/net.d/` does not match
    /// a table entry for `/etc/cni/net.d`.
    ///
    /// A missing table means the platform cannot verify mounts, and is reported as `false` rather
    /// than an error. Any other read failure is a [`LaunchError::MountTableRead`].
    pub fn is_mounted(&self, mountpoint: impl AsRef<Path>) -> LaunchResult<bool> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    "mount table {} not found, skipping mount verification",
                    self.path.display()
                );
                return Ok(false);
            }
            Err(source) => {
                return Err(LaunchError::MountTableRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        Ok(contains_mountpoint(&contents, mountpoint.as_ref()))
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns whether any well-formed line of `table` has `mountpoint` as its fifth field.
///
/// Lines with fewer than five whitespace-separated fields are skipped.
pub fn contains_mountpoint(table: &[u8], mountpoint: &Path) -> bool {
    let target = mountpoint.as_os_str().as_bytes();
    table
        .split(|b| *b == b'\n')
        .any(|line| mountpoint_field(line) == Some(target))
}

fn mountpoint_field(line: &[u8]) -> Option<&[u8]> {
    line.split(u8::is_ascii_whitespace)
        .filter(|field| !field.is_empty())
        .nth(MOUNTPOINT_FIELD)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for MountTable {
    fn default() -> Self {
        Self::new(DEFAULT_MOUNT_TABLE_PATH)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
