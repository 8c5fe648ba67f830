#![allow(dead_code)]

use std::{
    cell::Cell,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use launchshim::{mount::Mounter, LaunchError, LaunchResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A [`Mounter`] that imitates a tmpfs mount without privileges.
///
/// Mounting empties the directory, as a fresh tmpfs would hide its contents, and records the new
/// mountpoint in a mountinfo-format table so later queries see it.
#[derive(Debug)]
pub struct FakeTmpfs {
    table_path: PathBuf,
    fail: bool,
    calls: Cell<usize>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl FakeTmpfs {
    pub fn new(table_path: impl Into<PathBuf>) -> Self {
        Self {
            table_path: table_path.into(),
            fail: false,
            calls: Cell::new(0),
        }
    }

    pub fn failing(table_path: impl Into<PathBuf>) -> Self {
        Self {
            fail: true,
            ..Self::new(table_path)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Writes a mountinfo-format table that lists `/` and the given mountpoints.
pub fn write_mount_table(path: &Path, mountpoints: &[&Path]) -> anyhow::Result<()> {
    let mut table = String::from("22 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw\n");
    for (idx, mountpoint) in mountpoints.iter().enumerate() {
        table.push_str(&mountinfo_line(40 + idx, mountpoint));
    }
    fs::write(path, table)?;
    Ok(())
}

fn mountinfo_line(id: usize, mountpoint: &Path) -> String {
    format!(
        "{id} 22 0:{id} / {} rw,relatime - tmpfs tmpfs rw\n",
        mountpoint.display()
    )
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Mounter for FakeTmpfs {
    fn mount_tmpfs(&self, dir: &Path) -> LaunchResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(LaunchError::Mount {
                path: dir.to_path_buf(),
                source: nix::Error::EPERM,
            });
        }

        for entry in fs::read_dir(dir).map_err(LaunchError::custom)? {
            let path = entry.map_err(LaunchError::custom)?.path();
            if path.is_dir() && !path.is_symlink() {
                fs::remove_dir_all(&path).map_err(LaunchError::custom)?;
            } else {
                fs::remove_file(&path).map_err(LaunchError::custom)?;
            }
        }

        let mut table = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.table_path)
            .map_err(LaunchError::custom)?;
        table
            .write_all(mountinfo_line(100 + self.calls(), dir).as_bytes())
            .map_err(LaunchError::custom)?;

        Ok(())
    }
}
