use std::{
    env,
    ffi::{OsStr, OsString},
    fs, io,
    os::unix::ffi::OsStrExt,
    path::Path,
};

use crate::config::DEFAULT_ENVIRON_PATH;

use super::environ_from_pairs;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the environment this process was started with, entry for entry.
///
/// See [`read_environ`].
pub fn process_environ() -> Vec<OsString> {
    read_environ(DEFAULT_ENVIRON_PATH)
}

/// Reads a NUL-separated environment block such as `/proc/self/environ`.
///
/// Unlike [`std::env::vars_os`], this keeps entries that have no `=`, so the delegate receives
/// exactly what the kernel handed to this process. If the file cannot be read, the environment
/// is rebuilt from `vars_os` instead, which loses such entries.
pub fn read_environ(path: impl AsRef<Path>) -> Vec<OsString> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(block) => environ_from_block(&block),
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                tracing::debug!("{} not found, using vars_os", path.display());
            } else {
                tracing::warn!("failed to read {}: {e}, using vars_os", path.display());
            }
            environ_from_pairs(env::vars_os())
        }
    }
}

/// Splits a NUL-separated environment block into entries, dropping empty ones.
pub fn environ_from_block(block: &[u8]) -> Vec<OsString> {
    block
        .split(|b| *b == 0)
        .filter(|entry| !entry.is_empty())
        .map(|entry| OsStr::from_bytes(entry).to_os_string())
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
