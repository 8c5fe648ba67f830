//! `launchshim::error` is a module containing error utilities for the launchshim project.

use std::{
    error::Error,
    ffi::NulError,
    fmt::{self, Display},
    io,
    path::PathBuf,
};

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a launchshim-related operation.
pub type LaunchResult<T> = Result<T, LaunchError>;

/// An error that occurred while preparing or performing a launch.
#[derive(pretty_error_debug::Debug, Error)]
pub enum LaunchError {
    /// The mount table exists but could not be read.
    #[error("failed to read mount table {path:?}: {source}")]
    MountTableRead {
        /// The mount table that was read.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// The entries of a directory could not be enumerated.
    #[error("failed to list directory {path:?}: {source}")]
    ListDirectory {
        /// The directory that was listed.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// A file could not be read while taking a snapshot.
    #[error("failed to read file {path:?}: {source}")]
    ReadFile {
        /// The file that was read.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// Mounting an in-memory filesystem failed.
    #[error("tmpfs on {path:?}: {source}")]
    Mount {
        /// The intended mountpoint.
        path: PathBuf,

        /// The errno returned by mount(2).
        source: nix::Error,
    },

    /// A file could not be written back after remounting.
    #[error("failed to write file {path:?}: {source}")]
    WriteFile {
        /// The file that was written.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// Replacing the process image failed.
    #[error("failed to exec {path:?}: {source}")]
    Exec {
        /// The delegate executable.
        path: PathBuf,

        /// The errno returned by execve(2).
        source: nix::Error,
    },

    /// An argument, environment entry or path contains an interior NUL byte.
    #[error("interior nul byte in exec argument: {0}")]
    NulByte(#[from] NulError),

    /// A configuration variable holds a value that cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidConfigValue {
        /// The configuration variable.
        key: String,

        /// The rejected value.
        value: String,
    },

    /// Custom error.
    #[error("Custom error: {0}")]
    Custom(#[from] AnyError),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LaunchError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> LaunchError {
        LaunchError::Custom(AnyError {
            error: error.into(),
        })
    }
}

impl AnyError {
    /// Downcasts the error to a `T`.
    pub fn downcast<T>(&self) -> Option<&T>
    where
        T: Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<T>()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error_display_includes_path() {
        let err = LaunchError::Mount {
            path: PathBuf::from("/etc/cni/net.d"),
            source: nix::Error::EPERM,
        };

        let message = err.to_string();
        assert!(message.starts_with("tmpfs on \"/etc/cni/net.d\""));
        assert!(message.contains("EPERM"));
    }

    #[test]
    fn test_custom_error_downcast() {
        let err = LaunchError::custom(io::Error::other("boom"));
        match err {
            LaunchError::Custom(any) => {
                assert_eq!(any.to_string(), "boom");
                assert!(any.downcast::<io::Error>().is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
