//! `launchshim` is a small launch-time helper that prepares the system and then becomes another
//! program.
//!
//! # Overview
//!
//! The shim runs once, synchronously, and ends in one of two ways: the current process image is
//! replaced by the delegate executable, or setup fails and the process exits with an error.
//! Before the hand-off it can:
//!
//! - Convert a possibly read-only directory into a writable tmpfs while keeping its regular files
//!   ([`mount::WritableDirEnsurer`]). This is a workaround for delegates that fail on a read-only
//!   `/etc/cni/net.d` and is off by default.
//! - Build the delegate's environment with extra directories prepended to `PATH`
//!   ([`env::expand_search_path`]).
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use launchshim::{config::LaunchConfig, env::process_environ, launch::Launcher};
//!
//! fn main() -> launchshim::LaunchResult<()> {
//!     let env = process_environ();
//!     let config = LaunchConfig::from_env(&env)?;
//!
//!     match Launcher::new(config).launch(std::env::args_os(), env)? {}
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Fixed defaults and the launch configuration
//! - [`env`] - Environment construction for the delegate
//! - [`launch`] - The driver that prepares and execs
//! - [`mount`] - Mount table inspection and tmpfs remounting

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod config;
pub mod env;
pub mod launch;
pub mod mount;

pub use error::*;
