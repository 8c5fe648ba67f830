//! `launchshim` prepares the runtime system and then execs into the delegate executable.
//!
//! ## Usage
//!
//! The shim takes no options of its own. It is installed in place of the delegate and forwards its
//! argument list verbatim:
//!
//! ```bash
//! launchshim --config /etc/containerd/config.toml
//! ```
//!
//! Set `LAUNCHSHIM_ENSURE_WRITABLE=1` to turn `/etc/cni/net.d` into a writable tmpfs before the
//! hand-off. Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::env;

use launchshim::{config::LaunchConfig, env::process_environ, launch::Launcher, LaunchResult};
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Function: main
//--------------------------------------------------------------------------------------------------

fn main() -> LaunchResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<_> = env::args_os().collect();
    let envp = process_environ();
    let config = LaunchConfig::from_env(&envp)?;

    match Launcher::new(config).launch(args, envp)? {}
}
