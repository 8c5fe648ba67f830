//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The delegate executable that the shim execs into.
pub const DEFAULT_DELEGATE_PATH: &str = "/usr/local/bin/containerd";

/// The directory that is converted into a writable tmpfs when the workaround is enabled.
///
/// The kernel reports mountpoints without a trailing slash, so neither should this.
pub const DEFAULT_WRITABLE_DIR: &str = "/etc/cni/net.d";

/// The per-process mount table exposed by procfs.
pub const DEFAULT_MOUNT_TABLE_PATH: &str = "/proc/self/mountinfo";

/// The raw environment block this process was started with.
pub const DEFAULT_ENVIRON_PATH: &str = "/proc/self/environ";

/// Directories prepended to the search path, in order.
///
/// The delegate needs these to locate its runtime helpers.
pub const DEFAULT_EXTRA_SEARCH_DIRS: [&str; 2] = ["/user", "/usr/local/bin"];

/// The search path used when the environment does not define one.
pub const DEFAULT_SEARCH_PATH: &str =
    "/usr/local/sbin:/sbin:/usr/sbin:/usr/local/bin:/bin:/usr/bin";

/// The name of the search-path variable.
pub const SEARCH_PATH_VAR: &str = "PATH";

/// The separator between search-path directories.
pub const SEARCH_PATH_SEPARATOR: &str = ":";

/// The permission bits of files restored into a fresh tmpfs.
pub const RESTORED_FILE_MODE: u32 = 0o644;

/// The environment variable that toggles the writable-directory workaround.
pub const ENSURE_WRITABLE_ENV_VAR: &str = "LAUNCHSHIM_ENSURE_WRITABLE";
