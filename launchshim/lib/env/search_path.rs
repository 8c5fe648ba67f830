use std::{
    ffi::{OsStr, OsString},
    os::unix::ffi::{OsStrExt, OsStringExt},
};

use crate::config::{DEFAULT_SEARCH_PATH, SEARCH_PATH_SEPARATOR, SEARCH_PATH_VAR};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns `env` with the `PATH` entry rewritten so that `extra_dirs` come first.
///
/// Every `PATH=<value>` entry becomes `PATH=<extra_dirs joined by ':'>:<value>` in place; the value
/// is everything after the first `=`, so embedded `=` characters survive. Entries without any `=`
/// are malformed and passed through untouched. If no entry has the `PATH` key, a new one built on
/// the default search path is appended at the end.
///
/// ## Examples
///
/// ```
/// use launchshim::env::expand_search_path;
/// use std::ffi::OsString;
///
/// let env = expand_search_path(["HOME=/root", "PATH=/bin"], &["/a", "/b"]);
/// assert_eq!(env, vec![OsString::from("HOME=/root"), OsString::from("PATH=/a:/b:/bin")]);
/// ```
pub fn expand_search_path<I, S, D>(env: I, extra_dirs: &[D]) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    D: AsRef<str>,
{
    let prefix = extra_dirs
        .iter()
        .map(|dir| dir.as_ref())
        .collect::<Vec<_>>()
        .join(SEARCH_PATH_SEPARATOR);

    let mut found = false;
    let mut expanded: Vec<OsString> = env
        .into_iter()
        .map(Into::into)
        .map(|entry| match split_entry(&entry) {
            Some((key, value)) if key == SEARCH_PATH_VAR.as_bytes() => {
                found = true;
                search_path_entry(&prefix, value)
            }
            _ => entry,
        })
        .collect();

    if !found {
        tracing::debug!(
            "{} not set, falling back to {}",
            SEARCH_PATH_VAR,
            DEFAULT_SEARCH_PATH
        );
        expanded.push(search_path_entry(&prefix, DEFAULT_SEARCH_PATH.as_bytes()));
    }

    expanded
}

/// Looks up the value of `key` in a sequence of `KEY=VALUE` entries.
///
/// The first matching entry wins. Malformed entries are ignored.
pub fn lookup_var<I, S>(env: I, key: &str) -> Option<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    env.into_iter().find_map(|entry| {
        split_entry(entry.as_ref())
            .filter(|(k, _)| *k == key.as_bytes())
            .map(|(_, value)| OsStr::from_bytes(value).to_os_string())
    })
}

/// Joins `(key, value)` pairs into `KEY=VALUE` entries.
pub fn environ_from_pairs<I, K, V>(pairs: I) -> Vec<OsString>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    pairs
        .into_iter()
        .map(|(key, value)| {
            let mut entry = key.as_ref().to_os_string();
            entry.push("=");
            entry.push(value);
            entry
        })
        .collect()
}

fn split_entry(entry: &OsStr) -> Option<(&[u8], &[u8])> {
    let bytes = entry.as_bytes();
    let idx = bytes.iter().position(|b| *b == b'=')?;
    Some((&bytes[..idx], &bytes[idx + 1..]))
}

fn search_path_entry(prefix: &str, value: &[u8]) -> OsString {
    let mut entry = Vec::with_capacity(SEARCH_PATH_VAR.len() + prefix.len() + value.len() + 2);
    entry.extend_from_slice(SEARCH_PATH_VAR.as_bytes());
    entry.push(b'=');
    entry.extend_from_slice(prefix.as_bytes());
    entry.extend_from_slice(SEARCH_PATH_SEPARATOR.as_bytes());
    entry.extend_from_slice(value);
    OsString::from_vec(entry)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
