use std::ffi::OsString;

use launchshim::{
    config::{DEFAULT_EXTRA_SEARCH_DIRS, DEFAULT_SEARCH_PATH},
    env::{environ_from_pairs, expand_search_path},
};

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test]
fn test_expand_search_path_with_production_extras() {
    let env = expand_search_path(
        ["HOME=/root", "PATH=/usr/bin:/bin", "TERM=linux"],
        &DEFAULT_EXTRA_SEARCH_DIRS,
    );

    assert_eq!(
        env,
        vec![
            OsString::from("HOME=/root"),
            OsString::from("PATH=/user:/usr/local/bin:/usr/bin:/bin"),
            OsString::from("TERM=linux"),
        ]
    );
}

#[test_log::test]
fn test_expand_search_path_absent_appends_default() {
    let env = expand_search_path(["HOME=/root", "NOEQUALS"], &DEFAULT_EXTRA_SEARCH_DIRS);

    assert_eq!(env.len(), 3);
    assert_eq!(env[..2], [OsString::from("HOME=/root"), OsString::from("NOEQUALS")]);
    assert_eq!(
        env[2],
        OsString::from(format!("PATH=/user:/usr/local/bin:{DEFAULT_SEARCH_PATH}"))
    );
}

#[test_log::test]
fn test_expand_search_path_from_pairs() {
    let env = environ_from_pairs([("PATH", "/bin"), ("OPTS", "a=b")]);
    let env = expand_search_path(env, &["/a", "/b"]);

    assert_eq!(
        env,
        vec![OsString::from("PATH=/a:/b:/bin"), OsString::from("OPTS=a=b")]
    );
}

#[test_log::test]
fn test_expand_search_path_accepts_owned_dirs() {
    let extras = vec!["/opt/one".to_string(), "/opt/two".to_string()];
    let env = expand_search_path(vec![String::from("PATH=/x=y")], &extras);

    assert_eq!(env, vec![OsString::from("PATH=/opt/one:/opt/two:/x=y")]);
}
