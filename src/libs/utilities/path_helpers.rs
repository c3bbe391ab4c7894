// Small path utilities shared by the command-line layer and the config bootstrapper.

use std::ffi::OsString;
use std::path::PathBuf;

/// Expands a leading `~` to the user's home directory.
/// Paths without a tilde, or when no home directory can be found, are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") || path.starts_with("~\\") {
        if let Some(home) = dirs::home_dir() {
            return PathBuf::from(path.replacen('~', &home.to_string_lossy(), 1));
        }
    }
    PathBuf::from(path)
}

/// Home directory as seen through `env`: `HOME`, then `USERPROFILE`.
/// `env` is the process environment in production and a fixed map in tests.
pub fn home_from_env(env: &dyn Fn(&str) -> Option<OsString>) -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(|key| env(key))
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_without_tilde_are_untouched() {
        assert_eq!(expand_tilde("/opt/app"), PathBuf::from("/opt/app"));
        assert_eq!(expand_tilde("relative/~dir"), PathBuf::from("relative/~dir"));
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/work"), PathBuf::from(format!("{}/work", home.to_string_lossy())));
        }
    }

    #[test]
    fn home_prefers_home_over_userprofile() {
        let env = |key: &str| match key {
            "HOME" => Some(OsString::from("/home/ana")),
            "USERPROFILE" => Some(OsString::from("C:\\Users\\ana")),
            _ => None,
        };
        assert_eq!(home_from_env(&env), Some(PathBuf::from("/home/ana")));

        let windows_only = |key: &str| match key {
            "HOME" => Some(OsString::new()),
            "USERPROFILE" => Some(OsString::from("C:\\Users\\ana")),
            _ => None,
        };
        assert_eq!(
            home_from_env(&windows_only),
            Some(PathBuf::from("C:\\Users\\ana"))
        );
    }
}
