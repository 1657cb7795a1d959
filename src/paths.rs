use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable that overrides the state directory.
pub const ROOT_ENV: &str = "IDSDASH_ROOT";

/// Returns the directory holding `config.yaml` and `preferences.yaml`.
///
/// Resolution order:
/// 1. `IDSDASH_ROOT` environment variable (if set and non-empty)
/// 2. Platform config directory for `idsdash`
/// 3. Current working directory + `.idsdash`
pub fn dash_root() -> PathBuf {
    if let Ok(root) = std::env::var(ROOT_ENV)
        && !root.is_empty()
    {
        return PathBuf::from(root);
    }

    ProjectDirs::from("", "", "idsdash")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".idsdash"))
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    dash_root().join("config.yaml")
}

/// Returns the path to the persisted UI preferences.
pub fn preferences_path() -> PathBuf {
    dash_root().join("preferences.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_dash_root_with_env_var() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var(ROOT_ENV, "/custom/path/.idsdash") };
        assert_eq!(dash_root(), PathBuf::from("/custom/path/.idsdash"));
        assert_eq!(
            config_path(),
            PathBuf::from("/custom/path/.idsdash/config.yaml")
        );
        assert_eq!(
            preferences_path(),
            PathBuf::from("/custom/path/.idsdash/preferences.yaml")
        );
        unsafe { std::env::remove_var(ROOT_ENV) };
    }

    #[test]
    #[serial]
    fn test_dash_root_ignores_empty_env_var() {
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { std::env::set_var(ROOT_ENV, "") };
        let root = dash_root();
        assert_ne!(root, PathBuf::from(""));
        assert!(root.ends_with("idsdash") || root.ends_with(".idsdash"));
        unsafe { std::env::remove_var(ROOT_ENV) };
    }
}
