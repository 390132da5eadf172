//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_root_folder())
}

/// Ensure the root folder exists, creating it if missing.
pub fn ensure_root_folder(root: &PathBuf) -> Result<()> {
    if !root.exists() {
        std::fs::create_dir_all(root)
            .map_err(|e| Error::Config(format!("Failed to create root folder {:?}: {}", root, e)))?;
        tracing::info!(root = ?root, "Created root folder");
    }
    Ok(())
}

/// SQLite database path inside the root folder.
pub fn database_path(root: &PathBuf) -> PathBuf {
    root.join("vgc.db")
}

/// Get configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/vgc/config.toml first, then /etc/vgc/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("vgc").join("config.toml"));
        let system_config = PathBuf::from("/etc/vgc/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("vgc").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("vgc"))
        .unwrap_or_else(|| PathBuf::from("./vgc_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_wins() {
        let root = resolve_root_folder(Some("/tmp/vgc-test"), "VGC_TEST_UNSET_VAR").unwrap();
        assert_eq!(root, PathBuf::from("/tmp/vgc-test"));
    }

    #[test]
    fn test_env_var_used_when_no_cli_arg() {
        std::env::set_var("VGC_TEST_ROOT_VAR", "/tmp/vgc-env");
        let root = resolve_root_folder(None, "VGC_TEST_ROOT_VAR").unwrap();
        assert_eq!(root, PathBuf::from("/tmp/vgc-env"));
        std::env::remove_var("VGC_TEST_ROOT_VAR");
    }

    #[test]
    fn test_database_path() {
        let root = PathBuf::from("/data/vgc");
        assert_eq!(database_path(&root), PathBuf::from("/data/vgc/vgc.db"));
    }

    #[test]
    fn test_ensure_root_folder_creates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("vgc");
        ensure_root_folder(&root).unwrap();
        assert!(root.exists());
    }
}
