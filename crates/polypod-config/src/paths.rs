//! Platform-specific locations for configuration files.
//!
//! - **User config**: `~/.config/polypod/` (Linux), `~/Library/Application Support/polypod/` (macOS), `%APPDATA%\polypod\` (Windows)
//! - **Engine configs**: `<user config>/configs/`
//!
//! ```rust,no_run
//! use polypod_config::paths;
//!
//! if let Some(path) = paths::find_config("studio") {
//!     println!("Found config at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "polypod";

/// Subdirectory name for engine configurations.
const CONFIGS_SUBDIR: &str = "configs";

/// The user-specific configuration directory.
///
/// Falls back to `./polypod` if the platform directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory holding the user's engine configurations.
pub fn user_configs_dir() -> PathBuf {
    user_config_dir().join(CONFIGS_SUBDIR)
}

/// Find a configuration file by path or name.
///
/// `name` is tried as a path first, then as a file name (with `.toml` added
/// if missing) inside [`user_configs_dir`].
pub fn find_config(name: &str) -> Option<PathBuf> {
    find_config_in(name, &user_configs_dir())
}

fn find_config_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// Create the user configs directory if needed and return it.
pub fn ensure_user_configs_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_configs_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
        tracing::info!(dir = %dir.display(), "created config directory");
    }
    Ok(dir)
}

/// TOML files in the user configs directory, sorted.
///
/// Empty if the directory doesn't exist or can't be read.
pub fn list_user_configs() -> Vec<PathBuf> {
    list_configs_in_dir(&user_configs_dir())
}

fn list_configs_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut configs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    configs.sort();
    configs
}

/// Configuration name from its file path (the file stem).
///
/// ```rust
/// use polypod_config::paths::config_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(config_name_from_path(Path::new("/a/studio.toml")), Some("studio".to_string()));
/// ```
pub fn config_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
