use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::ConfigError;
use crate::password::PasswordRequest;

const CONFIG_DIR: &str = "pwsynth";
const CONFIG_FILE: &str = "config.json";

/// `<config dir>/pwsynth/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Reads request defaults from a JSON file. Missing fields keep their
/// built-in values.
pub fn load_from_file(path: &Path) -> Result<PasswordRequest, ConfigError> {
    let file = File::open(path)?;
    let request = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), "loaded defaults");
    Ok(request)
}

/// Loads defaults from `explicit` if given, else from the default path when it
/// exists, else falls back to [`PasswordRequest::default`].
pub fn load(explicit: Option<&Path>) -> Result<PasswordRequest, ConfigError> {
    if let Some(path) = explicit {
        return load_from_file(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => load_from_file(&path),
        _ => Ok(PasswordRequest::default()),
    }
}
