/// User settings persisted between runs
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/image-tagger/settings.json
/// - macOS: ~/Library/Application Support/image-tagger/settings.json
/// - Windows: %APPDATA%\image-tagger\settings.json

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine a config directory")]
    NoConfigDir,

    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    /// Directory of the last opened listing; the Open dialog starts here
    pub last_dir: Option<PathBuf>,
    /// Whether images are scaled to fit the viewer
    pub fit_to_window: bool,
}

impl Settings {
    /// Default location of the settings file
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        let mut path = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or(SettingsError::NoConfigDir)?;

        path.push("image-tagger");
        path.push("settings.json");
        Ok(path)
    }

    /// Read settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read settings from the default location, falling back to defaults
    /// with a warning when anything goes wrong.
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_else(|e| {
                warn!("Using default settings: {}", e);
                Self::default()
            })
    }

    /// Write settings to `path`, creating the parent directory
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Write settings to the default location
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::default_path()?)
    }

    /// Remember the directory of an opened listing
    pub fn remember_listing(&mut self, listing: &Path) {
        self.last_dir = listing
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let mut settings = Settings::default();
        settings.fit_to_window = true;
        settings.remember_listing(Path::new("/data/run1/image_list.txt"));
        settings.save_to(&path).unwrap();

        let restored = Settings::load_from(&path).unwrap();
        assert_eq!(restored.last_dir, Some(PathBuf::from("/data/run1")));
        assert!(restored.fit_to_window);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"fit_to_window": true}"#).unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert!(settings.fit_to_window);
        assert_eq!(settings.last_dir, None);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(Settings::load_from(&path), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_bare_filename_clears_last_dir() {
        let mut settings = Settings::default();
        settings.remember_listing(Path::new("image_list.txt"));
        assert_eq!(settings.last_dir, None);
    }
}
