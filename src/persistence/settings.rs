use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};
use tracing::info;

use super::{
    get_data_file_path,
    load_json_or_default,
    save_json,
};
use crate::{
    core::PipError,
    remote::DEFAULT_MODEL,
};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteCleanupSettings {
    pub enabled: bool,
    pub model: String,
}

impl Default for RemoteCleanupSettings {
    fn default() -> Self {
        Self { enabled: false, model: DEFAULT_MODEL.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The Apps Script web app URL records are posted to.
    pub destination_url: String,
    pub remote_cleanup: RemoteCleanupSettings,
}

impl Settings {
    pub fn has_destination(&self) -> bool {
        !self.destination_url.trim().is_empty()
    }
}

/// Where settings live. Injected into the app so tests can point it anywhere.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(get_data_file_path(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files give the defaults.
    pub fn load(&self) -> Settings {
        let settings: Settings = load_json_or_default(&self.path);
        info!(
            "Settings loaded (destination {}, remote cleanup {})",
            if settings.has_destination() { "set" } else { "unset" },
            if settings.remote_cleanup.enabled { "on" } else { "off" }
        );
        settings
    }

    pub fn save(&self, settings: &Settings) -> Result<(), PipError> {
        save_json(settings, &self.path)?;
        info!("Settings saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));

        let settings = store.load();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.destination_url, "");
        assert!(!settings.remote_cleanup.enabled);
        assert_eq!(settings.remote_cleanup.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));

        let settings = Settings {
            destination_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            remote_cleanup: RemoteCleanupSettings { enabled: true, model: "gemini-2.5-flash".to_string() },
        };
        store.save(&settings).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_partial_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(&path);

        fs::write(&path, r#"{"destination_url":"https://example.com/exec","unknown":1}"#).unwrap();
        let settings = store.load();
        assert_eq!(settings.destination_url, "https://example.com/exec");
        assert_eq!(settings.remote_cleanup, RemoteCleanupSettings::default());

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(store.load(), Settings::default());
    }
}
