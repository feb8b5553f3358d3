// Application settings
// Loaded from ~/.config/shiftgrid/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Sync tuning
    #[serde(rename = "sync.debounceMs")]
    pub sync_debounce_ms: u64,

    #[serde(rename = "sync.maxWaitMs")]
    pub sync_max_wait_ms: u64,

    #[serde(rename = "sync.chunkSize")]
    pub sync_chunk_size: usize,

    // Export
    #[serde(rename = "export.jpegQuality")]
    pub export_jpeg_quality: u8,

    // Remote store
    #[serde(rename = "api.baseUrl")]
    pub api_base_url: String,

    #[serde(rename = "api.token", skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sync_debounce_ms: 200,
            sync_max_wait_ms: 1500,
            sync_chunk_size: 80,
            export_jpeg_quality: 85,
            api_base_url: "http://localhost:8080/api".to_string(),
            api_token: None,
        }
    }
}

impl Settings {
    /// Settings file location. `None` when the platform has no config dir.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shiftgrid").join("settings.json"))
    }

    /// Load settings, falling back to defaults on a missing or corrupt
    /// file. Unknown keys are ignored so older builds can read newer
    /// files.
    pub fn load() -> Settings {
        Self::config_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &std::path::Path) -> Option<Settings> {
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Persist settings, creating the config directory as needed.
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config directory on this platform",
            ));
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.sync_debounce_ms, 200);
        assert_eq!(s.sync_max_wait_ms, 1500);
        assert_eq!(s.sync_chunk_size, 80);
        assert_eq!(s.export_jpeg_quality, 85);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut s = Settings::default();
        s.sync_chunk_size = 40;
        s.api_token = Some("secret".into());
        s.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.sync_chunk_size, 40);
        assert_eq!(loaded.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_namespaced_keys_on_disk() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"sync.debounceMs\""));
        assert!(json.contains("\"api.baseUrl\""));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let partial: Settings = serde_json::from_str("{\"sync.chunkSize\": 10}").unwrap();
        assert_eq!(partial.sync_chunk_size, 10);
        assert_eq!(partial.sync_debounce_ms, 200);
    }

    #[test]
    fn test_missing_file_yields_none() {
        assert!(Settings::load_from(std::path::Path::new("/nonexistent/settings.json")).is_none());
    }
}
