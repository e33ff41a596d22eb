// ============================================================================
// APP SETTINGS — persisted key=value config in the OS data directory
// ============================================================================

use std::path::PathBuf;

use crate::logger::data_dir;

/// User-facing settings. Saved as `key=value` lines so the file stays
/// hand-editable; unknown keys are ignored on load.
#[derive(Clone, Debug)]
pub struct AppSettings {
    /// Gemini API key. The `GEMINI_API_KEY` environment variable overrides
    /// the stored value and is never written back to disk.
    pub api_key: String,
    /// Chat/design model name.
    pub model: String,
    /// Language code (e.g. "en"). Empty string = default.
    pub language: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: crate::ops::ai::MODEL_NAME.to_string(),
            language: String::new(),
        }
    }
}

impl AppSettings {
    fn settings_path() -> Option<PathBuf> {
        let dir = data_dir().join("CreoTools");
        let _ = std::fs::create_dir_all(&dir);
        Some(dir.join("settings.conf"))
    }

    /// Save settings to disk.
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        let content = format!(
            "api_key={}\n\
             model={}\n\
             language={}\n",
            self.api_key, self.model, self.language,
        );
        let _ = std::fs::write(path, content);
    }

    /// Load settings from disk (returns default if file missing or corrupt),
    /// then apply environment overrides.
    pub fn load() -> Self {
        let mut s = Self::default();
        if let Some(path) = Self::settings_path()
            && let Ok(content) = std::fs::read_to_string(&path)
        {
            for line in content.lines() {
                let Some((key, val)) = line.split_once('=') else { continue };
                match key.trim() {
                    "api_key" => s.api_key = val.trim().to_string(),
                    "model" => {
                        if !val.trim().is_empty() {
                            s.model = val.trim().to_string();
                        }
                    }
                    "language" => s.language = val.trim().to_string(),
                    _ => {}
                }
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY")
            && !key.is_empty()
        {
            s.api_key = key;
        }
        s
    }
}
