use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hugging Face model id (e.g. "dslim/bert-base-NER"), or a local
    /// directory when `allow_local_models` is set.
    pub model_id: String,
    /// Revision to fetch artifacts from, usually "main".
    pub model_revision: String,
    /// When false (the default), `model_id` is always resolved against the
    /// Hugging Face Hub; when true, a `model_id` naming an existing
    /// directory is loaded straight from disk.
    pub allow_local_models: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_id: "dslim/bert-base-NER".into(),
            model_revision: "main".into(),
            allow_local_models: false,
        }
    }
}

impl Config {
    /// Directory: ~/.config/entity-lens/
    fn dir() -> PathBuf {
        let mut p = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push("entity-lens");
        p
    }

    fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load from disk, returning defaults if file doesn't exist or is invalid.
    pub fn load() -> Self {
        let path = Self::path();
        match fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let dir = Self::dir();
        fs::create_dir_all(&dir)?;
        let data = serde_json::to_string_pretty(self)?;
        fs::write(Self::path(), data)?;
        Ok(())
    }

    /// URL of the model's Hugging Face page, shown in the UI.
    pub fn model_page_url(&self) -> String {
        format!("https://huggingface.co/{}", self.model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_against_the_hub() {
        let config = Config::default();
        assert_eq!(config.model_id, "dslim/bert-base-NER");
        assert_eq!(config.model_revision, "main");
        assert!(!config.allow_local_models);
        assert_eq!(
            config.model_page_url(),
            "https://huggingface.co/dslim/bert-base-NER"
        );
    }

    #[test]
    fn config_survives_a_json_round_trip() {
        let config = Config {
            model_id: "acme/custom-ner".into(),
            model_revision: "refs/pr/4".into(),
            allow_local_models: true,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.model_id, config.model_id);
        assert_eq!(back.model_revision, config.model_revision);
        assert!(back.allow_local_models);
    }
}
