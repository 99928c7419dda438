/// Player configuration
use deck_catalog::CatalogConfig;
use deck_core::{DeckError, Result};
use deck_queue::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the player needs to start a session
///
/// Sources, lowest precedence first: built-in defaults, the TOML file,
/// `DECK_`-prefixed environment variables (nested keys joined with `__`,
/// e.g. `DECK_ENGINE__MAX_RETRIES`), then command-line flags.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Catalog playlist to play
    pub playlist_id: String,

    pub catalog: CatalogConfig,

    pub engine: EngineConfig,
}

impl DeckConfig {
    /// Load configuration from file and environment
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        // Override with environment variables (prefixed with DECK_)
        settings = settings.add_source(
            config::Environment::with_prefix("DECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| DeckError::config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| DeckError::config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playlist_id.trim().is_empty() {
            return Err(DeckError::config(
                "Playlist id is required (set DECK_PLAYLIST_ID or --playlist)",
            ));
        }

        if self.catalog.api_key.trim().is_empty() {
            return Err(DeckError::config(
                "Catalog API key is required (set DECK_CATALOG_API_KEY or --api-key)",
            ));
        }

        if self.engine.lookahead_count == 0 {
            return Err(DeckError::config("engine.lookahead_count must be at least 1"));
        }

        if self.engine.validation_timeout_ms == 0 || self.engine.transition_watchdog_ms == 0 {
            return Err(DeckError::config("Engine timeouts must be non-zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_queue::ShuffleMode;
    use std::io::Write;

    fn valid() -> DeckConfig {
        DeckConfig {
            playlist_id: "PL123".into(),
            catalog: CatalogConfig::new("key"),
            ..DeckConfig::default()
        }
    }

    #[test]
    fn loads_nested_sections_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
playlist_id = "PLfile"

[catalog]
api_key = "file-key"
language = "de"

[engine]
max_retries = 5
shuffle = "off"
"#
        )
        .unwrap();

        let config = DeckConfig::load(&path).unwrap();

        assert_eq!(config.playlist_id, "PLfile");
        assert_eq!(config.catalog.api_key, "file-key");
        assert_eq!(config.catalog.language.as_deref(), Some("de"));
        assert_eq!(config.engine.max_retries, 5);
        assert_eq!(config.engine.shuffle, ShuffleMode::Off);
        // Unset keys keep their defaults
        assert_eq!(config.engine.lookahead_count, 3);
        assert_eq!(config.catalog.max_pages, 20);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DeckConfig::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.engine.history_size, 10);
        assert_eq!(config.engine.shuffle, ShuffleMode::Random);
    }

    #[test]
    fn validation_requires_playlist_and_key() {
        assert!(valid().validate().is_ok());

        let mut config = valid();
        config.playlist_id = " ".into();
        assert!(matches!(config.validate(), Err(DeckError::Config(_))));

        let mut config = valid();
        config.catalog.api_key.clear();
        assert!(matches!(config.validate(), Err(DeckError::Config(_))));
    }

    #[test]
    fn validation_rejects_zero_timeouts() {
        let mut config = valid();
        config.engine.validation_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.engine.lookahead_count = 0;
        assert!(config.validate().is_err());
    }
}
