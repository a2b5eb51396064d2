//! Preset option sets per round.
//!
//! The host can pre-plan rounds in a JSON file instead of typing options
//! live. File shape:
//!
//! ```json
//! { "rounds": { "1": { "title": "Warmup", "options": ["Tea", "Coffee"] } } }
//! ```
//!
//! A missing or malformed file simply means no presets — the game degrades
//! to manual option entry.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Preset entry for one round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundPreset {
    pub title: Option<String>,
    pub options: Option<Vec<String>>,
}

/// Source of per-round preset option sets.
#[async_trait]
pub trait PresetSource: Send + Sync {
    async fn preset_for_round(&self, round: u32) -> Option<RoundPreset>;
}

#[derive(Debug, Default, Deserialize)]
struct PresetFile {
    #[serde(default)]
    rounds: HashMap<String, PresetFileRound>,
}

#[derive(Debug, Deserialize)]
struct PresetFileRound {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
}

/// JSON-file-backed preset source. Re-reads the file on every lookup so the
/// host can edit presets while the game is running.
pub struct FilePresets {
    path: PathBuf,
}

impl FilePresets {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> PresetFile {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(_) => return PresetFile::default(),
        };
        match serde_json::from_str(&raw) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "malformed preset file: {}", e);
                PresetFile::default()
            }
        }
    }
}

#[async_trait]
impl PresetSource for FilePresets {
    async fn preset_for_round(&self, round: u32) -> Option<RoundPreset> {
        self.load()
            .await
            .rounds
            .get(&round.to_string())
            .map(|r| RoundPreset {
                title: r.title.clone(),
                options: r.options.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn preset_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn missing_file_means_no_presets() {
        let presets = FilePresets::new("/nonexistent/rounds_config.json");
        assert_eq!(presets.preset_for_round(1).await, None);
    }

    #[tokio::test]
    async fn malformed_file_means_no_presets() {
        let file = preset_file("{ not json");
        let presets = FilePresets::new(file.path());
        assert_eq!(presets.preset_for_round(1).await, None);
    }

    #[tokio::test]
    async fn configured_round_returns_options_and_title() {
        let file = preset_file(
            r#"{"rounds": {"2": {"title": "Hot drinks", "options": ["Tea", "Coffee", "Mate"]}}}"#,
        );
        let presets = FilePresets::new(file.path());

        let preset = presets.preset_for_round(2).await.unwrap();
        assert_eq!(preset.title.as_deref(), Some("Hot drinks"));
        assert_eq!(
            preset.options,
            Some(vec![
                "Tea".to_string(),
                "Coffee".to_string(),
                "Mate".to_string()
            ])
        );

        assert_eq!(presets.preset_for_round(1).await, None);
    }

    #[tokio::test]
    async fn round_entry_without_options_is_title_only() {
        let file = preset_file(r#"{"rounds": {"3": {"title": "Finale"}}}"#);
        let presets = FilePresets::new(file.path());

        let preset = presets.preset_for_round(3).await.unwrap();
        assert_eq!(preset.title.as_deref(), Some("Finale"));
        assert_eq!(preset.options, None);
    }
}
