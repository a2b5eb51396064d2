//! Server configuration from environment variables.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind on.
    pub port: u16,
    /// Path to the per-round preset options file.
    pub presets_path: PathBuf,
    /// Public base URL used to build the join link embedded in the QR code.
    pub public_url: String,
}

impl ServerConfig {
    /// Load config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);

        let presets_path = std::env::var("HOLDOUT_PRESETS")
            .unwrap_or_else(|_| "rounds_config.json".to_string())
            .into();

        let public_url = std::env::var("HOLDOUT_PUBLIC_URL")
            .ok()
            .map(|s| s.trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Self {
            port,
            presets_path,
            public_url,
        }
    }

    /// Join URL for a session id, the target the QR code points at.
    pub fn join_url(&self, session_id: &str) -> String {
        format!("{}/join/{}", self.public_url, session_id)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            presets_path: "rounds_config.json".into(),
            public_url: "http://localhost:8000".to_string(),
        }
    }
}
