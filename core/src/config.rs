//! Runtime configuration, loaded from a JSON file.
//! Every field has a default so a partial file is valid.

use crate::types::{DEFAULT_DISPLAY_NAME, LEADERBOARD_MAX};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// SQLite database file, or `:memory:`.
    pub db_path: String,
    /// Rows returned by the leaderboard query. Clamped to 1..=100.
    pub leaderboard_limit: usize,
    /// Name recorded when a submission has none.
    pub default_display_name: String,
    /// How long a SQLite connection waits on a locked database.
    pub busy_timeout_ms: u64,
    /// Value of the Access-Control-Allow-Origin response header.
    pub cors_allow_origin: String,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            db_path: "scores.db".into(),
            leaderboard_limit: LEADERBOARD_MAX,
            default_display_name: DEFAULT_DISPLAY_NAME.into(),
            busy_timeout_ms: 5_000,
            cors_allow_origin: "*".into(),
        }
    }
}

impl ScoreConfig {
    /// Load from a JSON file.
    /// In tests, use ScoreConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: ScoreConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        Ok(config)
    }

    /// Config for unit and integration tests: in-memory database, short waits.
    pub fn default_test() -> Self {
        Self {
            db_path: ":memory:".into(),
            busy_timeout_ms: 1_000,
            ..Self::default()
        }
    }

    pub fn effective_limit(&self) -> usize {
        self.leaderboard_limit.clamp(1, LEADERBOARD_MAX)
    }
}
