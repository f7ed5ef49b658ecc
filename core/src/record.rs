//! Daily score records and the shapes derived from them.

use crate::types::{DateKey, PlayerId, RecordId, Score};
use serde::{Deserialize, Serialize};

/// One row per (player, UTC day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub record_id:    RecordId,
    pub player_id:    PlayerId,
    pub display_name: String,
    pub avatar_ref:   Option<String>,
    pub score:        Score,
    pub date_key:     DateKey,
    pub wallet_ref:   Option<String>,
}

/// A record about to be inserted. The store assigns `record_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScoreRecord {
    pub player_id:    PlayerId,
    pub display_name: String,
    pub avatar_ref:   Option<String>,
    pub score:        Score,
    pub date_key:     DateKey,
    pub wallet_ref:   Option<String>,
}

impl NewScoreRecord {
    pub fn into_record(self, record_id: RecordId) -> ScoreRecord {
        ScoreRecord {
            record_id,
            player_id: self.player_id,
            display_name: self.display_name,
            avatar_ref: self.avatar_ref,
            score: self.score,
            date_key: self.date_key,
            wallet_ref: self.wallet_ref,
        }
    }
}

/// The mutable fields written by a targeted update.
/// `wallet_ref` is already merged with the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub display_name: String,
    pub avatar_ref:   Option<String>,
    pub score:        Score,
    pub wallet_ref:   Option<String>,
}

/// Leaderboard projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id:    PlayerId,
    pub display_name: String,
    pub avatar_ref:   Option<String>,
    pub score:        Score,
    pub wallet_ref:   Option<String>,
}

impl From<&ScoreRecord> for LeaderboardEntry {
    fn from(r: &ScoreRecord) -> Self {
        Self {
            player_id: r.player_id.clone(),
            display_name: r.display_name.clone(),
            avatar_ref: r.avatar_ref.clone(),
            score: r.score,
            wallet_ref: r.wallet_ref.clone(),
        }
    }
}

/// What a submission did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Inserted,
    Updated,
    Unchanged,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inserted  => "inserted",
            Self::Updated   => "updated",
            Self::Unchanged => "unchanged",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Inserted  => "New score inserted",
            Self::Updated   => "Score updated",
            Self::Unchanged => "Score not updated (not higher)",
        }
    }
}
