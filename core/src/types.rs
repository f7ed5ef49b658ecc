//! Shared primitive types used across the crate.

/// A stable external player identifier.
pub type PlayerId = String;

/// A UTC calendar day rendered as `YYYY-MM-DD`.
pub type DateKey = String;

/// Store-assigned surrogate key of a daily record.
pub type RecordId = i64;

/// A submitted or recorded score. Never negative.
pub type Score = u64;

/// Largest score the store can hold (SQLite INTEGER is signed 64-bit).
pub const MAX_SCORE: Score = i64::MAX as Score;

/// Hard ceiling on leaderboard rows, whatever the configuration says.
pub const LEADERBOARD_MAX: usize = 100;

/// Display name recorded when a submission carries none.
pub const DEFAULT_DISPLAY_NAME: &str = "Anonymous";
