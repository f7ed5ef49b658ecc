//! Leaderboard query: today's records, best first.
//!
//! Tie order is whatever the store returns. Callers must not rely on it.

use crate::{
    error::{read_failure, ScoreResult, StoreOp},
    record::LeaderboardEntry,
    store::RecordStore,
    types::LEADERBOARD_MAX,
};
use std::fmt::Write;

/// Top `limit` records for `date_key`, never more than 100.
/// An empty board is a normal result.
pub fn top_for_day<S: RecordStore + ?Sized>(
    store: &S,
    date_key: &str,
    limit: usize,
) -> ScoreResult<Vec<LeaderboardEntry>> {
    let limit = limit.clamp(1, LEADERBOARD_MAX);
    let mut entries = store
        .find_all(date_key, limit)
        .map_err(read_failure(StoreOp::FindAll))?;
    entries.truncate(limit);
    Ok(entries)
}

/// Plain-text board: one `#rank name score` line per entry.
pub fn render_table(title: &str, entries: &[LeaderboardEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {title} ===");
    if entries.is_empty() {
        let _ = writeln!(out, "  (No scores yet today)");
        return out;
    }
    let width = entries
        .iter()
        .map(|e| e.display_name.chars().count())
        .max()
        .unwrap_or(0);
    for (i, e) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "  #{:<4} {:<width$}  {:>10}",
            i + 1,
            e.display_name,
            e.score,
        );
    }
    out
}
