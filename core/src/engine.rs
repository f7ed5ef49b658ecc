//! The score engine — owns the store, the day clock, and the per-key locks.
//!
//! RULES:
//!   - "Today" comes from the clock, never from the caller.
//!   - One submission performs at most one store write.
//!   - Reconciliation for a (player, day) key runs under that key's lock,
//!     and inside the store's own atomic scope when it has one.
//!   - No retries. Every failure goes back to the caller typed.

use crate::{
    clock::{DayClock, SystemClock},
    config::ScoreConfig,
    error::ScoreResult,
    keyed_lock::KeyedLocks,
    leaderboard,
    record::{LeaderboardEntry, NewScoreRecord, Outcome},
    store::RecordStore,
    submission::Submission,
    types::DateKey,
};
use serde_json::Value;

pub struct ScoreEngine<S, C = SystemClock> {
    store:  S,
    clock:  C,
    config: ScoreConfig,
    locks:  KeyedLocks,
}

impl<S: RecordStore> ScoreEngine<S, SystemClock> {
    pub fn new(store: S, config: ScoreConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S: RecordStore, C: DayClock> ScoreEngine<S, C> {
    pub fn with_clock(store: S, clock: C, config: ScoreConfig) -> Self {
        Self {
            store,
            clock,
            config,
            locks: KeyedLocks::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &ScoreConfig {
        &self.config
    }

    pub fn today(&self) -> DateKey {
        self.clock.today_key()
    }

    /// Record a score for today. Tells the caller which write happened.
    pub fn submit(&self, submission: Submission) -> ScoreResult<Outcome> {
        let submission = submission.normalized().inspect_err(|e| {
            log::warn!("Rejected submission: {e}");
        })?;
        let candidate = NewScoreRecord {
            display_name: submission
                .display_name
                .unwrap_or_else(|| self.config.default_display_name.clone()),
            player_id: submission.player_id,
            avatar_ref: submission.avatar_ref,
            score: submission.score,
            date_key: self.today(),
            wallet_ref: submission.wallet_ref,
        };
        log::debug!(
            "Submission player={} day={} score={} wallet={}",
            candidate.player_id,
            candidate.date_key,
            candidate.score,
            candidate.wallet_ref.is_some(),
        );

        let player_id = candidate.player_id.clone();
        let date_key = candidate.date_key.clone();
        let result = {
            let _guard = self.locks.lock(&player_id, &date_key);
            self.store.reconcile(candidate)
        };

        match &result {
            Ok(Outcome::Unchanged) => {
                log::debug!("Score for {player_id} on {date_key} not higher; unchanged")
            }
            Ok(outcome) => log::info!("Score {} for {player_id} on {date_key}", outcome.name()),
            Err(e) => log::error!("Submission for {player_id} on {date_key} failed: {e}"),
        }
        result
    }

    /// Parse a JSON body and submit it.
    pub fn submit_json(&self, body: &Value) -> ScoreResult<Outcome> {
        let submission = Submission::from_json(body).inspect_err(|e| {
            log::warn!("Rejected submission: {e}");
        })?;
        self.submit(submission)
    }

    /// Today's board, best first, at most 100 rows.
    pub fn query_today(&self) -> ScoreResult<Vec<LeaderboardEntry>> {
        let date_key = self.today();
        leaderboard::top_for_day(&self.store, &date_key, self.config.effective_limit())
            .inspect_err(|e| log::error!("Leaderboard fetch for {date_key} failed: {e}"))
    }
}
