//! The reconciliation rule: insert, raise, or leave a player's daily record.
//!
//! `decide` is pure. `apply` performs the single write the decision calls for.
//! Callers make the read-decide-write sequence atomic per (player, day);
//! see `RecordStore::reconcile` and `ScoreEngine::submit`.

use crate::{
    error::{write_failure, ScoreResult, StoreOp},
    record::{NewScoreRecord, Outcome, ScoreRecord, ScoreUpdate},
    store::RecordStore,
    types::{RecordId, Score},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Insert(NewScoreRecord),
    Update { record_id: RecordId, fields: ScoreUpdate },
    Keep { best: Score },
}

impl Decision {
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Insert(_) => Outcome::Inserted,
            Self::Update { .. } => Outcome::Updated,
            Self::Keep { .. } => Outcome::Unchanged,
        }
    }
}

pub fn decide(existing: Option<&ScoreRecord>, candidate: NewScoreRecord) -> Decision {
    match existing {
        None => Decision::Insert(candidate),
        Some(current) if candidate.score > current.score => Decision::Update {
            record_id: current.record_id,
            fields: ScoreUpdate {
                display_name: candidate.display_name,
                avatar_ref: candidate.avatar_ref,
                score: candidate.score,
                // Sticky: an omitted wallet keeps the stored one.
                wallet_ref: candidate.wallet_ref.or_else(|| current.wallet_ref.clone()),
            },
        },
        Some(current) => Decision::Keep { best: current.score },
    }
}

/// Perform the write a decision calls for. At most one store write.
pub fn apply<S: RecordStore + ?Sized>(store: &S, decision: Decision) -> ScoreResult<Outcome> {
    let outcome = decision.outcome();
    match decision {
        Decision::Insert(record) => {
            let record_id = store.insert(&record).map_err(write_failure(StoreOp::Insert))?;
            log::debug!("Inserted record {record_id} for {}/{}", record.player_id, record.date_key);
        }
        Decision::Update { record_id, fields } => {
            store
                .update(record_id, &fields)
                .map_err(write_failure(StoreOp::Update))?;
            log::debug!("Raised record {record_id} to {}", fields.score);
        }
        Decision::Keep { best } => {
            log::debug!("Kept existing best {best}");
        }
    }
    Ok(outcome)
}
