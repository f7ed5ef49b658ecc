//! Daily high scores: per-player, per-UTC-day best scores and a ranked board.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod keyed_lock;
pub mod leaderboard;
pub mod reconcile;
pub mod record;
pub mod rng;
pub mod store;
pub mod submission;
pub mod transport;
pub mod types;
