//! Concurrent submissions for the same (player, day).
//!
//! Every thread races on the same key. Whatever the interleaving, exactly
//! one record must exist and it must hold the highest submitted score.

use chrono::NaiveDate;
use daily_scores_core::{
    clock::FixedClock,
    config::ScoreConfig,
    engine::ScoreEngine,
    record::Outcome,
    store::{MemoryStore, RecordStore, ScoreStore},
    submission::Submission,
};
use std::sync::Arc;
use std::thread;

const THREADS: u64 = 8;
const PER_THREAD: u64 = 25;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
}

fn count(outcomes: &[Outcome], which: Outcome) -> usize {
    outcomes.iter().filter(|o| **o == which).count()
}

#[test]
fn shared_engine_serializes_same_key() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = Arc::new(ScoreEngine::with_clock(
        MemoryStore::new(),
        FixedClock::new(today()),
        ScoreConfig::default_test(),
    ));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|i| {
                        // Interleave scores so threads keep overtaking each other.
                        let score = i * THREADS + t;
                        engine.submit(Submission::new("racer", score)).expect("submit")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let outcomes: Vec<Outcome> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("thread panicked"))
        .collect();

    assert_eq!(count(&outcomes, Outcome::Inserted), 1);
    let rows = engine.store().snapshot();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].score, THREADS * PER_THREAD - 1);
    assert_eq!(
        engine.store().update_count(),
        count(&outcomes, Outcome::Updated)
    );
}

#[test]
fn different_players_do_not_interfere() {
    let engine = Arc::new(ScoreEngine::with_clock(
        MemoryStore::new(),
        FixedClock::new(today()),
        ScoreConfig::default_test(),
    ));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for score in 0..PER_THREAD {
                    engine
                        .submit(Submission::new(format!("solo-{t}"), score))
                        .expect("submit");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("thread panicked");
    }

    let board = engine.query_today().unwrap();
    assert_eq!(board.len() as u64, THREADS);
    assert!(board.iter().all(|e| e.score == PER_THREAD - 1));
}

#[test]
fn separate_sqlite_connections_stay_consistent() {
    let _ = env_logger::builder().is_test(true).try_init();
    let path = std::env::temp_dir().join(format!("daily-scores-{}.db", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().into_owned();

    let seed_store = ScoreStore::open(&path).expect("open db");
    seed_store.migrate().expect("migration");

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = seed_store.reopen().expect("reopen db");
            thread::spawn(move || {
                // Each thread has its own engine and its own locks: only the
                // store transaction keeps the key consistent.
                let engine = ScoreEngine::with_clock(
                    store,
                    FixedClock::new(today()),
                    ScoreConfig::default_test(),
                );
                (0..PER_THREAD)
                    .map(|i| {
                        engine
                            .submit(Submission::new("racer", i * THREADS + t))
                            .expect("submit")
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let outcomes: Vec<Outcome> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("thread panicked"))
        .collect();

    assert_eq!(count(&outcomes, Outcome::Inserted), 1);
    assert_eq!(seed_store.record_count("2024-05-01").unwrap(), 1);
    let record = seed_store.find_one("racer", "2024-05-01").unwrap().unwrap();
    assert_eq!(record.score, THREADS * PER_THREAD - 1);

    drop(seed_store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}
