//! Deterministic synthetic submissions.
//!
//! Used by the runner to fill a board and by tests that check the
//! reconciliation rule over long random sequences. The same seed always
//! produces the same sequence.

use crate::{submission::Submission, types::Score};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const NAMES: &[&str] = &[
    "Ann", "Bo", "Cyd", "Dee", "Eli", "Fay", "Gus", "Hal", "Ivy", "Jo",
];

pub struct SubmissionRng {
    inner: Pcg64Mcg,
}

impl SubmissionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// One submission from a pool of `players` ids, score below `max_score`.
    /// Names, avatars, and wallets are present only some of the time.
    pub fn submission(&mut self, players: u64, max_score: Score) -> Submission {
        let player = self.next_u64_below(players.max(1));
        let mut sub = Submission::new(format!("player-{player}"), self.next_u64_below(max_score.max(1)));
        if self.chance(0.8) {
            let name = NAMES[(player as usize) % NAMES.len()];
            sub = sub.with_display_name(format!("{name}{player}"));
        }
        if self.chance(0.5) {
            sub = sub.with_avatar_ref(format!("avatar/{player}.png"));
        }
        if self.chance(0.3) {
            sub = sub.with_wallet_ref(format!("wallet-{:08x}", self.inner.next_u64() as u32));
        }
        sub
    }
}
