use serde::{Deserialize, Serialize};

/// Deterministic Mulberry32 stream shared by every sub-system.
///
/// All randomness in a race (weather phases, qualifying, incidents, pit
/// durations, strategy jitter, physics noise) draws from one instance, so the
/// consumption order across the tick pipeline is part of the replay contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceRng {
    state: u32,
}

impl RaceRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next uniform value in [0, 1). Bit-exact Mulberry32.
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Uniform value in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next() * (hi - lo)
    }

    /// Uniform integer in [lo, hi], both ends inclusive.
    pub fn range_int(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next() * (hi - lo + 1) as f64) as i64
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }
}
