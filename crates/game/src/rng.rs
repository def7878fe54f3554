//! Deterministic pseudo-random numbers for pipe placement.
//!
//! An LCG with the Numerical Recipes constants. Seeding it from config makes
//! a run reproducible, which the world tests rely on.

#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // A zero state would stay at the increment forever.
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Whole number in `[lo, hi)`, as `f32`.
    pub fn range(&mut self, lo: i32, hi: i32) -> f32 {
        debug_assert!(hi > lo, "empty range {lo}..{hi}");
        let span = (hi - lo).max(1) as u32;
        // High bits of an LCG are the better distributed ones.
        (lo + ((self.next_u32() >> 8) % span) as i32) as f32
    }
}
