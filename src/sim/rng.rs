//! Deterministic run RNG
//!
//! The whole simulation draws from one seeded 32-bit stream so a run is
//! reproducible from its seed alone. The generator is a mulberry-style
//! mix: an LCG-like counter advance followed by xor-shift finishing,
//! entirely in wrapping u32 arithmetic, divided down to [0,1) at the end.
//! Two generators built from the same seed produce bit-identical
//! sequences forever.

use serde::{Deserialize, Serialize};

/// Seeded pseudo-random stream. One internal step per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimRng {
    state: u32,
}

impl SimRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Raw 32-bit draw, advancing the stream by one step
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Uniform float in [0,1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f64 / 4_294_967_296.0) as f32
    }

    /// Uniform float in [lo, hi)
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform index in [0, len)
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.next_f32() as f64 * len as f64) as usize).min(len - 1)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

/// Draw a fresh 32-bit seed from OS entropy. Used only when starting a
/// brand-new run; replays reuse the recorded seed.
pub fn fresh_seed() -> u32 {
    rand::random::<u32>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(0xDEAD_BEEF);
        let mut b = SimRng::new(0xDEAD_BEEF);
        for _ in 0..10_000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SimRng::new(1);
        let mut b = SimRng::new(2);
        let same = (0..64).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 4);
    }

    #[test]
    fn floats_in_unit_interval() {
        let mut rng = SimRng::new(42);
        for _ in 0..10_000 {
            let x = rng.next_f32();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1_000 {
            assert!(rng.index(3) < 3);
        }
    }
}
