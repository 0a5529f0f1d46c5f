//! Random sources for encounter resolution
//!
//! Every roll the engine makes (hit, crit, dodge, target choice, attack choice)
//! goes through [`RandomSource`], so a seeded or scripted source makes a whole
//! encounter reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Source of uniform draws
pub trait RandomSource {
    /// Uniform float in `[0, 1)`
    fn draw(&mut self) -> f64;

    /// Uniform integer in `[0, n)`; `n` must be non-zero
    fn draw_int(&mut self, n: usize) -> usize {
        let idx = (self.draw() * n as f64) as usize;
        idx.min(n.saturating_sub(1))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn draw(&mut self) -> f64 {
        (**self).draw()
    }

    fn draw_int(&mut self, n: usize) -> usize {
        (**self).draw_int(n)
    }
}

/// Seedable ChaCha source
///
/// Serializable, so an encounter snapshot carries its exact RNG position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaChaSource {
    rng: ChaCha12Rng,
}

impl ChaChaSource {
    pub fn seed_from_u64(seed: u64) -> Self {
        ChaChaSource {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl Default for ChaChaSource {
    fn default() -> Self {
        Self::seed_from_u64(0)
    }
}

impl RandomSource for ChaChaSource {
    fn draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn draw_int(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }
}

/// Replays a fixed list of draws
///
/// `draw_int(n)` consumes one float and scales it, exactly like a plain
/// uniform source would, so tests script integers as e.g. `0.5` for "index 1
/// of 2". Once the script runs out every draw returns `fallback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        ScriptedSource {
            draws: draws.into_iter().collect(),
            fallback: 0.0,
        }
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn push(&mut self, draw: f64) {
        self.draws.push_back(draw);
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedSource {
    fn draw(&mut self) -> f64 {
        self.draws.pop_front().unwrap_or(self.fallback)
    }
}
