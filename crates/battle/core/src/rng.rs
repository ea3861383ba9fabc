//! RNG oracle for deterministic random number generation.
//!
//! Spawn positions, drift, spawn gates, and cosmetic variance all draw from
//! an [`RngOracle`]. Draws are keyed by a seed derived from the encounter
//! seed, the turn, the frame, and a per-roll context, so a dodge phase is
//! reproducible from its inputs alone and tests can plug in scripted values.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `[0, 1)`.
    fn unit(&self, seed: u64) -> f32 {
        // 24 bits fit an f32 mantissa exactly.
        (self.next_u32(seed) >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform value in `[min, max)`.
    fn range_f32(&self, seed: u64, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        min + self.unit(seed) * (max - min)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. A single step from the seed
/// is taken per draw; callers vary the seed with [`compute_seed`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Roll contexts so independent draws within one frame never share a seed.
pub mod context {
    pub const SWARM_X: u32 = 0;
    pub const SWARM_DRIFT: u32 = 1;
    pub const SWEEP_GATE: u32 = 2;
    pub const SWEEP_Y: u32 = 3;
    pub const SPEECH: u32 = 4;
}

/// Compute deterministic seed from encounter components.
///
/// * `encounter_seed` - Base seed fixed when the encounter is created
/// * `turn` - Turn counter (increments on every dodge phase)
/// * `frame` - Frame within the phase
/// * `context` - Distinguishes multiple rolls in the same frame
pub fn compute_seed(encounter_seed: u64, turn: u32, frame: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing.
    let mut hash = encounter_seed;
    hash ^= (turn as u64).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (frame as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
