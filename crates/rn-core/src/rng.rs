//! Deterministic per-agent RNG wrapper.
//!
//! # Determinism strategy
//!
//! Each pursuer gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! Flee targets and random map points are therefore reproducible per agent,
//! independent of how many other pursuers share the map.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG.
///
/// Owned by the agent's pathfinder; never shared.  Pass `rng.inner()` to
/// APIs that take a generic `rand::Rng`.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types
    /// (`rng.inner().sample(...)`, `rng.inner().gen_range(...)`, etc.)
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
