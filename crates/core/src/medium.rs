//! Link conditions: the random events the data-link protocols react to.
//!
//! Two events are simulated:
//!
//! - **Collision**: a transmission attempt on a shared medium is garbled
//!   (Bernoulli trial, default 20%).
//! - **Acknowledgment**: the receiver confirms a window of frames
//!   (Bernoulli trial, default 50%).
//!
//! The protocols never draw random numbers themselves; they ask a
//! [`LinkConditions`] implementation. [`RandomConditions`] uses a seeded
//! ChaCha8 RNG so runs are reproducible given the same seed.
//! [`ScriptedConditions`] replays fixed answers for tests.

use crate::error::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Probability of a collision on each CSMA/CD attempt.
pub const COLLISION_PROBABILITY: f64 = 0.2;

/// Probability that a sent window is acknowledged.
pub const ACK_PROBABILITY: f64 = 0.5;

/// Source of collision and acknowledgment events.
pub trait LinkConditions {
    /// Did this transmission attempt collide?
    fn collision(&mut self) -> bool;

    /// Was the window just sent acknowledged?
    fn ack_received(&mut self) -> bool;
}

impl<T: LinkConditions + ?Sized> LinkConditions for &mut T {
    fn collision(&mut self) -> bool {
        (**self).collision()
    }

    fn ack_received(&mut self) -> bool {
        (**self).ack_received()
    }
}

/// Configuration for randomized link conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionsConfig {
    /// Collision probability per attempt [0.0, 1.0)
    pub collision_probability: f64,

    /// Acknowledgment probability per window (0.0, 1.0]
    pub ack_probability: f64,

    /// Random seed for determinism
    pub seed: u64,
}

impl ConditionsConfig {
    /// No collisions, every window acknowledged.
    pub fn perfect(seed: u64) -> Self {
        Self {
            collision_probability: 0.0,
            ack_probability: 1.0,
            seed,
        }
    }

    /// The classroom defaults: 20% collisions, fair-coin acknowledgments.
    pub fn default_with_seed(seed: u64) -> Self {
        Self {
            collision_probability: COLLISION_PROBABILITY,
            ack_probability: ACK_PROBABILITY,
            seed,
        }
    }

    /// Check that both loops can still terminate.
    ///
    /// # Errors
    /// `Error::InvalidProbability` if a value is outside [0, 1], if collisions
    /// are certain, or if acknowledgments are impossible.
    pub fn validate(&self) -> Result<()> {
        let p = self.collision_probability;
        if !(0.0..1.0).contains(&p) {
            return Err(Error::InvalidProbability(p));
        }
        let q = self.ack_probability;
        if !(q > 0.0 && q <= 1.0) {
            return Err(Error::InvalidProbability(q));
        }
        Ok(())
    }
}

/// Seeded random link conditions.
pub struct RandomConditions {
    config: ConditionsConfig,
    rng: ChaCha8Rng,

    // Statistics
    attempts: u64,
    collisions: u64,
    ack_draws: u64,
    acks: u64,
}

impl RandomConditions {
    /// Create conditions from a validated configuration.
    pub fn new(config: ConditionsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            attempts: 0,
            collisions: 0,
            ack_draws: 0,
            acks: 0,
        })
    }

    /// Classroom defaults with the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            config: ConditionsConfig::default_with_seed(seed),
            rng: ChaCha8Rng::seed_from_u64(seed),
            attempts: 0,
            collisions: 0,
            ack_draws: 0,
            acks: 0,
        }
    }

    /// Get statistics about the events drawn so far.
    pub fn stats(&self) -> ConditionsStats {
        ConditionsStats {
            attempts: self.attempts,
            collisions: self.collisions,
            ack_draws: self.ack_draws,
            acks: self.acks,
        }
    }
}

impl LinkConditions for RandomConditions {
    fn collision(&mut self) -> bool {
        self.attempts += 1;
        let roll: f64 = self.rng.gen();
        let hit = roll < self.config.collision_probability;
        if hit {
            self.collisions += 1;
        }
        hit
    }

    fn ack_received(&mut self) -> bool {
        self.ack_draws += 1;
        let acked = self.rng.gen_bool(self.config.ack_probability);
        if acked {
            self.acks += 1;
        }
        acked
    }
}

/// Statistics about drawn link events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionsStats {
    /// Collision draws (one per transmission attempt)
    pub attempts: u64,

    /// Draws that came up as a collision
    pub collisions: u64,

    /// Acknowledgment draws (one per window)
    pub ack_draws: u64,

    /// Draws that came up acknowledged
    pub acks: u64,
}

impl ConditionsStats {
    pub fn collision_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.collisions as f64 / self.attempts as f64
        }
    }

    pub fn ack_rate(&self) -> f64 {
        if self.ack_draws == 0 {
            0.0
        } else {
            self.acks as f64 / self.ack_draws as f64
        }
    }
}

/// Replays fixed answers, then falls back to "no collision" / "acknowledged".
#[derive(Debug, Clone, Default)]
pub struct ScriptedConditions {
    collisions: VecDeque<bool>,
    acks: VecDeque<bool>,
}

impl ScriptedConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers for successive `collision()` calls.
    pub fn with_collisions(mut self, script: impl IntoIterator<Item = bool>) -> Self {
        self.collisions.extend(script);
        self
    }

    /// Answers for successive `ack_received()` calls.
    pub fn with_acks(mut self, script: impl IntoIterator<Item = bool>) -> Self {
        self.acks.extend(script);
        self
    }

    /// Scripted answers not yet consumed, as (collisions, acks).
    pub fn remaining(&self) -> (usize, usize) {
        (self.collisions.len(), self.acks.len())
    }
}

impl LinkConditions for ScriptedConditions {
    fn collision(&mut self) -> bool {
        self.collisions.pop_front().unwrap_or(false)
    }

    fn ack_received(&mut self) -> bool {
        self.acks.pop_front().unwrap_or(true)
    }
}
