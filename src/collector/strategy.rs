use std::time::Duration;

use rand::Rng;
use tracing::{info, warn};

use crate::utils::constants::{
    JITTER_MAX, JITTER_MIN, SLOWDOWN_FACTOR, SLOWDOWN_SUCCESS_RATE, SPEEDUP_FACTOR,
    SPEEDUP_SUCCESS_RATE,
};

/// Adaptive inter-iteration delay.
///
/// The multiplier starts at 1.0 and is only ever multiplied: no floor,
/// ceiling or reset. A long degraded run grows it without bound and a long
/// healthy run decays it toward zero. That drift is part of the observed
/// contract and is left as-is.
pub struct AdaptiveDelay {
    base_delay: f64,
    multiplier: f64,
}

impl AdaptiveDelay {
    pub fn new(base_delay_secs: f64) -> Self {
        Self {
            base_delay: base_delay_secs,
            multiplier: 1.0,
        }
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// React to the running success rate: below 0.5 double the delay,
    /// above 0.9 shave it by 20%, otherwise leave it alone.
    pub fn adjust(&mut self, success_rate: f64) {
        if success_rate < SLOWDOWN_SUCCESS_RATE {
            self.multiplier *= SLOWDOWN_FACTOR;
            warn!(
                success_rate,
                multiplier = self.multiplier,
                "low success rate detected, increasing delay"
            );
        } else if success_rate > SPEEDUP_SUCCESS_RATE {
            self.multiplier *= SPEEDUP_FACTOR;
            info!(
                success_rate,
                multiplier = self.multiplier,
                "high success rate detected, decreasing delay"
            );
        }
    }

    /// The next wait: base delay scaled by the multiplier and a uniform
    /// jitter in [0.5, 1.5).
    pub fn next_delay(&self) -> Duration {
        let jitter = rand::rng().random_range(JITTER_MIN..JITTER_MAX);
        Duration::from_secs_f64(self.base_delay * self.multiplier * jitter)
    }
}
