//! Rage meter

use crate::config::RageConfig;

/// Continuously accumulating aggression.
///
/// There is no hard clamp: the level may pass `max` by one tick's worth of
/// gain before the controller notices and dispatches the overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct RageMeter {
    level: f32,
    max: f32,
    default_gain: f32,
    failed_search_penalty: f32,
}

impl RageMeter {
    pub fn new(config: &RageConfig) -> Self {
        Self {
            level: 0.0,
            max: config.max,
            default_gain: config.default_gain,
            failed_search_penalty: config.failed_search_penalty,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Passive gain over `dt` seconds
    pub fn accumulate(&mut self, dt: f32) {
        self.level += self.default_gain * dt;
    }

    /// Fixed penalty for an investigation that found nothing
    pub fn penalize_failed_search(&mut self) {
        self.level += self.failed_search_penalty;
    }

    pub fn add(&mut self, amount: f32) {
        self.level += amount;
    }

    pub fn is_full(&self) -> bool {
        self.level >= self.max
    }

    pub fn clear(&mut self) {
        self.level = 0.0;
    }
}
