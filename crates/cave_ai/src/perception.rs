//! Zone-scoped perception
//!
//! Each listening zone around the monster has its own audibility threshold.
//! Zones nest, and only the most recently entered zone that still holds the
//! perceiver gets to forward sounds.

use crate::sound::{Sound, SoundLevel};
use cave_triggers::{ZoneId, ZoneStack};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Per-zone severity adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionFilter {
    /// Quietest level this zone can hear
    pub min_audible: SoundLevel,
}

impl PerceptionFilter {
    pub fn new(min_audible: SoundLevel) -> Self {
        Self { min_audible }
    }

    /// Severity as heard from this zone, or `None` if it does not register.
    ///
    /// A sound exactly at the threshold is heard as `Quiet`; each level above
    /// it adds one, saturating at `Loud`. Silence never registers, even in a
    /// zone whose threshold is `None`.
    pub fn adjust(&self, raw: SoundLevel) -> Option<SoundLevel> {
        if !raw.is_audible() || raw < self.min_audible {
            return None;
        }
        let rank = raw.rank() - self.min_audible.rank() + 1;
        Some(SoundLevel::from_rank_saturating(rank))
    }
}

impl Default for PerceptionFilter {
    fn default() -> Self {
        Self::new(SoundLevel::Quiet)
    }
}

/// Listening zones, their filters and which one is active
#[derive(Debug, Default, Clone)]
pub struct ListeningZones {
    filters: HashMap<ZoneId, PerceptionFilter>,
    occupied: BTreeSet<ZoneId>,
    stack: ZoneStack,
}

impl ListeningZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a filter to a zone. Replaces any previous filter.
    pub fn register(&mut self, zone: ZoneId, filter: PerceptionFilter) {
        self.filters.insert(zone, filter);
    }

    pub fn filter(&self, zone: ZoneId) -> Option<&PerceptionFilter> {
        self.filters.get(&zone)
    }

    pub fn is_registered(&self, zone: ZoneId) -> bool {
        self.filters.contains_key(&zone)
    }

    /// The perceiver entered `zone`. Unregistered zones are ignored.
    pub fn entered(&mut self, zone: ZoneId) -> bool {
        if !self.is_registered(zone) {
            return false;
        }
        self.occupied.insert(zone);
        self.stack.push(zone);
        log::trace!("Listening zone {} entered, stack depth {}", zone, self.stack.len());
        true
    }

    /// The perceiver left `zone`.
    ///
    /// Occupancy always clears, but the stack only pops when `zone` is on
    /// top. Returns whether the stack changed.
    pub fn exited(&mut self, zone: ZoneId) -> bool {
        self.occupied.remove(&zone);
        let popped = self.stack.pop_if_top(zone);
        if !popped && self.stack.contains(zone) {
            log::trace!("Ignoring stale exit from {}, top is {:?}", zone, self.stack.top());
        }
        popped
    }

    pub fn top(&self) -> Option<ZoneId> {
        self.stack.top()
    }

    /// Whether sounds arriving through `zone` should reach the monster
    pub fn is_active(&self, zone: ZoneId) -> bool {
        self.stack.is_top(zone)
    }

    pub fn is_occupied(&self, zone: ZoneId) -> bool {
        self.occupied.contains(&zone)
    }

    pub fn stack(&self) -> &ZoneStack {
        &self.stack
    }

    /// Run `sound` through every occupied zone's filter, bottom of the stack
    /// first. Zones that do not hear it are left out.
    pub fn deliver(&self, sound: &Sound) -> Vec<(ZoneId, Sound)> {
        let mut seen = Vec::new();
        let mut heard = Vec::new();
        for zone in self.stack.iter() {
            if seen.contains(&zone) || !self.occupied.contains(&zone) {
                continue;
            }
            seen.push(zone);
            let adjusted = self
                .filters
                .get(&zone)
                .and_then(|filter| filter.adjust(sound.level()));
            if let Some(level) = adjusted {
                heard.push((zone, sound.with_level(level)));
            }
        }
        heard
    }
}
