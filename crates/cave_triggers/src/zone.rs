//! Trigger zone component

use crate::events::ZoneEvent;
use crate::volume::TriggerVolume;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a listening zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u64);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// A zone volume and the entities currently inside it
#[derive(Debug, Clone)]
pub struct TriggerZone {
    /// Zone volume shape
    pub volume: TriggerVolume,
    /// Whether the zone is enabled
    pub enabled: bool,
    /// Currently overlapping entities and how long they have been inside
    occupants: HashMap<u64, f32>,
    /// Total enter events produced
    pub activation_count: u32,
}

impl TriggerZone {
    /// Create a new zone
    pub fn new(volume: TriggerVolume) -> Self {
        Self {
            volume,
            enabled: true,
            occupants: HashMap::new(),
            activation_count: 0,
        }
    }

    /// Check if an entity is currently inside this zone
    pub fn is_inside(&self, entity: u64) -> bool {
        self.occupants.contains_key(&entity)
    }

    /// Get all entities currently inside
    pub fn occupants(&self) -> impl Iterator<Item = u64> + '_ {
        self.occupants.keys().copied()
    }

    /// Get the time an entity has been inside
    pub fn time_inside(&self, entity: u64) -> Option<f32> {
        self.occupants.get(&entity).copied()
    }

    /// Enable the zone
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable the zone, evicting everyone inside
    pub fn disable(&mut self, zone: ZoneId) -> Vec<ZoneEvent> {
        self.enabled = false;
        self.evict_all(zone)
    }

    /// Produce exit events for every occupant and forget them
    pub fn evict_all(&mut self, zone: ZoneId) -> Vec<ZoneEvent> {
        let mut events: Vec<_> = self
            .occupants
            .drain()
            .map(|(entity, time)| ZoneEvent::exit(zone, entity, time))
            .collect();
        events.sort_by_key(|e| e.entity);
        events
    }

    /// Process an entity's overlap state, returning the resulting event if it changed
    pub fn process_overlap(&mut self, zone: ZoneId, entity: u64, is_overlapping: bool) -> Option<ZoneEvent> {
        if !self.enabled {
            return None;
        }

        let was_overlapping = self.occupants.contains_key(&entity);

        if is_overlapping && !was_overlapping {
            self.occupants.insert(entity, 0.0);
            self.activation_count += 1;
            Some(ZoneEvent::enter(zone, entity))
        } else if !is_overlapping && was_overlapping {
            let time_inside = self.occupants.remove(&entity).unwrap_or_default();
            Some(ZoneEvent::exit(zone, entity, time_inside))
        } else {
            None
        }
    }

    /// Advance occupancy timers
    pub fn tick(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        for time in self.occupants.values_mut() {
            *time += delta_time;
        }
    }
}

impl Default for TriggerZone {
    fn default() -> Self {
        Self::new(TriggerVolume::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_overlap() {
        let mut zone = TriggerZone::new(TriggerVolume::sphere(1.0));

        let enter = zone.process_overlap(ZoneId(1), 2, true);
        assert!(enter.is_some_and(|e| e.is_enter()));
        assert!(zone.is_inside(2));

        // Still inside, nothing new
        assert!(zone.process_overlap(ZoneId(1), 2, true).is_none());

        zone.tick(0.5);
        let exit = zone.process_overlap(ZoneId(1), 2, false);
        assert_eq!(exit, Some(ZoneEvent::exit(ZoneId(1), 2, 0.5)));
        assert!(!zone.is_inside(2));
        assert_eq!(zone.activation_count, 1);
    }

    #[test]
    fn test_disabled_zone_ignores_overlap() {
        let mut zone = TriggerZone::new(TriggerVolume::sphere(1.0));
        zone.process_overlap(ZoneId(1), 2, true);

        let evicted = zone.disable(ZoneId(1));
        assert_eq!(evicted.len(), 1);
        assert!(evicted[0].is_exit());

        assert!(zone.process_overlap(ZoneId(1), 3, true).is_none());
        assert!(!zone.is_inside(3));
    }
}
