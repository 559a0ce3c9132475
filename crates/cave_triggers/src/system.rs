//! Zone system for processing occupancy

use crate::events::{ZoneEvent, ZoneEventKind};
use crate::volume::TriggerVolume;
use crate::zone::{TriggerZone, ZoneId};
use cave_math::Vec3;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// An entity whose position is tested against the zones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedEntity {
    /// Entity ID
    pub id: u64,
    /// World position
    pub position: Vec3,
}

impl TrackedEntity {
    pub fn new(id: u64, position: Vec3) -> Self {
        Self { id, position }
    }
}

/// The zone system that tracks occupancy of every registered zone
#[derive(Debug, Default)]
pub struct ZoneSystem {
    /// Registered zones, iterated in id order
    zones: BTreeMap<ZoneId, TriggerZone>,
    /// Current simulation time
    current_time: f32,
    /// Collected events from last update
    last_events: Vec<ZoneEvent>,
}

impl ZoneSystem {
    /// Create a new zone system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone
    pub fn register_zone(&mut self, id: ZoneId, zone: TriggerZone) {
        if self.zones.insert(id, zone).is_some() {
            log::warn!("Zone {} registered twice, previous occupancy dropped", id);
        }
    }

    /// Unregister a zone, returning exit events for anyone still inside
    pub fn unregister_zone(&mut self, id: ZoneId) -> Vec<ZoneEvent> {
        match self.zones.remove(&id) {
            Some(mut zone) => zone.evict_all(id),
            None => Vec::new(),
        }
    }

    /// Get a zone
    pub fn get_zone(&self, id: ZoneId) -> Option<&TriggerZone> {
        self.zones.get(&id)
    }

    /// Get a mutable zone
    pub fn get_zone_mut(&mut self, id: ZoneId) -> Option<&mut TriggerZone> {
        self.zones.get_mut(&id)
    }

    /// Update the zone system
    ///
    /// # Arguments
    /// * `delta_time` - Time since last update
    /// * `zone_transforms` - World position of each zone to test this frame
    /// * `entities` - Entities that can occupy zones; an occupant missing from
    ///   this list counts as having left
    ///
    /// Exits are reported before enters. Exits go innermost first and enters
    /// outermost first, so crossing several nested boundaries in one frame
    /// leaves the innermost occupied zone on top of a `ZoneStack` fed in order.
    pub fn update(
        &mut self,
        delta_time: f32,
        zone_transforms: &[(ZoneId, Vec3)],
        entities: &[TrackedEntity],
    ) -> &[ZoneEvent] {
        self.current_time += delta_time;
        self.last_events.clear();

        let mut exits: Vec<(f32, ZoneEvent)> = Vec::new();
        let mut enters: Vec<(f32, ZoneEvent)> = Vec::new();

        for &(zone_id, zone_pos) in zone_transforms {
            let Some(zone) = self.zones.get_mut(&zone_id) else {
                continue;
            };
            let radius = zone.volume.bounding_radius();

            zone.tick(delta_time);

            let mut present: HashSet<u64> = HashSet::new();
            for entity in entities {
                present.insert(entity.id);
                let inside = zone.volume.contains_point_at(entity.position, zone_pos);
                if let Some(event) = zone.process_overlap(zone_id, entity.id, inside) {
                    match event.kind {
                        ZoneEventKind::Enter => enters.push((radius, event)),
                        ZoneEventKind::Exit => exits.push((radius, event)),
                    }
                }
            }

            // Occupants that vanished from the entity list have left
            let vanished: Vec<u64> = zone.occupants().filter(|id| !present.contains(id)).collect();
            for entity_id in vanished {
                if let Some(event) = zone.process_overlap(zone_id, entity_id, false) {
                    exits.push((radius, event));
                }
            }
        }

        exits.sort_by(|a, b| cmp_radius(a.0, b.0).then(a.1.zone.cmp(&b.1.zone)));
        enters.sort_by(|a, b| cmp_radius(b.0, a.0).then(a.1.zone.cmp(&b.1.zone)));

        self.last_events
            .extend(exits.into_iter().chain(enters).map(|(_, event)| event));

        for event in &self.last_events {
            log::trace!("{:?} {} by entity {}", event.kind, event.zone, event.entity);
        }

        &self.last_events
    }

    /// Get events from the last update
    pub fn get_events(&self) -> &[ZoneEvent] {
        &self.last_events
    }

    /// Drain events from the last update
    pub fn drain_events(&mut self) -> Vec<ZoneEvent> {
        std::mem::take(&mut self.last_events)
    }

    /// Get all zone IDs
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zones.keys().copied()
    }

    /// Get zone count
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Simulation time accumulated by `update`
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Find all zones containing a point, innermost first
    pub fn query_point(&self, point: Vec3, zone_transforms: &[(ZoneId, Vec3)]) -> Vec<ZoneId> {
        let mut hits: Vec<(f32, ZoneId)> = zone_transforms
            .iter()
            .filter_map(|&(id, pos)| {
                let zone = self.zones.get(&id)?;
                zone.volume
                    .contains_point_at(point, pos)
                    .then(|| (zone.volume.bounding_radius(), id))
            })
            .collect();

        hits.sort_by(|a, b| cmp_radius(a.0, b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, id)| id).collect()
    }

    /// Volume of a registered zone
    pub fn volume(&self, id: ZoneId) -> Option<&TriggerVolume> {
        self.zones.get(&id).map(|zone| &zone.volume)
    }
}

fn cmp_radius(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
