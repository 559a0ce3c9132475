//! Zone occupancy events

use crate::zone::ZoneId;
use serde::{Deserialize, Serialize};

/// Type of zone event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneEventKind {
    /// Entity entered the zone volume
    Enter,
    /// Entity exited the zone volume
    Exit,
}

/// A zone occupancy event
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneEvent {
    /// Type of event
    pub kind: ZoneEventKind,
    /// The zone whose occupancy changed
    pub zone: ZoneId,
    /// The entity that entered or left
    pub entity: u64,
    /// Time the entity spent inside (zero for Enter)
    pub time_inside: f32,
}

impl ZoneEvent {
    /// Create an enter event
    pub fn enter(zone: ZoneId, entity: u64) -> Self {
        Self {
            kind: ZoneEventKind::Enter,
            zone,
            entity,
            time_inside: 0.0,
        }
    }

    /// Create an exit event
    pub fn exit(zone: ZoneId, entity: u64, time_spent: f32) -> Self {
        Self {
            kind: ZoneEventKind::Exit,
            zone,
            entity,
            time_inside: time_spent,
        }
    }

    /// Check if this is an enter event
    pub fn is_enter(&self) -> bool {
        self.kind == ZoneEventKind::Enter
    }

    /// Check if this is an exit event
    pub fn is_exit(&self) -> bool {
        self.kind == ZoneEventKind::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let enter = ZoneEvent::enter(ZoneId(1), 2);
        assert!(enter.is_enter());
        assert_eq!(enter.zone, ZoneId(1));
        assert_eq!(enter.entity, 2);

        let exit = ZoneEvent::exit(ZoneId(1), 2, 3.5);
        assert!(exit.is_exit());
        assert_eq!(exit.time_inside, 3.5);
    }
}
