//! Grid navigation agent

use super::{NavMesh, NavPath, PathingAgent};
use cave_math::Vec3;
use serde::{Deserialize, Serialize};

/// Moves along paths on a [`NavMesh`].
///
/// A destination request only marks the path pending. The path is resolved
/// on the next [`NavAgent::advance`], which keeps the same "ask now, path
/// later" timing a real navigation backend has.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavAgent {
    position: Vec3,
    speed: f32,
    destination: Option<Vec3>,
    path: Option<NavPath>,
    pending: bool,
}

impl NavAgent {
    /// Create a new navigation agent
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            speed,
            ..Default::default()
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn path(&self) -> Option<&NavPath> {
        self.path.as_ref()
    }

    pub fn is_moving(&self) -> bool {
        self.path.as_ref().is_some_and(|path| !path.is_complete())
    }

    /// Resolve any pending path, then walk `speed * dt` along it
    pub fn advance(&mut self, mesh: &NavMesh, dt: f32) {
        if self.pending {
            self.pending = false;
            if let Some(destination) = self.destination {
                self.path = mesh.find_path(self.position, destination);
                if self.path.is_none() {
                    log::debug!("No path from {} to {}", self.position, destination);
                    self.destination = None;
                }
            }
        }

        let Some(path) = self.path.as_mut() else {
            return;
        };

        let mut budget = self.speed * dt;
        while budget > 0.0 {
            let Some(waypoint) = path.current_waypoint() else {
                break;
            };
            let distance = self.position.distance(waypoint);
            if distance <= budget {
                self.position = waypoint;
                budget -= distance;
                path.advance();
            } else {
                self.position = self.position.move_towards(waypoint, budget);
                budget = 0.0;
            }
        }
    }
}

impl PathingAgent for NavAgent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
        self.path = None;
        self.pending = true;
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.path = None;
        self.pending = false;
    }

    fn remaining_distance(&self) -> f32 {
        match &self.path {
            Some(path) => path.remaining_distance_from(self.position),
            None => 0.0,
        }
    }

    fn path_pending(&self) -> bool {
        self.pending
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn warp(&mut self, point: Vec3) {
        self.reset_path();
        self.position = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::has_arrived;
    use approx::assert_relative_eq;

    #[test]
    fn test_destination_is_pending_until_advance() {
        let mesh = NavMesh::create_grid(20.0, 20.0, 5.0);
        let mut agent = NavAgent::new(Vec3::new(1.0, 0.0, 1.0), 2.0);

        agent.set_destination(Vec3::new(9.0, 0.0, 1.0));
        assert!(agent.path_pending());
        assert!(!has_arrived(&agent));

        agent.advance(&mesh, 0.5);
        assert!(!agent.path_pending());
        assert!(agent.is_moving());
        assert_relative_eq!(agent.position().x, 2.0);
        assert_relative_eq!(agent.remaining_distance(), 7.0, epsilon = 1e-4);
    }

    #[test]
    fn test_walks_to_arrival() {
        let mesh = NavMesh::create_grid(20.0, 20.0, 5.0);
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 5.0);
        let goal = Vec3::new(17.5, 0.0, 12.5);
        agent.set_destination(goal);

        for _ in 0..100 {
            agent.advance(&mesh, 0.1);
            if has_arrived(&agent) {
                break;
            }
        }

        assert!(has_arrived(&agent));
        assert!(agent.position().distance(goal) < 1e-3);
    }

    #[test]
    fn test_unreachable_destination_clears() {
        let mut mesh = NavMesh::create_grid(15.0, 5.0, 5.0);
        mesh.set_walkable(1, false);
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 5.0);

        agent.set_destination(Vec3::new(12.5, 0.0, 2.5));
        agent.advance(&mesh, 0.1);

        assert!(agent.destination().is_none());
        assert!(has_arrived(&agent));
        assert_eq!(agent.position(), Vec3::new(2.5, 0.0, 2.5));
    }

    #[test]
    fn test_warp_drops_path() {
        let mesh = NavMesh::create_grid(20.0, 20.0, 5.0);
        let mut agent = NavAgent::new(Vec3::new(2.5, 0.0, 2.5), 5.0);
        agent.set_destination(Vec3::new(17.5, 0.0, 2.5));
        agent.advance(&mesh, 0.1);

        agent.warp(Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(agent.position(), Vec3::new(10.0, 0.0, 10.0));
        assert!(agent.path().is_none());
        assert!(!agent.path_pending());
    }
}
