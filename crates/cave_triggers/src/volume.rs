//! Trigger volume shapes

use cave_math::Vec3;
use serde::{Deserialize, Serialize};

/// Trigger volume shapes, centered on the zone's position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TriggerVolume {
    /// Axis-aligned box
    Box {
        /// Half-extents (width/2, height/2, depth/2)
        half_extents: Vec3,
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Y-axis cylinder, the usual shape for "hearing range on this floor"
    Cylinder {
        /// Radius
        radius: f32,
        /// Half-height
        half_height: f32,
    },
}

impl TriggerVolume {
    /// Create a box trigger volume
    pub fn box_shape(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: Vec3::new(width / 2.0, height / 2.0, depth / 2.0),
        }
    }

    /// Create a sphere trigger volume
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a cylinder trigger volume (Y-axis aligned)
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::Cylinder {
            radius,
            half_height: height / 2.0,
        }
    }

    /// Check if a point in local space is inside this volume
    pub fn contains_point(&self, point: Vec3) -> bool {
        match self {
            Self::Box { half_extents } => {
                point.x.abs() <= half_extents.x
                    && point.y.abs() <= half_extents.y
                    && point.z.abs() <= half_extents.z
            }
            Self::Sphere { radius } => point.length_squared() <= radius * radius,
            Self::Cylinder {
                radius,
                half_height,
            } => {
                if point.y.abs() > *half_height {
                    return false;
                }
                point.xz().length_squared() <= radius * radius
            }
        }
    }

    /// Check if a world-space point is inside the volume placed at `position`
    pub fn contains_point_at(&self, point: Vec3, position: Vec3) -> bool {
        self.contains_point(point - position)
    }

    /// Radius of the smallest origin-centered sphere enclosing the volume.
    /// Used to order nested zones from outermost to innermost.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Box { half_extents } => half_extents.length(),
            Self::Sphere { radius } => *radius,
            Self::Cylinder {
                radius,
                half_height,
            } => (radius * radius + half_height * half_height).sqrt(),
        }
    }

    /// Get axis-aligned bounding box (min, max) in local space
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        match self {
            Self::Box { half_extents } => (-*half_extents, *half_extents),
            Self::Sphere { radius } => (Vec3::splat(-*radius), Vec3::splat(*radius)),
            Self::Cylinder {
                radius,
                half_height,
            } => (
                Vec3::new(-*radius, -*half_height, -*radius),
                Vec3::new(*radius, *half_height, *radius),
            ),
        }
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::sphere(1.0)
    }
}
