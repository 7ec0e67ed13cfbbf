//! Light nodes
//!
//! Lights participate in graph traversal like any other node: they are
//! collected into the per-frame light list and their world-space placement is
//! refreshed from the composed matrix. Their attributes are consumed opaquely
//! by the shading stage, which lives outside this crate.

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Infinitely distant light with a direction only (like sunlight)
    Distant,
    /// Positioned light with distance attenuation
    Point,
}

/// Light source
#[derive(Debug, Clone)]
pub struct Light {
    /// Light type
    pub light_type: LightType,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
    /// Local-space position (point lights)
    pub position: Vec3,
    /// Local-space direction (distant lights)
    pub direction: Vec3,
    /// Distance attenuation factor (point lights)
    pub attenuation: f32,
    /// World-space position, refreshed during traversal (w = 1)
    pub world_position: Vec4,
    /// World-space unit direction, refreshed during traversal (w = 0)
    pub world_direction: Vec4,
}

impl Light {
    /// Create a distant light
    pub fn distant(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        let unit = direction.normalize();
        Self {
            light_type: LightType::Distant,
            color,
            intensity,
            position: Vec3::zeros(),
            direction: unit,
            attenuation: 0.0,
            world_position: Vec4::new(0.0, 0.0, 0.0, 1.0),
            world_direction: unit.push(0.0),
        }
    }

    /// Create a point light
    pub fn point(position: Vec3, color: Vec3, intensity: f32, attenuation: f32) -> Self {
        Self {
            light_type: LightType::Point,
            color,
            intensity,
            position,
            direction: Vec3::zeros(),
            attenuation,
            world_position: position.push(1.0),
            world_direction: Vec4::zeros(),
        }
    }

    /// Refresh the world-space placement from the node's composed matrix.
    /// With no matrix anywhere up the chain, local space is world space.
    pub(crate) fn refresh_world(&mut self, matrix: Option<&Mat4>) {
        match self.light_type {
            LightType::Point => {
                let local = self.position.push(1.0);
                self.world_position = matrix.map_or(local, |m| m * local);
            }
            LightType::Distant => {
                let direction = matrix
                    .map_or(self.direction, |m| m.transform_vector(&self.direction))
                    .normalize();
                self.world_direction = direction.push(0.0);
            }
        }
    }
}
