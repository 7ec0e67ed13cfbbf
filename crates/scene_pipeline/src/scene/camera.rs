//! Camera, projection, and viewport state
//!
//! Holds the always-populated camera/perspective/viewport records owned by a
//! scene, and builds the per-frame view and projection matrices from them.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};

/// Camera placement: position, look-at target, and up vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Up vector
    #[serde(default = "default_up")]
    pub up: Vec3,

    /// Look-at target in world space
    #[serde(default)]
    pub look_at: Vec3,

    /// Camera position in world space
    #[serde(default = "default_position")]
    pub position: Vec3,
}

fn default_up() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

fn default_position() -> Vec3 {
    Vec3::new(0.0, 0.0, -10.0)
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            up: default_up(),
            look_at: Vec3::zeros(),
            position: default_position(),
        }
    }
}

impl CameraConfig {
    /// Homogeneous (w = 0) copies of position, look-at, and up, in that
    /// order. These are what camera hooks receive and mutate each frame
    /// before the view matrix is built.
    pub fn frame_vectors(&self) -> (Vec4, Vec4, Vec4) {
        (
            self.position.push(0.0),
            self.look_at.push(0.0),
            self.up.push(0.0),
        )
    }

    /// Build the right-handed look-at view matrix from (possibly
    /// hook-mutated) frame vectors.
    pub fn view_matrix(position: &Vec4, look_at: &Vec4, up: &Vec4) -> Mat4 {
        Mat4::look_at(position.xyz(), look_at.xyz(), up.xyz())
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov: f32,

    /// Aspect ratio (width / height)
    #[serde(default = "default_aspect")]
    pub aspect: f32,

    /// Near clip plane distance
    #[serde(default = "default_near")]
    pub near: f32,

    /// Far clip plane distance
    #[serde(default = "default_far")]
    pub far: f32,
}

fn default_fov() -> f32 {
    35.0
}

fn default_aspect() -> f32 {
    1.0
}

fn default_near() -> f32 {
    1.0
}

fn default_far() -> f32 {
    10000.0
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            aspect: default_aspect(),
            near: default_near(),
            far: default_far(),
        }
    }
}

impl PerspectiveConfig {
    /// Build the projection matrix.
    ///
    /// The field of view is negated before the degree-to-radian conversion.
    /// The flip is a required convention for this coordinate system, not a
    /// bug; changing it mirrors every rendered scene.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(-utils::deg_to_rad(self.fov), self.aspect, self.near, self.far)
    }

    /// Scaling factor applied to point-sprite clip tolerance to account for
    /// the field of view.
    pub fn perspective_scale(&self) -> f32 {
        (256.0 - self.fov) / 16.0
    }
}

/// Output viewport rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Origin x in pixels
    #[serde(default)]
    pub x: f32,

    /// Origin y in pixels
    #[serde(default)]
    pub y: f32,

    /// Width in pixels
    #[serde(default = "default_extent")]
    pub width: f32,

    /// Height in pixels
    #[serde(default = "default_extent")]
    pub height: f32,
}

fn default_extent() -> f32 {
    1024.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: default_extent(),
            height: default_extent(),
        }
    }
}
