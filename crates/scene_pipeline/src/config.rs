//! Scene configuration
//!
//! Fully-defaulted configuration structs plus partial "patch" overlays.
//! A scene is always constructed from a complete [`SceneConfig`]; callers
//! supply a [`ScenePatch`] with only the fields they care about and merge it
//! over the defaults. Patches can also be loaded from TOML or RON files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::foundation::math::Vec3;
use crate::scene::camera::{CameraConfig, PerspectiveConfig, Viewport};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

fn parse_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Complete scene configuration with every field populated
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Camera placement and orientation
    #[serde(default)]
    pub camera: CameraConfig,

    /// Perspective projection parameters
    #[serde(default)]
    pub perspective: PerspectiveConfig,

    /// Output viewport rectangle in pixels
    #[serde(default)]
    pub viewport: Viewport,
}

impl SceneConfig {
    /// Overlay a patch onto this configuration, consuming self
    pub fn merged(mut self, patch: &ScenePatch) -> Self {
        patch.apply_to(&mut self);
        self
    }

    /// Load a complete configuration from a `.toml` or `.ron` file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        parse_file(path.as_ref())
    }
}

/// Partial camera override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraPatch {
    /// Override for the camera up vector
    pub up: Option<Vec3>,
    /// Override for the look-at target
    pub look_at: Option<Vec3>,
    /// Override for the camera position
    pub position: Option<Vec3>,
}

impl CameraPatch {
    /// Overlay the present fields onto a camera configuration
    pub fn apply_to(&self, config: &mut CameraConfig) {
        if let Some(up) = self.up {
            config.up = up;
        }
        if let Some(look_at) = self.look_at {
            config.look_at = look_at;
        }
        if let Some(position) = self.position {
            config.position = position;
        }
    }
}

/// Partial perspective override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerspectivePatch {
    /// Override for the field of view in degrees
    pub fov: Option<f32>,
    /// Override for the aspect ratio
    pub aspect: Option<f32>,
    /// Override for the near clip distance
    pub near: Option<f32>,
    /// Override for the far clip distance
    pub far: Option<f32>,
}

impl PerspectivePatch {
    /// Overlay the present fields onto a perspective configuration
    pub fn apply_to(&self, config: &mut PerspectiveConfig) {
        if let Some(fov) = self.fov {
            config.fov = fov;
        }
        if let Some(aspect) = self.aspect {
            config.aspect = aspect;
        }
        if let Some(near) = self.near {
            config.near = near;
        }
        if let Some(far) = self.far {
            config.far = far;
        }
    }
}

/// Partial viewport override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewportPatch {
    /// Override for the viewport origin x
    pub x: Option<f32>,
    /// Override for the viewport origin y
    pub y: Option<f32>,
    /// Override for the viewport width
    pub width: Option<f32>,
    /// Override for the viewport height
    pub height: Option<f32>,
}

impl ViewportPatch {
    /// Overlay the present fields onto a viewport
    pub fn apply_to(&self, viewport: &mut Viewport) {
        if let Some(x) = self.x {
            viewport.x = x;
        }
        if let Some(y) = self.y {
            viewport.y = y;
        }
        if let Some(width) = self.width {
            viewport.width = width;
        }
        if let Some(height) = self.height {
            viewport.height = height;
        }
    }
}

/// Partial scene configuration, merged over [`SceneConfig::default`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenePatch {
    /// Camera overrides
    #[serde(default)]
    pub camera: Option<CameraPatch>,
    /// Perspective overrides
    #[serde(default)]
    pub perspective: Option<PerspectivePatch>,
    /// Viewport overrides
    #[serde(default)]
    pub viewport: Option<ViewportPatch>,
}

impl ScenePatch {
    /// Overlay the present sections onto a complete configuration
    pub fn apply_to(&self, config: &mut SceneConfig) {
        if let Some(camera) = &self.camera {
            camera.apply_to(&mut config.camera);
        }
        if let Some(perspective) = &self.perspective {
            perspective.apply_to(&mut config.perspective);
        }
        if let Some(viewport) = &self.viewport {
            viewport.apply_to(&mut config.viewport);
        }
    }

    /// Load a patch from a `.toml` or `.ron` file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        parse_file(path.as_ref())
    }
}
