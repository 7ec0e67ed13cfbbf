//! # Scene Pipeline
//!
//! The per-frame transform stage of a software 3D renderer: given a
//! hierarchical scene graph of entities and lights, a camera, and a
//! perspective configuration, each frame it produces a flattened,
//! depth-sorted, frustum-clipped, screen-space render list plus a light list
//! and an id-indexed node lookup.
//!
//! Rasterization, input handling, and asset loading are external
//! collaborators: they feed typed nodes in and consume the frame artifacts.
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_pipeline::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene
//!     .graph
//!     .insert_root(SceneNode::entity(Entity::cube(1.0)).with_id("cube"));
//!
//! // once per animation frame:
//! scene.model_view();
//!
//! for entity in scene.render_entities() {
//!     // hand entity.coords() and the sorted topology to a rasterizer
//!     let _ = entity.average_z();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod scene;

pub use config::{ConfigError, SceneConfig, ScenePatch};
pub use scene::{Scene, Trigger, TriggerContext};

/// Common imports for pipeline users
pub mod prelude {
    pub use crate::config::{
        CameraPatch, ConfigError, PerspectivePatch, SceneConfig, ScenePatch, ViewportPatch,
    };
    pub use crate::foundation::{
        math::{Mat4, Mat4Ext, Vec3, Vec4},
        time::FrameClock,
    };
    pub use crate::scene::{
        CameraConfig, CameraHook, DrawMode, Edge, Entity, FrameContext, Light, LightType, NodeKey,
        NodeKind, PerspectiveConfig, Polygon, Scene, SceneGraph, SceneNode, ShadeMode, SortMode,
        Style, Trigger, TriggerContext, Viewport,
    };
}
