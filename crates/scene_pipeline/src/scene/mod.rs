//! Scene state and the per-frame transform operation
//!
//! A [`Scene`] owns the camera/perspective/viewport configuration, the node
//! graph, camera hooks, and triggers. One call to [`Scene::model_view`] per
//! animation frame resolves the camera, walks the graph through the
//! transform engine, and then runs the trigger engine. The frame's outputs —
//! render list, light list, and id lookup — are kept on the scene until the
//! next call rebuilds them.

pub mod camera;
pub mod entity;
pub mod graph;
pub mod light;
pub mod node;
pub mod pipeline;
pub mod sort;

pub use camera::{CameraConfig, PerspectiveConfig, Viewport};
pub use entity::{DrawMode, Edge, Entity, Polygon, ShadeMode, SortMode, Style};
pub use graph::{NodeKey, SceneGraph};
pub use light::{Light, LightType};
pub use node::{BeforeSceneHook, NodeCommon, NodeKind, SceneHook, SceneNode};
pub use pipeline::{FrameArtifacts, FrameContext};

use crate::config::SceneConfig;
use crate::foundation::math::Vec4;
use crate::foundation::time::FrameClock;

/// Hook run once per frame before the view matrix is built.
///
/// Receives the frame's camera position, look-at target, and up vector
/// (homogeneous, w = 0) by mutable reference, plus the elapsed seconds —
/// mutating them in place steers the camera (e.g. orbiting the position
/// around an axis).
pub type CameraHook = Box<dyn FnMut(&mut Vec4, &mut Vec4, &mut Vec4, f32)>;

/// Per-frame callback processed after the traversal.
///
/// Receives the scene (triggers may mutate the graph live) and the frame's
/// camera vectors. Returning `true` means finished: the trigger is removed
/// from the list. Returning `false` keeps it for the next frame.
pub type Trigger = Box<dyn FnMut(&mut Scene, &TriggerContext) -> bool>;

/// Frame state passed to each trigger by value
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext {
    /// Resolved camera position (after camera hooks)
    pub position: Vec4,
    /// Resolved look-at target
    pub look_at: Vec4,
    /// Resolved up vector
    pub up: Vec4,
    /// Seconds elapsed since the previous frame
    pub time: f32,
}

/// A scene: configuration, graph, callbacks, and the last frame's outputs
pub struct Scene {
    /// Camera placement, mutable between frames
    pub camera: CameraConfig,
    /// Perspective projection parameters
    pub perspective: PerspectiveConfig,
    /// Output viewport rectangle
    pub viewport: Viewport,
    /// The scene graph
    pub graph: SceneGraph,

    on_camera: Vec<CameraHook>,
    triggers: Vec<Trigger>,
    clock: FrameClock,
    artifacts: FrameArtifacts,
    camera_position: Vec4,
    perspective_scale: f32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a scene from a complete configuration
    pub fn with_config(config: SceneConfig) -> Self {
        let camera_position = config.camera.position.push(0.0);
        let perspective_scale = config.perspective.perspective_scale();
        log::debug!(
            "scene created: fov={} viewport={}x{}",
            config.perspective.fov,
            config.viewport.width,
            config.viewport.height
        );
        Self {
            camera: config.camera,
            perspective: config.perspective,
            viewport: config.viewport,
            graph: SceneGraph::new(),
            on_camera: Vec::new(),
            triggers: Vec::new(),
            clock: FrameClock::new(),
            artifacts: FrameArtifacts::default(),
            camera_position,
            perspective_scale,
        }
    }

    /// Register a camera hook, appended after any existing hooks
    pub fn on_camera(&mut self, hook: CameraHook) {
        self.on_camera.push(hook);
    }

    /// Append a trigger. Triggers added during trigger processing are first
    /// invoked on the following frame.
    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Number of registered triggers
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Compute one frame.
    ///
    /// Resolves the camera (hooks, then look-at and projection matrices),
    /// traverses the graph building the render list, light list, and id
    /// lookup, and finally processes the trigger list. Elapsed time comes
    /// from an internal monotonic clock advanced by this call.
    pub fn model_view(&mut self) {
        let time = self.clock.tick();

        let (mut position, mut look_at, mut up) = self.camera.frame_vectors();
        let mut hooks = std::mem::take(&mut self.on_camera);
        for hook in &mut hooks {
            hook(&mut position, &mut look_at, &mut up, time);
        }
        let added = std::mem::replace(&mut self.on_camera, hooks);
        self.on_camera.extend(added);

        let ctx = FrameContext {
            time,
            view: CameraConfig::view_matrix(&position, &look_at, &up),
            projection: self.perspective.projection_matrix(),
            viewport: self.viewport,
            perspective_scale: self.perspective.perspective_scale(),
        };
        self.camera_position = position;
        self.perspective_scale = ctx.perspective_scale;

        let mut artifacts = FrameArtifacts::default();
        let roots = self.graph.roots().to_vec();
        pipeline::process_nodes(&mut self.graph, &roots, None, &ctx, &mut artifacts);
        log::trace!(
            "frame: {} renderables, {} lights, {} ids, dt={:.4}s",
            artifacts.render_list.len(),
            artifacts.lights.len(),
            artifacts.nodes_by_id.len(),
            time
        );
        self.artifacts = artifacts;

        self.run_triggers(TriggerContext {
            position,
            look_at,
            up,
            time,
        });
    }

    /// Process the trigger list once. The live list is left empty while the
    /// pending triggers run, so a trigger adding new triggers puts them in a
    /// fresh list that is appended afterwards — additions never run in the
    /// frame that created them, and a trigger removes itself by returning
    /// `true`.
    fn run_triggers(&mut self, ctx: TriggerContext) {
        let pending = std::mem::take(&mut self.triggers);
        let mut kept: Vec<Trigger> = Vec::with_capacity(pending.len());
        for mut trigger in pending {
            if !trigger(self, &ctx) {
                kept.push(trigger);
            }
        }
        let added = std::mem::take(&mut self.triggers);
        kept.extend(added);
        self.triggers = kept;
    }

    /// Keys of the entities that survived clipping this frame, in traversal
    /// order
    pub fn render_keys(&self) -> &[NodeKey] {
        &self.artifacts.render_list
    }

    /// The render list as entities, in traversal order
    pub fn render_entities(&self) -> impl Iterator<Item = &Entity> {
        self.artifacts
            .render_list
            .iter()
            .filter_map(|&key| self.graph.entity(key))
    }

    /// Keys of every enabled light visited this frame
    pub fn light_keys(&self) -> &[NodeKey] {
        &self.artifacts.lights
    }

    /// The light list, in traversal order
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.artifacts
            .lights
            .iter()
            .filter_map(|&key| self.graph.light(key))
    }

    /// Look up a node visited this frame by identifier
    pub fn find_node(&self, id: &str) -> Option<&SceneNode> {
        self.find_node_key(id).and_then(|key| self.graph.get(key))
    }

    /// Key of a node visited this frame, by identifier
    pub fn find_node_key(&self, id: &str) -> Option<NodeKey> {
        self.artifacts.nodes_by_id.get(id).copied()
    }

    /// Look up an entity visited this frame by identifier
    pub fn find_entity(&self, id: &str) -> Option<&Entity> {
        self.find_node(id).and_then(SceneNode::as_entity)
    }

    /// Camera position resolved by the last frame (after camera hooks)
    pub fn camera_position(&self) -> Vec4 {
        self.camera_position
    }

    /// Point-sprite clip tolerance scale from the last frame
    pub fn perspective_scale(&self) -> f32 {
        self.perspective_scale
    }
}

#[cfg(test)]
mod tests;
