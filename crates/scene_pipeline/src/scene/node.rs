//! Scene graph node model
//!
//! Nodes are a closed sum over the kinds the pipeline understands — plain
//! groups, renderable entities, and lights — with the shared structural
//! fields (identifier, disabled flag, local matrix, hooks, children) kept in
//! a common record embedded in every node.

use std::fmt;

use crate::foundation::math::Mat4;
use crate::scene::entity::Entity;
use crate::scene::graph::NodeKey;
use crate::scene::light::Light;
use crate::scene::pipeline::FrameContext;

/// Hook invoked before a node's matrix is composed.
///
/// May mutate the node (including its local matrix) ahead of the transform;
/// receives the read-only frame context for elapsed time and camera state.
pub type BeforeSceneHook = Box<dyn FnMut(&mut SceneNode, &FrameContext)>;

/// Hook invoked after a node's effective matrix has been composed, with
/// mutable access to that matrix (`None` when node and ancestors carry no
/// transform). Runs before vertices are processed.
pub type SceneHook = Box<dyn FnMut(&mut SceneNode, Option<&mut Mat4>, &FrameContext)>;

/// Structural fields shared by every node kind
#[derive(Default)]
pub struct NodeCommon {
    /// Optional stable identifier; registered in the per-frame lookup map.
    /// Uniqueness is not enforced: on duplicates the later-visited node wins.
    pub id: Option<String>,

    /// When set, the node and its entire subtree are skipped this frame
    pub disabled: bool,

    /// Optional local transform
    pub matrix: Option<Mat4>,

    /// Hooks run before matrix composition, in registration order
    pub on_before_scene: Vec<BeforeSceneHook>,

    /// Hooks run after matrix composition, in registration order
    pub on_scene: Vec<SceneHook>,

    /// Child nodes, processed with this node's composed matrix as parent
    pub children: Vec<NodeKey>,
}

impl fmt::Debug for NodeCommon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCommon")
            .field("id", &self.id)
            .field("disabled", &self.disabled)
            .field("has_matrix", &self.matrix.is_some())
            .field("before_scene_hooks", &self.on_before_scene.len())
            .field("scene_hooks", &self.on_scene.len())
            .field("children", &self.children)
            .finish()
    }
}

/// Node payload, matched on by the traversal engine
#[derive(Debug)]
pub enum NodeKind {
    /// Structural node: transform and children only
    Group,
    /// Renderable mesh
    Entity(Entity),
    /// Light source
    Light(Light),
}

/// A node in the scene graph
#[derive(Debug)]
pub struct SceneNode {
    /// Shared structural fields
    pub common: NodeCommon,
    /// Kind-specific payload
    pub kind: NodeKind,
}

impl SceneNode {
    /// Create a plain group node
    pub fn group() -> Self {
        Self {
            common: NodeCommon::default(),
            kind: NodeKind::Group,
        }
    }

    /// Create an entity node
    pub fn entity(entity: Entity) -> Self {
        Self {
            common: NodeCommon::default(),
            kind: NodeKind::Entity(entity),
        }
    }

    /// Create a light node
    pub fn light(light: Light) -> Self {
        Self {
            common: NodeCommon::default(),
            kind: NodeKind::Light(light),
        }
    }

    /// Set the node identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.common.id = Some(id.into());
        self
    }

    /// Set the local transform matrix
    pub fn with_matrix(mut self, matrix: Mat4) -> Self {
        self.common.matrix = Some(matrix);
        self
    }

    /// Set the disabled flag
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.common.disabled = disabled;
        self
    }

    /// Register a before-scene hook at construction time
    pub fn with_before_scene(mut self, hook: BeforeSceneHook) -> Self {
        self.common.on_before_scene.push(hook);
        self
    }

    /// Register a post-matrix hook at construction time
    pub fn with_on_scene(mut self, hook: SceneHook) -> Self {
        self.common.on_scene.push(hook);
        self
    }

    /// Append a before-scene hook
    pub fn on_before_scene(&mut self, hook: BeforeSceneHook) {
        self.common.on_before_scene.push(hook);
    }

    /// Append a post-matrix hook
    pub fn on_scene(&mut self, hook: SceneHook) {
        self.common.on_scene.push(hook);
    }

    /// Entity payload, if this node is an entity
    pub fn as_entity(&self) -> Option<&Entity> {
        match &self.kind {
            NodeKind::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Mutable entity payload, if this node is an entity
    pub fn as_entity_mut(&mut self) -> Option<&mut Entity> {
        match &mut self.kind {
            NodeKind::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    /// Light payload, if this node is a light
    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    /// Mutable light payload, if this node is a light
    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}
