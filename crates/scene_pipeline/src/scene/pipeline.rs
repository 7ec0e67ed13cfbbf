//! Graph traversal and transform engine
//!
//! The per-frame heart of the pipeline: a depth-first, pre-order walk over
//! the scene graph that composes parent/local matrices, pushes every
//! entity's points through world, camera, and clip space, applies the
//! epsilon-guarded perspective divide and viewport mapping, culls fully
//! clipped entities, and runs the geometry sort and lighting normal stages
//! on each survivor.

use std::collections::HashMap;

use crate::foundation::math::{Mat4, Vec4, EPSILON};
use crate::scene::camera::Viewport;
use crate::scene::entity::{DrawMode, Entity, ShadeMode, SortMode};
use crate::scene::graph::{NodeKey, SceneGraph};
use crate::scene::node::NodeKind;
use crate::scene::sort;

/// Read-only frame state handed to node hooks.
///
/// Rust cannot hand hooks the whole scene while the graph is being walked,
/// so hooks get this frame-scoped view instead: the resolved matrices,
/// viewport, point-sprite scale, and the elapsed time driving animation.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Seconds elapsed since the previous frame
    pub time: f32,
    /// View (look-at) matrix for this frame
    pub view: Mat4,
    /// Projection matrix for this frame
    pub projection: Mat4,
    /// Output viewport
    pub viewport: Viewport,
    /// Point-sprite clip tolerance scale, `(256 - fov) / 16`
    pub perspective_scale: f32,
}

/// Flattened artifacts of one traversal, rebuilt every frame
#[derive(Debug, Default)]
pub struct FrameArtifacts {
    /// Keys of entities that survived clipping, in traversal order
    pub render_list: Vec<NodeKey>,
    /// Keys of every enabled light encountered
    pub lights: Vec<NodeKey>,
    /// Identifier lookup over every visited node that declares an id.
    /// Later-visited nodes win on duplicate identifiers.
    pub nodes_by_id: HashMap<String, NodeKey>,
}

/// Recursively process `keys` with `parent` as the inherited matrix,
/// appending to `out`.
pub(crate) fn process_nodes(
    graph: &mut SceneGraph,
    keys: &[NodeKey],
    parent: Option<Mat4>,
    ctx: &FrameContext,
    out: &mut FrameArtifacts,
) {
    for &key in keys {
        let Some(node) = graph.get_mut(key) else {
            // stale key left behind by live graph edits
            continue;
        };
        if node.common.disabled {
            continue;
        }

        if let Some(id) = &node.common.id {
            out.nodes_by_id.insert(id.clone(), key);
        }

        // before-scene hooks may reshape the node ahead of matrix composition.
        // The hook list is taken out for the calls; hooks registered during
        // invocation are appended back afterwards.
        let mut hooks = std::mem::take(&mut node.common.on_before_scene);
        for hook in &mut hooks {
            hook(node, ctx);
        }
        let added = std::mem::replace(&mut node.common.on_before_scene, hooks);
        node.common.on_before_scene.extend(added);

        // compose the effective matrix; the operand order (local * parent)
        // matches the rest of this pipeline's conventions
        let mut composed = match (parent, node.common.matrix) {
            (Some(parent), Some(local)) => Some(local * parent),
            (Some(parent), None) => Some(parent),
            (None, local) => local,
        };

        let mut hooks = std::mem::take(&mut node.common.on_scene);
        for hook in &mut hooks {
            hook(node, composed.as_mut(), ctx);
        }
        let added = std::mem::replace(&mut node.common.on_scene, hooks);
        node.common.on_scene.extend(added);

        match &mut node.kind {
            NodeKind::Light(light) => {
                light.refresh_world(composed.as_ref());
                out.lights.push(key);
            }
            NodeKind::Entity(entity) => {
                if transform_entity(entity, composed.as_ref(), ctx) {
                    sort_geometry(entity);
                    if entity.style.draw_mode == DrawMode::Solid
                        && entity.style.shade_mode == ShadeMode::Lightsource
                        && !entity.polygons.is_empty()
                    {
                        transform_polygon_normals(entity, composed.as_ref());
                    }
                    out.render_list.push(key);
                }
                // a fully clipped entity still passes its matrix down
            }
            NodeKind::Group => {}
        }

        let children = node.common.children.clone();
        if !children.is_empty() {
            process_nodes(graph, &children, composed, ctx, out);
        }
    }
}

/// Run the vertex pipeline for one entity. Returns whether any vertex
/// survived the frustum test (an entity with no points never survives).
fn transform_entity(entity: &mut Entity, local: Option<&Mat4>, ctx: &FrameContext) -> bool {
    let count = entity.points.len();
    entity.init_coordinate_buffers();

    // large sprite points get extra clip tolerance so they are not culled
    // while still partially on screen
    let clip_offset = if entity.style.draw_mode == DrawMode::Point {
        if entity.style.line_scale == 0.0 {
            entity.style.line_width * 0.5
        } else {
            (entity.style.line_width * entity.style.line_scale) / ctx.perspective_scale * 0.5
        }
    } else {
        0.0
    };

    let half_width = ctx.viewport.width * 0.5;
    let half_height = ctx.viewport.height * 0.5;
    let mut clipped = 0usize;
    let mut depth_sum = 0.0f32;

    for v in 0..count {
        let point = entity.points[v];
        let mut world = Vec4::new(point.x, point.y, point.z, 1.0);
        if let Some(matrix) = local {
            world = matrix * world;
        }
        entity.world_coords[v] = world;

        let camera = ctx.view * world;
        entity.camera_coords[v] = camera;

        let mut clip = ctx.projection * camera;

        // stop divide by zero for points exactly on the camera plane
        let mut w = clip.w;
        if w == 0.0 {
            w = EPSILON;
        }

        let outside = clip.x > w + clip_offset
            || clip.x < -(w + clip_offset)
            || clip.y > w + clip_offset
            || clip.y < -(w + clip_offset)
            || clip.z > w
            || clip.z < -w;
        entity.clip_flags[v] = outside;
        clipped += usize::from(outside);

        // perspective division on x/y only; z stays undivided and feeds the
        // coarse depth sort
        clip.x /= w;
        clip.y /= w;
        clip.x = half_width * clip.x + ctx.viewport.x + half_width;
        clip.y = half_height * clip.y + ctx.viewport.y + half_height;
        entity.coords[v] = clip;

        depth_sum += clip.z;
    }

    entity.average_z = if count > 1 {
        depth_sum / count as f32
    } else {
        depth_sum
    };

    clipped != count
}

/// Geometry sort stage: resolve the sort mode against the draw and shade
/// modes, then order the matching primitive list back to front.
fn sort_geometry(entity: &mut Entity) {
    let style = entity.style;
    let needs_sort = match style.sort_mode {
        SortMode::Sorted => true,
        SortMode::Automatic => {
            // solid faces always need ordering; wireframe and point clouds
            // only when lit, since plain draw order has no visible effect
            style.draw_mode == DrawMode::Solid || style.shade_mode == ShadeMode::Lightsource
        }
        SortMode::None => false,
    };
    if !needs_sort {
        return;
    }
    match style.draw_mode {
        DrawMode::Solid => sort::sort_polygons(&mut entity.polygons, &entity.camera_coords),
        DrawMode::Wireframe => sort::sort_edges(&mut entity.edges, &entity.camera_coords),
        DrawMode::Point => sort::sort_points(
            &mut entity.point_order,
            &entity.coords,
            &entity.world_coords,
        ),
    }
}

/// Lighting normal stage: transform each polygon's local normal into world
/// space with the inverse-transpose of the composed matrix (correct under
/// non-uniform scale) and renormalize.
fn transform_polygon_normals(entity: &mut Entity, local: Option<&Mat4>) {
    let base = local.copied().unwrap_or_else(Mat4::identity);
    let normal_matrix = base
        .try_inverse()
        .unwrap_or_else(Mat4::identity)
        .transpose();
    for polygon in &mut entity.polygons {
        // directional semantics: the 3x3 part only, no translation
        polygon.world_normal = normal_matrix.transform_vector(&polygon.normal).normalize();
    }
}
