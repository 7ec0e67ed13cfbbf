//! Geometry sort stage
//!
//! Painter's-algorithm ordering for an entity's primitives. All sorts are
//! stable, so primitives with equal depth keys keep their original relative
//! order and repeated sorts of unchanged coordinates are deterministic.

use std::cmp::Ordering;

use crate::foundation::math::Vec4;
use crate::scene::entity::{Edge, Polygon};

fn depth_cmp(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn mean_z(indices: &[usize], coords: &[Vec4]) -> f32 {
    if indices.is_empty() {
        return 0.0;
    }
    let sum: f32 = indices.iter().map(|&v| coords[v].z).sum();
    sum / indices.len() as f32
}

/// Sort polygons farthest-first by mean camera-space depth.
///
/// Camera space looks down -z, so ascending z is back to front: nearer
/// polygons end up later in the list and draw on top.
pub fn sort_polygons(polygons: &mut [Polygon], camera_coords: &[Vec4]) {
    polygons.sort_by(|a, b| {
        depth_cmp(
            mean_z(&a.vertices, camera_coords),
            mean_z(&b.vertices, camera_coords),
        )
    });
}

/// Sort edges farthest-first by mean camera-space depth of their endpoints
pub fn sort_edges(edges: &mut [Edge], camera_coords: &[Vec4]) {
    edges.sort_by(|a, b| {
        depth_cmp(
            (camera_coords[a.a].z + camera_coords[a.b].z) * 0.5,
            (camera_coords[b.a].z + camera_coords[b.b].z) * 0.5,
        )
    });
}

/// Sort the point draw order back to front for sprite compositing.
///
/// Undivided clip-space depth is the primary key (it grows with distance);
/// world-space depth breaks ties, and the stable sort keeps original index
/// order for exact duplicates.
pub fn sort_points(order: &mut [usize], coords: &[Vec4], world_coords: &[Vec4]) {
    order.sort_by(|&a, &b| {
        depth_cmp(coords[b].z, coords[a].z)
            .then_with(|| depth_cmp(world_coords[b].z, world_coords[a].z))
    });
}
