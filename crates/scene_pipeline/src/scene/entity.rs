//! Renderable entities
//!
//! An entity is an ordered set of local-space points plus topology (polygons
//! and/or edges, depending on draw mode), a draw style, and four per-vertex
//! coordinate buffers that the transform engine fills every frame. The
//! buffers are owned by the entity and reused frame to frame; they are only
//! reallocated when the point count changes.

use crate::foundation::math::{Vec3, Vec4};

/// How an entity's geometry is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// Point sprites at each vertex
    Point,
    /// Edges as lines
    Wireframe,
    /// Filled polygons
    Solid,
}

/// How an entity's surface is shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadeMode {
    /// Flat color, no lighting
    Plain,
    /// Shaded against the frame's light list
    Lightsource,
}

/// Whether the geometry sort stage runs for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Sort when the draw or shade mode needs it (solid or lit geometry)
    Automatic,
    /// Always sort
    Sorted,
    /// Never sort
    None,
}

/// Draw style for an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Geometry draw mode
    pub draw_mode: DrawMode,
    /// Shading mode
    pub shade_mode: ShadeMode,
    /// Geometry sort mode
    pub sort_mode: SortMode,
    /// Base surface color
    pub color: Vec3,
    /// Opacity in `[0, 1]`
    pub opacity: f32,
    /// Draw polygons regardless of facing
    pub double_sided: bool,
    /// Line and point-sprite width in pixels
    pub line_width: f32,
    /// Perspective scaling factor for line width; 0 disables scaling
    pub line_scale: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::Solid,
            shade_mode: ShadeMode::Lightsource,
            sort_mode: SortMode::Automatic,
            color: Vec3::new(0.5, 0.5, 0.5),
            opacity: 1.0,
            double_sided: false,
            line_width: 1.0,
            line_scale: 0.0,
        }
    }
}

/// A polygon face: vertex indices into the entity's point list, the
/// precomputed local-space normal, and the cached world-space normal the
/// lighting stage refreshes each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Indices into the entity point list, in winding order
    pub vertices: Vec<usize>,
    /// Local-space face normal
    pub normal: Vec3,
    /// World-space normal, refreshed per frame for lit solid entities
    pub world_normal: Vec3,
}

impl Polygon {
    /// Create a polygon with a zero normal (see [`Entity::add_polygon`] for
    /// winding-derived normals)
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            normal: Vec3::zeros(),
            world_normal: Vec3::zeros(),
        }
    }
}

/// An edge between two vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// First endpoint index
    pub a: usize,
    /// Second endpoint index
    pub b: usize,
}

impl Edge {
    /// Create an edge
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }
}

/// A renderable mesh entity
#[derive(Debug, Default)]
pub struct Entity {
    /// Local-space point positions
    pub points: Vec<Vec3>,
    /// Polygon topology (solid draw mode)
    pub polygons: Vec<Polygon>,
    /// Edge topology (wireframe draw mode)
    pub edges: Vec<Edge>,
    /// Draw style
    pub style: Style,

    // Per-frame buffers, reused across frames while the point count holds
    pub(crate) world_coords: Vec<Vec4>,
    pub(crate) camera_coords: Vec<Vec4>,
    pub(crate) coords: Vec<Vec4>,
    pub(crate) clip_flags: Vec<bool>,
    pub(crate) point_order: Vec<usize>,
    pub(crate) average_z: f32,
}

impl Entity {
    /// Create an entity from its local-space points
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    /// Set the draw style
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Append a polygon, computing its local normal from the first three
    /// vertices of the winding. Degenerate windings get a zero normal.
    pub fn add_polygon(&mut self, vertices: Vec<usize>) {
        let normal = self.face_normal(&vertices);
        self.polygons.push(Polygon {
            vertices,
            normal,
            world_normal: Vec3::zeros(),
        });
    }

    /// Append an edge
    pub fn add_edge(&mut self, a: usize, b: usize) {
        self.edges.push(Edge::new(a, b));
    }

    fn face_normal(&self, vertices: &[usize]) -> Vec3 {
        let (Some(&i0), Some(&i1), Some(&i2)) =
            (vertices.first(), vertices.get(1), vertices.get(2))
        else {
            return Vec3::zeros();
        };
        match (self.points.get(i0), self.points.get(i1), self.points.get(i2)) {
            (Some(p0), Some(p1), Some(p2)) => (p1 - p0).cross(&(p2 - p0)).normalize(),
            _ => Vec3::zeros(),
        }
    }

    /// Number of points (and the length of every coordinate buffer)
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Size the coordinate buffers to the current point count.
    ///
    /// Reallocates only when the point count changed since the last frame;
    /// otherwise the buffers (and their contents) are left untouched for the
    /// transform engine to overwrite in place.
    pub fn init_coordinate_buffers(&mut self) {
        let count = self.points.len();
        if self.world_coords.len() != count {
            self.world_coords.resize(count, Vec4::zeros());
            self.camera_coords.resize(count, Vec4::zeros());
            self.coords.resize(count, Vec4::zeros());
            self.clip_flags.resize(count, false);
            self.point_order = (0..count).collect();
        }
    }

    /// World-space coordinates from the last processed frame
    pub fn world_coords(&self) -> &[Vec4] {
        &self.world_coords
    }

    /// Camera-space coordinates from the last processed frame
    pub fn camera_coords(&self) -> &[Vec4] {
        &self.camera_coords
    }

    /// Clip/screen-space coordinates from the last processed frame: x/y are
    /// viewport pixels, z is the undivided clip-space depth, w is the
    /// original homogeneous w.
    pub fn coords(&self) -> &[Vec4] {
        &self.coords
    }

    /// Per-vertex clip flags from the last processed frame
    pub fn clip_flags(&self) -> &[bool] {
        &self.clip_flags
    }

    /// Point draw order (indices into the buffers), back to front once the
    /// sort stage has run for point draw mode
    pub fn point_order(&self) -> &[usize] {
        &self.point_order
    }

    /// Mean depth of the entity from the last processed frame
    pub fn average_z(&self) -> f32 {
        self.average_z
    }

    /// Axis-aligned cube of half-extent `size` centered at the origin, with
    /// quad faces and the matching edge set. Handy for demos and tests.
    pub fn cube(size: f32) -> Self {
        let s = size;
        let mut entity = Self::new(vec![
            Vec3::new(-s, -s, -s),
            Vec3::new(s, -s, -s),
            Vec3::new(s, s, -s),
            Vec3::new(-s, s, -s),
            Vec3::new(-s, -s, s),
            Vec3::new(s, -s, s),
            Vec3::new(s, s, s),
            Vec3::new(-s, s, s),
        ]);
        for quad in [
            vec![0, 1, 2, 3],
            vec![0, 4, 5, 1],
            vec![1, 5, 6, 2],
            vec![2, 6, 7, 3],
            vec![4, 0, 3, 7],
            vec![5, 4, 7, 6],
        ] {
            entity.add_polygon(quad);
        }
        for (a, b) in [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ] {
            entity.add_edge(a, b);
        }
        entity
    }
}
