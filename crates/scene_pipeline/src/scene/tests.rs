//! End-to-end frame tests: construction through `model_view` to the frame
//! artifacts.

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::config::{PerspectivePatch, SceneConfig, ScenePatch};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec4};
use crate::scene::entity::{DrawMode, Entity, ShadeMode, SortMode, Style};
use crate::scene::light::Light;
use crate::scene::node::SceneNode;
use crate::scene::{Scene, TriggerContext};

fn single_point_entity() -> Entity {
    Entity::new(vec![Vec3::zeros()])
}

#[test]
fn test_origin_entity_projects_to_viewport_center() {
    let mut scene = Scene::new();
    scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()).with_id("dot"));

    scene.model_view();

    assert_eq!(scene.render_keys().len(), 1);
    let entity = scene.find_entity("dot").expect("entity is registered");
    assert_relative_eq!(entity.coords()[0].x, 512.0, epsilon = 1e-2);
    assert_relative_eq!(entity.coords()[0].y, 512.0, epsilon = 1e-2);
    assert_eq!(entity.clip_flags(), &[false]);
}

#[test]
fn test_disabled_sibling_absent_from_render_list() {
    let mut scene = Scene::new();
    scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()));
    scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()));
    scene.graph.insert_root(
        SceneNode::entity(single_point_entity())
            .with_id("hidden")
            .with_disabled(true),
    );

    scene.model_view();

    assert_eq!(scene.render_keys().len(), 2);
    assert!(scene.find_node("hidden").is_none());
}

#[test]
fn test_disabled_subtree_is_skipped_entirely() {
    let mut scene = Scene::new();
    let off = scene
        .graph
        .insert_root(SceneNode::group().with_id("off").with_disabled(true));
    scene.graph.insert_child(
        off,
        SceneNode::entity(single_point_entity()).with_id("off-child"),
    );
    scene.graph.insert_child(
        off,
        SceneNode::light(Light::point(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), 1.0, 0.0)),
    );

    scene.model_view();

    assert!(scene.render_keys().is_empty());
    assert!(scene.light_keys().is_empty());
    assert!(scene.find_node("off").is_none());
    assert!(scene.find_node("off-child").is_none());
}

#[test]
fn test_fully_clipped_entity_culled_but_children_survive() {
    let mut scene = Scene::new();
    let far_away = Mat4::new_translation(&Vec3::new(0.0, 0.0, 50000.0));
    let parent = scene.graph.insert_root(
        SceneNode::entity(single_point_entity())
            .with_id("parent")
            .with_matrix(far_away),
    );
    // the child pulls itself back toward the camera; composition is
    // child-local * parent
    let back = Mat4::new_translation(&Vec3::new(0.0, 0.0, -50000.0));
    scene.graph.insert_child(
        parent,
        SceneNode::entity(single_point_entity())
            .with_id("child")
            .with_matrix(back),
    );

    scene.model_view();

    let rendered: Vec<_> = scene.render_keys().to_vec();
    assert_eq!(rendered.len(), 1);
    assert_eq!(scene.find_node_key("child"), Some(rendered[0]));
    // the culled parent is still visited: it keeps its id registration
    let parent_entity = scene.find_entity("parent").unwrap();
    assert_eq!(parent_entity.clip_flags(), &[true]);
}

#[test]
fn test_duplicate_id_last_visited_wins() {
    let mut scene = Scene::new();
    scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()).with_id("dup"));
    scene.graph.insert_root(
        SceneNode::entity(Entity::new(vec![Vec3::zeros(), Vec3::new(0.1, 0.0, 0.0)]))
            .with_id("dup"),
    );

    scene.model_view();

    let resolved = scene.find_entity("dup").unwrap();
    assert_eq!(resolved.point_count(), 2);
}

#[test]
fn test_lights_collected_with_world_placement() {
    let mut scene = Scene::new();
    let rig = scene
        .graph
        .insert_root(SceneNode::group().with_matrix(Mat4::new_translation(&Vec3::new(
            5.0, 0.0, 0.0,
        ))));
    scene.graph.insert_child(
        rig,
        SceneNode::light(Light::point(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0), 1.0, 0.0)),
    );

    scene.model_view();

    assert_eq!(scene.light_keys().len(), 1);
    let light = scene.lights().next().unwrap();
    assert_relative_eq!(light.world_position.x, 5.0, epsilon = 1e-5);
    assert_relative_eq!(light.world_position.w, 1.0, epsilon = 1e-5);
}

#[test]
fn test_point_mode_clip_tolerance_from_line_width() {
    // x ≈ 3.3 sits just outside the 35° frustum at the camera plane depth;
    // a wide sprite's half-width tolerance keeps it alive
    let wide = Style {
        draw_mode: DrawMode::Point,
        line_width: 2.0,
        line_scale: 0.0,
        ..Default::default()
    };
    let narrow = Style {
        line_width: 0.1,
        ..wide
    };

    let mut scene = Scene::new();
    scene.graph.insert_root(
        SceneNode::entity(Entity::new(vec![Vec3::new(3.3, 0.0, 0.0)]).with_style(wide))
            .with_id("wide"),
    );
    scene.graph.insert_root(
        SceneNode::entity(Entity::new(vec![Vec3::new(3.3, 0.0, 0.0)]).with_style(narrow))
            .with_id("narrow"),
    );

    scene.model_view();

    assert_eq!(scene.render_keys().len(), 1);
    assert_eq!(scene.find_entity("wide").unwrap().clip_flags(), &[false]);
    assert_eq!(scene.find_entity("narrow").unwrap().clip_flags(), &[true]);
}

#[test]
fn test_camera_hook_steers_resolved_position() {
    let mut scene = Scene::new();
    scene.on_camera(Box::new(|position, _look_at, _up, _time| {
        position.x += 1.0;
        position.y += 2.0;
        position.z += 3.0;
    }));

    scene.model_view();

    let resolved = scene.camera_position();
    assert_relative_eq!(resolved, Vec4::new(1.0, 2.0, -7.0, 0.0), epsilon = 1e-6);
    // the stored configuration is untouched; hooks work on frame copies
    assert_eq!(scene.camera.position, Vec3::new(0.0, 0.0, -10.0));
}

#[test]
fn test_before_scene_hook_mutates_entity_before_transform() {
    let mut scene = Scene::new();
    scene.graph.insert_root(
        SceneNode::entity(single_point_entity())
            .with_id("moved")
            .with_before_scene(Box::new(|node, _ctx| {
                if let Some(entity) = node.as_entity_mut() {
                    entity.points[0].x = 2.5;
                }
            })),
    );

    scene.model_view();

    let entity = scene.find_entity("moved").unwrap();
    assert_relative_eq!(entity.world_coords()[0].x, 2.5, epsilon = 1e-6);
}

#[test]
fn test_on_scene_hook_sees_composed_matrix() {
    let seen = Rc::new(Cell::new(false));
    let observed = seen.clone();

    let mut scene = Scene::new();
    let parent = scene
        .graph
        .insert_root(SceneNode::group().with_matrix(Mat4::rotation_y(0.5)));
    scene.graph.insert_child(
        parent,
        SceneNode::group().with_on_scene(Box::new(move |_node, matrix, _ctx| {
            observed.set(matrix.is_some());
        })),
    );

    scene.model_view();
    assert!(seen.get());
}

#[test]
fn test_trigger_self_removal_and_persistence() {
    let fired = Rc::new(Cell::new(0u32));

    let mut scene = Scene::new();
    let counter = fired.clone();
    scene.add_trigger(Box::new(move |_scene, _ctx| {
        counter.set(counter.get() + 1);
        true // finished after one frame
    }));
    let counter = fired.clone();
    scene.add_trigger(Box::new(move |_scene, _ctx| {
        counter.set(counter.get() + 1);
        false // persists
    }));

    scene.model_view();
    assert_eq!(fired.get(), 2);
    assert_eq!(scene.trigger_count(), 1);

    scene.model_view();
    assert_eq!(fired.get(), 3);
    assert_eq!(scene.trigger_count(), 1);
}

#[test]
fn test_trigger_additions_run_next_frame() {
    let chained = Rc::new(Cell::new(0u32));

    let mut scene = Scene::new();
    let counter = chained.clone();
    scene.add_trigger(Box::new(move |scene, _ctx| {
        let counter = counter.clone();
        scene.add_trigger(Box::new(move |_scene, _ctx| {
            counter.set(counter.get() + 1);
            true
        }));
        true
    }));

    scene.model_view();
    // the chained trigger was installed but must not fire this frame
    assert_eq!(chained.get(), 0);
    assert_eq!(scene.trigger_count(), 1);

    scene.model_view();
    assert_eq!(chained.get(), 1);
    assert_eq!(scene.trigger_count(), 0);
}

#[test]
fn test_trigger_receives_frame_camera_vectors() {
    let seen = Rc::new(Cell::new(Vec4::zeros()));
    let observed = seen.clone();

    let mut scene = Scene::new();
    scene.add_trigger(Box::new(move |_scene, ctx: &TriggerContext| {
        observed.set(ctx.position);
        true
    }));

    scene.model_view();
    assert_relative_eq!(seen.get(), Vec4::new(0.0, 0.0, -10.0, 0.0), epsilon = 1e-6);
}

#[test]
fn test_buffers_reused_across_frames() {
    let mut scene = Scene::new();
    scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()).with_id("stable"));

    scene.model_view();
    let ptr = scene.find_entity("stable").unwrap().coords().as_ptr();
    scene.model_view();
    assert_eq!(scene.find_entity("stable").unwrap().coords().as_ptr(), ptr);
}

#[test]
fn test_solid_cube_polygons_sorted_back_to_front() {
    let mut scene = Scene::new();
    scene
        .graph
        .insert_root(SceneNode::entity(Entity::cube(1.0)).with_id("cube"));

    scene.model_view();

    let cube = scene.find_entity("cube").unwrap();
    let mean_z = |vertices: &[usize]| -> f32 {
        vertices
            .iter()
            .map(|&v| cube.camera_coords()[v].z)
            .sum::<f32>()
            / vertices.len() as f32
    };
    let depths: Vec<f32> = cube.polygons.iter().map(|p| mean_z(&p.vertices)).collect();
    assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_unsorted_plain_wireframe_keeps_edge_order() {
    let style = Style {
        draw_mode: DrawMode::Wireframe,
        shade_mode: ShadeMode::Plain,
        sort_mode: SortMode::Automatic,
        ..Default::default()
    };
    let cube = Entity::cube(1.0).with_style(style);
    let original: Vec<_> = cube.edges.clone();

    let mut scene = Scene::new();
    scene
        .graph
        .insert_root(SceneNode::entity(cube).with_id("wire"));

    scene.model_view();
    assert_eq!(scene.find_entity("wire").unwrap().edges, original);
}

#[test]
fn test_lit_solid_cube_normals_are_unit_length() {
    let mut scene = Scene::new();
    let spun = Mat4::rotation_y(0.7) * Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));
    scene.graph.insert_root(
        SceneNode::entity(Entity::cube(1.0))
            .with_id("cube")
            .with_matrix(spun),
    );

    scene.model_view();

    let cube = scene.find_entity("cube").unwrap();
    for polygon in &cube.polygons {
        assert_relative_eq!(polygon.world_normal.norm(), 1.0, epsilon = 1e-4);
    }
}

#[test]
fn test_config_patch_reaches_projection() {
    let patch = ScenePatch {
        perspective: Some(PerspectivePatch {
            fov: Some(90.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut scene = Scene::with_config(SceneConfig::default().merged(&patch));
    scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()).with_id("dot"));

    scene.model_view();

    assert_eq!(scene.perspective.fov, 90.0);
    assert_relative_eq!(scene.perspective_scale(), (256.0 - 90.0) / 16.0);
    // wider fov still centers an on-axis point
    let entity = scene.find_entity("dot").unwrap();
    assert_relative_eq!(entity.coords()[0].x, 512.0, epsilon = 1e-2);
}

#[test]
fn test_id_map_rebuilt_each_frame() {
    let mut scene = Scene::new();
    let key = scene
        .graph
        .insert_root(SceneNode::entity(single_point_entity()).with_id("blinker"));

    scene.model_view();
    assert!(scene.find_node("blinker").is_some());

    scene.graph.get_mut(key).unwrap().common.disabled = true;
    scene.model_view();
    assert!(scene.find_node("blinker").is_none());
}
