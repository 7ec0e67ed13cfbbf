//! Orbit demo: a cube, a star field, and a point light under an orbiting
//! camera.
//!
//! Runs the transform pipeline for a fixed number of frames without any
//! rasterizer attached, logging what a drawing backend would consume each
//! frame. Demonstrates camera hooks (orbit), before-scene hooks (spin), and
//! a chained trigger sequence (star field blackout and recovery).

use std::time::Duration;

use rand::prelude::*;
use scene_pipeline::prelude::*;

const FRAMES: u32 = 120;
const FRAME_STEP: Duration = Duration::from_millis(16);
const ORBIT_RADIUS: f32 = 10.0;

fn star_field(count: usize) -> Entity {
    let mut rng = rand::thread_rng();
    let points = (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-40.0..40.0),
                rng.gen_range(-40.0..40.0),
                rng.gen_range(-40.0..40.0),
            )
        })
        .collect();
    Entity::new(points).with_style(Style {
        draw_mode: DrawMode::Point,
        shade_mode: ShadeMode::Plain,
        sort_mode: SortMode::Sorted,
        line_width: 2.0,
        ..Default::default()
    })
}

fn build_scene() -> Scene {
    let patch = ScenePatch {
        perspective: Some(PerspectivePatch {
            fov: Some(45.0),
            ..Default::default()
        }),
        viewport: Some(ViewportPatch {
            width: Some(800.0),
            height: Some(800.0),
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut scene = Scene::with_config(SceneConfig::default().merged(&patch));

    // slowly spinning cube at the origin
    let mut spin = 0.0f32;
    scene.graph.insert_root(
        SceneNode::entity(Entity::cube(1.5))
            .with_id("cube")
            .with_before_scene(Box::new(move |node, ctx| {
                spin += ctx.time * 0.6;
                node.common.matrix = Some(Mat4::rotation_y(spin));
            })),
    );

    scene
        .graph
        .insert_root(SceneNode::entity(star_field(200)).with_id("stars"));

    scene.graph.insert_root(
        SceneNode::light(Light::point(
            Vec3::new(0.0, 6.0, -6.0),
            Vec3::new(1.0, 0.9, 0.8),
            1.0,
            0.2,
        ))
        .with_id("lamp"),
    );

    // orbit the camera position around the y axis
    let mut angle = 0.0f32;
    scene.on_camera(Box::new(move |position, _look_at, _up, time| {
        angle += time * 0.8;
        position.x = ORBIT_RADIUS * angle.sin();
        position.z = -ORBIT_RADIUS * angle.cos();
    }));

    // after a second of orbit, black out the stars; the follow-up trigger
    // restores them half a second later
    let mut elapsed = 0.0f32;
    scene.add_trigger(Box::new(move |scene, ctx| {
        elapsed += ctx.time;
        if elapsed < 1.0 {
            return false;
        }
        if let Some(key) = scene.find_node_key("stars") {
            if let Some(stars) = scene.graph.get_mut(key) {
                stars.common.disabled = true;
            }
        }
        let mut dark = 0.0f32;
        scene.add_trigger(Box::new(move |scene, ctx| {
            dark += ctx.time;
            if dark < 0.5 {
                return false;
            }
            // the stars are disabled, so the id map no longer carries them;
            // walk the roots instead
            let roots: Vec<NodeKey> = scene.graph.roots().to_vec();
            for key in roots {
                if let Some(node) = scene.graph.get_mut(key) {
                    node.common.disabled = false;
                }
            }
            log::info!("star field restored");
            true
        }));
        log::info!("star field blacked out");
        true
    }));

    scene
}

fn main() {
    env_logger::init();

    let mut scene = build_scene();
    for frame in 0..FRAMES {
        scene.model_view();

        if frame % 30 == 0 {
            let rendered = scene.render_keys().len();
            let lights = scene.light_keys().len();
            log::info!(
                "frame {frame}: {rendered} renderables, {lights} lights, camera at {:?}",
                scene.camera_position()
            );
            if let Some(cube) = scene.find_entity("cube") {
                let center = cube.coords()[0];
                log::info!(
                    "  cube vertex 0 at screen ({:.1}, {:.1}), depth {:.2}",
                    center.x,
                    center.y,
                    cube.average_z()
                );
            }
        }

        std::thread::sleep(FRAME_STEP);
    }

    log::info!("done after {FRAMES} frames");
}
