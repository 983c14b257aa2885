use std::time::Instant;

use experience::{math::Vector3, tweak::TweakFolder};
use rand::{rngs::ThreadRng, Rng};
use rigid_bodies::{BodyMeshPairs, PhysicsWorld, WorldOptions};
use three_d::{degrees, Camera, Context, CpuMaterial, CpuMesh, FrameInput, Mat4, Srgba};

use crate::{
    common::{Demo, DemoLoopResult},
    gui::show_folder,
    render::{BodyMesh, Lights},
};

const SPAWN_SPREAD: f32 = 1.5;
const SPAWN_HEIGHT: f32 = 3.0;

/// Values edited from the panel. Spawns and resets are requests picked up
/// by the next frame.
struct Controls {
    gravity: f32,
    steps_per_second: f32,
    max_substeps: f32,
    spheres_requested: usize,
    boxes_requested: usize,
    reset_requested: bool,
}

impl Default for Controls {
    fn default() -> Self {
        let options = WorldOptions::default();
        Self {
            gravity: options.gravity.y,
            steps_per_second: (1.0 / options.time_step).round(),
            max_substeps: options.max_substeps as f32,
            spheres_requested: 0,
            boxes_requested: 0,
            reset_requested: false,
        }
    }
}

fn physics_tweaks() -> TweakFolder<Controls> {
    TweakFolder::<Controls>::new("Physics")
        .slider("Gravity", -20.0..=0.0, 0.01, |c| c.gravity, |c, v| c.gravity = v)
        .slider("Steps/Sec", 30.0..=120.0, 1.0, |c| c.steps_per_second, |c, v| {
            c.steps_per_second = v
        })
        .slider("Max Substeps", 1.0..=10.0, 1.0, |c| c.max_substeps, |c, v| c.max_substeps = v)
        .button("Create sphere", |c| c.spheres_requested += 1)
        .button("Create box", |c| c.boxes_requested += 1)
        .button("Reset", |c| c.reset_requested = true)
}

struct FallingBodiesScene {
    context: Context,
    world: PhysicsWorld,
    pairs: BodyMeshPairs<BodyMesh>,
    lights: Lights,
    sphere: CpuMesh,
    cube: CpuMesh,
    rng: ThreadRng,
}

impl FallingBodiesScene {
    fn new(context: &Context, controls: &Controls) -> Self {
        let mut world = PhysicsWorld::new(WorldOptions::default());
        apply_controls(&mut world, controls);

        let mut pairs = BodyMeshPairs::new();
        let floor = world.add_floor();
        let floor_mesh = BodyMesh::new(
            context,
            &CpuMesh::square(),
            &CpuMaterial {
                albedo: Srgba::new_opaque(119, 119, 119),
                metallic: 0.3,
                roughness: 0.4,
                ..Default::default()
            },
            Mat4::from_angle_x(degrees(-90.0)) * Mat4::from_scale(10.0),
        );
        pairs.track_persistent(floor, floor_mesh);

        Self {
            context: context.clone(),
            world,
            pairs,
            lights: Lights::new(context),
            sphere: CpuMesh::sphere(20),
            cube: CpuMesh::cube(),
            rng: rand::thread_rng(),
        }
    }

    fn spawn_position(&mut self) -> Vector3 {
        Vector3::new(
            self.rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
            SPAWN_HEIGHT,
            self.rng.gen_range(-SPAWN_SPREAD..SPAWN_SPREAD),
        )
    }

    fn spawn_sphere(&mut self) {
        let radius = self.rng.gen_range(0.1..0.5);
        let position = self.spawn_position();
        let body = self.world.add_sphere(radius, position);
        let mesh = BodyMesh::new(
            &self.context,
            &self.sphere,
            &body_material(),
            Mat4::from_scale(radius),
        );
        self.pairs.track(body, mesh);
    }

    fn spawn_box(&mut self) {
        let half_extents = Vector3::new(
            self.rng.gen_range(0.05..0.5),
            self.rng.gen_range(0.05..0.5),
            self.rng.gen_range(0.05..0.5),
        );
        let position = self.spawn_position();
        let body = self.world.add_box(half_extents, position);
        // the unit cube spans [-1, 1]
        let local = Mat4::from_nonuniform_scale(half_extents.x, half_extents.y, half_extents.z);
        let mesh = BodyMesh::new(&self.context, &self.cube, &body_material(), local);
        self.pairs.track(body, mesh);
    }

    fn handle_requests(&mut self, controls: &mut Controls) {
        if controls.reset_requested {
            controls.reset_requested = false;
            let removed = self.pairs.reset(&mut self.world);
            log::info!("Removed {} bodies", removed);
        }
        for _ in 0..std::mem::take(&mut controls.spheres_requested) {
            self.spawn_sphere();
        }
        for _ in 0..std::mem::take(&mut controls.boxes_requested) {
            self.spawn_box();
        }
    }

    fn on_frame_loop(
        &mut self,
        controls: &mut Controls,
        camera: &Camera,
        frame_input: &FrameInput,
    ) -> DemoLoopResult {
        self.handle_requests(controls);

        let time = Instant::now();
        let step_count = self
            .world
            .advance((frame_input.accumulated_time / 1000.0) as f32);
        let result = if step_count > 0 {
            self.pairs.sync(&self.world);
            DemoLoopResult {
                updated: true,
                step_cost: time.elapsed() / step_count as u32,
            }
        } else {
            DemoLoopResult::not_updated()
        };

        frame_input.screen().render(
            camera,
            self.pairs.meshes().map(|mesh| &mesh.gm),
            &self.lights.array(),
        );
        result
    }
}

fn body_material() -> CpuMaterial {
    CpuMaterial {
        albedo: Srgba::WHITE,
        metallic: 0.3,
        roughness: 0.4,
        ..Default::default()
    }
}

fn apply_controls(world: &mut PhysicsWorld, controls: &Controls) {
    world.set_gravity(Vector3::new(0.0, controls.gravity, 0.0));
    world.set_time_step(1.0 / controls.steps_per_second);
    world.set_max_substeps(controls.max_substeps as usize);
}

pub struct FallingBodiesDemo {
    scene: Option<FallingBodiesScene>,
    controls: Controls,
    tweaks: TweakFolder<Controls>,
}

impl Default for FallingBodiesDemo {
    fn default() -> Self {
        Self {
            scene: None,
            controls: Controls::default(),
            tweaks: physics_tweaks(),
        }
    }
}

impl Demo for FallingBodiesDemo {
    fn name(&self) -> &'static str {
        "Falling Bodies"
    }

    fn id(&self) -> &'static str {
        "falling-bodies"
    }

    fn restart(&mut self, context: &Context) -> anyhow::Result<()> {
        self.controls.spheres_requested = 0;
        self.controls.boxes_requested = 0;
        self.controls.reset_requested = false;
        self.scene = Some(FallingBodiesScene::new(context, &self.controls));
        Ok(())
    }

    fn on_frame_loop(&mut self, camera: &mut Camera, frame_input: &FrameInput) -> DemoLoopResult {
        if let Some(scene) = &mut self.scene {
            scene.on_frame_loop(&mut self.controls, camera, frame_input)
        } else {
            DemoLoopResult::not_updated()
        }
    }

    fn show_options_gui(&mut self, ui: &mut three_d::egui::Ui) {
        if show_folder(ui, &self.tweaks, &mut self.controls) {
            if let Some(scene) = &mut self.scene {
                apply_controls(&mut scene.world, &self.controls);
            }
        }
        if let Some(scene) = &self.scene {
            ui.label(format!("bodies: {}", scene.pairs.len()));
        }
    }
}
