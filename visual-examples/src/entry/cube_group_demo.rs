use std::f32::consts::TAU;

use experience::{tweak::TweakFolder, Cursor, Time};
use three_d::{
    radians, vec3, Camera, ColorMaterial, Context, CpuMesh, Event, FrameInput, Gm, Mat4, Mesh,
    Srgba,
};

use crate::{
    common::{Demo, DemoLoopResult},
    gui::show_folder,
};

const ORBIT_RADIUS: f32 = 3.0;
const ORBIT_HEIGHT: f32 = 5.0;
/// Radians per second while a spin is running.
const SPIN_SPEED: f32 = TAU;

struct GroupSettings {
    elevation: f32,
    visible: bool,
    color: [u8; 3],
    spin_remaining: f32,
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            elevation: 0.0,
            visible: true,
            color: [255, 99, 71],
            spin_remaining: 0.0,
        }
    }
}

fn group_tweaks() -> TweakFolder<GroupSettings> {
    TweakFolder::<GroupSettings>::new("Cube Group")
        .slider("Elevation", -3.0..=3.0, 0.01, |s| s.elevation, |s, v| s.elevation = v)
        .toggle("Visible", |s| s.visible, |s, v| s.visible = v)
        .color("Color", |s| s.color, |s, v| s.color = v)
        .button("Spin", |s| s.spin_remaining += TAU)
}

struct Cube {
    gm: Gm<Mesh, ColorMaterial>,
    local: Mat4,
}

struct CubeGroupScene {
    cubes: Vec<Cube>,
    spin: f32,
    cursor: Cursor,
    time: Time,
}

impl CubeGroupScene {
    fn new(context: &Context) -> Self {
        let unit = CpuMesh::cube();
        let cube = |color: Srgba, position: [f32; 3], size: [f32; 3]| {
            let local = Mat4::from_translation(vec3(position[0], position[1], position[2]))
                * Mat4::from_nonuniform_scale(size[0] * 0.5, size[1] * 0.5, size[2] * 0.5);
            Cube {
                gm: Gm::new(
                    Mesh::new(context, &unit),
                    ColorMaterial {
                        color,
                        ..Default::default()
                    },
                ),
                local,
            }
        };
        Self {
            cubes: vec![
                cube(Srgba::new_opaque(255, 99, 71), [-1.2, 0.0, 0.0], [1.0, 1.0, 1.0]),
                cube(Srgba::new_opaque(0, 191, 255), [0.0, -0.1, 0.0], [1.0, 0.8, 1.0]),
                cube(Srgba::new_opaque(255, 222, 173), [1.2, -0.2, 0.0], [1.0, 0.6, 1.0]),
            ],
            spin: 0.0,
            cursor: Cursor::default(),
            time: Time::new(),
        }
    }

    fn on_frame_loop(
        &mut self,
        settings: &mut GroupSettings,
        camera: &mut Camera,
        frame_input: &FrameInput,
    ) -> DemoLoopResult {
        let viewport = frame_input.viewport;
        for event in &frame_input.events {
            if let Event::MouseMotion { position, .. } = event {
                // window events count y from the bottom
                self.cursor = Cursor::from_pixels(
                    position.x,
                    viewport.height as f32 - position.y,
                    viewport.width as f32,
                    viewport.height as f32,
                );
            }
        }

        self.time.tick(frame_input.accumulated_time);
        if settings.spin_remaining > 0.0 {
            let turn = (SPIN_SPEED * self.time.delta_secs()).min(settings.spin_remaining);
            self.spin += turn;
            settings.spin_remaining -= turn;
        }

        let target = vec3(0.0, settings.elevation, 0.0);
        let eye = self.cursor.orbit_position(ORBIT_RADIUS, ORBIT_HEIGHT);
        camera.set_view(
            vec3(eye.x, eye.y + settings.elevation, eye.z),
            target,
            vec3(0.0, 1.0, 0.0),
        );

        let group = Mat4::from_translation(target)
            * Mat4::from_angle_y(radians(self.spin))
            * Mat4::from_nonuniform_scale(0.5, 1.0, 0.5);
        let [r, g, b] = settings.color;
        self.cubes[0].gm.material.color = Srgba::new_opaque(r, g, b);
        for cube in &mut self.cubes {
            cube.gm.set_transformation(group * cube.local);
        }

        if settings.visible {
            frame_input
                .screen()
                .render(camera, self.cubes.iter().map(|cube| &cube.gm), &[]);
        }
        DemoLoopResult::not_updated()
    }
}

pub struct CubeGroupDemo {
    scene: Option<CubeGroupScene>,
    settings: GroupSettings,
    tweaks: TweakFolder<GroupSettings>,
}

impl Default for CubeGroupDemo {
    fn default() -> Self {
        Self {
            scene: None,
            settings: GroupSettings::default(),
            tweaks: group_tweaks(),
        }
    }
}

impl Demo for CubeGroupDemo {
    fn name(&self) -> &'static str {
        "Cube Group"
    }

    fn id(&self) -> &'static str {
        "cube-group"
    }

    fn restart(&mut self, context: &Context) -> anyhow::Result<()> {
        self.settings.spin_remaining = 0.0;
        self.scene = Some(CubeGroupScene::new(context));
        Ok(())
    }

    fn on_frame_loop(&mut self, camera: &mut Camera, frame_input: &FrameInput) -> DemoLoopResult {
        if let Some(scene) = &mut self.scene {
            scene.on_frame_loop(&mut self.settings, camera, frame_input)
        } else {
            DemoLoopResult::not_updated()
        }
    }

    fn show_options_gui(&mut self, ui: &mut three_d::egui::Ui) {
        show_folder(ui, &self.tweaks, &mut self.settings);
    }

    fn drives_camera(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use experience::tweak::TweakValue;

    use super::*;

    #[test]
    fn spin_button_queues_full_turns() {
        let tweaks = group_tweaks();
        let mut settings = GroupSettings::default();
        tweaks.apply(&mut settings, "Spin", TweakValue::Press).unwrap();
        tweaks.apply(&mut settings, "Spin", TweakValue::Press).unwrap();
        assert_eq!(settings.spin_remaining, 2.0 * TAU);

        tweaks
            .apply(&mut settings, "Elevation", TweakValue::Number(5.0))
            .unwrap();
        assert_eq!(settings.elevation, 3.0);
    }
}
