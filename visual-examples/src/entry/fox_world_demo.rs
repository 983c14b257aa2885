mod environment;
mod fox;
mod ground;
mod world;

use std::path::PathBuf;

use experience::{tweak::TweakFolder, LoadState, PendingLoads, Resources, Source, Time};
use three_d::{vec3, Camera, Context, FrameInput};

use crate::{
    common::{Demo, DemoLoopResult},
    gui::show_folder,
    loader::{AssetLoader, LoadedAsset},
};

use self::{
    environment::{environment_tweaks, EnvironmentSettings},
    fox::{fox_tweaks, FoxControls},
    world::{World, WorldContext},
};

struct FoxWorldScene {
    context: Context,
    resources: Resources<LoadedAsset>,
    pending: PendingLoads<LoadedAsset>,
    world: World,
    time: Time,
    place_camera: bool,
}

pub struct FoxWorldDemo {
    assets: PathBuf,
    sources: Vec<Source>,
    debug: bool,
    scene: Option<FoxWorldScene>,
    environment: EnvironmentSettings,
    environment_tweaks: TweakFolder<EnvironmentSettings>,
    fox: FoxControls,
    fox_tweaks: TweakFolder<FoxControls>,
    error: Option<String>,
}

impl FoxWorldDemo {
    pub fn new(assets: PathBuf, sources: Vec<Source>, debug: bool) -> Self {
        Self {
            assets,
            sources,
            debug,
            scene: None,
            environment: EnvironmentSettings::default(),
            environment_tweaks: environment_tweaks(),
            fox: FoxControls::default(),
            fox_tweaks: fox_tweaks(),
            error: None,
        }
    }
}

impl Demo for FoxWorldDemo {
    fn name(&self) -> &'static str {
        "Fox World"
    }

    fn id(&self) -> &'static str {
        "fox-world"
    }

    fn restart(&mut self, context: &Context) -> anyhow::Result<()> {
        self.scene = None;
        self.error = None;
        self.fox.requested = None;

        let mut resources = Resources::new(self.sources.clone())?;
        let world = World::new(&mut resources);
        log::info!(
            "Loading {} sources from {}",
            resources.sources().len(),
            self.assets.display()
        );
        let pending = resources.load_in_background(AssetLoader::new(&self.assets))?;

        self.scene = Some(FoxWorldScene {
            context: context.clone(),
            resources,
            pending,
            world,
            time: Time::new(),
            place_camera: true,
        });
        Ok(())
    }

    fn on_frame_loop(&mut self, camera: &mut Camera, frame_input: &FrameInput) -> DemoLoopResult {
        let Some(scene) = &mut self.scene else {
            return DemoLoopResult::not_updated();
        };
        if scene.place_camera {
            scene.place_camera = false;
            camera.set_view(vec3(6.0, 4.0, 8.0), vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
        }

        if let Err(err) = scene.resources.receive(&mut scene.pending) {
            log::error!("Failed to record a loaded source: {}", err);
        }

        scene.time.tick(frame_input.accumulated_time);
        let ctx = WorldContext {
            context: &scene.context,
            resources: &scene.resources,
            debug: self.debug,
        };
        if let Err(err) = scene
            .world
            .update(&ctx, &self.environment, scene.time.delta_secs())
        {
            log::error!("Failed to build the fox world: {:#}", err);
            self.error = Some(format!("{err:#}"));
        }

        if let Some(built) = scene.world.scene_mut() {
            if std::mem::take(&mut self.environment.dirty) {
                built.environment.update_materials(&self.environment);
            }
            if let Some(action) = self.fox.requested.take() {
                built.fox.play(action);
            }
        }

        scene.world.render(camera, &frame_input.screen());
        DemoLoopResult::not_updated()
    }

    fn show_options_gui(&mut self, ui: &mut three_d::egui::Ui) {
        use three_d::egui::*;
        if let Some(scene) = &self.scene {
            match scene.resources.state() {
                LoadState::Loading { loaded, to_load } => {
                    ui.add(
                        ProgressBar::new(scene.resources.progress())
                            .text(format!("loading {}/{}", loaded, to_load)),
                    );
                }
                LoadState::Ready => {
                    ui.label("resources ready");
                }
            }
            if scene.world.has_failed() {
                ui.colored_label(Color32::RED, "the scene failed to build, R restarts");
            }
            if let Some(built) = scene.world.scene() {
                for clip in built.fox.missing_clips() {
                    ui.colored_label(Color32::YELLOW, format!("fox clip `{}` cannot play", clip));
                }
            }
            for failure in scene.resources.failures() {
                ui.colored_label(
                    Color32::RED,
                    format!("{}: {}", failure.name, failure.message),
                );
            }
        }
        if let Some(error) = &self.error {
            ui.colored_label(Color32::RED, error);
        }

        show_folder(ui, &self.environment_tweaks, &mut self.environment);
        show_folder(ui, &self.fox_tweaks, &mut self.fox);
    }
}
