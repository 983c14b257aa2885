use anyhow::anyhow;
use experience::{Ready, Resources};
use three_d::{Camera, Context, CpuModel, CpuTexture, Object, RenderTarget};

use super::{
    environment::{Environment, EnvironmentSettings},
    fox::Fox,
    ground::Ground,
};
use crate::loader::LoadedAsset;

/// What scene objects get to see while they are built.
pub struct WorldContext<'a> {
    pub context: &'a Context,
    pub resources: &'a Resources<LoadedAsset>,
    pub debug: bool,
}

impl WorldContext<'_> {
    fn asset(&self, name: &str) -> anyhow::Result<&LoadedAsset> {
        self.resources
            .item(name)
            .ok_or_else(|| anyhow!("resource `{}` was not loaded", name))
    }

    pub fn texture(&self, name: &str) -> anyhow::Result<&CpuTexture> {
        self.asset(name)?
            .texture()
            .ok_or_else(|| anyhow!("resource `{}` is not a texture", name))
    }

    pub fn cube_texture(&self, name: &str) -> anyhow::Result<&[CpuTexture; 6]> {
        self.asset(name)?
            .cube_texture()
            .ok_or_else(|| anyhow!("resource `{}` is not a cube texture", name))
    }

    pub fn model(&self, name: &str) -> anyhow::Result<&CpuModel> {
        self.asset(name)?
            .model()
            .ok_or_else(|| anyhow!("resource `{}` is not a model", name))
    }
}

pub struct Scene {
    pub ground: Ground,
    pub fox: Fox,
    pub environment: Environment,
}

impl Scene {
    fn objects(&self) -> Vec<&dyn Object> {
        let mut objects: Vec<&dyn Object> = vec![&self.ground.gm];
        objects.extend(self.fox.model.iter().map(|part| part as &dyn Object));
        objects
    }
}

enum State<S> {
    Waiting(Ready),
    Built(S),
    Failed,
}

/// A value built once, on the first update after its ready gate opened.
pub struct Deferred<S> {
    state: State<S>,
}

impl<S> Deferred<S> {
    pub fn new(ready: Ready) -> Self {
        Self {
            state: State::Waiting(ready),
        }
    }

    /// Runs `build` if the gate just opened. A failed build is reported
    /// once and never retried.
    pub fn update(&mut self, build: impl FnOnce() -> anyhow::Result<S>) -> anyhow::Result<()> {
        if let State::Waiting(ready) = &mut self.state {
            if !ready.poll_ready() {
                return Ok(());
            }
            match build() {
                Ok(value) => self.state = State::Built(value),
                Err(err) => {
                    self.state = State::Failed;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    pub fn get(&self) -> Option<&S> {
        match &self.state {
            State::Built(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        match &mut self.state {
            State::Built(value) => Some(value),
            _ => None,
        }
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }
}

/// Scene that builds itself the first frame its resources are ready.
pub struct World {
    scene: Deferred<Scene>,
}

impl World {
    /// Subscribes to `resources`; call before loading starts.
    pub fn new(resources: &mut Resources<LoadedAsset>) -> Self {
        Self {
            scene: Deferred::new(resources.ready()),
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.get()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.get_mut()
    }

    pub fn has_failed(&self) -> bool {
        self.scene.has_failed()
    }

    /// Builds the scene once ready, then animates it.
    pub fn update(
        &mut self,
        ctx: &WorldContext,
        settings: &EnvironmentSettings,
        delta_secs: f32,
    ) -> anyhow::Result<()> {
        self.scene.update(|| Self::build(ctx, settings))?;

        if let Some(scene) = self.scene.get_mut() {
            scene.fox.update(delta_secs);
            let Scene {
                ground,
                fox,
                environment,
            } = scene;
            let mut casters: Vec<&dyn Object> = vec![&ground.gm];
            casters.extend(fox.model.iter().map(|part| part as &dyn Object));
            environment.cast_shadows(&casters);
        }
        Ok(())
    }

    fn build(ctx: &WorldContext, settings: &EnvironmentSettings) -> anyhow::Result<Scene> {
        let ground = Ground::new(ctx)?;
        let fox = Fox::new(ctx)?;
        let environment = Environment::new(ctx, settings)?;
        if ctx.debug {
            log::info!("World built, fox playing `{}`", fox.current_action());
        }
        Ok(Scene {
            ground,
            fox,
            environment,
        })
    }

    pub fn render(&self, camera: &Camera, target: &RenderTarget) {
        if let Some(scene) = self.scene() {
            let mut objects: Vec<&dyn Object> = vec![scene.environment.skybox()];
            objects.extend(scene.objects());
            target.render(camera, objects, &scene.environment.lights());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use experience::ReadyGate;

    use super::*;

    #[test]
    fn nothing_is_built_before_ready() {
        let mut gate = ReadyGate::new();
        let mut deferred = Deferred::new(gate.wait());
        let builds = Cell::new(0);
        let build = || -> anyhow::Result<&str> {
            builds.set(builds.get() + 1);
            Ok("scene")
        };

        for _ in 0..3 {
            deferred.update(build).unwrap();
        }
        assert_eq!(builds.get(), 0);
        assert!(deferred.get().is_none());

        gate.open();
        deferred.update(build).unwrap();
        assert_eq!(builds.get(), 1);
        assert_eq!(deferred.get(), Some(&"scene"));
    }

    #[test]
    fn the_build_runs_exactly_once() {
        let mut gate = ReadyGate::new();
        let mut deferred = Deferred::new(gate.wait());
        gate.open();
        let builds = Cell::new(0);
        for _ in 0..5 {
            deferred
                .update(|| {
                    builds.set(builds.get() + 1);
                    Ok(builds.get())
                })
                .unwrap();
        }
        assert_eq!(builds.get(), 1);
        assert_eq!(deferred.get_mut(), Some(&mut 1));
    }

    #[test]
    fn a_failed_build_is_not_retried() {
        let mut gate = ReadyGate::new();
        let mut deferred: Deferred<u32> = Deferred::new(gate.wait());
        gate.open();
        let builds = Cell::new(0);

        let err = deferred
            .update(|| {
                builds.set(builds.get() + 1);
                Err(anyhow!("resource `foxModel` is not a model"))
            })
            .unwrap_err();
        assert!(err.to_string().contains("foxModel"));
        assert!(deferred.has_failed());

        deferred
            .update(|| {
                builds.set(builds.get() + 1);
                Ok(7)
            })
            .unwrap();
        assert_eq!(builds.get(), 1);
        assert!(deferred.get().is_none());
    }
}
