use experience::tweak::TweakFolder;
use three_d::{
    vec3, AmbientLight, DirectionalLight, Light, Object, Skybox, Srgba, Vec3,
};

use super::world::WorldContext;

const SHADOW_MAP_SIZE: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSettings {
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
    pub env_map_intensity: f32,
    /// Set by every edit, cleared once the scene picked the values up.
    pub dirty: bool,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            sun_intensity: 4.0,
            sun_position: [3.5, 2.0, -1.25],
            env_map_intensity: 0.5,
            dirty: false,
        }
    }
}

pub fn environment_tweaks() -> TweakFolder<EnvironmentSettings> {
    TweakFolder::<EnvironmentSettings>::new("Environment")
        .slider("sunLightIntensity", 0.0..=10.0, 0.001, |s| s.sun_intensity, |s, v| {
            s.sun_intensity = v
        })
        .slider("sunLightX", -5.0..=5.0, 0.001, |s| s.sun_position[0], |s, v| {
            s.sun_position[0] = v
        })
        .slider("sunLightY", -5.0..=5.0, 0.001, |s| s.sun_position[1], |s, v| {
            s.sun_position[1] = v
        })
        .slider("sunLightZ", -5.0..=5.0, 0.001, |s| s.sun_position[2], |s, v| {
            s.sun_position[2] = v
        })
        .slider("envMapIntensity", 0.0..=4.0, 0.001, |s| s.env_map_intensity, |s, v| {
            s.env_map_intensity = v
        })
        .on_change(|s| s.dirty = true)
}

/// Sun pointing from `position` towards the origin.
fn sun_direction(position: [f32; 3]) -> Vec3 {
    -vec3(position[0], position[1], position[2])
}

/// Lights and sky. Built last so it can light whatever the world already holds.
pub struct Environment {
    ambient: AmbientLight,
    sun: DirectionalLight,
    skybox: Skybox,
    environment_light: AmbientLight,
}

impl Environment {
    pub fn new(ctx: &WorldContext, settings: &EnvironmentSettings) -> anyhow::Result<Self> {
        let faces = ctx.cube_texture("environmentMapTexture")?;
        let skybox = Skybox::new(
            ctx.context,
            &faces[0],
            &faces[1],
            &faces[2],
            &faces[3],
            &faces[4],
            &faces[5],
        );
        let environment_light = AmbientLight::new_with_environment(
            ctx.context,
            settings.env_map_intensity,
            Srgba::WHITE,
            skybox.texture(),
        );
        let sun = DirectionalLight::new(
            ctx.context,
            settings.sun_intensity,
            Srgba::WHITE,
            &sun_direction(settings.sun_position),
        );
        let mut environment = Self {
            ambient: AmbientLight::new(ctx.context, 0.5, Srgba::WHITE),
            sun,
            skybox,
            environment_light,
        };
        environment.update_materials(settings);
        Ok(environment)
    }

    /// Pushes the current settings into the lights shading every material.
    pub fn update_materials(&mut self, settings: &EnvironmentSettings) {
        self.environment_light.intensity = settings.env_map_intensity;
        self.sun.intensity = settings.sun_intensity;
        self.sun.direction = sun_direction(settings.sun_position);
        log::debug!("Environment intensity set to {}", settings.env_map_intensity);
    }

    pub fn cast_shadows(&mut self, casters: &[&dyn Object]) {
        self.sun
            .generate_shadow_map(SHADOW_MAP_SIZE, casters.iter().copied());
    }

    pub fn skybox(&self) -> &Skybox {
        &self.skybox
    }

    pub fn lights(&self) -> [&dyn Light; 3] {
        [&self.ambient, &self.environment_light, &self.sun]
    }
}

#[cfg(test)]
mod tests {
    use experience::tweak::TweakValue;

    use super::*;

    #[test]
    fn edits_mark_the_settings_dirty() {
        let tweaks = environment_tweaks();
        let mut settings = EnvironmentSettings::default();
        assert!(!settings.dirty);
        tweaks
            .apply(&mut settings, "envMapIntensity", TweakValue::Number(9.0))
            .unwrap();
        assert_eq!(settings.env_map_intensity, 4.0);
        assert!(settings.dirty);
    }

    #[test]
    fn sun_points_at_the_origin() {
        let direction = sun_direction(EnvironmentSettings::default().sun_position);
        assert_eq!(direction, vec3(-3.5, -2.0, 1.25));
    }
}
