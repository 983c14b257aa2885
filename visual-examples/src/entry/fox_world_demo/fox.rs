use std::collections::HashSet;

use experience::{tweak::TweakFolder, AnimationActions};
use three_d::{CpuModel, Mat4, Model, PhysicalMaterial};

use super::world::WorldContext;

const SCALE: f32 = 0.02;
/// Action names with the clips of the fox model they play.
const ACTIONS: [(&str, &str); 3] = [("idle", "Survey"), ("walk", "Walk"), ("run", "Run")];

/// Action requested from the panel, played on the next update.
#[derive(Debug, Default)]
pub struct FoxControls {
    pub requested: Option<&'static str>,
}

pub fn fox_tweaks() -> TweakFolder<FoxControls> {
    TweakFolder::<FoxControls>::new("Fox")
        .button("playIdle", |c| c.requested = Some("idle"))
        .button("playWalking", |c| c.requested = Some("walk"))
        .button("playRunning", |c| c.requested = Some("run"))
}

/// Clip names carried by the parts of `model`.
fn clip_names(model: &CpuModel) -> HashSet<String> {
    model
        .geometries
        .iter()
        .flat_map(|primitive| primitive.animations.iter())
        .filter_map(|animation| animation.name.clone())
        .collect()
}

/// Clips of `actions` that no part of the model can play.
fn missing_clips(actions: &[(&str, &str)], available: &HashSet<String>) -> Vec<String> {
    actions
        .iter()
        .filter(|(_, clip)| !available.contains(*clip))
        .map(|(_, clip)| clip.to_string())
        .collect()
}

pub struct Fox {
    pub model: Model<PhysicalMaterial>,
    actions: AnimationActions,
    missing_clips: Vec<String>,
}

impl Fox {
    pub fn new(ctx: &WorldContext) -> anyhow::Result<Self> {
        let mut cpu_model = ctx.model("foxModel")?.clone();
        for primitive in cpu_model.geometries.iter_mut() {
            primitive.transformation = Mat4::from_scale(SCALE) * primitive.transformation;
        }

        // three-d animates part transforms only; clips driving a skeleton
        // land on joints and never reach a part
        let missing_clips = missing_clips(&ACTIONS, &clip_names(&cpu_model));
        if !missing_clips.is_empty() {
            log::warn!(
                "The fox model cannot play {}; it will stand still",
                missing_clips.join(", ")
            );
        }

        let model = Model::<PhysicalMaterial>::new(ctx.context, &cpu_model)?;
        let actions = AnimationActions::new(ACTIONS)
            .ok_or_else(|| anyhow::anyhow!("the fox has no animation actions"))?;

        let mut fox = Self {
            model,
            actions,
            missing_clips,
        };
        fox.choose_clip();
        log::debug!("Fox created, playing `{}`", fox.actions.current());
        Ok(fox)
    }

    /// Restarts the named action. Unknown names keep the current one playing.
    pub fn play(&mut self, action: &str) {
        if self.actions.play(action) {
            self.choose_clip();
        }
    }

    pub fn update(&mut self, delta_secs: f32) {
        self.actions.update(delta_secs);
        self.model.animate(self.actions.time());
    }

    pub fn current_action(&self) -> &str {
        self.actions.current()
    }

    pub fn missing_clips(&self) -> &[String] {
        &self.missing_clips
    }

    fn choose_clip(&mut self) {
        let clip = self.actions.current_clip();
        if self.missing_clips.iter().any(|missing| missing == clip) {
            return;
        }
        for part in self.model.iter_mut() {
            part.choose_animation(Some(clip));
        }
    }
}

#[cfg(test)]
mod tests {
    use experience::tweak::TweakValue;

    use super::*;

    #[test]
    fn buttons_request_actions() {
        let tweaks = fox_tweaks();
        let mut controls = FoxControls::default();
        tweaks
            .apply(&mut controls, "playRunning", TweakValue::Press)
            .unwrap();
        assert_eq!(controls.requested, Some("run"));
        tweaks
            .apply(&mut controls, "playIdle", TweakValue::Press)
            .unwrap();
        assert_eq!(controls.requested, Some("idle"));
    }

    #[test]
    fn idle_plays_first() {
        let actions = AnimationActions::new(ACTIONS).unwrap();
        assert_eq!(actions.current(), "idle");
        assert_eq!(actions.current_clip(), "Survey");
    }

    #[test]
    fn clips_absent_from_the_model_are_reported() {
        let available: HashSet<String> = ["Survey".to_string(), "Run".to_string()].into();
        assert_eq!(missing_clips(&ACTIONS, &available), vec!["Walk".to_string()]);

        // a skinned model exposes no clips on its parts
        assert_eq!(missing_clips(&ACTIONS, &HashSet::new()).len(), 3);
    }
}
