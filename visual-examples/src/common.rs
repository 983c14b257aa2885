use three_d::{Camera, Context, FrameInput};

pub trait Demo {
    fn name(&self) -> &'static str;
    /// Identifier accepted by `--demo`.
    fn id(&self) -> &'static str;
    fn restart(&mut self, context: &Context) -> anyhow::Result<()>;
    fn on_frame_loop(&mut self, camera: &mut Camera, frame_input: &FrameInput) -> DemoLoopResult;
    fn show_options_gui(&mut self, ui: &mut three_d::egui::Ui);

    /// Demos placing the camera themselves bypass the orbit control.
    fn drives_camera(&self) -> bool {
        false
    }
}

pub struct DemoLoopResult {
    pub updated: bool,
    pub step_cost: std::time::Duration,
}

impl DemoLoopResult {
    pub fn not_updated() -> Self {
        Self {
            updated: false,
            step_cost: std::time::Duration::default(),
        }
    }
}
