mod cube_group_demo;
mod falling_bodies_demo;
mod fox_world_demo;

use std::{collections::VecDeque, time::Duration};

use anyhow::anyhow;
use experience::FPSCounter;
use three_d::{Camera, Event, FrameInput, Key};

use crate::{common::Demo, settings::Settings};

use self::{
    cube_group_demo::CubeGroupDemo, falling_bodies_demo::FallingBodiesDemo,
    fox_world_demo::FoxWorldDemo,
};

pub struct DemoEntry {
    gui: three_d::GUI,
    demos: Vec<Box<dyn Demo>>,
    selected_demo_index: Option<usize>,
    show_options: bool,
    fps_counter: FPSCounter,
    stats: Stats,
    error: Option<String>,
}

impl DemoEntry {
    pub fn new(context: &three_d::Context, settings: &Settings) -> anyhow::Result<Self> {
        let gui = three_d::GUI::new(context);
        let mut slf = Self {
            gui,
            demos: vec![],
            selected_demo_index: None,
            show_options: settings.debug,
            fps_counter: FPSCounter::default(),
            stats: Stats::default(),
            error: None,
        };
        slf.add_demo(CubeGroupDemo::default());
        slf.add_demo(FallingBodiesDemo::default());
        slf.add_demo(FoxWorldDemo::new(
            settings.assets.clone(),
            settings.fox_world_sources()?,
            settings.debug,
        ));

        if let Some(id) = &settings.demo {
            let index = slf
                .demos
                .iter()
                .position(|demo| demo.id() == id)
                .ok_or_else(|| {
                    let ids: Vec<_> = slf.demos.iter().map(|demo| demo.id()).collect();
                    anyhow!("unknown demo `{}`, expected one of {}", id, ids.join(", "))
                })?;
            slf.selected_demo_index = Some(index);
            slf.restart(context);
        }
        Ok(slf)
    }

    pub fn add_demo(&mut self, demo: impl Demo + 'static) {
        self.demos.push(Box::new(demo));
    }

    pub fn drives_camera(&self) -> bool {
        self.selected_demo_index
            .map(|index| self.demos[index].drives_camera())
            .unwrap_or(false)
    }

    fn restart(&mut self, context: &three_d::Context) {
        self.stats = Stats::default();
        self.error = None;
        if let Some(index) = self.selected_demo_index {
            let demo = &mut self.demos[index];
            log::info!("Starting {}", demo.name());
            if let Err(err) = demo.restart(context) {
                log::error!("Failed to start {}: {:#}", demo.name(), err);
                self.error = Some(format!("{err:#}"));
            }
        }
    }

    pub fn render_loop(
        &mut self,
        context: &three_d::Context,
        camera: &mut Camera,
        frame_input: &mut FrameInput,
    ) {
        let mut restart_requested = false;
        for event in &frame_input.events {
            if let Event::KeyPress {
                kind,
                handled: false,
                ..
            } = event
            {
                match kind {
                    Key::R => restart_requested = true,
                    Key::H => self.show_options = !self.show_options,
                    _ => {}
                }
            }
        }

        if let Some(index) = self.selected_demo_index {
            let demo = &mut self.demos[index];
            let result = demo.on_frame_loop(camera, frame_input);
            if result.updated {
                self.stats.add_step_cost(result.step_cost);
            }
        }
        self.fps_counter.update(frame_input.elapsed_time);

        self.gui.update(
            &mut frame_input.events,
            frame_input.accumulated_time,
            frame_input.viewport,
            frame_input.device_pixel_ratio,
            |gui_context| {
                use three_d::egui::*;
                SidePanel::left("panel").show(gui_context, |ui| {
                    let select_text = self
                        .selected_demo_index
                        .map(|index| self.demos[index].name())
                        .unwrap_or("[Select a demo]");
                    ComboBox::from_label("")
                        .selected_text(select_text)
                        .show_ui(ui, |ui| {
                            for (index, demo) in self.demos.iter().enumerate() {
                                let r = ui.selectable_value(
                                    &mut self.selected_demo_index,
                                    Some(index),
                                    demo.name(),
                                );
                                if r.changed() && Some(index) == self.selected_demo_index {
                                    restart_requested = true;
                                }
                            }
                        });

                    if ui.button("restart").clicked() {
                        restart_requested = true;
                    }
                    ui.checkbox(&mut self.show_options, "options");

                    if let Some(error) = &self.error {
                        ui.colored_label(Color32::RED, error);
                    }

                    if self.show_options {
                        if let Some(index) = self.selected_demo_index {
                            self.demos[index].show_options_gui(ui);
                        }
                    }
                });

                Area::new("screen_overlay").show(gui_context, |ui| {
                    ui.vertical(|ui| {
                        ui.colored_label(Rgba::BLACK, format!("fps: {}", self.fps_counter.fps()));
                        ui.colored_label(
                            Rgba::BLACK,
                            format!(
                                "step: {:.2} ms",
                                self.stats.avg_step_cost().as_secs_f64() * 1000.0
                            ),
                        );
                    });
                });
            },
        );

        if restart_requested {
            self.restart(context);
        }
        if let Err(err) = frame_input.screen().write(|| self.gui.render()) {
            log::error!("Failed to render the panel: {}", err);
        }
    }
}

const STATS_WINDOW: usize = 60;

#[derive(Default)]
struct Stats {
    step_costs: VecDeque<Duration>,
    sum_step_costs: Duration,
}

impl Stats {
    pub fn add_step_cost(&mut self, cost: Duration) {
        if self.step_costs.len() == STATS_WINDOW {
            if let Some(oldest) = self.step_costs.pop_front() {
                self.sum_step_costs -= oldest;
            }
        }
        self.step_costs.push_back(cost);
        self.sum_step_costs += cost;
    }

    pub fn avg_step_cost(&self) -> Duration {
        if self.step_costs.is_empty() {
            return Duration::default();
        }
        self.sum_step_costs / self.step_costs.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_cost_averages_a_sliding_window() {
        let mut stats = Stats::default();
        assert_eq!(stats.avg_step_cost(), Duration::ZERO);
        for _ in 0..STATS_WINDOW {
            stats.add_step_cost(Duration::from_millis(4));
        }
        assert_eq!(stats.avg_step_cost(), Duration::from_millis(4));
        for _ in 0..STATS_WINDOW {
            stats.add_step_cost(Duration::from_millis(2));
        }
        assert_eq!(stats.avg_step_cost(), Duration::from_millis(2));
        assert_eq!(stats.step_costs.len(), STATS_WINDOW);
    }
}
