/// Frames per second averaged over windows of about one second.
#[derive(Default)]
pub struct FPSCounter {
    frame_count: usize,
    window_ms: f64,
    fps: u32,
}

impl FPSCounter {
    /// Counts one frame that took `elapsed_ms` milliseconds.
    pub fn update(&mut self, elapsed_ms: f64) {
        self.frame_count += 1;
        self.window_ms += elapsed_ms;
        if self.window_ms > 1000.0 {
            self.fps = (self.frame_count as f64 * 1000.0 / self.window_ms) as u32;
            self.frame_count = 0;
            self.window_ms = 0.0;
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}
