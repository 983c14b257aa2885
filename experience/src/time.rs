/// Frame clock fed with the host's accumulated time.
#[derive(Debug, Clone, Copy)]
pub struct Time {
    elapsed_ms: f64,
    delta_ms: f64,
    started: bool,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            elapsed_ms: 0.0,
            // one 60Hz frame until the second tick
            delta_ms: 16.0,
            started: false,
        }
    }
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, accumulated_ms: f64) {
        if self.started {
            self.delta_ms = (accumulated_ms - self.elapsed_ms).max(0.0);
        }
        self.started = true;
        self.elapsed_ms = accumulated_ms;
    }

    #[inline]
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    #[inline]
    pub fn delta_secs(&self) -> f32 {
        (self.delta_ms * 0.001) as f32
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms * 0.001) as f32
    }
}
