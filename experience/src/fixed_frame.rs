/// Turns measured frame times into a number of fixed-size simulation steps.
///
/// The first frame always yields one step. Later frames yield as many steps
/// as fit into the time since the last step, capped at `max_substeps`; time
/// beyond the cap is dropped instead of carried into the next frame.
pub struct FixedFrameGenerator {
    step: f32,
    max_substeps: usize,
    last_time: f32,
    first_frame: bool,
}

impl FixedFrameGenerator {
    #[inline]
    pub fn new(time_step: f32) -> Self {
        Self {
            step: time_step,
            max_substeps: 3,
            last_time: 0.0,
            first_frame: true,
        }
    }

    #[inline]
    pub fn with_max_substeps(mut self, max_substeps: usize) -> Self {
        self.max_substeps = max_substeps.max(1);
        self
    }

    #[inline]
    pub fn time_step(&self) -> f32 {
        self.step
    }

    pub fn set_time_step(&mut self, time_step: f32) {
        self.step = time_step;
    }

    pub fn set_max_substeps(&mut self, max_substeps: usize) {
        self.max_substeps = max_substeps.max(1);
    }

    /// Number of steps to run for a frame at `current_time` seconds.
    pub fn advance(&mut self, current_time: f32) -> usize {
        if self.first_frame {
            self.first_frame = false;
            self.last_time = current_time;
            return 1;
        }

        let mut lag = current_time - self.last_time;
        let mut steps = 0;
        while lag >= self.step && steps < self.max_substeps {
            lag -= self.step;
            steps += 1;
        }
        if lag >= self.step {
            log::trace!("Dropping {:.3}s of simulation time", lag - lag % self.step);
            lag %= self.step;
        }
        self.last_time = current_time - lag;
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_follow_measured_time() {
        let mut frames = FixedFrameGenerator::new(0.125).with_max_substeps(3);
        assert_eq!(frames.advance(0.0), 1);
        assert_eq!(frames.advance(0.0625), 0);
        assert_eq!(frames.advance(0.25), 2);
        assert_eq!(frames.advance(0.3125), 0);
        assert_eq!(frames.advance(0.375), 1);
    }

    #[test]
    fn long_frames_are_capped_and_not_carried_over() {
        let mut frames = FixedFrameGenerator::new(0.125).with_max_substeps(3);
        assert_eq!(frames.advance(0.0), 1);
        assert_eq!(frames.advance(2.0), 3);
        assert_eq!(frames.advance(2.0625), 0);
        assert_eq!(frames.advance(2.125), 1);
    }
}
