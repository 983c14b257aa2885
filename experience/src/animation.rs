/// Named actions mapped onto animation clips, one of them playing.
///
/// Playing an action restarts its clip from the beginning; `update` advances
/// the clip-local time.
pub struct AnimationActions {
    actions: Vec<(String, String)>,
    current: usize,
    time: f32,
}

impl AnimationActions {
    /// `actions` pairs an action name with the clip it plays. The first
    /// action starts playing. Returns `None` when there is nothing to play.
    pub fn new<A, C>(actions: impl IntoIterator<Item = (A, C)>) -> Option<Self>
    where
        A: Into<String>,
        C: Into<String>,
    {
        let actions: Vec<(String, String)> = actions
            .into_iter()
            .map(|(action, clip)| (action.into(), clip.into()))
            .collect();
        if actions.is_empty() {
            return None;
        }
        Some(Self {
            actions,
            current: 0,
            time: 0.0,
        })
    }

    pub fn play(&mut self, action: &str) -> bool {
        match self.actions.iter().position(|(name, _)| name == action) {
            Some(index) => {
                log::debug!("Playing `{}`", action);
                self.current = index;
                self.time = 0.0;
                true
            }
            None => {
                log::warn!("No animation action named `{}`", action);
                false
            }
        }
    }

    pub fn update(&mut self, delta_secs: f32) {
        self.time += delta_secs;
    }

    pub fn current(&self) -> &str {
        &self.actions[self.current].0
    }

    pub fn current_clip(&self) -> &str {
        &self.actions[self.current].1
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|(name, _)| name.as_str())
    }
}
