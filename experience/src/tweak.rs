//! Declarative tables of live-editable parameters.
//!
//! A [`TweakFolder`] lists, for one target type, every tunable value with
//! its label, accessors and range. A panel walks the table to draw widgets
//! and feeds edits back through [`TweakFolder::apply`].

use std::ops::RangeInclusive;

use crate::TweakError;

pub enum Control<T> {
    Slider {
        label: &'static str,
        range: RangeInclusive<f32>,
        step: f32,
        get: fn(&T) -> f32,
        set: fn(&mut T, f32),
    },
    Toggle {
        label: &'static str,
        get: fn(&T) -> bool,
        set: fn(&mut T, bool),
    },
    Color {
        label: &'static str,
        get: fn(&T) -> [u8; 3],
        set: fn(&mut T, [u8; 3]),
    },
    Button {
        label: &'static str,
        action: fn(&mut T),
    },
}

impl<T> Control<T> {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Slider { label, .. }
            | Control::Toggle { label, .. }
            | Control::Color { label, .. }
            | Control::Button { label, .. } => *label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweakValue {
    Number(f32),
    Bool(bool),
    Color([u8; 3]),
    Press,
}

impl TweakValue {
    fn kind(&self) -> &'static str {
        match self {
            TweakValue::Number(_) => "number",
            TweakValue::Bool(_) => "bool",
            TweakValue::Color(_) => "color",
            TweakValue::Press => "press",
        }
    }
}

pub struct TweakFolder<T> {
    name: &'static str,
    controls: Vec<Control<T>>,
    on_change: Option<fn(&mut T)>,
}

impl<T> TweakFolder<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            controls: vec![],
            on_change: None,
        }
    }

    pub fn slider(
        mut self,
        label: &'static str,
        range: RangeInclusive<f32>,
        step: f32,
        get: fn(&T) -> f32,
        set: fn(&mut T, f32),
    ) -> Self {
        self.controls.push(Control::Slider {
            label,
            range,
            step,
            get,
            set,
        });
        self
    }

    pub fn toggle(mut self, label: &'static str, get: fn(&T) -> bool, set: fn(&mut T, bool)) -> Self {
        self.controls.push(Control::Toggle { label, get, set });
        self
    }

    pub fn color(
        mut self,
        label: &'static str,
        get: fn(&T) -> [u8; 3],
        set: fn(&mut T, [u8; 3]),
    ) -> Self {
        self.controls.push(Control::Color { label, get, set });
        self
    }

    pub fn button(mut self, label: &'static str, action: fn(&mut T)) -> Self {
        self.controls.push(Control::Button { label, action });
        self
    }

    /// Runs after every value change, for updates derived from the edited value.
    pub fn on_change(mut self, on_change: fn(&mut T)) -> Self {
        self.on_change = Some(on_change);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn controls(&self) -> &[Control<T>] {
        &self.controls
    }

    /// Writes `value` through the control labelled `label`. Numbers are
    /// clamped to the slider range and snapped to its step.
    pub fn apply(&self, target: &mut T, label: &str, value: TweakValue) -> Result<(), TweakError> {
        let control = self
            .controls
            .iter()
            .find(|control| control.label() == label)
            .ok_or_else(|| TweakError::UnknownControl(label.to_string()))?;

        match (control, value) {
            (
                Control::Slider {
                    range, step, set, ..
                },
                TweakValue::Number(number),
            ) => set(target, snap(number, range, *step)),
            (Control::Toggle { set, .. }, TweakValue::Bool(flag)) => set(target, flag),
            (Control::Color { set, .. }, TweakValue::Color(color)) => set(target, color),
            (Control::Button { action, .. }, TweakValue::Press) => {
                action(target);
                return Ok(());
            }
            _ => {
                return Err(TweakError::Mismatch {
                    label: label.to_string(),
                    value: value.kind(),
                })
            }
        }

        if let Some(on_change) = self.on_change {
            on_change(target);
        }
        Ok(())
    }
}

pub fn snap(value: f32, range: &RangeInclusive<f32>, step: f32) -> f32 {
    let (min, max) = (*range.start(), *range.end());
    let clamped = value.clamp(min, max);
    if step > 0.0 {
        (min + ((clamped - min) / step).round() * step).clamp(min, max)
    } else {
        clamped
    }
}
