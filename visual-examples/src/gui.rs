use experience::tweak::{Control, TweakFolder, TweakValue};

/// Draws one widget per control of `folder` and writes edits into `target`.
/// Returns whether anything was applied this frame.
pub fn show_folder<T>(ui: &mut three_d::egui::Ui, folder: &TweakFolder<T>, target: &mut T) -> bool {
    use three_d::egui::*;
    let mut changed = false;
    CollapsingHeader::new(folder.name())
        .default_open(true)
        .show(ui, |ui| {
            for control in folder.controls() {
                let edit = match control {
                    Control::Slider {
                        label,
                        range,
                        step,
                        get,
                        ..
                    } => {
                        let mut value = get(target);
                        let response = Slider::new(&mut value, range.clone())
                            .text(*label)
                            .clamp_to_range(true)
                            .step_by(*step as f64)
                            .ui(ui);
                        response.changed().then_some(TweakValue::Number(value))
                    }
                    Control::Toggle { label, get, .. } => {
                        let mut flag = get(target);
                        ui.checkbox(&mut flag, *label)
                            .changed()
                            .then_some(TweakValue::Bool(flag))
                    }
                    Control::Color { label, get, .. } => {
                        let mut color = get(target);
                        let response = ui
                            .horizontal(|ui| {
                                let response = ui.color_edit_button_srgb(&mut color);
                                ui.label(*label);
                                response
                            })
                            .inner;
                        response.changed().then_some(TweakValue::Color(color))
                    }
                    Control::Button { label, .. } => {
                        ui.button(*label).clicked().then_some(TweakValue::Press)
                    }
                };

                if let Some(value) = edit {
                    match folder.apply(target, control.label(), value) {
                        Ok(()) => changed = true,
                        Err(err) => log::warn!("{}", err),
                    }
                }
            }
        });
    changed
}
