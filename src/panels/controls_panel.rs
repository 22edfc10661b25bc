use std::ops::RangeInclusive;

use crate::PaintApp;
use crate::command::Command;
use crate::options::{Options, OptionsPatch, SettingsPatch};

/// Always-visible row of session actions.
pub fn toolbar(app: &mut PaintApp, ctx: &egui::Context) {
    let session = app.session();
    let idle = session.app_state().is_idle();
    let mut commands = Vec::new();

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let label = if session.settings().show_controls {
                "Hide Controls"
            } else {
                "Controls"
            };
            if ui.add_enabled(idle, egui::Button::new(label)).clicked() {
                commands.push(Command::ToggledControls);
            }

            ui.separator();

            if ui
                .add_enabled(idle && session.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                commands.push(Command::Undo);
            }
            if ui
                .add_enabled(idle && session.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                commands.push(Command::Redo);
            }
            if ui
                .add_enabled(idle && !session.marks().is_empty(), egui::Button::new("Clear"))
                .clicked()
            {
                commands.push(Command::ClearedCanvas);
            }

            ui.separator();

            if ui.add_enabled(idle, egui::Button::new("Copy SVG")).clicked() {
                commands.push(Command::CopyRequested);
            }
        });
    });

    for command in commands {
        app.dispatch(command);
    }
}

/// Side panel with the stroke options and display settings.
pub fn controls_panel(app: &mut PaintApp, ctx: &egui::Context) {
    let session = app.session();
    if !session.settings().show_controls {
        return;
    }

    let options = *session.options();
    let settings = *session.settings();
    let mut commands = Vec::new();

    egui::SidePanel::right("controls_panel")
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Options");
            ui.separator();

            let mut patch = OptionsPatch::default();
            egui::Grid::new("options_grid")
                .num_columns(2)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    patch.clip = checkbox_row(ui, "Clip Path", options.clip);
                    patch.streamline =
                        slider_row(ui, "Streamline", options.streamline, Options::STREAMLINE_RANGE);
                    patch.size = slider_row(ui, "Size", options.size, Options::SIZE_RANGE);
                    patch.thinning =
                        slider_row(ui, "Thinning", options.thinning, Options::THINNING_RANGE);
                    patch.smoothing =
                        slider_row(ui, "Smooth", options.smoothing, Options::SMOOTHING_RANGE);
                    patch.simulate_pressure =
                        checkbox_row(ui, "Simulate Pressure", options.simulate_pressure);

                    if checkbox_row(ui, "Dark Mode", settings.dark_mode).is_some() {
                        commands.push(Command::ToggledDarkMode);
                    }
                    if let Some(show_trace) = checkbox_row(ui, "Show Path", settings.show_trace) {
                        commands.push(Command::ChangedSettings(SettingsPatch {
                            show_trace: Some(show_trace),
                            ..Default::default()
                        }));
                    }
                });

            if patch != OptionsPatch::default() {
                commands.push(Command::ChangedOptions(patch));
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Reset").clicked() {
                    commands.push(Command::ResetOptions);
                }
                if ui.button("Close").clicked() {
                    commands.push(Command::ToggledControls);
                }
            });
        });

    for command in commands {
        app.dispatch(command);
    }
}

/// Shows the clipboard message, if any, with a way to dismiss it.
pub fn message_panel(app: &mut PaintApp, ctx: &egui::Context) {
    let Some(message) = app.session().clipboard_message().cloned() else {
        return;
    };

    let mut dismissed = false;
    egui::TopBottomPanel::bottom("clipboard_message").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if message.error {
                ui.colored_label(ui.visuals().error_fg_color, &message.message);
            } else {
                ui.label(&message.message);
            }
            if ui.small_button("✖").clicked() {
                dismissed = true;
            }
        });
    });

    if dismissed {
        app.dispatch(Command::ClearedClipboardMessage);
    }
}

/// Returns the new value if the user changed it.
fn checkbox_row(ui: &mut egui::Ui, label: &str, value: bool) -> Option<bool> {
    let mut value = value;
    ui.label(label);
    let changed = ui.checkbox(&mut value, "").changed();
    ui.end_row();
    changed.then_some(value)
}

/// Returns the new value if the user changed it.
fn slider_row(ui: &mut egui::Ui, label: &str, value: f64, range: RangeInclusive<f64>) -> Option<f64> {
    let mut value = value;
    ui.label(label);
    let changed = ui.add(egui::Slider::new(&mut value, range)).changed();
    ui.end_row();
    changed.then_some(value)
}
