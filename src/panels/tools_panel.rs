use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::PaintApp;
use crate::command::Command;
use crate::filter::{FilterKind, PRESETS};
use crate::library::RECENT_GENERATIONS_LIMIT;
use crate::tools::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE, ShapeKind, ToolMode};

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let mut commands = Vec::new();
                let session = app.session();
                let drawing = *session.drawing();
                let filters = *session.filters();
                let enabled = session.has_image();

                ui.heading("Draw");
                ui.horizontal(|ui| {
                    for mode in ToolMode::ALL {
                        if ui.selectable_label(drawing.mode == mode, mode.label()).clicked() {
                            commands.push(Command::SetTool(mode));
                        }
                    }
                });
                ui.horizontal(|ui| {
                    for shape in ShapeKind::ALL {
                        if ui.selectable_label(drawing.shape == shape, shape.label()).clicked() {
                            commands.push(Command::SetShape(shape));
                            commands.push(Command::SetTool(ToolMode::Shape));
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Color:");
                    let mut color = drawing.color;
                    if color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                        commands.push(Command::SetColor(color));
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Size:");
                    if ui.small_button("-").clicked() {
                        commands.push(Command::SetBrushSize(drawing.brush_size - 1.0));
                    }
                    let mut size = drawing.brush_size;
                    if ui
                        .add(egui::Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).step_by(1.0))
                        .changed()
                    {
                        commands.push(Command::SetBrushSize(size));
                    }
                    if ui.small_button("+").clicked() {
                        commands.push(Command::SetBrushSize(drawing.brush_size + 1.0));
                    }
                });

                ui.separator();
                ui.heading("Adjust");
                ui.add_enabled_ui(enabled, |ui| {
                    for kind in FilterKind::ALL {
                        let mut value = filters.get(kind);
                        let slider = egui::Slider::new(&mut value, kind.range())
                            .step_by(1.0)
                            .text(kind.name());
                        if ui.add(slider).changed() {
                            commands.push(Command::ApplyFilter { kind, value });
                        }
                    }
                    if ui.button("Reset filters").clicked() {
                        commands.push(Command::ResetFilters);
                    }
                });

                ui.separator();
                egui::CollapsingHeader::new("Effects")
                    .default_open(app.show_presets)
                    .show(ui, |ui| {
                        egui::Grid::new("preset_grid").num_columns(4).show(ui, |ui| {
                            for (i, preset) in PRESETS.iter().enumerate() {
                                if ui.add_enabled(enabled, egui::Button::new(preset.name)).clicked() {
                                    commands.push(Command::ApplyPreset(preset));
                                }
                                if i % 4 == 3 {
                                    ui.end_row();
                                }
                            }
                        });
                    });

                ui.horizontal(|ui| {
                    ui.label("Rotate:");
                    if ui.add_enabled(enabled, egui::Button::new("⟲ 90°")).clicked() {
                        commands.push(Command::Rotate(-90.0));
                    }
                    if ui.add_enabled(enabled, egui::Button::new("⟳ 90°")).clicked() {
                        commands.push(Command::Rotate(90.0));
                    }
                });

                ui.separator();
                ui.heading("History");
                ui.horizontal(|ui| {
                    if ui.add_enabled(session.can_undo(), egui::Button::new("Undo")).clicked() {
                        commands.push(Command::Undo);
                    }
                    if ui.add_enabled(session.can_redo(), egui::Button::new("Redo")).clicked() {
                        commands.push(Command::Redo);
                    }
                });
                if let Some(history) = session.history() {
                    ui.label(format!("Snapshot {} of {}", history.cursor() + 1, history.len()));
                    ui.label(format!(
                        "Memory: {:.1} MB",
                        history.memory_usage() as f64 / (1024.0 * 1024.0)
                    ));
                }

                ui.separator();
                egui::CollapsingHeader::new("Library")
                    .default_open(false)
                    .show(ui, |ui| {
                        let recent = app.library().recent_generations(RECENT_GENERATIONS_LIMIT);
                        if recent.is_empty() {
                            ui.weak("No generations yet");
                        }
                        for generation in recent {
                            ui.hyperlink_to(generation.prompt.as_str(), &generation.image_url);
                        }
                    });

                ui.separator();
                let export_clicked = ui.add_enabled(enabled, egui::Button::new("Export PNG")).clicked();
                if let Some(status) = app.status() {
                    ui.label(status);
                }

                for command in commands {
                    app.execute_command(command);
                }
                if export_clicked {
                    app.export();
                }
            });
        });
}
