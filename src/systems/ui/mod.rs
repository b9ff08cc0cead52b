use bevy::prelude::*;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::error::ConfigError;
use crate::systems::export::ExportEvent;
use crate::systems::interaction::{ViewPreset, ViewPresetEvent};
use crate::systems::roof::palette;
use crate::systems::roof::{Accessory, Configurator, HexColor, RoofMaterial, RoofType};

pub mod indicator;

// re-export the main items that other modules need
pub use indicator::{Toast, ToastEvent, ToastLevel};
pub use indicator::{render_toast, update_toast};

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(Toast::default())
            .add_event::<ToastEvent>()
            .add_systems(Update, update_toast)
            .add_systems(EguiPrimaryContextPass, (ui_main, fps, render_toast)); // UI rendering here
    }
}

fn swatch_color(color: HexColor) -> egui::Color32 {
    let [r, g, b] = color.channels();
    egui::Color32::from_rgb(r, g, b)
}

// rejected parameters end up in the log and on screen, the state stays as it was
fn report(result: Result<(), ConfigError>, toasts: &mut EventWriter<ToastEvent>) {
    if let Err(err) = result {
        warn!("rejected parameter: {}", err);
        toasts.write(ToastEvent::error(err.to_string()));
    }
}

fn ui_main(
    mut contexts: EguiContexts,
    mut config: ResMut<Configurator>,
    mut export_events: EventWriter<ExportEvent>,
    mut view_events: EventWriter<ViewPresetEvent>,
    mut toasts: EventWriter<ToastEvent>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::SidePanel::left("config_panel")
            .default_width(260.0)
            .min_width(240.0)
            .max_width(400.0)
            .resizable(true)
            .show(ctx, |ui| {
                let params = *config.parameters();

                // camera
                ui.label("Camera: ");
                ui.label("LMB drag - Orbit");
                ui.label("Scroll - Zoom");

                ui.separator();

                // roof shape
                ui.label("Roof Type:");
                ui.horizontal_wrapped(|ui| {
                    for roof_type in RoofType::ALL {
                        if ui.selectable_label(params.roof_type == roof_type, roof_type.label()).clicked() {
                            config.set_roof_type(roof_type);
                        }
                    }
                });

                ui.separator();

                ui.label("Material:");
                ui.horizontal_wrapped(|ui| {
                    for material in RoofMaterial::ALL {
                        if ui.selectable_label(params.material == material, material.label()).clicked() {
                            config.set_material(material);
                        }
                    }
                });

                // palette of the active material, names on hover
                ui.label("Color:");
                ui.horizontal_wrapped(|ui| {
                    for swatch in palette::palette(params.material) {
                        let selected = swatch.color == params.color;
                        let stroke = if selected {
                            egui::Stroke::new(2.5, egui::Color32::WHITE)
                        } else {
                            egui::Stroke::new(1.0, egui::Color32::from_gray(60))
                        };
                        let button = egui::Button::new("")
                            .fill(swatch_color(swatch.color))
                            .stroke(stroke)
                            .min_size(egui::vec2(28.0, 28.0));
                        if ui.add(button)
                            .on_hover_text(format!("{} ({})", swatch.name, swatch.color))
                            .clicked() {
                            report(config.select_color(swatch.color), &mut toasts);
                        }
                    }
                });

                ui.separator();

                // pitch is kept for flat roofs but has no effect there
                let sloped = params.roof_type.is_sloped();
                let range = config.pitch_range();
                let mut pitch = params.pitch_degrees as i32;
                let slider = egui::Slider::new(&mut pitch, *range.start() as i32..=*range.end() as i32)
                    .text("Pitch")
                    .suffix("°");
                if ui.add_enabled(sloped, slider)
                    .on_disabled_hover_text("Flat roofs have no pitch")
                    .changed() {
                    report(config.set_pitch(pitch), &mut toasts);
                }

                ui.separator();

                ui.label("Accessories:");
                let stored = config.active_parameters().accessories;
                for kind in Accessory::ALL {
                    let mut enabled = stored.get(kind);
                    let mut checkbox = ui.checkbox(&mut enabled, kind.label());
                    if kind.needs_slope() && !sloped {
                        checkbox = checkbox.on_hover_text("Hidden on flat roofs");
                    }
                    if checkbox.changed() {
                        config.set_accessory(kind, enabled);
                    }
                }

                ui.separator();

                ui.label("View:");
                ui.horizontal_wrapped(|ui| {
                    for preset in ViewPreset::ALL {
                        if ui.button(preset.label()).clicked() {
                            view_events.write(ViewPresetEvent(preset));
                        }
                    }
                });

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("Reset")
                        .on_hover_text("Back to a 35° gable roof in terracotta tiles, no accessories")
                        .clicked() {
                        config.reset_to_defaults();
                    }
                    let save = egui::Button::new("Save configuration")
                        .fill(egui::Color32::from_rgb(45, 72, 116));
                    if ui.add(save)
                        .on_hover_text("Writes a screenshot, a JSON record and a summary to the exports folder")
                        .clicked() {
                        export_events.write(ExportEvent);
                    }
                });

                ui.separator();
                ui.label("ESC - Exit");
            });
    }
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                    if let Some(fps) = diagnostics
                        .get(&FrameTimeDiagnosticsPlugin::FPS)
                        .and_then(|d| d.smoothed())
                    {
                        ui.label(egui::RichText::new(format!("{:.0}", fps))
                            .size(26.0)
                            .color(egui::Color32::WHITE));
                    }
                });
            });
    }
}
