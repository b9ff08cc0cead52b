use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ToastLevel {
    #[default]
    Info,
    Error,
}

// short-lived notification at the top of the viewport
#[derive(Event, Clone, Debug, PartialEq)]
pub struct ToastEvent {
    pub message: String,
    pub level: ToastLevel,
}

impl ToastEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self { message: message.into(), level: ToastLevel::Info }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { message: message.into(), level: ToastLevel::Error }
    }
}

#[derive(Resource)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub timer: f32,
    pub duration: f32,
}

impl Default for Toast {
    fn default() -> Self {
        Self {
            message: String::new(),
            level: ToastLevel::Info,
            timer: 0.0,
            duration: 3.0,
        }
    }
}

impl Toast {
    // latest message wins, the timer restarts
    pub fn show(&mut self, event: &ToastEvent) {
        self.message = event.message.clone();
        self.level = event.level;
        self.timer = self.duration;
    }

    pub fn tick(&mut self, delta: f32) {
        self.timer = (self.timer - delta).max(0.0);
    }

    pub fn alpha(&self) -> f32 {
        (self.timer / self.duration).clamp(0.0, 1.0)
    }
}

pub fn update_toast(
    mut toast: ResMut<Toast>,
    mut events: EventReader<ToastEvent>,
    time: Res<Time>,
) {
    for event in events.read() {
        toast.show(event);
    }

    if toast.timer > 0.0 {
        toast.tick(time.delta_secs());
    }
}

pub fn render_toast(
    toast: Res<Toast>,
    mut contexts: EguiContexts,
) {
    if toast.timer <= 0.0 {
        return;
    }

    if let Ok(ctx) = contexts.ctx_mut() {
        let alpha = toast.alpha();
        let bg_color = match toast.level {
            ToastLevel::Info => egui::Color32::from_rgb(45, 72, 116),
            ToastLevel::Error => egui::Color32::from_rgb(180, 60, 60),
        };

        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 60.0))
            .show(ctx, |ui| {
                let frame = egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(
                        bg_color.r(), bg_color.g(), bg_color.b(),
                        (200.0 * alpha) as u8
                    ))
                    .stroke(egui::Stroke::new(
                        1.5,
                        egui::Color32::from_rgba_unmultiplied(255, 255, 255, (180.0 * alpha) as u8)
                    ))
                    .inner_margin(egui::Margin::symmetric(16, 8))
                    .corner_radius(egui::CornerRadius::same(6));

                frame.show(ui, |ui| {
                    ui.label(egui::RichText::new(&toast.message)
                        .size(14.0)
                        .color(egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8))
                        .strong());
                });
            });
    }
}
