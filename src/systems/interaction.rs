use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, FRAC_PI_6, FRAC_PI_8};

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::config::*;

// spherical orbit around the house
// theta = azimuth in the XZ plane, phi = polar angle from +Y
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub theta: f32,
    pub phi: f32,
    pub distance: f32,
    pub target: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let mut camera = Self {
            theta: 0.0,
            phi: 0.0,
            distance: 0.0,
            target: Vec3::new(0.0, CAMERA_TARGET_HEIGHT, 0.0),
        };
        camera.apply_view(ViewPreset::Reset);
        camera
    }
}

// the four framing buttons of the panel
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewPreset {
    Front,
    Top,
    Side,
    Reset,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 4] = [ViewPreset::Front, ViewPreset::Top, ViewPreset::Side, ViewPreset::Reset];

    pub fn label(self) -> &'static str {
        match self {
            ViewPreset::Front => "Front",
            ViewPreset::Top => "Top",
            ViewPreset::Side => "Side",
            ViewPreset::Reset => "Reset view",
        }
    }

    // (theta, phi, distance)
    fn orbit(self) -> (f32, f32, f32) {
        match self {
            ViewPreset::Front => (0.0, FRAC_PI_4, 25.0),
            ViewPreset::Top => (FRAC_PI_4, FRAC_PI_8, 30.0),
            ViewPreset::Side => (FRAC_PI_2, FRAC_PI_4, 25.0),
            ViewPreset::Reset => (FRAC_PI_4, FRAC_PI_6, 30.0),
        }
    }
}

// fired by the panel, consumed by the camera
#[derive(Event, Clone, Copy, Debug)]
pub struct ViewPresetEvent(pub ViewPreset);

impl OrbitCamera {
    pub fn apply_view(&mut self, preset: ViewPreset) {
        let (theta, phi, distance) = preset.orbit();
        self.theta = theta;
        self.phi = phi;
        self.distance = distance;
    }

    /// Drag in pixels; horizontal spins around the house, vertical tilts
    pub fn rotate(&mut self, delta: Vec2) {
        self.theta += delta.x * CAMERA_ROTATE_SPEED;
        self.phi = (self.phi + delta.y * CAMERA_ROTATE_SPEED)
            .clamp(CAMERA_POLAR_MARGIN, FRAC_PI_2 - CAMERA_POLAR_MARGIN);
    }

    /// Positive moves away from the target
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance + amount).clamp(CAMERA_DISTANCE_MIN, CAMERA_DISTANCE_MAX);
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.distance * sin_phi * cos_theta,
            self.distance * cos_phi,
            self.distance * sin_phi * sin_theta,
        )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(self.target, Vec3::Y)
    }
}

pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<ViewPresetEvent>()
            .add_systems(Update, (apply_view_presets, orbit_camera_input, sync_orbit_transform).chain());
    }
}

fn apply_view_presets(
    mut events: EventReader<ViewPresetEvent>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    for event in events.read() {
        for mut orbit in cameras.iter_mut() {
            orbit.apply_view(event.0);
        }
        debug!("camera view: {:?}", event.0);
    }
}

// mouse drag orbits, wheel zooms
// skipped while the pointer is over the egui panel
fn orbit_camera_input(
    mut contexts: EguiContexts,
    mouse_button: Res<ButtonInput<MouseButton>>,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    let egui_busy = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);
    if egui_busy {
        return;
    }

    let drag = if mouse_button.pressed(MouseButton::Left) { motion.delta } else { Vec2::ZERO };
    // wheel up means closer
    let zoom = -scroll.delta.y
        * match scroll.unit {
            MouseScrollUnit::Line => CAMERA_ZOOM_LINE_STEP,
            MouseScrollUnit::Pixel => CAMERA_ZOOM_PIXEL_SPEED,
        };

    if drag == Vec2::ZERO && zoom == 0.0 {
        return;
    }
    for mut orbit in cameras.iter_mut() {
        orbit.rotate(drag);
        orbit.zoom(zoom);
    }
}

fn sync_orbit_transform(mut cameras: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (orbit, mut transform) in cameras.iter_mut() {
        *transform = orbit.transform();
    }
}
