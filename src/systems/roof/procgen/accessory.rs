//! Accessory geometry placed relative to the active roof.
//!
//! Sloped accessories are positioned with a [`SlopeFrame`], which describes the
//! right-hand slope of the roof (the left one is its mirror image). That keeps
//! chimney, skylight and panels sitting on the surface at any pitch, for both
//! gable and hip roofs.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use super::roof_mesh::ridge_height;
use crate::config::*;
use crate::systems::roof::{Accessory, RoofType};

/// Which side of the ridge a part sits on
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Cross-section of a slope: horizontal extent from the ridge-side edge to the
/// eave, the rise over that run, and the resulting incline. The face is
/// `inner_half_depth` wide either side of z = 0 at the ridge edge and widens
/// linearly to the full building depth at the eave (hip faces are trapezoids).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlopeFrame {
    pub inner_x: f32,
    pub outer_x: f32,
    pub inner_half_depth: f32,
    pub rise: f32,
    pub angle: f32,
}

impl SlopeFrame {
    pub fn for_roof(roof_type: RoofType, pitch_degrees: u32) -> Option<Self> {
        let rise = ridge_height(pitch_degrees);
        let outer_x = BUILDING_WIDTH / 2.0;
        let (inner_x, inner_half_depth) = match roof_type {
            RoofType::Gable => (0.0, BUILDING_DEPTH / 2.0),
            RoofType::Hip => (HIP_RIDGE_HALF_WIDTH, HIP_RIDGE_HALF_DEPTH),
            RoofType::Flat => return None,
        };
        Some(Self {
            inner_x,
            outer_x,
            inner_half_depth,
            rise,
            angle: rise.atan2(outer_x - inner_x),
        })
    }

    /// Length of the slope surface from ridge edge to eave
    pub fn length(&self) -> f32 {
        (self.outer_x - self.inner_x).hypot(self.rise)
    }

    /// Point on the slope surface; `t` runs 0 at the ridge edge to 1 at the eave
    pub fn surface_point(&self, side: Side, t: f32, z: f32) -> Vec3 {
        let x = self.inner_x + t * (self.outer_x - self.inner_x);
        let y = WALL_HEIGHT + self.rise * (1.0 - t);
        Vec3::new(side.sign() * x, y, z)
    }

    /// Half the face's extent along Z at slope position `t`
    pub fn half_depth(&self, t: f32) -> f32 {
        let outer = BUILDING_DEPTH / 2.0;
        self.inner_half_depth + t.clamp(0.0, 1.0) * (outer - self.inner_half_depth)
    }

    pub fn normal(&self, side: Side) -> Vec3 {
        Vec3::new(side.sign() * self.angle.sin(), self.angle.cos(), 0.0)
    }

    /// Tilts +Y onto the slope normal (about the ridge-parallel Z axis)
    pub fn rotation(&self, side: Side) -> Quat {
        Quat::from_rotation_z(-side.sign() * self.angle)
    }

    // lies parallel to the slope, `lift` above the surface along its normal
    fn flush(&self, side: Side, t: f32, z: f32, lift: f32) -> Transform {
        let at = self.surface_point(side, t, z) + self.normal(side) * lift;
        Transform::from_translation(at).with_rotation(self.rotation(side))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartShape {
    Cuboid(Vec3),
    Cylinder { radius: f32, height: f32 },
}

impl PartShape {
    pub fn mesh(self) -> Mesh {
        match self {
            PartShape::Cuboid(size) => Mesh::from(Cuboid::new(size.x, size.y, size.z)),
            PartShape::Cylinder { radius, height } => {
                Mesh::from(Cylinder::new(radius, height).mesh().resolution(8))
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PartFinish {
    Brick,
    CapStone,
    SkylightFrame,
    Glass,
    PanelCell,
    PanelGloss,
    Copper,
}

impl PartFinish {
    pub fn material(self) -> StandardMaterial {
        let srgb = |rgb: u32| Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8);
        match self {
            PartFinish::Brick => StandardMaterial {
                base_color: srgb(0x8B4513),
                perceptual_roughness: 0.9,
                ..default()
            },
            PartFinish::CapStone => StandardMaterial {
                base_color: srgb(0x666666),
                ..default()
            },
            PartFinish::SkylightFrame => StandardMaterial {
                base_color: srgb(0x2C2C2C),
                metallic: 0.3,
                perceptual_roughness: 0.7,
                ..default()
            },
            PartFinish::Glass => StandardMaterial {
                base_color: srgb(0x87CEEB).with_alpha(0.3),
                metallic: 0.1,
                perceptual_roughness: 0.1,
                alpha_mode: AlphaMode::Blend,
                ..default()
            },
            PartFinish::PanelCell => StandardMaterial {
                base_color: srgb(0x1A1A2E),
                metallic: 0.6,
                perceptual_roughness: 0.3,
                ..default()
            },
            PartFinish::PanelGloss => StandardMaterial {
                base_color: srgb(0x4A90E2),
                metallic: 0.9,
                perceptual_roughness: 0.1,
                emissive: (srgb(0x1A3A5A).to_linear() * 0.2),
                ..default()
            },
            PartFinish::Copper => StandardMaterial {
                base_color: srgb(0xB87333),
                metallic: 0.7,
                perceptual_roughness: 0.3,
                ..default()
            },
        }
    }
}

/// Marks the pieces of the gutter set
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub enum GutterSegment {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug)]
pub struct AccessoryPart {
    pub shape: PartShape,
    pub transform: Transform,
    pub finish: PartFinish,
    pub segment: Option<GutterSegment>,
}

impl AccessoryPart {
    fn new(shape: PartShape, transform: Transform, finish: PartFinish) -> Self {
        Self { shape, transform, finish, segment: None }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccessoryBlueprint {
    pub parts: Vec<AccessoryPart>,
}

impl AccessoryBlueprint {
    pub fn count_segments(&self, segment: GutterSegment) -> usize {
        self.parts.iter().filter(|p| p.segment == Some(segment)).count()
    }
}

// anchors along the slope, 0 = ridge edge, 1 = eave
// panels own the left slope, chimney and skylight share the right one
const CHIMNEY_T: f32 = 0.6;
const CHIMNEY_Z: f32 = 2.0;
const SKYLIGHT_T: f32 = 0.5;
const SKYLIGHT_Z: f32 = -1.0;
const PANEL_ROWS_T: [f32; 2] = [0.3, 0.7];
const PANEL_COLUMN_SPACING: f32 = 1.5;
const PANEL_CENTER_Z: f32 = 0.4;

/// Geometry for `kind` on the given roof, `None` when it cannot be placed
/// (slope-mounted accessories on a flat roof)
pub fn build(kind: Accessory, roof_type: RoofType, pitch_degrees: u32) -> Option<AccessoryBlueprint> {
    if kind == Accessory::Gutter {
        return Some(gutters());
    }
    let frame = SlopeFrame::for_roof(roof_type, pitch_degrees)?;
    Some(match kind {
        Accessory::Chimney => chimney(&frame),
        Accessory::Skylight => skylight(&frame),
        Accessory::SolarPanels => solar_panels(&frame),
        Accessory::Gutter => gutters(),
    })
}

fn chimney(frame: &SlopeFrame) -> AccessoryBlueprint {
    let shaft = Vec3::new(1.0, 3.5, 1.0);
    let anchor = frame.surface_point(Side::Right, CHIMNEY_T, CHIMNEY_Z);
    // sink the shaft so its downhill face still meets the roof
    let sink = shaft.x / 2.0 * frame.angle.tan();
    let center = anchor + Vec3::Y * (shaft.y / 2.0 - sink);
    let cap_at = center + Vec3::Y * (shaft.y / 2.0 + 0.15);

    AccessoryBlueprint {
        parts: vec![
            AccessoryPart::new(PartShape::Cuboid(shaft), Transform::from_translation(center), PartFinish::Brick),
            AccessoryPart::new(
                PartShape::Cuboid(Vec3::new(1.3, 0.3, 1.3)),
                Transform::from_translation(cap_at),
                PartFinish::CapStone,
            ),
        ],
    }
}

fn skylight(frame: &SlopeFrame) -> AccessoryBlueprint {
    let frame_size = Vec3::new(1.2, 0.12, 1.8);
    let frame_at = frame.flush(Side::Right, SKYLIGHT_T, SKYLIGHT_Z, frame_size.y / 2.0);
    let pane_at = frame.flush(Side::Right, SKYLIGHT_T, SKYLIGHT_Z, frame_size.y / 2.0 + 0.08);

    AccessoryBlueprint {
        parts: vec![
            AccessoryPart::new(PartShape::Cuboid(frame_size), frame_at, PartFinish::SkylightFrame),
            AccessoryPart::new(PartShape::Cuboid(Vec3::new(1.1, 0.05, 1.7)), pane_at, PartFinish::Glass),
        ],
    }
}

// (center z, column spacing) of a row of three panels at slope position `t`.
// The row is narrowed and then shifted until its uphill corners stay inside
// the face, which only matters on the tapering hip faces.
fn panel_row(frame: &SlopeFrame, t: f32, panel: Vec3) -> (f32, f32) {
    let uphill = t - panel.x / 2.0 / frame.length();
    let half = frame.half_depth(uphill);
    let spacing = PANEL_COLUMN_SPACING.min(half - panel.z / 2.0).max(panel.z);
    let reach = (half - panel.z / 2.0 - spacing).max(0.0);
    (PANEL_CENTER_Z.clamp(-reach, reach), spacing)
}

fn solar_panels(frame: &SlopeFrame) -> AccessoryBlueprint {
    let panel = Vec3::new(1.0, 0.08, 1.4);
    let overlay = Vec3::new(panel.x * 0.9, 0.02, panel.z * 0.9);
    let mut parts = Vec::with_capacity(12);

    for t in PANEL_ROWS_T {
        let (center, spacing) = panel_row(frame, t, panel);
        for column in -1..=1 {
            let z = center + column as f32 * spacing;
            // mounted on short standoffs above the covering
            let lift = 0.1;
            parts.push(AccessoryPart::new(
                PartShape::Cuboid(panel),
                frame.flush(Side::Left, t, z, lift),
                PartFinish::PanelCell,
            ));
            parts.push(AccessoryPart::new(
                PartShape::Cuboid(overlay),
                frame.flush(Side::Left, t, z, lift + 0.05),
                PartFinish::PanelGloss,
            ));
        }
    }

    AccessoryBlueprint { parts }
}

// same for every roof type and pitch
fn gutters() -> AccessoryBlueprint {
    let eave_x = BUILDING_WIDTH / 2.0 + 0.2;
    let corner_z = BUILDING_DEPTH / 2.0 - 0.1;
    let mut parts = Vec::with_capacity(6);

    for x in [-eave_x, eave_x] {
        parts.push(AccessoryPart {
            shape: PartShape::Cylinder { radius: 0.1, height: BUILDING_DEPTH + 0.5 },
            // cylinders stand along Y, lay them along the eave
            transform: Transform::from_xyz(x, WALL_HEIGHT - 0.2, 0.0)
                .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            finish: PartFinish::Copper,
            segment: Some(GutterSegment::Horizontal),
        });
    }
    for (x, z) in [(-eave_x, -corner_z), (eave_x, -corner_z), (-eave_x, corner_z), (eave_x, corner_z)] {
        parts.push(AccessoryPart {
            shape: PartShape::Cylinder { radius: 0.08, height: WALL_HEIGHT },
            transform: Transform::from_xyz(x, WALL_HEIGHT / 2.0, z),
            finish: PartFinish::Copper,
            segment: Some(GutterSegment::Vertical),
        });
    }

    AccessoryBlueprint { parts }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn sloped_accessories_are_absent_on_flat_roofs() {
        for kind in [Accessory::Chimney, Accessory::Skylight, Accessory::SolarPanels] {
            assert!(build(kind, RoofType::Flat, 35).is_none(), "{kind} built on a flat roof");
            assert!(build(kind, RoofType::Gable, 35).is_some());
            assert!(build(kind, RoofType::Hip, 35).is_some());
        }
    }

    #[test]
    fn gutters_are_identical_everywhere() {
        let reference = build(Accessory::Gutter, RoofType::Gable, 15).unwrap();
        assert_eq!(reference.count_segments(GutterSegment::Horizontal), 2);
        assert_eq!(reference.count_segments(GutterSegment::Vertical), 4);

        for roof_type in RoofType::ALL {
            for pitch in [15, 35, 60] {
                let other = build(Accessory::Gutter, roof_type, pitch).unwrap();
                assert_eq!(other.parts.len(), reference.parts.len());
                for (a, b) in other.parts.iter().zip(&reference.parts) {
                    assert_eq!(a.transform, b.transform);
                    assert_eq!(a.shape, b.shape);
                }
            }
        }
    }

    #[test]
    fn horizontal_gutters_run_along_the_eaves() {
        let gutters = build(Accessory::Gutter, RoofType::Hip, 30).unwrap();
        for part in gutters.parts.iter().filter(|p| p.segment == Some(GutterSegment::Horizontal)) {
            let axis = part.transform.rotation * Vec3::Y;
            assert!((axis.z.abs() - 1.0).abs() < EPS);
            assert!((part.transform.translation.x.abs() - 5.2).abs() < EPS);
        }
    }

    #[test]
    fn gable_frame_spans_ridge_to_eave() {
        let frame = SlopeFrame::for_roof(RoofType::Gable, 35).unwrap();
        assert!((frame.angle - ridge_height(35).atan2(5.0)).abs() < EPS);
        assert_eq!(frame.half_depth(0.0), frame.half_depth(1.0));
        // ridge edge at the ridge, eave edge at wall height
        let ridge = frame.surface_point(Side::Right, 0.0, 0.0);
        let eave = frame.surface_point(Side::Right, 1.0, 0.0);
        assert!((ridge.y - (WALL_HEIGHT + ridge_height(35))).abs() < EPS);
        assert!((eave - Vec3::new(5.0, WALL_HEIGHT, 0.0)).length() < EPS);
    }

    #[test]
    fn hip_frame_starts_at_the_ridge_rectangle() {
        let frame = SlopeFrame::for_roof(RoofType::Hip, 35).unwrap();
        assert_eq!(frame.inner_x, HIP_RIDGE_HALF_WIDTH);
        let expected = ridge_height(35).atan2(2.0);
        assert!((frame.angle - expected).abs() < EPS);
        // trapezoid: ridge rectangle depth at the top, full depth at the eave
        assert_eq!(frame.half_depth(0.0), HIP_RIDGE_HALF_DEPTH);
        assert_eq!(frame.half_depth(1.0), BUILDING_DEPTH / 2.0);
    }

    #[test]
    fn rotation_tilts_up_onto_the_slope_normal() {
        for roof_type in [RoofType::Gable, RoofType::Hip] {
            let frame = SlopeFrame::for_roof(roof_type, 42).unwrap();
            for side in [Side::Left, Side::Right] {
                let tilted = frame.rotation(side) * Vec3::Y;
                assert!((tilted - frame.normal(side)).length() < EPS);
            }
        }
    }

    #[test]
    fn skylight_sits_flush_on_the_right_slope() {
        for pitch in [15, 35, 60] {
            let frame = SlopeFrame::for_roof(RoofType::Gable, pitch).unwrap();
            let skylight = build(Accessory::Skylight, RoofType::Gable, pitch).unwrap();
            let glazing = &skylight.parts[0];
            assert!(glazing.transform.translation.x > 0.0);

            // distance from the frame center to the slope plane is half its thickness
            let on_slope = frame.surface_point(Side::Right, SKYLIGHT_T, SKYLIGHT_Z);
            let offset = (glazing.transform.translation - on_slope).dot(frame.normal(Side::Right));
            assert!((offset - 0.06).abs() < EPS);

            let pane = &skylight.parts[1];
            let pane_offset = (pane.transform.translation - on_slope).dot(frame.normal(Side::Right));
            assert!(pane_offset > offset);
        }
    }

    #[test]
    fn chimney_rises_with_the_ridge() {
        let low = build(Accessory::Chimney, RoofType::Gable, 15).unwrap();
        let high = build(Accessory::Chimney, RoofType::Gable, 60).unwrap();
        assert!(high.parts[0].transform.translation.y > low.parts[0].transform.translation.y);
        // right slope, capstone above the shaft
        for chimney in [&low, &high] {
            assert!(chimney.parts[0].transform.translation.x > 0.0);
            assert!(chimney.parts[1].transform.translation.y > chimney.parts[0].transform.translation.y);
        }
    }

    #[test]
    fn chimney_base_touches_the_roof_on_both_sides() {
        let frame = SlopeFrame::for_roof(RoofType::Gable, 45).unwrap();
        let chimney = build(Accessory::Chimney, RoofType::Gable, 45).unwrap();
        let center = chimney.parts[0].transform.translation;
        let bottom = center.y - 1.75;
        // surface height under the downhill face of the shaft
        let downhill_x = center.x + 0.5;
        let t = (downhill_x - frame.inner_x) / (frame.outer_x - frame.inner_x);
        let surface = frame.surface_point(Side::Right, t, 0.0).y;
        assert!((bottom - surface).abs() < EPS);
    }

    #[test]
    fn solar_panels_are_a_two_by_three_grid_with_overlays() {
        let panels = build(Accessory::SolarPanels, RoofType::Gable, 30).unwrap();
        let frame = SlopeFrame::for_roof(RoofType::Gable, 30).unwrap();
        let normal = frame.normal(Side::Left);

        let cells: Vec<_> = panels.parts.iter().filter(|p| p.finish == PartFinish::PanelCell).collect();
        let gloss: Vec<_> = panels.parts.iter().filter(|p| p.finish == PartFinish::PanelGloss).collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(gloss.len(), 6);

        for (cell, overlay) in cells.iter().zip(&gloss) {
            let offset = overlay.transform.translation - cell.transform.translation;
            // overlay sits in front of the panel along the slope normal, nowhere else
            assert!((offset.dot(normal) - 0.05).abs() < EPS);
            assert!((offset - normal * 0.05).length() < EPS);
        }
    }

    #[test]
    fn chimney_and_skylight_share_the_right_slope_without_touching() {
        let chimney_edge = CHIMNEY_Z - 0.5;
        let skylight_edge = SKYLIGHT_Z + 0.9;
        assert!(chimney_edge > skylight_edge);
    }

    #[test]
    fn chimney_stays_inside_the_hip_face() {
        for pitch in [15, 35, 60] {
            let frame = SlopeFrame::for_roof(RoofType::Hip, pitch).unwrap();
            let chimney = build(Accessory::Chimney, RoofType::Hip, pitch).unwrap();
            let shaft = chimney.parts[0].transform.translation;
            let uphill_t = (shaft.x - 0.5 - frame.inner_x) / (frame.outer_x - frame.inner_x);
            assert!(shaft.z + 0.5 <= frame.half_depth(uphill_t));
        }
    }

    #[test]
    fn gable_panels_keep_the_reference_grid() {
        let panels = build(Accessory::SolarPanels, RoofType::Gable, 35).unwrap();
        let mut z: Vec<f32> = panels
            .parts
            .iter()
            .filter(|p| p.finish == PartFinish::PanelCell)
            .map(|p| p.transform.translation.z)
            .collect();
        z.sort_by(f32::total_cmp);
        z.dedup_by(|a, b| (*a - *b).abs() < EPS);
        assert_eq!(z.len(), 3);
        for (got, want) in z.iter().zip([-1.1, 0.4, 1.9]) {
            assert!((got - want).abs() < EPS);
        }
    }

    #[test]
    fn hip_panels_stay_inside_the_tapering_face() {
        for pitch in [15, 25, 35, 45, 60] {
            let frame = SlopeFrame::for_roof(RoofType::Hip, pitch).unwrap();
            let panels = build(Accessory::SolarPanels, RoofType::Hip, pitch).unwrap();
            let cells: Vec<_> = panels.parts.iter().filter(|p| p.finish == PartFinish::PanelCell).collect();
            assert_eq!(cells.len(), 6);

            for cell in &cells {
                for (dx, dz) in [(-0.5, -0.7), (-0.5, 0.7), (0.5, -0.7), (0.5, 0.7)] {
                    let corner = cell.transform.transform_point(Vec3::new(dx, 0.0, dz));
                    let t = (corner.x.abs() - frame.inner_x) / (frame.outer_x - frame.inner_x);
                    assert!(
                        corner.z.abs() <= frame.half_depth(t) + EPS,
                        "pitch {pitch}: corner {corner:?} overhangs the hip line"
                    );
                }
            }
            // neighbours in a row never overlap
            for row in cells.chunks(3) {
                for pair in row.windows(2) {
                    let gap = pair[1].transform.translation.z - pair[0].transform.translation.z;
                    assert!(gap >= 1.4 - EPS);
                }
            }
        }
    }
}
