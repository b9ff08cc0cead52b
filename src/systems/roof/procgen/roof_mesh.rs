//! Roof geometry for the fixed 10 x 8 building envelope
//!
//! The ridge runs along Z, slopes fall toward the eaves at x = ±5. All parts
//! are built in the roof group's local space, which coincides with world space.

use bevy::prelude::*;

use super::utils::{assemble_mesh, planar_uvs};
use crate::config::*;
use crate::systems::roof::RoofType;

/// What a roof part is, and therefore how it gets painted
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RoofPartKind {
    Slope,
    GableEnd,
    HipShell,
    RidgeCap,
    Slab,
    Parapet,
}

/// Surface a part is dressed with
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PartSurface {
    Roof,
    RidgeCap,
    Wall,
    Parapet,
}

impl RoofPartKind {
    pub fn surface(self) -> PartSurface {
        match self {
            RoofPartKind::Slope | RoofPartKind::HipShell | RoofPartKind::Slab => PartSurface::Roof,
            RoofPartKind::RidgeCap => PartSurface::RidgeCap,
            RoofPartKind::GableEnd => PartSurface::Wall,
            RoofPartKind::Parapet => PartSurface::Parapet,
        }
    }
}

pub struct RoofPart {
    pub kind: RoofPartKind,
    pub mesh: Mesh,
    pub transform: Transform,
}

pub struct RoofMesh {
    pub roof_type: RoofType,
    pub ridge_height: f32,
    pub parts: Vec<RoofPart>,
}

impl RoofMesh {
    pub fn count(&self, kind: RoofPartKind) -> usize {
        self.parts.iter().filter(|p| p.kind == kind).count()
    }
}

/// Height of the ridge above the eaves: a quarter of the building width per
/// unit of tan(pitch). Pitch is clamped to 0..=89 degrees so the result is
/// always finite and never negative.
pub fn ridge_height(pitch_degrees: u32) -> f32 {
    let pitch = pitch_degrees.min(BUILDER_PITCH_LIMIT) as f32;
    (BUILDING_WIDTH / 4.0) * pitch.to_radians().tan()
}

pub fn build(roof_type: RoofType, pitch_degrees: u32) -> RoofMesh {
    let ridge_height = match roof_type {
        RoofType::Flat => 0.0,
        _ => ridge_height(pitch_degrees),
    };
    let parts = match roof_type {
        RoofType::Gable => gable(ridge_height),
        RoofType::Hip => hip(ridge_height),
        RoofType::Flat => flat(),
    };
    debug!(
        "built {} roof: ridge {:.2}m, {} parts",
        roof_type,
        ridge_height,
        parts.len()
    );
    RoofMesh { roof_type, ridge_height, parts }
}

// `eave` is the vertex pair the texture rows run along
fn part(kind: RoofPartKind, positions: Vec<[f32; 3]>, indices: Vec<u32>, eave: (usize, usize)) -> RoofPart {
    let uvs = planar_uvs(&positions, eave.0, eave.1);
    RoofPart {
        kind,
        mesh: assemble_mesh(positions, uvs, indices),
        transform: Transform::IDENTITY,
    }
}

fn cuboid(kind: RoofPartKind, size: Vec3, at: Vec3) -> RoofPart {
    RoofPart {
        kind,
        mesh: Mesh::from(Cuboid::new(size.x, size.y, size.z)),
        transform: Transform::from_translation(at),
    }
}

fn gable(h: f32) -> Vec<RoofPart> {
    let (hw, hd) = (BUILDING_WIDTH / 2.0, BUILDING_DEPTH / 2.0);
    let (eave, top) = (WALL_HEIGHT, WALL_HEIGHT + h);

    let left = part(
        RoofPartKind::Slope,
        vec![[-hw, eave, -hd], [0.0, top, -hd], [0.0, top, hd], [-hw, eave, hd]],
        vec![0, 2, 1, 0, 3, 2],
        (0, 3),
    );
    let right = part(
        RoofPartKind::Slope,
        vec![[hw, eave, -hd], [0.0, top, -hd], [0.0, top, hd], [hw, eave, hd]],
        vec![0, 1, 2, 0, 2, 3],
        (0, 3),
    );
    let front = part(
        RoofPartKind::GableEnd,
        vec![[-hw, eave, hd], [hw, eave, hd], [0.0, top, hd]],
        vec![0, 1, 2],
        (0, 1),
    );
    let back = part(
        RoofPartKind::GableEnd,
        vec![[-hw, eave, -hd], [0.0, top, -hd], [hw, eave, -hd]],
        vec![0, 1, 2],
        (0, 2),
    );
    let ridge = cuboid(
        RoofPartKind::RidgeCap,
        Vec3::new(0.3, 0.15, BUILDING_DEPTH + 0.4),
        Vec3::new(0.0, top + 0.05, 0.0),
    );

    vec![left, right, front, back, ridge]
}

fn hip(h: f32) -> Vec<RoofPart> {
    let (hw, hd) = (BUILDING_WIDTH / 2.0, BUILDING_DEPTH / 2.0);
    let (rw, rd) = (HIP_RIDGE_HALF_WIDTH, HIP_RIDGE_HALF_DEPTH);
    let (eave, top) = (WALL_HEIGHT, WALL_HEIGHT + h);

    // control cage: 0..4 eave corners, 4..8 the raised ridge rectangle above them
    let cage = [
        [-hw, eave, -hd],
        [hw, eave, -hd],
        [hw, eave, hd],
        [-hw, eave, hd],
        [-rw, top, -rd],
        [rw, top, -rd],
        [rw, top, rd],
        [-rw, top, rd],
    ];

    // every face gets its own vertices so its UVs can follow its own incline,
    // corners still coincide exactly so the shell stays closed
    let mut faces: Vec<[usize; 4]> = (0..4).map(|i| [i, (i + 1) % 4, 4 + (i + 1) % 4, 4 + i]).collect();
    faces.push([4, 5, 6, 7]);

    let mut positions = Vec::with_capacity(20);
    let mut uvs = Vec::with_capacity(20);
    let mut indices = Vec::with_capacity(30);
    for face in faces {
        let base = positions.len() as u32;
        let corners: Vec<[f32; 3]> = face.iter().map(|&c| cage[c]).collect();
        uvs.extend(planar_uvs(&corners, 0, 1));
        positions.extend(corners);
        indices.extend([0, 2, 1, 0, 3, 2].map(|k| base + k));
    }

    vec![RoofPart {
        kind: RoofPartKind::HipShell,
        mesh: assemble_mesh(positions, uvs, indices),
        transform: Transform::IDENTITY,
    }]
}

fn flat() -> Vec<RoofPart> {
    let slab_top = WALL_HEIGHT + 0.3;
    let parapet_y = slab_top + 0.25;
    let (hw, hd) = (BUILDING_WIDTH / 2.0, BUILDING_DEPTH / 2.0);

    let mut parts = vec![cuboid(
        RoofPartKind::Slab,
        Vec3::new(BUILDING_WIDTH + 0.5, 0.3, BUILDING_DEPTH + 0.5),
        Vec3::new(0.0, WALL_HEIGHT + 0.15, 0.0),
    )];

    // acroteria, long walls front and back, short walls at the sides
    for z in [-(hd + 0.4), hd + 0.4] {
        parts.push(cuboid(
            RoofPartKind::Parapet,
            Vec3::new(BUILDING_WIDTH + 1.0, 0.5, 0.3),
            Vec3::new(0.0, parapet_y, z),
        ));
    }
    for x in [-(hw + 0.4), hw + 0.4] {
        parts.push(cuboid(
            RoofPartKind::Parapet,
            Vec3::new(0.3, 0.5, BUILDING_DEPTH + 0.5),
            Vec3::new(x, parapet_y, 0.0),
        ));
    }

    parts
}
