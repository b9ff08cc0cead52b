// UTILS

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::config::UV_METERS;

/// Per-vertex normals from triangle winding, area weighted
/// Counter-clockwise triangles (seen from outside) produce outward normals.
/// Vertices only touched by degenerate triangles fall back to `Vec3::Y`.
pub fn winding_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (pa, pb, pc) = (
            Vec3::from(positions[a]),
            Vec3::from(positions[b]),
            Vec3::from(positions[c]),
        );
        // length is twice the triangle area
        let face = (pb - pa).cross(pc - pa);
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            if n == Vec3::ZERO { Vec3::Y.to_array() } else { n.to_array() }
        })
        .collect()
}

/// UVs laid out in the plane of one face: U along the `from` -> `to` edge,
/// V across it, both in units of [`UV_METERS`]. Texel density stays the same
/// whatever the incline of the face.
pub fn planar_uvs(positions: &[[f32; 3]], from: usize, to: usize) -> Vec<[f32; 2]> {
    let origin = Vec3::from(positions[from]);
    let along = (Vec3::from(positions[to]) - origin).normalize_or_zero();

    positions
        .iter()
        .map(|p| {
            let d = Vec3::from(*p) - origin;
            let u = d.dot(along);
            let v = (d - along * u).length();
            [u / UV_METERS, v / UV_METERS]
        })
        .collect()
}

/// Triangle list mesh with normals derived from `indices`
pub fn assemble_mesh(positions: Vec<[f32; 3]>, uvs: Vec<[f32; 2]>, indices: Vec<u32>) -> Mesh {
    let normals = winding_normals(&positions, &indices);

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));

    mesh
}
