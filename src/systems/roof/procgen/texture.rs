//! Procedural roof textures
//!
//! Every material paints a tileable color raster plus a bump raster whose
//! raised/recessed patches line up with the color raster's relief cues. All
//! periods are authored against the reference resolutions (1024 color, 512
//! bump) and scaled to the requested size, so the pattern density does not
//! depend on resolution.

use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use rand::Rng;

use super::raster::{Raster, Rect, TRANSPARENT, stop};
use super::shade::{shade, shade_rgba};
use crate::systems::roof::{HexColor, RoofMaterial, RoofParameters, TextureSettings};

const COLOR_REFERENCE: f32 = 1024.0;
const BUMP_REFERENCE: f32 = 512.0;

const BUMP_NEUTRAL: [u8; 4] = [128, 128, 255, 255];
const BUMP_RAISED: [u8; 4] = [160, 160, 255, 255];
const BUMP_RECESSED: [u8; 4] = [96, 96, 255, 255];
const BUMP_CREST: [u8; 4] = [192, 192, 255, 255];
const BUMP_TROUGH: [u8; 4] = [64, 64, 255, 255];

/// Everything the renderer needs to dress a roof surface
#[derive(Clone, Debug)]
pub struct SurfaceFinish {
    pub base_color: HexColor,
    pub color_raster: Option<Raster>,
    pub bump_raster: Option<Raster>,
    pub roughness: f32,
    pub metalness: f32,
}

impl SurfaceFinish {
    /// Untextured tint, used for flat roofs
    pub fn plain(color: HexColor) -> Self {
        Self {
            base_color: color,
            color_raster: None,
            bump_raster: None,
            roughness: 0.6,
            metalness: 0.1,
        }
    }

    pub fn is_textured(&self) -> bool {
        self.color_raster.is_some()
    }
}

/// (roughness, metalness) of a textured material
pub fn surface_properties(material: RoofMaterial) -> (f32, f32) {
    match material {
        RoofMaterial::Tile | RoofMaterial::Slate => (0.8, 0.0),
        RoofMaterial::Zinc | RoofMaterial::SteelDeck => (0.3, 0.7),
    }
}

/// Finish for the current parameters; flat roofs skip synthesis
pub fn finish_for(
    params: &RoofParameters,
    settings: &TextureSettings,
    rng: &mut impl Rng,
) -> SurfaceFinish {
    if params.roof_type.is_sloped() {
        synthesize(params.material, params.color, settings, rng)
    } else {
        SurfaceFinish::plain(params.color)
    }
}

pub fn synthesize(
    material: RoofMaterial,
    color: HexColor,
    settings: &TextureSettings,
    rng: &mut impl Rng,
) -> SurfaceFinish {
    let (roughness, metalness) = surface_properties(material);
    SurfaceFinish {
        base_color: color,
        color_raster: Some(paint_color(material, color, settings.color_size, rng)),
        bump_raster: Some(paint_bump(material, settings.bump_size)),
        roughness,
        metalness,
    }
}

pub fn paint_color(material: RoofMaterial, color: HexColor, size: u32, rng: &mut impl Rng) -> Raster {
    let scale = size as f32 / COLOR_REFERENCE;
    match material {
        RoofMaterial::Tile => paint_tiles(color, size, scale),
        RoofMaterial::Slate => paint_slates(color, size, scale, rng),
        RoofMaterial::Zinc => paint_zinc(color, size, scale),
        RoofMaterial::SteelDeck => paint_steel_deck(color, size, scale),
    }
}

// whole number of periods across `size`, even when alternating rows have to
// meet their opposite across the wrap
fn fit_period(size: f32, period: f32, even: bool) -> (u32, f32) {
    let cells = size / period;
    let count = if even {
        ((cells / 2.0).round() * 2.0).max(2.0)
    } else {
        cells.round().max(1.0)
    };
    (count as u32, size / count)
}

// running-bond layout snapped to the raster so it tiles seamlessly
struct Bond {
    rows: u32,
    columns: u32,
    row_period: f32,
    col_period: f32,
}

impl Bond {
    fn fit(size: u32, row_period: f32, col_period: f32) -> Self {
        let (rows, row_period) = fit_period(size as f32, row_period, true);
        let (columns, col_period) = fit_period(size as f32, col_period, false);
        Self { rows, columns, row_period, col_period }
    }

    fn cells(&self) -> usize {
        (self.rows * self.columns) as usize
    }

    // calls `cell(x, y, index)` for every cell touching the raster, odd rows
    // shifted by half a column; a cell cut by the right edge reappears on the
    // left with the same index
    fn for_each(&self, mut cell: impl FnMut(f32, f32, usize)) {
        for row in 0..self.rows {
            let y = row as f32 * self.row_period;
            let offset = if row % 2 == 0 { 0.0 } else { self.col_period / 2.0 };
            for k in 0..=self.columns {
                let x = offset + (k as f32 - 1.0) * self.col_period;
                let column = (k + self.columns - 1) % self.columns;
                cell(x, y, (row * self.columns + column) as usize);
            }
        }
    }
}

fn paint_tiles(color: HexColor, size: u32, s: f32) -> Raster {
    let mut raster = Raster::filled(size, size, shade_rgba(color, -20.0));
    let base = shade_rgba(color, 0.0);
    let body = shade_rgba(color, -15.0);
    let shadow = shade_rgba(color, -40.0);
    let border = shade_rgba(color, -50.0);
    let midline = shade_rgba(color, -45.0);
    let highlight = shade_rgba(color, 30.0);

    Bond::fit(size, 50.0 * s, 75.0 * s).for_each(|x, y, _| {
        let (w, h) = (73.0 * s, 48.0 * s);
        raster.fill_rect(Rect::new(x, y, w, h), body);
        // lit face
        raster.fill_rect(Rect::new(x, y, w, 35.0 * s), base);
        // depth
        raster.fill_rect(Rect::new(x, y + 38.0 * s, w, 10.0 * s), shadow);
        // volume
        raster.fill_gradient_v(
            Rect::new(x + 2.0 * s, y + 2.0 * s, 69.0 * s, 15.0 * s),
            y,
            y + 20.0 * s,
            &[stop(0.0, highlight), stop(1.0, TRANSPARENT)],
        );
        raster.stroke_rect(Rect::new(x, y, w, h), 3.0 * s, border);
        raster.line_v(x + 36.0 * s, y, y + h, 1.5 * s, midline);
    });

    raster
}

fn paint_slates(color: HexColor, size: u32, s: f32, rng: &mut impl Rng) -> Raster {
    let mut raster = Raster::filled(size, size, shade_rgba(color, -25.0));
    let shadow = shade_rgba(color, -50.0);
    let border = shade_rgba(color, -60.0);
    let relief = shade_rgba(color, -40.0);

    let bond = Bond::fit(size, 55.0 * s, 45.0 * s);
    // rolled per cell up front so both halves of a wrapped slate match
    let cells: Vec<(f32, bool)> = (0..bond.cells())
        .map(|_| (rng.random_range(-6.0..6.0), rng.random_bool(0.5)))
        .collect();

    bond.for_each(|x, y, index| {
        let (variation, highlighted) = cells[index];
        let (w, h) = (44.0 * s, 53.0 * s);

        raster.fill_rect(Rect::new(x, y, w, h), shade_rgba(color, variation - 10.0));
        raster.fill_rect(
            Rect::new(x + s, y + s, 42.0 * s, 40.0 * s),
            shade_rgba(color, variation + 5.0),
        );
        // overlap shadow of the next course
        raster.fill_gradient_v(
            Rect::new(x, y + 40.0 * s, w, 13.0 * s),
            y + 40.0 * s,
            y + h,
            &[stop(0.0, TRANSPARENT), stop(1.0, shadow)],
        );
        raster.stroke_rect(Rect::new(x, y, w, h), 3.0 * s, border);
        if highlighted {
            raster.fill_rect(
                Rect::new(x + 3.0 * s, y + 3.0 * s, 15.0 * s, 8.0 * s),
                shade_rgba(color, variation + 25.0),
            );
        }
        raster.line_h(y + 20.0 * s, x, x + w, s, relief);
    });

    raster
}

fn paint_zinc(color: HexColor, size: u32, s: f32) -> Raster {
    let mut raster = Raster::filled(size, size, shade_rgba(color, 0.0));
    let width = size as f32;
    let (bands, band) = fit_period(width, 150.0 * s, false);
    let joint = shade_rgba(color, -35.0);
    let joint_line = shade_rgba(color, -45.0);
    let stops = [
        stop(0.0, shade_rgba(color, 25.0)),
        stop(0.5, shade_rgba(color, 0.0)),
        stop(1.0, shade_rgba(color, -20.0)),
    ];

    // the extra joint at the bottom edge is the lower half of the one at the top
    for index in 0..=bands {
        let y = index as f32 * band;
        raster.fill_rect(Rect::new(0.0, y - 5.0 * s, width, 10.0 * s), joint);
        // sheet curvature
        raster.fill_gradient_v(Rect::new(0.0, y, width, band), y, y + band, &stops);
        raster.line_h(y, 0.0, width, 4.0 * s, joint_line);
    }

    raster
}

fn paint_steel_deck(color: HexColor, size: u32, s: f32) -> Raster {
    let mut raster = Raster::filled(size, size, shade_rgba(color, -10.0));
    let width = size as f32;
    let (stripes, stripe) = fit_period(width, 20.0 * s, true);
    let crest = [
        stop(0.0, shade_rgba(color, -15.0)),
        stop(0.5, shade_rgba(color, 35.0)),
        stop(1.0, shade_rgba(color, 0.0)),
    ];
    let trough = [
        stop(0.0, shade_rgba(color, 0.0)),
        stop(0.5, shade_rgba(color, -30.0)),
        stop(1.0, shade_rgba(color, -10.0)),
    ];

    for index in 0..=stripes {
        let y = index as f32 * stripe;
        let band = Rect::new(0.0, y - stripe / 2.0, width, stripe);
        if index % 2 == 0 {
            raster.fill_gradient_v(band, band.y, band.y + stripe, &crest);
            raster.line_h(y, 0.0, width, 3.0 * s, shade_rgba(color, 45.0));
        } else {
            raster.fill_gradient_v(band, band.y, band.y + stripe, &trough);
            raster.line_h(y, 0.0, width, 2.0 * s, shade_rgba(color, -40.0));
        }
    }

    raster
}

/// Relief raster: neutral mid-tone, lighter = raised, darker = recessed
pub fn paint_bump(material: RoofMaterial, size: u32) -> Raster {
    let mut raster = Raster::filled(size, size, BUMP_NEUTRAL);
    let s = size as f32 / BUMP_REFERENCE;
    let width = size as f32;

    match material {
        RoofMaterial::Tile => {
            Bond::fit(size, 25.0 * s, 37.5 * s).for_each(|x, y, _| {
                raster.fill_rect(Rect::new(x, y, 36.5 * s, 17.5 * s), BUMP_RAISED);
                raster.fill_rect(Rect::new(x, y + 19.0 * s, 36.5 * s, 5.0 * s), BUMP_RECESSED);
            });
        }
        RoofMaterial::Slate => {
            Bond::fit(size, 27.5 * s, 22.5 * s).for_each(|x, y, _| {
                raster.fill_rect(Rect::new(x, y, 22.0 * s, 20.0 * s), BUMP_RAISED);
                raster.fill_rect(Rect::new(x, y + 20.0 * s, 22.0 * s, 6.5 * s), BUMP_RECESSED);
            });
        }
        RoofMaterial::Zinc => {
            let (bands, band) = fit_period(width, 75.0 * s, false);
            for index in 0..=bands {
                let y = index as f32 * band;
                raster.fill_rect(Rect::new(0.0, y - 2.5 * s, width, 5.0 * s), BUMP_RECESSED);
                raster.fill_rect(Rect::new(0.0, y + 2.5 * s, width, 15.0 * s), BUMP_RAISED);
            }
        }
        RoofMaterial::SteelDeck => {
            let (stripes, stripe) = fit_period(width, 10.0 * s, true);
            for index in 0..=stripes {
                let y = index as f32 * stripe;
                let tone = if index % 2 == 0 { BUMP_CREST } else { BUMP_TROUGH };
                raster.fill_rect(Rect::new(0.0, y - stripe / 2.0, width, stripe), tone);
            }
        }
    }

    raster
}

/// Tangent-space normal map from the bump raster's red channel (Sobel
/// gradient, wrapping at the edges so the result tiles)
pub fn normal_map(bump: &Raster, strength: f32) -> Raster {
    let mut normal = Raster::filled(bump.width, bump.height, BUMP_NEUTRAL);
    let (w, h) = (bump.width as i32, bump.height as i32);

    for y in 0..h {
        for x in 0..w {
            let height_at = |dx: i32, dy: i32| {
                let px = (x + dx).rem_euclid(w) as u32;
                let py = (y + dy).rem_euclid(h) as u32;
                bump.get_pixel(px, py)[0] as f32 / 255.0
            };

            let gx = (height_at(1, -1) - height_at(-1, -1))
                + 2.0 * (height_at(1, 0) - height_at(-1, 0))
                + (height_at(1, 1) - height_at(-1, 1));
            let gy = (height_at(-1, 1) - height_at(-1, -1))
                + 2.0 * (height_at(0, 1) - height_at(0, -1))
                + (height_at(1, 1) - height_at(1, -1));

            let n = Vec3::new(-gx * strength, -gy * strength, 1.0).normalize();
            let encode = |c: f32| ((c * 0.5 + 0.5) * 255.0).round() as u8;
            let idx = ((y * w + x) * 4) as usize;
            normal.pixels[idx..idx + 4].copy_from_slice(&[encode(n.x), encode(n.y), encode(n.z), 255]);
        }
    }

    normal
}

/// Upload-ready image with repeat addressing on both axes
pub fn raster_to_image(raster: Raster, srgb: bool) -> Image {
    let format = if srgb {
        TextureFormat::Rgba8UnormSrgb
    } else {
        TextureFormat::Rgba8Unorm
    };
    let mut image = Image::new(
        Extent3d {
            width: raster.width,
            height: raster.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        raster.pixels,
        format,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..ImageSamplerDescriptor::linear()
    });
    image
}

/// Tint used for ridge caps on textured roofs
pub fn ridge_cap_color(finish: &SurfaceFinish) -> HexColor {
    shade(finish.base_color, -30.0)
}
