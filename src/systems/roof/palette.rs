// per-material color palettes
// the first swatch of every palette is the material's default color

use super::{HexColor, RoofMaterial};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swatch {
    pub color: HexColor,
    pub name: &'static str,
}

const fn swatch(rgb: u32, name: &'static str) -> Swatch {
    Swatch { color: HexColor::from_u32(rgb), name }
}

const TILE: &[Swatch] = &[
    swatch(0x8B4513, "Terracotta red"),
    swatch(0xCD5C5C, "Bright red"),
    swatch(0xA0522D, "Terracotta brown"),
    swatch(0x8B4726, "Dark brown"),
    swatch(0xD2691E, "Burnt orange"),
];

const SLATE: &[Swatch] = &[
    swatch(0x2F4F4F, "Anthracite grey"),
    swatch(0x1C1C1C, "Slate black"),
    swatch(0x696969, "Dark grey"),
    swatch(0x708090, "Light slate grey"),
    swatch(0x36454F, "Charcoal grey"),
];

const ZINC: &[Swatch] = &[
    swatch(0xC0C0C0, "Natural zinc"),
    swatch(0xA9A9A9, "Silver grey"),
    swatch(0x8B8B83, "Patinated zinc"),
    swatch(0xD3D3D3, "Light grey"),
];

const STEEL_DECK: &[Swatch] = &[
    swatch(0x696969, "Anthracite grey"),
    swatch(0x8B8B83, "Beige"),
    swatch(0x8B4513, "Brown"),
    swatch(0x2F4F4F, "Dark grey"),
    swatch(0xC0C0C0, "Light grey"),
    swatch(0x1C1C1C, "Black"),
];

pub fn palette(material: RoofMaterial) -> &'static [Swatch] {
    match material {
        RoofMaterial::Tile => TILE,
        RoofMaterial::Slate => SLATE,
        RoofMaterial::Zinc => ZINC,
        RoofMaterial::SteelDeck => STEEL_DECK,
    }
}

pub fn default_color(material: RoofMaterial) -> HexColor {
    palette(material)[0].color
}

pub fn contains(material: RoofMaterial, color: HexColor) -> bool {
    palette(material).iter().any(|s| s.color == color)
}

/// Display name of `color` within `material`'s palette
pub fn color_name(material: RoofMaterial, color: HexColor) -> Option<&'static str> {
    palette(material)
        .iter()
        .find(|s| s.color == color)
        .map(|s| s.name)
}
