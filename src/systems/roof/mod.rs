// this is the entry point for the roof configurator plugin
// it owns the parameter state and the scene composer
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::error::ConfigError;

pub mod palette;
pub mod procgen;
pub mod scene;

// roof shape variants
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoofType {
    #[default]
    Gable, // two slopes, triangular gable ends
    Hip,   // four slopes, no gable ends
    Flat,  // slab + parapets, pitch ignored
}

impl RoofType {
    pub const ALL: [RoofType; 3] = [RoofType::Gable, RoofType::Hip, RoofType::Flat];

    pub fn id(self) -> &'static str {
        match self {
            RoofType::Gable => "gable",
            RoofType::Hip => "hip",
            RoofType::Flat => "flat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoofType::Gable => "Gable roof",
            RoofType::Hip => "Hip roof",
            RoofType::Flat => "Flat roof",
        }
    }

    pub fn is_sloped(self) -> bool {
        self != RoofType::Flat
    }
}

impl fmt::Display for RoofType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RoofType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoofType::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownRoofType(s.to_string()))
    }
}

// roof covering materials
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoofMaterial {
    #[default]
    Tile,
    Slate,
    Zinc,
    SteelDeck,
}

impl RoofMaterial {
    pub const ALL: [RoofMaterial; 4] = [
        RoofMaterial::Tile,
        RoofMaterial::Slate,
        RoofMaterial::Zinc,
        RoofMaterial::SteelDeck,
    ];

    pub fn id(self) -> &'static str {
        match self {
            RoofMaterial::Tile => "tile",
            RoofMaterial::Slate => "slate",
            RoofMaterial::Zinc => "zinc",
            RoofMaterial::SteelDeck => "steel-deck",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoofMaterial::Tile => "Clay tiles",
            RoofMaterial::Slate => "Natural slate",
            RoofMaterial::Zinc => "Zinc",
            RoofMaterial::SteelDeck => "Steel deck",
        }
    }
}

impl fmt::Display for RoofMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RoofMaterial {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoofMaterial::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownMaterial(s.to_string()))
    }
}

// optional roof/house accessories
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Accessory {
    Chimney,
    Skylight,
    Gutter,
    SolarPanels,
}

impl Accessory {
    pub const ALL: [Accessory; 4] = [
        Accessory::Chimney,
        Accessory::Skylight,
        Accessory::Gutter,
        Accessory::SolarPanels,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Accessory::Chimney => "chimney",
            Accessory::Skylight => "skylight",
            Accessory::Gutter => "gutter",
            Accessory::SolarPanels => "solar-panels",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Accessory::Chimney => "Chimney",
            Accessory::Skylight => "Skylight",
            Accessory::Gutter => "Copper gutters",
            Accessory::SolarPanels => "Solar panels",
        }
    }

    /// Accessories that need a sloped surface to sit on
    pub fn needs_slope(self) -> bool {
        !matches!(self, Accessory::Gutter)
    }
}

impl fmt::Display for Accessory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Accessory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accessory::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownAccessory(s.to_string()))
    }
}

/// 24-bit sRGB color, written as `#RRGGBB`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(u32);

impl HexColor {
    pub const fn from_u32(rgb: u32) -> Self {
        Self(rgb & 0xFF_FFFF)
    }

    pub const fn from_channels([r, g, b]: [u8; 3]) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn channels(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    pub fn to_color(self) -> Color {
        let [r, g, b] = self.channels();
        Color::srgb_u8(r, g, b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl FromStr for HexColor {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(malformed)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| malformed())?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct RoofParameters {
    pub roof_type: RoofType,
    pub material: RoofMaterial,
    pub color: HexColor,
    pub pitch_degrees: u32, // retained but ignored for flat roofs
}

impl Default for RoofParameters {
    fn default() -> Self {
        Self {
            roof_type: RoofType::default(),
            material: RoofMaterial::default(),
            color: palette::default_color(RoofMaterial::default()),
            pitch_degrees: DEFAULT_PITCH,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct AccessoryFlags {
    pub chimney: bool,
    pub skylight: bool,
    pub gutter: bool,
    pub solar_panels: bool,
}

impl AccessoryFlags {
    pub const ALL: AccessoryFlags = AccessoryFlags {
        chimney: true,
        skylight: true,
        gutter: true,
        solar_panels: true,
    };

    pub fn get(&self, kind: Accessory) -> bool {
        match kind {
            Accessory::Chimney => self.chimney,
            Accessory::Skylight => self.skylight,
            Accessory::Gutter => self.gutter,
            Accessory::SolarPanels => self.solar_panels,
        }
    }

    pub fn set(&mut self, kind: Accessory, enabled: bool) {
        match kind {
            Accessory::Chimney => self.chimney = enabled,
            Accessory::Skylight => self.skylight = enabled,
            Accessory::Gutter => self.gutter = enabled,
            Accessory::SolarPanels => self.solar_panels = enabled,
        }
    }

    pub fn any(&self) -> bool {
        Accessory::ALL.into_iter().any(|kind| self.get(kind))
    }
}

/// Snapshot of the configurator state, used by the export summary
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ActiveParameters {
    pub parameters: RoofParameters,
    pub accessories: AccessoryFlags,
}

// which scene subtrees are stale
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rebuild {
    pub roof: bool,
    pub accessories: AccessoryFlags,
}

impl Rebuild {
    // accessory placement depends on ridge height, so a roof rebuild drags every slot along
    pub fn everything() -> Self {
        Self {
            roof: true,
            accessories: AccessoryFlags::ALL,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.roof && !self.accessories.any()
    }
}

/// Parameter-setter contract exposed to the UI layer.
///
/// Every setter validates first and leaves the state untouched on error. A
/// successful change records which subtrees are stale; the scene composer
/// drains that record with [`Configurator::take_pending`].
#[derive(Resource, Debug)]
pub struct Configurator {
    params: RoofParameters,
    accessories: AccessoryFlags,
    pitch_min: u32,
    pitch_max: u32,
    pending: Rebuild,
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new(PITCH_MIN, PITCH_MAX)
    }
}

impl Configurator {
    pub fn new(pitch_min: u32, pitch_max: u32) -> Self {
        let mut params = RoofParameters::default();
        params.pitch_degrees = params.pitch_degrees.clamp(pitch_min, pitch_max);
        Self {
            params,
            accessories: AccessoryFlags::default(),
            pitch_min,
            pitch_max,
            pending: Rebuild::everything(),
        }
    }

    pub fn parameters(&self) -> &RoofParameters {
        &self.params
    }

    pub fn pitch_range(&self) -> RangeInclusive<u32> {
        self.pitch_min..=self.pitch_max
    }

    pub fn set_roof_type(&mut self, roof_type: RoofType) {
        if self.params.roof_type == roof_type {
            return;
        }
        info!("roof type: {} -> {}", self.params.roof_type, roof_type);
        self.params.roof_type = roof_type;
        self.pending = Rebuild::everything();
    }

    pub fn set_material(&mut self, material: RoofMaterial) {
        if self.params.material == material {
            return;
        }
        self.params.material = material;
        // keep the color when the new palette offers it
        if !palette::contains(material, self.params.color) {
            self.params.color = palette::default_color(material);
        }
        info!("material: {} (color {})", material, self.params.color);
        self.pending = Rebuild::everything();
    }

    /// Parse and select a `#RRGGBB` color from the active material's palette
    pub fn set_color(&mut self, hex: &str) -> Result<(), ConfigError> {
        let color = hex.parse::<HexColor>()?;
        self.select_color(color)
    }

    pub fn select_color(&mut self, color: HexColor) -> Result<(), ConfigError> {
        if !palette::contains(self.params.material, color) {
            return Err(ConfigError::ColorNotInPalette {
                color,
                material: self.params.material,
            });
        }
        if self.params.color != color {
            info!("color: {}", color);
            self.params.color = color;
            self.pending = Rebuild::everything();
        }
        Ok(())
    }

    pub fn set_pitch(&mut self, degrees: i32) -> Result<(), ConfigError> {
        let out_of_range = || ConfigError::PitchOutOfRange {
            pitch: degrees,
            min: self.pitch_min,
            max: self.pitch_max,
        };
        let pitch = u32::try_from(degrees).map_err(|_| out_of_range())?;
        if !self.pitch_range().contains(&pitch) {
            return Err(out_of_range());
        }
        if self.params.pitch_degrees != pitch {
            self.params.pitch_degrees = pitch;
            // flat roofs keep the value for later but nothing changes on screen
            if self.params.roof_type.is_sloped() {
                self.pending = Rebuild::everything();
            }
        }
        Ok(())
    }

    pub fn set_accessory(&mut self, kind: Accessory, enabled: bool) {
        if self.accessories.get(kind) == enabled {
            return;
        }
        info!("{}: {}", kind, if enabled { "on" } else { "off" });
        self.accessories.set(kind, enabled);
        self.pending.accessories.set(kind, true);
    }

    pub fn reset_to_defaults(&mut self) {
        let pitch_min = self.pitch_min;
        let pitch_max = self.pitch_max;
        *self = Self::new(pitch_min, pitch_max);
        info!("configuration reset to defaults");
    }

    /// Parameters and accessory flags exactly as stored
    pub fn active_parameters(&self) -> ActiveParameters {
        ActiveParameters {
            parameters: self.params,
            accessories: self.accessories,
        }
    }

    /// Accessory flags after flat-roof suppression, i.e. what gets rendered
    pub fn resolved_accessories(&self) -> AccessoryFlags {
        let mut resolved = self.accessories;
        if !self.params.roof_type.is_sloped() {
            for kind in Accessory::ALL.into_iter().filter(|k| k.needs_slope()) {
                resolved.set(kind, false);
            }
        }
        resolved
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn take_pending(&mut self) -> Rebuild {
        std::mem::take(&mut self.pending)
    }
}

// texture raster sizes, runtime adjustable
#[derive(Resource, Clone, Debug)]
pub struct TextureSettings {
    pub color_size: u32,
    pub bump_size: u32,
    pub repeat: f32,
    pub normal_strength: f32,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            color_size: COLOR_TEXTURE_SIZE,
            bump_size: BUMP_TEXTURE_SIZE,
            repeat: TEXTURE_REPEAT,
            normal_strength: NORMAL_STRENGTH,
        }
    }
}

// random source for the slate variation, swap for a seeded one in tests
#[derive(Resource)]
pub struct TextureRng(pub StdRng);

impl Default for TextureRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

// main plugin for the configurator core
pub struct RoofScenePlugin;

impl Plugin for RoofScenePlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<Configurator>()
            .init_resource::<TextureSettings>()
            .init_resource::<TextureRng>()
            .init_resource::<scene::SceneComposer>()
            .add_systems(Update, scene::compose_scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_case_insensitively() {
        assert_eq!("Gable".parse::<RoofType>(), Ok(RoofType::Gable));
        assert_eq!(" hip ".parse::<RoofType>(), Ok(RoofType::Hip));
        assert_eq!("steel-deck".parse::<RoofMaterial>(), Ok(RoofMaterial::SteelDeck));
        assert_eq!("solar-panels".parse::<Accessory>(), Ok(Accessory::SolarPanels));
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "mansard".parse::<RoofType>(),
            Err(ConfigError::UnknownRoofType("mansard".into()))
        );
        assert_eq!(
            "thatch".parse::<RoofMaterial>(),
            Err(ConfigError::UnknownMaterial("thatch".into()))
        );
        assert!("dormer".parse::<Accessory>().is_err());
    }

    #[test]
    fn hex_color_parsing() {
        assert_eq!("#8b4513".parse::<HexColor>(), Ok(HexColor::from_u32(0x8B4513)));
        assert_eq!(HexColor::from_u32(0x8B4513).to_string(), "#8B4513");
        for bad in ["8B4513", "#8B451", "#8B45133", "#GG4513", "", "#"] {
            assert!(bad.parse::<HexColor>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn hex_color_pads_to_six_digits() {
        assert_eq!(HexColor::from_channels([0, 3, 0]).to_string(), "#000300");
        assert_eq!(HexColor::from_u32(0).to_string(), "#000000");
    }

    #[test]
    fn end_to_end_parameter_readback() {
        let mut config = Configurator::default();
        config.set_roof_type(RoofType::Gable);
        config.set_pitch(35).unwrap();
        config.set_material(RoofMaterial::Tile);
        config.set_color("#8B4513").unwrap();

        let active = config.active_parameters();
        assert_eq!(
            active.parameters,
            RoofParameters {
                roof_type: RoofType::Gable,
                material: RoofMaterial::Tile,
                color: HexColor::from_u32(0x8B4513),
                pitch_degrees: 35,
            }
        );
        assert_eq!(active.parameters.color.to_string(), "#8B4513");
    }

    #[test]
    fn invalid_pitch_leaves_state_unchanged() {
        let mut config = Configurator::default();
        config.take_pending();

        let err = config.set_pitch(PITCH_MAX as i32 + 1).unwrap_err();
        assert!(matches!(err, ConfigError::PitchOutOfRange { .. }));
        assert!(config.set_pitch(-5).is_err());
        assert_eq!(config.parameters().pitch_degrees, DEFAULT_PITCH);
        assert!(!config.has_pending());
    }

    #[test]
    fn invalid_color_leaves_state_unchanged() {
        let mut config = Configurator::default();
        config.take_pending();

        assert!(matches!(
            config.set_color("brown"),
            Err(ConfigError::MalformedColor(_))
        ));
        // a valid color the tile palette does not offer
        assert!(matches!(
            config.set_color("#C0C0C0"),
            Err(ConfigError::ColorNotInPalette { .. })
        ));
        assert_eq!(config.parameters().color, palette::default_color(RoofMaterial::Tile));
        assert!(!config.has_pending());
    }

    #[test]
    fn material_switch_resolves_color_into_palette() {
        let mut config = Configurator::default();
        for from in RoofMaterial::ALL {
            for to in RoofMaterial::ALL {
                config.set_material(from);
                for swatch in palette::palette(from) {
                    config.select_color(swatch.color).unwrap();
                    config.set_material(to);
                    assert!(
                        palette::contains(to, config.parameters().color),
                        "{from} -> {to} left color {}",
                        config.parameters().color
                    );
                    config.set_material(from);
                }
            }
        }
    }

    #[test]
    fn material_switch_keeps_shared_color() {
        let mut config = Configurator::default();
        // terracotta red is also offered as steel-deck brown
        config.set_material(RoofMaterial::SteelDeck);
        assert_eq!(config.parameters().color.to_string(), "#8B4513");

        config.set_material(RoofMaterial::Zinc);
        assert_eq!(config.parameters().color, palette::default_color(RoofMaterial::Zinc));
    }

    #[test]
    fn flat_roof_suppresses_sloped_accessories() {
        let mut config = Configurator::default();
        for kind in Accessory::ALL {
            config.set_accessory(kind, true);
        }
        config.set_roof_type(RoofType::Flat);

        let resolved = config.resolved_accessories();
        assert!(!resolved.chimney);
        assert!(!resolved.skylight);
        assert!(!resolved.solar_panels);
        assert!(resolved.gutter);
        // stored flags survive
        assert_eq!(config.active_parameters().accessories, AccessoryFlags::ALL);

        config.set_roof_type(RoofType::Hip);
        assert_eq!(config.resolved_accessories(), AccessoryFlags::ALL);
    }

    #[test]
    fn pitch_on_flat_roof_is_retained_without_rebuild() {
        let mut config = Configurator::default();
        config.set_roof_type(RoofType::Flat);
        config.take_pending();

        config.set_pitch(50).unwrap();
        assert_eq!(config.parameters().pitch_degrees, 50);
        assert!(!config.has_pending());

        config.set_roof_type(RoofType::Gable);
        assert_eq!(config.parameters().pitch_degrees, 50);
        assert_eq!(config.take_pending(), Rebuild::everything());
    }

    #[test]
    fn accessory_toggle_only_marks_that_slot() {
        let mut config = Configurator::default();
        config.take_pending();

        config.set_accessory(Accessory::Skylight, true);
        let pending = config.take_pending();
        assert!(!pending.roof);
        assert!(pending.accessories.skylight);
        assert!(!pending.accessories.chimney);
        assert!(!pending.accessories.gutter);

        // same value again is not a change
        config.set_accessory(Accessory::Skylight, true);
        assert!(!config.has_pending());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut config = Configurator::default();
        config.set_roof_type(RoofType::Hip);
        config.set_material(RoofMaterial::Slate);
        config.set_pitch(20).unwrap();
        config.set_accessory(Accessory::Gutter, true);
        config.take_pending();

        config.reset_to_defaults();
        let active = config.active_parameters();
        assert_eq!(active.parameters, RoofParameters::default());
        assert_eq!(active.accessories, AccessoryFlags::default());
        assert_eq!(config.take_pending(), Rebuild::everything());
    }
}
