//! Error types for the configurator boundary and the quote export

use crate::systems::roof::{HexColor, RoofMaterial};

/// A parameter the configurator refused. State is left untouched when one of
/// these is returned.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown roof type: {0:?}")]
    UnknownRoofType(String),

    #[error("unknown material: {0:?}")]
    UnknownMaterial(String),

    #[error("unknown accessory: {0:?}")]
    UnknownAccessory(String),

    #[error("malformed color {0:?}, expected #RRGGBB")]
    MalformedColor(String),

    #[error("color {color} is not offered for {material}")]
    ColorNotInPalette {
        color: HexColor,
        material: RoofMaterial,
    },

    #[error("pitch {pitch}° is outside {min}°..={max}°")]
    PitchOutOfRange { pitch: i32, min: u32, max: u32 },
}

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
