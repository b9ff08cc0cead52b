// saves the current configuration as a quote request
// a screenshot of the viewport, a JSON record and a readable text summary

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, save_to_disk};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::EXPORT_DIR;
use crate::error::ExportError;
use crate::systems::roof::palette;
use crate::systems::roof::{AccessoryFlags, ActiveParameters, Configurator, HexColor, RoofMaterial, RoofType};
use crate::systems::ui::indicator::ToastEvent;

// export event
#[derive(Event, Default)]
pub struct ExportEvent;

#[derive(Resource)]
pub struct ExportSettings {
    pub directory: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { directory: PathBuf::from(EXPORT_DIR) }
    }
}

pub struct ExportPlugin;

impl Plugin for ExportPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<ExportSettings>()
            .add_event::<ExportEvent>()
            .add_systems(Update, handle_export);
    }
}

/// What the customer asked for, as written to the JSON file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub date: String,
    pub roof_type: RoofType,
    pub material: RoofMaterial,
    pub color: HexColor,
    pub color_name: String,
    pub pitch: Option<u32>, // none for flat roofs
    pub accessories: AccessoryFlags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub screenshot: PathBuf,
    pub configuration: PathBuf,
    pub summary: PathBuf,
}

impl ExportPaths {
    pub fn new(directory: &Path, stamp: &str) -> Self {
        Self {
            screenshot: directory.join(format!("roof-3d-{stamp}.png")),
            configuration: directory.join(format!("roof-configuration-{stamp}.json")),
            summary: directory.join(format!("roof-summary-{stamp}.txt")),
        }
    }
}

/// `resolved` are the accessories actually on screen
pub fn quote_record(active: &ActiveParameters, resolved: AccessoryFlags, date: DateTime<Local>) -> QuoteRecord {
    let params = &active.parameters;
    QuoteRecord {
        date: date.format("%d %B %Y, %H:%M").to_string(),
        roof_type: params.roof_type,
        material: params.material,
        color: params.color,
        color_name: palette::color_name(params.material, params.color)
            .unwrap_or("Undefined")
            .to_string(),
        pitch: params.roof_type.is_sloped().then_some(params.pitch_degrees),
        accessories: resolved,
    }
}

pub fn render_summary(record: &QuoteRecord) -> String {
    const HEAVY: &str = "═══════════════════════════════════════════════════";
    const LIGHT: &str = "───────────────────────────────────────────────────";
    let yes_no = |flag: bool| if flag { "Yes" } else { "No" };
    let pitch = record.pitch.map_or_else(|| "N/A".to_string(), |p| format!("{p}°"));

    let mut text = String::new();
    text.push_str(&format!("{HEAVY}\n    YOUR ROOF CONFIGURATION\n{HEAVY}\n\n"));
    text.push_str(&format!("Created: {}\n\n", record.date));

    text.push_str(&format!("{LIGHT}\nROOF\n{LIGHT}\n"));
    text.push_str(&format!("Roof type          : {}\n", record.roof_type.label()));
    text.push_str(&format!("Material           : {}\n", record.material.label()));
    text.push_str(&format!("Color              : {} ({})\n", record.color_name, record.color));
    text.push_str(&format!("Pitch              : {pitch}\n\n"));

    text.push_str(&format!("{LIGHT}\nACCESSORIES\n{LIGHT}\n"));
    text.push_str(&format!("Chimney            : {}\n", yes_no(record.accessories.chimney)));
    text.push_str(&format!("Skylight           : {}\n", yes_no(record.accessories.skylight)));
    text.push_str(&format!("Gutters            : {}\n", yes_no(record.accessories.gutter)));
    text.push_str(&format!("Solar panels       : {}\n", yes_no(record.accessories.solar_panels)));
    text.push_str(&format!("\n{HEAVY}\n"));
    text
}

/// Writes the JSON record and the text summary; the screenshot is taken
/// separately because it needs the renderer
pub fn write_quote(paths: &ExportPaths, record: &QuoteRecord) -> Result<(), ExportError> {
    if let Some(directory) = paths.configuration.parent() {
        fs::create_dir_all(directory)?;
    }
    fs::write(&paths.configuration, serde_json::to_string_pretty(record)?)?;
    fs::write(&paths.summary, render_summary(record))?;
    Ok(())
}

// handle export events
pub fn handle_export(
    mut commands: Commands,
    mut events: EventReader<ExportEvent>,
    mut toasts: EventWriter<ToastEvent>,
    config: Res<Configurator>,
    settings: Res<ExportSettings>,
) {
    // several clicks in one frame still make one export
    if events.read().count() == 0 {
        return;
    }

    let now = Local::now();
    let paths = ExportPaths::new(&settings.directory, &now.timestamp_millis().to_string());
    let record = quote_record(&config.active_parameters(), config.resolved_accessories(), now);

    match write_quote(&paths, &record) {
        Ok(()) => {
            commands
                .spawn(Screenshot::primary_window())
                .observe(save_to_disk(paths.screenshot.clone()));
            info!("quote exported to {}", settings.directory.display());
            toasts.write(ToastEvent::info(format!(
                "Configuration saved to {}",
                settings.directory.display()
            )));
        }
        Err(err) => {
            error!("export failed: {}", err);
            toasts.write(ToastEvent::error(format!("Export failed: {err}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::systems::roof::RoofParameters;

    fn fixed_date() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    fn active(roof_type: RoofType) -> ActiveParameters {
        ActiveParameters {
            parameters: RoofParameters { roof_type, ..default() },
            accessories: AccessoryFlags::ALL,
        }
    }

    #[test]
    fn sloped_roofs_export_their_pitch() {
        let record = quote_record(&active(RoofType::Gable), AccessoryFlags::ALL, fixed_date());
        assert_eq!(record.pitch, Some(35));
        assert_eq!(record.color_name, "Terracotta red");
        assert_eq!(record.date, "14 March 2025, 09:30");

        let summary = render_summary(&record);
        assert!(summary.contains("Pitch              : 35°"));
        assert!(summary.contains("Gable roof"));
        assert!(summary.contains("Terracotta red (#8B4513)"));
    }

    #[test]
    fn flat_roofs_export_no_pitch() {
        let mut config = Configurator::default();
        config.set_roof_type(RoofType::Flat);
        for kind in crate::systems::roof::Accessory::ALL {
            config.set_accessory(kind, true);
        }

        let record = quote_record(&config.active_parameters(), config.resolved_accessories(), fixed_date());
        assert_eq!(record.pitch, None);
        // what was rendered, not what was ticked
        assert!(!record.accessories.chimney);
        assert!(record.accessories.gutter);

        let summary = render_summary(&record);
        assert!(summary.contains("Pitch              : N/A"));
        assert!(summary.contains("Chimney            : No"));
        assert!(summary.contains("Gutters            : Yes"));

        let json = serde_json::to_value(&record).unwrap();
        assert!(json["pitch"].is_null());
        assert_eq!(json["roof_type"], "flat");
        assert_eq!(json["color"], "#8B4513");
    }

    #[test]
    fn file_names_share_one_stamp() {
        let paths = ExportPaths::new(Path::new("out"), "1700000000000");
        assert_eq!(paths.screenshot, Path::new("out/roof-3d-1700000000000.png"));
        assert_eq!(paths.configuration, Path::new("out/roof-configuration-1700000000000.json"));
        assert_eq!(paths.summary, Path::new("out/roof-summary-1700000000000.txt"));
    }

    #[test]
    fn writes_record_and_summary() {
        let directory = std::env::temp_dir().join(format!("roof-export-test-{}", std::process::id()));
        let paths = ExportPaths::new(&directory, "42");
        let record = quote_record(&active(RoofType::Hip), AccessoryFlags::default(), fixed_date());

        write_quote(&paths, &record).unwrap();

        let json = fs::read_to_string(&paths.configuration).unwrap();
        let parsed: QuoteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
        let summary = fs::read_to_string(&paths.summary).unwrap();
        assert!(summary.contains("Hip roof"));

        fs::remove_dir_all(&directory).unwrap();
    }
}
