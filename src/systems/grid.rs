use bevy::prelude::*;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};

use crate::systems::roof::HexColor;
use crate::config::{GRID_CENTER_COLOR, GRID_LINE_COLOR};


// floor grid under the house
// gives a sense of scale, one cell per meter, center lines in copper
pub struct GridPlugin;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct GridGizmoGroup;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(GridConfig::default())
            .init_gizmo_group::<GridGizmoGroup>()
            .add_systems(Startup, setup_gizmos)
            .add_systems(Update, draw_grid);
    }
}

// setting theese parameters as a resource allows for runtime modifications
#[derive(Resource)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
    pub center_color: Color,
    pub line_color: Color,
    pub enabled: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 50.0,
            divisions: 50,
            center_color: HexColor::from_u32(GRID_CENTER_COLOR).to_color(),
            line_color: HexColor::from_u32(GRID_LINE_COLOR).to_color(),
            enabled: true,
        }
    }
}

impl GridConfig {
    /// Offsets of every grid line from the center, both axes share them
    pub fn line_offsets(&self) -> Vec<f32> {
        let half = self.size / 2.0;
        let step = self.size / self.divisions.max(1) as f32;
        (0..=self.divisions).map(|i| -half + i as f32 * step).collect()
    }
}

fn setup_gizmos(
    mut config_store: ResMut<GizmoConfigStore>
) {
    let (config, _) = config_store.config_mut::<GridGizmoGroup>();
    config.depth_bias = 0.1; // render depth
}

fn draw_grid(
    mut gizmos: Gizmos<GridGizmoGroup>,
    params: Res<GridConfig>,
) {
    if !params.enabled {
        return;
    }

    let half = params.size / 2.0;
    for offset in params.line_offsets() {
        let color = if offset.abs() < f32::EPSILON {
            params.center_color
        } else {
            params.line_color
        };
        gizmos.line(Vec3::new(offset, -0.02, -half), Vec3::new(offset, -0.02, half), color);
        gizmos.line(Vec3::new(-half, -0.02, offset), Vec3::new(half, -0.02, offset), color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_spans_fifty_meters_with_a_center_line() {
        let offsets = GridConfig::default().line_offsets();
        assert_eq!(offsets.len(), 51);
        assert_eq!(offsets.first(), Some(&-25.0));
        assert_eq!(offsets.last(), Some(&25.0));
        assert!(offsets.iter().any(|o| o.abs() < f32::EPSILON));
    }
}
