use bevy::prelude::*;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::window::WindowPlugin;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy_egui::EguiPlugin;

pub mod config;
pub mod error;
pub mod systems;


use config::*;

// import modules here
use systems::export::ExportPlugin;
use systems::grid::GridPlugin;
use systems::interaction::{OrbitCamera, OrbitCameraPlugin};
use systems::roof::{HexColor, RoofScenePlugin};
use systems::ui::UIPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Roof Configurator".into(),
                mode: bevy::window::WindowMode::Windowed,
                resolution: bevy::window::WindowResolution::new(1600.0, 900.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())

        // my custom plugins
        .add_plugins(GridPlugin)
        .add_plugins(RoofScenePlugin)
        .add_plugins(OrbitCameraPlugin)
        .add_plugins(UIPlugin)
        .add_plugins(ExportPlugin)

        .insert_resource(ClearColor(HexColor::from_u32(BACKGROUND_COLOR).to_color())) // world color
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 400.0,
            ..default()
        })
        .add_systems(Startup, start)
        .add_systems(Update, handle_exit)
        .run()
}

// application entry point here
// the house itself is spawned by the scene composer on the first frame
fn start(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let background = HexColor::from_u32(BACKGROUND_COLOR).to_color();
    let orbit = OrbitCamera::default();

    // spawn camera
    commands.spawn((
        Camera3d::default(),
        orbit.transform(),
        orbit,
        DistanceFog {
            color: background,
            falloff: FogFalloff::Linear { start: 50.0, end: 100.0 },
            ..default()
        },
    ));

    // spawn light sources, sun plus a soft fill from the opposite side
    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 30.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 2_500.,
            ..default()
        },
        Transform::from_xyz(-15.0, 10.0, -15.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(100.0, 100.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: HexColor::from_u32(GROUND_COLOR).to_color(),
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_xyz(0.0, -0.1, 0.0),
    ));
}

// application exit
fn handle_exit(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
