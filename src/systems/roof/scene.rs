// scene composition
// owns the House -> Roof hierarchy and swaps subtrees when the configurator reports changes

use bevy::ecs::system::SystemParam;
use bevy::math::Affine2;
use bevy::prelude::*;

use super::procgen::accessory::{self, AccessoryBlueprint, PartFinish};
use super::procgen::roof_mesh::{self, PartSurface, RoofMesh, RoofPartKind};
use super::procgen::texture::{self, SurfaceFinish, normal_map, raster_to_image, ridge_cap_color};
use super::{Accessory, Configurator, HexColor, RoofParameters, TextureRng, TextureSettings};
use crate::config::*;

// entity hierarchy components
#[derive(Component)]
pub struct House;

#[derive(Component)]
pub struct Walls;

#[derive(Component)]
pub struct RoofNode;

#[derive(Component)]
pub struct RoofSurface;

#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub struct AccessoryNode(pub Accessory);

#[derive(Component, Clone, Copy, PartialEq, Eq, Debug)]
pub struct RoofPartNode(pub RoofPartKind);

/// Assets created for one subtree, released together with it
#[derive(Component, Default, Debug)]
pub struct OwnedAssets {
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
    pub images: Vec<Handle<Image>>,
}

/// One subtree per slot, `None` when the slot is empty
#[derive(Resource, Default, Debug)]
pub struct SceneComposer {
    pub house: Option<Entity>,
    pub roof: Option<Entity>,
    pub surface: Option<Entity>,
    pub chimney: Option<Entity>,
    pub skylight: Option<Entity>,
    pub gutter: Option<Entity>,
    pub solar_panels: Option<Entity>,
}

impl SceneComposer {
    pub fn slot(&self, kind: Accessory) -> Option<Entity> {
        match kind {
            Accessory::Chimney => self.chimney,
            Accessory::Skylight => self.skylight,
            Accessory::Gutter => self.gutter,
            Accessory::SolarPanels => self.solar_panels,
        }
    }

    fn slot_mut(&mut self, kind: Accessory) -> &mut Option<Entity> {
        match kind {
            Accessory::Chimney => &mut self.chimney,
            Accessory::Skylight => &mut self.skylight,
            Accessory::Gutter => &mut self.gutter,
            Accessory::SolarPanels => &mut self.solar_panels,
        }
    }
}

#[derive(SystemParam)]
pub struct SceneAssets<'w> {
    meshes: ResMut<'w, Assets<Mesh>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    images: ResMut<'w, Assets<Image>>,
}

impl SceneAssets<'_> {
    fn release(&mut self, owned: &OwnedAssets) {
        for handle in &owned.meshes {
            self.meshes.remove(handle);
        }
        for handle in &owned.materials {
            self.materials.remove(handle);
        }
        for handle in &owned.images {
            self.images.remove(handle);
        }
    }
}

/// Drains the configurator's pending rebuilds and brings the scene in line
pub fn compose_scene(
    mut commands: Commands,
    mut config: ResMut<Configurator>,
    mut composer: ResMut<SceneComposer>,
    settings: Res<TextureSettings>,
    mut rng: ResMut<TextureRng>,
    mut assets: SceneAssets,
    owned: Query<&OwnedAssets>,
) {
    if !config.has_pending() {
        return;
    }
    let pending = config.take_pending();
    let params = *config.parameters();
    let resolved = config.resolved_accessories();

    let (house, roof) = ensure_groups(&mut commands, &mut composer, &mut assets);

    if pending.roof {
        dispose(&mut commands, &mut assets, &owned, composer.surface.take());

        // texture first, a failed finish must not leave bare geometry behind
        let finish = texture::finish_for(&params, &settings, &mut rng.0);
        let geometry = roof_mesh::build(params.roof_type, params.pitch_degrees);
        let surface = spawn_roof_surface(&mut commands, &mut assets, &settings, &params, finish, geometry);
        commands.entity(roof).add_child(surface);
        composer.surface = Some(surface);
        info!(
            "roof rebuilt: {} {} {} at {}°",
            params.roof_type, params.material, params.color, params.pitch_degrees
        );
    }

    for kind in Accessory::ALL {
        if !pending.accessories.get(kind) {
            continue;
        }
        let previous = composer.slot_mut(kind).take();
        dispose(&mut commands, &mut assets, &owned, previous);

        if !resolved.get(kind) {
            continue;
        }
        let Some(blueprint) = accessory::build(kind, params.roof_type, params.pitch_degrees) else {
            continue;
        };
        let node = spawn_accessory(&mut commands, &mut assets, kind, blueprint);
        // gutters hang off the walls, everything else rides on the roof
        let parent = if kind.needs_slope() { roof } else { house };
        commands.entity(parent).add_child(node);
        *composer.slot_mut(kind) = Some(node);
        debug!("{} attached", kind);
    }
}

// the house and roof groups live for the whole session
fn ensure_groups(
    commands: &mut Commands,
    composer: &mut SceneComposer,
    assets: &mut SceneAssets,
) -> (Entity, Entity) {
    if let (Some(house), Some(roof)) = (composer.house, composer.roof) {
        return (house, roof);
    }

    let wall_mesh = assets.meshes.add(Cuboid::new(BUILDING_WIDTH, WALL_HEIGHT, BUILDING_DEPTH));
    let wall_material = assets.materials.add(StandardMaterial {
        base_color: HexColor::from_u32(WALL_COLOR).to_color(),
        perceptual_roughness: 0.8,
        ..default()
    });

    let house = commands
        .spawn((House, Name::new("House"), Transform::default(), Visibility::default()))
        .id();
    let walls = commands
        .spawn((
            Walls,
            Mesh3d(wall_mesh),
            MeshMaterial3d(wall_material),
            Transform::from_xyz(0.0, WALL_HEIGHT / 2.0, 0.0),
        ))
        .id();
    let roof = commands
        .spawn((RoofNode, Name::new("Roof"), Transform::default(), Visibility::default()))
        .id();
    commands.entity(house).add_children(&[walls, roof]);

    composer.house = Some(house);
    composer.roof = Some(roof);
    (house, roof)
}

// disposing an empty slot is a no-op
fn dispose(
    commands: &mut Commands,
    assets: &mut SceneAssets,
    owned: &Query<&OwnedAssets>,
    entity: Option<Entity>,
) {
    let Some(entity) = entity else {
        return;
    };
    if let Ok(owned) = owned.get(entity) {
        assets.release(owned);
    }
    commands.entity(entity).try_despawn();
}

fn spawn_roof_surface(
    commands: &mut Commands,
    assets: &mut SceneAssets,
    settings: &TextureSettings,
    params: &RoofParameters,
    mut finish: SurfaceFinish,
    geometry: RoofMesh,
) -> Entity {
    let mut owned = OwnedAssets::default();

    let color_texture = finish.color_raster.take().map(|raster| {
        let handle = assets.images.add(raster_to_image(raster, true));
        owned.images.push(handle.clone());
        handle
    });
    let normal_texture = finish.bump_raster.take().map(|bump| {
        let handle = assets.images.add(raster_to_image(normal_map(&bump, settings.normal_strength), false));
        owned.images.push(handle.clone());
        handle
    });
    let has_normal_map = normal_texture.is_some();

    let roof_material = StandardMaterial {
        // the color raster already carries the tint
        base_color: if color_texture.is_some() { Color::WHITE } else { finish.base_color.to_color() },
        base_color_texture: color_texture,
        normal_map_texture: normal_texture,
        perceptual_roughness: finish.roughness,
        metallic: finish.metalness,
        double_sided: true,
        cull_mode: None,
        uv_transform: Affine2::from_scale(Vec2::splat(settings.repeat)),
        ..default()
    };

    let mut children = Vec::with_capacity(geometry.parts.len());
    for part in geometry.parts {
        let surface = part.kind.surface();
        let mut mesh = part.mesh;
        if has_normal_map && surface == PartSurface::Roof {
            if let Err(err) = mesh.generate_tangents() {
                warn!("no tangents for {:?}, normal map will look flat: {}", part.kind, err);
            }
        }
        let material = assets.materials.add(part_material(surface, &roof_material, &finish));
        owned.materials.push(material.clone());
        let mesh = assets.meshes.add(mesh);
        owned.meshes.push(mesh.clone());

        children.push(
            commands
                .spawn((RoofPartNode(part.kind), Mesh3d(mesh), MeshMaterial3d(material), part.transform))
                .id(),
        );
    }

    debug!(
        "{} roof surface: {} parts, {} textures, ridge {:.2}m",
        params.roof_type,
        children.len(),
        owned.images.len(),
        geometry.ridge_height
    );

    let surface = commands
        .spawn((RoofSurface, Name::new("Roof surface"), Transform::default(), Visibility::default()))
        .add_children(&children)
        .id();
    commands.entity(surface).insert(owned);
    surface
}

fn part_material(surface: PartSurface, roof: &StandardMaterial, finish: &SurfaceFinish) -> StandardMaterial {
    match surface {
        PartSurface::Roof => roof.clone(),
        PartSurface::RidgeCap => StandardMaterial {
            base_color: ridge_cap_color(finish).to_color(),
            perceptual_roughness: finish.roughness,
            metallic: finish.metalness,
            ..default()
        },
        PartSurface::Wall => StandardMaterial {
            base_color: HexColor::from_u32(WALL_COLOR).to_color(),
            perceptual_roughness: 0.8,
            double_sided: true,
            cull_mode: None,
            ..default()
        },
        PartSurface::Parapet => StandardMaterial {
            base_color: HexColor::from_u32(PARAPET_COLOR).to_color(),
            perceptual_roughness: 0.9,
            ..default()
        },
    }
}

fn spawn_accessory(
    commands: &mut Commands,
    assets: &mut SceneAssets,
    kind: Accessory,
    blueprint: AccessoryBlueprint,
) -> Entity {
    let mut owned = OwnedAssets::default();
    let mut finishes: Vec<(PartFinish, Handle<StandardMaterial>)> = Vec::new();
    let mut children = Vec::with_capacity(blueprint.parts.len());

    for part in blueprint.parts {
        // one material per finish within the subtree
        let material = match finishes.iter().find(|(f, _)| *f == part.finish) {
            Some((_, handle)) => handle.clone(),
            None => {
                let handle = assets.materials.add(part.finish.material());
                owned.materials.push(handle.clone());
                finishes.push((part.finish, handle.clone()));
                handle
            }
        };
        let mesh = assets.meshes.add(part.shape.mesh());
        owned.meshes.push(mesh.clone());

        let mut child = commands.spawn((Mesh3d(mesh), MeshMaterial3d(material), part.transform));
        if let Some(segment) = part.segment {
            child.insert(segment);
        }
        children.push(child.id());
    }

    commands
        .spawn((
            AccessoryNode(kind),
            Name::new(kind.label()),
            Transform::default(),
            Visibility::default(),
            owned,
        ))
        .add_children(&children)
        .id()
}
