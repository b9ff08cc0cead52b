// procedural generation for the roof: geometry, accessories and surface textures
// everything in here is pure data, the scene composer turns it into entities and assets

pub mod accessory;
pub mod raster;
pub mod roof_mesh;
pub mod shade;
pub mod texture;
pub mod utils;
