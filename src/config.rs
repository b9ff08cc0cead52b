// Configuration file, all measurements in scene units (1 unit = 1 meter)
// This controls the initial configurator state and the generation constants

// Building envelope, fixed for every configuration
pub const BUILDING_WIDTH: f32 = 10.0;  // along X, the slopes run across this
pub const BUILDING_DEPTH: f32 = 8.0;   // along Z, the ridge runs along this
pub const WALL_HEIGHT: f32 = 5.0;      // eave height

// Pitch bounds for the setter boundary (degrees)
pub const PITCH_MIN: u32 = 15;
pub const PITCH_MAX: u32 = 60;
pub const DEFAULT_PITCH: u32 = 35;
pub const BUILDER_PITCH_LIMIT: u32 = 89; // tan() blows up at 90

// Hip ridge rectangle, half extents of the raised inset
pub const HIP_RIDGE_HALF_WIDTH: f32 = 3.0;
pub const HIP_RIDGE_HALF_DEPTH: f32 = 2.0;

// Texture synthesis
pub const COLOR_TEXTURE_SIZE: u32 = 1024; // reference resolution, periods are authored for this
pub const BUMP_TEXTURE_SIZE: u32 = 512;
pub const TEXTURE_REPEAT: f32 = 2.0;      // tiling factor in both UV axes
pub const UV_METERS: f32 = 10.0;          // surface length covered by one UV unit
pub const NORMAL_STRENGTH: f32 = 0.5;

// Scene colors
pub const BACKGROUND_COLOR: u32 = 0x1A2530;
pub const GROUND_COLOR: u32 = 0x2A3F4F;
pub const WALL_COLOR: u32 = 0xFAF0E6;
pub const PARAPET_COLOR: u32 = 0xCCCCCC;
pub const GRID_CENTER_COLOR: u32 = 0xB87333; // copper
pub const GRID_LINE_COLOR: u32 = 0x34495E;

// Orbit camera
pub const CAMERA_TARGET_HEIGHT: f32 = 3.0;
pub const CAMERA_DISTANCE_MIN: f32 = 10.0;
pub const CAMERA_DISTANCE_MAX: f32 = 50.0;
pub const CAMERA_POLAR_MARGIN: f32 = 0.1;     // keep phi away from the pole and the horizon
pub const CAMERA_ROTATE_SPEED: f32 = 0.01;    // radians per pixel of drag
pub const CAMERA_ZOOM_PIXEL_SPEED: f32 = 0.05;
pub const CAMERA_ZOOM_LINE_STEP: f32 = 5.0;   // one wheel notch

// Quote export
pub const EXPORT_DIR: &str = "exports";
