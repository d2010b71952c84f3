// Speeds are in world units per second; the frame step multiplies by dt.

// Physics
pub const GRAVITY: f32 = 1000.0;
pub const PLAYER_SPEED: f32 = 300.0;
pub const PLAYER_RUN_SPEED: f32 = 500.0;
pub const JUMP_FORCE: f32 = 550.0;
pub const MAX_FALL_SPEED: f32 = 800.0;

/// Frame step cap. Longer frames are simulated as this much time.
pub const MAX_FRAME_DT: f32 = 0.034;

// Player hitbox
pub const PLAYER_SIZE: f32 = 40.0;

// Void death
pub const VOID_DEPTH: f32 = 2000.0;
pub const SPAWN_OFFSET_X: f32 = 50.0;
pub const SPAWN_OFFSET_Y: f32 = -100.0;
/// Extra horizontal spawn spacing per LAN player id.
pub const SPAWN_SPACING_X: f32 = 45.0;

// Modifiers
pub const FLY_SPEED_FACTOR: f32 = 1.5;
pub const FREE_CAM_SPEED: f32 = 600.0;

// World
pub const MAX_BLOCKS: usize = 2000;
pub const BLOCK_SIZE: f32 = 40.0;
pub const GROUND_X: f32 = -200.0;
pub const GROUND_Y: f32 = 300.0;
pub const GROUND_WIDTH: f32 = 800.0;
pub const GROUND_HEIGHT: f32 = 40.0;

// Weather
pub const MAX_PARTICLES: usize = 500;
pub const PARTICLE_SPAWN_JITTER: i32 = 200;
pub const RAIN_SPEED_MIN: i32 = 400;
pub const RAIN_SPEED_MAX: i32 = 800;
pub const SNOW_SPEED_MIN: i32 = 50;
pub const SNOW_SPEED_MAX: i32 = 150;
pub const SNOW_DRIFT: i32 = 50;

// Camera
pub const CAMERA_FOLLOW_RATE: f32 = 5.0;
pub const SCREEN_WIDTH: u32 = 1280;
pub const SCREEN_HEIGHT: u32 = 720;

// Selection / UI timing
pub const PREVIEW_SECONDS: f32 = 3.0;
pub const PLAYER_COLOR_COUNT: u8 = 6;
pub const SONG_COUNT: usize = 6;

// Network
pub const NET_PORT: u16 = 25565;
pub const MAX_PLAYERS: usize = 4;
pub const HOST_ID: i32 = 0;
pub const HELLO_REPEATS: usize = 3;
pub const EDIT_REPEATS: usize = 2;

// Persistence
pub const SAVE_FILE: &str = "level.dat";
pub const CONSOLE_HISTORY: usize = 100;
pub const CHEAT_BUFFER_LEN: usize = 6;
