//! Q-Hop - simulation core for a tile-hopping pyramid arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (characters, map, spawner, freeze-aware tick)
//! - `settings`: Per-round level configuration
//! - `game`: Level/round progression on top of the simulation
//! - `render`: Read-only drawable list for the renderer
//! - `audio`: Fire-and-forget sound signals

pub mod audio;
pub mod game;
pub mod render;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{ConfigError, EnemyInfo, LevelCatalog, LevelSettings};

/// Game configuration constants
pub mod consts {
    /// Rows in the pyramid (bottom row has this many tiles)
    pub const MAP_ROWS: i32 = 7;
    /// Logical x of the pyramid's vertical axis
    pub const MAP_CENTER_X: i32 = MAP_ROWS - 1;

    /// Window dimensions in pixels
    pub const WINDOW_WIDTH: i32 = 800;
    pub const WINDOW_HEIGHT: i32 = 600;
    /// Cube sprite width; logical x advances half a cube per step
    pub const CUBE_WIDTH: i32 = 64;
    /// Vertical pixel distance between two pyramid rows
    pub const ROW_HEIGHT: i32 = 48;
    /// Pixel position of the top tile
    pub const MAP_ORIGIN_X: i32 = WINDOW_WIDTH / 2 - MAP_CENTER_X * CUBE_WIDTH / 2;
    pub const MAP_ORIGIN_Y: i32 = 96;

    /// Freeze applied by catching a green ball (ms)
    pub const GREEN_BALL_FREEZE_TIME: f32 = 3000.0;
    /// Time the player stays dead before respawning (ms)
    pub const PLAYER_DEATH_TIME: f32 = 2000.0;
    /// Time Coily spends hatching on the bottom row (ms)
    pub const TRANSFORM_TIME: f32 = 800.0;
    /// Time between two disk sprite frames (ms)
    pub const DISK_FRAME_TIME: f32 = 100.0;
    /// Number of disk sprite frames
    pub const DISK_FRAMES: u8 = 4;
    /// Time between two flashes of a completed pyramid (ms)
    pub const TILE_FLASH_TIME: f32 = 150.0;
    /// Time the cleared pyramid flashes before the next round (ms)
    pub const ROUND_CLEAR_TIME: f32 = 2000.0;

    /// Starting lives for a new game
    pub const START_LIVES: u8 = 3;
    /// Levels in a full game
    pub const LEVELS: u32 = 9;
    /// Rounds in each level
    pub const ROUNDS: u32 = 4;
}
