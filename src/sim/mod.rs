//! Simulation module
//!
//! All gameplay logic lives here. The simulation is single-threaded and
//! advanced only through `Level::update`:
//! - Elapsed time in milliseconds
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or audio dependencies

pub mod animation;
pub mod character;
pub mod collision;
pub mod map;
pub mod points;
pub mod position;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use animation::MovementAnimation;
pub use character::{
    Advance, Character, CharacterKind, CharacterState, EnemyKind, EntityId, SnakeForm,
};
pub use collision::{CollisionEffect, collide, policy};
pub use map::{Disk, MapComponent, Tile};
pub use points::{PointComponent, ScoreEvent};
pub use position::{Direction, Position2D};
pub use spawner::{SpawnEntry, Spawner};
pub use state::{Level, LevelStatus, SimEvent};
pub use timer::{FreezeCategory, FreezeReason, TimerComponent};
