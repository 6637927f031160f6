//! Level state
//!
//! Everything a single round needs lives here: map, score, freeze timers and
//! the spawner holding every character. `Level::update` is the only way the
//! simulation advances.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::character::Character;
use super::map::MapComponent;
use super::points::PointComponent;
use super::position::{Direction, Position2D};
use super::spawner::Spawner;
use super::tick;
use super::timer::TimerComponent;
use crate::audio::SoundEffect;
use crate::settings::{ConfigError, LevelSettings};

/// Where the round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStatus {
    Playing,
    /// Every tile reached the completion color
    RoundCleared,
    /// The player ran out of lives
    GameOver,
}

/// Signals emitted to the surrounding game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// Fire-and-forget sound request
    Sound(SoundEffect),
    /// The player lost a life
    PlayerDied { lives_left: u8 },
    RoundCleared,
    GameOver,
}

/// The cell the player left to jump on a disk; Coily follows the same jump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lure {
    pub from: Position2D,
    pub dir: Direction,
}

/// One round of play
#[derive(Debug, Clone)]
pub struct Level {
    pub map: MapComponent,
    pub points: PointComponent,
    pub timer: TimerComponent,
    pub spawner: Spawner,
    pub status: LevelStatus,
    /// Bonus awarded when the round is cleared
    pub round_score: u32,
    /// Set while the player escapes on a disk
    pub lure: Option<Lure>,
    /// Frames simulated so far
    pub frames: u64,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<SimEvent>,
}

impl Level {
    /// Build a round from validated settings
    pub fn new(settings: &LevelSettings, lives: u8, score: u64, seed: u64) -> Result<Self, ConfigError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let map = MapComponent::new(
            settings.colors_number,
            settings.disks_number,
            settings.reversible,
            &mut rng,
        );
        let spawner = Spawner::new(&settings.enemies, settings.player_speed, lives);

        log::info!(
            "New round: {} colors, {} disks, reversible={}, {} enemy kinds",
            settings.colors_number,
            settings.disks_number,
            settings.reversible,
            settings.enemies.len()
        );

        Ok(Self {
            map,
            points: PointComponent::new(score),
            timer: TimerComponent::new(),
            spawner,
            status: LevelStatus::Playing,
            round_score: settings.round_score,
            lure: None,
            frames: 0,
            rng,
            events: Vec::new(),
        })
    }

    /// Advance the round by `elapsed` milliseconds
    pub fn update(&mut self, elapsed: f32) {
        tick::tick(self, elapsed);
    }

    pub fn player(&self) -> &Character {
        self.spawner.player()
    }

    pub fn points(&self) -> u64 {
        self.points.points()
    }

    pub fn lives(&self) -> u8 {
        self.spawner.player().lives
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn move_up(&mut self) -> bool {
        self.command_move(Direction::UpRight)
    }

    pub fn move_down(&mut self) -> bool {
        self.command_move(Direction::DownLeft)
    }

    pub fn move_left(&mut self) -> bool {
        self.command_move(Direction::UpLeft)
    }

    pub fn move_right(&mut self) -> bool {
        self.command_move(Direction::DownRight)
    }

    /// Start a player hop; a no-op while the player is moving, dead or the round is over
    pub fn command_move(&mut self, dir: Direction) -> bool {
        if self.status != LevelStatus::Playing {
            return false;
        }
        let accepted = self.spawner.player_mut().start_move(dir);
        if accepted {
            self.events.push(SimEvent::Sound(SoundEffect::Jump));
        } else {
            log::trace!("Ignored move {:?}", dir);
        }
        accepted
    }
}
