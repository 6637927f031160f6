//! Level settings and the level/round catalog
//!
//! Settings arrive as JSON or are built in code by `LevelCatalog::standard`.
//! Enemy tables are keyed by species name; an unknown name is a hard error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::EnemyKind;
use crate::sim::map::disk_slots;

/// Configuration errors, all fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown enemy kind: {0}")]
    UnknownEnemy(String),
    #[error("Invalid colors number: {0} (expected 2..={max})", max = MAX_COLORS)]
    InvalidColors(u8),
    #[error("Color images ({images}) do not match colors number ({colors})")]
    ColorImages { images: usize, colors: u8 },
    #[error("Too many disks: {0} (max {1})")]
    TooManyDisks(usize, usize),
    #[error("Invalid player speed: {0}")]
    InvalidPlayerSpeed(f32),
    #[error("Invalid settings for {kind}: {reason}")]
    InvalidEnemy { kind: &'static str, reason: &'static str },
    #[error("No settings for level {level} round {round}")]
    MissingRound { level: u32, round: u32 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Highest number of colors a tile can cycle through
pub const MAX_COLORS: u8 = 8;

/// Spawn schedule of one enemy species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyInfo {
    /// Animation steps per millisecond
    pub speed: f32,
    /// Milliseconds between two spawns
    pub spawning_time: f32,
    /// Milliseconds spent on a tile before the next hop
    pub standing_time: f32,
    /// Maximum simultaneously alive
    pub total_quantity: u32,
}

impl EnemyInfo {
    fn check(&self, kind: EnemyKind) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidEnemy {
            kind: kind.as_str(),
            reason,
        };
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(invalid("speed must be positive"));
        }
        if !(self.spawning_time.is_finite() && self.spawning_time >= 0.0) {
            return Err(invalid("spawning time must be non-negative"));
        }
        if !(self.standing_time.is_finite() && self.standing_time >= 0.0) {
            return Err(invalid("standing time must be non-negative"));
        }
        Ok(())
    }
}

/// Everything one round needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLevelSettings")]
pub struct LevelSettings {
    /// Colors each tile cycles through; the last one completes it
    pub colors_number: u8,
    pub disks_number: usize,
    /// Bonus for clearing the round
    pub round_score: u32,
    /// Completed tiles reset when landed on again
    pub reversible: bool,
    /// Background image id
    pub background: String,
    /// Tile image id per color index
    pub color_images: Vec<String>,
    #[serde(serialize_with = "serialize_enemies")]
    pub enemies: BTreeMap<EnemyKind, EnemyInfo>,
    pub player_speed: f32,
}

/// Wire form with enemy names still unresolved
#[derive(Debug, Deserialize)]
struct RawLevelSettings {
    colors_number: u8,
    disks_number: usize,
    round_score: u32,
    #[serde(default)]
    reversible: bool,
    #[serde(default)]
    background: String,
    #[serde(default)]
    color_images: Vec<String>,
    #[serde(default)]
    enemies: BTreeMap<String, EnemyInfo>,
    player_speed: f32,
}

impl TryFrom<RawLevelSettings> for LevelSettings {
    type Error = ConfigError;

    fn try_from(raw: RawLevelSettings) -> Result<Self, Self::Error> {
        let enemies = raw
            .enemies
            .into_iter()
            .map(|(name, info)| match EnemyKind::from_name(&name) {
                Some(kind) => Ok((kind, info)),
                None => Err(ConfigError::UnknownEnemy(name)),
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            colors_number: raw.colors_number,
            disks_number: raw.disks_number,
            round_score: raw.round_score,
            reversible: raw.reversible,
            background: raw.background,
            color_images: raw.color_images,
            enemies,
            player_speed: raw.player_speed,
        })
    }
}

fn serialize_enemies<S: serde::Serializer>(
    enemies: &BTreeMap<EnemyKind, EnemyInfo>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(enemies.iter().map(|(kind, info)| (kind.as_str(), info)))
}

impl Default for LevelSettings {
    fn default() -> Self {
        LevelCatalog::standard_round(1, 1)
    }
}

impl LevelSettings {
    /// Parse and validate a single round
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawLevelSettings = serde_json::from_str(json)?;
        let settings = Self::try_from(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the simulation cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_COLORS).contains(&self.colors_number) {
            return Err(ConfigError::InvalidColors(self.colors_number));
        }
        if !self.color_images.is_empty() && self.color_images.len() != self.colors_number as usize {
            return Err(ConfigError::ColorImages {
                images: self.color_images.len(),
                colors: self.colors_number,
            });
        }
        let slots = disk_slots().len();
        if self.disks_number > slots {
            return Err(ConfigError::TooManyDisks(self.disks_number, slots));
        }
        if !(self.player_speed.is_finite() && self.player_speed > 0.0) {
            return Err(ConfigError::InvalidPlayerSpeed(self.player_speed));
        }
        for (kind, info) in &self.enemies {
            info.check(*kind)?;
        }
        Ok(())
    }

    /// Image id of the color that completes a tile
    pub fn target_image(&self) -> Option<&str> {
        self.color_images.last().map(String::as_str)
    }
}

/// Settings for every level and round of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    /// `levels[level - 1][round - 1]`
    pub levels: Vec<Vec<LevelSettings>>,
}

impl LevelCatalog {
    /// The built-in progression: `LEVELS` levels of `ROUNDS` rounds each
    pub fn standard() -> Self {
        let levels = (1..=LEVELS)
            .map(|level| (1..=ROUNDS).map(|round| Self::standard_round(level, round)).collect())
            .collect();
        Self { levels }
    }

    /// Load a catalog and validate every round in it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self = serde_json::from_str(json)?;
        for (l, rounds) in catalog.levels.iter().enumerate() {
            if rounds.is_empty() {
                return Err(ConfigError::MissingRound {
                    level: l as u32 + 1,
                    round: 1,
                });
            }
            for settings in rounds {
                settings.validate()?;
            }
        }
        Ok(catalog)
    }

    /// Read a catalog file; a missing or unreadable file is an error
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn round_count(&self, level: u32) -> u32 {
        level
            .checked_sub(1)
            .and_then(|l| self.levels.get(l as usize))
            .map_or(0, |rounds| rounds.len() as u32)
    }

    /// Settings of `level`/`round`, both counted from 1
    pub fn settings_for(&self, level: u32, round: u32) -> Result<&LevelSettings, ConfigError> {
        level
            .checked_sub(1)
            .zip(round.checked_sub(1))
            .and_then(|(l, r)| self.levels.get(l as usize)?.get(r as usize))
            .ok_or(ConfigError::MissingRound { level, round })
    }

    /// One round of the built-in progression. Colors, disks, enemy roster
    /// and speeds ramp up with the level; the bonus grows every round.
    pub fn standard_round(level: u32, round: u32) -> LevelSettings {
        let level = level.max(1);
        let round = round.max(1);
        let colors_number: u8 = if level % 3 == 2 { 3 } else { 2 };
        let reversible = level % 3 == 0;
        let speed_bonus = 0.02 * (level - 1) as f32 + 0.01 * (round - 1) as f32;

        let mut enemies = BTreeMap::new();
        enemies.insert(
            EnemyKind::RedBall,
            EnemyInfo {
                speed: 0.25 + speed_bonus,
                spawning_time: 4000.0,
                standing_time: 600.0,
                total_quantity: 2 + level / 3,
            },
        );
        enemies.insert(
            EnemyKind::Coily,
            EnemyInfo {
                speed: 0.25 + speed_bonus,
                spawning_time: 6000.0,
                standing_time: 700.0,
                total_quantity: 1,
            },
        );
        if round >= 2 {
            enemies.insert(
                EnemyKind::GreenBall,
                EnemyInfo {
                    speed: 0.3,
                    spawning_time: 12000.0,
                    standing_time: 600.0,
                    total_quantity: 1,
                },
            );
        }
        if level >= 2 {
            enemies.insert(
                EnemyKind::SamAndSlick,
                EnemyInfo {
                    speed: 0.3 + speed_bonus,
                    spawning_time: 10000.0,
                    standing_time: 500.0,
                    total_quantity: 1,
                },
            );
        }
        if level >= 3 {
            for kind in [EnemyKind::Ugg, EnemyKind::Wrongway] {
                enemies.insert(
                    kind,
                    EnemyInfo {
                        speed: 0.25 + speed_bonus,
                        spawning_time: 9000.0,
                        standing_time: 650.0,
                        total_quantity: 1,
                    },
                );
            }
        }

        LevelSettings {
            colors_number,
            disks_number: (2 + (level as usize - 1) / 3 + (round as usize - 1) % 2).min(disk_slots().len()),
            round_score: 1000 + 250 * (round - 1) + 500 * (level - 1),
            reversible,
            background: format!("background_{level}"),
            color_images: (0..colors_number).map(|c| format!("tile_{level}_{c}")).collect(),
            enemies,
            player_speed: 0.45,
        }
    }
}
