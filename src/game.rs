//! Game flow
//!
//! Walks through the levels and rounds of a `LevelCatalog`, carrying score and
//! lives from one round to the next. A cleared round flashes for
//! `ROUND_CLEAR_TIME` before the next one starts.

use crate::audio::SoundEffect;
use crate::consts::*;
use crate::render::Drawable;
use crate::settings::{ConfigError, LevelCatalog};
use crate::sim::{Level, LevelStatus, SimEvent};

/// A full game session
#[derive(Debug, Clone)]
pub struct Game {
    catalog: LevelCatalog,
    level: Level,
    level_number: u32,
    round_number: u32,
    lives: u8,
    score: u64,
    seed: u64,
    /// Time spent flashing the cleared pyramid
    clear_elapsed: f32,
    events: Vec<SimEvent>,
}

impl Game {
    /// Start at level 1 round 1 with `START_LIVES`
    pub fn new(catalog: LevelCatalog, seed: u64) -> Result<Self, ConfigError> {
        let settings = catalog.settings_for(1, 1)?;
        let level = Level::new(settings, START_LIVES, 0, seed)?;
        log::info!("New game with seed {}", seed);
        Ok(Self {
            catalog,
            level,
            level_number: 1,
            round_number: 1,
            lives: START_LIVES,
            score: 0,
            seed,
            clear_elapsed: 0.0,
            events: vec![SimEvent::Sound(SoundEffect::GameStart)],
        })
    }

    /// Advance by `elapsed` milliseconds
    pub fn update(&mut self, elapsed: f32) -> Result<(), ConfigError> {
        if self.has_finished() {
            return Ok(());
        }

        self.level.update(elapsed);
        self.events.extend(self.level.drain_events());
        self.score = self.level.points();
        self.lives = self.level.lives();

        if self.level.status == LevelStatus::RoundCleared {
            self.clear_elapsed += elapsed;
            if self.clear_elapsed >= ROUND_CLEAR_TIME {
                self.change_round()?;
            }
        }
        Ok(())
    }

    /// Move on to the next round; the last round of the last level repeats
    pub fn change_round(&mut self) -> Result<(), ConfigError> {
        let levels = self.catalog.level_count();
        let rounds = self.catalog.round_count(self.level_number);
        if self.round_number >= rounds && self.level_number < levels {
            self.round_number = 1;
            self.level_number += 1;
        } else if self.round_number < rounds {
            self.round_number += 1;
        }

        let settings = self.catalog.settings_for(self.level_number, self.round_number)?;
        let seed = self
            .seed
            .wrapping_add(u64::from(self.level_number) * 100 + u64::from(self.round_number));
        self.level = Level::new(settings, self.lives, self.score, seed)?;
        self.clear_elapsed = 0.0;
        log::info!("Level {} round {}", self.level_number, self.round_number);
        Ok(())
    }

    /// Skip to the next round
    pub fn confirm(&mut self) -> Result<(), ConfigError> {
        self.change_round()
    }

    pub fn has_finished(&self) -> bool {
        self.lives == 0 || self.level.status == LevelStatus::GameOver
    }

    pub fn move_up(&mut self) -> bool {
        self.level.move_up()
    }

    pub fn move_down(&mut self) -> bool {
        self.level.move_down()
    }

    pub fn move_left(&mut self) -> bool {
        self.level.move_left()
    }

    pub fn move_right(&mut self) -> bool {
        self.level.move_right()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn renderables(&self) -> Vec<Drawable> {
        self.level.renderables()
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.extend(self.level.drain_events());
        std::mem::take(&mut self.events)
    }

    /// Text lines for the left and right HUD columns
    pub fn hud(&self) -> (Vec<String>, Vec<String>) {
        let left = vec![
            format!("SCORE: {}", self.score),
            format!("LIVES: {}", self.lives),
            "CHANGE COLOR TO:".to_string(),
        ];
        let right = vec![
            format!("LEVEL: {}", self.level_number),
            format!("ROUND: {}", self.round_number),
        ];
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let mut catalog = LevelCatalog::standard();
        for rounds in &mut catalog.levels {
            for settings in rounds {
                settings.enemies.clear();
            }
        }
        Game::new(catalog, 9).expect("valid catalog")
    }

    fn clear_pyramid(game: &mut Game) {
        for tile in game.level.map.tiles_mut() {
            tile.color = tile.max_color;
        }
    }

    #[test]
    fn test_new_game_starts_with_sound() {
        let mut game = game();
        assert_eq!((game.level_number(), game.round_number()), (1, 1));
        assert_eq!(game.lives(), START_LIVES);
        assert_eq!(game.drain_events(), vec![SimEvent::Sound(SoundEffect::GameStart)]);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_round_progression() {
        let mut game = game();
        for _ in 1..ROUNDS {
            game.confirm().expect("next round");
        }
        assert_eq!((game.level_number(), game.round_number()), (1, ROUNDS));
        game.confirm().expect("next level");
        assert_eq!((game.level_number(), game.round_number()), (2, 1));
    }

    #[test]
    fn test_last_round_repeats() {
        let mut game = game();
        for _ in 0..(LEVELS * ROUNDS + 3) {
            game.confirm().expect("next round");
        }
        assert_eq!((game.level_number(), game.round_number()), (LEVELS, ROUNDS));
    }

    #[test]
    fn test_cleared_round_moves_on_after_flashing() {
        let mut game = game();
        clear_pyramid(&mut game);
        game.update(16.0).expect("update");
        assert_eq!(game.level().status, LevelStatus::RoundCleared);
        let score = game.score();
        assert!(score >= 1000);

        let mut frames = 0;
        while game.round_number() == 1 {
            game.update(16.0).expect("update");
            frames += 1;
            assert!(frames < 1000, "round never changed");
        }
        assert_eq!(game.round_number(), 2);
        assert_eq!(game.level().status, LevelStatus::Playing);
        assert_eq!(game.level().points(), score);
        assert!(game.drain_events().contains(&SimEvent::RoundCleared));
    }

    #[test]
    fn test_hud_lines() {
        let game = game();
        let (left, right) = game.hud();
        assert_eq!(left[0], "SCORE: 0");
        assert_eq!(left[1], format!("LIVES: {START_LIVES}"));
        assert_eq!(right, vec!["LEVEL: 1".to_string(), "ROUND: 1".to_string()]);
    }

    #[test]
    fn test_game_over_finishes() {
        let mut game = game();
        game.level.spawner.player_mut().lives = 1;
        game.level.spawner.player_mut().kill(PLAYER_DEATH_TIME);
        let mut frames = 0;
        while !game.has_finished() {
            game.update(16.0).expect("update");
            frames += 1;
            assert!(frames < 1000, "game never ended");
        }
        assert_eq!(game.lives(), 0);
        assert!(game.drain_events().contains(&SimEvent::GameOver));
    }
}
