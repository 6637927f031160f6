//! Q-Hop headless runner
//!
//! Plays a game with a random input script and logs what happens.
//! Usage: `qhop [seed] [catalog.json]`

use std::process::ExitCode;

use qhop::audio::{AudioManager, SoundSink};
use qhop::sim::SimEvent;
use qhop::{ConfigError, Game, LevelCatalog};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Fixed simulation step (ms)
const SIM_DT: f32 = 1000.0 / 60.0;
/// Cap on simulation steps per host frame
const MAX_SUBSTEPS: u32 = 4;
/// Host frame time of the scripted run (ms)
const FRAME_TIME: f32 = 20.0;
/// Stop after this many host frames
const MAX_FRAMES: u32 = 60 * 60 * 5;

struct Runner<S: SoundSink> {
    game: Game,
    audio: AudioManager<S>,
    input: Pcg32,
    accumulator: f32,
}

impl<S: SoundSink> Runner<S> {
    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) -> Result<(), ConfigError> {
        self.accumulator += dt.min(100.0);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.press_random_key();
            self.game.update(SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in self.game.drain_events() {
            match event {
                SimEvent::Sound(effect) => self.audio.play(effect),
                SimEvent::PlayerDied { lives_left } => log::info!("Lives left: {}", lives_left),
                SimEvent::RoundCleared => {
                    let (left, right) = self.game.hud();
                    log::info!("{} | {}", left.join(" "), right.join(" "));
                }
                SimEvent::GameOver => log::info!("Game over"),
            }
        }
        Ok(())
    }

    fn press_random_key(&mut self) {
        // Roughly one key press every few frames
        if !self.input.random_bool(0.2) {
            return;
        }
        match self.input.random_range(0..4) {
            0 => self.game.move_up(),
            1 => self.game.move_down(),
            2 => self.game.move_left(),
            _ => self.game.move_right(),
        };
    }
}

fn load_catalog(path: Option<&str>) -> Result<LevelCatalog, ConfigError> {
    match path {
        Some(path) => {
            log::info!("Loading catalog from {}", path);
            LevelCatalog::from_file(path)
        }
        None => Ok(LevelCatalog::standard()),
    }
}

fn run(seed: u64, catalog_path: Option<&str>) -> Result<(), ConfigError> {
    let catalog = load_catalog(catalog_path)?;
    let mut runner = Runner {
        game: Game::new(catalog, seed)?,
        audio: AudioManager::default(),
        input: Pcg32::seed_from_u64(seed ^ 0x5eed),
        accumulator: 0.0,
    };

    let mut frames = 0;
    while !runner.game.has_finished() && frames < MAX_FRAMES {
        runner.update(FRAME_TIME)?;
        frames += 1;
    }

    log::info!(
        "Finished after {} frames: level {} round {}, score {}, lives {}",
        frames,
        runner.game.level_number(),
        runner.game.round_number(),
        runner.game.score(),
        runner.game.lives()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Q-Hop (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    log::info!("Seed: {}", seed);

    match run(seed, args.get(1).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
