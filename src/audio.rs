//! Sound signals
//!
//! The simulation only requests sounds; playback belongs to whatever
//! `SoundSink` the host plugs into `AudioManager`.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// A new game begins
    GameStart,
    /// Player hops
    Jump,
    /// Player dies
    Death,
    /// Enemy caught by the player
    Kill,
    /// Player jumps off the pyramid
    Fall,
    /// Player boards a disk
    DiskRide,
    /// Every tile completed
    RoundClear,
}

impl SoundEffect {
    /// Resource id of the clip
    pub fn clip(&self) -> &'static str {
        match self {
            SoundEffect::GameStart => "game_start",
            SoundEffect::Jump => "jump",
            SoundEffect::Death => "death",
            SoundEffect::Kill => "kill",
            SoundEffect::Fall => "fall",
            SoundEffect::DiskRide => "disk",
            SoundEffect::RoundClear => "round_clear",
        }
    }
}

/// Playback backend
pub trait SoundSink {
    /// Start `effect` at `volume` (0.0 - 1.0); never blocks
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl SoundSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::info!("Sound: {} (volume {:.2})", effect.clip(), volume);
    }
}

/// Volume and mute handling in front of a sink
pub struct AudioManager<S: SoundSink = LogSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogSink> {
    fn default() -> Self {
        Self::new(LogSink)
    }
}

impl<S: SoundSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
