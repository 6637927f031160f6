//! Freeze countdowns
//!
//! Each freezable category has its own countdown. A category is frozen while
//! its countdown is positive; the scheduler skips advancing its characters and
//! consumes the countdowns at the end of every frame.

use serde::{Deserialize, Serialize};

/// Groups of characters that can be frozen independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreezeCategory {
    /// Every enemy except Coily, plus enemy spawning
    Enemies,
    /// Only `FreezeReason::All` stops the player; the built-in reasons leave
    /// it running
    Player,
    Coily,
}

impl FreezeCategory {
    pub const ALL: [FreezeCategory; 3] = [
        FreezeCategory::Enemies,
        FreezeCategory::Player,
        FreezeCategory::Coily,
    ];

    fn index(&self) -> usize {
        match self {
            FreezeCategory::Enemies => 0,
            FreezeCategory::Player => 1,
            FreezeCategory::Coily => 2,
        }
    }
}

/// Why a freeze was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreezeReason {
    /// The player caught a green ball
    GreenBall,
    /// The player is playing its death animation
    PlayerDeath,
    /// Everything stops, the player included. No gameplay rule raises it;
    /// it is the table entry a host uses to hold the whole board
    All,
}

/// Which categories each reason freezes
const FREEZE_TABLE: [(FreezeReason, &[FreezeCategory]); 3] = [
    (
        FreezeReason::GreenBall,
        &[FreezeCategory::Enemies, FreezeCategory::Coily],
    ),
    (
        FreezeReason::PlayerDeath,
        &[FreezeCategory::Enemies, FreezeCategory::Coily],
    ),
    (
        FreezeReason::All,
        &[
            FreezeCategory::Enemies,
            FreezeCategory::Player,
            FreezeCategory::Coily,
        ],
    ),
];

impl FreezeReason {
    pub fn categories(&self) -> &'static [FreezeCategory] {
        FREEZE_TABLE
            .iter()
            .find(|(reason, _)| reason == self)
            .map(|(_, categories)| *categories)
            .unwrap_or(&[])
    }
}

/// Per-category freeze countdowns (ms)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerComponent {
    remaining: [f32; 3],
}

impl TimerComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Green ball freeze: stops enemies (spawning included) and Coily
    pub fn freeze_entities(&mut self, duration: f32) {
        self.freeze(FreezeReason::GreenBall, duration);
    }

    /// Freeze every category of `reason`; an ongoing longer freeze is kept
    pub fn freeze(&mut self, reason: FreezeReason, duration: f32) {
        log::debug!("Freeze {:?} for {}ms", reason, duration);
        for category in reason.categories() {
            let slot = &mut self.remaining[category.index()];
            *slot = slot.max(duration);
        }
    }

    pub fn is_frozen(&self, category: FreezeCategory) -> bool {
        self.remaining[category.index()] > 0.0
    }

    /// Milliseconds of freeze left for `category`
    pub fn remaining(&self, category: FreezeCategory) -> f32 {
        self.remaining[category.index()]
    }

    /// Consume `dt` from every running countdown
    pub fn update(&mut self, dt: f32) {
        for slot in &mut self.remaining {
            if *slot > 0.0 {
                *slot = (*slot - dt).max(0.0);
            }
        }
    }

    /// Cancel every freeze (round transitions)
    pub fn clear(&mut self) {
        self.remaining = [0.0; 3];
    }
}
