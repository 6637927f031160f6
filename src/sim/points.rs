//! Score ledger

use serde::{Deserialize, Serialize};

/// Scoring events with their fixed values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreEvent {
    /// A landing advanced a tile's color
    ColorChange,
    KillGreenBall,
    KillSamAndSlick,
    /// Coily followed the player off the pyramid
    KillCoily,
    /// Bonus for each disk left unused at the end of a round
    UnusedDisk,
    /// Round bonus, value taken from the level settings
    RoundComplete(u32),
}

impl ScoreEvent {
    pub fn points(&self) -> u32 {
        match self {
            ScoreEvent::ColorChange => 25,
            ScoreEvent::KillGreenBall => 100,
            ScoreEvent::KillSamAndSlick => 300,
            ScoreEvent::KillCoily => 500,
            ScoreEvent::UnusedDisk => 50,
            ScoreEvent::RoundComplete(points) => *points,
        }
    }
}

/// Accumulated score of the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointComponent {
    points: u64,
}

impl PointComponent {
    /// Start from the score carried over from previous rounds
    pub fn new(points: u64) -> Self {
        Self { points }
    }

    /// Award the points of `event`
    pub fn score(&mut self, event: ScoreEvent) {
        self.points = self.points.saturating_add(event.points() as u64);
    }

    pub fn points(&self) -> u64 {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_accumulates() {
        let mut points = PointComponent::new(1000);
        points.score(ScoreEvent::ColorChange);
        points.score(ScoreEvent::KillGreenBall);
        points.score(ScoreEvent::RoundComplete(1000));
        assert_eq!(points.points(), 2125);
    }
}
