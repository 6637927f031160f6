//! Player/enemy contact rules
//!
//! Contact is decided by grid cell equality. What happens on contact is a
//! fixed table over `EnemyKind`, so adding a species forces a decision here.

use super::character::{Character, EnemyKind};
use super::points::{PointComponent, ScoreEvent};
use super::state::SimEvent;
use super::timer::{FreezeReason, TimerComponent};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Effect of an enemy touching the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionEffect {
    /// Freeze other enemies, award points, enemy dies
    FreezeAndKill { duration: f32, award: ScoreEvent },
    /// Award points, enemy dies
    Kill { award: ScoreEvent },
    /// The player dies
    Lethal,
}

/// Contact policy of each species
pub fn policy(kind: EnemyKind) -> CollisionEffect {
    match kind {
        EnemyKind::GreenBall => CollisionEffect::FreezeAndKill {
            duration: GREEN_BALL_FREEZE_TIME,
            award: ScoreEvent::KillGreenBall,
        },
        EnemyKind::SamAndSlick => CollisionEffect::Kill {
            award: ScoreEvent::KillSamAndSlick,
        },
        EnemyKind::RedBall | EnemyKind::Ugg | EnemyKind::Wrongway | EnemyKind::Coily => {
            CollisionEffect::Lethal
        }
    }
}

/// Both characters stand in (or hop out of) the same cell
pub fn touching(player: &Character, enemy: &Character) -> bool {
    player.is_on_map() && enemy.is_on_map() && player.current_position == enemy.current_position
}

/// Apply the contact policy of `enemy` to `player`
pub fn collide(
    player: &mut Character,
    enemy: &mut Character,
    points: &mut PointComponent,
    timer: &mut TimerComponent,
    events: &mut Vec<SimEvent>,
) {
    let Some(kind) = enemy.enemy_kind() else {
        return;
    };

    log::debug!(
        "Collision: player vs {} #{} at {:?}",
        kind.as_str(),
        enemy.id,
        enemy.current_position
    );

    match policy(kind) {
        CollisionEffect::FreezeAndKill { duration, award } => {
            timer.freeze(FreezeReason::GreenBall, duration);
            points.score(award);
            enemy.kill(0.0);
            events.push(SimEvent::Sound(SoundEffect::Kill));
        }
        CollisionEffect::Kill { award } => {
            points.score(award);
            enemy.kill(0.0);
            events.push(SimEvent::Sound(SoundEffect::Kill));
        }
        CollisionEffect::Lethal => {
            player.kill(PLAYER_DEATH_TIME);
            timer.freeze(FreezeReason::PlayerDeath, PLAYER_DEATH_TIME);
            events.push(SimEvent::Sound(SoundEffect::Death));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::position::Position2D;
    use crate::sim::timer::FreezeCategory;

    fn setup(kind: EnemyKind) -> (Character, Character) {
        let mut player = Character::player(1, 0.5, 3);
        player.place(Position2D::new(5, 5));
        let mut enemy = Character::enemy(2, kind, 0.5, 500.0);
        enemy.place(Position2D::new(5, 5));
        (player, enemy)
    }

    #[test]
    fn test_green_ball_freezes_and_dies() {
        let (mut player, mut enemy) = setup(EnemyKind::GreenBall);
        let mut points = PointComponent::default();
        let mut timer = TimerComponent::new();
        let mut events = Vec::new();

        assert!(touching(&player, &enemy));
        collide(&mut player, &mut enemy, &mut points, &mut timer, &mut events);

        assert!(!player.is_dead());
        assert!(enemy.is_dead());
        assert_eq!(points.points(), 100);
        assert!(timer.is_frozen(FreezeCategory::Enemies));
        assert!(timer.is_frozen(FreezeCategory::Coily));
        assert!(!timer.is_frozen(FreezeCategory::Player));
        assert_eq!(events, vec![SimEvent::Sound(SoundEffect::Kill)]);
    }

    #[test]
    fn test_sam_and_slick_is_caught() {
        let (mut player, mut enemy) = setup(EnemyKind::SamAndSlick);
        let mut points = PointComponent::default();
        let mut timer = TimerComponent::new();
        collide(&mut player, &mut enemy, &mut points, &mut timer, &mut Vec::new());
        assert!(enemy.is_dead());
        assert!(!player.is_dead());
        assert_eq!(points.points(), 300);
        assert!(!timer.is_frozen(FreezeCategory::Enemies));
    }

    #[test]
    fn test_lethal_enemies_kill_player() {
        for kind in [EnemyKind::RedBall, EnemyKind::Ugg, EnemyKind::Wrongway, EnemyKind::Coily] {
            let (mut player, mut enemy) = setup(kind);
            let mut points = PointComponent::default();
            let mut timer = TimerComponent::new();
            let mut events = Vec::new();
            collide(&mut player, &mut enemy, &mut points, &mut timer, &mut events);
            assert!(player.is_dead(), "{kind:?} should be lethal");
            assert!(!enemy.is_dead());
            assert_eq!(points.points(), 0);
            assert_eq!(events, vec![SimEvent::Sound(SoundEffect::Death)]);
        }
    }

    #[test]
    fn test_no_touch_after_death() {
        let (player, mut enemy) = setup(EnemyKind::SamAndSlick);
        enemy.kill(0.0);
        assert!(!touching(&player, &enemy));
    }
}
