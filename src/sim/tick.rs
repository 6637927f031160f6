//! Freeze-aware frame update
//!
//! Order within a frame: spawning, player, enemies, Coily, freeze countdowns,
//! collisions, disks, tiles, pruning, round completion. State advancement
//! always precedes collision resolution, which always precedes pruning.

use rand::Rng;

use super::character::{Advance, EnemyKind, EntityId};
use super::collision;
use super::points::ScoreEvent;
use super::position::{Direction, TOP_TILE};
use super::state::{Level, LevelStatus, Lure, SimEvent};
use super::timer::{FreezeCategory, FreezeReason};
use crate::audio::SoundEffect;
use crate::consts::*;

/// Advance the level by `dt` milliseconds
pub fn tick(level: &mut Level, dt: f32) {
    match level.status {
        LevelStatus::Playing => {}
        LevelStatus::RoundCleared => {
            // Keep the winning pyramid flashing
            level.map.update_disks(dt);
            level.map.update_tiles(dt);
            return;
        }
        LevelStatus::GameOver => return,
    }

    level.frames += 1;

    if !level.timer.is_frozen(FreezeCategory::Enemies) {
        level.spawner.update(dt, &mut level.rng);
    }

    if !level.timer.is_frozen(FreezeCategory::Player) {
        let outcome = level.spawner.player_mut().advance(dt);
        handle_player(level, outcome);
        if level.status != LevelStatus::Playing {
            return;
        }
    }

    // Plain enemies first, Coily last
    let coily = level.spawner.coily_id();
    let ids: Vec<EntityId> = level
        .spawner
        .enemies()
        .iter()
        .filter(|c| Some(c.id) != coily)
        .map(|c| c.id)
        .chain(coily)
        .collect();

    for id in ids {
        let Some(enemy) = level.spawner.get_mut(id) else {
            continue;
        };
        let Some(kind) = enemy.enemy_kind() else {
            continue;
        };
        // Dying enemies finish their death even while frozen
        if !enemy.is_dead() && level.timer.is_frozen(kind.freeze_category()) {
            continue;
        }
        let outcome = enemy.advance(dt);
        handle_enemy(level, id, kind, outcome);
    }

    // Freezes requested from here on start counting next frame
    level.timer.update(dt);

    resolve_collisions(level);

    level.map.update_disks(dt);
    level.map.update_tiles(dt);

    level.spawner.remove_finished();

    check_round_complete(level);
}

fn handle_player(level: &mut Level, outcome: Advance) {
    match outcome {
        Advance::Arrived(pos) => {
            if level.map.is_tile(pos) {
                if level.map.change_color(pos) {
                    level.points.score(ScoreEvent::ColorChange);
                }
            } else if level.map.disk_at(pos).is_some() {
                level.map.use_disk(pos);
                let player = level.spawner.player_mut();
                let dir = player.sprite.facing;
                let (dx, dy) = dir.delta();
                let from = pos.offset(-dx * player.step, -dy * player.step);
                player.ride_disk();
                level.lure = Some(Lure { from, dir });
                level.events.push(SimEvent::Sound(SoundEffect::DiskRide));
                log::info!("Player escaped on disk at {:?}", pos);
            } else {
                let player = level.spawner.player_mut();
                player.fell = true;
                player.fall();
                level.events.push(SimEvent::Sound(SoundEffect::Fall));
                log::debug!("Player jumped off the pyramid at {:?}", pos);
            }
        }
        Advance::Spawned => {
            // Disk ride over, Coily loses track
            level.lure = None;
        }
        Advance::FellOff => {
            level.spawner.player_mut().kill(PLAYER_DEATH_TIME);
            level.timer.freeze(FreezeReason::PlayerDeath, PLAYER_DEATH_TIME);
            level.events.push(SimEvent::Sound(SoundEffect::Death));
        }
        Advance::Finished => lose_life(level),
        Advance::Idle | Advance::ReadyToMove | Advance::Transformed => {}
    }
}

/// The player's death animation ended
fn lose_life(level: &mut Level) {
    let player = level.spawner.player_mut();
    player.lives = player.lives.saturating_sub(1);
    let lives_left = player.lives;
    let respawn_at = if player.fell {
        TOP_TILE
    } else {
        player.current_position
    };

    level.events.push(SimEvent::PlayerDied { lives_left });
    log::info!("Player died, {} lives left", lives_left);

    if lives_left == 0 {
        level.status = LevelStatus::GameOver;
        level.events.push(SimEvent::GameOver);
        log::info!("Game over with {} points", level.points.points());
        return;
    }

    level.spawner.kill_all();
    level.timer.clear();
    level.lure = None;
    level.spawner.respawn_player(respawn_at);
}

fn handle_enemy(level: &mut Level, id: EntityId, kind: EnemyKind, outcome: Advance) {
    match outcome {
        Advance::ReadyToMove => {
            let dir = choose_direction(level, id, kind);
            if let Some(enemy) = level.spawner.get_mut(id) {
                enemy.start_move(dir);
            }
        }
        Advance::Arrived(pos) => {
            let lured = level.lure.is_some();
            let Some(enemy) = level.spawner.get_mut(id) else {
                return;
            };
            if !level.map.is_tile(pos) {
                let adult = enemy.is_adult_snake();
                enemy.fall();
                if adult && lured {
                    level.points.score(ScoreEvent::KillCoily);
                    level.events.push(SimEvent::Sound(SoundEffect::Kill));
                    level.lure = None;
                    log::info!("Coily lured off the pyramid");
                }
                return;
            }
            match kind {
                EnemyKind::SamAndSlick => level.map.reset_color(pos),
                EnemyKind::Coily if pos.is_bottom_row() => enemy.transform(),
                _ => {}
            }
        }
        Advance::FellOff => {
            // Left the window: removed without points
            if let Some(enemy) = level.spawner.get_mut(id) {
                enemy.alive = false;
            }
        }
        Advance::Transformed => log::debug!("Coily #{} hatched", id),
        Advance::Idle | Advance::Spawned | Advance::Finished => {}
    }
}

/// Next hop of an enemy standing on a tile
fn choose_direction(level: &mut Level, id: EntityId, kind: EnemyKind) -> Direction {
    let Some(enemy) = level.spawner.get(id) else {
        return Direction::DownLeft;
    };

    if enemy.is_adult_snake() {
        let here = enemy.current_position;
        let target = match level.lure {
            Some(lure) if lure.from == here => return lure.dir,
            Some(lure) => lure.from,
            None => level.spawner.player().current_position,
        };
        return Direction::ALL
            .into_iter()
            .filter(|d| here.hop(*d, enemy.step).is_tile())
            .min_by_key(|d| here.hop(*d, enemy.step).manhattan(target))
            .unwrap_or(Direction::DownLeft);
    }

    let choices = kind.wander_directions();
    choices[level.rng.random_range(0..choices.len())]
}

/// Apply contact rules once per touching player/enemy pair
fn resolve_collisions(level: &mut Level) {
    let (player, enemies) = level.spawner.split_mut();
    for enemy in enemies.iter_mut() {
        if player.is_dead() {
            break;
        }
        if collision::touching(player, enemy) {
            collision::collide(
                player,
                enemy,
                &mut level.points,
                &mut level.timer,
                &mut level.events,
            );
        }
    }
}

fn check_round_complete(level: &mut Level) {
    if level.spawner.player().is_dead() || !level.map.is_complete() {
        return;
    }

    level.points.score(ScoreEvent::RoundComplete(level.round_score));
    for _ in 0..level.map.unused_disks() {
        level.points.score(ScoreEvent::UnusedDisk);
    }
    level.spawner.kill_all();
    level.timer.clear();
    level.map.start_flashing();
    level.status = LevelStatus::RoundCleared;
    level.events.push(SimEvent::Sound(SoundEffect::RoundClear));
    level.events.push(SimEvent::RoundCleared);
    log::info!("Round cleared with {} points", level.points.points());
}
