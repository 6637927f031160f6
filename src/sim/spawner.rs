//! Timed enemy creation and population bookkeeping
//!
//! The spawner owns every character of a level: the player, the live enemies
//! (sorted by id) and the id of Coily when it is on the board.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::character::{Character, EnemyKind, EntityId};
use super::position::Position2D;
use crate::settings::EnemyInfo;

/// Spawn schedule and population count of one enemy species
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnEntry {
    pub kind: EnemyKind,
    pub speed: f32,
    /// Milliseconds between two spawns
    pub spawning_time: f32,
    pub standing_time: f32,
    pub total_quantity: u32,
    pub current_quantity: u32,
    /// Milliseconds since the last spawn check fired
    pub elapsed: f32,
}

impl SpawnEntry {
    pub fn new(kind: EnemyKind, info: &EnemyInfo) -> Self {
        Self {
            kind,
            speed: info.speed,
            spawning_time: info.spawning_time,
            standing_time: info.standing_time,
            total_quantity: info.total_quantity,
            current_quantity: 0,
            elapsed: 0.0,
        }
    }
}

/// Creates enemies over time and keeps their counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    entries: Vec<SpawnEntry>,
    player: Character,
    enemies: Vec<Character>,
    coily: Option<EntityId>,
    next_id: EntityId,
}

impl Spawner {
    pub fn new(enemies: &BTreeMap<EnemyKind, EnemyInfo>, player_speed: f32, lives: u8) -> Self {
        let entries = enemies
            .iter()
            .map(|(kind, info)| SpawnEntry::new(*kind, info))
            .collect();
        Self {
            entries,
            player: Character::player(1, player_speed, lives),
            enemies: Vec::new(),
            coily: None,
            next_id: 2,
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> &Character {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Character {
        &mut self.player
    }

    /// Live enemies, Coily included, sorted by id
    pub fn enemies(&self) -> &[Character] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Character] {
        &mut self.enemies
    }

    /// Player and enemies borrowed together for collision resolution
    pub fn split_mut(&mut self) -> (&mut Character, &mut [Character]) {
        (&mut self.player, &mut self.enemies)
    }

    pub fn coily_id(&self) -> Option<EntityId> {
        self.coily
    }

    pub fn coily(&self) -> Option<&Character> {
        self.coily.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: EntityId) -> Option<&Character> {
        self.enemies
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|idx| &self.enemies[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.enemies
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|idx| &mut self.enemies[idx])
    }

    pub fn entries(&self) -> &[SpawnEntry] {
        &self.entries
    }

    pub fn entry(&self, kind: EnemyKind) -> Option<&SpawnEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Advance every schedule; returns the ids of the enemies created
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) -> Vec<EntityId> {
        let mut spawned = Vec::new();

        for idx in 0..self.entries.len() {
            let kind = self.entries[idx].kind;
            if kind == EnemyKind::Coily && self.coily.is_some() {
                continue;
            }

            let entry = &mut self.entries[idx];
            if entry.spawning_time <= entry.elapsed {
                entry.elapsed = 0.0;
                if entry.current_quantity < entry.total_quantity {
                    entry.current_quantity += 1;
                    let (speed, standing_time) = (entry.speed, entry.standing_time);
                    let id = self.create(kind, speed, standing_time, rng);
                    spawned.push(id);
                }
            } else {
                entry.elapsed += dt;
            }
        }

        spawned
    }

    fn create(&mut self, kind: EnemyKind, speed: f32, standing_time: f32, rng: &mut impl Rng) -> EntityId {
        let id = self.next_entity_id();
        let mut enemy = Character::enemy(id, kind, speed, standing_time);
        enemy.current_position = Position2D::UNDEFINED;

        let cells = kind.spawn_cells();
        let landing = cells[rng.random_range(0..cells.len())];
        enemy.begin_spawn(landing);

        if kind == EnemyKind::Coily {
            self.coily = Some(id);
        }
        log::info!("Spawned {} #{} toward {:?}", kind.as_str(), id, landing);
        // Ids grow monotonically, so pushing keeps the list sorted
        self.enemies.push(enemy);
        id
    }

    /// Put an enemy straight onto `at`, outside the spawn schedule
    ///
    /// The population count of `kind` is still kept, so nothing is placed
    /// when the kind is at its cap. A present Coily is replaced.
    pub fn place_enemy(
        &mut self,
        kind: EnemyKind,
        speed: f32,
        standing_time: f32,
        at: Position2D,
    ) -> Option<EntityId> {
        let replacing = kind == EnemyKind::Coily && self.coily.is_some();
        let at_cap = self
            .entry(kind)
            .is_some_and(|e| e.current_quantity >= e.total_quantity);
        if at_cap && !replacing {
            log::trace!("{} at its cap, not placed", kind.as_str());
            return None;
        }
        if replacing {
            self.kill_coily();
        }

        let id = self.next_entity_id();
        let mut enemy = Character::enemy(id, kind, speed, standing_time);
        enemy.place(at);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.current_quantity += 1;
        }
        if kind == EnemyKind::Coily {
            self.coily = Some(id);
        }
        self.enemies.push(enemy);
        Some(id)
    }

    /// One enemy of `kind` left the board
    pub fn death(&mut self, kind: EnemyKind) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            if entry.current_quantity > 0 {
                entry.current_quantity -= 1;
            }
        }
    }

    /// Kill every enemy and clear the board (round transitions, player death)
    pub fn kill_all(&mut self) {
        for enemy in &mut self.enemies {
            enemy.kill(0.0);
        }
        let kinds: Vec<EnemyKind> = self.enemies.iter().filter_map(Character::enemy_kind).collect();
        for kind in kinds {
            self.death(kind);
        }
        self.enemies.clear();
        self.coily = None;
    }

    /// Kill Coily alone, if present
    pub fn kill_coily(&mut self) {
        if let Some(id) = self.coily.take() {
            if let Ok(idx) = self.enemies.binary_search_by_key(&id, |c| c.id) {
                self.enemies.remove(idx);
                self.death(EnemyKind::Coily);
            }
        }
    }

    /// Remove enemies whose death finished; returns how many were removed
    pub fn remove_finished(&mut self) -> usize {
        let finished: Vec<(EntityId, EnemyKind)> = self
            .enemies
            .iter()
            .filter(|c| !c.alive)
            .filter_map(|c| c.enemy_kind().map(|k| (c.id, k)))
            .collect();

        for (id, kind) in &finished {
            self.death(*kind);
            if self.coily == Some(*id) {
                self.coily = None;
            }
        }
        self.enemies.retain(|c| c.alive);
        finished.len()
    }

    /// Drop the player back onto `at`
    pub fn respawn_player(&mut self, at: Position2D) {
        self.player.respawn(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn info(spawning_time: f32, total_quantity: u32) -> EnemyInfo {
        EnemyInfo {
            speed: 0.3,
            spawning_time,
            standing_time: 500.0,
            total_quantity,
        }
    }

    fn spawner(entries: &[(EnemyKind, EnemyInfo)]) -> Spawner {
        let map: BTreeMap<_, _> = entries.iter().cloned().collect();
        Spawner::new(&map, 0.5, 3)
    }

    fn count(spawner: &Spawner, kind: EnemyKind) -> usize {
        spawner
            .enemies()
            .iter()
            .filter(|e| e.enemy_kind() == Some(kind))
            .count()
    }

    #[test]
    fn test_red_ball_cap_scenario() {
        let mut spawner = spawner(&[(EnemyKind::RedBall, info(1000.0, 2))]);
        let mut rng = Pcg32::seed_from_u64(1);

        // First interval accumulates, next call fires
        spawner.update(1000.0, &mut rng);
        spawner.update(16.0, &mut rng);
        assert_eq!(count(&spawner, EnemyKind::RedBall), 1);

        spawner.update(1000.0, &mut rng);
        spawner.update(16.0, &mut rng);
        assert_eq!(count(&spawner, EnemyKind::RedBall), 2);

        spawner.update(1000.0, &mut rng);
        spawner.update(16.0, &mut rng);
        assert_eq!(count(&spawner, EnemyKind::RedBall), 2);
        assert_eq!(spawner.entry(EnemyKind::RedBall).map(|e| e.current_quantity), Some(2));
    }

    #[test]
    fn test_spawned_enemy_starts_off_map() {
        let mut spawner = spawner(&[(EnemyKind::Ugg, info(0.0, 1))]);
        let ids = spawner.update(16.0, &mut Pcg32::seed_from_u64(3));
        assert_eq!(ids.len(), 1);
        let ugg = spawner.get(ids[0]).expect("spawned");
        assert_eq!(ugg.current_position, Position2D::UNDEFINED);
        assert_eq!(ugg.next_position, Position2D::new(12, 0));
        assert!(ugg.is_moving());
    }

    #[test]
    fn test_coily_is_singleton() {
        let mut spawner = spawner(&[(EnemyKind::Coily, info(0.0, 3))]);
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..10 {
            spawner.update(100.0, &mut rng);
        }
        assert_eq!(count(&spawner, EnemyKind::Coily), 1);
        assert!(spawner.coily().is_some());

        spawner.kill_coily();
        assert!(spawner.coily().is_none());
        assert_eq!(spawner.entry(EnemyKind::Coily).map(|e| e.current_quantity), Some(0));

        spawner.update(100.0, &mut rng);
        assert!(spawner.coily().is_some());
    }

    #[test]
    fn test_placed_enemies_respect_cap() {
        let mut spawner = spawner(&[
            (EnemyKind::RedBall, info(1.0e9, 1)),
            (EnemyKind::Coily, info(1.0e9, 1)),
        ]);
        let at = Position2D::new(5, 5);
        assert!(spawner.place_enemy(EnemyKind::RedBall, 0.3, 500.0, at).is_some());
        assert!(spawner.place_enemy(EnemyKind::RedBall, 0.3, 500.0, at).is_none());
        let red = spawner.entry(EnemyKind::RedBall).expect("configured");
        assert_eq!((red.current_quantity, red.total_quantity), (1, 1));
        assert_eq!(count(&spawner, EnemyKind::RedBall), 1);

        // Coily at its cap is replaced, not duplicated
        let first = spawner.place_enemy(EnemyKind::Coily, 0.3, 500.0, at);
        let second = spawner.place_enemy(EnemyKind::Coily, 0.3, 500.0, at);
        assert!(first.is_some() && second.is_some());
        assert_eq!(spawner.coily_id(), second);
        assert_eq!(count(&spawner, EnemyKind::Coily), 1);
        assert_eq!(spawner.entry(EnemyKind::Coily).map(|e| e.current_quantity), Some(1));
    }

    #[test]
    fn test_death_never_underflows() {
        let mut spawner = spawner(&[(EnemyKind::RedBall, info(0.0, 2))]);
        spawner.death(EnemyKind::RedBall);
        spawner.death(EnemyKind::GreenBall);
        assert_eq!(spawner.entry(EnemyKind::RedBall).map(|e| e.current_quantity), Some(0));
    }

    #[test]
    fn test_remove_finished_updates_counts() {
        let mut spawner = spawner(&[(EnemyKind::GreenBall, info(0.0, 2))]);
        let ids = spawner.update(16.0, &mut Pcg32::seed_from_u64(9));
        if let Some(ball) = spawner.get_mut(ids[0]) {
            ball.kill(0.0);
            ball.advance(16.0);
        }
        assert_eq!(spawner.remove_finished(), 1);
        assert!(spawner.enemies().is_empty());
        assert_eq!(spawner.entry(EnemyKind::GreenBall).map(|e| e.current_quantity), Some(0));
    }

    #[test]
    fn test_kill_all_clears_board() {
        let mut spawner = spawner(&[
            (EnemyKind::RedBall, info(0.0, 2)),
            (EnemyKind::Coily, info(0.0, 1)),
        ]);
        spawner.update(16.0, &mut Pcg32::seed_from_u64(2));
        assert_eq!(spawner.enemies().len(), 2);
        spawner.kill_all();
        assert!(spawner.enemies().is_empty());
        assert!(spawner.coily_id().is_none());
        assert!(spawner.entries().iter().all(|e| e.current_quantity == 0));
        assert!(spawner.player().alive);
    }

    proptest! {
        #[test]
        fn prop_counts_never_exceed_caps(
            steps in proptest::collection::vec((0.0f32..400.0, any::<bool>()), 1..200),
            seed in any::<u64>(),
        ) {
            let mut spawner = spawner(&[
                (EnemyKind::RedBall, info(300.0, 2)),
                (EnemyKind::SamAndSlick, info(150.0, 1)),
                (EnemyKind::Coily, info(100.0, 4)),
            ]);
            let mut rng = Pcg32::seed_from_u64(seed);
            for (dt, kill_first) in steps {
                spawner.update(dt, &mut rng);
                if kill_first {
                    if let Some(first) = spawner.enemies_mut().first_mut() {
                        first.kill(0.0);
                        first.advance(0.0);
                    }
                    spawner.remove_finished();
                }
                for entry in spawner.entries() {
                    prop_assert!(entry.current_quantity <= entry.total_quantity);
                    prop_assert_eq!(entry.current_quantity as usize, count(&spawner, entry.kind));
                }
                prop_assert!(count(&spawner, EnemyKind::Coily) <= 1);
            }
        }
    }
}
