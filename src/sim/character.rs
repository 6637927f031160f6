//! Characters and their state machine
//!
//! A character owns exactly one `CharacterState`. Transitions replace the
//! state wholesale; `advance` drives the active animation and reports what
//! happened so the scheduler can apply map and score side-effects.

use serde::{Deserialize, Serialize};

use super::animation::MovementAnimation;
use super::position::{Direction, Position2D, TOP_TILE};
use super::timer::FreezeCategory;
use crate::consts::*;

/// Stable identifier of a character inside a level
pub type EntityId = u32;

/// Enemy species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    RedBall,
    GreenBall,
    Ugg,
    Wrongway,
    SamAndSlick,
    Coily,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::RedBall,
        EnemyKind::GreenBall,
        EnemyKind::Ugg,
        EnemyKind::Wrongway,
        EnemyKind::SamAndSlick,
        EnemyKind::Coily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::RedBall => "RedBall",
            EnemyKind::GreenBall => "GreenBall",
            EnemyKind::Ugg => "Ugg",
            EnemyKind::Wrongway => "Wrongway",
            EnemyKind::SamAndSlick => "SamAndSlick",
            EnemyKind::Coily => "Coily",
        }
    }

    /// Parse a settings key, accepting snake_case and CamelCase spellings
    pub fn from_name(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "redball" => Some(EnemyKind::RedBall),
            "greenball" => Some(EnemyKind::GreenBall),
            "ugg" => Some(EnemyKind::Ugg),
            "wrongway" => Some(EnemyKind::Wrongway),
            "samandslick" | "samslick" => Some(EnemyKind::SamAndSlick),
            "coily" | "snake" => Some(EnemyKind::Coily),
            _ => None,
        }
    }

    /// Which freeze countdown suspends this species
    pub fn freeze_category(&self) -> FreezeCategory {
        match self {
            EnemyKind::Coily => FreezeCategory::Coily,
            _ => FreezeCategory::Enemies,
        }
    }

    /// Cells this species may drop onto when it enters the pyramid
    pub fn spawn_cells(&self) -> &'static [Position2D] {
        const TOP_SIDES: [Position2D; 2] = [Position2D::new(5, 5), Position2D::new(7, 5)];
        const BOTTOM_LEFT: [Position2D; 1] = [Position2D::new(0, 0)];
        const BOTTOM_RIGHT: [Position2D; 1] = [Position2D::new(2 * MAP_CENTER_X, 0)];
        match self {
            EnemyKind::Wrongway => &BOTTOM_LEFT,
            EnemyKind::Ugg => &BOTTOM_RIGHT,
            EnemyKind::RedBall | EnemyKind::GreenBall | EnemyKind::SamAndSlick | EnemyKind::Coily => {
                &TOP_SIDES
            }
        }
    }

    /// Hops picked at random when the species is not chasing
    pub fn wander_directions(&self) -> [Direction; 2] {
        match self {
            EnemyKind::Wrongway => [Direction::UpRight, Direction::DownRight],
            EnemyKind::Ugg => [Direction::UpLeft, Direction::DownLeft],
            _ => [Direction::DownLeft, Direction::DownRight],
        }
    }
}

/// Coily's life stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeForm {
    Egg,
    Adult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterKind {
    Player,
    Enemy(EnemyKind),
}

impl CharacterKind {
    pub fn enemy(&self) -> Option<EnemyKind> {
        match self {
            CharacterKind::Player => None,
            CharacterKind::Enemy(kind) => Some(*kind),
        }
    }
}

/// Active behaviour of a character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CharacterState {
    /// Entering the pyramid (drop from above, or disk ride for the player)
    Spawn,
    /// Standing on a tile
    Land { elapsed: f32 },
    /// Hopping toward `next_position`
    Move(Direction),
    /// Dropping out of the pyramid
    Fall,
    /// Terminal; the character is removed when the timer ends
    Death { remaining: f32 },
    /// Coily hatching on the bottom row
    Transform { remaining: f32 },
}

/// Outcome of advancing a character for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Nothing the scheduler has to act on
    Idle,
    /// Spawn animation finished, now standing on `current_position`
    Spawned,
    /// Hop finished on the given cell
    Arrived(Position2D),
    /// Enemy has stood long enough and wants its next hop
    ReadyToMove,
    /// Fall animation finished outside the window
    FellOff,
    /// Death timer ended
    Finished,
    /// Coily hatched into its adult form
    Transformed,
}

/// Sprite placement and animation progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    /// Pixel position
    pub position: Position2D,
    pub animation: MovementAnimation,
    /// Fractional animation steps carried between frames
    budget: f32,
    /// Direction of the last hop, for sprite flipping
    pub facing: Direction,
}

impl Sprite {
    fn standing(position: Position2D) -> Self {
        Self {
            position,
            animation: MovementAnimation::standing(position),
            budget: 0.0,
            facing: Direction::DownRight,
        }
    }

    fn play(&mut self, animation: MovementAnimation) {
        self.animation = animation;
        self.budget = 0.0;
    }

    /// Run as many animation steps as `steps` allows; true once the target is reached
    fn run(&mut self, steps: f32) -> bool {
        self.budget += steps;
        let target = self.animation.target();
        while self.budget >= 1.0 {
            self.budget -= 1.0;
            self.position = self.animation.next();
            if self.position == target {
                self.budget = 0.0;
                return true;
            }
        }
        self.position == target
    }
}

/// A player or enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub kind: CharacterKind,
    /// Coily's form; `None` for every other kind
    pub form: Option<SnakeForm>,
    pub current_position: Position2D,
    pub next_position: Position2D,
    /// Logical distance covered by one hop
    pub step: i32,
    /// Animation steps per millisecond
    pub speed: f32,
    /// Milliseconds an enemy stands on a tile before hopping again
    pub standing_time: f32,
    pub state: CharacterState,
    pub sprite: Sprite,
    /// False once the character should be removed
    pub alive: bool,
    /// Marked dead, death animation in progress
    pub dead: bool,
    /// Remaining lives (player only)
    pub lives: u8,
    /// Player left the pyramid without a disk; respawns on the top tile
    pub fell: bool,
}

impl Character {
    fn new(id: EntityId, kind: CharacterKind, speed: f32, standing_time: f32) -> Self {
        let form = match kind {
            CharacterKind::Enemy(EnemyKind::Coily) => Some(SnakeForm::Egg),
            _ => None,
        };
        Self {
            id,
            kind,
            form,
            current_position: Position2D::UNDEFINED,
            next_position: Position2D::UNDEFINED,
            step: 1,
            speed,
            standing_time,
            state: CharacterState::Land { elapsed: 0.0 },
            sprite: Sprite::standing(Position2D::UNDEFINED),
            alive: true,
            dead: false,
            lives: 0,
            fell: false,
        }
    }

    /// The player, dropping onto the top tile
    pub fn player(id: EntityId, speed: f32, lives: u8) -> Self {
        let mut player = Self::new(id, CharacterKind::Player, speed, 0.0);
        player.lives = lives;
        player.current_position = TOP_TILE;
        player.begin_spawn(TOP_TILE);
        player
    }

    /// An enemy parked at the off-map sentinel, not yet entering the pyramid
    pub fn enemy(id: EntityId, kind: EnemyKind, speed: f32, standing_time: f32) -> Self {
        Self::new(id, CharacterKind::Enemy(kind), speed, standing_time)
    }

    pub fn with_step(mut self, step: i32) -> Self {
        self.step = step;
        self
    }

    pub fn is_player(&self) -> bool {
        self.kind == CharacterKind::Player
    }

    pub fn enemy_kind(&self) -> Option<EnemyKind> {
        self.kind.enemy()
    }

    pub fn is_adult_snake(&self) -> bool {
        self.form == Some(SnakeForm::Adult)
    }

    /// True while an animation carries the character between cells
    pub fn is_moving(&self) -> bool {
        matches!(
            self.state,
            CharacterState::Spawn | CharacterState::Move(_) | CharacterState::Fall
        )
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Standing, hopping or hatching on the pyramid, so it can be touched
    pub fn is_on_map(&self) -> bool {
        self.alive
            && !self.dead
            && matches!(
                self.state,
                CharacterState::Land { .. } | CharacterState::Move(_) | CharacterState::Transform { .. }
            )
    }

    /// Stand on `pos` immediately
    pub fn place(&mut self, pos: Position2D) {
        self.current_position = pos;
        self.next_position = pos;
        self.sprite = Sprite::standing(pos.to_pixel());
        self.state = CharacterState::Land { elapsed: 0.0 };
    }

    /// Enter the pyramid by dropping onto `landing`
    pub fn begin_spawn(&mut self, landing: Position2D) {
        self.next_position = landing;
        let target = landing.to_pixel();
        self.sprite.position = Position2D::new(target.x(), -ROW_HEIGHT);
        self.sprite.play(MovementAnimation::spawn_drop(target));
        self.state = CharacterState::Spawn;
    }

    /// Start a hop; ignored while moving or dead
    pub fn start_move(&mut self, dir: Direction) -> bool {
        if self.is_moving() || self.dead || !self.alive {
            return false;
        }
        self.next_position = self.current_position.hop(dir, self.step);
        let target = self.next_position.to_pixel();
        self.sprite.facing = dir;
        self.sprite
            .play(MovementAnimation::jump(dir, self.sprite.position, target));
        self.state = CharacterState::Move(dir);
        true
    }

    /// Drop out of the pyramid from the current sprite position
    pub fn fall(&mut self) {
        self.sprite.play(MovementAnimation::fall(self.sprite.position));
        self.state = CharacterState::Fall;
    }

    /// Ride a disk back to the top tile
    pub fn ride_disk(&mut self) {
        self.next_position = TOP_TILE;
        self.sprite
            .play(MovementAnimation::disk_ride(self.sprite.position, TOP_TILE.to_pixel()));
        self.state = CharacterState::Spawn;
    }

    /// Start hatching (Coily egg only)
    pub fn transform(&mut self) {
        if self.form == Some(SnakeForm::Egg) {
            self.sprite.play(MovementAnimation::standing(self.sprite.position));
            self.state = CharacterState::Transform {
                remaining: TRANSFORM_TIME,
            };
        }
    }

    /// Enter the terminal Death state; a zero duration removes the character next frame
    pub fn kill(&mut self, duration: f32) {
        if self.dead {
            return;
        }
        self.dead = true;
        self.sprite.play(MovementAnimation::standing(self.sprite.position));
        self.state = CharacterState::Death {
            remaining: duration,
        };
    }

    /// Bring a dead player back, dropping onto `at`
    pub fn respawn(&mut self, at: Position2D) {
        self.dead = false;
        self.alive = true;
        self.fell = false;
        self.current_position = at;
        self.begin_spawn(at);
    }

    /// Advance the active state by `dt` milliseconds
    pub fn advance(&mut self, dt: f32) -> Advance {
        if !self.alive {
            return Advance::Idle;
        }

        match self.state {
            CharacterState::Spawn => {
                if self.sprite.run(self.speed * dt) {
                    self.current_position = self.next_position;
                    self.state = CharacterState::Land { elapsed: 0.0 };
                    Advance::Spawned
                } else {
                    Advance::Idle
                }
            }
            CharacterState::Move(_) => {
                if self.sprite.run(self.speed * dt) {
                    self.current_position = self.next_position;
                    self.state = CharacterState::Land { elapsed: 0.0 };
                    Advance::Arrived(self.current_position)
                } else {
                    Advance::Idle
                }
            }
            CharacterState::Fall => {
                if self.sprite.run(self.speed * dt) {
                    Advance::FellOff
                } else {
                    Advance::Idle
                }
            }
            CharacterState::Land { elapsed } => {
                let elapsed = elapsed + dt;
                self.state = CharacterState::Land { elapsed };
                if !self.is_player() && elapsed >= self.standing_time {
                    Advance::ReadyToMove
                } else {
                    Advance::Idle
                }
            }
            CharacterState::Death { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.state = CharacterState::Death { remaining: 0.0 };
                    self.alive = false;
                    Advance::Finished
                } else {
                    self.state = CharacterState::Death { remaining };
                    Advance::Idle
                }
            }
            CharacterState::Transform { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.form = Some(SnakeForm::Adult);
                    self.state = CharacterState::Land { elapsed: 0.0 };
                    Advance::Transformed
                } else {
                    self.state = CharacterState::Transform { remaining };
                    Advance::Idle
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landed_player(pos: Position2D, step: i32) -> Character {
        let mut player = Character::player(1, 0.5, 3).with_step(step);
        player.place(pos);
        player
    }

    fn advance_until(c: &mut Character, want: impl Fn(Advance) -> bool) -> Advance {
        for _ in 0..10_000 {
            let outcome = c.advance(16.0);
            if want(outcome) {
                return outcome;
            }
        }
        panic!("character never reached the expected outcome");
    }

    #[test]
    fn test_move_down_scenario() {
        let mut player = landed_player(Position2D::new(0, 0), 10);
        assert!(player.start_move(Direction::DownLeft));
        assert_eq!(player.next_position, Position2D::new(-10, -10));
        assert_eq!(player.state, CharacterState::Move(Direction::DownLeft));
        assert!(player.is_moving());

        let outcome = advance_until(&mut player, |a| a != Advance::Idle);
        assert_eq!(outcome, Advance::Arrived(Position2D::new(-10, -10)));
        assert!(matches!(player.state, CharacterState::Land { .. }));
        assert_eq!(player.current_position, Position2D::new(-10, -10));
        assert!(!player.is_moving());
    }

    #[test]
    fn test_move_ignored_while_moving_or_dead() {
        let mut player = landed_player(TOP_TILE, 1);
        assert!(player.start_move(Direction::DownRight));
        let next = player.next_position;
        assert!(!player.start_move(Direction::DownLeft));
        assert_eq!(player.next_position, next);
        assert_eq!(player.state, CharacterState::Move(Direction::DownRight));

        let mut dead = landed_player(TOP_TILE, 1);
        dead.kill(PLAYER_DEATH_TIME);
        let state = dead.state;
        assert!(!dead.start_move(Direction::DownLeft));
        assert_eq!(dead.state, state);
        assert_eq!(dead.next_position, TOP_TILE);
    }

    #[test]
    fn test_spawn_lands_on_target() {
        let mut player = Character::player(1, 1.0, 3);
        assert_eq!(player.state, CharacterState::Spawn);
        assert!(player.is_moving());
        advance_until(&mut player, |a| a == Advance::Spawned);
        assert_eq!(player.current_position, TOP_TILE);
        assert_eq!(player.sprite.position, TOP_TILE.to_pixel());
    }

    #[test]
    fn test_enemy_ready_after_standing_time() {
        let mut ball = Character::enemy(2, EnemyKind::RedBall, 0.5, 100.0);
        ball.place(Position2D::new(5, 5));
        assert_eq!(ball.advance(60.0), Advance::Idle);
        assert_eq!(ball.advance(60.0), Advance::ReadyToMove);
    }

    #[test]
    fn test_player_never_ready_to_move() {
        let mut player = landed_player(TOP_TILE, 1);
        assert_eq!(player.advance(100_000.0), Advance::Idle);
    }

    #[test]
    fn test_death_is_terminal() {
        let mut ball = Character::enemy(2, EnemyKind::GreenBall, 0.5, 100.0);
        ball.place(Position2D::new(5, 5));
        ball.kill(0.0);
        assert!(ball.is_dead());
        assert!(!ball.start_move(Direction::DownLeft));
        assert_eq!(ball.advance(16.0), Advance::Finished);
        assert!(!ball.alive);
        assert_eq!(ball.advance(16.0), Advance::Idle);
    }

    #[test]
    fn test_egg_transforms() {
        let mut coily = Character::enemy(3, EnemyKind::Coily, 0.5, 100.0);
        coily.place(Position2D::new(0, 0));
        coily.transform();
        assert!(matches!(coily.state, CharacterState::Transform { .. }));
        assert_eq!(coily.advance(TRANSFORM_TIME), Advance::Transformed);
        assert!(coily.is_adult_snake());

        // Adults do not hatch again
        coily.transform();
        assert!(matches!(coily.state, CharacterState::Land { .. }));
    }

    #[test]
    fn test_enemy_kind_names() {
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(EnemyKind::from_name("sam_and_slick"), Some(EnemyKind::SamAndSlick));
        assert_eq!(EnemyKind::from_name("RED_BALL"), Some(EnemyKind::RedBall));
        assert_eq!(EnemyKind::from_name("pacman"), None);
    }

    #[test]
    fn test_spawn_cells_are_tiles() {
        for kind in EnemyKind::ALL {
            for cell in kind.spawn_cells() {
                assert!(cell.is_tile(), "{kind:?} spawns onto {cell:?}");
            }
        }
        assert!(EnemyKind::Wrongway.spawn_cells()[0].is_bottom_row());
        assert!(EnemyKind::Ugg.spawn_cells()[0].is_bottom_row());
    }
}
