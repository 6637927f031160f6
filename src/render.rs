//! Drawable list for the renderer
//!
//! The simulation never draws. Each frame the host asks the level for a flat
//! list of `Drawable`s, sorts by `z` and blits the sprite ids it knows.

use crate::consts::*;
use crate::sim::{
    Character, CharacterKind, CharacterState, Direction, Level, Position2D, SnakeForm,
};

/// Draw order, lowest first
pub mod z {
    pub const BACKGROUND: i32 = 0;
    /// Characters that fell off the back of the pyramid
    pub const BEHIND_MAP: i32 = 1;
    pub const TILE: i32 = 2;
    pub const DISK: i32 = 3;
    pub const HUD: i32 = 4;
    pub const ENEMY: i32 = 5;
    pub const COILY: i32 = 6;
    pub const PLAYER: i32 = 7;
}

/// Pixel position of the "change color to" hint
pub const TARGET_COLOR_POSITION: Position2D =
    Position2D::new(WINDOW_WIDTH / 9, WINDOW_HEIGHT / 4);

/// Character pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    Standing,
    Jumping,
    Dead,
}

/// What to draw; image lookup is up to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Background,
    /// Tile image for the completion color
    TargetColor(u8),
    /// Tile image by color index
    Tile(u8),
    Disk { frame: u8 },
    Character {
        kind: CharacterKind,
        form: Option<SnakeForm>,
        facing: Direction,
        pose: Pose,
    },
}

/// One sprite at a pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drawable {
    pub z: i32,
    pub position: Position2D,
    pub sprite: SpriteId,
}

fn pose(character: &Character) -> Pose {
    if character.is_dead() {
        Pose::Dead
    } else if character.is_moving() {
        Pose::Jumping
    } else {
        Pose::Standing
    }
}

fn character_drawable(character: &Character, coily: bool) -> Drawable {
    let z = match (character.state, character.kind) {
        // Falling away from the viewer
        (CharacterState::Fall, _) if character.sprite.facing.is_up() => z::BEHIND_MAP,
        (_, CharacterKind::Player) => z::PLAYER,
        _ if coily => z::COILY,
        _ => z::ENEMY,
    };
    Drawable {
        z,
        position: character.sprite.position,
        sprite: SpriteId::Character {
            kind: character.kind,
            form: character.form,
            facing: character.sprite.facing,
            pose: pose(character),
        },
    }
}

impl Level {
    /// Everything visible this frame, sorted by `z`
    pub fn renderables(&self) -> Vec<Drawable> {
        let mut out = Vec::with_capacity(
            2 + self.map.tiles().len() + self.map.disks().len() + 1 + self.spawner.enemies().len(),
        );

        out.push(Drawable {
            z: z::BACKGROUND,
            position: Position2D::new(0, 0),
            sprite: SpriteId::Background,
        });
        let max_color = self.map.tiles().first().map_or(0, |t| t.max_color);
        out.push(Drawable {
            z: z::HUD,
            position: TARGET_COLOR_POSITION,
            sprite: SpriteId::TargetColor(max_color),
        });

        out.extend(self.map.tiles().iter().map(|tile| Drawable {
            z: z::TILE,
            position: tile.position.to_pixel(),
            sprite: SpriteId::Tile(self.map.display_color(tile)),
        }));
        out.extend(self.map.disks().iter().map(|disk| Drawable {
            z: z::DISK,
            position: disk.position.to_pixel(),
            sprite: SpriteId::Disk { frame: disk.frame },
        }));

        let coily = self.spawner.coily_id();
        out.push(character_drawable(self.player(), false));
        out.extend(
            self.spawner
                .enemies()
                .iter()
                .filter(|e| e.current_position != Position2D::UNDEFINED || e.is_moving())
                .map(|e| character_drawable(e, Some(e.id) == coily)),
        );

        out.sort_by_key(|d| d.z);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LevelSettings;
    use crate::sim::EnemyKind;

    fn level() -> Level {
        let mut settings = LevelSettings::default();
        settings.enemies.clear();
        Level::new(&settings, 3, 0, 3).expect("valid settings")
    }

    #[test]
    fn test_renderables_cover_map_and_player() {
        let level = level();
        let drawables = level.renderables();
        let tiles = drawables.iter().filter(|d| matches!(d.sprite, SpriteId::Tile(_))).count();
        let disks = drawables.iter().filter(|d| matches!(d.sprite, SpriteId::Disk { .. })).count();
        assert_eq!(tiles, 28);
        assert_eq!(disks, level.map.disks().len());
        assert!(drawables.iter().any(|d| matches!(
            d.sprite,
            SpriteId::Character { kind: CharacterKind::Player, .. }
        )));
        assert_eq!(drawables[0].sprite, SpriteId::Background);
        assert!(drawables.windows(2).all(|w| w[0].z <= w[1].z));
    }

    #[test]
    fn test_tiles_draw_at_layout_pixels() {
        let level = level();
        let top = level
            .renderables()
            .into_iter()
            .find(|d| d.position == Position2D::new(6, 6).to_pixel() && d.z == z::TILE);
        assert_eq!(top.map(|d| d.sprite), Some(SpriteId::Tile(0)));
    }

    #[test]
    fn test_placed_enemy_drawn() {
        let mut level = level();
        let placed = level
            .spawner
            .place_enemy(EnemyKind::RedBall, 0.5, 1000.0, Position2D::new(5, 5));
        assert!(placed.is_some());
        let enemies = level.renderables().iter().filter(|d| d.z == z::ENEMY).count();
        assert_eq!(enemies, 1);
    }
}
