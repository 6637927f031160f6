//! Pyramid tiles and escape disks

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::position::{Direction, Position2D};
use crate::consts::*;

/// A colorable pyramid tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub position: Position2D,
    /// Current color index, 0 is the starting color
    pub color: u8,
    /// Color index that counts as completed
    pub max_color: u8,
    /// Landing on a completed tile resets it
    pub reversible: bool,
    /// Touched by the player at least once
    pub visited: bool,
}

impl Tile {
    pub fn new(position: Position2D, max_color: u8, reversible: bool) -> Self {
        Self {
            position,
            color: 0,
            max_color,
            reversible,
            visited: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.color == self.max_color
    }

    /// Player landing; returns true when the color advanced
    pub fn step_color(&mut self) -> bool {
        self.visited = true;
        if self.color < self.max_color {
            self.color += 1;
            true
        } else {
            if self.reversible {
                self.color = 0;
            }
            false
        }
    }
}

/// A one-shot escape platform floating beside the pyramid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    /// Off-pyramid cell the player hops onto
    pub position: Position2D,
    pub used: bool,
    /// Sprite frame for the spinning animation
    pub frame: u8,
    frame_time: f32,
}

impl Disk {
    pub fn new(position: Position2D) -> Self {
        Self {
            position,
            used: false,
            frame: 0,
            frame_time: 0.0,
        }
    }

    fn update(&mut self, dt: f32) {
        self.frame_time += dt;
        if self.frame_time > DISK_FRAME_TIME {
            self.frame_time = 0.0;
            self.frame = (self.frame + 1) % DISK_FRAMES;
        }
    }
}

/// Cells beside the pyramid where disks can float: one hop up-left of each
/// left edge tile and one hop up-right of each right edge tile
pub fn disk_slots() -> Vec<Position2D> {
    (0..MAP_ROWS - 1)
        .flat_map(|y| {
            [
                Position2D::new(y, y).hop(Direction::UpLeft, 1),
                Position2D::new(2 * MAP_CENTER_X - y, y).hop(Direction::UpRight, 1),
            ]
        })
        .collect()
}

/// Tiles and disks of the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapComponent {
    tiles: Vec<Tile>,
    disks: Vec<Disk>,
    /// Completed pyramid flashing between colors
    flashing: bool,
    flash_time: f32,
    /// Color index shown while flashing
    flash_color: u8,
}

impl MapComponent {
    /// Build the pyramid with `colors_number` colors per tile and
    /// `disks_number` disks on randomly chosen side slots
    pub fn new(colors_number: u8, disks_number: usize, reversible: bool, rng: &mut impl Rng) -> Self {
        let max_color = colors_number.saturating_sub(1);
        let tiles = (0..MAP_ROWS)
            .rev()
            .flat_map(|y| {
                (y..=2 * MAP_CENTER_X - y)
                    .step_by(2)
                    .map(move |x| Position2D::new(x, y))
            })
            .map(|pos| Tile::new(pos, max_color, reversible))
            .collect();

        let mut slots = disk_slots();
        let mut disks = Vec::with_capacity(disks_number);
        while disks.len() < disks_number && !slots.is_empty() {
            let idx = rng.random_range(0..slots.len());
            disks.push(Disk::new(slots.swap_remove(idx)));
        }

        Self {
            tiles,
            disks,
            flashing: false,
            flash_time: 0.0,
            flash_color: 0,
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    pub fn tile(&self, pos: Position2D) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.position == pos)
    }

    fn tile_mut(&mut self, pos: Position2D) -> Option<&mut Tile> {
        self.tiles.iter_mut().find(|t| t.position == pos)
    }

    pub fn is_tile(&self, pos: Position2D) -> bool {
        self.tile(pos).is_some()
    }

    /// Player landed on `pos`; true when the tile color advanced
    pub fn change_color(&mut self, pos: Position2D) -> bool {
        self.tile_mut(pos).map(Tile::step_color).unwrap_or(false)
    }

    /// Reset the tile at `pos` to the starting color
    pub fn reset_color(&mut self, pos: Position2D) {
        if let Some(tile) = self.tile_mut(pos) {
            tile.color = 0;
        }
    }

    pub fn disk_at(&self, pos: Position2D) -> Option<&Disk> {
        self.disks.iter().find(|d| d.position == pos && !d.used)
    }

    /// Ride the disk at `pos`; it disappears afterwards. False if there is none
    pub fn use_disk(&mut self, pos: Position2D) -> bool {
        match self.disks.iter().position(|d| d.position == pos && !d.used) {
            Some(idx) => {
                self.disks[idx].used = true;
                self.disks.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn unused_disks(&self) -> usize {
        self.disks.iter().filter(|d| !d.used).count()
    }

    /// Every tile reached the completion color
    pub fn is_complete(&self) -> bool {
        self.tiles.iter().all(Tile::is_complete)
    }

    /// Start flashing the finished pyramid
    pub fn start_flashing(&mut self) {
        self.flashing = true;
        self.flash_time = 0.0;
    }

    /// Color index to draw `tile` with this frame
    pub fn display_color(&self, tile: &Tile) -> u8 {
        if self.flashing { self.flash_color } else { tile.color }
    }

    /// Spin the disks
    pub fn update_disks(&mut self, dt: f32) {
        for disk in &mut self.disks {
            disk.update(dt);
        }
    }

    /// Passive tile animation (flashing once the round is won)
    pub fn update_tiles(&mut self, dt: f32) {
        if !self.flashing {
            return;
        }
        self.flash_time += dt;
        if self.flash_time > TILE_FLASH_TIME {
            self.flash_time = 0.0;
            let max = self.tiles.first().map(|t| t.max_color).unwrap_or(0);
            self.flash_color = if max == 0 { 0 } else { (self.flash_color + 1) % (max + 1) };
        }
    }
}
