//! Movement animations for sprites
//!
//! Every animation owns a start and target pixel position and produces the
//! next interpolated position per `next()` call. Once finished it returns the
//! target exactly, on every subsequent call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::position::{Direction, Position2D};
use crate::consts::*;

/// Straight line, one pixel along the dominant axis per step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StraightAnimation {
    start: Position2D,
    target: Position2D,
    progress: i32,
    steps: i32,
}

impl StraightAnimation {
    pub fn new(start: Position2D, target: Position2D) -> Self {
        let steps = (target.x() - start.x())
            .abs()
            .max((target.y() - start.y()).abs());
        Self {
            start,
            target,
            progress: 0,
            steps,
        }
    }

    fn next(&mut self) -> Position2D {
        if self.progress >= self.steps {
            return self.target;
        }
        self.progress += 1;
        if self.progress == self.steps {
            return self.target;
        }
        let dx = (self.target.x() - self.start.x()) * self.progress / self.steps;
        let dy = (self.target.y() - self.start.y()) * self.progress / self.steps;
        self.start.offset(dx, dy)
    }
}

/// Circular arc advancing one degree per step
///
/// Angles are in degrees in screen space (y down), so increasing the angle
/// moves clockwise on screen. 270° is the top of the circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcAnimation {
    target: Position2D,
    center: Vec2,
    radius: f32,
    current_angle: i32,
    target_angle: i32,
    clockwise: bool,
}

impl ArcAnimation {
    /// Clockwise arc from `start` to `target`, `start_angle` must be below `target_angle`
    pub fn clockwise(start: Position2D, target: Position2D, start_angle: i32, target_angle: i32) -> Self {
        Self::new(start, target, start_angle, target_angle, true)
    }

    /// Counter-clockwise arc, `start_angle` must be above `target_angle`
    pub fn counter_clockwise(
        start: Position2D,
        target: Position2D,
        start_angle: i32,
        target_angle: i32,
    ) -> Self {
        Self::new(start, target, start_angle, target_angle, false)
    }

    fn new(
        start: Position2D,
        target: Position2D,
        start_angle: i32,
        target_angle: i32,
        clockwise: bool,
    ) -> Self {
        let (center, radius) = if start.x() == target.x() {
            // Vertical chord: circle centered between the two y values
            let radius = (start.y() - target.y()).abs() as f32 / 2.0;
            let cy = (start.y() + target.y()) as f32 / 2.0;
            (Vec2::new(start.x() as f32, cy), radius)
        } else {
            let radius = (start.x() - target.x()).abs() as f32 / 2.0;
            let cx = (start.x() + target.x()) as f32 / 2.0;
            (Vec2::new(cx, start.y() as f32), radius)
        };

        Self {
            target,
            center,
            radius,
            current_angle: start_angle,
            target_angle,
            clockwise,
        }
    }

    /// Radius of the circle the arc lies on
    pub fn radius(&self) -> f32 {
        self.radius
    }

    fn next(&mut self) -> Position2D {
        let reached = if self.clockwise {
            self.current_angle += 1;
            self.current_angle >= self.target_angle
        } else {
            self.current_angle -= 1;
            self.current_angle <= self.target_angle
        };

        if reached {
            self.current_angle = self.target_angle;
            return self.target;
        }

        let theta = (self.current_angle as f32).to_radians();
        let p = self.center + Vec2::new(theta.cos(), theta.sin()) * self.radius;
        Position2D::new(p.x.round() as i32, p.y.round() as i32)
    }
}

/// Two animations played back to back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedAnimation {
    first: Box<MovementAnimation>,
    second: Box<MovementAnimation>,
    first_done: bool,
}

impl ComposedAnimation {
    fn next(&mut self) -> Position2D {
        if !self.first_done {
            let pos = self.first.next();
            if pos == self.first.target() {
                self.first_done = true;
            }
            return pos;
        }
        self.second.next()
    }
}

/// Sprite movement animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementAnimation {
    Straight(StraightAnimation),
    Arc(ArcAnimation),
    Composed(ComposedAnimation),
    /// Jump to the target on the first step
    Displace { target: Position2D },
    /// Stay in place
    Standing { position: Position2D },
}

impl MovementAnimation {
    pub fn straight(start: Position2D, target: Position2D) -> Self {
        MovementAnimation::Straight(StraightAnimation::new(start, target))
    }

    pub fn displace(target: Position2D) -> Self {
        MovementAnimation::Displace { target }
    }

    pub fn standing(position: Position2D) -> Self {
        MovementAnimation::Standing { position }
    }

    pub fn composed(first: MovementAnimation, second: MovementAnimation) -> Self {
        MovementAnimation::Composed(ComposedAnimation {
            first: Box::new(first),
            second: Box::new(second),
            first_done: false,
        })
    }

    /// Final position of the animation
    pub fn target(&self) -> Position2D {
        match self {
            MovementAnimation::Straight(a) => a.target,
            MovementAnimation::Arc(a) => a.target,
            MovementAnimation::Composed(a) => a.second.target(),
            MovementAnimation::Displace { target } => *target,
            MovementAnimation::Standing { position } => *position,
        }
    }

    /// Advance one step and return the new position
    pub fn next(&mut self) -> Position2D {
        match self {
            MovementAnimation::Straight(a) => a.next(),
            MovementAnimation::Arc(a) => a.next(),
            MovementAnimation::Composed(a) => a.next(),
            MovementAnimation::Displace { target } => *target,
            MovementAnimation::Standing { position } => *position,
        }
    }

    /// Hop between two neighbouring cells (pixel coordinates)
    ///
    /// Down hops arc over the top and then drop; up hops rise and then arc
    /// over onto the upper cube.
    pub fn jump(dir: Direction, start: Position2D, target: Position2D) -> Self {
        if dir.is_up() {
            let mid = Position2D::new(start.x(), target.y());
            MovementAnimation::composed(
                MovementAnimation::straight(start, mid),
                MovementAnimation::arc_over(mid, target),
            )
        } else {
            let mid = Position2D::new(target.x(), start.y());
            MovementAnimation::composed(
                MovementAnimation::arc_over(start, mid),
                MovementAnimation::straight(mid, target),
            )
        }
    }

    /// Half circle over the top between two points on the same row
    fn arc_over(start: Position2D, target: Position2D) -> Self {
        if target.x() >= start.x() {
            MovementAnimation::Arc(ArcAnimation::clockwise(start, target, 180, 360))
        } else {
            MovementAnimation::Arc(ArcAnimation::counter_clockwise(start, target, 360, 180))
        }
    }

    /// Drop from one row above the screen top onto the given pixel position
    pub fn spawn_drop(target: Position2D) -> Self {
        MovementAnimation::straight(Position2D::new(target.x(), -ROW_HEIGHT), target)
    }

    /// Fall from the given pixel position to below the window
    pub fn fall(from: Position2D) -> Self {
        MovementAnimation::straight(from, Position2D::new(from.x(), WINDOW_HEIGHT + ROW_HEIGHT))
    }

    /// Float from a disk to above the top tile, then drop onto it
    pub fn disk_ride(disk: Position2D, top: Position2D) -> Self {
        let above = Position2D::new(top.x(), top.y() - ROW_HEIGHT);
        MovementAnimation::composed(
            MovementAnimation::straight(disk, above),
            MovementAnimation::straight(above, top),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_to_end(anim: &mut MovementAnimation, limit: usize) -> usize {
        let target = anim.target();
        for i in 0..limit {
            if anim.next() == target {
                return i + 1;
            }
        }
        panic!("animation did not finish within {limit} steps");
    }

    #[test]
    fn test_straight_steps_along_dominant_axis() {
        let mut anim = MovementAnimation::straight(Position2D::new(0, 0), Position2D::new(10, 4));
        assert_eq!(anim.next(), Position2D::new(1, 0));
        assert_eq!(run_to_end(&mut anim, 100), 9);
    }

    #[test]
    fn test_straight_zero_length() {
        let p = Position2D::new(3, 3);
        let mut anim = MovementAnimation::straight(p, p);
        assert_eq!(anim.next(), p);
    }

    #[test]
    fn test_arc_horizontal_chord_passes_over_top() {
        let start = Position2D::new(0, 100);
        let target = Position2D::new(40, 100);
        let mut anim = MovementAnimation::Arc(ArcAnimation::clockwise(start, target, 180, 360));

        let mut min_y = i32::MAX;
        let mut last = start;
        for _ in 0..180 {
            last = anim.next();
            min_y = min_y.min(last.y());
        }
        assert_eq!(last, target);
        // Radius 20, so the apex is 20 pixels above the chord
        assert_eq!(min_y, 80);
    }

    #[test]
    fn test_arc_counter_clockwise_goes_left() {
        let start = Position2D::new(40, 100);
        let target = Position2D::new(0, 100);
        let mut anim = MovementAnimation::Arc(ArcAnimation::counter_clockwise(start, target, 360, 180));
        let first = anim.next();
        assert!(first.x() <= 40);
        assert!(first.y() <= 100);
        run_to_end(&mut anim, 400);
    }

    #[test]
    fn test_arc_vertical_chord_radius() {
        let arc = ArcAnimation::clockwise(Position2D::new(10, 0), Position2D::new(10, 30), 270, 450);
        assert!((arc.radius() - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_composed_switches_after_first() {
        let a = Position2D::new(0, 0);
        let b = Position2D::new(0, 3);
        let c = Position2D::new(3, 3);
        let mut anim =
            MovementAnimation::composed(MovementAnimation::straight(a, b), MovementAnimation::straight(b, c));
        let path: Vec<_> = (0..6).map(|_| anim.next()).collect();
        assert_eq!(
            path,
            vec![
                Position2D::new(0, 1),
                Position2D::new(0, 2),
                b,
                Position2D::new(1, 3),
                Position2D::new(2, 3),
                c
            ]
        );
    }

    #[test]
    fn test_displace_is_instant() {
        let mut anim = MovementAnimation::displace(Position2D::new(5, 5));
        assert_eq!(anim.next(), Position2D::new(5, 5));
    }

    #[test]
    fn test_jump_ends_on_target() {
        for dir in Direction::ALL {
            let start = Position2D::new(6, 6).to_pixel();
            let target = Position2D::new(6, 6).hop(dir, 1).to_pixel();
            let mut anim = MovementAnimation::jump(dir, start, target);
            run_to_end(&mut anim, 1000);
            assert_eq!(anim.next(), target);
        }
    }

    proptest! {
        #[test]
        fn prop_finished_animation_is_idempotent(
            sx in -200i32..200, sy in -200i32..200,
            tx in -200i32..200, extra in 1usize..20,
            up in any::<bool>(),
        ) {
            let start = Position2D::new(sx, sy);
            let target = Position2D::new(tx, sy + if up { -48 } else { 48 });
            let dir = match (up, tx < sx) {
                (true, true) => Direction::UpLeft,
                (true, false) => Direction::UpRight,
                (false, true) => Direction::DownLeft,
                (false, false) => Direction::DownRight,
            };
            let mut anim = MovementAnimation::jump(dir, start, target);
            run_to_end(&mut anim, 2000);
            for _ in 0..extra {
                prop_assert_eq!(anim.next(), target);
            }
        }
    }
}
