//! Player view-point in world space.
//!
//! * Only **yaw** (heading) is simulated — the renderer never tilts up/down.
//! * Movement slides along walls: the X and Y components of a step are
//!   collision-checked independently, so walking into a wall at an angle
//!   keeps the parallel component.

use glam::{Vec2, vec2};
use std::f32::consts::TAU;

use crate::world::grid::Grid;

#[derive(Clone, Copy, Debug)]
pub struct Viewpoint {
    pos: Vec2,
    yaw: f32, // radians, kept in [0, 2π)
}

impl Viewpoint {
    pub fn new(pos: Vec2, yaw: f32) -> Self {
        Self {
            pos,
            yaw: yaw.rem_euclid(TAU),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// Facing angle in radians, always in [0, 2π).
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Unit vector pointing where the viewpoint looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        vec2(c, s)
    }

    /// Rotate around the vertical axis (positive = counter-clockwise).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
    }

    /// Move by `forward` units along the facing direction and `side` units
    /// perpendicular to it, sliding along blocking cells.
    pub fn step(&mut self, forward: f32, side: f32, grid: &Grid) {
        let (s, c) = self.yaw.sin_cos();
        let d = vec2(c * forward - s * side, s * forward + c * side);

        // per-axis checks so a blocked axis still lets the other one move
        if grid.is_walkable((self.pos.y + d.y) as i32, self.pos.x as i32) {
            self.pos.y += d.y;
        }
        if grid.is_walkable(self.pos.y as i32, (self.pos.x + d.x) as i32) {
            self.pos.x += d.x;
        }
    }

    /// Grid cell of the closed or open door directly ahead, if any.
    /// Standing inside an open door disables use so the door cannot be
    /// slammed on the player.
    pub fn facing_door(&self, grid: &Grid) -> Option<(i32, i32)> {
        let here = (self.pos.y as i32, self.pos.x as i32);
        if grid.is_door(here.0, here.1) {
            return None;
        }
        let ahead = self.pos + self.forward();
        let cell = (ahead.y as i32, ahead.x as i32);
        grid.is_door(cell.0, cell.1).then_some(cell)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::grid::WallType;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn yaw_stays_normalized() {
        let mut v = Viewpoint::new(Vec2::ZERO, -0.5);
        assert!((0.0..TAU).contains(&v.yaw()));
        v.turn(TAU + PI);
        assert!((0.0..TAU).contains(&v.yaw()));
        assert!((v.yaw() - (PI - 0.5)).abs() < 1e-5);
    }

    #[test]
    fn forward_is_unit_length() {
        let v = Viewpoint::new(Vec2::ZERO, 1.2);
        assert!((v.forward().length() - 1.0).abs() < 1e-6);
        let east = Viewpoint::new(Vec2::ZERO, 0.0);
        assert!((east.forward() - vec2(1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn step_slides_along_walls() {
        // wall band at row 1, viewpoint below it walking diagonally
        let mut g = Grid::open(8);
        for col in 0..8 {
            g.set(1, col, WallType::Brick);
        }
        let mut v = Viewpoint::new(vec2(4.5, 2.5), -FRAC_PI_2); // facing -y
        v.step(0.8, 0.3, &g);

        // y blocked by the wall band, x (strafe) still moved
        assert!((v.pos().y - 2.5).abs() < 1e-6);
        assert!((v.pos().x - 4.5).abs() > 1e-6);
    }

    #[test]
    fn facing_door_only_ahead() {
        let mut g = Grid::open(8);
        g.set(2, 4, WallType::ClosedDoor);

        let v = Viewpoint::new(vec2(3.5, 2.5), 0.0); // looking east at (row 2, col 4)
        assert_eq!(v.facing_door(&g), Some((2, 4)));

        let away = Viewpoint::new(vec2(3.5, 2.5), PI);
        assert_eq!(away.facing_door(&g), None);
    }
}
