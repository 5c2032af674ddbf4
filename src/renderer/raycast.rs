//! Grid-aligned ray traversal (DDA).
//!
//! Each ray is resolved as two independent searches — the next crossing of
//! a vertical (x-constant) grid line and the next crossing of a horizontal
//! (y-constant) one — stepped in whole-cell increments. The nearer of the
//! two Euclidean hits wins and decides the hit axis, the wall type and the
//! texture offset along the struck face.
//!
//! Two deliberate biases keep the maths out of trouble:
//!
//! * the fan's start angle carries [`ANGLE_EPSILON`] so no ray is ever
//!   exactly axis-parallel (division by a zero direction component);
//! * traversal is bounded by the grid diagonal, so a malformed or fully
//!   open map yields a sentinel miss instead of an endless march.
//!
//! Casting never fails: out-of-range cells read as empty and a ray that
//! exhausts its step budget reports maximal depth with no wall.

use glam::Vec2;

use crate::world::{Grid, Viewpoint, WallType};

/// Keeps every ray off exact axis alignment.
pub const ANGLE_EPSILON: f32 = 1e-4;

/// Direction components below this are treated as axis-parallel and the
/// corresponding grid-line search is skipped.
const DIR_EPSILON: f32 = 1e-6;

/// Which family of grid lines the ray struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitAxis {
    /// An x-constant line (wall face runs north-south on the map).
    Vertical,
    /// A y-constant line (wall face runs east-west).
    Horizontal,
}

/// Result of one cast, one per screen column per frame.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Distance along the view-plane normal (not Euclidean), so flat walls
    /// project flat. Always ≥ 0.
    pub depth: f32,
    pub axis: HitAxis,
    /// `WallType::Empty` marks a miss.
    pub wall: WallType,
    /// Fractional position along the struck face, in [0, 1).
    pub tex_u: f32,
    /// Screen column this ray belongs to, in [0, ray_count).
    pub column: usize,
}

impl RayHit {
    #[inline]
    pub fn is_miss(&self) -> bool {
        self.wall == WallType::Empty
    }
}

/// Nearest opaque cell along one grid-line family.
struct AxisHit {
    dist: f32,
    wall: WallType,
    u: f32,
}

/// Casts a fan of rays across the field of view.
pub struct RayCaster {
    ray_count: usize,
    delta_angle: f32,
}

impl RayCaster {
    pub fn new(ray_count: usize, delta_angle: f32) -> Self {
        debug_assert!(ray_count > 0 && delta_angle > 0.0);
        Self {
            ray_count,
            delta_angle,
        }
    }

    #[inline]
    pub fn ray_count(&self) -> usize {
        self.ray_count
    }

    #[inline]
    pub fn delta_angle(&self) -> f32 {
        self.delta_angle
    }

    /// Cast `ray_count` rays centred on the viewpoint's facing angle and
    /// return one [`RayHit`] per screen column, in column order.
    ///
    /// Reported depths are fisheye-corrected: each Euclidean hit distance
    /// is projected onto the view axis with `cos(ray − facing)`.
    pub fn cast_fan(&self, view: &Viewpoint, grid: &Grid) -> Vec<RayHit> {
        let half_fov = 0.5 * self.delta_angle * self.ray_count as f32;
        let start = view.yaw() - half_fov + ANGLE_EPSILON;

        let mut hits = Vec::with_capacity(self.ray_count);
        for column in 0..self.ray_count {
            let angle = start + column as f32 * self.delta_angle;
            let mut hit = self.cast(view.pos(), angle, grid, column);
            hit.depth *= (angle - view.yaw()).cos();
            hits.push(hit);
        }
        hits
    }

    /// Cast a single ray. The returned depth is Euclidean; `cast_fan`
    /// applies the perpendicular correction.
    pub fn cast(&self, origin: Vec2, angle: f32, grid: &Grid, column: usize) -> RayHit {
        let (sin_a, cos_a) = angle.sin_cos();
        let bound = grid.diagonal_steps();

        let horizontal = Self::scan_rows(origin, sin_a, cos_a, grid, bound);
        let vertical = Self::scan_cols(origin, sin_a, cos_a, grid, bound);

        match (vertical, horizontal) {
            (Some(v), Some(h)) => {
                if v.dist <= h.dist {
                    Self::hit(v, HitAxis::Vertical, column)
                } else {
                    Self::hit(h, HitAxis::Horizontal, column)
                }
            }
            (Some(v), None) => Self::hit(v, HitAxis::Vertical, column),
            (None, Some(h)) => Self::hit(h, HitAxis::Horizontal, column),
            // both searches exhausted: sentinel so the compositor can
            // still paint a background for this column
            (None, None) => RayHit {
                depth: grid.max_depth(),
                axis: HitAxis::Vertical,
                wall: WallType::Empty,
                tex_u: 0.0,
                column,
            },
        }
    }

    fn hit(axis_hit: AxisHit, axis: HitAxis, column: usize) -> RayHit {
        RayHit {
            depth: axis_hit.dist,
            axis,
            wall: axis_hit.wall,
            tex_u: axis_hit.u,
            column,
        }
    }

    /// March the crossings of y-constant lines.
    fn scan_rows(
        origin: Vec2,
        sin_a: f32,
        cos_a: f32,
        grid: &Grid,
        bound: usize,
    ) -> Option<AxisHit> {
        if sin_a.abs() < DIR_EPSILON {
            return None; // never crosses a row line
        }

        // first line ahead of the origin; going up (-y) we nudge just past
        // the line so `floor` lands in the cell above it
        let (mut y, step_y) = if sin_a > 0.0 {
            (origin.y.floor() + 1.0, 1.0)
        } else {
            (origin.y.floor() - 1e-6, -1.0)
        };
        let mut dist = (y - origin.y) / sin_a;
        let mut x = origin.x + dist * cos_a;

        let delta_dist = step_y / sin_a; // > 0 by construction
        let delta_x = delta_dist * cos_a;

        for _ in 0..bound {
            let cell = grid.cell_at(y.floor() as i32, x.floor() as i32);
            if !cell.is_transparent() {
                return Some(AxisHit {
                    dist,
                    wall: cell,
                    u: x.rem_euclid(1.0),
                });
            }
            x += delta_x;
            y += step_y;
            dist += delta_dist;
        }
        None
    }

    /// March the crossings of x-constant lines.
    fn scan_cols(
        origin: Vec2,
        sin_a: f32,
        cos_a: f32,
        grid: &Grid,
        bound: usize,
    ) -> Option<AxisHit> {
        if cos_a.abs() < DIR_EPSILON {
            return None;
        }

        let (mut x, step_x) = if cos_a > 0.0 {
            (origin.x.floor() + 1.0, 1.0)
        } else {
            (origin.x.floor() - 1e-6, -1.0)
        };
        let mut dist = (x - origin.x) / cos_a;
        let mut y = origin.y + dist * sin_a;

        let delta_dist = step_x / cos_a;
        let delta_y = delta_dist * sin_a;

        for _ in 0..bound {
            let cell = grid.cell_at(y.floor() as i32, x.floor() as i32);
            if !cell.is_transparent() {
                return Some(AxisHit {
                    dist,
                    wall: cell,
                    u: y.rem_euclid(1.0),
                });
            }
            y += delta_y;
            x += step_x;
            dist += delta_dist;
        }
        None
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, PI, TAU};

    /// `size`×`size` open room with a one-cell wall border.
    fn walled_box(size: usize) -> Grid {
        let mut g = Grid::open(size);
        for i in 0..size {
            g.set(0, i, WallType::Brick);
            g.set(size - 1, i, WallType::Brick);
            g.set(i, 0, WallType::Brick);
            g.set(i, size - 1, WallType::Brick);
        }
        g
    }

    fn caster(ray_count: usize) -> RayCaster {
        RayCaster::new(ray_count, FRAC_PI_3 / ray_count as f32)
    }

    #[test]
    fn center_ray_in_ten_by_ten_box() {
        let grid = walled_box(10);
        let view = Viewpoint::new(vec2(5.0, 5.0), 0.0);
        let hits = caster(100).cast_fan(&view, &grid);

        assert_eq!(hits.len(), 100);
        let center = &hits[50];
        // boundary wall column at x=9 is 4 units ahead
        assert!((center.depth - 4.0).abs() < 1e-3, "depth {}", center.depth);
        assert_eq!(center.wall, WallType::Brick);
        assert_eq!(center.axis, HitAxis::Vertical);
        assert_eq!(center.column, 50);
    }

    #[test]
    fn all_open_map_terminates_with_sentinel() {
        let grid = Grid::open(10);
        let rc = caster(16);
        let view = Viewpoint::new(vec2(5.0, 5.0), 1.1);
        for hit in rc.cast_fan(&view, &grid) {
            assert!(hit.is_miss());
            assert!(hit.depth > 0.0);
            assert!(hit.depth <= grid.max_depth());
        }
    }

    #[test]
    fn all_closed_map_terminates_immediately() {
        let mut grid = Grid::open(8);
        for r in 0..8 {
            for c in 0..8 {
                grid.set(r, c, WallType::Stone);
            }
        }
        let rc = caster(8);
        for hit in rc.cast_fan(&Viewpoint::new(vec2(4.5, 4.5), 0.3), &grid) {
            assert!(!hit.is_miss());
            assert!(hit.depth >= 0.0);
            assert!(hit.depth <= 1.5);
        }
    }

    #[test]
    fn perpendicular_depth_equals_euclidean_straight_ahead() {
        let grid = walled_box(10);
        let view = Viewpoint::new(vec2(5.0, 5.0), 0.0);
        let rc = caster(100);

        let euclid = rc.cast(view.pos(), view.yaw() + ANGLE_EPSILON, &grid, 0);
        let fan = rc.cast_fan(&view, &grid);
        assert!((fan[50].depth - euclid.depth).abs() < 1e-4);
    }

    #[test]
    fn symmetric_offsets_hit_at_equal_depth() {
        let grid = walled_box(10);
        let view = Viewpoint::new(vec2(5.0, 5.0), 0.0);
        let hits = caster(100).cast_fan(&view, &grid);

        for k in [5, 15, 30, 45] {
            let left = hits[50 - k].depth;
            let right = hits[50 + k].depth;
            assert!(
                (left - right).abs() < 1e-2,
                "k={k}: left {left} right {right}"
            );
        }
    }

    #[test]
    fn axis_parallel_angles_are_safe() {
        let grid = walled_box(10);
        let origin = vec2(5.5, 5.5);
        let rc = caster(64);

        // walls are a full cell thick, so the west/north inner faces sit
        // one unit further in than the east/south ones
        for (angle, expect_axis, expect_depth) in [
            (0.0, HitAxis::Vertical, 3.5),
            (FRAC_PI_2, HitAxis::Horizontal, 3.5),
            (PI, HitAxis::Vertical, 4.5),
            (3.0 * FRAC_PI_2, HitAxis::Horizontal, 4.5),
            (TAU, HitAxis::Vertical, 3.5),
        ] {
            let hit = rc.cast(origin, angle, &grid, 0);
            assert!(!hit.is_miss());
            assert_eq!(hit.axis, expect_axis, "angle {angle}");
            assert!(
                (hit.depth - expect_depth).abs() < 1e-3,
                "angle {angle}: {}",
                hit.depth
            );
        }
    }

    #[test]
    fn texture_u_is_face_fraction() {
        // wall column at x=7, ray from (5.0, 5.25) heading east hits the
        // face at y = 5.25 → u = 0.25
        let mut grid = Grid::open(10);
        for r in 0..10 {
            grid.set(r, 7, WallType::Stone);
        }
        let hit = caster(32).cast(vec2(5.0, 5.25), 0.0, &grid, 0);
        assert_eq!(hit.axis, HitAxis::Vertical);
        assert!((hit.tex_u - 0.25).abs() < 1e-4);
        assert!((0.0..1.0).contains(&hit.tex_u));
    }

    #[test]
    fn rays_pass_through_open_doors() {
        let mut grid = walled_box(10);
        grid.set(5, 7, WallType::ClosedDoor);
        let view = vec2(5.0, 5.5);
        let rc = caster(32);

        let closed = rc.cast(view, ANGLE_EPSILON, &grid, 0);
        assert_eq!(closed.wall, WallType::ClosedDoor);

        grid.toggle_door(5, 7);
        let open = rc.cast(view, ANGLE_EPSILON, &grid, 0);
        assert_eq!(open.wall, WallType::Brick); // boundary behind the door
        assert!(open.depth > closed.depth);
    }
}
