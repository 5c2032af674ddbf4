//! The wall grid: a square matrix of cell types.
//!
//! Rows are y, columns are x, so `cell_at(row, col)` mirrors the world
//! coordinates the caster walks (`pos.y` picks the row). Out-of-range
//! queries answer [`WallType::Empty`] instead of panicking — rays and
//! movement simply see open space beyond the map edge, and well-formed
//! maps carry a solid border anyway.

use bitflags::bitflags;

bitflags! {
    /// What a cell lets through.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// The viewpoint may stand here.
        const WALKABLE = 1 << 0;
        /// Rays pass through without registering a hit.
        const RAY_TRANSPARENT = 1 << 1;
        /// Cell toggles between open and closed on use.
        const DOOR = 1 << 2;
    }
}

/// Cell content, one per grid slot. The numeric codes are the map-file
/// vocabulary; code 5 is unassigned and rejected by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WallType {
    Empty = 0,
    Brick = 1,
    Stone = 2,
    MossyStone = 3,
    ClosedDoor = 4,
    OpenDoor = 6,
}

impl WallType {
    /// Map-file code → cell type. `None` for unassigned codes.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => WallType::Empty,
            1 => WallType::Brick,
            2 => WallType::Stone,
            3 => WallType::MossyStone,
            4 => WallType::ClosedDoor,
            6 => WallType::OpenDoor,
            _ => return None,
        })
    }

    pub fn flags(self) -> CellFlags {
        match self {
            WallType::Empty => CellFlags::WALKABLE | CellFlags::RAY_TRANSPARENT,
            WallType::OpenDoor => {
                CellFlags::WALKABLE | CellFlags::RAY_TRANSPARENT | CellFlags::DOOR
            }
            WallType::ClosedDoor => CellFlags::DOOR,
            WallType::Brick | WallType::Stone | WallType::MossyStone => CellFlags::empty(),
        }
    }

    /// Rays pass through this cell.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.flags().contains(CellFlags::RAY_TRANSPARENT)
    }
}

/*──────────────────────────────── Grid ─────────────────────────────*/

/// Square matrix of [`WallType`], row-major.
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<WallType>,
}

impl Grid {
    /// Build from a row-major cell list; `cells.len()` must be `size²`.
    pub fn from_cells(size: usize, cells: Vec<WallType>) -> Self {
        debug_assert_eq!(cells.len(), size * size);
        Self { size, cells }
    }

    /// All-empty grid, mostly for tests and tooling.
    pub fn open(size: usize) -> Self {
        Self {
            size,
            cells: vec![WallType::Empty; size * size],
        }
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell content; out-of-range reads as [`WallType::Empty`].
    #[inline]
    pub fn cell_at(&self, row: i32, col: i32) -> WallType {
        if row < 0 || col < 0 || row >= self.size as i32 || col >= self.size as i32 {
            return WallType::Empty;
        }
        self.cells[row as usize * self.size + col as usize]
    }

    #[inline]
    pub fn is_walkable(&self, row: i32, col: i32) -> bool {
        self.cell_at(row, col).flags().contains(CellFlags::WALKABLE)
    }

    #[inline]
    pub fn is_door(&self, row: i32, col: i32) -> bool {
        self.cell_at(row, col).flags().contains(CellFlags::DOOR)
    }

    pub fn set(&mut self, row: usize, col: usize, cell: WallType) {
        debug_assert!(row < self.size && col < self.size);
        self.cells[row * self.size + col] = cell;
    }

    /// Flip a door between open and closed. Non-door cells are left alone.
    pub fn toggle_door(&mut self, row: i32, col: i32) {
        let flipped = match self.cell_at(row, col) {
            WallType::ClosedDoor => WallType::OpenDoor,
            WallType::OpenDoor => WallType::ClosedDoor,
            _ => return,
        };
        self.set(row as usize, col as usize, flipped);
    }

    /// Close every open door, e.g. on level restart.
    pub fn restore_doors(&mut self) {
        for cell in &mut self.cells {
            if *cell == WallType::OpenDoor {
                *cell = WallType::ClosedDoor;
            }
        }
    }

    /// Upper bound on whole-cell ray steps: the grid diagonal. A ray that
    /// walks this far without hitting anything has left the map.
    #[inline]
    pub fn diagonal_steps(&self) -> usize {
        (self.size as f32 * std::f32::consts::SQRT_2).ceil() as usize
    }

    /// Depth reported for a ray that hits nothing.
    #[inline]
    pub fn max_depth(&self) -> f32 {
        self.size as f32 * std::f32::consts::SQRT_2
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for (code, cell) in [
            (0, WallType::Empty),
            (1, WallType::Brick),
            (2, WallType::Stone),
            (3, WallType::MossyStone),
            (4, WallType::ClosedDoor),
            (6, WallType::OpenDoor),
        ] {
            assert_eq!(WallType::from_code(code), Some(cell));
            assert_eq!(cell as u8, code);
        }
        assert_eq!(WallType::from_code(5), None); // unassigned
        assert_eq!(WallType::from_code(7), None);
    }

    #[test]
    fn transparency_matches_walkability() {
        for cell in [WallType::Empty, WallType::OpenDoor] {
            assert!(cell.is_transparent());
            assert!(cell.flags().contains(CellFlags::WALKABLE));
        }
        for cell in [
            WallType::Brick,
            WallType::Stone,
            WallType::MossyStone,
            WallType::ClosedDoor,
        ] {
            assert!(!cell.is_transparent());
            assert!(!cell.flags().contains(CellFlags::WALKABLE));
        }
    }

    #[test]
    fn out_of_range_reads_empty() {
        let mut g = Grid::open(4);
        g.set(0, 0, WallType::Brick);

        assert_eq!(g.cell_at(0, 0), WallType::Brick);
        assert_eq!(g.cell_at(-1, 0), WallType::Empty);
        assert_eq!(g.cell_at(0, -1), WallType::Empty);
        assert_eq!(g.cell_at(4, 0), WallType::Empty);
        assert_eq!(g.cell_at(0, 4), WallType::Empty);
        assert!(g.is_walkable(100, 100));
    }

    #[test]
    fn doors_toggle_and_restore() {
        let mut g = Grid::open(4);
        g.set(1, 2, WallType::ClosedDoor);
        g.set(2, 2, WallType::ClosedDoor);
        g.set(3, 3, WallType::Brick);

        assert!(g.is_door(1, 2));
        assert!(!g.is_walkable(1, 2));

        g.toggle_door(1, 2);
        assert_eq!(g.cell_at(1, 2), WallType::OpenDoor);
        assert!(g.is_walkable(1, 2));
        assert!(g.is_door(1, 2)); // still a door while open

        g.toggle_door(3, 3); // not a door, no-op
        assert_eq!(g.cell_at(3, 3), WallType::Brick);

        g.restore_doors();
        assert_eq!(g.cell_at(1, 2), WallType::ClosedDoor);
        assert_eq!(g.cell_at(2, 2), WallType::ClosedDoor);
    }

    #[test]
    fn diagonal_bounds_the_traversal() {
        let g = Grid::open(10);
        assert_eq!(g.diagonal_steps(), 15); // ceil(10·√2)
        assert!(g.max_depth() > 14.0 && g.max_depth() < 14.2);
    }
}
