/** ===============================================================================
 * File: grid.rs
 * Author: Scott Stack
 * Description: Dense 2D grid of cells that the creatures inhabit. Each cell
 * carries a set of terrain/occupancy flags and the ID of its occupant
 * ===============================================================================*/
use serde::{Deserialize, Serialize};

//===============================================================================
// Cell Declarations
//===============================================================================

/// Per-cell flag bits. Only `occupied` and `wall` currently participate in the
/// simulation; the rest are carried for terrain layouts and telemetry
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFlags {
    pub occupied : bool,
    pub food : bool,
    pub poison : bool,
    pub wall : bool,
    pub sunlit : bool,
    pub water : bool,
}

/// A single grid cell. Invariant: `flags.occupied` is set exactly when
/// `creature_id` is non-zero
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub flags : CellFlags,
    pub creature_id : u32,
}

//===============================================================================
// Grid Declarations
//===============================================================================

/// Dense row-major 2D grid plus the simulation counters that live with it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    /// Cells in row-major order (index = y * width + x)
    pub cells : Vec<Cell>,

    /// Grid dimensions in cells
    pub width : usize,
    pub height : usize,

    /// Ticks elapsed in the current generation
    pub tick : u32,

    /// Number of generation boundaries that have fired
    pub generation : u32,

    /// Maximum number of creatures the simulation repopulates to
    pub max_creatures : usize,

    /// Number of creatures currently occupying cells
    pub num_creatures : usize,

    /// Number of creatures that met the survival criterion at the last
    /// generation boundary
    pub num_survivors_last_gen : usize,
}

impl Grid {

    /// Create a new grid of the given dimensions with all cells blank
    pub fn new(width : usize, height : usize, max_creatures : usize) -> Grid {
        return Grid {
            cells : vec![Cell::default(); width * height],
            width : width,
            height : height,
            tick : 0,
            generation : 0,
            max_creatures : max_creatures,
            num_creatures : 0,
            num_survivors_last_gen : 0,
        };
    }

    /// Get a reference to the cell at the given coordinates
    pub fn get_cell(&self, x : usize, y : usize) -> &Cell {
        return &self.cells[y * self.width + x];
    }

    /// Get a mutable reference to the cell at the given coordinates
    pub fn get_cell_mut(&mut self, x : usize, y : usize) -> &mut Cell {
        return &mut self.cells[y * self.width + x];
    }

    /// Check whether signed coordinates fall inside the grid
    pub fn in_bounds(&self, x : isize, y : isize) -> bool {
        return x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height;
    }

    /// Place a creature ID into a cell, keeping the occupancy invariant
    pub fn set_occupant(&mut self, x : usize, y : usize, creature_id : u32) {
        let cell = self.get_cell_mut(x, y);
        cell.flags.occupied = true;
        cell.creature_id = creature_id;
    }

    /// Remove any occupant from a cell, keeping the occupancy invariant
    pub fn clear_occupant(&mut self, x : usize, y : usize) {
        let cell = self.get_cell_mut(x, y);
        cell.flags.occupied = false;
        cell.creature_id = 0;
    }

    /// Remove every occupant from the grid (used when repopulating at a
    /// generation boundary, so stale occupancy never leaks across generations)
    pub fn clear_all_occupants(&mut self) {
        for idx in 0..self.cells.len() {
            self.cells[idx].flags.occupied = false;
            self.cells[idx].creature_id = 0;
        }
        self.num_creatures = 0;
    }

    /// Mark a cell as a wall
    pub fn add_wall(&mut self, x : usize, y : usize) {
        self.get_cell_mut(x, y).flags.wall = true;
    }

    /// Snapshot the occupant IDs of every occupied cell in row-major order.
    /// The tick driver iterates this snapshot so that a creature moving into a
    /// cell later in the sweep is not processed twice in the same tick
    pub fn occupant_ids_row_major(&self) -> Vec<u32> {
        let mut ids : Vec<u32> = Vec::with_capacity(self.num_creatures);
        for idx in 0..self.cells.len() {
            if self.cells[idx].flags.occupied {
                ids.push(self.cells[idx].creature_id);
            }
        }
        return ids;
    }

    /// Count of occupied cells (used by tests and board audits)
    pub fn count_occupied(&self) -> usize {
        let mut count = 0;
        for idx in 0..self.cells.len() {
            if self.cells[idx].flags.occupied {
                count += 1;
            }
        }
        return count;
    }
}
