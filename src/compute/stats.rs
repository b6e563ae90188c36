//! Population statistics for monitoring a run.

use serde::{Deserialize, Serialize};

use super::VoxelGrid;

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub alive_cells: usize,
    pub decaying_cells: usize,
    pub dead_cells: usize,
    /// Fraction of cells that are not dead.
    pub occupancy: f32,
}

impl SimulationStats {
    /// Compute statistics from a grid.
    pub fn from_grid(grid: &VoxelGrid, max_state: u32) -> Self {
        let mut alive_cells = 0usize;
        let mut dead_cells = 0usize;

        for &state in grid.cells() {
            if state == max_state {
                alive_cells += 1;
            } else if state == 0 {
                dead_cells += 1;
            }
        }

        let total = grid.len();
        let decaying_cells = total - alive_cells - dead_cells;
        let occupancy = if total == 0 {
            0.0
        } else {
            (total - dead_cells) as f32 / total as f32
        };

        Self {
            alive_cells,
            decaying_cells,
            dead_cells,
            occupancy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut grid = VoxelGrid::try_new(2).unwrap();
        grid.set(0, 0, 0, 3);
        grid.set(1, 0, 0, 3);
        grid.set(0, 1, 0, 1);
        grid.set(1, 1, 0, 2);

        let stats = SimulationStats::from_grid(&grid, 3);
        assert_eq!(stats.alive_cells, 2);
        assert_eq!(stats.decaying_cells, 2);
        assert_eq!(stats.dead_cells, 4);
        assert_eq!(stats.occupancy, 0.5);
    }

    #[test]
    fn test_empty_grid() {
        let grid = VoxelGrid::try_new(3).unwrap();
        let stats = SimulationStats::from_grid(&grid, 1);
        assert_eq!(stats.dead_cells, 27);
        assert_eq!(stats.occupancy, 0.0);
    }
}
