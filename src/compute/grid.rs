//! Cubic voxel grid storage and neighborhood queries.

/// Grid allocation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("Grid of axis size {axis_size} overflows addressable memory")]
    Overflow { axis_size: usize },
    #[error("Failed to allocate {cells} cells")]
    OutOfMemory { cells: usize },
}

/// A cubic 3D grid of cell states.
///
/// Data is stored flat with indexing `z * axis^2 + y * axis + x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    axis_size: usize,
    cells: Vec<u32>,
}

impl VoxelGrid {
    /// Allocate a zeroed grid of `axis_size^3` cells.
    ///
    /// Fails instead of aborting when the size overflows or memory is exhausted.
    pub fn try_new(axis_size: usize) -> Result<Self, AllocationError> {
        let len = axis_size
            .checked_mul(axis_size)
            .and_then(|sq| sq.checked_mul(axis_size))
            .filter(|&len| len.checked_mul(std::mem::size_of::<u32>()).is_some())
            .ok_or(AllocationError::Overflow { axis_size })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| AllocationError::OutOfMemory { cells: len })?;
        cells.resize(len, 0);

        Ok(Self { axis_size, cells })
    }

    /// Build a grid from existing cell data.
    ///
    /// Returns `None` if `cells.len()` is not `axis_size^3`.
    pub fn from_cells(axis_size: usize, cells: Vec<u32>) -> Option<Self> {
        let expected = axis_size.checked_mul(axis_size)?.checked_mul(axis_size)?;
        (cells.len() == expected).then_some(Self { axis_size, cells })
    }

    #[inline]
    pub fn axis_size(&self) -> usize {
        self.axis_size
    }

    /// Total number of cells (axis_size^3).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert (x, y, z) coordinates to flat index.
    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.axis_size + y) * self.axis_size + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
        self.cells[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: u32) {
        let idx = self.idx(x, y, z);
        self.cells[idx] = value;
    }

    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [u32] {
        &mut self.cells
    }

    pub fn fill(&mut self, value: u32) {
        self.cells.fill(value);
    }

    /// Number of in-bounds positions in the 26-cell neighborhood of (x, y, z).
    pub fn neighborhood_size(&self, x: usize, y: usize, z: usize) -> u32 {
        let span = |c: usize| -> u32 {
            let lo = if c == 0 { 0 } else { 1 };
            let hi = if c + 1 >= self.axis_size { 0 } else { 1 };
            1 + lo + hi
        };
        span(x) * span(y) * span(z) - 1
    }

    /// Count neighbors in state `live` using the Moore neighborhood (26 neighbors).
    ///
    /// Out-of-bounds positions are skipped; there is no wraparound.
    pub fn count_neighbors(&self, x: usize, y: usize, z: usize, live: u32) -> u32 {
        let n = self.axis_size;
        let z_range = z.saturating_sub(1)..=(z + 1).min(n - 1);
        let y_range = y.saturating_sub(1)..=(y + 1).min(n - 1);
        let x_range = x.saturating_sub(1)..=(x + 1).min(n - 1);

        let mut count = 0;
        for nz in z_range {
            for ny in y_range.clone() {
                let row = (nz * n + ny) * n;
                for nx in x_range.clone() {
                    if nx == x && ny == y && nz == z {
                        continue;
                    }
                    if self.cells[row + nx] == live {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new() {
        let grid = VoxelGrid::try_new(8).unwrap();
        assert_eq!(grid.axis_size(), 8);
        assert_eq!(grid.len(), 512);
        assert!(grid.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_try_new_overflow() {
        assert_eq!(
            VoxelGrid::try_new(usize::MAX / 4),
            Err(AllocationError::Overflow {
                axis_size: usize::MAX / 4
            })
        );
    }

    #[test]
    fn test_try_new_out_of_memory() {
        // Fits in usize but no machine can reserve it.
        let axis_size = 1usize << ((usize::BITS - 4) / 3);
        assert!(matches!(
            VoxelGrid::try_new(axis_size),
            Err(AllocationError::OutOfMemory { .. })
        ));
    }

    #[test]
    fn test_from_cells() {
        assert!(VoxelGrid::from_cells(2, vec![0; 8]).is_some());
        assert!(VoxelGrid::from_cells(2, vec![0; 7]).is_none());
    }

    #[test]
    fn test_idx() {
        let grid = VoxelGrid::try_new(4).unwrap();
        assert_eq!(grid.idx(0, 0, 0), 0);
        assert_eq!(grid.idx(3, 3, 3), 63);
        assert_eq!(grid.idx(1, 0, 0), 1);
        assert_eq!(grid.idx(0, 1, 0), 4);
        assert_eq!(grid.idx(0, 0, 1), 16);
    }

    #[test]
    fn test_count_neighbors_cross() {
        let mut grid = VoxelGrid::try_new(8).unwrap();
        for (x, y, z) in [(4, 4, 4), (3, 4, 4), (5, 4, 4), (4, 3, 4), (4, 5, 4)] {
            grid.set(x, y, z, 2);
        }
        // A decaying cell is not a live neighbor
        grid.set(4, 4, 5, 1);

        assert_eq!(grid.count_neighbors(4, 4, 4, 2), 4);
        assert_eq!(grid.count_neighbors(3, 4, 4, 2), 3);
        assert_eq!(grid.count_neighbors(4, 5, 4, 2), 3);
        assert_eq!(grid.count_neighbors(0, 0, 0, 2), 0);
    }

    #[test]
    fn test_count_neighbors_corner_sees_seven() {
        let mut grid = VoxelGrid::try_new(5).unwrap();
        grid.fill(1);
        assert_eq!(grid.count_neighbors(0, 0, 0, 1), 7);
        assert_eq!(grid.count_neighbors(4, 4, 4, 1), 7);
        assert_eq!(grid.count_neighbors(0, 2, 2, 1), 17);
        assert_eq!(grid.count_neighbors(0, 0, 2, 1), 11);
        assert_eq!(grid.count_neighbors(2, 2, 2, 1), 26);
    }

    #[test]
    fn test_neighborhood_size() {
        let grid = VoxelGrid::try_new(5).unwrap();
        assert_eq!(grid.neighborhood_size(0, 0, 0), 7);
        assert_eq!(grid.neighborhood_size(0, 0, 2), 11);
        assert_eq!(grid.neighborhood_size(0, 2, 2), 17);
        assert_eq!(grid.neighborhood_size(2, 2, 2), 26);

        let tiny = VoxelGrid::try_new(1).unwrap();
        assert_eq!(tiny.neighborhood_size(0, 0, 0), 0);
    }

    #[test]
    fn test_single_cell_has_no_neighbors() {
        let mut grid = VoxelGrid::try_new(1).unwrap();
        grid.fill(1);
        assert_eq!(grid.count_neighbors(0, 0, 0, 1), 0);
    }
}
