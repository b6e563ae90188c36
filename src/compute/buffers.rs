//! Double-buffered grid pair with swappable read/write roles.

use super::{AllocationError, VoxelGrid};

/// Label of a physical buffer in a [`VolumeBuffers`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferId {
    A,
    B,
}

/// Two equally shaped grids. One is read ("old"), the other written ("new").
///
/// Buffer A starts as the old grid; every [`swap`](Self::swap) exchanges roles.
#[derive(Debug)]
pub struct VolumeBuffers {
    grids: [VoxelGrid; 2],
    /// Index of the grid currently playing the "old" role.
    old: usize,
}

impl VolumeBuffers {
    /// Allocate both grids. Nothing is kept if the second allocation fails.
    pub fn try_new(axis_size: usize) -> Result<Self, AllocationError> {
        let a = VoxelGrid::try_new(axis_size)?;
        let b = VoxelGrid::try_new(axis_size)?;
        Ok(Self {
            grids: [a, b],
            old: 0,
        })
    }

    #[inline]
    pub fn axis_size(&self) -> usize {
        self.grids[0].axis_size()
    }

    /// The grid read by the next transition (also the last published grid).
    #[inline]
    pub fn old(&self) -> &VoxelGrid {
        &self.grids[self.old]
    }

    #[inline]
    pub fn old_mut(&mut self) -> &mut VoxelGrid {
        &mut self.grids[self.old]
    }

    /// The grid written by the next transition.
    #[inline]
    pub fn new_grid(&self) -> &VoxelGrid {
        &self.grids[1 - self.old]
    }

    /// Borrow old for reading and new for writing at the same time.
    pub fn split(&mut self) -> (&VoxelGrid, &mut VoxelGrid) {
        let [a, b] = &mut self.grids;
        if self.old == 0 { (&*a, b) } else { (&*b, a) }
    }

    /// Exchange roles: new becomes old, old becomes the next write target.
    #[inline]
    pub fn swap(&mut self) {
        self.old = 1 - self.old;
    }

    /// Physical buffers currently playing (old, new).
    pub fn roles(&self) -> (BufferId, BufferId) {
        if self.old == 0 {
            (BufferId::A, BufferId::B)
        } else {
            (BufferId::B, BufferId::A)
        }
    }
}
