//! Publishing simulation output to a rendering collaborator.

use super::VoxelGrid;

/// Read-only view of the most recent generation plus the scalars a renderer
/// needs to map cells to space and color.
///
/// The frame borrows the engine's buffer. That buffer becomes a write target
/// again two steps later, so a sink must copy what it wants to keep.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Cell states, index `z * axis^2 + y * axis + x`.
    pub cells: &'a [u32],
    /// Grid side length.
    pub axis_size: u32,
    /// `axis_size^2`, the z-stride.
    pub sqr_axis_size: u32,
    /// `axis_size^3`, the cell count.
    pub cell_count: u32,
    /// Fully alive state (`state_count - 1`).
    pub max_state: u32,
    /// Normalized size of one cell, `1 / axis_size`.
    pub texel_size: f32,
    /// Generation number of these cells.
    pub generation: u64,
}

impl<'a> RenderFrame<'a> {
    /// Build a frame over `grid`.
    ///
    /// The `u32` scalars are exact for grids up to
    /// [`MAX_AXIS_SIZE`](crate::schema::MAX_AXIS_SIZE), which config validation
    /// enforces. Larger grids saturate at `u32::MAX`.
    pub fn new(grid: &'a VoxelGrid, max_state: u32, generation: u64) -> Self {
        let (axis, sqr_axis_size, cell_count) = frame_dims(grid.axis_size());
        Self {
            cells: grid.cells(),
            axis_size: axis,
            sqr_axis_size,
            cell_count,
            max_state,
            texel_size: 1.0 / axis as f32,
            generation,
        }
    }

    /// Copy the frame into an owned snapshot.
    pub fn to_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            cells: self.cells.to_vec(),
            axis_size: self.axis_size,
            max_state: self.max_state,
            generation: self.generation,
        }
    }
}

/// `(axis, axis^2, axis^3)` as `u32`, saturating instead of wrapping.
fn frame_dims(axis_size: usize) -> (u32, u32, u32) {
    let axis = u32::try_from(axis_size).unwrap_or(u32::MAX);
    let sqr = axis.saturating_mul(axis);
    (axis, sqr, sqr.saturating_mul(axis))
}

/// Receiver of published frames.
pub trait RenderSink {
    fn publish(&mut self, frame: &RenderFrame<'_>);
}

/// Sink that ignores every frame, for headless stepping.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn publish(&mut self, _frame: &RenderFrame<'_>) {}
}

/// Owned copy of a published frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSnapshot {
    pub cells: Vec<u32>,
    pub axis_size: u32,
    pub max_state: u32,
    pub generation: u64,
}

/// Sink that keeps a copy of the latest frame.
#[derive(Debug, Default)]
pub struct SnapshotSink {
    latest: Option<RenderSnapshot>,
    published: u64,
}

impl SnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<&RenderSnapshot> {
        self.latest.as_ref()
    }

    /// Number of frames received.
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl RenderSink for SnapshotSink {
    fn publish(&mut self, frame: &RenderFrame<'_>) {
        match &mut self.latest {
            Some(snapshot) => {
                snapshot.cells.clear();
                snapshot.cells.extend_from_slice(frame.cells);
                snapshot.axis_size = frame.axis_size;
                snapshot.max_state = frame.max_state;
                snapshot.generation = frame.generation;
            }
            None => self.latest = Some(frame.to_snapshot()),
        }
        self.published += 1;
    }
}

impl<F> RenderSink for F
where
    F: FnMut(&RenderFrame<'_>),
{
    fn publish(&mut self, frame: &RenderFrame<'_>) {
        self(frame)
    }
}
