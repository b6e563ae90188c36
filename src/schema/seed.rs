//! Seed types for initializing Volume Life grids.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// Initial occupancy pattern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Random sphere of alive cells with random center, radius and density.
    #[default]
    Blob,
    /// Explicit alive cells as (x, y, z) coordinates.
    Custom {
        /// Alive cell coordinates. Out-of-range entries are ignored.
        cells: Vec<(usize, usize, usize)>,
    },
}

/// Random parameters chosen for a blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobShape {
    pub center: (f32, f32, f32),
    pub radius: f32,
    pub density: f32,
}

/// Complete seed specification: a pattern plus the RNG seed driving it.
#[derive(Debug, Clone)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
    /// Seed for `StdRng`. Identical values produce identical grids.
    pub rng_seed: u64,
}

impl Seed {
    /// Create a seed with an explicit RNG seed.
    pub fn new(pattern: Pattern, rng_seed: u64) -> Self {
        Self { pattern, rng_seed }
    }

    /// Create a seed whose RNG seed is derived from the current time.
    pub fn from_time(pattern: Pattern) -> Self {
        Self::new(pattern, time_seed())
    }

    /// Fill `cells` (an `axis_size^3` grid, index `z * axis^2 + y * axis + x`).
    ///
    /// Seeded cells get `alive`; every other cell is reset to 0. Returns the
    /// blob parameters when the pattern is a blob.
    pub fn generate(&self, cells: &mut [u32], axis_size: usize, alive: u32) -> Option<BlobShape> {
        debug_assert_eq!(cells.len(), axis_size * axis_size * axis_size);
        cells.fill(0);

        match &self.pattern {
            Pattern::Blob => {
                let mut rng = StdRng::seed_from_u64(self.rng_seed);
                Some(apply_blob(&mut rng, cells, axis_size, alive))
            }
            Pattern::Custom { cells: coords } => {
                for &(x, y, z) in coords {
                    if x < axis_size && y < axis_size && z < axis_size {
                        cells[(z * axis_size + y) * axis_size + x] = alive;
                    }
                }
                None
            }
        }
    }
}

/// Nanoseconds since the Unix epoch, folded to 64 bits.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn apply_blob(rng: &mut StdRng, cells: &mut [u32], axis_size: usize, alive: u32) -> BlobShape {
    let size = axis_size as f32;
    let lo = size / 3.0;
    let hi = 2.0 * size / 3.0;

    let shape = BlobShape {
        center: (
            rng.gen_range(lo..=hi),
            rng.gen_range(lo..=hi),
            rng.gen_range(lo..=hi),
        ),
        radius: rng.gen_range(size / 10.0..=size),
        density: rng.gen_range(0.2f32..=0.5),
    };

    let (cx, cy, cz) = shape.center;
    for z in 0..axis_size {
        for y in 0..axis_size {
            for x in 0..axis_size {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let dz = z as f32 - cz;
                let dist = (dx * dx + dy * dy + dz * dz).sqrt();
                // Only cells inside the sphere consume a draw
                if dist < shape.radius && rng.gen_range(0.0f32..1.0) < shape.density {
                    cells[(z * axis_size + y) * axis_size + x] = alive;
                }
            }
        }
    }

    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(axis_size: usize, rng_seed: u64) -> (Vec<u32>, BlobShape) {
        let mut cells = vec![0u32; axis_size * axis_size * axis_size];
        let shape = Seed::new(Pattern::Blob, rng_seed)
            .generate(&mut cells, axis_size, 4)
            .unwrap();
        (cells, shape)
    }

    #[test]
    fn test_blob_is_reproducible() {
        let (a, shape_a) = blob(20, 1234);
        let (b, shape_b) = blob(20, 1234);
        assert_eq!(a, b);
        assert_eq!(shape_a, shape_b);
    }

    #[test]
    fn test_blob_differs_across_seeds() {
        let (a, _) = blob(20, 1);
        let (b, _) = blob(20, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_blob_parameters_in_range() {
        for rng_seed in 0..50 {
            let (_, shape) = blob(30, rng_seed);
            for c in [shape.center.0, shape.center.1, shape.center.2] {
                assert!((10.0..=20.0).contains(&c), "center {c} out of range");
            }
            assert!((3.0..=30.0).contains(&shape.radius));
            assert!((0.2..=0.5).contains(&shape.density));
        }
    }

    #[test]
    fn test_blob_cells_inside_sphere() {
        let axis = 24;
        let (cells, shape) = blob(axis, 99);
        let (cx, cy, cz) = shape.center;
        let mut alive = 0;
        for z in 0..axis {
            for y in 0..axis {
                for x in 0..axis {
                    let v = cells[(z * axis + y) * axis + x];
                    assert!(v == 0 || v == 4);
                    if v == 4 {
                        alive += 1;
                        let d = ((x as f32 - cx).powi(2)
                            + (y as f32 - cy).powi(2)
                            + (z as f32 - cz).powi(2))
                        .sqrt();
                        assert!(d < shape.radius);
                    }
                }
            }
        }
        assert!(alive > 0, "blob should seed at least one cell");
    }

    #[test]
    fn test_generate_clears_previous_contents() {
        let mut cells = vec![7u32; 8 * 8 * 8];
        Seed::new(Pattern::Custom { cells: vec![] }, 0).generate(&mut cells, 8, 1);
        assert!(cells.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_custom_pattern() {
        let mut cells = vec![0u32; 4 * 4 * 4];
        let seed = Seed::new(
            Pattern::Custom {
                cells: vec![(0, 0, 0), (3, 2, 1), (4, 0, 0)],
            },
            0,
        );
        assert!(seed.generate(&mut cells, 4, 2).is_none());
        assert_eq!(cells[0], 2);
        assert_eq!(cells[(4 + 2) * 4 + 3], 2);
        assert_eq!(cells.iter().filter(|&&c| c == 2).count(), 2);
    }

    #[test]
    fn test_single_cell_grid() {
        let (cells, _) = blob(1, 5);
        assert_eq!(cells.len(), 1);
    }
}
