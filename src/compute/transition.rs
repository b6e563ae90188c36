//! Transition function for multi-state survive/birth automata.
//!
//! Each cell's next state depends only on the previous generation, so cells
//! can be evaluated in any order and in parallel.

use rayon::prelude::*;

use super::VoxelGrid;
use crate::schema::RuleSpec;

/// Next state of the cell at (x, y, z).
///
/// - Alive (`max_state`): survives on a survive-mask hit, otherwise starts decaying.
/// - Dead (`0`): born on a birth-mask hit.
/// - Decaying: steps one state toward dead, ignoring neighbors.
#[inline]
pub fn next_state(old: &VoxelGrid, rule: &RuleSpec, x: usize, y: usize, z: usize) -> u32 {
    let max_state = rule.max_state();
    let state = old.get(x, y, z);

    if state == max_state {
        let neighbors = old.count_neighbors(x, y, z, max_state);
        if rule.survives(neighbors) {
            max_state
        } else {
            // With two states there is no decay trail
            max_state - 1
        }
    } else if state == 0 {
        let neighbors = old.count_neighbors(x, y, z, max_state);
        if rule.born(neighbors) { max_state } else { 0 }
    } else {
        state - 1
    }
}

/// Apply one generation from `old` into `new` using rayon over z-slices.
pub fn transition_into(old: &VoxelGrid, new: &mut VoxelGrid, rule: &RuleSpec) {
    assert_eq!(
        old.axis_size(),
        new.axis_size(),
        "old and new grids must share a shape"
    );
    let n = old.axis_size();
    if n == 0 {
        return;
    }

    new.cells_mut()
        .par_chunks_mut(n * n)
        .enumerate()
        .for_each(|(z, slice)| {
            for y in 0..n {
                for x in 0..n {
                    slice[y * n + x] = next_state(old, rule, x, y, z);
                }
            }
        });
}

/// Single-threaded reference version of [`transition_into`].
pub fn transition_sequential(old: &VoxelGrid, new: &mut VoxelGrid, rule: &RuleSpec) {
    let n = old.axis_size();
    for z in 0..n {
        for y in 0..n {
            for x in 0..n {
                new.set(x, y, z, next_state(old, rule, x, y, z));
            }
        }
    }
}
