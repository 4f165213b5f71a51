//! Interior fill for closed surfaces.
//!
//! Unoccupied cells reachable from the grid boundary through other unoccupied
//! cells (6-connected) are exterior. Every other unoccupied cell is enclosed by
//! the surface and takes the mean color of the first surface cell found along
//! each axis direction.

use super::grid::Grid;
use crate::color::{average_colors, Color};

const STEPS: [[i64; 3]; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

/// Fill enclosed cells of `cells` (indexed like `grid.centers`) in place.
///
/// Returns the number of cells filled.
pub fn fill_interior(grid: &Grid, cells: &mut [Option<Color>]) -> usize {
    let exterior = flood_exterior(grid, cells);

    let interior: Vec<(usize, Color)> = (0..cells.len())
        .filter(|&i| cells[i].is_none() && !exterior[i])
        .map(|i| (i, enclosed_color(grid, cells, i)))
        .collect();

    for &(i, color) in &interior {
        cells[i] = Some(color);
    }
    interior.len()
}

fn neighbor(grid: &Grid, coords: [usize; 3], step: [i64; 3]) -> Option<[usize; 3]> {
    let mut out = [0usize; 3];
    for axis in 0..3 {
        let v = coords[axis] as i64 + step[axis];
        if v < 0 || v >= grid.dims[axis] as i64 {
            return None;
        }
        out[axis] = v as usize;
    }
    Some(out)
}

fn flood_exterior(grid: &Grid, cells: &[Option<Color>]) -> Vec<bool> {
    let mut exterior = vec![false; cells.len()];
    let mut stack = Vec::new();

    for (i, cell) in cells.iter().enumerate() {
        if cell.is_some() {
            continue;
        }
        let c = grid.coords(i);
        let on_boundary = (0..3).any(|axis| c[axis] == 0 || c[axis] + 1 == grid.dims[axis]);
        if on_boundary {
            exterior[i] = true;
            stack.push(i);
        }
    }

    while let Some(i) = stack.pop() {
        let c = grid.coords(i);
        for step in STEPS {
            let Some([x, y, z]) = neighbor(grid, c, step) else {
                continue;
            };
            let n = grid.index(x, y, z);
            if !exterior[n] && cells[n].is_none() {
                exterior[n] = true;
                stack.push(n);
            }
        }
    }
    exterior
}

fn enclosed_color(grid: &Grid, cells: &[Option<Color>], index: usize) -> Color {
    let start = grid.coords(index);
    let mut found = Vec::with_capacity(6);

    for step in STEPS {
        let mut c = start;
        while let Some(next) = neighbor(grid, c, step) {
            if let Some(color) = cells[grid.index(next[0], next[1], next[2])] {
                found.push(color);
                break;
            }
            c = next;
        }
    }
    average_colors(&found)
}
