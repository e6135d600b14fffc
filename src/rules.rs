use crate::grid::BitGrid;

/// Neighbor counts which bring a dead cell to life, one bit per count (b3).
const BIRTHS: u16 = 0b0_0000_1000;

/// Neighbor counts which keep a live cell alive, one bit per count (s23).
const SURVIVALS: u16 = 0b0_0000_1100;

/// Number of live cells around `(x, y)`, not counting the cell itself.
///
/// The 3x3 window is clamped to the grid: nothing past an edge is visited, so a corner cell has
/// at most 3 neighbors and an edge cell at most 5. There is no wraparound.
///
/// `(x, y)` is expected to lie inside the grid. For coordinates past the far edge the window is
/// clamped all the same, which can still see the last row or column.
pub fn neighbors(grid: &BitGrid, x: usize, y: usize) -> u8 {
    let (w, h) = (grid.width(), grid.height());

    // `x - 1` would wrap around at the left edge
    let x_min = x.saturating_sub(1);
    let y_min = y.saturating_sub(1);

    let x_max = x.saturating_add(1).min(w - 1);
    let y_max = y.saturating_add(1).min(h - 1);

    let mut n = 0;

    for yi in y_min..=y_max {
        for xi in x_min..=x_max {
            if (xi, yi) != (x, y) && grid.get(xi, yi) {
                n += 1;
            }
        }
    }

    n
}

/// Conway's rule: whether a cell is alive in the next generation, given whether it is alive now
/// and its number of live neighbors.
pub fn transition(alive: bool, neighbors: u8) -> bool {
    if neighbors > 8 {
        return false;
    }

    let n = 1 << neighbors;

    if alive {
        SURVIVALS & n == n
    } else {
        BIRTHS & n == n
    }
}
