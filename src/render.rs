use crate::grid::BitGrid;
use crate::transport::RetryPolicy;
use crate::transport::Transport;
use crate::transport::TransportError;
use crate::transport::send_blocking;

pub const ALIVE: u8 = b'*';
pub const DEAD: u8 = b'-';

/// Expand row `y` of `grid` into `dst`, one `*` or `-` per cell. `dst` is resized to the grid
/// width, which only allocates the first time round.
pub fn row_text(dst: &mut Vec<u8>, grid: &BitGrid, y: usize) {
    dst.clear();
    dst.extend((0..grid.width()).map(|x| if grid.get(x, y) { ALIVE } else { DEAD }));
}

/// The whole grid as text, every row terminated by a newline
pub fn grid_text(grid: &BitGrid) -> String {
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    let mut row = Vec::with_capacity(grid.width());

    for y in 0..grid.height() {
        row_text(&mut row, grid, y);

        // only ever ascii
        out.extend(row.iter().map(|&b| b as char));
        out.push('\n');
    }

    out
}

/// Send `grid` through `transport` row by row. Each row is followed by its own newline send.
///
/// `row` is scratch space for the expanded row, so the caller can keep reusing it.
pub fn send_rows<T>(
    transport: &mut T,
    policy: RetryPolicy,
    row: &mut Vec<u8>,
    grid: &BitGrid,
) -> Result<(), TransportError>
where
    T: Transport + ?Sized,
{
    for y in 0..grid.height() {
        row_text(row, grid, y);

        send_blocking(transport, row, policy)?;
        send_blocking(transport, b"\n", policy)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed;
    use crate::transport::BufferTransport;

    #[test]
    fn test_row_text() {
        let mut grid = BitGrid::default();
        grid.set(0, 1, true);
        grid.set(7, 1, true);

        let mut row = Vec::new();
        row_text(&mut row, &grid, 1);

        assert_eq!(row, b"*------*");
    }

    #[test]
    fn test_seed_text() {
        let mut grid = BitGrid::default();
        seed(&mut grid);

        insta::assert_snapshot!(grid_text(&grid).trim_end(), @r"
        --------
        --------
        ---*----
        --**----
        --------
        --------
        -----***
        ------*-
        ");
    }

    #[test]
    fn test_send_rows_matches_text() -> anyhow::Result<()> {
        let mut grid = BitGrid::default();
        seed(&mut grid);

        let mut transport = BufferTransport::new().busy_for(3);
        let mut row = Vec::new();
        send_rows(&mut transport, RetryPolicy::Unbounded, &mut row, &grid)?;

        assert_eq!(transport.text(), grid_text(&grid));

        // one send for the row, one for the newline
        assert_eq!(transport.attempts(), 3 + 2 * 8);

        Ok(())
    }
}
