use thiserror::Error;

use crate::config::HEIGHT;
use crate::config::WIDTH;

/// Width and height of a bit-packed surface, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of bytes a single row takes up
    pub const fn stride(&self) -> usize {
        self.width / 8
    }

    /// Number of bytes needed to store every cell at one bit per cell
    pub const fn byte_len(&self) -> usize {
        self.stride() * self.height
    }

    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(WIDTH, HEIGHT)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Grid dimensions must be non-zero multiples of 8, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Cell ({x}, {y}) is outside of the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// A fixed size grid of cells, packed one bit per cell.
///
/// # Representation
/// Rows are stored one after the other, `width / 8` bytes each. Cell `(x, y)` lives in bit
/// `x % 8` of byte `y * (width / 8) + x / 8`:
/// ```notrust
///   byte 0      byte 1
/// 7654_3210   7654_3210    <- bit
/// |  x = 0..8 | x = 8..16 |   row 0
/// ```
///
/// Cells outside of the grid are always dead. Reading one yields `false`, writing one does
/// nothing. Use [`BitGrid::try_get`] and [`BitGrid::try_set`] to be told about it instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    dim: Dimensions,
    bytes: Vec<u8>,
}

impl Default for BitGrid {
    fn default() -> Self {
        let dim = Dimensions::default();

        Self {
            dim,
            bytes: vec![0; dim.byte_len()],
        }
    }
}

impl BitGrid {
    /// Create an empty (all dead) grid of `width` by `height` cells
    pub fn new(width: usize, height: usize) -> Result<Self, GridError> {
        Self::with_dimensions(Dimensions::new(width, height))
    }

    pub fn with_dimensions(dim: Dimensions) -> Result<Self, GridError> {
        let Dimensions { width, height } = dim;

        if width == 0 || height == 0 || width % 8 != 0 || height % 8 != 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        Ok(Self {
            dim,
            bytes: vec![0; dim.byte_len()],
        })
    }

    pub fn width(&self) -> usize {
        self.dim.width
    }

    pub fn height(&self) -> usize {
        self.dim.height
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dim
    }

    /// Returns whether cell `(x, y)` is alive. Anything outside of the grid is dead.
    pub fn get(&self, x: usize, y: usize) -> bool {
        match self.locate(x, y) {
            Some((byte, mask)) => self.bytes[byte] & mask != 0,
            None => false,
        }
    }

    /// Sets cell `(x, y)` to `alive`. Does nothing when `(x, y)` is outside of the grid.
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        let Some((byte, mask)) = self.locate(x, y) else {
            return;
        };

        if alive {
            self.bytes[byte] |= mask;
        } else {
            self.bytes[byte] &= !mask;
        }
    }

    /// Like [`BitGrid::get`], but reports out of range coordinates.
    pub fn try_get(&self, x: usize, y: usize) -> Result<bool, GridError> {
        self.check(x, y)?;

        Ok(self.get(x, y))
    }

    /// Like [`BitGrid::set`], but reports out of range coordinates.
    pub fn try_set(&mut self, x: usize, y: usize, alive: bool) -> Result<(), GridError> {
        self.check(x, y)?;
        self.set(x, y, alive);

        Ok(())
    }

    /// The packed bytes of row `y`, or `None` past the last row.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.dim.height {
            return None;
        }

        let stride = self.dim.stride();
        Some(&self.bytes[y * stride..(y + 1) * stride])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks_exact(self.dim.stride())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Kill every cell
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Number of live cells
    pub fn population(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    /// Byte index and bit mask of a cell. This is the only place doing the packing arithmetic.
    fn locate(&self, x: usize, y: usize) -> Option<(usize, u8)> {
        if !self.dim.contains(x, y) {
            return None;
        }

        let byte = y * self.dim.stride() + x / 8;
        let mask = 1 << (x % 8);

        Some((byte, mask))
    }

    fn check(&self, x: usize, y: usize) -> Result<(), GridError> {
        if self.dim.contains(x, y) {
            return Ok(());
        }

        Err(GridError::OutOfBounds {
            x,
            y,
            width: self.dim.width,
            height: self.dim.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population() {
        let mut grid = BitGrid::new(16, 8).unwrap();
        assert_eq!(grid.population(), 0);

        for x in 0..16 {
            grid.set(x, 7, true);
        }
        grid.set(3, 0, true);

        assert_eq!(grid.population(), 17);
    }

    #[test]
    fn test_rejects_unaligned_dimensions() {
        assert_eq!(
            BitGrid::new(12, 8),
            Err(GridError::InvalidDimensions {
                width: 12,
                height: 8
            })
        );
        assert!(BitGrid::new(8, 0).is_err());
        assert!(BitGrid::new(16, 24).is_ok());
    }

    #[test]
    fn test_bit_location() {
        let mut grid = BitGrid::new(16, 8).unwrap();

        grid.set(9, 2, true);

        // row 2 starts at byte 4, x = 9 is bit 1 of the second byte in that row
        assert_eq!(grid.as_bytes()[5], 0b0000_0010);
        assert_eq!(grid.row(2), Some([0u8, 0b10].as_slice()));
        assert_eq!(grid.population(), 1);
    }

    #[test]
    fn test_set_clears_only_its_bit() {
        let mut grid = BitGrid::default();

        grid.set(0, 0, true);
        grid.set(1, 0, true);
        grid.set(0, 0, false);

        assert!(!grid.get(0, 0));
        assert!(grid.get(1, 0));
    }

    #[test]
    fn test_out_of_range() {
        let mut grid = BitGrid::default();

        grid.set(8, 0, true);
        grid.set(0, 8, true);

        assert_eq!(grid, BitGrid::default());
        assert!(!grid.get(usize::MAX, 0));
        assert_eq!(grid.row(8), None);

        assert_eq!(
            grid.try_set(8, 3, true),
            Err(GridError::OutOfBounds {
                x: 8,
                y: 3,
                width: 8,
                height: 8
            })
        );
        assert_eq!(grid.try_get(7, 7), Ok(false));
    }
}
