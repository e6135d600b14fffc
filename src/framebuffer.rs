use thiserror::Error;
use tracing::trace;

use crate::config::FRAMEBUFFER_HEIGHT;
use crate::config::FRAMEBUFFER_WIDTH;
use crate::config::WORD_BITS;
use crate::grid::BitGrid;
use crate::grid::Dimensions;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error(
        "Frame width must be a non-zero multiple of {} and height non-zero, got {width}x{height}",
        WORD_BITS
    )]
    InvalidDimensions { width: usize, height: usize },

    #[error("Pixel ({x}, {y}) is outside of the {width}x{height} frame")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("A {grid_width}x{grid_height} grid does not fit in a {width}x{height} frame")]
    GridTooLarge {
        grid_width: usize,
        grid_height: usize,
        width: usize,
        height: usize,
    },
}

/// A row-word aligned bitmap, the format the display hardware scans out.
///
/// Each row starts on a byte boundary, `width / 8` bytes apart. Within a row, pixel `x` is bit
/// `x % 8` of byte `x / 8`, the same packing [`BitGrid`] uses. That way a grid row can be copied
/// into a frame row byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    dim: Dimensions,
    bytes: Vec<u8>,
}

impl Default for RenderFrame {
    fn default() -> Self {
        let dim = Dimensions::new(FRAMEBUFFER_WIDTH, FRAMEBUFFER_HEIGHT);

        Self {
            dim,
            bytes: vec![0; dim.byte_len()],
        }
    }
}

impl RenderFrame {
    /// Create a blank frame of `width` by `height` pixels
    pub fn new(width: usize, height: usize) -> Result<Self, FrameError> {
        Self::with_dimensions(Dimensions::new(width, height))
    }

    pub fn with_dimensions(dim: Dimensions) -> Result<Self, FrameError> {
        let Dimensions { width, height } = dim;

        if width == 0 || height == 0 || width % WORD_BITS != 0 {
            return Err(FrameError::InvalidDimensions { width, height });
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

    /// Bytes between the start of two consecutive rows
    pub fn stride(&self) -> usize {
        self.dim.stride()
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, FrameError> {
        let (byte, mask) = self.locate(x, y)?;

        Ok(self.bytes[byte] & mask != 0)
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) -> Result<(), FrameError> {
        let (byte, mask) = self.locate(x, y)?;

        if on {
            self.bytes[byte] |= mask;
        } else {
            self.bytes[byte] &= !mask;
        }

        Ok(())
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.fill(0);
    }

    /// Set every byte of the frame to `byte`
    pub fn fill(&mut self, byte: u8) {
        self.bytes.fill(byte);
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.dim.height {
            return None;
        }

        let stride = self.stride();
        Some(&self.bytes[y * stride..(y + 1) * stride])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn locate(&self, x: usize, y: usize) -> Result<(usize, u8), FrameError> {
        if !self.dim.contains(x, y) {
            return Err(FrameError::OutOfBounds {
                x,
                y,
                width: self.dim.width,
                height: self.dim.height,
            });
        }

        Ok((y * self.stride() + x / 8, 1 << (x % 8)))
    }
}

/// Write `grid` into the top left corner of `frame`.
///
/// The two don't share a row stride, so this goes row by row: `grid.width() / 8` bytes are
/// copied per row, then the frame cursor moves ahead by a whole frame row. Every other byte of
/// the frame keeps what it held before. Clearing is up to the caller.
pub fn export(grid: &BitGrid, frame: &mut RenderFrame) -> Result<(), FrameError> {
    if grid.width() > frame.width() || grid.height() > frame.height() {
        return Err(FrameError::GridTooLarge {
            grid_width: grid.width(),
            grid_height: grid.height(),
            width: frame.width(),
            height: frame.height(),
        });
    }

    let frame_stride = frame.stride();
    let mut cursor = 0;

    for row in grid.rows() {
        frame.bytes[cursor..cursor + row.len()].copy_from_slice(row);
        cursor += frame_stride;
    }

    trace!(rows = grid.height(), frame_stride, "Exported generation");

    Ok(())
}
