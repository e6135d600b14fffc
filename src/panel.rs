use crate::framebuffer::RenderFrame;
use crate::grid::Dimensions;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

/// Shows a [`RenderFrame`] on a terminal, standing in for the hardware panel.
///
/// Every braille character covers 2x4 pixels of the frame.
pub struct Panel {
    /// The text buffer
    fb: String,

    /// Codepoints. This allows us to construct the text buffer more easily
    cp: Vec<u32>,

    /// Width of the frame, in pixels
    w: usize,

    /// Height of the frame, in pixels
    h: usize,
}

impl Panel {
    pub fn new(dim: Dimensions) -> Self {
        let Dimensions { width: w, height: h } = dim;

        // Let `w` and `h` refer to width and height of the frame. Then `bw = ceil(w / 2)` and
        // `bh = ceil(h / 4)` are the width and height of braille characters of our text buffer
        // (that is, not accounting for the trailing newlines expected at the end of each line).
        let (bw, bh) = (w.div_ceil(2), h.div_ceil(4));
        let cp = vec![BRAILLE_EMPTY; bw * bh];

        // Each braille character is 3 bytes, and newlines one byte
        let fb = String::with_capacity(3 * (bw * bh) + bh);

        Self { fb, cp, w, h }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Draw `frame` as lines of braille. Pixels past the panel's size are cut off.
    pub fn render(&mut self, frame: &RenderFrame) -> &str {
        let bw = self.w.div_ceil(2);

        // compute new codepoints
        self.cp.fill(BRAILLE_EMPTY);

        let w = self.w.min(frame.width());
        for y in 0..self.h.min(frame.height()) {
            let Some(row) = frame.row(y) else { break };

            for x in 0..w {
                if row[x / 8] & (1 << (x % 8)) != 0 {
                    self.cp[(y / 4) * bw + (x / 2)] += Self::get_hex_value(x, y);
                }
            }
        }

        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            // every codepoint is in U+2800..=U+28FF
            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}
