use crate::transport::RetryPolicy;

/// Width of the simulation grid, in cells. Must be a multiple of 8.
pub const WIDTH: usize = 8;

/// Height of the simulation grid, in cells. Must be a multiple of 8.
pub const HEIGHT: usize = 8;

/// Width of the hardware framebuffer, in pixels.
///
/// This has to match the panel the framebuffer is wired to. It must be a multiple of
/// [`WORD_BITS`], since every row starts on a word boundary.
pub const FRAMEBUFFER_WIDTH: usize = 32;

/// Height of the hardware framebuffer, in pixels.
pub const FRAMEBUFFER_HEIGHT: usize = 32;

/// Size of a hardware word, in bits.
pub const WORD_BITS: usize = 32;

const _: () = assert!(WIDTH % 8 == 0 && WIDTH > 0, "WIDTH must be a multiple of 8");
const _: () = assert!(HEIGHT % 8 == 0 && HEIGHT > 0, "HEIGHT must be a multiple of 8");
const _: () = assert!(
    FRAMEBUFFER_WIDTH % WORD_BITS == 0 && FRAMEBUFFER_WIDTH > 0,
    "FRAMEBUFFER_WIDTH must be a multiple of the word size"
);
const _: () = assert!(FRAMEBUFFER_HEIGHT > 0);
const _: () = assert!(
    WIDTH <= FRAMEBUFFER_WIDTH && HEIGHT <= FRAMEBUFFER_HEIGHT,
    "the grid must fit in the framebuffer"
);

/// Knobs for a hosted run of the simulation.
///
/// On the board nobody is around to read an error, so the defaults match it: sends are retried
/// forever and no rows are dumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    /// How hard to try before giving up on a diagnostic send
    pub retry: RetryPolicy,

    /// Send an ASCII dump of every generation through the transport
    pub dump_rows: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::Unbounded,
            dump_rows: false,
        }
    }
}

impl SimConfig {
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_dump_rows(mut self, dump_rows: bool) -> Self {
        self.dump_rows = dump_rows;
        self
    }
}
