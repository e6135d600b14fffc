use crate::grid::BitGrid;
use crate::grid::Dimensions;
use crate::grid::GridError;
use crate::step;

/// Two generations of the world, double buffered.
///
/// One grid holds the latest generation (`current`), the other is where the following one gets
/// written (`next`). Advancing computes into `next` and flips which grid is which. Bytes are
/// never copied between the two, and older generations are gone for good.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    grids: [BitGrid; 2],

    /// Index of the current generation in `grids`
    current: usize,

    /// Number of generations computed so far
    generation: u64,
}

impl DoubleBuffer {
    /// Create a double buffer of two empty grids
    pub fn new(dim: Dimensions) -> Result<Self, GridError> {
        let grid = BitGrid::with_dimensions(dim)?;

        Ok(Self::from_grid(grid))
    }

    /// Use `initial` as generation 0. The second grid is allocated to match it.
    pub fn from_grid(initial: BitGrid) -> Self {
        let mut next = initial.clone();
        next.clear();

        Self {
            grids: [initial, next],
            current: 0,
            generation: 0,
        }
    }

    /// The latest completed generation
    pub fn current(&self) -> &BitGrid {
        &self.grids[self.current]
    }

    /// The latest generation, for seeding before the first step
    pub fn current_mut(&mut self) -> &mut BitGrid {
        &mut self.grids[self.current]
    }

    /// The grid the next generation will be written to. Holds the generation before `current`.
    pub fn next(&self) -> &BitGrid {
        &self.grids[self.current ^ 1]
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Compute the next generation and make it current
    pub fn advance(&mut self) -> &BitGrid {
        let [a, b] = &mut self.grids;
        let (prev, next) = if self.current == 0 { (a, b) } else { (b, a) };

        step::step(next, prev);

        self.current ^= 1;
        self.generation += 1;

        self.current()
    }
}

impl Default for DoubleBuffer {
    fn default() -> Self {
        Self::from_grid(BitGrid::default())
    }
}
