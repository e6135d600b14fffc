use tracing::trace;

use crate::grid::BitGrid;
use crate::rules;

/// Compute the generation following `prev` into `next`.
///
/// Every cell of `next` is written, row by row (`y` outer, `x` inner), so whatever `next` held
/// before is irrelevant. `prev` is only read.
///
/// # Panics
/// When the two grids don't have the same dimensions.
pub fn step(next: &mut BitGrid, prev: &BitGrid) {
    assert_eq!(
        next.dimensions(),
        prev.dimensions(),
        "both generations must have the same dimensions"
    );

    for y in 0..prev.height() {
        for x in 0..prev.width() {
            let n = rules::neighbors(prev, x, y);
            let alive = prev.get(x, y);

            next.set(x, y, rules::transition(alive, n));
        }
    }

    trace!(population = next.population(), "Computed generation");
}
