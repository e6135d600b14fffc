use crate::grid::BitGrid;

/// Live cells of the initial pattern: an L that settles into a block, and a small cluster in
/// the bottom right corner.
pub const PATTERN: [(usize, usize); 7] = [
    (3, 3),
    (3, 2),
    (2, 3),
    (5, 6),
    (6, 6),
    (7, 6),
    (6, 7),
];

/// Write the initial pattern into `grid`. Other cells are left alone, so `grid` should be empty.
pub fn seed(grid: &mut BitGrid) {
    for (x, y) in PATTERN {
        grid.set(x, y, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed() {
        let mut grid = BitGrid::default();
        seed(&mut grid);

        assert_eq!(grid.population(), PATTERN.len() as u32);
        assert!(grid.get(6, 7));
        assert!(!grid.get(2, 2));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mut a = BitGrid::default();
        let mut b = BitGrid::default();

        seed(&mut a);
        seed(&mut b);
        seed(&mut b);

        assert_eq!(a, b);
    }
}
