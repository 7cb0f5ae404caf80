//! Rolling height map behind the scrolling background.
//!
//! The grid is a queue of rows. Scrolling pops the oldest row off the front
//! and pushes a freshly randomized row at the back; cells are never edited in
//! place.

use std::collections::VecDeque;

use thiserror::Error;

use crate::random::RandomSource;

/// Smallest grid the terrain mesher can tessellate. Vertical positions are
/// divided by `rows - 2`, horizontal ones by `cols - 1`.
pub const MIN_ROWS: usize = 3;
pub const MIN_COLS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error(
        "height field of {rows}x{cols} is too small (need at least {min_rows}x{min_cols})",
        min_rows = MIN_ROWS,
        min_cols = MIN_COLS
    )]
    TooSmall { rows: usize, cols: usize },
}

/// `rows x cols` grid of height samples, each in `[0, 1)`.
#[derive(Debug, Clone)]
pub struct HeightField {
    rows: VecDeque<Vec<f32>>,
    cols: usize,
}

impl HeightField {
    /// Create a grid where every cell is a fresh uniform sample.
    pub fn new(rows: usize, cols: usize, rng: &mut impl RandomSource) -> Result<Self, GridError> {
        if rows < MIN_ROWS || cols < MIN_COLS {
            return Err(GridError::TooSmall { rows, cols });
        }
        let rows = (0..rows).map(|_| random_row(cols, &mut *rng)).collect();
        Ok(Self { rows, cols })
    }

    /// Drop row 0 and append a new random row at the end.
    pub fn shift(&mut self, rng: &mut impl RandomSource) {
        self.rows.pop_front();
        self.rows.push_back(random_row(self.cols, rng));
        log::debug!("height field shifted ({} rows)", self.rows.len());
    }

    /// Sample at `(row, col)`.
    ///
    /// # Panics
    /// If either index is out of range. Tessellation never asks for one, so an
    /// out-of-range access is a bug in the caller.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        assert!(
            row < self.rows.len() && col < self.cols,
            "height field index ({}, {}) out of range for {}x{} grid",
            row,
            col,
            self.rows.len(),
            self.cols
        );
        self.rows[row][col]
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.rows[index]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}

fn random_row(cols: usize, rng: &mut impl RandomSource) -> Vec<f32> {
    (0..cols).map(|_| rng.next_unit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Counts upward in steps of 1/1024 so every sample is distinguishable.
    struct Counter(u32);

    impl RandomSource for Counter {
        fn next_unit(&mut self) -> f32 {
            self.0 += 1;
            (self.0 % 1024) as f32 / 1024.0
        }
    }

    #[test]
    fn new_fills_every_cell_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = HeightField::new(7, 7, &mut rng).unwrap();
        assert_eq!(field.rows(), 7);
        assert_eq!(field.cols(), 7);
        for row in field.iter_rows() {
            assert_eq!(row.len(), 7);
            assert!(row.iter().all(|v| (0.0..1.0).contains(v)));
        }
    }

    #[test]
    fn too_small_grid_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            HeightField::new(2, 7, &mut rng).unwrap_err(),
            GridError::TooSmall { rows: 2, cols: 7 }
        );
        assert!(HeightField::new(7, 1, &mut rng).is_err());
        assert!(HeightField::new(MIN_ROWS, MIN_COLS, &mut rng).is_ok());
    }

    #[test]
    fn shift_moves_rows_up_and_appends_fresh_row() {
        let mut rng = Counter(0);
        let mut field = HeightField::new(7, 7, &mut rng).unwrap();
        let before: Vec<Vec<f32>> = field.iter_rows().map(<[f32]>::to_vec).collect();

        field.shift(&mut rng);

        assert_eq!(field.rows(), 7);
        assert_eq!(field.cols(), 7);
        for i in 0..6 {
            assert_eq!(field.row(i), before[i + 1].as_slice());
        }
        let last = field.row(6);
        assert!(last.iter().all(|v| (0.0..1.0).contains(v)));
        assert!(before.iter().all(|row| row.as_slice() != last));
    }

    #[test]
    fn repeated_shifts_keep_dimensions() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut field = HeightField::new(5, 4, &mut rng).unwrap();
        for _ in 0..100 {
            field.shift(&mut rng);
        }
        assert_eq!(field.rows(), 5);
        assert!(field.iter_rows().all(|row| row.len() == 4));
    }

    #[test]
    fn at_reads_row_major() {
        let mut rng = Counter(0);
        let field = HeightField::new(3, 2, &mut rng).unwrap();
        assert_eq!(field.at(0, 0), 1.0 / 1024.0);
        assert_eq!(field.at(0, 1), 2.0 / 1024.0);
        assert_eq!(field.at(2, 1), 6.0 / 1024.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn at_out_of_range_panics() {
        let mut rng = StdRng::seed_from_u64(1);
        let field = HeightField::new(7, 7, &mut rng).unwrap();
        field.at(7, 0);
    }
}
