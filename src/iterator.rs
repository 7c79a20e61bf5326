//! The fractional pass iterator.
//!
//! Ported close to verbatim from the classic WikiSort reference: a tight finite-state record
//! that partitions `[0, size)` into adjacent run-pairs whose lengths are integer approximations
//! of the current power-of-two level, advancing through levels by doubling.

use crate::util::{floor_pow2, Range};

/// Walks `[0, size)` in adjacent pairs of sub-runs, doubling the target run length each level.
///
/// `size` must be at least `min_level` (the driver only constructs this once small-range sorting
/// has already handled anything shorter).
pub(crate) struct WikiIterator {
    size: usize,
    #[allow(dead_code)]
    power_of_two: usize,
    denominator: usize,
    numerator: usize,
    decimal: usize,
    numerator_step: usize,
    decimal_step: usize,
}

impl WikiIterator {
    pub fn new(size: usize, min_level: usize) -> Self {
        let power_of_two = floor_pow2(size);
        let denominator = power_of_two / min_level;
        let decimal_step = size / denominator;
        let numerator_step = size % denominator;

        let mut it = Self {
            size,
            power_of_two,
            denominator,
            numerator: 0,
            decimal: 0,
            numerator_step,
            decimal_step,
        };
        it.begin();
        it
    }

    /// Reset to the start of the current level.
    pub fn begin(&mut self) {
        self.numerator = 0;
        self.decimal = 0;
    }

    /// The next sub-run at the current level.
    pub fn next_range(&mut self) -> Range {
        let start = self.decimal;

        self.decimal += self.decimal_step;
        self.numerator += self.numerator_step;
        if self.numerator >= self.denominator {
            self.numerator -= self.denominator;
            self.decimal += 1;
        }

        Range::new(start, self.decimal)
    }

    /// Whether the current level has been fully walked.
    pub fn finished(&self) -> bool {
        self.decimal >= self.size
    }

    /// Double the run length for the next level. Returns `false` once the run length would cover
    /// the whole array (the array is sorted).
    pub fn next_level(&mut self) -> bool {
        self.decimal_step += self.decimal_step;
        self.numerator_step += self.numerator_step;
        if self.numerator_step >= self.denominator {
            self.numerator_step -= self.denominator;
            self.decimal_step += 1;
        }

        self.decimal_step < self.size
    }

    /// The current level's target sub-run length.
    pub fn length(&self) -> usize {
        self.decimal_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_the_whole_range_exactly() {
        for size in [4usize, 5, 7, 8, 15, 16, 17, 63, 100, 257] {
            let mut it = WikiIterator::new(size, 4);
            let mut covered = 0;
            while !it.finished() {
                let r = it.next_range();
                assert_eq!(r.start, covered);
                covered = r.end;
            }
            assert_eq!(covered, size);
        }
    }

    #[test]
    fn pair_lengths_differ_by_at_most_one() {
        let mut it = WikiIterator::new(100, 4);
        let mut lens = Vec::new();
        while !it.finished() {
            lens.push(it.next_range().len());
        }
        let min = *lens.iter().min().unwrap();
        let max = *lens.iter().max().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn next_level_doubles_and_terminates() {
        let mut it = WikiIterator::new(64, 4);
        let first_len = it.length();
        assert!(it.next_level());
        assert_eq!(it.length(), first_len * 2);
        // Keep doubling until the whole array is one run.
        let mut guard = 0;
        while it.next_level() {
            guard += 1;
            assert!(guard < 64);
        }
        assert!(it.length() >= 64);
    }
}
