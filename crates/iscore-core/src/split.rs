//! Batch and split range computation.
//!
//! Both partitions are contiguous, ordered, and exact: every row index
//! in `[0, n)` belongs to exactly one range. Batches exist to bound
//! inference memory; splits exist to turn one score into a mean and a
//! variance estimate.

use std::ops::Range;

/// Inference batch ranges: `ceil(n / batch_size)` contiguous ranges of
/// `batch_size` rows each, with a possibly-short final batch.
pub fn batch_ranges(n: usize, batch_size: usize) -> Vec<Range<usize>> {
    assert!(batch_size > 0, "batch_size must be at least 1");
    let batches = n.div_ceil(batch_size);
    (0..batches)
        .map(|i| i * batch_size..((i + 1) * batch_size).min(n))
        .collect()
}

/// Split ranges for the aggregation step: range `s` is
/// `[s*n/splits, (s+1)*n/splits)` with floor division applied
/// independently at each boundary.
///
/// When `splits` does not divide `n`, sizes differ by at most one row;
/// original image order is preserved.
pub fn split_ranges(n: usize, splits: usize) -> Vec<Range<usize>> {
    assert!(splits > 0, "splits must be at least 1");
    (0..splits)
        .map(|s| s * n / splits..(s + 1) * n / splits)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ranges must cover `[0, n)` contiguously with no gaps or overlaps.
    fn assert_exact_partition(ranges: &[Range<usize>], n: usize) {
        let mut next = 0;
        for r in ranges {
            assert_eq!(r.start, next, "gap or overlap before {r:?}");
            assert!(r.end >= r.start);
            next = r.end;
        }
        assert_eq!(next, n, "ranges do not cover all {n} rows");
    }

    #[test]
    fn batch_ranges_exact_division() {
        let ranges = batch_ranges(100, 25);
        assert_eq!(ranges.len(), 4);
        assert_exact_partition(&ranges, 100);
        assert!(ranges.iter().all(|r| r.len() == 25));
    }

    #[test]
    fn batch_ranges_short_final_batch() {
        let ranges = batch_ranges(10, 4);
        assert_eq!(
            ranges,
            vec![0..4, 4..8, 8..10],
            "expected batch sizes 4,4,2"
        );
    }

    #[test]
    fn batch_ranges_batch_larger_than_n() {
        let ranges = batch_ranges(3, 25);
        assert_eq!(ranges, vec![0..3]);
    }

    #[test]
    fn batch_ranges_unit_batches() {
        let ranges = batch_ranges(5, 1);
        assert_eq!(ranges.len(), 5);
        assert_exact_partition(&ranges, 5);
    }

    #[test]
    fn split_ranges_even() {
        let ranges = split_ranges(100, 10);
        assert_exact_partition(&ranges, 100);
        assert!(ranges.iter().all(|r| r.len() == 10));
    }

    #[test]
    fn split_ranges_uneven() {
        let ranges = split_ranges(23, 10);
        assert_eq!(ranges.len(), 10);
        assert_exact_partition(&ranges, 23);
        for r in &ranges {
            assert!(
                r.len() == 2 || r.len() == 3,
                "split sizes must be floor(23/10) or floor(23/10)+1, got {}",
                r.len()
            );
        }
        let total: usize = ranges.iter().map(|r| r.len()).sum();
        assert_eq!(total, 23);
    }

    #[test]
    fn split_ranges_single_split_takes_everything() {
        assert_eq!(split_ranges(7, 1), vec![0..7]);
    }

    #[test]
    fn split_boundaries_are_independent_floor_divisions() {
        // Each boundary is s*n/splits on its own, not an accumulated sum.
        let ranges = split_ranges(7, 3);
        assert_eq!(ranges, vec![0..2, 2..4, 4..7]);
    }
}
