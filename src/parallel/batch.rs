//! Batch boundaries for progress reporting.
//!
//! The optimizer runs one restart per parallel task; batches only decide how
//! often progress is reported between them.

/// Split `total` restarts into up to `num_batches` half-open ranges. Earlier
/// batches take the remainder, so sizes differ by at most one.
///
/// # Example
/// ```
/// # use resonance::parallel::batch_ranges;
/// assert_eq!(batch_ranges(30, 4), vec![(0, 8), (8, 16), (16, 23), (23, 30)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let batches = num_batches.min(total);
    let (base, remainder) = (total / batches, total % batches);
    let mut start = 0;
    (0..batches)
        .map(|i| {
            let end = start + base + usize::from(i < remainder);
            let range = (start, end);
            start = end;
            range
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_population_in_ten_batches() {
        let ranges = batch_ranges(30, 10);
        assert_eq!(ranges.len(), 10);
        assert!(ranges.iter().all(|(start, end)| end - start == 3));
        assert_eq!(ranges.last(), Some(&(27, 30)));
    }

    #[test]
    fn remainder_goes_to_leading_batches() {
        assert_eq!(batch_ranges(7, 3), vec![(0, 3), (3, 5), (5, 7)]);
    }

    #[test]
    fn never_more_batches_than_items() {
        assert_eq!(batch_ranges(2, 10), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn empty_inputs() {
        assert!(batch_ranges(0, 5).is_empty());
        assert!(batch_ranges(10, 0).is_empty());
    }
}
