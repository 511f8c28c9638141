//! Batch partitioner
//!
//! Splits input records into bounded batches. Iterators are consumed lazily,
//! one batch at a time; slices are split without copying.

use std::iter::FusedIterator;

/// Lazy fixed-size chunking over any iterator
///
/// With no size every item lands in a single batch. An empty input yields no
/// batch at all.
#[derive(Debug)]
pub struct Batches<I> {
    inner: I,
    size: Option<usize>,
}

impl<I: Iterator> Batches<I> {
    /// Chunk `records` into batches of at most `size` items
    ///
    /// A size of zero is treated as no limit; configuration validation
    /// rejects it before a load starts.
    pub fn new(records: impl IntoIterator<IntoIter = I>, size: Option<usize>) -> Self {
        Self {
            inner: records.into_iter(),
            size: size.filter(|&s| s > 0),
        }
    }
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<I::Item> = match self.size {
            Some(size) => self.inner.by_ref().take(size).collect(),
            None => self.inner.by_ref().collect(),
        };
        (!batch.is_empty()).then_some(batch)
    }
}

impl<I: Iterator> FusedIterator for Batches<I> {}

/// Split a slice into borrowed batches of at most `size` items
pub fn slices<T>(records: &[T], size: Option<usize>) -> impl Iterator<Item = &[T]> {
    let size = size.filter(|&s| s > 0).unwrap_or(records.len()).max(1);
    records.chunks(size)
}

/// Number of batches `len` records split into
pub fn batch_count(len: usize, size: Option<usize>) -> usize {
    match size.filter(|&s| s > 0) {
        _ if len == 0 => 0,
        Some(size) => len.div_ceil(size),
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_even_split() {
        let batches: Vec<_> = Batches::new(0..6, Some(2)).collect();
        assert_eq!(batches, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_last_batch_is_short() {
        let batches: Vec<_> = Batches::new(0..5, Some(2)).collect();
        assert_eq!(batches.last().unwrap(), &vec![4]);
        assert_eq!(batches.len(), 3);
    }

    #[test]
    fn test_no_size_is_single_batch() {
        let batches: Vec<_> = Batches::new(vec!["a", "b", "c"], None).collect();
        assert_eq!(batches, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_empty_input_has_no_batches() {
        assert_eq!(Batches::new(Vec::<u8>::new(), Some(3)).count(), 0);
        assert_eq!(Batches::new(Vec::<u8>::new(), None).count(), 0);
        assert_eq!(slices::<u8>(&[], Some(3)).count(), 0);
        assert_eq!(slices::<u8>(&[], None).count(), 0);
    }

    #[test]
    fn test_consumes_lazily() {
        let mut pulled = 0;
        let source = (0..100).inspect(|_| pulled += 1);
        let mut batches = Batches::new(source, Some(10));

        let first = batches.next().unwrap();
        assert_eq!(first.len(), 10);
        drop(batches);
        assert_eq!(pulled, 10);
    }

    #[test]
    fn test_slices_borrow_input() {
        let records = [1, 2, 3, 4, 5];
        let batches: Vec<&[i32]> = slices(&records, Some(2)).collect();
        assert_eq!(batches, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);

        let whole: Vec<&[i32]> = slices(&records, None).collect();
        assert_eq!(whole, vec![&records[..]]);
    }

    #[test_case(0, Some(3), 0 ; "empty")]
    #[test_case(1, Some(3), 1 ; "single")]
    #[test_case(9, Some(3), 3 ; "exact")]
    #[test_case(10, Some(3), 4 ; "remainder")]
    #[test_case(10, None, 1 ; "unbounded")]
    #[test_case(1000, Some(1), 1000 ; "size one")]
    fn test_batch_count(len: usize, size: Option<usize>, expected: usize) {
        assert_eq!(batch_count(len, size), expected);
        assert_eq!(Batches::new(0..len, size).count(), expected);
        let records: Vec<usize> = (0..len).collect();
        assert_eq!(slices(&records, size).count(), expected);
    }
}
