//! Lazy batching over an arbitrary iterator.
//!
//! `batch_stream` never buffers more than one batch, so an unbounded source
//! (a live crawl, a database cursor) can be sharded into sitemap-sized
//! chunks in constant memory.

/// Iterator adaptor yielding fixed-size batches from an upstream iterator.
///
/// Each call to `next` pulls at most `batch_size` items from the source and
/// returns as soon as the batch fills or the source is exhausted; it never
/// looks ahead past the current batch. The final batch may be shorter.
pub struct Batches<I: Iterator> {
    source: I,
    batch_size: usize,
}

impl<I: Iterator> Iterator for Batches<I> {
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::new();
        for item in self.source.by_ref() {
            // Reserve lazily so huge batch sizes do not preallocate for a
            // source that ends early.
            if batch.is_empty() {
                batch.reserve(self.batch_size.min(1024));
            }
            batch.push(item);
            if batch.len() == self.batch_size {
                return Some(batch);
            }
        }
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// Split `source` into batches of `batch_size` items.
///
/// A `batch_size` of zero is clamped to one.
pub fn batch_stream<I>(source: I, batch_size: usize) -> Batches<I::IntoIter>
where
    I: IntoIterator,
{
    Batches {
        source: source.into_iter(),
        batch_size: batch_size.max(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_split_sizes() {
        let batches: Vec<Vec<u32>> = batch_stream(0..60_000u32, 50_000).collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 50_000);
        assert_eq!(batches[1].len(), 10_000);
        assert_eq!(batches[0][0], 0);
        assert_eq!(batches[1][9_999], 59_999);
    }

    #[test]
    fn test_even_split_has_no_empty_trailing_batch() {
        let batches: Vec<Vec<u32>> = batch_stream(0..100u32, 25).collect();
        assert_eq!(batches.len(), 4);
        assert!(batches.iter().all(|b| b.len() == 25));
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let mut batches = batch_stream(std::iter::empty::<u32>(), 10);
        assert!(batches.next().is_none());
    }

    #[test]
    fn test_never_pulls_ahead_of_current_batch() {
        let pulled = std::cell::Cell::new(0usize);
        let source = (0..).inspect(|_| pulled.set(pulled.get() + 1));

        let mut batches = batch_stream(source, 5);
        let first = batches.next().unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(pulled.get(), 5);

        let second = batches.next().unwrap();
        assert_eq!(second, vec![5, 6, 7, 8, 9]);
        assert_eq!(pulled.get(), 10);
    }

    #[test]
    fn test_works_over_unbounded_source() {
        // Take three batches from an infinite iterator; must terminate.
        let batches: Vec<Vec<u64>> = batch_stream(0u64.., 3).take(3).collect();
        assert_eq!(batches, vec![vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
    }

    #[test]
    fn test_zero_batch_size_clamps_to_one() {
        let batches: Vec<Vec<u32>> = batch_stream(0..3u32, 0).collect();
        assert_eq!(batches.len(), 3);
    }
}
