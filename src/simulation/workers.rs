//! Fixed-size worker pool used by every parallel phase
//!
//! Work is split into contiguous index ranges, one per worker. Each worker
//! reads shared immutable input and writes only its own output slot; the
//! caller reduces the per-worker results serially once the phase returns.
//! Returning from a phase is the barrier: every worker has finished.

use std::ops::Range;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::SimError;

pub struct Workers {
    count: usize,
    pool: ThreadPool,
}

impl Workers {
    /// Pool with `count` workers (at least one)
    pub fn new(count: usize) -> Result<Self, SimError> {
        let count = count.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(count)
            .thread_name(|i| format!("gravsim-worker-{i}"))
            .build()?;
        Ok(Self { count, pool })
    }

    /// Pool sized to the available hardware parallelism
    pub fn from_hardware() -> Result<Self, SimError> {
        Self::new(num_cpus::get())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn ranges(&self, len: usize) -> Vec<Range<usize>> {
        partition(len, self.count)
    }

    /// Run `f` once per worker range over `0..len` and collect the results in
    /// worker order. The first error from any worker fails the whole phase.
    pub fn map_ranges<R, F>(&self, len: usize, f: F) -> Result<Vec<R>, SimError>
    where
        R: Send,
        F: Fn(Range<usize>) -> Result<R, SimError> + Sync,
    {
        let ranges = self.ranges(len);
        self.pool
            .install(|| ranges.into_par_iter().map(&f).collect())
    }

    /// Hand each worker exclusive access to its own contiguous chunk of
    /// `items`, together with the chunk's starting index.
    pub fn for_each_chunk_mut<T, F>(&self, items: &mut [T], f: F) -> Result<(), SimError>
    where
        T: Send,
        F: Fn(usize, &mut [T]) -> Result<(), SimError> + Sync,
    {
        let ranges = self.ranges(items.len());
        let mut chunks = Vec::with_capacity(ranges.len());
        let mut rest = items;
        for r in &ranges {
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(r.len());
            chunks.push((r.start, head));
            rest = tail;
        }
        self.pool
            .install(|| chunks.into_par_iter().try_for_each(|(start, chunk)| f(start, chunk)))
    }
}

/// Split `0..len` into at most `workers` contiguous, non-empty ranges.
///
/// The worker count is clamped to `len`; the remainder of an uneven split
/// goes to the last range.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, len);
    let chunk = len / workers;
    (0..workers)
        .map(|w| {
            let start = w * chunk;
            let end = if w + 1 == workers { len } else { start + chunk };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_goes_to_last_range() {
        assert_eq!(partition(10, 3), vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn worker_count_clamped_to_len() {
        let r = partition(3, 8);
        assert_eq!(r, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn empty_input_has_no_ranges() {
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn chunks_cover_items_exactly_once() {
        let workers = Workers::new(3).unwrap();
        let mut items = vec![0usize; 11];
        workers
            .for_each_chunk_mut(&mut items, |start, chunk| {
                for (k, item) in chunk.iter_mut().enumerate() {
                    *item += start + k;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(items, (0..11).collect::<Vec<_>>());
    }
}
