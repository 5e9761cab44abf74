//! Fork-join execution over disjoint output ranges.
//!
//! Work is split by output ownership: the forward Legendre stage partitions
//! orders, the inverse stage partitions latitude pairs and the FFT stage
//! partitions rows. Each worker writes only its own contiguous slice, so no
//! reduction is needed and every value is accumulated in the same order for
//! any thread count.
//!
//! Without the `parallel` feature the same partitions run sequentially.

mod partition;

pub use partition::balanced_ranges;
pub(crate) use partition::Partitions;

#[cfg(feature = "parallel")]
use std::sync::Arc;
use std::ops::Range;

use crate::error::Result;
#[cfg(feature = "parallel")]
use crate::error::ShtError;

/// Thread pool selection for one transform engine.
#[derive(Clone, Debug)]
pub struct Scheduler {
    n_threads: usize,
    #[cfg(feature = "parallel")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Scheduler {
    /// Use `threads` workers, or the global pool when `None` (or zero).
    pub fn new(threads: Option<usize>) -> Result<Self> {
        let requested = threads.filter(|&n| n > 0);

        #[cfg(feature = "parallel")]
        let scheduler = match requested {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("sht-worker-{}", i))
                    .build()
                    .map_err(|e| ShtError::ThreadPool(e.to_string()))?;
                tracing::debug!(threads = n, "dedicated thread pool created");
                Self {
                    n_threads: n,
                    pool: Some(Arc::new(pool)),
                }
            }
            None => Self {
                n_threads: rayon::current_num_threads(),
                pool: None,
            },
        };

        #[cfg(not(feature = "parallel"))]
        let scheduler = Self {
            n_threads: requested.unwrap_or(1),
        };

        Ok(scheduler)
    }

    /// Number of workers the partitions are sized for.
    #[inline]
    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Run `f` inside this scheduler's pool.
    #[cfg(feature = "parallel")]
    pub fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    /// Run `f` on the calling thread.
    #[cfg(not(feature = "parallel"))]
    pub fn install<R, F>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        f()
    }
}

#[cfg(feature = "parallel")]
#[inline]
fn join<A, B>(a: A, b: B)
where
    A: FnOnce() + Send,
    B: FnOnce() + Send,
{
    rayon::join(a, b);
}

#[cfg(not(feature = "parallel"))]
#[inline]
fn join<A, B>(a: A, b: B)
where
    A: FnOnce() + Send,
    B: FnOnce() + Send,
{
    a();
    b();
}

/// Run `body` once per part, in parallel, on disjoint slices of `data`.
///
/// Part `p` receives `data[offset(parts[p].start) - base..offset(parts[p].end) - base]`
/// and `scratch[p]`. `parts` must be contiguous and increasing.
pub(crate) fn fork_join<T, S, O, F>(
    parts: &[Range<usize>],
    data: &mut [T],
    base: usize,
    scratch: &mut [S],
    offset: &O,
    body: &F,
) where
    T: Send,
    S: Send,
    O: Fn(usize) -> usize + Sync,
    F: Fn(Range<usize>, &mut [T], &mut S) + Sync,
{
    match parts.len() {
        0 => {}
        1 => {
            let len = offset(parts[0].end) - base;
            body(parts[0].clone(), &mut data[..len], &mut scratch[0]);
        }
        n => {
            let mid = n / 2;
            let split = offset(parts[mid].start) - base;
            let (lo, hi) = data.split_at_mut(split);
            let (s_lo, s_hi) = scratch.split_at_mut(mid);
            join(
                || fork_join(&parts[..mid], lo, base, s_lo, offset, body),
                || fork_join(&parts[mid..], hi, base + split, s_hi, offset, body),
            );
        }
    }
}

/// Run `body` over consecutive blocks of `block_len` elements of `data`.
///
/// Block `b` starts at element `b * block_len` and receives `scratch[b]`;
/// `scratch` must hold at least one entry per block.
pub(crate) fn for_each_block<T, S, F>(data: &mut [T], block_len: usize, scratch: &mut [S], body: F)
where
    T: Send,
    S: Send,
    F: Fn(usize, &mut [T], &mut S) + Sync + Send,
{
    debug_assert!(scratch.len() * block_len >= data.len());

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        data.par_chunks_mut(block_len)
            .zip(scratch.par_iter_mut())
            .enumerate()
            .for_each(|(b, (chunk, s))| body(b, chunk, s));
    }

    #[cfg(not(feature = "parallel"))]
    {
        data.chunks_mut(block_len)
            .zip(scratch.iter_mut())
            .enumerate()
            .for_each(|(b, (chunk, s))| body(b, chunk, s));
    }
}
