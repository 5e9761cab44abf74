//! Work partitions for the three transform stages.

use std::ops::Range;

use crate::config::TransformConfig;
use crate::types::OrderIndex;

/// Split `0..weights.len()` into at most `n_parts` contiguous, non-empty
/// ranges of roughly equal total weight.
///
/// ```
/// use sht_rs::parallel::balanced_ranges;
///
/// let parts = balanced_ranges(&[8, 1, 1, 1, 1, 1, 1, 1, 1], 2);
/// assert_eq!(parts, vec![0..1, 1..9]);
/// ```
pub fn balanced_ranges(weights: &[usize], n_parts: usize) -> Vec<Range<usize>> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }
    let n_parts = n_parts.clamp(1, n);
    let total: usize = weights.iter().sum();

    let mut ranges = Vec::with_capacity(n_parts);
    let mut start = 0;
    let mut end = 0;
    let mut prefix = 0;
    for p in 1..n_parts {
        let target = total * p / n_parts;
        // Leave at least one index for each remaining part.
        let max_end = n - (n_parts - p);
        while end < max_end && (end <= start || prefix < target) {
            prefix += weights[end];
            end += 1;
        }
        ranges.push(start..end);
        start = end;
    }
    ranges.push(start..n);
    ranges
}

/// Cached partitions of one configuration for a given worker count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Partitions {
    /// Order ranges for the forward Legendre stage.
    pub order_parts: Vec<Range<usize>>,
    /// Latitude-pair ranges for the inverse Legendre stage.
    pub pair_parts: Vec<Range<usize>>,
    /// Rows per FFT block; always even so packed row pairs never straddle blocks.
    pub rows_per_block: usize,
}

impl Partitions {
    pub(crate) fn new(config: &TransformConfig, n_threads: usize) -> Self {
        let truncation = config.truncation();
        let nlat_2 = config.nlat_2();
        let n_orders = truncation.n_orders();

        let order_weights: Vec<usize> = OrderIndex::range(0..n_orders)
            .map(|im| {
                let pairs = nlat_2 - config.first_pair(im).get();
                truncation.n_degrees(im) * pairs + 1
            })
            .collect();

        let pair_weights: Vec<usize> = (0..nlat_2)
            .map(|pair| {
                OrderIndex::range(0..n_orders)
                    .filter(|&im| config.first_pair(im).get() <= pair)
                    .map(|im| truncation.n_degrees(im))
                    .sum::<usize>()
                    + 1
            })
            .collect();

        let nlat = config.nlat();
        let workers = n_threads.max(1);
        let per_thread = (nlat + workers - 1) / workers;
        let rows_per_block = (per_thread + per_thread % 2).max(2);

        let partitions = Self {
            order_parts: balanced_ranges(&order_weights, n_threads),
            pair_parts: balanced_ranges(&pair_weights, n_threads),
            rows_per_block,
        };
        tracing::debug!(
            threads = n_threads,
            order_parts = partitions.order_parts.len(),
            pair_parts = partitions.pair_parts.len(),
            rows_per_block,
            "partitions computed"
        );
        partitions
    }

    /// Number of FFT row blocks.
    pub(crate) fn n_row_blocks(&self, nlat: usize) -> usize {
        (nlat + self.rows_per_block - 1) / self.rows_per_block
    }

    /// Number of per-worker scratch slots any stage needs.
    pub(crate) fn n_slots(&self, nlat: usize) -> usize {
        self.order_parts
            .len()
            .max(self.pair_parts.len())
            .max(self.n_row_blocks(nlat))
    }
}
