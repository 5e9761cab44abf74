//! Caller-owned scratch memory for transform calls.

use rustfft::num_complex::Complex64;

use crate::config::TransformConfig;
use crate::kernel::ZERO;
use crate::legendre::ColumnScratch;
use crate::parallel::Partitions;
use crate::types::OrderIndex;

/// Scratch owned by one worker for the duration of a stage.
#[derive(Clone, Debug, Default)]
pub(crate) struct WorkerScratch {
    pub fft_buf: Vec<Complex64>,
    pub fft_scratch: Vec<Complex64>,
    pub column: ColumnScratch,
}

/// Reusable buffers for transform calls.
///
/// A workspace grows on first use to fit the configuration, batch size and
/// thread count it is used with, then is reused without allocating. Each
/// concurrent transform call needs its own workspace.
#[derive(Clone, Debug, Default)]
pub struct Workspace {
    pub(crate) modes: Vec<Complex64>,
    pub(crate) spectral: Vec<Complex64>,
    pub(crate) slots: Vec<WorkerScratch>,
}

fn grow(buf: &mut Vec<Complex64>, len: usize) {
    if buf.len() < len {
        buf.resize(len, ZERO);
    }
}

impl Workspace {
    /// An empty workspace; buffers are allocated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of complex values currently held.
    pub fn capacity(&self) -> usize {
        self.modes.len()
            + self.spectral.len()
            + self
                .slots
                .iter()
                .map(|s| s.fft_buf.len() + s.fft_scratch.len())
                .sum::<usize>()
    }

    /// Make every buffer large enough for `nch` fields.
    pub(crate) fn ensure(&mut self, config: &TransformConfig, partitions: &Partitions, nch: usize) {
        let nm = config.truncation().n_orders();
        let nlat = config.nlat();
        let forward_modes = nch * nlat * nm;
        let inverse_modes = config.nlat_2() * nch * 2 * nm;
        grow(&mut self.modes, forward_modes.max(inverse_modes));
        grow(&mut self.spectral, nch * config.nlm());

        let n_slots = partitions.n_slots(nlat);
        if self.slots.len() < n_slots {
            self.slots.resize_with(n_slots, WorkerScratch::default);
        }
        let fft = config.fft();
        for slot in &mut self.slots {
            grow(&mut slot.fft_buf, fft.period());
            grow(&mut slot.fft_scratch, fft.scratch_len());
            slot.column.ensure(config.lmax());
        }
    }

    /// Column scratch for single-threaded Legendre work up to degree `lmax`.
    pub(crate) fn column(&mut self, lmax: usize) -> &mut ColumnScratch {
        if self.slots.is_empty() {
            self.slots.push(WorkerScratch::default());
        }
        let column = &mut self.slots[0].column;
        column.ensure(lmax);
        column
    }

    /// Copy spectral blocks into caller buffers in the configured layout.
    pub(crate) fn gather(&self, config: &TransformConfig, outputs: &mut [&mut [Complex64]]) {
        let t = config.truncation();
        let nch = outputs.len();
        for im in OrderIndex::range(0..t.n_orders()) {
            let n = t.n_degrees(im);
            let start = nch * t.mode_offset(im);
            for (ch, out) in outputs.iter_mut().enumerate() {
                let block = &self.spectral[start + ch * n..start + (ch + 1) * n];
                for (k, &q) in block.iter().enumerate() {
                    out[config.layout_index(im, k)] = q;
                }
            }
        }
    }

    /// Copy caller buffers into spectral blocks.
    pub(crate) fn scatter(&mut self, config: &TransformConfig, inputs: &[&[Complex64]]) {
        let t = config.truncation();
        let nch = inputs.len();
        for im in OrderIndex::range(0..t.n_orders()) {
            let n = t.n_degrees(im);
            let start = nch * t.mode_offset(im);
            for (ch, input) in inputs.iter().enumerate() {
                let block = &mut self.spectral[start + ch * n..start + (ch + 1) * n];
                for (k, q) in block.iter_mut().enumerate() {
                    *q = input[config.layout_index(im, k)];
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigBuilder, SpectralLayout};

    #[test]
    fn test_ensure_only_grows() {
        let config = ConfigBuilder::new(15).build().unwrap();
        let partitions = Partitions::new(&config, 2);
        let mut ws = Workspace::new();
        assert_eq!(ws.capacity(), 0);

        ws.ensure(&config, &partitions, 3);
        let sized = ws.capacity();
        assert!(sized > 0);
        ws.ensure(&config, &partitions, 1);
        assert_eq!(ws.capacity(), sized);
    }

    #[test]
    fn test_scatter_gather_round_trip() {
        for layout in [SpectralLayout::MMajor, SpectralLayout::LMajor] {
            let config = ConfigBuilder::new(7)
                .with_mmax(3)
                .with_mres(2)
                .with_layout(layout)
                .build()
                .unwrap();
            let partitions = Partitions::new(&config, 1);
            let mut ws = Workspace::new();
            ws.ensure(&config, &partitions, 2);

            let nlm = config.nlm();
            let a: Vec<Complex64> = (0..nlm).map(|i| Complex64::new(i as f64, 1.0)).collect();
            let b: Vec<Complex64> = (0..nlm).map(|i| Complex64::new(-(i as f64), 2.0)).collect();
            ws.scatter(&config, &[a.as_slice(), b.as_slice()]);

            let mut a2 = vec![ZERO; nlm];
            let mut b2 = vec![ZERO; nlm];
            ws.gather(&config, &mut [a2.as_mut_slice(), b2.as_mut_slice()]);
            assert_eq!(a, a2);
            assert_eq!(b, b2);
        }
    }
}
