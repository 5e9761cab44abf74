//! The transform engine.
//!
//! [`Sht`] ties a shared [`TransformConfig`], its optional
//! [`LegendreTable`] and a thread pool together. Every transform runs in
//! three stages:
//!
//! ```text
//! forward:  grid rows --FFT--> Fourier modes --Legendre--> spectral blocks --gather--> caller layout
//! inverse:  caller layout --scatter--> spectral blocks --Legendre--> Fourier modes --FFT--> grid rows
//! ```
//!
//! The Legendre stage is split by orders (forward) or latitude pairs
//! (inverse), the FFT stage by rows. All scratch lives in a caller-owned
//! [`Workspace`]; the allocating convenience methods create a fresh one.
//!
//! # Example
//!
//! ```
//! use sht_rs::{ConfigBuilder, Sht};
//!
//! let config = ConfigBuilder::new(8).build().unwrap();
//! let sht = Sht::new(config).unwrap();
//!
//! // f = cos θ is a multiple of Y_10.
//! let (nlat, nphi) = (sht.config().nlat(), sht.config().nphi());
//! let mut grid = vec![0.0; nlat * nphi];
//! for (i, row) in grid.chunks_mut(nphi).enumerate() {
//!     row.fill(sht.config().cos_theta()[i]);
//! }
//! let spectral = sht.scalar_forward(&grid).unwrap();
//! let q10 = spectral[sht.config().lm_index(1, 0).unwrap()];
//! assert!((q10.re - (4.0 * std::f64::consts::PI / 3.0).sqrt()).abs() < 1e-12);
//! ```

mod api;
mod workspace;

pub use api::{
    legendre_table, qst_forward, qst_inverse, scalar_forward, scalar_inverse, spheroidal_inverse,
    toroidal_inverse, vector_forward, vector_inverse,
};
pub use workspace::Workspace;

use std::ops::Range;
use std::sync::Arc;

use rustfft::num_complex::Complex64;

use crate::config::{LegendreMode, TransformConfig};
use crate::error::{check_len, Result, ShtError};
use crate::kernel::vector::VectorParts;
use crate::kernel::{pair_mode_offset, scalar, vector, ZERO};
use crate::legendre::{LegendreSource, LegendreTable, OnTheFly};
use crate::parallel::{fork_join, for_each_block, Partitions, Scheduler};
use crate::types::OrderIndex;
use workspace::WorkerScratch;

/// Which combiner kernel a pass uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FieldKind {
    Scalar,
    Vector(VectorParts),
}

/// Spherical harmonic transform engine.
///
/// Cloning is cheap and shares the configuration and Legendre table.
#[derive(Clone, Debug)]
pub struct Sht {
    config: Arc<TransformConfig>,
    table: Option<Arc<LegendreTable>>,
    scheduler: Scheduler,
    partitions: Partitions,
}

impl Sht {
    /// Engine running on the global thread pool.
    pub fn new(config: impl Into<Arc<TransformConfig>>) -> Result<Self> {
        Self::build(config.into(), None, None)
    }

    /// Engine running on a dedicated pool of `n_threads` workers.
    pub fn with_threads(config: impl Into<Arc<TransformConfig>>, n_threads: usize) -> Result<Self> {
        Self::build(config.into(), None, Some(n_threads))
    }

    /// Engine reading Legendre values from an existing table.
    ///
    /// The table is used whatever the configured [`LegendreMode`], so one
    /// table can back any number of engines. It must have been built for
    /// the same truncation, latitudes and normalization as `config`.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sht_rs::{legendre_table, ConfigBuilder, Sht};
    ///
    /// let config = Arc::new(ConfigBuilder::new(16).build().unwrap());
    /// let table = legendre_table(&config);
    /// let a = Sht::with_table(Arc::clone(&config), Arc::clone(&table)).unwrap();
    /// let b = Sht::with_table(config, Arc::clone(&table)).unwrap();
    /// assert!(std::ptr::eq(a.legendre_table().unwrap(), &*table));
    /// assert!(std::ptr::eq(b.legendre_table().unwrap(), &*table));
    /// ```
    pub fn with_table(
        config: impl Into<Arc<TransformConfig>>,
        table: Arc<LegendreTable>,
    ) -> Result<Self> {
        let config = config.into();
        table.check(&config)?;
        Self::build(config, Some(table), None)
    }

    fn build(
        config: Arc<TransformConfig>,
        table: Option<Arc<LegendreTable>>,
        threads: Option<usize>,
    ) -> Result<Self> {
        let table = match (table, config.mode()) {
            (Some(table), _) => Some(table),
            (None, LegendreMode::Precomputed) => Some(Arc::new(LegendreTable::new(&config))),
            (None, LegendreMode::OnTheFly) => None,
        };
        let scheduler = Scheduler::new(threads)?;
        let partitions = Partitions::new(&config, scheduler.n_threads());
        Ok(Self {
            config,
            table,
            scheduler,
            partitions,
        })
    }

    /// Switch to a dedicated pool of `n_threads` workers (0 = global pool).
    pub fn set_threads(&mut self, n_threads: usize) -> Result<()> {
        let scheduler = Scheduler::new(Some(n_threads))?;
        if scheduler.n_threads() != self.scheduler.n_threads() {
            self.partitions = Partitions::new(&self.config, scheduler.n_threads());
        }
        self.scheduler = scheduler;
        Ok(())
    }

    /// Number of workers transforms are split across.
    pub fn n_threads(&self) -> usize {
        self.scheduler.n_threads()
    }

    /// Configuration the engine transforms for.
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Shared handle to the configuration.
    pub fn shared_config(&self) -> Arc<TransformConfig> {
        Arc::clone(&self.config)
    }

    /// The precomputed table, when the engine has one.
    pub fn legendre_table(&self) -> Option<&LegendreTable> {
        self.table.as_deref()
    }

    /// Shared handle to the precomputed table.
    pub fn shared_table(&self) -> Option<Arc<LegendreTable>> {
        self.table.clone()
    }

    /// A workspace already sized for scalar and vector calls on this engine.
    pub fn workspace(&self) -> Workspace {
        let mut ws = Workspace::new();
        ws.ensure(&self.config, &self.partitions, 2);
        ws
    }

    /// Analyse one real field.
    pub fn scalar_forward(&self, grid: &[f64]) -> Result<Vec<Complex64>> {
        let mut spectral = vec![ZERO; self.config.nlm()];
        self.scalar_forward_into(grid, &mut spectral, &mut Workspace::new())?;
        Ok(spectral)
    }

    /// Analyse one real field into a caller buffer.
    pub fn scalar_forward_into(
        &self,
        grid: &[f64],
        spectral: &mut [Complex64],
        ws: &mut Workspace,
    ) -> Result<()> {
        self.scalar_forward_batch(&[grid], &mut [spectral], ws)
    }

    /// Analyse several real fields in one pass over the Legendre values.
    pub fn scalar_forward_batch(
        &self,
        grids: &[&[f64]],
        spectra: &mut [&mut [Complex64]],
        ws: &mut Workspace,
    ) -> Result<()> {
        check_len("batch", grids.len(), spectra.len())?;
        for grid in grids {
            check_len("grid", self.config.nspat(), grid.len())?;
        }
        for spectral in spectra.iter() {
            check_len("spectral", self.config.nlm(), spectral.len())?;
        }
        if grids.is_empty() {
            return Ok(());
        }

        tracing::trace!(fields = grids.len(), "scalar forward");
        self.analyse(grids, FieldKind::Scalar, ws);
        ws.gather(&self.config, spectra);
        Ok(())
    }

    /// Synthesise one real field.
    pub fn scalar_inverse(&self, spectral: &[Complex64]) -> Result<Vec<f64>> {
        let mut grid = vec![0.0; self.config.nspat()];
        self.scalar_inverse_into(spectral, &mut grid, &mut Workspace::new())?;
        Ok(grid)
    }

    /// Synthesise one real field into a caller buffer.
    pub fn scalar_inverse_into(
        &self,
        spectral: &[Complex64],
        grid: &mut [f64],
        ws: &mut Workspace,
    ) -> Result<()> {
        self.scalar_inverse_batch(&[spectral], &mut [grid], ws)
    }

    /// Synthesise several real fields in one pass over the Legendre values.
    pub fn scalar_inverse_batch(
        &self,
        spectra: &[&[Complex64]],
        grids: &mut [&mut [f64]],
        ws: &mut Workspace,
    ) -> Result<()> {
        check_len("batch", spectra.len(), grids.len())?;
        for spectral in spectra {
            check_len("spectral", self.config.nlm(), spectral.len())?;
        }
        for grid in grids.iter() {
            check_len("grid", self.config.nspat(), grid.len())?;
        }
        if spectra.is_empty() {
            return Ok(());
        }

        tracing::trace!(fields = spectra.len(), "scalar inverse");
        self.synthesise(spectra, FieldKind::Scalar, grids, ws);
        Ok(())
    }

    /// Spheroidal and toroidal coefficients of the tangent field (u, v) = (v_θ, v_φ).
    pub fn vector_forward(&self, u: &[f64], v: &[f64]) -> Result<(Vec<Complex64>, Vec<Complex64>)> {
        let mut s = vec![ZERO; self.config.nlm()];
        let mut t = vec![ZERO; self.config.nlm()];
        self.vector_forward_into(u, v, &mut s, &mut t, &mut Workspace::new())?;
        Ok((s, t))
    }

    /// Vector analysis into caller buffers.
    pub fn vector_forward_into(
        &self,
        u: &[f64],
        v: &[f64],
        spheroidal: &mut [Complex64],
        toroidal: &mut [Complex64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let (nspat, nlm) = (self.config.nspat(), self.config.nlm());
        check_len("u", nspat, u.len())?;
        check_len("v", nspat, v.len())?;
        check_len("spheroidal", nlm, spheroidal.len())?;
        check_len("toroidal", nlm, toroidal.len())?;

        tracing::trace!("vector forward");
        self.analyse(&[u, v], FieldKind::Vector(VectorParts::Tangent), ws);
        ws.gather(&self.config, &mut [spheroidal, toroidal]);
        Ok(())
    }

    /// Tangent field (v_θ, v_φ) of spheroidal and toroidal coefficients.
    pub fn vector_inverse(
        &self,
        spheroidal: &[Complex64],
        toroidal: &[Complex64],
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut u = vec![0.0; self.config.nspat()];
        let mut v = vec![0.0; self.config.nspat()];
        self.vector_inverse_into(spheroidal, toroidal, &mut u, &mut v, &mut Workspace::new())?;
        Ok((u, v))
    }

    /// Vector synthesis into caller buffers.
    pub fn vector_inverse_into(
        &self,
        spheroidal: &[Complex64],
        toroidal: &[Complex64],
        u: &mut [f64],
        v: &mut [f64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let (nspat, nlm) = (self.config.nspat(), self.config.nlm());
        check_len("spheroidal", nlm, spheroidal.len())?;
        check_len("toroidal", nlm, toroidal.len())?;
        check_len("u", nspat, u.len())?;
        check_len("v", nspat, v.len())?;

        tracing::trace!("vector inverse");
        self.synthesise(
            &[spheroidal, toroidal],
            FieldKind::Vector(VectorParts::Tangent),
            &mut [u, v],
            ws,
        );
        Ok(())
    }

    /// Tangent field of a spheroidal potential alone, i.e. its surface gradient.
    pub fn spheroidal_inverse(&self, spheroidal: &[Complex64]) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut u = vec![0.0; self.config.nspat()];
        let mut v = vec![0.0; self.config.nspat()];
        self.spheroidal_inverse_into(spheroidal, &mut u, &mut v, &mut Workspace::new())?;
        Ok((u, v))
    }

    /// Gradient synthesis into caller buffers.
    pub fn spheroidal_inverse_into(
        &self,
        spheroidal: &[Complex64],
        u: &mut [f64],
        v: &mut [f64],
        ws: &mut Workspace,
    ) -> Result<()> {
        self.tangent_inverse_into(spheroidal, "spheroidal", VectorParts::Spheroidal, u, v, ws)
    }

    /// Tangent field of a toroidal potential alone.
    pub fn toroidal_inverse(&self, toroidal: &[Complex64]) -> Result<(Vec<f64>, Vec<f64>)> {
        let mut u = vec![0.0; self.config.nspat()];
        let mut v = vec![0.0; self.config.nspat()];
        self.toroidal_inverse_into(toroidal, &mut u, &mut v, &mut Workspace::new())?;
        Ok((u, v))
    }

    /// Toroidal synthesis into caller buffers.
    pub fn toroidal_inverse_into(
        &self,
        toroidal: &[Complex64],
        u: &mut [f64],
        v: &mut [f64],
        ws: &mut Workspace,
    ) -> Result<()> {
        self.tangent_inverse_into(toroidal, "toroidal", VectorParts::Toroidal, u, v, ws)
    }

    fn tangent_inverse_into(
        &self,
        potential: &[Complex64],
        name: &'static str,
        parts: VectorParts,
        u: &mut [f64],
        v: &mut [f64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let (nspat, nlm) = (self.config.nspat(), self.config.nlm());
        check_len(name, nlm, potential.len())?;
        check_len("u", nspat, u.len())?;
        check_len("v", nspat, v.len())?;

        tracing::trace!(?parts, "tangent inverse");
        self.synthesise(&[potential], FieldKind::Vector(parts), &mut [u, v], ws);
        Ok(())
    }

    /// Radial, spheroidal and toroidal coefficients of a 3-component field
    /// (v_r, v_θ, v_φ), computed in a single pass.
    pub fn qst_forward(
        &self,
        vr: &[f64],
        vt: &[f64],
        vp: &[f64],
    ) -> Result<(Vec<Complex64>, Vec<Complex64>, Vec<Complex64>)> {
        let nlm = self.config.nlm();
        let (mut q, mut s, mut t) = (vec![ZERO; nlm], vec![ZERO; nlm], vec![ZERO; nlm]);
        self.qst_forward_into(vr, vt, vp, &mut q, &mut s, &mut t, &mut Workspace::new())?;
        Ok((q, s, t))
    }

    /// 3-component analysis into caller buffers.
    #[allow(clippy::too_many_arguments)]
    pub fn qst_forward_into(
        &self,
        vr: &[f64],
        vt: &[f64],
        vp: &[f64],
        q: &mut [Complex64],
        s: &mut [Complex64],
        t: &mut [Complex64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let (nspat, nlm) = (self.config.nspat(), self.config.nlm());
        check_len("vr", nspat, vr.len())?;
        check_len("u", nspat, vt.len())?;
        check_len("v", nspat, vp.len())?;
        check_len("radial", nlm, q.len())?;
        check_len("spheroidal", nlm, s.len())?;
        check_len("toroidal", nlm, t.len())?;

        tracing::trace!("qst forward");
        self.analyse(&[vr, vt, vp], FieldKind::Vector(VectorParts::Radial), ws);
        ws.gather(&self.config, &mut [q, s, t]);
        Ok(())
    }

    /// 3-component field (v_r, v_θ, v_φ) of radial, spheroidal and toroidal
    /// coefficients, computed in a single pass.
    pub fn qst_inverse(
        &self,
        q: &[Complex64],
        s: &[Complex64],
        t: &[Complex64],
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let nspat = self.config.nspat();
        let (mut vr, mut vt, mut vp) = (vec![0.0; nspat], vec![0.0; nspat], vec![0.0; nspat]);
        self.qst_inverse_into(q, s, t, &mut vr, &mut vt, &mut vp, &mut Workspace::new())?;
        Ok((vr, vt, vp))
    }

    /// 3-component synthesis into caller buffers.
    #[allow(clippy::too_many_arguments)]
    pub fn qst_inverse_into(
        &self,
        q: &[Complex64],
        s: &[Complex64],
        t: &[Complex64],
        vr: &mut [f64],
        vt: &mut [f64],
        vp: &mut [f64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let (nspat, nlm) = (self.config.nspat(), self.config.nlm());
        check_len("radial", nlm, q.len())?;
        check_len("spheroidal", nlm, s.len())?;
        check_len("toroidal", nlm, t.len())?;
        check_len("vr", nspat, vr.len())?;
        check_len("u", nspat, vt.len())?;
        check_len("v", nspat, vp.len())?;

        tracing::trace!("qst inverse");
        self.synthesise(
            &[q, s, t],
            FieldKind::Vector(VectorParts::Radial),
            &mut [vr, vt, vp],
            ws,
        );
        Ok(())
    }

    /// Order index of order `m`, if the truncation represents it.
    fn order_index(&self, m: usize) -> Result<OrderIndex> {
        let t = self.config.truncation();
        if m % t.mres() == 0 && m / t.mres() < t.n_orders() {
            Ok(OrderIndex::new(m / t.mres()))
        } else {
            Err(ShtError::Order {
                m,
                max_order: t.max_order(),
                mres: t.mres(),
            })
        }
    }

    /// Legendre analysis of a single order.
    ///
    /// `profile` is the order-`m` Fourier coefficient of a field at every
    /// latitude row, north to south; the result holds Q_lm for
    /// l = m..=lmax in increasing degree.
    pub fn order_forward(&self, m: usize, profile: &[Complex64]) -> Result<Vec<Complex64>> {
        let im = self.order_index(m)?;
        let mut spectral = vec![ZERO; self.config.truncation().n_degrees(im)];
        self.order_forward_into(m, profile, &mut spectral, &mut Workspace::new())?;
        Ok(spectral)
    }

    /// Single-order analysis into a caller buffer.
    pub fn order_forward_into(
        &self,
        m: usize,
        profile: &[Complex64],
        spectral: &mut [Complex64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let im = self.order_index(m)?;
        check_len("profile", self.config.nlat(), profile.len())?;
        check_len("spectral", self.config.truncation().n_degrees(im), spectral.len())?;

        tracing::trace!(m, "order forward");
        let config = &*self.config;
        let col = ws.column(config.lmax());
        match &self.table {
            Some(table) => scalar::analyse_profile(config, &**table, im, profile, spectral, col),
            None => {
                let source = OnTheFly::new(config.recurrence(), config.grid());
                scalar::analyse_profile(config, &source, im, profile, spectral, col)
            }
        }
        Ok(())
    }

    /// Latitude profile Σ_l Q_lm y_lm(θ) of a single order at every row.
    ///
    /// `spectral` holds Q_lm for l = m..=lmax in increasing degree.
    pub fn order_inverse(&self, m: usize, spectral: &[Complex64]) -> Result<Vec<Complex64>> {
        let mut profile = vec![ZERO; self.config.nlat()];
        self.order_inverse_into(m, spectral, &mut profile, &mut Workspace::new())?;
        Ok(profile)
    }

    /// Single-order synthesis into a caller buffer.
    pub fn order_inverse_into(
        &self,
        m: usize,
        spectral: &[Complex64],
        profile: &mut [Complex64],
        ws: &mut Workspace,
    ) -> Result<()> {
        let im = self.order_index(m)?;
        check_len("spectral", self.config.truncation().n_degrees(im), spectral.len())?;
        check_len("profile", self.config.nlat(), profile.len())?;

        tracing::trace!(m, "order inverse");
        let config = &*self.config;
        let col = ws.column(config.lmax());
        match &self.table {
            Some(table) => scalar::synthesise_profile(config, &**table, im, spectral, profile, col),
            None => {
                let source = OnTheFly::new(config.recurrence(), config.grid());
                scalar::synthesise_profile(config, &source, im, spectral, profile, col)
            }
        }
        Ok(())
    }

    /// Grid rows to spectral blocks in `ws.spectral`.
    fn analyse(&self, fields: &[&[f64]], kind: FieldKind, ws: &mut Workspace) {
        let config = &*self.config;
        ws.ensure(config, &self.partitions, fields.len());
        let Workspace {
            modes,
            spectral,
            slots,
        } = ws;

        self.scheduler.install(|| {
            self.rows_forward(fields, modes, slots);
            match &self.table {
                Some(table) => self.orders_forward(&**table, kind, fields.len(), modes, spectral, slots),
                None => {
                    let source = OnTheFly::new(config.recurrence(), config.grid());
                    self.orders_forward(&source, kind, fields.len(), modes, spectral, slots)
                }
            }
        });
    }

    /// Spectral inputs to grid rows.
    fn synthesise(
        &self,
        inputs: &[&[Complex64]],
        kind: FieldKind,
        outputs: &mut [&mut [f64]],
        ws: &mut Workspace,
    ) {
        let config = &*self.config;
        let nch = outputs.len();
        ws.ensure(config, &self.partitions, nch.max(inputs.len()));
        ws.scatter(config, inputs);
        let Workspace {
            modes,
            spectral,
            slots,
        } = ws;

        self.scheduler.install(|| {
            match &self.table {
                Some(table) => self.pairs_inverse(&**table, kind, nch, spectral, modes, slots),
                None => {
                    let source = OnTheFly::new(config.recurrence(), config.grid());
                    self.pairs_inverse(&source, kind, nch, spectral, modes, slots)
                }
            }
            self.rows_inverse(nch, modes, outputs, slots);
        });
    }

    /// Forward FFT of every row, packed two rows at a time.
    fn rows_forward(&self, fields: &[&[f64]], modes: &mut [Complex64], slots: &mut [WorkerScratch]) {
        let config = &*self.config;
        let fft = config.fft();
        let (nlat, nphi) = (config.nlat(), config.nphi());
        let nm = fft.n_modes();
        let rows_per_block = self.partitions.rows_per_block;

        for (ch, field) in fields.iter().enumerate() {
            let field_modes = &mut modes[ch * nlat * nm..(ch + 1) * nlat * nm];
            for_each_block(field_modes, rows_per_block * nm, slots, |b, block, slot| {
                let WorkerScratch {
                    fft_buf,
                    fft_scratch,
                    ..
                } = slot;
                let first_row = b * rows_per_block;
                for (j, chunk) in block.chunks_mut(2 * nm).enumerate() {
                    let r = first_row + 2 * j;
                    let row_a = &field[r * nphi..(r + 1) * nphi];
                    if chunk.len() == 2 * nm {
                        let row_b = &field[(r + 1) * nphi..(r + 2) * nphi];
                        let (modes_a, modes_b) = chunk.split_at_mut(nm);
                        fft.forward(row_a, Some(row_b), modes_a, Some(modes_b), fft_buf, fft_scratch);
                    } else {
                        fft.forward(row_a, None, chunk, None, fft_buf, fft_scratch);
                    }
                }
            });
        }
    }

    /// Forward Legendre stage, split by orders.
    fn orders_forward<S: LegendreSource>(
        &self,
        source: &S,
        kind: FieldKind,
        nch: usize,
        modes: &[Complex64],
        spectral: &mut [Complex64],
        slots: &mut [WorkerScratch],
    ) {
        let config = &*self.config;
        let t = config.truncation();
        let offset = |im: usize| nch * t.mode_offset(OrderIndex::new(im));
        let len = offset(t.n_orders());

        fork_join(
            &self.partitions.order_parts,
            &mut spectral[..len],
            0,
            slots,
            &offset,
            &|orders: Range<usize>, out: &mut [Complex64], slot: &mut WorkerScratch| match kind {
                FieldKind::Scalar => {
                    scalar::analyse_orders(config, source, orders, modes, nch, out, &mut slot.column)
                }
                FieldKind::Vector(parts) => {
                    vector::analyse_orders(config, source, parts, orders, modes, out, &mut slot.column)
                }
            },
        );
    }

    /// Inverse Legendre stage, split by latitude pairs.
    fn pairs_inverse<S: LegendreSource>(
        &self,
        source: &S,
        kind: FieldKind,
        nch: usize,
        spectral: &[Complex64],
        modes: &mut [Complex64],
        slots: &mut [WorkerScratch],
    ) {
        let config = &*self.config;
        let stride = 2 * nch * config.truncation().n_orders();
        let offset = |pair: usize| pair * stride;
        let len = offset(config.nlat_2());

        fork_join(
            &self.partitions.pair_parts,
            &mut modes[..len],
            0,
            slots,
            &offset,
            &|pairs: Range<usize>, out: &mut [Complex64], slot: &mut WorkerScratch| match kind {
                FieldKind::Scalar => {
                    scalar::synthesise_pairs(config, source, pairs, spectral, nch, out, &mut slot.column)
                }
                FieldKind::Vector(parts) => {
                    vector::synthesise_pairs(config, source, parts, pairs, spectral, out, &mut slot.column)
                }
            },
        );
    }

    /// Inverse FFT of every row, packed two rows at a time.
    fn rows_inverse(
        &self,
        nch: usize,
        modes: &[Complex64],
        outputs: &mut [&mut [f64]],
        slots: &mut [WorkerScratch],
    ) {
        let config = &*self.config;
        let fft = config.fft();
        let (nlat, nlat_2, nphi) = (config.nlat(), config.nlat_2(), config.nphi());
        let nm = fft.n_modes();
        let rows_per_block = self.partitions.rows_per_block;

        // Row r reads the northern modes of pair r or the southern modes of its mirror.
        let row_start = |r: usize, ch: usize| {
            if r < nlat_2 {
                pair_mode_offset(r, ch, false, nch, nm)
            } else {
                pair_mode_offset(nlat - 1 - r, ch, true, nch, nm)
            }
        };
        let row_modes = |r: usize, ch: usize| &modes[row_start(r, ch)..row_start(r, ch) + nm];

        for (ch, field) in outputs.iter_mut().enumerate() {
            for_each_block(&mut field[..], rows_per_block * nphi, slots, |b, block, slot| {
                let WorkerScratch {
                    fft_buf,
                    fft_scratch,
                    ..
                } = slot;
                let first_row = b * rows_per_block;
                for (j, rows) in block.chunks_mut(2 * nphi).enumerate() {
                    let r = first_row + 2 * j;
                    if rows.len() == 2 * nphi {
                        let (row_a, row_b) = rows.split_at_mut(nphi);
                        fft.inverse(
                            row_modes(r, ch),
                            Some(row_modes(r + 1, ch)),
                            row_a,
                            Some(row_b),
                            fft_buf,
                            fft_scratch,
                        );
                    } else {
                        fft.inverse(row_modes(r, ch), None, rows, None, fft_buf, fft_scratch);
                    }
                }
            });
        }
    }
}
