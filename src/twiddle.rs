// spectral-core - a spectral-transform engine (FFT / Separable FHT)

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Twiddle-factor generator shared by the FFT and FHT kernels (`spec.md`
//! §4.3/§4.4): `cos(pi*k/half) + i*sin(pi*k/half)` read directly out of
//! `SINE_CACHE` when `half` is small enough, otherwise advanced by an
//! increment recurrence that periodically resynchronizes against an
//! exact value to bound drift.
//!
//! The FFT kernel only trusts the cache up to `CACHE_SIZE` (`spec.md`
//! §4.3). The FHT kernel extends that range by a factor of
//! `2^LOG_ANGLE_STEP` via coarser "strided" cache sampling (`spec.md`
//! §4.4: "the threshold is `half <= CACHE_SIZE * 2^LOG_ANGLE_STEP`
//! (stride sampling)") before falling back to the same plain recurrence
//! path the FFT kernel uses beyond its own threshold.

use crate::sample_array::Sample;
use crate::tables::{
    logarithmical_sine_cache, sine_cache, CACHE_SIZE, LOG_ANGLE_STEP, RECURRENCE_RESYNC_STRIDE,
};
use log::trace;
use num_complex::Complex;
use std::marker::PhantomData;

/// `(cos(pi*k/half), sin(pi*k/half))` read directly out of `SINE_CACHE`,
/// which only stores the first quadrant (`SINE_CACHE[m] = sin(pi/2 *
/// m/CACHE_SIZE)` for `m` in `0..=CACHE_SIZE`). `half` must divide
/// `CACHE_SIZE` and `k` must be in `0..2*half`, true for every caller
/// below. Doubling the scaled index before folding is what makes this
/// match `theta = pi*k/half` instead of `theta/2` (a table built for
/// `[0, pi/2]` can only directly cover half of the `[0, pi)` range a
/// twiddle factor needs).
fn cache_cos_sin(k: usize, half: usize) -> (f64, f64) {
    let cache = sine_cache();
    let stride = CACHE_SIZE / half;
    let m = 2 * k * stride;
    if m <= CACHE_SIZE {
        (cache[CACHE_SIZE - m], cache[m])
    } else {
        let m2 = 2 * CACHE_SIZE - m;
        (-cache[m - CACHE_SIZE], cache[m2])
    }
}

/// The per-step rotation `(cos(pi/half), sin(pi/half))` used to advance
/// the recurrence, derived from `LOGARITHMICAL_SINE_CACHE[log2(half)+1]
/// = sin(pi/(2*half))` via the half-angle identities rather than calling
/// `f64::cos`/`f64::sin` directly (`spec.md` §4.3: "root ... computed
/// once from LOGARITHMICAL_SINE_CACHE"). `half` is always an exact power
/// of two here (every caller's `half` comes from halving a power-of-two
/// transform length).
fn recurrence_root(half: usize) -> (f64, f64) {
    let log_half = half.trailing_zeros() as usize;
    let half_sin = logarithmical_sine_cache()[log_half + 1];
    let half_cos = (1.0 - half_sin * half_sin).sqrt();
    let sin_v = 2.0 * half_sin * half_cos;
    let cos_v = 1.0 - 2.0 * half_sin * half_sin;
    (cos_v, sin_v)
}

/// Advances `(cos, sin)` forward by `steps` applications of the rotation
/// `(cstep, sstep)`.
fn advance(cos0: f64, sin0: f64, cstep: f64, sstep: f64, steps: usize) -> (f64, f64) {
    let mut cos_v = cos0;
    let mut sin_v = sin0;
    for _ in 0..steps {
        let new_cos = cos_v * cstep - sin_v * sstep;
        let new_sin = sin_v * cstep + cos_v * sstep;
        cos_v = new_cos;
        sin_v = new_sin;
    }
    (cos_v, sin_v)
}

enum Mode {
    Direct,
    Strided { stride: usize },
    Recurrence,
}

/// `cos(theta) + i*sin(theta)` for `theta = pi*k/half`, `k` in `0..half`
/// (`spec.md` §4.3/§4.4's twiddle factor, before the caller applies the
/// direction sign).
pub(crate) struct Twiddles<S: Sample> {
    half: usize,
    mode: Mode,
    _marker: PhantomData<S>,
}

impl<S: Sample> Twiddles<S> {
    /// FFT threshold (`spec.md` §4.3): cache path only up to `CACHE_SIZE`.
    pub(crate) fn new(half: usize) -> Self {
        Self::with_log_angle_step(half, 0)
    }

    /// FHT threshold (`spec.md` §4.4): cache-derived path extended to
    /// `CACHE_SIZE << LOG_ANGLE_STEP` via strided sampling.
    pub(crate) fn new_extended(half: usize) -> Self {
        Self::with_log_angle_step(half, LOG_ANGLE_STEP)
    }

    fn with_log_angle_step(half: usize, log_angle_step: u32) -> Self {
        let half = half.max(1);
        let mode = if half <= CACHE_SIZE {
            Mode::Direct
        } else if log_angle_step > 0 && half <= (CACHE_SIZE << log_angle_step) {
            let stride = half / CACHE_SIZE;
            trace!(
                "half={half} exceeds twiddle cache size {CACHE_SIZE}; using strided cache \
                 sampling at stride {stride}"
            );
            Mode::Strided { stride }
        } else {
            trace!(
                "half={half} exceeds twiddle cache range; using recurrence path, resyncing \
                 every {RECURRENCE_RESYNC_STRIDE} steps"
            );
            Mode::Recurrence
        };
        Self {
            half,
            mode,
            _marker: PhantomData,
        }
    }

    pub(crate) fn get(&self, k: usize) -> Complex<S> {
        let (cos_v, sin_v) = match self.mode {
            Mode::Direct => cache_cos_sin(k, self.half),
            Mode::Strided { stride } => {
                let block = k / stride;
                let block_start = block * stride;
                let (bc, bs) = cache_cos_sin(block, CACHE_SIZE);
                let (cstep, sstep) = recurrence_root(self.half);
                advance(bc, bs, cstep, sstep, k - block_start)
            }
            Mode::Recurrence => {
                let block_start = (k / RECURRENCE_RESYNC_STRIDE) * RECURRENCE_RESYNC_STRIDE;
                let base_angle = std::f64::consts::PI * (block_start as f64) / (self.half as f64);
                let (cstep, sstep) = recurrence_root(self.half);
                advance(
                    base_angle.cos(),
                    base_angle.sin(),
                    cstep,
                    sstep,
                    k - block_start,
                )
            }
        };
        Complex::new(S::from(cos_v).unwrap(), S::from(sin_v).unwrap())
    }
}
