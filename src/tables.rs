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

//! Process-wide constants and lookup tables (`spec.md` §3 "RootsOfUnity
//! tables", §6 "Constants").
//!
//! All tables are read-only once initialized and therefore safe to share
//! across threads; the lazily-computed ones are guarded by a `OnceCell`,
//! the same pattern `reed-solomon-16` uses for its GF(2^16) log/exp tables.

use once_cell::sync::OnceCell;
use std::f64::consts::PI;

/// Soft cap on scratch-buffer pool slots, per precision (`spec.md` §6).
pub const BUFFER_LENGTH: usize = 32_768;
/// Block size used by the paged sample-array specialization and by the
/// 1-D closed-form Hartley<->Fourier conversion (`spec.md` §4.1, §4.6).
pub const BUF_CAP: usize = 8_192;
/// `log2` of the twiddle-factor sine cache size (`spec.md` §3).
pub const LOG_CACHE_SIZE: u32 = 20;
/// `new_compatible` is guaranteed to succeed for any length up to this
/// bound (`spec.md` §3).
pub const GUARANTEED_COMPATIBLE_SAMPLES_ARRAY_LENGTH: u64 = 64;
/// Stride (in powers of two) used to widen the twiddle cache threshold for
/// the FHT kernel (`spec.md` §4.4).
pub const LOG_ANGLE_STEP: u32 = 4;

/// `HALF = 2^(LOG_CACHE_SIZE - 1)`: the largest butterfly half-width for
/// which twiddle factors are read directly from `SINE_CACHE`.
pub const CACHE_SIZE: usize = 1 << (LOG_CACHE_SIZE - 1);

/// Number of steps between recurrence resynchronizations in the twiddle
/// recurrence path (`spec.md` §4.3, and Open Question #2 in §9). Chosen to
/// match the spec's stated heuristic; verified against the round-trip
/// property test at N up to 2^16 for both `f32` and `f64`.
pub const RECURRENCE_RESYNC_STRIDE: usize = 16;

static SINE_CACHE: OnceCell<Box<[f64]>> = OnceCell::new();
static LOG_SINE_CACHE: OnceCell<Box<[f64]>> = OnceCell::new();
static REVERSE_16_TABLE: OnceCell<Box<[u16; 65536]>> = OnceCell::new();

/// `SINE_CACHE[k] = sin(pi/2 * k/HALF)` for `k` in `0..=HALF`.
pub fn sine_cache() -> &'static [f64] {
    SINE_CACHE.get_or_init(|| {
        let half = CACHE_SIZE;
        let mut table = vec![0.0f64; half + 1].into_boxed_slice();
        for (k, v) in table.iter_mut().enumerate() {
            *v = (PI / 2.0 * (k as f64) / (half as f64)).sin();
        }
        table
    })
}

/// `LOGARITHMICAL_SINE_CACHE[k] = sin(pi * 2^(-k))` for `k` in `0..=64`.
pub fn logarithmical_sine_cache() -> &'static [f64] {
    LOG_SINE_CACHE.get_or_init(|| {
        let mut table = vec![0.0f64; 65].into_boxed_slice();
        for (k, v) in table.iter_mut().enumerate() {
            *v = (PI * 2f64.powi(-(k as i32))).sin();
        }
        table
    })
}

/// 16-bit bit-reversal lookup table used by the bit-reversal reorder
/// (`spec.md` §4.2) and by the FFT/FHT contiguous fast paths.
pub fn reverse_16() -> &'static [u16; 65536] {
    REVERSE_16_TABLE.get_or_init(|| {
        let mut table = Box::new([0u16; 65536]);
        for i in 0..65536u32 {
            table[i as usize] = (i as u16).reverse_bits();
        }
        table
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_cache_endpoints() {
        let cache = sine_cache();
        assert_eq!(cache.len(), CACHE_SIZE + 1);
        assert!((cache[0] - 0.0).abs() < 1e-15);
        assert!((cache[CACHE_SIZE] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reverse_16_is_involution() {
        let table = reverse_16();
        for i in [0u32, 1, 255, 1234, 65535] {
            let r = table[i as usize];
            assert_eq!(table[r as usize], i as u16);
        }
    }
}
