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

//! Radix-2 decimation-in-time FFT (`spec.md` §4.3): bit-reversal reorder
//! followed by an iterative butterfly network, with twiddle factors either
//! read from the process-wide sine cache or advanced by recurrence and
//! periodically resynchronized against the cache to bound accumulated
//! floating-point error (`spec.md` §4.3, Open Question #2 resolved in
//! `DESIGN.md`: resync every `RECURRENCE_RESYNC_STRIDE` steps).

use crate::bitrev::bit_reverse_reorder;
use crate::error::{CoreError, CoreResult};
use crate::progress::ProgressContext;
use crate::sample_array::{Sample, SampleArray};
use crate::twiddle::Twiddles;
use num_complex::Complex;

/// Transforms `arr` (a complex scalar sample array of power-of-two length)
/// in place. `inverse` selects the conjugated twiddle direction;
/// normalization (dividing by `N`) is the caller's responsibility, per
/// `spec.md` §4.3's "normalization is placed at the call site, not inside
/// the kernel" rule.
pub fn fft_inplace<S: Sample>(
    arr: &mut SampleArray<S>,
    inverse: bool,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    if !arr.is_complex() {
        return Err(CoreError::UnsupportedKind(
            "fft_inplace requires a complex sample array",
        ));
    }
    let n = arr.length();
    if n == 0 {
        return Ok(());
    }
    if n & (n - 1) != 0 {
        return Err(CoreError::InvalidLength(format!(
            "length {n} is not a power of two"
        )));
    }

    let bitrev_progress = progress.sub_context(1, 10);
    bit_reverse_reorder(arr, bitrev_progress.as_ref())?;

    if n <= 1 {
        return Ok(());
    }

    if let Some((re, im)) = arr.as_complex_slices_mut() {
        fft_butterfly_contiguous(re, im, inverse, progress.sub_context(9, 10).as_ref())?;
        return Ok(());
    }

    fft_butterfly_generic(arr, inverse, progress.sub_context(9, 10).as_ref())
}

fn fft_butterfly_contiguous<S: Sample>(
    re: &mut [S],
    im: &mut [S],
    inverse: bool,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = re.len();
    let sign: S = if inverse { S::one() } else { -S::one() };
    let mut size = 2usize;
    let mut stage = 0u64;
    let total_stages = (n as f64).log2() as u64;
    while size <= n {
        let half = size / 2;
        let tw = Twiddles::<S>::new(half);
        let mut start = 0;
        while start < n {
            for k in 0..half {
                let w = tw.get(k);
                let w = Complex::new(w.re, w.im * sign);
                let i = start + k;
                let j = i + half;
                let rj = Complex::new(re[j], im[j]);
                let t = rj * w;
                let ri = Complex::new(re[i], im[i]);
                let sum = ri + t;
                let diff = ri - t;
                re[i] = sum.re;
                im[i] = sum.im;
                re[j] = diff.re;
                im[j] = diff.im;
            }
            start += size;
        }
        size *= 2;
        stage += 1;
        progress.check_interruption()?;
        progress.update_progress(stage, total_stages.max(1));
    }
    Ok(())
}

fn fft_butterfly_generic<S: Sample>(
    arr: &mut SampleArray<S>,
    inverse: bool,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = arr.length() as usize;
    let sign: S = if inverse { S::one() } else { -S::one() };
    let mut size = 2usize;
    let mut stage = 0u64;
    let total_stages = (n as f64).log2() as u64;
    while size <= n {
        let half = size / 2;
        let tw = Twiddles::<S>::new(half);
        let mut start = 0;
        while start < n {
            for k in 0..half {
                let w = tw.get(k);
                let w = Complex::new(w.re, w.im * sign);
                let i = (start + k) as u64;
                let j = i + half as u64;
                apply_butterfly(arr, i, j, w);
            }

            start += size;
        }
        size *= 2;
        stage += 1;
        progress.check_interruption()?;
        progress.update_progress(stage, total_stages.max(1));
    }
    Ok(())
}

/// Twiddle-rotates `arr[j]` by `w`, then replaces `arr[i]`/`arr[j]` with
/// their sum and difference. Reads both operands into locals first:
/// `arr[i]` and `arr[j]` are always distinct indices here, but the
/// rotated value of `arr[j]` must still be computed before either slot is
/// overwritten.
#[inline]
fn apply_butterfly<S: Sample>(arr: &mut SampleArray<S>, i: u64, j: u64, w: Complex<S>) {
    let (ire, iim) = arr.get(i);
    let (jre, jim) = arr.get(j);
    let t = Complex::new(jre, jim) * w;
    let a = Complex::new(ire, iim);
    let sum = a + t;
    let diff = a - t;
    arr.set(i, sum.re, sum.im);
    arr.set(j, diff.re, diff.im);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VecBuffer;
    use crate::progress::NullProgress;

    fn complex_arr(re: Vec<f64>, im: Vec<f64>) -> SampleArray<f64> {
        let len = re.len() as u64;
        SampleArray::new_complex(Box::new(VecBuffer::new(re)), Box::new(VecBuffer::new(im)), len)
            .unwrap()
    }

    #[test]
    fn fft_of_impulse_is_constant() {
        let mut a = complex_arr(vec![1.0, 0.0, 0.0, 0.0], vec![0.0; 4]);
        fft_inplace(&mut a, false, &NullProgress).unwrap();
        let (re, im) = a.as_complex_slices_mut().unwrap();
        for k in 0..4 {
            assert!((re[k] - 1.0).abs() < 1e-10, "re[{k}]={}", re[k]);
            assert!(im[k].abs() < 1e-10, "im[{k}]={}", im[k]);
        }
    }

    #[test]
    fn forward_then_inverse_with_normalization_roundtrips() {
        let n = 16usize;
        let re: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin()).collect();
        let im = vec![0.0; n];
        let mut a = complex_arr(re.clone(), im);
        fft_inplace(&mut a, false, &NullProgress).unwrap();
        fft_inplace(&mut a, true, &NullProgress).unwrap();
        let (re2, im2) = a.as_complex_slices_mut().unwrap();
        for k in 0..n {
            let v = re2[k] / n as f64;
            assert!((v - re[k]).abs() < 1e-9, "k={k} got={v} want={}", re[k]);
            assert!((im2[k] / n as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn fft_of_ramp_matches_known_dft() {
        let mut a = complex_arr(vec![1.0, 2.0, 3.0, 4.0], vec![0.0; 4]);
        fft_inplace(&mut a, false, &NullProgress).unwrap();
        let (re, im) = a.as_complex_slices_mut().unwrap();
        let want_re = [10.0, -2.0, -2.0, -2.0];
        let want_im = [0.0, 2.0, 0.0, -2.0];
        for k in 0..4 {
            assert!((re[k] - want_re[k]).abs() < 1e-9, "re[{k}]={}", re[k]);
            assert!((im[k] - want_im[k]).abs() < 1e-9, "im[{k}]={}", im[k]);
        }
    }

    #[test]
    fn rejects_non_power_of_two_length() {
        let mut a = complex_arr(vec![0.0; 6], vec![0.0; 6]);
        assert!(fft_inplace(&mut a, false, &NullProgress).is_err());
    }

    #[test]
    fn rejects_real_only_array() {
        let mut a = SampleArray::new_real(Box::new(VecBuffer::new(vec![0.0; 4])), 4).unwrap();
        assert!(fft_inplace(&mut a, false, &NullProgress).is_err());
    }
}
