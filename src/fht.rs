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

//! Separable Fast Hartley Transform (`spec.md` §4.4): a recursive radix-2
//! decimation-in-time decomposition with hand-unrolled base cases for
//! `N` in `{2, 4, 8}`, falling back to a general recursive step for larger
//! power-of-two lengths. The Hartley transform is self-inverse up to a
//! factor of `N` (`spec.md` §4.4: "the inverse FHT is the forward FHT
//! followed by dividing every sample by N").

use crate::error::{CoreError, CoreResult};
use crate::progress::ProgressContext;
use crate::sample_array::{Sample, SampleArray};
use crate::twiddle::Twiddles;

/// Transforms `arr` (a real scalar sample array of power-of-two length) in
/// place. Always self-inverse up to the factor-of-`N` scaling; callers
/// wanting the normalized inverse divide every sample by `N` themselves
/// (`spec.md` §4.4, same call-site-normalization rule as the FFT).
pub fn fht_inplace<S: Sample>(
    arr: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    if arr.is_complex() {
        return Err(CoreError::UnsupportedKind(
            "fht_inplace requires a real sample array",
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
    if let Some(slice) = arr.as_real_slice_mut() {
        fht_recursive_contiguous(slice, progress)?;
        return Ok(());
    }
    fht_recursive_generic(arr, 0, n, progress)
}

fn fht_base_contiguous<S: Sample>(s: &mut [S]) -> bool {
    match s.len() {
        2 => {
            let (a, b) = (s[0], s[1]);
            s[0] = a + b;
            s[1] = a - b;
            true
        }
        4 => {
            let (a, b, c, d) = (s[0], s[1], s[2], s[3]);
            let t0 = a + c;
            let t1 = a - c;
            let t2 = b + d;
            let t3 = b - d;
            s[0] = t0 + t2;
            s[1] = t1 + t3;
            s[2] = t0 - t2;
            s[3] = t1 - t3;
            true
        }
        8 => {
            // Even/odd split into two N=4 sub-transforms (the ss0123/
            // sd0123/ds0123/dd0123 terms), then the same radix-2 Hartley
            // combine the general recursive step uses, with half=4
            // unrolled so no sub-slice allocation is needed. The even
            // half feeds every output position, not just the even ones:
            // a prior version of this routine dropped He[3] (= e1-e3)
            // from outputs 3 and 5.
            let mut evens = [s[0], s[2], s[4], s[6]];
            let mut odds = [s[1], s[3], s[5], s[7]];
            fht_base4(&mut evens);
            fht_base4(&mut odds);
            let half = 4usize;
            let tw = Twiddles::<S>::new_extended(half);
            for k in 0..half {
                let w = tw.get(k);
                let (c, sn) = (w.re, w.im);
                let e = evens[k];
                let o = odds[k];
                let rotated = o * c + odds[(half - k) % half] * sn;
                s[k] = e + rotated;
                s[k + half] = e - rotated;
            }
            true
        }
        _ => false,
    }
}

/// The `N=4` base case (`spec.md` §4.4: `y0=s01+s23, y1=d01+d23,
/// y2=s01-s23, y3=d01-d23`), factored out so the `N=8` case can reuse it
/// for its even/odd halves.
fn fht_base4<S: Sample>(s: &mut [S; 4]) {
    let (a, b, c, d) = (s[0], s[1], s[2], s[3]);
    let t0 = a + c;
    let t1 = a - c;
    let t2 = b + d;
    let t3 = b - d;
    s[0] = t0 + t2;
    s[1] = t1 + t3;
    s[2] = t0 - t2;
    s[3] = t1 - t3;
}

fn fht_recursive_contiguous<S: Sample>(
    s: &mut [S],
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    progress.check_interruption()?;
    let n = s.len();
    if n <= 1 {
        return Ok(());
    }
    if fht_base_contiguous(s) {
        return Ok(());
    }
    let half = n / 2;
    // Separate into even/odd sub-sequences (classic radix-2 DIT split),
    // recurse, then combine via the Hartley butterfly.
    let mut evens: Vec<S> = (0..half).map(|i| s[2 * i]).collect();
    let mut odds: Vec<S> = (0..half).map(|i| s[2 * i + 1]).collect();
    let even_progress = progress.sub_context(1, 2);
    let odd_progress = progress.sub_context(1, 2);
    fht_recursive_contiguous(&mut evens, even_progress.as_ref())?;
    fht_recursive_contiguous(&mut odds, odd_progress.as_ref())?;

    let tw = Twiddles::<S>::new_extended(half);
    for k in 0..half {
        let w = tw.get(k);
        let (c, sn) = (w.re, w.im);
        let e = evens[k];
        let o = odds[k];
        let rotated = o * c + odds[(half - k) % half] * sn;
        s[k] = e + rotated;
        s[k + half] = e - rotated;
    }
    Ok(())
}

fn fht_recursive_generic<S: Sample>(
    arr: &mut SampleArray<S>,
    offset: u64,
    n: u64,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    progress.check_interruption()?;
    if n <= 1 {
        return Ok(());
    }
    if n <= 8 {
        let mut buf = vec![S::zero(); n as usize];
        for (i, v) in buf.iter_mut().enumerate() {
            *v = arr.get(offset + i as u64).0;
        }
        fht_base_contiguous(&mut buf);
        for (i, v) in buf.iter().enumerate() {
            arr.set(offset + i as u64, *v, S::zero());
        }
        return Ok(());
    }
    let half = n / 2;
    let mut evens = vec![S::zero(); half as usize];
    let mut odds = vec![S::zero(); half as usize];
    for i in 0..half {
        evens[i as usize] = arr.get(offset + 2 * i).0;
        odds[i as usize] = arr.get(offset + 2 * i + 1).0;
    }
    let even_progress = progress.sub_context(1, 2);
    let odd_progress = progress.sub_context(1, 2);
    fht_recursive_contiguous(&mut evens, even_progress.as_ref())?;
    fht_recursive_contiguous(&mut odds, odd_progress.as_ref())?;
    let tw = Twiddles::<S>::new_extended(half as usize);
    for k in 0..half as usize {
        let w = tw.get(k);
        let (c, sn) = (w.re, w.im);
        let e = evens[k];
        let o = odds[k];
        let rotated = o * c + odds[(half as usize - k) % half as usize] * sn;
        arr.set(offset + k as u64, e + rotated, S::zero());
        arr.set(offset + k as u64 + half, e - rotated, S::zero());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VecBuffer;
    use crate::progress::NullProgress;

    fn real_arr(data: Vec<f64>) -> SampleArray<f64> {
        let len = data.len() as u64;
        SampleArray::new_real(Box::new(VecBuffer::new(data)), len).unwrap()
    }

    #[test]
    fn base_case_two_matches_hand_computation() {
        let mut a = real_arr(vec![3.0, 5.0]);
        fht_inplace(&mut a, &NullProgress).unwrap();
        assert_eq!(a.as_real_slice_mut().unwrap(), &[8.0, -2.0]);
    }

    #[test]
    fn base_case_four_matches_hand_computation() {
        let mut a = real_arr(vec![1.0, 2.0, 3.0, 4.0]);
        fht_inplace(&mut a, &NullProgress).unwrap();
        // DHT(1,2,3,4): H[k] = sum x[n] cas(2*pi*n*k/4)
        let s = a.as_real_slice_mut().unwrap().to_vec();
        assert!((s[0] - 10.0).abs() < 1e-10);
        assert!((s[1] - (-4.0)).abs() < 1e-10);
        assert!((s[2] - (-2.0)).abs() < 1e-10);
        assert!((s[3] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn base_case_eight_of_impulse_is_constant() {
        let mut a = real_arr(vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        fht_inplace(&mut a, &NullProgress).unwrap();
        let s = a.as_real_slice_mut().unwrap();
        for (k, v) in s.iter().enumerate() {
            assert!((v - 1.0).abs() < 1e-10, "s[{k}]={v}");
        }
    }

    #[test]
    fn base_case_eight_matches_hand_computation() {
        let mut a = real_arr(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        fht_inplace(&mut a, &NullProgress).unwrap();
        // DHT(1..8): H[k] = sum_n x[n]*cas(2*pi*n*k/8), worked out by hand
        // from cas(m*pi/4) for m in 0..8 = [1, sqrt2, 1, 0, -1, -sqrt2, -1, 0].
        let r2 = 2f64.sqrt();
        let want = [
            36.0,
            -8.0 - 4.0 * r2,
            -8.0,
            -4.0 * r2,
            -4.0,
            -8.0 + 4.0 * r2,
            0.0,
            4.0 * r2,
        ];
        let s = a.as_real_slice_mut().unwrap().to_vec();
        for k in 0..8 {
            assert!((s[k] - want[k]).abs() < 1e-9, "k={k} got={} want={}", s[k], want[k]);
        }
    }

    #[test]
    fn applying_twice_recovers_original_scaled_by_n() {
        let n = 32usize;
        let data: Vec<f64> = (0..n).map(|i| (i as f64 * 0.21).cos()).collect();
        let mut a = real_arr(data.clone());
        fht_inplace(&mut a, &NullProgress).unwrap();
        fht_inplace(&mut a, &NullProgress).unwrap();
        let s = a.as_real_slice_mut().unwrap();
        for k in 0..n {
            assert!((s[k] / n as f64 - data[k]).abs() < 1e-8, "k={k}");
        }
    }

    #[test]
    fn rejects_complex_array() {
        let mut a = SampleArray::new_complex(
            Box::new(VecBuffer::new(vec![0.0; 4])),
            Box::new(VecBuffer::new(vec![0.0; 4])),
            4,
        )
        .unwrap();
        assert!(fht_inplace(&mut a, &NullProgress).is_err());
    }

    #[test]
    fn rejects_non_power_of_two() {
        let mut a = real_arr(vec![0.0; 5]);
        assert!(fht_inplace(&mut a, &NullProgress).is_err());
    }
}
