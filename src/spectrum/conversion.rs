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

//! Hartley<->Fourier conversion (`spec.md` §4.6).
//!
//! For a real Hartley spectrum `H` of length `N`, the Fourier spectrum is
//! `F_k = (H_k + H_{N-k})/2 - i*(H_k - H_{N-k})/2` (indices mod `N`); the
//! inverse direction collapses to the elementwise closed form
//! `H_k = Re(F_k) - Im(F_k)`, which needs no index pairing at all (it is
//! the real-output specialization of the general pairwise inverse). Both
//! directions generalize unchanged to a Hartley "spectrum" that itself
//! carries a (re, im) pair, for conversions chained after an FHT of
//! complex input.

use crate::error::{CoreError, CoreResult};
use crate::matrix::Matrix;
use crate::progress::ProgressContext;
use crate::sample_array::{Sample, SampleArray};

/// Converts a real Hartley spectrum `h` into its Fourier spectrum
/// `(f_re, f_im)`, all of length `N`.
pub fn hartley_to_fourier_real<S: Sample>(
    h: &mut SampleArray<S>,
    f_re: &mut SampleArray<S>,
    f_im: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = h.length();
    let half = n / 2;
    let two = S::one() + S::one();
    for k in 0..=half {
        progress.check_interruption()?;
        let nk = (n - k) % n;
        let (hk, _) = h.get(k);
        let (hnk, _) = h.get(nk);
        let s = (hk + hnk) / two;
        let d = (hk - hnk) / two;
        f_re.set(k, s, S::zero());
        f_im.set(k, -d, S::zero());
        if nk != k {
            f_re.set(nk, s, S::zero());
            f_im.set(nk, d, S::zero());
        }
        progress.update_progress(k + 1, half + 1);
    }
    Ok(())
}

/// Converts a complex Hartley "spectrum" `(h_re, h_im)` into its Fourier
/// spectrum `(f_re, f_im)`.
pub fn hartley_to_fourier_complex<S: Sample>(
    h_re: &mut SampleArray<S>,
    h_im: &mut SampleArray<S>,
    f_re: &mut SampleArray<S>,
    f_im: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = h_re.length();
    let half = n / 2;
    let two = S::one() + S::one();
    for k in 0..=half {
        progress.check_interruption()?;
        let nk = (n - k) % n;
        let (hk_re, hk_im) = (h_re.get(k).0, h_im.get(k).0);
        let (hnk_re, hnk_im) = (h_re.get(nk).0, h_im.get(nk).0);
        let s_re = (hk_re + hnk_re) / two;
        let s_im = (hk_im + hnk_im) / two;
        let d_re = (hk_re - hnk_re) / two;
        let d_im = (hk_im - hnk_im) / two;
        // F_k = s - i*d; i*d = (-d_im, d_re)
        f_re.set(k, s_re + d_im, S::zero());
        f_im.set(k, s_im - d_re, S::zero());
        if nk != k {
            // F_{N-k} = s + i*d
            f_re.set(nk, s_re - d_im, S::zero());
            f_im.set(nk, s_im + d_re, S::zero());
        }
        progress.update_progress(k + 1, half + 1);
    }
    Ok(())
}

/// Converts a Fourier spectrum `(f_re, f_im)` of a real-valued sequence
/// into its real Hartley spectrum `h` via the elementwise closed form
/// `h_k = Re(f_k) - Im(f_k)`.
pub fn fourier_to_hartley_real<S: Sample>(
    h: &mut SampleArray<S>,
    f_re: &mut SampleArray<S>,
    f_im: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = h.length();
    for k in 0..n {
        if k % 4096 == 0 {
            progress.check_interruption()?;
        }
        let re = f_re.get(k).0;
        let im = f_im.get(k).0;
        h.set(k, re - im, S::zero());
        progress.update_progress(k + 1, n.max(1));
    }
    Ok(())
}

/// Converts a Fourier spectrum `(f_re, f_im)` into a complex Hartley
/// spectrum `(h_re, h_im)`, the pairwise inverse of
/// [`hartley_to_fourier_complex`].
pub fn fourier_to_hartley_complex<S: Sample>(
    h_re: &mut SampleArray<S>,
    h_im: &mut SampleArray<S>,
    f_re: &mut SampleArray<S>,
    f_im: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = f_re.length();
    let half = n / 2;
    let two = S::one() + S::one();
    for k in 0..=half {
        progress.check_interruption()?;
        let nk = (n - k) % n;
        let (fk_re, fk_im) = (f_re.get(k).0, f_im.get(k).0);
        let (fnk_re, fnk_im) = (f_re.get(nk).0, f_im.get(nk).0);
        let s_re = (fk_re + fnk_re) / two;
        let s_im = (fk_im + fnk_im) / two;
        // d = i*(F_k - F_{N-k))/2; i*(a+bi) = -b + ai
        let diff_re = fk_re - fnk_re;
        let diff_im = fk_im - fnk_im;
        let d_re = -diff_im / two;
        let d_im = diff_re / two;
        h_re.set(k, s_re + d_re, S::zero());
        h_im.set(k, s_im + d_im, S::zero());
        if nk != k {
            h_re.set(nk, s_re - d_re, S::zero());
            h_im.set(nk, s_im - d_im, S::zero());
        }
        progress.update_progress(k + 1, half + 1);
    }
    Ok(())
}

/// `hartley_to_fourier_real`'s pairwise relation for a single `(hk, hnk)`
/// pair, returning `(fk, fnk)` as `(re, im)` pairs.
pub(crate) fn real_pair_to_fourier<S: Sample>(hk: S, hnk: S) -> ((S, S), (S, S)) {
    let two = S::one() + S::one();
    let s = (hk + hnk) / two;
    let d = (hk - hnk) / two;
    ((s, -d), (s, d))
}

/// `hartley_to_fourier_complex`'s pairwise relation for a single
/// `(hk, hnk)` pair of `(re, im)` values, returning `(fk, fnk)`.
pub(crate) fn complex_pair_to_fourier<S: Sample>(hk: (S, S), hnk: (S, S)) -> ((S, S), (S, S)) {
    let two = S::one() + S::one();
    let s_re = (hk.0 + hnk.0) / two;
    let s_im = (hk.1 + hnk.1) / two;
    let d_re = (hk.0 - hnk.0) / two;
    let d_im = (hk.1 - hnk.1) / two;
    ((s_re + d_im, s_im - d_re), (s_re - d_im, s_im + d_re))
}

/// `fourier_to_hartley_complex`'s pairwise relation for a single
/// `(fk, fnk)` pair, returning `(hk, hnk)`. Also the correct inverse of
/// [`real_pair_to_fourier`] when the caller then collapses the result to
/// real via `re - im` (`fourier_to_hartley_real`'s elementwise step).
pub(crate) fn complex_pair_from_fourier<S: Sample>(fk: (S, S), fnk: (S, S)) -> ((S, S), (S, S)) {
    let two = S::one() + S::one();
    let s_re = (fk.0 + fnk.0) / two;
    let s_im = (fk.1 + fnk.1) / two;
    let diff_re = fk.0 - fnk.0;
    let diff_im = fk.1 - fnk.1;
    let d_re = -diff_im / two;
    let d_im = diff_re / two;
    ((s_re + d_re, s_im + d_im), (s_re - d_re, s_im - d_im))
}

pub(crate) fn check_2d_dims<S: Sample>(
    name: &'static str,
    a: &mut Matrix<S>,
    b: &mut Matrix<S>,
    c: &mut Matrix<S>,
) -> CoreResult<(u64, u64)> {
    let dims = a.dims().to_vec();
    if dims.len() != 2 {
        return Err(CoreError::InvalidLength(format!(
            "{name} requires a 2-D matrix, got {} dimensions",
            dims.len()
        )));
    }
    if b.dims() != dims.as_slice() || c.dims() != dims.as_slice() {
        return Err(CoreError::SizeMismatch(format!(
            "{name} operands must share dimensions"
        )));
    }
    Ok((dims[0], dims[1]))
}

/// 2-D closed form for real-input Hartley->Fourier conversion (`spec.md`
/// §4.6, depth=2): jointly processes the four matrix cells `(j,i)`,
/// `(N-j,i)`, `(j,M-i)`, `(N-j,M-i)` per iteration rather than
/// materializing a full intermediate matrix. Equivalent to applying
/// [`hartley_to_fourier_real`] along the outer dimension and then
/// [`hartley_to_fourier_complex`] along the inner one.
pub fn hartley_to_fourier_real_2d<S: Sample>(
    h: &mut Matrix<S>,
    f_re: &mut Matrix<S>,
    f_im: &mut Matrix<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let (n, m) = check_2d_dims("hartley_to_fourier_real_2d", h, f_re, f_im)?;
    let half_n = n / 2;
    let half_m = m / 2;
    for j in 0..=half_n {
        progress.check_interruption()?;
        let nj = (n - j) % n;
        for i in 0..=half_m {
            let mi = (m - i) % m;
            let h1 = h.array().get(j * m + i).0;
            let h2 = h.array().get(nj * m + i).0;
            let h1p = h.array().get(j * m + mi).0;
            let h2p = h.array().get(nj * m + mi).0;

            let (g_ji, g_nji) = real_pair_to_fourier(h1, h2);
            let (g_jmi, g_njmi) = real_pair_to_fourier(h1p, h2p);

            let (f_ji, f_jmi) = complex_pair_to_fourier(g_ji, g_jmi);
            let (f_nji, f_njmi) = complex_pair_to_fourier(g_nji, g_njmi);

            f_re.array().set(j * m + i, f_ji.0, S::zero());
            f_im.array().set(j * m + i, f_ji.1, S::zero());
            if mi != i {
                f_re.array().set(j * m + mi, f_jmi.0, S::zero());
                f_im.array().set(j * m + mi, f_jmi.1, S::zero());
            }
            if nj != j {
                f_re.array().set(nj * m + i, f_nji.0, S::zero());
                f_im.array().set(nj * m + i, f_nji.1, S::zero());
                if mi != i {
                    f_re.array().set(nj * m + mi, f_njmi.0, S::zero());
                    f_im.array().set(nj * m + mi, f_njmi.1, S::zero());
                }
            }
        }
        progress.update_progress(j + 1, half_n + 1);
    }
    Ok(())
}

/// 2-D closed form for complex-input Hartley->Fourier conversion
/// (`spec.md` §4.6, depth=2): the complex-valued counterpart of
/// [`hartley_to_fourier_real_2d`], applying [`hartley_to_fourier_complex`]
/// along both dimensions.
pub fn hartley_to_fourier_complex_2d<S: Sample>(
    h_re: &mut Matrix<S>,
    h_im: &mut Matrix<S>,
    f_re: &mut Matrix<S>,
    f_im: &mut Matrix<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let dims = h_re.dims().to_vec();
    if dims.len() != 2 {
        return Err(CoreError::InvalidLength(
            "hartley_to_fourier_complex_2d requires a 2-D matrix".to_string(),
        ));
    }
    if h_im.dims() != dims.as_slice() || f_re.dims() != dims.as_slice() || f_im.dims() != dims.as_slice() {
        return Err(CoreError::SizeMismatch(
            "hartley_to_fourier_complex_2d operands must share dimensions".to_string(),
        ));
    }
    let (n, m) = (dims[0], dims[1]);
    let half_n = n / 2;
    let half_m = m / 2;
    for j in 0..=half_n {
        progress.check_interruption()?;
        let nj = (n - j) % n;
        for i in 0..=half_m {
            let mi = (m - i) % m;
            let h1 = (h_re.array().get(j * m + i).0, h_im.array().get(j * m + i).0);
            let h2 = (h_re.array().get(nj * m + i).0, h_im.array().get(nj * m + i).0);
            let h1p = (h_re.array().get(j * m + mi).0, h_im.array().get(j * m + mi).0);
            let h2p = (
                h_re.array().get(nj * m + mi).0,
                h_im.array().get(nj * m + mi).0,
            );

            let (g_ji, g_nji) = complex_pair_to_fourier(h1, h2);
            let (g_jmi, g_njmi) = complex_pair_to_fourier(h1p, h2p);

            let (f_ji, f_jmi) = complex_pair_to_fourier(g_ji, g_jmi);
            let (f_nji, f_njmi) = complex_pair_to_fourier(g_nji, g_njmi);

            f_re.array().set(j * m + i, f_ji.0, S::zero());
            f_im.array().set(j * m + i, f_ji.1, S::zero());
            if mi != i {
                f_re.array().set(j * m + mi, f_jmi.0, S::zero());
                f_im.array().set(j * m + mi, f_jmi.1, S::zero());
            }
            if nj != j {
                f_re.array().set(nj * m + i, f_nji.0, S::zero());
                f_im.array().set(nj * m + i, f_nji.1, S::zero());
                if mi != i {
                    f_re.array().set(nj * m + mi, f_njmi.0, S::zero());
                    f_im.array().set(nj * m + mi, f_njmi.1, S::zero());
                }
            }
        }
        progress.update_progress(j + 1, half_n + 1);
    }
    Ok(())
}

/// 2-D closed form for Fourier->Hartley (real output) conversion
/// (`spec.md` §4.6, depth=2), the inverse of
/// [`hartley_to_fourier_real_2d`].
pub fn fourier_to_hartley_real_2d<S: Sample>(
    h: &mut Matrix<S>,
    f_re: &mut Matrix<S>,
    f_im: &mut Matrix<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let (n, m) = check_2d_dims("fourier_to_hartley_real_2d", h, f_re, f_im)?;
    let half_n = n / 2;
    let half_m = m / 2;
    for j in 0..=half_n {
        progress.check_interruption()?;
        let nj = (n - j) % n;
        for i in 0..=half_m {
            let mi = (m - i) % m;
            let f1 = (f_re.array().get(j * m + i).0, f_im.array().get(j * m + i).0);
            let f1p = (
                f_re.array().get(j * m + mi).0,
                f_im.array().get(j * m + mi).0,
            );
            let f2 = (
                f_re.array().get(nj * m + i).0,
                f_im.array().get(nj * m + i).0,
            );
            let f2p = (
                f_re.array().get(nj * m + mi).0,
                f_im.array().get(nj * m + mi).0,
            );

            let (g_ji, g_jmi) = complex_pair_from_fourier(f1, f1p);
            let (g_nji, g_njmi) = complex_pair_from_fourier(f2, f2p);

            let h_ji = g_ji.0 - g_ji.1;
            let h_jmi = g_jmi.0 - g_jmi.1;
            let h_nji = g_nji.0 - g_nji.1;
            let h_njmi = g_njmi.0 - g_njmi.1;

            h.array().set(j * m + i, h_ji, S::zero());
            if mi != i {
                h.array().set(j * m + mi, h_jmi, S::zero());
            }
            if nj != j {
                h.array().set(nj * m + i, h_nji, S::zero());
                if mi != i {
                    h.array().set(nj * m + mi, h_njmi, S::zero());
                }
            }
        }
        progress.update_progress(j + 1, half_n + 1);
    }
    Ok(())
}

/// 2-D closed form for Fourier->Hartley (complex output) conversion
/// (`spec.md` §4.6, depth=2), the inverse of
/// [`hartley_to_fourier_complex_2d`].
pub fn fourier_to_hartley_complex_2d<S: Sample>(
    h_re: &mut Matrix<S>,
    h_im: &mut Matrix<S>,
    f_re: &mut Matrix<S>,
    f_im: &mut Matrix<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let dims = f_re.dims().to_vec();
    if dims.len() != 2 {
        return Err(CoreError::InvalidLength(
            "fourier_to_hartley_complex_2d requires a 2-D matrix".to_string(),
        ));
    }
    if f_im.dims() != dims.as_slice() || h_re.dims() != dims.as_slice() || h_im.dims() != dims.as_slice() {
        return Err(CoreError::SizeMismatch(
            "fourier_to_hartley_complex_2d operands must share dimensions".to_string(),
        ));
    }
    let (n, m) = (dims[0], dims[1]);
    let half_n = n / 2;
    let half_m = m / 2;
    for j in 0..=half_n {
        progress.check_interruption()?;
        let nj = (n - j) % n;
        for i in 0..=half_m {
            let mi = (m - i) % m;
            let f1 = (f_re.array().get(j * m + i).0, f_im.array().get(j * m + i).0);
            let f1p = (
                f_re.array().get(j * m + mi).0,
                f_im.array().get(j * m + mi).0,
            );
            let f2 = (
                f_re.array().get(nj * m + i).0,
                f_im.array().get(nj * m + i).0,
            );
            let f2p = (
                f_re.array().get(nj * m + mi).0,
                f_im.array().get(nj * m + mi).0,
            );

            let (g_ji, g_jmi) = complex_pair_from_fourier(f1, f1p);
            let (g_nji, g_njmi) = complex_pair_from_fourier(f2, f2p);

            let (h_ji, h_nji) = complex_pair_from_fourier(g_ji, g_nji);
            let (h_jmi, h_njmi) = complex_pair_from_fourier(g_jmi, g_njmi);

            h_re.array().set(j * m + i, h_ji.0, S::zero());
            h_im.array().set(j * m + i, h_ji.1, S::zero());
            if mi != i {
                h_re.array().set(j * m + mi, h_jmi.0, S::zero());
                h_im.array().set(j * m + mi, h_jmi.1, S::zero());
            }
            if nj != j {
                h_re.array().set(nj * m + i, h_nji.0, S::zero());
                h_im.array().set(nj * m + i, h_nji.1, S::zero());
                if mi != i {
                    h_re.array().set(nj * m + mi, h_njmi.0, S::zero());
                    h_im.array().set(nj * m + mi, h_njmi.1, S::zero());
                }
            }
        }
        progress.update_progress(j + 1, half_n + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VecBuffer;
    use crate::fft::fft_inplace;
    use crate::fht::fht_inplace;
    use crate::progress::NullProgress;

    fn real_arr(data: Vec<f64>) -> SampleArray<f64> {
        let len = data.len() as u64;
        SampleArray::new_real(Box::new(VecBuffer::new(data)), len).unwrap()
    }

    #[test]
    fn bijection_matches_fft_on_real_input() {
        // Testable property #3 / scenario E6.
        let data = vec![1.0, 2.0, 3.0, 4.0];
        let n = data.len() as u64;

        let mut h = real_arr(data.clone());
        fht_inplace(&mut h, &NullProgress).unwrap();

        let mut f_re = real_arr(data.clone());
        let mut f_im = real_arr(vec![0.0; 4]);
        let mut complex = SampleArray::new_complex(
            Box::new(VecBuffer::new(data.clone())),
            Box::new(VecBuffer::new(vec![0.0; 4])),
            n,
        )
        .unwrap();
        fft_inplace(&mut complex, false, &NullProgress).unwrap();
        for k in 0..n {
            let (re, im) = complex.get(k);
            f_re.set(k, re, 0.0);
            f_im.set(k, im, 0.0);
        }

        let mut converted_re = real_arr(vec![0.0; 4]);
        let mut converted_im = real_arr(vec![0.0; 4]);
        hartley_to_fourier_real(&mut h, &mut converted_re, &mut converted_im, &NullProgress)
            .unwrap();

        for k in 0..n {
            assert!((converted_re.get(k).0 - f_re.get(k).0).abs() < 1e-9, "re k={k}");
            assert!((converted_im.get(k).0 - f_im.get(k).0).abs() < 1e-9, "im k={k}");
        }

        let mut back_h = real_arr(vec![0.0; 4]);
        fourier_to_hartley_real(&mut back_h, &mut f_re, &mut f_im, &NullProgress).unwrap();
        let mut h_again = real_arr(data.clone());
        fht_inplace(&mut h_again, &NullProgress).unwrap();
        for k in 0..n {
            assert!((back_h.get(k).0 - h_again.get(k).0).abs() < 1e-9, "h k={k}");
        }
    }

    #[test]
    fn hartley_to_fourier_real_2d_matches_direct_2d_dft() {
        use crate::matrix::Matrix;
        let (n, m) = (4u64, 4u64);
        let data: Vec<f64> = (0..(n * m)).map(|i| (i as f64 * 0.3).sin()).collect();

        // Build the 2-D Hartley spectrum via the separable FHT (row-then-column).
        let mut h_flat = data.clone();
        for row in 0..n as usize {
            let mut slice =
                real_arr(h_flat[row * m as usize..(row + 1) * m as usize].to_vec());
            fht_inplace(&mut slice, &NullProgress).unwrap();
            let s = slice.as_real_slice_mut().unwrap();
            h_flat[row * m as usize..(row + 1) * m as usize].copy_from_slice(s);
        }
        for col in 0..m as usize {
            let colvals: Vec<f64> = (0..n as usize).map(|r| h_flat[r * m as usize + col]).collect();
            let mut slice = real_arr(colvals);
            fht_inplace(&mut slice, &NullProgress).unwrap();
            let s = slice.as_real_slice_mut().unwrap();
            for (r, v) in s.iter().enumerate() {
                h_flat[r * m as usize + col] = *v;
            }
        }

        let mut h = Matrix::new(vec![n, m], real_arr(h_flat)).unwrap();
        let mut f_re = Matrix::new(vec![n, m], real_arr(vec![0.0; (n * m) as usize])).unwrap();
        let mut f_im = Matrix::new(vec![n, m], real_arr(vec![0.0; (n * m) as usize])).unwrap();
        hartley_to_fourier_real_2d(&mut h, &mut f_re, &mut f_im, &NullProgress).unwrap();

        for kj in 0..n {
            for ki in 0..m {
                let mut acc_re = 0.0f64;
                let mut acc_im = 0.0f64;
                for jn in 0..n {
                    for in_ in 0..m {
                        let x = data[(jn * m + in_) as usize];
                        let theta = -2.0
                            * std::f64::consts::PI
                            * ((jn * kj) as f64 / n as f64 + (in_ * ki) as f64 / m as f64);
                        acc_re += x * theta.cos();
                        acc_im += x * theta.sin();
                    }
                }
                let got_re = f_re.array().get(kj * m + ki).0;
                let got_im = f_im.array().get(kj * m + ki).0;
                assert!((got_re - acc_re).abs() < 1e-8, "re kj={kj} ki={ki}");
                assert!((got_im - acc_im).abs() < 1e-8, "im kj={kj} ki={ki}");
            }
        }

        // Round trip back to the Hartley spectrum.
        let mut back_h = Matrix::new(vec![n, m], real_arr(vec![0.0; (n * m) as usize])).unwrap();
        fourier_to_hartley_real_2d(&mut back_h, &mut f_re, &mut f_im, &NullProgress).unwrap();
        for idx in 0..(n * m) {
            let got = back_h.array().get(idx).0;
            let want = h.array().get(idx).0;
            assert!((got - want).abs() < 1e-8, "idx={idx}");
        }
    }

    #[test]
    fn complex_roundtrip_is_involution() {
        let n = 8u64;
        let h_re_data: Vec<f64> = (0..n).map(|i| i as f64 * 1.5).collect();
        let h_im_data: Vec<f64> = (0..n).map(|i| -(i as f64) * 0.5).collect();

        let mut h_re = real_arr(h_re_data.clone());
        let mut h_im = real_arr(h_im_data.clone());
        let mut f_re = real_arr(vec![0.0; 8]);
        let mut f_im = real_arr(vec![0.0; 8]);
        hartley_to_fourier_complex(&mut h_re, &mut h_im, &mut f_re, &mut f_im, &NullProgress)
            .unwrap();

        let mut back_re = real_arr(vec![0.0; 8]);
        let mut back_im = real_arr(vec![0.0; 8]);
        fourier_to_hartley_complex(&mut back_re, &mut back_im, &mut f_re, &mut f_im, &NullProgress)
            .unwrap();

        for k in 0..n {
            assert!((back_re.get(k).0 - h_re_data[k as usize]).abs() < 1e-9, "re k={k}");
            assert!((back_im.get(k).0 - h_im_data[k as usize]).abs() < 1e-9, "im k={k}");
        }
    }
}
