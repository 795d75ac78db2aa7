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

//! Public entry points (`spec.md` §6): `fft_direct`/`fft_inverse`,
//! `fht_direct`/`fht_inverse`, `transform_matrix`, and `TransformConfig`
//! (`spec.md` §3). The spectrum-domain entry points are re-exported here
//! under the names `spec.md` §6 gives them; their implementations live in
//! `spectrum::conversion`/`spectrum::convolution`.

use log::{debug, trace};
use std::sync::Mutex;

use crate::buffer::VecBuffer;
use crate::error::{CoreError, CoreResult};
use crate::fft::fft_inplace;
use crate::fht::fht_inplace;
use crate::matrix::Matrix;
use crate::progress::ProgressContext;
use crate::sample_array::{Sample, SampleArray};
use crate::tables::BUFFER_LENGTH;
use crate::threadpool::ThreadPool;

pub use crate::spectrum::conversion::{
    fourier_to_hartley_complex, fourier_to_hartley_real, hartley_to_fourier_complex,
    hartley_to_fourier_real,
};
pub use crate::spectrum::convolution::{
    fourier_spectrum_of_convolution as fft_spectrum_of_convolution,
    hartley_spectrum_of_convolution_complex as fht_spectrum_of_convolution_complex,
    hartley_spectrum_of_convolution_real as fht_spectrum_of_convolution_real,
};

/// `spec.md` §3 "Transform configuration". `normalize_direct` decides
/// whether the `1/N` factor lands on the direct transform or the inverse;
/// composing direct then inverse is always the identity either way.
/// `max_temp_memory` is a soft cap future tiling/paging callers can use to
/// decide whether intermediate layers fit in a fast in-RAM model; the
/// concrete orchestrator below only consults it for its own scratch-line
/// gathering (see [`transform_matrix`]).
#[derive(Debug, Clone, Copy)]
pub struct TransformConfig {
    pub normalize_direct: bool,
    pub max_temp_memory: u64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            normalize_direct: false,
            max_temp_memory: (BUFFER_LENGTH as u64) * 64,
        }
    }
}

fn normalize<S: Sample>(arr: &mut SampleArray<S>) {
    let n = arr.length();
    if n == 0 {
        return;
    }
    let scale = S::one() / S::from(n).unwrap();
    arr.mul_range(0, n, scale);
}

/// `fft_direct(context, samples)` (`spec.md` §6). `samples` must be a
/// complex sample array of power-of-two length.
pub fn fft_direct<S: Sample>(
    config: &TransformConfig,
    samples: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    fft_inplace(samples, false, progress)?;
    if config.normalize_direct {
        normalize(samples);
    }
    Ok(())
}

/// `fft_inverse(context, samples)` (`spec.md` §6).
pub fn fft_inverse<S: Sample>(
    config: &TransformConfig,
    samples: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    fft_inplace(samples, true, progress)?;
    if !config.normalize_direct {
        normalize(samples);
    }
    Ok(())
}

/// `fht_direct(context, samples)` (`spec.md` §6). No complexity
/// restriction: `samples` may be real or complex, only length must be a
/// power of two.
pub fn fht_direct<S: Sample>(
    config: &TransformConfig,
    samples: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    fht_inplace(samples, progress)?;
    if config.normalize_direct {
        normalize(samples);
    }
    Ok(())
}

/// `fht_inverse(context, samples)` (`spec.md` §6). The FHT kernel itself
/// is self-inverse up to a factor of `N` (`fht.rs`); the "inverse" here is
/// only distinguished from "direct" by which side carries the `1/N`.
pub fn fht_inverse<S: Sample>(
    config: &TransformConfig,
    samples: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    fht_inplace(samples, progress)?;
    if !config.normalize_direct {
        normalize(samples);
    }
    Ok(())
}

/// Which 1-D kernel [`transform_matrix`] applies along every dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixTransform {
    FftDirect,
    FftInverse,
    FhtDirect,
    FhtInverse,
}

impl MatrixTransform {
    fn needs_imaginary(self) -> bool {
        matches!(self, MatrixTransform::FftDirect | MatrixTransform::FftInverse)
    }
}

/// `stride` (spacing between consecutive elements along `dim`), `dim_len`,
/// and the number of independent lines of that dimension in a row-major
/// matrix of shape `dims`.
fn dimension_shape(dims: &[u64], dim: usize) -> (u64, u64, u64) {
    let dim_len = dims[dim];
    let stride: u64 = dims[dim + 1..].iter().product();
    let block_size = stride * dim_len;
    let total: u64 = dims.iter().product();
    let num_blocks = if block_size == 0 { 0 } else { total / block_size };
    (stride, dim_len, num_blocks)
}

/// Every line's starting flat offset along dimension `dim`.
fn line_starts(dims: &[u64], dim: usize) -> Vec<u64> {
    let (stride, dim_len, num_blocks) = dimension_shape(dims, dim);
    let block_size = stride * dim_len;
    let mut starts = Vec::with_capacity((num_blocks * stride) as usize);
    for block in 0..num_blocks {
        for r in 0..stride {
            starts.push(block * block_size + r);
        }
    }
    starts
}

fn transform_line<S: Sample>(
    config: &TransformConfig,
    kind: MatrixTransform,
    re: &mut [S],
    im: Option<&mut [S]>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let len = re.len() as u64;
    match im {
        Some(im) => {
            let mut arr = SampleArray::new_complex(
                Box::new(VecBuffer::new(re.to_vec())),
                Box::new(VecBuffer::new(im.to_vec())),
                len,
            )?;
            match kind {
                MatrixTransform::FftDirect => fft_direct(config, &mut arr, progress)?,
                MatrixTransform::FftInverse => fft_inverse(config, &mut arr, progress)?,
                MatrixTransform::FhtDirect => fht_direct(config, &mut arr, progress)?,
                MatrixTransform::FhtInverse => fht_inverse(config, &mut arr, progress)?,
            }
            let (out_re, out_im) = arr.as_complex_slices_mut().unwrap();
            re.copy_from_slice(out_re);
            im.copy_from_slice(out_im);
        }
        None => {
            let mut arr = SampleArray::new_real(Box::new(VecBuffer::new(re.to_vec())), len)?;
            match kind {
                MatrixTransform::FhtDirect => fht_direct(config, &mut arr, progress)?,
                MatrixTransform::FhtInverse => fht_inverse(config, &mut arr, progress)?,
                MatrixTransform::FftDirect | MatrixTransform::FftInverse => {
                    return Err(CoreError::UnsupportedKind(
                        "fft_direct/fft_inverse require a complex sample array",
                    ))
                }
            }
            let out_re = arr.as_real_slice_mut().unwrap();
            re.copy_from_slice(out_re);
        }
    }
    Ok(())
}

/// Transforms every line of `matrix` (and, for FFT, `matrix_im`) along one
/// dimension, gathering each line into an owned scratch buffer first
/// (`spec.md` §4.5: 1-D kernels must see identical results whether fed
/// from a contiguous row or a strided view — gathering into a contiguous
/// scratch line guarantees the fast contiguous path in `fft.rs`/`fht.rs`
/// always applies, regardless of the matrix's own stride). Lines are
/// independent owned buffers once gathered, so they can be handed to the
/// thread pool without any unsafe aliasing of the matrix's backing store,
/// mirroring the chunked-row parallelism of the teacher's
/// `convolve_2d_parallel` (`helpers.rs`) without needing its
/// transpose-based restriction to square 2-D data.
fn transform_dimension<S: Sample>(
    config: &TransformConfig,
    kind: MatrixTransform,
    dims: &[u64],
    re: &mut SampleArray<S>,
    mut im: Option<&mut SampleArray<S>>,
    dim: usize,
    pool: &mut dyn ThreadPool,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let (stride, dim_len, _) = dimension_shape(dims, dim);
    if dim_len <= 1 {
        return Ok(());
    }
    let starts = line_starts(dims, dim);
    if starts.is_empty() {
        return Ok(());
    }

    let mut re_lines: Vec<(u64, Vec<S>)> = Vec::with_capacity(starts.len());
    let mut im_lines: Vec<Vec<S>> = Vec::with_capacity(if im.is_some() { starts.len() } else { 0 });
    for &start in &starts {
        let mut line = vec![S::zero(); dim_len as usize];
        for t in 0..dim_len {
            line[t as usize] = re.get(start + t * stride).0;
        }
        re_lines.push((start, line));
        if let Some(im) = im.as_deref_mut() {
            let mut iline = vec![S::zero(); dim_len as usize];
            for t in 0..dim_len {
                iline[t as usize] = im.get(start + t * stride).0;
            }
            im_lines.push(iline);
        }
    }

    let parallelism = pool.recommended_parallelism().max(1).min(re_lines.len().max(1));
    let chunk_size = (re_lines.len() + parallelism - 1) / parallelism.max(1);
    let chunk_size = chunk_size.max(1);
    trace!(
        "transform_dimension: dim={dim} lines={} chunk_size={chunk_size}",
        re_lines.len()
    );

    let errors: Mutex<Vec<CoreError>> = Mutex::new(Vec::new());
    {
        let re_chunks = re_lines.chunks_mut(chunk_size);
        let mut im_chunks = if im.is_some() {
            Some(im_lines.chunks_mut(chunk_size))
        } else {
            None
        };
        let mut tasks: Vec<Box<dyn FnOnce() + Send + '_>> = Vec::new();
        for re_chunk in re_chunks {
            let im_chunk = im_chunks.as_mut().map(|c| c.next().unwrap_or(&mut []));
            let errors = &errors;
            let config = &*config;
            let progress = progress;
            tasks.push(Box::new(move || {
                let mut im_iter = im_chunk.map(|c| c.iter_mut());
                for (_, line) in re_chunk.iter_mut() {
                    let im_slice = im_iter
                        .as_mut()
                        .and_then(|it| it.next())
                        .map(|v| v.as_mut_slice());
                    if let Err(e) =
                        transform_line(config, kind, line.as_mut_slice(), im_slice, progress)
                    {
                        errors.lock().unwrap().push(e);
                    }
                }
            }));
        }
        pool.perform_tasks(tasks);
    }
    if let Some(e) = errors.into_inner().unwrap().into_iter().next() {
        return Err(e);
    }

    for (i, (start, line)) in re_lines.into_iter().enumerate() {
        for t in 0..dim_len {
            re.set(start + t * stride, line[t as usize], S::zero());
        }
        if let Some(im) = im.as_deref_mut() {
            let iline = &im_lines[i];
            for t in 0..dim_len {
                im.set(start + t * stride, iline[t as usize], S::zero());
            }
        }
    }
    Ok(())
}

/// `transform_matrix(context, matrix[, matrix_im])` (`spec.md` §6):
/// applies `kind`'s 1-D kernel along every dimension of `matrix` (and, for
/// the FFT variants, the paired `matrix_im`), composing per-dimension
/// transforms as `spec.md` §4.5 describes.
pub fn transform_matrix<S: Sample>(
    config: &TransformConfig,
    kind: MatrixTransform,
    matrix: &mut Matrix<S>,
    matrix_im: Option<&mut Matrix<S>>,
    pool: &mut dyn ThreadPool,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    if kind.needs_imaginary() && matrix_im.is_none() {
        return Err(CoreError::NullArgument(
            "FFT matrix transform requires an imaginary-part matrix",
        ));
    }
    let dims = matrix.dims().to_vec();
    if let Some(im) = matrix_im.as_deref() {
        if im.dims() != dims.as_slice() {
            return Err(CoreError::SizeMismatch(
                "real and imaginary matrices must share dimensions".to_string(),
            ));
        }
    }
    debug!("transform_matrix: dims={dims:?} kind={kind:?}");

    let n_dims = dims.len();
    match matrix_im {
        Some(im_matrix) => {
            for dim in 0..n_dims {
                let sub = progress.sub_context(1, n_dims.max(1) as u64);
                let (re_arr, im_arr) = (matrix.array(), im_matrix.array());
                transform_dimension(
                    config,
                    kind,
                    &dims,
                    re_arr,
                    Some(im_arr),
                    dim,
                    pool,
                    sub.as_ref(),
                )?;
            }
        }
        None => {
            for dim in 0..n_dims {
                let sub = progress.sub_context(1, n_dims.max(1) as u64);
                let re_arr = matrix.array();
                transform_dimension(config, kind, &dims, re_arr, None, dim, pool, sub.as_ref())?;
            }
        }
    }
    Ok(())
}
