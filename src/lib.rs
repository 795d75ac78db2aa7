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

//! `spectral-core` computes one- and multi-dimensional Fast Fourier
//! Transforms and Separable Fast Hartley Transforms over large numeric
//! arrays and matrices, and exposes convolution-spectrum and
//! Hartley<->Fourier conversion operators built on top of those kernels.
//!
//! Usage
//! -----
//! ```
//! use spectral_core::buffer::VecBuffer;
//! use spectral_core::progress::NullProgress;
//! use spectral_core::sample_array::SampleArray;
//! use spectral_core::{fft_direct, fft_inverse, TransformConfig};
//!
//! let config = TransformConfig::default();
//! let re = vec![1.0f64, 1.0, 1.0, 1.0];
//! let im = vec![0.0f64; 4];
//! let mut samples =
//!     SampleArray::new_complex(Box::new(VecBuffer::new(re)), Box::new(VecBuffer::new(im)), 4)
//!         .unwrap();
//! fft_direct(&config, &mut samples, &NullProgress).unwrap();
//! fft_inverse(&config, &mut samples, &NullProgress).unwrap();
//! ```

pub mod bitrev;
pub mod buffer;
pub mod error;
pub mod fft;
pub mod fht;
pub mod matrix;
pub mod progress;
pub mod sample_array;
pub mod scratch_pool;
pub mod spectrum;
pub mod tables;
pub mod threadpool;
pub mod transform;
mod twiddle;

pub use error::{CoreError, CoreResult};
pub use matrix::Matrix;
pub use transform::{
    fft_direct, fft_inverse, fft_spectrum_of_convolution, fht_direct, fht_inverse,
    fht_spectrum_of_convolution_complex, fht_spectrum_of_convolution_real,
    fourier_to_hartley_complex, fourier_to_hartley_real, hartley_to_fourier_complex,
    hartley_to_fourier_real, transform_matrix, MatrixTransform, TransformConfig,
};
