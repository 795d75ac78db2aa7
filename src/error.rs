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

//! Error kinds for the core (see `spec.md` §7).
//!
//! All validation happens at the public entry point before any allocation
//! or dispatch; no partial state is mutated on validation failure.

use thiserror::Error;

/// Errors a `spectral-core` entry point can return.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transform length not a power of two, dimensions disagree between
    /// argument matrices, a negative vector dimension was requested,
    /// `vector_step < vector_length`, or the backing buffer is too short
    /// for the requested shape.
    #[error("invalid length: {0}")]
    InvalidLength(String),

    /// A required operand was missing.
    #[error("required argument is missing: {0}")]
    NullArgument(&'static str),

    /// Matrices of different shape were passed to a multi-matrix operator.
    #[error("size mismatch: {0}")]
    SizeMismatch(String),

    /// The requested compatible sample-array length would exceed the
    /// memory model's maximum, or `length * vector_length` would overflow.
    #[error("requested size too large: {0}")]
    TooLarge(String),

    /// FFT was invoked on a real-only sample array.
    #[error("unsupported sample kind: {0}")]
    UnsupportedKind(&'static str),

    /// A running transform observed a cancellation request.
    #[error("transform cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type CoreResult<T> = Result<T, CoreError>;
