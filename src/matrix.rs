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

//! Row-major multi-dimensional sample storage (`spec.md` §5 "Matrix"): a
//! flat [`SampleArray`] plus a shape, letting 2-D transforms reuse the
//! same 1-D kernels row-by-row and column-by-column.

use crate::error::{CoreError, CoreResult};
use crate::sample_array::{Sample, SampleArray};

/// A dense, row-major `dims.len()`-dimensional array of samples.
pub struct Matrix<S: Sample> {
    dims: Vec<u64>,
    array: SampleArray<S>,
}

fn total_len(dims: &[u64]) -> CoreResult<u64> {
    let mut total: u128 = 1;
    for &d in dims {
        if d == 0 {
            return Err(CoreError::InvalidLength(
                "matrix dimension must be nonzero".to_string(),
            ));
        }
        total *= d as u128;
        if total > u64::MAX as u128 {
            return Err(CoreError::TooLarge(
                "matrix dimensions overflow total sample count".to_string(),
            ));
        }
    }
    Ok(total as u64)
}

impl<S: Sample> Matrix<S> {
    /// Wraps `array` as a matrix of shape `dims`; `array.length()` must
    /// equal the product of `dims`.
    pub fn new(dims: Vec<u64>, array: SampleArray<S>) -> CoreResult<Self> {
        let expected = total_len(&dims)?;
        if array.length() != expected {
            return Err(CoreError::SizeMismatch(format!(
                "array of length {} does not match dims {:?} (expected {expected})",
                array.length(),
                dims
            )));
        }
        Ok(Self { dims, array })
    }

    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    pub fn array(&mut self) -> &mut SampleArray<S> {
        &mut self.array
    }

    /// Row-major flat offset of the first sample of row `row_index` along
    /// the outermost dimension, and that row's length along the
    /// second-outermost dimension onward (`spec.md` §5 `sub_arr`).
    pub fn row_extent(&self) -> (u64, u64) {
        if self.dims.is_empty() {
            return (0, self.array.length());
        }
        let rows = self.dims[0];
        let row_len = if rows == 0 { 0 } else { self.array.length() / rows };
        (rows, row_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VecBuffer;

    #[test]
    fn new_validates_dims_against_array_length() {
        let arr = SampleArray::new_real(Box::new(VecBuffer::new(vec![0.0; 12])), 12).unwrap();
        assert!(Matrix::new(vec![3, 4], arr).is_ok());

        let arr2 = SampleArray::new_real(Box::new(VecBuffer::new(vec![0.0; 12])), 12).unwrap();
        assert!(Matrix::new(vec![3, 5], arr2).is_err());
    }

    #[test]
    fn row_extent_matches_shape() {
        let arr = SampleArray::new_real(Box::new(VecBuffer::new(vec![0.0; 20])), 20).unwrap();
        let mut m = Matrix::new(vec![4, 5], arr).unwrap();
        assert_eq!(m.row_extent(), (4, 5));
        assert_eq!(m.array().length(), 20);
    }

    #[test]
    fn rejects_zero_dimension() {
        let arr = SampleArray::new_real(Box::new(VecBuffer::new(vec![])), 0).unwrap();
        assert!(Matrix::new(vec![0, 5], arr).is_err());
    }
}
