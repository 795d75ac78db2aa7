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

//! Bit-reversal reordering (`spec.md` §4.2): the first stage of the
//! iterative radix-2 FFT, permuting `a[i]` into `a[reverse_bits(i, logN)]`
//! in place by swapping each pair once.

use crate::error::{CoreError, CoreResult};
use crate::progress::ProgressContext;
use crate::sample_array::{Sample, SampleArray};
use crate::tables::reverse_16;

/// Progress is reported in blocks of this many swaps for small transforms...
const SMALL_BLOCK: u64 = 1024;
/// ...and in blocks of this many for large ones, avoiding a context switch
/// per swap on multi-million-sample transforms.
const LARGE_BLOCK: u64 = 65536;
const LARGE_THRESHOLD: u64 = 1 << 20;

fn log2_exact(n: u64) -> CoreResult<u32> {
    if n == 0 || (n & (n - 1)) != 0 {
        return Err(CoreError::InvalidLength(format!(
            "length {n} is not a power of two"
        )));
    }
    Ok(n.trailing_zeros())
}

/// Reverses the low `bits` bits of `i`, composing two 16-bit table lookups
/// for widths above 16 (`spec.md` §4.2: "a 64K lookup table composed across
/// 32-bit or wider indices").
fn reverse_bits(i: u64, bits: u32) -> u64 {
    let table = reverse_16();
    if bits <= 16 {
        (table[i as usize] as u64) >> (16 - bits)
    } else if bits <= 32 {
        let lo = table[(i & 0xFFFF) as usize] as u64;
        let hi = table[((i >> 16) & 0xFFFF) as usize] as u64;
        ((lo << 16) | hi) >> (32 - bits)
    } else {
        let w0 = table[(i & 0xFFFF) as usize] as u64;
        let w1 = table[((i >> 16) & 0xFFFF) as usize] as u64;
        let w2 = table[((i >> 32) & 0xFFFF) as usize] as u64;
        let w3 = table[((i >> 48) & 0xFFFF) as usize] as u64;
        ((w0 << 48) | (w1 << 32) | (w2 << 16) | w3) >> (64 - bits)
    }
}

/// Permutes `arr` in place so that `arr[i]` moves to `arr[reverse_bits(i)]`.
/// `arr.length()` must be a power of two (checked); `N <= 2` is a no-op.
pub fn bit_reverse_reorder<S: Sample>(
    arr: &mut SampleArray<S>,
    progress: &dyn ProgressContext,
) -> CoreResult<()> {
    let n = arr.length();
    let bits = log2_exact(n)?;
    if n <= 2 {
        return Ok(());
    }
    let block = if n >= LARGE_THRESHOLD {
        LARGE_BLOCK
    } else {
        SMALL_BLOCK
    };
    let mut done = 0u64;
    for i in 0..n {
        let j = reverse_bits(i, bits);
        if j > i {
            arr.swap(i, j);
        }
        done += 1;
        if done % block == 0 {
            progress.check_interruption()?;
            progress.update_progress(done, n);
        }
    }
    progress.update_progress(n, n);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::VecBuffer;
    use crate::progress::NullProgress;

    fn arr(data: Vec<f64>) -> SampleArray<f64> {
        let len = data.len() as u64;
        SampleArray::new_real(Box::new(VecBuffer::new(data)), len).unwrap()
    }

    #[test]
    fn reverse_bits_matches_hand_computation() {
        // 3 bits: 0b011 (3) -> 0b110 (6)
        assert_eq!(reverse_bits(0b011, 3), 0b110);
        assert_eq!(reverse_bits(0b001, 4), 0b1000);
    }

    #[test]
    fn reorders_length_eight_to_expected_permutation() {
        let mut a = arr(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        bit_reverse_reorder(&mut a, &NullProgress).unwrap();
        let s = a.as_real_slice_mut().unwrap();
        assert_eq!(s, &[0.0, 4.0, 2.0, 6.0, 1.0, 5.0, 3.0, 7.0]);
    }

    #[test]
    fn is_involution() {
        let mut a = arr((0..16).map(|x| x as f64).collect());
        bit_reverse_reorder(&mut a, &NullProgress).unwrap();
        bit_reverse_reorder(&mut a, &NullProgress).unwrap();
        let s = a.as_real_slice_mut().unwrap();
        assert_eq!(s, &(0..16).map(|x| x as f64).collect::<Vec<_>>()[..]);
    }

    #[test]
    fn rejects_non_power_of_two() {
        let mut a = arr(vec![0.0; 6]);
        assert!(bit_reverse_reorder(&mut a, &NullProgress).is_err());
    }

    #[test]
    fn degenerate_lengths_are_noops() {
        let mut a = arr(vec![1.0]);
        bit_reverse_reorder(&mut a, &NullProgress).unwrap();
        assert_eq!(a.as_real_slice_mut().unwrap(), &[1.0]);

        let mut a2 = arr(vec![1.0, 2.0]);
        bit_reverse_reorder(&mut a2, &NullProgress).unwrap();
        assert_eq!(a2.as_real_slice_mut().unwrap(), &[1.0, 2.0]);
    }
}
