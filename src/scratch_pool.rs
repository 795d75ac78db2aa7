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

//! A bounded pool of reusable scratch buffers (`spec.md` §6 "Scratch
//! buffer pool"): recursive operators like `fht_recursive_contiguous`
//! allocate a fresh `Vec` per recursion level; under heavy concurrent use
//! that becomes allocator pressure worth amortizing. The pool is a simple
//! `Mutex`-guarded free list capped at [`BUFFER_LENGTH`] slots; once full,
//! returned buffers are dropped instead of blocking the releasing thread,
//! and a caller that finds the pool empty just allocates directly — the
//! pool is an optimization, never a hard limit on concurrency.

use crate::sample_array::Sample;
use crate::tables::BUFFER_LENGTH;
use log::trace;
use std::sync::Mutex;

/// A free list of same-precision scratch `Vec<S>` buffers.
pub struct ScratchPool<S: Sample> {
    free: Mutex<Vec<Vec<S>>>,
}

impl<S: Sample> ScratchPool<S> {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Returns a zeroed buffer of length `len`, reusing a pooled buffer of
    /// at least that capacity if one is available.
    pub fn acquire(&self, len: usize) -> Vec<S> {
        let mut free = self.free.lock().unwrap();
        if let Some(pos) = free.iter().position(|b| b.capacity() >= len) {
            let mut buf = free.swap_remove(pos);
            buf.clear();
            buf.resize(len, S::zero());
            return buf;
        }
        trace!("scratch pool exhausted for len={len}, allocating fresh buffer");
        vec![S::zero(); len]
    }

    /// Returns `buf` to the pool for reuse, unless the pool is already at
    /// capacity, in which case it is simply dropped.
    pub fn release(&self, buf: Vec<S>) {
        let mut free = self.free.lock().unwrap();
        if free.len() < BUFFER_LENGTH {
            free.push(buf);
        }
    }
}

impl<S: Sample> Default for ScratchPool<S> {
    fn default() -> Self {
        Self::new()
    }
}
