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

//! Block-buffered cursor over a [`NumericBuffer`] (`spec.md` §4.1 "Paged"
//! specialization): reads/writes go through a `BUF_CAP`-sized scratch
//! block refilled via `bulk_get`/flushed via `bulk_set`, instead of one
//! `NumericBuffer::get`/`set` call per sample.

use crate::buffer::NumericBuffer;
use crate::sample_array::Sample;
use crate::tables::BUF_CAP;

pub(crate) struct PagedCursor<S: Sample> {
    buf: Box<dyn NumericBuffer<S>>,
    block: Vec<S>,
    block_base: u64,
    block_len: usize,
    loaded: bool,
    dirty: bool,
}

impl<S: Sample> PagedCursor<S> {
    pub(crate) fn new(buf: Box<dyn NumericBuffer<S>>) -> Self {
        let cap = BUF_CAP.min((buf.length().max(1)) as usize);
        Self {
            buf,
            block: vec![S::zero(); cap],
            block_base: 0,
            block_len: cap,
            loaded: false,
            dirty: false,
        }
    }

    fn flush(&mut self) {
        if self.dirty {
            let remaining = self.buf.length().saturating_sub(self.block_base);
            let n = (self.block_len as u64).min(remaining) as usize;
            self.buf.bulk_set(self.block_base, &self.block, 0, n);
            self.dirty = false;
        }
    }

    fn ensure_loaded(&mut self, i: u64) {
        if self.loaded && i >= self.block_base && i < self.block_base + self.block_len as u64 {
            return;
        }
        self.flush();
        let aligned = (i / self.block_len as u64) * self.block_len as u64;
        let remaining = self.buf.length().saturating_sub(aligned);
        let n = (self.block_len as u64).min(remaining) as usize;
        self.buf.bulk_get(aligned, &mut self.block, 0, n);
        self.block_base = aligned;
        self.loaded = true;
    }

    pub(crate) fn get(&mut self, i: u64) -> S {
        self.ensure_loaded(i);
        self.block[(i - self.block_base) as usize]
    }

    pub(crate) fn set(&mut self, i: u64, v: S) {
        self.ensure_loaded(i);
        self.block[(i - self.block_base) as usize] = v;
        self.dirty = true;
    }
}

impl<S: Sample> Drop for PagedCursor<S> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PagedBuffer;

    #[test]
    fn cursor_roundtrip_spans_blocks() {
        let buf: Box<dyn NumericBuffer<f64>> = Box::new(PagedBuffer::<f64>::zeroed(50_000, 257));
        let mut cursor = PagedCursor::new(buf);
        for i in (0..50_000u64).step_by(97) {
            cursor.set(i, i as f64 * 0.5);
        }
        for i in (0..50_000u64).step_by(97) {
            assert_eq!(cursor.get(i), i as f64 * 0.5);
        }
    }
}
