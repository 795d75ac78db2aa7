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

//! The thread-pool collaborator interface (`spec.md` §6 "Thread pool",
//! §4.5 "parallelism gates on contiguous-direct access"). The core never
//! spawns threads itself; it asks a pool supplied by the host to run a
//! fixed number of independent tasks and waits for all of them.

/// A host-supplied pool capable of running a batch of independent closures
/// to completion. Modeled directly on `scoped_threadpool::Pool::scoped`,
/// the pool this crate uses by default off of `wasm32`.
pub trait ThreadPool: Send + Sync {
    /// Runs `tasks`, each exactly once, and returns only once all have
    /// completed (or panicked — a panicking task poisons the batch exactly
    /// as `scoped_threadpool` does).
    fn perform_tasks(&mut self, tasks: Vec<Box<dyn FnOnce() + Send + '_>>);

    /// Hint for how many tasks a caller should partition work into to keep
    /// this pool busy without oversubscribing it.
    fn recommended_parallelism(&self) -> usize;
}

/// [`ThreadPool`] backed by `scoped_threadpool::Pool`.
#[cfg(not(target_arch = "wasm32"))]
pub struct ScopedThreadPool {
    pool: scoped_threadpool::Pool,
    parallelism: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl ScopedThreadPool {
    pub fn new(num_threads: u32) -> Self {
        Self {
            pool: scoped_threadpool::Pool::new(num_threads),
            parallelism: num_threads.max(1) as usize,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ThreadPool for ScopedThreadPool {
    fn perform_tasks(&mut self, tasks: Vec<Box<dyn FnOnce() + Send + '_>>) {
        self.pool.scoped(|scope| {
            for task in tasks {
                scope.execute(task);
            }
        });
    }

    fn recommended_parallelism(&self) -> usize {
        self.parallelism
    }
}

/// [`ThreadPool`] that runs every task on the calling thread, in order.
/// Used on `wasm32` (no OS threads) and whenever the caller's sample
/// arrays are not contiguous-direct, where parallel access would need
/// synchronization the paged storage path does not provide
/// (`spec.md` §4.5).
pub struct SingleThreaded;

impl ThreadPool for SingleThreaded {
    fn perform_tasks(&mut self, tasks: Vec<Box<dyn FnOnce() + Send + '_>>) {
        for task in tasks {
            task();
        }
    }

    fn recommended_parallelism(&self) -> usize {
        1
    }
}
