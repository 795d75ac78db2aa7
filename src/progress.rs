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

//! Progress reporting and cooperative cancellation (`spec.md` §6 "Progress
//! context"). Long transforms check in periodically so a host application
//! can show a progress bar or abort a stuck computation; both are optional,
//! hence [`NullProgress`] as the default.

use crate::error::{CoreError, CoreResult};
use log::debug;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Collaborator interface transform kernels report progress through and
/// poll for cancellation through.
pub trait ProgressContext: Send + Sync {
    /// Returns `Err(CoreError::Cancelled)` if the host requested cancellation.
    fn check_interruption(&self) -> CoreResult<()>;

    /// `done` out of `total` units of work have been completed so far.
    fn update_progress(&self, done: u64, total: u64);

    /// A sub-context for a nested operation that contributes `weight` out of
    /// `total_weight` units of the parent's progress range (`spec.md` §6:
    /// "recursive operators propagate a scaled sub-context rather than
    /// reporting 0-100% once per recursive call").
    fn sub_context(&self, weight: u64, total_weight: u64) -> Box<dyn ProgressContext + '_>;
}

/// No-op progress context: never cancels, discards all updates.
pub struct NullProgress;

impl ProgressContext for NullProgress {
    fn check_interruption(&self) -> CoreResult<()> {
        Ok(())
    }

    fn update_progress(&self, _done: u64, _total: u64) {}

    fn sub_context(&self, _weight: u64, _total_weight: u64) -> Box<dyn ProgressContext + '_> {
        Box::new(NullProgress)
    }
}

/// Cancellable progress context backed by an [`AtomicBool`] flag and an
/// optional progress callback, scaled through nested [`sub_context`] calls.
pub struct AtomicProgress<F: Fn(u64, u64) + Send + Sync> {
    cancelled: AtomicBool,
    callback: F,
    offset: AtomicU64,
    scale_num: u64,
    scale_den: u64,
}

impl<F: Fn(u64, u64) + Send + Sync> AtomicProgress<F> {
    pub fn new(callback: F) -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            callback,
            offset: AtomicU64::new(0),
            scale_num: 1,
            scale_den: 1,
        }
    }

    /// Requests cancellation; observed by the next `check_interruption` call
    /// made from any thread sharing this context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl<F: Fn(u64, u64) + Send + Sync> ProgressContext for AtomicProgress<F> {
    fn check_interruption(&self) -> CoreResult<()> {
        if self.cancelled.load(Ordering::SeqCst) {
            debug!("cancellation observed mid-transform");
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn update_progress(&self, done: u64, total: u64) {
        if total == 0 {
            return;
        }
        let scaled_done = (done as u128 * self.scale_num as u128 / self.scale_den as u128
            / total.max(1) as u128) as u64
            + self.offset.load(Ordering::Relaxed);
        (self.callback)(scaled_done, self.scale_den);
    }

    fn sub_context(&self, weight: u64, total_weight: u64) -> Box<dyn ProgressContext + '_> {
        Box::new(ScaledSubContext {
            parent: self,
            weight,
            total_weight,
        })
    }
}

struct ScaledSubContext<'a, F: Fn(u64, u64) + Send + Sync> {
    parent: &'a AtomicProgress<F>,
    weight: u64,
    total_weight: u64,
}

impl<'a, F: Fn(u64, u64) + Send + Sync> ProgressContext for ScaledSubContext<'a, F> {
    fn check_interruption(&self) -> CoreResult<()> {
        self.parent.check_interruption()
    }

    fn update_progress(&self, done: u64, total: u64) {
        if total == 0 || self.total_weight == 0 {
            return;
        }
        let local_scaled = (done as u128 * self.weight as u128 / total as u128) as u64;
        self.parent.update_progress(local_scaled, self.total_weight);
    }

    fn sub_context(&self, weight: u64, total_weight: u64) -> Box<dyn ProgressContext + '_> {
        let combined_weight = self.weight * weight;
        let combined_total = self.total_weight * total_weight;
        Box::new(ScaledSubContext {
            parent: self.parent,
            weight: combined_weight,
            total_weight: combined_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn null_progress_never_cancels() {
        let p = NullProgress;
        assert!(p.check_interruption().is_ok());
        p.update_progress(5, 10);
    }

    #[test]
    fn atomic_progress_cancels_after_cancel_call() {
        let p = AtomicProgress::new(|_, _| {});
        assert!(p.check_interruption().is_ok());
        p.cancel();
        assert!(matches!(p.check_interruption(), Err(CoreError::Cancelled)));
    }

    #[test]
    fn sub_context_scales_reported_progress() {
        let log = Mutex::new(Vec::new());
        let p = AtomicProgress::new(|done, total| log.lock().unwrap().push((done, total)));
        let sub = p.sub_context(1, 2);
        sub.update_progress(50, 100);
        let entries = log.lock().unwrap();
        assert_eq!(entries.last().unwrap(), &(0, 2));
    }
}
