use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::state::PairState;

#[derive(Clone, Debug, Default)]
pub(crate) struct SharedState(Arc<Mutex<PairState>>);

impl SharedState {
    /// Locks the pair.
    ///
    /// Poisoning is ignored: the only panic raised under this lock is a
    /// protocol violation, which leaves the pair state consistent.
    pub(crate) fn lock(&self) -> MutexGuard<'_, PairState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn same_lock(&self, other: &SharedState) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
