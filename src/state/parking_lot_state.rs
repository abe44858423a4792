use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use crate::state::PairState;

#[derive(Clone, Debug, Default)]
pub(crate) struct SharedState(Arc<Mutex<PairState>>);

impl SharedState {
    pub(crate) fn lock(&self) -> MutexGuard<'_, PairState> {
        self.0.lock()
    }

    pub(crate) fn same_lock(&self, other: &SharedState) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
