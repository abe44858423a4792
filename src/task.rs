//! Suspended-task slots.
//!
//! The cooperative scheduler is whatever executor polls the pipe. A task is
//! captured by cloning the [`Waker`] of the context it is polled with, made
//! runnable again with [`Waker::wake`], and yields by returning
//! `Poll::Pending`.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::Waker;

use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Role {
    Reader,
    Writer,
}

/// Identity of one suspendable operation.
///
/// A pending future keeps its id across polls, whatever waker it is polled
/// with; two different operations never share one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpId(u64);

impl OpId {
    /// Shared by every caller of the poll-level API of an endpoint. Such a
    /// caller has no identity of its own, so the most recent waker wins.
    pub(crate) const POLL: OpId = OpId(0);

    pub(crate) fn next() -> OpId {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        OpId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

struct Waiter {
    op: OpId,
    waker: Waker,
}

/// At most one suspended operation waiting on a pipe endpoint.
pub(crate) struct PendingTask {
    role: Role,
    waiter: Option<Waiter>,
}

impl PendingTask {
    pub(crate) fn reader() -> Self {
        Self {
            role: Role::Reader,
            waiter: None,
        }
    }

    pub(crate) fn writer() -> Self {
        Self {
            role: Role::Writer,
            waiter: None,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.waiter.is_some()
    }

    /// Registers operation `op`, to be resumed through `waker`.
    ///
    /// The same operation polled again only swaps in its latest waker.
    /// `len` is the transfer size the operation waits on, for tracing.
    ///
    /// # Panics
    ///
    /// Panics if another operation is already registered, even one polled
    /// with the same waker.
    pub(crate) fn register(&mut self, op: OpId, waker: &Waker, len: usize) {
        match &mut self.waiter {
            Some(current) if current.op == op => {
                if !current.waker.will_wake(waker) {
                    current.waker.clone_from(waker);
                }
            }
            Some(_) => panic!(
                "protocol violation: a second {:?} registered on a pipe endpoint \
                 while one is already pending",
                self.role
            ),
            None => {
                trace!(role = ?self.role, ?op, len, "task suspended on pipe");
                self.waiter = Some(Waiter {
                    op,
                    waker: waker.clone(),
                });
            }
        }
    }

    /// Clears the slot, then makes the task runnable again.
    pub(crate) fn resume(&mut self) {
        if let Some(waiter) = self.waiter.take() {
            trace!(role = ?self.role, op = ?waiter.op, "resuming pipe task");
            waiter.waker.wake();
        }
    }

    /// Drops the registration of `op` without waking it.
    ///
    /// Used when an operation is abandoned while suspended. A slot owned by
    /// another operation is left alone.
    pub(crate) fn cancel(&mut self, op: OpId) {
        if self.waiter.as_ref().is_some_and(|w| w.op == op) {
            self.waiter = None;
        }
    }

    /// Clears the slot without waking. Returns whether a task was registered.
    pub(crate) fn discard(&mut self) -> bool {
        self.waiter.take().is_some()
    }
}

impl fmt::Debug for PendingTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTask")
            .field("role", &self.role)
            .field("op", &self.waiter.as_ref().map(|w| w.op))
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::{Wake, Waker};

    use super::{OpId, PendingTask};

    /// Waker that counts how often it was woken.
    #[derive(Default)]
    pub(crate) struct CountingWaker(AtomicUsize);

    impl CountingWaker {
        pub(crate) fn new() -> (Arc<Self>, Waker) {
            let counter = Arc::new(Self::default());
            let waker = Waker::from(counter.clone());
            (counter, waker)
        }

        pub(crate) fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn register_and_resume_case() {
        let (counter, waker) = CountingWaker::new();
        let mut slot = PendingTask::reader();

        slot.register(OpId::next(), &waker, 4);
        assert!(slot.is_pending());

        slot.resume();
        assert!(!slot.is_pending());
        assert_eq!(1, counter.count());

        // Resuming an empty slot is a no-op.
        slot.resume();
        assert_eq!(1, counter.count());
    }

    #[test]
    fn same_op_reregister_case() {
        let (counter, waker) = CountingWaker::new();
        let mut slot = PendingTask::writer();
        let op = OpId::next();

        slot.register(op, &waker, 4);
        slot.register(op, &waker.clone(), 4);
        slot.resume();

        assert_eq!(1, counter.count());
    }

    #[test]
    fn same_op_new_waker_case() {
        let (stale, first) = CountingWaker::new();
        let (latest, second) = CountingWaker::new();
        let mut slot = PendingTask::reader();
        let op = OpId::next();

        slot.register(op, &first, 4);
        slot.register(op, &second, 4);
        slot.resume();

        assert_eq!(0, stale.count());
        assert_eq!(1, latest.count());
    }

    #[test]
    #[should_panic(expected = "protocol violation")]
    fn second_op_case() {
        let (_first, first) = CountingWaker::new();
        let (_second, second) = CountingWaker::new();
        let mut slot = PendingTask::reader();

        slot.register(OpId::next(), &first, 4);
        slot.register(OpId::next(), &second, 4);
    }

    #[test]
    #[should_panic(expected = "protocol violation")]
    fn second_op_same_waker_case() {
        let (_counter, waker) = CountingWaker::new();
        let mut slot = PendingTask::reader();

        slot.register(OpId::next(), &waker, 4);
        slot.register(OpId::next(), &waker, 4);
    }

    #[test]
    fn cancel_case() {
        let (counter, waker) = CountingWaker::new();
        let mut slot = PendingTask::reader();
        let op = OpId::next();

        slot.register(op, &waker, 4);
        // Another operation on the same task does not own the slot.
        slot.cancel(OpId::next());
        assert!(slot.is_pending());

        slot.cancel(op);
        assert!(!slot.is_pending());
        assert_eq!(0, counter.count());

        slot.register(OpId::POLL, &waker, 4);
        assert!(slot.discard());
        assert!(!slot.discard());
    }
}
