use crate::buffer::Buffer;
use crate::close::CloseDirection;
use crate::task::PendingTask;

#[cfg(not(feature = "fast-mutex"))]
mod std_state;

#[cfg(not(feature = "fast-mutex"))]
pub(crate) use std_state::SharedState;

#[cfg(feature = "fast-mutex")]
mod parking_lot_state;

#[cfg(feature = "fast-mutex")]
pub(crate) use parking_lot_state::SharedState;

/// Per-endpoint state, only touched under the pair lock.
#[derive(Debug)]
pub(crate) struct Side {
    /// Bytes written by the peer, waiting for this endpoint's owner.
    pub(crate) inbound: Buffer,
    pub(crate) closed: CloseDirection,
    /// Last close state pushed by the peer.
    pub(crate) closed_peer: CloseDirection,
    /// This endpoint's own suspended read.
    pub(crate) pending_reader: PendingTask,
    /// The peer's suspended write or flush, waiting for `inbound` to drain.
    pub(crate) pending_writer: PendingTask,
    pub(crate) alive: bool,
}

impl Side {
    fn new() -> Self {
        Self {
            inbound: Buffer::new(),
            closed: CloseDirection::NONE,
            closed_peer: CloseDirection::NONE,
            pending_reader: PendingTask::reader(),
            pending_writer: PendingTask::writer(),
            alive: true,
        }
    }
}

/// Both endpoints of one pipe, indexed by side.
#[derive(Debug)]
pub(crate) struct PairState {
    sides: [Side; 2],
}

impl Default for PairState {
    fn default() -> Self {
        Self {
            sides: [Side::new(), Side::new()],
        }
    }
}

impl PairState {
    /// Splits into `(this side, peer side)` for endpoint `side`.
    pub(crate) fn split(&mut self, side: usize) -> (&mut Side, &mut Side) {
        let [first, second] = &mut self.sides;
        if side == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }
}
