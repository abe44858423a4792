use std::fmt;
use std::task::{Context, Poll};

use tracing::debug;

use crate::buffer::Buffer;
use crate::close::CloseDirection;
use crate::error::PipeError;
use crate::future::{Flush, Transfer};
use crate::state::SharedState;
use crate::task::OpId;

/// One side of a pipe.
///
/// Bytes written to an endpoint land in its peer's inbound buffer; bytes read
/// from an endpoint come out of its own. Both endpoints of a pair share one
/// lock, and every operation takes `&self`, so an endpoint can be driven from
/// several tasks by reference. Only one read and one write (or flush) may be
/// suspended on an endpoint at a time; a second concurrent one panics.
///
/// Suspension is cooperative: the `poll_*` methods register the polling task
/// and return `Poll::Pending`, releasing the lock. The task is woken when the
/// condition it waits on may have changed and re-validates everything when
/// polled again.
///
/// The futures returned by the `*_async` methods each carry their own
/// identity, so polling one with a new waker is fine, and a second future
/// suspending in the same direction panics even inside the same task. The
/// `poll_*` methods share a single identity per direction instead: the most
/// recent waker replaces the previous one, as with any `AsyncRead`.
///
/// # Example
///
/// ```rust
/// use futures::executor::block_on;
///
/// let (a, b) = coop_pipe::pipe();
/// block_on(async {
///     a.write_async(b"ping").await.unwrap();
///
///     let mut buf = [0; 4];
///     assert_eq!(4, b.read_async(&mut buf).await.unwrap());
///     assert_eq!(b"ping", &buf);
/// });
/// ```
pub struct PipeEndpoint {
    state: SharedState,
    side: usize,
    capacity: usize,
}

impl PipeEndpoint {
    pub(crate) fn pair(capacity: usize) -> (PipeEndpoint, PipeEndpoint) {
        let state = SharedState::default();
        debug!(capacity, "pipe created");

        (
            PipeEndpoint {
                state: state.clone(),
                side: 0,
                capacity,
            },
            PipeEndpoint {
                state,
                side: 1,
                capacity,
            },
        )
    }

    /// Maximum number of unread bytes the peer may leave in an inbound buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes waiting to be read from this endpoint.
    pub fn buffered(&self) -> usize {
        let mut state = self.state.lock();
        let (this, _) = state.split(self.side);
        this.inbound.len()
    }

    pub fn is_peer_alive(&self) -> bool {
        let mut state = self.state.lock();
        let (_, peer) = state.split(self.side);
        peer.alive
    }

    /// Directions closed on this endpoint.
    pub fn closed(&self) -> CloseDirection {
        let mut state = self.state.lock();
        let (this, _) = state.split(self.side);
        this.closed
    }

    /// Last close state the peer pushed to this endpoint.
    pub fn peer_closed(&self) -> CloseDirection {
        let mut state = self.state.lock();
        let (this, _) = state.split(self.side);
        this.closed_peer
    }

    /// Returns `true` if both endpoints belong to the same pipe.
    pub fn is_paired_with(&self, other: &PipeEndpoint) -> bool {
        self.state.same_lock(&other.state) && self.side != other.side
    }

    /// Attempts to read into `buf`.
    ///
    /// Buffered bytes are returned without suspending, even if the peer has
    /// been dropped. `Ok(0)` means the peer closed its write direction and
    /// everything it wrote has been read.
    pub fn poll_read(&self, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<Result<usize, PipeError>> {
        self.read_as(OpId::POLL, cx, buf)
    }

    /// Attempts to move up to `max_len` bytes into `dst`.
    pub fn poll_read_buf(
        &self,
        cx: &mut Context<'_>,
        dst: &mut Buffer,
        max_len: usize,
    ) -> Poll<Result<usize, PipeError>> {
        self.read_buf_as(OpId::POLL, cx, dst, max_len)
    }

    pub(crate) fn read_as(
        &self,
        op: OpId,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, PipeError>> {
        let max_len = buf.len();
        self.poll_read_with(op, cx, max_len, |inbound, n| {
            inbound.copy_to(&mut buf[..n]);
        })
    }

    pub(crate) fn read_buf_as(
        &self,
        op: OpId,
        cx: &mut Context<'_>,
        dst: &mut Buffer,
        max_len: usize,
    ) -> Poll<Result<usize, PipeError>> {
        self.poll_read_with(op, cx, max_len, |inbound, n| {
            dst.copy_in(inbound, n);
        })
    }

    fn poll_read_with(
        &self,
        op: OpId,
        cx: &mut Context<'_>,
        max_len: usize,
        copy_out: impl FnOnce(&Buffer, usize),
    ) -> Poll<Result<usize, PipeError>> {
        let mut state = self.state.lock();
        let (this, peer) = state.split(self.side);
        // Every poll re-validates from scratch; a pending result registers again.
        this.pending_reader.cancel(op);

        if this.closed.includes_read() {
            return Poll::Ready(Err(PipeError::HandleMisuse {
                direction: CloseDirection::READ,
            }));
        }

        let available = this.inbound.len();
        if available > 0 && max_len > 0 {
            let n = max_len.min(available);
            copy_out(&this.inbound, n);
            this.inbound.consume(n);
            this.pending_writer.resume();
            return Poll::Ready(Ok(n));
        }

        if !peer.alive && !this.closed_peer.includes_write() {
            return Poll::Ready(Err(PipeError::PeerUnavailable));
        }
        if max_len == 0 || this.closed_peer.includes_write() {
            return Poll::Ready(Ok(0));
        }

        this.pending_reader.register(op, cx.waker(), max_len);
        Poll::Pending
    }

    /// Attempts to write `buf` into the peer's inbound buffer.
    ///
    /// At most [`capacity`](Self::capacity) bytes are taken from `buf`. The
    /// write is applied whole or not at all: if the clamped length does not fit
    /// next to what the peer has not read yet, the task is suspended until the
    /// peer reads.
    pub fn poll_write(&self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, PipeError>> {
        self.write_as(OpId::POLL, cx, buf)
    }

    /// Attempts to copy up to `len` bytes from the front of `src` to the peer.
    ///
    /// `src` is left untouched; callers consume what was written.
    pub fn poll_write_buf(
        &self,
        cx: &mut Context<'_>,
        src: &Buffer,
        len: usize,
    ) -> Poll<Result<usize, PipeError>> {
        self.write_buf_as(OpId::POLL, cx, src, len)
    }

    pub(crate) fn write_as(
        &self,
        op: OpId,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, PipeError>> {
        self.poll_write_with(op, cx, buf.len(), |inbound, n| inbound.append(&buf[..n]))
    }

    pub(crate) fn write_buf_as(
        &self,
        op: OpId,
        cx: &mut Context<'_>,
        src: &Buffer,
        len: usize,
    ) -> Poll<Result<usize, PipeError>> {
        self.poll_write_with(op, cx, len.min(src.len()), |inbound, n| {
            inbound.copy_in(src, n);
        })
    }

    fn poll_write_with(
        &self,
        op: OpId,
        cx: &mut Context<'_>,
        len: usize,
        copy_in: impl FnOnce(&mut Buffer, usize),
    ) -> Poll<Result<usize, PipeError>> {
        let len = len.min(self.capacity);
        let mut state = self.state.lock();
        let (this, peer) = state.split(self.side);
        peer.pending_writer.cancel(op);

        if this.closed.includes_write() {
            return Poll::Ready(Err(PipeError::HandleMisuse {
                direction: CloseDirection::WRITE,
            }));
        }
        if !peer.alive || peer.closed.includes_read() {
            return Poll::Ready(Err(PipeError::PeerUnavailable));
        }
        if len == 0 {
            return Poll::Ready(Ok(0));
        }

        if peer.inbound.len() + len <= self.capacity {
            copy_in(&mut peer.inbound, len);
            peer.pending_reader.resume();
            return Poll::Ready(Ok(len));
        }

        peer.pending_writer.register(op, cx.waker(), len);
        Poll::Pending
    }

    /// Waits until the peer has read everything written to it.
    pub fn poll_flush(&self, cx: &mut Context<'_>) -> Poll<Result<(), PipeError>> {
        self.flush_as(OpId::POLL, cx)
    }

    pub(crate) fn flush_as(&self, op: OpId, cx: &mut Context<'_>) -> Poll<Result<(), PipeError>> {
        let mut state = self.state.lock();
        let (_, peer) = state.split(self.side);
        peer.pending_writer.cancel(op);

        if !peer.alive || peer.closed.includes_read() {
            return Poll::Ready(Err(PipeError::PeerUnavailable));
        }
        if peer.inbound.is_empty() {
            return Poll::Ready(Ok(()));
        }

        let unread = peer.inbound.len();
        peer.pending_writer.register(op, cx.waker(), unread);
        Poll::Pending
    }

    /// Closes `direction` on this endpoint and tells the peer.
    ///
    /// Closing is cumulative and idempotent. Any task suspended on something the
    /// close makes impossible is woken so it can observe the new state: a peer
    /// read waiting for data (on `WRITE`), a peer write waiting for space (on
    /// `READ`), and this endpoint's own suspended operations in that direction.
    pub fn close(&self, direction: CloseDirection) {
        let mut state = self.state.lock();
        let (this, peer) = state.split(self.side);

        this.closed |= direction;
        let closed = this.closed;
        if peer.alive {
            peer.closed_peer = closed;
        }

        if closed.includes_write() {
            peer.pending_reader.resume();
            peer.pending_writer.resume();
        }
        if closed.includes_read() {
            this.pending_writer.resume();
            this.pending_reader.resume();
        }

        debug!(side = self.side, ?direction, ?closed, "pipe endpoint closed");
    }

    /// Returns a future reading into `buf`. See [`poll_read`](Self::poll_read).
    pub fn read_async<'a>(&'a self, buf: &'a mut [u8]) -> Transfer<'a> {
        Transfer::read(self, buf)
    }

    /// Returns a future moving up to `max_len` bytes into `dst`.
    pub fn read_buf_async<'a>(&'a self, dst: &'a mut Buffer, max_len: usize) -> Transfer<'a> {
        Transfer::read_buf(self, dst, max_len)
    }

    /// Returns a future writing `buf`. See [`poll_write`](Self::poll_write).
    pub fn write_async<'a>(&'a self, buf: &'a [u8]) -> Transfer<'a> {
        Transfer::write(self, buf)
    }

    /// Returns a future copying up to `len` bytes of `src` to the peer.
    pub fn write_buf_async<'a>(&'a self, src: &'a Buffer, len: usize) -> Transfer<'a> {
        Transfer::write_buf(self, src, len)
    }

    pub fn flush_async(&self) -> Flush<'_> {
        Flush::new(self)
    }

    pub(crate) fn cancel_read(&self, op: OpId) {
        let mut state = self.state.lock();
        let (this, _) = state.split(self.side);
        this.pending_reader.cancel(op);
    }

    pub(crate) fn cancel_write(&self, op: OpId) {
        let mut state = self.state.lock();
        let (_, peer) = state.split(self.side);
        peer.pending_writer.cancel(op);
    }
}

impl Drop for PipeEndpoint {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        let (this, peer) = state.split(self.side);

        this.alive = false;
        if peer.alive {
            // Only this endpoint writes or flushes into the peer, and that
            // needs a borrow of `self`; anything left here was abandoned.
            if peer.pending_writer.discard() {
                debug!(side = self.side, "discarded abandoned write registration");
            }
            peer.pending_reader.resume();
        }
        this.pending_writer.resume();
        this.pending_reader.resume();
        this.inbound.clear();

        debug!(side = self.side, "pipe endpoint dropped");
    }
}

impl fmt::Debug for PipeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipeEndpoint")
            .field("side", &self.side)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
