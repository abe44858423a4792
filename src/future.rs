use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::buffer::Buffer;
use crate::endpoint::PipeEndpoint;
use crate::error::PipeError;
use crate::task::OpId;

enum Op<'a> {
    Read(&'a mut [u8]),
    ReadBuf(&'a mut Buffer, usize),
    Write(&'a [u8]),
    WriteBuf(&'a Buffer, usize),
}

/// Future for a single read or write on a [`PipeEndpoint`].
///
/// Resolves to the number of bytes transferred. It may be polled with a
/// different waker each time. Dropping it while suspended withdraws its
/// registration from the endpoint.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Transfer<'a> {
    endpoint: &'a PipeEndpoint,
    op: Op<'a>,
    id: OpId,
    registered: bool,
}

impl<'a> Transfer<'a> {
    fn new(endpoint: &'a PipeEndpoint, op: Op<'a>) -> Self {
        Self {
            endpoint,
            op,
            id: OpId::next(),
            registered: false,
        }
    }

    pub(crate) fn read(endpoint: &'a PipeEndpoint, buf: &'a mut [u8]) -> Self {
        Self::new(endpoint, Op::Read(buf))
    }

    pub(crate) fn read_buf(endpoint: &'a PipeEndpoint, dst: &'a mut Buffer, max_len: usize) -> Self {
        Self::new(endpoint, Op::ReadBuf(dst, max_len))
    }

    pub(crate) fn write(endpoint: &'a PipeEndpoint, buf: &'a [u8]) -> Self {
        Self::new(endpoint, Op::Write(buf))
    }

    pub(crate) fn write_buf(endpoint: &'a PipeEndpoint, src: &'a Buffer, len: usize) -> Self {
        Self::new(endpoint, Op::WriteBuf(src, len))
    }

    fn is_read(&self) -> bool {
        matches!(self.op, Op::Read(_) | Op::ReadBuf(..))
    }
}

impl Future for Transfer<'_> {
    type Output = Result<usize, PipeError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let (endpoint, id) = (this.endpoint, this.id);
        let poll = match &mut this.op {
            Op::Read(buf) => endpoint.read_as(id, cx, buf),
            Op::ReadBuf(dst, max_len) => endpoint.read_buf_as(id, cx, dst, *max_len),
            Op::Write(buf) => endpoint.write_as(id, cx, buf),
            Op::WriteBuf(src, len) => endpoint.write_buf_as(id, cx, src, *len),
        };

        this.registered = poll.is_pending();
        poll
    }
}

impl Drop for Transfer<'_> {
    fn drop(&mut self) {
        if self.registered {
            if self.is_read() {
                self.endpoint.cancel_read(self.id);
            } else {
                self.endpoint.cancel_write(self.id);
            }
        }
    }
}

/// Future for [`PipeEndpoint::flush_async`].
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Flush<'a> {
    endpoint: &'a PipeEndpoint,
    id: OpId,
    registered: bool,
}

impl<'a> Flush<'a> {
    pub(crate) fn new(endpoint: &'a PipeEndpoint) -> Self {
        Self {
            endpoint,
            id: OpId::next(),
            registered: false,
        }
    }
}

impl Future for Flush<'_> {
    type Output = Result<(), PipeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let poll = self.endpoint.flush_as(self.id, cx);
        self.registered = poll.is_pending();
        poll
    }
}

impl Drop for Flush<'_> {
    fn drop(&mut self) {
        if self.registered {
            self.endpoint.cancel_write(self.id);
        }
    }
}
