use std::io::Result as IOResult;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_io::{AsyncRead, AsyncWrite};

use crate::close::CloseDirection;
use crate::endpoint::PipeEndpoint;

/// `AsyncRead` for a shared endpoint.
///
/// All readers going through this trait share one registration per endpoint:
/// each poll replaces the stored waker, so only the task that polled last is
/// woken. If the enclosing future is dropped while pending, its waker stays
/// registered until the next wake-up or the next poll through this trait, and
/// a [`PipeEndpoint::read_async`] future suspending before then panics.
impl AsyncRead for &PipeEndpoint {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<IOResult<usize>> {
        let endpoint: &PipeEndpoint = *self;
        PipeEndpoint::poll_read(endpoint, cx, buf).map_err(Into::into)
    }
}

impl AsyncRead for PipeEndpoint {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<IOResult<usize>> {
        PipeEndpoint::poll_read(self.get_mut(), cx, buf).map_err(Into::into)
    }
}

/// `AsyncWrite` for a shared endpoint.
///
/// `poll_close` closes the write direction, so the peer reads end-of-stream
/// once it has drained what was written.
impl AsyncWrite for &PipeEndpoint {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<IOResult<usize>> {
        let endpoint: &PipeEndpoint = *self;
        PipeEndpoint::poll_write(endpoint, cx, buf).map_err(Into::into)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<IOResult<()>> {
        let endpoint: &PipeEndpoint = *self;
        PipeEndpoint::poll_flush(endpoint, cx).map_err(Into::into)
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<IOResult<()>> {
        let endpoint: &PipeEndpoint = *self;
        endpoint.close(CloseDirection::WRITE);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for PipeEndpoint {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<IOResult<usize>> {
        PipeEndpoint::poll_write(self.get_mut(), cx, buf).map_err(Into::into)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<IOResult<()>> {
        PipeEndpoint::poll_flush(self.get_mut(), cx).map_err(Into::into)
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<IOResult<()>> {
        PipeEndpoint::close(self.get_mut(), CloseDirection::WRITE);
        Poll::Ready(Ok(()))
    }
}
