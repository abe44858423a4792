use std::io::Result as IOResult;
use std::task::{Context, Poll};

use crate::close::CloseDirection;
use crate::endpoint::PipeEndpoint;

/// Capability set shared by byte streams.
///
/// Streams that cannot read or write keep the default `supports_*` answers and
/// fail the matching operations.
pub trait Stream {
    fn supports_read(&self) -> bool {
        false
    }

    fn supports_write(&self) -> bool {
        false
    }

    fn poll_read(&self, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<IOResult<usize>>;

    fn poll_write(&self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<IOResult<usize>>;

    fn poll_flush(&self, cx: &mut Context<'_>) -> Poll<IOResult<()>>;

    fn close(&self, direction: CloseDirection) -> IOResult<()>;
}

impl Stream for PipeEndpoint {
    fn supports_read(&self) -> bool {
        true
    }

    fn supports_write(&self) -> bool {
        true
    }

    fn poll_read(&self, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<IOResult<usize>> {
        PipeEndpoint::poll_read(self, cx, buf).map_err(Into::into)
    }

    fn poll_write(&self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<IOResult<usize>> {
        PipeEndpoint::poll_write(self, cx, buf).map_err(Into::into)
    }

    fn poll_flush(&self, cx: &mut Context<'_>) -> Poll<IOResult<()>> {
        PipeEndpoint::poll_flush(self, cx).map_err(Into::into)
    }

    fn close(&self, direction: CloseDirection) -> IOResult<()> {
        PipeEndpoint::close(self, direction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::task::{Context, Poll};

    use futures::task::noop_waker;

    use super::Stream;
    use crate::{pipe, CloseDirection};

    fn exchange(writer: &dyn Stream, reader: &dyn Stream) -> Vec<u8> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        assert!(matches!(writer.poll_write(&mut cx, b"dyn"), Poll::Ready(Ok(3))));
        writer.close(CloseDirection::WRITE).unwrap();

        let mut out = Vec::new();
        let mut buf = [0; 2];
        while let Poll::Ready(Ok(n)) = reader.poll_read(&mut cx, &mut buf) {
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        out
    }

    #[test]
    fn capabilities_case() {
        let (a, b) = pipe();
        assert!(a.supports_read() && a.supports_write());
        assert!(b.supports_read() && b.supports_write());
    }

    #[test]
    fn trait_object_case() {
        let (a, b) = pipe();
        assert_eq!(b"dyn".to_vec(), exchange(&a, &b));
    }

    #[test]
    fn io_error_case() {
        let (a, b) = pipe();
        Stream::close(&b, CloseDirection::READ).unwrap();

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        match Stream::poll_write(&a, &mut cx, b"x") {
            Poll::Ready(Err(e)) => assert_eq!(ErrorKind::BrokenPipe, e.kind()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
