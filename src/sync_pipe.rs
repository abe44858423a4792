use std::io::{Read, Result as IOResult, Write};
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, Thread};

use crate::endpoint::PipeEndpoint;
use crate::task::OpId;

/// Wakes a parked thread.
struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

/// Drives `poll` on the calling thread, parking it while the pipe is pending.
///
/// Each call is one operation with its own [`OpId`]. Spurious unparks just
/// poll again; the pipe re-validates its state on every poll.
fn block_on<T>(mut poll: impl FnMut(OpId, &mut Context<'_>) -> Poll<T>) -> T {
    let op = OpId::next();
    let waker = Waker::from(Arc::new(ThreadWaker(thread::current())));
    let mut cx = Context::from_waker(&waker);
    loop {
        if let Poll::Ready(value) = poll(op, &mut cx) {
            return value;
        }
        thread::park();
    }
}

/// Blocking reads.
///
/// # Notes
///
/// - The calling thread is parked until bytes arrive, the peer closes its
///   write direction (`Ok(0)`), or the peer goes away (`BrokenPipe`).
/// - Only one thread may be blocked reading an endpoint at a time.
///
/// # Example
///
/// ```rust
/// use std::io::{Read, Write};
///
/// let (mut a, mut b) = coop_pipe::pipe();
/// a.write_all(b"hello").unwrap();
///
/// let mut buf = [0; 5];
/// b.read_exact(&mut buf).unwrap();
/// assert_eq!(b"hello", &buf);
/// ```
impl Read for &PipeEndpoint {
    fn read(&mut self, buf: &mut [u8]) -> IOResult<usize> {
        let endpoint: &PipeEndpoint = self;
        block_on(|op, cx| endpoint.read_as(op, cx, buf)).map_err(Into::into)
    }
}

impl Read for PipeEndpoint {
    fn read(&mut self, buf: &mut [u8]) -> IOResult<usize> {
        (&*self).read(buf)
    }
}

/// Blocking writes.
///
/// # Notes
///
/// - `write` takes at most `capacity` bytes and parks until they fit in the
///   peer's buffer.
/// - `flush` parks until the peer has read everything written so far. It
///   never returns while nothing reads the other endpoint.
/// - Writes fail with `BrokenPipe` once the peer is dropped or closes reading.
impl Write for &PipeEndpoint {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        let endpoint: &PipeEndpoint = self;
        block_on(|op, cx| endpoint.write_as(op, cx, buf)).map_err(Into::into)
    }

    fn flush(&mut self) -> IOResult<()> {
        let endpoint: &PipeEndpoint = self;
        block_on(|op, cx| endpoint.flush_as(op, cx)).map_err(Into::into)
    }
}

impl Write for PipeEndpoint {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        (&*self).write(buf)
    }

    fn flush(&mut self) -> IOResult<()> {
        (&*self).flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{read_to_string, ErrorKind, Read, Write};
    use std::thread::spawn;

    use crate::{pipe, pipe_with_capacity, CloseDirection, PipeError};

    #[test]
    fn base_read_case() {
        let (mut writer, reader) = pipe();
        writer.write_all("hello ".as_bytes()).unwrap();
        writer.write_all("world".as_bytes()).unwrap();
        writer.close(CloseDirection::WRITE);

        assert_eq!("hello world".to_string(), read_to_string(reader).unwrap());
    }

    #[test]
    fn write_clamped_case() {
        let (mut writer, mut reader) = pipe_with_capacity(4).unwrap();
        assert_eq!(4, writer.write("hello".as_bytes()).unwrap());

        let mut buf = [0; 8];
        assert_eq!(4, reader.read(&mut buf).unwrap());
        assert_eq!(b"hell", &buf[..4]);
    }

    #[test]
    fn thread_case() {
        let (mut writer, reader) = pipe_with_capacity(16).unwrap();
        let payload = "hello".repeat(1000);

        let handle = spawn({
            let payload = payload.clone();
            move || {
                writer.write_all(payload.as_bytes()).unwrap();
                writer.flush().unwrap();
                writer.close(CloseDirection::WRITE);
            }
        });

        assert_eq!(payload, read_to_string(reader).unwrap());
        handle.join().unwrap();
    }

    #[test]
    fn duplex_thread_case() {
        let (mut a, mut b) = pipe_with_capacity(8).unwrap();

        let echo = spawn(move || {
            let mut buf = [0; 3];
            loop {
                let n = b.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                b.write_all(&buf[..n]).unwrap();
            }
        });

        for _ in 0..100 {
            a.write_all(b"echo").unwrap();
            let mut buf = [0; 4];
            a.read_exact(&mut buf).unwrap();
            assert_eq!(b"echo", &buf);
        }
        a.close(CloseDirection::WRITE);
        echo.join().unwrap();
    }

    #[test]
    fn shared_reference_case() {
        let (writer, reader) = pipe();
        (&writer).write_all(b"by ref").unwrap();
        writer.close(CloseDirection::WRITE);

        assert_eq!("by ref".to_string(), read_to_string(&reader).unwrap());
    }

    #[test]
    fn writer_err_case() {
        let (mut writer, reader) = pipe();
        drop(reader);

        let err = writer.write("hello".as_bytes()).unwrap_err();
        assert_eq!(ErrorKind::BrokenPipe, err.kind());
        assert_eq!(Some(PipeError::PeerUnavailable), PipeError::from_io(&err));
    }

    #[test]
    fn reader_err_case() {
        let (writer, mut reader) = pipe();
        drop(writer);

        let err = reader.read(&mut [0; 4]).unwrap_err();
        assert_eq!(ErrorKind::BrokenPipe, err.kind());
    }

    #[test]
    fn blocked_reader_woken_by_drop_case() {
        let (writer, mut reader) = pipe();

        let handle = spawn(move || reader.read(&mut [0; 4]));
        // Give the reader a chance to park before the writer goes away.
        std::thread::sleep(std::time::Duration::from_millis(20));
        drop(writer);

        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(ErrorKind::BrokenPipe, err.kind());
    }

    #[test]
    fn misuse_err_case() {
        let (mut a, _b) = pipe();
        a.close(CloseDirection::READ);

        let err = a.read(&mut [0; 4]).unwrap_err();
        assert_eq!(ErrorKind::Unsupported, err.kind());
    }
}
