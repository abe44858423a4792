use std::collections::VecDeque;
use std::io::{IoSlice, Read, Result as IOResult, Write};

/// Growable FIFO byte buffer.
///
/// Bytes are appended at the back and consumed from the front. Each pipe
/// endpoint owns one of these as its inbound buffer; it is also the source and
/// target type for buffer-to-buffer pipe transfers.
///
/// # Example
///
/// ```rust
/// use coop_pipe::Buffer;
///
/// let mut buf = Buffer::new();
/// buf.append(b"hello world");
/// buf.consume(6);
///
/// let mut out = [0; 5];
/// assert_eq!(5, buf.copy_to(&mut out));
/// assert_eq!(b"world", &out);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Buffer {
    bytes: VecDeque<u8>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: VecDeque::with_capacity(capacity),
        }
    }

    /// Number of readable bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends `src` to the back of the buffer.
    pub fn append(&mut self, src: &[u8]) {
        self.bytes.extend(src);
    }

    /// Discards up to `count` bytes from the front.
    ///
    /// Returns the number of bytes actually discarded.
    pub fn consume(&mut self, count: usize) -> usize {
        let count = count.min(self.bytes.len());
        self.bytes.drain(..count);
        count
    }

    /// Copies bytes from the front into `dest` without consuming them.
    ///
    /// Returns the number of bytes copied, at most `dest.len()`.
    pub fn copy_to(&self, dest: &mut [u8]) -> usize {
        let count = dest.len().min(self.bytes.len());
        let (head, tail) = self.bytes.as_slices();

        let from_head = count.min(head.len());
        dest[..from_head].copy_from_slice(&head[..from_head]);
        let from_tail = count - from_head;
        dest[from_head..count].copy_from_slice(&tail[..from_tail]);

        count
    }

    /// Appends up to `len` bytes from the front of `src`, leaving `src` intact.
    ///
    /// Returns the number of bytes copied.
    pub fn copy_in(&mut self, src: &Buffer, len: usize) -> usize {
        let len = len.min(src.len());
        self.bytes.extend(src.bytes.iter().take(len));
        len
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Returns a contiguous copy of the readable bytes.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.iter().copied().collect()
    }
}

impl From<&[u8]> for Buffer {
    fn from(src: &[u8]) -> Self {
        Self {
            bytes: src.iter().copied().collect(),
        }
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(src: Vec<u8>) -> Self {
        Self { bytes: src.into() }
    }
}

impl Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> IOResult<usize> {
        let n = self.copy_to(buf);
        Ok(self.consume(n))
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> IOResult<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn write_vectored(&mut self, bufs: &[IoSlice<'_>]) -> IOResult<usize> {
        let n = bufs.iter().map(|b| b.len()).sum::<usize>();
        self.bytes.reserve(n);
        self.bytes.extend(bufs.iter().flat_map(|b| b.as_ref()));
        Ok(n)
    }

    fn flush(&mut self) -> IOResult<()> {
        Ok(())
    }
}
