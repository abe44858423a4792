//! # Coop Pipe library
//! An in-process, bidirectional byte pipe for cooperatively scheduled tasks.
//!
//! [`pipe`] creates two linked [`PipeEndpoint`]s. Bytes written to one are read
//! from the other, in both directions. Each endpoint buffers at most
//! `capacity` unread bytes for its peer; a write that does not fit suspends the
//! writing task until the peer reads. Either direction can be closed on its own
//! ([`CloseDirection`]), and either endpoint can be dropped first.
//!
//! Suspension never blocks a thread in the async API: pending operations
//! register the polling task's waker and return `Poll::Pending`, so any
//! executor acts as the scheduler. The `sync` feature (default) adds
//! `std::io::Read`/`Write` that park the calling thread instead.
//!
//! Async usage example:
//! ```rust
//! use coop_pipe::{pipe, CloseDirection};
//! use futures::executor::block_on;
//!
//! let (client, server) = pipe();
//! block_on(async {
//!     client.write_async(b"hello").await.unwrap();
//!     client.close(CloseDirection::WRITE);
//!
//!     let mut buf = [0; 8];
//!     assert_eq!(5, server.read_async(&mut buf).await.unwrap());
//!     assert_eq!(0, server.read_async(&mut buf).await.unwrap());
//! });
//! ```
//!
//! Multi thread usage example:
//! ```rust
//! use std::io::{read_to_string, Write};
//! use std::thread::spawn;
//! use coop_pipe::{pipe, CloseDirection};
//!
//! let (mut writer, reader) = pipe();
//! spawn(move || {
//!     writer.write_all("hello".as_bytes()).unwrap();
//!     writer.close(CloseDirection::WRITE);
//! });
//!
//! assert_eq!("hello".to_string(), read_to_string(reader).unwrap());
//! ```

mod buffer;
mod close;
mod config;
mod endpoint;
mod error;
mod future;
mod state;
mod stream;
mod task;

#[cfg(feature = "sync")]
mod sync_pipe;

#[cfg(feature = "async")]
mod async_pipe;

pub use buffer::Buffer;
pub use close::CloseDirection;
pub use config::{PipeBuilder, DEFAULT_CAPACITY, UNSPECIFIED_CAPACITY};
pub use endpoint::PipeEndpoint;
pub use error::PipeError;
pub use future::{Flush, Transfer};
pub use stream::Stream;

/// Creates a pipe with [`DEFAULT_CAPACITY`].
///
/// # Example
///
/// ```rust
/// let (a, b) = coop_pipe::pipe();
/// assert!(a.is_paired_with(&b));
/// assert_eq!(coop_pipe::DEFAULT_CAPACITY, a.capacity());
/// ```
pub fn pipe() -> (PipeEndpoint, PipeEndpoint) {
    PipeEndpoint::pair(DEFAULT_CAPACITY)
}

/// Creates a pipe whose endpoints each buffer up to `capacity` unread bytes.
///
/// [`UNSPECIFIED_CAPACITY`] selects [`DEFAULT_CAPACITY`]. Fails with
/// [`PipeError::InvalidCapacity`] for `0`.
pub fn pipe_with_capacity(capacity: usize) -> Result<(PipeEndpoint, PipeEndpoint), PipeError> {
    PipeBuilder::new().capacity(capacity).build()
}
