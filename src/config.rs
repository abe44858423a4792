use crate::endpoint::PipeEndpoint;
use crate::error::PipeError;

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: usize = 65536;

/// Capacity value meaning "use [`DEFAULT_CAPACITY`]".
pub const UNSPECIFIED_CAPACITY: usize = usize::MAX;

/// Configures and creates a pipe.
///
/// # Example
///
/// ```rust
/// use coop_pipe::PipeBuilder;
///
/// let (a, b) = PipeBuilder::new().capacity(1024).build().unwrap();
/// assert_eq!(1024, a.capacity());
/// assert!(a.is_paired_with(&b));
///
/// assert!(PipeBuilder::new().capacity(0).build().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipeBuilder {
    capacity: usize,
}

impl Default for PipeBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl PipeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of unread bytes each endpoint buffers for its peer.
    ///
    /// [`UNSPECIFIED_CAPACITY`] selects [`DEFAULT_CAPACITY`].
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = if capacity == UNSPECIFIED_CAPACITY {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        self
    }

    /// Creates both endpoints, linked and sharing one lock.
    pub fn build(self) -> Result<(PipeEndpoint, PipeEndpoint), PipeError> {
        if self.capacity == 0 {
            return Err(PipeError::InvalidCapacity);
        }
        Ok(PipeEndpoint::pair(self.capacity))
    }
}
