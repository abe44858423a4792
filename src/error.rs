use std::io::{Error, ErrorKind};

use thiserror::Error;

use crate::close::CloseDirection;

/// Recoverable pipe errors.
///
/// A second reader or writer registering on an endpoint while one is already
/// suspended is not represented here: that is a broken calling convention and
/// panics with a `protocol violation:` message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PipeError {
    /// The caller already closed this direction on its own endpoint.
    #[error("{direction:?} direction already closed on this endpoint")]
    HandleMisuse { direction: CloseDirection },

    /// The peer endpoint is gone, or closed the direction this operation needs.
    #[error("broken pipe: peer endpoint unavailable")]
    PeerUnavailable,

    /// Pipe capacity must be a positive byte count.
    #[error("pipe capacity must be greater than zero")]
    InvalidCapacity,
}

impl PipeError {
    /// Recovers a `PipeError` carried inside an `io::Error` produced by this crate.
    pub fn from_io(err: &Error) -> Option<Self> {
        err.get_ref()?.downcast_ref::<PipeError>().copied()
    }

    pub(crate) fn kind(&self) -> ErrorKind {
        match self {
            PipeError::HandleMisuse { .. } => ErrorKind::Unsupported,
            PipeError::PeerUnavailable => ErrorKind::BrokenPipe,
            PipeError::InvalidCapacity => ErrorKind::InvalidInput,
        }
    }
}

impl From<PipeError> for Error {
    fn from(err: PipeError) -> Self {
        Error::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;

    use super::PipeError;
    use crate::close::CloseDirection;

    #[test]
    fn io_kind_case() {
        let err: std::io::Error = PipeError::PeerUnavailable.into();
        assert_eq!(ErrorKind::BrokenPipe, err.kind());

        let err: std::io::Error = PipeError::HandleMisuse {
            direction: CloseDirection::READ,
        }
        .into();
        assert_eq!(ErrorKind::Unsupported, err.kind());
    }

    #[test]
    fn from_io_case() {
        let err: std::io::Error = PipeError::InvalidCapacity.into();
        assert_eq!(Some(PipeError::InvalidCapacity), PipeError::from_io(&err));

        let foreign = std::io::Error::new(ErrorKind::Other, "not ours");
        assert_eq!(None, PipeError::from_io(&foreign));
    }
}
