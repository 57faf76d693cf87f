//! Failures of deployments and calls.
use alloy_primitives::{Address, Bytes};

/// Reasons a frame of execution can fail.
///
/// Only [`Error::Revert`] carries data back to the caller. The other variants
/// surface to a calling contract as a revert with empty data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The executed program reverted with the given data.
    #[error("execution reverted: {0:?}")]
    Revert(Bytes),
    /// The code being executed is not bound to any installed program.
    #[error("no program installed for code")]
    UnknownCode,
    /// A deployment targeted an account that already has code or a nonce.
    #[error("deployment collides with existing account {0}")]
    Collision(Address),
    /// The frame would exceed the configured call depth.
    #[error("max call depth exceeded")]
    CallDepthExceeded,
}

impl Error {
    /// Returns the revert data a calling contract observes for this error.
    #[must_use]
    pub fn into_revert_data(self) -> Vec<u8> {
        match self {
            Error::Revert(data) => data.into(),
            _ => Vec::new(),
        }
    }
}
