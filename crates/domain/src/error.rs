//! Common error types used across the workspace.
//!
//! Each failure is a typed error converted into [`RegistryError`] via
//! `#[from]`; adapters decide how each variant is surfaced.

/// Top-level error for every registry operation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("decode error")]
    Decode(#[from] DecodeError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Every representable id has already been assigned.
    #[error("device ids exhausted")]
    IdsExhausted,
}

/// A request payload could not be decoded into a device.
///
/// The message is the decoder's own description of the problem and is
/// returned to the client verbatim.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DecodeError {
    message: String,
}

impl DecodeError {
    /// The raw decoder message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// The referenced record does not exist.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record that was looked up.
    pub entity: &'static str,
    /// Identifier as supplied by the caller.
    pub id: String,
}
