//! Crate-wide error type.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the brand kit engine.
///
/// Rendering-precondition failures (a missing font, an unparsable registry
/// glyph) are deliberately *not* represented here: the compositor treats them
/// as a logged no-op, since they indicate an unsupported runtime rather than
/// a user mistake.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote generative service failed (quota, auth, transport).
    #[error("remote service error: {0}")]
    RemoteService(String),

    /// The remote service answered with content that cannot be used
    /// (malformed JSON, markup without an `<svg>` root).
    #[error("invalid response from remote service: {0}")]
    InvalidResponse(String),

    /// User input rejected at the boundary (oversized upload, wrong file
    /// type). No state change has happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Filesystem access failed (store files, exported artifacts).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The persistent key-value store could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    /// A second export was requested while one was still running.
    #[error("an export is already in progress")]
    ExportInFlight,

    /// The requested feature is stubbed out.
    #[error("image editing is not yet supported")]
    Unsupported,
}
