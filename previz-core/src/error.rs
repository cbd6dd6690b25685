//! Domain-specific error types for the preview bridge.
//!
//! Once a session is live almost every failure is fatal: the protocol
//! is a strict request/response stream, so a half-consumed message
//! cannot be resynchronized. The one tolerated condition, an unknown
//! message id, never becomes an error; the session logs it and acks.

use thiserror::Error;

/// The canonical error type for the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The initial connection failed after exhausting the retry budget.
    /// Fatal: the worker exits with a non-zero status.
    #[error("unable to connect to authoring tool after {attempts} attempts")]
    Connect { attempts: u32 },

    /// The TCP/IO layer reported an error mid-session.
    #[error("connection error: {0}")]
    Io(#[from] std::io::Error),

    /// A content-update length field exceeded the document size cap.
    #[error("document too large: {size} bytes (max {max})")]
    DocumentTooLarge { size: usize, max: usize },

    /// A content-update document failed to parse as JSON. Fatal: the
    /// framing length has already been consumed and cannot be
    /// un-consumed, so no mid-stream recovery is possible.
    #[error("malformed scene document: {0}")]
    Payload(#[from] serde_json::Error),

    /// The update queue's receiving half was dropped while the session
    /// was still pushing content updates.
    #[error("update channel closed")]
    ChannelClosed,
}
