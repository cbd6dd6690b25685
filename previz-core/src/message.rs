//! Message kinds exchanged with the authoring tool.
//!
//! Messages are ephemeral: each one is constructed by the codec on
//! receive and consumed immediately by the session loop.

use crate::snapshot::FrameSnapshot;
use crate::update::ContentUpdate;

/// Wire id of a content-update message.
pub const MSG_CONTENT_UPDATE: u16 = 0;

/// Wire id of a frame-request message.
pub const MSG_FRAME_REQUEST: u16 = 1;

/// A decoded inbound message.
#[derive(Debug, Clone)]
pub enum Message {
    /// Incremental scene content plus optional viewport directives.
    ContentUpdate(ContentUpdate),

    /// Request for the most recently rendered frame, tagged with the
    /// peer's time since the previous frame in seconds (accepted but
    /// currently unused by the render path).
    FrameRequest { dt: f32 },

    /// Unrecognized message id. Still answered with an ack so the
    /// peer's synchronous exchange does not stall.
    Unknown { id: u16 },
}

/// An outbound reply. Every inbound message produces exactly one.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Single acknowledgement byte (value 0). Sent for content updates
    /// and for unknown ids; the two are wire-identical, so only the
    /// worker's log distinguishes "handled" from "not understood".
    Ack,

    /// Frame header (width, height) followed by the raw RGB pixels.
    Frame(FrameSnapshot),
}
