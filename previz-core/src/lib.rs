//! # previz-core
//!
//! Bridge protocol library linking an authoring tool to this render
//! worker over a single persistent TCP connection. The peer streams
//! incremental scene updates; the worker mirrors them into its scene
//! model and serves back the most recently rendered frame on request.
//!
//! This crate contains:
//! - **Codec**: [`BridgeCodec`] — wire framing for content updates,
//!   frame requests, and their replies
//! - **Session**: [`BridgeSession`] — half-duplex receive loop, plus
//!   [`connect_with_retry`] for the bounded outbound dial
//! - **Queue**: arrival-ordered handoff of content updates from the
//!   network task to the render tick
//! - **Snapshot**: [`FrameStore`] — tear-free cache of the latest
//!   rendered frame
//! - **Surface**: [`OffscreenSurfaces`] — render-target management that
//!   reallocates only on size changes
//! - **Sync**: [`SceneSync`] — per-tick application of drained updates
//! - **Error**: [`BridgeError`] — typed, `thiserror`-based hierarchy

pub mod codec;
pub mod error;
pub mod message;
pub mod queue;
pub mod scene;
pub mod session;
pub mod snapshot;
pub mod surface;
pub mod sync;
pub mod update;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::{BridgeCodec, MAX_DOCUMENT_SIZE};
pub use error::BridgeError;
pub use message::{MSG_CONTENT_UPDATE, MSG_FRAME_REQUEST, Message, Reply};
pub use queue::{UpdateDrain, UpdateSender, update_channel};
pub use scene::SceneModel;
pub use session::{
    BridgeSession, DEFAULT_CONNECT_ATTEMPTS, DEFAULT_CONNECT_BACKOFF, connect_with_retry,
};
pub use snapshot::{FrameSnapshot, FrameStore};
pub use surface::{OffscreenSurfaces, SurfaceBackend};
pub use sync::SceneSync;
pub use update::{ContentUpdate, Viewport};
