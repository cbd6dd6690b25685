//! Last-rendered-frame cache shared between the render tick and the
//! network task.
//!
//! The render path publishes once per tick; the network task reads once
//! per frame request. One lock covers all three fields, so a reader
//! always sees a complete snapshot, never new dimensions paired with
//! an old pixel buffer. The pixel buffer is a refcounted [`Bytes`]
//! view, so reads clone cheaply and no reference to the buffer ever
//! escapes the lock's scope.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::error;

/// One complete rendered-image record: dimensions plus RGB pixel data,
/// row-major, three bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    width: u16,
    height: u16,
    pixels: Bytes,
}

impl FrameSnapshot {
    /// The byte length a pixel buffer must have for these dimensions.
    pub fn expected_len(width: u16, height: u16) -> usize {
        width as usize * height as usize * 3
    }

    /// 1×1 black frame served until the first real render lands.
    fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: Bytes::from_static(&[0, 0, 0]),
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Raw RGB pixel data.
    pub fn pixels(&self) -> &Bytes {
        &self.pixels
    }
}

/// Shared handle to the live snapshot. Clone freely: all handles point
/// at the same record.
#[derive(Debug, Clone)]
pub struct FrameStore {
    inner: Arc<Mutex<FrameSnapshot>>,
}

impl FrameStore {
    /// Create a store seeded with the 1×1 black placeholder.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FrameSnapshot::placeholder())),
        }
    }

    /// Replace the snapshot with a freshly rendered frame.
    ///
    /// A buffer whose length disagrees with the dimensions is dropped
    /// (with an error log) rather than published, keeping the
    /// `len == width*height*3` invariant observable by every reader.
    pub fn publish(&self, width: u16, height: u16, pixels: Bytes) {
        let expected = FrameSnapshot::expected_len(width, height);
        if pixels.len() != expected {
            error!(
                width,
                height,
                len = pixels.len(),
                expected,
                "dropping frame with mismatched pixel buffer"
            );
            return;
        }
        *self.inner.lock().unwrap() = FrameSnapshot {
            width,
            height,
            pixels,
        };
    }

    /// The most recently published snapshot.
    pub fn latest(&self) -> FrameSnapshot {
        self.inner.lock().unwrap().clone()
    }
}

impl Default for FrameStore {
    fn default() -> Self {
        Self::new()
    }
}
