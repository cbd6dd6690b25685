//! Content-update payloads and the viewport directives they may carry.
//!
//! A content update is an opaque structured document describing scene
//! additions, changes, and removals. The bridge forwards it verbatim to
//! the scene model; the only keys it interprets itself are the optional
//! viewport block under `extras.view`, which controls the offscreen
//! output surface and the active camera transforms.

use nalgebra::Matrix4;
use serde_json::Value;

/// One decoded content-update document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentUpdate {
    document: Value,
}

impl ContentUpdate {
    /// Wrap a parsed document.
    pub fn new(document: Value) -> Self {
        Self { document }
    }

    /// The full document, exactly as received.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Viewport directives carried by this update, if any.
    ///
    /// Returns `None` when the document has no `extras.view` block;
    /// individual directives inside the block are each optional too.
    pub fn viewport(&self) -> Option<Viewport> {
        let view = self.document.get("extras")?.get("view")?;
        Some(Viewport {
            size: view_size(view),
            projection: matrix_entry(view, "projection_matrix"),
            view: matrix_entry(view, "view_matrix"),
        })
    }
}

/// Output-surface directives extracted from a content update.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Requested output size in pixels.
    pub size: Option<(u16, u16)>,

    /// Projection matrix to install on the active camera.
    pub projection: Option<Matrix4<f32>>,

    /// View matrix. The wire carries a view transform but the render
    /// path consumes a model transform, so the scene-sync task installs
    /// the exact inverse of this matrix.
    pub view: Option<Matrix4<f32>>,
}

fn view_size(view: &Value) -> Option<(u16, u16)> {
    let width = u16::try_from(view.get("width")?.as_u64()?).ok()?;
    let height = u16::try_from(view.get("height")?.as_u64()?).ok()?;
    Some((width, height))
}

/// Parse a 16-element column-major float array into a matrix.
fn matrix_entry(view: &Value, key: &str) -> Option<Matrix4<f32>> {
    let cells = view.get(key)?.as_array()?;
    if cells.len() != 16 {
        return None;
    }
    let mut flat = [0.0f32; 16];
    for (slot, cell) in flat.iter_mut().zip(cells) {
        *slot = cell.as_f64()? as f32;
    }
    Some(Matrix4::from_column_slice(&flat))
}
