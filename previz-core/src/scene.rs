//! Scene-model collaborator boundary.

use serde_json::Value;

/// The external scene model the bridge mirrors content into.
///
/// Documents are forwarded verbatim; their semantics belong entirely to
/// the engine behind this trait. Implementations are called from the
/// render tick and must not block; a call that can stall is a defect
/// on the engine side, not something the bridge masks.
pub trait SceneModel {
    /// Apply one content-update document (collection additions,
    /// changes, removals, background color, and anything else the
    /// authoring tool exports).
    fn apply_update(&mut self, document: &Value);

    /// Current background color, read back after each applied update
    /// so it can be propagated to the output region's clear color.
    fn background_color(&self) -> [f32; 3];

    /// Re-attach the active scene under the render root. Called after
    /// every applied update, since an update may have replaced the
    /// active scene node.
    fn reparent_active_scene_to_root(&mut self);
}
