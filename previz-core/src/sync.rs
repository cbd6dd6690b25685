//! Render-synchronized consumer of the update queue.
//!
//! [`SceneSync::run_tick`] is re-entered once per render tick by the
//! worker's cooperative scheduler. It drains the queue, applies each
//! update in arrival order, and publishes the backend's latest rendered
//! frame to the snapshot store. It never blocks and performs no I/O;
//! the network side only ever reaches it through the queue.

use tracing::warn;

use crate::queue::UpdateDrain;
use crate::scene::SceneModel;
use crate::snapshot::FrameStore;
use crate::surface::{OffscreenSurfaces, SurfaceBackend};
use crate::update::ContentUpdate;

/// Per-tick scene synchronization driver.
pub struct SceneSync<S, B> {
    updates: UpdateDrain,
    scene: S,
    surfaces: OffscreenSurfaces<B>,
    frames: FrameStore,
}

impl<S: SceneModel, B: SurfaceBackend> SceneSync<S, B> {
    /// Assemble the driver from its parts. `frames` is the same store
    /// handle the session answers frame requests from.
    pub fn new(
        updates: UpdateDrain,
        scene: S,
        surfaces: OffscreenSurfaces<B>,
        frames: FrameStore,
    ) -> Self {
        Self {
            updates,
            scene,
            surfaces,
            frames,
        }
    }

    /// Run one tick: apply every pending update in order, then publish
    /// the latest rendered frame (if the backend has one).
    pub fn run_tick(&mut self) {
        for update in self.updates.drain_all() {
            self.apply(update);
        }
        if let Some((width, height, pixels)) = self.surfaces.backend_mut().latest_pixels() {
            self.frames.publish(width, height, pixels);
        }
    }

    fn apply(&mut self, update: ContentUpdate) {
        if let Some(viewport) = update.viewport() {
            if let Some((width, height)) = viewport.size {
                self.surfaces.ensure_size(width, height);
            }
            if let Some(projection) = viewport.projection {
                self.surfaces.backend_mut().set_projection(projection);
            }
            if let Some(view) = viewport.view {
                // The wire carries a view transform; the render path
                // consumes a model transform, which is its inverse.
                match view.try_inverse() {
                    Some(model) => self.surfaces.backend_mut().set_model_transform(model),
                    None => warn!("view matrix is singular, keeping previous transform"),
                }
            }
        }

        self.scene.apply_update(update.document());
        self.scene.reparent_active_scene_to_root();

        let bg = self.scene.background_color();
        self.surfaces.backend_mut().set_clear_color(bg);
    }

    /// The scene model, for host-side inspection.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The surface manager.
    pub fn surfaces(&self) -> &OffscreenSurfaces<B> {
        &self.surfaces
    }
}
