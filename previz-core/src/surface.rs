//! Offscreen render-target management.
//!
//! Recreating a render target means a full graphics-resource teardown
//! and reallocation, so [`OffscreenSurfaces`] tracks the last requested
//! size and only touches the backend when the size actually changes.
//! On the common path, where the peer repeats the same viewport size
//! every tick, `ensure_size` is a comparison and a return.

use bytes::Bytes;
use nalgebra::Matrix4;
use tracing::info;

/// The render-target collaborator boundary.
///
/// Implementations own the engine-side graphics resources: the
/// offscreen target itself, the camera/output-region attachment, the
/// persistent clear state, and the render-to-memory hookup that makes
/// each tick's image readable from host memory.
pub trait SurfaceBackend {
    /// Tear down the current target (if any) and allocate a new one at
    /// the given size, reattaching the camera/output region with its
    /// clear-color and clear-depth state. Expensive; callers go through
    /// [`OffscreenSurfaces::ensure_size`] to avoid redundant calls.
    fn recreate_target(&mut self, width: u16, height: u16);

    /// Persistent clear color for the attached output region.
    fn set_clear_color(&mut self, rgb: [f32; 3]);

    /// Install the active projection matrix.
    fn set_projection(&mut self, matrix: Matrix4<f32>);

    /// Install the active model transform.
    fn set_model_transform(&mut self, matrix: Matrix4<f32>);

    /// The latest rendered RGB frame copied to host memory, or `None`
    /// when nothing has been rendered into the current target yet.
    fn latest_pixels(&mut self) -> Option<(u16, u16, Bytes)>;
}

/// Owns a backend plus the last requested target size.
#[derive(Debug)]
pub struct OffscreenSurfaces<B> {
    backend: B,
    width: u16,
    height: u16,
    generation: u64,
}

impl<B: SurfaceBackend> OffscreenSurfaces<B> {
    /// Wrap a backend and allocate the initial target.
    pub fn new(mut backend: B, width: u16, height: u16) -> Self {
        backend.recreate_target(width, height);
        Self {
            backend,
            width,
            height,
            generation: 1,
        }
    }

    /// Recreate the target only when the requested size differs from
    /// the current one; otherwise return immediately.
    pub fn ensure_size(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        info!(width, height, "recreating offscreen target");
        self.backend.recreate_target(width, height);
        self.width = width;
        self.height = height;
        self.generation += 1;
    }

    /// Current target size.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Incremented on every reallocation, unchanged by no-op resizes.
    /// Lets callers observe target identity without a backend handle.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Mutable access to the backend for per-tick state updates.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingBackend {
        recreations: Vec<(u16, u16)>,
    }

    impl SurfaceBackend for CountingBackend {
        fn recreate_target(&mut self, width: u16, height: u16) {
            self.recreations.push((width, height));
        }
        fn set_clear_color(&mut self, _rgb: [f32; 3]) {}
        fn set_projection(&mut self, _matrix: Matrix4<f32>) {}
        fn set_model_transform(&mut self, _matrix: Matrix4<f32>) {}
        fn latest_pixels(&mut self) -> Option<(u16, u16, Bytes)> {
            None
        }
    }

    #[test]
    fn construction_allocates_once() {
        let surfaces = OffscreenSurfaces::new(CountingBackend::default(), 1, 1);
        assert_eq!(surfaces.size(), (1, 1));
        assert_eq!(surfaces.generation(), 1);
    }

    #[test]
    fn repeated_size_is_a_no_op() {
        let mut surfaces = OffscreenSurfaces::new(CountingBackend::default(), 800, 600);
        let before = surfaces.generation();

        surfaces.ensure_size(800, 600);
        surfaces.ensure_size(800, 600);

        assert_eq!(surfaces.generation(), before);
        assert_eq!(surfaces.backend_mut().recreations.len(), 1);
    }

    #[test]
    fn size_change_recreates() {
        let mut surfaces = OffscreenSurfaces::new(CountingBackend::default(), 1, 1);
        surfaces.ensure_size(640, 480);

        assert_eq!(surfaces.size(), (640, 480));
        assert_eq!(surfaces.generation(), 2);
        assert_eq!(
            surfaces.backend_mut().recreations,
            vec![(1, 1), (640, 480)]
        );
    }
}
