//! Software engine adapter.
//!
//! Minimal implementations of the bridge's collaborator traits so the
//! worker runs end to end without a GPU: content documents are merged
//! into named collections, and each tick "renders" a clear pass into a
//! host-memory RGB target. A real engine slots in behind the same two
//! traits.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bytes::Bytes;
use nalgebra::Matrix4;
use serde_json::Value;
use tracing::debug;

use previz_core::{SceneModel, SurfaceBackend};

// ── Scene model ──────────────────────────────────────────────────

/// In-memory mirror of the authoring tool's scene collections.
#[derive(Debug)]
pub struct SoftwareScene {
    collections: BTreeMap<String, Value>,
    background: [f32; 3],
    search_paths: Vec<PathBuf>,
    active_scene_rooted: bool,
}

impl SoftwareScene {
    /// Create an empty scene. `search_paths` are the model directories
    /// the authoring tool wants prepended to asset lookup.
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            collections: BTreeMap::new(),
            background: [0.0, 0.0, 0.0],
            search_paths,
            active_scene_rooted: false,
        }
    }

    /// Named collections currently held.
    pub fn collections(&self) -> &BTreeMap<String, Value> {
        &self.collections
    }

    /// Asset search directories.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Whether the active scene hangs under the render root.
    pub fn is_active_scene_rooted(&self) -> bool {
        self.active_scene_rooted
    }
}

impl SceneModel for SoftwareScene {
    fn apply_update(&mut self, document: &Value) {
        let Some(entries) = document.as_object() else {
            return;
        };
        for (name, entry) in entries {
            // Viewport directives are the bridge's business, not scene
            // content.
            if name == "extras" {
                continue;
            }
            if name == "background_color" {
                if let Some(cells) = entry.as_array() {
                    for (slot, cell) in self.background.iter_mut().zip(cells) {
                        *slot = cell.as_f64().unwrap_or(0.0) as f32;
                    }
                }
                continue;
            }
            if entry.is_null() {
                self.collections.remove(name);
            } else {
                self.collections.insert(name.clone(), entry.clone());
            }
        }
        debug!(collections = self.collections.len(), "scene updated");
    }

    fn background_color(&self) -> [f32; 3] {
        self.background
    }

    fn reparent_active_scene_to_root(&mut self) {
        self.active_scene_rooted = true;
    }
}

// ── Surface backend ──────────────────────────────────────────────

/// Host-memory RGB render target with a clear-pass renderer.
#[derive(Debug)]
pub struct SoftwareSurface {
    width: u16,
    height: u16,
    clear_color: [f32; 3],
    projection: Matrix4<f32>,
    model_transform: Matrix4<f32>,
    target: Option<Vec<u8>>,
}

impl SoftwareSurface {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            clear_color: [0.0; 3],
            projection: Matrix4::identity(),
            model_transform: Matrix4::identity(),
            target: None,
        }
    }

    /// The active projection matrix.
    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection
    }

    /// The active model transform.
    pub fn model_transform(&self) -> &Matrix4<f32> {
        &self.model_transform
    }

    fn clear_rgb(&self) -> [u8; 3] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            channel(self.clear_color[0]),
            channel(self.clear_color[1]),
            channel(self.clear_color[2]),
        ]
    }
}

impl Default for SoftwareSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceBackend for SoftwareSurface {
    fn recreate_target(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.target = Some(vec![0; width as usize * height as usize * 3]);
    }

    fn set_clear_color(&mut self, rgb: [f32; 3]) {
        self.clear_color = rgb;
    }

    fn set_projection(&mut self, matrix: Matrix4<f32>) {
        self.projection = matrix;
    }

    fn set_model_transform(&mut self, matrix: Matrix4<f32>) {
        self.model_transform = matrix;
    }

    fn latest_pixels(&mut self) -> Option<(u16, u16, Bytes)> {
        let rgb = self.clear_rgb();
        let target = self.target.as_mut()?;
        for pixel in target.chunks_exact_mut(3) {
            pixel.copy_from_slice(&rgb);
        }
        Some((self.width, self.height, Bytes::copy_from_slice(target)))
    }
}
