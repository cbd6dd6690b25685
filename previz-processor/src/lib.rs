//! # previz-processor
//!
//! The render worker: dials the authoring tool, mirrors its scene
//! content, and serves back rendered preview frames. All protocol
//! machinery lives in `previz-core`; this crate adds configuration,
//! the software engine adapter, and process wiring.

pub mod config;
pub mod engine;

pub use config::ProcessorConfig;
pub use engine::{SoftwareScene, SoftwareSurface};
