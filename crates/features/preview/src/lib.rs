//! # Preview frame
//!
//! The embedded side of the configurator. It announces readiness to the host,
//! loads the requested model, indexes the scene into typed slots and applies
//! option changes to it.
//!
//! ```rust,no_run
//! use haven_bridge::Bridge;
//! use haven_domain::config::PreviewConfig;
//! use haven_kernel::registry::ModelRegistry;
//! use haven_preview::{FrameRecorder, ManifestSource, PreviewController};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let (_host, frame) = Bridge::new().embed("host", "preview")?;
//! let config = PreviewConfig::default();
//! let source = ManifestSource::new(config.asset_root.clone());
//! let controller = PreviewController::new(
//!     frame,
//!     config,
//!     Arc::new(ModelRegistry::builtin()),
//!     source,
//!     FrameRecorder::new(),
//! );
//! let _finished = controller.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod applier;
pub mod asset;
pub mod camera;
pub mod controller;
pub mod error;
pub mod hotspot;
pub mod readiness;
pub mod render;
pub mod scene;
pub mod slots;

pub use applier::{Applied, OptionApplier};
pub use asset::{AssetSource, ManifestSource, MemorySource, NodeSpec, SceneManifest};
pub use camera::{Camera, CameraPose, CameraTween};
pub use controller::{PreviewController, PreviewHandle, PreviewInput, PreviewPhase, PreviewStatus};
pub use error::{PreviewError, PreviewErrorExt};
pub use hotspot::{Hotspot, HotspotLayer};
pub use readiness::ReadinessBeacon;
pub use render::{Frame, FrameRecorder, FrameStats, Renderer};
pub use scene::{Color, Scene};
pub use slots::SceneSlots;
