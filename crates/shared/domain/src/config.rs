use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Top-level configuration shared by both browsing contexts.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StudioConfigInner {
    pub preview: PreviewConfig,
    pub host: HostConfig,
    pub log: LogConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into each context.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct StudioConfig {
    #[serde(flatten, default)]
    inner: Arc<StudioConfigInner>,
}

impl Deref for StudioConfig {
    type Target = StudioConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for StudioConfig {
    fn deref_mut(&mut self) -> &mut StudioConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Preview frame settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Directory holding `<model>.json` scene manifests.
    pub asset_root: PathBuf,
    pub readiness_interval_ms: u64,
    pub frame_interval_ms: u64,
    pub viewport: Viewport,
    pub camera: CameraConfig,
    pub glass: GlassConfig,
}

/// Render target size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Orthographic camera rig.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Height of the view volume in world units (the narrow axis on portrait screens).
    pub frustum_size: f32,
    pub near: f32,
    pub far: f32,
    pub home_position: [f32; 3],
    pub home_target: [f32; 3],
    /// Skip a camera move when both eye and target are already this close.
    pub move_threshold: f32,
    pub tween_duration_ms: u64,
}

/// Shared translucent material replacing every authored glass material.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlassConfig {
    pub color: String,
    pub opacity: f32,
}

/// Host page settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Origin used when the page URL is given as a bare path.
    pub origin: String,
    /// Path prefix under which model pages live.
    pub page_prefix: String,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub filter: Option<String>,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Durations ---

impl PreviewConfig {
    #[must_use]
    pub const fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    #[must_use]
    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl CameraConfig {
    #[must_use]
    pub const fn tween_duration(&self) -> Duration {
        Duration::from_millis(self.tween_duration_ms)
    }
}

// --- Default ---

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("models"),
            readiness_interval_ms: 500,
            frame_interval_ms: 16,
            viewport: Viewport::default(),
            camera: CameraConfig::default(),
            glass: GlassConfig::default(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            frustum_size: 13.0,
            near: 0.1,
            far: 100.0,
            home_position: [9.0, 3.0, 9.0],
            home_target: [0.0, 1.0, 0.0],
            move_threshold: 0.05,
            tween_duration_ms: 800,
        }
    }
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self { color: "#9E947F".to_owned(), opacity: 0.5 }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { origin: "http://localhost:8080".to_owned(), page_prefix: "/models".to_owned() }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, directory: None, json: false }
    }
}
