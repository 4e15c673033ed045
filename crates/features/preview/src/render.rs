//! Render targets for the preview frame.
//!
//! Drawing is out of scope for this crate; a [`Renderer`] receives a fully
//! resolved frame (scene, camera, markers) and does whatever it wants with
//! it. [`FrameRecorder`] keeps counters and the last frame's summary.

use crate::camera::{Camera, CameraPose};
use crate::hotspot::Hotspot;
use crate::scene::Scene;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// A frame handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub scene: Option<&'a Scene>,
    pub camera: &'a Camera,
    pub hotspots: &'a [Hotspot],
    /// Forced passes follow a state change; the rest are animation ticks.
    pub forced: bool,
}

pub trait Renderer: Send + 'static {
    fn render(&mut self, frame: Frame<'_>);
}

/// Summary of the most recent frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub forced: u64,
    pub meshes: usize,
    pub visible_hotspots: usize,
    pub pose: Option<CameraPose>,
}

/// Counts frames and remembers the last one; clones share the counters.
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    stats: Arc<Mutex<FrameStats>>,
}

impl FrameRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.stats.lock().clone()
    }
}

impl Renderer for FrameRecorder {
    fn render(&mut self, frame: Frame<'_>) {
        let meshes = frame.scene.map_or(0, Scene::rendered_meshes);
        let visible_hotspots = frame.hotspots.iter().filter(|hotspot| hotspot.is_visible()).count();
        let pose = frame.camera.pose();

        let mut stats = self.stats.lock();
        stats.frames += 1;
        stats.forced += u64::from(frame.forced);
        stats.meshes = meshes;
        stats.visible_hotspots = visible_hotspots;
        stats.pose = Some(pose);
        let frames = stats.frames;
        drop(stats);

        trace!(frames, meshes, visible_hotspots, forced = frame.forced, "Frame rendered");
    }
}
