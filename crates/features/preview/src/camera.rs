//! Orthographic camera rig and its animated moves.

use glam::{Mat4, Vec2, Vec3};
use haven_domain::Viewpoint;
use haven_domain::config::{CameraConfig, Viewport};
use std::time::Duration;
use tokio::time::Instant;

/// Where the eye sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    #[must_use]
    pub const fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    #[must_use]
    pub fn lerp(self, to: Self, t: f32) -> Self {
        Self { position: self.position.lerp(to.position, t), target: self.target.lerp(to.target, t) }
    }

    /// Whether both eye and target are within `threshold` of `other`.
    #[must_use]
    pub fn is_near(&self, other: &Self, threshold: f32) -> bool {
        self.position.distance(other.position) <= threshold
            && self.target.distance(other.target) <= threshold
    }
}

impl From<Viewpoint> for CameraPose {
    fn from(viewpoint: Viewpoint) -> Self {
        Self::new(Vec3::from_array(viewpoint.position), Vec3::from_array(viewpoint.target))
    }
}

/// Visible extents of the orthographic volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Frustum {
    /// `size` spans the narrow screen axis: height on landscape screens,
    /// width on portrait ones.
    #[must_use]
    pub fn fit(size: f32, viewport: Viewport) -> Self {
        let aspect = viewport.width as f32 / viewport.height.max(1) as f32;
        let half = size / 2.0;
        if viewport.width < viewport.height {
            Self { left: -half, right: half, top: half / aspect, bottom: -half / aspect }
        } else {
            Self { left: -half * aspect, right: half * aspect, top: half, bottom: -half }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pose: CameraPose,
    home: CameraPose,
    frustum_size: f32,
    near: f32,
    far: f32,
    viewport: Viewport,
    frustum: Frustum,
}

impl Camera {
    #[must_use]
    pub fn new(config: &CameraConfig, viewport: Viewport) -> Self {
        let home = CameraPose::new(
            Vec3::from_array(config.home_position),
            Vec3::from_array(config.home_target),
        );
        Self {
            pose: home,
            home,
            frustum_size: config.frustum_size,
            near: config.near,
            far: config.far,
            viewport,
            frustum: Frustum::fit(config.frustum_size, viewport),
        }
    }

    #[must_use]
    pub const fn pose(&self) -> CameraPose {
        self.pose
    }

    #[must_use]
    pub const fn home(&self) -> CameraPose {
        self.home
    }

    pub const fn set_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Refits the view volume to a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.frustum = Frustum::fit(self.frustum_size, viewport);
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.pose.target - self.pose.position).normalize_or(Vec3::NEG_Z)
    }

    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.pose.position, self.pose.target, Vec3::Y)
    }

    #[must_use]
    pub fn projection(&self) -> Mat4 {
        let Frustum { left, right, top, bottom } = self.frustum;
        Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far)
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Projects a world point to pixels (origin top-left). `None` when the
    /// point falls outside the view volume.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        let inside = ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && (0.0..=1.0).contains(&ndc.z);
        inside.then(|| {
            let size = self.viewport_size();
            Vec2::new((ndc.x + 1.0) * 0.5 * size.x, (1.0 - ndc.y) * 0.5 * size.y)
        })
    }

    /// Ray through a pixel: starts on the near plane, runs along the view
    /// direction.
    #[must_use]
    pub fn ray(&self, screen: Vec2) -> (Vec3, Vec3) {
        let size = self.viewport_size();
        let ndc = Vec3::new(screen.x / size.x * 2.0 - 1.0, 1.0 - screen.y / size.y * 2.0, 0.0);
        let origin = self.view_projection().inverse().project_point3(ndc);
        (origin, self.forward())
    }

    fn viewport_size(&self) -> Vec2 {
        Vec2::new(self.viewport.width.max(1) as f32, self.viewport.height.max(1) as f32)
    }
}

/// An eased move between two poses.
#[derive(Debug, Clone, Copy)]
pub struct CameraTween {
    from: CameraPose,
    to: CameraPose,
    started: Instant,
    duration: Duration,
}

impl CameraTween {
    #[must_use]
    pub const fn new(from: CameraPose, to: CameraPose, started: Instant, duration: Duration) -> Self {
        Self { from, to, started, duration }
    }

    /// Pose at `now`, and whether the move has finished.
    #[must_use]
    pub fn sample(&self, now: Instant) -> (CameraPose, bool) {
        if self.duration.is_zero() {
            return (self.to, true);
        }
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        if t >= 1.0 {
            return (self.to, true);
        }
        (self.from.lerp(self.to, ease_in_out(t)), false)
    }
}

/// Quadratic ease-in-out.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 { 2.0 * t * t } else { 1.0 - (-2.0f32).mul_add(t, 2.0).powi(2) / 2.0 }
}
