//! Designer-mode hotspots: one clickable marker per category anchor.
//!
//! Each frame the anchors are projected to screen space and tested for
//! occlusion by casting a ray from the eye toward the anchor against the
//! rendered meshes' bounds.

use crate::camera::Camera;
use crate::scene::Scene;
use glam::{Vec2, Vec3};
use haven_domain::{ModelProfile, OptionCategory};

/// Hits closer than this to the anchor count as the anchor's own surface.
const SURFACE_EPSILON: f32 = 0.05;

/// Click radius around a marker, in pixels.
pub const PICK_RADIUS: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub category: OptionCategory,
    pub anchor: Vec3,
    /// Screen position, `None` while off screen.
    pub screen: Option<Vec2>,
    pub occluded: bool,
}

impl Hotspot {
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.screen.is_some() && !self.occluded
    }
}

/// Markers for the active model plus the focused one.
#[derive(Debug, Clone, Default)]
pub struct HotspotLayer {
    hotspots: Vec<Hotspot>,
    focused: Option<OptionCategory>,
    enabled: bool,
}

impl HotspotLayer {
    /// Markers for every anchored category of `profile`, initially hidden.
    #[must_use]
    pub fn for_profile(profile: &ModelProfile) -> Self {
        let hotspots = profile
            .anchors()
            .map(|(category, anchor)| Hotspot {
                category: category.clone(),
                anchor: Vec3::from_array(anchor),
                screen: None,
                occluded: false,
            })
            .collect();
        Self { hotspots, focused: None, enabled: false }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.focused = None;
        }
    }

    #[must_use]
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    #[must_use]
    pub const fn focused(&self) -> Option<&OptionCategory> {
        self.focused.as_ref()
    }

    pub fn focus(&mut self, category: Option<OptionCategory>) {
        self.focused = category;
    }

    /// Reprojects every marker for the current camera.
    pub fn update(&mut self, camera: &Camera, scene: &Scene) {
        if !self.enabled {
            return;
        }
        for hotspot in &mut self.hotspots {
            hotspot.screen = camera.project(hotspot.anchor);
            hotspot.occluded = hotspot.screen.is_some() && is_occluded(camera, scene, hotspot.anchor);
        }
    }

    /// Visible marker nearest to `point` within [`PICK_RADIUS`].
    #[must_use]
    pub fn pick(&self, point: Vec2) -> Option<&OptionCategory> {
        if !self.enabled {
            return None;
        }
        self.hotspots
            .iter()
            .filter(|hotspot| hotspot.is_visible())
            .filter_map(|hotspot| {
                let distance = hotspot.screen?.distance(point);
                (distance <= PICK_RADIUS).then_some((distance, &hotspot.category))
            })
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, category)| category)
    }
}

/// Whether any rendered mesh lies between the eye and `anchor`.
///
/// The orthographic eye ray for an anchor starts on the near plane behind
/// the anchor's screen position and runs along the view direction.
#[must_use]
pub fn is_occluded(camera: &Camera, scene: &Scene, anchor: Vec3) -> bool {
    let direction = camera.forward();
    let eye = camera.pose().position;
    let depth = (anchor - eye).dot(direction);
    let origin = anchor - direction * depth;

    scene.rendered_bounds().any(|(_, bounds)| {
        !bounds.contains(anchor)
            && bounds.ray_hit(origin, direction).is_some_and(|hit| hit < depth - SURFACE_EPSILON)
    })
}
