//! Static catalog of configurable models.
//!
//! Each model maps its option categories to a default value, the scene
//! binding the preview applies, and the camera viewpoint and hotspot anchor
//! designer mode uses.

use crate::location::Location;
use fxhash::FxHashMap;
use haven_domain::constants::{
    CHESTNUT_BROWN, DOOR, DUO_OASIS, FULL_SIZE_GLASS, METALLIC_FINISH, REDWOOD_FINISH,
    REGULAR_WALL, SIDING_COLOR, SKYLINE_LOFT, SLATE_GREY, SOLAR_OFF, SOLAR_ON, SOLAR_PANEL,
    SOLO_HAVEN, SPACE_BLACK, WARM_BEIGE, WINDOW_GLASS, WOOD_FINISH,
};
use haven_domain::{
    CategoryProfile, ModelId, ModelProfile, OptionBinding, OptionCategory, OptionValue, Selection,
    Viewpoint, WallPosition,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Outer size of one container module, in meters.
const CONTAINER_LENGTH: f32 = 6.0;
const CONTAINER_DEPTH: f32 = 2.5;
const CONTAINER_HEIGHT: f32 = 2.6;
/// Distance the camera backs away from a framed wall.
const WALL_VIEW_DISTANCE: f32 = 7.0;

/// How a model's containers are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Single,
    /// Second container placed behind the first.
    SideBySide,
    /// Second container stacked on top of the first.
    Stacked,
}

impl Layout {
    /// Offset of a container's floor center.
    fn origin(self, container: u32) -> [f32; 3] {
        let index = container.saturating_sub(1) as f32;
        match self {
            Self::Single | Self::SideBySide => [0.0, 0.0, -index * CONTAINER_DEPTH],
            Self::Stacked => [0.0, index * CONTAINER_HEIGHT, 0.0],
        }
    }

    fn containers(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::SideBySide | Self::Stacked => 2,
        }
    }

    fn roof_height(self) -> f32 {
        CONTAINER_HEIGHT * if self == Self::Stacked { 2.0 } else { 1.0 }
    }
}

/// Anchor on the wall face and its outward normal.
///
/// Walls run clockwise seen from above, starting at the front-left panel:
/// 1 and 2 on the front face, 3 the right end, 4 and 5 on the back face,
/// 6 the left end.
fn wall_frame(layout: Layout, position: WallPosition) -> ([f32; 3], [f32; 3]) {
    let [ox, oy, oz] = layout.origin(position.container);
    let half_length = CONTAINER_LENGTH / 2.0;
    let half_depth = CONTAINER_DEPTH / 2.0;
    let y = oy + CONTAINER_HEIGHT / 2.0;
    let (anchor, normal) = match position.wall {
        1 => ([ox - half_length / 2.0, y, oz + half_depth], [0.0, 0.0, 1.0]),
        2 => ([ox + half_length / 2.0, y, oz + half_depth], [0.0, 0.0, 1.0]),
        3 => ([ox + half_length, y, oz], [1.0, 0.0, 0.0]),
        4 => ([ox + half_length / 2.0, y, oz - half_depth], [0.0, 0.0, -1.0]),
        5 => ([ox - half_length / 2.0, y, oz - half_depth], [0.0, 0.0, -1.0]),
        _ => ([ox - half_length, y, oz], [-1.0, 0.0, 0.0]),
    };
    (anchor, normal)
}

fn wall_viewpoint(anchor: [f32; 3], normal: [f32; 3]) -> Viewpoint {
    let position = [
        normal[0].mul_add(WALL_VIEW_DISTANCE, anchor[0]),
        anchor[1] + 1.5,
        normal[2].mul_add(WALL_VIEW_DISTANCE, anchor[2]),
    ];
    Viewpoint::new(position, anchor)
}

fn values(list: &[&str]) -> Vec<OptionValue> {
    list.iter().copied().map(OptionValue::from).collect()
}

fn siding(layout: Layout) -> CategoryProfile {
    let [_, _, oz] = layout.origin(1);
    CategoryProfile {
        category: SIDING_COLOR.into(),
        label: "Siding color".to_owned(),
        default: SPACE_BLACK.into(),
        binding: OptionBinding::SidingColor,
        choices: values(&[SPACE_BLACK, SLATE_GREY, CHESTNUT_BROWN, WARM_BEIGE]),
        viewpoint: None,
        anchor: Some([CONTAINER_LENGTH / 2.0, CONTAINER_HEIGHT * 0.8, oz + CONTAINER_DEPTH / 2.0]),
    }
}

fn wood_finish() -> CategoryProfile {
    CategoryProfile {
        category: WOOD_FINISH.into(),
        label: "Wood finish".to_owned(),
        default: METALLIC_FINISH.into(),
        binding: OptionBinding::WoodFinish,
        choices: values(&[METALLIC_FINISH, REDWOOD_FINISH]),
        viewpoint: None,
        anchor: Some([0.0, CONTAINER_HEIGHT * 0.25, CONTAINER_DEPTH / 2.0]),
    }
}

fn wall(layout: Layout, side: u32, default: &str) -> Option<CategoryProfile> {
    let category = OptionCategory::side(side);
    let position = category.wall_position()?;
    if position.container > layout.containers() {
        return None;
    }
    let (anchor, normal) = wall_frame(layout, position);
    Some(CategoryProfile {
        category,
        label: format!("Side {side}"),
        default: default.into(),
        binding: OptionBinding::Wall(position),
        choices: values(&[REGULAR_WALL, WINDOW_GLASS, DOOR, FULL_SIZE_GLASS]),
        viewpoint: Some(wall_viewpoint(anchor, normal)),
        anchor: Some(anchor),
    })
}

fn solar(layout: Layout) -> CategoryProfile {
    let roof = layout.roof_height();
    CategoryProfile {
        category: SOLAR_PANEL.into(),
        label: "Solar panels".to_owned(),
        default: SOLAR_ON.into(),
        binding: OptionBinding::SolarPanel,
        choices: values(&[SOLAR_ON, SOLAR_OFF]),
        viewpoint: Some(Viewpoint::new([6.0, roof + 7.0, 6.0], [0.0, roof, 0.0])),
        anchor: Some([0.0, roof + 0.1, 0.0]),
    }
}

fn profile(id: &str, layout: Layout, walls: &[(u32, &str)]) -> ModelProfile {
    let mut categories = vec![siding(layout), wood_finish()];
    categories.extend(walls.iter().filter_map(|(side, default)| wall(layout, *side, default)));
    categories.push(solar(layout));
    ModelProfile { id: id.into(), categories }
}

/// Read-only lookup from model to profile.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    profiles: FxHashMap<ModelId, Arc<ModelProfile>>,
}

impl ModelRegistry {
    /// The shipped catalog: `solo-haven`, `duo-oasis` and `skyline-loft`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_profiles([
            profile(
                SOLO_HAVEN,
                Layout::Single,
                &[(1, FULL_SIZE_GLASS), (4, REGULAR_WALL), (6, WINDOW_GLASS)],
            ),
            profile(
                DUO_OASIS,
                Layout::SideBySide,
                &[(4, REGULAR_WALL), (6, WINDOW_GLASS), (7, WINDOW_GLASS), (12, FULL_SIZE_GLASS)],
            ),
            profile(
                SKYLINE_LOFT,
                Layout::Stacked,
                &[(4, REGULAR_WALL), (6, WINDOW_GLASS), (7, WINDOW_GLASS), (12, FULL_SIZE_GLASS)],
            ),
        ])
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = ModelProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), Arc::new(profile)))
            .collect::<FxHashMap<_, _>>();
        debug!(models = profiles.len(), "Model registry ready");
        Self { profiles }
    }

    /// The model's profile; an unknown model gets an empty one.
    #[must_use]
    pub fn profile(&self, id: &ModelId) -> Arc<ModelProfile> {
        self.profiles.get(id).cloned().unwrap_or_else(|| {
            trace!(model = %id, "Unknown model; using an empty profile");
            Arc::new(ModelProfile::unknown(id.clone()))
        })
    }

    #[must_use]
    pub fn defaults(&self, id: &ModelId) -> Selection {
        self.profiles.get(id).map(|profile| profile.defaults()).unwrap_or_default()
    }

    /// Model ids in a stable order.
    #[must_use]
    pub fn models(&self) -> Vec<ModelId> {
        let mut ids: Vec<_> = self.profiles.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Writes every missing default of the page's model into its query.
    ///
    /// Present keys are never overwritten. Returns whether the query changed.
    pub fn resolve_defaults(&self, location: &mut Location) -> bool {
        let model = location.model_id();
        let mut updated = false;
        for (category, value) in &self.defaults(&model) {
            if !location.has_query_key(category.as_str()) {
                location.set_query_value(category.as_str(), value.as_str());
                updated = true;
            }
        }
        if updated {
            debug!(model = %model, query = location.query(), "Injected default options");
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solo_haven_defaults_in_order() {
        let registry = ModelRegistry::builtin();
        let defaults = registry.defaults(&SOLO_HAVEN.into());
        let pairs: Vec<_> = defaults.iter().map(|(c, v)| (c.as_str(), v.as_str())).collect();
        assert_eq!(
            pairs,
            [
                ("siding-color", "Space Black"),
                ("wood-finish", "Metallic siding finish"),
                ("side-1", "Full size glass"),
                ("side-4", "Regular Wall"),
                ("side-6", "Window glass"),
                ("solar-panel", "3x Solar panels"),
            ]
        );
    }

    #[test]
    fn test_two_container_models_share_defaults() {
        let registry = ModelRegistry::builtin();
        let duo = registry.defaults(&DUO_OASIS.into());
        let loft = registry.defaults(&SKYLINE_LOFT.into());
        assert_eq!(duo, loft);
        assert_eq!(duo.get("side-12").map(OptionValue::as_str), Some("Full size glass"));
        assert_eq!(duo.len(), 7);
    }

    #[test]
    fn test_side_bindings_follow_container_numbering() {
        let registry = ModelRegistry::builtin();
        let duo = registry.profile(&DUO_OASIS.into());
        assert_eq!(
            duo.binding(&"side-7".into()),
            Some(OptionBinding::Wall(WallPosition::new(2, 1)))
        );
        assert_eq!(
            duo.binding(&"side-12".into()),
            Some(OptionBinding::Wall(WallPosition::new(2, 6)))
        );
        assert!(duo.binding(&"side-2".into()).is_none());
    }

    #[test]
    fn test_unknown_model_is_empty() {
        let registry = ModelRegistry::builtin();
        let profile = registry.profile(&"treehouse".into());
        assert!(profile.is_empty());
        assert!(registry.defaults(&"treehouse".into()).is_empty());
    }

    #[test]
    fn test_every_wall_has_viewpoint_and_anchor() {
        let registry = ModelRegistry::builtin();
        for id in registry.models() {
            let profile = registry.profile(&id);
            for category in &profile.categories {
                if let OptionBinding::Wall(_) = category.binding {
                    assert!(category.viewpoint.is_some(), "{id}/{} viewpoint", category.category);
                    assert!(category.anchor.is_some(), "{id}/{} anchor", category.category);
                }
                assert!(category.choices.contains(&category.default));
            }
        }
    }

    #[test]
    fn test_stacked_layout_lifts_second_container() {
        let (lower, _) = wall_frame(Layout::Stacked, WallPosition::new(1, 1));
        let (upper, _) = wall_frame(Layout::Stacked, WallPosition::new(2, 1));
        assert!((upper[1] - lower[1] - CONTAINER_HEIGHT).abs() < 1e-5);
    }
}
