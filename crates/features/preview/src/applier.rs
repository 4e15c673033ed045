//! Option application: one `(category, value)` pair in, scene mutations out.
//!
//! Dispatch is table driven. The active model's profile maps a category to
//! an [`OptionBinding`]; each binding kind has one handler. Every handler
//! sets absolute state (a color, a visibility), so applying a value twice
//! leaves the scene exactly as applying it once.

use crate::scene::{Color, NodeId, Scene};
use crate::slots::SceneSlots;
use haven_domain::constants::{
    CHESTNUT_BROWN, DOOR, FULL_SIZE_GLASS, METALLIC_FINISH, REDWOOD_FINISH, REGULAR_WALL,
    SLATE_GREY, SOLAR_ON, SPACE_BLACK, WARM_BEIGE, WINDOW_GLASS,
};
use haven_domain::{
    ModelProfile, OptionBinding, OptionCategory, OptionValue, Selection, SlotKinds, WallPosition,
    WallVariant,
};
use tracing::{trace, warn};

/// Siding color names and their paint.
pub const SIDING_PALETTE: [(&str, Color); 4] = [
    (SPACE_BLACK, Color::from_rgb(0x2F2F2F)),
    (SLATE_GREY, Color::from_rgb(0x3E4E59)),
    (CHESTNUT_BROWN, Color::from_rgb(0x763939)),
    (WARM_BEIGE, Color::from_rgb(0x80652F)),
];

/// Wall option labels and the panel each one shows.
pub const WALL_OPTIONS: [(&str, WallVariant); 4] = [
    (REGULAR_WALL, WallVariant::None),
    (WINDOW_GLASS, WallVariant::Window),
    (DOOR, WallVariant::Door),
    (FULL_SIZE_GLASS, WallVariant::Balcony),
];

#[must_use]
pub fn siding_color(value: &str) -> Option<Color> {
    SIDING_PALETTE.iter().find(|(name, _)| *name == value).map(|(_, color)| *color)
}

#[must_use]
pub fn wall_variant(value: &str) -> Option<WallVariant> {
    WALL_OPTIONS.iter().find(|(label, _)| *label == value).map(|(_, variant)| *variant)
}

/// What applying one option did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The scene now reflects the value.
    Updated,
    /// The category is not part of the active model.
    UnknownCategory,
    /// The value is not one the category understands.
    UnrecognizedValue,
    /// The asset lacks the slot this category drives.
    MissingSlot(SlotKinds),
}

impl Applied {
    #[must_use]
    pub const fn is_updated(self) -> bool {
        matches!(self, Self::Updated)
    }
}

type Handler = fn(&mut Scene, &SceneSlots, OptionBinding, &OptionValue) -> Applied;

fn handler(binding: OptionBinding) -> Handler {
    match binding {
        OptionBinding::SidingColor => apply_siding_color,
        OptionBinding::WoodFinish => apply_wood_finish,
        OptionBinding::Wall(_) => apply_wall,
        OptionBinding::SolarPanel => apply_solar_panel,
    }
}

/// Applies options for one model against its indexed scene.
#[derive(Debug, Clone, Copy)]
pub struct OptionApplier<'a> {
    profile: &'a ModelProfile,
}

impl<'a> OptionApplier<'a> {
    #[must_use]
    pub const fn new(profile: &'a ModelProfile) -> Self {
        Self { profile }
    }

    /// Applies one option, warning on anything it cannot honor.
    pub fn apply(
        &self,
        scene: &mut Scene,
        slots: &SceneSlots,
        category: &OptionCategory,
        value: &OptionValue,
    ) -> Applied {
        let outcome = match self.profile.binding(category) {
            Some(binding) => handler(binding)(scene, slots, binding, value),
            None => Applied::UnknownCategory,
        };

        match outcome {
            Applied::Updated => trace!(model = %self.profile.id, %category, %value, "Option applied"),
            Applied::UnknownCategory => {
                warn!(model = %self.profile.id, %category, %value, "Unhandled option category");
            },
            Applied::UnrecognizedValue => {
                warn!(model = %self.profile.id, %category, %value, "Unhandled option value");
            },
            Applied::MissingSlot(kinds) => warn!(
                model = %self.profile.id,
                %category,
                %value,
                missing = ?kinds.names(),
                "Asset has no slot for option"
            ),
        }
        outcome
    }

    /// Applies every entry in order; returns the entries that took effect.
    pub fn apply_all<'s>(
        &self,
        scene: &mut Scene,
        slots: &SceneSlots,
        options: impl IntoIterator<Item = (&'s OptionCategory, &'s OptionValue)>,
    ) -> Selection {
        options
            .into_iter()
            .filter(|(category, value)| self.apply(scene, slots, category, value).is_updated())
            .map(|(category, value)| (category.clone(), value.clone()))
            .collect()
    }
}

fn apply_siding_color(
    scene: &mut Scene,
    slots: &SceneSlots,
    _: OptionBinding,
    value: &OptionValue,
) -> Applied {
    let Some(color) = siding_color(value.as_str()) else {
        return Applied::UnrecognizedValue;
    };
    let Some(material) = slots.metal_material else {
        return Applied::MissingSlot(SlotKinds::METAL_MATERIAL);
    };
    scene.material_mut(material).color = color;
    Applied::Updated
}

fn apply_wood_finish(
    scene: &mut Scene,
    slots: &SceneSlots,
    _: OptionBinding,
    value: &OptionValue,
) -> Applied {
    let wood = match value.as_str() {
        REDWOOD_FINISH => true,
        METALLIC_FINISH => false,
        _ => return Applied::UnrecognizedValue,
    };
    if slots.wood_finish.is_empty() && slots.exterior_metal.is_empty() {
        return Applied::MissingSlot(SlotKinds::FINISHES);
    }
    set_all(scene, &slots.wood_finish, wood);
    set_all(scene, &slots.exterior_metal, !wood);
    Applied::Updated
}

fn apply_wall(
    scene: &mut Scene,
    slots: &SceneSlots,
    binding: OptionBinding,
    value: &OptionValue,
) -> Applied {
    let OptionBinding::Wall(position) = binding else {
        return Applied::UnknownCategory;
    };
    let Some(shown) = wall_variant(value.as_str()) else {
        return Applied::UnrecognizedValue;
    };
    show_wall_variant(scene, slots, position, shown)
}

/// Makes `shown` the only visible panel of the wall at `position`.
pub fn show_wall_variant(
    scene: &mut Scene,
    slots: &SceneSlots,
    position: WallPosition,
    shown: WallVariant,
) -> Applied {
    let Some(wall) = slots.wall(position) else {
        return Applied::MissingSlot(SlotKinds::WALLS);
    };
    for (variant, node) in wall.iter() {
        scene.set_visible(node, variant == shown);
    }
    Applied::Updated
}

fn apply_solar_panel(
    scene: &mut Scene,
    slots: &SceneSlots,
    _: OptionBinding,
    value: &OptionValue,
) -> Applied {
    let Some(group) = slots.solar_panel else {
        return Applied::MissingSlot(SlotKinds::SOLAR_PANEL);
    };
    scene.set_visible(group, value.as_str() == SOLAR_ON);
    Applied::Updated
}

fn set_all(scene: &mut Scene, nodes: &[NodeId], visible: bool) {
    for node in nodes {
        scene.set_visible(*node, visible);
    }
}
