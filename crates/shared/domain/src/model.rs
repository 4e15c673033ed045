use crate::constants::WALLS_PER_CONTAINER;
use crate::ids::{ModelId, OptionCategory, OptionValue};
use crate::selection::Selection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the interchangeable panels authored for a wall slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallVariant {
    None,
    Window,
    Door,
    Balcony,
}

impl WallVariant {
    pub const ALL: [Self; 4] = [Self::None, Self::Window, Self::Door, Self::Balcony];

    /// Node-name suffix used by asset authors (`container_1_wall_4_door`).
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Window => "window",
            Self::Door => "door",
            Self::Balcony => "balcony",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WallVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A wall slot address, both numbers 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallPosition {
    pub container: u32,
    pub wall: u32,
}

impl WallPosition {
    #[must_use]
    pub const fn new(container: u32, wall: u32) -> Self {
        Self { container, wall }
    }

    /// Maps `side-<n>` numbering onto containers of six walls.
    ///
    /// `side-1` is container 1 wall 1, `side-7` container 2 wall 1.
    #[must_use]
    pub const fn from_side_index(index: u32) -> Option<Self> {
        if index == 0 {
            return None;
        }
        Some(Self {
            container: (index - 1) / WALLS_PER_CONTAINER + 1,
            wall: (index - 1) % WALLS_PER_CONTAINER + 1,
        })
    }
}

impl fmt::Display for WallPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container {} wall {}", self.container, self.wall)
    }
}

/// Which scene mutation a category drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OptionBinding {
    SidingColor,
    WoodFinish,
    Wall(WallPosition),
    SolarPanel,
}

/// Camera framing for a category: where the eye sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Viewpoint {
    #[must_use]
    pub const fn new(position: [f32; 3], target: [f32; 3]) -> Self {
        Self { position, target }
    }
}

/// Everything the configurator knows about one category of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: OptionCategory,
    pub label: String,
    pub default: OptionValue,
    pub binding: OptionBinding,
    /// Values offered by the host UI, in display order.
    #[serde(default)]
    pub choices: Vec<OptionValue>,
    #[serde(default)]
    pub viewpoint: Option<Viewpoint>,
    /// World-space position of the designer-mode hotspot.
    #[serde(default)]
    pub anchor: Option<[f32; 3]>,
}

/// A model's option categories, in UI order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelProfile {
    pub id: ModelId,
    pub categories: Vec<CategoryProfile>,
}

impl ModelProfile {
    /// Profile of a model the registry does not know: no categories at all.
    #[must_use]
    pub fn unknown(id: ModelId) -> Self {
        Self { id, categories: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn category(&self, category: &OptionCategory) -> Option<&CategoryProfile> {
        self.categories.iter().find(|profile| profile.category == *category)
    }

    #[must_use]
    pub fn binding(&self, category: &OptionCategory) -> Option<OptionBinding> {
        self.category(category).map(|profile| profile.binding)
    }

    #[must_use]
    pub fn viewpoint(&self, category: &OptionCategory) -> Option<Viewpoint> {
        self.category(category).and_then(|profile| profile.viewpoint)
    }

    /// Default value of every category, in profile order.
    #[must_use]
    pub fn defaults(&self) -> Selection {
        self.categories
            .iter()
            .map(|profile| (profile.category.clone(), profile.default.clone()))
            .collect()
    }

    /// Categories that carry a hotspot anchor.
    pub fn anchors(&self) -> impl Iterator<Item = (&OptionCategory, [f32; 3])> {
        self.categories
            .iter()
            .filter_map(|profile| profile.anchor.map(|anchor| (&profile.category, anchor)))
    }
}
