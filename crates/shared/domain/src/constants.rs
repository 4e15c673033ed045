//! String contracts shared by the host page, the preview and asset authors.

// Models
pub const SOLO_HAVEN: &str = "solo-haven";
pub const DUO_OASIS: &str = "duo-oasis";
pub const SKYLINE_LOFT: &str = "skyline-loft";

// Option categories
pub const SIDING_COLOR: &str = "siding-color";
pub const WOOD_FINISH: &str = "wood-finish";
pub const SOLAR_PANEL: &str = "solar-panel";
/// Prefix of the numbered wall categories (`side-1`, `side-12`, ...).
pub const SIDE_PREFIX: &str = "side-";

// Siding colors
pub const SPACE_BLACK: &str = "Space Black";
pub const SLATE_GREY: &str = "Slate Grey";
pub const CHESTNUT_BROWN: &str = "Chestnut Brown";
pub const WARM_BEIGE: &str = "Warm Beige";

// Wood finish
pub const REDWOOD_FINISH: &str = "Redwood siding finish";
pub const METALLIC_FINISH: &str = "Metallic siding finish";

// Wall variants
pub const REGULAR_WALL: &str = "Regular Wall";
pub const WINDOW_GLASS: &str = "Window glass";
pub const DOOR: &str = "Door";
pub const FULL_SIZE_GLASS: &str = "Full size glass";

// Solar
pub const SOLAR_ON: &str = "3x Solar panels";
pub const SOLAR_OFF: &str = "No solar panels";

/// Walls per shipping container; `side-N` numbering runs across containers.
pub const WALLS_PER_CONTAINER: u32 = 6;

// Node naming contract of the asset pipeline
pub const METAL_TOKEN: &str = "metal";
pub const FINISH_WOOD_TOKEN: &str = "finish_wood";
pub const EXTERIOR_METAL_TOKEN: &str = "exterior_metal";
pub const SOLAR_PANEL_TOKEN: &str = "solar_panel";
pub const GLASS_TOKEN: &str = "glass";
pub const CONTAINER_TOKEN: &str = "container_";
pub const WALL_TOKEN: &str = "_wall_";

// Browsing contexts
pub const HOST_WINDOW: &str = "host";
pub const PREVIEW_WINDOW: &str = "preview";
