//! One-pass indexing of a loaded scene into typed slots.
//!
//! The scan is a pre-order traversal:
//! - meshes whose material name contains `glass` are rebound to the shared
//!   glass material;
//! - the first mesh whose name contains `metal` binds the recolorable
//!   material, later matches are ignored;
//! - meshes named `finish_wood` / `exterior_metal` join the finish lists
//!   (`finish_wood` wins when both appear);
//! - groups named `solar_panel` bind the solar group, the outermost one wins;
//! - groups named `container_<N>_wall_<M>_<variant>` fill wall slots, the
//!   first node per variant wins.
//!
//! Binding is first-match: a later duplicate never rebinds a slot, so
//! reordering authored nodes can change which one an option drives.

use crate::scene::{Color, Material, MaterialId, NodeId, NodeKind, Scene};
use haven_domain::config::GlassConfig;
use haven_domain::constants::{
    CONTAINER_TOKEN, EXTERIOR_METAL_TOKEN, FINISH_WOOD_TOKEN, GLASS_TOKEN, METAL_TOKEN,
    SOLAR_PANEL_TOKEN, WALL_TOKEN,
};
use haven_domain::{SlotKinds, WallPosition, WallVariant};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// The four interchangeable panels of one wall; any may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallSlot {
    variants: [Option<NodeId>; 4],
}

impl WallSlot {
    #[must_use]
    pub const fn get(&self, variant: WallVariant) -> Option<NodeId> {
        self.variants[variant.index()]
    }

    /// Present variants with their nodes.
    pub fn iter(&self) -> impl Iterator<Item = (WallVariant, NodeId)> + '_ {
        WallVariant::ALL.into_iter().filter_map(|variant| self.get(variant).map(|id| (variant, id)))
    }

    fn bind(&mut self, variant: WallVariant, node: NodeId) -> bool {
        let slot = &mut self.variants[variant.index()];
        if slot.is_some() {
            return false;
        }
        *slot = Some(node);
        true
    }
}

/// Typed handles into the active scene, rebuilt on every load.
#[derive(Debug, Clone, Default)]
pub struct SceneSlots {
    pub metal_material: Option<MaterialId>,
    pub wood_finish: Vec<NodeId>,
    pub exterior_metal: Vec<NodeId>,
    pub solar_panel: Option<NodeId>,
    pub walls: BTreeMap<WallPosition, WallSlot>,
    pub glass_material: Option<MaterialId>,
    /// Meshes moved onto the glass material.
    pub glass_rebound: usize,
}

impl SceneSlots {
    /// Scans `scene`, rebinding glass materials in place.
    pub fn index(scene: &mut Scene, glass: &GlassConfig) -> Self {
        let mut slots = Self::default();
        let order: Vec<NodeId> = scene.traverse().collect();

        for id in order {
            match scene.node(id).kind {
                NodeKind::Mesh => slots.index_mesh(scene, id, glass),
                NodeKind::Group => slots.index_group(scene, id),
            }
        }

        debug!(
            slots = ?slots.kinds().names(),
            walls = slots.walls.len(),
            wood = slots.wood_finish.len(),
            exterior = slots.exterior_metal.len(),
            glass = slots.glass_rebound,
            "Scene indexed"
        );
        slots
    }

    fn index_mesh(&mut self, scene: &mut Scene, id: NodeId, glass: &GlassConfig) {
        let is_glass = scene
            .node(id)
            .material
            .is_some_and(|material| scene.material(material).name.contains(GLASS_TOKEN));
        if is_glass {
            let shared = self.glass_material(scene, glass);
            scene.node_mut(id).material = Some(shared);
            self.glass_rebound += 1;
        }

        let node = scene.node(id);
        if self.metal_material.is_none() && node.name.contains(METAL_TOKEN) {
            self.metal_material = node.material;
            if node.material.is_none() {
                warn!(node = %node.name, "Metal mesh has no material to recolor");
            }
        }
        if node.name.contains(FINISH_WOOD_TOKEN) {
            self.wood_finish.push(id);
        } else if node.name.contains(EXTERIOR_METAL_TOKEN) {
            self.exterior_metal.push(id);
        }
    }

    fn index_group(&mut self, scene: &Scene, id: NodeId) {
        let name = &scene.node(id).name;
        if name.contains(SOLAR_PANEL_TOKEN) && self.solar_panel.is_none() {
            self.solar_panel = Some(id);
        }
        if let Some((position, variant)) = parse_wall_name(name)
            && !self.walls.entry(position).or_default().bind(variant, id)
        {
            warn!(node = %name, %position, %variant, "Duplicate wall node ignored");
        }
    }

    fn glass_material(&mut self, scene: &mut Scene, glass: &GlassConfig) -> MaterialId {
        *self.glass_material.get_or_insert_with(|| {
            let color = Color::from_hex(&glass.color).unwrap_or_else(|err| {
                warn!(error = %err, "Glass color falls back to black");
                Color::BLACK
            });
            scene.add_material(Material {
                name: "shared_glass".to_owned(),
                color,
                opacity: glass.opacity,
                transparent: true,
            })
        })
    }

    #[must_use]
    pub fn wall(&self, position: WallPosition) -> Option<&WallSlot> {
        self.walls.get(&position)
    }

    /// Slot kinds this scene provides.
    #[must_use]
    pub fn kinds(&self) -> SlotKinds {
        let mut kinds = SlotKinds::empty();
        kinds.set(SlotKinds::METAL_MATERIAL, self.metal_material.is_some());
        kinds.set(SlotKinds::WOOD_FINISH, !self.wood_finish.is_empty());
        kinds.set(SlotKinds::EXTERIOR_METAL, !self.exterior_metal.is_empty());
        kinds.set(SlotKinds::SOLAR_PANEL, self.solar_panel.is_some());
        kinds.set(SlotKinds::WALLS, !self.walls.is_empty());
        kinds.set(SlotKinds::GLASS, self.glass_rebound > 0);
        kinds
    }
}

/// Finds `container_<N>_wall_<M>_<variant>` anywhere in `name`. Both
/// numbers are 1-based; a zero never matches.
///
/// Matching is unanchored and the variant is a prefix match, so
/// `rig/container_2_wall_3_doorframe` still names a door.
#[must_use]
pub fn parse_wall_name(name: &str) -> Option<(WallPosition, WallVariant)> {
    name.match_indices(CONTAINER_TOKEN).find_map(|(start, _)| {
        let rest = &name[start + CONTAINER_TOKEN.len()..];
        let (container, rest) = split_number(rest).filter(|(n, _)| *n >= 1)?;
        let rest = rest.strip_prefix(WALL_TOKEN)?;
        let (wall, rest) = split_number(rest).filter(|(n, _)| *n >= 1)?;
        let rest = rest.strip_prefix('_')?;
        let variant = WallVariant::ALL.into_iter().find(|variant| rest.starts_with(variant.suffix()))?;
        Some((WallPosition::new(container, wall), variant))
    })
}

fn split_number(input: &str) -> Option<(u32, &str)> {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let number = input[..digits].parse().ok()?;
    Some((number, &input[digits..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Node;

    #[test]
    fn test_parse_wall_name() {
        assert_eq!(
            parse_wall_name("container_1_wall_4_door"),
            Some((WallPosition::new(1, 4), WallVariant::Door))
        );
        assert_eq!(
            parse_wall_name("Scene/container_2_wall_6_balcony.001"),
            Some((WallPosition::new(2, 6), WallVariant::Balcony))
        );
        assert_eq!(
            parse_wall_name("container_x_container_1_wall_1_none"),
            Some((WallPosition::new(1, 1), WallVariant::None))
        );
        assert_eq!(parse_wall_name("container_1_wall_4_garage"), None);
        assert_eq!(parse_wall_name("container_1_wall__door"), None);
        assert_eq!(parse_wall_name("container_1"), None);
        assert_eq!(parse_wall_name("container_0_wall_1_door"), None);
        assert_eq!(parse_wall_name("container_1_wall_0_door"), None);
    }

    fn scene() -> Scene {
        let mut scene = Scene::new("root");
        let paint = scene.add_material(Material::opaque("paint", Color::from_rgb(0x111111)));
        let trim = scene.add_material(Material::opaque("trim", Color::from_rgb(0x222222)));
        let glass = scene.add_material(Material::opaque("window_glass", Color::from_rgb(0xFFFFFF)));
        let root = scene.root();

        scene.add_child(root, Node::mesh("metal_frame", Some(paint)));
        scene.add_child(root, Node::mesh("exterior_metal_roof", Some(trim)));
        scene.add_child(root, Node::mesh("finish_wood_deck", Some(trim)));
        scene.add_child(root, Node::mesh("finish_wood_exterior_metal", Some(trim)));
        let solar = scene.add_child(root, Node::group("solar_panel"));
        scene.add_child(solar, Node::group("solar_panel_1"));
        let wall = scene.add_child(root, Node::group("container_1_wall_4_window"));
        scene.add_child(wall, Node::mesh("pane", Some(glass)));
        scene.add_child(root, Node::group("container_1_wall_4_none"));
        scene.add_child(root, Node::group("container_1_wall_4_window"));
        // a mesh with the wall name is not a slot
        scene.add_child(root, Node::mesh("container_1_wall_1_door", Some(paint)));
        scene
    }

    #[test]
    fn test_index_binds_every_slot() {
        let mut scene = scene();
        let slots = SceneSlots::index(&mut scene, &GlassConfig::default());

        let paint = scene.find("metal_frame").and_then(|id| scene.node(id).material);
        assert_eq!(slots.metal_material, paint);
        assert_eq!(slots.wood_finish.len(), 2);
        assert_eq!(slots.exterior_metal.len(), 1);
        assert_eq!(slots.solar_panel, scene.find("solar_panel"));

        let wall = slots.wall(WallPosition::new(1, 4)).expect("wall slot");
        assert_eq!(wall.get(WallVariant::Window), scene.find("container_1_wall_4_window"));
        assert!(wall.get(WallVariant::None).is_some());
        assert!(wall.get(WallVariant::Door).is_none());
        assert!(slots.wall(WallPosition::new(1, 1)).is_none());

        assert_eq!(slots.kinds(), SlotKinds::all());
    }

    #[test]
    fn test_glass_is_rebound_to_one_shared_material() {
        let mut scene = scene();
        let slots = SceneSlots::index(&mut scene, &GlassConfig::default());
        assert_eq!(slots.glass_rebound, 1);

        let pane = scene.find("pane").expect("pane");
        let shared = scene.node(pane).material.expect("material");
        assert_eq!(Some(shared), slots.glass_material);
        let material = scene.material(shared);
        assert_eq!(material.color.to_hex(), "#9E947F");
        assert!((material.opacity - 0.5).abs() < f32::EPSILON);
        assert!(material.transparent);
    }

    #[test]
    fn test_empty_scene_has_no_slots() {
        let mut scene = Scene::new("empty");
        let slots = SceneSlots::index(&mut scene, &GlassConfig::default());
        assert_eq!(slots.kinds(), SlotKinds::empty());
    }
}
