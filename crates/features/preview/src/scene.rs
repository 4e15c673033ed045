//! In-memory scene graph for the loaded asset.
//!
//! Nodes and materials live in flat arenas and refer to each other by index,
//! so a material shared by several meshes is recolored once for all of them.

use crate::error::PreviewError;
use glam::Vec3;
use std::borrow::Cow;
use std::fmt;

/// Index of a node in its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Index of a material in its [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mesh,
    Group,
}

/// An sRGB color stored as `0xRRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Self = Self(0);

    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    ///
    /// # Errors
    /// Returns [`PreviewError::InvalidColor`] for anything else.
    pub fn from_hex(hex: &str) -> Result<Self, PreviewError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(invalid_color(hex));
        }
        u32::from_str_radix(digits, 16).map(Self).map_err(|_| invalid_color(hex))
    }

    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0)
    }
}

fn invalid_color(hex: &str) -> PreviewError {
    PreviewError::InvalidColor { message: Cow::Owned(format!("'{hex}'")), context: None }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    #[must_use]
    pub fn translated(self, offset: Vec3) -> Self {
        Self { min: self.min + offset, max: self.max + offset }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Distance along the ray to the first hit, slab method. A ray starting
    /// inside the box hits at zero.
    #[must_use]
    pub fn ray_hit(&self, origin: Vec3, direction: Vec3) -> Option<f32> {
        let inverse = direction.recip();
        let t0 = (self.min - origin) * inverse;
        let t1 = (self.max - origin) * inverse;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();
        if far < 0.0 || near > far || near.is_nan() || far.is_nan() {
            return None;
        }
        Some(near.max(0.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
}

impl Material {
    #[must_use]
    pub fn opaque(name: impl Into<String>, color: Color) -> Self {
        Self { name: name.into(), color, opacity: 1.0, transparent: false }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub visible: bool,
    pub material: Option<MaterialId>,
    /// Offset from the parent.
    pub translation: Vec3,
    /// Bounds in local space, meshes only.
    pub bounds: Option<Aabb>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Group,
            visible: true,
            material: None,
            translation: Vec3::ZERO,
            bounds: None,
            parent: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn mesh(name: impl Into<String>, material: Option<MaterialId>) -> Self {
        Self { kind: NodeKind::Mesh, material, ..Self::group(name) }
    }

    #[must_use]
    pub const fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub const fn with_bounds(mut self, bounds: Aabb) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub const fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh)
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A loaded asset: node tree plus material table.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Node>,
    materials: Vec<Material>,
}

impl Scene {
    /// A scene holding only a root group.
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        Self { nodes: vec![Node::group(root_name)], materials: Vec::new() }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Attaches `node` under `parent`.
    ///
    /// # Panics
    /// Panics if `parent` belongs to another scene.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    #[must_use]
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    pub fn material_mut(&mut self, id: MaterialId) -> &mut Material {
        &mut self.materials[id.0]
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().enumerate().map(|(index, material)| (MaterialId(index), material))
    }

    /// First node with exactly this name, in traversal order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.traverse().find(|id| self.node(*id).name == name)
    }

    /// Depth-first pre-order walk from the root, like `Object3D.traverse`.
    pub fn traverse(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.node(id).children.iter().rev().copied());
            Some(id)
        })
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id.0].visible = visible;
    }

    /// Whether the node and all its ancestors are visible.
    #[must_use]
    pub fn is_rendered(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    #[must_use]
    pub fn world_translation(&self, id: NodeId) -> Vec3 {
        let mut offset = Vec3::ZERO;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            offset += node.translation;
            current = node.parent;
        }
        offset
    }

    #[must_use]
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb> {
        let bounds = self.node(id).bounds?;
        Some(bounds.translated(self.world_translation(id)))
    }

    /// Rendered meshes with bounds, in world space.
    pub fn rendered_bounds(&self) -> impl Iterator<Item = (NodeId, Aabb)> + '_ {
        self.traverse()
            .filter(|id| self.node(*id).is_mesh() && self.is_rendered(*id))
            .filter_map(|id| self.world_bounds(id).map(|bounds| (id, bounds)))
    }

    /// Number of meshes that would be drawn.
    #[must_use]
    pub fn rendered_meshes(&self) -> usize {
        self.traverse().filter(|id| self.node(*id).is_mesh() && self.is_rendered(*id)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new("root");
        let paint = scene.add_material(Material::opaque("paint", Color::from_rgb(0x2F2F2F)));
        let group = scene.add_child(
            scene.root(),
            Node::group("container_1").with_translation(Vec3::new(1.0, 0.0, 0.0)),
        );
        let mesh = scene.add_child(
            group,
            Node::mesh("wall", Some(paint)).with_bounds(Aabb::new(Vec3::ZERO, Vec3::ONE)),
        );
        (scene, group, mesh)
    }

    #[test]
    fn test_color_hex() {
        let color = Color::from_hex("#763939").expect("valid");
        assert_eq!(color.rgb(), 0x763939);
        assert_eq!(color.to_hex(), "#763939");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_traverse_is_pre_order() {
        let mut scene = Scene::new("root");
        let a = scene.add_child(scene.root(), Node::group("a"));
        scene.add_child(a, Node::group("a1"));
        scene.add_child(scene.root(), Node::group("b"));
        let names: Vec<_> = scene.traverse().map(|id| scene.node(id).name.as_str()).collect();
        assert_eq!(names, ["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_hidden_ancestor_hides_mesh() {
        let (mut scene, group, mesh) = sample();
        assert!(scene.is_rendered(mesh));
        scene.set_visible(group, false);
        assert!(!scene.is_rendered(mesh));
        assert_eq!(scene.rendered_meshes(), 0);
    }

    #[test]
    fn test_world_bounds_follow_parents() {
        let (scene, _, mesh) = sample();
        let bounds = scene.world_bounds(mesh).expect("mesh has bounds");
        assert_eq!(bounds.min, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_hit() {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let hit = bounds.ray_hit(Vec3::new(0.5, 0.5, 5.0), Vec3::NEG_Z).expect("hit");
        assert!((hit - 4.0).abs() < 1e-5);
        assert!(bounds.ray_hit(Vec3::new(3.0, 0.5, 5.0), Vec3::NEG_Z).is_none());
        assert!(bounds.ray_hit(Vec3::new(0.5, 0.5, 5.0), Vec3::Z).is_none());
        assert_eq!(bounds.ray_hit(Vec3::splat(0.5), Vec3::X), Some(0.0));
    }
}
