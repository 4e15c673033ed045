//! Asset sources: where a model's scene comes from.
//!
//! The asset format is a JSON scene manifest, `<root>/<model>.json`, holding
//! a material table and a node tree. Node names follow the authoring
//! contract the slot indexer reads (`container_<N>_wall_<M>_<variant>`,
//! `solar_panel`, `finish_wood`, `exterior_metal`, `metal`); material names
//! containing `glass` are replaced by the shared glass material on load.

use crate::error::{PreviewError, PreviewErrorExt};
use crate::scene::{Aabb, Color, Material, MaterialId, Node, NodeId, Scene};
use fxhash::FxHashMap;
use glam::Vec3;
use haven_domain::ModelId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Loads the scene for a model.
pub trait AssetSource: Send + Sync + 'static {
    fn load(&self, model: &ModelId) -> impl Future<Output = Result<Scene, PreviewError>> + Send;
}

/// Serialized scene description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneManifest {
    #[serde(default)]
    pub materials: Vec<MaterialSpec>,
    pub root: NodeSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub color: String,
    #[serde(default = "opaque")]
    pub opacity: f32,
}

const fn opaque() -> f32 {
    1.0
}

const fn shown() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSpecKind {
    Mesh,
    #[default]
    Group,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    #[serde(default)]
    pub kind: NodeSpecKind,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default = "shown")]
    pub visible: bool,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Local bounds as `[min, max]`.
    #[serde(default)]
    pub bounds: Option<[[f32; 3]; 2]>,
    #[serde(default)]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn group(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self { name: name.into(), visible: true, children, ..Self::default() }
    }

    pub fn mesh(name: impl Into<String>, material: &str, bounds: [[f32; 3]; 2]) -> Self {
        Self {
            name: name.into(),
            kind: NodeSpecKind::Mesh,
            material: Some(material.to_owned()),
            visible: true,
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn at(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }
}

impl SceneManifest {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    /// Returns [`PreviewError::Manifest`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, PreviewError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the scene graph.
    ///
    /// # Errors
    /// Returns [`PreviewError::InvalidColor`] if a material color is malformed.
    pub fn to_scene(&self) -> Result<Scene, PreviewError> {
        let mut scene = Scene::new(self.root.name.clone());
        let mut materials: FxHashMap<&str, MaterialId> = FxHashMap::default();
        for spec in &self.materials {
            let color = Color::from_hex(&spec.color).context(format!("material '{}'", spec.name))?;
            let id = scene.add_material(Material {
                name: spec.name.clone(),
                color,
                opacity: spec.opacity,
                transparent: spec.opacity < 1.0,
            });
            materials.insert(spec.name.as_str(), id);
        }

        let root = scene.root();
        *scene.node_mut(root) = build_node(&self.root, &materials);
        let mut pending: Vec<(NodeId, &NodeSpec)> =
            self.root.children.iter().rev().map(|child| (root, child)).collect();
        while let Some((parent, spec)) = pending.pop() {
            let id = scene.add_child(parent, build_node(spec, &materials));
            pending.extend(spec.children.iter().rev().map(|child| (id, child)));
        }
        Ok(scene)
    }
}

fn build_node(spec: &NodeSpec, materials: &FxHashMap<&str, MaterialId>) -> Node {
    let material = spec.material.as_deref().and_then(|name| {
        let found = materials.get(name).copied();
        if found.is_none() {
            warn!(node = %spec.name, material = name, "Node references an unknown material");
        }
        found
    });
    let mut node = match spec.kind {
        NodeSpecKind::Mesh => Node::mesh(spec.name.clone(), None),
        NodeSpecKind::Group => Node::group(spec.name.clone()),
    }
    .with_translation(Vec3::from_array(spec.translation));
    if let Some([min, max]) = spec.bounds {
        node = node.with_bounds(Aabb::new(Vec3::from_array(min), Vec3::from_array(max)));
    }
    node.material = material;
    node.visible = spec.visible;
    node
}

/// Reads `<root>/<model>.json` from disk.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    root: PathBuf,
}

impl ManifestSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the model's manifest. Only bare file names resolve, so a
    /// model id can never reach outside the root.
    ///
    /// # Errors
    /// Returns [`PreviewError::AssetNotFound`] for an empty id or one holding
    /// a path separator or `..`.
    pub fn manifest_path(&self, model: &ModelId) -> Result<PathBuf, PreviewError> {
        let name = model.as_str();
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(PreviewError::AssetNotFound {
                message: Cow::Owned(name.to_owned()),
                context: Some(Cow::Borrowed("model id is not a plain name")),
            });
        }
        Ok(self.root.join(format!("{name}.json")))
    }
}

impl AssetSource for ManifestSource {
    async fn load(&self, model: &ModelId) -> Result<Scene, PreviewError> {
        let path = self.manifest_path(model)?;
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(PreviewError::AssetNotFound {
                    message: Cow::Owned(path.display().to_string()),
                    context: Some(Cow::Owned(format!("model '{model}'"))),
                });
            },
            Err(err) => return Err(err).context(path.display().to_string()),
        };
        let manifest = SceneManifest::from_json(&json).context(path.display().to_string())?;
        debug!(model = %model, path = %path.display(), "Scene manifest read");
        manifest.to_scene()
    }
}

/// Serves manifests from memory, optionally after a delay per model.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    manifests: Arc<FxHashMap<ModelId, (SceneManifest, Option<Duration>)>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(self, model: impl Into<ModelId>, manifest: SceneManifest) -> Self {
        self.insert(model.into(), manifest, None)
    }

    /// Like [`MemorySource::with`], but loading takes `delay`.
    #[must_use]
    pub fn with_delay(
        self,
        model: impl Into<ModelId>,
        manifest: SceneManifest,
        delay: Duration,
    ) -> Self {
        self.insert(model.into(), manifest, Some(delay))
    }

    fn insert(self, model: ModelId, manifest: SceneManifest, delay: Option<Duration>) -> Self {
        let mut manifests = Arc::unwrap_or_clone(self.manifests);
        manifests.insert(model, (manifest, delay));
        Self { manifests: Arc::new(manifests) }
    }
}

impl AssetSource for MemorySource {
    async fn load(&self, model: &ModelId) -> Result<Scene, PreviewError> {
        let Some((manifest, delay)) = self.manifests.get(model) else {
            return Err(PreviewError::AssetNotFound {
                message: Cow::Owned(model.to_string()),
                context: Some(Cow::Borrowed("memory source")),
            });
        };
        if let Some(delay) = delay {
            tokio::time::sleep(*delay).await;
        }
        manifest.to_scene()
    }
}
