#![allow(dead_code)]

use haven_bridge::{Bridge, Listener, Port};
use haven_domain::config::PreviewConfig;
use haven_domain::constants::{HOST_WINDOW, PREVIEW_WINDOW};
use haven_domain::{PreviewMessage, WallVariant};
use haven_kernel::registry::ModelRegistry;
use haven_preview::asset::MaterialSpec;
use haven_preview::{
    FrameRecorder, MemorySource, NodeSpec, PreviewController, PreviewError, PreviewHandle,
    Scene, SceneManifest,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub type Controller = PreviewController<MemorySource, FrameRecorder>;

/// A house with every slot the built-in profiles drive. Meshes carry no
/// bounds, so nothing occludes a hotspot.
pub fn container_manifest(root: &str, containers: u32, walls: &[u32]) -> SceneManifest {
    let mut children = vec![
        mesh("metal_siding", "siding_paint"),
        mesh("finish_wood_cladding", "cedar"),
        mesh("exterior_metal_cladding", "trim"),
        NodeSpec::group("solar_panel", vec![mesh("solar_panel_1", "trim")]),
    ];
    for container in 1..=containers {
        for wall in walls {
            for variant in WallVariant::ALL {
                let mut group =
                    NodeSpec::group(format!("container_{container}_wall_{wall}_{variant}"), Vec::new());
                if matches!(variant, WallVariant::Window | WallVariant::Balcony) {
                    group.children.push(mesh(&format!("pane_{container}_{wall}_{variant}"), "window_glass"));
                }
                children.push(group);
            }
        }
    }

    SceneManifest {
        materials: vec![
            material("siding_paint", "#FFFFFF"),
            material("cedar", "#8B5A2B"),
            material("trim", "#222222"),
            MaterialSpec { name: "window_glass".into(), color: "#DDEEFF".into(), opacity: 0.3 },
        ],
        root: NodeSpec::group(root, children),
    }
}

fn mesh(name: &str, material: &str) -> NodeSpec {
    NodeSpec { bounds: None, ..NodeSpec::mesh(name, material, [[0.0; 3]; 2]) }
}

fn material(name: &str, color: &str) -> MaterialSpec {
    MaterialSpec { name: name.into(), color: color.into(), opacity: 1.0 }
}

/// Visibility of every node and color of every material, in scene order.
pub fn snapshot(scene: &Scene) -> (Vec<bool>, Vec<String>) {
    let visible = scene.traverse().map(|id| scene.node(id).visible).collect();
    let colors = scene.materials().map(|(_, material)| material.color.to_hex()).collect();
    (visible, colors)
}

pub fn solo_haven() -> SceneManifest {
    container_manifest("solo-haven", 1, &[1, 4, 6])
}

pub fn duo_oasis() -> SceneManifest {
    container_manifest("duo-oasis", 2, &[4, 6])
}

pub struct Harness {
    pub host: Port,
    pub inbox: Listener<PreviewMessage>,
    pub handle: PreviewHandle,
    pub recorder: FrameRecorder,
    pub task: JoinHandle<Result<Controller, PreviewError>>,
}

impl Harness {
    /// Embeds a preview frame and starts its controller.
    pub fn start(source: MemorySource) -> Self {
        let (host, frame) = Bridge::new().embed(HOST_WINDOW, PREVIEW_WINDOW).unwrap();
        let inbox = host.listen::<PreviewMessage>().unwrap();
        let recorder = FrameRecorder::new();
        let controller = PreviewController::new(
            frame,
            PreviewConfig::default(),
            Arc::new(ModelRegistry::builtin()),
            source,
            recorder.clone(),
        );
        let handle = controller.handle();
        let task = tokio::spawn(controller.run());
        Self { host, inbox, handle, recorder, task }
    }

    /// Closes the frame window and returns the stopped controller.
    pub async fn finish(self) -> Controller {
        self.host.bridge().close(&PREVIEW_WINDOW.into());
        self.task.await.unwrap().unwrap()
    }
}
