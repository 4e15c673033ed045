use haven::Session;
use haven::domain::config::PreviewConfig;
use haven::domain::constants::{SIDING_COLOR, SOLO_HAVEN, WARM_BEIGE};
use haven::host::{History, HostInput, MemoryClipboard};
use haven::kernel::location::Location;
use haven::kernel::registry::ModelRegistry;
use haven::preview::asset::MaterialSpec;
use haven::preview::{FrameRecorder, MemorySource, NodeSpec, PreviewPhase, SceneManifest};
use std::sync::Arc;

fn cabin() -> SceneManifest {
    let mesh = |name: &str, material: &str| NodeSpec {
        bounds: None,
        ..NodeSpec::mesh(name, material, [[0.0; 3]; 2])
    };
    let mut children = vec![
        mesh("metal_siding", "paint"),
        mesh("exterior_metal_trim", "paint"),
        mesh("finish_wood_boards", "paint"),
        NodeSpec::group("solar_panel", vec![mesh("solar_panel_cell", "paint")]),
    ];
    for wall in [1, 4, 6] {
        for variant in ["none", "window", "door", "balcony"] {
            children.push(NodeSpec::group(format!("container_1_wall_{wall}_{variant}"), Vec::new()));
        }
    }
    SceneManifest {
        materials: vec![MaterialSpec {
            name: "paint".into(),
            color: "#FFFFFF".into(),
            opacity: 1.0,
        }],
        root: NodeSpec::group(SOLO_HAVEN, children),
    }
}

#[tokio::test(start_paused = true)]
async fn test_shopper_session_end_to_end() {
    let location = Location::parse("https://shop.example/models/solo-haven").unwrap();
    let session = Session::start(
        PreviewConfig::default(),
        Arc::new(ModelRegistry::builtin()),
        History::new(location),
        MemorySource::new().with(SOLO_HAVEN, cabin()),
        FrameRecorder::new(),
        MemoryClipboard::new(),
    )
    .unwrap();

    let mut preview = session.preview().clone();
    let mut host = session.host().clone();
    let ready = preview.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    assert_eq!(ready.selection, ModelRegistry::builtin().defaults(&SOLO_HAVEN.into()));
    assert!(host.status().initializations >= 1);

    assert!(host.select(SIDING_COLOR, WARM_BEIGE).await);
    preview
        .wait_for(|s| s.selection.get(SIDING_COLOR).is_some_and(|v| v.as_str() == WARM_BEIGE))
        .await
        .unwrap();

    assert!(host.send(HostInput::ToggleDesigner).await);
    preview.wait_for(|s| s.designer).await.unwrap();
    let status = host.wait_for(|s| s.designer).await.unwrap();
    assert!(status.view.fullscreen);

    let closed = session.close().await.unwrap();
    assert_eq!(closed.host.location().query_value(SIDING_COLOR).as_deref(), Some(WARM_BEIGE));
    let scene = closed.preview.scene().unwrap();
    let metal = closed.preview.slots().unwrap().metal_material.unwrap();
    assert_eq!(scene.material(metal).color.to_hex(), "#80652F");
}
