mod fixtures;

use fixtures::{Harness, duo_oasis, snapshot, solo_haven};
use haven_domain::config::{CameraConfig, Viewport};
use haven_domain::constants::{
    CHESTNUT_BROWN, DOOR, DUO_OASIS, FULL_SIZE_GLASS, REGULAR_WALL, SIDING_COLOR, SOLAR_OFF,
    SOLAR_PANEL, SOLO_HAVEN, WARM_BEIGE,
};
use haven_domain::{HostMessage, OptionCategory, OptionDelta, PreviewMessage, Selection, SlotKinds};
use haven_kernel::registry::ModelRegistry;
use haven_preview::{Camera, CameraPose, MemorySource, PreviewPhase};
use std::time::Duration;

fn initialize(model: &str, options: Selection) -> HostMessage {
    HostMessage::InitializeModel { model_name: model.into(), options }
}

fn update(category: &str, value: &str) -> HostMessage {
    HostMessage::UpdateOption { option: OptionDelta::new(category, value) }
}

fn defaults(model: &str) -> Selection {
    ModelRegistry::builtin().defaults(&model.into())
}

async fn wait_ready(harness: &mut Harness) {
    let (_, message) = harness.inbox.recv().await.unwrap();
    assert_eq!(message, PreviewMessage::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_solo_haven_defaults_end_to_end() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut harness).await;

    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    let status = harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    assert_eq!(status.model.as_ref().map(|m| m.as_str()), Some(SOLO_HAVEN));
    assert_eq!(status.selection, defaults(SOLO_HAVEN));
    assert_eq!(status.slots, SlotKinds::all());

    let recorder = harness.recorder.clone();
    let controller = harness.finish().await;
    let scene = controller.scene().unwrap();
    let slots = controller.slots().unwrap();

    let siding = slots.metal_material.unwrap();
    assert_eq!(scene.material(siding).color.to_hex(), "#2F2F2F");

    let solar = slots.solar_panel.unwrap();
    assert!(scene.node(solar).visible);

    let visible = |name: &str| scene.node(scene.find(name).unwrap()).visible;
    assert!(visible("container_1_wall_1_balcony"));
    assert!(!visible("container_1_wall_1_none"));
    assert!(visible("container_1_wall_4_none"));
    assert!(visible("container_1_wall_6_window"));
    assert!(!visible("container_1_wall_6_door"));
    assert!(visible("exterior_metal_cladding"));
    assert!(!visible("finish_wood_cladding"));

    assert_eq!(slots.glass_rebound, 6);
    assert!(recorder.stats().forced >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_readiness_repeats_until_initialized() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let beats = harness.inbox.drain();
    assert!(beats.len() >= 2, "expected repeated beats, got {}", beats.len());
    assert!(beats.iter().all(|message| *message == PreviewMessage::Ready));

    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(harness.inbox.drain().is_empty());
    assert_eq!(harness.handle.status().phase, PreviewPhase::Ready);

    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn test_second_initialize_supersedes_slow_load() {
    let source = MemorySource::new()
        .with_delay(DUO_OASIS, duo_oasis(), Duration::from_secs(1))
        .with_delay(SOLO_HAVEN, solo_haven(), Duration::from_millis(10));
    let mut harness = Harness::start(source);
    wait_ready(&mut harness).await;

    harness.host.post(&initialize(DUO_OASIS, defaults(DUO_OASIS))).unwrap();
    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();

    let status = harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    assert_eq!(status.generation, 2);
    assert_eq!(status.model.as_ref().map(|m| m.as_str()), Some(SOLO_HAVEN));

    tokio::time::sleep(Duration::from_secs(3)).await;
    let status = harness.handle.status();
    assert_eq!(status.model.as_ref().map(|m| m.as_str()), Some(SOLO_HAVEN));
    assert_eq!(status.selection, defaults(SOLO_HAVEN));

    let controller = harness.finish().await;
    let scene = controller.scene().unwrap();
    assert_eq!(scene.node(scene.root()).name, SOLO_HAVEN);
}

#[tokio::test(start_paused = true)]
async fn test_update_before_initialize_is_dropped() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut harness).await;

    harness.host.post(&update(SIDING_COLOR, WARM_BEIGE)).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(harness.handle.status().phase, PreviewPhase::Uninitialized);

    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    let status = harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    assert_eq!(status.selection.get(SIDING_COLOR).map(|v| v.as_str()), Some("Space Black"));

    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn test_update_while_loading_lands_after_load() {
    let source = MemorySource::new().with_delay(SOLO_HAVEN, solo_haven(), Duration::from_millis(500));
    let mut harness = Harness::start(source);
    wait_ready(&mut harness).await;

    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    harness.host.post(&update(SOLAR_PANEL, SOLAR_OFF)).unwrap();

    let status = harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    assert_eq!(status.selection.get(SOLAR_PANEL).map(|v| v.as_str()), Some(SOLAR_OFF));

    let controller = harness.finish().await;
    let scene = controller.scene().unwrap();
    let solar = controller.slots().unwrap().solar_panel.unwrap();
    assert!(!scene.node(solar).visible);
}

#[tokio::test(start_paused = true)]
async fn test_wall_update_frames_the_wall_first() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut harness).await;
    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();

    harness.host.post(&update("side-4", DOOR)).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let midway = harness.handle.status();
    assert!(midway.animating);
    assert_eq!(midway.selection.get("side-4").map(|v| v.as_str()), Some(REGULAR_WALL));

    let landed = harness.handle.wait_for(|s| !s.animating).await.unwrap();
    assert_eq!(landed.selection.get("side-4").map(|v| v.as_str()), Some(DOOR));
    let profile = ModelRegistry::builtin().profile(&SOLO_HAVEN.into());
    let viewpoint: CameraPose = profile.viewpoint(&"side-4".into()).unwrap().into();
    assert!(landed.pose.is_near(&viewpoint, 1e-3));

    // no viewpoint: applied at once, camera stays put
    harness.host.post(&update(SIDING_COLOR, CHESTNUT_BROWN)).unwrap();
    let status = harness
        .handle
        .wait_for(|s| s.selection.get(SIDING_COLOR).is_some_and(|v| v.as_str() == CHESTNUT_BROWN))
        .await
        .unwrap();
    assert!(!status.animating);
    assert!(status.pose.is_near(&viewpoint, 1e-3));

    let controller = harness.finish().await;
    let scene = controller.scene().unwrap();
    assert!(scene.node(scene.find("container_1_wall_4_door").unwrap()).visible);
    assert!(!scene.node(scene.find("container_1_wall_4_none").unwrap()).visible);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_category_changes_nothing() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut harness).await;
    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    let before = harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();

    harness.host.post(&update("roof-style", "Flat")).unwrap();
    harness.host.post(&update("side-9", FULL_SIZE_GLASS)).unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;

    let after = harness.handle.status();
    assert_eq!(after.selection, before.selection);
    assert!(!after.animating);
    let touched = harness.finish().await;

    let mut reference = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut reference).await;
    reference.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    reference.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    let untouched = reference.finish().await;

    assert_eq!(snapshot(touched.scene().unwrap()), snapshot(untouched.scene().unwrap()));
}

#[tokio::test(start_paused = true)]
async fn test_hotspot_click_reports_category_and_panel_close_returns_home() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut harness).await;
    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    harness.inbox.drain();

    harness.host.post(&HostMessage::EnterDesignerMode).unwrap();
    harness.handle.wait_for(|s| s.designer).await.unwrap();

    let side: OptionCategory = "side-6".into();
    let profile = ModelRegistry::builtin().profile(&SOLO_HAVEN.into());
    let anchor = profile.category(&side).and_then(|c| c.anchor).unwrap();
    let camera = Camera::new(&CameraConfig::default(), Viewport::default());
    let point = camera.project(anchor.into()).unwrap();
    assert!(harness.handle.click(point.x, point.y).await);

    let (_, message) = harness.inbox.recv().await.unwrap();
    assert_eq!(message, PreviewMessage::PointerSelected { category: side.clone() });

    let framed = harness
        .handle
        .wait_for(|s| s.focused.as_ref() == Some(&side) && !s.animating)
        .await
        .unwrap();
    let viewpoint: CameraPose = profile.viewpoint(&side).unwrap().into();
    assert!(framed.pose.is_near(&viewpoint, 1e-3));

    harness.host.post(&HostMessage::PanelClosed).unwrap();
    let home = camera.home();
    let closed = harness
        .handle
        .wait_for(|s| s.focused.is_none() && !s.animating && s.pose.is_near(&home, 1e-3))
        .await
        .unwrap();
    assert!(closed.designer);

    harness.host.post(&HostMessage::ExitDesignerMode).unwrap();
    harness.handle.wait_for(|s| !s.designer).await.unwrap();
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn test_click_outside_designer_mode_is_ignored() {
    let mut harness = Harness::start(MemorySource::new().with(SOLO_HAVEN, solo_haven()));
    wait_ready(&mut harness).await;
    harness.host.post(&initialize(SOLO_HAVEN, defaults(SOLO_HAVEN))).unwrap();
    harness.handle.wait_for(|s| s.phase == PreviewPhase::Ready).await.unwrap();
    harness.inbox.drain();

    assert!(harness.handle.click(640.0, 360.0).await);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(harness.inbox.drain().is_empty());
    harness.finish().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_load_returns_to_uninitialized() {
    let mut harness = Harness::start(MemorySource::new());
    wait_ready(&mut harness).await;

    harness.host.post(&initialize("ghost-cabin", Selection::new())).unwrap();
    let status = harness
        .handle
        .wait_for(|s| s.generation == 1 && s.phase == PreviewPhase::Uninitialized)
        .await
        .unwrap();
    assert!(status.selection.is_empty());

    let controller = harness.finish().await;
    assert!(controller.scene().is_none());
}
