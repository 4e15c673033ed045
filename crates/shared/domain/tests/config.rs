use haven_domain::config::{CameraConfig, PreviewConfig, StudioConfig};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn config_defaults_match_the_scene_rig() {
    let preview = PreviewConfig::default();
    assert_eq!(preview.readiness_interval(), Duration::from_millis(500));
    assert_eq!(preview.asset_root, PathBuf::from("models"));

    let camera = CameraConfig::default();
    assert!((camera.frustum_size - 13.0).abs() < f32::EPSILON);
    assert_eq!(camera.home_position, [9.0, 3.0, 9.0]);
    assert_eq!(camera.home_target, [0.0, 1.0, 0.0]);
    assert_eq!(preview.glass.color, "#9E947F");
}

#[test]
fn studio_config_deserializes_partial_documents() {
    let raw = json!({
        "preview": { "asset_root": "/srv/models", "camera": { "tween_duration_ms": 250 } },
        "log": { "level": "debug", "json": true }
    });

    let cfg: StudioConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.preview.asset_root, PathBuf::from("/srv/models"));
    assert_eq!(cfg.preview.camera.tween_duration(), Duration::from_millis(250));
    assert!((cfg.preview.camera.move_threshold - 0.05).abs() < f32::EPSILON);
    assert_eq!(cfg.preview.readiness_interval_ms, 500);
    assert_eq!(cfg.log.level, "debug");
    assert!(cfg.log.json);
    assert_eq!(cfg.host.origin, "http://localhost:8080");
}

#[test]
fn studio_config_clones_share_until_mutated() {
    let base = StudioConfig::default();
    let mut tweaked = base.clone();
    tweaked.preview.readiness_interval_ms = 100;

    assert_eq!(base.preview.readiness_interval_ms, 500);
    assert_eq!(tweaked.preview.readiness_interval_ms, 100);
}
