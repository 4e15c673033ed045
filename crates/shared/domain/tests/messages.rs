use haven_domain::{HostMessage, OptionDelta, PreviewMessage, Selection};
use serde_json::json;

#[test]
fn initialize_model_uses_page_field_names() {
    let options: Selection =
        [("siding-color", "Space Black"), ("solar-panel", "3x Solar panels")].into_iter().collect();
    let message = HostMessage::InitializeModel { model_name: "solo-haven".into(), options };

    let value = serde_json::to_value(&message).expect("serialize");
    assert_eq!(
        value,
        json!({
            "type": "initializeModel",
            "modelName": "solo-haven",
            "options": { "siding-color": "Space Black", "solar-panel": "3x Solar panels" }
        })
    );
}

#[test]
fn update_option_nests_category_under_type() {
    let message = HostMessage::UpdateOption { option: OptionDelta::new("side-4", "Door") };
    let value = serde_json::to_value(&message).expect("serialize");
    assert_eq!(value, json!({ "type": "updateOption", "option": { "type": "side-4", "value": "Door" } }));
}

#[test]
fn unit_messages_are_bare_type_objects() {
    for (message, kind) in [
        (HostMessage::EnterDesignerMode, "enterDesignerMode"),
        (HostMessage::ExitDesignerMode, "exitDesignerMode"),
        (HostMessage::PanelClosed, "panelClosed"),
    ] {
        assert_eq!(serde_json::to_value(&message).expect("serialize"), json!({ "type": kind }));
        assert_eq!(message.kind(), kind);
    }
}

#[test]
fn preview_messages_decode_from_page_payloads() {
    let ready: PreviewMessage =
        serde_json::from_value(json!({ "type": "threejs-ready" })).expect("decode ready");
    assert_eq!(ready, PreviewMessage::Ready);

    let picked: PreviewMessage =
        serde_json::from_value(json!({ "type": "pointer-selected", "category": "side-6" }))
            .expect("decode pointer");
    assert_eq!(picked, PreviewMessage::PointerSelected { category: "side-6".into() });
}

#[test]
fn initialize_without_options_decodes_to_empty_selection() {
    let message: HostMessage =
        serde_json::from_value(json!({ "type": "initializeModel", "modelName": "duo-oasis" }))
            .expect("decode");
    match message {
        HostMessage::InitializeModel { model_name, options } => {
            assert_eq!(model_name, "duo-oasis");
            assert!(options.is_empty());
        },
        other => panic!("unexpected message {other:?}"),
    }
}

#[test]
fn unknown_types_do_not_decode() {
    assert!(serde_json::from_value::<HostMessage>(json!({ "type": "resize" })).is_err());
    assert!(serde_json::from_value::<PreviewMessage>(json!({ "kind": "threejs-ready" })).is_err());
}
