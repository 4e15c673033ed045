//! Wire protocol between the host page and the preview frame.
//!
//! Every message is a JSON object discriminated by its `type` field. The
//! field names are a frozen contract with the deployed page scripts.

use crate::ids::{ModelId, OptionCategory, OptionValue};
use crate::selection::Selection;
use serde::{Deserialize, Serialize};

/// A single-category change: `{"type": <category>, "value": <value>}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDelta {
    #[serde(rename = "type")]
    pub category: OptionCategory,
    pub value: OptionValue,
}

impl OptionDelta {
    pub fn new(category: impl Into<OptionCategory>, value: impl Into<OptionValue>) -> Self {
        Self { category: category.into(), value: value.into() }
    }
}

/// Host page to preview frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMessage {
    /// Load `model_name` and apply the full option set.
    #[serde(rename = "initializeModel")]
    InitializeModel {
        #[serde(rename = "modelName")]
        model_name: ModelId,
        #[serde(default)]
        options: Selection,
    },
    #[serde(rename = "updateOption")]
    UpdateOption { option: OptionDelta },
    #[serde(rename = "enterDesignerMode")]
    EnterDesignerMode,
    #[serde(rename = "exitDesignerMode")]
    ExitDesignerMode,
    #[serde(rename = "panelClosed")]
    PanelClosed,
}

impl HostMessage {
    /// The `type` discriminator as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InitializeModel { .. } => "initializeModel",
            Self::UpdateOption { .. } => "updateOption",
            Self::EnterDesignerMode => "enterDesignerMode",
            Self::ExitDesignerMode => "exitDesignerMode",
            Self::PanelClosed => "panelClosed",
        }
    }
}

/// Preview frame to host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PreviewMessage {
    /// Readiness beacon, repeated until the first `initializeModel`.
    #[serde(rename = "threejs-ready")]
    Ready,
    /// A designer-mode hotspot was clicked.
    #[serde(rename = "pointer-selected")]
    PointerSelected { category: OptionCategory },
}

impl PreviewMessage {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "threejs-ready",
            Self::PointerSelected { .. } => "pointer-selected",
        }
    }
}
