//! # Domain Models
//!
//! Pure configurator types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, no async, no scene access. Just data, the wire
//! protocol between host and preview, and small helpers over them.

pub mod config;
pub mod constants;
pub mod ids;
pub mod messages;
pub mod model;
pub mod selection;
pub mod slots;

pub use ids::{ModelId, OptionCategory, OptionValue};
pub use messages::{HostMessage, OptionDelta, PreviewMessage};
pub use model::{CategoryProfile, ModelProfile, OptionBinding, Viewpoint, WallPosition, WallVariant};
pub use selection::Selection;
pub use slots::SlotKinds;
