//! # Host page
//!
//! The embedding side of the configurator. It keeps the shopper's selection
//! in the page URL, renders the option UI state and drives the preview frame
//! over the bridge.
//!
//! ```rust,no_run
//! use haven_bridge::Bridge;
//! use haven_host::{History, HostController, MemoryClipboard};
//! use haven_kernel::location::Location;
//! use haven_kernel::registry::ModelRegistry;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let (host, _frame) = Bridge::new().embed("host", "preview")?;
//! let location = Location::parse("http://localhost:8080/models/solo-haven")?;
//! let controller = HostController::new(
//!     host,
//!     &ModelRegistry::builtin(),
//!     History::new(location),
//!     MemoryClipboard::new(),
//! );
//! let _closed = controller.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod clipboard;
pub mod controller;
pub mod error;
pub mod history;
pub mod view;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use controller::{HostController, HostHandle, HostInput, HostStatus};
pub use error::{HostError, HostErrorExt};
pub use history::History;
pub use view::{CategoryView, CopyIcon, DesignerPanel, HostView, OptionButton};
