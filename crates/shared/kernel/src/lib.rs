//! Kernel utilities shared by the host and preview slices.
//! Keep this crate lightweight: configuration loading, the model registry
//! with default resolution, and the page [`Location`](location::Location).
//!
//! ## Default resolution
//! ```rust
//! use haven_kernel::location::Location;
//! use haven_kernel::registry::ModelRegistry;
//!
//! let registry = ModelRegistry::builtin();
//! let mut location = Location::parse("https://example.com/models/solo-haven").unwrap();
//! assert!(registry.resolve_defaults(&mut location));
//! assert_eq!(location.query_value("siding-color").as_deref(), Some("Space Black"));
//! ```
//!
//! ## Config loading (non-wasm)
//! ```rust,ignore
//! use haven_kernel::config::load_config;
//! let cfg: haven_kernel::domain::config::StudioConfig = load_config(Some("haven")).unwrap();
//! ```
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
pub mod location;
pub mod registry;

pub use haven_domain as domain;
