//! Facade crate for the Haven configurator.
//! Re-exports the shared and feature crates and wires a host page to its
//! preview frame. Keep this crate thin: it composes, it does not implement.
//!
//! ## Usage
//! - Build a [`Session`] from a page [`History`](host::History), an asset
//!   source, a renderer and a clipboard.
//! - Drive it through [`Session::host`] like a shopper would, watch
//!   [`Session::preview`], then [`Session::close`] it to inspect both sides.

pub mod error;
pub mod session;

pub use haven_bridge as bridge;
pub use haven_domain as domain;
pub use haven_host as host;
pub use haven_kernel as kernel;
pub use haven_preview as preview;

pub use error::{SessionError, SessionErrorExt};
pub use session::{Closed, Session};
