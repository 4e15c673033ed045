//! # Frame bridge
//!
//! In-process stand-in for `window.postMessage` between a host page and the
//! preview frame it embeds.
//!
//! Each browsing context is a named window with its own inbox. Messages are
//! serialized to JSON on post and decoded by typed listeners on receipt, so
//! both sides only share the wire format, never memory.
//!
//! * Delivery is FIFO per target window and at most once.
//! * Posting to a window without listeners silently drops the message.
//! * Listeners skip payloads they cannot decode (unknown `type`).
//!
//! # Example
//!
//! ```rust
//! use haven_bridge::{Bridge, BridgeError};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! #[serde(tag = "type")]
//! enum Ping {
//!     #[serde(rename = "ping")]
//!     Ping { seq: u32 },
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), BridgeError> {
//!     let bridge = Bridge::new();
//!     let (host, preview) = bridge.embed("host", "preview")?;
//!
//!     let mut inbox = preview.listen::<Ping>()?;
//!     host.post(&Ping::Ping { seq: 1 })?;
//!
//!     let (source, message) = inbox.recv().await.expect("message");
//!     assert_eq!(source.as_str(), "host");
//!     assert_eq!(message, Ping::Ping { seq: 1 });
//!     Ok(())
//! }
//! ```

mod bridge;
mod error;
mod listener;
mod port;

pub use bridge::{Bridge, Envelope, WindowName};
pub use error::{BridgeError, BridgeErrorExt};
pub use listener::{EnvelopeReceiverExt, Listener};
pub use port::Port;
