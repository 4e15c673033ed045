use crate::bridge::{Bridge, Envelope, WindowName};
use crate::error::BridgeError;
use crate::listener::Listener;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::broadcast;

/// One side of an embedded frame.
///
/// `post` is the other window's `postMessage`; `listen` is this window's
/// `message` event.
#[derive(Debug, Clone)]
pub struct Port {
    bridge: Bridge,
    own: WindowName,
    peer: WindowName,
}

impl Port {
    pub(crate) const fn new(bridge: Bridge, own: WindowName, peer: WindowName) -> Self {
        Self { bridge, own, peer }
    }

    #[must_use]
    pub const fn own(&self) -> &WindowName {
        &self.own
    }

    #[must_use]
    pub const fn peer(&self) -> &WindowName {
        &self.peer
    }

    #[must_use]
    pub const fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Posts a message to the peer window.
    ///
    /// # Errors
    /// Returns [`BridgeError::Encode`] or [`BridgeError::WindowNotFound`].
    pub fn post<M: Serialize + ?Sized>(&self, message: &M) -> Result<usize, BridgeError> {
        self.bridge.post(&self.own, &self.peer, message)
    }

    /// Raw envelopes delivered to this window.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowNotFound`] if this window was closed.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<Arc<Envelope>>, BridgeError> {
        self.bridge.subscribe(&self.own)
    }

    /// Typed listener for messages delivered to this window.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowNotFound`] if this window was closed.
    pub fn listen<M: DeserializeOwned>(&self) -> Result<Listener<M>, BridgeError> {
        Ok(Listener::new(self.own.clone(), self.subscribe()?))
    }

    /// Closes this side's window.
    pub fn close(&self) -> bool {
        self.bridge.close(&self.own)
    }
}
