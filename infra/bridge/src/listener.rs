use crate::bridge::{Envelope, WindowName};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

/// Lag-tolerant receive on a window inbox.
pub trait EnvelopeReceiverExt {
    /// Next envelope, or `None` once the window is closed.
    ///
    /// A lagging receiver skips to the oldest buffered message instead of
    /// failing.
    fn next_envelope(&mut self) -> impl Future<Output = Option<Arc<Envelope>>> + Send;
}

impl EnvelopeReceiverExt for broadcast::Receiver<Arc<Envelope>> {
    async fn next_envelope(&mut self) -> Option<Arc<Envelope>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(envelope) => {
                    if skipped > 0 {
                        warn!(skipped, "Window listener lagged; resuming from oldest buffered message");
                    }
                    return Some(envelope);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(skipped = n, total_skipped = skipped, "Window listener lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Decodes envelopes into `M`, dropping anything `M` does not describe.
///
/// This is the protocol's tolerance rule: a payload whose `type` is unknown
/// or whose fields do not match is logged and skipped, never an error.
#[derive(Debug)]
pub struct Listener<M> {
    window: WindowName,
    receiver: broadcast::Receiver<Arc<Envelope>>,
    _message: PhantomData<fn() -> M>,
}

impl<M: DeserializeOwned> Listener<M> {
    pub(crate) const fn new(
        window: WindowName,
        receiver: broadcast::Receiver<Arc<Envelope>>,
    ) -> Self {
        Self { window, receiver, _message: PhantomData }
    }

    /// Next message this listener understands, with its sender.
    /// Returns `None` once the window is closed.
    pub async fn recv(&mut self) -> Option<(WindowName, M)> {
        loop {
            let envelope = self.receiver.next_envelope().await?;
            if let Some(message) = self.decode(&envelope) {
                return Some((envelope.source.clone(), message));
            }
        }
    }

    /// Non-blocking variant of [`Listener::recv`]; `None` when nothing
    /// decodable is buffered.
    pub fn try_recv(&mut self) -> Option<(WindowName, M)> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => {
                    if let Some(message) = self.decode(&envelope) {
                        return Some((envelope.source.clone(), message));
                    }
                },
                Err(TryRecvError::Lagged(n)) => {
                    debug!(window = %self.window, skipped = n, "Window listener lagged");
                },
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drains every decodable message currently buffered.
    pub fn drain(&mut self) -> Vec<M> {
        std::iter::from_fn(|| self.try_recv()).map(|(_, message)| message).collect()
    }

    fn decode(&self, envelope: &Envelope) -> Option<M> {
        match serde_json::from_value::<M>(envelope.data.clone()) {
            Ok(message) => Some(message),
            Err(err) => {
                debug!(
                    window = %self.window,
                    source = %envelope.source,
                    kind = envelope.kind().unwrap_or("<untyped>"),
                    error = %err,
                    "Ignoring unrecognized message"
                );
                None
            },
        }
    }
}
