use crate::error::{BridgeError, BridgeErrorExt};
use crate::port::Port;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// Default inbox depth per window.
///
/// The protocol is chatty only during option clicks, so 64 pending messages
/// is far beyond what a listener falls behind by.
const DEFAULT_CAPACITY: usize = 64;
const MIN_CAPACITY: usize = 1;

/// Name of a browsing context (`"host"`, `"preview"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowName(Cow<'static, str>);

impl WindowName {
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for WindowName {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for WindowName {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl fmt::Display for WindowName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A delivered message, as the receiving window's `message` event sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// The window that posted the message.
    pub source: WindowName,
    /// The structured-clone payload, always a JSON value on this bridge.
    pub data: Value,
}

impl Envelope {
    /// The `type` discriminator of the payload, if it has one.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.data.get("type").and_then(Value::as_str)
    }
}

#[derive(Debug)]
struct Inbox {
    sender: broadcast::Sender<Arc<Envelope>>,
}

/// Registry of open windows and their inboxes.
///
/// Cloning is cheap; every clone sees the same set of windows. Delivery is
/// FIFO per target window and at most once: a message posted to a window
/// nobody listens on is dropped.
#[derive(Debug, Clone, Default)]
pub struct Bridge {
    windows: Arc<RwLock<FxHashMap<WindowName, Inbox>>>,
}

impl Bridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a window with the default inbox capacity.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowExists`] if the name is taken.
    pub fn open(&self, name: impl Into<WindowName>) -> Result<WindowName, BridgeError> {
        self.open_with_capacity(name, DEFAULT_CAPACITY)
    }

    /// Opens a window whose inbox buffers `capacity` undelivered messages.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowExists`] if the name is taken or
    /// [`BridgeError::InvalidCapacity`] if `capacity` is zero.
    pub fn open_with_capacity(
        &self,
        name: impl Into<WindowName>,
        capacity: usize,
    ) -> Result<WindowName, BridgeError> {
        let capacity = validate_capacity(capacity)?;
        let name = name.into();

        let mut windows = self.windows.write();
        if windows.contains_key(&name) {
            return Err(BridgeError::WindowExists { message: name.to_string().into(), context: None });
        }
        let (sender, _) = broadcast::channel(capacity);
        windows.insert(name.clone(), Inbox { sender });
        drop(windows);

        trace!(window = %name, capacity, "Window opened");
        Ok(name)
    }

    /// Opens a parent window and a frame embedded in it, returning the port
    /// each side talks through.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowExists`] if either name is taken.
    ///
    /// # Examples
    /// ```rust
    /// use haven_bridge::Bridge;
    ///
    /// # fn main() -> Result<(), haven_bridge::BridgeError> {
    /// let bridge = Bridge::new();
    /// let (host, preview) = bridge.embed("host", "preview")?;
    /// assert_eq!(host.peer().as_str(), "preview");
    /// assert_eq!(preview.peer().as_str(), "host");
    /// # Ok(())
    /// # }
    /// ```
    pub fn embed(
        &self,
        parent: impl Into<WindowName>,
        frame: impl Into<WindowName>,
    ) -> Result<(Port, Port), BridgeError> {
        let parent = self.open(parent)?;
        let frame = match self.open(frame) {
            Ok(frame) => frame,
            Err(err) => {
                self.close(&parent);
                return Err(err);
            },
        };
        debug!(parent = %parent, frame = %frame, "Frame embedded");
        Ok((
            Port::new(self.clone(), parent.clone(), frame.clone()),
            Port::new(self.clone(), frame, parent),
        ))
    }

    /// Serializes `message` and delivers it to `target`'s inbox.
    ///
    /// Returns the number of listeners that will observe it; zero means the
    /// message was dropped.
    ///
    /// # Errors
    /// Returns [`BridgeError::Encode`] if the message cannot be serialized or
    /// [`BridgeError::WindowNotFound`] if `target` is not open.
    pub fn post<M: Serialize + ?Sized>(
        &self,
        source: &WindowName,
        target: &WindowName,
        message: &M,
    ) -> Result<usize, BridgeError> {
        let data = serde_json::to_value(message).context(format!("Posting to {target}"))?;
        self.deliver(Envelope { source: source.clone(), data }, target)
    }

    /// Delivers an already encoded envelope.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowNotFound`] if `target` is not open.
    pub fn deliver(&self, envelope: Envelope, target: &WindowName) -> Result<usize, BridgeError> {
        let sender = self.inbox(target)?;
        let kind = envelope.kind().unwrap_or("<untyped>").to_owned();

        sender.send(Arc::new(envelope)).map_or_else(
            |_| {
                trace!(target_window = %target, kind, "Message dropped: no listeners");
                Ok(0)
            },
            |count| {
                trace!(target_window = %target, kind, count, "Message delivered");
                Ok(count)
            },
        )
    }

    /// Subscribes to a window's inbox. Only messages posted after this call
    /// are observed.
    ///
    /// # Errors
    /// Returns [`BridgeError::WindowNotFound`] if the window is not open.
    pub fn subscribe(
        &self,
        window: &WindowName,
    ) -> Result<broadcast::Receiver<Arc<Envelope>>, BridgeError> {
        Ok(self.inbox(window)?.subscribe())
    }

    #[must_use]
    pub fn is_open(&self, window: &WindowName) -> bool {
        self.windows.read().contains_key(window)
    }

    /// Closes a window. Its listeners observe the end of the stream once the
    /// buffered messages are drained.
    pub fn close(&self, window: &WindowName) -> bool {
        let closed = self.windows.write().remove(window).is_some();
        if closed {
            debug!(window = %window, "Window closed");
        }
        closed
    }

    /// Closes every window, returning how many were open.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut windows = self.windows.write();
        let count = windows.len();
        windows.clear();
        count
    }

    fn inbox(&self, window: &WindowName) -> Result<broadcast::Sender<Arc<Envelope>>, BridgeError> {
        let windows = self.windows.read();
        windows.get(window).map(|inbox| inbox.sender.clone()).ok_or_else(|| {
            warn!(window = %window, "Window is not open");
            BridgeError::WindowNotFound { message: window.to_string().into(), context: None }
        })
    }
}

fn validate_capacity(capacity: usize) -> Result<usize, BridgeError> {
    if capacity < MIN_CAPACITY {
        return Err(BridgeError::InvalidCapacity {
            message: format!("capacity must be >= {MIN_CAPACITY}").into(),
            context: None,
        });
    }
    Ok(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_kind_reads_type_field() {
        let envelope = Envelope { source: "host".into(), data: json!({ "type": "panelClosed" }) };
        assert_eq!(envelope.kind(), Some("panelClosed"));

        let envelope = Envelope { source: "host".into(), data: json!("threejs-ready") };
        assert_eq!(envelope.kind(), None);
    }

    #[test]
    fn test_duplicate_window_is_rejected() {
        let bridge = Bridge::new();
        bridge.open("host").expect("first open");
        let err = bridge.open("host").expect_err("duplicate open");
        assert!(matches!(err, BridgeError::WindowExists { .. }));
    }

    #[test]
    fn test_embed_rolls_back_parent_on_conflict() {
        let bridge = Bridge::new();
        bridge.open("preview").expect("open preview");
        assert!(bridge.embed("host", "preview").is_err());
        assert!(!bridge.is_open(&"host".into()));
    }

    #[test]
    fn test_post_without_listeners_drops() {
        let bridge = Bridge::new();
        let host = bridge.open("host").expect("open host");
        let preview = bridge.open("preview").expect("open preview");
        let delivered = bridge.post(&preview, &host, &json!({ "type": "threejs-ready" }));
        assert_eq!(delivered.expect("post"), 0);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let bridge = Bridge::new();
        let err = bridge.open_with_capacity("host", 0).expect_err("zero capacity");
        assert!(matches!(err, BridgeError::InvalidCapacity { .. }));
    }
}
