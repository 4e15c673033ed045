use crate::error::HostError;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// The system clipboard, as far as the page can reach it.
pub trait Clipboard: Send + Sync + 'static {
    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), HostError>> + Send;
}

/// Process-local clipboard. A denied clipboard rejects every write, the way
/// a browser does without the permission.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    denied: bool,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn denied() -> Self {
        Self { denied: true, ..Self::default() }
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), HostError> {
        if self.denied {
            return Err(HostError::Clipboard { message: "write permission denied".into(), context: None });
        }
        *self.contents.lock() = Some(text.to_owned());
        Ok(())
    }
}
