use crate::error::{SessionError, SessionErrorExt};
use haven_bridge::Bridge;
use haven_domain::config::PreviewConfig;
use haven_domain::constants::{HOST_WINDOW, PREVIEW_WINDOW};
use haven_host::{Clipboard, History, HostController, HostError, HostHandle};
use haven_kernel::registry::ModelRegistry;
use haven_preview::{AssetSource, PreviewController, PreviewError, PreviewHandle, Renderer};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// A host page with its embedded preview frame, each on its own task.
#[derive(Debug)]
pub struct Session<S, R, C> {
    bridge: Bridge,
    host: HostHandle,
    preview: PreviewHandle,
    host_task: JoinHandle<Result<HostController<C>, HostError>>,
    preview_task: JoinHandle<Result<PreviewController<S, R>, PreviewError>>,
}

/// Both controllers after their windows closed.
#[derive(Debug)]
pub struct Closed<S, R, C> {
    pub host: HostController<C>,
    pub preview: PreviewController<S, R>,
}

impl<S, R, C> Session<S, R, C>
where
    S: AssetSource,
    R: Renderer,
    C: Clipboard,
{
    /// Embeds the frame and starts both contexts on the current runtime.
    /// The readiness handshake starts on its own.
    ///
    /// # Errors
    /// Returns [`SessionError::Bridge`] if the windows cannot be opened.
    pub fn start(
        config: PreviewConfig,
        registry: Arc<ModelRegistry>,
        history: History,
        source: S,
        renderer: R,
        clipboard: C,
    ) -> Result<Self, SessionError> {
        let bridge = Bridge::new();
        let (host_port, frame_port) =
            bridge.embed(HOST_WINDOW, PREVIEW_WINDOW).context("session windows")?;

        let host = HostController::new(host_port, &registry, history, clipboard);
        let preview = PreviewController::new(frame_port, config, registry, source, renderer);
        info!(model = %host.model(), href = host.location().href(), "Session started");

        let host_handle = host.handle();
        let preview_handle = preview.handle();
        Ok(Self {
            bridge,
            host: host_handle,
            preview: preview_handle,
            host_task: tokio::spawn(host.run()),
            preview_task: tokio::spawn(preview.run()),
        })
    }

    #[must_use]
    pub const fn host(&self) -> &HostHandle {
        &self.host
    }

    #[must_use]
    pub const fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    /// Closes both windows and waits for the contexts to wind down.
    ///
    /// # Errors
    /// Returns the first context failure.
    pub async fn close(self) -> Result<Closed<S, R, C>, SessionError> {
        let closed = self.bridge.shutdown();
        info!(windows = closed, "Session closing");

        let host = self.host_task.await.context("host task")??;
        let preview = self.preview_task.await.context("preview task")??;
        Ok(Closed { host, preview })
    }
}
