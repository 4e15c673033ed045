//! The host page's side of the configurator protocol.
//!
//! The URL query is the selection: every option click rewrites it in place
//! and forwards a single-option delta to the preview, while readiness and
//! history navigation resend the whole query as `initializeModel`.

use crate::clipboard::Clipboard;
use crate::error::{HostError, HostErrorExt};
use crate::history::History;
use crate::view::{CopyIcon, HostView};
use haven_bridge::Port;
use haven_domain::{
    HostMessage, ModelId, ModelProfile, OptionCategory, OptionDelta, OptionValue, PreviewMessage,
};
use haven_kernel::location::Location;
use haven_kernel::registry::ModelRegistry;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

const INPUT_CAPACITY: usize = 32;

/// Shopper actions on the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostInput {
    /// An option button was clicked.
    Select { category: OptionCategory, value: OptionValue },
    ToggleDesigner,
    ClosePanel,
    CopyLink,
    /// Browser back button.
    Back,
    /// Browser forward button.
    Forward,
}

/// Observable page state, republished after every action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStatus {
    pub href: String,
    pub view: HostView,
    pub designer: bool,
    /// How many `initializeModel` messages went out.
    pub initializations: u64,
}

/// Cloneable access to a running host controller.
#[derive(Debug, Clone)]
pub struct HostHandle {
    input: mpsc::Sender<HostInput>,
    status: watch::Receiver<HostStatus>,
}

impl HostHandle {
    /// Queues an action. Returns `false` once the controller is gone.
    pub async fn send(&self, input: HostInput) -> bool {
        self.input.send(input).await.is_ok()
    }

    pub async fn select(
        &self,
        category: impl Into<OptionCategory>,
        value: impl Into<OptionValue>,
    ) -> bool {
        self.send(HostInput::Select { category: category.into(), value: value.into() }).await
    }

    #[must_use]
    pub fn status(&self) -> HostStatus {
        self.status.borrow().clone()
    }

    /// Waits until the status satisfies `predicate`; `None` if the
    /// controller stopped first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&HostStatus) -> bool,
    ) -> Option<HostStatus> {
        self.status.wait_for(predicate).await.ok().map(|status| (*status).clone())
    }
}

#[derive(Debug)]
pub struct HostController<C> {
    port: Port,
    model: ModelId,
    profile: Arc<ModelProfile>,
    history: History,
    view: HostView,
    designer: bool,
    initializations: u64,
    clipboard: C,

    input_tx: mpsc::Sender<HostInput>,
    input_rx: mpsc::Receiver<HostInput>,
    status: watch::Sender<HostStatus>,
}

impl<C: Clipboard> HostController<C> {
    /// Sets up the page for the model named by the current URL, writing
    /// missing defaults into the query first.
    pub fn new(port: Port, registry: &ModelRegistry, mut history: History, clipboard: C) -> Self {
        let model = history.location().model_id();
        let profile = registry.profile(&model);

        let mut location = history.location().clone();
        if registry.resolve_defaults(&mut location) {
            debug!(model = %model, query = location.query(), "Defaults written into the URL");
            history.replace(location);
        }

        let mut view = HostView::for_profile(&profile);
        view.set_link(history.location().shareable_link());
        let (input_tx, input_rx) = mpsc::channel(INPUT_CAPACITY);
        let (status, _) = watch::channel(HostStatus {
            href: history.location().href().to_owned(),
            view: view.clone(),
            designer: false,
            initializations: 0,
        });

        Self {
            port,
            model,
            profile,
            history,
            view,
            designer: false,
            initializations: 0,
            clipboard,
            input_tx,
            input_rx,
            status,
        }
    }

    #[must_use]
    pub fn handle(&self) -> HostHandle {
        HostHandle { input: self.input_tx.clone(), status: self.status.subscribe() }
    }

    #[must_use]
    pub const fn model(&self) -> &ModelId {
        &self.model
    }

    #[must_use]
    pub fn profile(&self) -> &ModelProfile {
        &self.profile
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        self.history.location()
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn view(&self) -> &HostView {
        &self.view
    }

    #[must_use]
    pub const fn is_designer(&self) -> bool {
        self.designer
    }

    #[must_use]
    pub const fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Runs until the page's window closes, then hands the controller back.
    ///
    /// # Errors
    /// Returns [`HostError::Bridge`] if the page's window is not open.
    pub async fn run(mut self) -> Result<Self, HostError> {
        let mut inbox = self.port.listen::<PreviewMessage>().context("host inbox")?;
        info!(window = %self.port.own(), model = %self.model, "Host page running");

        loop {
            tokio::select! {
                message = inbox.recv() => match message {
                    Some((_, message)) => self.handle_message(message),
                    None => break,
                },
                Some(input) = self.input_rx.recv() => self.handle_input(input).await,
            }
        }

        info!(window = %self.port.own(), "Host page closed");
        Ok(self)
    }

    /// Handles one message from the preview frame.
    #[instrument(level = "debug", skip_all, fields(kind = message.kind()))]
    pub fn handle_message(&mut self, message: PreviewMessage) {
        match message {
            PreviewMessage::Ready => {
                self.initialize_from_url();
                self.set_selected_classes();
            },
            PreviewMessage::PointerSelected { category } => {
                debug!(%category, "Designer panel opened");
                self.view.show_panel(category);
            },
        }
        self.publish();
    }

    /// Handles one shopper action.
    pub async fn handle_input(&mut self, input: HostInput) {
        match input {
            HostInput::Select { category, value } => self.select_option(category, value),
            HostInput::ToggleDesigner => self.toggle_designer(),
            HostInput::ClosePanel => self.close_panel(),
            HostInput::CopyLink => {
                self.copy_link().await;
            },
            HostInput::Back => {
                if self.history.back() {
                    self.pop_state();
                }
            },
            HostInput::Forward => {
                if self.history.forward() {
                    self.pop_state();
                }
            },
        }
        self.publish();
    }

    /// Sends the whole URL query as `initializeModel`.
    pub fn initialize_from_url(&mut self) {
        let options = self.history.location().query_selection();
        info!(model = %self.model, options = options.len(), "Initializing preview");
        self.initializations += 1;
        self.send(&HostMessage::InitializeModel { model_name: self.model.clone(), options });
    }

    /// Records one option in the URL, the UI and the preview.
    pub fn select_option(&mut self, category: OptionCategory, value: OptionValue) {
        self.view.mark_selected(category.as_str(), value.as_str());

        let mut location = self.history.location().clone();
        location.set_query_value(category.as_str(), value.as_str());
        self.view.set_link(location.shareable_link());
        self.history.replace(location);

        debug!(%category, %value, "Option selected");
        self.send(&HostMessage::UpdateOption { option: OptionDelta::new(category, value) });
    }

    /// Mirrors the URL into the UI: link box, copy icon, selected buttons.
    pub fn set_selected_classes(&mut self) {
        let location = self.history.location();
        self.view.set_link(location.shareable_link());
        for (category, value) in &location.query_selection() {
            self.view.mark_selected(category.as_str(), value.as_str());
        }
    }

    pub fn toggle_designer(&mut self) {
        self.designer = !self.designer;
        self.view.fullscreen = self.designer;
        info!(enabled = self.designer, "Designer mode");
        if self.designer {
            self.send(&HostMessage::EnterDesignerMode);
        } else {
            self.send(&HostMessage::ExitDesignerMode);
            self.view.hide_panel();
        }
    }

    pub fn close_panel(&mut self) {
        self.view.hide_panel();
        self.send(&HostMessage::PanelClosed);
    }

    /// Copies the shown link. Success flips the icon to a checkmark; failure
    /// is only logged.
    pub async fn copy_link(&mut self) -> bool {
        match self.clipboard.write_text(&self.view.current_link).await {
            Ok(()) => {
                self.view.copy_icon = CopyIcon::Checkmark;
                true
            },
            Err(err) => {
                error!(error = %err, "Failed to copy");
                false
            },
        }
    }

    fn pop_state(&mut self) {
        debug!(href = self.history.location().href(), "History navigation");
        self.initialize_from_url();
        self.set_selected_classes();
    }

    fn send(&self, message: &HostMessage) {
        if let Err(err) = self.port.post(message) {
            warn!(kind = message.kind(), error = %err, "Preview unreachable; message dropped");
        }
    }

    fn publish(&self) {
        self.status.send_replace(HostStatus {
            href: self.history.location().href().to_owned(),
            view: self.view.clone(),
            designer: self.designer,
            initializations: self.initializations,
        });
    }
}
