//! The preview frame's state machine.
//!
//! `Uninitialized → Loading → Ready`, driven by host messages, asset load
//! completions, pointer input and animation frames. The controller is the
//! only owner of the scene and its slots; everything reaches it through its
//! run loop.

use crate::applier::{Applied, OptionApplier};
use crate::asset::AssetSource;
use crate::camera::{Camera, CameraPose, CameraTween};
use crate::error::{PreviewError, PreviewErrorExt};
use crate::hotspot::HotspotLayer;
use crate::readiness::ReadinessBeacon;
use crate::render::{Frame, Renderer};
use crate::scene::Scene;
use crate::slots::SceneSlots;
use glam::Vec2;
use haven_bridge::Port;
use haven_domain::config::{PreviewConfig, Viewport};
use haven_domain::{
    HostMessage, ModelId, ModelProfile, OptionCategory, OptionDelta, PreviewMessage, Selection,
    SlotKinds,
};
use haven_kernel::registry::ModelRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument, warn};

const INPUT_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewPhase {
    Uninitialized,
    Loading,
    Ready,
}

/// Pointer and window events from the frame's own page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewInput {
    /// A click at a pixel position (origin top-left).
    Click(Vec2),
    Resize(Viewport),
}

/// Observable controller state, republished after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewStatus {
    pub phase: PreviewPhase,
    pub model: Option<ModelId>,
    /// Bumped by every `initializeModel`.
    pub generation: u64,
    /// Options in effect on the active model.
    pub selection: Selection,
    pub slots: SlotKinds,
    pub designer: bool,
    pub focused: Option<OptionCategory>,
    pub pose: CameraPose,
    pub animating: bool,
}

/// Cloneable access to a running controller.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    input: mpsc::Sender<PreviewInput>,
    status: watch::Receiver<PreviewStatus>,
}

impl PreviewHandle {
    /// Sends a click into the frame. Returns `false` once the controller is gone.
    pub async fn click(&self, x: f32, y: f32) -> bool {
        self.input.send(PreviewInput::Click(Vec2::new(x, y))).await.is_ok()
    }

    pub async fn resize(&self, viewport: Viewport) -> bool {
        self.input.send(PreviewInput::Resize(viewport)).await.is_ok()
    }

    #[must_use]
    pub fn status(&self) -> PreviewStatus {
        self.status.borrow().clone()
    }

    /// Waits until the status satisfies `predicate`; `None` if the
    /// controller stopped first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&PreviewStatus) -> bool,
    ) -> Option<PreviewStatus> {
        self.status.wait_for(predicate).await.ok().map(|status| (*status).clone())
    }
}

/// The loaded asset and the options applied to it.
#[derive(Debug)]
struct ActiveModel {
    profile: Arc<ModelProfile>,
    scene: Scene,
    slots: SceneSlots,
    selection: Selection,
}

#[derive(Debug)]
struct LoadCompleted {
    generation: u64,
    model: ModelId,
    result: Result<Scene, PreviewError>,
}

#[derive(Debug)]
pub struct PreviewController<S, R> {
    port: Port,
    config: PreviewConfig,
    registry: Arc<ModelRegistry>,
    source: Arc<S>,
    renderer: R,

    phase: PreviewPhase,
    model: Option<ModelId>,
    generation: u64,
    active: Option<ActiveModel>,
    /// Options from `initializeModel`, plus updates received while loading.
    incoming: Selection,
    loading: Option<JoinHandle<()>>,
    beacon: Option<ReadinessBeacon>,

    camera: Camera,
    tween: Option<CameraTween>,
    /// Update waiting for the current camera move to land.
    deferred: Option<OptionDelta>,
    hotspots: HotspotLayer,
    designer: bool,

    loads_tx: mpsc::UnboundedSender<LoadCompleted>,
    loads_rx: mpsc::UnboundedReceiver<LoadCompleted>,
    input_tx: mpsc::Sender<PreviewInput>,
    input_rx: mpsc::Receiver<PreviewInput>,
    status: watch::Sender<PreviewStatus>,
}

impl<S: AssetSource, R: Renderer> PreviewController<S, R> {
    pub fn new(
        port: Port,
        config: PreviewConfig,
        registry: Arc<ModelRegistry>,
        source: S,
        renderer: R,
    ) -> Self {
        let camera = Camera::new(&config.camera, config.viewport);
        let (loads_tx, loads_rx) = mpsc::unbounded_channel();
        let (input_tx, input_rx) = mpsc::channel(INPUT_CAPACITY);
        let (status, _) = watch::channel(PreviewStatus {
            phase: PreviewPhase::Uninitialized,
            model: None,
            generation: 0,
            selection: Selection::new(),
            slots: SlotKinds::empty(),
            designer: false,
            focused: None,
            pose: camera.pose(),
            animating: false,
        });

        Self {
            port,
            config,
            registry,
            source: Arc::new(source),
            renderer,
            phase: PreviewPhase::Uninitialized,
            model: None,
            generation: 0,
            active: None,
            incoming: Selection::new(),
            loading: None,
            beacon: None,
            camera,
            tween: None,
            deferred: None,
            hotspots: HotspotLayer::default(),
            designer: false,
            loads_tx,
            loads_rx,
            input_tx,
            input_rx,
            status,
        }
    }

    #[must_use]
    pub fn handle(&self) -> PreviewHandle {
        PreviewHandle { input: self.input_tx.clone(), status: self.status.subscribe() }
    }

    #[must_use]
    pub const fn phase(&self) -> PreviewPhase {
        self.phase
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.active.as_ref().map(|active| &active.scene)
    }

    #[must_use]
    pub fn slots(&self) -> Option<&SceneSlots> {
        self.active.as_ref().map(|active| &active.slots)
    }

    #[must_use]
    pub fn selection(&self) -> Option<&Selection> {
        self.active.as_ref().map(|active| &active.selection)
    }

    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    #[must_use]
    pub const fn hotspots(&self) -> &HotspotLayer {
        &self.hotspots
    }

    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Runs until the frame's window closes, then hands the controller back
    /// for inspection.
    ///
    /// # Errors
    /// Returns [`PreviewError::Bridge`] if the frame's window is not open.
    pub async fn run(mut self) -> Result<Self, PreviewError> {
        let mut inbox = self.port.listen::<HostMessage>().context("preview inbox")?;
        if self.phase == PreviewPhase::Uninitialized {
            self.beacon =
                Some(ReadinessBeacon::start(self.port.clone(), self.config.readiness_interval()));
        }

        let mut frames =
            tokio::time::interval(self.config.frame_interval().max(Duration::from_millis(1)));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(window = %self.port.own(), "Preview running");

        loop {
            let animating = self.needs_frames();
            tokio::select! {
                message = inbox.recv() => match message {
                    Some((_, message)) => self.handle_message(message),
                    None => break,
                },
                Some(done) = self.loads_rx.recv() => self.complete_load(done),
                Some(input) = self.input_rx.recv() => self.handle_input(input),
                now = frames.tick(), if animating => self.on_frame(now),
            }
        }

        self.stop_background();
        info!(window = %self.port.own(), "Preview stopped");
        Ok(self)
    }

    /// Handles one host message.
    #[instrument(level = "debug", skip_all, fields(kind = message.kind()))]
    pub fn handle_message(&mut self, message: HostMessage) {
        match message {
            HostMessage::InitializeModel { model_name, options } => {
                self.initialize(model_name, options);
            },
            HostMessage::UpdateOption { option } => self.update_option(option),
            HostMessage::EnterDesignerMode => self.set_designer(true),
            HostMessage::ExitDesignerMode => self.set_designer(false),
            HostMessage::PanelClosed => self.panel_closed(),
        }
        self.publish();
    }

    fn initialize(&mut self, model: ModelId, options: Selection) {
        if let Some(mut beacon) = self.beacon.take() {
            beacon.stop();
        }
        if let Some(task) = self.loading.take() {
            task.abort();
            debug!(superseded = ?self.model, "In-flight load superseded");
        }

        self.generation += 1;
        self.active = None;
        self.tween = None;
        self.deferred = None;
        self.hotspots = HotspotLayer::default();
        self.incoming = options;
        self.model = Some(model.clone());
        self.phase = PreviewPhase::Loading;

        let generation = self.generation;
        let source = Arc::clone(&self.source);
        let loads = self.loads_tx.clone();
        info!(model = %model, generation, options = self.incoming.len(), "Loading model");
        self.loading = Some(tokio::spawn(async move {
            let result = source.load(&model).await;
            let _ = loads.send(LoadCompleted { generation, model, result });
        }));
    }

    fn complete_load(&mut self, done: LoadCompleted) {
        if done.generation != self.generation {
            debug!(model = %done.model, generation = done.generation, "Stale load discarded");
            return;
        }
        self.loading = None;

        let mut scene = match done.result {
            Ok(scene) => scene,
            Err(err) => {
                error!(model = %done.model, error = %err, "Model failed to load");
                self.phase = PreviewPhase::Uninitialized;
                self.incoming = Selection::new();
                self.publish();
                return;
            },
        };

        let profile = self.registry.profile(&done.model);
        if profile.is_empty() {
            warn!(model = %done.model, "Model has no option profile; options are ignored");
        }
        let slots = SceneSlots::index(&mut scene, &self.config.glass);
        let required = profile
            .categories
            .iter()
            .fold(SlotKinds::empty(), |kinds, category| kinds | SlotKinds::required_by(category.binding));
        let missing = required.difference(slots.kinds());
        if !missing.is_empty() {
            warn!(model = %done.model, missing = ?missing.names(), "Asset lacks slots its options drive");
        }

        let incoming = std::mem::take(&mut self.incoming);
        let selection = OptionApplier::new(&profile).apply_all(&mut scene, &slots, &incoming);

        let mut hotspots = HotspotLayer::for_profile(&profile);
        hotspots.set_enabled(self.designer);
        hotspots.update(&self.camera, &scene);
        self.hotspots = hotspots;

        info!(
            model = %done.model,
            generation = done.generation,
            applied = selection.len(),
            slots = ?slots.kinds().names(),
            "Model ready"
        );
        self.active = Some(ActiveModel { profile, scene, slots, selection });
        self.phase = PreviewPhase::Ready;
        self.camera.resize(self.camera.viewport());
        self.render(true);
        self.publish();
    }

    fn update_option(&mut self, delta: OptionDelta) {
        match self.phase {
            PreviewPhase::Uninitialized => {
                debug!(category = %delta.category, "Option dropped: no model initialized");
            },
            PreviewPhase::Loading => {
                debug!(category = %delta.category, "Option queued until the model is ready");
                self.incoming.set(delta.category, delta.value);
            },
            PreviewPhase::Ready => {
                self.flush_deferred();
                let viewpoint = self
                    .active
                    .as_ref()
                    .and_then(|active| active.profile.viewpoint(&delta.category));
                match viewpoint {
                    Some(viewpoint) => self.move_camera(viewpoint.into(), Some(delta)),
                    None => {
                        self.apply_delta(delta);
                        self.render(true);
                    },
                }
            },
        }
    }

    fn apply_delta(&mut self, delta: OptionDelta) -> Applied {
        let Some(active) = self.active.as_mut() else {
            return Applied::UnknownCategory;
        };
        let outcome = OptionApplier::new(&active.profile).apply(
            &mut active.scene,
            &active.slots,
            &delta.category,
            &delta.value,
        );
        if outcome.is_updated() {
            active.selection.set(delta.category, delta.value);
        }
        outcome
    }

    fn flush_deferred(&mut self) {
        if let Some(delta) = self.deferred.take() {
            self.apply_delta(delta);
        }
    }

    /// Starts a camera move, or applies `then` at once when the camera is
    /// already there.
    fn move_camera(&mut self, to: CameraPose, then: Option<OptionDelta>) {
        let threshold = self.config.camera.move_threshold;
        if self.camera.pose().is_near(&to, threshold) {
            self.tween = None;
            if let Some(delta) = then {
                self.apply_delta(delta);
            }
            self.render(true);
            return;
        }
        self.tween = Some(CameraTween::new(
            self.camera.pose(),
            to,
            Instant::now(),
            self.config.camera.tween_duration(),
        ));
        self.deferred = then;
    }

    fn set_designer(&mut self, enabled: bool) {
        if self.designer == enabled {
            return;
        }
        self.designer = enabled;
        self.hotspots.set_enabled(enabled);
        info!(enabled, "Designer mode");
        if enabled {
            if let Some(active) = &self.active {
                self.hotspots.update(&self.camera, &active.scene);
            }
            self.render(true);
        } else {
            self.flush_deferred();
            self.move_camera(self.camera.home(), None);
        }
    }

    fn panel_closed(&mut self) {
        self.hotspots.focus(None);
        self.flush_deferred();
        self.move_camera(self.camera.home(), None);
    }

    /// Handles one pointer or window event.
    pub fn handle_input(&mut self, input: PreviewInput) {
        match input {
            PreviewInput::Click(point) => self.click(point),
            PreviewInput::Resize(viewport) => {
                self.camera.resize(viewport);
                self.refresh_hotspots();
                self.render(true);
            },
        }
        self.publish();
    }

    fn click(&mut self, point: Vec2) {
        let Some(active) = &self.active else {
            return;
        };
        let Some(category) = self.hotspots.pick(point).cloned() else {
            return;
        };
        let viewpoint = active.profile.viewpoint(&category);

        debug!(%category, x = point.x, y = point.y, "Hotspot selected");
        if let Err(err) = self.port.post(&PreviewMessage::PointerSelected { category: category.clone() }) {
            warn!(error = %err, "Could not report hotspot selection");
        }
        self.hotspots.focus(Some(category));
        self.flush_deferred();
        match viewpoint {
            Some(viewpoint) => self.move_camera(viewpoint.into(), None),
            None => self.render(true),
        }
    }

    /// Advances the camera move and redraws.
    pub fn on_frame(&mut self, now: Instant) {
        let mut landed = false;
        if let Some(tween) = self.tween {
            let (pose, done) = tween.sample(now);
            self.camera.set_pose(pose);
            if done {
                self.tween = None;
                self.flush_deferred();
                landed = true;
            }
        }
        self.refresh_hotspots();
        self.render(landed);
        if landed {
            self.publish();
        }
    }

    fn needs_frames(&self) -> bool {
        self.tween.is_some() || (self.hotspots.is_enabled() && self.active.is_some())
    }

    fn refresh_hotspots(&mut self) {
        if let Some(active) = &self.active {
            self.hotspots.update(&self.camera, &active.scene);
        }
    }

    fn render(&mut self, forced: bool) {
        let hotspots = if self.hotspots.is_enabled() { self.hotspots.hotspots() } else { &[] };
        self.renderer.render(Frame {
            scene: self.active.as_ref().map(|active| &active.scene),
            camera: &self.camera,
            hotspots,
            forced,
        });
    }

    fn publish(&self) {
        self.status.send_replace(PreviewStatus {
            phase: self.phase,
            model: self.model.clone(),
            generation: self.generation,
            selection: self.selection().cloned().unwrap_or_default(),
            slots: self.slots().map_or(SlotKinds::empty(), SceneSlots::kinds),
            designer: self.designer,
            focused: self.hotspots.focused().cloned(),
            pose: self.camera.pose(),
            animating: self.tween.is_some(),
        });
    }

    fn stop_background(&mut self) {
        if let Some(mut beacon) = self.beacon.take() {
            beacon.stop();
        }
        if let Some(task) = self.loading.take() {
            task.abort();
        }
    }
}
