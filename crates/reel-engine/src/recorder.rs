//! Recording state machine and signal dispatcher.
//!
//! The [`Recorder`] owns the text buffer and reacts to one [`Signal`] at a
//! time. The popup monitor runs beside it as a separate task and shares the
//! session and the bridge; it learns about pause and finish through a
//! `watch` channel.

use crate::action_log::TextBuffer;
use crate::bridge::BrowserBridge;
use crate::codegen::{self, CodegenError};
use crate::config::ReelConfig;
use crate::error::RecorderError;
use crate::formatter::display_text;
use crate::input::{Key, Signal};
use crate::popup::{self, MonitorExit, PopupMonitor};
use crate::session::Session;
use crate::storage::SessionStore;
use crate::synthesizer;
use reel_common::{ActionKind, ElementDescriptor, ElementSnapshot, SessionRecord};
use reel_scanner::ELEMENT_PROBE_JS;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Paused,
    Finished,
}

/// Artifacts of a finished session.
#[derive(Debug)]
pub struct RecordingOutcome {
    pub record: SessionRecord,
    pub record_path: PathBuf,
    /// `None` when the session never navigated anywhere.
    pub script_path: Option<PathBuf>,
}

pub struct Recorder {
    config: ReelConfig,
    bridge: BrowserBridge,
    session: Arc<Session>,
    store: SessionStore,
    state: watch::Sender<RecorderState>,
    buffer: TextBuffer,
    last_clicked: Option<ElementDescriptor>,
    monitor: Option<JoinHandle<MonitorExit>>,
}

impl Recorder {
    pub fn new(config: ReelConfig, bridge: BrowserBridge) -> Self {
        let session = Session::new(config.recording.output_dir.clone());
        Self::with_session(config, bridge, session)
    }

    pub fn with_session(config: ReelConfig, bridge: BrowserBridge, session: Session) -> Self {
        let store = SessionStore::new(session.output_dir());
        let (state, _) = watch::channel(RecorderState::Idle);
        Self {
            config,
            bridge,
            session: Arc::new(session),
            store,
            state,
            buffer: TextBuffer::new(),
            last_clicked: None,
            monitor: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RecorderState> {
        self.state.subscribe()
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Text typed since the last commit event.
    pub fn pending_text(&self) -> &str {
        self.buffer.as_str()
    }

    /// Open `url` and begin recording.
    ///
    /// Navigation failure is fatal: the browser is released and nothing is
    /// written to disk.
    pub async fn start(&mut self, url: &str) -> Result<(), RecorderError> {
        let state = self.state();
        if state != RecorderState::Idle {
            return Err(RecorderError::NotIdle(state));
        }

        tokio::fs::create_dir_all(self.session.output_dir()).await?;

        info!("Navigating to {}", url);
        if let Err(e) = self.bridge.navigate(url).await {
            self.state.send_replace(RecorderState::Finished);
            self.bridge.shutdown().await;
            return Err(e.into());
        }

        let id = self.session.record(ActionKind::Navigate {
            url: url.to_string(),
        });
        info!(action = id, session = self.session.id(), "Recording started");
        self.session.capture_screenshot(&self.bridge, "start").await;

        self.state.send_replace(RecorderState::Recording);
        let monitor = PopupMonitor::new(
            self.session.clone(),
            self.bridge.clone(),
            self.state.subscribe(),
            self.config.recording.popup_poll_interval(),
        );
        self.monitor = Some(monitor.spawn());
        Ok(())
    }

    /// React to one signal. Returns the outcome once the session finished.
    pub async fn handle(&mut self, signal: Signal) -> Result<Option<RecordingOutcome>, RecorderError> {
        let state = self.state();
        if state == RecorderState::Finished {
            debug!("Ignoring {:?} after finish", signal);
            return Ok(None);
        }

        match signal {
            Signal::Finish => return self.finish().await.map(Some),
            Signal::Toggle => self.toggle(state),
            _ if state != RecorderState::Recording => {
                debug!("Ignoring {:?} while {:?}", signal, state);
            }
            Signal::Click => self.on_click().await,
            Signal::Key(key) => self.on_key(key).await,
            Signal::Screenshot => {
                if let Some(path) = self.session.capture_screenshot(&self.bridge, "manual").await {
                    info!("Manual screenshot: {}", path.display());
                }
            }
            Signal::PopupCheck => self.check_popups().await,
        }
        Ok(None)
    }

    fn toggle(&mut self, state: RecorderState) {
        let next = match state {
            RecorderState::Recording => RecorderState::Paused,
            RecorderState::Paused => RecorderState::Recording,
            other => {
                debug!("Toggle ignored while {:?}", other);
                return;
            }
        };
        self.state.send_replace(next);
        match next {
            RecorderState::Paused => info!("Recording paused"),
            _ => info!("Recording resumed"),
        }
    }

    async fn on_click(&mut self) {
        tokio::time::sleep(self.config.recording.click_settle()).await;

        let Some(element) = self.probe_element().await else {
            warn!("Could not identify clicked element, skipping");
            return;
        };

        self.flush_text().await;
        info!(
            "Click on <{}> with {} selectors",
            element.describe(),
            element.selectors.len()
        );
        self.last_clicked = Some(element.clone());
        let id = self.session.record(ActionKind::Click { element });
        debug!(action = id, "Click recorded");

        let tag = format!("click_{}", self.session.log().len());
        self.session.capture_screenshot(&self.bridge, &tag).await;
    }

    async fn on_key(&mut self, key: Key) {
        match key {
            Key::Control => {}
            Key::Space => {
                self.prepare_target().await;
                self.buffer.push_space();
            }
            Key::Char(c) => {
                self.prepare_target().await;
                self.buffer.push(c);
            }
            Key::Backspace => self.buffer.backspace(),
            Key::Enter => {
                self.flush_text().await;
                let id = self.session.record(ActionKind::Enter);
                info!(action = id, "Enter pressed");
            }
        }
    }

    /// Resolve the element typed text belongs to when the first character
    /// enters an empty buffer.
    async fn prepare_target(&mut self) {
        if self.buffer.is_empty() && self.buffer.target().is_none() {
            let target = match self.probe_element().await {
                Some(focused) => Some(focused),
                None => self.last_clicked.clone(),
            };
            match target {
                Some(target) => self.buffer.set_target(target),
                None => debug!("No focused element for typed text yet"),
            }
        }
    }

    /// Commit pending text as one `TypeText` action.
    async fn flush_text(&mut self) {
        let text = self.buffer.as_str().to_owned();
        let target = self.buffer.target().cloned();

        let Some(id) = self.buffer.flush(self.session.log()) else {
            return;
        };
        if let Some(target) = &target {
            info!(
                action = id,
                "Typed '{}' into <{}>",
                display_text(&text, target, &self.config.security),
                target.describe()
            );
        }

        let tag = format!("text_{}", self.session.log().len());
        self.session.capture_screenshot(&self.bridge, &tag).await;
    }

    async fn check_popups(&mut self) {
        match popup::count_popups(&self.bridge).await {
            Some(0) => info!("No popups visible"),
            Some(count) => {
                let record = popup::describe_popup(&self.bridge).await;
                let id = self.session.record_popup(record);
                info!(action = id, "{} popup(s) visible", count);
                self.session
                    .capture_screenshot(&self.bridge, "popup_manual")
                    .await;
            }
            None => warn!("Popup check failed"),
        }
    }

    async fn probe_element(&self) -> Option<ElementDescriptor> {
        let snapshot = self
            .bridge
            .evaluate_as::<ElementSnapshot>(ELEMENT_PROBE_JS)
            .await?;
        synthesizer::describe(&snapshot)
    }

    /// Stop recording, persist the session and its replay script, and
    /// release the browser. The browser is released even when persisting fails.
    pub async fn finish(&mut self) -> Result<RecordingOutcome, RecorderError> {
        let outcome = self.persist().await;

        self.bridge.shutdown().await;
        if let Some(monitor) = self.monitor.take() {
            monitor.abort();
        }
        outcome
    }

    async fn persist(&mut self) -> Result<RecordingOutcome, RecorderError> {
        self.flush_text().await;
        self.state.send_replace(RecorderState::Finished);

        let record = self.session.finalize()?;
        info!(
            "Session {} finished: {} actions, {} popups",
            record.session_id,
            record.total_actions,
            record.detected_popups.len()
        );

        let record_path = self.store.save_record(&record).await?;
        info!("Session record saved: {}", record_path.display());

        let script_path = match codegen::generate(&record, &self.config.replay) {
            Ok(script) => {
                let path = self.store.save_script(&record.session_id, &script).await?;
                info!("Automation script saved: {}", path.display());
                Some(path)
            }
            Err(e @ CodegenError::MissingNavigate(_)) => {
                warn!("No script generated: {}", e);
                None
            }
        };

        Ok(RecordingOutcome {
            record,
            record_path,
            script_path,
        })
    }

    /// Dispatch signals until the operator finishes. A closed signal channel
    /// or Ctrl+C counts as finish.
    pub async fn run(
        mut self,
        mut signals: mpsc::UnboundedReceiver<Signal>,
    ) -> Result<RecordingOutcome, RecorderError> {
        loop {
            let signal = tokio::select! {
                signal = signals.recv() => signal.unwrap_or(Signal::Finish),
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Ctrl+C handler failed: {}", e);
                    }
                    info!("Interrupted, finishing recording");
                    Signal::Finish
                }
            };

            if let Some(outcome) = self.handle(signal).await? {
                return Ok(outcome);
            }
        }
    }
}
