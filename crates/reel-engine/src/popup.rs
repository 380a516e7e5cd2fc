//! Popup Monitor: polls the page for new overlays while recording.
//!
//! The monitor only sees a count. When several overlays appear within one
//! tick it cannot tell which are new, so every action of that tick carries
//! the descriptor of the most recently matched overlay.

use crate::bridge::BrowserBridge;
use crate::recorder::RecorderState;
use crate::session::Session;
use reel_common::PopupRecord;
use reel_scanner::{POPUP_COUNT_JS, POPUP_INFO_JS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Why the monitor loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorExit {
    /// Recording finished (or the state channel closed).
    Finished,
    /// The popup counter could not be evaluated; detection stops for the
    /// rest of the session.
    CounterFailed,
}

#[derive(Debug, thiserror::Error)]
#[error("Popup counter returned no usable value")]
pub struct CounterFailed;

pub struct PopupMonitor {
    session: Arc<Session>,
    bridge: BrowserBridge,
    state: watch::Receiver<RecorderState>,
    interval: Duration,
    previous: u64,
    rebaseline: bool,
}

impl PopupMonitor {
    pub fn new(
        session: Arc<Session>,
        bridge: BrowserBridge,
        state: watch::Receiver<RecorderState>,
        interval: Duration,
    ) -> Self {
        Self {
            session,
            bridge,
            state,
            interval,
            previous: 0,
            rebaseline: false,
        }
    }

    pub fn spawn(self) -> JoinHandle<MonitorExit> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) -> MonitorExit {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let state = *self.state.borrow();
            match state {
                RecorderState::Finished => return MonitorExit::Finished,
                RecorderState::Idle | RecorderState::Paused => {
                    // Overlays opened while paused are not the operator's recorded flow.
                    self.rebaseline = true;
                    continue;
                }
                RecorderState::Recording => {}
            }

            if let Err(e) = self.poll().await {
                warn!("Popup monitor stopped: {}", e);
                return MonitorExit::CounterFailed;
            }
        }
    }

    /// Run one detection pass and return how many popups were recorded.
    pub async fn poll(&mut self) -> Result<u64, CounterFailed> {
        let Some(count) = count_popups(&self.bridge).await else {
            self.previous = 0;
            return Err(CounterFailed);
        };

        if self.rebaseline {
            debug!("Popup count re-baselined at {}", count);
            self.rebaseline = false;
            self.previous = count;
            return Ok(0);
        }

        let delta = count.saturating_sub(self.previous);
        self.previous = count;
        if delta == 0 {
            return Ok(0);
        }

        let popup = describe_popup(&self.bridge).await;
        let tag = format!("popup_{}", count);
        for _ in 0..delta {
            let id = self.session.record_popup(popup.clone());
            info!(action = id, "Popup detected #{} ({})", count, popup.tag);
            self.session.capture_screenshot(&self.bridge, &tag).await;
        }
        Ok(delta)
    }
}

/// Number of visible overlays, or `None` when the counter failed.
pub async fn count_popups(bridge: &BrowserBridge) -> Option<u64> {
    let value = bridge.evaluate(POPUP_COUNT_JS).await?;
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
}

/// Signature of the most recently matched overlay.
pub async fn describe_popup(bridge: &BrowserBridge) -> PopupRecord {
    bridge
        .evaluate_as::<PopupRecord>(POPUP_INFO_JS)
        .await
        .unwrap_or_else(PopupRecord::unknown)
}
