use std::fmt::Display;
use std::time::Duration;

use futures::{Sink, SinkExt};
use log::trace;
use rand::Rng;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::time;

use crate::message::TelemetrySample;
use crate::simulate::SessionState;

/// Failures that end a session early.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to encode sample: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("transport send failed: {0}")]
    Send(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Streaming,
    Closed,
}

/// Why the streaming loop stopped.
#[derive(Debug)]
pub enum CloseReason {
    /// Stop signal fired: the peer went away. Normal termination.
    PeerDisconnected,
    Failed(SessionError),
    /// `run` was called on a session that had already closed; nothing was sent.
    AlreadyClosed,
}

#[derive(Debug)]
pub struct SessionSummary {
    pub device_id: String,
    pub sent:      u64,
    pub reason:    CloseReason,
}

/// One streaming connection: its random-walk state, its own RNG and the
/// delay applied after every send.
pub struct TelemetrySession<R> {
    device_id: String,
    state:     SessionState,
    rng:       R,
    interval:  Duration,
    phase:     SessionPhase,
    sent:      u64,
}

impl<R: Rng> TelemetrySession<R> {
    pub fn new(device_id: &str, mut rng: R, interval: Duration) -> Self {
        let state = SessionState::seed(&mut rng);
        Self {
            device_id: device_id.to_owned(),
            state,
            rng,
            interval,
            phase: SessionPhase::Initializing,
            sent: 0,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Messages successfully handed to the sink so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Advance the walk by one tick and build the sample to send.
    pub fn tick(&mut self) -> TelemetrySample {
        self.state.advance(&mut self.rng);
        self.state.sample(&self.device_id, &mut self.rng)
    }

    /// Stream samples into `sink` until `stop` fires (or its sender is
    /// dropped) or a send fails.
    ///
    /// Never returns an error; the outcome is reported in the summary.
    /// `Closed` is terminal: a closed session returns at once without sending.
    pub async fn run<S>(&mut self, mut sink: S, mut stop: oneshot::Receiver<()>) -> SessionSummary
    where
        S: Sink<String> + Unpin,
        S::Error: Display,
    {
        if self.phase == SessionPhase::Closed {
            return SessionSummary {
                device_id: self.device_id.clone(),
                sent: self.sent,
                reason: CloseReason::AlreadyClosed,
            };
        }
        self.phase = SessionPhase::Streaming;

        let reason = loop {
            let payload = match self.tick().to_json() {
                Ok(payload) => payload,
                Err(e) => break CloseReason::Failed(e.into()),
            };
            trace!("{} <- {}", self.device_id, payload);

            tokio::select! {
                biased;
                _ = &mut stop => break CloseReason::PeerDisconnected,
                sent = sink.send(payload) => {
                    if let Err(e) = sent {
                        break CloseReason::Failed(SessionError::Send(e.to_string()));
                    }
                }
            }
            self.sent += 1;

            // sleep after send; processing and send time are not compensated
            tokio::select! {
                biased;
                _ = &mut stop => break CloseReason::PeerDisconnected,
                _ = time::sleep(self.interval) => {}
            }
        };

        self.phase = SessionPhase::Closed;
        SessionSummary {
            device_id: self.device_id.clone(),
            sent: self.sent,
            reason,
        }
    }
}
