use crate::error::AppError;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

/// Lifecycle of one call session, from dialing in to hang-up.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPhase {
    Connecting,
    Live,
    Stopping,
    Ended,
}

pub struct PhaseManager {
    phase: Arc<RwLock<SessionPhase>>,
    phase_tx: Sender<SessionPhase>,
    phase_rx: Receiver<SessionPhase>,
}

impl Default for PhaseManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseManager {
    pub fn new() -> Self {
        let (phase_tx, phase_rx) = crossbeam_channel::unbounded();
        Self {
            phase: Arc::new(RwLock::new(SessionPhase::Connecting)),
            phase_tx,
            phase_rx,
        }
    }

    pub fn transition(&self, new_phase: SessionPhase) -> Result<(), AppError> {
        let mut current = self.phase.write();

        // Validate phase transitions
        let valid = matches!(
            (&*current, &new_phase),
            (SessionPhase::Connecting, SessionPhase::Live)
                | (SessionPhase::Connecting, SessionPhase::Stopping)
                | (SessionPhase::Live, SessionPhase::Stopping)
                | (SessionPhase::Stopping, SessionPhase::Ended)
        );

        if !valid {
            return Err(AppError::Fatal(format!(
                "Invalid session phase transition: {:?} -> {:?}",
                *current, new_phase
            )));
        }

        tracing::info!("Session phase: {:?} -> {:?}", *current, new_phase);
        *current = new_phase.clone();
        let _ = self.phase_tx.send(new_phase);
        Ok(())
    }

    pub fn current(&self) -> SessionPhase {
        self.phase.read().clone()
    }

    pub fn subscribe(&self) -> Receiver<SessionPhase> {
        self.phase_rx.clone()
    }
}
