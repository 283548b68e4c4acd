//! Structural requests from outside the drag surface (toolbar buttons, menus).
//!
//! Senders can be cloned and handed to any number of controls. The editing
//! session owns the only receiver and drains it on its own turn; once the
//! session is torn down every send fails.

use crate::node::GroupKind;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use thiserror::Error;

/// A request to restructure the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StructureSignal {
    /// Wrap the selected siblings in a new container.
    Group { kind: GroupKind },
    /// Dissolve the selected container.
    Ungroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    #[error("Editing session has ended")]
    Closed,
}

/// Publishing half, held by toolbar controls.
#[derive(Debug, Clone)]
pub struct SignalSender(Sender<StructureSignal>);

impl SignalSender {
    pub fn send(&self, signal: StructureSignal) -> Result<(), SignalError> {
        self.0.send(signal).map_err(|_| SignalError::Closed)
    }

    pub fn group(&self, kind: GroupKind) -> Result<(), SignalError> {
        self.send(StructureSignal::Group { kind })
    }

    pub fn ungroup(&self) -> Result<(), SignalError> {
        self.send(StructureSignal::Ungroup)
    }
}

/// Subscribing half, owned by the editing session.
#[derive(Debug)]
pub struct SignalReceiver(Receiver<StructureSignal>);

impl SignalReceiver {
    /// Drain pending signals in the order they were sent (non-blocking).
    pub fn poll(&self) -> Vec<StructureSignal> {
        let mut signals = Vec::new();
        loop {
            match self.0.try_recv() {
                Ok(signal) => signals.push(signal),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        signals
    }
}

/// Create a connected sender/receiver pair.
pub fn signal_channel() -> (SignalSender, SignalReceiver) {
    let (tx, rx) = channel();
    (SignalSender(tx), SignalReceiver(rx))
}
