//! Process-wide change signals for the simulated alert log.
//!
//! Signals carry no state. Subscribers re-read the store when one arrives,
//! so a lagged receiver only needs to reload once.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// A change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSignal {
    /// A simulated alert was recorded.
    AlertSimulated,
    /// The simulated log was cleared.
    AlertsCleared,
}

/// Broadcast channel for [`AlertSignal`]s.
///
/// Cloning shares the channel. Dropping a receiver unsubscribes it.
#[derive(Debug, Clone)]
pub struct AlertSignals {
    sender: broadcast::Sender<AlertSignal>,
}

impl AlertSignals {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender }
    }

    /// Send a signal to every current subscriber.
    ///
    /// Returns the number of subscribers notified.
    pub fn notify(&self, signal: AlertSignal) -> usize {
        self.sender.send(signal).unwrap_or(0)
    }

    /// Subscribe to signals sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertSignal> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AlertSignals {
    fn default() -> Self {
        Self::new()
    }
}
