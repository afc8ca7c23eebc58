//! Away-mode state: a toggle plus a per-sender notification ledger.
//!
//! While enabled, the dispatcher auto-replies to non-command messages
//! from other senders, once per sender per away period, so a chatty
//! contact is not spammed. The ledger resets every time away mode is
//! re-enabled.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub struct AwayState {
    enabled: AtomicBool,
    notified: Mutex<HashSet<String>>,
    message: String,
}

impl AwayState {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            notified: Mutex::new(HashSet::new()),
            message: message.into(),
        }
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        self.notified.lock().expect("away lock poisoned").clear();
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// True the first time a sender should be notified in the current
    /// away period.
    pub fn should_notify(&self, sender: &str) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.notified
            .lock()
            .expect("away lock poisoned")
            .insert(sender.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_by_default() {
        let away = AwayState::new("later");
        assert!(!away.should_notify("alice"));
    }

    #[test]
    fn notifies_each_sender_once() {
        let away = AwayState::new("later");
        away.enable();
        assert!(away.should_notify("alice"));
        assert!(!away.should_notify("alice"));
        assert!(away.should_notify("bob"));
    }

    #[test]
    fn reenabling_resets_the_ledger() {
        let away = AwayState::new("later");
        away.enable();
        assert!(away.should_notify("alice"));
        away.disable();
        away.enable();
        assert!(away.should_notify("alice"));
    }
}
