//! The save-status register: a single-writer observable value that mirrors
//! every transition to the host.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Current persistence state of the edited page.
///
/// There is exactly one current value per saver instance. It starts at
/// [`Saved`](Self::Saved), moves to [`Saving`](Self::Saving) synchronously
/// when a save execution begins, and back to [`Saved`](Self::Saved) after the
/// sink resolves plus a short settle delay. [`Unsaved`](Self::Unsaved) is fired
/// externally whenever the block tree changes, and is also where a failed save
/// lands: a rejected sink leaves the page dirty, not stuck mid-save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaveStatus {
    /// All edits have been handed to the host sink.
    Saved,
    /// A save execution is in flight.
    Saving,
    /// The block tree has changed since the last completed save.
    Unsaved,
}

impl SaveStatus {
    /// The wire form of the status: `"SAVED"`, `"SAVING"` or `"UNSAVED"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "SAVED",
            Self::Saving => "SAVING",
            Self::Unsaved => "UNSAVED",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of the status value. Held by the pipeline, which is the only writer;
/// everyone else observes through a [`watch::Receiver`] obtained at build time.
pub(crate) struct StatusRegister {
    current: watch::Sender<SaveStatus>,
    notify: Box<dyn Fn(SaveStatus) + Send + Sync>,
}

impl StatusRegister {
    pub(crate) fn new(notify: impl Fn(SaveStatus) + Send + Sync + 'static) -> Self {
        let (current, _) = watch::channel(SaveStatus::Saved);
        Self {
            current,
            notify: Box::new(notify),
        }
    }

    /// Record a transition and mirror it to the host notification callback.
    pub(crate) fn set(&self, status: SaveStatus) {
        tracing::debug!("save state -> {status}");
        self.current.send_replace(status);
        (self.notify)(status);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn status_wire_strings() {
        assert_eq!(SaveStatus::Saved.as_str(), "SAVED");
        assert_eq!(SaveStatus::Saving.as_str(), "SAVING");
        assert_eq!(SaveStatus::Unsaved.to_string(), "UNSAVED");
    }

    #[test]
    fn status_serializes_to_wire_form() {
        let json = serde_json::to_string(&SaveStatus::Saving).unwrap();
        assert_eq!(json, r#""SAVING""#);
        let back: SaveStatus = serde_json::from_str(r#""UNSAVED""#).unwrap();
        assert_eq!(back, SaveStatus::Unsaved);
    }

    #[test]
    fn register_starts_saved() {
        let register = StatusRegister::new(|_| {});
        assert_eq!(*register.subscribe().borrow(), SaveStatus::Saved);
    }

    #[test]
    fn register_notifies_every_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let register = StatusRegister::new(move |status| sink.lock().unwrap().push(status));

        register.set(SaveStatus::Saving);
        register.set(SaveStatus::Saved);
        register.set(SaveStatus::Unsaved);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![SaveStatus::Saving, SaveStatus::Saved, SaveStatus::Unsaved]
        );
        assert_eq!(*register.subscribe().borrow(), SaveStatus::Unsaved);
    }

    #[test]
    fn subscribers_observe_the_current_value() {
        let register = StatusRegister::new(|_| {});
        let rx = register.subscribe();
        register.set(SaveStatus::Saving);
        assert_eq!(*rx.borrow(), SaveStatus::Saving);
    }
}
