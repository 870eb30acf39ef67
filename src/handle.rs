//! Handles for triggering saves and controlling the background worker.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::error::{Result, SaveError};
use crate::host::Host;
use crate::page::ImageFile;
use crate::status::SaveStatus;
use crate::worker::Command;

/// Primary handle returned by
/// [`PageSaverBuilder::build`](crate::PageSaverBuilder::build).
///
/// Owns the shutdown signal and the worker task join handle. Use
/// [`save_page`](Self::save_page) to trigger throttled saves and
/// [`shutdown`](Self::shutdown) to gracefully stop the worker, flushing any
/// coalesced trigger that is still pending.
///
/// For sharing across multiple tasks, obtain a lightweight
/// [`PageSaverSender`] via [`sender`](Self::sender).
pub struct PageSaverHandle<H: Host> {
    host: Arc<H>,
    sender: mpsc::Sender<Command>,
    status: watch::Receiver<SaveStatus>,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl<H: Host> PageSaverHandle<H> {
    pub(crate) fn new(
        host: Arc<H>,
        sender: mpsc::Sender<Command>,
        status: watch::Receiver<SaveStatus>,
        shutdown: oneshot::Sender<()>,
        worker: JoinHandle<()>,
    ) -> Self {
        Self {
            host,
            sender,
            status,
            shutdown: Some(shutdown),
            worker: Some(worker),
        }
    }

    /// Trigger a throttled save and wait for it to complete.
    ///
    /// The first trigger in a quiet period executes immediately; triggers
    /// inside the cooldown window coalesce into one trailing execution, and
    /// every coalesced caller resolves with that execution's outcome --
    /// `Ok(true)` on success, the propagated error when the HTML export or
    /// the host sink fails.
    pub async fn save_page(&self, auto_save: bool) -> Result<bool> {
        let (done, outcome) = oneshot::channel();
        self.sender
            .try_send(Command::Save { auto_save, done })
            .map_err(|_| SaveError::ChannelClosed)?;
        outcome.await.map_err(|_| SaveError::ChannelClosed)?
    }

    /// Trigger a throttled save without waiting for the outcome, logging a
    /// queueing failure instead of returning it.
    pub fn save_page_detached(&self, auto_save: bool) {
        let (done, _outcome) = oneshot::channel();
        if self
            .sender
            .try_send(Command::Save { auto_save, done })
            .is_err()
        {
            tracing::error!("failed to queue save trigger: channel closed or full");
        }
    }

    /// Fire an autosave, bypassing the throttle and the HTML export.
    ///
    /// Gated on the host's `save_page` permission and page-loaded flag; when
    /// either guard fails this is a silent no-op resolving `Ok(false)`.
    pub async fn save_page_async(&self) -> Result<bool> {
        let (done, outcome) = oneshot::channel();
        self.sender
            .try_send(Command::SaveNow { done })
            .map_err(|_| SaveError::ChannelClosed)?;
        outcome.await.map_err(|_| SaveError::ChannelClosed)?
    }

    /// Signal that the block tree changed: any state moves to
    /// [`Unsaved`](SaveStatus::Unsaved).
    pub fn mark_unsaved(&self) {
        if self.sender.try_send(Command::MarkUnsaved).is_err() {
            tracing::warn!("failed to queue dirty signal: channel closed or full");
        }
    }

    /// Upload an image through the host. Independent of the save sequence.
    pub async fn upload_image(&self, file: ImageFile) -> Result<String> {
        self.host.upload_image(file).await
    }

    /// The current save status.
    pub fn save_state(&self) -> SaveStatus {
        *self.status.borrow()
    }

    /// Subscribe to save-status transitions.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Create a lightweight, cloneable [`PageSaverSender`] that shares the
    /// same underlying channel.
    pub fn sender(&self) -> PageSaverSender {
        PageSaverSender {
            sender: self.sender.clone(),
            status: self.status.clone(),
        }
    }

    /// Gracefully shut down the background worker.
    ///
    /// Sends a shutdown signal, waits for the worker to drain queued triggers
    /// and run any pending trailing save, then returns.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }
    }
}

/// Lightweight, cloneable sender for triggering saves from multiple tasks.
///
/// Obtained via [`PageSaverHandle::sender`]. Does **not** own the shutdown
/// signal or the worker join handle -- dropping all senders will not stop the
/// worker.
#[derive(Clone)]
pub struct PageSaverSender {
    sender: mpsc::Sender<Command>,
    status: watch::Receiver<SaveStatus>,
}

impl PageSaverSender {
    /// Trigger a throttled save and wait for it to complete.
    pub async fn save_page(&self, auto_save: bool) -> Result<bool> {
        let (done, outcome) = oneshot::channel();
        self.sender
            .try_send(Command::Save { auto_save, done })
            .map_err(|_| SaveError::ChannelClosed)?;
        outcome.await.map_err(|_| SaveError::ChannelClosed)?
    }

    /// Trigger a throttled save without waiting, logging queueing failures.
    pub fn save_page_detached(&self, auto_save: bool) {
        let (done, _outcome) = oneshot::channel();
        if self
            .sender
            .try_send(Command::Save { auto_save, done })
            .is_err()
        {
            tracing::error!("failed to queue save trigger: channel closed or full");
        }
    }

    /// Fire an autosave, bypassing the throttle and the HTML export.
    pub async fn save_page_async(&self) -> Result<bool> {
        let (done, outcome) = oneshot::channel();
        self.sender
            .try_send(Command::SaveNow { done })
            .map_err(|_| SaveError::ChannelClosed)?;
        outcome.await.map_err(|_| SaveError::ChannelClosed)?
    }

    /// Signal that the block tree changed.
    pub fn mark_unsaved(&self) {
        if self.sender.try_send(Command::MarkUnsaved).is_err() {
            tracing::warn!("failed to queue dirty signal: channel closed or full");
        }
    }

    /// The current save status.
    pub fn save_state(&self) -> SaveStatus {
        *self.status.borrow()
    }
}
