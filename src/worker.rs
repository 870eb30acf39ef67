//! Background worker that throttles save triggers and runs executions one at
//! a time.
//!
//! Trailing-edge throttle: a trigger arriving while the cooldown window is
//! closed runs immediately and opens the window; triggers arriving inside the
//! window collapse into a single pending execution that fires when the window
//! elapses, carrying the latest arguments. Executions run inline on this task,
//! so two saves can never interleave.

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, Instant};

use crate::dom::DomAccess;
use crate::error::Result;
use crate::host::Host;
use crate::pipeline::SavePipeline;

pub(crate) enum Command {
    /// Throttled full save.
    Save {
        auto_save: bool,
        done: oneshot::Sender<Result<bool>>,
    },
    /// Unthrottled autosave (permission/readiness gated, no HTML export).
    SaveNow { done: oneshot::Sender<Result<bool>> },
    /// External dirty signal from the block-tree side.
    MarkUnsaved,
}

/// The single pending trailing execution. Later triggers overwrite the
/// arguments; every caller that was coalesced resolves with the one outcome.
struct PendingSave {
    auto_save: bool,
    waiters: Vec<oneshot::Sender<Result<bool>>>,
}

impl PendingSave {
    fn first(auto_save: bool, done: oneshot::Sender<Result<bool>>) -> Self {
        Self {
            auto_save,
            waiters: vec![done],
        }
    }

    fn absorb(&mut self, auto_save: bool, done: oneshot::Sender<Result<bool>>) {
        self.auto_save = auto_save;
        self.waiters.push(done);
    }

    fn resolve(self, outcome: &Result<bool>) {
        for waiter in self.waiters {
            let _ = waiter.send(outcome.clone());
        }
    }
}

pub(crate) async fn run<H: Host, D: DomAccess>(
    mut rx: mpsc::Receiver<Command>,
    mut shutdown_rx: oneshot::Receiver<()>,
    pipeline: SavePipeline<H, D>,
    throttle_window: Duration,
) {
    let mut cooldown_until: Option<Instant> = None;
    let mut pending: Option<PendingSave> = None;

    loop {
        let trailing_at = cooldown_until
            .filter(|_| pending.is_some())
            .unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400));

        tokio::select! {
            biased;

            _ = &mut shutdown_rx => {
                tracing::info!("shutdown signal received, draining save triggers");
                rx.close();
                while let Some(cmd) = rx.recv().await {
                    match cmd {
                        Command::Save { auto_save, done } => match &mut pending {
                            Some(p) => p.absorb(auto_save, done),
                            None => pending = Some(PendingSave::first(auto_save, done)),
                        },
                        Command::SaveNow { done } => {
                            let _ = done.send(pipeline.execute_autosave().await);
                        }
                        Command::MarkUnsaved => pipeline.mark_unsaved(),
                    }
                }
                // Flush the coalesced trigger so no caller loses its save.
                if let Some(p) = pending.take() {
                    let outcome = pipeline.execute(p.auto_save).await;
                    p.resolve(&outcome);
                }
                tracing::info!("save worker shut down");
                return;
            }

            // A due trailing run takes priority over newly arriving triggers.
            () = time::sleep_until(trailing_at), if pending.is_some() => {
                if let Some(p) = pending.take() {
                    cooldown_until = Some(Instant::now() + throttle_window);
                    let outcome = pipeline.execute(p.auto_save).await;
                    p.resolve(&outcome);
                }
            }

            Some(cmd) = rx.recv() => match cmd {
                Command::Save { auto_save, done } => {
                    let now = Instant::now();
                    if cooldown_until.is_some_and(|until| now < until) {
                        match &mut pending {
                            Some(p) => p.absorb(auto_save, done),
                            None => pending = Some(PendingSave::first(auto_save, done)),
                        }
                    } else {
                        cooldown_until = Some(now + throttle_window);
                        let outcome = pipeline.execute(auto_save).await;
                        let _ = done.send(outcome);
                    }
                }
                Command::SaveNow { done } => {
                    let _ = done.send(pipeline.execute_autosave().await);
                }
                Command::MarkUnsaved => pipeline.mark_unsaved(),
            },
        }
    }
}
