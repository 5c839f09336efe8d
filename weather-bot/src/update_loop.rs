//! Long-poll update loop: pull a batch, advance the cursor, dispatch events one by one.
//!
//! The cursor moves past a batch before its first event is handled, so a running loop hands
//! each update to the dispatcher once and never retries a failed handler. The platform only
//! learns the new offset from the next `getUpdates`: [`UpdateLoop::run`] sends a final
//! zero-timeout poll on shutdown, while a process killed mid-batch gets that batch again on
//! restart (at-least-once across crashes).

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};
use wbot_core::{Messenger, Update, WbotError};

use crate::cursor::Cursor;
use crate::dispatcher::Dispatcher;

#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Long-poll wait passed to `getUpdates`.
    pub poll_timeout_secs: u32,
    /// Pause after a batch in which some event failed.
    pub error_backoff: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            error_backoff: Duration::from_secs(2),
        }
    }
}

/// What happened to one pulled batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub received: usize,
    pub handled: usize,
    pub failed: usize,
}

pub struct UpdateLoop {
    messenger: Arc<dyn Messenger>,
    dispatcher: Dispatcher,
    cursor: Cursor,
    /// Highest offset the platform has acknowledged through a completed `getUpdates`.
    confirmed: i64,
    settings: LoopSettings,
}

impl UpdateLoop {
    pub fn new(messenger: Arc<dyn Messenger>, dispatcher: Dispatcher, settings: LoopSettings) -> Self {
        Self {
            messenger,
            dispatcher,
            cursor: Cursor::default(),
            confirmed: 0,
            settings,
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs until `shutdown` turns true or its sender is dropped. The signal is observed while
    /// waiting on the long poll and on the error backoff; a batch in progress is finished first.
    /// Before returning, the cursor is confirmed to the platform.
    #[instrument(skip(self, shutdown))]
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_timeout_secs = self.settings.poll_timeout_secs,
            "Update loop started"
        );
        let messenger = Arc::clone(&self.messenger);

        loop {
            if *shutdown.borrow() {
                break;
            }

            let offset = self.cursor.offset();
            let updates = tokio::select! {
                updates = messenger.get_updates(offset, self.settings.poll_timeout_secs) => updates,
                _ = shutdown.changed() => break,
            };
            self.confirmed = self.confirmed.max(offset);

            let outcome = self.process_batch(updates).await;
            if outcome.failed > 0 {
                warn!(
                    failed = outcome.failed,
                    backoff_ms = self.settings.error_backoff.as_millis() as u64,
                    "Batch had failures, backing off"
                );
                tokio::select! {
                    _ = tokio::time::sleep(self.settings.error_backoff) => {}
                    _ = shutdown.changed() => break,
                }
            }
        }

        self.confirm_offset().await;
        info!(offset = self.cursor.offset(), "Update loop stopped");
    }

    /// One pull-and-dispatch round.
    pub async fn poll_once(&mut self) -> BatchOutcome {
        let offset = self.cursor.offset();
        let updates = self
            .messenger
            .get_updates(offset, self.settings.poll_timeout_secs)
            .await;
        self.confirmed = self.confirmed.max(offset);
        self.process_batch(updates).await
    }

    /// Sends the cursor with a zero-timeout `getUpdates` unless the platform already has it.
    /// Updates it returns are left unhandled and come back on the next start.
    pub async fn confirm_offset(&mut self) {
        let offset = self.cursor.offset();
        if offset <= self.confirmed {
            return;
        }
        let pending = self.messenger.get_updates(offset, 0).await;
        self.confirmed = offset;
        info!(
            offset,
            pending = pending.len(),
            "Offset confirmed"
        );
    }

    /// Advances the cursor past `updates`, then dispatches each event in order. Handler errors
    /// and panics are logged and counted; they never stop the batch.
    pub async fn process_batch(&mut self, updates: Vec<Update>) -> BatchOutcome {
        let mut outcome = BatchOutcome {
            received: updates.len(),
            ..Default::default()
        };
        if updates.is_empty() {
            return outcome;
        }

        self.cursor.advance_past(&updates);
        debug!(
            count = updates.len(),
            offset = self.cursor.offset(),
            "Cursor advanced"
        );

        for update in updates {
            let update_id = update.id;
            let Some(event) = update.event else {
                debug!(update_id, "Skipping unsupported update");
                continue;
            };

            match AssertUnwindSafe(self.dispatcher.handle(event))
                .catch_unwind()
                .await
            {
                Ok(Ok(())) => outcome.handled += 1,
                Ok(Err(e)) => {
                    error!(update_id, error = %e, "Failed to handle update");
                    outcome.failed += 1;
                }
                Err(panic) => {
                    let e = WbotError::Panic(panic_message(panic.as_ref()));
                    error!(update_id, error = %e, "Failed to handle update");
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
