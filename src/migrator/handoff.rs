//! One-slot rendezvous between the fetch loop and the receipt consumer.
//!
//! The producer parks a value in the slot and waits until a consumer takes
//! it, so it never runs more than one batch ahead. Consumers never wait.
//! Closing is permanent and discards a staged value that was not taken.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::Notify;

/// Why a value could not be handed over
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandoffError {
    #[error("hand-off is closed")]
    Closed,
    #[error("hand-off was cancelled before the value was taken")]
    Cancelled,
}

#[derive(Debug)]
struct Slot<T> {
    pending: Option<T>,
    closed: bool,
}

/// Single-producer rendezvous slot.
#[derive(Debug)]
pub struct Handoff<T> {
    slot: Mutex<Slot<T>>,
    taken: Notify,
}

impl<T> Handoff<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                pending: None,
                closed: false,
            }),
            taken: Notify::new(),
        }
    }

    /// Takes the staged value without waiting.
    ///
    /// Returns `None` when nothing is staged or the hand-off is closed.
    pub fn try_take(&self) -> Option<T> {
        let value = {
            let mut slot = self.slot.lock();
            if slot.closed {
                return None;
            }
            slot.pending.take()
        };

        if value.is_some() {
            self.taken.notify_one();
        }
        value
    }

    /// Stages `value` and waits until a consumer has taken it.
    ///
    /// If `cancel` completes first, the hand-off is closed and the value is
    /// dropped. Only one task may put at a time.
    pub async fn put<F>(&self, value: T, mut cancel: Pin<&mut F>) -> Result<(), HandoffError>
    where
        F: Future<Output = ()> + ?Sized,
    {
        {
            let mut slot = self.slot.lock();
            if slot.closed {
                return Err(HandoffError::Closed);
            }
            debug_assert!(slot.pending.is_none(), "concurrent producers on hand-off");
            slot.pending = Some(value);
        }

        loop {
            {
                let slot = self.slot.lock();
                if slot.closed {
                    return Err(HandoffError::Closed);
                }
                if slot.pending.is_none() {
                    return Ok(());
                }
            }

            // notify_one stores a permit, so a take between the check above
            // and this await is not lost
            tokio::select! {
                biased;
                _ = self.taken.notified() => {}
                _ = cancel.as_mut() => {
                    self.close();
                    return Err(HandoffError::Cancelled);
                }
            }
        }
    }

    /// Permanently closes the hand-off, dropping any staged value.
    pub fn close(&self) {
        let dropped = {
            let mut slot = self.slot.lock();
            slot.closed = true;
            slot.pending.take()
        };
        drop(dropped);
        self.taken.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }
}

impl<T> Default for Handoff<T> {
    fn default() -> Self {
        Self::new()
    }
}
