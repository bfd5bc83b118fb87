//! Mediator for the host's shared invoke channel.
//!
//! The host routes the completion of many of its own calls through a
//! single global handler. To observe the outcome of one `delete_rule` call
//! the pruner temporarily intercepts that handler:
//!
//! 1. [`InvokeSlot::install`] saves the current handler and installs a
//!    one-shot interceptor, synchronously, before the host call.
//! 2. On its first invocation the interceptor restores the saved handler,
//!    swaps in its own success callback and forwards the message to the
//!    saved handler.
//! 3. If the host never invokes it, dropping the returned [`Interception`]
//!    restores the saved handler, so a late host call cannot land in a
//!    stale interceptor.
//!
//! At most one interception may be outstanding at a time.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};

use crate::lock;

/// Callback the host calls when an invoked method completes.
pub type SuccessCallback = Box<dyn FnOnce(InvokeResponse) + Send>;

/// A handler occupying the invoke slot.
pub type InvokeHandler = Arc<dyn Fn(InvokeMessage) + Send + Sync>;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Completion payload delivered to a [`SuccessCallback`].
///
/// An empty `message` means the call succeeded; anything else is the
/// failure reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeResponse {
    #[serde(rename = "Message")]
    pub message: String,
}

impl InvokeResponse {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.message.is_empty()
    }
}

/// A request travelling through the invoke slot.
pub struct InvokeMessage {
    pub method: String,
    pub data: serde_json::Value,
    pub success: Option<SuccessCallback>,
}

impl InvokeMessage {
    pub fn new(method: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            data,
            success: None,
        }
    }

    pub fn with_success(mut self, callback: impl FnOnce(InvokeResponse) + Send + 'static) -> Self {
        self.success = Some(Box::new(callback));
        self
    }

    /// Complete the message, calling its success callback if it has one.
    pub fn respond(self, response: InvokeResponse) {
        if let Some(callback) = self.success {
            callback(response);
        }
    }
}

impl fmt::Debug for InvokeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeMessage")
            .field("method", &self.method)
            .field("data", &self.data)
            .field("success", &self.success.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// InvokeSlot
// ---------------------------------------------------------------------------

/// The single global invoke handler, with save/intercept/restore.
pub struct InvokeSlot {
    state: Mutex<SlotState>,
}

struct SlotState {
    current: InvokeHandler,
    saved: Option<SavedHandler>,
    next_id: u64,
}

struct SavedHandler {
    id: u64,
    original: InvokeHandler,
}

/// Errors from misusing the invoke slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeSlotError {
    /// Another interception has not been consumed or withdrawn yet.
    #[error("Invoke slot is already intercepted (interception #{0} outstanding)")]
    AlreadyInstalled(u64),
}

impl InvokeSlot {
    /// Create a slot occupied by the host's own handler.
    pub fn new(handler: InvokeHandler) -> Self {
        Self {
            state: Mutex::new(SlotState {
                current: handler,
                saved: None,
                next_id: 1,
            }),
        }
    }

    /// Host side: route a message through whatever handler is installed.
    ///
    /// The lock is released before the handler runs, so handlers may swap
    /// the slot themselves.
    pub fn invoke(&self, message: InvokeMessage) {
        let handler = Arc::clone(&lock(&self.state).current);
        handler(message);
    }

    /// Whether an interception is currently installed.
    pub fn is_intercepted(&self) -> bool {
        lock(&self.state).saved.is_some()
    }

    /// Install a one-shot interceptor that hands the next completion to
    /// `on_response`.
    ///
    /// Keep the returned [`Interception`] alive until the outcome is known;
    /// dropping it withdraws the interceptor if the host has not used it.
    pub fn install<F>(self: &Arc<Self>, on_response: F) -> Result<Interception, InvokeSlotError>
    where
        F: FnOnce(InvokeResponse) + Send + 'static,
    {
        let mut state = lock(&self.state);
        if let Some(saved) = &state.saved {
            return Err(InvokeSlotError::AlreadyInstalled(saved.id));
        }

        let id = state.next_id;
        state.next_id += 1;

        let original = Arc::clone(&state.current);
        let slot = Arc::downgrade(self);
        let pending: Mutex<Option<SuccessCallback>> = Mutex::new(Some(Box::new(on_response)));
        let forward_to = Arc::clone(&original);

        let interceptor: InvokeHandler = Arc::new(move |mut message: InvokeMessage| {
            let active = slot
                .upgrade()
                .is_some_and(|slot| slot.restore(id).is_some());
            if active {
                if let Some(callback) = lock(&pending).take() {
                    message.success = Some(callback);
                }
            } else {
                tracing::warn!(
                    interception = id,
                    method = %message.method,
                    "Stale invoke interceptor called, forwarding unchanged",
                );
            }
            call_original(&forward_to, message);
        });

        state.saved = Some(SavedHandler { id, original });
        state.current = interceptor;
        tracing::debug!(interception = id, "Invoke slot intercepted");

        Ok(Interception {
            slot: Arc::downgrade(self),
            id,
        })
    }

    /// Put the saved handler back if interception `id` is still installed.
    fn restore(&self, id: u64) -> Option<InvokeHandler> {
        let mut state = lock(&self.state);
        match &state.saved {
            Some(saved) if saved.id == id => {}
            _ => return None,
        }
        let saved = state.saved.take()?;
        state.current = Arc::clone(&saved.original);
        tracing::debug!(interception = id, "Invoke slot restored");
        Some(saved.original)
    }
}

impl fmt::Debug for InvokeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvokeSlot")
            .field("intercepted", &self.is_intercepted())
            .finish()
    }
}

/// Forward a message to the handler that was in place before interception.
fn call_original(original: &InvokeHandler, message: InvokeMessage) {
    original(message);
}

// ---------------------------------------------------------------------------
// Interception
// ---------------------------------------------------------------------------

/// Handle for an installed interceptor. Dropping it restores the slot if
/// the host never invoked the interceptor.
#[must_use = "dropping the interception withdraws it immediately"]
pub struct Interception {
    slot: Weak<InvokeSlot>,
    id: u64,
}

impl Interception {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Interception {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.upgrade() {
            if slot.restore(self.id).is_some() {
                tracing::debug!(interception = self.id, "Invoke interception withdrawn unused");
            }
        }
    }
}
