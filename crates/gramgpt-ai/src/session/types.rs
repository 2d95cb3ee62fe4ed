//! Session types and concurrency guards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{GenerationParams, Message, Role};

/// What a turn is for. `Seed` and `Message` turns are sent back to the
/// model; only `Message` turns are the user's own conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnKind {
    /// Fixed preamble a session starts from.
    Seed,
    Message,
    Summary,
    Notice,
}

/// One entry in the visible conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub kind: TurnKind,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            kind: TurnKind::Message,
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            kind: TurnKind::Message,
        }
    }

    /// Preamble turn with the given role.
    pub fn seed(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            kind: TurnKind::Seed,
        }
    }

    /// Seed user turns are context for the model, never shown.
    pub fn is_hidden(&self) -> bool {
        self.kind == TurnKind::Seed && self.role == Role::User
    }

    pub fn summary(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            kind: TurnKind::Summary,
        }
    }

    /// A fallback shown in place of a failed model output.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            kind: TurnKind::Notice,
        }
    }

    /// Text as shown to the user.
    pub fn display_text(&self) -> String {
        match self.kind {
            TurnKind::Summary => format!("**Summary:** {}", self.text),
            TurnKind::Seed | TurnKind::Message | TurnKind::Notice => self.text.clone(),
        }
    }

    /// The model-facing form of this turn, if it has one. Empty model
    /// placeholders are never sent.
    pub fn to_message(&self) -> Option<Message> {
        let sent = matches!(self.kind, TurnKind::Seed | TurnKind::Message);
        if !sent || (self.role == Role::Model && self.text.is_empty()) {
            return None;
        }
        Some(Message {
            role: self.role,
            content: self.text.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("a response is still being generated")]
    Busy,
    #[error("message is empty")]
    EmptyMessage,
    #[error("there is no earlier question to regenerate")]
    NoPriorUserMessage,
}

/// Up to three follow-up questions, valid until the next send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionSet(Vec<String>);

impl SuggestionSet {
    pub fn new(items: Vec<String>) -> Self {
        Self(items)
    }

    pub fn items(&self) -> &[String] {
        &self.0
    }

    /// Zero-based lookup.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Sampling parameters per request kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub chat: GenerationParams,
    pub summary: GenerationParams,
    pub suggestions: GenerationParams,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            chat: GenerationParams::default(),
            summary: GenerationParams::with_temperature(0.5),
            suggestions: GenerationParams::with_temperature(0.8),
        }
    }
}

struct ActiveGeneration {
    id: u64,
    token: CancellationToken,
}

/// The at-most-one in-flight generation of a session.
#[derive(Default)]
pub(crate) struct GenerationSlot {
    active: Mutex<Option<ActiveGeneration>>,
    next_id: AtomicU64,
}

impl GenerationSlot {
    fn lock(&self) -> MutexGuard<'_, Option<ActiveGeneration>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Cancel the active generation, if any. The slot is freed at once.
    pub(crate) fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(active) => {
                active.token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Guard that frees the generation slot on drop, ensuring it is always
/// released even if the future is cancelled or an early return occurs.
pub(crate) struct BusyGuard {
    slot: Arc<GenerationSlot>,
    id: u64,
    token: CancellationToken,
}

impl BusyGuard {
    /// Claim the slot. Returns `Busy` if a generation is already running.
    pub(crate) fn acquire(slot: &Arc<GenerationSlot>) -> Result<Self, SessionError> {
        let mut active = slot.lock();
        if active.is_some() {
            return Err(SessionError::Busy);
        }
        let id = slot.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        *active = Some(ActiveGeneration {
            id,
            token: token.clone(),
        });
        Ok(Self {
            slot: Arc::clone(slot),
            id,
            token,
        })
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let mut active = self.slot.lock();
        // A cancel may already have freed the slot for a newer generation
        if active.as_ref().is_some_and(|a| a.id == self.id) {
            *active = None;
        }
    }
}

/// Stops the current generation from another task.
#[derive(Clone)]
pub struct CancelHandle {
    pub(crate) slot: Arc<GenerationSlot>,
}

impl CancelHandle {
    /// Returns whether a generation was running. No-op when idle.
    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }

    pub fn is_generating(&self) -> bool {
        self.slot.is_active()
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("generating", &self.is_generating())
            .finish()
    }
}
