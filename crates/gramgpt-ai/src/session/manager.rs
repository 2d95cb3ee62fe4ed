//! Session struct, lifecycle and read access.

use std::sync::{Arc, Mutex, MutexGuard};

use gramgpt_common::{
    ChatEvent, EventBus, LanguageTag, Notification, NotificationQueue, SessionId,
};
use tokio::sync::broadcast;
use tracing::info;

use crate::prompts::{greeting_seed, system_instruction};
use crate::{Message, ModelClient, Role};

use super::types::{CancelHandle, GenerationSlot, SessionOptions, SuggestionSet, Turn};

/// Everything replaced together when the seed context changes.
pub(super) struct SessionState {
    pub(super) id: SessionId,
    pub(super) language: LanguageTag,
    pub(super) system_instruction: String,
    pub(super) history: Vec<Turn>,
    pub(super) suggestions: SuggestionSet,
    pub(super) notifications: NotificationQueue,
}

impl SessionState {
    fn new(language: LanguageTag, seed: Vec<Turn>, notifications: NotificationQueue) -> Self {
        Self {
            id: SessionId::new(),
            language,
            system_instruction: system_instruction(language),
            history: seed,
            suggestions: SuggestionSet::default(),
            notifications,
        }
    }

    pub(super) fn model_history(&self) -> Vec<Message> {
        self.history.iter().filter_map(Turn::to_message).collect()
    }
}

/// A live conversation bound to one language and system instruction.
///
/// All operations take `&self`; the session can be shared between the task
/// driving a generation and tasks that cancel it or read its history.
pub struct ConversationSession {
    pub(super) client: Arc<dyn ModelClient>,
    pub(super) options: SessionOptions,
    pub(super) state: Mutex<SessionState>,
    pub(super) generation: Arc<GenerationSlot>,
    pub(super) events: EventBus,
}

impl ConversationSession {
    /// Create a session seeded with `seed`. No network call is made.
    pub fn start(
        client: Arc<dyn ModelClient>,
        language: LanguageTag,
        seed: Vec<Turn>,
        options: SessionOptions,
    ) -> Self {
        let session = Self {
            client,
            options,
            state: Mutex::new(SessionState::new(language, seed, NotificationQueue::default())),
            generation: Arc::new(GenerationSlot::default()),
            events: EventBus::default(),
        };
        session.announce();
        session
    }

    /// Replace the session state with a fresh seed, cancelling any
    /// in-flight generation.
    pub fn restart(&self, language: LanguageTag, seed: Vec<Turn>) {
        self.cancel();
        {
            let mut state = self.state();
            let notifications = std::mem::take(&mut state.notifications);
            *state = SessionState::new(language, seed, notifications);
        }
        self.announce();
    }

    /// Discard the conversation and reseed with the greeting pair.
    pub fn clear(&self) {
        self.cancel();
        {
            let mut state = self.state();
            let language = state.language;
            let notifications = std::mem::take(&mut state.notifications);
            *state = SessionState::new(language, greeting_seed(), notifications);
        }
        self.events.publish(ChatEvent::Cleared);
        self.announce();
    }

    /// Stop the in-flight generation. Returns `false` when idle.
    pub fn cancel(&self) -> bool {
        let cancelled = self.generation.cancel();
        if cancelled {
            info!(session = %self.session_id(), "generation cancelled");
        }
        cancelled
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            slot: Arc::clone(&self.generation),
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generation.is_active()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    pub fn session_id(&self) -> SessionId {
        self.state().id
    }

    pub fn language(&self) -> LanguageTag {
        self.state().language
    }

    pub fn system_instruction(&self) -> String {
        self.state().system_instruction.clone()
    }

    /// Snapshot of the visible conversation, including summary and notice
    /// turns and the model turn currently being streamed.
    pub fn history(&self) -> Vec<Turn> {
        self.state().history.clone()
    }

    /// The turns actually sent to the model.
    pub fn model_history(&self) -> Vec<Message> {
        self.state().model_history()
    }

    /// The most recent completed model answer, if any.
    pub fn last_model_answer(&self) -> Option<Turn> {
        self.state()
            .history
            .iter()
            .rev()
            .find(|t| t.role == Role::Model && t.to_message().is_some())
            .cloned()
    }

    pub fn suggestions(&self) -> SuggestionSet {
        self.state().suggestions.clone()
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.state().notifications.drain()
    }

    pub(super) fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn announce(&self) {
        let (session_id, language) = {
            let state = self.state();
            (state.id, state.language)
        };
        info!(session = %session_id, language = %language, "session started");
        self.events.publish(ChatEvent::SessionStarted {
            session_id,
            language: language.to_string(),
        });
    }
}

impl std::fmt::Debug for ConversationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("ConversationSession")
            .field("id", &state.id)
            .field("language", &state.language)
            .field("turns", &state.history.len())
            .field("generating", &self.generation.is_active())
            .finish()
    }
}
