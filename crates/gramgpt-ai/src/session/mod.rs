//! Conversation session management.
//!
//! A `ConversationSession` owns the visible history, streams model answers
//! into it delta by delta, and handles cancellation, regeneration,
//! summaries and follow-up suggestions.

mod chat;
mod manager;
mod types;


pub use manager::ConversationSession;
pub use types::{CancelHandle, SessionError, SessionOptions, SuggestionSet, Turn, TurnKind};
