//! Async conversation operations: send, regenerate, summarize, suggestions.

use futures_util::StreamExt;
use gramgpt_common::{ChatEvent, Notification, NotificationLevel, SessionId, TurnOutcome};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::prompts::{
    fallback_text, suggestion_prompt, summary_prompt, SUGGESTIONS_FAILURE_TEXT,
    SUMMARY_FAILURE_TEXT,
};
use crate::suggestions::parse_suggestions;
use crate::{AiError, ChatRequest, OutputShape, Role};

use super::manager::ConversationSession;
use super::types::{BusyGuard, SessionError, SuggestionSet, Turn, TurnKind};

impl ConversationSession {
    /// Send a user message and stream the model's answer into history.
    ///
    /// Returns how the answer ended. Model failures are not errors: they
    /// leave a notice turn in place of the answer.
    pub async fn send(&self, text: &str) -> Result<TurnOutcome, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        let guard = BusyGuard::acquire(&self.generation)?;

        let index = {
            let mut state = self.state();
            state.suggestions = SuggestionSet::default();
            state.history.push(Turn::user(text));
            state.history.len() - 1
        };
        self.events.publish(ChatEvent::TurnStarted { index });

        Ok(self.run_generation(guard).await)
    }

    /// Re-ask the last user question, discarding everything after it.
    pub async fn regenerate(&self) -> Result<TurnOutcome, SessionError> {
        let guard = BusyGuard::acquire(&self.generation)?;
        {
            let mut state = self.state();
            let last_user = state
                .history
                .iter()
                .rposition(|t| t.role == Role::User && t.kind == TurnKind::Message)
                .ok_or(SessionError::NoPriorUserMessage)?;
            state.history.truncate(last_user + 1);
            state.suggestions = SuggestionSet::default();
        }
        debug!("regenerating last answer");

        Ok(self.run_generation(guard).await)
    }

    async fn run_generation(&self, guard: BusyGuard) -> TurnOutcome {
        let (request, index, epoch) = {
            let mut state = self.state();
            let request = ChatRequest {
                system_instruction: Some(state.system_instruction.clone()),
                contents: state.model_history(),
                params: self.options.chat,
            };
            state.history.push(Turn::model(String::new()));
            (request, state.history.len() - 1, state.id)
        };
        self.events.publish(ChatEvent::TurnStarted { index });

        let outcome = match self.consume(&request, index, &epoch, guard.token()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "generation failed");
                self.fail_turn(index, &epoch, &e);
                TurnOutcome::Failed
            }
        };
        drop(guard);

        if self.state().id == epoch {
            self.events.publish(ChatEvent::TurnFinished { index, outcome });
        }
        info!(?outcome, "turn finished");
        outcome
    }

    /// Apply deltas in arrival order until the stream ends or the token trips.
    async fn consume(
        &self,
        request: &ChatRequest,
        index: usize,
        epoch: &SessionId,
        token: &CancellationToken,
    ) -> Result<TurnOutcome, AiError> {
        let mut stream = tokio::select! {
            biased;
            _ = token.cancelled() => return Ok(TurnOutcome::Cancelled),
            stream = self.client.stream_turn(request) => stream?,
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => return Ok(TurnOutcome::Cancelled),
                next = stream.next() => next,
            };
            let delta = match next {
                None => return Ok(TurnOutcome::Completed),
                Some(delta) => delta?,
            };
            if token.is_cancelled() {
                return Ok(TurnOutcome::Cancelled);
            }

            let text = {
                let mut state = self.state();
                if state.id != *epoch {
                    return Ok(TurnOutcome::Cancelled);
                }
                let Some(turn) = state.history.get_mut(index) else {
                    return Ok(TurnOutcome::Cancelled);
                };
                turn.text.push_str(&delta);
                turn.text.clone()
            };
            self.events.publish(ChatEvent::TurnUpdated { index, text });
        }
    }

    /// Replace the placeholder with the fallback notice for `err`.
    fn fail_turn(&self, index: usize, epoch: &SessionId, err: &AiError) {
        let notice = Turn::notice(fallback_text(err));
        let text = notice.text.clone();
        {
            let mut state = self.state();
            if state.id != *epoch {
                return;
            }
            match state.history.get_mut(index) {
                Some(turn) => *turn = notice,
                None => return,
            }
        }
        self.events.publish(ChatEvent::TurnUpdated { index, text });
    }

    /// Summarize `text` into a summary turn appended to the history.
    ///
    /// A failed request appends an apology notice instead; both are returned.
    pub async fn summarize(&self, text: &str) -> Result<Turn, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if self.is_generating() {
            return Err(SessionError::Busy);
        }

        let (language, epoch) = {
            let state = self.state();
            (state.language, state.id)
        };
        let request = ChatRequest::prompt(summary_prompt(language, text), self.options.summary);

        let turn = match self.client.complete_once(&request).await {
            Ok(summary) => Turn::summary(summary.trim()),
            Err(e) => {
                warn!(error = %e, "summary failed");
                Turn::notice(SUMMARY_FAILURE_TEXT)
            }
        };

        let index = {
            let mut state = self.state();
            if state.id != epoch {
                return Ok(turn);
            }
            state.history.push(turn.clone());
            state.history.len() - 1
        };
        let outcome = match turn.kind {
            TurnKind::Notice => TurnOutcome::Failed,
            _ => TurnOutcome::Completed,
        };
        self.events.publish(ChatEvent::TurnUpdated {
            index,
            text: turn.display_text(),
        });
        self.events.publish(ChatEvent::TurnFinished { index, outcome });
        Ok(turn)
    }

    /// Ask for three follow-up questions about the conversation so far.
    ///
    /// Never fails: API and parse errors yield an empty set plus a warning
    /// notification.
    pub async fn get_suggestions(&self) -> SuggestionSet {
        let (language, epoch, transcript) = {
            let state = self.state();
            (state.language, state.id, state.model_history())
        };
        let request = ChatRequest::prompt(
            suggestion_prompt(language, &transcript),
            self.options.suggestions,
        );

        let result = match self
            .client
            .complete_structured(&request, OutputShape::StringArray)
            .await
        {
            Ok(raw) => parse_suggestions(&raw),
            Err(e) => Err(e),
        };

        let suggestions = match result {
            Ok(items) => SuggestionSet::new(items),
            Err(e) => {
                warn!(error = %e, "suggestions unavailable");
                let warning =
                    Notification::new(NotificationLevel::Warning, SUGGESTIONS_FAILURE_TEXT);
                self.state().notifications.push(warning);
                SuggestionSet::default()
            }
        };

        {
            let mut state = self.state();
            if state.id != epoch {
                return suggestions;
            }
            state.suggestions = suggestions.clone();
        }
        self.events
            .publish(ChatEvent::SuggestionsReady(suggestions.items().to_vec()));
        suggestions
    }
}
