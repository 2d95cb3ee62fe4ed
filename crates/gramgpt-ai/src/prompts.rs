//! Fixed prompt text: system instruction, seeds, summary and suggestion
//! prompts, and the user-facing fallback messages.

use gramgpt_common::LanguageTag;

use crate::session::Turn;
use crate::{AiError, Message, Role};

pub const GREETING: &str = "Hello! I am GramGPT. I can help you with information on government schemes, farming, legal rights, and jobs. How can I assist you today?";

/// The synthetic user turn that opens every seeded conversation.
pub const SEED_USER_TURN: &str = "Initial Greeting";

pub const INVALID_CREDENTIAL_TEXT: &str =
    "Sorry, your API key is not valid. Please check your configuration and try again.";
pub const RATE_LIMITED_TEXT: &str =
    "Sorry, the service is busy right now. Please wait a moment and try again.";
pub const GENERIC_FAILURE_TEXT: &str =
    "Sorry, something went wrong. Please check your connection and try again.";
pub const SUMMARY_FAILURE_TEXT: &str = "Sorry, I couldn't summarize that. Please try again.";
pub const SUGGESTIONS_FAILURE_TEXT: &str = "Could not get suggestions.";

pub fn system_instruction(lang: LanguageTag) -> String {
    let name = lang.name();
    format!(
        "You are \"GramGPT\", an expert AI assistant for rural India. Your primary goal is to \
         provide clear, concise, and actionable information. The user is communicating in {name}. \
         You MUST respond fluently and accurately in {name}. Your knowledge base includes: Indian \
         government schemes, modern agricultural practices, legal rights, job opportunities, \
         common pest/disease diagnosis for crops, step-by-step guides for applying for government \
         documents, and fertilizer calculation estimates based on crop and area. Keep your answers \
         simple, easy to understand for a non-technical audience, and use bullet points or \
         numbered lists for clarity where possible. Use markdown for formatting, for example \
         **bold** for important terms. When providing pest/disease advice or fertilizer \
         calculations, **always include a disclaimer** to consult local authorities or experts \
         for confirmation. If you don't know an answer, say so honestly in {name} and suggest \
         where they might find the information. Do not mention that you are a language model. \
         Just be the helpful assistant, GramGPT."
    )
}

/// The default seed: synthetic user opener plus the greeting.
pub fn greeting_seed() -> Vec<Turn> {
    vec![
        Turn::seed(Role::User, SEED_USER_TURN),
        Turn::seed(Role::Model, GREETING),
    ]
}

/// Greeting seed followed by a topic-specific opener pair.
pub fn topic_seed(lang: LanguageTag, topic: &str) -> Vec<Turn> {
    let reply = if lang == LanguageTag::HINDI {
        format!("नमस्ते! मैं {topic} के बारे में आपकी मदद कर सकता हूँ। आप क्या जानना चाहेंगे?")
    } else {
        format!("Hi! I can help you with {topic}. What would you like to know?")
    };
    let mut seed = greeting_seed();
    seed.push(Turn::seed(Role::User, format!("I have a question about {topic}.")));
    seed.push(Turn::seed(Role::Model, reply));
    seed
}

pub fn summary_prompt(lang: LanguageTag, text: &str) -> String {
    format!(
        "Please summarize the following text in about one or two simple sentences, in the {} language:\n\n---\n\n{text}",
        lang.name()
    )
}

/// `role: text` lines, one per message.
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn suggestion_prompt(lang: LanguageTag, messages: &[Message]) -> String {
    format!(
        "Based on this conversation, suggest three relevant, short follow-up questions a user \
         might ask. The user is speaking {}, so provide the suggestions in that language. Return \
         ONLY a JSON array of strings, like [\"question 1\", \"question 2\", \"question 3\"].\n\n\
         Conversation:\n{}",
        lang.name(),
        transcript(messages)
    )
}

/// The notice shown in place of a failed generation.
pub fn fallback_text(err: &AiError) -> &'static str {
    match err {
        AiError::InvalidCredential => INVALID_CREDENTIAL_TEXT,
        AiError::RateLimited => RATE_LIMITED_TEXT,
        _ => GENERIC_FAILURE_TEXT,
    }
}
