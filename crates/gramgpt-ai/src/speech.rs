//! Optional speech capabilities.
//!
//! Front-ends inject a synthesizer and a recognizer; hosts without speech
//! support use [`Unsupported`]. Callers check `supported()` first and show
//! the matching notice when it is false.

use async_trait::async_trait;
use gramgpt_common::LanguageTag;

pub const TTS_UNSUPPORTED_TEXT: &str = "Sorry, text-to-speech isn't supported here.";
pub const RECOGNITION_UNSUPPORTED_TEXT: &str = "Sorry, speech recognition isn't supported here.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP-47 tag of the voice, e.g. `hi-IN`.
    pub lang: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SpeechError {
    #[error("speech capability not supported")]
    Unsupported,
    #[error("speech failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn supported(&self) -> bool;
    fn voices(&self) -> Vec<Voice>;
    async fn speak(
        &self,
        text: &str,
        language: LanguageTag,
        voice: Option<&Voice>,
    ) -> Result<(), SpeechError>;
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn supported(&self) -> bool;
    /// Listen once and return the transcript.
    async fn recognize(&self, language: LanguageTag) -> Result<String, SpeechError>;
}

/// Exact tag match first, then any voice sharing the primary subtag.
pub fn select_voice(voices: &[Voice], language: LanguageTag) -> Option<&Voice> {
    voices
        .iter()
        .find(|v| v.lang.eq_ignore_ascii_case(language.as_str()))
        .or_else(|| {
            let primary = language.primary_subtag();
            voices.iter().find(|v| {
                v.lang
                    .get(..primary.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(primary))
            })
        })
}

/// Speech on a host that has none.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

#[async_trait]
impl SpeechSynthesizer for Unsupported {
    fn supported(&self) -> bool {
        false
    }

    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    async fn speak(&self, _: &str, _: LanguageTag, _: Option<&Voice>) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }
}

#[async_trait]
impl SpeechRecognizer for Unsupported {
    fn supported(&self) -> bool {
        false
    }

    async fn recognize(&self, _: LanguageTag) -> Result<String, SpeechError> {
        Err(SpeechError::Unsupported)
    }
}
