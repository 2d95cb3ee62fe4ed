//! The interactive chat loop.

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;

use gramgpt_ai::prompts::{greeting_seed, topic_seed};
use gramgpt_ai::speech::{
    select_voice, SpeechRecognizer, SpeechSynthesizer, RECOGNITION_UNSUPPORTED_TEXT,
    TTS_UNSUPPORTED_TEXT,
};
use gramgpt_ai::topics::{categories, topic_of};
use gramgpt_ai::{CancelHandle, ConversationSession, SessionError, Turn};
use gramgpt_common::{ChatEvent, LanguageTag, TurnOutcome};
use gramgpt_config::preferences::save_preferences_to;
use gramgpt_config::Preferences;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use crate::commands::{self, Command, HELP};
use crate::render::{
    write_notice, write_notification, write_numbered, write_turn, Palette, StreamPrinter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<W: Write> {
    session: ConversationSession,
    preferences: Preferences,
    preferences_path: Option<PathBuf>,
    speech: Box<dyn SpeechSynthesizer>,
    recognizer: Box<dyn SpeechRecognizer>,
    palette: Palette,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(
        session: ConversationSession,
        preferences: Preferences,
        preferences_path: Option<PathBuf>,
        speech: Box<dyn SpeechSynthesizer>,
        recognizer: Box<dyn SpeechRecognizer>,
        out: W,
    ) -> Self {
        Self {
            session,
            palette: Palette::for_theme(preferences.theme),
            preferences,
            preferences_path,
            speech,
            recognizer,
            out,
        }
    }

    /// Read lines from stdin until `/quit`, EOF or Ctrl-C at the prompt.
    pub async fn run(&mut self) -> io::Result<()> {
        self.print_history()?;
        writeln!(self.out, "{}Type /help for commands.{}", self.palette.muted, self.palette.reset)?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else {
                writeln!(self.out)?;
                break;
            };

            let flow = match commands::parse(&line) {
                Ok(Some(command)) => self.execute(command).await?,
                Ok(None) => Flow::Continue,
                Err(e) => {
                    write_notice(&mut self.out, &self.palette, &e.to_string())?;
                    Flow::Continue
                }
            };
            self.flush_notifications()?;
            if flow == Flow::Quit {
                break;
            }
        }
        tracing::info!("chat loop finished");
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> io::Result<Flow> {
        match command {
            Command::Say(text) => self.send(&text).await?,
            Command::Suggestion(n) => match self.session.suggestions().get(n - 1) {
                Some(question) => {
                    let question = question.to_string();
                    write_turn(&mut self.out, &self.palette, &Turn::user(&question))?;
                    self.send(&question).await?;
                }
                None => self.notice(&format!("No suggestion {n}; try /suggest first"))?,
            },
            Command::Regenerate => {
                let events = self.session.subscribe();
                let cancel = self.session.cancel_handle();
                let reply = self.session.regenerate();
                let result = stream_reply(&mut self.out, self.palette, events, cancel, reply).await?;
                self.report(result)?;
            }
            Command::Summarize(n) => self.summarize(n).await?,
            Command::Suggest => {
                let suggestions = self.session.get_suggestions().await;
                if !suggestions.is_empty() {
                    writeln!(
                        self.out,
                        "{}Suggested questions (send with /1, /2, /3):{}",
                        self.palette.muted, self.palette.reset
                    )?;
                    write_numbered(&mut self.out, &self.palette, suggestions.items())?;
                }
            }
            Command::Lang(tag) => match LanguageTag::parse(&tag) {
                Ok(language) => {
                    self.session.restart(language, greeting_seed());
                    writeln!(self.out, "Language: {}", language.name())?;
                    self.print_last()?;
                }
                Err(e) => self.notice(&e.to_string())?,
            },
            Command::Topics => {
                let language = self.session.language();
                write_numbered(&mut self.out, &self.palette, categories(language))?;
            }
            Command::Topic(n) => {
                let language = self.session.language();
                match categories(language).get(n - 1) {
                    Some(title) => {
                        self.session
                            .restart(language, topic_seed(language, topic_of(title)));
                        self.print_last()?;
                    }
                    None => self.notice(&format!("No topic {n}; see /topics"))?,
                }
            }
            Command::Theme => self.toggle_theme()?,
            Command::Speak(n) => self.speak(n).await?,
            Command::Listen => self.listen().await?,
            Command::History => self.print_history()?,
            Command::Clear => {
                self.session.clear();
                self.print_history()?;
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn send(&mut self, text: &str) -> io::Result<()> {
        let events = self.session.subscribe();
        let cancel = self.session.cancel_handle();
        let reply = self.session.send(text);
        let result = stream_reply(&mut self.out, self.palette, events, cancel, reply).await?;
        self.report(result)
    }

    async fn summarize(&mut self, n: Option<usize>) -> io::Result<()> {
        let target = match n {
            Some(n) => self.session.history().into_iter().nth(n - 1),
            None => self.session.last_model_answer(),
        };
        let Some(target) = target else {
            return self.notice("Nothing to summarize");
        };
        match self.session.summarize(&target.text).await {
            Ok(turn) => write_turn(&mut self.out, &self.palette, &turn),
            Err(e) => self.notice(&e.to_string()),
        }
    }

    async fn speak(&mut self, n: Option<usize>) -> io::Result<()> {
        if !self.speech.supported() {
            return self.notice(TTS_UNSUPPORTED_TEXT);
        }
        let target = match n {
            Some(n) => self.session.history().into_iter().nth(n - 1),
            None => self.session.last_model_answer(),
        };
        let Some(target) = target else {
            return self.notice("Nothing to read");
        };
        let language = self.session.language();
        let voices = self.speech.voices();
        let voice = select_voice(&voices, language);
        if let Err(e) = self.speech.speak(&target.text, language, voice).await {
            self.notice(&e.to_string())?;
        }
        Ok(())
    }

    async fn listen(&mut self) -> io::Result<()> {
        if !self.recognizer.supported() {
            return self.notice(RECOGNITION_UNSUPPORTED_TEXT);
        }
        match self.recognizer.recognize(self.session.language()).await {
            Ok(text) if !text.trim().is_empty() => {
                write_turn(&mut self.out, &self.palette, &Turn::user(text.trim()))?;
                self.send(&text).await
            }
            Ok(_) => self.notice("Didn't catch that"),
            Err(e) => self.notice(&e.to_string()),
        }
    }

    fn toggle_theme(&mut self) -> io::Result<()> {
        self.preferences.theme = self.preferences.theme.toggled();
        self.palette = Palette::for_theme(self.preferences.theme);
        if let Some(path) = &self.preferences_path {
            if let Err(e) = save_preferences_to(&self.preferences, path) {
                tracing::warn!("failed to save preferences: {e}");
                self.notice("Could not save the theme preference")?;
            }
        }
        writeln!(self.out, "Theme: {}", self.preferences.theme.as_str())
    }

    fn report(&mut self, result: Result<TurnOutcome, SessionError>) -> io::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(e) => self.notice(&e.to_string()),
        }
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        write_notice(&mut self.out, &self.palette, message)
    }

    fn flush_notifications(&mut self) -> io::Result<()> {
        for notification in self.session.drain_notifications() {
            write_notification(&mut self.out, &self.palette, &notification)?;
        }
        self.out.flush()
    }

    fn print_last(&mut self) -> io::Result<()> {
        if let Some(turn) = self.session.history().last() {
            write_turn(&mut self.out, &self.palette, turn)?;
        }
        Ok(())
    }

    /// The visible conversation, numbered for `/summarize N` and `/speak N`.
    /// Hidden seed turns keep their numbers but are not shown.
    fn print_history(&mut self) -> io::Result<()> {
        for (i, turn) in self.session.history().iter().enumerate() {
            if turn.is_hidden() {
                continue;
            }
            write!(self.out, "{}{:>3}.{} ", self.palette.muted, i + 1, self.palette.reset)?;
            write_turn(&mut self.out, &self.palette, turn)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &ConversationSession {
        &self.session
    }
}

/// Drive `reply` to completion, printing its deltas and cancelling it on
/// Ctrl-C.
async fn stream_reply<W, F>(
    out: &mut W,
    palette: Palette,
    mut events: broadcast::Receiver<ChatEvent>,
    cancel: CancelHandle,
    reply: F,
) -> io::Result<Result<TurnOutcome, SessionError>>
where
    W: Write,
    F: Future<Output = Result<TurnOutcome, SessionError>>,
{
    let mut printer = StreamPrinter::new(&mut *out, palette);
    tokio::pin!(reply);

    let result = loop {
        tokio::select! {
            result = &mut reply => break result,
            event = events.recv() => {
                if let Ok(event) = event {
                    printer.handle(&event)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
            }
        }
    };

    while let Ok(event) = events.try_recv() {
        printer.handle(&event)?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use futures_util::stream;
    use gramgpt_ai::speech::{SpeechError, Unsupported};
    use gramgpt_ai::{
        AiError, ChatRequest, DeltaStream, ModelClient, OutputShape, Role, SessionOptions,
    };
    use gramgpt_config::Theme;

    use super::*;

    /// Answers every request with fixed text.
    struct Canned;

    #[async_trait]
    impl ModelClient for Canned {
        async fn complete_once(&self, _: &ChatRequest) -> Result<String, AiError> {
            Ok("Short".into())
        }

        async fn stream_turn(&self, _: &ChatRequest) -> Result<DeltaStream, AiError> {
            let deltas = vec![Ok("Namaste".to_string()), Ok("!".to_string())];
            Ok(Box::pin(stream::iter(deltas)))
        }

        async fn complete_structured(
            &self,
            _: &ChatRequest,
            _: OutputShape,
        ) -> Result<String, AiError> {
            Ok(r#"["Q1", "Q2", "Q3"]"#.into())
        }
    }

    fn app(preferences_path: Option<PathBuf>) -> App<Vec<u8>> {
        let session = ConversationSession::start(
            Arc::new(Canned),
            LanguageTag::ENGLISH,
            greeting_seed(),
            SessionOptions::default(),
        );
        let mut app = App::new(
            session,
            Preferences::default(),
            preferences_path,
            Box::new(Unsupported),
            Box::new(Unsupported),
            Vec::new(),
        );
        app.palette = Palette::plain();
        app
    }

    fn output(app: &App<Vec<u8>>) -> String {
        String::from_utf8(app.output().clone()).unwrap()
    }

    #[tokio::test]
    async fn plain_text_streams_answer() {
        let mut app = app(None);
        let flow = app.execute(Command::Say("hi".into())).await.unwrap();

        assert_eq!(flow, Flow::Continue);
        assert!(output(&app).contains("GramGPT: Namaste!\n"));
        assert_eq!(app.session().history().len(), 4);
    }

    #[tokio::test]
    async fn suggestions_can_be_sent_by_number() {
        let mut app = app(None);
        app.execute(Command::Suggest).await.unwrap();
        assert!(output(&app).contains("  2. Q2"));

        app.execute(Command::Suggestion(2)).await.unwrap();
        let history = app.session().history();
        assert_eq!(history[2].text, "Q2");
        assert_eq!(history[2].role, Role::User);
    }

    #[tokio::test]
    async fn missing_suggestion_is_a_notice() {
        let mut app = app(None);
        app.execute(Command::Suggestion(1)).await.unwrap();
        assert!(output(&app).contains("! No suggestion 1"));
        assert_eq!(app.session().history().len(), 2);
    }

    #[tokio::test]
    async fn theme_toggle_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        let mut app = app(Some(path.clone()));

        app.execute(Command::Theme).await.unwrap();

        assert!(output(&app).contains("Theme: dark"));
        let saved = gramgpt_config::preferences::load_preferences_from(&path);
        assert_eq!(saved.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn language_switch_restarts_session() {
        let mut app = app(None);
        app.execute(Command::Say("hi".into())).await.unwrap();

        app.execute(Command::Lang("hi-IN".into())).await.unwrap();

        assert_eq!(app.session().language(), LanguageTag::HINDI);
        assert_eq!(app.session().history(), greeting_seed());
        assert!(output(&app).contains("Language: हिन्दी (Hindi)"));
    }

    #[tokio::test]
    async fn unknown_language_is_a_notice() {
        let mut app = app(None);
        app.execute(Command::Lang("fr-FR".into())).await.unwrap();
        assert!(output(&app).contains("! "));
        assert_eq!(app.session().language(), LanguageTag::ENGLISH);
    }

    #[tokio::test]
    async fn topic_selection_seeds_conversation() {
        let mut app = app(None);
        app.execute(Command::Topic(2)).await.unwrap();

        let history = app.session().history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2].text, "I have a question about Agriculture Help.");
        assert!(output(&app).contains("Hi! I can help you with Agriculture Help."));
    }

    #[tokio::test]
    async fn summarize_defaults_to_last_answer() {
        let mut app = app(None);
        app.execute(Command::Summarize(None)).await.unwrap();
        assert!(output(&app).contains("GramGPT: **Summary:** Short"));
    }

    #[tokio::test]
    async fn speak_without_speech_support() {
        let mut app = app(None);
        app.execute(Command::Speak(None)).await.unwrap();
        assert!(output(&app).contains(TTS_UNSUPPORTED_TEXT));
    }

    #[tokio::test]
    async fn history_hides_seed_openers() {
        let mut app = app(None);
        app.execute(Command::Topic(3)).await.unwrap();
        app.execute(Command::History).await.unwrap();

        let out = output(&app);
        assert!(!out.contains("Initial Greeting"));
        assert!(!out.contains("I have a question about"));
        assert!(out.contains("  4. GramGPT: Hi! I can help you with Legal Rights."));
    }

    #[tokio::test]
    async fn regenerate_on_fresh_chat_is_a_notice() {
        let mut app = app(None);
        app.execute(Command::Regenerate).await.unwrap();

        assert!(output(&app).contains("! there is no earlier question to regenerate"));
        assert_eq!(app.session().history(), greeting_seed());
    }

    #[tokio::test]
    async fn listen_without_speech_input() {
        let mut app = app(None);
        app.execute(Command::Listen).await.unwrap();
        assert!(output(&app).contains(RECOGNITION_UNSUPPORTED_TEXT));
        assert_eq!(app.session().history().len(), 2);
    }

    /// Always hears the same sentence.
    struct Hears(&'static str);

    #[async_trait]
    impl SpeechRecognizer for Hears {
        fn supported(&self) -> bool {
            true
        }

        async fn recognize(&self, _: LanguageTag) -> Result<String, SpeechError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn dictated_text_is_sent() {
        let mut app = app(None);
        app.recognizer = Box::new(Hears("  मौसम कैसा है? "));

        app.execute(Command::Listen).await.unwrap();

        let history = app.session().history();
        assert_eq!(history[2], Turn::user("मौसम कैसा है?"));
        assert_eq!(history[3].text, "Namaste!");
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut app = app(None);
        assert_eq!(app.execute(Command::Quit).await.unwrap(), Flow::Quit);
    }
}
