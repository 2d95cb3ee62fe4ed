mod cli;
mod commands;
mod render;
mod repl;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use gramgpt_ai::prompts::{greeting_seed, topic_seed};
use gramgpt_ai::speech::Unsupported;
use gramgpt_ai::topics::{categories, topic_of};
use gramgpt_ai::{ConversationSession, GeminiClient, GeminiConfig, GenerationParams, SessionOptions, Turn};
use gramgpt_common::LanguageTag;
use gramgpt_config::schema::ModelConfig;
use tracing_subscriber::EnvFilter;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Leave the terminal in its default colors
        eprint!("\x1b[0m");
        eprintln!("\n--- GramGPT crashed ---");
        default_hook(info);
    }));
}

/// Sampling parameters for each request kind, from `[model]`.
fn session_options(model: &ModelConfig) -> SessionOptions {
    SessionOptions {
        chat: GenerationParams {
            temperature: model.temperature,
            top_k: Some(model.top_k),
            top_p: Some(model.top_p),
            max_output_tokens: Some(model.max_output_tokens),
        },
        summary: GenerationParams::with_temperature(model.summary_temperature),
        suggestions: GenerationParams::with_temperature(model.suggestion_temperature),
    }
}

/// `--lang` wins over `[chat] language`; anything unknown falls back to
/// English.
fn resolve_language(flag: Option<&str>, configured: &str) -> LanguageTag {
    let tag = flag.unwrap_or(configured);
    LanguageTag::parse(tag).unwrap_or_else(|e| {
        tracing::warn!("{e}; using {}", LanguageTag::default());
        LanguageTag::default()
    })
}

/// Greeting seed, or the topic seed for a 1-based `--topic`.
fn initial_seed(language: LanguageTag, topic: Option<usize>) -> Vec<Turn> {
    let Some(n) = topic else {
        return greeting_seed();
    };
    match n.checked_sub(1).and_then(|i| categories(language).get(i)) {
        Some(title) => topic_seed(language, topic_of(title)),
        None => {
            tracing::warn!("no topic {n}, starting with the greeting");
            greeting_seed()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file before anything else
    let dotenv = gramgpt_common::load_dotenv();

    install_panic_hook();

    let args = cli::parse();

    let loaded = match &args.config {
        Some(path) => gramgpt_config::load_config_from(path),
        None => gramgpt_config::load_config(),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Logs go to stderr so they never interleave with streamed answers
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.as_directive().to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("gramgpt={level},gramgpt_ai={level},gramgpt_config={level}").into()
        }))
        .init();

    tracing::info!("GramGPT v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    if let Err(e) = &loaded {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let Some(gemini) = GeminiConfig::from_env() else {
        eprintln!(
            "No API key found. Set one of {} (a .env file works too).",
            gramgpt_ai::gemini::API_KEY_VARS.join(", ")
        );
        return ExitCode::FAILURE;
    };
    let gemini = gemini
        .with_model(&config.model.name)
        .with_api_base(&config.model.api_base)
        .with_timeouts(
            Duration::from_secs(u64::from(config.model.connect_timeout_secs)),
            Duration::from_secs(u64::from(config.model.request_timeout_secs)),
        );
    tracing::info!(model = %gemini.model, "model client ready");

    let language = resolve_language(args.lang.as_deref(), &config.chat.language);
    let session = ConversationSession::start(
        Arc::new(GeminiClient::new(gemini)),
        language,
        initial_seed(language, args.topic),
        session_options(&config.model),
    );

    let preferences_path = gramgpt_config::preferences::default_preferences_path().ok();
    let preferences = preferences_path
        .as_deref()
        .map(gramgpt_config::preferences::load_preferences_from)
        .unwrap_or_default();

    let mut app = repl::App::new(
        session,
        preferences,
        preferences_path,
        Box::new(Unsupported),
        Box::new(Unsupported),
        std::io::stdout(),
    );
    match app.run().await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_model_config() {
        let options = session_options(&ModelConfig::default());
        assert_eq!(options.chat.top_k, Some(40));
        assert_eq!(options.chat.max_output_tokens, Some(2048));
        assert!((options.summary.temperature - 0.5).abs() < f64::EPSILON);
        assert!((options.suggestions.temperature - 0.8).abs() < f64::EPSILON);
        assert!(options.summary.top_k.is_none());
    }

    #[test]
    fn language_flag_overrides_config() {
        assert_eq!(resolve_language(Some("hi-IN"), "en-IN"), LanguageTag::HINDI);
        assert_eq!(resolve_language(None, "hi-IN"), LanguageTag::HINDI);
        assert_eq!(resolve_language(Some("xx-YY"), "hi-IN"), LanguageTag::ENGLISH);
    }

    #[test]
    fn topic_flag_selects_seed() {
        assert_eq!(initial_seed(LanguageTag::ENGLISH, None).len(), 2);
        let seed = initial_seed(LanguageTag::ENGLISH, Some(1));
        assert_eq!(seed[2].text, "I have a question about Government Schemes.");
        assert_eq!(initial_seed(LanguageTag::ENGLISH, Some(0)).len(), 2);
        assert_eq!(initial_seed(LanguageTag::ENGLISH, Some(99)).len(), 2);
    }
}
