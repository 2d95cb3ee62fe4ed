use std::path::PathBuf;

use clap::Parser;

/// GramGPT: a multilingual assistant for rural India, in the terminal.
#[derive(Parser, Debug)]
#[command(name = "gramgpt", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Conversation language, e.g. `hi-IN` (overrides `[chat] language`).
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Start with topic N from `/topics` (1-based).
    #[arg(short, long)]
    pub topic: Option<usize>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let args = Args::parse_from([
            "gramgpt",
            "--config",
            "/tmp/gramgpt.toml",
            "--lang",
            "hi-IN",
            "--topic",
            "2",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/gramgpt.toml")));
        assert_eq!(args.lang.as_deref(), Some("hi-IN"));
        assert_eq!(args.topic, Some(2));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn flags_are_optional() {
        let args = Args::parse_from(["gramgpt"]);
        assert!(args.lang.is_none());
        assert!(args.topic.is_none());
    }
}
