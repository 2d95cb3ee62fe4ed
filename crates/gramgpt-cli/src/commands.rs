//! Slash-command parsing for the chat prompt.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send to the model.
    Say(String),
    Help,
    Clear,
    Regenerate,
    /// Summarize turn N of `/history` (1-based), default the last answer.
    Summarize(Option<usize>),
    Suggest,
    /// Send suggestion N (1-based).
    Suggestion(usize),
    Lang(String),
    Topics,
    Topic(usize),
    Theme,
    Speak(Option<usize>),
    /// Dictate a message and send it.
    Listen,
    History,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("expected a positive number, got {0:?}")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
Commands:
  /help            show this help
  /clear           start over with the greeting
  /regen           regenerate the last answer
  /summarize [N]   summarize turn N (default: last answer)
  /suggest         suggest follow-up questions
  /1 /2 /3         send a suggested question
  /lang TAG        switch language (en-IN, hi-IN, bn-IN, mr-IN, ta-IN, te-IN, gu-IN)
  /topics          list topics
  /topic N         start a conversation about topic N
  /theme           toggle light/dark theme
  /speak [N]       read turn N aloud (default: last answer)
  /listen          dictate a message
  /history         show the conversation
  /quit            exit
Press Ctrl-C while an answer is streaming to stop it.";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Say(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (rest, None),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "clear" | "new" => Command::Clear,
        "regen" | "regenerate" => Command::Regenerate,
        "summarize" | "summary" => Command::Summarize(arg.map(number).transpose()?),
        "suggest" => Command::Suggest,
        "lang" | "language" => {
            Command::Lang(arg.ok_or(CommandError::MissingArgument("lang"))?.to_string())
        }
        "topics" => Command::Topics,
        "topic" => Command::Topic(number(arg.ok_or(CommandError::MissingArgument("topic"))?)?),
        "theme" => Command::Theme,
        "speak" => Command::Speak(arg.map(number).transpose()?),
        "listen" | "mic" => Command::Listen,
        "history" => Command::History,
        "quit" | "exit" | "q" => Command::Quit,
        digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            Command::Suggestion(number(digits)?)
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn number(text: &str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidNumber(text.to_string())),
    }
}
