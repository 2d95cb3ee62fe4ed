//! Terminal rendering of turns, streamed answers and notices.

use std::io::{self, Write};

use gramgpt_ai::{Role, Turn, TurnKind};
use gramgpt_common::{ChatEvent, Notification, NotificationLevel, TurnOutcome};
use gramgpt_config::Theme;

/// ANSI styles for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub user: &'static str,
    pub model: &'static str,
    pub notice: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                user: "\x1b[34m",
                model: "\x1b[32m",
                notice: "\x1b[31m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Self {
                user: "\x1b[96m",
                model: "\x1b[92m",
                notice: "\x1b[91m",
                muted: "\x1b[37m",
                reset: "\x1b[0m",
            },
        }
    }

    /// No escape codes.
    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            user: "",
            model: "",
            notice: "",
            muted: "",
            reset: "",
        }
    }
}

fn speaker(turn: &Turn) -> &'static str {
    match turn.role {
        Role::User => "You",
        Role::Model => "GramGPT",
    }
}

pub fn write_turn(out: &mut impl Write, palette: &Palette, turn: &Turn) -> io::Result<()> {
    let color = match (turn.role, turn.kind) {
        (_, TurnKind::Notice) => palette.notice,
        (Role::User, _) => palette.user,
        (Role::Model, _) => palette.model,
    };
    writeln!(
        out,
        "{color}{}:{} {}",
        speaker(turn),
        palette.reset,
        turn.display_text()
    )
}

/// Numbered listing, as used by `/history`, `/topics` and suggestions.
pub fn write_numbered<S: AsRef<str>>(
    out: &mut impl Write,
    palette: &Palette,
    items: &[S],
) -> io::Result<()> {
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "{}{:>3}.{} {}", palette.muted, i + 1, palette.reset, item.as_ref())?;
    }
    Ok(())
}

pub fn write_notice(out: &mut impl Write, palette: &Palette, message: &str) -> io::Result<()> {
    writeln!(out, "{}! {message}{}", palette.notice, palette.reset)
}

pub fn write_notification(
    out: &mut impl Write,
    palette: &Palette,
    notification: &Notification,
) -> io::Result<()> {
    let color = match notification.level {
        NotificationLevel::Info => palette.muted,
        NotificationLevel::Warning | NotificationLevel::Error => palette.notice,
    };
    writeln!(out, "{color}* {}{}", notification.message, palette.reset)
}

/// Prints a model answer as its `TurnUpdated` events arrive.
///
/// Events carry the whole accumulated text; only the new suffix is
/// written. A text that no longer extends what was shown (a failure
/// notice replacing a partial answer) is printed on a fresh line.
pub struct StreamPrinter<W: Write> {
    out: W,
    palette: Palette,
    shown: String,
    started: bool,
}

impl<W: Write> StreamPrinter<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            shown: String::new(),
            started: false,
        }
    }

    pub fn handle(&mut self, event: &ChatEvent) -> io::Result<()> {
        match event {
            ChatEvent::TurnUpdated { text, .. } => self.update(text),
            ChatEvent::TurnFinished { outcome, .. } => self.finish(*outcome),
            _ => Ok(()),
        }
    }

    fn update(&mut self, text: &str) -> io::Result<()> {
        if !self.started {
            write!(self.out, "{}GramGPT:{} ", self.palette.model, self.palette.reset)?;
            self.started = true;
        }
        match text.strip_prefix(self.shown.as_str()) {
            Some(suffix) => write!(self.out, "{suffix}")?,
            None => write!(
                self.out,
                "\n{}{text}{}",
                self.palette.notice, self.palette.reset
            )?,
        }
        self.shown = text.to_string();
        self.out.flush()
    }

    fn finish(&mut self, outcome: TurnOutcome) -> io::Result<()> {
        if outcome == TurnOutcome::Cancelled {
            if !self.started {
                write!(self.out, "{}GramGPT:{} ", self.palette.model, self.palette.reset)?;
            }
            write!(self.out, " {}[stopped]{}", self.palette.muted, self.palette.reset)?;
        }
        if self.started || outcome == TurnOutcome::Cancelled {
            writeln!(self.out)?;
        }
        self.shown.clear();
        self.started = false;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(events: &[ChatEvent]) -> String {
        let mut printer = StreamPrinter::new(Vec::new(), Palette::plain());
        for event in events {
            printer.handle(event).unwrap();
        }
        String::from_utf8(printer.into_inner()).unwrap()
    }

    fn updated(text: &str) -> ChatEvent {
        ChatEvent::TurnUpdated {
            index: 3,
            text: text.into(),
        }
    }

    fn finished(outcome: TurnOutcome) -> ChatEvent {
        ChatEvent::TurnFinished { index: 3, outcome }
    }

    #[test]
    fn prints_only_new_suffix() {
        let out = printed(&[
            ChatEvent::TurnStarted { index: 3 },
            updated("Nam"),
            updated("Namaste"),
            finished(TurnOutcome::Completed),
        ]);
        assert_eq!(out, "GramGPT: Namaste\n");
    }

    #[test]
    fn replacement_goes_on_new_line() {
        let out = printed(&[
            updated("part"),
            updated("Sorry, something went wrong."),
            finished(TurnOutcome::Failed),
        ]);
        assert_eq!(out, "GramGPT: part\nSorry, something went wrong.\n");
    }

    #[test]
    fn cancelled_turn_is_marked() {
        let out = printed(&[updated("Rice "), finished(TurnOutcome::Cancelled)]);
        assert_eq!(out, "GramGPT: Rice  [stopped]\n");
    }

    #[test]
    fn turns_and_lists() {
        let palette = Palette::plain();
        let mut out = Vec::new();
        write_turn(&mut out, &palette, &Turn::summary("Short.")).unwrap();
        write_turn(&mut out, &palette, &Turn::user("Hi")).unwrap();
        write_numbered(&mut out, &palette, &["a", "b"]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "GramGPT: **Summary:** Short.\nYou: Hi\n  1. a\n  2. b\n"
        );
    }
}
