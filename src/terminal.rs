//! Command interpreter behind the landing-page terminal widget.

use crate::catalog;
use crate::constants::{CONTACT_EMAIL, TERMINAL_HISTORY_LIMIT};
use crate::theme::{Accent, ThemeMode};
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Input(String),
    Output(String),
    Error(String),
}

impl Line {
    pub fn text(&self) -> &str {
        match self {
            Line::Input(s) | Line::Output(s) | Line::Error(s) => s,
        }
    }

    /// CSS class used by the widget for this line kind.
    pub fn class(&self) -> &'static str {
        match self {
            Line::Input(_) => "term-input",
            Line::Output(_) => "term-output",
            Line::Error(_) => "term-error",
        }
    }
}

/// Side effect the host applies after a command runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Clear,
    SetTheme(ThemeMode),
    ToggleTheme,
    SetAccent(Accent),
    OpenContact,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub lines: Vec<Line>,
    pub effect: Option<Effect>,
}

const HELP: &[(&str, &str)] = &[
    ("help", "list commands"),
    ("about", "who is behind this site"),
    ("services", "list services"),
    ("service <slug>", "details for one service"),
    ("contact", "how to get in touch"),
    ("theme [dark|light]", "switch or toggle the color theme"),
    ("accent <name>", "change the accent color"),
    ("echo <text>", "print text"),
    ("whoami", "print the current user"),
    ("history", "show previous commands"),
    ("clear", "clear the screen"),
];

#[derive(Default)]
pub struct Terminal {
    scrollback: Vec<Line>,
    history: VecDeque<String>,
    cursor: Option<usize>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scrollback(&self) -> &[Line] {
        &self.scrollback
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Run one line of input. Blank input does nothing.
    pub fn execute(&mut self, input: &str) -> Response {
        let input = input.trim();
        if input.is_empty() {
            return Response::default();
        }
        self.push_history(input);
        let mut resp = interpret(input, &self.history);
        resp.lines.insert(0, Line::Input(input.to_string()));
        if resp.effect == Some(Effect::Clear) {
            self.scrollback.clear();
        } else {
            self.scrollback.extend(resp.lines.iter().cloned());
        }
        resp
    }

    /// Step back through history (arrow up). Sticks at the oldest entry.
    pub fn recall_previous(&mut self) -> Option<&str> {
        if self.history.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(idx);
        self.history.get(idx).map(String::as_str)
    }

    /// Step forward (arrow down). Past the newest entry returns `None`.
    pub fn recall_next(&mut self) -> Option<&str> {
        let idx = self.cursor? + 1;
        if idx >= self.history.len() {
            self.cursor = None;
            return None;
        }
        self.cursor = Some(idx);
        self.history.get(idx).map(String::as_str)
    }

    fn push_history(&mut self, input: &str) {
        self.cursor = None;
        if self.history.back().map(String::as_str) == Some(input) {
            return;
        }
        if self.history.len() == TERMINAL_HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(input.to_string());
    }
}

fn out(s: impl Into<String>) -> Line {
    Line::Output(s.into())
}

fn interpret(input: &str, history: &VecDeque<String>) -> Response {
    let (cmd, rest) = match input.split_once(char::is_whitespace) {
        Some((c, r)) => (c, r.trim()),
        None => (input, ""),
    };
    let mut lines = Vec::new();
    let mut effect = None;
    match cmd.to_ascii_lowercase().as_str() {
        "help" => {
            lines.push(out("Available commands:"));
            for (name, what) in HELP {
                lines.push(out(format!("  {:<20}{}", name, what)));
            }
        }
        "about" => {
            lines.push(out("Independent developer and designer."));
            lines.push(out("I build fast, accessible sites with a bit of ambient flair."));
        }
        "services" => {
            for s in catalog::all() {
                let tag = if s.available { "" } else { " (unavailable)" };
                lines.push(out(format!("  {:<22}{}{}", s.slug, s.title, tag)));
            }
            lines.push(out("Run `service <slug>` for details."));
        }
        "service" => match catalog::find_by_slug(rest) {
            Some(s) => {
                lines.push(out(s.title));
                lines.push(out(s.description));
                lines.push(out(format!("Includes: {}", s.items.join(", "))));
                lines.push(out(format!("Features: {}", s.features.join(", "))));
                lines.push(out(format!("Stack: {}", s.technologies.join(", "))));
                if !s.available {
                    lines.push(out("Currently not taking new projects for this service."));
                }
            }
            None if rest.is_empty() => lines.push(Line::Error("usage: service <slug>".into())),
            None => lines.push(Line::Error(format!("no such service: {}", rest))),
        },
        "contact" => {
            lines.push(out(format!("Email: {}", CONTACT_EMAIL)));
            lines.push(out("Opening the contact form..."));
            effect = Some(Effect::OpenContact);
        }
        "theme" => {
            if rest.is_empty() {
                lines.push(out("Theme toggled."));
                effect = Some(Effect::ToggleTheme);
            } else if let Ok(mode) = rest.parse::<ThemeMode>() {
                lines.push(out(format!("Theme set to {}.", mode)));
                effect = Some(Effect::SetTheme(mode));
            } else {
                lines.push(Line::Error("usage: theme [dark|light]".into()));
            }
        }
        "accent" => match rest.parse::<Accent>() {
            Ok(accent) => {
                lines.push(out(format!("Accent set to {}.", accent)));
                effect = Some(Effect::SetAccent(accent));
            }
            Err(()) => {
                let names: Vec<&str> = Accent::ALL.iter().map(|a| a.as_str()).collect();
                lines.push(Line::Error(format!(
                    "usage: accent <{}>",
                    names.join("|")
                )));
            }
        },
        "echo" => lines.push(out(rest)),
        "whoami" => lines.push(out("guest")),
        "history" => {
            for (i, h) in history.iter().enumerate() {
                lines.push(out(format!("{:>4}  {}", i + 1, h)));
            }
        }
        "clear" => effect = Some(Effect::Clear),
        _ => lines.push(Line::Error(format!("command not found: {}", cmd))),
    }
    Response { lines, effect }
}
