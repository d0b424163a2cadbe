//! Terminal prompts
//!
//! Shows engine prompts on a text stream and reads one answer line per
//! prompt. End of input dismisses the prompt.

use std::fmt::Write as _;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use courier_application::ports::{Prompt, PromptResult, PromptValue, TextInputKind, UiAttachment};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::Mutex;

struct Io<R, W> {
    lines: Lines<R>,
    out: W,
}

/// A [`UiAttachment`] reading answers line by line.
pub struct TerminalUi<R, W> {
    io: Mutex<Io<R, W>>,
}

impl TerminalUi<tokio::io::BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Prompts on stderr and reads stdin, keeping stdout for the result.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stderr(),
        )
    }
}

impl<R, W> TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a terminal UI over `input` and `output`.
    pub fn new(input: R, output: W) -> Self {
        Self {
            io: Mutex::new(Io {
                lines: input.lines(),
                out: output,
            }),
        }
    }

    /// Returns the output stream.
    pub fn into_output(self) -> W {
        self.io.into_inner().out
    }

    async fn ask(&self, question: &str) -> std::io::Result<Option<String>> {
        let mut io = self.io.lock().await;
        io.out.write_all(question.as_bytes()).await?;
        io.out.flush().await?;
        io.lines.next_line().await
    }
}

#[async_trait]
impl<R, W> UiAttachment for TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn show(&self, prompt: Prompt) -> PromptResult {
        let question = question(&prompt);

        if matches!(prompt, Prompt::Toast { .. } | Prompt::Clipboard { .. }) {
            let mut io = self.io.lock().await;
            return match io.out.write_all(question.as_bytes()).await {
                Ok(()) => PromptResult::Value(PromptValue::Acknowledged),
                Err(e) => PromptResult::Error(e.to_string()),
            };
        }

        match self.ask(&question).await {
            Ok(Some(line)) => interpret(&prompt, line.trim()),
            Ok(None) => PromptResult::Cancelled,
            Err(e) => PromptResult::Error(e.to_string()),
        }
    }
}

fn heading(text: &mut String, title: &str) {
    if !title.is_empty() {
        let _ = writeln!(text, "== {title} ==");
    }
}

/// Renders the text shown for `prompt`.
pub fn question(prompt: &Prompt) -> String {
    let mut text = String::new();
    match prompt {
        Prompt::Message { title, message } => {
            heading(&mut text, title);
            let _ = write!(text, "{message}\n[press Enter] ");
        }
        Prompt::Toast { message } => {
            let _ = writeln!(text, "» {message}");
        }
        Prompt::Clipboard { text: copied } => {
            let _ = writeln!(text, "» copy: {copied}");
        }
        Prompt::Confirm { title, message } => {
            heading(&mut text, title);
            let _ = write!(text, "{message} [y/N] ");
        }
        Prompt::TextInput {
            title,
            message,
            input,
            prefill,
        } => {
            heading(&mut text, title);
            text.push_str(message);
            if *input == TextInputKind::Password {
                // Lines are read with echo on.
                text.push_str(" (input is not hidden)");
            } else if !prefill.is_empty() {
                let _ = write!(text, " [{prefill}]");
            }
            text.push_str(": ");
        }
        Prompt::Slider {
            title,
            min,
            max,
            step,
            initial,
        } => {
            heading(&mut text, title);
            let _ = write!(text, "{min}..{max} step {step} [{initial}]: ");
        }
        Prompt::Date { title, initial } => {
            heading(&mut text, title);
            let _ = write!(text, "date (yyyy-mm-dd) [{initial}]: ");
        }
        Prompt::Time { title, initial } => {
            heading(&mut text, title);
            let _ = write!(text, "time (HH:MM) [{}]: ", initial.format("%H:%M"));
        }
        Prompt::Select {
            title,
            options,
            multi_select,
        } => {
            heading(&mut text, title);
            for (index, option) in options.iter().enumerate() {
                let _ = writeln!(text, "  {}) {option}", index + 1);
            }
            text.push_str(if *multi_select {
                "choose, comma separated: "
            } else {
                "choose one: "
            });
        }
        Prompt::Color { title, initial } => {
            heading(&mut text, title);
            let _ = write!(text, "color (#RRGGBB) [#{initial:06X}]: ");
        }
    }
    text
}

/// Turns an answer line into the prompt's result. An empty line accepts
/// the initial value where the prompt has one.
pub fn interpret(prompt: &Prompt, line: &str) -> PromptResult {
    let value = match prompt {
        Prompt::Message { .. } | Prompt::Toast { .. } | Prompt::Clipboard { .. } => {
            Ok(PromptValue::Acknowledged)
        }
        Prompt::Confirm { .. } => {
            return if matches!(line.to_ascii_lowercase().as_str(), "y" | "yes") {
                PromptResult::Value(PromptValue::Acknowledged)
            } else {
                PromptResult::Cancelled
            };
        }
        Prompt::TextInput { prefill, .. } => Ok(PromptValue::Text(if line.is_empty() {
            prefill.clone()
        } else {
            line.to_string()
        })),
        Prompt::Slider {
            min, max, initial, ..
        } => slider(line, *min, *max, *initial),
        Prompt::Date { initial, .. } => or_initial(line, *initial, |l| {
            NaiveDate::parse_from_str(l, "%Y-%m-%d").map_err(|_| format!("not a date: {l}"))
        })
        .map(PromptValue::Date),
        Prompt::Time { initial, .. } => or_initial(line, *initial, |l| {
            NaiveTime::parse_from_str(l, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(l, "%H:%M:%S"))
                .map_err(|_| format!("not a time: {l}"))
        })
        .map(PromptValue::Time),
        Prompt::Select {
            options,
            multi_select,
            ..
        } => {
            if line.is_empty() && !*multi_select {
                return PromptResult::Cancelled;
            }
            selection(line, options.len(), *multi_select).map(PromptValue::Selection)
        }
        Prompt::Color { initial, .. } => or_initial(line, *initial, |l| {
            let hex = l.strip_prefix('#').unwrap_or(l);
            if hex.len() == 6 {
                u32::from_str_radix(hex, 16).map_err(|_| format!("not a color: {l}"))
            } else {
                Err(format!("not a color: {l}"))
            }
        })
        .map(PromptValue::Color),
    };

    match value {
        Ok(value) => PromptResult::Value(value),
        Err(message) => PromptResult::Error(message),
    }
}

fn or_initial<T>(
    line: &str,
    initial: T,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, String> {
    if line.is_empty() {
        Ok(initial)
    } else {
        parse(line)
    }
}

fn slider(line: &str, min: f64, max: f64, initial: f64) -> Result<PromptValue, String> {
    let value = or_initial(line, initial, |l| {
        l.parse::<f64>().map_err(|_| format!("not a number: {l}"))
    })?;
    if value < min || value > max {
        return Err(format!("{value} is outside {min}..{max}"));
    }
    Ok(PromptValue::Number(value))
}

fn selection(line: &str, count: usize, multi_select: bool) -> Result<Vec<usize>, String> {
    let mut chosen = Vec::new();
    for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let index = part
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .ok_or_else(|| format!("no option {part}"))?;
        chosen.push(index - 1);
    }
    if !multi_select && chosen.len() > 1 {
        return Err("choose a single option".to_string());
    }
    Ok(chosen)
}
