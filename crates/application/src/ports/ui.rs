//! User interface port
//!
//! The only place the engine crosses into UI code: show one modal prompt
//! and wait for a single answer, a dismissal, or an error.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use parking_lot::RwLock;

/// How a text prompt accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputKind {
    /// Plain text.
    Text,
    /// Masked text.
    Password,
    /// Numeric text.
    Number,
}

/// A modal prompt the engine asks the UI to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Informational message, answered by acknowledging it.
    Message {
        /// Dialog title.
        title: String,
        /// Message body.
        message: String,
    },
    /// Short non-blocking notice.
    Toast {
        /// Notice text.
        message: String,
    },
    /// Put text on the clipboard.
    Clipboard {
        /// Text to copy.
        text: String,
    },
    /// Yes/no question; a dismissal means "no".
    Confirm {
        /// Dialog title.
        title: String,
        /// Question text.
        message: String,
    },
    /// Free text input.
    TextInput {
        /// Dialog title.
        title: String,
        /// Message shown above the input.
        message: String,
        /// Input flavor.
        input: TextInputKind,
        /// Initial content of the input.
        prefill: String,
    },
    /// Numeric range input.
    Slider {
        /// Dialog title.
        title: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
        /// Step between values.
        step: f64,
        /// Initial position.
        initial: f64,
    },
    /// Date picker.
    Date {
        /// Dialog title.
        title: String,
        /// Initially selected date.
        initial: NaiveDate,
    },
    /// Time picker.
    Time {
        /// Dialog title.
        title: String,
        /// Initially selected time.
        initial: NaiveTime,
    },
    /// Options menu.
    Select {
        /// Dialog title.
        title: String,
        /// Option labels, in display order.
        options: Vec<String>,
        /// Whether several options may be chosen.
        multi_select: bool,
    },
    /// Color picker.
    Color {
        /// Dialog title.
        title: String,
        /// Initial color as `0xRRGGBB`.
        initial: u32,
    },
}

impl Prompt {
    /// Short name of the prompt kind, used in logs and errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Message { .. } => "a dialog",
            Self::Toast { .. } => "a toast",
            Self::Clipboard { .. } => "the clipboard",
            Self::Confirm { .. } => "a confirmation",
            Self::TextInput { .. } => "a text prompt",
            Self::Slider { .. } => "a slider",
            Self::Date { .. } => "a date picker",
            Self::Time { .. } => "a time picker",
            Self::Select { .. } => "a selection menu",
            Self::Color { .. } => "a color picker",
        }
    }
}

/// The answer to a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptValue {
    /// The prompt was acknowledged or confirmed.
    Acknowledged,
    /// Entered text.
    Text(String),
    /// Picked number.
    Number(f64),
    /// Picked date.
    Date(NaiveDate),
    /// Picked time.
    Time(NaiveTime),
    /// Indices of the chosen options.
    Selection(Vec<usize>),
    /// Picked color as `0xRRGGBB`.
    Color(u32),
}

/// Outcome of showing a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult {
    /// The user answered.
    Value(PromptValue),
    /// The user dismissed the prompt.
    Cancelled,
    /// The prompt could not be shown or answered.
    Error(String),
}

/// A surface able to show prompts.
#[async_trait]
pub trait UiAttachment: Send + Sync {
    /// Shows `prompt` and waits for the user.
    async fn show(&self, prompt: Prompt) -> PromptResult;
}

/// Gives access to the UI attachment currently in the foreground.
pub trait UiProvider: Send + Sync {
    /// Returns the foreground attachment, or `None` when nothing is shown.
    fn current(&self) -> Option<Arc<dyn UiAttachment>>;
}

/// A [`UiProvider`] whose attachment can be swapped while runs are active.
#[derive(Default)]
pub struct ForegroundUi {
    current: RwLock<Option<Arc<dyn UiAttachment>>>,
}

impl ForegroundUi {
    /// Creates a provider with `attachment` in the foreground.
    #[must_use]
    pub fn attached(attachment: Arc<dyn UiAttachment>) -> Self {
        Self {
            current: RwLock::new(Some(attachment)),
        }
    }

    /// Creates a provider with nothing in the foreground.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Puts `attachment` in the foreground.
    pub fn attach(&self, attachment: Arc<dyn UiAttachment>) {
        *self.current.write() = Some(attachment);
    }

    /// Removes the foreground attachment.
    pub fn detach(&self) {
        *self.current.write() = None;
    }
}

impl UiProvider for ForegroundUi {
    fn current(&self) -> Option<Arc<dyn UiAttachment>> {
        self.current.read().clone()
    }
}
