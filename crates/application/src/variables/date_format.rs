//! Date/time patterns in the `yyyy-MM-dd HH:mm` notation.
//!
//! Stored shortcuts use pattern letters (`y`, `M`, `d`, `H`, `h`, `m`, `s`,
//! `S`, `a`, `E`, `D`) with `'quoted'` literals. Patterns are compiled to a
//! chrono format string once and rejected up front if they contain an
//! unknown letter, so formatting never produces a partial value.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// Default pattern for date variables and actions.
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd";
/// Default pattern for time variables and actions.
pub const DEFAULT_TIME_PATTERN: &str = "HH:mm";
/// Default pattern for timestamp variables.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatePatternError {
    /// A letter with no meaning in patterns.
    #[error("Invalid date format: unknown pattern letter '{0}'")]
    UnknownLetter(char),

    /// A quoted literal without its closing quote.
    #[error("Invalid date format: unterminated quote")]
    UnterminatedQuote,
}

/// A compiled date/time pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    format: String,
}

impl DatePattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown pattern letters and unterminated quotes.
    pub fn compile(pattern: &str) -> Result<Self, DatePatternError> {
        let mut format = String::with_capacity(pattern.len() * 2);
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                // '' is a literal quote, inside or outside a quoted run.
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    format.push('\'');
                    continue;
                }
                loop {
                    match chars.next() {
                        None => return Err(DatePatternError::UnterminatedQuote),
                        Some('\'') if chars.peek() == Some(&'\'') => {
                            chars.next();
                            format.push('\'');
                        }
                        Some('\'') => break,
                        Some(literal) => push_literal(&mut format, literal),
                    }
                }
                continue;
            }

            if !c.is_ascii_alphabetic() {
                push_literal(&mut format, c);
                continue;
            }

            let mut count = 1;
            while chars.peek() == Some(&c) {
                chars.next();
                count += 1;
            }
            format.push_str(field(c, count)?);
        }

        Ok(Self { format })
    }

    /// Formats a date and time.
    ///
    /// # Errors
    ///
    /// Returns an error if chrono rejects the value for this pattern.
    pub fn format(&self, value: &NaiveDateTime) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        write!(out, "{}", value.format(&self.format))?;
        Ok(out)
    }

    /// Formats a date; time fields read as midnight.
    ///
    /// # Errors
    ///
    /// Returns an error if chrono rejects the value for this pattern.
    pub fn format_date(&self, date: NaiveDate) -> Result<String, std::fmt::Error> {
        self.format(&date.and_time(NaiveTime::default()))
    }

    /// Formats a time; date fields read as 1970-01-01.
    ///
    /// # Errors
    ///
    /// Returns an error if chrono rejects the value for this pattern.
    pub fn format_time(&self, time: NaiveTime) -> Result<String, std::fmt::Error> {
        self.format(&NaiveDate::default().and_time(time))
    }
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

const fn field(letter: char, count: usize) -> Result<&'static str, DatePatternError> {
    let spec = match (letter, count) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', _) => "%3f",
        ('a', _) => "%p",
        ('E', 1..=3) => "%a",
        ('E', _) => "%A",
        ('D', 1 | 2) => "%-j",
        ('D', _) => "%j",
        _ => return Err(DatePatternError::UnknownLetter(letter)),
    };
    Ok(spec)
}
