//! Color picker

use async_trait::async_trait;
use courier_domain::Variable;

use super::{prompt_title, unexpected_answer};
use crate::error::ExecutionResult;
use crate::execution::ExecutionContext;
use crate::ports::{Prompt, PromptValue};
use crate::variables::{ResolvedValue, VariableType};

const DEFAULT_COLOR: u32 = 0x00FF_FFFF;

/// Parses `rrggbb` or `#rrggbb`.
#[must_use]
pub fn parse_hex_color(input: &str) -> Option<u32> {
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Resolves to six lowercase hex digits, no leading `#`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorType;

#[async_trait]
impl VariableType for ColorType {
    async fn resolve(
        &self,
        variable: &Variable,
        ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        let initial = variable
            .remembered_value()
            .and_then(parse_hex_color)
            .unwrap_or(DEFAULT_COLOR);

        let answer = ctx
            .prompt(Prompt::Color {
                title: prompt_title(variable),
                initial,
            })
            .await?;
        let PromptValue::Color(color) = answer else {
            return Err(unexpected_answer(variable, &answer));
        };

        Ok(ResolvedValue::new(format!("{:06x}", color & 0x00FF_FFFF)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("ff8800"), Some(0x00FF_8800));
        assert_eq!(parse_hex_color("#00FF00"), Some(0x0000_FF00));
        assert_eq!(parse_hex_color("fff"), None);
        assert_eq!(parse_hex_color("+12345"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }
}
