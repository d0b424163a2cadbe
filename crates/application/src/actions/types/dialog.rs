//! Messages and confirmations

use async_trait::async_trait;
use serde::Deserialize;

use crate::actions::params::template;
use crate::actions::{Action, FailurePolicy};
use crate::error::{ExecutionError, ExecutionResult};
use crate::execution::ExecutionContext;
use crate::ports::Prompt;

/// Shows a message and waits until the user closes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowDialogAction {
    #[serde(default, deserialize_with = "template")]
    text: String,
    #[serde(default, deserialize_with = "template")]
    title: String,
}

#[async_trait]
impl Action for ShowDialogAction {
    fn type_tag(&self) -> &'static str {
        "show_dialog"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let message = ctx.resolve_template(&self.text).await?;
        if message.trim().is_empty() {
            return Ok(None);
        }
        let title = ctx.resolve_template(&self.title).await?;

        match ctx.prompt(Prompt::Message { title, message }).await {
            // Closing the dialog is how it is acknowledged.
            Err(ExecutionError::Cancelled) if !ctx.is_cancelled() => Ok(None),
            Err(error) => Err(error),
            Ok(_) => Ok(None),
        }
    }
}

/// Shows a short notice without waiting.
#[derive(Debug, Clone, Deserialize)]
pub struct ShowToastAction {
    #[serde(default, deserialize_with = "template")]
    text: String,
}

#[async_trait]
impl Action for ShowToastAction {
    fn type_tag(&self) -> &'static str {
        "show_toast"
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let message = ctx.resolve_template(&self.text).await?;
        if message.trim().is_empty() {
            return Ok(None);
        }
        ctx.prompt(Prompt::Toast { message }).await?;
        Ok(None)
    }
}

/// Puts text on the clipboard.
#[derive(Debug, Clone, Deserialize)]
pub struct CopyToClipboardAction {
    #[serde(default, deserialize_with = "template")]
    text: String,
}

#[async_trait]
impl Action for CopyToClipboardAction {
    fn type_tag(&self) -> &'static str {
        "copy_to_clipboard"
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Continue
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let text = ctx.resolve_template(&self.text).await?;
        if text.is_empty() {
            return Ok(None);
        }
        ctx.prompt(Prompt::Clipboard { text }).await?;
        Ok(None)
    }
}

/// Asks a yes/no question; anything but yes cancels the run.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmAction {
    #[serde(default, deserialize_with = "template")]
    message: String,
}

#[async_trait]
impl Action for ConfirmAction {
    fn type_tag(&self) -> &'static str {
        "confirm"
    }

    async fn execute(&self, ctx: &ExecutionContext) -> ExecutionResult<Option<String>> {
        let message = ctx.resolve_template(&self.message).await?;
        ctx.prompt(Prompt::Confirm {
            title: String::new(),
            message,
        })
        .await?;
        Ok(None)
    }
}
