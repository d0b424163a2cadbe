//! Built-in action kinds

mod codec;
mod control;
mod dialog;
mod prompt;
mod variable;

pub use codec::{Transform, TransformAction, UuidAction};
pub use control::{AbortAction, WaitAction};
pub use dialog::{ConfirmAction, CopyToClipboardAction, ShowDialogAction, ShowToastAction};
pub use prompt::{PromptAction, PromptDateAction, PromptTimeAction};
pub use variable::{GetVariableAction, SetVariableAction};

use courier_domain::ActionAlias;

use super::params;
use super::registry::ActionTypeDescriptor;

fn descriptor<T>(type_tag: &'static str, alias: ActionAlias) -> ActionTypeDescriptor
where
    T: super::Action + serde::de::DeserializeOwned + 'static,
{
    ActionTypeDescriptor::new(type_tag, alias, move |data| {
        let action: T = params::parse(type_tag, data)?;
        Ok(Box::new(action))
    })
}

fn transform(transform: Transform) -> ActionTypeDescriptor {
    ActionTypeDescriptor::new(transform.type_tag(), transform.alias(), move |data| {
        Ok(Box::new(TransformAction::from_data(transform, data)?))
    })
}

/// Descriptors of every built-in kind.
pub(crate) fn builtin_descriptors() -> Vec<ActionTypeDescriptor> {
    vec![
        descriptor::<ShowDialogAction>(
            "show_dialog",
            ActionAlias::new("showDialog", &["text", "title"]),
        ),
        descriptor::<ShowToastAction>("show_toast", ActionAlias::new("showToast", &["text"])),
        descriptor::<CopyToClipboardAction>(
            "copy_to_clipboard",
            ActionAlias::new("copyToClipboard", &["text"]),
        ),
        descriptor::<ConfirmAction>("confirm", ActionAlias::new("confirm", &["message"])),
        descriptor::<PromptAction>("prompt", ActionAlias::new("prompt", &["message", "prefill"])),
        descriptor::<PromptTimeAction>(
            "prompt_time",
            ActionAlias::new("promptTime", &["format", "initialTime"]),
        ),
        descriptor::<PromptDateAction>(
            "prompt_date",
            ActionAlias::new("promptDate", &["format", "initialDate"]),
        ),
        descriptor::<SetVariableAction>(
            "set_variable",
            ActionAlias::new("setVariable", &["variableId", "value"]),
        ),
        descriptor::<GetVariableAction>(
            "get_variable",
            ActionAlias::new("getVariable", &["variableId"]),
        ),
        descriptor::<WaitAction>("wait", ActionAlias::new("wait", &["duration"])),
        transform(Transform::Base64Encode),
        transform(Transform::Base64Decode),
        transform(Transform::UrlEncode),
        transform(Transform::UrlDecode),
        descriptor::<UuidAction>("uuid", ActionAlias::new("uuidv4", &[])),
        descriptor::<AbortAction>("abort", ActionAlias::new("abort", &[])),
    ]
}
