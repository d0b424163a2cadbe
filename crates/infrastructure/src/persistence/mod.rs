//! File-system persistence: the variable store, response bodies and
//! engine settings.

mod response_storage;
mod settings;
mod variable_repository;

pub use response_storage::FileResponseStorage;
pub use settings::{
    ENV_MAX_REDIRECTS, ENV_RESPONSE_DIR, ENV_TIMEOUT_MS, ENV_USER_AGENT, ENV_VARIABLES_FILE,
    SettingsError, SettingsLoader, apply_overrides,
};
pub use variable_repository::FileVariableRepository;
