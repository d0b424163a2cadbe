//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the engine and its collaborators.
//! Each port is a trait implemented by adapters in the infrastructure layer
//! or by fakes in tests.

mod cancellation;
mod clock;
mod http_transport;
mod response_storage;
mod ui;
mod variable_repository;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use clock::Clock;
pub use http_transport::{BodyStream, HttpTransport, ResponseDescriptor, TransportError};
pub use response_storage::{ResponseStorage, StorageError, StoredResponse};
pub use ui::{
    ForegroundUi, Prompt, PromptResult, PromptValue, TextInputKind, UiAttachment, UiProvider,
};
pub use variable_repository::{RepositoryError, VariableRepository};
