//! Fake collaborators shared by the engine tests.
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use courier_application::ports::{
    CancellationReceiver, Clock, ForegroundUi, HttpTransport, Prompt, PromptResult, PromptValue,
    RepositoryError, ResponseDescriptor, ResponseStorage, StorageError, StoredResponse,
    TransportError, UiAttachment, UiProvider, VariableRepository,
};
use courier_application::{
    ExecutionContext, ExecutionResult, ResolvedValue, VariableManager, VariableType,
    VariableTypeRegistry,
};
use courier_domain::{ActionRecord, ResolvedRequest, Variable};
use parking_lot::Mutex;

/// Variable store kept in memory; records every write.
#[derive(Default)]
pub struct InMemoryVariables {
    variables: Mutex<HashMap<String, Variable>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_writes: bool,
}

impl InMemoryVariables {
    pub fn with(variables: impl IntoIterator<Item = Variable>) -> Self {
        let store = Self::default();
        for variable in variables {
            store.variables.lock().insert(variable.id.clone(), variable);
        }
        store
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().clone()
    }

    pub fn stored_value(&self, id: &str) -> Option<String> {
        self.variables.lock().get(id).and_then(|v| v.value.clone())
    }

    pub fn remove(&self, id: &str) {
        self.variables.lock().remove(id);
    }

    /// Waits until `count` writes were attempted.
    pub async fn wait_for_writes(&self, count: usize) -> Vec<(String, String)> {
        for _ in 0..200 {
            if self.writes.lock().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.writes()
    }
}

#[async_trait]
impl VariableRepository for InMemoryVariables {
    async fn get_variable(&self, id: &str) -> Result<Option<Variable>, RepositoryError> {
        Ok(self.variables.lock().get(id).cloned())
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<Variable>, RepositoryError> {
        Ok(self
            .variables
            .lock()
            .values()
            .find(|v| v.key == key)
            .cloned())
    }

    async fn set_variable_value(&self, id: &str, value: &str) -> Result<(), RepositoryError> {
        self.writes.lock().push((id.to_string(), value.to_string()));
        if self.fail_writes {
            return Err(RepositoryError::Serialization("disk full".to_string()));
        }
        let mut variables = self.variables.lock();
        let variable = variables
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        variable.value = Some(value.to_string());
        Ok(())
    }
}

/// UI answering prompts from a script, recording what it was shown.
#[derive(Default)]
pub struct ScriptedUi {
    answers: Mutex<VecDeque<PromptResult>>,
    shown: Mutex<Vec<Prompt>>,
}

impl ScriptedUi {
    pub fn answering(answers: impl IntoIterator<Item = PromptResult>) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.into_iter().collect()),
            shown: Mutex::new(Vec::new()),
        })
    }

    pub fn shown(&self) -> Vec<Prompt> {
        self.shown.lock().clone()
    }
}

#[async_trait]
impl UiAttachment for ScriptedUi {
    async fn show(&self, prompt: Prompt) -> PromptResult {
        self.shown.lock().push(prompt);
        self.answers
            .lock()
            .pop_front()
            .unwrap_or(PromptResult::Value(PromptValue::Acknowledged))
    }
}

/// UI that never answers.
pub struct HangingUi;

#[async_trait]
impl UiAttachment for HangingUi {
    async fn show(&self, _prompt: Prompt) -> PromptResult {
        std::future::pending().await
    }
}

pub fn text(value: &str) -> PromptResult {
    PromptResult::Value(PromptValue::Text(value.to_string()))
}

pub fn provider(ui: Arc<dyn UiAttachment>) -> Arc<dyn UiProvider> {
    Arc::new(ForegroundUi::attached(ui))
}

pub fn no_ui() -> Arc<dyn UiProvider> {
    Arc::new(ForegroundUi::detached())
}

/// Clock stuck at 2024-03-07 14:05:09 local time.
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap()
    }
}

/// Variable type counting its invocations.
pub struct CountingType {
    pub calls: AtomicUsize,
    value: String,
}

impl CountingType {
    pub fn new(value: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            value: value.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VariableType for CountingType {
    async fn resolve(
        &self,
        _variable: &Variable,
        _ctx: &ExecutionContext,
    ) -> ExecutionResult<ResolvedValue> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ResolvedValue::new(self.value.clone()))
    }
}

pub fn context(
    repository: Arc<InMemoryVariables>,
    types: VariableTypeRegistry,
    ui: Arc<dyn UiProvider>,
    cancellation: CancellationReceiver,
) -> ExecutionContext {
    let manager = VariableManager::new(repository, Arc::new(types));
    ExecutionContext::new(manager, ui, cancellation, Arc::new(FixedClock))
}

pub fn default_context(
    repository: Arc<InMemoryVariables>,
    ui: Arc<dyn UiProvider>,
) -> ExecutionContext {
    context(
        repository,
        VariableTypeRegistry::with_defaults(),
        ui,
        CancellationReceiver::never(),
    )
}

/// Transport returning canned responses and recording requests.
pub struct FakeTransport {
    status: u16,
    body: Vec<u8>,
    error: Option<TransportError>,
    requests: Mutex<Vec<ResolvedRequest>>,
}

impl FakeTransport {
    pub fn ok(body: &str) -> Arc<Self> {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.as_bytes().to_vec(),
            error: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            status: 0,
            body: Vec::new(),
            error: Some(error),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<ResolvedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(
        &self,
        request: &ResolvedRequest,
    ) -> Result<ResponseDescriptor, TransportError> {
        self.requests.lock().push(request.clone());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(ResponseDescriptor::from_bytes(
            self.status,
            vec![("Content-Type".to_string(), "text/plain".to_string())],
            self.body.clone(),
        ))
    }
}

/// Storage collecting bodies in memory under a fake path.
#[derive(Default)]
pub struct MemoryStorage {
    pub bodies: Mutex<Vec<Vec<u8>>>,
}

#[async_trait]
impl ResponseStorage for MemoryStorage {
    async fn store(
        &self,
        session_id: &str,
        response: ResponseDescriptor,
        _finish_normally_on_timeout: bool,
    ) -> Result<StoredResponse, StorageError> {
        use futures::StreamExt;

        let mut body = Vec::new();
        let mut stream = response.body;
        while let Some(chunk) = stream.next().await {
            body.extend(chunk?);
        }
        let size = body.len() as u64;
        self.bodies.lock().push(body);
        Ok(StoredResponse {
            status: response.status,
            headers: response.headers,
            path: PathBuf::from(format!("/responses/response_{session_id}")),
            size,
            truncated: false,
        })
    }
}

pub fn record(type_tag: &str, data: &[(&str, &str)]) -> ActionRecord {
    data.iter()
        .fold(ActionRecord::new(type_tag), |record, (k, v)| record.with(*k, *v))
}
