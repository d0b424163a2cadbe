//! End-to-end shortcut runs against fake collaborators.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod support;

use std::sync::Arc;
use std::time::Duration;

use courier_application::ports::{CancellationReceiver, PromptResult, TransportError};
use courier_application::{ExecutionError, RunOutcome, RunOutput, ShortcutRunner};
use courier_domain::{EngineSettings, HttpMethod, Shortcut, Variable, VariableKind};
use pretty_assertions::assert_eq;

use support::{
    FakeTransport, FixedClock, InMemoryVariables, MemoryStorage, ScriptedUi, no_ui, provider,
    record, text,
};

fn runner(
    transport: Arc<FakeTransport>,
    storage: Arc<MemoryStorage>,
    variables: Arc<InMemoryVariables>,
) -> ShortcutRunner {
    ShortcutRunner::new(transport, storage, variables, Arc::new(FixedClock))
}

#[tokio::test]
async fn test_request_is_built_from_resolved_variables() {
    let transport = FakeTransport::ok("pong");
    let storage = Arc::new(MemoryStorage::default());
    let variables = Arc::new(InMemoryVariables::with([
        Variable::constant("host", "api.example.com").with_id("h"),
        Variable::new("token", VariableKind::Password).with_id("t"),
        Variable::constant("header", "Auth").with_id("hn"),
    ]));
    let ui = ScriptedUi::answering([text("s3cr3t")]);
    let shortcut = Shortcut::new("Ping", " https://{{h}}/ping?q={{missing}} ")
        .with_method(HttpMethod::Post)
        .with_header("X-{{hn}}", "Bearer {{t}}")
        .with_header("{{missing}}", "dropped")
        .with_body(r#"{"token": "{{t}}"}"#);

    let outcome = runner(transport.clone(), storage.clone(), variables)
        .run(&shortcut, provider(ui.clone()), CancellationReceiver::never())
        .await;

    let stored = match outcome {
        RunOutcome::Completed(RunOutput::File(stored)) => stored,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(stored.status, 200);
    assert_eq!(storage.bodies.lock()[0], b"pong".to_vec());

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "https://api.example.com/ping?q=");
    assert_eq!(request.header("X-Auth"), Some("Bearer s3cr3t"));
    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.body, r#"{"token": "s3cr3t"}"#);
    assert_eq!(request.timeout, Duration::from_secs(30));
    // The password was asked once even though it is used twice.
    assert_eq!(ui.shown().len(), 1);
}

#[tokio::test]
async fn test_get_request_ignores_body_variables() {
    let transport = FakeTransport::ok("");
    let ui = ScriptedUi::answering([]);
    let variables = Arc::new(InMemoryVariables::with([
        Variable::new("ask", VariableKind::Text).with_id("a"),
    ]));
    let shortcut = Shortcut::new("Get", "https://example.com").with_body("{{a}}");

    let outcome = runner(transport.clone(), Arc::new(MemoryStorage::default()), variables)
        .run(&shortcut, provider(ui.clone()), CancellationReceiver::never())
        .await;

    assert!(outcome.is_completed());
    assert!(ui.shown().is_empty());
    assert_eq!(transport.requests()[0].body, "");
}

#[tokio::test]
async fn test_success_action_output_replaces_file() {
    let shortcut = Shortcut::new("s", "https://example.com")
        .with_success_action(record("base64_encode", &[("text", "done")]));

    let outcome = runner(
        FakeTransport::ok("body"),
        Arc::new(MemoryStorage::default()),
        Arc::new(InMemoryVariables::default()),
    )
    .run(&shortcut, no_ui(), CancellationReceiver::never())
    .await;

    assert!(matches!(outcome, RunOutcome::Completed(RunOutput::Text(ref t)) if t == "ZG9uZQ=="));
}

#[tokio::test]
async fn test_cancelled_prepare_action_skips_request() {
    let transport = FakeTransport::ok("");
    let ui = ScriptedUi::answering([PromptResult::Cancelled]);
    let shortcut = Shortcut::new("s", "https://example.com")
        .with_prepare_action(record("confirm", &[("message", "Send?")]));

    let outcome = runner(
        transport.clone(),
        Arc::new(MemoryStorage::default()),
        Arc::new(InMemoryVariables::default()),
    )
    .run(&shortcut, provider(ui), CancellationReceiver::never())
    .await;

    assert!(outcome.is_cancelled());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_cancelled_request_variable_skips_request() {
    let transport = FakeTransport::ok("");
    let ui = ScriptedUi::answering([PromptResult::Cancelled]);
    let variables = Arc::new(InMemoryVariables::with([
        Variable::new("q", VariableKind::Text).with_id("q"),
    ]));
    let shortcut = Shortcut::new("s", "https://example.com/?q={{q}}");

    let outcome = runner(transport.clone(), Arc::new(MemoryStorage::default()), variables)
        .run(&shortcut, provider(ui), CancellationReceiver::never())
        .await;

    assert!(outcome.is_cancelled());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_error_status_runs_failure_actions() {
    let ui = ScriptedUi::answering([]);
    let shortcut = Shortcut::new("s", "https://example.com")
        .with_success_action(record("show_dialog", &[("text", "ok")]))
        .with_failure_action(record("show_dialog", &[("text", "it broke")]));

    let outcome = runner(
        FakeTransport::status(503, "unavailable"),
        Arc::new(MemoryStorage::default()),
        Arc::new(InMemoryVariables::default()),
    )
    .run(&shortcut, provider(ui.clone()), CancellationReceiver::never())
    .await;

    assert!(matches!(
        outcome,
        RunOutcome::Failed(ExecutionError::HttpStatus { status: 503, .. })
    ));
    assert_eq!(ui.shown().len(), 1);
    assert!(matches!(
        &ui.shown()[0],
        courier_application::ports::Prompt::Message { message, .. } if message == "it broke"
    ));
}

#[tokio::test]
async fn test_transport_error_is_failure() {
    let outcome = runner(
        FakeTransport::failing(TransportError::ConnectionFailed("refused".to_string())),
        Arc::new(MemoryStorage::default()),
        Arc::new(InMemoryVariables::default()),
    )
    .run(
        &Shortcut::new("s", "https://example.com"),
        no_ui(),
        CancellationReceiver::never(),
    )
    .await;

    assert!(matches!(
        outcome,
        RunOutcome::Failed(ExecutionError::Transport(TransportError::ConnectionFailed(_)))
    ));
}

#[tokio::test]
async fn test_invalid_url_is_failure_without_request() {
    let transport = FakeTransport::ok("");
    let variables = Arc::new(InMemoryVariables::with([
        Variable::constant("u", "ftp://example.com").with_id("u"),
    ]));

    let outcome = runner(transport.clone(), Arc::new(MemoryStorage::default()), variables)
        .run(
            &Shortcut::new("s", "{{u}}"),
            no_ui(),
            CancellationReceiver::never(),
        )
        .await;

    assert!(matches!(outcome, RunOutcome::Failed(ExecutionError::Domain(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_action_data_fails_before_anything_runs() {
    let transport = FakeTransport::ok("");
    let mut shortcut = Shortcut::new("s", "https://example.com");
    shortcut.success_actions.push(
        courier_domain::ActionRecord::new("wait").with("duration", serde_json::json!([1])),
    );

    let outcome = runner(
        transport.clone(),
        Arc::new(MemoryStorage::default()),
        Arc::new(InMemoryVariables::default()),
    )
    .run(&shortcut, no_ui(), CancellationReceiver::never())
    .await;

    assert!(matches!(outcome, RunOutcome::Failed(ExecutionError::Configuration(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_settings_timeout_and_shortcut_override() {
    let transport = FakeTransport::ok("");
    let settings = EngineSettings {
        default_timeout_ms: 1_000,
        ..EngineSettings::default()
    };
    let runner = runner(
        transport.clone(),
        Arc::new(MemoryStorage::default()),
        Arc::new(InMemoryVariables::default()),
    )
    .with_settings(settings);

    let mut shortcut = Shortcut::new("s", "https://example.com");
    runner
        .run(&shortcut, no_ui(), CancellationReceiver::never())
        .await;
    shortcut.timeout_ms = Some(250);
    runner
        .run(&shortcut, no_ui(), CancellationReceiver::never())
        .await;

    let timeouts: Vec<_> = transport.requests().iter().map(|r| r.timeout).collect();
    assert_eq!(
        timeouts,
        vec![Duration::from_secs(1), Duration::from_millis(250)]
    );
}

#[tokio::test]
async fn test_set_variable_in_prepare_feeds_request() {
    let transport = FakeTransport::ok("");
    let variables = Arc::new(InMemoryVariables::with([
        Variable::constant("page", "1").with_id("p"),
    ]));
    let shortcut = Shortcut::new("s", "https://example.com/?page={{p}}")
        .with_prepare_action(record("set_variable", &[("variableId", "page"), ("value", "7")]));

    runner(transport.clone(), Arc::new(MemoryStorage::default()), variables)
        .run(&shortcut, no_ui(), CancellationReceiver::never())
        .await;

    assert_eq!(transport.requests()[0].url, "https://example.com/?page=7");
}
