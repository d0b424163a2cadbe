//! Variable resolution through the manager and the built-in kinds.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod support;

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use courier_application::ExecutionError;
use courier_application::ports::{CancellationReceiver, Prompt, PromptResult, PromptValue, TextInputKind};
use courier_application::variables::VariableTypeRegistry;
use courier_domain::{Variable, VariableKind};
use pretty_assertions::assert_eq;
use serde_json::json;

use support::{
    CountingType, InMemoryVariables, ScriptedUi, context, default_context, no_ui, provider, text,
};

#[tokio::test]
async fn test_variable_is_resolved_once_per_run() {
    let counting = CountingType::new("hello");
    let mut types = VariableTypeRegistry::empty();
    types.register(VariableKind::Text, counting.clone());

    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("greeting", VariableKind::Text).with_id("v1"),
    ]));
    let ctx = context(repository, types, no_ui(), CancellationReceiver::never());

    let first = ctx.resolve_template("{{v1}} {{v1}}").await.unwrap();
    let second = ctx.variable_value("v1").await.unwrap();

    assert_eq!(first, "hello hello");
    assert_eq!(second, "hello");
    assert_eq!(counting.calls(), 1);
}

#[tokio::test]
async fn test_runs_do_not_share_values() {
    let counting = CountingType::new("x");
    let mut types = VariableTypeRegistry::empty();
    types.register(VariableKind::Constant, counting.clone());
    let repository = Arc::new(InMemoryVariables::with([Variable::constant("a", "x").with_id("a")]));

    for _ in 0..2 {
        let ctx = context(
            repository.clone(),
            types.clone(),
            no_ui(),
            CancellationReceiver::never(),
        );
        ctx.variable_value("a").await.unwrap();
    }

    assert_eq!(counting.calls(), 2);
}

#[tokio::test]
async fn test_missing_variable_resolves_to_empty() {
    let repository = Arc::new(InMemoryVariables::default());
    let ctx = default_context(repository, no_ui());

    let resolved = ctx.resolve_template("a{{deleted}}b").await.unwrap();

    assert_eq!(resolved, "ab");
    assert!(ctx.variables().is_resolved("deleted"));
}

#[tokio::test]
async fn test_constant_needs_no_ui() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::constant("host", "example.com").with_id("h"),
        Variable::new("empty", VariableKind::Constant).with_id("e"),
    ]));
    let ctx = default_context(repository, no_ui());

    assert_eq!(ctx.resolve_template("{{h}}/{{e}}").await.unwrap(), "example.com/");
}

#[tokio::test]
async fn test_text_prompt_is_prefilled_with_remembered_value() {
    let ui = ScriptedUi::answering([text("new")]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("name", VariableKind::Password)
            .with_id("p")
            .with_title("Secret")
            .with_value("old")
            .remembering(),
    ]));
    let ctx = default_context(repository.clone(), provider(ui.clone()));

    assert_eq!(ctx.variable_value("p").await.unwrap(), "new");
    assert_eq!(
        ui.shown(),
        vec![Prompt::TextInput {
            title: "Secret".to_string(),
            message: String::new(),
            input: TextInputKind::Password,
            prefill: "old".to_string(),
        }]
    );

    let writes = repository.wait_for_writes(1).await;
    assert_eq!(writes, vec![("p".to_string(), "new".to_string())]);
    assert_eq!(repository.stored_value("p").as_deref(), Some("new"));
}

#[tokio::test]
async fn test_value_is_not_persisted_without_remember_flag() {
    let ui = ScriptedUi::answering([text("typed")]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("name", VariableKind::Text).with_id("t"),
    ]));
    let ctx = default_context(repository.clone(), provider(ui));

    ctx.variable_value("t").await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    assert!(repository.writes().is_empty());
}

#[tokio::test]
async fn test_failed_persistence_does_not_fail_resolution() {
    let ui = ScriptedUi::answering([text("v")]);
    let repository = Arc::new(
        InMemoryVariables::with([Variable::new("k", VariableKind::Text)
            .with_id("t")
            .remembering()])
        .failing_writes(),
    );
    let ctx = default_context(repository.clone(), provider(ui));

    assert_eq!(ctx.variable_value("t").await.unwrap(), "v");
    assert_eq!(repository.wait_for_writes(1).await.len(), 1);
}

#[tokio::test]
async fn test_dismissed_prompt_is_cancellation_not_empty() {
    let ui = ScriptedUi::answering([PromptResult::Cancelled]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("k", VariableKind::Text).with_id("t"),
    ]));
    let ctx = default_context(repository, provider(ui));

    let result = ctx.variable_value("t").await;

    assert!(matches!(result, Err(ExecutionError::Cancelled)));
    assert!(!ctx.variables().is_resolved("t"));
}

#[tokio::test]
async fn test_prompt_without_ui() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("k", VariableKind::Text).with_id("t"),
    ]));
    let ctx = default_context(repository, no_ui());

    let result = ctx.variable_value("t").await;

    assert!(matches!(result, Err(ExecutionError::NoUiAvailable(_))));
}

#[tokio::test]
async fn test_number_validation() {
    let ui = ScriptedUi::answering([text("12."), text("twelve")]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("a", VariableKind::Number).with_id("a"),
        Variable::new("b", VariableKind::Number).with_id("b"),
    ]));
    let ctx = default_context(repository, provider(ui));

    assert_eq!(ctx.variable_value("a").await.unwrap(), "12");
    assert!(matches!(
        ctx.variable_value("b").await,
        Err(ExecutionError::User(_))
    ));
}

#[tokio::test]
async fn test_multi_select_joins_values() {
    let ui = ScriptedUi::answering([
        PromptResult::Value(PromptValue::Selection(vec![1, 0])),
        PromptResult::Value(PromptValue::Selection(vec![])),
    ]);
    let options = json!([{"label": "Alpha", "value": "a"}, {"label": "Beta", "value": "b"}]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("both", VariableKind::Select)
            .with_id("s1")
            .with_config("options", options.clone())
            .with_config("multi_select", true),
        Variable::new("none", VariableKind::Select)
            .with_id("s2")
            .with_config("options", options)
            .with_config("multi_select", true),
    ]));
    let ctx = default_context(repository, provider(ui.clone()));

    assert_eq!(ctx.variable_value("s1").await.unwrap(), "a,b");
    assert_eq!(ctx.variable_value("s2").await.unwrap(), "");
    assert!(matches!(
        &ui.shown()[0],
        Prompt::Select { options, multi_select: true, .. } if options == &["Alpha", "Beta"]
    ));
}

#[tokio::test]
async fn test_select_without_options_is_configuration_error() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("s", VariableKind::Select).with_id("s"),
    ]));
    let ctx = default_context(repository, provider(ScriptedUi::answering([])));

    assert!(matches!(
        ctx.variable_value("s").await,
        Err(ExecutionError::Configuration(_))
    ));
}

#[tokio::test]
async fn test_date_uses_pattern_and_stores_iso() {
    let date = NaiveDate::from_ymd_opt(2023, 12, 24).unwrap();
    let ui = ScriptedUi::answering([PromptResult::Value(PromptValue::Date(date))]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("day", VariableKind::Date)
            .with_id("d")
            .with_config("format", "dd.MM.yyyy")
            .remembering(),
    ]));
    let ctx = default_context(repository.clone(), provider(ui.clone()));

    assert_eq!(ctx.variable_value("d").await.unwrap(), "24.12.2023");
    assert_eq!(
        repository.wait_for_writes(1).await,
        vec![("d".to_string(), "2023-12-24".to_string())]
    );
    // Nothing remembered yet, so the picker starts at the clock's date.
    assert_eq!(
        ui.shown(),
        vec![Prompt::Date {
            title: "day".to_string(),
            initial: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        }]
    );
}

#[tokio::test]
async fn test_invalid_time_pattern_is_user_error_before_prompt() {
    let ui = ScriptedUi::answering([]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("t", VariableKind::Time)
            .with_id("t")
            .with_config("format", "HH:mm qq"),
    ]));
    let ctx = default_context(repository, provider(ui.clone()));

    let result = ctx.variable_value("t").await;

    assert!(matches!(result, Err(ExecutionError::User(message)) if message.contains("Invalid date format")));
    assert!(ui.shown().is_empty());
}

#[tokio::test]
async fn test_time_starts_from_remembered_value() {
    let remembered = NaiveTime::from_hms_opt(7, 45, 0).unwrap();
    let picked = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
    let ui = ScriptedUi::answering([PromptResult::Value(PromptValue::Time(picked))]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("t", VariableKind::Time)
            .with_id("t")
            .with_value(remembered.to_string())
            .remembering(),
    ]));
    let ctx = default_context(repository, provider(ui.clone()));

    assert_eq!(ctx.variable_value("t").await.unwrap(), "09:05");
    assert!(matches!(ui.shown()[0], Prompt::Time { initial, .. } if initial == remembered));
}

#[tokio::test]
async fn test_timestamp_uses_clock() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("now", VariableKind::Timestamp)
            .with_id("n")
            .with_config("format", "yyyyMMdd'T'HHmmss"),
    ]));
    let ctx = default_context(repository, no_ui());

    assert_eq!(ctx.variable_value("n").await.unwrap(), "20240307T140509");
}

#[tokio::test]
async fn test_color_is_lowercase_hex() {
    let ui = ScriptedUi::answering([PromptResult::Value(PromptValue::Color(0x00AB_CD0F))]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("c", VariableKind::Color)
            .with_id("c")
            .with_value("#102030")
            .remembering(),
    ]));
    let ctx = default_context(repository, provider(ui.clone()));

    assert_eq!(ctx.variable_value("c").await.unwrap(), "abcd0f");
    assert!(matches!(ui.shown()[0], Prompt::Color { initial: 0x0010_2030, .. }));
}

#[tokio::test]
async fn test_slider() {
    let ui = ScriptedUi::answering([PromptResult::Value(PromptValue::Number(2.5))]);
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("volume", VariableKind::Slider)
            .with_id("s")
            .with_config("min", 0)
            .with_config("max", 10)
            .with_config("step", 0.5),
    ]));
    let ctx = default_context(repository, provider(ui));

    assert_eq!(ctx.variable_value("s").await.unwrap(), "2.5");
}

#[tokio::test]
async fn test_toggle_cycles_between_runs() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("mode", VariableKind::Toggle)
            .with_id("m")
            .with_config("options", json!(["on", "off"])),
    ]));

    let mut seen = Vec::new();
    for run in 1..=3 {
        let ctx = default_context(repository.clone(), no_ui());
        seen.push(ctx.variable_value("m").await.unwrap());
        repository.wait_for_writes(run).await;
    }

    assert_eq!(seen, vec!["on", "off", "on"]);
}

#[tokio::test]
async fn test_increment_is_always_persisted() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("counter", VariableKind::Increment)
            .with_id("i")
            .with_value("41"),
    ]));
    let ctx = default_context(repository.clone(), no_ui());

    assert_eq!(ctx.variable_value("i").await.unwrap(), "42");
    assert_eq!(
        repository.wait_for_writes(1).await,
        vec![("i".to_string(), "42".to_string())]
    );
}

#[tokio::test]
async fn test_uuid_is_fresh_per_run_but_stable_within_run() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("id", VariableKind::Uuid).with_id("u"),
    ]));

    let ctx = default_context(repository.clone(), no_ui());
    let first = ctx.resolve_template("{{u}}|{{u}}").await.unwrap();
    let (a, b) = first.split_once('|').unwrap();
    assert_eq!(a, b);
    assert!(uuid::Uuid::parse_str(a).is_ok());

    let other = default_context(repository, no_ui());
    assert_ne!(other.variable_value("u").await.unwrap(), a);
}

#[tokio::test]
async fn test_seeded_values_skip_resolution() {
    let counting = CountingType::new("resolved");
    let mut types = VariableTypeRegistry::empty();
    types.register(VariableKind::Text, counting.clone());
    let repository = Arc::new(InMemoryVariables::with([
        Variable::new("k", VariableKind::Text).with_id("t"),
    ]));
    let manager = courier_application::VariableManager::new(repository, Arc::new(types))
        .with_values([("t".to_string(), "preset".to_string())].into_iter().collect());
    let ctx = courier_application::ExecutionContext::new(
        manager,
        no_ui(),
        CancellationReceiver::never(),
        Arc::new(support::FixedClock),
    );

    assert_eq!(ctx.variable_value("t").await.unwrap(), "preset");
    assert_eq!(counting.calls(), 0);
}

#[tokio::test]
async fn test_lookup_by_key() {
    let repository = Arc::new(InMemoryVariables::with([
        Variable::constant("base_url", "x").with_id("id-1"),
    ]));
    let ctx = default_context(repository, no_ui());

    assert_eq!(ctx.variables().lookup_id("base_url").await.unwrap(), "id-1");
    assert_eq!(ctx.variables().lookup_id("id-1").await.unwrap(), "id-1");
    assert_eq!(ctx.variables().lookup_id("other").await.unwrap(), "other");
}
