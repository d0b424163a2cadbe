//! Courier - Main Entry Point
//!
//! Wires the engine to its file-based adapters and a terminal UI, then runs
//! the requested command.

mod cli;
mod terminal;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use courier_application::ports::{CancellationToken, ForegroundUi, VariableRepository};
use courier_application::{ActionTypeRegistry, RunOutcome, RunOutput, ShortcutRunner};
use courier_domain::{EngineSettings, Shortcut};
use courier_infrastructure::{
    FileResponseStorage, FileVariableRepository, ReqwestHttpTransport, SettingsLoader,
    SystemClock, read_json_file, render_script,
};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command, RunArgs};
use crate::terminal::TerminalUi;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILED: i32 = 1;
const EXIT_ERROR: i32 = 2;
/// Exit status of a cancelled run, as for SIGINT.
const EXIT_CANCELLED: i32 = 130;
/// Upper bound on waiting for remembered values before exiting.
const WRITE_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let code = match execute(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            EXIT_ERROR
        }
    };
    // A prompt interrupted by Ctrl+C leaves a blocking stdin read behind,
    // which would keep the runtime from shutting down.
    std::process::exit(code);
}

async fn execute(cli: Cli) -> AppResult<i32> {
    let loader = cli
        .settings
        .map_or_else(SettingsLoader::default, SettingsLoader::at);

    match cli.command {
        Command::Run(args) => {
            let settings = loader.load_with_env().await?;
            run(args, settings).await
        }
        Command::Script { shortcut } => {
            let shortcut = load_shortcut(&shortcut).await?;
            let registry = ActionTypeRegistry::with_defaults();
            for (section, records) in [
                ("prepare", &shortcut.prepare_actions),
                ("success", &shortcut.success_actions),
                ("failure", &shortcut.failure_actions),
            ] {
                if !records.is_empty() {
                    println!("# {section}");
                    print!("{}", render_script(records, &registry)?);
                }
            }
            Ok(EXIT_SUCCESS)
        }
        Command::Actions => {
            for descriptor in ActionTypeRegistry::with_defaults().descriptors() {
                let alias = descriptor.alias;
                println!(
                    "{:<18} {}({})",
                    descriptor.type_tag,
                    alias.function_name,
                    alias.parameters.join(", ")
                );
            }
            Ok(EXIT_SUCCESS)
        }
    }
}

async fn load_shortcut(path: &Path) -> AppResult<Shortcut> {
    read_json_file(path)
        .await?
        .ok_or_else(|| format!("shortcut not found: {}", path.display()).into())
}

async fn run(args: RunArgs, mut settings: EngineSettings) -> AppResult<i32> {
    if let Some(dir) = args.response_dir {
        settings.response_dir = Some(dir);
    }
    if let Some(file) = args.variables {
        settings.variables_file = Some(file);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        settings.default_timeout_ms = timeout_ms;
    }

    let shortcut = load_shortcut(&args.shortcut).await?;

    let variables: Arc<dyn VariableRepository> = match &settings.variables_file {
        Some(path) => Arc::new(FileVariableRepository::load(path).await?),
        None => {
            debug!("no variables file configured, using an empty store");
            Arc::new(FileVariableRepository::in_memory(Vec::new())?)
        }
    };
    let storage = settings
        .response_dir
        .as_ref()
        .map_or_else(FileResponseStorage::in_cache_dir, FileResponseStorage::new);
    let transport = ReqwestHttpTransport::new(&settings)?;

    let runner = ShortcutRunner::new(
        Arc::new(transport),
        Arc::new(storage),
        variables,
        Arc::new(SystemClock::new()),
    )
    .with_settings(settings);

    let (token, cancellation) = CancellationToken::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let ui = Arc::new(ForegroundUi::attached(Arc::new(TerminalUi::stdio())));
    let ctx = runner.context(ui, cancellation);
    for (name, value) in args.presets {
        let id = ctx.variables().lookup_id(&name).await?;
        ctx.variables().set_value(&id, value);
    }

    let outcome = runner.run_with_context(&shortcut, &ctx).await;
    let code = report(outcome);
    if tokio::time::timeout(WRITE_FLUSH_TIMEOUT, ctx.variables().flush_writes())
        .await
        .is_err()
    {
        warn!("gave up waiting for remembered variable values to be written");
    }
    Ok(code)
}

fn report(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Completed(output) => {
            match output {
                RunOutput::Empty => {}
                RunOutput::Text(text) => println!("{text}"),
                RunOutput::File(stored) => {
                    if stored.truncated {
                        warn!("response body is incomplete");
                    }
                    eprintln!("HTTP {} ({} bytes)", stored.status, stored.size);
                    println!("{}", stored.path.display());
                }
            }
            EXIT_SUCCESS
        }
        RunOutcome::Failed(error) => {
            eprintln!("failed: {error}");
            EXIT_FAILED
        }
        RunOutcome::Cancelled => {
            eprintln!("cancelled");
            EXIT_CANCELLED
        }
    }
}
