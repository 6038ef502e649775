//! CLI entrypoint for roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use roundtable_application::{
    ConversationLogger, DiscussionOutcome, LlmGateway, RunDiscussionInput, RunDiscussionUseCase,
};
use roundtable_domain::OutputFormat;
use roundtable_infrastructure::{
    CommandLlmGateway, ConfigLoader, FileConfig, FileGatewayKind, JsonlConversationLogger,
    RehearsalGateway,
};
use roundtable_presentation::{
    Cli, ConsoleFormatter, ConsoleProgress, InteractiveManualControl, OutputFormatter,
};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    info!("Starting roundtable");

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?
    };
    apply_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let input = build_input(&config)?;
    let format = cli
        .format
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    let outcome = if config.gateway.kind == FileGatewayKind::Rehearsal {
        let gateway = RehearsalGateway::new(
            input.tracker.pattern,
            input.panel.names(),
            input.tracker.ballot_size,
        );
        run(Arc::new(gateway), input, &config, &cli).await?
    } else {
        let Some(command) = config.gateway.command.as_deref() else {
            bail!("gateway.command is required for the command gateway");
        };
        let gateway = CommandLlmGateway::new(command, config.gateway.args.clone())?;
        run(Arc::new(gateway), input, &config, &cli).await?
    };

    println!("{}", ConsoleFormatter.render(&outcome, format));
    Ok(())
}

/// Console logging by `-v` count, plus a non-blocking file log with `--log-dir`.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let (file, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let name = format!(
                "roundtable-{}.log",
                chrono::Local::now().format("%Y%m%d-%H%M%S")
            );
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

/// Command-line flags win over every configuration file.
fn apply_overrides(config: &mut FileConfig, cli: &Cli) {
    let discussion = &mut config.discussion;
    if let Some(topic) = &cli.topic {
        discussion.topic = topic.clone();
    }
    if let Some(prefix) = &cli.prefix {
        discussion.name_prefix = prefix.clone();
    }
    if let Some(threshold) = cli.threshold {
        discussion.convergence_threshold = threshold;
    }
    if let Some(size) = cli.ballot_size {
        discussion.ballot_size = size;
    }
    if let Some(rounds) = cli.max_rounds {
        discussion.max_rounds = rounds;
    }
    if cli.interactive {
        discussion.interactive = true;
    }
    if let Some(path) = &cli.transcript {
        config.logging.conversation_log = Some(path.clone());
    }
    if cli.append_transcript {
        config.logging.append = true;
    }
    if cli.rehearsal {
        config.gateway.kind = FileGatewayKind::Rehearsal;
    }
}

fn build_input(config: &FileConfig) -> Result<RunDiscussionInput> {
    Ok(RunDiscussionInput::new(config.to_panel()?)
        .with_topic(config.discussion.topic.clone())
        .with_moderator(config.to_moderator())
        .with_tracker(config.to_tracker_config()?)
        .with_params(config.to_run_params()))
}

async fn run<G: LlmGateway + 'static>(
    gateway: Arc<G>,
    input: RunDiscussionInput,
    config: &FileConfig,
    cli: &Cli,
) -> Result<DiscussionOutcome> {
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing the current round");
            ctrl_c_token.cancel();
        }
    });

    let mut use_case = RunDiscussionUseCase::new(gateway).with_cancellation(token);

    if input.params.interactive {
        use_case = use_case.with_manual_control(Arc::new(InteractiveManualControl::new()));
    }

    if let Some(path) = &config.logging.conversation_log {
        let logger = if config.logging.append {
            JsonlConversationLogger::append(path)
        } else {
            JsonlConversationLogger::new(path)
        };
        match logger {
            Some(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
                use_case = use_case.with_conversation_logger(logger);
            }
            None => warn!("Continuing without a transcript"),
        }
    }

    let outcome = if cli.quiet {
        use_case.execute(input).await?
    } else {
        let progress = ConsoleProgress::new();
        use_case.execute_with_progress(input, &progress).await?
    };
    Ok(outcome)
}
