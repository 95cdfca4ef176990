//! `run` command implementation.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use config_loader::ConfigLoader;
use contracts::{
    ContextId, Destination, DestinationConfig, DestinationKind, PasteConfig, PasteError,
};
use scheduler::{create_destination, CommandDispatcher, HostDestination, Paster};
use source_loader::FileSourceLoader;

use crate::cli::RunArgs;
use crate::console::{Console, ConsoleAction, ConsoleNotifier};
use crate::error::CliError;

/// Execute the `run` command
pub async fn run_console(args: &RunArgs, show_summary: bool) -> Result<()> {
    let config = load_config(args)?;

    info!(
        default_delay_ms = config.paste.default_delay_ms,
        on_conflict = ?config.paste.on_conflict,
        destinations = config.destinations.len(),
        "Configuration loaded"
    );

    let destinations = build_destinations(&config)
        .await
        .context("Failed to set up destinations")?;

    let notifier = Arc::new(ConsoleNotifier::new());
    let paster = Arc::new(Paster::new(config.paste.clone(), Arc::clone(&notifier)));
    let dispatcher = CommandDispatcher::new(Arc::clone(&paster), FileSourceLoader::new());
    let mut console = Console::new(
        ContextId::from(args.context.as_str()),
        dispatcher,
        destinations,
    );

    if let Some(current) = console.current() {
        info!(destination = %current.id(), "Console ready");
    }

    let shutdown_signal = setup_shutdown_signal();
    tokio::pin!(shutdown_signal);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interrupted = false;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if console.handle_line(&line).await == ConsoleAction::Quit {
                        break;
                    }
                }
                Ok(None) => {
                    info!("Input closed, waiting for running pastes");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            },
            _ = &mut shutdown_signal => {
                warn!("Received shutdown signal");
                interrupted = true;
                break;
            }
        }
    }

    // Paused jobs never finish on their own; only running ones are awaited.
    if !interrupted {
        tokio::select! {
            _ = paster.wait_until_settled() => {}
            _ = &mut shutdown_signal => warn!("Received shutdown signal"),
        }
    }

    paster.shutdown().await;

    if show_summary {
        print!("{}", notifier.summary());
    }

    info!("linepacer finished");
    Ok(())
}

/// Load the config file (or defaults) and apply CLI overrides
fn load_config(args: &RunArgs) -> Result<PasteConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)?
        }
        None => PasteConfig::default(),
    };

    if let Some(delay) = args.delay {
        if delay == 0 {
            return Err(PasteError::invalid_delay("delay must be positive").into());
        }
        info!(delay_ms = delay, "Overriding default delay from CLI");
        config.paste.default_delay_ms = delay;
    }
    if let Some(policy) = args.on_conflict {
        info!(policy = ?policy, "Overriding conflict policy from CLI");
        config.paste.on_conflict = policy.into();
    }

    ConfigLoader::validate(&config)?;
    Ok(config)
}

/// Create every configured destination; a log destination if none are
async fn build_destinations(config: &PasteConfig) -> Result<Vec<HostDestination>, CliError> {
    let fallback;
    let configs = if config.destinations.is_empty() {
        fallback = [DestinationConfig {
            name: "#console".to_string(),
            network: "local".to_string(),
            kind: DestinationKind::Log,
            params: Default::default(),
        }];
        &fallback[..]
    } else {
        &config.destinations[..]
    };

    let mut destinations = Vec::with_capacity(configs.len());
    for cfg in configs {
        let destination = create_destination(cfg).await?;
        info!(destination = %destination.id(), kind = ?destination.kind(), "Destination ready");
        destinations.push(destination);
    }
    Ok(destinations)
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(config: Option<std::path::PathBuf>) -> RunArgs {
        RunArgs {
            config,
            delay: None,
            on_conflict: None,
            context: "console".to_string(),
            no_summary: true,
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let config = load_config(&args(None)).unwrap();
        assert_eq!(config.paste.default_delay_ms, 2500);
        assert!(config.destinations.is_empty());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[paste]\ndefault_delay_ms = 1000").unwrap();

        let mut run = args(Some(file.path().to_path_buf()));
        run.delay = Some(300);
        run.on_conflict = Some(crate::cli::ConflictArg::Replace);

        let config = load_config(&run).unwrap();
        assert_eq!(config.paste.default_delay_ms, 300);
        assert_eq!(config.paste.on_conflict, contracts::ConflictPolicy::Replace);
    }

    #[test]
    fn test_missing_config_and_zero_delay() {
        let err = load_config(&args(Some("/nonexistent/linepacer.toml".into()))).unwrap_err();
        assert!(matches!(err, CliError::ConfigNotFound { .. }));

        let mut run = args(None);
        run.delay = Some(0);
        assert!(load_config(&run).is_err());
    }

    #[tokio::test]
    async fn test_fallback_destination() {
        let destinations = build_destinations(&PasteConfig::default()).await.unwrap();
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0].id().channel(), "#console");
    }
}
