//! Command-line entry point for flowconv.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flowconv_converter::Platform;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use flowconv::ToolConfig;
use flowconv::commands;

/// Convert legacy agent configuration into a component graph.
#[derive(Parser, Debug)]
#[command(name = "flowconv")]
#[command(about = "Convert legacy agent configuration into a component graph")]
#[command(version)]
struct Args {
    /// Path to the tool configuration file (JSON5 format).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides config.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Platform whose exporter defaults are used; overrides config.
    #[arg(long, global = true)]
    platform: Option<Platform>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a legacy config and print or write the result.
    Convert {
        /// Legacy configuration file (JSON5).
        input: PathBuf,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Diagnostics report file (default: stderr).
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write the output even when Critical diagnostics were reported.
        #[arg(long)]
        bypass_errors: bool,
    },

    /// Convert a legacy config and run its built-in components.
    Serve {
        /// Legacy configuration file (JSON5).
        input: PathBuf,

        /// HTTP listen address (overrides config).
        #[arg(long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => ToolConfig::load_from_file(path)?,
        None => ToolConfig::default(),
    };

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(platform) = args.platform {
        config.conversion.platform = Some(platform);
    }
    config.validate()?;

    flowconv_common::init_tracing(&config.logging)?;

    let supervisord_url = std::env::var("SUPERVISORD_URL").ok();

    match args.command {
        Command::Convert {
            input,
            output,
            report,
            bypass_errors,
        } => {
            if bypass_errors {
                config.conversion.bypass_errors = true;
            }
            let options = commands::convert_options(&config, supervisord_url);
            let conversion = commands::convert_path(&input, &options)?;

            let report = report.or_else(|| config.conversion.report_path.clone().map(PathBuf::from));
            commands::write_conversion(&conversion, &options, output.as_deref(), report.as_deref())?;
        }
        Command::Serve { input, listen } => {
            if let Some(listen) = listen {
                config.serve.listen = listen;
            }
            config.validate()?;

            let options = commands::convert_options(&config, supervisord_url);
            let conversion = commands::convert_path(&input, &options)?;
            if options.should_fail(&conversion.diagnostics) {
                eprintln!("{}", conversion.diagnostics.report());
                anyhow::bail!(flowconv::CommandError::Critical(
                    conversion.diagnostics.count(flowconv_common::Severity::Critical)
                ));
            }

            let host = commands::build_host(&conversion.file, &config.serve.listen)?;
            let cancel = CancellationToken::new();

            let signal_cancel = cancel.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                signal_cancel.cancel();
            });

            info!(listen = %config.serve.listen, "Starting flowconv host");
            commands::serve(host, &config.serve.listen, cancel).await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = async {
            #[cfg(unix)]
            {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    }
                }
            }
            #[cfg(not(unix))]
            {
                std::future::pending::<()>().await;
            }
        } => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
