//! validator-exit: batch voluntary exits through ethdo.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use validator_exit::cli::Args;
use validator_exit::{service, BatchReport, Shutdown};

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let (exit_config, run_config) = args.into_configs();

    let (tx, shutdown) = Shutdown::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
    });
    tokio::task::yield_now().await;

    match service::run(exit_config, run_config, shutdown).await {
        Ok(report) => {
            match &report {
                BatchReport::Completed(summary) => info!("Done: {}", summary),
                BatchReport::Interrupted { hint, summary } => {
                    info!("Stopped: {}", summary);
                    if let Some(flag) = hint.flag() {
                        info!("To resume, run again with: {}", flag);
                    }
                }
                BatchReport::Halted {
                    index,
                    label,
                    detail,
                    summary,
                } => {
                    error!("Halted at index {} ({}): {}", index, label, detail);
                    error!("Exiting immediately due to failure. {}", summary);
                }
            }
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
