use clap::Parser;
use std::path::PathBuf;

use widget_build::cli::Cli;
use widget_build::log_collector::{level_for_verbosity, LogCollector};
use widget_build::models::ProjectLayout;
use widget_build::orchestrator::locate_project;
use widget_build::WidgetBuilder;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Root check before anything is written: the log directory is only
    // created once the working directory is known to be the project root.
    let located = locate_project(cli.config.as_deref());

    let level = level_for_verbosity(cli.verbose);
    let collector = match (&cli.log_dir, &located) {
        (Some(dir), Ok(_)) => match LogCollector::with_log_dir(level, dir) {
            Ok(collector) => collector,
            Err(e) => {
                eprintln!("[Main] WARNING: {}; logging to stderr only", e);
                LogCollector::stderr_only(level)
            }
        },
        _ => LogCollector::stderr_only(level),
    };
    let flush_handle = collector.clone();
    if let Err(e) = collector.install() {
        eprintln!("[Main] WARNING: Failed to register logger: {}", e);
    }
    if let Some(path) = flush_handle.log_path() {
        log::info!("[Main] Writing build log to {}", path.display());
    }

    let result = match located {
        Ok((layout, root)) => run(cli, layout, root).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = &result {
        log::error!("[Main] {:#}", e);
    }

    if let Err(e) = flush_handle.wait_for_empty() {
        eprintln!("[Main] WARNING: Failed to flush log file: {}", e);
    }

    if result.is_err() {
        std::process::exit(1);
    }
}

async fn run(cli: Cli, layout: ProjectLayout, root: PathBuf) -> anyhow::Result<()> {
    if let Some(path) = &cli.config {
        log::info!("[Config] Using layout overrides from {}", path.display());
    }

    let options = cli.build_options();
    log::info!(
        "[Main] Building widget in {} (local changes: {}, assert no changes: {}, status backend: {})",
        root.display(),
        options.use_local_changes,
        options.assert_no_changes,
        options.status_backend
    );

    let report = WidgetBuilder::new(options, layout, root).run().await?;

    if report.dry_run {
        log::info!("[Main] Dry run complete, {} steps skipped", report.skipped.len());
    }
    Ok(())
}
