// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gtx: render the history of a git repository as a static site

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use gtx::config::{Cli, Settings};
use gtx::project;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("Unable to read the current directory")?;
    let output = cli.output_dir(&cwd);

    // Logging is not set up yet, so a bad settings file is reported below.
    let (settings, load_error) = match Settings::load(&output) {
        Ok(settings) => (settings.unwrap_or_default(), None),
        Err(e) => (Settings::default(), Some(e)),
    };
    let options = cli.merge(settings, &cwd)?;

    // Logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(options.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(e) = load_error {
        warn!(error = %e, "Ignoring saved settings");
    }

    options.validate()?;
    info!(
        project = %options.project,
        repo = %options.repo,
        output = %options.output.display(),
        "Starting gtx"
    );

    let report = project::run(&options).await?;
    if !report.is_clean() {
        warn!(
            failed = report.failed(),
            "Site generated with failures, see the log above"
        );
    }
    Ok(())
}
