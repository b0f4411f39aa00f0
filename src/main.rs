use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod creative;
mod error;
mod hypothesis;
mod loader;
mod models;
mod observer;
mod output;
mod pipeline;
mod report;
mod stats;
#[cfg(test)]
mod test_support;
mod trends;
mod validate;

use config::Cli;
use observer::{NoopObserver, PipelineObserver, TracingObserver};
use pipeline::Pipeline;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let delimiter = cli.delimiter_byte()?;
    let observer: &dyn PipelineObserver = if cli.quiet {
        &NoopObserver
    } else {
        &TracingObserver
    };

    let result = Pipeline::new(hypothesis::default_rules(), observer)
        .run(&cli.request, &cli.data, delimiter)
        .with_context(|| format!("failed to analyze {}", cli.data.display()))?;

    let artifacts = output::render(&result, &cli.request, Utc::now());
    let mut failed = 0usize;
    for outcome in output::write_all(&cli.out_dir, artifacts) {
        match outcome {
            Ok(path) => info!("{} created", path.display()),
            Err(err) => {
                error!("{err}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of 3 output artifacts could not be written");
    }

    println!(
        "Reviewed {} campaigns; {} hypotheses hold up; {} sets of ad ideas written to {}.",
        result.summary.campaign_count,
        result.hypotheses.iter().filter(|h| h.accepted).count(),
        result.creatives.suggestions.len(),
        cli.out_dir.display()
    );

    Ok(())
}
