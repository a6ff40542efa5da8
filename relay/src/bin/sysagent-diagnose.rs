use anyhow::Context;
use clap::Parser;
use log::{error, info};
use std::io::{self, Write};
use sysagent::{
    cli::DiagnoseCli,
    diagnostic::{run_probe, write_banner, write_network_error, write_outcome},
    logging::init_logger,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = DiagnoseCli::parse();
    let _logger = init_logger(&cli.log_level, false)?;

    let key = cli
        .upstream
        .api_key()
        .inspect_err(|e| error!("{e}"))?;
    let client = cli
        .upstream
        .client()
        .context("Failed to set up the HTTP client")?;

    let mut out = io::stdout().lock();
    write_banner(
        &mut out,
        cli.upstream.proxy(),
        &cli.upstream.base_url,
        &cli.model,
    )?;
    out.flush()?;

    info!("Probing {} with {} auth", cli.model, cli.auth);
    match run_probe(client, &key, cli.auth, &cli.model).await {
        Ok(outcome) => write_outcome(&mut out, &outcome)?,
        // Transport failures are reported, not retried.
        Err(e) => write_network_error(&mut out, &e)?,
    }
    Ok(())
}
