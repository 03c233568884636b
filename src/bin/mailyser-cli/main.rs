mod args;
mod output;

use anyhow::{Context, Result};
use mailyser_lib::{Checker, RequestLifecycle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands};
use output::OutputRow;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    args::ensure_format(&cli.format)?;

    let emails = if cli.stdin {
        read_stdin().await?
    } else if let Some(Commands::Check { email }) = &cli.cmd {
        vec![email.clone()]
    } else {
        Cli::clap_command().print_help()?;
        println!();
        return Ok(());
    };

    let options = cli.check_options()?;
    let checker = Checker::from_system_conf(options).context("initialise DNS resolver")?;
    let mut lifecycle = RequestLifecycle::new();
    let mut rows = Vec::with_capacity(emails.len());

    for email in &emails {
        let ticket = lifecycle.begin(email.as_str());
        let outcome = checker.submit(email.as_str()).wait().await;
        if let Err(err) = &outcome {
            tracing::debug!(email = %email, error = %err, "check failed");
        }
        lifecycle.complete(ticket, outcome);
        rows.push(OutputRow::from_state(email, lifecycle.state()));
    }

    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 fail/adresse rejetée, 1 fatal
    if output::any_failed(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

async fn read_stdin() -> Result<Vec<String>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut emails = Vec::new();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            emails.push(trimmed.to_string());
        }
    }
    Ok(emails)
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
