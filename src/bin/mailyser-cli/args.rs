use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use mailyser_lib::{CheckOptions, DkimStrategy};

#[derive(Parser)]
#[command(name = "mailyser-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// fichier de configuration JSON (CheckOptions), les options CLI priment
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// sélecteur DKIM à interroger (répétable, remplace la liste par défaut)
    #[arg(long = "dkim-selector")]
    pub dkim_selectors: Vec<String>,

    /// ajoute les sélecteurs DKIM courants (selector2, k1, dkim, mail, ...)
    #[arg(long)]
    pub extended_selectors: bool,

    /// interroge les sélecteurs DKIM un par un (arrêt au premier trouvé)
    #[arg(long)]
    pub sequential_dkim: bool,

    /// timeout par requête DNS (ms, 0 = valeur par défaut)
    #[arg(long = "timeout")]
    pub timeout_ms: Option<u64>,

    /// signale un SPF avec plus de N mécanismes include:
    #[arg(long)]
    pub spf_include_limit: Option<usize>,

    /// verbosité des logs sur stderr (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// vérifie SPF/DMARC/DKIM pour le domaine de l'adresse
    Check { email: String },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn check_options(&self) -> Result<CheckOptions> {
        let mut options = match &self.config {
            Some(path) => load_config(path)?,
            None => CheckOptions::default(),
        };

        if !self.dkim_selectors.is_empty() {
            options = options.replace_dkim_selectors(self.dkim_selectors.iter().cloned());
        }
        if self.extended_selectors {
            options = options.with_extended_selectors();
        }
        if self.sequential_dkim {
            options = options.with_dkim_strategy(DkimStrategy::Sequential);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            options = options.with_timeout_ms(timeout_ms);
        }
        if self.spf_include_limit.is_some() {
            options = options.with_spf_include_limit(self.spf_include_limit);
        }
        Ok(options)
    }
}

#[cfg(feature = "with-serde")]
fn load_config(path: &std::path::Path) -> Result<CheckOptions> {
    use anyhow::Context;

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let options: CheckOptions = serde_json::from_str(&raw)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(options.normalized())
}

#[cfg(not(feature = "with-serde"))]
fn load_config(_: &std::path::Path) -> Result<CheckOptions> {
    bail!("--config nécessite la feature 'with-serde'")
}

pub fn ensure_format(format: &str) -> Result<()> {
    match format {
        "human" | "json" | "ndjson" | "csv" => Ok(()),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("mailyser-cli").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn dkim_selector_flag_replaces_defaults() {
        let options = cli(&["--dkim-selector", "X", "check", "a@example.com"])
            .check_options()
            .expect("options");
        assert_eq!(options.dkim_selectors(), ["x"]);
    }

    #[test]
    fn flags_without_config_start_from_defaults() {
        let options = cli(&["--sequential-dkim", "--timeout", "250"])
            .check_options()
            .expect("options");
        assert_eq!(options.dkim_selectors(), CheckOptions::default().dkim_selectors());
        assert_eq!(options.dkim_strategy(), DkimStrategy::Sequential);
        assert_eq!(options.timeout(), Duration::from_millis(250));
        assert_eq!(options.spf_include_limit(), None);
    }

    #[cfg(feature = "with-serde")]
    #[test]
    fn flags_override_config_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"dkim_selectors": [" S1. ", "s2"], "timeout_ms": 9000, "dkim_strategy": "sequential", "spf_include_limit": 3}}"#
        )
        .expect("write config");
        let path = file.path().to_str().expect("utf-8 path");

        let from_file = cli(&["--config", path]).check_options().expect("options");
        assert_eq!(from_file.dkim_selectors(), ["s1", "s2"]);
        assert_eq!(from_file.timeout(), Duration::from_millis(9_000));
        assert_eq!(from_file.dkim_strategy(), DkimStrategy::Sequential);
        assert_eq!(from_file.spf_include_limit(), Some(3));

        let merged = cli(&[
            "--config",
            path,
            "--dkim-selector",
            "X",
            "--timeout",
            "100",
            "--spf-include-limit",
            "8",
        ])
        .check_options()
        .expect("options");
        assert_eq!(merged.dkim_selectors(), ["x"]);
        assert_eq!(merged.timeout(), Duration::from_millis(100));
        assert_eq!(merged.spf_include_limit(), Some(8));
        assert_eq!(merged.dkim_strategy(), DkimStrategy::Sequential);
    }

    #[cfg(feature = "with-serde")]
    #[test]
    fn unreadable_config_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        let path = missing.to_str().expect("utf-8 path");
        assert!(cli(&["--config", path]).check_options().is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(ensure_format("csv").is_ok());
        assert!(ensure_format("xml").is_err());
    }
}
