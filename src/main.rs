use anyhow::{Context, Result};
use autolinker::{load_config_async, AutolinkConfig, LinkNormalizer, Session, UrlDetector};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "autolinker")]
#[command(about = "Detect URLs at the end of text and replay documents through the auto-link plugin")]
#[command(version)]
struct Args {
    /// Emit debug-level logs on stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the URL ending each given text, if any
    Detect {
        /// Texts to inspect
        #[arg(required = true)]
        texts: Vec<String>,

        /// Protocol prepended to links without one
        #[arg(long)]
        default_protocol: Option<String>,
    },
    /// Type a file into an in-memory editor and print the links that were created
    Replay {
        /// Text file to replay; newlines press Enter, a trailing backslash presses Shift+Enter
        file: PathBuf,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Overrides default_protocol from the configuration
        #[arg(long)]
        default_protocol: Option<String>,
    },
}

#[derive(Serialize, Debug)]
struct DetectReport<'a> {
    input: &'a str,
    url: Option<&'a str>,
    href: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Detect { texts, default_protocol } => detect(&texts, default_protocol.as_deref()),
        Command::Replay { file, config, default_protocol } => replay(file, config, default_protocol).await,
    }
}

fn detect(texts: &[String], default_protocol: Option<&str>) -> Result<()> {
    let detector = UrlDetector::new()?;
    let normalizer = LinkNormalizer::new()?;

    for input in texts {
        let url = detector.url_at_text_end(input);
        let report = DetectReport {
            input: input.as_str(),
            url,
            href: url.map(|u| normalizer.add_protocol_if_applicable(u, default_protocol)),
        };
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}

async fn replay(file: PathBuf, config_path: Option<PathBuf>, default_protocol: Option<String>) -> Result<()> {
    let mut config = match config_path {
        Some(path) => load_config_async(&path).await?,
        None => AutolinkConfig::default(),
    };
    if default_protocol.is_some() {
        config.default_protocol = default_protocol;
    }

    if !file.is_file() {
        anyhow::bail!("Input is not a file: {}", file.display());
    }
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut session = Session::new(config)?;
    let outcomes = session.replay(&content);
    let applied = outcomes.iter().filter(|o| o.is_applied()).count();

    info!(events = outcomes.len(), applied, "Replay completed");

    let links = session.editor().links();
    println!("{}", serde_json::to_string_pretty(&links)?);

    Ok(())
}
