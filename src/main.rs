use anyhow::Context;
use clap::{Parser, Subcommand};
use lcon::commands;
use lcon_core::config::Config;
use lcon_core::extractor::{FLATTEN, KEY_SEPARATOR, KV_SEPARATOR, LIST_SEPARATOR};
use lcon_core::{ExtractorConfiguration, InputValue};
use lcon_remote::HttpConsoleApi;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "lcon", about = "Log console client — extractor previews and alert annotations")]
struct Cli {
    /// Write debug logs to /tmp/lcon-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/lcon/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Try the JSON extractor against a sample message and print the preview.
    Try {
        /// Sample message to extract from.
        #[arg(long)]
        message: String,
        /// Stored extractor configuration as a JSON object.
        #[arg(long)]
        configuration: Option<String>,
        /// Flatten nested structures into a single field.
        #[arg(long)]
        flatten: bool,
        #[arg(long)]
        list_separator: Option<String>,
        #[arg(long)]
        key_separator: Option<String>,
        #[arg(long)]
        kv_separator: Option<String>,
    },
    /// Print alert annotations triggered since an epoch timestamp.
    Alerts {
        /// Lower bound, epoch seconds.
        #[arg(long)]
        since: i64,
        /// Restrict to one stream.
        #[arg(long)]
        stream: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load config, using defaults");
            Config::defaults()
        }),
    };
    let api = Arc::new(HttpConsoleApi::new(&config.server)?);

    match cli.command {
        Command::Try {
            message,
            configuration,
            flatten,
            list_separator,
            key_separator,
            kv_separator,
        } => {
            let supplied: Option<ExtractorConfiguration> = configuration
                .as_deref()
                .map(serde_json::from_str::<ExtractorConfiguration>)
                .transpose()
                .context("--configuration must be a JSON object of extractor options")?;

            let mut edits = Vec::new();
            if flatten {
                edits.push((FLATTEN.to_string(), InputValue::Checkbox(true)));
            }
            for (key, value) in [
                (LIST_SEPARATOR, list_separator),
                (KEY_SEPARATOR, key_separator),
                (KV_SEPARATOR, kv_separator),
            ] {
                if let Some(value) = value {
                    edits.push((key.to_string(), InputValue::Text(value)));
                }
            }

            let preview = commands::try_extraction(
                api,
                config.trial.timeout(),
                supplied.as_ref(),
                edits,
                &message,
            )
            .await?;

            match preview {
                Some(preview) => print!("{}", preview.render_text()),
                None => println!("(no fields extracted)"),
            }
        }
        Command::Alerts { since, stream } => {
            let annotations = commands::alert_annotations(api, since, stream.as_deref()).await?;
            for annotation in annotations {
                println!("{}\t{}", annotation.timestamp, annotation.text);
            }
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/lcon-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("lcon debug log started — tail -f /tmp/lcon-debug.log");
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}
