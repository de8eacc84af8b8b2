use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatfmt::Config;

/// Picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "chatfmt.toml";

#[derive(Parser)]
#[command(name = "chatfmt")]
#[command(about = "Format chat message text as HTML")]
struct Cli {
    /// Input text file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Output HTML file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML config file (defaults to ./chatfmt.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run the text passes; leave list markers as text
    #[arg(long)]
    passes_only: bool,

    /// Escape raw HTML in the message before formatting
    #[arg(long)]
    escape: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::load(Path::new(DEFAULT_CONFIG_FILE)),
    };
    if cli.escape {
        config.escape.html = true;
    }

    // Read input
    let text = match read_input(cli.input.as_ref()) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            std::process::exit(1);
        }
    };

    let html = if cli.passes_only {
        chatfmt::apply_text_formatting_with_config(&text, &config)
    } else {
        chatfmt::render_message_with_config(&text, &config)
    };
    tracing::debug!(input = text.len(), output = html.len(), "formatted message");

    // Write output
    let written = match &cli.output {
        Some(path) => fs::write(path, &html),
        None => io::stdout().write_all(html.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
