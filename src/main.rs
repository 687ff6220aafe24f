//! mdpager - A terminal markdown pager with presentation mode and live reload.
//!
//! # Usage
//!
//! ```bash
//! mdpager README.md
//! mdpager --presentation talk.md
//! mdpager --line-numbers --width 80 notes.md
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use mdpager::app::App;
use mdpager::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};

/// A terminal markdown pager with presentation mode and live reload
#[derive(Parser, Debug)]
#[command(name = "mdpager", version, about, long_about = None)]
struct Cli {
    /// Markdown or source file to view
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Page through numbered top-level headers as slides
    #[arg(long)]
    presentation: bool,

    /// Show line numbers for markdown
    #[arg(long)]
    line_numbers: bool,

    /// Keep single newlines instead of reflowing paragraphs
    #[arg(long)]
    preserve_new_lines: bool,

    /// Show the raw text without rendering
    #[arg(long)]
    no_render: bool,

    /// Maximum word-wrap width
    #[arg(long, value_name = "N")]
    width: Option<u16>,

    /// Color theme for the terminal background
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Scroll with the mouse wheel
    #[arg(long)]
    mouse: bool,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

/// Where log output goes. The terminal belongs to the pager while it runs,
/// so logs are discarded unless a file is given.
fn log_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(std::io::sink));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    Ok(BoxMakeWriter::new(Mutex::new(file)))
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(log_writer(log_file)?)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let settings = file_flags.union(&cli_flags).resolve();

    init_logging(settings.log_file.as_deref())?;
    tracing::debug!(?settings, file = %cli.file.display(), "starting");

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let mut app = App::new(cli.file)
        .with_style(settings.style)
        .with_presentation(settings.presentation)
        .with_mouse(settings.mouse);

    app.run().context("Application error")
}
