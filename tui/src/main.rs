//! praxis-tui binary
//!
//! Parses CLI arguments, loads config and preferences, sets the terminal
//! up, and hands control to the App event loop. Logging goes to stderr via
//! `RUST_LOG`; leave it unset for a clean screen.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use narrator_core::{NarratorConfig, Preferences, Technology, ThemeChoice};
use praxis_tui::App;

/// Terminal viewer for narrated programming-language lessons.
#[derive(Debug, Parser)]
#[command(name = "praxis-tui", version, about)]
struct Args {
    /// Technology catalog to browse (html, css, js, ts, react, vue, python)
    #[arg(short, long, default_value = "html")]
    technology: String,

    /// Directory holding the per-technology catalog files
    #[arg(long, env = "PRAXIS_CONTENT_DIR")]
    content_dir: Option<PathBuf>,

    /// Open this element's lesson immediately
    #[arg(short, long)]
    element: Option<String>,

    /// Config file path (defaults to ./praxis.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the persisted theme (light or dark)
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let technology = Technology::parse(&args.technology)
        .with_context(|| format!("unknown technology: {}", args.technology))?;

    let config_path = args.config.unwrap_or_else(|| PathBuf::from("praxis.toml"));
    let mut config = NarratorConfig::load(&config_path)?;
    if let Some(dir) = args.content_dir {
        config.content_dir = dir;
    }

    let prefs_path = Preferences::default_path();
    let mut prefs = match prefs_path.as_deref() {
        Some(path) => Preferences::load(path).unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to load preferences, using defaults");
            Preferences::default()
        }),
        None => Preferences::default(),
    };
    match args.theme.as_deref() {
        Some("light") => prefs.theme = ThemeChoice::Light,
        Some("dark") => prefs.theme = ThemeChoice::Dark,
        Some(other) => anyhow::bail!("unknown theme: {other}"),
        None => {}
    }

    let mut app = App::new(&config, technology, prefs, prefs_path);
    if let Some(element) = &args.element {
        app.open_element(element);
    }

    // Terminal setup; always restore, even when the app errors.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
