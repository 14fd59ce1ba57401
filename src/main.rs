use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use cybershield::{App, Config, GeminiClient, NewsFetcher};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cybershield")]
#[command(about = "Terminal threat-intelligence dashboard backed by Gemini search grounding")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/cybershield/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial search query instead of the default feed
    #[arg(short, long)]
    query: Option<String>,

    /// Fetch once, print the batch as JSON and exit
    #[arg(long)]
    once: bool,

    /// Log file for the dashboard (default: cache dir/cybershield/cybershield.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("cybershield").join("cybershield.log"))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cybershield=info"))
}

/// The dashboard owns the terminal, so its logs go to a file. One-shot mode logs to stderr.
fn init_logging(cli: &Cli) -> Result<()> {
    if cli.once {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(io::stderr)
            .init();
        return Ok(());
    }

    let Some(path) = cli.log_file.clone().or_else(default_log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run_once(client: &GeminiClient, query: Option<&str>) -> Result<()> {
    let batch = client.fetch(query).await?;
    println!("{}", serde_json::to_string_pretty(&batch)?);
    Ok(())
}

async fn run_dashboard(
    fetcher: Arc<dyn NewsFetcher>,
    config: &Config,
    query: Option<String>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(fetcher, &config.dashboard);
    let result = app.run(&mut terminal, query).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = Config::load(cli.config.as_deref())?;
    tracing::info!(
        model = %config.gemini.model,
        interval_secs = config.dashboard.refresh_interval_secs,
        "starting cybershield"
    );

    let client = GeminiClient::new(&config.gemini, config.dashboard.default_query.clone());

    if cli.once {
        return run_once(&client, cli.query.as_deref()).await;
    }

    run_dashboard(Arc::new(client), &config, cli.query).await
}
