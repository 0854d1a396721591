//! ghbattle - GitHub profile lookup and star battles
//!
//! A CLI tool that fetches GitHub profiles, aggregates repository
//! statistics and renders profile cards. With two handles it runs a
//! battle: the user with more stars wins.
//!
//! Exit codes:
//!   0 - Success (or empty input, which does nothing)
//!   1 - Runtime error (config, output file, HTTP client setup, etc.)
//!   2 - User Not Found (any lookup failure)

mod analysis;
mod cli;
mod config;
mod github;
mod models;
mod report;
mod shell;
mod terminal;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use github::GitHubClient;
use shell::{ActionOutcome, LineOutcome, Mode, Shell};
use terminal::Terminal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("ghbattle v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("ghbattle failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .ghbattle.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the output format, API URL and date format.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` wins when set.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run one action or the interactive prompt. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let client = GitHubClient::new(config.client_options())?;
    info!("Using GitHub API at {}", config.api.base_url);

    if args.interactive {
        return run_interactive(&client, &config, !args.quiet).await;
    }

    let terminal = Terminal::new(!args.quiet, false);
    let mut shell = Shell::new(
        &client,
        terminal,
        config.general.format,
        config.render_options(),
    );

    let outcome = match args.handles.as_slice() {
        [handle] => {
            shell.inputs.username = handle.clone();
            shell.search().await?
        }
        [first, second] => {
            shell.set_mode(Mode::Battle);
            shell.inputs.first = first.clone();
            shell.inputs.second = second.clone();
            shell.battle().await?
        }
        _ => ActionOutcome::Skipped,
    };

    match outcome {
        ActionOutcome::Skipped => {
            debug!("Empty input, nothing to do");
            Ok(0)
        }
        ActionOutcome::Failed => Ok(2),
        ActionOutcome::Succeeded => {
            write_result(shell.display().result(), &config)?;
            Ok(0)
        }
    }
}

/// Write the result region to the configured output file, or stdout.
fn write_result(result: &str, config: &Config) -> Result<()> {
    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, result)
                .with_context(|| format!("Failed to write cards to {}", path.display()))?;
            println!("✅ Cards saved to: {}", path.display());
        }
        None => print!("{}", result),
    }
    Ok(())
}

/// Line-driven prompt: every line is an Enter press on the active form.
async fn run_interactive(
    client: &GitHubClient,
    config: &Config,
    show_progress: bool,
) -> Result<i32> {
    let terminal = Terminal::new(show_progress, true);
    let mut shell = Shell::new(
        client,
        terminal,
        config.general.format,
        config.render_options(),
    );

    eprintln!("Type a handle and press Enter. Commands: :single, :battle, :quit");
    print_prompt(shell.mode());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        match shell.handle_line(&line).await? {
            LineOutcome::Quit => break,
            LineOutcome::UnknownCommand(command) => warn!("Unknown command: {}", command),
            LineOutcome::TooManyHandles(count) => {
                warn!("A battle takes two handles, got {}", count)
            }
            LineOutcome::ModeChanged(mode) => debug!("Switched to {:?} mode", mode),
            LineOutcome::Submitted(outcome) => debug!("Action finished: {:?}", outcome),
        }

        print_prompt(shell.mode());
    }

    Ok(0)
}

fn print_prompt(mode: Mode) {
    match mode {
        Mode::Single => eprint!("user> "),
        Mode::Battle => eprint!("battle> "),
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
