//! Tremor bot: entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use tremor_bot::config::{resolve_token, BotConfig};
use tremor_bot::protocol::ChatHandler;
use tremor_bot::report::write_current_report;
use tremor_bot::scheduler::TremorScheduler;
use tremor_bot::transport::StdioTransport;
use tremor_bot::{share, SharedEngine};
use tremor_engine::{PatternAnalyzer, PatternEngine, RegistryReader};

#[derive(Parser)]
#[command(
    name = "tremor-bot",
    about = "Pattern tremor detection, spiral depth and weekly summaries over a chat command surface",
    version
)]
struct Cli {
    /// Path to the tremor registry JSON file.
    #[arg(short, long, global = true)]
    registry: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer chat commands over stdio and run the weekly scheduler (default).
    Serve,

    /// Detect themes in a piece of text.
    Analyze {
        /// Text to analyze.
        text: String,

        /// Record the result in the registry under this document name.
        #[arg(short, long)]
        document: Option<String>,
    },

    /// Spiral depth of the registry, or of a document.
    Depth {
        /// Document to analyze and record.
        path: Option<PathBuf>,
    },

    /// Write this week's tremor summary now.
    Report,

    /// Validate the registry file.
    Validate,

    /// Report which environment settings are present.
    ValidateEnv,

    /// Print the theme table as JSON.
    Themes,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   tremor-bot completions bash > ~/.local/share/bash-completion/completions/tremor-bot
    ///   tremor-bot completions zsh > ~/.zfunc/_tremor-bot
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn open_engine(config: &BotConfig) -> anyhow::Result<PatternEngine> {
    Ok(PatternEngine::open(&config.registry_path)?)
}

fn build_services(config: &BotConfig) -> anyhow::Result<(SharedEngine, Arc<TremorScheduler>)> {
    let engine = share(open_engine(config)?);
    let scheduler = TremorScheduler::new(
        config.scheduler.clone(),
        Arc::clone(&engine),
        config.report.clone(),
    )?;
    Ok((engine, Arc::new(scheduler)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = BotConfig::from_env(cli.registry.as_deref())?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("Tremor bot");
            tracing::info!("Registry: {}", config.registry_path.display());
            if config.token.is_none() {
                tracing::debug!("No chat token configured; the gateway authenticates upstream");
            }

            let (engine, scheduler) = build_services(&config)?;
            scheduler.start().await;

            let transport = StdioTransport::new(ChatHandler::new(engine, Arc::clone(&scheduler)));
            let result = tokio::select! {
                result = transport.run() => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupted, shutting down");
                    Ok(())
                }
            };

            scheduler.stop().await;
            result?;
        }

        Commands::Analyze { text, document } => {
            let mut engine = open_engine(&config)?;
            let analysis = engine.detect_patterns(&text, document.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }

        Commands::Depth { path } => {
            let mut engine = open_engine(&config)?;
            let depth = engine.get_spiral_depth(path.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&depth)?);
        }

        Commands::Report => {
            let mut engine = open_engine(&config)?;
            let path = write_current_report(&config.report, &mut engine)?;
            println!("{}", path.display());
        }

        Commands::Validate => {
            let path = &config.registry_path;
            if !path.exists() {
                println!("No registry at {} (an empty one will be created)", path.display());
                return Ok(());
            }
            match RegistryReader::read_from_file(path) {
                Ok(registry) => {
                    println!("Valid tremor registry: {}", path.display());
                    println!("  Tremors:   {}", registry.count());
                    println!("  Documents: {}", registry.documents_analyzed.len());
                    println!("  Custom:    {}", registry.custom_patterns.len());
                    if let Some(top) = &registry.analysis_summary.highest_intensity_tremor {
                        println!("  Strongest: {top}");
                    }
                }
                Err(e) => {
                    eprintln!("Invalid tremor registry: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::ValidateEnv => {
            let status = |present: bool| if present { "set" } else { "missing" };
            println!("Registry:    {}", config.registry_path.display());
            println!("Report dir:  {}", config.report.output_dir.display());
            println!("Rituals:     {}", config.report.rituals_dir.display());
            println!("Journals:    {}", config.report.journals_dir.display());
            println!("Whispers:    {}", config.report.whispers_path.display());
            println!("Weekly cron: {}", config.scheduler.weekly_cron);
            println!("Poll:        {}s", config.scheduler.poll_interval.as_secs());
            println!("Chat token:  {}", status(resolve_token().is_some()));
            if let Err(e) = tremor_bot::scheduler::ScheduledJob::new(
                tremor_bot::scheduler::JobKind::WeeklyTremors,
                &config.scheduler.weekly_cron,
            ) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }

        Commands::Themes => {
            let engine = open_engine(&config)?;
            println!("{}", serde_json::to_string_pretty(&engine.themes())?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tremor-bot", &mut std::io::stdout());
        }

        Commands::Repl => {
            let (engine, scheduler) = build_services(&config)?;
            let handler = ChatHandler::new(engine, scheduler);
            let runtime = tokio::runtime::Handle::current();
            tokio::task::block_in_place(|| tremor_bot::repl::run(&handler, runtime))?;
        }
    }

    Ok(())
}
