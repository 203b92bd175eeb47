use anyhow::{Context, Result};
use clap::Parser;
use regcal_core::{QuarterRange, Term};
use tracing_subscriber::EnvFilter;

use regcal_cli::commands::{self, events, export, parse};
use regcal_cli::{Cli, Commands, Config};

/// Resolve the quarter for a term/year pair, failing with context when the
/// pair has no date range on record.
fn lookup_quarter(term: Term, year: i32) -> Result<QuarterRange> {
    QuarterRange::lookup(term, year)
        .with_context(|| format!("no instructional calendar for {term} {year}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Parse { input, term, year }) => {
            let quarter = lookup_quarter(*term, *year)?;
            let text = commands::read_input(input)?;
            parse::run(&text, &quarter)?;
        }
        Some(Commands::Export {
            input,
            term,
            year,
            output,
        }) => {
            let quarter = lookup_quarter(*term, *year)?;
            let text = commands::read_input(input)?;
            let output_dir = match output {
                Some(dir) => dir.clone(),
                None => {
                    let config = Config::load_from(cli.config.as_deref())
                        .context("failed to load configuration")?;
                    tracing::debug!(?config, "loaded configuration");
                    config.output_dir
                }
            };
            export::run(&text, &quarter, &output_dir)?;
        }
        Some(Commands::Events { input, term, year }) => {
            let quarter = lookup_quarter(*term, *year)?;
            let text = commands::read_input(input)?;
            events::run(&text, &quarter)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
