use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use visa_cli::app::{self, OutputFormat, Session};
use visa_cli::collector::RawFields;
use visa_cli::config::{AppConfig, CONFIG_ENV};
use visa_cli::csv_loader;
use visa_cli::logging::{self, LogOptions};
use visa_core::Theme;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Estimated cost of a family visa application.
///
/// Adds up government fees, health surcharges and the household's own
/// travel and living costs, optionally converted to a local currency.
#[derive(Debug, Parser)]
#[command(name = "visa-estimator", version)]
struct Cli {
    /// TOML file with fee, display and preference settings.
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Log filter: a bare level (`warn`, `debug`, ...) or any RUST_LOG directive.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Hide log output on stderr.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Estimate one household.
    Estimate(EstimateArgs),

    /// Estimate every scenario in a CSV file.
    Batch {
        /// CSV file, one scenario per row.
        #[arg(long)]
        file: PathBuf,

        /// Print JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },

    /// Show or change the colour theme.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

/// Numeric fields are taken as text so malformed values get the same
/// defaulting as any other input.
#[derive(Debug, Args)]
struct EstimateArgs {
    /// Applying as a married couple.
    #[arg(long)]
    married: bool,

    /// Dependent children (ignored unless married).
    #[arg(long, default_value = "0")]
    children: String,

    /// Visa length in years; fractions round half-up.
    #[arg(long, default_value = "1")]
    duration: String,

    /// Add the priority processing fee.
    #[arg(long)]
    priority: bool,

    /// Flight cost per person.
    #[arg(long, default_value = "0")]
    flight: String,

    /// Rent per month.
    #[arg(long, default_value = "0")]
    rent: String,

    /// Months of rent to budget for.
    #[arg(long, default_value = "1")]
    rent_months: String,

    /// Any other one-off cost.
    #[arg(long, default_value = "0")]
    misc: String,

    /// Symbol for the converted total.
    #[arg(long, default_value = "")]
    currency: String,

    /// Units of local currency per unit of base currency.
    #[arg(long, default_value = "0")]
    rate: String,

    /// Print JSON instead of the text report.
    #[arg(long)]
    json: bool,
}

impl EstimateArgs {
    fn raw_fields(&self) -> RawFields {
        RawFields {
            married: self.married,
            children: self.children.clone(),
            duration: self.duration.clone(),
            priority: self.priority,
            flight: self.flight.clone(),
            rent: self.rent.clone(),
            rent_months: self.rent_months.clone(),
            misc: self.misc.clone(),
            currency: self.currency.clone(),
            rate: self.rate.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
enum ThemeAction {
    /// Print the stored theme.
    Show,
    /// Switch between light and dark.
    Toggle,
    /// Store a specific theme.
    Set {
        #[arg(value_parser = parse_theme)]
        theme: Theme,
    },
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    Theme::parse(s).ok_or_else(|| format!("unknown theme '{s}' (expected light or dark)"))
}

fn output_format(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    }
}

// ─── logging ─────────────────────────────────────────────────────────────────

fn log_options(cli: &Cli) -> LogOptions {
    LogOptions {
        level: cli.log_level.clone(),
        file: cli.log_file.clone(),
        quiet: cli.quiet,
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&log_options(&cli))?;

    let config = AppConfig::load(cli.config.as_deref()).context("cannot load configuration")?;
    debug!(backend = %config.preferences.backend, "configuration loaded");

    match cli.command {
        Command::Estimate(args) => {
            let theme = app::startup_theme(&config).await;
            let session = Session::new(config, theme);
            let estimate = session.estimate_fields(&args.raw_fields());
            let rendered = session.render_estimate(
                &estimate,
                output_format(args.json),
                io::stdout().is_terminal(),
            )?;
            println!("{rendered}");
        }
        Command::Batch { file, json } => {
            let theme = app::startup_theme(&config).await;
            let session = Session::new(config, theme);
            let scenarios = csv_loader::load_from_file(&file, session.collector())
                .with_context(|| format!("cannot load scenarios from '{}'", file.display()))?;
            info!(path = %file.display(), rows = scenarios.len(), "loaded scenarios");
            let estimates = session.estimate_scenarios(scenarios);
            let rendered =
                session.render_batch(&estimates, output_format(json), io::stdout().is_terminal())?;
            println!("{rendered}");
        }
        Command::Theme { action } => {
            let theme = match action {
                ThemeAction::Show => app::stored_theme(&config).await?,
                ThemeAction::Toggle => {
                    let store = app::open_store(&config).await?;
                    app::toggle_stored_theme(&*store).await?
                }
                ThemeAction::Set { theme } => {
                    let store = app::open_store(&config).await?;
                    app::set_stored_theme(&*store, theme).await?
                }
            };
            println!("{theme}");
        }
    }

    Ok(())
}
