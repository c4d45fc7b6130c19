use anyhow::{Context, Result};
use clap::Parser;
use mentor_match::config::{Settings, SummaryFormat};
use mentor_match::models::Role;
use mentor_match::report::{combined_table, ReportSummary};
use mentor_match::tabular::{read_records_from_path, write_table_to_path};
use mentor_match::Matcher;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Match mentees to mentors by time zone and industry field
#[derive(Debug, Parser)]
#[command(name = "mentor-match", version, about)]
struct Cli {
    /// Mentor survey export
    #[arg(default_value = "./Mentors.csv")]
    mentors: PathBuf,

    /// Mentee survey export
    #[arg(default_value = "./Mentees.csv")]
    mentees: PathBuf,

    /// Where to write the combined match table
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file to use instead of config/default.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if settings.logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Settings::load().context("Failed to load configuration")?,
    };

    init_logging(&settings);
    info!("Starting mentor matching run");

    let mentors = read_records_from_path(&cli.mentors, Role::Mentor)
        .with_context(|| format!("Failed to read mentors from {}", cli.mentors.display()))?;
    let mentees = read_records_from_path(&cli.mentees, Role::Mentee)
        .with_context(|| format!("Failed to read mentees from {}", cli.mentees.display()))?;

    let matcher = Matcher::from_settings(&settings);
    let result = matcher.run(&mentors, &mentees).context("Matching run aborted")?;

    let summary = ReportSummary::build(&result, matcher.columns()).context("Failed to build summary")?;
    let table = combined_table(&result, matcher.columns()).context("Failed to build match table")?;

    let output = cli.output.unwrap_or(settings.output.path);
    write_table_to_path(&output, &table)
        .with_context(|| format!("Failed to write match table to {}", output.display()))?;

    if cli.json || settings.output.summary_format == SummaryFormat::Json {
        println!("{}", summary.to_json().context("Failed to serialize summary")?);
    } else {
        println!("{summary}");
    }

    Ok(())
}
