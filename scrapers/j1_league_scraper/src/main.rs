use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use j1_league_scraper::{
    config::ScraperConfig,
    export::ExportOutcome,
    fetcher::{DirectoryFetcher, WebHtmlFetcher},
    pipeline::{self, Pipeline},
    types::{Season, TableKind},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Scrapes J1 League standings, goal minutes and card stats to CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every table for every season and write the CSV files
    Run {
        /// First season (start year) to scrape
        #[arg(long)]
        from: Option<i32>,
        /// Last season (start year) to scrape
        #[arg(long)]
        to: Option<i32>,
        /// Directory the CSV files are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Read pages saved by `download` from this directory instead of the network
        #[arg(long)]
        html_dir: Option<PathBuf>,
    },
    /// Parse a single saved HTML page
    ProcessFile {
        /// Which table the page contains
        #[arg(short, long, value_enum)]
        kind: TableKind,
        /// Season start year the page belongs to
        #[arg(short, long)]
        season: String,
        /// Path to the HTML file to process
        #[arg(short, long)]
        file: PathBuf,
        /// CSV file to write, defaults to `<kind>_<season>.csv`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download every season page to a directory for later offline runs
    Download {
        #[arg(short, long, default_value = "html_files")]
        dir: PathBuf,
    },
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} pages {msg}")
            .context("Invalid progress bar template")?,
    );
    Ok(pb)
}

fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = ScraperConfig::from_env();

    match cli.command.unwrap_or(Commands::Run {
        from: None,
        to: None,
        output_dir: None,
        html_dir: None,
    }) {
        Commands::Run {
            from,
            to,
            output_dir,
            html_dir,
        } => {
            if let Some(from) = from {
                config.seasons.first = from;
            }
            if let Some(to) = to {
                config.seasons.last = to;
            }
            if let Some(dir) = output_dir {
                config.output.dir = dir;
            }
            config.validate().context("Invalid scraper configuration")?;

            let report = match html_dir {
                Some(dir) => {
                    info!("Replaying saved pages from {:?}", dir);
                    let source = DirectoryFetcher::new(dir);
                    let pipeline = Pipeline::new(&config, &source);
                    let pb = progress_bar(pipeline.request_count())?;
                    pipeline.with_progress(pb).run()
                }
                None => {
                    let fetcher = WebHtmlFetcher::new(&config.scraping).context("Failed to create HTTP client")?;
                    let pipeline = Pipeline::new(&config, &fetcher);
                    let pb = progress_bar(pipeline.request_count())?;
                    pipeline.with_progress(pb).run()
                }
            };
            info!("Run complete, {} records collected", report.total_records());
        }
        Commands::ProcessFile {
            kind,
            season,
            file,
            output,
        } => {
            let season: Season = season.parse()?;
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{}_{}.csv", kind.slug(), season)));
            match pipeline::process_file(kind, season, &file, &output, &config)? {
                ExportOutcome::Written { path, rows } => info!("Wrote {} rows to {:?}", rows, path),
                ExportOutcome::SkippedEmpty => info!("No rows found in {:?}", file),
                ExportOutcome::Failed(message) => anyhow::bail!("Export failed: {}", message),
            }
        }
        Commands::Download { dir } => {
            config.validate().context("Invalid scraper configuration")?;
            let fetcher = WebHtmlFetcher::new(&config.scraping).context("Failed to create HTTP client")?;
            let total = (config.seasons.len() * TableKind::ALL.len()) as u64;
            let pb = progress_bar(total)?;
            pipeline::download_pages(&config, &fetcher, &dir, &pb)?;
            pb.finish_and_clear();
        }
    }

    Ok(())
}
