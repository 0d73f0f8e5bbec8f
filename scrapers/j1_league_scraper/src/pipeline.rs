use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::{fs, path::Path};
use tracing::{error, info, warn};

use crate::{
    aggregate::SeasonAggregator,
    config::ScraperConfig,
    export::{export_csv, ExportOutcome},
    extract::{CardsExtractor, GoalMinutesExtractor, RowExtractor, StandingsExtractor},
    fetcher::{DirectoryFetcher, HtmlFetcher, PageSource, WebHtmlFetcher},
    types::{Season, TableKind},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub kind: TableKind,
    pub seasons_attempted: usize,
    pub seasons_with_records: usize,
    pub records: usize,
    pub export: ExportOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub tables: Vec<TableReport>,
}

impl RunReport {
    pub fn table(&self, kind: TableKind) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.kind == kind)
    }

    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.records).sum()
    }

    fn log(&self) {
        for table in &self.tables {
            match &table.export {
                ExportOutcome::Written { path, rows } => info!(
                    "{}: {}/{} seasons, {} rows written to {:?}",
                    table.kind, table.seasons_with_records, table.seasons_attempted, rows, path
                ),
                ExportOutcome::SkippedEmpty => warn!(
                    "{}: no data in any of {} seasons, export skipped",
                    table.kind, table.seasons_attempted
                ),
                ExportOutcome::Failed(message) => error!("{}: export failed: {}", table.kind, message),
            }
        }
    }
}

/// Scrapes every table kind for every configured season and writes the CSV files.
pub struct Pipeline<'a, S: PageSource> {
    config: &'a ScraperConfig,
    source: &'a S,
    progress: ProgressBar,
}

impl<'a, S: PageSource> Pipeline<'a, S> {
    pub fn new(config: &'a ScraperConfig, source: &'a S) -> Self {
        Self {
            config,
            source,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Number of page requests a full run makes.
    pub fn request_count(&self) -> u64 {
        (self.config.seasons.len() * TableKind::ALL.len()) as u64
    }

    pub fn run(&self) -> RunReport {
        let seasons = self.config.seasons.seasons();
        let layouts = &self.config.layouts;
        info!(
            "Scraping {} seasons ({}..={}) for {} tables",
            seasons.len(),
            self.config.seasons.first,
            self.config.seasons.last,
            TableKind::ALL.len()
        );

        let report = RunReport {
            tables: vec![
                self.run_table(&StandingsExtractor::new(layouts.get(TableKind::Standings)), &seasons),
                self.run_table(&GoalMinutesExtractor::new(layouts.get(TableKind::GoalMinutes)), &seasons),
                self.run_table(&CardsExtractor::new(layouts.get(TableKind::Cards)), &seasons),
            ],
        };

        self.progress.finish_and_clear();
        report.log();
        report
    }

    fn run_table<E: RowExtractor>(&self, extractor: &E, seasons: &[Season]) -> TableReport {
        let kind = extractor.kind();
        let aggregator = SeasonAggregator::new(self.source, &self.config.sources, &self.config.scraping.table_class)
            .with_progress(self.progress.clone());
        let aggregated = aggregator.aggregate(extractor, seasons);

        let path = self.config.output.path_for(kind);
        let export = match export_csv(&aggregated.records, &path) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Failed to write {} to {:?}: {}", kind, path, e);
                ExportOutcome::Failed(e.to_string())
            }
        };

        TableReport {
            kind,
            seasons_attempted: aggregated.seasons_attempted,
            seasons_with_records: aggregated.seasons_with_records,
            records: aggregated.records.len(),
            export,
        }
    }
}

/// Entry point for schedulers: scrape everything over the network using `config`.
pub fn run_full_scrape(config: &ScraperConfig) -> Result<()> {
    config.validate().context("Invalid scraper configuration")?;
    let fetcher = WebHtmlFetcher::new(&config.scraping).context("Failed to create HTTP client")?;
    Pipeline::new(config, &fetcher).run();
    Ok(())
}

/// Same as [`run_full_scrape`] with configuration taken from the environment.
pub fn run_from_env() -> Result<()> {
    run_full_scrape(&ScraperConfig::from_env())
}

/// Parses one saved page of `kind` and writes its records as CSV to `output`.
///
/// Reading or parsing the page is an error; a failed write is reported as [`ExportOutcome::Failed`].
pub fn process_file(kind: TableKind, season: Season, html_path: &Path, output: &Path, config: &ScraperConfig) -> Result<ExportOutcome> {
    let markup = fs::read_to_string(html_path).with_context(|| format!("Failed to read {:?}", html_path))?;
    let rows = crate::table::locate_rows(&markup, &config.scraping.table_class)?
        .with_context(|| format!("No table with class '{}' in {:?}", config.scraping.table_class, html_path))?;

    let layout = config.layouts.get(kind);
    let written = match kind {
        TableKind::Standings => export_csv(&StandingsExtractor::new(layout).extract(season, &rows), output),
        TableKind::GoalMinutes => export_csv(&GoalMinutesExtractor::new(layout).extract(season, &rows), output),
        TableKind::Cards => export_csv(&CardsExtractor::new(layout).extract(season, &rows), output),
    };
    Ok(written.unwrap_or_else(|e| {
        error!("Failed to write {} to {:?}: {}", kind, output, e);
        ExportOutcome::Failed(e.to_string())
    }))
}

/// Saves every page that answers 200 into `dir`, named the way [`DirectoryFetcher`] reads them.
/// Returns the number of pages saved.
pub fn download_pages<F: HtmlFetcher>(config: &ScraperConfig, fetcher: &F, dir: &Path, progress: &ProgressBar) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let store = DirectoryFetcher::new(dir);
    let mut saved = 0;

    for kind in TableKind::ALL {
        for season in config.seasons.seasons() {
            let url = config.sources.url_for(kind, &season.id());
            progress.set_message(format!("{} {}", kind, season));
            match fetcher.fetch(&url) {
                Ok(page) if page.is_ok() => {
                    let path = store.path_for(kind, season);
                    fs::write(&path, &page.body).with_context(|| format!("Failed to write {:?}", path))?;
                    saved += 1;
                }
                Ok(page) => warn!("GET {} returned HTTP {}, not saved", url, page.status),
                Err(e) => warn!("GET {} failed: {}", url, e),
            }
            progress.inc(1);
        }
    }

    info!("Saved {} pages to {:?}", saved, dir);
    Ok(saved)
}
