use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::{
    config::SourceUrls,
    error::ScrapeError,
    extract::RowExtractor,
    fetcher::PageSource,
    table,
    types::Season,
};

/// Records gathered for one table kind across a season list.
#[derive(Debug)]
pub struct Aggregated<R> {
    pub records: Vec<R>,
    pub seasons_attempted: usize,
    pub seasons_with_records: usize,
}

pub struct SeasonAggregator<'a, S: PageSource> {
    source: &'a S,
    urls: &'a SourceUrls,
    table_class: &'a str,
    progress: ProgressBar,
}

impl<'a, S: PageSource> SeasonAggregator<'a, S> {
    pub fn new(source: &'a S, urls: &'a SourceUrls, table_class: &'a str) -> Self {
        Self {
            source,
            urls,
            table_class,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch, locate and extract one season. Any failure means no records for it.
    pub fn scrape_season<E: RowExtractor>(&self, extractor: &E, season: Season) -> Result<Vec<E::Record>, ScrapeError> {
        let kind = extractor.kind();
        let url = self.urls.url_for(kind, &season.id());
        self.progress.set_message(format!("{} {}", kind, season));

        let page = self.source.page(kind, season, &url)?;
        if !page.is_ok() {
            return Err(ScrapeError::Status { url, status: page.status });
        }

        let rows = table::locate_rows(&page.body, self.table_class)?.ok_or_else(|| ScrapeError::TableNotFound {
            kind,
            season: season.start_year(),
            class: self.table_class.to_string(),
        })?;

        Ok(extractor.extract(season, &rows))
    }

    pub fn aggregate<E: RowExtractor>(&self, extractor: &E, seasons: &[Season]) -> Aggregated<E::Record> {
        let mut records = Vec::new();
        let mut seasons_with_records = 0;

        for &season in seasons {
            match self.scrape_season(extractor, season) {
                Ok(batch) if batch.is_empty() => {
                    warn!("No {} rows extracted for season {}", extractor.kind(), season);
                }
                Ok(batch) => {
                    info!("Extracted {} {} rows for season {}", batch.len(), extractor.kind(), season);
                    seasons_with_records += 1;
                    records.extend(batch);
                }
                Err(e) => {
                    warn!("Skipping {} season {}: {}", extractor.kind(), season, e);
                }
            }
            self.progress.inc(1);
        }

        Aggregated {
            records,
            seasons_attempted: seasons.len(),
            seasons_with_records,
        }
    }
}
