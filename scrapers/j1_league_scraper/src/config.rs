use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

use crate::{
    error::ScrapeError,
    types::{SeasonRange, TableKind, MAX_START_YEAR, MIN_START_YEAR},
};

pub const SEASON_PLACEHOLDER: &str = "{season}";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// CSS class carried by the data table on every page.
    pub table_class: String,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            // The site rejects clients that do not look like a desktop browser.
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            request_timeout_secs: 30,
            table_class: "items".to_string(),
        }
    }
}

/// URL templates, one per table kind. `{season}` is replaced by the season start year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceUrls {
    pub standings: String,
    pub goal_minutes: String,
    pub cards: String,
}

impl SourceUrls {
    pub fn template(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Standings => &self.standings,
            TableKind::GoalMinutes => &self.goal_minutes,
            TableKind::Cards => &self.cards,
        }
    }

    pub fn url_for(&self, kind: TableKind, season_id: &str) -> String {
        self.template(kind).replace(SEASON_PLACEHOLDER, season_id)
    }
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            standings: "https://www.transfermarkt.com/j1-league/tabelle/wettbewerb/JAP1/saison_id/{season}".to_string(),
            goal_minutes: "https://www.transfermarkt.com/j1-league/toreProMinute/wettbewerb/JAP1/saison_id/{season}".to_string(),
            cards: "https://www.transfermarkt.com/j1-league/fairnesstabelle/wettbewerb/JAP1/saison_id/{season}".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub standings_file: String,
    pub goal_minutes_file: String,
    pub cards_file: String,
}

impl OutputConfig {
    pub fn path_for(&self, kind: TableKind) -> PathBuf {
        let file = match kind {
            TableKind::Standings => &self.standings_file,
            TableKind::GoalMinutes => &self.goal_minutes_file,
            TableKind::Cards => &self.cards_file,
        };
        self.dir.join(file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./CSV"),
            standings_file: "j1_league_table.csv".to_string(),
            goal_minutes_file: "j1_league_goal_minutes.csv".to_string(),
            cards_file: "j1_league_card_stats.csv".to_string(),
        }
    }
}

/// Row layout of one table type as observed on the source pages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableLayout {
    pub header_rows: usize,
    pub min_cells: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableLayouts {
    pub standings: TableLayout,
    pub goal_minutes: TableLayout,
    pub cards: TableLayout,
}

impl TableLayouts {
    pub fn get(&self, kind: TableKind) -> TableLayout {
        match kind {
            TableKind::Standings => self.standings,
            TableKind::GoalMinutes => self.goal_minutes,
            TableKind::Cards => self.cards,
        }
    }
}

impl Default for TableLayouts {
    fn default() -> Self {
        Self {
            standings: TableLayout { header_rows: 1, min_cells: 10 },
            goal_minutes: TableLayout { header_rows: 2, min_cells: 10 },
            cards: TableLayout { header_rows: 2, min_cells: 8 },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub scraping: ScrapingConfig,
    pub seasons: SeasonRange,
    pub sources: SourceUrls,
    pub output: OutputConfig,
    pub layouts: TableLayouts,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Some(timeout) = env::var("SCRAPER_TIMEOUT_SECS").ok().and_then(|t| t.parse::<u64>().ok()) {
            config.scraping.request_timeout_secs = timeout;
        }
        if let Ok(class) = env::var("SCRAPER_TABLE_CLASS") {
            config.scraping.table_class = class;
        }
        if let Some(first) = env::var("J1_FIRST_SEASON").ok().and_then(|s| s.parse::<i32>().ok()) {
            config.seasons.first = first;
        }
        if let Some(last) = env::var("J1_LAST_SEASON").ok().and_then(|s| s.parse::<i32>().ok()) {
            config.seasons.last = last;
        }
        if let Ok(dir) = env::var("J1_OUTPUT_DIR") {
            config.output.dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("J1_STANDINGS_URL") {
            config.sources.standings = url;
        }
        if let Ok(url) = env::var("J1_GOAL_MINUTES_URL") {
            config.sources.goal_minutes = url;
        }
        if let Ok(url) = env::var("J1_CARDS_URL") {
            config.sources.cards = url;
        }

        config
    }

    pub fn validate(&self) -> Result<(), ScrapeError> {
        for year in [self.seasons.first, self.seasons.last] {
            if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&year) {
                return Err(ScrapeError::Config(format!(
                    "season {} is outside {}..={}",
                    year, MIN_START_YEAR, MAX_START_YEAR
                )));
            }
        }
        if self.seasons.first > self.seasons.last {
            return Err(ScrapeError::Config(format!(
                "first season {} is after last season {}",
                self.seasons.first, self.seasons.last
            )));
        }
        for kind in TableKind::ALL {
            if !self.sources.template(kind).contains(SEASON_PLACEHOLDER) {
                return Err(ScrapeError::Config(format!(
                    "{} URL template is missing the {} placeholder",
                    kind, SEASON_PLACEHOLDER
                )));
            }
        }
        if self.scraping.table_class.trim().is_empty() {
            return Err(ScrapeError::Config("table class must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_paths() {
        let output = OutputConfig::default();
        assert_eq!(output.path_for(TableKind::Standings), PathBuf::from("./CSV/j1_league_table.csv"));
        assert_eq!(output.path_for(TableKind::GoalMinutes), PathBuf::from("./CSV/j1_league_goal_minutes.csv"));
        assert_eq!(output.path_for(TableKind::Cards), PathBuf::from("./CSV/j1_league_card_stats.csv"));
    }

    #[test]
    fn test_url_for_substitutes_season() {
        let sources = SourceUrls {
            standings: "http://example.test/table/{season}".to_string(),
            goal_minutes: "http://example.test/minutes?season={season}".to_string(),
            cards: "http://example.test/cards/{season}".to_string(),
        };
        assert_eq!(sources.url_for(TableKind::Standings, "2004"), "http://example.test/table/2004");
        assert_eq!(sources.url_for(TableKind::GoalMinutes, "2010"), "http://example.test/minutes?season=2010");
    }

    #[test]
    fn test_default_layouts() {
        let layouts = TableLayouts::default();
        assert_eq!(layouts.get(TableKind::Standings), TableLayout { header_rows: 1, min_cells: 10 });
        assert_eq!(layouts.get(TableKind::GoalMinutes), TableLayout { header_rows: 2, min_cells: 10 });
        assert_eq!(layouts.get(TableKind::Cards), TableLayout { header_rows: 2, min_cells: 8 });
    }

    #[test]
    fn test_validate() {
        assert!(ScraperConfig::default().validate().is_ok());

        let mut config = ScraperConfig::default();
        config.seasons = SeasonRange { first: 2023, last: 2004 };
        assert!(config.validate().is_err());

        let mut config = ScraperConfig::default();
        config.sources.cards = "http://example.test/cards".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_seasons() {
        let mut config = ScraperConfig::default();
        config.seasons = SeasonRange { first: 2004, last: i32::MAX };
        assert!(matches!(config.validate(), Err(ScrapeError::Config(_))));

        config.seasons = SeasonRange { first: i32::MIN, last: 2023 };
        assert!(matches!(config.validate(), Err(ScrapeError::Config(_))));

        config.seasons = SeasonRange { first: MIN_START_YEAR, last: MAX_START_YEAR };
        assert!(config.validate().is_ok());
    }
}
