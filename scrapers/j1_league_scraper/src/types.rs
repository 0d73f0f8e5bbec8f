use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ScrapeError;

/// The three tables scraped for every season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum TableKind {
    Standings,
    GoalMinutes,
    Cards,
}

impl TableKind {
    pub const ALL: [TableKind; 3] = [TableKind::Standings, TableKind::GoalMinutes, TableKind::Cards];

    /// Short name used in saved HTML file names.
    pub fn slug(self) -> &'static str {
        match self {
            TableKind::Standings => "standings",
            TableKind::GoalMinutes => "goal_minutes",
            TableKind::Cards => "cards",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

pub const MIN_START_YEAR: i32 = 1900;
pub const MAX_START_YEAR: i32 = 2999;

/// A season identified by the year it starts in, as used in the source URLs.
///
/// The start year is always within `MIN_START_YEAR..=MAX_START_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Season(i32);

impl Season {
    pub fn new(start_year: i32) -> Result<Self, ScrapeError> {
        if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&start_year) {
            return Err(ScrapeError::InvalidSeason(start_year.to_string()));
        }
        Ok(Self(start_year))
    }

    pub fn start_year(self) -> i32 {
        self.0
    }

    /// The year written to the `Year` column.
    pub fn end_year(self) -> i32 {
        self.0 + 1
    }

    pub fn id(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ScrapeError::InvalidSeason(s.to_string()));
        }
        let year = trimmed
            .parse::<i32>()
            .map_err(|_| ScrapeError::InvalidSeason(s.to_string()))?;
        Season::new(year).map_err(|_| ScrapeError::InvalidSeason(s.to_string()))
    }
}

/// Inclusive, ascending range of seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRange {
    pub first: i32,
    pub last: i32,
}

impl SeasonRange {
    /// Seasons in the range, ascending. Years outside `MIN_START_YEAR..=MAX_START_YEAR` are left out.
    pub fn seasons(&self) -> Vec<Season> {
        (self.first.max(MIN_START_YEAR)..=self.last.min(MAX_START_YEAR))
            .map(Season)
            .collect()
    }

    pub fn len(&self) -> usize {
        let first = self.first.max(MIN_START_YEAR);
        let last = self.last.min(MAX_START_YEAR);
        if last < first {
            0
        } else {
            (last - first + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SeasonRange {
    fn default() -> Self {
        Self {
            first: 2004,
            last: 2023,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonTableRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Matches")]
    pub matches: String,
    #[serde(rename = "Wins")]
    pub wins: String,
    #[serde(rename = "Draws")]
    pub draws: String,
    #[serde(rename = "Losses")]
    pub losses: String,
    #[serde(rename = "Points")]
    pub points: String,
}

/// Goals scored per minute interval. Bucket values are goal counts as shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalMinutesRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "1-15")]
    pub minutes_1_15: String,
    #[serde(rename = "16-30")]
    pub minutes_16_30: String,
    #[serde(rename = "31-45")]
    pub minutes_31_45: String,
    #[serde(rename = "45+")]
    pub minutes_45_plus: String,
    #[serde(rename = "46-60")]
    pub minutes_46_60: String,
    #[serde(rename = "61-75")]
    pub minutes_61_75: String,
    #[serde(rename = "76-90")]
    pub minutes_76_90: String,
    #[serde(rename = "90+")]
    pub minutes_90_plus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "Yellow")]
    pub yellow: String,
    #[serde(rename = "SecondYellow")]
    pub second_yellow: String,
    #[serde(rename = "Red")]
    pub red: String,
    #[serde(rename = "SecondYellowAndRed")]
    pub second_yellow_and_red: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_years() {
        let season: Season = "2004".parse().unwrap();
        assert_eq!(season.start_year(), 2004);
        assert_eq!(season.end_year(), 2005);
        assert_eq!(season.id(), "2004");
    }

    #[test]
    fn test_season_rejects_garbage() {
        assert!("".parse::<Season>().is_err());
        assert!("20x4".parse::<Season>().is_err());
        assert!("-2004".parse::<Season>().is_err());
    }

    #[test]
    fn test_season_rejects_years_out_of_range() {
        assert!(matches!("2147483647".parse::<Season>(), Err(ScrapeError::InvalidSeason(_))));
        assert!(matches!("99999999999".parse::<Season>(), Err(ScrapeError::InvalidSeason(_))));
        assert!("1899".parse::<Season>().is_err());
        assert!(Season::new(i32::MAX).is_err());
        assert!(Season::new(i32::MIN).is_err());

        let last = Season::new(MAX_START_YEAR).unwrap();
        assert_eq!(last.end_year(), MAX_START_YEAR + 1);
    }

    #[test]
    fn test_range_with_extreme_bounds_stays_within_years() {
        let range = SeasonRange { first: 2004, last: i32::MAX };
        let seasons = range.seasons();
        assert_eq!(seasons.first(), Some(&Season::new(2004).unwrap()));
        assert_eq!(seasons.last(), Some(&Season::new(MAX_START_YEAR).unwrap()));
        assert!(seasons.iter().all(|s| s.end_year() == s.start_year() + 1));

        let range = SeasonRange { first: i32::MIN, last: i32::MIN };
        assert!(range.is_empty());
    }

    #[test]
    fn test_default_range_covers_twenty_seasons() {
        let seasons = SeasonRange::default().seasons();
        assert_eq!(seasons.len(), 20);
        assert_eq!(seasons.first(), Some(&Season::new(2004).unwrap()));
        assert_eq!(seasons.last(), Some(&Season::new(2023).unwrap()));
    }
}
