//! Row extractors for the three season tables.
//!
//! Each extractor only knows how to turn the cells of one data row into a record.
//! Header skipping, the minimum cell count and per-row fault isolation live in the
//! provided [`RowExtractor::extract`] method and are driven by a [`TableLayout`].

use serde::Serialize;
use tracing::debug;

use crate::{
    config::{TableLayout, TableLayouts},
    error::RowSkip,
    table::RawRow,
    types::{CardRecord, GoalMinutesRecord, Season, SeasonTableRecord, TableKind},
};

/// Outcome of mapping a single row.
pub type RowOutcome<R> = Result<R, RowSkip>;

pub trait RowExtractor {
    type Record: Serialize;

    fn kind(&self) -> TableKind;

    fn layout(&self) -> TableLayout;

    /// Maps the cells of one data row. Only called for rows with at least `min_cells` cells.
    fn map_cells(&self, year: i32, cells: &[String]) -> RowOutcome<Self::Record>;

    /// One outcome per data row, header rows excluded.
    fn row_outcomes(&self, season: Season, rows: &[RawRow]) -> Vec<RowOutcome<Self::Record>> {
        let layout = self.layout();
        rows.iter()
            .skip(layout.header_rows)
            .map(|cells| {
                if cells.len() < layout.min_cells {
                    return Err(RowSkip::TooFewCells {
                        found: cells.len(),
                        expected: layout.min_cells,
                    });
                }
                self.map_cells(season.end_year(), cells)
            })
            .collect()
    }

    fn extract(&self, season: Season, rows: &[RawRow]) -> Vec<Self::Record> {
        let mut records = Vec::new();
        for (index, outcome) in self.row_outcomes(season, rows).into_iter().enumerate() {
            match outcome {
                Ok(record) => records.push(record),
                Err(skip) => debug!(
                    "Skipping {} row {} for season {}: {}",
                    self.kind(),
                    index + self.layout().header_rows,
                    season,
                    skip
                ),
            }
        }
        records
    }
}

fn cell(cells: &[String], index: usize) -> RowOutcome<String> {
    cells
        .get(index)
        .map(|c| c.trim().to_string())
        .ok_or(RowSkip::MissingCell(index))
}

/// Splits `"Kashima Antlers (3.)"` into `("Kashima Antlers", "3")`.
pub fn split_team_rank(text: &str) -> RowOutcome<(String, String)> {
    let (team, rank) = text
        .trim()
        .rsplit_once(" (")
        .ok_or_else(|| RowSkip::MalformedTeamRank(text.to_string()))?;
    let rank = rank.trim();
    let rank = rank
        .strip_suffix(".)")
        .or_else(|| rank.strip_suffix(')'))
        .unwrap_or(rank)
        .trim();
    let team = team.trim();
    if team.is_empty() || rank.is_empty() {
        return Err(RowSkip::MalformedTeamRank(text.to_string()));
    }
    Ok((team.to_string(), rank.to_string()))
}

pub struct StandingsExtractor {
    layout: TableLayout,
}

impl StandingsExtractor {
    pub fn new(layout: TableLayout) -> Self {
        Self { layout }
    }
}

impl Default for StandingsExtractor {
    fn default() -> Self {
        Self::new(TableLayouts::default().standings)
    }
}

impl RowExtractor for StandingsExtractor {
    type Record = SeasonTableRecord;

    fn kind(&self) -> TableKind {
        TableKind::Standings
    }

    fn layout(&self) -> TableLayout {
        self.layout
    }

    fn map_cells(&self, year: i32, cells: &[String]) -> RowOutcome<SeasonTableRecord> {
        Ok(SeasonTableRecord {
            year,
            rank: cell(cells, 0)?,
            team: cell(cells, 2)?,
            matches: cell(cells, 3)?,
            wins: cell(cells, 4)?,
            draws: cell(cells, 5)?,
            losses: cell(cells, 6)?,
            points: cell(cells, 9)?,
        })
    }
}

pub struct GoalMinutesExtractor {
    layout: TableLayout,
}

impl GoalMinutesExtractor {
    pub fn new(layout: TableLayout) -> Self {
        Self { layout }
    }
}

impl Default for GoalMinutesExtractor {
    fn default() -> Self {
        Self::new(TableLayouts::default().goal_minutes)
    }
}

impl RowExtractor for GoalMinutesExtractor {
    type Record = GoalMinutesRecord;

    fn kind(&self) -> TableKind {
        TableKind::GoalMinutes
    }

    fn layout(&self) -> TableLayout {
        self.layout
    }

    fn map_cells(&self, year: i32, cells: &[String]) -> RowOutcome<GoalMinutesRecord> {
        let (team, rank) = split_team_rank(&cell(cells, 1)?)?;
        Ok(GoalMinutesRecord {
            year,
            team,
            rank,
            minutes_1_15: cell(cells, 2)?,
            minutes_16_30: cell(cells, 3)?,
            minutes_31_45: cell(cells, 4)?,
            minutes_45_plus: cell(cells, 5)?,
            minutes_46_60: cell(cells, 6)?,
            minutes_61_75: cell(cells, 7)?,
            minutes_76_90: cell(cells, 8)?,
            minutes_90_plus: cell(cells, 9)?,
        })
    }
}

pub struct CardsExtractor {
    layout: TableLayout,
}

impl CardsExtractor {
    pub fn new(layout: TableLayout) -> Self {
        Self { layout }
    }
}

impl Default for CardsExtractor {
    fn default() -> Self {
        Self::new(TableLayouts::default().cards)
    }
}

impl RowExtractor for CardsExtractor {
    type Record = CardRecord;

    fn kind(&self) -> TableKind {
        TableKind::Cards
    }

    fn layout(&self) -> TableLayout {
        self.layout
    }

    fn map_cells(&self, year: i32, cells: &[String]) -> RowOutcome<CardRecord> {
        Ok(CardRecord {
            year,
            team: cell(cells, 2)?,
            rank: cell(cells, 0)?,
            yellow: cell(cells, 4)?,
            second_yellow: cell(cells, 5)?,
            red: cell(cells, 6)?,
            second_yellow_and_red: cell(cells, 7)?,
        })
    }
}
