use serde::Serialize;
use std::{fs, path::{Path, PathBuf}};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::ScrapeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    SkippedEmpty,
    Failed(String),
}

/// Writes `records` as CSV to `path`, header first, replacing any existing file.
///
/// Rows go to a temporary file next to `path` that is renamed over it once complete,
/// so a failed write leaves the previous content in place. An empty slice leaves
/// `path` untouched.
pub fn export_csv<T: Serialize>(records: &[T], path: &Path) -> Result<ExportOutcome, ScrapeError> {
    if records.is_empty() {
        warn!("No records to write, leaving {:?} untouched", path);
        return Ok(ExportOutcome::SkippedEmpty);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    info!("Writing {} rows to {:?}", records.len(), path);
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut wtr = csv::Writer::from_writer(&mut tmp);
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardRecord, GoalMinutesRecord, SeasonTableRecord};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn standing(year: i32, rank: &str, team: &str) -> SeasonTableRecord {
        SeasonTableRecord {
            year,
            rank: rank.to_string(),
            team: team.to_string(),
            matches: "34".to_string(),
            wins: "18".to_string(),
            draws: "8".to_string(),
            losses: "8".to_string(),
            points: "62".to_string(),
        }
    }

    #[test]
    fn test_empty_does_not_create_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CSV").join("j1_league_table.csv");
        let outcome = export_csv::<SeasonTableRecord>(&[], &path).unwrap();
        assert_eq!(outcome, ExportOutcome::SkippedEmpty);
        assert!(!path.exists());
        assert!(!dir.path().join("CSV").exists());
    }

    #[test]
    fn test_empty_leaves_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("j1_league_table.csv");
        fs::write(&path, "previous run\n").unwrap();
        export_csv::<SeasonTableRecord>(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CSV").join("j1_league_table.csv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale\nstale\nstale\nstale\nstale\n").unwrap();

        let records = vec![standing(2005, "1", "Gamba Osaka"), standing(2005, "2", "Urawa Red Diamonds")];
        let outcome = export_csv(&records, &path).unwrap();
        assert_eq!(outcome, ExportOutcome::Written { path: path.clone(), rows: 2 });

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Year,Rank,Team,Matches,Wins,Draws,Losses,Points",
                "2005,1,Gamba Osaka,34,18,8,8,62",
                "2005,2,Urawa Red Diamonds,34,18,8,8,62",
            ]
        );
    }

    #[test]
    fn test_goal_minutes_and_card_headers() {
        let dir = tempdir().unwrap();

        let minutes_path = dir.path().join("minutes.csv");
        let minutes = vec![GoalMinutesRecord {
            year: 2016,
            team: "Kashima Antlers".to_string(),
            rank: "3".to_string(),
            minutes_1_15: "5".to_string(),
            minutes_16_30: "6".to_string(),
            minutes_31_45: "7".to_string(),
            minutes_45_plus: "1".to_string(),
            minutes_46_60: "8".to_string(),
            minutes_61_75: "9".to_string(),
            minutes_76_90: "10".to_string(),
            minutes_90_plus: "2".to_string(),
        }];
        export_csv(&minutes, &minutes_path).unwrap();
        let content = fs::read_to_string(&minutes_path).unwrap();
        assert_eq!(
            content,
            "Year,Team,Rank,1-15,16-30,31-45,45+,46-60,61-75,76-90,90+\n2016,Kashima Antlers,3,5,6,7,1,8,9,10,2\n"
        );

        let cards_path = dir.path().join("cards.csv");
        let cards = vec![CardRecord {
            year: 2024,
            team: "Sanfrecce Hiroshima".to_string(),
            rank: "1".to_string(),
            yellow: "41".to_string(),
            second_yellow: "1".to_string(),
            red: "2".to_string(),
            second_yellow_and_red: "0".to_string(),
        }];
        export_csv(&cards, &cards_path).unwrap();
        let content = fs::read_to_string(&cards_path).unwrap();
        assert_eq!(
            content,
            "Year,Team,Rank,Yellow,SecondYellow,Red,SecondYellowAndRed\n2024,Sanfrecce Hiroshima,1,41,1,2,0\n"
        );
    }

    /// Serializes like a one-column record, or fails when `fail` is set.
    struct Row {
        team: &'static str,
        fail: bool,
    }

    impl Serialize for Row {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            use serde::ser::{Error, SerializeStruct};
            if self.fail {
                return Err(S::Error::custom("unwritable row"));
            }
            let mut state = serializer.serialize_struct("Row", 1)?;
            state.serialize_field("Team", self.team)?;
            state.end()
        }
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("j1_league_table.csv");
        fs::write(&path, "Team\nprevious run\n").unwrap();

        let rows = [
            Row { team: "Gamba Osaka", fail: false },
            Row { team: "Cerezo Osaka", fail: true },
        ];
        assert!(matches!(export_csv(&rows, &path), Err(ScrapeError::Csv(_))));

        assert_eq!(fs::read_to_string(&path).unwrap(), "Team\nprevious run\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("j1_league_table.csv")]);
    }

    #[test]
    fn test_team_with_comma_is_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        export_csv(&[standing(2010, "5", "Nagoya, Grampus")], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("\"Nagoya, Grampus\""));
    }
}
