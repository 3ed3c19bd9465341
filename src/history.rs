//! Session history records and their CSV form.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::Personality;
use crate::error::HistoryError;
use crate::time_series::TrendPoint;

/// File name used when the history is written to disk
pub const EXPORT_FILE_NAME: &str = "typing_history.csv";

/// Column order of the exported history
pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "name",
    "delay",
    "time",
    "hesitations",
    "wpm",
    "cpm",
    "accuracy",
    "personality",
];

/// One finished typing attempt. Never changed after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "name")]
    pub user_name: Option<String>,
    #[serde(rename = "delay")]
    pub average_delay_secs: f64,
    #[serde(rename = "time")]
    pub total_time_secs: f64,
    pub hesitations: u32,
    #[serde(rename = "wpm")]
    pub words_per_minute: f64,
    #[serde(rename = "cpm")]
    pub chars_per_minute: f64,
    #[serde(rename = "accuracy")]
    pub accuracy_percent: f64,
    pub personality: Personality,
}

/// Serialize `records` to CSV text, header first, one row per record
pub fn export_csv(records: &[SessionRecord]) -> Result<String, HistoryError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(vec![]);

    // written by hand so an empty history still gets its header row
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HistoryError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse CSV text produced by [`export_csv`]
pub fn import_csv(data: &str) -> Result<Vec<SessionRecord>, HistoryError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    reader
        .deserialize()
        .map(|row| row.map_err(HistoryError::from))
        .collect()
}

/// Write the history as `typing_history.csv` inside `dir`
pub fn write_csv_file<P: AsRef<Path>>(
    records: &[SessionRecord],
    dir: P,
) -> Result<PathBuf, HistoryError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, export_csv(records)?)?;
    info!(path = %path.display(), rows = records.len(), "history exported");
    Ok(path)
}

/// Per-attempt series for the trend chart, attempts numbered from 1
pub fn trend(records: &[SessionRecord]) -> (Vec<TrendPoint>, Vec<TrendPoint>) {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let attempt = (i + 1) as f64;
            (
                TrendPoint::new(attempt, r.words_per_minute),
                TrendPoint::new(attempt, r.accuracy_percent),
            )
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(name: Option<&str>, wpm: f64, accuracy: f64) -> SessionRecord {
        SessionRecord {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap(),
            user_name: name.map(str::to_string),
            average_delay_secs: 0.227,
            total_time_secs: 10.0,
            hesitations: 2,
            words_per_minute: wpm,
            chars_per_minute: 264.0,
            accuracy_percent: accuracy,
            personality: Personality::Neutral,
        }
    }

    #[test]
    fn empty_history_is_header_only() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "timestamp,name,delay,time,hesitations,wpm,cpm,accuracy,personality\n"
        );
    }

    #[test]
    fn one_line_per_record_plus_header() {
        let records = vec![
            record(Some("ada"), 54.0, 100.0),
            record(None, 40.5, 87.5),
            record(Some("grace"), 61.2, 93.0),
        ];
        let csv = export_csv(&records).unwrap();
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.lines().nth(1).unwrap().ends_with(",Neutral"));
    }

    #[test]
    fn import_recovers_exported_fields() {
        let records = vec![record(Some("ada"), 54.0, 100.0), record(None, 40.5, 87.5)];
        let csv = export_csv(&records).unwrap();
        let imported = import_csv(&csv).unwrap();
        assert_eq!(imported, records);
    }

    #[test]
    fn names_with_commas_survive() {
        let records = vec![record(Some("Lovelace, Ada"), 54.0, 100.0)];
        let csv = export_csv(&records).unwrap();
        assert!(csv.contains("\"Lovelace, Ada\""));
        assert_eq!(import_csv(&csv).unwrap(), records);
    }

    #[test]
    fn import_rejects_unknown_personality() {
        let csv = "timestamp,name,delay,time,hesitations,wpm,cpm,accuracy,personality\n\
                   2024-05-01T12:30:15+00:00,,0.1,1.0,0,60.0,300.0,100.0,Sleepy\n";
        assert!(import_csv(csv).is_err());
    }

    #[test]
    fn write_csv_file_uses_export_name() {
        let dir = tempdir().unwrap();
        let path = write_csv_file(&[record(None, 54.0, 100.0)], dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn trend_numbers_attempts_from_one() {
        let records = vec![record(None, 30.0, 90.0), record(None, 45.0, 95.0)];
        let (wpm, accuracy) = trend(&records);
        assert_eq!(wpm, vec![TrendPoint::new(1.0, 30.0), TrendPoint::new(2.0, 45.0)]);
        assert_eq!(
            accuracy,
            vec![TrendPoint::new(1.0, 90.0), TrendPoint::new(2.0, 95.0)]
        );
    }
}
