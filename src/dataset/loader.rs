use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use thiserror::Error;
use tracing::debug;

use super::types::{Comment, Dataset, REQUIRED_COLUMNS};

/// Fatal ingest failures. Any of these aborts the pipeline before scoring.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("row {row}: cannot parse timestamp {value:?}")]
    InvalidTimestamp { row: usize, value: String },
    #[error("malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    // month-first, as spreadsheet exports write it
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

// `%#z` takes `+HH`, `+HHMM` and `+HH:MM`
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

pub fn load_csv(bytes: &[u8]) -> Result<Dataset, SchemaError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let position = |name: &str| columns.iter().position(|c| c == name);
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|&name| position(name).is_none())
        .map(|name| name.to_string())
        .collect();
    let (id_idx, ts_idx, user_idx, comment_idx) = match (
        position("id"),
        position("timestamp"),
        position("username"),
        position("comment"),
    ) {
        (Some(a), Some(b), Some(c), Some(d)) if missing.is_empty() => (a, b, c, d),
        _ => return Err(SchemaError::MissingColumns(missing)),
    };

    let mut comments = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or_default().to_string();

        let raw_ts = cell(ts_idx);
        let timestamp = parse_timestamp(&raw_ts).ok_or(SchemaError::InvalidTimestamp {
            row: i + 1,
            value: raw_ts,
        })?;

        comments.push(Comment {
            id: cell(id_idx),
            timestamp,
            username: cell(user_idx),
            comment: cell(comment_idx),
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    debug!(
        "Loaded dataset - rows={}, columns={}",
        comments.len(),
        columns.join(",")
    );

    Ok(Dataset { columns, comments })
}

/// Parse a timestamp cell into a timezone-naive instant. Offsets are dropped,
/// keeping the wall-clock time the file was written in.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    let s = s.strip_suffix(" UTC").unwrap_or(s);
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
