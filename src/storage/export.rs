use anyhow::{Context, Result};
use tracing::debug;

use crate::analysis::ScoredComment;

pub const EXPORT_FILENAME: &str = "analyzed_comments.csv";

/// Columns appended to the input header, in order.
pub const DERIVED_COLUMNS: [&str; 6] = [
    "sentiment_compound",
    "neg",
    "neu",
    "pos",
    "sentiment_label",
    "date",
];

/// Serialize the scored dataset: every input column in input order, then the
/// derived columns. A derived column already present in the input (a
/// re-uploaded export) is overwritten where it stands.
pub fn export_csv(columns: &[String], scored: &[ScoredComment]) -> Result<Vec<u8>> {
    let mut header: Vec<String> = columns.to_vec();
    let derived_idx: Vec<usize> = DERIVED_COLUMNS
        .iter()
        .map(|name| match columns.iter().position(|c| c == name) {
            Some(i) => i,
            None => {
                header.push(name.to_string());
                header.len() - 1
            }
        })
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&header)
        .context("Failed to write export header")?;

    for c in scored {
        let mut row = c.comment.fields.clone();
        row.resize(header.len(), String::new());

        let values = [
            c.scores.compound.to_string(),
            c.scores.neg.to_string(),
            c.scores.neu.to_string(),
            c.scores.pos.to_string(),
            c.label.as_str().to_string(),
            c.date().format("%Y-%m-%d").to_string(),
        ];
        for (idx, value) in derived_idx.iter().zip(values) {
            row[*idx] = value;
        }

        writer
            .write_record(&row)
            .with_context(|| format!("Failed to write export row for id {}", c.comment.id))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("Failed to flush export")?;

    debug!("Exported scored dataset - rows={}, bytes={}", scored.len(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sentiment::{LexiconScorer, PolarityScorer};
    use crate::analysis::types::score_dataset;
    use crate::dataset::load_csv;

    const INPUT: &str = "id,timestamp,username,comment,channel\n\
        1,2024-03-01 09:15:00,ana,\"Late again, really?\",web\n\
        2,2024-03-02 18:00:00,bo,\"Box was \"\"damaged\"\"!!\",app\n\
        3,2024-03-02 19:30:00,cy,great service,app\n\
        4,2024-03-03 08:00:00,di,,web\n";

    fn export(input: &[u8]) -> (Vec<u8>, Vec<ScoredComment>) {
        let ds = load_csv(input).unwrap();
        let scored = score_dataset(&ds, &LexiconScorer::new());
        (export_csv(&ds.columns, &scored).unwrap(), scored)
    }

    #[test]
    fn test_header_keeps_input_columns_then_derived() {
        let (bytes, _) = export(INPUT.as_bytes());
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "id,timestamp,username,comment,channel,sentiment_compound,neg,neu,pos,sentiment_label,date"
        );
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_rows_carry_scores_label_and_date() {
        let (bytes, scored) = export(INPUT.as_bytes());
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), scored.len());
        assert_eq!(&rows[1][3], "Box was \"damaged\"!!");
        assert_eq!(&rows[1][4], "app");
        assert_eq!(&rows[1][9], scored[1].label.as_str());
        assert_eq!(&rows[1][10], "2024-03-02");
        assert_eq!(&rows[3][3], "");
        assert_eq!(&rows[3][5], "0");
        assert_eq!(&rows[3][9], "neutral");
    }

    #[test]
    fn test_reload_and_rescore_reproduces_score_columns() {
        let (bytes, _) = export(INPUT.as_bytes());
        let reloaded = load_csv(&bytes).unwrap();
        let scorer = LexiconScorer::new();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        for (record, comment) in reader.records().zip(&reloaded.comments) {
            let record = record.unwrap();
            let rescored = scorer.polarity_scores(&comment.comment);
            assert_eq!(record[5].parse::<f64>().unwrap(), rescored.compound);
            assert_eq!(record[6].parse::<f64>().unwrap(), rescored.neg);
            assert_eq!(record[7].parse::<f64>().unwrap(), rescored.neu);
            assert_eq!(record[8].parse::<f64>().unwrap(), rescored.pos);
        }
    }

    #[test]
    fn test_reexport_overwrites_derived_columns_in_place() {
        let (first, _) = export(INPUT.as_bytes());
        let (second, _) = export(&first);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_dataset_exports_header_only() {
        let (bytes, scored) = export(b"id,timestamp,username,comment\n");
        assert!(scored.is_empty());
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "id,timestamp,username,comment,sentiment_compound,neg,neu,pos,sentiment_label,date\n"
        );
    }
}
