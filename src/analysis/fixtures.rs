//! Builders shared by the analysis tests.

use chrono::NaiveDateTime;

use super::label::SentimentLabel;
use super::sentiment::PolarityScores;
use super::types::ScoredComment;
use crate::dataset::Comment;

pub fn comment(id: &str, timestamp: &str, text: &str) -> Comment {
    let timestamp = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").unwrap();
    Comment {
        id: id.to_string(),
        timestamp,
        username: format!("user{}", id),
        comment: text.to_string(),
        fields: vec![
            id.to_string(),
            timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            format!("user{}", id),
            text.to_string(),
        ],
    }
}

/// A comment with a fixed compound score, bypassing the scorer.
pub fn scored(id: &str, timestamp: &str, text: &str, compound: f64) -> ScoredComment {
    ScoredComment {
        comment: comment(id, timestamp, text),
        scores: PolarityScores {
            compound,
            ..PolarityScores::default()
        },
        label: SentimentLabel::from_compound(compound),
    }
}
