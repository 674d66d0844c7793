use chrono::NaiveDate;
use serde::Serialize;

use super::label::SentimentLabel;
use super::sentiment::{PolarityScorer, PolarityScores};
use crate::dataset::{Comment, Dataset};

#[derive(Debug, Clone, Serialize)]
pub struct ScoredComment {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(flatten)]
    pub scores: PolarityScores,
    pub label: SentimentLabel,
}

impl ScoredComment {
    pub fn score(comment: &Comment, scorer: &dyn PolarityScorer) -> Self {
        let scores = scorer.polarity_scores(&comment.comment);
        Self {
            comment: comment.clone(),
            scores,
            label: SentimentLabel::from_compound(scores.compound),
        }
    }

    /// Calendar day of the comment, no timezone conversion applied.
    pub fn date(&self) -> NaiveDate {
        self.comment.timestamp.date()
    }

    pub fn is_negative(&self) -> bool {
        self.label == SentimentLabel::Negative
    }
}

pub fn score_dataset(dataset: &Dataset, scorer: &dyn PolarityScorer) -> Vec<ScoredComment> {
    dataset
        .comments
        .iter()
        .map(|c| ScoredComment::score(c, scorer))
        .collect()
}
