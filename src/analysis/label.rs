use serde::Serialize;
use std::fmt;

/// Compound scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Discrete sentiment class derived from a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Positive => "positive",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            SentimentLabel::Negative => "sentiment-negative",
            SentimentLabel::Neutral => "sentiment-neutral",
            SentimentLabel::Positive => "sentiment-positive",
        }
    }

    pub fn all() -> &'static [SentimentLabel] {
        &[
            SentimentLabel::Negative,
            SentimentLabel::Neutral,
            SentimentLabel::Positive,
        ]
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
