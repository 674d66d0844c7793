use serde::Serialize;
use tracing::debug;

use super::daily::{aggregate_daily, DailyMetric};
use super::keywords::{extract_keywords, rank_negative, KeywordCount, TOP_KEYWORDS, TOP_NEGATIVE};
use super::label::SentimentLabel;
use super::sentiment::PolarityScorer;
use super::spikes::detect_spikes;
use super::suggestions::suggest;
use super::types::{score_dataset, ScoredComment};
use crate::dataset::Dataset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: SentimentLabel,
    pub count: usize,
}

/// Everything the dashboard shows for one dataset and spike threshold.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: usize,
    pub spike_threshold: f64,
    pub distribution: Vec<LabelCount>,
    pub daily: Vec<DailyMetric>,
    pub spikes: Vec<DailyMetric>,
    pub top_negative: Vec<ScoredComment>,
    pub keywords: Vec<KeywordCount>,
    pub suggestions: Vec<String>,
    #[serde(skip)]
    pub scored: Vec<ScoredComment>,
}

impl Report {
    pub fn build(dataset: &Dataset, scorer: &dyn PolarityScorer, spike_threshold: f64) -> Self {
        let scored = score_dataset(dataset, scorer);
        let daily = aggregate_daily(&scored);
        let spikes = detect_spikes(&daily, spike_threshold);
        let top_negative = rank_negative(&scored, TOP_NEGATIVE);
        let keywords = extract_keywords(
            top_negative.iter().map(|c| c.comment.comment.as_str()),
            TOP_KEYWORDS,
        );
        let suggestions = suggest(&keywords).into_iter().map(String::from).collect();

        debug!(
            "Report built - rows={}, days={}, spikes={}, negatives={}, keywords={}",
            scored.len(),
            daily.len(),
            spikes.len(),
            top_negative.len(),
            keywords.len()
        );

        Self {
            rows: scored.len(),
            spike_threshold,
            distribution: distribution(&scored),
            daily,
            spikes,
            top_negative,
            keywords,
            suggestions,
            scored,
        }
    }
}

/// Label counts, most common first. Labels with no comments are omitted.
pub fn distribution(scored: &[ScoredComment]) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = SentimentLabel::all()
        .iter()
        .map(|&label| LabelCount {
            label,
            count: scored.iter().filter(|c| c.label == label).count(),
        })
        .filter(|lc| lc.count > 0)
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}
