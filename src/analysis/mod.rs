pub mod daily;
pub mod keywords;
pub mod label;
pub mod report;
pub mod sentiment;
pub mod spikes;
pub mod suggestions;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use daily::DailyMetric;
pub use report::Report;
pub use sentiment::{LexiconScorer, PolarityScorer};
pub use types::ScoredComment;
