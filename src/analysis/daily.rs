use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use super::types::ScoredComment;

/// Sentiment totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub total_comments: usize,
    pub avg_compound: f64,
    /// Percentage of the day's comments labelled negative
    pub negative_pct: f64,
    /// Change in `negative_pct` from the previous day in the series; 0 for the first
    pub neg_diff: f64,
}

#[derive(Default)]
struct DayTotals {
    count: usize,
    compound_sum: f64,
    negatives: usize,
}

/// Group scored comments by calendar date, ascending.
pub fn aggregate_daily(scored: &[ScoredComment]) -> Vec<DailyMetric> {
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for c in scored {
        let totals = days.entry(c.date()).or_default();
        totals.count += 1;
        totals.compound_sum += c.scores.compound;
        if c.is_negative() {
            totals.negatives += 1;
        }
    }

    let mut previous_pct: Option<f64> = None;
    days.into_iter()
        .map(|(date, totals)| {
            let total = totals.count as f64;
            let negative_pct = totals.negatives as f64 / total * 100.0;
            let neg_diff = previous_pct.map_or(0.0, |prev| negative_pct - prev);
            previous_pct = Some(negative_pct);

            DailyMetric {
                date,
                total_comments: totals.count,
                avg_compound: totals.compound_sum / total,
                negative_pct,
                neg_diff,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::scored;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn test_groups_by_date_sorted_ascending() {
        let rows = vec![
            scored("1", "2024-03-03 10:00:00", "a", -0.5),
            scored("2", "2024-03-01 23:59:59", "b", 0.5),
            scored("3", "2024-03-03 00:00:00", "c", 0.1),
            scored("4", "2024-03-02 12:00:00", "d", -0.2),
        ];
        let daily = aggregate_daily(&rows);

        let dates: Vec<_> = daily.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day(2024, 3, 1), day(2024, 3, 2), day(2024, 3, 3)]);
        assert_eq!(
            daily.iter().map(|d| d.total_comments).sum::<usize>(),
            rows.len()
        );
        assert_eq!(daily[2].total_comments, 2);
    }

    #[test]
    fn test_metrics_per_day() {
        let rows = vec![
            scored("1", "2024-03-01 08:00:00", "a", -0.6),
            scored("2", "2024-03-01 09:00:00", "b", 0.2),
            scored("3", "2024-03-01 10:00:00", "c", 0.0),
            scored("4", "2024-03-01 11:00:00", "d", -0.04),
        ];
        let daily = aggregate_daily(&rows);
        assert_eq!(daily.len(), 1);

        let d = &daily[0];
        assert_eq!(d.total_comments, 4);
        assert!((d.avg_compound - (-0.11)).abs() < 1e-12);
        // -0.04 is neutral, so only one of four is negative
        assert_eq!(d.negative_pct, 25.0);
        assert_eq!(d.neg_diff, 0.0);
    }

    #[test]
    fn test_neg_diff_is_first_difference() {
        let rows = vec![
            scored("1", "2024-03-01 08:00:00", "a", 0.5),
            scored("2", "2024-03-01 09:00:00", "b", -0.5),
            scored("3", "2024-03-02 08:00:00", "c", -0.5),
            scored("4", "2024-03-04 08:00:00", "d", 0.5),
            scored("5", "2024-03-04 09:00:00", "e", 0.5),
            scored("6", "2024-03-04 10:00:00", "f", 0.5),
            scored("7", "2024-03-04 11:00:00", "g", -0.5),
        ];
        let daily = aggregate_daily(&rows);

        assert_eq!(daily[0].neg_diff, 0.0);
        for i in 1..daily.len() {
            assert_eq!(
                daily[i].neg_diff,
                daily[i].negative_pct - daily[i - 1].negative_pct
            );
        }
        assert_eq!(daily[1].neg_diff, 50.0);
        // gap days are not filled in: 2024-03-04 follows 2024-03-02 directly
        assert_eq!(daily[2].date, day(2024, 3, 4));
        assert_eq!(daily[2].neg_diff, -75.0);
    }
}
