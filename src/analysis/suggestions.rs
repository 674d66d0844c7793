use std::collections::HashSet;

use super::keywords::KeywordCount;

/// A keyword must appear at least this often to count as a recurring issue.
pub const MIN_ISSUE_COUNT: usize = 2;

pub const FALLBACK: &str = "No frequent issues found. Continue monitoring.";

pub struct SuggestionRule {
    pub triggers: &'static [&'static str],
    pub text: &'static str,
}

/// Evaluated in order; every rule whose triggers intersect the issue set fires.
pub const RULES: &[SuggestionRule] = &[
    SuggestionRule {
        triggers: &["delivery", "delayed", "delay"],
        text: "Investigate shipping partners and update ETAs to customers.",
    },
    SuggestionRule {
        triggers: &["support", "service", "reply"],
        text: "Improve customer support SLAs and add canned helpful responses.",
    },
    SuggestionRule {
        triggers: &["refund", "returned", "wrong"],
        text: "Audit order fulfillment process and streamline refund policy.",
    },
    SuggestionRule {
        triggers: &["damaged", "packaging"],
        text: "Review packaging processes and quality checks before dispatch.",
    },
];

/// Keywords frequent enough to act on.
pub fn issue_keywords(keywords: &[KeywordCount]) -> HashSet<&str> {
    keywords
        .iter()
        .filter(|k| k.count >= MIN_ISSUE_COUNT)
        .map(|k| k.word.as_str())
        .collect()
}

/// Recommended actions for the given keyword counts. Never empty: falls back
/// to a single "keep monitoring" line when no rule fires.
pub fn suggest(keywords: &[KeywordCount]) -> Vec<&'static str> {
    let issues = issue_keywords(keywords);

    let mut fired: Vec<&'static str> = RULES
        .iter()
        .filter(|rule| rule.triggers.iter().any(|t| issues.contains(t)))
        .map(|rule| rule.text)
        .collect();

    if fired.is_empty() {
        fired.push(FALLBACK);
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::keywords::{extract_keywords, TOP_KEYWORDS};

    fn kw(pairs: &[(&str, usize)]) -> Vec<KeywordCount> {
        pairs
            .iter()
            .map(|&(word, count)| KeywordCount {
                word: word.to_string(),
                count,
            })
            .collect()
    }

    #[test]
    fn test_empty_keywords_fall_back() {
        assert_eq!(suggest(&[]), vec![FALLBACK]);
    }

    #[test]
    fn test_single_occurrences_do_not_fire() {
        let keywords = kw(&[("delivery", 1), ("refund", 1), ("damaged", 1)]);
        assert_eq!(suggest(&keywords), vec![FALLBACK]);
    }

    #[test]
    fn test_rules_fire_in_table_order() {
        let keywords = kw(&[("packaging", 4), ("reply", 3), ("delay", 2), ("great", 9)]);
        assert_eq!(
            suggest(&keywords),
            vec![RULES[0].text, RULES[1].text, RULES[3].text]
        );
    }

    #[test]
    fn test_fallback_never_mixed_with_rules() {
        let keywords = kw(&[("wrong", 2)]);
        let out = suggest(&keywords);
        assert_eq!(out, vec![RULES[2].text]);
        assert!(!out.contains(&FALLBACK));
    }

    #[test]
    fn test_no_stemming_of_triggers() {
        let keywords = kw(&[("delays", 5), ("refunds", 5), ("replies", 5)]);
        assert_eq!(suggest(&keywords), vec![FALLBACK]);
    }

    #[test]
    fn test_repeated_delivery_complaint_triggers_shipping_rule() {
        let keywords = extract_keywords(["Delivery delayed again, delivery delayed!"], TOP_KEYWORDS);
        let issues = issue_keywords(&keywords);
        assert!(issues.contains("delivery"));
        assert!(issues.contains("delayed"));
        assert_eq!(
            suggest(&keywords),
            vec!["Investigate shipping partners and update ETAs to customers."]
        );
    }
}
