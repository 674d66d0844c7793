use serde::Serialize;
use std::collections::HashMap;

use super::types::ScoredComment;

/// How many of the most negative comments are surfaced and mined for keywords.
pub const TOP_NEGATIVE: usize = 20;
/// How many keywords are kept after counting.
pub const TOP_KEYWORDS: usize = 20;

const STRIP_CHARS: &[char] = &['.', ',', '!', '?', ':', ';', '(', ')', '[', ']', '"', '\''];
const MIN_KEYWORD_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Negative comments, most negative first. Ties keep input order.
pub fn rank_negative(scored: &[ScoredComment], limit: usize) -> Vec<ScoredComment> {
    let mut negative: Vec<&ScoredComment> = scored.iter().filter(|c| c.is_negative()).collect();
    negative.sort_by(|a, b| a.scores.compound.total_cmp(&b.scores.compound));
    negative.into_iter().take(limit).cloned().collect()
}

/// Count lowercased, punctuation-trimmed words longer than three characters
/// across `texts`. Most frequent first; equal counts keep first-seen order.
pub fn extract_keywords<'a, I>(texts: I, limit: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<KeywordCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let lowered = text.to_lowercase();
        for token in lowered.split_whitespace() {
            let word = token.trim_matches(STRIP_CHARS);
            if word.chars().count() < MIN_KEYWORD_CHARS {
                continue;
            }
            match index.get(word) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(word.to_string(), counts.len());
                    counts.push(KeywordCount {
                        word: word.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
