//! Rule-based polarity scoring.
//!
//! The scorer is a VADER-style lexicon model: every known word carries a
//! valence in roughly [-4, 4], adjusted by the words around it (boosters,
//! negations, a contrastive "but", ALL-CAPS emphasis) and by trailing
//! punctuation. The summed valence is squashed into a compound score in
//! [-1, 1], and the share of positive, negative and neutral mass is reported
//! alongside it.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Polarity breakdown for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PolarityScores {
    /// Overall polarity in [-1, 1]
    pub compound: f64,
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
}

/// Anything that can turn text into polarity scores. Implementations must be
/// deterministic and must not fail on odd input.
pub trait PolarityScorer: Send + Sync {
    fn polarity_scores(&self, text: &str) -> PolarityScores;
}

const B_INCR: f64 = 0.293;
const B_DECR: f64 = -0.293;
const C_INCR: f64 = 0.733;
const N_SCALAR: f64 = -0.74;
const NORMALIZE_ALPHA: f64 = 15.0;

static LEXICON: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // positive
        ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("amazing", 2.8),
        ("awesome", 3.1), ("wonderful", 2.7), ("fantastic", 2.6), ("love", 3.2),
        ("loved", 2.9), ("loving", 2.9), ("like", 1.5), ("liked", 1.8),
        ("best", 3.2), ("better", 1.9), ("nice", 1.8), ("happy", 2.7),
        ("glad", 2.0), ("pleased", 1.9), ("perfect", 2.7), ("fast", 0.9),
        ("quick", 1.0), ("quickly", 1.0), ("easy", 1.9), ("helpful", 1.8),
        ("friendly", 2.2), ("polite", 1.6), ("recommend", 1.5), ("recommended", 1.5),
        ("thanks", 1.9), ("thank", 1.5), ("thankful", 2.7), ("appreciate", 1.7),
        ("appreciated", 2.3), ("satisfied", 1.8), ("impressed", 2.1), ("impressive", 2.3),
        ("beautiful", 2.9), ("smooth", 1.5), ("reliable", 1.7), ("superb", 3.1),
        ("brilliant", 2.8), ("delighted", 2.9), ("enjoy", 2.2), ("enjoyed", 2.3),
        ("fine", 0.8), ("solid", 1.3), ("worth", 0.9), ("win", 2.8),
        ("resolved", 1.4), ("fixed", 1.0), ("helped", 1.7), ("fresh", 1.3),
        ("cool", 1.3), ("super", 2.9), ("well", 1.1), ("yes", 1.7),
        ("ok", 1.2), ("okay", 0.9), ("wow", 2.8), ("lovely", 2.8),
        ("fun", 2.3), ("kind", 2.4), ("care", 2.2), ("safe", 1.9),
        (":)", 2.0), (":-)", 2.0), (":d", 2.3), ("<3", 1.9),
        // negative
        ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5),
        ("worst", -3.1), ("worse", -2.1), ("hate", -2.7), ("hated", -3.2),
        ("poor", -2.1), ("disappointed", -1.9), ("disappointing", -2.2), ("disappointment", -2.3),
        ("angry", -2.3), ("annoyed", -1.6), ("annoying", -1.8), ("frustrated", -2.4),
        ("frustrating", -1.9), ("upset", -1.6), ("sad", -2.1), ("unhappy", -1.8),
        ("broken", -2.1), ("damaged", -1.9), ("damage", -2.2), ("late", -0.8),
        ("delay", -1.3), ("delayed", -1.4), ("delays", -1.3), ("slow", -1.1),
        ("missing", -1.2), ("lost", -1.3), ("wrong", -2.1), ("problem", -1.7),
        ("problems", -1.7), ("issue", -0.8), ("issues", -0.9), ("fail", -2.5),
        ("failed", -2.3), ("failure", -2.3), ("useless", -1.8), ("waste", -1.8),
        ("wasted", -2.2), ("scam", -2.6), ("fraud", -2.8), ("rude", -2.0),
        ("ignored", -1.5), ("ignore", -1.4), ("cancel", -0.9),
        ("cancelled", -1.0), ("refund", -0.6), ("complaint", -1.5), ("complain", -1.5),
        ("crap", -1.6), ("garbage", -1.5), ("trash", -1.5), ("ridiculous", -1.5),
        ("unacceptable", -2.0), ("cheap", -0.3), ("expensive", -0.8), ("overpriced", -1.9),
        ("stuck", -1.0), ("error", -1.7), ("bug", -1.1), ("crash", -1.7),
        ("crashed", -1.5), ("confusing", -1.4), ("confused", -1.3), ("mess", -1.5),
        ("nightmare", -2.7), ("pathetic", -2.4), ("sucks", -1.5), ("suck", -1.9),
        ("unreliable", -1.9), ("worried", -1.2), ("dirty", -1.9), ("leaking", -1.2),
        ("cracked", -1.0), ("defective", -1.9), ("faulty", -1.8), ("hopeless", -2.0),
        ("no", -1.2), ("sorry", -0.3), ("unfortunately", -1.4),
        ("worthless", -1.9), ("avoid", -1.2), ("fake", -2.1), ("stolen", -2.2),
        ("disgusting", -2.4), ("furious", -2.7), ("lied", -1.6), ("liar", -2.1),
        (":(", -1.9), (":-(", -1.5), (":'(", -2.2),
    ]
    .into_iter()
    .collect()
});

static BOOSTERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("absolutely", B_INCR), ("amazingly", B_INCR), ("completely", B_INCR),
        ("considerably", B_INCR), ("deeply", B_INCR), ("enormously", B_INCR),
        ("entirely", B_INCR), ("especially", B_INCR), ("exceptionally", B_INCR),
        ("extremely", B_INCR), ("highly", B_INCR), ("hugely", B_INCR),
        ("incredibly", B_INCR), ("most", B_INCR), ("more", B_INCR),
        ("particularly", B_INCR), ("purely", B_INCR), ("quite", B_INCR),
        ("really", B_INCR), ("so", B_INCR), ("such", B_INCR),
        ("thoroughly", B_INCR), ("totally", B_INCR), ("utterly", B_INCR),
        ("very", B_INCR),
        ("almost", B_DECR), ("barely", B_DECR), ("hardly", B_DECR),
        ("less", B_DECR), ("little", B_DECR), ("marginally", B_DECR),
        ("occasionally", B_DECR), ("partly", B_DECR), ("scarcely", B_DECR),
        ("slightly", B_DECR), ("somewhat", B_DECR),
    ]
    .into_iter()
    .collect()
});

static NEGATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "not", "no", "never", "none", "nobody", "nothing", "neither", "nor",
        "nowhere", "cannot", "without", "aint", "arent", "isnt", "wasnt",
        "werent", "dont", "doesnt", "didnt", "cant", "couldnt", "wont",
        "wouldnt", "shouldnt", "hasnt", "havent", "hadnt",
    ]
    .into_iter()
    .collect()
});

/// Characters trimmed from both ends of a token before lexicon lookup.
const TOKEN_PUNCT: &[char] = &[
    '.', ',', '!', '?', ':', ';', '(', ')', '[', ']', '{', '}', '"', '\'', '-', '*', '`',
];

struct Token {
    raw: String,
    lower: String,
}

/// The bundled lexicon scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity_scores(&self, text: &str) -> PolarityScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return PolarityScores::default();
        }

        let cap_diff = is_cap_diff(&tokens);
        let mut sentiments = Vec::with_capacity(tokens.len());

        for (i, token) in tokens.iter().enumerate() {
            if BOOSTERS.contains_key(token.lower.as_str()) {
                sentiments.push(0.0);
                continue;
            }
            let Some(&base) = LEXICON.get(token.lower.as_str()) else {
                sentiments.push(0.0);
                continue;
            };

            let mut valence = base;
            if cap_diff && is_all_caps(&token.raw) {
                valence += C_INCR * base.signum();
            }

            for (distance, decay) in [(1usize, 1.0), (2, 0.95), (3, 0.9)] {
                if i < distance {
                    break;
                }
                let prev = &tokens[i - distance];
                if LEXICON.contains_key(prev.lower.as_str()) {
                    continue;
                }
                valence += booster_scalar(prev, valence, cap_diff) * decay;
            }

            let window = i.saturating_sub(3)..i;
            if tokens[window].iter().any(is_negation) {
                valence *= N_SCALAR;
            }

            sentiments.push(valence);
        }

        apply_but_contrast(&tokens, &mut sentiments);
        score_valence(&sentiments, text)
    }
}

fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|word| {
            let lower = word.to_lowercase();
            // emoticons are looked up verbatim
            let raw = if LEXICON.contains_key(lower.as_str()) && lower.starts_with(|c: char| !c.is_alphanumeric()) {
                word
            } else {
                word.trim_matches(TOKEN_PUNCT)
            };
            if raw.chars().count() <= 1 && !LEXICON.contains_key(raw) {
                return None;
            }
            Some(Token {
                raw: raw.to_string(),
                lower: raw.to_lowercase(),
            })
        })
        .collect()
}

fn is_all_caps(word: &str) -> bool {
    let mut letters = word.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// Shouting only counts as emphasis when the text is not shouted throughout.
fn is_cap_diff(tokens: &[Token]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(&t.raw)).count();
    caps > 0 && caps < tokens.len()
}

fn is_negation(token: &Token) -> bool {
    let folded: String = token.lower.chars().filter(|&c| c != '\'' && c != '’').collect();
    NEGATIONS.contains(folded.as_str()) || token.lower.contains("n't")
}

fn booster_scalar(prev: &Token, valence: f64, cap_diff: bool) -> f64 {
    let Some(&base) = BOOSTERS.get(prev.lower.as_str()) else {
        return 0.0;
    };
    let mut scalar = if valence < 0.0 { -base } else { base };
    if cap_diff && is_all_caps(&prev.raw) {
        scalar += if valence < 0.0 { -C_INCR } else { C_INCR };
    }
    scalar
}

/// Sentiment after "but" dominates: earlier words are halved, later ones
/// weighted 1.5x.
fn apply_but_contrast(tokens: &[Token], sentiments: &mut [f64]) {
    let Some(pivot) = tokens.iter().position(|t| t.lower == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(4) as f64 * 0.292;
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * 0.18,
        _ => 0.96,
    };
    exclamations + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn score_valence(sentiments: &[f64], text: &str) -> PolarityScores {
    let total: f64 = sentiments.iter().sum();
    let emphasis = punctuation_emphasis(text);

    let compound = if total > 0.0 {
        normalize(total + emphasis)
    } else if total < 0.0 {
        normalize(total - emphasis)
    } else {
        0.0
    };

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neu_count = 0.0;
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let mass = pos_sum + neg_sum.abs() + neu_count;
    if mass == 0.0 {
        return PolarityScores::default();
    }

    PolarityScores {
        compound: round_to(compound, 4),
        neg: round_to((neg_sum / mass).abs(), 3),
        neu: round_to(neu_count / mass, 3),
        pos: round_to(pos_sum / mass, 3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> PolarityScores {
        LexiconScorer::new().polarity_scores(text)
    }

    #[test]
    fn test_empty_and_blank_text_score_zero() {
        assert_eq!(score(""), PolarityScores::default());
        assert_eq!(score("   \n\t"), PolarityScores::default());
        assert_eq!(score("!!!"), PolarityScores::default());
    }

    #[test]
    fn test_unknown_words_are_neutral() {
        let s = score("the parcel arrived on tuesday");
        assert_eq!(s.compound, 0.0);
        assert_eq!(s.neu, 1.0);
        assert_eq!(s.pos, 0.0);
        assert_eq!(s.neg, 0.0);
    }

    #[test]
    fn test_polarity_direction() {
        assert!(score("great service").compound > 0.05);
        assert!(score("Delivery delayed again, delivery delayed!").compound < -0.05);
        assert!(score("this is terrible").compound < -0.05);
    }

    #[test]
    fn test_compound_stays_in_range() {
        let s = score("WORST worst terrible awful horrible hate hate hate!!!!!!");
        assert!(s.compound >= -1.0 && s.compound < -0.9);
        let s = score("love love love best amazing great awesome!!!!");
        assert!(s.compound <= 1.0 && s.compound > 0.9);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        for text in ["good but slow delivery", "not bad at all", "meh the box was damaged!!"] {
            let s = score(text);
            let sum = s.neg + s.neu + s.pos;
            assert!((sum - 1.0).abs() < 0.01, "{text}: {sum}");
        }
    }

    #[test]
    fn test_negation_flips_polarity() {
        assert!(score("good").compound > 0.0);
        assert!(score("not good").compound < 0.0);
        assert!(score("don't like it").compound < 0.0);
        assert!(score("the support was never helpful").compound < 0.0);
    }

    #[test]
    fn test_booster_and_dampener() {
        let plain = score("good").compound;
        assert!(score("very good").compound > plain);
        assert!(score("slightly good").compound < plain);
        assert!(score("extremely bad").compound < score("bad").compound);
    }

    #[test]
    fn test_caps_emphasis_only_with_mixed_case() {
        let calm = score("the food was good").compound;
        assert!(score("the food was GOOD").compound > calm);
        assert_eq!(score("GOOD").compound, score("good").compound);
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        assert!(score("the product is good but the delivery was terrible").compound < 0.0);
        assert!(score("the delivery was terrible but the product is great").compound > 0.0);
    }

    #[test]
    fn test_exclamations_amplify() {
        assert!(score("great!!!").compound > score("great").compound);
        assert!(score("awful!!").compound < score("awful").compound);
    }

    #[test]
    fn test_emoticons() {
        assert!(score("arrived :)").compound > 0.0);
        assert!(score("arrived :(").compound < 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let text = "Refund still not processed, support never replies!!";
        assert_eq!(score(text), score(text));
    }

    #[test]
    fn test_rounding_precision() {
        let s = score("pretty good delivery, slightly late");
        assert_eq!(s.compound, round_to(s.compound, 4));
        assert_eq!(s.pos, round_to(s.pos, 3));
    }
}
