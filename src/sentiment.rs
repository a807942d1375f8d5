//! Lexicon-based sentiment scoring
//!
//! Second pipeline stage: attaches a compound polarity score and a
//! categorical label to each cleaned review. The scorer is deterministic and
//! stateless per review, with no cross-review context, so reviews may be
//! scored in any order (or in parallel) with identical results.
//!
//! The rule set follows the usual lexicon-heuristic recipe: word valences,
//! degree modifiers that amplify or damp the following sentiment word,
//! negation within a three-token window, and exclamation emphasis, all folded
//! into a single compound score normalized to [-1, 1].

use std::collections::{HashMap, HashSet};

use crate::models::{Review, SentimentLabel};

/// Compound score at or above this is labeled positive. Fixed constant;
/// downstream consumers depend on it for compatibility.
pub const POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below this is labeled negative. Fixed constant.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

/// Normalization constant for the compound score: sum / sqrt(sum^2 + ALPHA).
const ALPHA: f64 = 15.0;

/// Valence multiplier applied when a sentiment word is negated.
const NEGATION_FACTOR: f64 = -0.74;

/// Per-'!' amplitude added for punctuation emphasis, capped at four marks.
const EXCLAMATION_BOOST: f64 = 0.292;

/// Booster influence decays with distance from the sentiment word.
const DISTANCE_DECAY: [f64; 3] = [1.0, 0.95, 0.9];

/// A compound polarity score and its derived label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    /// Compound polarity in [-1, 1]
    pub value: f64,
    /// Label derived from the fixed thresholds
    pub label: SentimentLabel,
}

impl SentimentScore {
    /// Derive the score/label pair from a compound value.
    #[must_use]
    pub fn from_compound(value: f64) -> Self {
        let label = if value >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if value <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self { value, label }
    }
}

/// Scoring capability. Aggregation and keyword extraction only see labeled
/// reviews, so an alternative scorer can be substituted without touching them.
pub trait SentimentScorer {
    /// Score one text. Must be deterministic and order-independent.
    fn score(&self, text: &str) -> SentimentScore;

    /// Attach score and label to each review in place.
    fn score_reviews(&self, reviews: &mut [Review]) {
        for review in reviews.iter_mut() {
            let scored = self.score(&review.text);
            review.sentiment_score = Some(scored.value);
            review.sentiment_label = Some(scored.label);
        }
    }
}

/// Fixed-lexicon scorer with negation, degree-modifier, and punctuation rules.
pub struct LexiconScorer {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

/// Word valences on the conventional -4..4 scale, tuned for product reviews.
const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("wonderful", 2.7),
    ("fantastic", 2.6),
    ("awesome", 3.1),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("loves", 3.2),
    ("loved", 2.9),
    ("like", 1.5),
    ("likes", 1.5),
    ("liked", 1.8),
    ("enjoy", 2.2),
    ("enjoys", 2.2),
    ("happy", 2.7),
    ("pleased", 1.9),
    ("satisfied", 1.7),
    ("recommend", 1.6),
    ("recommended", 1.6),
    ("fresh", 1.3),
    ("healthy", 1.7),
    ("soft", 1.0),
    ("tasty", 1.9),
    ("delicious", 2.3),
    ("favorite", 2.0),
    ("worth", 0.9),
    ("quality", 1.4),
    ("works", 1.2),
    ("fine", 0.8),
    ("nice", 1.8),
    ("easy", 1.1),
    ("glad", 2.0),
    ("thrilled", 2.9),
    ("impressed", 2.2),
    ("super", 2.9),
    // Negative
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("worst", -3.1),
    ("worse", -2.1),
    ("hate", -2.7),
    ("hates", -2.7),
    ("hated", -2.4),
    ("poor", -1.9),
    ("disappointing", -2.2),
    ("disappointed", -2.2),
    ("disappointment", -2.3),
    ("refuse", -1.2),
    ("refused", -1.2),
    ("refuses", -1.2),
    ("reject", -1.7),
    ("rejected", -1.9),
    ("sick", -1.8),
    ("vomit", -2.4),
    ("vomiting", -2.4),
    ("diarrhea", -2.0),
    ("smell", -0.5),
    ("smells", -0.5),
    ("stink", -1.9),
    ("stinks", -1.9),
    ("stale", -1.4),
    ("moldy", -2.3),
    ("broken", -1.6),
    ("damaged", -1.7),
    ("waste", -1.8),
    ("wasted", -2.1),
    ("useless", -1.8),
    ("expensive", -0.9),
    ("overpriced", -1.6),
    ("cheap", -0.8),
    ("wrong", -1.6),
    ("problem", -1.4),
    ("problems", -1.4),
    ("mess", -1.5),
    ("allergic", -1.4),
    ("avoid", -1.3),
    ("return", -0.8),
    ("returned", -0.9),
    ("returning", -0.9),
    ("never", -1.3),
    ("gross", -2.1),
    ("disgusting", -2.4),
];

/// Degree modifiers: positive increments amplify, negative ones damp.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("really", 0.267),
    ("remarkably", 0.267),
    ("so", 0.293),
    ("totally", 0.267),
    ("truly", 0.267),
    ("very", 0.293),
    ("quite", 0.233),
    ("highly", 0.267),
    ("especially", 0.267),
    ("almost", -0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("kind of", -0.267),
    ("kinda", -0.267),
    ("less", -0.293),
    ("marginally", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.267),
    ("sort of", -0.267),
];

/// Words that flip the valence of a following sentiment word.
const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "nowhere", "neither", "nor", "cannot",
    "cant", "wont", "without", "rarely", "seldom",
];

impl LexiconScorer {
    /// Build the scorer with its fixed lexicon and rule tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Look back from position `i` for degree modifiers and negations, and
    /// return the adjusted valence.
    fn adjust_valence(&self, tokens: &[String], i: usize, valence: f64) -> f64 {
        let mut adjusted = valence;

        for (offset, decay) in DISTANCE_DECAY.iter().enumerate() {
            let Some(j) = i.checked_sub(offset + 1) else { break };
            let prev = tokens[j].as_str();

            if let Some(boost) = self.boosters.get(prev) {
                // Boosters push away from zero, dampeners pull toward it.
                adjusted += boost * decay * adjusted.signum();
            }
        }

        let window_start = i.saturating_sub(3);
        let negated = tokens[window_start..i]
            .iter()
            .any(|t| self.negations.contains(t.as_str()) || t.ends_with("n't"));
        if negated {
            adjusted *= NEGATION_FACTOR;
        }

        adjusted
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        // Strip sentence punctuation for lexicon lookup; the raw text keeps
        // it for the emphasis rule below.
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c| matches!(c, '.' | '!' | '?')).to_lowercase())
            .collect();

        if tokens.iter().all(String::is_empty) {
            return SentimentScore::from_compound(0.0);
        }

        let mut total = 0.0;
        let mut hits = 0usize;
        for (i, token) in tokens.iter().enumerate() {
            let Some(&valence) = self.lexicon.get(token.as_str()) else {
                continue;
            };
            // "never" acts as a negator for a following sentiment word, not
            // as a sentiment word itself, when one follows within the window.
            if self.negations.contains(token.as_str())
                && tokens[i + 1..]
                    .iter()
                    .take(3)
                    .any(|t| self.lexicon.contains_key(t.as_str()))
            {
                continue;
            }
            total += self.adjust_valence(&tokens, i, valence);
            hits += 1;
        }

        if hits > 0 {
            let exclamations = text.matches('!').count().min(4);
            total += exclamations as f64 * EXCLAMATION_BOOST * total.signum();
        }

        let compound = (total / (total * total + ALPHA).sqrt()).clamp(-1.0, 1.0);
        SentimentScore::from_compound(compound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_text() {
        let scorer = LexiconScorer::new();
        let scored = scorer.score("great food my cat loves it!");
        assert!(scored.value >= POSITIVE_THRESHOLD);
        assert_eq!(scored.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_text() {
        let scorer = LexiconScorer::new();
        let scored = scorer.score("cat refused to eat it.");
        assert!(scored.value <= NEGATIVE_THRESHOLD);
        assert_eq!(scored.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_text() {
        let scorer = LexiconScorer::new();
        let scored = scorer.score("the bag arrived on tuesday");
        assert_eq!(scored.value, 0.0);
        assert_eq!(scored.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_empty_text_is_neutral_zero() {
        let scorer = LexiconScorer::new();
        let scored = scorer.score("");
        assert_eq!(scored.value, 0.0);
        assert_eq!(scored.label, SentimentLabel::Neutral);
        let scored = scorer.score("   ");
        assert_eq!(scored.value, 0.0);
    }

    #[test]
    fn test_negation_flips_sentiment() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("the food is good");
        let negated = scorer.score("the food is not good");
        assert_eq!(plain.label, SentimentLabel::Positive);
        assert_eq!(negated.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_contraction_negation() {
        let scorer = LexiconScorer::new();
        let scored = scorer.score("my cat doesn't like this food");
        assert_eq!(scored.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_intensifier_amplifies() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("the food is good");
        let boosted = scorer.score("the food is very good");
        assert!(boosted.value > plain.value);
    }

    #[test]
    fn test_dampener_reduces() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("the food is good");
        let damped = scorer.score("the food is barely good");
        assert!(damped.value < plain.value);
        assert!(damped.value > 0.0);
    }

    #[test]
    fn test_exclamation_emphasis() {
        let scorer = LexiconScorer::new();
        let plain = scorer.score("my cat loves this");
        let emphatic = scorer.score("my cat loves this!!!");
        assert!(emphatic.value > plain.value);
    }

    #[test]
    fn test_score_is_deterministic() {
        let scorer = LexiconScorer::new();
        let a = scorer.score("great food but terrible packaging");
        let b = scorer.score("great food but terrible packaging");
        assert_eq!(a.value, b.value);
    }

    #[test]
    fn test_compound_is_bounded() {
        let scorer = LexiconScorer::new();
        let scored = scorer.score("best great amazing wonderful perfect excellent awesome love");
        assert!(scored.value <= 1.0);
        assert!(scored.value >= -1.0);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(SentimentScore::from_compound(0.05).label, SentimentLabel::Positive);
        assert_eq!(SentimentScore::from_compound(-0.05).label, SentimentLabel::Negative);
        assert_eq!(SentimentScore::from_compound(0.049).label, SentimentLabel::Neutral);
        assert_eq!(SentimentScore::from_compound(-0.049).label, SentimentLabel::Neutral);
        assert_eq!(SentimentScore::from_compound(0.0).label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_score_reviews_attaches_fields() {
        let scorer = LexiconScorer::new();
        let mut reviews = vec![crate::models::Review {
            review_id: "r1".to_string(),
            product_id: "p1".to_string(),
            rating: 5,
            text: "great food my cat loves it!".to_string(),
            verified: true,
            date: None,
            sentiment_score: None,
            sentiment_label: None,
        }];
        scorer.score_reviews(&mut reviews);
        assert_eq!(reviews[0].sentiment_label, Some(SentimentLabel::Positive));
        assert!(reviews[0].sentiment_score.is_some());
    }
}
