//! Comprehensive unit tests for sentiment.rs module

use review_compare::models::SentimentLabel;
use review_compare::sentiment::{LexiconScorer, SentimentScorer};

fn scorer() -> LexiconScorer {
    LexiconScorer::new()
}

#[test]
fn test_positive_text() {
    let score = scorer().score("great food my cat loves it");
    assert_eq!(score.label, SentimentLabel::Positive);
    assert!(score.value >= 0.05);
}

#[test]
fn test_negative_text() {
    let score = scorer().score("terrible smell cat refused to eat it");
    assert_eq!(score.label, SentimentLabel::Negative);
    assert!(score.value <= -0.05);
}

#[test]
fn test_neutral_text() {
    let score = scorer().score("the bag arrived on tuesday");
    assert_eq!(score.label, SentimentLabel::Neutral);
    assert!(score.value.abs() < 0.05);
}

#[test]
fn test_empty_text_is_neutral() {
    let score = scorer().score("");
    assert_eq!(score.value, 0.0);
    assert_eq!(score.label, SentimentLabel::Neutral);
}

#[test]
fn test_negation_flips_polarity() {
    let s = scorer();
    let plain = s.score("my cat loves this food");
    let negated = s.score("my cat does not love this food");
    assert_eq!(plain.label, SentimentLabel::Positive);
    assert!(negated.value < plain.value);
}

#[test]
fn test_intensifier_raises_magnitude() {
    let s = scorer();
    let plain = s.score("this food is good");
    let boosted = s.score("this food is very good");
    assert!(boosted.value > plain.value);
}

#[test]
fn test_exclamation_raises_magnitude() {
    let s = scorer();
    let plain = s.score("my cat loves it");
    let excited = s.score("my cat loves it!!");
    assert!(excited.value > plain.value);
}

#[test]
fn test_compound_is_bounded() {
    let s = scorer();
    for text in [
        "amazing amazing amazing wonderful perfect excellent great love love love",
        "horrible terrible awful disgusting worst hate hate hate bad bad bad",
    ] {
        let score = s.score(text);
        assert!(score.value >= -1.0);
        assert!(score.value <= 1.0);
    }
}

#[test]
fn test_scoring_is_deterministic() {
    let s = scorer();
    let text = "great crunchy food but the bag smelled a bit odd";
    let a = s.score(text);
    let b = s.score(text);
    assert_eq!(a.value, b.value);
    assert_eq!(a.label, b.label);
}

#[test]
fn test_case_insensitive() {
    let s = scorer();
    let lower = s.score("great food");
    let upper = s.score("GREAT FOOD");
    assert_eq!(lower.value, upper.value);
}

#[test]
fn test_score_reviews_fills_fields() {
    use review_compare::models::Review;

    let mut reviews = vec![Review {
        review_id: "r1".to_string(),
        product_id: "p1".to_string(),
        rating: 5,
        text: "great food my cat loves it".to_string(),
        verified: true,
        date: None,
        sentiment_score: None,
        sentiment_label: None,
    }];

    scorer().score_reviews(&mut reviews);

    assert!(reviews[0].sentiment_score.is_some());
    assert_eq!(reviews[0].sentiment_label, Some(SentimentLabel::Positive));
}
