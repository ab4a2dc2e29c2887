//! Lexicon-based sentiment scoring.
//!
//! Counts positive and negative lexicon hits over lowercased alphanumeric
//! tokens; the sign of the difference is the verdict. Intentionally shallow
//! — no negation handling, no intensity weights.

use strum::Display;

const POSITIVE: &[&str] = &[
    "amazing",
    "awesome",
    "best",
    "brilliant",
    "delighted",
    "excellent",
    "fantastic",
    "glad",
    "good",
    "great",
    "happy",
    "helpful",
    "impressive",
    "love",
    "perfect",
    "pleased",
    "success",
    "superb",
    "thank",
    "thanks",
    "win",
    "wonderful",
];

const NEGATIVE: &[&str] = &[
    "angry",
    "awful",
    "bad",
    "broken",
    "bug",
    "crash",
    "error",
    "fail",
    "failure",
    "hate",
    "horrible",
    "issue",
    "poor",
    "problem",
    "sad",
    "slow",
    "terrible",
    "useless",
    "worst",
    "wrong",
];

/// Verdict of [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Positive hits minus negative hits.
pub fn score(text: &str) -> i32 {
    let lowered = text.to_lowercase();
    let mut total = 0;
    for token in lowered.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        if POSITIVE.contains(&token) {
            total += 1;
        } else if NEGATIVE.contains(&token) {
            total -= 1;
        }
    }
    total
}

/// Classify `text` by the sign of its [`score`].
pub fn analyze(text: &str) -> Sentiment {
    match score(text) {
        s if s > 0 => Sentiment::Positive,
        s if s < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}
