//! Lexicon-based sentiment classification.
//!
//! Each token is looked up in the [`AFINN`](crate::dictionaries::afinn::AFINN)
//! lexicon, first as written and then by its Snowball English stem. A negator
//! in the three preceding tokens flips the sign. Polarity is the valence sum
//! divided by the token count, so long neutral passages dilute a few strong
//! words.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::LazyLock;

use rust_stemmers::{Algorithm, Stemmer};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionaries::afinn::{self, AFINN, NEGATORS};
use crate::text;

/// How many tokens back a negator reaches.
const NEGATION_WINDOW: usize = 3;

/// Lexicon keyed by stem, for inflected forms the lexicon does not list.
static STEMMED_AFINN: LazyLock<HashMap<String, i32>> = LazyLock::new(|| {
    stem_table(afinn::entries(), &Stemmer::create(Algorithm::English))
});

/// Build the stem table.
///
/// Several lexicon words can share a stem with different ratings ("thank"
/// and "thankful"). The word that is its own stem wins; otherwise the
/// alphabetically first word does. The result does not depend on the order
/// of `entries`.
fn stem_table<'a>(
    entries: impl IntoIterator<Item = (&'a str, i32)>,
    stemmer: &Stemmer,
) -> HashMap<String, i32> {
    let mut chosen: HashMap<String, (&'a str, i32)> = HashMap::new();
    for (word, valence) in entries {
        let stem = stemmer.stem(word).into_owned();
        match chosen.entry(stem) {
            Entry::Vacant(slot) => {
                slot.insert((word, valence));
            }
            Entry::Occupied(mut slot) => {
                let current = slot.get().0;
                let is_root = slot.key() == word;
                let current_is_root = slot.key() == current;
                if (is_root, Reverse(word)) > (current_is_root, Reverse(current)) {
                    slot.insert((word, valence));
                }
            }
        }
    }
    chosen
        .into_iter()
        .map(|(stem, (_, valence))| (stem, valence))
        .collect()
}

/// Overall emotional valence of a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Sentiment {
    /// Polarity above the threshold.
    Positive,
    /// Polarity below the negative threshold.
    Negative,
    /// Everything in between, and empty input.
    #[default]
    Neutral,
}

impl Sentiment {
    /// Classify a polarity against a symmetric threshold.
    pub fn from_polarity(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            Self::Positive
        } else if polarity < -threshold {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Returns the label used in reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateful analyzer holding a stemmer instance.
pub struct SentimentAnalyzer {
    stemmer: Stemmer,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentAnalyzer").finish_non_exhaustive()
    }
}

impl SentimentAnalyzer {
    /// Create an English analyzer.
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    fn valence(&self, token: &str) -> i32 {
        if let Some(v) = AFINN.get(token) {
            return *v;
        }
        STEMMED_AFINN
            .get(self.stemmer.stem(token).as_ref())
            .copied()
            .unwrap_or(0)
    }

    /// Mean valence per token. Returns 0 for an empty token sequence.
    pub fn polarity(&self, tokens: &[String]) -> f64 {
        if tokens.is_empty() {
            return 0.0;
        }

        let mut sum = 0i64;
        for (i, token) in tokens.iter().enumerate() {
            let base = self.valence(token);
            if base == 0 {
                continue;
            }
            let negated = (1..=NEGATION_WINDOW)
                .any(|k| i >= k && NEGATORS.contains(&tokens[i - k].as_str()));
            sum += i64::from(if negated { -base } else { base });
        }

        sum as f64 / tokens.len() as f64
    }

    /// Tokenize and classify `content`.
    #[tracing::instrument(skip_all, fields(text_len = content.len()))]
    pub fn classify(&self, content: &str, threshold: f64) -> Sentiment {
        let tokens = text::word_tokens(content);
        if tokens.is_empty() {
            return Sentiment::Neutral;
        }
        let polarity = self.polarity(&tokens);
        tracing::debug!(polarity, tokens = tokens.len(), "sentiment polarity");
        Sentiment::from_polarity(polarity, threshold)
    }
}

/// Classify `content` with a fresh analyzer.
pub fn analyze_sentiment(content: &str, threshold: f64) -> Sentiment {
    SentimentAnalyzer::new().classify(content, threshold)
}
