//! Keyword density analysis.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered word → density map, densest first.
///
/// Serializes as a JSON object whose key order is the density order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordDensity(Vec<(String, f64)>);

impl KeywordDensity {
    /// Number of reported words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no word was reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Density of `word`, if it was reported.
    pub fn get(&self, word: &str) -> Option<f64> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, d)| *d)
    }

    /// Iterate `(word, density)` pairs, densest first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(w, d)| (w.as_str(), *d))
    }
}

impl Serialize for KeywordDensity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (word, density) in &self.0 {
            map.serialize_entry(word, density)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for KeywordDensity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DensityVisitor;

        impl<'de> Visitor<'de> for DensityVisitor {
            type Value = KeywordDensity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of word to density")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((word, density)) = access.next_entry::<String, f64>()? {
                    entries.push((word, density));
                }
                Ok(KeywordDensity(entries))
            }
        }

        deserializer.deserialize_map(DensityVisitor)
    }
}

/// Full-vocabulary statistics plus the filtered report.
#[derive(Debug, Clone, Default)]
pub struct KeywordAnalysis {
    /// Total word tokens.
    pub total_words: usize,
    /// Highest density over the whole vocabulary.
    pub max_density: f64,
    /// Reported subset: above the report floor, densest first, truncated.
    pub reported: KeywordDensity,
}

impl KeywordAnalysis {
    /// Whether any word in the full vocabulary exceeds `limit`.
    pub fn overused(&self, limit: f64) -> bool {
        self.max_density > limit
    }
}

/// Compute word densities over `words`.
///
/// The overuse maximum covers every word; the report keeps words with density
/// above `report_min`, sorted descending (first appearance breaks ties), cut
/// to `report_limit` entries.
#[tracing::instrument(skip_all, fields(words = words.len()))]
pub fn analyze_keyword_density(
    words: &[String],
    report_min: f64,
    report_limit: usize,
) -> KeywordAnalysis {
    if words.is_empty() {
        return KeywordAnalysis::default();
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for w in words {
        match index.get(w.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(w.as_str(), counts.len());
                counts.push((w.as_str(), 1));
            }
        }
    }

    let total = words.len() as f64;
    let mut densities: Vec<(String, f64)> = counts
        .into_iter()
        .map(|(w, c)| (w.to_string(), c as f64 / total))
        .collect();

    let max_density = densities.iter().map(|(_, d)| *d).fold(0.0, f64::max);

    // stable sort keeps first-appearance order among equal densities
    densities.sort_by(|a, b| b.1.total_cmp(&a.1));
    densities.retain(|(_, d)| *d > report_min);
    densities.truncate(report_limit);

    KeywordAnalysis {
        total_words: words.len(),
        max_density,
        reported: KeywordDensity(densities),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::word_tokens;

    #[test]
    fn empty_input() {
        let analysis = analyze_keyword_density(&[], 0.01, 10);
        assert!(analysis.reported.is_empty());
        assert!(!analysis.overused(0.03));
    }

    #[test]
    fn repeated_word_is_overused() {
        let words = word_tokens(&"growth ".repeat(100));
        let analysis = analyze_keyword_density(&words, 0.01, 10);
        assert_eq!(analysis.max_density, 1.0);
        assert!(analysis.overused(0.03));
        assert_eq!(analysis.reported.get("growth"), Some(1.0));
    }

    #[test]
    fn report_is_sorted_filtered_and_truncated() {
        let mut text = String::new();
        for (i, w) in ["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta",
            "iota", "kappa", "lambda", "mu"]
            .iter()
            .enumerate()
        {
            for _ in 0..(i + 2) {
                text.push_str(w);
                text.push(' ');
            }
        }
        let words = word_tokens(&text);
        let analysis = analyze_keyword_density(&words, 0.01, 10);
        assert_eq!(analysis.reported.len(), 10);
        let densities: Vec<f64> = analysis.reported.iter().map(|(_, d)| d).collect();
        assert!(densities.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(analysis.reported.iter().next().map(|(w, _)| w), Some("mu"));
        assert!(analysis.reported.get("alpha").is_none());
    }

    #[test]
    fn rare_words_are_not_reported_but_common_ones_are() {
        // 200 distinct filler words plus one word used 3 times
        let mut words: Vec<String> = (0..200).map(|i| format!("w{i}")).collect();
        words.extend(std::iter::repeat_n("focus".to_string(), 3));
        let analysis = analyze_keyword_density(&words, 0.01, 10);
        assert_eq!(analysis.reported.len(), 1);
        assert!(analysis.reported.get("focus").is_some());
        assert!(!analysis.overused(0.03));
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let words = word_tokens("beta alpha beta alpha");
        let analysis = analyze_keyword_density(&words, 0.01, 10);
        let order: Vec<&str> = analysis.reported.iter().map(|(w, _)| w).collect();
        assert_eq!(order, vec!["beta", "alpha"]);
    }

    #[test]
    fn serializes_in_density_order() {
        let words = word_tokens("zebra apple zebra");
        let analysis = analyze_keyword_density(&words, 0.01, 10);
        let json = serde_json::to_string(&analysis.reported).unwrap();
        assert!(json.starts_with("{\"zebra\":"));
        let back: KeywordDensity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, analysis.reported);
    }
}
