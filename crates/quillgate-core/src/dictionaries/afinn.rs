//! AFINN-165 sentiment lexicon.
//!
//! Words are rated from -5 (very negative) to +5 (very positive); unknown
//! words score 0. The table is kept as `word<TAB>valence` lines in
//! alphabetical order, next to this file.

use std::collections::HashMap;
use std::sync::LazyLock;

const AFINN_165: &str = include_str!("afinn-165.txt");

/// Single-word lexicon entries, in file order.
///
/// Multi-word phrases are left out: the tokenizer never yields them.
pub fn entries() -> impl Iterator<Item = (&'static str, i32)> {
    AFINN_165.lines().filter_map(parse_line)
}

fn parse_line(line: &'static str) -> Option<(&'static str, i32)> {
    let (word, valence) = line.split_once('\t')?;
    if word.is_empty() || word.contains(' ') {
        return None;
    }
    Some((word, valence.trim().parse().ok()?))
}

/// Word → valence, -5..=5.
pub static AFINN: LazyLock<HashMap<&'static str, i32>> = LazyLock::new(|| entries().collect());

/// Words that flip the sign of the valence that follows them.
pub const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "without",
    "isn", "aren", "wasn", "weren", "don", "doesn", "didn", "couldn", "shouldn", "wouldn",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_line_parses() {
        for line in AFINN_165.lines() {
            let (word, valence) = line.split_once('\t').unwrap();
            let valence: i32 = valence.parse().unwrap();
            assert!(!word.is_empty(), "{line:?}");
            assert!((-5..=5).contains(&valence), "{line:?}");
        }
    }

    #[test]
    fn file_is_sorted_without_duplicates() {
        let words: Vec<&str> = AFINN_165
            .lines()
            .filter_map(|l| l.split_once('\t'))
            .map(|(w, _)| w)
            .collect();
        assert!(words.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn phrases_are_skipped() {
        assert!(AFINN.len() > 3000);
        assert!(AFINN.keys().all(|w| !w.contains(' ')));
        assert_eq!(AFINN.get("no"), Some(&-1));
        assert_eq!(AFINN.get("no fun"), None);
    }

    #[test]
    fn known_words() {
        assert_eq!(AFINN.get("amazing"), Some(&4));
        assert_eq!(AFINN.get("terrible"), Some(&-3));
        assert_eq!(AFINN.get("thank"), Some(&2));
        assert_eq!(AFINN.get("outstanding"), Some(&5));
        assert_eq!(AFINN.get("bastard"), Some(&-5));
        assert_eq!(AFINN.get("blog"), None);
    }
}
