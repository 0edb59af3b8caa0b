//! Syllable counts for common words, with a heuristic for everything else.
//!
//! The vowel-group heuristic miscounts words with adjacent sounded vowels
//! ("area", "idea", "radio") and silent endings it cannot tell apart from
//! sounded ones. Those words, plus the most frequent English vocabulary, are
//! listed here with their dictionary counts.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Words grouped by syllable count.
const WORDS_BY_COUNT: &[(usize, &[&str])] = &[
    (
        1,
        &[
            "a", "all", "an", "and", "as", "ask", "at", "back", "be", "but", "by", "call", "can",
            "case", "child", "could", "day", "do", "end", "eye", "fact", "feel", "find", "first",
            "for", "from", "get", "give", "go", "good", "hand", "have", "he", "her", "him", "his",
            "if", "in", "it", "just", "know", "last", "life", "like", "look", "make", "man", "me",
            "more", "my", "need", "no", "not", "of", "on", "one", "or", "out", "part", "place",
            "point", "room", "say", "see", "she", "so", "still", "take", "than", "that", "the",
            "their", "there", "they", "thing", "think", "this", "time", "to", "try", "up", "use",
            "want", "way", "we", "week", "what", "when", "which", "who", "will", "with", "work",
            "world", "would", "year", "you", "fire", "hour", "our", "where", "here", "were",
            "some", "come", "done", "gone", "none", "once", "whole", "write", "these", "those",
        ],
    ),
    (
        2,
        &[
            "able", "about", "after", "against", "also", "always", "battle", "because", "become",
            "before", "being", "between", "circle", "couple", "diet", "doctor", "doing", "double",
            "during", "even", "evening", "every", "father", "follow", "future", "giant", "going",
            "handle", "into", "issue", "lion", "little", "major", "many", "maybe", "moment",
            "mother", "never", "number", "often", "only", "orange", "other", "over", "patient",
            "people", "poem", "poet", "police", "problem", "program", "public", "purple",
            "question", "quiet", "real", "really", "sample", "science", "seeing", "should",
            "simple", "skiing", "system", "table", "trouble", "uncle", "under", "water", "woman",
            "create", "ocean", "social", "special", "chapter", "content", "reader", "writing",
            "topic", "idle",
        ],
    ),
    (
        3,
        &[
            "actually", "already", "another", "area", "banana", "beautiful", "business", "camera",
            "chocolate", "company", "continue", "develop", "diamond", "different", "difficult",
            "everyone", "everything", "example", "family", "general", "however", "idea",
            "important", "interest", "library", "national", "natural", "personal", "physical",
            "policy", "possible", "potato", "probably", "radio", "remember", "separate",
            "several", "suddenly", "together", "tomato", "video", "violet", "yesterday",
            "audience", "creative", "creation", "media", "museum", "period", "serious",
            "therefore", "furthermore", "moreover",
        ],
    ),
    (
        4,
        &[
            "ability", "apparently", "available", "community", "definitely", "economy",
            "education", "environment", "especially", "everybody", "experience", "generation",
            "information", "necessary", "obviously", "particular", "political", "reality",
            "relationship", "society", "technology", "variety", "material", "category",
            "consequently",
        ],
    ),
    (
        5,
        &[
            "administration", "communication", "international", "necessarily", "opportunity",
            "organization", "possibility", "unfortunately", "immediately", "individual",
        ],
    ),
    (6, &["responsibility", "originality"]),
];

/// Lowercase word → syllable count.
pub static SYLLABLE_DICT: LazyLock<HashMap<&'static str, usize>> = LazyLock::new(|| {
    WORDS_BY_COUNT
        .iter()
        .flat_map(|&(count, words)| words.iter().map(move |&w| (w, count)))
        .collect()
});

/// Dictionary count for `word`, if listed.
pub fn lookup_syllables(word: &str) -> Option<usize> {
    SYLLABLE_DICT.get(word.to_lowercase().as_str()).copied()
}

/// Estimate syllables by counting vowel groups.
///
/// A trailing silent `e` is dropped (but not in `-le` endings), a silent
/// `-ed` is dropped (but not after `t` or `d`), and every word has at least
/// one syllable. Words without letters, such as numbers, count as one.
pub fn estimate_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if lower.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut count: usize = 0;
    let mut prev_vowel = false;
    for &c in &lower {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = lower.len();
    if n > 2 && count > 1 {
        let last = lower[n - 1];
        let before = lower[n - 2];
        let silent_e = last == 'e' && !is_vowel(before) && before != 'l';
        let third = lower[n - 3];
        let silent_ed =
            last == 'd' && before == 'e' && !is_vowel(third) && !matches!(third, 't' | 'd');
        if silent_e || silent_ed {
            count -= 1;
        }
    }

    count.max(1)
}

/// Dictionary lookup, falling back to [`estimate_syllables`].
pub fn count_syllables(word: &str) -> usize {
    lookup_syllables(word).unwrap_or_else(|| estimate_syllables(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_sounded_vowels_come_from_the_dictionary() {
        assert_eq!(count_syllables("area"), 3);
        assert_eq!(count_syllables("idea"), 3);
        assert_eq!(count_syllables("Radio"), 3);
        assert_eq!(estimate_syllables("area"), 2);
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(lookup_syllables("Chocolate"), Some(3));
        assert_eq!(lookup_syllables("zyzzyva"), None);
    }

    #[test]
    fn estimation_rules() {
        assert_eq!(estimate_syllables("cat"), 1);
        assert_eq!(estimate_syllables("make"), 1);
        assert_eq!(estimate_syllables("table"), 2);
        assert_eq!(estimate_syllables("beautiful"), 3);
        assert_eq!(estimate_syllables("loved"), 1);
        assert_eq!(estimate_syllables("wanted"), 2);
        assert_eq!(estimate_syllables("faded"), 2);
        assert_eq!(estimate_syllables("2024"), 1);
    }

    #[test]
    fn every_listed_word_is_lowercase_and_unique() {
        let listed: usize = WORDS_BY_COUNT.iter().map(|(_, w)| w.len()).sum();
        assert_eq!(SYLLABLE_DICT.len(), listed);
        assert!(SYLLABLE_DICT.keys().all(|w| *w == w.to_lowercase()));
    }
}
