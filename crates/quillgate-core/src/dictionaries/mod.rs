//! Dictionaries for text analysis.
//!
//! Provides the sentiment lexicon and the syllable dictionary behind the
//! readability formula.

pub mod afinn;
pub mod syllable_dict;
