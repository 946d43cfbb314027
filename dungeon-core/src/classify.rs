//! Keyword classification over free text.
//!
//! Voice detection, contextual NPC generation and fallback narration all pick
//! a category by scanning player or DM text for keywords. Each of them owns
//! an ordered table of `(category, keywords)` rows and runs it through the
//! functions here.
//!
//! Matching works on words, not raw substrings: "ask" matches "asks" and
//! "asking" but never "mask". A keyword of several words matches the same
//! words in sequence.

/// Ordered `(category, keywords)` rows. Keywords must be lowercase.
pub type KeywordTable<T> = [(T, &'static [&'static str])];

/// Endings a text word may add to a keyword word and still match.
const INFLECTIONS: &[&str] = &["s", "es", "d", "ed", "ing"];

/// The first category whose keywords appear in `text`, in table order.
pub fn classify<T: Copy>(table: &KeywordTable<T>, text: &str) -> Option<T> {
    let words = tokenize(text);
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&words, k)))
        .map(|(category, _)| *category)
}

/// Every category whose keywords appear in `text`, in table order.
pub fn classify_all<T: Copy>(table: &KeywordTable<T>, text: &str) -> Vec<T> {
    let words = tokenize(text);
    table
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&words, k)))
        .map(|(category, _)| *category)
        .collect()
}

/// Lowercased words. Apostrophes and hyphens inside a word are kept, so
/// "warrior's" and "tip-off" stay whole.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|word| word.trim_matches(|c: char| c == '\'' || c == '-'))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_phrase(words: &[String], keyword: &str) -> bool {
    let phrase: Vec<&str> = keyword.split_whitespace().collect();
    if phrase.is_empty() || phrase.len() > words.len() {
        return false;
    }
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(&phrase).all(|(word, key)| word_matches(word, key)))
}

fn word_matches(word: &str, key: &str) -> bool {
    match word.strip_prefix(key) {
        Some("") => true,
        Some(rest) => INFLECTIONS.contains(&rest),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Mood {
        Angry,
        Happy,
    }

    const MOODS: &KeywordTable<Mood> = &[
        (Mood::Angry, &["furious", "rage"]),
        (Mood::Happy, &["glad", "smile", "rage", "good day"]),
    ];

    #[test]
    fn test_first_match_wins() {
        assert_eq!(classify(MOODS, "In a RAGE"), Some(Mood::Angry));
        assert_eq!(classify(MOODS, "a broad smile"), Some(Mood::Happy));
        assert_eq!(classify(MOODS, "nothing here"), None);
    }

    #[test]
    fn test_all_matches_in_order() {
        assert_eq!(classify_all(MOODS, "glad rage"), vec![Mood::Angry, Mood::Happy]);
        assert!(classify_all(MOODS, "").is_empty());
    }

    #[test]
    fn test_keywords_match_whole_words() {
        assert_eq!(classify(MOODS, "she smiles"), Some(Mood::Happy));
        assert_eq!(classify(MOODS, "smiling, raged"), Some(Mood::Angry));
        assert_eq!(classify(MOODS, "an outrageous gladiator"), None);
        assert_eq!(classify(MOODS, "smiley"), None);
    }

    #[test]
    fn test_phrases_match_in_sequence() {
        assert_eq!(classify(MOODS, "\"Good day!\" he calls"), Some(Mood::Happy));
        assert_eq!(classify(MOODS, "a good, long day"), None);
        assert_eq!(classify(MOODS, "day good"), None);
    }

    #[test]
    fn test_tokenize_keeps_inner_punctuation() {
        assert_eq!(tokenize("A warrior's tip-off, 'quoted'!"), vec!["a", "warrior's", "tip-off", "quoted"]);
    }
}
