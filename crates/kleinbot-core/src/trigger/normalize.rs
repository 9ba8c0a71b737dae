//! Inbound text normalization.
//!
//! Rules see three views of the same message: the trimmed original (for
//! extracting payloads with their casing intact), a lowercase word list
//! (punctuation dropped, apostrophes kept) and a whitespace-stripped
//! lowercase form that folds "klein bot" into "kleinbot".

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    raw: String,
    words: Vec<String>,
    stripped: String,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let raw = text.trim().to_string();
        let lower = raw.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");

        let words = lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .map(|w| w.trim_matches('\''))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();

        let stripped = lower.chars().filter(|c| !c.is_whitespace()).collect();

        Self {
            raw,
            words,
            stripped,
        }
    }

    /// The trimmed original text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Lowercase text with all whitespace removed.
    pub fn stripped(&self) -> &str {
        &self.stripped
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word index where `phrase` (space-separated) first occurs as a whole-word
    /// sequence.
    pub fn find_phrase(&self, phrase: &str) -> Option<usize> {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        if needle.is_empty() || needle.len() > self.words.len() {
            return None;
        }
        self.words
            .windows(needle.len())
            .position(|window| window.iter().zip(&needle).all(|(w, n)| w == n))
    }

    pub fn contains_phrase(&self, phrase: &str) -> bool {
        self.find_phrase(phrase).is_some()
    }

    pub fn contains_any_phrase(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.contains_phrase(p))
    }

    /// Whether the stripped form contains any of `needles` (already stripped).
    pub fn stripped_contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.stripped.contains(n))
    }

    /// Whether `keyword` equals up to `max_words` adjacent words joined
    /// without spaces, so "gpt help" matches "gpthelp" but "gpt helpful"
    /// does not.
    pub fn contains_joined(&self, keyword: &str, max_words: usize) -> bool {
        (1..=max_words.min(self.words.len())).any(|n| {
            self.words
                .windows(n)
                .any(|window| window.concat() == keyword)
        })
    }

    /// Whether the message is exactly `phrase`, ignoring case and punctuation.
    pub fn is_exactly(&self, phrase: &str) -> bool {
        let needle: Vec<&str> = phrase.split_whitespace().collect();
        self.words.len() == needle.len() && self.find_phrase(phrase) == Some(0)
    }
}
