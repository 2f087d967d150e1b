//! Text normalization for pattern matching.
//!
//! Turns raw user text into the canonical, upper-case token string the
//! pattern matcher works on: tokenize, reduce each token to its base form,
//! drop stopwords and anything that is not purely alphanumeric.

use std::collections::HashSet;

/// English stopwords (NLTK list).
const STOPWORDS_EN: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Irregular plurals, upper-case.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("CHILDREN", "CHILD"),
    ("MEN", "MAN"),
    ("WOMEN", "WOMAN"),
    ("FEET", "FOOT"),
    ("TEETH", "TOOTH"),
    ("MICE", "MOUSE"),
    ("GEESE", "GOOSE"),
    ("CRITERIA", "CRITERION"),
    ("PHENOMENA", "PHENOMENON"),
    ("ALUMNI", "ALUMNUS"),
    ("CURRICULA", "CURRICULUM"),
    ("SYLLABI", "SYLLABUS"),
    ("THESES", "THESIS"),
    ("ANALYSES", "ANALYSIS"),
];

/// Words ending in `s` that are already in base form.
const INVARIANT_WORDS: &[&str] = &[
    "NEWS", "SERIES", "SPECIES", "MATHEMATICS", "PHYSICS", "ECONOMICS", "ELECTRONICS",
    "STATISTICS", "ATHLETICS", "POLITICS", "ETHICS", "LINGUISTICS", "GENETICS", "LOGISTICS",
    "ROBOTICS", "MECHANICS", "DYNAMICS", "ACOUSTICS", "OPTICS", "AERONAUTICS", "TIMES",
    "CAMPUS", "STATUS", "BONUS", "VIRUS", "FOCUS", "CENSUS", "PREMISES", "MEANS", "ALIAS",
];

/// Canonicalizes user text for the pattern matcher.
pub struct TextNormalizer {
    stopwords: HashSet<String>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        let stopwords = STOPWORDS_EN.iter().map(|s| s.to_uppercase()).collect();
        Self { stopwords }
    }

    /// Upper-case, tokenize, lemmatize, filter, and re-join with single spaces.
    ///
    /// Empty or noise-only input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let upper = text.to_uppercase();
        tokenize(&upper)
            .into_iter()
            .filter(|word| !self.is_stopword(word))
            .map(lemmatize)
            .filter(|word| !self.is_stopword(word) && is_alphanumeric(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Case-insensitive stopword check.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_uppercase())
    }
}

fn is_alphanumeric(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphanumeric)
}

/// Splits on whitespace, then separates runs of alphanumerics from
/// punctuation, keeping word-internal apostrophes ("DON'T") together.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for chunk in text.split_whitespace() {
        let chars: Vec<char> = chunk.chars().collect();
        let mut current = String::new();
        let mut current_is_word = false;

        for (i, &c) in chars.iter().enumerate() {
            let inner_apostrophe = (c == '\'' || c == '\u{2019}')
                && current_is_word
                && chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
            let is_word = c.is_alphanumeric() || inner_apostrophe;

            if !current.is_empty() && is_word != current_is_word {
                tokens.push(std::mem::take(&mut current));
            }
            current_is_word = is_word;
            current.push(if c == '\u{2019}' { '\'' } else { c });
        }
        if !current.is_empty() {
            tokens.push(current);
        }
    }

    tokens
}

/// Reduces an upper-case noun to its singular base form.
///
/// Rule-based: irregular table first, then the usual suffix rules. Every rule
/// produces a word the rules leave alone, so applying it twice is a no-op.
fn lemmatize(word: String) -> String {
    if let Some(base) = irregular_base(&word) {
        return base;
    }
    if word.chars().count() <= 3 || !word.is_ascii() || INVARIANT_WORDS.contains(&word.as_str()) {
        return word;
    }

    if let Some(stem) = word.strip_suffix("IES") {
        if stem.len() >= 2 {
            return format!("{}Y", stem);
        }
        return word;
    }
    for suffix in ["SSES", "CHES", "SHES", "XES", "ZES"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('S')
        && !word.ends_with("SS")
        && !word.ends_with("US")
        && !word.ends_with("IS")
        && !word.ends_with("'S")
    {
        let singular = word[..word.len() - 1].to_string();
        // "MENS" -> "MEN" must land on "MAN", not stop halfway.
        return irregular_base(&singular).unwrap_or(singular);
    }

    word
}

fn irregular_base(word: &str) -> Option<String> {
    IRREGULAR_PLURALS
        .iter()
        .find(|(plural, _)| *plural == word)
        .map(|(_, base)| (*base).to_string())
}
