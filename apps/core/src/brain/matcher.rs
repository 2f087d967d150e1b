//! Rule-based pattern matching.
//!
//! [`PatternMatcher`] is the capability the resolution pipeline consumes.
//! [`CategoryMatcher`] is the bundled implementation: AIML-style categories
//! (pattern → template) loaded from JSON files, with bot predicates
//! interpolated into the templates.
//!
//! ## Pattern syntax
//! Patterns are upper-case word sequences matched against normalized input.
//! - `#` zero or more words (highest priority)
//! - `_` one or more words
//! - `WORD` exact word
//! - `^` zero or more words
//! - `*` one or more words (lowest priority)
//!
//! ## Template syntax
//! - `<bot name="fact"/>` the predicate value, empty when unset
//! - `<star/>`, `<star index="2"/>` the text captured by a wildcard (1-based)

use crate::error::AppError;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// File name of the compiled brain snapshot inside a patterns directory.
pub const BRAIN_FILE: &str = "brain.json";

/// Maps a canonical query to a canned reply.
pub trait PatternMatcher: Send + Sync {
    /// Stores a named fact that templates can interpolate.
    fn set_predicate(&mut self, name: &str, value: &str);

    /// Returns the reply for a normalized input, or `None` when nothing matches.
    fn respond(&self, input: &str) -> Option<String>;
}

/// A single pattern → template rule as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub pattern: String,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternToken {
    Hash,
    Underscore,
    Word(String),
    Caret,
    Star,
}

impl PatternToken {
    fn parse(raw: &str) -> Self {
        match raw {
            "#" => PatternToken::Hash,
            "_" => PatternToken::Underscore,
            "^" => PatternToken::Caret,
            "*" => PatternToken::Star,
            word => PatternToken::Word(word.to_uppercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            PatternToken::Hash => 0,
            PatternToken::Underscore => 1,
            PatternToken::Word(_) => 2,
            PatternToken::Caret => 3,
            PatternToken::Star => 4,
        }
    }

    /// Minimum number of input words this token consumes, `None` for exact words.
    fn wildcard_min(&self) -> Option<usize> {
        match self {
            PatternToken::Hash | PatternToken::Caret => Some(0),
            PatternToken::Underscore | PatternToken::Star => Some(1),
            PatternToken::Word(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledCategory {
    source: Category,
    tokens: Vec<PatternToken>,
}

impl CompiledCategory {
    fn compile(source: Category) -> Result<Self, AppError> {
        let tokens: Vec<PatternToken> = source.pattern.split_whitespace().map(PatternToken::parse).collect();
        if tokens.is_empty() {
            return Err(AppError::Validation(format!(
                "Empty pattern for template '{}'",
                source.template
            )));
        }
        Ok(Self { source, tokens })
    }

    /// Earlier positions decide; at a position the higher-priority token wins.
    fn priority_cmp(&self, other: &Self) -> Ordering {
        let ours = self.tokens.iter().map(PatternToken::rank);
        let theirs = other.tokens.iter().map(PatternToken::rank);
        ours.cmp(theirs)
    }

    fn matches(&self, input: &[&str]) -> Option<Vec<String>> {
        let mut matcher = TokenMatch {
            pattern: &self.tokens,
            input,
            stars: Vec::new(),
            dead_ends: HashSet::new(),
        };
        if !matcher.run(0, 0) {
            return None;
        }
        Some(
            matcher
                .stars
                .into_iter()
                .map(|(start, end)| input[start..end].join(" "))
                .collect(),
        )
    }
}

/// Backtracking matcher over one pattern.
///
/// A (pattern position, input position) pair that failed once fails every
/// time, so dead ends are remembered and the search stays polynomial in the
/// number of wildcards.
struct TokenMatch<'a> {
    pattern: &'a [PatternToken],
    input: &'a [&'a str],
    /// Word ranges captured by the wildcards so far.
    stars: Vec<(usize, usize)>,
    dead_ends: HashSet<(usize, usize)>,
}

impl TokenMatch<'_> {
    fn run(&mut self, pi: usize, ii: usize) -> bool {
        let (pattern, input) = (self.pattern, self.input);
        let Some(head) = pattern.get(pi) else {
            return ii == input.len();
        };
        if self.dead_ends.contains(&(pi, ii)) {
            return false;
        }

        let matched = match head.wildcard_min() {
            None => match (head, input.get(ii)) {
                (PatternToken::Word(word), Some(first)) if word == first => self.run(pi + 1, ii + 1),
                _ => false,
            },
            Some(min) => {
                let mut found = false;
                // Shortest capture first.
                for end in (ii + min)..=input.len() {
                    self.stars.push((ii, end));
                    if self.run(pi + 1, end) {
                        found = true;
                        break;
                    }
                    self.stars.pop();
                }
                found
            }
        };

        if !matched {
            self.dead_ends.insert((pi, ii));
        }
        matched
    }
}

static BOT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<bot\s+name\s*=\s*"([^"]*)"\s*/>"#).expect("Invalid regex: bot tag")
});

static STAR_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<star(?:\s+index\s*=\s*"(\d+)")?\s*/>"#).expect("Invalid regex: star tag")
});

/// AIML-style category engine.
#[derive(Debug, Default)]
pub struct CategoryMatcher {
    /// Kept sorted by priority; ties keep learn order.
    categories: Vec<CompiledCategory>,
    predicates: HashMap<String, String>,
}

impl CategoryMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a matcher from in-memory categories.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Result<Self, AppError> {
        let mut matcher = Self::new();
        matcher.add_categories(categories)?;
        Ok(matcher)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn predicate(&self, name: &str) -> Option<&str> {
        self.predicates.get(name).map(String::as_str)
    }

    /// Adds categories; a category whose pattern already exists replaces the old template.
    pub fn add_categories(&mut self, categories: impl IntoIterator<Item = Category>) -> Result<usize, AppError> {
        let mut added = 0;
        for category in categories {
            let compiled = CompiledCategory::compile(category)?;
            match self.categories.iter_mut().find(|c| c.tokens == compiled.tokens) {
                Some(existing) => existing.source.template = compiled.source.template,
                None => self.categories.push(compiled),
            }
            added += 1;
        }
        self.categories.sort_by(|a, b| a.priority_cmp(b));
        Ok(added)
    }

    /// Learns one JSON category file.
    pub fn learn(&mut self, path: &Path) -> Result<usize, AppError> {
        let raw = fs::read_to_string(path)?;
        let categories: Vec<Category> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Validation(format!("Invalid category file {}: {}", path.display(), e)))?;
        let count = self.add_categories(categories)?;
        info!("Learned {} categories from {}", count, path.display());
        Ok(count)
    }

    /// Learns every `.json` category file in `dir`, in file-name order.
    ///
    /// The brain snapshot is skipped.
    pub fn learn_dir(&mut self, dir: &Path) -> Result<usize, AppError> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path.extension().is_some_and(|ext| ext == "json")
                    && path.file_name().is_some_and(|name| name != BRAIN_FILE)
            })
            .collect();
        files.sort();

        let mut total = 0;
        for file in files {
            total += self.learn(&file)?;
        }
        Ok(total)
    }

    /// Loads `dir/brain.json` when present, otherwise learns `dir` and writes the snapshot.
    ///
    /// A snapshot that cannot be written only costs start-up time next run.
    pub fn load_or_learn(dir: &Path) -> Result<Self, AppError> {
        let brain_path = dir.join(BRAIN_FILE);
        let mut matcher = Self::new();

        if brain_path.is_file() {
            info!("Loading brain snapshot from {}", brain_path.display());
            matcher.learn(&brain_path)?;
            return Ok(matcher);
        }

        info!("No brain snapshot found, learning category files in {}", dir.display());
        matcher.learn_dir(dir)?;

        match matcher.save_brain(&brain_path) {
            Ok(()) => info!("Brain snapshot saved to {}", brain_path.display()),
            Err(e) => warn!("Could not save brain snapshot to {}: {}", brain_path.display(), e),
        }
        Ok(matcher)
    }

    /// Writes every learned category to `path` as one JSON category file.
    pub fn save_brain(&self, path: &Path) -> Result<(), AppError> {
        let categories: Vec<&Category> = self.categories.iter().map(|c| &c.source).collect();
        fs::write(path, serde_json::to_string_pretty(&categories)?)?;
        Ok(())
    }

    fn render(&self, template: &str, stars: &[String]) -> String {
        let with_bots = BOT_TAG.replace_all(template, |caps: &Captures| {
            self.predicates.get(&caps[1]).cloned().unwrap_or_default()
        });
        STAR_TAG
            .replace_all(&with_bots, |caps: &Captures| {
                let index = caps
                    .get(1)
                    .and_then(|m| m.as_str().parse::<usize>().ok())
                    .unwrap_or(1);
                index
                    .checked_sub(1)
                    .and_then(|i| stars.get(i))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }
}

impl PatternMatcher for CategoryMatcher {
    fn set_predicate(&mut self, name: &str, value: &str) {
        self.predicates.insert(name.to_string(), value.to_string());
    }

    fn respond(&self, input: &str) -> Option<String> {
        let words: Vec<&str> = input.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }

        let (category, stars) = self
            .categories
            .iter()
            .find_map(|c| c.matches(&words).map(|stars| (c, stars)))?;
        debug!("Input '{}' matched pattern '{}'", input, category.source.pattern);

        let reply = self.render(&category.source.template, &stars);
        let reply = reply.trim();
        if reply.is_empty() {
            None
        } else {
            Some(reply.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(pattern: &str, template: &str) -> Category {
        Category {
            pattern: pattern.to_string(),
            template: template.to_string(),
        }
    }

    #[test]
    fn test_exact_match() {
        let matcher = CategoryMatcher::from_categories([category("HELLO", "Hi there!")]).unwrap();
        assert_eq!(matcher.respond("HELLO").as_deref(), Some("Hi there!"));
        assert_eq!(matcher.respond("HELLO AGAIN"), None);
        assert_eq!(matcher.respond(""), None);
    }

    #[test]
    fn test_star_needs_a_word_caret_does_not() {
        let matcher = CategoryMatcher::from_categories([
            category("MOTTO *", "star"),
            category("^ FEE", "caret"),
        ])
        .unwrap();
        assert_eq!(matcher.respond("MOTTO"), None);
        assert_eq!(matcher.respond("MOTTO JKUAT").as_deref(), Some("star"));
        assert_eq!(matcher.respond("FEE").as_deref(), Some("caret"));
        assert_eq!(matcher.respond("TUITION FEE").as_deref(), Some("caret"));
    }

    #[test]
    fn test_priority() {
        let matcher = CategoryMatcher::from_categories([
            category("* FEE", "star"),
            category("TUITION FEE", "word"),
            category("_ FEE", "underscore"),
        ])
        .unwrap();
        assert_eq!(matcher.respond("TUITION FEE").as_deref(), Some("underscore"));

        let matcher = CategoryMatcher::from_categories([
            category("* FEE", "star"),
            category("TUITION FEE", "word"),
        ])
        .unwrap();
        assert_eq!(matcher.respond("TUITION FEE").as_deref(), Some("word"));
        assert_eq!(matcher.respond("HOSTEL FEE").as_deref(), Some("star"));
    }

    #[test]
    fn test_templates_interpolate_predicates_and_stars() {
        let mut matcher = CategoryMatcher::from_categories([
            category("MOTTO", r#"The motto of <bot name="institution_name"/> is "<bot name="institution_motto"/>"."#),
            category("TELL * ABOUT *", r#"<star index="2"/> / <star/> / <star index="9"/>"#),
            category("MISSING", r#"<bot name="nothing"/>"#),
        ])
        .unwrap();
        matcher.set_predicate("institution_name", "JKUAT");
        matcher.set_predicate("institution_motto", "Setting Trends");

        assert_eq!(
            matcher.respond("MOTTO").as_deref(),
            Some(r#"The motto of JKUAT is "Setting Trends"."#)
        );
        assert_eq!(
            matcher.respond("TELL ME MORE ABOUT LIBRARY").as_deref(),
            Some("LIBRARY / ME MORE /")
        );
        // Renders to nothing, so it counts as no match.
        assert_eq!(matcher.respond("MISSING"), None);
    }

    #[test]
    fn test_duplicate_pattern_replaces_template() {
        let mut matcher = CategoryMatcher::from_categories([category("HI", "old")]).unwrap();
        matcher.add_categories([category("hi", "new")]).unwrap();
        assert_eq!(matcher.len(), 1);
        assert_eq!(matcher.respond("HI").as_deref(), Some("new"));
    }

    #[test]
    fn test_many_wildcards_on_long_input() {
        let matcher = CategoryMatcher::from_categories([
            category("^ ^ ^ ^ ^ ^ HOSTEL", "hostel"),
            category("* * * * * FEE *", "<star index=\"6\"/>"),
        ])
        .unwrap();

        let long: Vec<String> = (0..300).map(|i| format!("W{}", i)).collect();
        let no_match = long.join(" ");
        assert_eq!(matcher.respond(&no_match), None);

        let hostel = format!("{} HOSTEL", no_match);
        assert_eq!(matcher.respond(&hostel).as_deref(), Some("hostel"));

        let fee = format!("A B C D {} FEE LAST WORDS", no_match);
        assert_eq!(matcher.respond(&fee).as_deref(), Some("LAST WORDS"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let result = CategoryMatcher::from_categories([category("   ", "nothing")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
