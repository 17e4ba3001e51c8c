//! Word-frequency client: counts case-insensitive words of a text source
//! in a `ChainedHashMap<String, usize>` and ranks them.

use crate::chained_hash_map::ChainedHashMap;
use crate::error::FrequencyError;
use crate::hash::HashStrategy;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A word is a run of word characters that may contain, but not start or
/// end with, apostrophes.
pub const WORD_PATTERN: &str = r"\w[\w']*\w|\w";

static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(WORD_PATTERN).expect("word pattern must compile"));

/// Bucket count of the default table.
pub const DEFAULT_CAPACITY: usize = 2500;

/// Lower-cased words of `text`, in order of appearance.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_REGEX.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// How a `WordCounter` builds and maintains its table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FrequencyConfig {
    /// Initial number of buckets.
    pub capacity: usize,
    /// Hash function addressing the buckets.
    pub hash: HashStrategy,
    /// Double the bucket count whenever the load factor exceeds this.
    /// `None` keeps the table at `capacity`.
    pub max_load_factor: Option<f64>,
}

impl Default for FrequencyConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            hash: HashStrategy::PositionWeighted,
            max_load_factor: None,
        }
    }
}

impl FrequencyConfig {
    fn validate(&self) -> Result<(), FrequencyError> {
        match self.max_load_factor {
            Some(limit) if !(limit.is_finite() && limit > 0.0) => Err(
                FrequencyError::configuration(format!(
                    "max_load_factor must be positive and finite, got {limit}"
                )),
            ),
            _ => Ok(()),
        }
    }
}

/// Accumulates word counts.
#[derive(Debug)]
pub struct WordCounter {
    counts: ChainedHashMap<String, usize>,
    max_load_factor: Option<f64>,
    total: usize,
}

impl WordCounter {
    pub fn new(config: FrequencyConfig) -> Result<Self, FrequencyError> {
        config.validate()?;
        let counts = ChainedHashMap::new(config.capacity, config.hash)?;
        Ok(Self {
            counts,
            max_load_factor: config.max_load_factor,
            total: 0,
        })
    }

    /// Counts one word; case is ignored.
    pub fn add_word(&mut self, word: &str) {
        self.count_token(word.to_lowercase());
    }

    /// Counts every word of `text`.
    pub fn add_text(&mut self, text: &str) {
        for token in tokenize(text) {
            self.count_token(token);
        }
    }

    /// Counts every word read from `reader`, line by line.
    pub fn read_from<R: BufRead>(&mut self, reader: R) -> Result<(), FrequencyError> {
        for line in reader.lines() {
            self.add_text(&line?);
        }
        debug!(
            "counted {} words ({} distinct) in {} buckets",
            self.total,
            self.counts.len(),
            self.counts.capacity()
        );
        Ok(())
    }

    fn count_token(&mut self, token: String) {
        let next = self.counts.get(token.as_str()).map_or(1, |c| c + 1);
        if self.counts.put(token, next).is_none() {
            self.grow_if_needed();
        }
        self.total += 1;
    }

    /// Doubles the bucket count until the load factor is back under the
    /// limit, then rehashes once.
    fn grow_if_needed(&mut self) {
        let Some(limit) = self.max_load_factor else {
            return;
        };
        let len = self.counts.len() as f64;
        let mut new_capacity = self.counts.capacity();
        while len / new_capacity as f64 > limit && new_capacity < usize::MAX {
            new_capacity = new_capacity.saturating_mul(2);
        }
        if new_capacity == self.counts.capacity() {
            return;
        }
        let resized = self.counts.resize_table(new_capacity);
        // capacity starts at 1 or more and only doubles
        debug_assert!(resized.is_ok());
        debug!(
            "load factor exceeded {}, grew table to {} buckets",
            limit, new_capacity
        );
    }

    /// Occurrences of `word` (case-insensitive); zero when never seen.
    pub fn count(&self, word: &str) -> usize {
        self.counts
            .get(word.to_lowercase().as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct words seen.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Number of words seen, repeats included.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn map(&self) -> &ChainedHashMap<String, usize> {
        &self.counts
    }

    /// The `n` most frequent words, most frequent first. Equal counts are
    /// ordered alphabetically.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(word, &count)| (word.clone(), count))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// The `n` most frequent words of `source` using the default
/// configuration.
pub fn top_words<R: BufRead>(source: R, n: usize) -> Result<Vec<(String, usize)>, FrequencyError> {
    let mut counter = WordCounter::new(FrequencyConfig::default())?;
    counter.read_from(source)?;
    Ok(counter.top(n))
}

/// [`top_words`] over the file at `path`.
pub fn top_words_in_file<P: AsRef<Path>>(
    path: P,
    n: usize,
) -> Result<Vec<(String, usize)>, FrequencyError> {
    let file = File::open(path)?;
    top_words(BufReader::new(file), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text).collect()
    }

    #[test]
    fn tokenize_lowercases_and_keeps_inner_apostrophes() {
        assert_eq!(words("Don't STOP"), ["don't", "stop"]);
        assert_eq!(words("'quoted' dogs'"), ["quoted", "dogs"]);
        assert_eq!(words("a-b, c.d"), ["a", "b", "c", "d"]);
        assert_eq!(words("It's 2020!"), ["it's", "2020"]);
        assert_eq!(words("snake_case"), ["snake_case"]);
        assert_eq!(words("Ünïcödé"), ["ünïcödé"]);
        assert!(words("  -- ' ").is_empty());
    }

    #[test]
    fn counts_accumulate_case_insensitively() {
        let mut c = WordCounter::new(FrequencyConfig::default()).unwrap();
        c.add_text("The cat, the CAT; the end.");
        assert_eq!(c.count("the"), 3);
        assert_eq!(c.count("Cat"), 2);
        assert_eq!(c.count("end"), 1);
        assert_eq!(c.count("dog"), 0);
        assert_eq!(c.distinct(), 3);
        assert_eq!(c.total(), 6);
    }

    #[test]
    fn add_word_normalizes_case() {
        let mut c = WordCounter::new(FrequencyConfig::default()).unwrap();
        c.add_word("Rust");
        c.add_word("rust");
        assert_eq!(c.count("RUST"), 2);
        assert_eq!(c.map().get("rust"), Some(&2));
    }

    #[test]
    fn top_ranks_by_count_then_word() {
        let mut c = WordCounter::new(FrequencyConfig::default()).unwrap();
        c.add_text("b a c b a d b");
        assert_eq!(
            c.top(10),
            vec![
                ("b".to_string(), 3),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
        assert_eq!(c.top(1), vec![("b".to_string(), 3)]);
        assert!(c.top(0).is_empty());
    }

    #[test]
    fn growth_policy_doubles_capacity() {
        let config = FrequencyConfig {
            capacity: 1,
            hash: HashStrategy::CharSum,
            max_load_factor: Some(1.0),
        };
        let mut c = WordCounter::new(config).unwrap();
        c.add_text("a b c d e a");
        assert!(c.map().table_load() <= 1.0);
        assert_eq!(c.map().capacity(), 8);
        assert_eq!(c.count("a"), 2);
        assert_eq!(c.distinct(), 5);
    }

    /// A limit far below 1 / capacity needs several doublings on one
    /// insert.
    #[test]
    fn growth_policy_reaches_small_limit_in_one_insert() {
        let config = FrequencyConfig {
            capacity: 1,
            hash: HashStrategy::CharSum,
            max_load_factor: Some(0.25),
        };
        let mut c = WordCounter::new(config).unwrap();
        c.add_word("a");
        assert_eq!(c.map().capacity(), 4);
        assert!(c.map().table_load() <= 0.25);
        c.add_text("b c d e");
        assert!(c.map().table_load() <= 0.25);
        assert_eq!(c.map().capacity(), 32);
        assert_eq!(c.count("a"), 1);
    }

    #[test]
    fn fixed_table_never_grows() {
        let config = FrequencyConfig {
            capacity: 2,
            ..FrequencyConfig::default()
        };
        let mut c = WordCounter::new(config).unwrap();
        c.add_text("one two three four five six");
        assert_eq!(c.map().capacity(), 2);
        assert_eq!(c.map().table_load(), 3.0);
    }

    #[test]
    fn invalid_configs_rejected() {
        let zero = FrequencyConfig {
            capacity: 0,
            ..FrequencyConfig::default()
        };
        assert!(matches!(
            WordCounter::new(zero),
            Err(FrequencyError::Map(crate::MapError::ZeroCapacity))
        ));

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = FrequencyConfig {
                max_load_factor: Some(bad),
                ..FrequencyConfig::default()
            };
            assert!(matches!(
                WordCounter::new(config),
                Err(FrequencyError::Configuration { .. })
            ));
        }
    }
}
