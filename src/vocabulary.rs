//! Vocabulary pool
//!
//! Challenges draw their prompts and answers from here. The editor that
//! adds/removes words lives outside the simulation; a run only ever sees a
//! read-only snapshot.

use std::collections::HashSet;
use std::path::Path;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One word pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabularyEntry {
    /// Term in the learner's language
    pub source: String,
    /// Term in the language being learned
    pub target: String,
    /// Picture shown instead of text on icon levels
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: String,
}

impl VocabularyEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            icon: None,
            category: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Text of the given side of the pair
    pub fn field(&self, field: AnswerField) -> &str {
        match field {
            AnswerField::Source => &self.source,
            AnswerField::Target => &self.target,
        }
    }

    /// Entries are identified by their (source, target) pair
    pub fn same_pair(&self, other: &VocabularyEntry) -> bool {
        self.source == other.source && self.target == other.target
    }
}

/// Which side of a pair a comparison looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerField {
    Source,
    Target,
}

/// Read-only view of the vocabulary the simulation queries
pub trait VocabularySource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick one entry uniformly at random
    fn sample(&self, rng: &mut dyn RngCore) -> Option<&VocabularyEntry>;

    /// Every entry whose `by` side differs from `entry`'s
    fn all_except(&self, entry: &VocabularyEntry, by: AnswerField) -> Vec<&VocabularyEntry>;
}

/// In-memory vocabulary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VocabularyPool {
    entries: Vec<VocabularyEntry>,
}

impl VocabularyPool {
    /// Build a pool, keeping the first entry of each (source, target) pair
    pub fn new(entries: impl IntoIterator<Item = VocabularyEntry>) -> Self {
        let mut kept: Vec<VocabularyEntry> = Vec::new();
        for entry in entries {
            if !kept.iter().any(|e| e.same_pair(&entry)) {
                kept.push(entry);
            }
        }
        Self { entries: kept }
    }

    /// Built-in English/Spanish starter set
    pub fn starter() -> Self {
        Self::new(STARTER_WORDS.iter().map(|&(source, target, icon, category)| {
            VocabularyEntry::new(source, target)
                .with_icon(icon)
                .with_category(category)
        }))
    }

    /// Load a JSON array of entries
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<VocabularyEntry> =
            serde_json::from_str(&json).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let pool = Self::new(entries);
        log::info!("Loaded {} vocabulary entries from {}", pool.len(), path.display());
        Ok(pool)
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    /// Sorted, de-duplicated category names
    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = self.entries.iter().map(|e| e.category.as_str()).collect();
        cats.sort_unstable();
        cats.dedup();
        cats
    }

    /// Keep only entries in one of `categories` (empty slice keeps everything)
    pub fn filter_categories(&self, categories: &[&str]) -> Self {
        if categories.is_empty() {
            return self.clone();
        }
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| categories.contains(&e.category.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Number of different values on one side of the pairs
    pub fn distinct_answers(&self, field: AnswerField) -> usize {
        self.entries
            .iter()
            .map(|e| e.field(field))
            .collect::<HashSet<_>>()
            .len()
    }
}

impl VocabularySource for VocabularyPool {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Option<&VocabularyEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.entries.len());
        self.entries.get(idx)
    }

    fn all_except(&self, entry: &VocabularyEntry, by: AnswerField) -> Vec<&VocabularyEntry> {
        let excluded = entry.field(by);
        self.entries
            .iter()
            .filter(|e| e.field(by) != excluded)
            .collect()
    }
}

/// (english, spanish, icon, category)
const STARTER_WORDS: &[(&str, &str, &str, &str)] = &[
    ("hello", "hola", "👋", "greetings"),
    ("goodbye", "adiós", "🚶", "greetings"),
    ("please", "por favor", "🙏", "greetings"),
    ("thank you", "gracias", "💐", "greetings"),
    ("yes", "sí", "👍", "basics"),
    ("no", "no", "👎", "basics"),
    ("water", "agua", "💧", "basics"),
    ("food", "comida", "🍲", "basics"),
    ("house", "casa", "🏠", "home"),
    ("friend", "amigo", "🤝", "people"),
    ("family", "familia", "👪", "people"),
    ("love", "amor", "❤️", "people"),
    ("time", "tiempo", "⏰", "time"),
    ("day", "día", "🌞", "time"),
    ("night", "noche", "🌙", "time"),
    ("sun", "sol", "☀️", "nature"),
    ("moon", "luna", "🌕", "nature"),
    ("star", "estrella", "⭐", "nature"),
    ("book", "libro", "📖", "school"),
    ("school", "escuela", "🏫", "school"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_starter_pool() {
        let pool = VocabularyPool::starter();
        assert_eq!(pool.len(), 20);
        assert_eq!(pool.distinct_answers(AnswerField::Target), 20);
        assert!(pool.entries().iter().all(|e| e.icon.is_some()));
    }

    #[test]
    fn test_duplicate_pairs_dropped() {
        let pool = VocabularyPool::new([
            VocabularyEntry::new("cat", "gato"),
            VocabularyEntry::new("cat", "gato").with_category("animals"),
            VocabularyEntry::new("cat", "felino"),
        ]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.distinct_answers(AnswerField::Source), 1);
        // First copy wins
        assert_eq!(pool.entries()[0].category, "");
        assert!(pool.entries()[0].same_pair(&VocabularyEntry::new("cat", "gato").with_icon("🐱")));
        assert!(!pool.entries()[0].same_pair(&pool.entries()[1]));
    }

    #[test]
    fn test_all_except_by_field() {
        let pool = VocabularyPool::new([
            VocabularyEntry::new("cat", "gato"),
            VocabularyEntry::new("cat", "felino"),
            VocabularyEntry::new("dog", "perro"),
        ]);
        let cat = &pool.entries()[0];

        let by_source = pool.all_except(cat, AnswerField::Source);
        assert_eq!(by_source.len(), 1);
        assert_eq!(by_source[0].source, "dog");

        let by_target = pool.all_except(cat, AnswerField::Target);
        assert_eq!(by_target.len(), 2);
        assert!(by_target.iter().all(|e| e.target != "gato"));
    }

    #[test]
    fn test_sample_empty_pool() {
        let pool = VocabularyPool::default();
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(pool.sample(&mut rng).is_none());
    }

    #[test]
    fn test_sample_covers_pool() {
        let pool = VocabularyPool::starter();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let entry = pool.sample(&mut rng).unwrap();
            seen.insert(entry.source.clone());
        }
        assert_eq!(seen.len(), pool.len());
    }

    #[test]
    fn test_filter_categories() {
        let pool = VocabularyPool::starter();
        let nature = pool.filter_categories(&["nature"]);
        assert_eq!(nature.len(), 3);
        assert!(nature.entries().iter().all(|e| e.category == "nature"));
        assert_eq!(pool.filter_categories(&[]).len(), pool.len());
        assert!(pool.categories().contains(&"school"));
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(
            &path,
            r#"[{"source":"cat","target":"gato","icon":"🐱"},{"source":"dog","target":"perro"}]"#,
        )
        .unwrap();
        let pool = VocabularyPool::load(&path).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entries()[0].icon.as_deref(), Some("🐱"));
        assert_eq!(pool.entries()[1].category, "");
    }
}
