//! Sign dictionary and stop-word loading with a normalized lookup index.
//!
//! The dictionary source is a JSON object mapping each canonical word to its
//! synonyms and video reference. [`SignLexicon::load`] parses it strictly
//! (fixed record shape, unknown fields rejected) but fails soft: any load
//! error yields an empty lexicon and a [`LoadStatus::Failed`] side channel,
//! so "dictionary broken" and "no matches" look the same downstream while
//! staying distinguishable for diagnostics.
//!
//! Index construction derives, once, a normalized form for every canonical
//! word and synonym and records `normalized surface -> canonical` with
//! last-write-wins on collisions, in source order. The loaded entries are
//! never mutated afterwards; the lexicon is built completely before it is
//! shared.
//!
//! # Example
//! ```no_run
//! use signdict_db::SignLexicon;
//! use signdict_morph::normalize;
//!
//! let lexicon = SignLexicon::load("signs.json");
//! if let Some((canonical, entry)) = lexicon.resolve(&normalize("شُكراً")) {
//!     println!("{canonical} -> {}", entry.video);
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use signdict_morph::normalize;
use signdict_types::SignEntry;

/// Why a dictionary failed to load.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("failed to read sign dictionary: {0}")]
    Io(#[from] std::io::Error),
    #[error("sign dictionary is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed entry for '{word}': {reason}")]
    Entry { word: String, reason: String },
}

/// Outcome of the last load attempt, kept for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadStatus {
    Loaded { entries: usize },
    Failed(String),
}

/// A dictionary entry paired with its cached normalized form.
#[derive(Clone, Debug)]
pub struct LexiconEntry {
    pub entry: SignEntry,
    pub normalized: String,
}

/// Read-only dictionary index: canonical entries plus the surface-form map
/// every lookup goes through.
#[derive(Clone, Debug)]
pub struct SignLexicon {
    entries: HashMap<String, LexiconEntry>,
    surface_index: HashMap<String, String>,
    status: LoadStatus,
}

/// Raw JSON shape of one dictionary value. Strict: anything but these three
/// fields fails the entry.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    #[serde(default)]
    synonyms: Vec<String>,
    video_path: String,
    #[serde(rename = "type", default)]
    category: Option<String>,
}

impl SignLexicon {
    /// Load a dictionary file, degrading to an empty lexicon on any error.
    ///
    /// The failure reason is logged and retained in [`SignLexicon::status`];
    /// every lookup against the empty lexicon simply misses.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(lexicon) => {
                debug!(
                    "loaded {} sign entries from {}",
                    lexicon.len(),
                    path.display()
                );
                lexicon
            }
            Err(err) => {
                warn!(
                    "sign dictionary {} unusable, serving empty lexicon: {err}",
                    path.display()
                );
                Self {
                    entries: HashMap::new(),
                    surface_index: HashMap::new(),
                    status: LoadStatus::Failed(err.to_string()),
                }
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, DictError> {
        let raw = fs::read_to_string(path)?;
        let entries = parse_entries(&raw)?;
        Ok(Self::from_entries(entries))
    }

    /// Build the index from already-decoded entries, in the given order.
    ///
    /// For each entry the canonical word registers first, then its synonyms;
    /// a later registration of the same normalized form overwrites an earlier
    /// one. Synonyms that normalize to the empty string are skipped.
    pub fn from_entries(source: Vec<SignEntry>) -> Self {
        let count = source.len();
        let mut entries = HashMap::with_capacity(count);
        let mut surface_index = HashMap::new();
        for entry in source {
            let normalized = normalize(&entry.canonical);
            surface_index.insert(normalized.clone(), entry.canonical.clone());
            for synonym in &entry.synonyms {
                let form = normalize(synonym);
                if !form.is_empty() {
                    surface_index.insert(form, entry.canonical.clone());
                }
            }
            entries.insert(entry.canonical.clone(), LexiconEntry { entry, normalized });
        }
        Self {
            entries,
            surface_index,
            status: LoadStatus::Loaded { entries: count },
        }
    }

    /// Whether a normalized form is any entry's surface form.
    ///
    /// Every canonical word self-maps in the surface index, so one lookup
    /// covers canonicals and synonyms alike.
    pub fn is_known_form(&self, normalized: &str) -> bool {
        self.surface_index.contains_key(normalized)
    }

    /// Resolve a normalized surface form to its canonical word and entry.
    pub fn resolve(&self, normalized: &str) -> Option<(&str, &SignEntry)> {
        let canonical = self.surface_index.get(normalized)?;
        let slot = self.entries.get(canonical)?;
        Some((canonical.as_str(), &slot.entry))
    }

    /// Fetch an entry by its exact canonical word.
    pub fn entry(&self, canonical: &str) -> Option<&SignEntry> {
        self.entries.get(canonical).map(|slot| &slot.entry)
    }

    /// Iterate over canonical words, in no particular order.
    pub fn canonical_words(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of canonical entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct surface forms the index answers for.
    pub fn surface_form_count(&self) -> usize {
        self.surface_index.len()
    }

    /// Load-status side channel for diagnostics.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }
}

/// Decode the JSON object into entries, preserving source key order.
fn parse_entries(raw: &str) -> Result<Vec<SignEntry>, DictError> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
    let mut entries = Vec::with_capacity(map.len());
    for (word, value) in map {
        let raw_entry: RawEntry =
            serde_json::from_value(value).map_err(|err| DictError::Entry {
                word: word.clone(),
                reason: err.to_string(),
            })?;
        entries.push(SignEntry {
            canonical: word,
            synonyms: raw_entry.synonyms,
            video: raw_entry.video_path,
            category: raw_entry.category,
        });
    }
    Ok(entries)
}

/// Normalized words excluded from matching regardless of dictionary
/// membership. Read-only after construction.
#[derive(Clone, Debug)]
pub struct StopWords {
    words: HashSet<String>,
}

/// Default function-word list; entries normalize on construction, so the
/// hamza variants here collapse to one form.
const BUILTIN_STOP_WORDS: &[&str] = &[
    "في", "من", "إلى", "على", "عن", "أن", "إن", "كان", "كانت", "أو", "و", "ثم", "قد", "كل",
    "كما",
];

impl StopWords {
    /// The built-in default set.
    pub fn builtin() -> Self {
        Self::from_text(&BUILTIN_STOP_WORDS.join("\n"))
    }

    /// Parse a newline-delimited word list; entries are normalized so the
    /// file may carry diacritics or letter variants.
    pub fn from_text(text: &str) -> Self {
        let words = text
            .lines()
            .map(normalize)
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    /// Load from a file, falling back to the built-in set when the file is
    /// missing or unreadable.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match fs::read_to_string(path) {
            Ok(text) => Self::from_text(&text),
            Err(err) => {
                warn!(
                    "stop-word list {} unreadable ({err}), using built-in set",
                    path.display()
                );
                Self::builtin()
            }
        }
    }

    /// Membership test over normalized words.
    pub fn contains(&self, normalized: &str) -> bool {
        self.words.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_resolves_to_last_entry_in_source_order() {
        // Both canonicals carry a synonym normalizing to "اهلا"; the later
        // entry wins the surface form, the earlier one keeps its own key.
        let lexicon = SignLexicon::from_entries(vec![
            SignEntry::new("مرحبا", "hello.mp4").with_synonyms(["أهلا"]),
            SignEntry::new("تحية", "greeting.mp4").with_synonyms(["اهلا"]),
        ]);
        let (canonical, _) = lexicon.resolve("اهلا").expect("surface form present");
        assert_eq!(canonical, "تحية");
        let (canonical, _) = lexicon.resolve("مرحبا").expect("canonical self-map");
        assert_eq!(canonical, "مرحبا");
    }

    #[test]
    fn empty_synonyms_are_not_indexed() {
        let lexicon = SignLexicon::from_entries(vec![
            SignEntry::new("شكرا", "thanks.mp4").with_synonyms(["ً", "ممتن"]),
        ]);
        assert!(!lexicon.is_known_form(""));
        assert!(lexicon.is_known_form("ممتن"));
    }

    #[test]
    fn canonical_forms_are_normalized_once() {
        let lexicon =
            SignLexicon::from_entries(vec![SignEntry::new("مدرسة", "school.mp4")]);
        assert!(lexicon.is_known_form("مدرسه"));
        let (canonical, entry) = lexicon.resolve("مدرسه").unwrap();
        assert_eq!(canonical, "مدرسة");
        assert_eq!(entry.video, "school.mp4");
    }

    #[test]
    fn builtin_stop_words_are_normalized() {
        let stops = StopWords::builtin();
        assert!(stops.contains("في"));
        assert!(stops.contains("من"));
        assert!(!stops.contains("شكرا"));
    }

    #[test]
    fn stop_word_file_entries_are_normalized_on_load() {
        let stops = StopWords::from_text("إلى\nعَن\n\nثم\n");
        assert!(stops.contains("الي"));
        assert!(stops.contains("عن"));
        assert!(stops.contains("ثم"));
        assert_eq!(stops.len(), 3);
    }
}
