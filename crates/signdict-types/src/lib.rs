//! Shared record types for the Arabic sign dictionary.
//!
//! The dictionary maps a canonical Arabic word to a pre-recorded sign video
//! plus the synonyms that should resolve to the same sign. These types hold
//! the data exactly as loaded; comparison keys (normalized forms) are derived
//! elsewhere so the loaded records stay read-only.
//!
//! Use [`SignEntry`] for dictionary records and [`SignMatch`] for the per-word
//! output of translating a sentence.
//!
//! ```rust
//! use signdict_types::SignEntry;
//!
//! let entry = SignEntry::new("شكرا", "videos/thanks.mp4")
//!     .with_synonyms(["ممتن"]);
//! assert_eq!(entry.synonyms.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// One dictionary record: a canonical word, its synonyms, and the sign video
/// it maps to.
///
/// `canonical` is the dictionary key and is unique within a dictionary.
/// `video` is an opaque reference; resolving it against the filesystem is the
/// playback layer's concern, not this crate's.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignEntry {
    pub canonical: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub video: String,
    /// Free-form category tag from the source data (`"noun"`, `"expression"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SignEntry {
    /// Build an entry with no synonyms and no category.
    pub fn new(canonical: impl Into<String>, video: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            synonyms: Vec::new(),
            video: video.into(),
            category: None,
        }
    }

    /// Attach synonyms, replacing any existing list.
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a category tag.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// One matched sign in a translated sentence.
///
/// `input_word` is the surface token that produced the match (the first
/// mention, when the same sign is hit more than once); `canonical_word` is
/// the dictionary key it resolved to; `video_reference` is passed through
/// unresolved from the matched [`SignEntry`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignMatch {
    pub canonical_word: String,
    pub input_word: String,
    pub video_reference: String,
}

impl SignMatch {
    pub fn new(
        canonical_word: impl Into<String>,
        input_word: impl Into<String>,
        video_reference: impl Into<String>,
    ) -> Self {
        Self {
            canonical_word: canonical_word.into(),
            input_word: input_word.into(),
            video_reference: video_reference.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_builder_defaults() {
        let entry = SignEntry::new("مرحبا", "videos/hello.mp4");
        assert_eq!(entry.canonical, "مرحبا");
        assert!(entry.synonyms.is_empty());
        assert!(entry.category.is_none());

        let entry = entry.with_synonyms(["أهلا"]).with_category("expression");
        assert_eq!(entry.synonyms, vec!["أهلا".to_string()]);
        assert_eq!(entry.category.as_deref(), Some("expression"));
    }

    #[test]
    fn match_carries_first_mention_surface() {
        let m = SignMatch::new("شكرا", "شكرا+", "videos/thanks.mp4");
        assert_eq!(m.canonical_word, "شكرا");
        assert_eq!(m.input_word, "شكرا+");
    }
}
