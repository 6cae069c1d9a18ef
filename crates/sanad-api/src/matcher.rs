//! Sentence-to-signs matching pipeline.
//!
//! One synchronous pass per request: clean the raw sentence down to Arabic
//! text, hand it to the external segmenter, repair over-segmented tokens
//! against the dictionary, drop stop words, then resolve each remaining
//! token to a canonical sign. The same sign mentioned twice (directly or via
//! a synonym) yields one match, anchored at its first mention.
//!
//! All shared state ([`SignLexicon`], [`StopWords`]) is read-only; every
//! call allocates its own buffers, so a [`Translator`] can be shared across
//! concurrent requests freely.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use signdict_db::{SignLexicon, StopWords};
use signdict_morph::{JOIN_MARKER, clean_sentence, normalize, reassemble, strip_marker};
use signdict_types::{SignEntry, SignMatch};

use crate::segment::{Segmenter, SegmenterError};

/// How a translation attempt fails. Every variant is a recoverable,
/// per-request outcome; nothing here terminates the service.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("sentence is empty after removing non-Arabic characters")]
    InvalidInput,
    #[error("segmenter unavailable: {0}")]
    SegmenterUnavailable(#[source] SegmenterError),
    #[error("no supported sign words in: {sentence}")]
    NoMatch { sentence: String },
}

/// A successful translation: the cleaned sentence and its ordered matches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Translation {
    pub sentence: String,
    pub matches: Vec<SignMatch>,
}

/// The matching pipeline over a fixed lexicon, stop-word set, and segmenter.
pub struct Translator {
    lexicon: Arc<SignLexicon>,
    stop_words: Arc<StopWords>,
    segmenter: Arc<dyn Segmenter>,
}

impl Translator {
    pub fn new(
        lexicon: Arc<SignLexicon>,
        stop_words: Arc<StopWords>,
        segmenter: Arc<dyn Segmenter>,
    ) -> Self {
        Self {
            lexicon,
            stop_words,
            segmenter,
        }
    }

    /// Read access to the lexicon backing this translator.
    pub fn lexicon(&self) -> &SignLexicon {
        &self.lexicon
    }

    /// Translate one sentence into its ordered, deduplicated sign matches.
    pub fn translate(&self, sentence: &str) -> Result<Translation, TranslateError> {
        let cleaned = clean_sentence(sentence);
        if cleaned.is_empty() {
            return Err(TranslateError::InvalidInput);
        }

        let segmented = self
            .segmenter
            .segment(&cleaned)
            .map_err(TranslateError::SegmenterUnavailable)?;
        let raw_tokens: Vec<String> = segmented.split_whitespace().map(str::to_string).collect();
        debug!("segmenter tokens: {raw_tokens:?}");

        let tokens = reassemble(&raw_tokens, |form| self.lexicon.is_known_form(form));
        debug!("repaired tokens: {tokens:?}");

        let mut matches = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for token in tokens {
            if self.stop_words.contains(&normalize(&token)) {
                continue;
            }
            let Some((canonical, entry)) = self.lookup(&token) else {
                continue;
            };
            if seen.insert(canonical.to_string()) {
                matches.push(SignMatch::new(canonical, token, &entry.video));
            }
        }

        if matches.is_empty() {
            return Err(TranslateError::NoMatch { sentence: cleaned });
        }
        Ok(Translation {
            sentence: cleaned,
            matches,
        })
    }

    /// Resolve one token, retrying with the marker stripped for tokens that
    /// still carry a join-marker artifact from pass-1 repair.
    fn lookup(&self, token: &str) -> Option<(&str, &SignEntry)> {
        let form = normalize(token);
        if form.is_empty() {
            return None;
        }
        if let Some(hit) = self.lexicon.resolve(&form) {
            return Some(hit);
        }
        if token.contains(JOIN_MARKER) {
            return self.lexicon.resolve(&normalize(&strip_marker(token)));
        }
        None
    }
}
