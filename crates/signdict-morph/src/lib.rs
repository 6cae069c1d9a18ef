//! Arabic orthographic normalization and segmenter-token repair.
//!
//! Dictionary matching compares words by a normalized form: diacritics
//! stripped and the usual letter variants (hamza-bearing alef, taa marbuta,
//! alef maksura) folded to one spelling. [`normalize`] produces that form;
//! [`clean_sentence`] reduces raw input to the Arabic letters the rest of the
//! pipeline understands.
//!
//! The external morphological segmenter splits a sentence into sub-word
//! tokens and marks internal affix boundaries with [`JOIN_MARKER`]. It will
//! happily split a dictionary word in two, so [`reassemble`] re-merges
//! adjacent tokens whenever the merge lands on a known surface form. The
//! crate is decoupled from any dictionary layout: callers pass an
//! `is_known(normalized) -> bool` predicate, nothing else.
//!
//! # Example
//! ```rust
//! use signdict_morph::{normalize, reassemble};
//!
//! let known = |form: &str| form == "شكرا";
//! let tokens = vec!["شكر+".to_string(), "ا".to_string()];
//! assert_eq!(reassemble(&tokens, known), vec!["شكرا".to_string()]);
//! assert_eq!(normalize("شُكْرًا"), "شكرا");
//! ```

/// Character the segmenter inserts at an internal affix boundary of an
/// over-segmented token.
pub const JOIN_MARKER: char = '+';

/// Arabic combining marks for short vowels, tanwin, and shadda/sukun.
fn is_diacritic(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}')
}

/// Reduce a word to its comparison form.
///
/// Strips diacritics, folds the hamza-bearing alef variants to bare alef,
/// taa marbuta to haa, and alef maksura to yaa, then trims. Idempotent:
/// normalizing an already-normalized word is a no-op. Empty input stays
/// empty.
pub fn normalize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let mut folded = String::with_capacity(word.len());
    for ch in word.chars() {
        if is_diacritic(ch) {
            continue;
        }
        folded.push(match ch {
            '\u{0623}' | '\u{0625}' | '\u{0622}' => '\u{0627}', // أ إ آ -> ا
            '\u{0629}' => '\u{0647}',                           // ة -> ه
            '\u{0649}' => '\u{064A}',                           // ى -> ي
            other => other,
        });
    }
    folded.trim_matches(is_diacritic).trim().to_string()
}

/// Strip everything outside the Arabic block, keeping whitespace, then trim.
///
/// Latin text, digits, and punctuation all disappear; an all-foreign input
/// cleans to the empty string, which the matcher treats as invalid input.
pub fn clean_sentence(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|ch| matches!(ch, '\u{0600}'..='\u{06FF}') || ch.is_whitespace())
        .collect();
    kept.trim().to_string()
}

/// Remove every join marker from a token.
pub fn strip_marker(token: &str) -> String {
    token.chars().filter(|ch| *ch != JOIN_MARKER).collect()
}

/// Undo segmenter over-splitting of dictionary words.
///
/// Two greedy left-to-right sweeps, both gated on the caller's `is_known`
/// predicate over normalized forms:
///
/// 1. a token carrying [`JOIN_MARKER`] is merged with its right neighbour
///    (marker dropped) when the merge is a known surface form;
/// 2. the output is swept again without the marker requirement, catching
///    splits where the segmenter dropped the marker entirely.
///
/// Each merge consumes exactly two tokens and the sweep moves on; merged
/// output is never re-tried against a third token, so a dictionary word
/// scattered across three or more segmenter tokens stays split. There is no
/// backtracking.
pub fn reassemble<F>(tokens: &[String], is_known: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let marker_fixed = sweep_merge(tokens, true, &is_known);
    sweep_merge(&marker_fixed, false, &is_known)
}

fn sweep_merge<F>(tokens: &[String], require_marker: bool, is_known: &F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let current = &tokens[i];
        if i + 1 < tokens.len() && (!require_marker || current.contains(JOIN_MARKER)) {
            let head = if require_marker {
                strip_marker(current)
            } else {
                current.clone()
            };
            let combined = format!("{head}{}", tokens[i + 1]);
            if is_known(&normalize(&combined)) {
                out.push(combined);
                i += 2;
                continue;
            }
        }
        out.push(current.clone());
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn known(forms: &[&str]) -> impl Fn(&str) -> bool {
        let set: HashSet<String> = forms.iter().map(|f| f.to_string()).collect();
        move |form: &str| set.contains(form)
    }

    fn owned(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn normalize_strips_diacritics() {
        assert_eq!(normalize("كَتَبَ"), "كتب");
        assert_eq!(normalize("شُكْرًا"), "شكرا");
    }

    #[test]
    fn normalize_folds_letter_variants() {
        assert_eq!(normalize("أكتب"), "اكتب");
        assert_eq!(normalize("إسلام"), "اسلام");
        assert_eq!(normalize("آمين"), "امين");
        assert_eq!(normalize("مدرسة"), "مدرسه");
        assert_eq!(normalize("مستشفى"), "مستشفي");
    }

    #[test]
    fn normalize_is_idempotent() {
        for word in ["كَتَبَ", "أكتب", "مدرسة", " مستشفى ", "hello", ""] {
            let once = normalize(word);
            assert_eq!(normalize(&once), once, "not idempotent for {word:?}");
        }
    }

    #[test]
    fn normalize_keeps_empty_input_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("ًٌ"), "");
    }

    #[test]
    fn clean_removes_non_arabic() {
        assert_eq!(clean_sentence("كتب 123 book"), "كتب");
        assert_eq!(clean_sentence("hello, world!"), "");
        assert_eq!(clean_sentence("  مرحبا يا صديقي  "), "مرحبا يا صديقي");
    }

    #[test]
    fn reassemble_merges_marker_split() {
        let tokens = owned(&["شكر+", "ا"]);
        let out = reassemble(&tokens, known(&["شكرا"]));
        assert_eq!(out, owned(&["شكرا"]));
    }

    #[test]
    fn reassemble_merges_markerless_adjacent_split() {
        let tokens = owned(&["مدر", "سة"]);
        let out = reassemble(&tokens, known(&["مدرسه"]));
        assert_eq!(out, owned(&["مدرسة"]));
    }

    #[test]
    fn reassemble_is_noop_without_known_merges() {
        let tokens = owned(&["شكر+", "ا", "كتاب"]);
        let out = reassemble(&tokens, known(&["مدرسه"]));
        assert_eq!(out, tokens);
    }

    #[test]
    fn reassemble_keeps_marker_when_merge_unknown() {
        // The marker survives pass 1 so the matcher can still try the
        // marker-stripped form on its own.
        let tokens = owned(&["كتاب+", "هم"]);
        let out = reassemble(&tokens, known(&["شكرا"]));
        assert_eq!(out, tokens);
    }

    #[test]
    fn reassemble_never_merges_three_tokens() {
        // A word split across three tokens is out of reach for the two-token
        // sweeps, even when the full concatenation is a known form.
        let tokens = owned(&["مست", "ش", "في"]);
        let out = reassemble(&tokens, known(&["مستشفي"]));
        assert_eq!(out, tokens);
    }

    #[test]
    fn reassemble_handles_trailing_marker_token() {
        let tokens = owned(&["شكرا+"]);
        let out = reassemble(&tokens, known(&["شكرا"]));
        assert_eq!(out, tokens);
    }

    #[test]
    fn strip_marker_removes_all_markers() {
        assert_eq!(strip_marker("و+ال+كتاب"), "والكتاب");
        assert_eq!(strip_marker("كتاب"), "كتاب");
    }
}
