use std::io::Write;
use std::path::PathBuf;

use signdict_db::{LoadStatus, SignLexicon};
use signdict_morph::normalize;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("signs.json")
}

#[test]
fn loads_entries_with_synonyms_and_categories() {
    let lexicon = SignLexicon::load(fixture_path());
    assert_eq!(lexicon.len(), 3);
    assert_eq!(lexicon.status(), &LoadStatus::Loaded { entries: 3 });

    let entry = lexicon.entry("شكرا").expect("canonical entry present");
    assert_eq!(entry.video, "videos/thanks.mp4");
    assert_eq!(entry.synonyms, vec!["ممتن".to_string(), "شاكر".to_string()]);
    assert_eq!(entry.category.as_deref(), Some("expression"));

    let entry = lexicon.entry("مرحبا").expect("entry without category");
    assert!(entry.category.is_none());
}

#[test]
fn resolves_synonyms_and_diacritic_variants() {
    let lexicon = SignLexicon::load(fixture_path());

    let (canonical, entry) = lexicon.resolve("ممتن").expect("synonym resolves");
    assert_eq!(canonical, "شكرا");
    assert_eq!(entry.video, "videos/thanks.mp4");

    // A hamza-carrying synonym is reachable through its normalized form.
    let (canonical, _) = lexicon
        .resolve(&normalize("أهلا"))
        .expect("normalized synonym resolves");
    assert_eq!(canonical, "مرحبا");

    // Canonicals resolve through their own normalized forms.
    let (canonical, _) = lexicon.resolve("مدرسه").expect("taa marbuta folded");
    assert_eq!(canonical, "مدرسة");
}

#[test]
fn missing_file_degrades_to_empty_lexicon() {
    let lexicon = SignLexicon::load("definitely/not/here.json");
    assert!(lexicon.is_empty());
    assert!(matches!(lexicon.status(), LoadStatus::Failed(_)));
    assert!(lexicon.resolve("شكرا").is_none());
}

#[test]
fn malformed_json_degrades_to_empty_lexicon() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let lexicon = SignLexicon::load(file.path());
    assert!(lexicon.is_empty());
    assert!(matches!(lexicon.status(), LoadStatus::Failed(_)));
}

#[test]
fn unknown_entry_field_fails_the_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "شكرا": {{ "video_path": "t.mp4", "surprise": 1 }} }}"#
    )
    .unwrap();
    let lexicon = SignLexicon::load(file.path());
    assert!(lexicon.is_empty());
    let LoadStatus::Failed(reason) = lexicon.status() else {
        panic!("expected failed status");
    };
    assert!(reason.contains("شكرا"));
}

#[test]
fn missing_video_path_fails_the_load() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "شكرا": {{ "synonyms": [] }} }}"#).unwrap();
    let lexicon = SignLexicon::load(file.path());
    assert!(lexicon.is_empty());
    assert!(matches!(lexicon.status(), LoadStatus::Failed(_)));
}
