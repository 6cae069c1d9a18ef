use std::env;
use std::path::PathBuf;

use signdict_db::{LoadStatus, SignLexicon, StopWords};
use signdict_morph::normalize;

fn main() {
    let signs_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("signs.json"));

    let lexicon = SignLexicon::load(&signs_path);
    let stops = StopWords::builtin();

    println!("Dictionary: {}", signs_path.display());
    match lexicon.status() {
        LoadStatus::Loaded { entries } => println!("Status     : loaded {entries} entries"),
        LoadStatus::Failed(reason) => println!("Status     : FAILED ({reason})"),
    }
    println!("Canonical words : {}", lexicon.len());
    println!("Surface forms   : {}", lexicon.surface_form_count());
    println!("Stop words      : {}", stops.len());

    // Spot-check a few lookups to confirm the index answers.
    for probe in ["شكرا", "أهلا", "مدرسة"] {
        let form = normalize(probe);
        match lexicon.resolve(&form) {
            Some((canonical, entry)) => {
                println!("'{probe}' -> {canonical} ({})", entry.video);
            }
            None => println!("'{probe}' -> no match"),
        }
    }
}
