use std::collections::HashSet;
use std::env;

use signdict_morph::{normalize, reassemble};

fn main() {
    // Pretend-dictionary of normalized surface forms to merge against.
    let known: HashSet<String> = ["شكرا", "مدرسه", "مستشفي"]
        .iter()
        .map(|f| f.to_string())
        .collect();

    let tokens: Vec<String> = if env::args().len() > 1 {
        env::args().skip(1).collect()
    } else {
        // The classic over-segmentation: one word split at an affix boundary.
        vec!["شكر+".to_string(), "ا".to_string(), "كتاب".to_string()]
    };

    println!("raw tokens : {tokens:?}");
    let repaired = reassemble(&tokens, |form| known.contains(form));
    println!("repaired   : {repaired:?}");
    for token in &repaired {
        println!("  {token} -> {}", normalize(token));
    }
}
