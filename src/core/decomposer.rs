// src/core/decomposer.rs
use crate::core::catalog;
use crate::core::types::{JamoLetter, JamoSequence};

/// Breaks text into the jamo a user taps through, one syllable at a time.
/// Characters outside the syllable block pass through untouched.
pub fn decompose(text: &str) -> Vec<char> {
    let mut jamos = Vec::with_capacity(text.len());
    for c in text.chars() {
        match catalog::split_syllable(c) {
            Some((lead, vowel, final_optional)) => {
                jamos.push(lead);
                jamos.push(vowel);
                if let Some(f) = final_optional {
                    jamos.push(f);
                }
            }
            None => jamos.push(c),
        }
    }
    jamos
}

/// The tile sequence for a typed name. Anything without a tile (compound
/// finals, spaces, latin letters) is dropped.
pub fn name_to_letters(name: &str) -> JamoSequence {
    decompose(name)
        .into_iter()
        .filter_map(catalog::find)
        .copied()
        .collect()
}

/// Image path for each jamo, `None` where there is no tile.
pub fn asset_paths(jamos: &[char]) -> Vec<Option<&'static str>> {
    jamos
        .iter()
        .map(|&c| catalog::find(c).map(|letter: &JamoLetter| letter.asset))
        .collect()
}
