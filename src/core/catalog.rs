// src/core/catalog.rs
use crate::core::types::JamoLetter;

pub const SYLLABLE_BASE: u32 = 0xAC00;
pub const SYLLABLE_LAST: u32 = 0xD7A3;
pub const LEAD_COUNT: u32 = 19;
pub const VOWEL_COUNT: u32 = 21;
pub const FINAL_COUNT: u32 = 28;

/// Leading consonants in Unicode syllable order.
pub const LEADS: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ', 'ㅌ',
    'ㅍ', 'ㅎ',
];

/// Vowels in Unicode syllable order.
pub const VOWELS: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ', 'ㅟ',
    'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Final consonants in Unicode syllable order. Slot 0 means "no final".
pub const FINALS: [Option<char>; 28] = [
    None,
    Some('ㄱ'), Some('ㄲ'), Some('ㄳ'), Some('ㄴ'), Some('ㄵ'), Some('ㄶ'), Some('ㄷ'),
    Some('ㄹ'), Some('ㄺ'), Some('ㄻ'), Some('ㄼ'), Some('ㄽ'), Some('ㄾ'), Some('ㄿ'),
    Some('ㅀ'), Some('ㅁ'), Some('ㅂ'), Some('ㅄ'), Some('ㅅ'), Some('ㅆ'), Some('ㅇ'),
    Some('ㅈ'), Some('ㅊ'), Some('ㅋ'), Some('ㅌ'), Some('ㅍ'), Some('ㅎ'),
];

/// The tappable consonant tiles, in keyboard order.
pub static CONSONANTS: [JamoLetter; 19] = [
    JamoLetter::consonant('ㄱ', "/consonants/ㄱ.png", 1),
    JamoLetter::consonant('ㄴ', "/consonants/ㄴ.png", 2),
    JamoLetter::consonant('ㄷ', "/consonants/ㄷ.png", 3),
    JamoLetter::consonant('ㄹ', "/consonants/ㄹ.png", 4),
    JamoLetter::consonant('ㅁ', "/consonants/ㅁ.png", 5),
    JamoLetter::consonant('ㅂ', "/consonants/ㅂ.png", 6),
    JamoLetter::consonant('ㅅ', "/consonants/ㅅ.png", 7),
    JamoLetter::consonant('ㅇ', "/consonants/ㅇ.png", 8),
    JamoLetter::consonant('ㅈ', "/consonants/ㅈ.png", 9),
    JamoLetter::consonant('ㅊ', "/consonants/ㅊ.png", 10),
    JamoLetter::consonant('ㅋ', "/consonants/ㅋ.png", 11),
    JamoLetter::consonant('ㅌ', "/consonants/ㅌ.png", 12),
    JamoLetter::consonant('ㅍ', "/consonants/ㅍ.png", 13),
    JamoLetter::consonant('ㅎ', "/consonants/ㅎ.png", 14),
    JamoLetter::consonant('ㄲ', "/consonants/ㄲ.png", 15),
    JamoLetter::consonant('ㄸ', "/consonants/ㄸ.png", 16),
    JamoLetter::consonant('ㅃ', "/consonants/ㅃ.png", 17),
    JamoLetter::consonant('ㅆ', "/consonants/ㅆ.png", 18),
    JamoLetter::consonant('ㅉ', "/consonants/ㅉ.png", 19),
];

/// The tappable vowel tiles, in keyboard order.
pub static VOWEL_TILES: [JamoLetter; 21] = [
    JamoLetter::vowel('ㅏ', "/vowels/ㅏ.png", 1),
    JamoLetter::vowel('ㅑ', "/vowels/ㅑ.png", 2),
    JamoLetter::vowel('ㅓ', "/vowels/ㅓ.png", 3),
    JamoLetter::vowel('ㅕ', "/vowels/ㅕ.png", 4),
    JamoLetter::vowel('ㅗ', "/vowels/ㅗ.png", 5),
    JamoLetter::vowel('ㅛ', "/vowels/ㅛ.png", 6),
    JamoLetter::vowel('ㅜ', "/vowels/ㅜ.png", 7),
    JamoLetter::vowel('ㅠ', "/vowels/ㅠ.png", 8),
    JamoLetter::vowel('ㅡ', "/vowels/ㅡ.png", 9),
    JamoLetter::vowel('ㅣ', "/vowels/ㅣ.png", 10),
    JamoLetter::vowel('ㅐ', "/vowels/ㅐ.png", 11),
    JamoLetter::vowel('ㅒ', "/vowels/ㅒ.png", 12),
    JamoLetter::vowel('ㅔ', "/vowels/ㅔ.png", 13),
    JamoLetter::vowel('ㅖ', "/vowels/ㅖ.png", 14),
    JamoLetter::vowel('ㅘ', "/vowels/ㅘ.png", 15),
    JamoLetter::vowel('ㅙ', "/vowels/ㅙ.png", 16),
    JamoLetter::vowel('ㅚ', "/vowels/ㅚ.png", 17),
    JamoLetter::vowel('ㅝ', "/vowels/ㅝ.png", 18),
    JamoLetter::vowel('ㅞ', "/vowels/ㅞ.png", 19),
    JamoLetter::vowel('ㅟ', "/vowels/ㅟ.png", 20),
    JamoLetter::vowel('ㅢ', "/vowels/ㅢ.png", 21),
];

pub fn consonants() -> &'static [JamoLetter] {
    &CONSONANTS
}

pub fn vowels() -> &'static [JamoLetter] {
    &VOWEL_TILES
}

/// Every tile, consonants first.
pub fn all() -> impl Iterator<Item = &'static JamoLetter> {
    CONSONANTS.iter().chain(VOWEL_TILES.iter())
}

/// Finds the tile for a character. Compound finals such as ㄳ have no tile.
pub fn find(c: char) -> Option<&'static JamoLetter> {
    all().find(|letter| letter.character == c)
}

pub fn lead_index(c: char) -> Option<u32> {
    LEADS.iter().position(|&l| l == c).map(|i| i as u32)
}

pub fn vowel_index(c: char) -> Option<u32> {
    VOWELS.iter().position(|&v| v == c).map(|i| i as u32)
}

/// Index into [`FINALS`]. Never `Some(0)`: the empty slot matches no character.
pub fn final_index(c: char) -> Option<u32> {
    FINALS.iter().position(|&f| f == Some(c)).map(|i| i as u32)
}

pub fn is_lead(c: char) -> bool {
    lead_index(c).is_some()
}

pub fn is_vowel(c: char) -> bool {
    vowel_index(c).is_some()
}

/// Splits a precomposed syllable into lead, vowel and optional final.
/// Returns `None` for anything outside the syllable block.
pub fn split_syllable(c: char) -> Option<(char, char, Option<char>)> {
    let code = c as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
        return None;
    }
    let offset = code - SYLLABLE_BASE;
    let final_idx = offset % FINAL_COUNT;
    let vowel_idx = (offset / FINAL_COUNT) % VOWEL_COUNT;
    let lead_idx = offset / FINAL_COUNT / VOWEL_COUNT;
    Some((
        LEADS[lead_idx as usize],
        VOWELS[vowel_idx as usize],
        FINALS[final_idx as usize],
    ))
}

/// Builds a precomposed syllable from table indices.
pub fn compose_syllable(lead: u32, vowel: u32, final_idx: u32) -> Option<char> {
    if lead >= LEAD_COUNT || vowel >= VOWEL_COUNT || final_idx >= FINAL_COUNT {
        return None;
    }
    char::from_u32(SYLLABLE_BASE + (lead * VOWEL_COUNT + vowel) * FINAL_COUNT + final_idx)
}
