// src/core/types.rs

/// Which half of the fingerspelling keyboard a tile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterKind {
    Consonant,
    Vowel,
}

/// One fingerspelling tile: a single jamo plus the image shown for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JamoLetter {
    pub character: char,
    pub kind: LetterKind,
    pub asset: &'static str,
    /// Keyboard layout position within its kind. Not used for composition.
    pub order: u8,
}

impl JamoLetter {
    pub const fn consonant(character: char, asset: &'static str, order: u8) -> Self {
        Self { character, kind: LetterKind::Consonant, asset, order }
    }

    pub const fn vowel(character: char, asset: &'static str, order: u8) -> Self {
        Self { character, kind: LetterKind::Vowel, asset, order }
    }
}

/// The taps of one card session, in the order they were made.
pub type JamoSequence = Vec<JamoLetter>;

/// Anything that can stand in for a single jamo during composition:
/// catalog tiles, raw chars from decomposition, stored card letters.
pub trait AsJamo {
    fn jamo(&self) -> char;
}

impl AsJamo for char {
    fn jamo(&self) -> char {
        *self
    }
}

impl AsJamo for JamoLetter {
    fn jamo(&self) -> char {
        self.character
    }
}

impl<T: AsJamo + ?Sized> AsJamo for &T {
    fn jamo(&self) -> char {
        (**self).jamo()
    }
}

/// The letters that render as one syllable block (lead, vowel, optional
/// final), or a single letter that did not form a syllable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyllableGroup<T> {
    pub letters: Vec<T>,
}

impl<T> SyllableGroup<T> {
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.letters.iter()
    }
}

impl<T> IntoIterator for SyllableGroup<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.into_iter()
    }
}
