// src/core/composer.rs
use crate::core::catalog;
use crate::core::types::{AsJamo, SyllableGroup};

/// What the scanner decided about the letters starting at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Lead + vowel (+ final) folded into one precomposed block.
    Syllable { syllable: char, consumed: usize },
    /// The letter at this position does not start a syllable.
    Passthrough,
}

impl Step {
    pub fn consumed(&self) -> usize {
        match self {
            Step::Syllable { consumed, .. } => *consumed,
            Step::Passthrough => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// nothing seen yet
    ExpectingLead,

    /// ex. ㄱ -> 가
    ExpectingVowel(u32),

    /// ex. 가 -> 각, or 가 with the consonant left for the next block
    ExpectingFinal(u32, u32),
}

/// Looks at most four letters ahead of `at` and decides how many of them
/// belong to the syllable starting there.
///
/// A consonant after lead + vowel closes the syllable unless the letter after
/// it is a vowel, in which case it is left to lead the next syllable. Only
/// that single letter of lookahead is used; the choice is never revisited.
pub fn step<T: AsJamo>(letters: &[T], at: usize) -> Step {
    let jamo = |offset: usize| letters.get(at + offset).map(|l| l.jamo());
    let mut state = ScanState::ExpectingLead;

    loop {
        state = match state {
            ScanState::ExpectingLead => match jamo(0).and_then(catalog::lead_index) {
                Some(lead) => ScanState::ExpectingVowel(lead),
                None => return Step::Passthrough,
            },

            ScanState::ExpectingVowel(lead) => match jamo(1).and_then(catalog::vowel_index) {
                Some(vowel) => ScanState::ExpectingFinal(lead, vowel),
                None => return Step::Passthrough,
            },

            ScanState::ExpectingFinal(lead, vowel) => {
                let next_is_vowel = jamo(3).is_some_and(catalog::is_vowel);
                let final_idx = match jamo(2).and_then(catalog::final_index) {
                    Some(f) if f != 0 && !next_is_vowel => f,
                    _ => 0,
                };
                return match catalog::compose_syllable(lead, vowel, final_idx) {
                    Some(syllable) => Step::Syllable {
                        syllable,
                        consumed: if final_idx == 0 { 2 } else { 3 },
                    },
                    None => Step::Passthrough,
                };
            }
        };
    }
}

/// Folds a tap sequence into Korean text. Letters that do not form a
/// syllable are copied as-is.
pub fn compose<T: AsJamo>(letters: &[T]) -> String {
    let mut result = String::with_capacity(letters.len() * 3);
    let mut i = 0;
    while i < letters.len() {
        let decision = step(letters, i);
        match decision {
            Step::Syllable { syllable, .. } => result.push(syllable),
            Step::Passthrough => result.push(letters[i].jamo()),
        }
        i += decision.consumed();
    }
    result
}

/// Splits a tap sequence into one group per rendered character, using the
/// same decisions as [`compose`]. The groups concatenate back to the input.
pub fn group<T: AsJamo + Clone>(letters: &[T]) -> Vec<SyllableGroup<T>> {
    let mut groups = Vec::new();
    let mut i = 0;
    while i < letters.len() {
        let consumed = step(letters, i).consumed();
        groups.push(SyllableGroup {
            letters: letters[i..i + consumed].to_vec(),
        });
        i += consumed;
    }
    groups
}
