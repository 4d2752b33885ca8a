// src/core/session.rs
use crate::core::catalog;
use crate::core::composer::{compose, group};
use crate::core::decomposer::name_to_letters;
use crate::core::types::{JamoLetter, JamoSequence, SyllableGroup};
use crate::error::{CardError, Result};
use tracing::debug;

/// The tiles tapped during one card session, plus an optional typed name
/// the user is spelling along to.
#[derive(Debug, Default, Clone)]
pub struct Session {
    taps: JamoSequence,
    target: JamoSequence,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the tile for `c`.
    pub fn tap(&mut self, c: char) -> Result<&JamoLetter> {
        let letter = catalog::find(c).ok_or(CardError::UnknownLetter(c))?;
        self.taps.push(*letter);
        debug!(letter = %c, taps = self.taps.len(), "tile tapped");
        Ok(letter)
    }

    pub fn backspace(&mut self) -> Option<JamoLetter> {
        let removed = self.taps.pop();
        if let Some(letter) = &removed {
            debug!(letter = %letter.character, "tile removed");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.taps.clear();
    }

    /// Sets the name to spell along to. An empty name removes the prompt.
    pub fn set_target(&mut self, name: &str) {
        self.target = name_to_letters(name);
        debug!(name, tiles = self.target.len(), "target set");
    }

    pub fn taps(&self) -> &[JamoLetter] {
        &self.taps
    }

    pub fn target(&self) -> &[JamoLetter] {
        &self.target
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    /// True while the taps so far are a prefix of the target.
    pub fn is_on_track(&self) -> bool {
        self.target.starts_with(&self.taps)
    }

    /// The tile to prompt for next. `None` once the target is spelled, when
    /// the taps have left the target, or when there is no target.
    pub fn next_expected(&self) -> Option<&JamoLetter> {
        if !self.is_on_track() {
            return None;
        }
        self.target.get(self.taps.len())
    }

    pub fn composed_name(&self) -> String {
        compose(&self.taps)
    }

    pub fn groups(&self) -> Vec<SyllableGroup<JamoLetter>> {
        group(&self.taps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap_all(session: &mut Session, chars: &str) {
        for c in chars.chars() {
            session.tap(c).unwrap();
        }
    }

    #[test]
    fn taps_compose_into_a_name() {
        let mut session = Session::new();
        tap_all(&mut session, "ㅎㅏㄴㄱㅡㄹ");
        assert_eq!(session.composed_name(), "한글");
        assert_eq!(session.groups().len(), 2);
    }

    #[test]
    fn rejects_characters_without_a_tile() {
        let mut session = Session::new();
        assert!(matches!(session.tap('ㄳ'), Err(CardError::UnknownLetter('ㄳ'))));
        assert!(matches!(session.tap('A'), Err(CardError::UnknownLetter('A'))));
        assert!(session.is_empty());
    }

    #[test]
    fn backspace_and_clear() {
        let mut session = Session::new();
        tap_all(&mut session, "ㄱㅏㄴ");
        assert_eq!(session.backspace().map(|l| l.character), Some('ㄴ'));
        assert_eq!(session.composed_name(), "가");
        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.backspace(), None);
        assert_eq!(session.composed_name(), "");
    }

    #[test]
    fn prompts_for_the_next_target_tile() {
        let mut session = Session::new();
        assert!(session.next_expected().is_none());

        session.set_target("김");
        assert_eq!(session.next_expected().map(|l| l.character), Some('ㄱ'));
        tap_all(&mut session, "ㄱㅣ");
        assert_eq!(session.next_expected().map(|l| l.character), Some('ㅁ'));
        session.tap('ㅁ').unwrap();
        assert!(session.next_expected().is_none());
        assert!(session.is_on_track());
    }

    #[test]
    fn wrong_tap_leaves_the_track() {
        let mut session = Session::new();
        session.set_target("나");
        session.tap('ㄷ').unwrap();
        assert!(!session.is_on_track());
        assert!(session.next_expected().is_none());
        session.backspace();
        assert_eq!(session.next_expected().map(|l| l.character), Some('ㄴ'));
    }
}
