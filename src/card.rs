// File: src/card.rs
use crate::core::composer::group;
use crate::core::session::Session;
use crate::core::types::{AsJamo, SyllableGroup};
use crate::error::{CardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Longest phone number the keypad accepts.
pub const MAX_PHONE_DIGITS: usize = 11;

const PHONE_GROUPS: [usize; 3] = [3, 4, 4];
const EMPTY_PHONE: &str = "010-____-____";

/// A tapped tile as stored in a card document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLetter {
    #[serde(rename = "char")]
    pub character: char,
    pub image_path: String,
}

impl AsJamo for CardLetter {
    fn jamo(&self) -> char {
        self.character
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    #[default]
    Horizontal,
    Vertical,
}

impl FromStr for LayoutDirection {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(CardError::UnknownLayout(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardDesign {
    #[default]
    Minimal,
    Glassmorphism,
    Luxury,
    Neon,
    Gradient,
    Paper,
    Corporate,
    Tech,
    Nature,
}

impl CardDesign {
    pub const ALL: [CardDesign; 9] = [
        CardDesign::Minimal,
        CardDesign::Glassmorphism,
        CardDesign::Luxury,
        CardDesign::Neon,
        CardDesign::Gradient,
        CardDesign::Paper,
        CardDesign::Corporate,
        CardDesign::Tech,
        CardDesign::Nature,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            CardDesign::Minimal => "minimal",
            CardDesign::Glassmorphism => "glassmorphism",
            CardDesign::Luxury => "luxury",
            CardDesign::Neon => "neon",
            CardDesign::Gradient => "gradient",
            CardDesign::Paper => "paper",
            CardDesign::Corporate => "corporate",
            CardDesign::Tech => "tech",
            CardDesign::Nature => "nature",
        }
    }
}

impl fmt::Display for CardDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CardDesign {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|design| design.id() == s)
            .ok_or_else(|| CardError::UnknownDesign(s.to_string()))
    }
}

/// Digits typed on the kiosk keypad.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ContactInput {
    digits: String,
}

impl ContactInput {
    /// Accepts one keypad press. `*`, `#` and anything past the length cap
    /// are ignored.
    pub fn push_digit(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.digits.len() >= MAX_PHONE_DIGITS {
            return false;
        }
        self.digits.push(c);
        true
    }

    pub fn backspace(&mut self) -> Option<char> {
        self.digits.pop()
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn formatted(&self) -> String {
        format_phone(&self.digits)
    }
}

/// Renders typed digits into the `010-____-____` mask.
pub fn format_phone(digits: &str) -> String {
    if digits.is_empty() {
        return EMPTY_PHONE.to_string();
    }
    let mut chars = digits.chars();
    let mut parts: Vec<String> = PHONE_GROUPS
        .iter()
        .map(|&width| {
            let mut part: String = chars.by_ref().take(width).collect();
            let filled = part.chars().count();
            part.extend(std::iter::repeat('_').take(width - filled));
            part
        })
        .collect();
    // Anything past the mask stays visible on the last group.
    if let Some(last) = parts.last_mut() {
        last.extend(chars);
    }
    parts.join("-")
}

/// Short share id for a card: the creation timestamp in base 36.
pub fn card_id(timestamp: i64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = timestamp.unsigned_abs();
    let mut out = Vec::new();
    loop {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    if timestamp < 0 {
        out.push(b'-');
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

const SHARE_PATH: &str = "card/shared";

pub fn share_url(base_url: &str, id: &str) -> String {
    format!("{}/{SHARE_PATH}?id={}", base_url.trim_end_matches('/'), id)
}

/// A self-contained share link: the whole document travels in the `data`
/// query parameter, so the viewer needs no store lookup.
pub fn share_data_url(base_url: &str, document: &CardDocument) -> Result<String> {
    let mut url = Url::parse(&format!("{}/{SHARE_PATH}", base_url.trim_end_matches('/')))?;
    url.query_pairs_mut()
        .append_pair("data", &serde_json::to_string(document)?);
    Ok(url.into())
}

/// The document persisted for one finished card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDocument {
    pub letters: Vec<CardLetter>,
    pub user_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub design: CardDesign,
    #[serde(default)]
    pub layout_direction: LayoutDirection,
    pub sign_size: u32,
    /// Creation time in milliseconds since the epoch.
    pub timestamp: i64,
}

impl CardDocument {
    pub fn from_session(
        session: &Session,
        contact: &ContactInput,
        design: CardDesign,
        layout_direction: LayoutDirection,
        sign_size: u32,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if session.is_empty() {
            return Err(CardError::EmptyName);
        }
        Ok(Self {
            letters: session
                .taps()
                .iter()
                .map(|letter| CardLetter {
                    character: letter.character,
                    image_path: letter.asset.to_string(),
                })
                .collect(),
            user_name: session.composed_name(),
            phone_number: contact.digits().to_string(),
            design,
            layout_direction,
            sign_size,
            timestamp: now.timestamp_millis(),
        })
    }

    pub fn id(&self) -> String {
        card_id(self.timestamp)
    }

    /// Reads the document back out of a [`share_data_url`] link.
    pub fn from_share_url(link: &str) -> Result<Self> {
        let url = Url::parse(link)?;
        let data = url
            .query_pairs()
            .find(|(key, _)| key == "data")
            .map(|(_, value)| value.into_owned())
            .ok_or(CardError::MissingShareData)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Tiles clustered per syllable, for rendering.
    pub fn groups(&self) -> Vec<SyllableGroup<CardLetter>> {
        group(&self.letters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session_for(chars: &str) -> Session {
        let mut session = Session::new();
        for c in chars.chars() {
            session.tap(c).unwrap();
        }
        session
    }

    #[test]
    fn card_id_is_base36_timestamp() {
        assert_eq!(card_id(1_700_000_000_000), "loyw3v28");
        assert_eq!(card_id(0), "0");
        assert_eq!(card_id(35), "z");
        assert_eq!(card_id(36), "10");
    }

    #[test]
    fn share_url_joins_base() {
        assert_eq!(
            share_url("https://kiosk.example/", "abc"),
            "https://kiosk.example/card/shared?id=abc"
        );
    }

    #[test]
    fn data_link_carries_the_whole_card() {
        let doc = CardDocument::from_session(
            &session_for("ㄱㅣㅁㅅㅜㅇㅕㅇ"),
            &ContactInput::default(),
            CardDesign::Neon,
            LayoutDirection::Vertical,
            12,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        )
        .unwrap();

        let link = share_data_url("https://kiosk.example/", &doc).unwrap();
        assert!(link.starts_with("https://kiosk.example/card/shared?data="));
        // Jamo and JSON punctuation are percent-encoded, never raw.
        assert!(!link.contains('ㄱ'));
        assert!(!link.contains('{'));

        assert_eq!(CardDocument::from_share_url(&link).unwrap(), doc);
    }

    #[test]
    fn data_link_without_data_is_rejected() {
        assert!(matches!(
            CardDocument::from_share_url("https://kiosk.example/card/shared?id=abc"),
            Err(CardError::MissingShareData)
        ));
        assert!(matches!(
            share_data_url("not a url", &sample_document()),
            Err(CardError::Url(_))
        ));
    }

    fn sample_document() -> CardDocument {
        CardDocument::from_session(
            &session_for("ㄴㅏ"),
            &ContactInput::default(),
            CardDesign::default(),
            LayoutDirection::default(),
            12,
            Utc.timestamp_millis_opt(1_000).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn phone_mask_fills_progressively() {
        assert_eq!(format_phone(""), "010-____-____");
        assert_eq!(format_phone("01"), "01_-____-____");
        assert_eq!(format_phone("01012"), "010-12__-____");
        assert_eq!(format_phone("01012345678"), "010-1234-5678");
    }

    #[test]
    fn keypad_ignores_symbols_and_overflow() {
        let mut contact = ContactInput::default();
        assert!(!contact.push_digit('*'));
        assert!(!contact.push_digit('#'));
        for c in "010123456789".chars() {
            contact.push_digit(c);
        }
        assert_eq!(contact.digits(), "01012345678");
        assert_eq!(contact.backspace(), Some('8'));
        assert_eq!(contact.formatted(), "010-1234-567_");
    }

    #[test]
    fn designs_parse_by_id() {
        assert_eq!("luxury".parse::<CardDesign>().unwrap(), CardDesign::Luxury);
        assert!(matches!(
            "rainbow".parse::<CardDesign>(),
            Err(CardError::UnknownDesign(_))
        ));
        assert_eq!("v".parse::<LayoutDirection>().unwrap(), LayoutDirection::Vertical);
        assert!(matches!(
            "diagonal".parse::<LayoutDirection>(),
            Err(CardError::UnknownLayout(_))
        ));
    }

    #[test]
    fn document_from_session() {
        let session = session_for("ㅎㅏㄴㄱㅡㄹ");
        let mut contact = ContactInput::default();
        for c in "01012345678".chars() {
            contact.push_digit(c);
        }
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let doc = CardDocument::from_session(
            &session,
            &contact,
            CardDesign::Nature,
            LayoutDirection::Vertical,
            20,
            now,
        )
        .unwrap();

        assert_eq!(doc.user_name, "한글");
        assert_eq!(doc.letters.len(), 6);
        assert_eq!(doc.letters[0].image_path, "/consonants/ㅎ.png");
        assert_eq!(doc.id(), "loyw3v28");
        assert_eq!(doc.groups().len(), 2);
    }

    #[test]
    fn empty_session_is_rejected() {
        let result = CardDocument::from_session(
            &Session::new(),
            &ContactInput::default(),
            CardDesign::default(),
            LayoutDirection::default(),
            20,
            Utc::now(),
        );
        assert!(matches!(result, Err(CardError::EmptyName)));
    }

    #[test]
    fn document_json_shape() {
        let doc = CardDocument::from_session(
            &session_for("ㅇㅏ"),
            &ContactInput::default(),
            CardDesign::Minimal,
            LayoutDirection::Horizontal,
            16,
            Utc.timestamp_millis_opt(1_000).unwrap(),
        )
        .unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["userName"], "아");
        assert_eq!(value["letters"][1]["char"], "ㅏ");
        assert_eq!(value["letters"][1]["imagePath"], "/vowels/ㅏ.png");
        assert_eq!(value["layoutDirection"], "horizontal");
        assert_eq!(value["design"], "minimal");
        assert_eq!(value["timestamp"], 1000);

        let back: CardDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }
}
