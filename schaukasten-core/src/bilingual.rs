//! Bilingual text fields.
//!
//! The feed packs a German and an English variant into one text field. Titles
//! are separated by `|`, descriptions by a run of three or more `-` or `_`
//! characters. Fields without a usable separator are shown in both languages
//! unchanged.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder shown when a title has a separator but no German part.
pub const NO_TITLE: &str = "no title";

/// Line-break marker that survives markup stripping.
pub const LINE_BREAK: &str = "<br/>";

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>\n]*>").expect("markup pattern is valid"));

static DESCRIPTION_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]{3,}").expect("delimiter pattern is valid"));

const TITLE_DELIMITER: char = '|';

/// The two language slots of a bilingual field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    /// Primary slot.
    #[serde(rename = "de")]
    German,
    /// Secondary slot.
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::German, Language::English];

    pub fn code(self) -> &'static str {
        match self {
            Language::German => "de",
            Language::English => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" | "german" | "deutsch" => Ok(Language::German),
            "en" | "english" | "englisch" => Ok(Language::English),
            other => Err(format!("Unknown language '{}'. Expected 'de' or 'en'", other)),
        }
    }
}

/// An immutable German/English text pair.
///
/// `secondary` falls back to `primary` when no English variant was given, so
/// it is only ever empty when `primary` is empty too.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BilingualText {
    primary: String,
    secondary: String,
}

impl BilingualText {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        let primary = primary.into();
        let secondary = secondary.into();
        let secondary = if secondary.is_empty() {
            primary.clone()
        } else {
            secondary
        };
        BilingualText { primary, secondary }
    }

    /// Same text in both slots.
    pub fn monolingual(text: impl Into<String>) -> Self {
        let text = text.into();
        BilingualText {
            secondary: text.clone(),
            primary: text,
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::German => &self.primary,
            Language::English => &self.secondary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Remove markup except [`LINE_BREAK`] and turn non-breaking spaces into spaces.
fn clean(raw: &str) -> String {
    MARKUP_TAG
        .replace_all(raw, |caps: &regex::Captures| {
            if &caps[0] == LINE_BREAK {
                LINE_BREAK.to_string()
            } else {
                String::new()
            }
        })
        .replace('\u{a0}', " ")
}

/// Split a raw description into its German and English parts.
///
/// Exactly one delimiter run yields two parts; anything else is treated as a
/// monolingual description.
pub fn split_description(raw: &str) -> BilingualText {
    let cleaned = clean(raw);
    let segments: Vec<&str> = DESCRIPTION_DELIMITER.split(&cleaned).collect();

    match segments.as_slice() {
        [primary, secondary] => BilingualText::new(primary.trim(), secondary.trim()),
        _ => BilingualText::monolingual(cleaned.trim()),
    }
}

/// Split a raw summary into its German and English titles.
///
/// A blank summary stays empty (such events are dropped later). A summary
/// whose German part is empty gets [`NO_TITLE`].
pub fn split_title(raw: &str) -> BilingualText {
    let cleaned = clean(raw);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return BilingualText::default();
    }

    let segments: Vec<&str> = cleaned.split(TITLE_DELIMITER).collect();
    let (primary, secondary) = match segments.as_slice() {
        [primary, secondary] => (primary.trim(), secondary.trim()),
        _ => (cleaned, cleaned),
    };

    if primary.is_empty() {
        BilingualText::new(NO_TITLE, secondary)
    } else {
        BilingualText::new(primary, secondary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_description_with_dash_delimiter() {
        let text = split_description("Hallo Welt---Hello World");
        assert_eq!(text.primary(), "Hallo Welt");
        assert_eq!(text.secondary(), "Hello World");
    }

    #[test]
    fn test_description_without_delimiter_is_monolingual() {
        let text = split_description("Nur Deutsch");
        assert_eq!(text.primary(), "Nur Deutsch");
        assert_eq!(text.secondary(), "Nur Deutsch");
    }

    #[test]
    fn test_description_with_underscore_and_mixed_runs() {
        let text = split_description("Kommt vorbei!\n_______________\nCome by!");
        assert_eq!(text.primary(), "Kommt vorbei!");
        assert_eq!(text.secondary(), "Come by!");

        let text = split_description("Eins -- Zwei _ Drei");
        assert_eq!(text.primary(), "Eins -- Zwei _ Drei", "runs shorter than three do not split");

        let text = split_description("Eins-_-Zwei");
        assert_eq!(text.primary(), "Eins");
        assert_eq!(text.secondary(), "Zwei");
    }

    #[test]
    fn test_description_with_two_delimiters_falls_back() {
        let text = split_description("a ---- b ---- c");
        assert_eq!(text.primary(), "a ---- b ---- c");
        assert_eq!(text.secondary(), "a ---- b ---- c");
    }

    #[test]
    fn test_description_trailing_delimiter_defaults_secondary() {
        let text = split_description("Nur Deutsch\n----");
        assert_eq!(text.primary(), "Nur Deutsch");
        assert_eq!(text.secondary(), "Nur Deutsch");
    }

    #[test]
    fn test_markup_is_stripped_except_line_breaks() {
        let text = split_description("<b>Hallo</b><br/>Welt<span style=\"x\">!</span>");
        assert_eq!(text.primary(), "Hallo<br/>Welt!");
    }

    #[test]
    fn test_non_breaking_spaces_are_replaced() {
        let text = split_description("Hallo\u{a0}Welt ---\u{a0}Hello\u{a0}World");
        assert_eq!(text.primary(), "Hallo Welt");
        assert_eq!(text.secondary(), "Hello World");
    }

    #[test]
    fn test_title_with_pipe() {
        let title = split_title("Filmabend | Movie Night");
        assert_eq!(title.get(Language::German), "Filmabend");
        assert_eq!(title.get(Language::English), "Movie Night");
    }

    #[test]
    fn test_title_without_pipe() {
        let title = split_title("Plenum");
        assert_eq!(title.primary(), "Plenum");
        assert_eq!(title.secondary(), "Plenum");
    }

    #[test]
    fn test_title_ignores_dash_runs() {
        let title = split_title("Queer---Café");
        assert_eq!(title.primary(), "Queer---Café");
    }

    #[test]
    fn test_title_with_empty_primary_gets_placeholder() {
        let title = split_title(" | Movie Night");
        assert_eq!(title.primary(), NO_TITLE);
        assert_eq!(title.secondary(), "Movie Night");
    }

    #[test]
    fn test_blank_title_stays_empty() {
        assert!(split_title("").is_empty());
        assert!(split_title("  <b></b> ").is_empty());
    }

    #[test]
    fn test_title_with_two_pipes_falls_back() {
        let title = split_title("A | B | C");
        assert_eq!(title.primary(), "A | B | C");
        assert_eq!(title.secondary(), "A | B | C");
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("de".parse::<Language>(), Ok(Language::German));
        assert_eq!("English".parse::<Language>(), Ok(Language::English));
        assert!("fr".parse::<Language>().is_err());
        assert_eq!(Language::English.to_string(), "en");
    }

    fn segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9äöüß][A-Za-z0-9äöüß .,!?]{0,30}".prop_map(|s| s.trim_end().to_string())
    }

    proptest! {
        #[test]
        fn prop_description_roundtrip(primary in segment(), secondary in segment()) {
            let joined = format!("{}\n----\n{}", primary, secondary);
            let text = split_description(&joined);
            prop_assert_eq!(text.primary(), primary.as_str());
            prop_assert_eq!(text.secondary(), secondary.as_str());
        }

        #[test]
        fn prop_title_roundtrip(primary in segment(), secondary in segment()) {
            let text = split_title(&format!("{} | {}", primary, secondary));
            prop_assert_eq!(text.primary(), primary.as_str());
            prop_assert_eq!(text.secondary(), secondary.as_str());
        }
    }
}
