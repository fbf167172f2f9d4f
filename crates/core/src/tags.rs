//! Hashtag detection.
//!
//! When a line ends in `#word` followed by whitespace, the hashtag is turned
//! into an inline [`Tag`] embed.

use crate::types::Tag;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// A hashtag followed by one whitespace character at the end of the text.
static TRAILING_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(#\S+)\s$").unwrap());

/// A hashtag found at the end of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Character offset of the `#` within the searched text.
    pub start: usize,

    /// The hashtag as typed, including the `#`.
    pub text: String,
}

impl TagMatch {
    /// Characters replaced by the tag: the hashtag and the whitespace after it.
    pub fn replaced_len(&self) -> usize {
        self.text.chars().count() + 1
    }

    pub fn to_tag(&self) -> Tag {
        Tag::from_hashtag(&self.text)
    }
}

impl Tag {
    /// Build a tag from `#Name`, normalizing the id to lowercase NFC.
    pub fn from_hashtag(text: &str) -> Self {
        let name = text.strip_prefix('#').unwrap_or(text);
        Self {
            id: name.nfc().collect::<String>().to_lowercase(),
            text: text.to_string(),
        }
    }
}

/// Find a hashtag that was just completed by typing whitespace.
pub fn find_trailing_tag(line: &str) -> Option<TagMatch> {
    let captures = TRAILING_TAG_REGEX.captures(line)?;
    let tag = captures.get(1)?;

    Some(TagMatch {
        start: line[..tag.start()].chars().count(),
        text: tag.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_trailing_tag() {
        let found = find_trailing_tag("Plan for #proje ").unwrap();
        assert_eq!(found.start, 9);
        assert_eq!(found.text, "#proje");
        assert_eq!(found.replaced_len(), 7);
    }

    #[test]
    fn test_no_tag_without_trailing_space() {
        assert_eq!(find_trailing_tag("Plan for #proje"), None);
        assert_eq!(find_trailing_tag("Plan for # "), None);
        assert_eq!(find_trailing_tag("#done and more "), None);
    }

    #[test]
    fn test_character_offsets() {
        let found = find_trailing_tag("Çalışma #Öğren ").unwrap();
        assert_eq!(found.start, 8);
        assert_eq!(found.text, "#Öğren");
    }

    #[test]
    fn test_tag_from_hashtag() {
        let tag = Tag::from_hashtag("#Proje");
        assert_eq!(tag.id, "proje");
        assert_eq!(tag.text, "#Proje");

        // Decomposed "é" is composed before comparison
        let tag = Tag::from_hashtag("#Cafe\u{301}");
        assert_eq!(tag.id, "caf\u{e9}");
    }
}
