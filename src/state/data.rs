/// Shared data structures for the record table
///
/// These structs represent one row of the listing file and the
/// tag vocabulary written into it.

use std::fmt;

/// Symbol written for a "true" / pass main tag
pub const TRUE_SYMBOL: &str = "맞";
/// Symbol written for a "false" / fail main tag
pub const FALSE_SYMBOL: &str = "틀";

/// The primary binary label of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MainTag {
    #[default]
    True,
    False,
}

impl MainTag {
    /// Both tags, in the order they are offered to the operator
    pub const ALL: [MainTag; 2] = [MainTag::True, MainTag::False];

    /// The single-character symbol stored in the tag cell
    pub fn symbol(self) -> &'static str {
        match self {
            MainTag::True => TRUE_SYMBOL,
            MainTag::False => FALSE_SYMBOL,
        }
    }

    /// Combine this main tag with a free-text sub tag into a tag cell value
    pub fn compose(self, sub_tag: &str) -> String {
        format!("{}{}", self.symbol(), sub_tag)
    }
}

impl fmt::Display for MainTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Represents a single image entry in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Path to the image, relative to the working directory or absolute
    pub filename: String,
    /// Model prediction (read-only in the viewer)
    pub prediction: String,
    /// Tag set by the operator; None until the row is tagged
    pub tag: Option<String>,
    /// Confidence score or description (display only)
    pub score: String,
}

impl Record {
    /// Create an untagged record
    pub fn new(filename: impl Into<String>, prediction: impl Into<String>, score: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            prediction: prediction.into(),
            tag: None,
            score: score.into(),
        }
    }

    /// Tag text for display; blank while untagged
    pub fn tag_text(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_empty_sub_tag() {
        assert_eq!(MainTag::True.compose(""), "맞");
        assert_eq!(MainTag::False.compose(""), "틀");
    }

    #[test]
    fn test_compose_appends_sub_tag() {
        assert_eq!(MainTag::False.compose("blurry"), "틀blurry");
    }

    #[test]
    fn test_new_record_is_untagged() {
        let record = Record::new("a.jpg", "P", "example_000");
        assert_eq!(record.tag, None);
        assert_eq!(record.tag_text(), "");
    }
}
