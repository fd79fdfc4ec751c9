//! Formatting modes and text policies

use crate::document::{Element, FORMATTED_MARKER};

/// Attribute that keeps the first ampersand as an entity
pub const KEEP_AMPERSAND: &str = "keepamp";

/// How many substitution passes run and whether angle brackets are stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// One substitution pass
    #[default]
    Plain,
    /// A second pass over the substituted text, for tokens whose value is a token
    Double,
    /// One pass, then the first `<` and the first `>` are removed
    SanitizeAngleBrackets,
}

impl FormatMode {
    /// Interpret the value of the `formatted` marker
    pub fn from_marker(value: &str) -> Self {
        match value {
            "twice" | "double" => FormatMode::Double,
            "noarrow" | "sanitize-angle-brackets" => FormatMode::SanitizeAngleBrackets,
            _ => FormatMode::Plain,
        }
    }

    /// Number of substitution passes
    pub fn passes(self) -> usize {
        match self {
            FormatMode::Double => 2,
            FormatMode::Plain | FormatMode::SanitizeAngleBrackets => 1,
        }
    }
}

/// Formatting declared by an element's attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatOptions {
    pub mode: FormatMode,
    pub preserve_ampersand: bool,
}

impl FormatOptions {
    /// Read the options of a marked element; `None` without the marker
    pub fn from_element(element: &Element) -> Option<Self> {
        let marker = element.attribute(FORMATTED_MARKER)?;
        Some(Self {
            mode: FormatMode::from_marker(marker),
            preserve_ampersand: element.attribute(KEEP_AMPERSAND) == Some("true"),
        })
    }

    pub fn with_mode(mut self, mode: FormatMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_preserve_ampersand(mut self, preserve: bool) -> Self {
        self.preserve_ampersand = preserve;
        self
    }

    /// Post-substitution policies: angle brackets for the sanitizing mode,
    /// then the ampersand policy
    pub fn apply_policies(&self, text: &str) -> String {
        let text = match self.mode {
            FormatMode::SanitizeAngleBrackets => remove_first(&remove_first(text, '<'), '>'),
            FormatMode::Plain | FormatMode::Double => text.to_string(),
        };
        apply_ampersand_policy(&text, self.preserve_ampersand)
    }
}

/// Escape (`&amp;`) or drop the first `&` only
pub fn apply_ampersand_policy(text: &str, preserve: bool) -> String {
    if preserve {
        replace_first(text, "&", "&amp;")
    } else {
        remove_first(text, '&')
    }
}

/// Replace the first occurrence of `pattern` only
pub fn replace_first(text: &str, pattern: &str, replacement: &str) -> String {
    text.replacen(pattern, replacement, 1)
}

/// Remove the first occurrence of `ch` only
pub fn remove_first(text: &str, ch: char) -> String {
    let mut buf = [0u8; 4];
    replace_first(text, ch.encode_utf8(&mut buf), "")
}
