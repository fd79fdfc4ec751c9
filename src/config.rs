//! Page bootstrap configuration
//!
//! ```toml
//! inject_button_css = true
//! markup_tags = ["span", "div"]
//! value_tags = ["input"]
//! show = ["footer"]
//! size_texts = ["APPDIR"]
//!
//! [[background]]
//! image_property = "BannerBitmap"
//! ids = ["banner"]
//!
//! [[gradient]]
//! class = "buttonwrapper"
//! start = "AiWinUIBtnNormalBkgColorStart"
//! end = "AiWinUIBtnNormalBkgColorEnd"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a page configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read page config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse page config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("background entry needs either image_property with ids or binary with id")]
    IncompleteBackground,
}

/// Source of a background image binding
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackgroundBinding {
    /// Property naming the binary resource (indirect reference)
    pub image_property: Option<String>,
    /// Elements receiving the indirect image
    #[serde(default)]
    pub ids: Vec<String>,
    /// Binary resource id (direct reference)
    pub binary: Option<String>,
    /// Element receiving the direct image
    pub id: Option<String>,
}

/// Gradient binding for every element of a class
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradientBinding {
    pub class: String,
    /// Property holding the first color stop
    pub start: String,
    /// Property holding the second color stop
    pub end: String,
}

/// What the page setup does, in order: stylesheet, sweeps, size texts,
/// bindings, reveals
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Install the themed button stylesheet
    pub inject_button_css: bool,
    /// Tags whose marked elements get their inner markup resolved
    pub markup_tags: Vec<String>,
    /// Tags whose marked elements get their value resolved
    pub value_tags: Vec<String>,
    /// Element ids revealed after resolution
    pub show: Vec<String>,
    /// Properties whose element shows a size text
    pub size_texts: Vec<String>,
    pub background: Vec<BackgroundBinding>,
    pub gradient: Vec<GradientBinding>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            inject_button_css: true,
            markup_tags: ["div", "span", "p", "a", "label", "h1", "h2", "h3", "li", "td"]
                .map(String::from)
                .to_vec(),
            value_tags: vec!["input".to_string(), "textarea".to_string()],
            show: Vec::new(),
            size_texts: Vec::new(),
            background: Vec::new(),
            gradient: Vec::new(),
        }
    }
}

impl PageConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let complete = |b: &BackgroundBinding| {
            (b.image_property.is_some() && !b.ids.is_empty()) || (b.binary.is_some() && b.id.is_some())
        };
        if self.background.iter().all(complete) {
            Ok(())
        } else {
            Err(ConfigError::IncompleteBackground)
        }
    }

    /// Enable or disable the button stylesheet
    pub fn with_button_css(mut self, inject: bool) -> Self {
        self.inject_button_css = inject;
        self
    }

    /// Set the tags swept for inner markup
    pub fn with_markup_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markup_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tags swept for values
    pub fn with_value_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Reveal an element after resolution
    pub fn with_show(mut self, id: impl Into<String>) -> Self {
        self.show.push(id.into());
        self
    }

    /// Show the size text of a property
    pub fn with_size_text(mut self, property: impl Into<String>) -> Self {
        self.size_texts.push(property.into());
        self
    }

    /// Bind an indirectly referenced image to elements
    pub fn with_background<I, S>(mut self, image_property: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.background.push(BackgroundBinding {
            image_property: Some(image_property.into()),
            ids: ids.into_iter().map(Into::into).collect(),
            binary: None,
            id: None,
        });
        self
    }

    /// Bind a binary resource directly to one element
    pub fn with_binary_background(mut self, binary: impl Into<String>, id: impl Into<String>) -> Self {
        self.background.push(BackgroundBinding {
            image_property: None,
            ids: Vec::new(),
            binary: Some(binary.into()),
            id: Some(id.into()),
        });
        self
    }

    /// Bind a gradient to a class
    pub fn with_gradient(
        mut self,
        class: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.gradient.push(GradientBinding {
            class: class.into(),
            start: start.into(),
            end: end.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PageConfig::default();
        assert!(config.inject_button_css);
        assert!(config.markup_tags.contains(&"span".to_string()));
        assert_eq!(config.value_tags, vec!["input", "textarea"]);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
inject_button_css = false
markup_tags = ["span"]
show = ["footer"]

[[background]]
image_property = "BannerBitmap"
ids = ["banner", "side"]

[[background]]
binary = "logo_bmp"
id = "logo"

[[gradient]]
class = "buttonwrapper"
start = "Light"
end = "Dark"
"#;
        let config = PageConfig::from_str(toml_str).expect("Should parse");
        assert!(!config.inject_button_css);
        assert_eq!(config.markup_tags, vec!["span"]);
        // Unset keys keep their defaults
        assert_eq!(config.value_tags, vec!["input", "textarea"]);
        assert_eq!(config.background.len(), 2);
        assert_eq!(config.background[1].binary.as_deref(), Some("logo_bmp"));
        assert_eq!(config.gradient[0].class, "buttonwrapper");
    }

    #[test]
    fn test_incomplete_background_rejected() {
        let toml_str = r#"
[[background]]
image_property = "BannerBitmap"
"#;
        assert!(matches!(
            PageConfig::from_str(toml_str),
            Err(ConfigError::IncompleteBackground)
        ));
    }

    #[test]
    fn test_builder() {
        let config = PageConfig::new()
            .with_button_css(false)
            .with_markup_tags(["p"])
            .with_background("BannerBitmap", ["banner"])
            .with_gradient("btn", "Light", "Dark")
            .with_show("footer");
        assert_eq!(config.markup_tags, vec!["p"]);
        assert_eq!(config.background[0].ids, vec!["banner"]);
        assert_eq!(config.show, vec!["footer"]);
    }
}
