//! Formatted UI - property-driven resolution of page templates
//!
//! This library resolves `[Property]` tokens embedded in page markup against a
//! host property store. Marked elements are resolved from the template captured
//! on their first pass, revealed once resolved, and can have their backgrounds
//! bound to image resources or color gradients.
//!
//! # Example
//!
//! ```rust
//! use formatted_ui::{render_page, PageConfig, PropertyStore};
//!
//! let store = PropertyStore::default().with_property("ProductName", "Widget");
//! let config = PageConfig::new().with_button_css(false);
//!
//! let html = render_page(r#"<p formatted>Install [ProductName]</p>"#, &store, &config).unwrap();
//! assert_eq!(html, r#"<p formatted style="visibility: visible">Install Widget</p>"#);
//! ```

pub mod binder;
pub mod config;
pub mod css;
pub mod document;
pub mod error;
pub mod format;
pub mod markup;
pub mod property;

pub use binder::{BindError, Binder};
pub use config::{ConfigError, PageConfig};
pub use css::inject_button_css;
pub use document::{Document, Element, NodeId, Visibility};
pub use error::{FormatError, ParseError, SelectorError};
pub use format::{FormatMode, FormatOptions, Formatter};
pub use property::{PropertyResolver, PropertyStore, StoreError};

use thiserror::Error;

/// Errors that can occur while preparing a page
#[derive(Debug, Error)]
pub enum PageError {
    /// Error during parsing
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),
}

impl From<Vec<ParseError>> for PageError {
    fn from(errors: Vec<ParseError>) -> Self {
        PageError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A resolved page and the bindings that could not be applied
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    pub failures: Vec<BindError>,
}

impl Page {
    pub fn to_markup(&self) -> String {
        self.document.to_markup()
    }
}

/// Parse and set up a page
///
/// Steps run in this order: button stylesheet, value sweeps, markup sweeps,
/// size texts, background and gradient bindings, reveals.
pub fn prepare_page<R: PropertyResolver + ?Sized>(
    source: &str,
    resolver: &R,
    config: &PageConfig,
) -> Result<Page, PageError> {
    let mut document = Document::parse(source)?;

    if config.inject_button_css {
        inject_button_css(&mut document, resolver);
    }

    let formatter = Formatter::new(resolver);
    for tag in &config.value_tags {
        formatter.sweep_values(&mut document, tag);
    }
    for tag in &config.markup_tags {
        formatter.sweep(&mut document, tag);
    }
    for property in &config.size_texts {
        formatter.update_size_text(&mut document, property);
    }

    let mut binder = Binder::new(resolver);
    for binding in &config.background {
        if let Some(property) = &binding.image_property {
            binder.bind_background_indirect_many(&mut document, property, binding.ids.as_slice());
        }
        if let (Some(binary), Some(id)) = (&binding.binary, &binding.id) {
            binder.bind_background(&mut document, binary, id);
        }
    }
    for gradient in &config.gradient {
        binder.bind_gradient_by_class(&mut document, &gradient.start, &gradient.end, &gradient.class);
    }

    for id in &config.show {
        if !document.show_by_id(id) {
            log::debug!("nothing to reveal for id '{}'", id);
        }
    }

    Ok(Page {
        document,
        failures: binder.into_failures(),
    })
}

/// Prepare a page and serialize the result
pub fn render_page<R: PropertyResolver + ?Sized>(
    source: &str,
    resolver: &R,
    config: &PageConfig,
) -> Result<String, PageError> {
    let page = prepare_page(source, resolver, config)?;
    for failure in &page.failures {
        log::warn!("{}", failure);
    }
    Ok(page.to_markup())
}
