//! Property store: the host side of template resolution
//!
//! [`PropertyResolver`] is the contract the formatting pipeline, binder and
//! stylesheet injector depend on. [`PropertyStore`] is a TOML-backed
//! implementation with installer-style `[Name]` substitution.

use std::collections::HashMap;
use std::path::Path;

use logos::Logos;
use serde::Deserialize;
use thiserror::Error;

/// Host collaborator that owns property values and binary resources
pub trait PropertyResolver {
    /// Substitute every bracketed token in `text`
    fn resolve_formatted(&self, text: &str) -> String;

    /// Path of the binary resource named by the value of `property`
    fn binary_path_indirect(&self, property: &str) -> String;

    /// Path of the binary resource with the given id
    fn binary_path(&self, binary_id: &str) -> String;

    /// Raw value of a property
    fn property(&self, name: &str) -> String;

    /// Human readable size of the resource referenced by `property`
    fn byte_count_text(&self, property: &str) -> String;
}

/// Errors that can occur when loading a property store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read property file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse property TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Properties, binary resources and resource sizes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyStore {
    /// Property name -> value
    #[serde(default)]
    pub properties: HashMap<String, String>,
    /// Binary id -> file path
    #[serde(default)]
    pub binaries: HashMap<String, String>,
    /// Property name -> size in bytes
    #[serde(default)]
    pub sizes: HashMap<String, u64>,
}

/// Pieces of formatted text
#[derive(Logos, Debug, Clone, PartialEq)]
enum Segment {
    /// `[\c]` yields the literal character `c`
    #[regex(r"\[\\.\]")]
    Escape,

    #[regex(r"\[[a-zA-Z_][a-zA-Z0-9_.]*\]")]
    Property,

    #[regex(r"[^\[]+")]
    Literal,

    #[token("[")]
    Bracket,
}

impl PropertyStore {
    /// Load a property store from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a property store from a TOML string
    pub fn from_str(content: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(content)?)
    }

    /// Define or replace a property
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder form of [`PropertyStore::set_property`]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Register a binary resource path
    pub fn with_binary(mut self, id: impl Into<String>, path: impl Into<String>) -> Self {
        self.binaries.insert(id.into(), path.into());
        self
    }

    /// Register the size of a sized resource
    pub fn with_size(mut self, property: impl Into<String>, bytes: u64) -> Self {
        self.sizes.insert(property.into(), bytes);
        self
    }
}

impl PropertyResolver for PropertyStore {
    fn resolve_formatted(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut lexer = Segment::lexer(text);

        while let Some(segment) = lexer.next() {
            let slice = lexer.slice();
            match segment {
                Ok(Segment::Escape) => out.push_str(&slice[2..slice.len() - 1]),
                Ok(Segment::Property) => {
                    let name = &slice[1..slice.len() - 1];
                    match self.properties.get(name) {
                        Some(value) => out.push_str(value),
                        // Undefined properties pass through untouched
                        None => out.push_str(slice),
                    }
                }
                Ok(Segment::Literal) | Ok(Segment::Bracket) | Err(_) => out.push_str(slice),
            }
        }

        out
    }

    fn binary_path_indirect(&self, property: &str) -> String {
        self.binary_path(&self.property(property))
    }

    fn binary_path(&self, binary_id: &str) -> String {
        match self.binaries.get(binary_id) {
            Some(path) => path.clone(),
            None => {
                log::warn!("unknown binary resource '{}'", binary_id);
                String::new()
            }
        }
    }

    fn property(&self, name: &str) -> String {
        self.properties.get(name).cloned().unwrap_or_default()
    }

    fn byte_count_text(&self, property: &str) -> String {
        format_byte_count(self.sizes.get(property).copied().unwrap_or(0))
    }
}

/// Format a byte count with binary units
pub fn format_byte_count(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} bytes", bytes);
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
