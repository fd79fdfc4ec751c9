//! Resolution of marked elements and tag sweeps

use crate::document::{Document, NodeId, Payload};
use crate::error::FormatError;
use crate::property::PropertyResolver;

use super::mode::{replace_first, FormatOptions};

/// Resolves marked elements against a [`PropertyResolver`]
pub struct Formatter<'r, R: PropertyResolver + ?Sized> {
    resolver: &'r R,
}

impl<'r, R: PropertyResolver + ?Sized> Formatter<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self { resolver }
    }

    /// Run the substitution passes and text policies over a template
    pub fn resolve_text(&self, template: &str, options: FormatOptions) -> String {
        let mut text = template.to_string();
        for _ in 0..options.mode.passes() {
            text = self.resolver.resolve_formatted(&text);
        }
        options.apply_policies(&text)
    }

    /// Resolve an element's inner markup and reveal it
    pub fn resolve_element(&self, doc: &mut Document, id: NodeId) -> Result<(), FormatError> {
        self.resolve(doc, id, Payload::InnerMarkup)
    }

    /// Resolve a form field's value and reveal it
    pub fn resolve_value(&self, doc: &mut Document, id: NodeId) -> Result<(), FormatError> {
        self.resolve(doc, id, Payload::Value)
    }

    fn resolve(&self, doc: &mut Document, id: NodeId, payload: Payload) -> Result<(), FormatError> {
        let element = doc
            .element(id)
            .ok_or(FormatError::NotAnElement { node: id.index() })?;
        let options =
            FormatOptions::from_element(element).ok_or_else(|| FormatError::MissingMarker {
                tag: element.tag.clone(),
            })?;

        let template = doc
            .capture_template(id, payload)
            .ok_or(FormatError::NotAnElement { node: id.index() })?;
        let resolved = self.resolve_text(&template, options);
        log::debug!(
            "resolved node {} ({:?}): {:?} -> {:?}",
            id.index(),
            options.mode,
            template,
            resolved
        );

        doc.set_payload(id, payload, &resolved);
        doc.show(id);
        Ok(())
    }

    /// Resolve the inner markup of every marked element with the given tag
    ///
    /// Returns the number of elements resolved.
    pub fn sweep(&self, doc: &mut Document, tag: &str) -> usize {
        self.sweep_payload(doc, tag, Payload::InnerMarkup)
    }

    /// Resolve the value of every marked form field with the given tag
    pub fn sweep_values(&self, doc: &mut Document, tag: &str) -> usize {
        self.sweep_payload(doc, tag, Payload::Value)
    }

    fn sweep_payload(&self, doc: &mut Document, tag: &str, payload: Payload) -> usize {
        let mut resolved = 0;
        let mut index = 0;

        // The tag list is re-queried after every step so elements created by
        // resolving an earlier element are visited too
        loop {
            let Some(id) = doc.elements_by_tag(tag).get(index).copied() else {
                break;
            };
            index += 1;

            if !doc.element(id).is_some_and(|el| el.is_templated()) {
                continue;
            }
            match self.resolve(doc, id, payload) {
                Ok(()) => resolved += 1,
                Err(e) => log::warn!("skipping <{}> node {}: {}", tag, id.index(), e),
            }
        }

        log::debug!("swept <{}>: {} element(s) resolved", tag, resolved);
        resolved
    }

    /// Fill the element whose id is `property` with the property's size text
    ///
    /// The template is resolved, its first `[property]` token replaced by the
    /// byte count text, and the result resolved again. Returns `false` when no
    /// such element exists.
    pub fn update_size_text(&self, doc: &mut Document, property: &str) -> bool {
        let Some(id) = doc.element_by_id(property) else {
            return false;
        };
        let Some(template) = doc.capture_template(id, Payload::InnerMarkup) else {
            return false;
        };

        let text = self.resolver.resolve_formatted(&template);
        let token = format!("[{}]", property);
        let text = replace_first(&text, &token, &self.resolver.byte_count_text(property));
        let text = self.resolver.resolve_formatted(&text);

        doc.set_inner_markup(id, &text);
        doc.show(id);
        true
    }
}
