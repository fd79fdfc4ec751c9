//! Background bindings driven by property values
//!
//! Image bindings resolve a binary resource to a file path and set it as the
//! element's `background-image`; gradient bindings combine two color
//! properties. Targets missing from the page are skipped silently. A failing
//! class lookup is logged and recorded, and never stops later bindings.

use thiserror::Error;

use crate::document::Document;
use crate::error::SelectorError;
use crate::property::PropertyResolver;

const BACKGROUND_IMAGE: &str = "background-image";

/// A binding that could not be applied
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    #[error("gradient binding for class '{class}' failed: {source}")]
    ClassLookup {
        class: String,
        #[source]
        source: SelectorError,
    },
}

/// Applies background bindings and collects their failures
pub struct Binder<'r, R: PropertyResolver + ?Sized> {
    resolver: &'r R,
    failures: Vec<BindError>,
}

impl<'r, R: PropertyResolver + ?Sized> Binder<'r, R> {
    pub fn new(resolver: &'r R) -> Self {
        Self {
            resolver,
            failures: Vec::new(),
        }
    }

    /// Failures recorded so far
    pub fn failures(&self) -> &[BindError] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<BindError> {
        self.failures
    }

    /// Bind the image named by `image_property` to the element `id`
    pub fn bind_background_indirect(&mut self, doc: &mut Document, image_property: &str, id: &str) {
        let url = file_url(&self.resolver.binary_path_indirect(image_property));
        set_background_by_id(doc, id, &url);
    }

    /// Bind the image named by `image_property` to every listed element
    pub fn bind_background_indirect_many<S: AsRef<str>>(
        &mut self,
        doc: &mut Document,
        image_property: &str,
        ids: &[S],
    ) {
        let url = file_url(&self.resolver.binary_path_indirect(image_property));
        for id in ids {
            set_background_by_id(doc, id.as_ref(), &url);
        }
    }

    /// Bind the binary resource `binary_id` to the element `id`
    pub fn bind_background(&mut self, doc: &mut Document, binary_id: &str, id: &str) {
        let url = file_url(&self.resolver.binary_path(binary_id));
        set_background_by_id(doc, id, &url);
    }

    /// Bind a two-stop gradient built from two color properties to every
    /// element of a class
    ///
    /// Returns the number of elements updated; a lookup failure is recorded
    /// and counts as zero.
    pub fn bind_gradient_by_class(
        &mut self,
        doc: &mut Document,
        start_property: &str,
        end_property: &str,
        class: &str,
    ) -> usize {
        let gradient = linear_gradient(
            &self.resolver.property(start_property),
            &self.resolver.property(end_property),
        );

        let targets = match doc.elements_by_class(class) {
            Ok(targets) => targets,
            Err(source) => {
                let err = BindError::ClassLookup {
                    class: class.to_string(),
                    source,
                };
                log::error!("{}", err);
                self.failures.push(err);
                return 0;
            }
        };

        for id in &targets {
            if let Some(el) = doc.element_mut(*id) {
                el.style.set(BACKGROUND_IMAGE, gradient.as_str());
            }
        }
        targets.len()
    }
}

fn set_background_by_id(doc: &mut Document, id: &str, value: &str) {
    let Some(node) = doc.element_by_id(id) else {
        log::debug!("no element with id '{}', background not bound", id);
        return;
    };
    if let Some(el) = doc.element_mut(node) {
        el.style.set(BACKGROUND_IMAGE, value);
    }
}

/// CSS `url()` for a local file
pub fn file_url(path: &str) -> String {
    format!("url(file://{})", path)
}

/// CSS two-stop vertical gradient
pub fn linear_gradient(start: &str, end: &str) -> String {
    format!("linear-gradient({}, {})", start, end)
}
