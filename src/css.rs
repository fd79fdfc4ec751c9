//! Themed stylesheet for button wrappers
//!
//! The stylesheet is a fixed template whose enabled-state colors are property
//! tokens. Braces are written as `[\{]` / `[\}]` escapes so the whole text can
//! go through one resolution pass.

use crate::document::{Document, Element, NodeId};
use crate::property::PropertyResolver;

/// Normal, hover and pressed button states take their colors from properties;
/// the disabled state is fixed
const BUTTON_STATES: &[(&str, &str)] = &[
    (".buttonwrapper a", "Normal"),
    (".buttonwrapper a:hover", "Hover"),
    (".buttonwrapper a:active", "Pressed"),
];

const DISABLED_SELECTOR: &str =
    ".buttonwrapper-disabled a, .buttonwrapper-disabled a:hover, .buttonwrapper-disabled a:active";

/// Names of the properties the button stylesheet references
pub fn button_theme_properties() -> Vec<String> {
    BUTTON_STATES
        .iter()
        .flat_map(|(_, state)| {
            [
                format!("AiWinUIBtn{}BkgColorStart", state),
                format!("AiWinUIBtn{}BkgColorEnd", state),
                format!("AiWinUIBtn{}Border", state),
            ]
        })
        .collect()
}

/// The unresolved button stylesheet
pub fn button_stylesheet_template() -> String {
    let mut lines: Vec<String> = Vec::new();

    for (selector, state) in BUTTON_STATES {
        lines.push(format!("{} [\\{{]", selector));
        lines.push(format!(
            "   background-image: linear-gradient([AiWinUIBtn{0}BkgColorStart], [AiWinUIBtn{0}BkgColorEnd]);",
            state
        ));
        lines.push(format!("   border-color: [AiWinUIBtn{}Border];", state));
        lines.push("[\\}]".to_string());
    }

    lines.push(format!("{} [\\{{]", DISABLED_SELECTOR));
    lines.push("   background-image: linear-gradient(#F5F5F5, #CACACA);".to_string());
    lines.push("   border-color: #F4F4F4;".to_string());
    lines.push("[\\}]".to_string());
    lines.push(" ".to_string());
    lines.push(" ".to_string());

    lines.join("\n")
}

/// Resolve the button stylesheet and append it to the document head
///
/// Each call appends another `<style>` element, so this belongs in page
/// setup only.
pub fn inject_button_css<R: PropertyResolver + ?Sized>(doc: &mut Document, resolver: &R) -> NodeId {
    let css = resolver.resolve_formatted(&button_stylesheet_template());
    let head = doc.ensure_head();
    let style = doc.append_element(head, Element::new("style"));
    doc.append_text(style, css);
    log::debug!("installed button stylesheet as node {}", style.index());
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyStore;
    use pretty_assertions::assert_eq;

    fn themed_store() -> PropertyStore {
        button_theme_properties()
            .into_iter()
            .enumerate()
            .fold(PropertyStore::default(), |store, (i, name)| {
                store.with_property(name, format!("#00000{}", i % 10))
            })
    }

    #[test]
    fn test_template_references_every_theme_property() {
        let template = button_stylesheet_template();
        for name in button_theme_properties() {
            assert!(template.contains(&format!("[{}]", name)), "missing {}", name);
        }
        assert_eq!(button_theme_properties().len(), 9);
    }

    #[test]
    fn test_resolved_stylesheet() {
        let store = PropertyStore::default()
            .with_property("AiWinUIBtnNormalBkgColorStart", "#FFFFFF")
            .with_property("AiWinUIBtnNormalBkgColorEnd", "#DDDDDD")
            .with_property("AiWinUIBtnNormalBorder", "#AAAAAA")
            .with_property("AiWinUIBtnHoverBkgColorStart", "#EEF6FF")
            .with_property("AiWinUIBtnHoverBkgColorEnd", "#CCE4FF")
            .with_property("AiWinUIBtnHoverBorder", "#3C7FB1")
            .with_property("AiWinUIBtnPressedBkgColorStart", "#CCE4FF")
            .with_property("AiWinUIBtnPressedBkgColorEnd", "#99C9FF")
            .with_property("AiWinUIBtnPressedBorder", "#2C628B");

        let css = store.resolve_formatted(&button_stylesheet_template());
        assert_eq!(
            css,
            "\
.buttonwrapper a {
   background-image: linear-gradient(#FFFFFF, #DDDDDD);
   border-color: #AAAAAA;
}
.buttonwrapper a:hover {
   background-image: linear-gradient(#EEF6FF, #CCE4FF);
   border-color: #3C7FB1;
}
.buttonwrapper a:active {
   background-image: linear-gradient(#CCE4FF, #99C9FF);
   border-color: #2C628B;
}
.buttonwrapper-disabled a, .buttonwrapper-disabled a:hover, .buttonwrapper-disabled a:active {
   background-image: linear-gradient(#F5F5F5, #CACACA);
   border-color: #F4F4F4;
}\n \n "
        );
    }

    #[test]
    fn test_no_tokens_remain_when_theme_defined() {
        let css = themed_store().resolve_formatted(&button_stylesheet_template());
        assert!(!css.contains('['), "unresolved token in:\n{}", css);
        assert!(!css.contains(']'));
    }

    #[test]
    fn test_inject_appends_style_to_head() {
        let store = themed_store();
        let mut doc = Document::parse("<html><head><title>t</title></head><body></body></html>").unwrap();
        let style = inject_button_css(&mut doc, &store);

        let head = doc.elements_by_tag("head")[0];
        assert_eq!(doc.parent(style), Some(head));
        assert_eq!(doc.children(head).last(), Some(&style));
        assert!(doc.inner_markup(style).starts_with(".buttonwrapper a {"));
    }

    #[test]
    fn test_inject_twice_duplicates() {
        let store = themed_store();
        let mut doc = Document::parse("<head></head>").unwrap();
        inject_button_css(&mut doc, &store);
        inject_button_css(&mut doc, &store);
        assert_eq!(doc.elements_by_tag("style").len(), 2);
    }
}
