//! End-to-end page setup

use pretty_assertions::assert_eq;

use formatted_ui::{prepare_page, render_page, PageConfig, PageError, PropertyStore, Visibility};

const PROPERTIES: &str = r##"
[properties]
ProductName = "Widget Pro"
Manufacturer = "Smith & Sons"
WelcomeTitle = "Welcome to [ProductName]"
APPDIR = "C:\\Program Files\\Widget"
BannerBitmap = "banner_bmp"
AiWinUIBtnNormalBkgColorStart = "#FFFFFF"
AiWinUIBtnNormalBkgColorEnd = "#DDDDDD"
AiWinUIBtnNormalBorder = "#AAAAAA"
AiWinUIBtnHoverBkgColorStart = "#EEF6FF"
AiWinUIBtnHoverBkgColorEnd = "#CCE4FF"
AiWinUIBtnHoverBorder = "#3C7FB1"
AiWinUIBtnPressedBkgColorStart = "#CCE4FF"
AiWinUIBtnPressedBkgColorEnd = "#99C9FF"
AiWinUIBtnPressedBorder = "#2C628B"

[binaries]
banner_bmp = "/res/banner.png"

[sizes]
RequiredSpace = 5242880
"##;

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Setup</title></head>
<body>
<div id="banner"></div>
<h1 formatted="twice">[WelcomeTitle]</h1>
<p formatted keepamp="true">Published by [Manufacturer]</p>
<input id="path" formatted value="[APPDIR]">
<span id="RequiredSpace">Needs [RequiredSpace]</span>
<div class="buttonwrapper"><a>Next</a></div>
<div id="footer" style="visibility: hidden">Footer</div>
</body>
</html>"#;

const CONFIG: &str = r#"
markup_tags = ["h1", "p"]
value_tags = ["input"]
show = ["footer"]
size_texts = ["RequiredSpace"]

[[background]]
image_property = "BannerBitmap"
ids = ["banner", "missing"]

[[gradient]]
class = "buttonwrapper"
start = "AiWinUIBtnHoverBkgColorStart"
end = "AiWinUIBtnHoverBkgColorEnd"

[[gradient]]
class = "not.a.class"
start = "AiWinUIBtnHoverBkgColorStart"
end = "AiWinUIBtnHoverBkgColorEnd"
"#;

#[test]
fn test_full_page_setup() {
    let store = PropertyStore::from_str(PROPERTIES).expect("Should parse properties");
    let config = PageConfig::from_str(CONFIG).expect("Should parse config");

    let page = prepare_page(PAGE, &store, &config).expect("Should prepare");
    let doc = &page.document;

    let h1 = doc.elements_by_tag("h1")[0];
    assert_eq!(doc.inner_markup(h1), "Welcome to Widget Pro");

    let p = doc.elements_by_tag("p")[0];
    assert_eq!(doc.inner_markup(p), "Published by Smith &amp; Sons");

    let path = doc.element_by_id("path").unwrap();
    assert_eq!(doc.value(path).as_deref(), Some("C:\\Program Files\\Widget"));

    let space = doc.element_by_id("RequiredSpace").unwrap();
    assert_eq!(doc.inner_markup(space), "Needs 5.0 MB");

    let banner = doc.element_by_id("banner").unwrap();
    assert_eq!(
        doc.element(banner).unwrap().style.get("background-image"),
        Some("url(file:///res/banner.png)")
    );

    let wrapper = doc.elements_by_class("buttonwrapper").unwrap()[0];
    assert_eq!(
        doc.element(wrapper).unwrap().style.get("background-image"),
        Some("linear-gradient(#EEF6FF, #CCE4FF)")
    );

    let footer = doc.element_by_id("footer").unwrap();
    assert_eq!(doc.element(footer).unwrap().visibility, Visibility::Visible);

    // The bad class selector is reported, not fatal
    assert_eq!(page.failures.len(), 1);

    let head = doc.elements_by_tag("head")[0];
    let style = doc.elements_by_tag("style")[0];
    assert_eq!(doc.parent(style), Some(head));
    assert!(doc.inner_markup(style).contains("border-color: #2C628B;"));
}

#[test]
fn test_rendered_markup() {
    let store = PropertyStore::default().with_property("ProductName", "Widget");
    let config = PageConfig::new()
        .with_button_css(false)
        .with_markup_tags(["span"])
        .with_value_tags(Vec::<String>::new());

    let html = render_page(
        r#"<div><span formatted>[ProductName] & more</span><span formatted>[Unknown]</span></div>"#,
        &store,
        &config,
    )
    .expect("Should render");

    assert_eq!(
        html,
        r#"<div><span formatted style="visibility: visible">Widget  more</span><span formatted style="visibility: visible">[Unknown]</span></div>"#
    );
}

#[test]
fn test_default_config_resolves_textarea_text() {
    let store = PropertyStore::default().with_property("License", "EULA text");
    let html = render_page(
        r#"<textarea formatted>[License]</textarea>"#,
        &store,
        &PageConfig::new().with_button_css(false),
    )
    .expect("Should render");

    assert_eq!(
        html,
        r#"<textarea formatted style="visibility: visible">EULA text</textarea>"#
    );
}

#[test]
fn test_unmarked_tags_left_hidden_when_not_swept() {
    let store = PropertyStore::default().with_property("ProductName", "Widget");
    let config = PageConfig::new().with_button_css(false).with_markup_tags(["p"]);

    let page = prepare_page(r#"<span formatted>[ProductName]</span>"#, &store, &config).unwrap();
    let span = page.document.elements_by_tag("span")[0];
    assert_eq!(
        page.document.element(span).unwrap().visibility,
        Visibility::Hidden
    );
    assert_eq!(page.document.inner_markup(span), "[ProductName]");
}

#[test]
fn test_stylesheet_created_without_head() {
    let store = PropertyStore::default();
    let page = prepare_page("<body></body>", &store, &PageConfig::default()).unwrap();
    let markup = page.to_markup();
    assert!(markup.starts_with("<head><style>.buttonwrapper a {"));
}

#[test]
fn test_malformed_page_reports_parse_errors() {
    let store = PropertyStore::default();
    let result = prepare_page("<div><p>text</div>", &store, &PageConfig::default());
    match result {
        Err(PageError::Parse(errors)) => {
            assert!(!errors.is_empty());
            let report = errors[0].format("<div><p>text</div>", "page.html");
            assert!(report.contains("page.html"));
        }
        Ok(_) => panic!("Expected parse error"),
    }
}
