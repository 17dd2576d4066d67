// tests/html_locators.rs
//
// Locator evaluation against inline HTML fixtures.
//
use scraper::Html;
use ub_airlog::core::html::{resolve, visible_text};
use ub_airlog::error::PageError;
use ub_airlog::page::Locator::{Css, Pattern};

const STATION: &str = r#"
<html><head><style>.x { color: red }</style><script>var t = "99 µg/m³";</script></head>
<body>
  <div id="main-content">
    <h2>  Air quality  </h2>
    <p class="v">34</p>
    <p class="v">
       12
    </p>
    <p class="empty">   </p>
    <div class="when">Local time: 15:00, Jan 26</div>
    <span>PM2.5 concentration 34 µg/m³</span>
  </div>
</body></html>
"#;

fn doc() -> Html {
    Html::parse_document(STATION)
}

#[test]
fn css_takes_first_match_trimmed() {
    assert_eq!(resolve(&doc(), &Css("#main-content > h2")).unwrap().as_deref(), Some("Air quality"));
    assert_eq!(resolve(&doc(), &Css("p.v")).unwrap().as_deref(), Some("34"));
}

#[test]
fn missing_or_blank_is_none() {
    assert_eq!(resolve(&doc(), &Css("#nope")).unwrap(), None);
    assert_eq!(resolve(&doc(), &Css("p.empty")).unwrap(), None);
}

#[test]
fn nth_of_type_paths_resolve() {
    let sel = "#main-content > p:nth-of-type(2)";
    assert_eq!(resolve(&doc(), &Css(sel)).unwrap().as_deref(), Some("12"));
}

#[test]
fn pattern_reads_visible_text_only() {
    let got = resolve(&doc(), &Pattern(r"(\d+(?:\.\d+)?\s*µg/m³)")).unwrap();
    assert_eq!(got.as_deref(), Some("34 µg/m³"));

    let text = visible_text(&doc());
    assert!(!text.contains("var t"));
    assert!(!text.contains("color"));
    assert!(text.contains("Local time: 15:00, Jan 26"));
}

#[test]
fn pattern_without_group_returns_whole_match() {
    let got = resolve(&doc(), &Pattern(r"Local time: \d+:\d+")).unwrap();
    assert_eq!(got.as_deref(), Some("Local time: 15:00"));
}

#[test]
fn bad_locators_are_errors() {
    assert!(matches!(resolve(&doc(), &Css("p[")), Err(PageError::Locator { .. })));
    assert!(matches!(resolve(&doc(), &Pattern("(")), Err(PageError::Locator { .. })));
}
