//! Extraction tests.
//!
//! End-to-end behaviour of `run` / `run_with`: record creation, markup and
//! text extraction, the heading hierarchy, anchors, identity and ranking.

use blockdex::{Error, Extractor, Options, fingerprint, run, run_with};
use serde_json::json;

fn contents(html: &str) -> Vec<String> {
    run(html)
        .unwrap()
        .into_records()
        .into_iter()
        .map(|record| record.content)
        .collect()
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_load_from_string() {
    assert_eq!(run("<p>foo</p>").unwrap().len(), 1);
}

#[test]
fn test_selector_override() {
    let options = Options::default().with_css_selector("div");
    assert_eq!(run_with("<div>foo</div>", &options).unwrap().len(), 1);
    assert!(run("<div>foo</div>").unwrap().is_empty());
}

#[test]
fn test_record_exposes_element() {
    let extraction = run(r#"<p class="x">foo</p>"#).unwrap();
    let element = extraction.element(&extraction[0]);

    assert_eq!(element.tag_name(), "p");
    assert_eq!(element.attr("class"), Some("x"));
}

#[test]
fn test_empty_elements_are_removed() {
    assert!(run("<p></p>").unwrap().is_empty());
    assert!(run("<p>   \n\t </p>").unwrap().is_empty());
}

#[test]
fn test_positions_follow_document_order() {
    let extraction = run(
        "<p>foo</p>
         <p>bar</p>
         <p>baz</p>",
    )
    .unwrap();

    let positions: Vec<_> = extraction
        .records()
        .iter()
        .map(|record| record.custom_ranking.position)
        .collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn test_positions_skip_dropped_candidates() {
    let extraction = run("<p>foo</p><p></p><p>bar</p>").unwrap();
    assert_eq!(extraction.len(), 2);
    assert_eq!(extraction[1].content, "bar");
    assert_eq!(extraction[1].custom_ranking.position, 1);
}

#[test]
fn test_nested_matches_are_separate_records() {
    let options = Options::default().with_css_selector("div");
    let extraction = run_with("<div>outer<div>inner</div></div>", &options).unwrap();

    assert_eq!(extraction.len(), 2);
    assert_eq!(extraction[0].content, "outerinner");
    assert_eq!(extraction[1].content, "inner");
}

#[test]
fn test_no_match_is_empty() {
    let options = Options::default().with_css_selector("article");
    assert!(run_with("<p>foo</p>", &options).unwrap().is_empty());
    assert!(run("").unwrap().is_empty());
}

#[test]
fn test_template_contents_are_not_records() {
    assert_eq!(
        contents("<template><p>hidden</p></template><p>shown</p>"),
        vec!["shown"]
    );
}

#[test]
fn test_deeply_nested_document() {
    let depth = 20_000;
    let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));

    let options = Options::default().with_css_selector("body");
    let extraction = run_with(&html, &options).unwrap();
    assert_eq!(extraction.len(), 1);
    assert_eq!(extraction[0].content, "x");
    assert!(extraction[0].html.starts_with("<body><div>"));

    let wrapped = format!("{}<p>deep</p>{}", "<div>".repeat(depth), "</div>".repeat(depth));
    assert_eq!(contents(&wrapped), vec!["deep"]);
}

#[test]
fn test_malformed_markup_is_recovered() {
    assert_eq!(contents("<p>one<p>two</div><p>three"), vec!["one", "two", "three"]);
}

// ============================================================================
// HTML and text
// ============================================================================

#[test]
fn test_outer_html() {
    assert_eq!(run("<p>foo</p>").unwrap()[0].html, "<p>foo</p>");
}

#[test]
fn test_html_is_trimmed() {
    let extraction = run(
        "<p>foo</p>
         <blink>irrelevant</blink>",
    )
    .unwrap();
    assert_eq!(extraction[0].html, "<p>foo</p>");
}

#[test]
fn test_excluded_tags_are_removed() {
    let options = Options::from_json_str(r#"{"tagsToExclude": "script"}"#).unwrap();
    let extraction = run_with(r#"<p>foo<script src="evil.com" /></p>"#, &options).unwrap();

    assert_eq!(extraction[0].html, "<p>foo</p>");
    assert_eq!(extraction[0].content, "foo");
}

#[test]
fn test_excluded_tags_leave_the_document_intact() {
    let options = Options::default().with_excluded_tags(["em"]);
    let extraction = run_with("<p>keep <em>this</em></p>", &options).unwrap();

    assert_eq!(extraction[0].content, "keep");
    let element = extraction.element(&extraction[0]);
    assert_eq!(element.text(), "keep this");
}

#[test]
fn test_block_emptied_by_exclusion_is_dropped() {
    let options = Options::default().with_excluded_tags(["script", "style"]);
    let extraction = run_with(
        "<p><script>x()</script></p><p><style>p{}</style> </p><p>kept</p>",
        &options,
    )
    .unwrap();

    assert_eq!(extraction.len(), 1);
    assert_eq!(extraction[0].content, "kept");
    assert_eq!(extraction[0].custom_ranking.position, 0);
}

#[test]
fn test_inner_text() {
    assert_eq!(contents("<p>foo</p>"), vec!["foo"]);
    assert_eq!(contents("<p>  foo <b>bar</b>\n</p>"), vec!["foo bar"]);
}

#[test]
fn test_utf8_text() {
    assert_eq!(contents("<p>UTF8‽✗✓</p>"), vec!["UTF8‽✗✓"]);
}

// ============================================================================
// Headings
// ============================================================================

#[test]
fn test_simple_hierarchy() {
    let extraction = run(
        "<h1>Foo</h1>
         <p>First paragraph</p>
         <h2>Bar</h2>
         <p>Second paragraph</p>
         <h3>Baz</h3>
         <p>Third paragraph</p>",
    )
    .unwrap();

    assert_eq!(extraction[0].headings, vec!["Foo"]);
    assert_eq!(extraction[1].headings, vec!["Foo", "Bar"]);
    assert_eq!(extraction[2].headings, vec!["Foo", "Bar", "Baz"]);
}

#[test]
fn test_no_headings() {
    assert!(run("<p>First paragraph</p>").unwrap()[0].headings.is_empty());
}

#[test]
fn test_heading_inner_text() {
    let extraction = run(
        r##"<h1><a href="#">Foo</a><span></span></h1>
            <p>First paragraph</p>"##,
    )
    .unwrap();
    assert_eq!(extraction[0].headings, vec!["Foo"]);
}

#[test]
fn test_content_before_any_heading() {
    let extraction = run(
        "<p>First paragraph</p>
         <h1>Foo</h1>",
    )
    .unwrap();
    assert!(extraction[0].headings.is_empty());
}

#[test]
fn test_hierarchy_ignores_wrappers() {
    let extraction = run(
        "<header>
           <h1>Foo</h1>
           <p>First paragraph</p>
         </header>
         <div>
           <div>
             <div>
               <h2>Bar</h2>
               <p>Second paragraph</p>
             </div>
           </div>
           <div>
             <h3>Baz</h3>
             <p>Third paragraph</p>
           </div>
         </div>",
    )
    .unwrap();

    assert_eq!(extraction[0].headings, vec!["Foo"]);
    assert_eq!(extraction[1].headings, vec!["Foo", "Bar"]);
    assert_eq!(extraction[2].headings, vec!["Foo", "Bar", "Baz"]);
}

#[test]
fn test_sibling_heading_resets_deeper_levels() {
    let extraction = run(
        "<h1>A</h1><h2>B</h2><h3>C</h3><p>deep</p>
         <h2>D</h2><p>back up</p>
         <h1>E</h1><p>top</p>",
    )
    .unwrap();

    assert_eq!(extraction[0].headings, vec!["A", "B", "C"]);
    assert_eq!(extraction[1].headings, vec!["A", "D"]);
    assert_eq!(extraction[2].headings, vec!["E"]);
}

// ============================================================================
// Anchors
// ============================================================================

#[test]
fn test_anchor_from_heading_name() {
    let extraction = run(
        r#"<h1 name="anchor">Foo</h1>
           <p>First paragraph</p>"#,
    )
    .unwrap();
    assert_eq!(extraction[0].anchor.as_deref(), Some("anchor"));
}

#[test]
fn test_no_anchor() {
    let extraction = run(
        "<h1>Foo</h1>
         <p>First paragraph</p>",
    )
    .unwrap();
    assert_eq!(extraction[0].anchor, None);
    assert_eq!(run("<p>foo</p>").unwrap()[0].anchor, None);
}

#[test]
fn test_anchor_from_heading_id() {
    let extraction = run(
        r#"<h1 id="anchor">Foo</h1>
           <p>First paragraph</p>"#,
    )
    .unwrap();
    assert_eq!(extraction[0].anchor.as_deref(), Some("anchor"));
}

#[test]
fn test_anchor_of_closest_heading_with_one() {
    let extraction = run(
        r#"<h1 name="anchor">Foo</h1>
           <p>First paragraph</p>
           <h2>Bar</h2>
           <p>Second paragraph</p>
           <h3 name="subanchor">Baz</h3>
           <p>Third paragraph</p>"#,
    )
    .unwrap();

    assert_eq!(extraction[0].anchor.as_deref(), Some("anchor"));
    assert_eq!(extraction[1].anchor.as_deref(), Some("anchor"));
    assert_eq!(extraction[2].anchor.as_deref(), Some("subanchor"));
}

#[test]
fn test_anchor_of_heading_that_is_not_a_parent() {
    let extraction = run(
        r#"<header>
             <h1 name="anchor">Foo</h1>
             <p>First paragraph</p>
           </header>
           <div>
             <div>
               <div>
                 <h2>Bar</h2>
                 <p>Second paragraph</p>
               </div>
             </div>
             <div>
               <h3 name="subanchor">Baz</h3>
               <p>Third paragraph</p>
             </div>
           </div>"#,
    )
    .unwrap();

    assert_eq!(extraction[0].anchor.as_deref(), Some("anchor"));
    assert_eq!(extraction[1].anchor.as_deref(), Some("anchor"));
    assert_eq!(extraction[2].anchor.as_deref(), Some("subanchor"));
}

#[test]
fn test_anchor_on_inner_element() {
    let extraction = run(
        r#"<h1><a name="anchor">Foo</a></h1>
           <p>First paragraph</p>"#,
    )
    .unwrap();
    assert_eq!(extraction[0].anchor.as_deref(), Some("anchor"));
}

#[test]
fn test_content_anchor_beats_inherited_one() {
    let extraction = run(
        r#"<h1 name="section">Foo</h1>
           <p id="para">First paragraph</p>
           <p>Second paragraph</p>"#,
    )
    .unwrap();

    assert_eq!(extraction[0].anchor.as_deref(), Some("para"));
    assert_eq!(extraction[1].anchor.as_deref(), Some("section"));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_fingerprint_differs_by_content() {
    assert_ne!(
        fingerprint(&json!({"content": "foo"})),
        fingerprint(&json!({"content": "bar"}))
    );
}

#[test]
fn test_fingerprint_ignores_object_id() {
    assert_eq!(
        fingerprint(&json!({"content": "foo", "objectID": "AAA"})),
        fingerprint(&json!({"content": "foo", "objectID": "BBB"}))
    );
}

#[test]
fn test_object_id_differs_by_tag_markup() {
    let a = run("<p>foo</p>").unwrap();
    let b = run(r#"<p class="bar">foo</p>"#).unwrap();
    assert_ne!(a[0].object_id, b[0].object_id);
}

#[test]
fn test_object_id_differs_by_position() {
    let a = run("<p>foo</p><p>bar</p>").unwrap();
    let b = run("<p>foo</p><p>foo again</p><p>bar</p>").unwrap();
    assert_ne!(a[1].object_id, b[2].object_id);
}

#[test]
fn test_object_id_differs_by_parent_heading() {
    let a = run(r#"<h1 name="foo">foo</h1><p>bar</p>"#).unwrap();
    let b = run(r#"<h1 name="bar">bar</h1><p>bar</p>"#).unwrap();
    assert_ne!(a[0].object_id, b[0].object_id);
}

#[test]
fn test_object_id_is_stable() {
    let html = r#"<h1 name="foo">foo</h1><p>bar</p>"#;
    let a = run(html).unwrap();
    let b = run(html).unwrap();

    assert_eq!(a[0].object_id, b[0].object_id);
    assert_eq!(a[0].object_id.len(), 40);
    assert!(a[0].object_id.bytes().all(|b| b.is_ascii_hexdigit()));
}

#[test]
fn test_identical_blocks_share_object_id_only_at_same_position() {
    let extraction = run("<p>same</p><p>same</p>").unwrap();
    assert_ne!(extraction[0].object_id, extraction[1].object_id);
}

// ============================================================================
// Ranking
// ============================================================================

#[test]
fn test_heading_weight_without_heading() {
    assert_eq!(run("<p>foo</p>").unwrap()[0].custom_ranking.heading, 100);
}

#[test]
fn test_heading_weight_decreases_with_depth() {
    let extraction = run(
        r#"<h1 name="one">bar</h1><p>foo</p>
           <h2 name="two">bar</h2><p>foo</p>
           <h3 name="three">bar</h3><p>foo</p>
           <h4 name="four">bar</h4><p>foo</p>
           <h5 name="five">bar</h5><p>foo</p>
           <h6 name="six">bar</h6><p>foo</p>"#,
    )
    .unwrap();

    let weights: Vec<_> = extraction
        .records()
        .iter()
        .map(|record| record.custom_ranking.heading)
        .collect();
    assert_eq!(weights, vec![90, 80, 70, 60, 50, 40]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_invalid_selector() {
    let options = Options::default().with_css_selector("p[");
    match run_with("<p>foo</p>", &options) {
        Err(Error::InvalidSelector { selector, .. }) => assert_eq!(selector, "p["),
        other => panic!("expected InvalidSelector, got {other:?}"),
    }
}

#[test]
fn test_invalid_excluded_tag() {
    let options = Options::default().with_excluded_tags(["<script>"]);
    assert!(matches!(
        Extractor::new(&options),
        Err(Error::InvalidTagName(_))
    ));
}

#[test]
fn test_invalid_options_json() {
    assert!(matches!(
        Options::from_json_str(r#"{"cssSelector": 3}"#),
        Err(Error::Options(_))
    ));
}
