use markdrop::{
    config::Config,
    postprocess::{markdown_to_text, scrub_markdown},
};

#[test]
fn normalizes_newlines_and_trailing_whitespace() {
    let cfg = Config::default();
    let raw = "# Title  \r\nBody line   \r\n".to_string();
    let md = scrub_markdown(&cfg, raw).unwrap();
    assert!(!md.contains('\r'));
    assert!(md.contains("# Title\n"));
    assert!(md.contains("Body line"));
    assert!(!md.contains("Body line "));
}

#[test]
fn regex_scrub_removes_matching_lines() {
    let mut cfg = Config::default();
    cfg.postprocess.remove_by_regex = true;
    cfg.postprocess.regex.patterns = vec!["^CONFIDENTIAL$".into()];

    let raw = "Intro\nCONFIDENTIAL\nBody".to_string();
    let md = scrub_markdown(&cfg, raw).unwrap();
    assert!(!md.contains("CONFIDENTIAL"));
    assert!(md.contains("Intro"));
    assert!(md.contains("Body"));
}

#[test]
fn regex_scrub_off_by_default() {
    let cfg = Config::default();
    let raw = "CONFIDENTIAL\nBody".to_string();
    let md = scrub_markdown(&cfg, raw).unwrap();
    assert!(md.contains("CONFIDENTIAL"));
}

#[test]
fn text_rendition_strips_markdown_syntax() {
    let cfg = Config::default();
    let md = "## Heading\nSome **bold** and `code` text.\nSee [the docs](https://example.com).";
    let text = markdown_to_text(&cfg, md).unwrap();
    assert!(text.contains("Heading"));
    assert!(!text.contains('#'));
    assert!(!text.contains("**"));
    assert!(!text.contains('`'));
    assert!(text.contains("See the docs."));
    assert!(!text.contains("example.com"));
}

#[test]
fn text_rendition_keeps_line_structure() {
    let cfg = Config::default();
    let md = "# A\nfirst\n\nsecond";
    let text = markdown_to_text(&cfg, md).unwrap();
    assert_eq!(text, "A\nfirst\n\nsecond");
}
