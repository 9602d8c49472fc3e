use markdrop::report::{OutputStats, reduction_percent};

#[test]
fn reduction_basic() {
    assert_eq!(reduction_percent(1000, 250), 75.0);
    assert_eq!(reduction_percent(100, 100), 0.0);
}

#[test]
fn reduction_handles_empty_original() {
    assert_eq!(reduction_percent(0, 500), 0.0);
}

#[test]
fn reduction_negative_when_rendition_grows() {
    assert_eq!(reduction_percent(100, 150), -50.0);
}

#[test]
fn output_stats_carry_reduction() {
    let stats = OutputStats::new(2000, 500, 400);
    assert_eq!(stats.markdown_bytes, 500);
    assert_eq!(stats.text_bytes, 400);
    assert_eq!(stats.reduction_percent, 75.0);
}
