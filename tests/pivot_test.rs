//! Integration tests for comment marker extraction.

use archive_patch::model::Pivot;
use archive_patch::pivot::{extract_pivots, format_marker, insert_pivots};

#[test]
fn test_roundtrip_marker_layouts() {
    let cases = [
        ("none", "没有注释的段落。"),
        ("one", "一个注释〔1〕在这里。"),
        ("many", "甲〔1〕乙〔2〕丙〔3〕丁〔4〕"),
        ("adjacent", "连续〔5〕〔6〕〔7〕注释"),
        ("at start", "〔1〕开头"),
        ("at end", "结尾〔12〕"),
        ("only markers", "〔1〕〔2〕"),
    ];

    for (name, text) in cases {
        let (pivots, stripped) = extract_pivots(text, 3);
        assert!(!stripped.contains('〔'), "{}: markers left in {:?}", name, stripped);
        assert!(pivots.iter().all(|p| p.part_idx == 3), "{}", name);
        assert_eq!(insert_pivots(&stripped, &pivots), text, "{}", name);
    }
}

#[test]
fn test_offsets_follow_shrinking_text() {
    let (pivots, stripped) = extract_pivots("〔1〕ab〔2〕c〔3〕", 0);

    assert_eq!(stripped, "abc");
    assert_eq!(
        pivots,
        vec![Pivot::new(0, 0, 1), Pivot::new(0, 2, 2), Pivot::new(0, 3, 3)]
    );
}

#[test]
fn test_insert_ignores_stored_order() {
    // Stored pivots are not necessarily sorted.
    let pivots = [Pivot::new(0, 3, 2), Pivot::new(0, 1, 1)];
    assert_eq!(insert_pivots("abcd", &pivots), "a〔1〕bc〔2〕d");
}

#[test]
fn test_marker_numbers_out_of_text_order() {
    let text = "a〔3〕b〔1〕c";
    let (pivots, stripped) = extract_pivots(text, 0);

    assert_eq!(pivots[0].index, 3);
    assert_eq!(pivots[1].index, 1);
    assert_eq!(insert_pivots(&stripped, &pivots), text);
}

#[test]
fn test_fullwidth_digits_are_not_markers() {
    let (pivots, stripped) = extract_pivots("x〔１〕", 0);
    assert!(pivots.is_empty());
    assert_eq!(stripped, "x〔１〕");
}

#[test]
fn test_format_marker() {
    assert_eq!(format_marker(7), "〔7〕");
}
