use super::*;
use crate::sheet::parse::parse_sheet;

#[test]
fn header_and_rows_are_aligned() {
    let sheet = parse_sheet("Frame,A\n1,x\n2,", "s.csv").unwrap();
    let out = render_text(&sheet);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Frame | A");
    assert_eq!(lines[1], "=========");
    assert_eq!(lines[2], "1     | x");
    assert_eq!(lines[3], "2     | -");
}

#[test]
fn tier_rules_precede_boundary_rows() {
    let sheet = parse_sheet("F\n1\n7\n13\n25", "s.csv").unwrap();
    let out = render_text(&sheet);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec!["F", "==", "1", "..", "7", "--", "13", "==", "25"]
    );
}

#[test]
fn wide_values_are_clipped() {
    let sheet = parse_sheet("F,A\n1,abcdefghijklmnopqrstuvwxyz", "s.csv").unwrap();
    let out = render_text(&sheet);
    assert!(out.contains("abcdefghijkl"));
    assert!(!out.contains("abcdefghijklm"));
}

#[test]
fn cjk_counts_double() {
    assert_eq!(display_width("中割"), 4);
    assert_eq!(clip("中割x", 3), "中");
}
