use super::*;
use crate::sheet::parse::parse_sheet;

#[test]
fn preview_is_bounded() {
    let mut csv = String::from("Frame,A");
    for f in 1..=250 {
        csv.push_str(&format!("\n{f},{f}"));
    }
    let sheet = parse_sheet(&csv, "long.csv").unwrap();

    let preview = build_preview(&sheet, PREVIEW_ROW_LIMIT);
    let lines: Vec<&str> = preview.lines().collect();
    assert_eq!(lines.len(), 100);
    assert_eq!(lines[0], "1,1");
    assert_eq!(lines[99], "100,100");
}

#[test]
fn preview_uses_header_order_and_stored_values() {
    let sheet = parse_sheet("Frame,B,A\n1,IB,\n2,3,4", "s.csv").unwrap();
    assert_eq!(build_preview(&sheet, 10), "1,○,\n2,3,4");
}

#[test]
fn preview_of_short_sheet_has_every_row() {
    let sheet = parse_sheet("Frame\n1\n2", "s.csv").unwrap();
    assert_eq!(build_preview(&sheet, PREVIEW_ROW_LIMIT).lines().count(), 2);
    let empty = parse_sheet("Frame", "s.csv").unwrap();
    assert_eq!(build_preview(&empty, PREVIEW_ROW_LIMIT), "");
}

#[test]
fn prompt_lists_columns_and_preview() {
    let sheet = parse_sheet("Frame,Layer 1,Layer 2\n1,1,IB", "s.csv").unwrap();
    let prompt = build_prompt(&sheet);
    assert!(prompt.contains("The columns are: Frame, Layer 1, Layer 2."));
    assert!(prompt.contains("1,1,○"));
    assert!(prompt.contains("Timing Overview"));
}
