use super::*;

#[test]
fn non_csv_names_are_rejected_before_reading() {
    let mut ws = Workspace::new();
    let err = ws.load_file(Path::new("/definitely/missing/scene.txt")).unwrap_err();
    assert!(matches!(err, XsheetError::InvalidInput(_)));
    assert!(ws.sheet().is_none());
}

#[test]
fn missing_file_reports_read_error() {
    let mut ws = Workspace::new();
    let err = ws.load_file(Path::new("/definitely/missing/scene.csv")).unwrap_err();
    assert!(matches!(err, XsheetError::Other(_)));
    assert!(err.to_string().contains("Error reading file"));
}

#[test]
fn load_replaces_sheet_wholesale() {
    let mut ws = Workspace::new();
    ws.load_str("Frame,A\n1,x", "first.csv").unwrap();
    ws.load_str("Frame,B,C\n5,y,z", "second.csv").unwrap();
    let sheet = ws.sheet().unwrap();
    assert_eq!(sheet.name, "second");
    assert_eq!(sheet.headers.len(), 3);
    assert_eq!(sheet.rows[0].frame, 5);
}

#[test]
fn failed_load_keeps_previous_sheet() {
    let mut ws = Workspace::new();
    ws.load_str("Frame,A\n1,x", "first.csv").unwrap();

    assert!(ws.load_str("  \n ", "empty.csv").is_err());
    assert!(ws.load_file(Path::new("notes.txt")).is_err());

    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.csv");
    std::fs::write(&bad, [0xff, 0xfe, 0x00, 0x41]).unwrap();
    let err = ws.load_file(&bad).unwrap_err();
    assert!(matches!(err, XsheetError::Parse(_)));

    assert_eq!(ws.sheet().unwrap().name, "first");
}

#[test]
fn clear_discards_sheet() {
    let mut ws = Workspace::new();
    ws.load_str("Frame", "a.csv").unwrap();
    ws.clear();
    assert!(ws.sheet().is_none());
    ws.clear();
}

#[test]
fn exports_require_a_sheet() {
    let ws = Workspace::new();
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        ws.export_csv(dir.path()).unwrap_err(),
        XsheetError::InvalidInput(_)
    ));
    assert!(
        ws.export_image(dir.path(), ImageFormat::Png, &RasterSettings::default())
            .is_err()
    );
    assert!(matches!(
        ws.export_svg(dir.path(), &RasterSettings::default()).unwrap_err(),
        XsheetError::InvalidInput(_)
    ));
}

#[test]
fn load_file_uses_file_name_for_sheet_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Cut_010.csv");
    std::fs::write(&path, "Frame,A\n1,IB\n").unwrap();

    let mut ws = Workspace::new();
    let sheet = ws.load_file(&path).unwrap();
    assert_eq!(sheet.name, "Cut_010");
    assert_eq!(sheet.rows[0].get("col_1"), "○");
}

#[test]
fn export_csv_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut ws = Workspace::new();
    ws.load_str("Frame,A\n1,IB", "Cut.csv").unwrap();

    let path = ws.export_csv(&dir.path().join("out")).unwrap();
    assert_eq!(path, dir.path().join("out").join("Cut_export.csv"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "\"Frame\",\"A\"\n\"1\",\"○\""
    );
}
