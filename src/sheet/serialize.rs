use crate::sheet::model::SheetData;

/// Serialize a sheet back to CSV.
///
/// Every field is quoted, including ones that would not need it, with internal quotes doubled.
/// Lines are joined with `\n` and there is no trailing newline.
pub fn serialize_sheet(sheet: &SheetData) -> String {
    let mut lines = Vec::with_capacity(sheet.rows.len() + 1);
    lines.push(join_quoted(sheet.labels()));
    for row in &sheet.rows {
        lines.push(join_quoted(sheet.row_values(row)));
    }
    lines.join("\n")
}

/// File name used when exporting `sheet` as CSV.
pub fn export_csv_file_name(sheet: &SheetData) -> String {
    format!("{}_export.csv", sheet.name)
}

fn join_quoted<'a>(fields: impl Iterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/serialize.rs"]
mod tests;
