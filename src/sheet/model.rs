use std::collections::BTreeMap;

/// One column of the sheet.
///
/// `id` is derived from the column position only (`col_<index>`), so it stays unique even when
/// labels are duplicated or empty.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetHeader {
    /// Stable synthetic identifier, `col_<index>`.
    pub id: String,
    /// Display label, trimmed.
    pub label: String,
    /// Zero-based source column position.
    pub index: usize,
}

impl SheetHeader {
    /// Build the header for column `index`.
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        Self {
            id: column_id(index),
            label: label.into(),
            index,
        }
    }
}

/// Synthetic id for the column at `index`.
pub fn column_id(index: usize) -> String {
    format!("col_{index}")
}

/// One frame of the sheet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetRow {
    /// Frame number parsed from the first cell (`0` when unparseable).
    pub frame: i64,
    /// Cell values keyed by header id. Holds one entry per header. Serialized in column order.
    #[serde(serialize_with = "serialize_in_column_order")]
    pub data: BTreeMap<String, String>,
}

impl SheetRow {
    /// Value stored for `header_id`, or `""` when absent.
    pub fn get(&self, header_id: &str) -> &str {
        self.data.get(header_id).map(String::as_str).unwrap_or("")
    }
}

/// Column position encoded in a `col_<index>` id.
fn column_index(id: &str) -> Option<usize> {
    id.strip_prefix("col_")?.parse().ok()
}

/// `col_2` before `col_10`; ids that are not column ids follow, in lexical order.
fn serialize_in_column_order<S: serde::Serializer>(
    data: &BTreeMap<String, String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut entries: Vec<(&String, &String)> = data.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        let pos = |id: &str| column_index(id).unwrap_or(usize::MAX);
        pos(a).cmp(&pos(b)).then_with(|| a.cmp(b))
    });
    serializer.collect_map(entries)
}

/// A fully ingested X-Sheet.
///
/// Produced once by [`crate::parse_sheet`] and never mutated afterwards; loading another file
/// replaces the whole value.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SheetData {
    /// Columns in source order.
    pub headers: Vec<SheetHeader>,
    /// Rows in source line order (not sorted by frame).
    pub rows: Vec<SheetRow>,
    /// Display name (source name without a trailing `.csv`).
    pub name: String,
}

impl SheetData {
    /// Cell value for `row` under `header`, `""` when absent.
    pub fn cell<'a>(&'a self, row: &'a SheetRow, header: &SheetHeader) -> &'a str {
        row.get(&header.id)
    }

    /// Values of `row` in header order.
    pub fn row_values<'a>(&'a self, row: &'a SheetRow) -> impl Iterator<Item = &'a str> + 'a {
        self.headers.iter().map(move |h| row.get(&h.id))
    }

    /// Header labels in column order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(|h| h.label.as_str())
    }

    pub fn frame_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// Display name for a source file name: one trailing, case-sensitive `.csv` is removed.
pub fn sheet_name_from_source(source_name: &str) -> String {
    source_name
        .strip_suffix(".csv")
        .unwrap_or(source_name)
        .to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/model.rs"]
mod tests;
