use std::collections::BTreeMap;

use crate::{
    foundation::core::{IN_BETWEEN_ALIASES, IN_BETWEEN_GLYPH},
    foundation::error::{XsheetError, XsheetResult},
    sheet::model::{SheetData, SheetHeader, SheetRow, sheet_name_from_source},
    sheet::split::split_csv_line,
};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parse a timeline CSV export into a [`SheetData`].
///
/// The first line provides the columns; every following line becomes one row, in source order.
/// The first cell of a row is read as the frame number and falls back to `0`, so messy exports
/// still load. The only failure is content that is empty after trimming.
#[tracing::instrument(skip(content), fields(bytes = content.len()))]
pub fn parse_sheet(content: &str, source_name: &str) -> XsheetResult<SheetData> {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
    let body = content.trim();
    if body.is_empty() {
        return Err(XsheetError::invalid_input("CSV file is empty"));
    }

    let mut lines = body.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

    let header_line = lines
        .next()
        .ok_or_else(|| XsheetError::parse("CSV file has no header line"))?;
    let headers: Vec<SheetHeader> = split_csv_line(header_line)
        .iter()
        .enumerate()
        .map(|(i, label)| SheetHeader::new(i, label.trim()))
        .collect();

    let rows: Vec<SheetRow> = lines.map(|line| build_row(&headers, line)).collect();

    tracing::debug!(
        columns = headers.len(),
        rows = rows.len(),
        "parsed timeline csv"
    );

    Ok(SheetData {
        headers,
        rows,
        name: sheet_name_from_source(source_name),
    })
}

fn build_row(headers: &[SheetHeader], line: &str) -> SheetRow {
    let cells = split_csv_line(line);
    let frame = cells.first().map(|c| parse_frame_number(c)).unwrap_or(0);

    let mut data = BTreeMap::new();
    for header in headers {
        let raw = cells.get(header.index).map(String::as_str).unwrap_or("");
        data.insert(header.id.clone(), normalize_cell(raw));
    }

    SheetRow { frame, data }
}

/// Read a frame number the way base-10 prefix parsing does.
///
/// Leading whitespace is skipped, an optional sign is accepted, and the longest run of ASCII
/// digits is used. Anything without digits, or out of `i64` range, yields `0`.
pub fn parse_frame_number(cell: &str) -> i64 {
    let s = cell.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }

    let mut value: i64 = 0;
    for b in digits[..end].bytes() {
        let d = i64::from(b - b'0');
        let next = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(d) } else { v.checked_add(d) });
        match next {
            Some(v) => value = v,
            None => return 0,
        }
    }
    value
}

/// Replace recognized in-between markers with the canonical glyph.
///
/// Matching uses the trimmed value and must be exact; everything else is returned untrimmed.
pub fn normalize_cell(raw: &str) -> String {
    let trimmed = raw.trim();
    if IN_BETWEEN_ALIASES.contains(&trimmed) {
        IN_BETWEEN_GLYPH.to_string()
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/parse.rs"]
mod tests;
