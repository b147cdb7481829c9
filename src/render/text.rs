use crate::{
    layout::grid::EMPTY_CELL_TEXT,
    sheet::model::SheetData,
    timing::classify::{TimingTier, classify_row},
};

const MAX_COLUMN_WIDTH: usize = 12;

/// Render a sheet as a monospace text grid for terminals.
///
/// Timing tiers are drawn as separator lines above the row that opens them: `=` for a second,
/// `-` for a half second, `.` for six frames.
pub fn render_text(sheet: &SheetData) -> String {
    let widths: Vec<usize> = sheet
        .headers
        .iter()
        .map(|h| {
            sheet
                .rows
                .iter()
                .map(|r| display_width(r.get(&h.id)))
                .chain([display_width(&h.label), 1])
                .max()
                .unwrap_or(1)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();
    let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);

    let mut out = String::new();
    push_line(&mut out, sheet.labels(), &widths);
    out.push_str(&"=".repeat(total));
    out.push('\n');

    for (i, row) in sheet.rows.iter().enumerate() {
        let rule = match classify_row(i, row.frame) {
            TimingTier::Second => Some('='),
            TimingTier::HalfSecond => Some('-'),
            TimingTier::SixFrame => Some('.'),
            TimingTier::Plain => None,
        };
        if let Some(ch) = rule {
            out.extend(std::iter::repeat_n(ch, total));
            out.push('\n');
        }

        let values = sheet.headers.iter().map(|h| {
            let v = row.get(&h.id);
            if v.is_empty() && h.index > 0 {
                EMPTY_CELL_TEXT
            } else {
                v
            }
        });
        push_line(&mut out, values, &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, values: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let mut line = String::new();
    for (i, (value, &width)) in values.zip(widths).enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let cell = clip(value, width);
        let pad = width.saturating_sub(display_width(&cell));
        line.push_str(&cell);
        line.extend(std::iter::repeat_n(' ', pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Terminal columns taken by `s`; non-ASCII glyphs count double.
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn clip(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = if c.is_ascii() { 1 } else { 2 };
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
