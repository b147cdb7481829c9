//! Cell text fitting against a measured advance.
//!
//! Layout never guesses glyph widths: every width comes from a [`TextMeasure`], which for image
//! export is backed by the same faces the rasterizer draws with.

pub const ELLIPSIS: char = '…';

/// Horizontal advance of single-line text, in the same units as the layout.
pub trait TextMeasure {
    fn advance(&mut self, text: &str, font_size: f64, bold: bool) -> f64;
}

/// Cut `text` to `max_width`, ending in an ellipsis when anything was dropped.
pub fn truncate_to_width(
    text: &str,
    max_width: f64,
    font_size: f64,
    bold: bool,
    measure: &mut dyn TextMeasure,
) -> String {
    if measure.advance(text, font_size, bold) <= max_width {
        return text.to_string();
    }

    let mut kept = String::new();
    for ch in text.chars() {
        let mut candidate = String::with_capacity(kept.len() + ch.len_utf8() + ELLIPSIS.len_utf8());
        candidate.push_str(&kept);
        candidate.push(ch);
        candidate.push(ELLIPSIS);
        if measure.advance(&candidate, font_size, bold) > max_width {
            break;
        }
        kept.push(ch);
    }
    kept.push(ELLIPSIS);
    kept
}

/// Greedy wrap that may break inside words (cells are narrow). Always returns at least one line,
/// and every line holds at least one character.
pub fn wrap_to_width(
    text: &str,
    max_width: f64,
    font_size: f64,
    bold: bool,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch == '\n' {
            lines.push(std::mem::take(&mut current));
            continue;
        }
        if !current.is_empty() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if measure.advance(&candidate, font_size, bold) > max_width {
                lines.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    lines.push(current);
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
