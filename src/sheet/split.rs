/// Split one CSV line into unescaped fields.
///
/// A single scanner handles every line: `"` toggles quoted mode, `,` separates fields only
/// outside quotes. Each field loses one layer of surrounding quotes and has `""` collapsed to
/// `"`. The trailing field is always emitted, so an empty line yields one empty field.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut start = 0usize;
    let mut in_quotes = false;

    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(unquote_field(&line[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(unquote_field(&line[start..]));

    fields
}

fn unquote_field(raw: &str) -> String {
    let inner = if raw.starts_with('"') && raw.ends_with('"') {
        // a lone `"` both starts and ends the field
        if raw.len() >= 2 { &raw[1..raw.len() - 1] } else { "" }
    } else {
        raw
    };
    inner.replace("\"\"", "\"")
}

#[cfg(test)]
#[path = "../../tests/unit/sheet/split.rs"]
mod tests;
