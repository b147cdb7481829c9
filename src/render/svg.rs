use std::fmt::Write as _;

use crate::{
    foundation::core::{Rgb8, palette},
    layout::grid::{GridCell, GridLayout},
};

/// Render a grid layout as a standalone SVG document.
///
/// `font_family` is a CSS `font-family` value; it should name the faces the layout was measured
/// with. Painting order is backgrounds, then rules, then text, so rules are never hidden under a
/// cell fill and glyphs always sit on top.
pub fn render_svg(layout: &GridLayout, font_family: &str) -> String {
    let w = layout.size.width;
    let h = layout.size.height;
    let mut out = String::with_capacity(256 + layout.rows.len() * layout.header.len() * 160);

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = writeln!(
        out,
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}"/>"#,
        Rgb8::WHITE.to_hex()
    );

    // backgrounds
    for cell in &layout.header {
        write_cell_background(&mut out, cell);
    }
    for row in &layout.rows {
        if row.zebra {
            write_rect(&mut out, row.rect, palette::SLATE_50);
        }
        for cell in &row.cells {
            write_cell_background(&mut out, cell);
        }
    }

    // rules
    for row in &layout.rows {
        let rule = row.tier.rule();
        let dash = if rule.dashed {
            r#" stroke-dasharray="4 3""#
        } else {
            ""
        };
        let y = row.rect.y0 + rule.width / 2.0;
        let _ = writeln!(
            out,
            r#"<line x1="0" y1="{y}" x2="{w}" y2="{y}" stroke="{}" stroke-width="{}"{dash}/>"#,
            rule.color.to_hex(),
            rule.width,
        );
        for cell in &row.cells {
            let x = cell.rect.x1 - 0.5;
            let _ = writeln!(
                out,
                r#"<line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{}" stroke-width="1"/>"#,
                cell.rect.y0,
                cell.rect.y1,
                palette::SLATE_200.to_hex(),
            );
        }
    }

    // text
    let font_family = escape_xml(font_family);
    for cell in layout.header.iter().chain(layout.rows.iter().flat_map(|r| &r.cells)) {
        write_cell_text(&mut out, cell, &font_family);
    }

    out.push_str("</svg>\n");
    out
}

fn write_cell_background(out: &mut String, cell: &GridCell) {
    if let Some(bg) = cell.background {
        write_rect(out, cell.rect, bg);
    }
}

fn write_rect(out: &mut String, rect: crate::foundation::core::Rect, fill: Rgb8) {
    let _ = writeln!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height(),
        fill.to_hex()
    );
}

fn write_cell_text(out: &mut String, cell: &GridCell, font_family: &str) {
    let weight = if cell.style.bold { "bold" } else { "normal" };
    for line in &cell.lines {
        if line.text.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="{font_family}" font-size="{}" font-weight="{weight}" fill="{}">{}</text>"#,
            line.anchor.x,
            line.anchor.y,
            cell.style.font_size,
            cell.style.color.to_hex(),
            escape_xml(&line.text),
        );
    }
}

/// Escape text for use as XML character data or attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
