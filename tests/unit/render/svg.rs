use super::*;
use crate::{
    layout::{
        grid::{LayoutSettings, layout_grid},
        text::TextMeasure,
    },
    sheet::parse::parse_sheet,
};

struct HalfEm;

impl TextMeasure for HalfEm {
    fn advance(&mut self, text: &str, font_size: f64, _bold: bool) -> f64 {
        text.chars().count() as f64 * font_size * 0.5
    }
}

fn svg_for(content: &str) -> String {
    let sheet = parse_sheet(content, "s.csv").unwrap();
    let layout = layout_grid(&sheet, &LayoutSettings::default(), &mut HalfEm);
    render_svg(&layout, "'Test Mono', monospace")
}

#[test]
fn document_has_grid_size() {
    let svg = svg_for("Frame,A\n1,a\n2,b");
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"width="80" height="120""#));
    assert!(svg.trim_end().ends_with("</svg>"));
}

#[test]
fn text_is_escaped() {
    let svg = svg_for("Frame,\"<A&B>\"\n1,\"x\"\"y\"");
    assert!(svg.contains("&lt;A&amp;B&gt;") || svg.contains("&lt;A&amp;"));
    assert!(!svg.contains("<A&B>"));
    assert!(svg.contains("x&quot;y"));
}

#[test]
fn second_rule_is_heavy_and_six_frame_rule_is_dashed() {
    let svg = svg_for("Frame,A\n0,a\n7,b\n25,c");
    assert!(svg.contains(r##"stroke="#1e293b" stroke-width="2""##));
    assert!(svg.contains(r#"stroke-dasharray="4 3""#));
}

#[test]
fn svg_parses_with_usvg() {
    let svg = svg_for("Frame,A,B\n1,IB,X\n2,,中割");
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn escape_xml_drops_control_characters() {
    assert_eq!(escape_xml("a\u{1}b"), "ab");
    assert_eq!(escape_xml("'"), "&apos;");
}

#[test]
fn text_names_the_given_font_stack() {
    let svg = svg_for("Frame,A\n1,a");
    assert!(svg.contains(r#"font-family="&apos;Test Mono&apos;, monospace""#));
    assert!(!svg.contains("sans-serif"));
}
