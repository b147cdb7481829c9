use super::*;
use crate::sheet::parse::parse_sheet;

fn no_fonts() -> FontSet {
    FontSet::from_database(usvg::fontdb::Database::new(), &[])
}

const TINY_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"><rect x="0" y="0" width="2" height="2" fill="#000000"/></svg>"##;

#[test]
fn export_scale_tiers() {
    assert_eq!(export_scale(100.0), 2.0);
    assert_eq!(export_scale(15_000.0), 2.0);
    assert_eq!(export_scale(15_001.0), 1.0);
    assert_eq!(export_scale(30_000.0), 1.0);
    assert_eq!(export_scale(30_001.0), 0.5);
}

#[test]
fn image_names_use_format_extension() {
    let sheet = parse_sheet("Frame", "Cut.csv").unwrap();
    assert_eq!(image_file_name(&sheet, ImageFormat::Png), "Cut_xsheet.png");
    assert_eq!(image_file_name(&sheet, ImageFormat::Jpeg), "Cut_xsheet.jpg");
}

#[test]
fn rasterize_scales_and_paints_over_background() {
    let img = rasterize_svg(TINY_SVG, 2.0, &no_fonts(), Rgb8::WHITE).unwrap();
    assert_eq!((img.width, img.height), (8, 4));
    assert_eq!(img.data.len(), 8 * 4 * 4);
    // left half black, right half background
    assert_eq!(&img.data[0..4], &[0, 0, 0, 255]);
    let last = img.data.len() - 4;
    assert_eq!(&img.data[last..], &[255, 255, 255, 255]);
}

#[test]
fn oversized_output_is_rejected() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20000"></svg>"#;
    let err = rasterize_svg(svg, 2.0, &no_fonts(), Rgb8::WHITE).unwrap_err();
    assert!(matches!(err, XsheetError::Raster(_)));
    assert!(err.to_string().contains("too large"));
}

#[test]
fn encoded_images_decode_back() {
    let img = rasterize_svg(TINY_SVG, 1.0, &no_fonts(), Rgb8::WHITE).unwrap();

    let png = encode_image(img.clone(), ImageFormat::Png).unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (4, 2));

    let jpg = encode_image(img, ImageFormat::Jpeg).unwrap();
    assert_eq!(&jpg[0..2], &[0xff, 0xd8]);
}

#[test]
fn mismatched_buffer_is_an_error() {
    let img = RasterImage {
        width: 2,
        height: 2,
        data: vec![0; 3],
    };
    assert!(encode_image(img, ImageFormat::Png).is_err());
}

#[test]
fn staged_write_leaves_only_target() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("nested").join("out.png");
    write_staged(&target, b"data").unwrap();
    assert_eq!(std::fs::read(&target).unwrap(), b"data");
    assert!(!dir.path().join("nested").join("out.png.partial").exists());
}

#[test]
fn failed_staged_write_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    // target is an existing directory, so the final rename fails
    let target = dir.path().join("taken");
    std::fs::create_dir_all(target.join("inner")).unwrap();
    assert!(write_staged(&target, b"data").is_err());
    assert!(!dir.path().join("taken.partial").exists());
}

#[test]
fn export_image_writes_png() {
    let sheet = parse_sheet("Frame,A\n1,IB\n2,X", "Cut.csv").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = export_image(&sheet, dir.path(), ImageFormat::Png, &RasterSettings::default())
        .unwrap();
    assert_eq!(path, dir.path().join("Cut_xsheet.png"));
    let decoded = image::open(&path).unwrap();
    // 2 columns * 40 * 2.0 scale
    assert_eq!(decoded.width(), 160);
}

#[test]
fn background_color_fills_uncovered_pixels() {
    let bg = Rgb8::new(0x10, 0x20, 0x30);
    let img = rasterize_svg(TINY_SVG, 1.0, &no_fonts(), bg).unwrap();
    assert_eq!(&img.data[img.data.len() - 4..], &[0x10, 0x20, 0x30, 255]);
}

#[test]
fn export_text_ink_stays_inside_its_column() {
    let sheet = parse_sheet("Frame,MMMM,B\n1,MMMM,\n2,WWWWWWWWWW,", "Cut.csv").unwrap();
    let fonts = FontSet::load(None);
    let layout = export_layout(&sheet, &fonts);
    let svg = render_svg(&layout, &fonts.css_family_list());
    let img = rasterize_svg(&svg, 1.0, &fonts, Rgb8::WHITE).unwrap();

    let column = layout.rows[0].cells[1].rect;
    let mut inked = 0usize;
    for row in &layout.rows {
        // skip the boundary rule drawn along the top edge
        let top = (row.rect.y0 + row.tier.rule().width).ceil() as u32 + 1;
        for y in top..row.rect.y1.floor() as u32 {
            for x in 0..img.width {
                let i = ((y * img.width + x) * 4) as usize;
                let px = &img.data[i..i + 4];
                // body text is slate-900; rules, placeholders and the frame column are lighter
                if px[0] < 0x60 && px[1] < 0x60 && px[2] < 0x60 {
                    inked += 1;
                    let xf = f64::from(x);
                    assert!(
                        xf >= column.x0 && xf < column.x1,
                        "ink at x={x}, y={y} outside column {}..{}",
                        column.x0,
                        column.x1
                    );
                }
            }
        }
    }
    if fonts.primary_family().is_some() {
        assert!(inked > 0);
        // the long value had to wrap to stay inside
        assert!(layout.rows[1].cells[1].lines.len() > 1);
    }
}

#[test]
fn export_svg_writes_the_sheet_document() {
    let sheet = parse_sheet("Frame,A\n1,IB", "Cut.csv").unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = export_svg(&sheet, dir.path(), &RasterSettings::default()).unwrap();
    assert_eq!(path, dir.path().join("Cut_xsheet.svg"));
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(">IB</text>"));
    assert!(!dir.path().join("Cut_xsheet.svg.partial").exists());
}
