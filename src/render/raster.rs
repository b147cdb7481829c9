use std::{
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    foundation::core::Rgb8,
    foundation::error::{XsheetError, XsheetResult},
    layout::grid::{GridLayout, LayoutSettings, layout_grid},
    render::{fonts::FontSet, svg::render_svg},
    sheet::model::SheetData,
};

/// Largest raster edge we are willing to allocate.
pub const MAX_RASTER_DIM: u32 = 32_768;
/// JPEG quality used for exports.
pub const JPEG_QUALITY: u8 = 85;

/// Supported image export formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Rasterization settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Extra directory scanned for `.ttf`/`.otf`/`.ttc` files on top of system fonts. Its first
    /// family becomes the primary sheet font.
    pub font_dir: Option<PathBuf>,
    /// Color painted under the sheet. JPEG has no alpha, so this is always opaque.
    pub background: Rgb8,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            font_dir: None,
            background: Rgb8::WHITE,
        }
    }
}

/// Straight-alpha RGBA8 pixels, tightly packed, row-major.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Pixel scale for a sheet whose laid-out height is `total_height`.
///
/// Tall sheets are rendered at a lower density to keep the output size bounded.
pub fn export_scale(total_height: f64) -> f32 {
    if total_height > 30_000.0 {
        0.5
    } else if total_height > 15_000.0 {
        1.0
    } else {
        2.0
    }
}

/// `<name>_xsheet.<ext>`
pub fn image_file_name(sheet: &SheetData, format: ImageFormat) -> String {
    format!("{}_xsheet.{}", sheet.name, format.extension())
}

/// `<name>_xsheet.svg`
pub fn svg_file_name(sheet: &SheetData) -> String {
    format!("{}_xsheet.svg", sheet.name)
}

/// Export-mode layout of `sheet`, measured with the faces in `fonts`.
pub fn export_layout(sheet: &SheetData, fonts: &FontSet) -> GridLayout {
    layout_grid(sheet, &LayoutSettings::export(), &mut fonts.metrics())
}

/// Rasterize an SVG document at `scale` over `background`, resolving text against `fonts`.
#[tracing::instrument(skip(svg, fonts), fields(svg_bytes = svg.len()))]
pub fn rasterize_svg(
    svg: &str,
    scale: f32,
    fonts: &FontSet,
    background: Rgb8,
) -> XsheetResult<RasterImage> {
    let opts = usvg::Options {
        fontdb: fonts.database(),
        font_resolver: fonts.font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| XsheetError::raster(format!("failed to parse sheet svg: {e}")))?;

    let size = tree.size();
    let width = to_px(size.width() * scale)?;
    let height = to_px(size.height() * scale)?;
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(XsheetError::raster(format!(
            "image size {width}x{height} exceeds {MAX_RASTER_DIM}x{MAX_RASTER_DIM}; the sheet might be too large"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| XsheetError::raster("failed to allocate pixmap; the sheet might be too large"))?;
    pixmap.fill(resvg::tiny_skia::Color::from_rgba8(
        background.r,
        background.g,
        background.b,
        255,
    ));

    let xform = resvg::tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    let mut data = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }

    tracing::debug!(width, height, scale, "rasterized sheet");
    Ok(RasterImage {
        width,
        height,
        data,
    })
}

fn to_px(v: f32) -> XsheetResult<u32> {
    if !v.is_finite() || v < 1.0 {
        return Err(XsheetError::raster("sheet has no drawable area"));
    }
    Ok(v.ceil() as u32)
}

/// Encode pixels in `format`, consuming the buffer. JPEG drops alpha.
pub fn encode_image(img: RasterImage, format: ImageFormat) -> XsheetResult<Vec<u8>> {
    let rgba = image::RgbaImage::from_raw(img.width, img.height, img.data)
        .ok_or_else(|| XsheetError::raster("pixel buffer does not match image dimensions"))?;

    let mut buf = Vec::new();
    match format {
        ImageFormat::Png => {
            image::DynamicImage::ImageRgba8(rgba)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| XsheetError::raster(format!("png encode failed: {e}")))?;
        }
        ImageFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
                .encode_image(&rgb)
                .map_err(|e| XsheetError::raster(format!("jpeg encode failed: {e}")))?;
        }
    }
    Ok(buf)
}

/// Lay out, rasterize and write `sheet` as `<dir>/<name>_xsheet.<ext>`.
///
/// The file is written through a staging path that is removed on every failure, so a failed
/// export leaves nothing behind.
#[tracing::instrument(skip(sheet, settings), fields(name = %sheet.name))]
pub fn export_image(
    sheet: &SheetData,
    dir: &Path,
    format: ImageFormat,
    settings: &RasterSettings,
) -> XsheetResult<PathBuf> {
    let fonts = FontSet::load(settings.font_dir.as_deref());
    let layout = export_layout(sheet, &fonts);
    let scale = export_scale(layout.size.height);
    let svg = render_svg(&layout, &fonts.css_family_list());
    let img = rasterize_svg(&svg, scale, &fonts, settings.background)?;
    let (width, height) = (img.width, img.height);
    let bytes = encode_image(img, format)?;

    let target = dir.join(image_file_name(sheet, format));
    write_staged(&target, &bytes)?;
    tracing::info!(path = %target.display(), width, height, "wrote sheet image");
    Ok(target)
}

/// Write the export-mode SVG of `sheet` as `<dir>/<name>_xsheet.svg`, laid out with the same
/// fonts [`export_image`] would use.
#[tracing::instrument(skip(sheet, settings), fields(name = %sheet.name))]
pub fn export_svg(
    sheet: &SheetData,
    dir: &Path,
    settings: &RasterSettings,
) -> XsheetResult<PathBuf> {
    let fonts = FontSet::load(settings.font_dir.as_deref());
    let layout = export_layout(sheet, &fonts);
    let svg = render_svg(&layout, &fonts.css_family_list());

    let target = dir.join(svg_file_name(sheet));
    write_staged(&target, svg.as_bytes())?;
    tracing::info!(path = %target.display(), "wrote sheet svg");
    Ok(target)
}

/// Write `bytes` to `target` via `<target>.partial`, renaming into place on success.
pub fn write_staged(target: &Path, bytes: &[u8]) -> XsheetResult<()> {
    ensure_parent_dir(target)?;
    let staged = StagedFile::new(target);
    std::fs::write(&staged.staging, bytes)
        .with_context(|| format!("write staging file '{}'", staged.staging.display()))?;
    staged.commit()
}

pub fn ensure_parent_dir(path: &Path) -> XsheetResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Staging file removed on drop unless committed.
struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    fn new(target: &Path) -> Self {
        let mut staging = target.as_os_str().to_owned();
        staging.push(".partial");
        Self {
            staging: PathBuf::from(staging),
            target: target.to_path_buf(),
            committed: false,
        }
    }

    fn commit(mut self) -> XsheetResult<()> {
        std::fs::rename(&self.staging, &self.target).with_context(|| {
            format!(
                "move '{}' to '{}'",
                self.staging.display(),
                self.target.display()
            )
        })?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.staging);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
