//! xsheet turns animation timeline CSV exports into traditional vertical X-Sheets.
//!
//! # Pipeline overview
//!
//! 1. **Ingest**: `CSV text -> SheetData` ([`parse_sheet`]): stable `col_<n>` column ids,
//!    frame numbers from the first column (defaulting to `0`), in-between markers normalized to
//!    `○`.
//! 2. **Classify**: `frame -> TimingTier` ([`classify_row`]): second / half-second / six-frame
//!    rules at 24 fps, first row exempt.
//! 3. **Lay out**: `SheetData -> GridLayout` ([`layout_grid`]), a geometry pass that fits cell
//!    text with a [`TextMeasure`] ([`FontMetrics`] shapes with the export fonts).
//! 4. **Output**: CSV ([`serialize_sheet`]), SVG ([`render_svg`]), PNG/JPEG ([`export_image`]),
//!    terminal text ([`render_text`]), or a language-model summary ([`AnalysisPanel`]).
//!
//! Ingestion, classification and serialization are pure and synchronous. Only the image writer
//! and the analysis client touch the outside world.
#![forbid(unsafe_code)]

mod analysis;
mod foundation;
mod layout;
mod render;
mod session;
mod sheet;
mod timing;

pub use analysis::client::{
    AnalysisConfig, Analyzer, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    GeminiAnalyzer,
};
pub use analysis::prompt::{PREVIEW_ROW_LIMIT, build_preview, build_prompt};
pub use analysis::state::{AnalysisPanel, AnalysisState, EMPTY_ANALYSIS_TEXT};
pub use foundation::core::{
    FRAMES_PER_SECOND, HALF_SECOND_FRAMES, HOLD_GLYPH, IN_BETWEEN_ALIASES, IN_BETWEEN_GLYPH, Point,
    Rect, Rgb8, SIX_FRAMES, Size, palette,
};
pub use foundation::error::{XsheetError, XsheetResult};
pub use layout::grid::{
    CellKind, EMPTY_CELL_TEXT, GridCell, GridLayout, GridRow, LayoutMode, LayoutSettings,
    TextLine, TextStyle, layout_grid,
};
pub use layout::text::{ELLIPSIS, TextMeasure, truncate_to_width, wrap_to_width};
pub use render::fonts::{FontMetrics, FontSet};
pub use render::raster::{
    ImageFormat, JPEG_QUALITY, MAX_RASTER_DIM, RasterImage, RasterSettings, encode_image,
    ensure_parent_dir, export_image, export_layout, export_scale, export_svg, image_file_name,
    rasterize_svg, svg_file_name, write_staged,
};
pub use render::svg::render_svg;
pub use render::text::render_text;
pub use session::workspace::Workspace;
pub use sheet::model::{SheetData, SheetHeader, SheetRow, column_id, sheet_name_from_source};
pub use sheet::parse::{normalize_cell, parse_frame_number, parse_sheet};
pub use sheet::serialize::{export_csv_file_name, serialize_sheet};
pub use sheet::split::split_csv_line;
pub use timing::classify::{BoundaryFlags, RuleStyle, TimingTier, classify_row, classify_rows};
