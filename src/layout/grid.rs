use crate::{
    foundation::core::{HOLD_GLYPH, IN_BETWEEN_GLYPH, Point, Rect, Rgb8, Size, palette},
    layout::text::{TextMeasure, truncate_to_width, wrap_to_width},
    sheet::model::SheetData,
    timing::classify::{TimingTier, classify_row},
};

/// Placeholder shown for empty layer cells.
pub const EMPTY_CELL_TEXT: &str = "-";

const CELL_PAD_X: f64 = 2.0;
const CELL_PAD_Y: f64 = 4.0;
const LINE_HEIGHT_EM: f64 = 1.4;

/// How cell content is fitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Fixed-height rows, text truncated with an ellipsis, content centered.
    #[default]
    Screen,
    /// Text wraps and rows grow to fit, content top-aligned. Used for image export.
    Export,
}

/// Geometry and type sizes for [`layout_grid`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub column_width: f64,
    pub row_height: f64,
    pub header_height: f64,
    pub body_font_size: f64,
    pub header_font_size: f64,
    pub marker_font_size: f64,
    pub frame_font_size: f64,
    pub mode: LayoutMode,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            column_width: 40.0,
            row_height: 40.0,
            header_height: 40.0,
            body_font_size: 14.0,
            header_font_size: 12.0,
            marker_font_size: 18.0,
            frame_font_size: 12.0,
            mode: LayoutMode::Screen,
        }
    }
}

impl LayoutSettings {
    pub fn export() -> Self {
        Self {
            mode: LayoutMode::Export,
            ..Self::default()
        }
    }
}

/// What a cell holds, which decides its emphasis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Column header.
    Header,
    /// First column (frame number).
    Frame,
    /// Canonical in-between glyph.
    InBetween,
    /// Miss / hold marker.
    Hold,
    /// Any other non-empty value.
    Text,
    /// Empty layer cell, drawn as a muted placeholder.
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f64,
    pub bold: bool,
    pub color: Rgb8,
}

/// One laid-out line of text, horizontally centered on `anchor.x`, baseline at `anchor.y`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub anchor: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub rect: Rect,
    pub kind: CellKind,
    pub style: TextStyle,
    pub background: Option<Rgb8>,
    pub lines: Vec<TextLine>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridRow {
    pub rect: Rect,
    pub frame: i64,
    pub tier: TimingTier,
    /// Odd rows get a faint background.
    pub zebra: bool,
    pub cells: Vec<GridCell>,
}

/// Renderer-independent layout of a whole sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub size: Size,
    pub mode: LayoutMode,
    pub header: Vec<GridCell>,
    pub rows: Vec<GridRow>,
}

impl GridLayout {
    pub fn header_rect(&self) -> Rect {
        match self.header.first() {
            Some(c) => Rect::new(0.0, c.rect.y0, self.size.width, c.rect.y1),
            None => Rect::ZERO,
        }
    }
}

struct PendingCell {
    kind: CellKind,
    style: TextStyle,
    background: Option<Rgb8>,
    lines: Vec<String>,
}

/// Lay out `sheet` as a vertical X-Sheet grid.
///
/// Columns follow header order; each row carries its timing tier. Text is fitted with `measure`,
/// which must agree with the faces the result is eventually drawn with. The result is plain
/// geometry, so any renderer can draw it without re-deriving sheet semantics.
#[tracing::instrument(skip(sheet, settings, measure), fields(rows = sheet.rows.len(), mode = ?settings.mode))]
pub fn layout_grid(
    sheet: &SheetData,
    settings: &LayoutSettings,
    measure: &mut dyn TextMeasure,
) -> GridLayout {
    let width = settings.column_width * sheet.headers.len() as f64;

    let header_cells: Vec<PendingCell> = sheet
        .headers
        .iter()
        .map(|h| {
            let style = TextStyle {
                font_size: settings.header_font_size,
                bold: true,
                color: palette::SLATE_200,
            };
            PendingCell {
                kind: CellKind::Header,
                style,
                background: Some(palette::SLATE_800),
                lines: fit_text(&h.label, &style, settings, measure),
            }
        })
        .collect();
    let header_height = band_height(&header_cells, settings.header_height, settings);
    let header = place_band(header_cells, 0.0, header_height, settings);

    let mut rows = Vec::with_capacity(sheet.rows.len());
    let mut y = header_height;
    for (i, row) in sheet.rows.iter().enumerate() {
        let pending: Vec<PendingCell> = sheet
            .headers
            .iter()
            .enumerate()
            .map(|(col, h)| body_cell(row.get(&h.id), col == 0, settings, measure))
            .collect();
        let height = band_height(&pending, settings.row_height, settings);
        rows.push(GridRow {
            rect: Rect::new(0.0, y, width, y + height),
            frame: row.frame,
            tier: classify_row(i, row.frame),
            zebra: i % 2 == 1,
            cells: place_band(pending, y, height, settings),
        });
        y += height;
    }

    GridLayout {
        size: Size::new(width, y),
        mode: settings.mode,
        header,
        rows,
    }
}

fn body_cell(
    value: &str,
    is_frame_column: bool,
    settings: &LayoutSettings,
    measure: &mut dyn TextMeasure,
) -> PendingCell {
    let (kind, style, background, text) = if is_frame_column {
        (
            CellKind::Frame,
            TextStyle {
                font_size: settings.frame_font_size,
                bold: true,
                color: palette::SLATE_500,
            },
            Some(palette::SLATE_100),
            value,
        )
    } else if value == IN_BETWEEN_GLYPH || value == HOLD_GLYPH {
        let kind = if value == IN_BETWEEN_GLYPH {
            CellKind::InBetween
        } else {
            CellKind::Hold
        };
        let style = TextStyle {
            font_size: settings.marker_font_size,
            bold: true,
            color: palette::SLATE_800,
        };
        (kind, style, None, value)
    } else if value.is_empty() {
        let style = TextStyle {
            font_size: settings.body_font_size,
            bold: false,
            color: palette::SLATE_300,
        };
        (CellKind::Empty, style, None, EMPTY_CELL_TEXT)
    } else {
        let style = TextStyle {
            font_size: settings.body_font_size,
            bold: false,
            color: palette::SLATE_900,
        };
        (CellKind::Text, style, None, value)
    };

    PendingCell {
        kind,
        style,
        background,
        lines: fit_text(text, &style, settings, measure),
    }
}

fn fit_text(
    text: &str,
    style: &TextStyle,
    settings: &LayoutSettings,
    measure: &mut dyn TextMeasure,
) -> Vec<String> {
    let max_width = (settings.column_width - 2.0 * CELL_PAD_X).max(0.0);
    match settings.mode {
        LayoutMode::Screen => vec![truncate_to_width(
            text,
            max_width,
            style.font_size,
            style.bold,
            measure,
        )],
        LayoutMode::Export => wrap_to_width(text, max_width, style.font_size, style.bold, measure),
    }
}

fn band_height(cells: &[PendingCell], min_height: f64, settings: &LayoutSettings) -> f64 {
    match settings.mode {
        LayoutMode::Screen => min_height,
        LayoutMode::Export => cells
            .iter()
            .map(|c| c.lines.len() as f64 * line_height(c.style.font_size) + 2.0 * CELL_PAD_Y)
            .fold(min_height, f64::max),
    }
}

fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_EM
}

fn place_band(cells: Vec<PendingCell>, y0: f64, height: f64, settings: &LayoutSettings) -> Vec<GridCell> {
    cells
        .into_iter()
        .enumerate()
        .map(|(col, cell)| {
            let x0 = settings.column_width * col as f64;
            let rect = Rect::new(x0, y0, x0 + settings.column_width, y0 + height);
            let lh = line_height(cell.style.font_size);
            let block = cell.lines.len() as f64 * lh;
            let top = match settings.mode {
                LayoutMode::Screen => y0 + (height - block) / 2.0,
                LayoutMode::Export => y0 + CELL_PAD_Y,
            };
            let lines = cell
                .lines
                .into_iter()
                .enumerate()
                .map(|(i, text)| TextLine {
                    text,
                    anchor: Point::new(
                        rect.center().x,
                        top + i as f64 * lh + lh / 2.0 + cell.style.font_size * 0.35,
                    ),
                })
                .collect();
            GridCell {
                rect,
                kind: cell.kind,
                style: cell.style,
                background: cell.background,
                lines,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
