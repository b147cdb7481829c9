use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb;

use crate::layout::text::TextMeasure;

/// Primary candidates tried in order when the font directory does not provide one.
const PREFERRED_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "Liberation Mono",
    "Cascadia Mono",
    "Consolas",
    "Menlo",
    "Courier New",
    "DejaVu Sans",
    "Noto Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
];

/// CJK families stacked behind the primary for Japanese layer names.
const FALLBACK_FAMILIES: &[&str] = &[
    "Noto Sans Mono CJK JP",
    "Noto Sans CJK JP",
    "Source Han Sans JP",
    "Hiragino Sans",
    "Yu Gothic",
    "MS Gothic",
    "WenQuanYi Zen Hei",
    "Droid Sans Fallback",
];

const MAX_FALLBACKS: usize = 2;

/// The faces a sheet is measured and drawn with.
///
/// One concrete family stack is chosen from the font database up front. The SVG names it, the
/// rasterizer resolves against it (generic families are pinned to the primary), and
/// [`FontMetrics`] shapes with the very same face bytes, so measured widths match the ink.
#[derive(Clone)]
pub struct FontSet {
    db: Arc<fontdb::Database>,
    families: Vec<String>,
}

impl FontSet {
    /// System fonts plus `.ttf`/`.otf`/`.ttc` files in `extra_dir`. A family found in
    /// `extra_dir` becomes the primary.
    pub fn load(extra_dir: Option<&Path>) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let dir_families = match extra_dir {
            Some(dir) => load_fonts_from_dir(&mut db, dir),
            None => Vec::new(),
        };
        Self::from_database(db, &dir_families)
    }

    /// Pick the family stack from `db`, preferring `preferred` over the built-in candidates.
    pub fn from_database(mut db: fontdb::Database, preferred: &[String]) -> Self {
        let primary = preferred
            .iter()
            .map(String::as_str)
            .chain(PREFERRED_FAMILIES.iter().copied())
            .find(|name| has_family(&db, name))
            .map(str::to_string)
            .or_else(|| {
                db.faces()
                    .find(|f| f.monospaced)
                    .or_else(|| db.faces().next())
                    .and_then(family_of)
            });

        let mut families = Vec::new();
        if let Some(primary) = primary {
            db.set_monospace_family(primary.clone());
            db.set_sans_serif_family(primary.clone());
            db.set_serif_family(primary.clone());
            families.push(primary);
        }
        let fallbacks: Vec<String> = FALLBACK_FAMILIES
            .iter()
            .copied()
            .filter(|name| !families.iter().any(|f| f == *name) && has_family(&db, name))
            .take(MAX_FALLBACKS)
            .map(|name| name.to_string())
            .collect();
        families.extend(fallbacks);

        if families.is_empty() {
            tracing::warn!("no fonts found; sheet text will not be drawn");
        } else {
            tracing::debug!(?families, faces = db.len(), "selected sheet fonts");
        }

        Self {
            db: Arc::new(db),
            families,
        }
    }

    /// Primary family first, then fallbacks.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn primary_family(&self) -> Option<&str> {
        self.families.first().map(String::as_str)
    }

    /// CSS `font-family` value naming the stack, ending in a generic family.
    pub fn css_family_list(&self) -> String {
        let mut out = String::new();
        for family in &self.families {
            out.push('\'');
            out.push_str(&family.replace('\'', ""));
            out.push_str("', ");
        }
        out.push_str("monospace");
        out
    }

    pub(crate) fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    /// Resolver for `usvg`: requested families then the primary; missing glyphs walk the
    /// fallback stack in order before any other face is considered.
    pub(crate) fn font_resolver(&self) -> usvg::FontResolver<'static> {
        let primary = self.primary_family().map(str::to_string);
        let fallbacks: Vec<String> = self.families.iter().skip(1).cloned().collect();
        let any_face = usvg::FontResolver::default_fallback_selector();

        usvg::FontResolver {
            select_font: Box::new(move |font, db| {
                let mut families: Vec<fontdb::Family<'_>> = font
                    .families()
                    .iter()
                    .map(|family| match family {
                        usvg::FontFamily::Serif => fontdb::Family::Serif,
                        usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                        usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                        usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                        usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                        usvg::FontFamily::Named(s) => fontdb::Family::Name(s),
                    })
                    .collect();
                if let Some(p) = &primary {
                    families.push(fontdb::Family::Name(p));
                }

                let style = match font.style() {
                    usvg::FontStyle::Normal => fontdb::Style::Normal,
                    usvg::FontStyle::Italic => fontdb::Style::Italic,
                    usvg::FontStyle::Oblique => fontdb::Style::Oblique,
                };

                db.query(&fontdb::Query {
                    families: &families,
                    weight: fontdb::Weight(font.weight()),
                    stretch: fontdb::Stretch::Normal,
                    style,
                })
            }),
            select_fallback: Box::new(move |c, used, db| {
                let weight = used
                    .first()
                    .and_then(|id| db.face(*id))
                    .map(|f| f.weight)
                    .unwrap_or(fontdb::Weight::NORMAL);
                for name in &fallbacks {
                    let query = fontdb::Query {
                        families: &[fontdb::Family::Name(name)],
                        weight,
                        ..Default::default()
                    };
                    if let Some(id) = db.query(&query).filter(|id| !used.contains(id)) {
                        return Some(id);
                    }
                }
                any_face(c, used, db)
            }),
        }
    }

    /// Text measurer shaping with this stack's faces.
    pub fn metrics(&self) -> FontMetrics {
        if self.families.is_empty() {
            return FontMetrics {
                engine: None,
                cache: HashMap::new(),
            };
        }

        let mut font_ctx = parley::FontContext::default();
        let mut seen_files = HashSet::<PathBuf>::new();
        let mut seen_faces = HashSet::<fontdb::ID>::new();
        for name in &self.families {
            for weight in [fontdb::Weight::NORMAL, fontdb::Weight::BOLD] {
                let query = fontdb::Query {
                    families: &[fontdb::Family::Name(name)],
                    weight,
                    ..Default::default()
                };
                let Some(id) = self.db.query(&query) else {
                    continue;
                };
                if !seen_faces.insert(id) {
                    continue;
                }
                if let Some(path) = self.db.face(id).and_then(face_path)
                    && !seen_files.insert(path.to_path_buf())
                {
                    continue;
                }
                if let Some(bytes) = self.db.with_face_data(id, |data, _| data.to_vec()) {
                    font_ctx
                        .collection
                        .register_fonts(parley::fontique::Blob::from(bytes), None);
                }
            }
        }

        let stack = self
            .families
            .iter()
            .map(|f| format!("\"{}\"", f.replace('"', "")))
            .collect::<Vec<_>>()
            .join(", ");

        FontMetrics {
            engine: Some(ShapingEngine {
                font_ctx,
                layout_ctx: parley::LayoutContext::new(),
                stack,
            }),
            cache: HashMap::new(),
        }
    }
}

/// [`TextMeasure`] backed by `parley` shaping over a [`FontSet`]'s faces. Results are cached
/// per text, size and weight, since sheets repeat the same few values.
pub struct FontMetrics {
    engine: Option<ShapingEngine>,
    cache: HashMap<(String, u64, bool), f64>,
}

struct ShapingEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    stack: String,
}

impl ShapingEngine {
    fn advance(&mut self, text: &str, size_px: f32, bold: bool) -> f64 {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.stack.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        if bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
            .lines()
            .map(|line| f64::from(line.metrics().advance))
            .fold(0.0, f64::max)
    }
}

impl TextMeasure for FontMetrics {
    /// `0` when no font is available: nothing would be drawn either.
    fn advance(&mut self, text: &str, font_size: f64, bold: bool) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let Some(engine) = self.engine.as_mut() else {
            return 0.0;
        };

        let key = (text.to_string(), font_size.to_bits(), bold);
        if let Some(w) = self.cache.get(&key) {
            return *w;
        }
        let w = engine.advance(text, font_size as f32, bold);
        self.cache.insert(key, w);
        w
    }
}

/// Load font files from `dir` (sorted by name) and return the families they added, in order.
fn load_fonts_from_dir(db: &mut fontdb::Database, dir: &Path) -> Vec<String> {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "font directory is not readable");
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = rd
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|s| s.to_str())
                .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    let mut families = Vec::new();
    for path in &paths {
        if let Err(e) = db.load_font_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
            continue;
        }
        for face in db.faces().filter(|f| face_path(f) == Some(path.as_path())) {
            if let Some(family) = family_of(face)
                && !families.contains(&family)
            {
                families.push(family);
            }
        }
    }
    tracing::debug!(dir = %dir.display(), files = paths.len(), ?families, "loaded font directory");
    families
}

fn has_family(db: &fontdb::Database, name: &str) -> bool {
    db.faces()
        .any(|f| f.families.iter().any(|(family, _)| family == name))
}

/// English family name (fontdb keeps it first).
fn family_of(face: &fontdb::FaceInfo) -> Option<String> {
    face.families.first().map(|(name, _)| name.clone())
}

fn face_path(face: &fontdb::FaceInfo) -> Option<&Path> {
    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => Some(path),
        fontdb::Source::Binary(_) => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
