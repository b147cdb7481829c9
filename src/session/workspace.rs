use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::error::{XsheetError, XsheetResult},
    render::raster::{ImageFormat, RasterSettings, export_image, export_svg, write_staged},
    sheet::{
        model::SheetData,
        parse::parse_sheet,
        serialize::{export_csv_file_name, serialize_sheet},
    },
};

/// Holds the currently loaded sheet, if any.
///
/// A load either fully replaces the sheet or leaves the previous one untouched; nothing ever
/// patches a loaded sheet in place.
#[derive(Debug, Default)]
pub struct Workspace {
    sheet: Option<SheetData>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(&self) -> Option<&SheetData> {
        self.sheet.as_ref()
    }

    /// Load a CSV file from disk. Only `.csv` names are accepted.
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load_file(&mut self, path: &Path) -> XsheetResult<&SheetData> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if !file_name.ends_with(".csv") {
            return Err(XsheetError::invalid_input("Please upload a valid CSV file."));
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Error reading file '{}'", path.display()))?;
        let content = String::from_utf8(bytes).map_err(|_| {
            XsheetError::parse("Failed to parse CSV. Ensure it is a valid UTF-8 timeline export.")
        })?;

        self.load_str(&content, &file_name)
    }

    /// Load in-memory CSV text under `source_name`.
    pub fn load_str(&mut self, content: &str, source_name: &str) -> XsheetResult<&SheetData> {
        let sheet = parse_sheet(content, source_name)?;
        tracing::info!(
            name = %sheet.name,
            frames = sheet.frame_count(),
            columns = sheet.column_count(),
            "loaded sheet"
        );
        Ok(&*self.sheet.insert(sheet))
    }

    /// Drop the loaded sheet.
    pub fn clear(&mut self) {
        if let Some(sheet) = self.sheet.take() {
            tracing::info!(name = %sheet.name, "cleared sheet");
        }
    }

    fn require_sheet(&self) -> XsheetResult<&SheetData> {
        self.sheet
            .as_ref()
            .ok_or_else(|| XsheetError::invalid_input("no sheet loaded"))
    }

    /// Write `<dir>/<name>_export.csv`.
    pub fn export_csv(&self, dir: &Path) -> XsheetResult<PathBuf> {
        let sheet = self.require_sheet()?;
        let target = dir.join(export_csv_file_name(sheet));
        write_staged(&target, serialize_sheet(sheet).as_bytes())?;
        tracing::info!(path = %target.display(), "wrote sheet csv");
        Ok(target)
    }

    /// Write `<dir>/<name>_xsheet.<ext>`.
    pub fn export_image(
        &self,
        dir: &Path,
        format: ImageFormat,
        settings: &RasterSettings,
    ) -> XsheetResult<PathBuf> {
        let sheet = self.require_sheet()?;
        export_image(sheet, dir, format, settings)
    }

    /// Write `<dir>/<name>_xsheet.svg`.
    pub fn export_svg(&self, dir: &Path, settings: &RasterSettings) -> XsheetResult<PathBuf> {
        let sheet = self.require_sheet()?;
        export_svg(sheet, dir, settings)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/workspace.rs"]
mod tests;
