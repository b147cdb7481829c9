/// Convenience result type used across xsheet.
pub type XsheetResult<T> = Result<T, XsheetError>;

/// Top-level error taxonomy used by library APIs.
///
/// Malformed cell values are never errors: ingestion degrades them to defaults. Only structural
/// problems (no content, undecodable bytes, oversized output, failed collaborator calls) surface
/// here.
#[derive(thiserror::Error, Debug)]
pub enum XsheetError {
    /// The user handed us something that is not a usable CSV export.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Structural failure while turning text into a sheet.
    #[error("parse error: {0}")]
    Parse(String),

    /// Errors while rasterizing or encoding a sheet image.
    #[error("raster error: {0}")]
    Raster(String),

    /// Errors reported by the analysis collaborator (credentials, transport, decoding).
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl XsheetError {
    /// Build a [`XsheetError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`XsheetError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`XsheetError::Raster`] value.
    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster(msg.into())
    }

    /// Build a [`XsheetError::Analysis`] value.
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// The message without the category prefix, as shown to end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(m) | Self::Parse(m) | Self::Raster(m) | Self::Analysis(m) => {
                m.clone()
            }
            Self::Other(e) => format!("{e:#}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
