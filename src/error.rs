use thiserror::Error;

/// Errors raised by the GUI shell.
///
/// `WidgetFileNotFound` and `WidgetNotFound` abort the command that asked for
/// the resource; `GraphicsModeFailure` is fatal at startup.
#[derive(Debug, Error)]
pub enum GuiError {
    #[error("Widget file not found: {0}")]
    WidgetFileNotFound(String),

    #[error("Widget not found: {0}")]
    WidgetNotFound(String),

    #[error("Error setting graphics mode {width}x{height}x{depth}\nTry \"-res WIDTHxHEIGHTxBPP\"")]
    GraphicsModeFailure {
        width: u32,
        height: u32,
        depth: u32,
    },

    #[error("Invalid layout file {file}: {source}")]
    InvalidLayout {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to (de)serialize: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuiError {
    /// True for the "referenced widget or layout file is absent" family.
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, Self::WidgetFileNotFound(_) | Self::WidgetNotFound(_))
    }
}

/// Result type for GUI shell operations
pub type GuiResult<T> = Result<T, GuiError>;
