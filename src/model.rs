use crate::foundation::error::{ScrublineError, ScrublineResult};

pub const DEFAULT_EXTENSION: &str = "jpg";
pub const DEFAULT_INDEX_PAD_WIDTH: usize = 3;

/// Configuration of one frame sequence.
///
/// Fully determines the file name of every frame: frame `i` (1-based) lives at
/// `{folder}/{filename_prefix}{i zero-padded to index_pad_width}.{extension}`.
/// Immutable once the sequence is handed to a loader.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SequenceSpec {
    pub folder: String,
    pub frame_count: usize,
    pub filename_prefix: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_index_pad_width")]
    pub index_pad_width: usize,
    /// Identifier of the scroll trigger region that drives this sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_region: Option<String>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_index_pad_width() -> usize {
    DEFAULT_INDEX_PAD_WIDTH
}

impl SequenceSpec {
    pub fn new(
        folder: impl Into<String>,
        frame_count: usize,
        filename_prefix: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into(),
            frame_count,
            filename_prefix: filename_prefix.into(),
            extension: default_extension(),
            index_pad_width: default_index_pad_width(),
            trigger_region: None,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_index_pad_width(mut self, width: usize) -> Self {
        self.index_pad_width = width;
        self
    }

    pub fn with_trigger_region(mut self, id: impl Into<String>) -> Self {
        self.trigger_region = Some(id.into());
        self
    }

    pub fn validate(&self) -> ScrublineResult<()> {
        if self.frame_count == 0 {
            return Err(ScrublineError::validation("frame_count must be > 0"));
        }
        if self.folder.trim().is_empty() {
            return Err(ScrublineError::validation("folder must be non-empty"));
        }
        if self.folder.starts_with('/') {
            return Err(ScrublineError::validation("folder must be relative"));
        }
        if self.folder.split('/').any(|part| part == "..") {
            return Err(ScrublineError::validation("folder must not contain '..'"));
        }
        if self.extension.trim().is_empty() || self.extension.starts_with('.') {
            return Err(ScrublineError::validation(
                "extension must be non-empty and carry no leading dot",
            ));
        }
        Ok(())
    }

    /// File name of frame `index` (1-based) relative to the asset root.
    pub fn frame_file(&self, index: usize) -> String {
        format!(
            "{}/{}{}.{}",
            self.folder,
            self.filename_prefix,
            format_frame_index(index, self.index_pad_width),
            self.extension
        )
    }

    /// Absolute URL form of [`frame_file`](Self::frame_file).
    pub fn frame_url(&self, index: usize) -> String {
        format!("/{}", self.frame_file(index))
    }
}

/// Zero-left-pad `index` to `width` decimal digits.
///
/// Indices whose natural decimal form is wider than `width` come out unpadded
/// beyond that width.
pub fn format_frame_index(index: usize, width: usize) -> String {
    format!("{index:0width$}")
}
