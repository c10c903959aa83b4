//! Image inputs and their encoded form.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Where an image's bytes live.
///
/// Items keep this as an opaque display handle; the core never re-reads it
/// after ingestion. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image on disk, read during the batch
    File(PathBuf),

    /// Image already in memory (upload, clipboard)
    Memory { name: String, bytes: Arc<[u8]> },
}

impl ImageSource {
    /// Short label for logs and galleries: the file name or upload name.
    pub fn display_name(&self) -> String {
        match self {
            Self::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Memory { name, .. } => name.clone(),
        }
    }

    /// Name used for mime type guessing.
    fn guess_path(&self) -> &Path {
        match self {
            Self::File(path) => path,
            Self::Memory { name, .. } => Path::new(name),
        }
    }
}

/// Serialized as its display name; image bytes never leave the core.
impl Serialize for ImageSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::File(path) => serializer.serialize_str(&path.display().to_string()),
            Self::Memory { name, .. } => serializer.serialize_str(name),
        }
    }
}

/// One raw image submitted to a batch.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub source: ImageSource,

    /// Explicit mime type; guessed from the name when absent
    pub mime_type: Option<String>,
}

impl ImageInput {
    /// Image file on disk; mime type guessed from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ImageSource::File(path.into()),
            mime_type: None,
        }
    }

    /// In-memory image with a known mime type.
    pub fn from_bytes(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            source: ImageSource::Memory {
                name: name.into(),
                bytes: bytes.into(),
            },
            mime_type: Some(mime_type.into()),
        }
    }

    /// Override the mime type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn label(&self) -> String {
        self.source.display_name()
    }

    /// Explicit mime type if non-empty, otherwise a guess from the name.
    pub fn resolve_mime_type(&self) -> Option<String> {
        self.mime_type
            .as_deref()
            .map(str::trim)
            .filter(|mime| !mime.is_empty())
            .map(str::to_string)
            .or_else(|| {
                mime_guess::from_path(self.source.guess_path())
                    .first()
                    .map(|mime| mime.essence_str().to_string())
            })
    }
}

/// An image in the representation analyzers consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Display name of the source, for logs and diagnostics
    pub label: String,

    /// Standard base64 of the encoded image bytes
    pub data: String,

    /// Non-empty mime type, e.g. "image/jpeg"
    pub mime_type: String,
}

impl EncodedImage {
    /// Approximate size of the unencoded bytes.
    pub fn decoded_len(&self) -> usize {
        self.data.len() / 4 * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_uses_file_name() {
        let source = ImageSource::File(PathBuf::from("/photos/paris/IMG_0042.JPG"));
        assert_eq!(source.display_name(), "IMG_0042.JPG");
    }

    #[test]
    fn mime_type_guessed_from_extension() {
        assert_eq!(
            ImageInput::from_path("tag.jpg").resolve_mime_type().as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            ImageInput::from_path("tag.PNG").resolve_mime_type().as_deref(),
            Some("image/png")
        );
        assert_eq!(ImageInput::from_path("no_extension").resolve_mime_type(), None);
    }

    #[test]
    fn explicit_mime_type_wins() {
        let input = ImageInput::from_path("tag.jpg").with_mime_type("image/webp");
        assert_eq!(input.resolve_mime_type().as_deref(), Some("image/webp"));
    }

    #[test]
    fn blank_mime_type_falls_back_to_guess() {
        let input = ImageInput::from_bytes("upload.webp", vec![1u8, 2, 3], "  ");
        assert_eq!(input.resolve_mime_type().as_deref(), Some("image/webp"));
    }

    #[test]
    fn source_serializes_as_name() {
        let input = ImageInput::from_bytes("upload.png", vec![0u8; 4], "image/png");
        assert_eq!(serde_json::to_string(&input.source).unwrap(), "\"upload.png\"");
    }
}
