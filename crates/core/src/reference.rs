//! Optional reference image attached to a generation request.

use crate::error::CoreError;

/// File name used when the caller supplies an empty one.
pub const DEFAULT_REFERENCE_FILENAME: &str = "reference.png";

/// MIME type sent when the image format cannot be detected.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A user-supplied image used to condition generation.
///
/// Shared by both generation modes. The configuration holds it behind an
/// `Arc` so attaching, replacing and clearing swap the whole handle at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAsset {
    file_name: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl ReferenceAsset {
    /// Wrap raw image bytes.
    ///
    /// The MIME type is detected from the magic bytes; unknown formats are
    /// still accepted and sent as [`FALLBACK_CONTENT_TYPE`].
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::Validation(
                "Reference image must not be empty".to_string(),
            ));
        }

        let file_name = file_name.into().trim().to_string();
        let file_name = if file_name.is_empty() {
            DEFAULT_REFERENCE_FILENAME.to_string()
        } else {
            file_name
        };

        let content_type = image::guess_format(&bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(FALLBACK_CONTENT_TYPE);

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn png_bytes_detected() {
        let asset = ReferenceAsset::new("toddler.png", PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(asset.content_type(), "image/png");
        assert_eq!(asset.file_name(), "toddler.png");
        assert_eq!(asset.bytes().len(), PNG_MAGIC.len());
    }

    #[test]
    fn jpeg_bytes_detected() {
        let asset = ReferenceAsset::new("ref.jpg", JPEG_MAGIC.to_vec()).unwrap();
        assert_eq!(asset.content_type(), "image/jpeg");
    }

    #[test]
    fn unknown_bytes_fall_back_to_octet_stream() {
        let asset = ReferenceAsset::new("notes.bin", b"hello world".to_vec()).unwrap();
        assert_eq!(asset.content_type(), FALLBACK_CONTENT_TYPE);
    }

    #[test]
    fn blank_file_name_gets_default() {
        let asset = ReferenceAsset::new("   ", PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(asset.file_name(), DEFAULT_REFERENCE_FILENAME);
    }

    #[test]
    fn empty_bytes_rejected() {
        let err = ReferenceAsset::new("ref.png", Vec::new()).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}
