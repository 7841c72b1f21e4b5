//! Chart image input: validation, format sniffing, and base64 encoding.

use crate::config::LimitsConfig;
use crate::error::{AnalysisError, RequestResult};
use base64::Engine;
use std::io::Read;
use std::path::Path;

/// A validated chart image ready to send to a vision model.
#[derive(Debug, Clone)]
pub struct ChartImage {
    bytes: Vec<u8>,
    media_type: String,
}

impl ChartImage {
    /// Validate raw bytes with a declared media type.
    pub fn new(bytes: Vec<u8>, media_type: &str, limits: &LimitsConfig) -> RequestResult<Self> {
        if bytes.is_empty() {
            return Err(AnalysisError::InvalidInput("Image payload is empty".to_string()));
        }
        if !media_type.starts_with("image/") {
            return Err(AnalysisError::InvalidInput(format!(
                "Unsupported media type '{media_type}': expected an image"
            )));
        }
        check_size(bytes.len() as u64, limits)?;

        Ok(Self {
            bytes,
            media_type: media_type.to_string(),
        })
    }

    /// Load a chart from disk, deriving the media type from its magic bytes.
    pub fn from_path(path: &Path, limits: &LimitsConfig) -> RequestResult<Self> {
        let metadata = std::fs::metadata(path).map_err(|_| {
            AnalysisError::InvalidInput(format!("Image not found: {}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(AnalysisError::InvalidInput(format!(
                "Not a file: {}",
                path.display()
            )));
        }
        // Checked before reading so an oversized file is never loaded
        check_size(metadata.len(), limits)?;

        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        std::fs::File::open(path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .map_err(|e| {
                AnalysisError::InvalidInput(format!("Cannot read {}: {e}", path.display()))
            })?;

        let media_type = sniff_media_type(&bytes).ok_or_else(|| {
            AnalysisError::InvalidInput(format!(
                "Unrecognized image format (invalid magic bytes): {}",
                path.display()
            ))
        })?;

        Self::new(bytes, media_type, limits)
    }

    /// Decode a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str, limits: &LimitsConfig) -> RequestResult<Self> {
        let invalid = || {
            AnalysisError::InvalidInput(
                "Invalid image: expected a data:image/...;base64 URI".to_string(),
            )
        };

        let rest = uri.trim().strip_prefix("data:").ok_or_else(invalid)?;
        let (media_type, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;
        if !media_type.starts_with("image/") {
            return Err(invalid());
        }

        // Size the decoded payload from its encoded length before allocating
        let padding = payload.bytes().rev().take_while(|&b| b == b'=').count();
        let decoded_len = (payload.len() * 3 / 4).saturating_sub(padding);
        check_size(decoded_len as u64, limits)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| AnalysisError::InvalidInput(format!("Invalid base64 image data: {e}")))?;

        Self::new(bytes, media_type, limits)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64-encoded payload (standard alphabet, padded).
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Return the image as a data URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64())
    }
}

fn check_size(len: u64, limits: &LimitsConfig) -> RequestResult<()> {
    if len > limits.max_image_bytes {
        return Err(AnalysisError::InvalidInput(format!(
            "Image is too large ({len} bytes, maximum {} bytes)",
            limits.max_image_bytes
        )));
    }
    Ok(())
}

/// Identify JPEG, PNG, WebP, and GIF by their signatures.
pub(crate) fn sniff_media_type(header: &[u8]) -> Option<&'static str> {
    match header {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn limits() -> LimitsConfig {
        LimitsConfig::default()
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(sniff_media_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_media_type(PNG_HEADER), Some("image/png"));
        assert_eq!(sniff_media_type(b"GIF89a"), Some("image/gif"));
        assert_eq!(sniff_media_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_media_type(b"RIFF\x00\x00\x00\x00WAVE"), None);
        assert_eq!(sniff_media_type(b"%PDF-1.7"), None);
        assert_eq!(sniff_media_type(&[]), None);
    }

    #[test]
    fn test_new_rejects_empty_payload() {
        let err = ChartImage::new(vec![], "image/png", &limits()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_non_image_media_type() {
        let err = ChartImage::new(vec![1, 2, 3], "application/pdf", &limits()).unwrap_err();
        assert!(err.to_string().contains("application/pdf"));
    }

    #[test]
    fn test_new_rejects_oversized_payload() {
        let limits = LimitsConfig { max_image_bytes: 8 };
        assert!(ChartImage::new(vec![0; 8], "image/png", &limits).is_ok());
        let err = ChartImage::new(vec![0; 9], "image/png", &limits).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_from_path_sniffs_media_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();

        let image = ChartImage::from_path(file.path(), &limits()).unwrap();
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.len(), PNG_HEADER.len());
    }

    #[test]
    fn test_from_path_rejects_unknown_format() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an image").unwrap();

        let err = ChartImage::from_path(file.path(), &limits()).unwrap_err();
        assert!(err.to_string().contains("magic bytes"));
    }

    #[test]
    fn test_from_path_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChartImage::from_path(&dir.path().join("nope.png"), &limits()).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_path_rejects_oversized_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PNG_HEADER).unwrap();

        let limits = LimitsConfig { max_image_bytes: 4 };
        let err = ChartImage::from_path(file.path(), &limits).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_data_uri_round_trip() {
        let image = ChartImage::new(PNG_HEADER.to_vec(), "image/png", &limits()).unwrap();
        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let decoded = ChartImage::from_data_uri(&uri, &limits()).unwrap();
        assert_eq!(decoded.as_bytes(), PNG_HEADER);
        assert_eq!(decoded.media_type(), "image/png");
    }

    #[test]
    fn test_from_data_uri_rejects_malformed() {
        for uri in [
            "",
            "image/png;base64,AAAA",
            "data:text/plain;base64,AAAA",
            "data:image/png,AAAA",
            "data:image/png;base64,!!!",
        ] {
            assert!(ChartImage::from_data_uri(uri, &limits()).is_err(), "{uri}");
        }
    }

    #[test]
    fn test_data_uri_size_checked_before_decoding() {
        let limits = LimitsConfig { max_image_bytes: 8 };
        let fits = ChartImage::new(vec![0; 8], "image/png", &limits).unwrap();
        assert!(ChartImage::from_data_uri(&fits.data_uri(), &limits).is_ok());

        // Not valid base64, so only a pre-decode check can report the size
        let oversized = format!("data:image/png;base64,{}", "!".repeat(64));
        let err = ChartImage::from_data_uri(&oversized, &limits).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
