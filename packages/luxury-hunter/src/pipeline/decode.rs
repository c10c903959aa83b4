//! Turns raw inputs into the encoded form analyzers consume.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{EncodedImage, ImageInput, ImageSource};

/// Read and base64-encode one image.
///
/// Fails for unreadable files, empty images and inputs whose mime type is
/// neither given nor guessable from the name.
pub async fn decode(input: &ImageInput) -> AnalysisResult<EncodedImage> {
    let label = input.label();

    let mime_type = input
        .resolve_mime_type()
        .ok_or_else(|| AnalysisError::decode(&label, "unknown mime type"))?;

    let data = match &input.source {
        ImageSource::File(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| AnalysisError::decode(&label, e.to_string()))?;
            encode(&label, &bytes)?
        }
        ImageSource::Memory { bytes, .. } => encode(&label, bytes)?,
    };

    Ok(EncodedImage {
        label,
        data,
        mime_type,
    })
}

fn encode(label: &str, bytes: &[u8]) -> AnalysisResult<String> {
    if bytes.is_empty() {
        return Err(AnalysisError::decode(label, "image is empty"));
    }
    Ok(STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn encodes_memory_image() {
        let input = ImageInput::from_bytes("tag.png", vec![0x89u8, b'P', b'N', b'G'], "image/png");
        let encoded = decode(&input).await.unwrap();

        assert_eq!(encoded.label, "tag.png");
        assert_eq!(encoded.mime_type, "image/png");
        assert_eq!(encoded.data, "iVBORw==");
    }

    #[tokio::test]
    async fn reads_file_and_guesses_mime() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"abc").unwrap();

        let encoded = decode(&ImageInput::from_path(file.path())).await.unwrap();
        assert_eq!(encoded.mime_type, "image/jpeg");
        assert_eq!(encoded.data, "YWJj");
    }

    #[tokio::test]
    async fn missing_file_is_decode_error() {
        let err = decode(&ImageInput::from_path("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Decode { ref label, .. } if label == "here.jpg"));
    }

    #[tokio::test]
    async fn empty_image_is_decode_error() {
        let input = ImageInput::from_bytes("empty.png", Vec::<u8>::new(), "image/png");
        assert!(matches!(
            decode(&input).await,
            Err(AnalysisError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_mime_is_decode_error() {
        let input = ImageInput::from_bytes("blob", vec![1u8], "");
        let err = decode(&input).await.unwrap_err();
        assert!(err.to_string().contains("unknown mime type"));
    }
}
