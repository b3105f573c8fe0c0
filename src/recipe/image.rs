//! Image encoding: turns an uploaded binary into an inline `data:` URI form.

use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

const IMAGE_PREFIX: &str = "image/";
const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// MIME-typed base64 representation of an image. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    payload: String,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

fn check_mime(mime_type: &str) -> Result<()> {
    let is_image = mime_type
        .get(..IMAGE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_PREFIX));
    if is_image {
        Ok(())
    } else {
        Err(Error::UnsupportedType {
            mime_type: mime_type.to_string(),
        })
    }
}

impl EncodedImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self> {
        check_mime(mime_type)?;
        if bytes.is_empty() {
            return Err(Error::read("the file is empty"));
        }

        debug!(mime_type, bytes = bytes.len(), "Encoded image");
        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: STANDARD.encode(bytes),
        })
    }

    /// Parses `data:<mimetype>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(DATA_SCHEME)
            .ok_or_else(|| Error::InvalidDataUri("missing 'data:' scheme".to_string()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUri("missing ',' separator".to_string()))?;
        let mime_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| Error::InvalidDataUri("payload is not base64 encoded".to_string()))?;

        check_mime(mime_type)?;
        let decoded = STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidDataUri(format!("payload does not decode: {}", e)))?;
        if decoded.is_empty() {
            return Err(Error::InvalidDataUri("payload is empty".to_string()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn to_data_uri(&self) -> String {
        format!(
            "{}{}{},{}",
            DATA_SCHEME, self.mime_type, BASE64_MARKER, self.payload
        )
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| Error::InvalidDataUri(e.to_string()))
    }
}

/// Reads `reader` to the end and encodes it. When `declared_len` is known the
/// read must produce exactly that many bytes.
pub async fn encode_reader<R>(
    mime_type: &str,
    declared_len: Option<u64>,
    mut reader: R,
) -> Result<EncodedImage>
where
    R: AsyncRead + Unpin,
{
    check_mime(mime_type)?;

    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| Error::read(e.to_string()))?;

    if let Some(expected) = declared_len {
        if bytes.len() as u64 != expected {
            return Err(Error::read(format!(
                "expected {} bytes, read {}",
                expected,
                bytes.len()
            )));
        }
    }

    EncodedImage::from_bytes(mime_type, &bytes)
}

pub async fn encode_file(path: impl AsRef<Path>, mime_type: &str) -> Result<EncodedImage> {
    check_mime(mime_type)?;

    let path = path.as_ref();
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| Error::read(format!("{}: {}", path.display(), e)))?;
    let declared_len = file
        .metadata()
        .await
        .map_err(|e| Error::read(format!("{}: {}", path.display(), e)))?
        .len();

    encode_reader(mime_type, Some(declared_len), file).await
}
