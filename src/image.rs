//! Inline image attachments.
//!
//! Images are kept as self-contained `data:<mime>;base64,<payload>` strings so
//! they serialize straight into the stored note.
use std::{fmt, fs, path::Path, str::FromStr};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Result, StickiesError};

/// A validated base64 data URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    uri: String,
    /// Offset of the payload after `;base64,`
    payload_start: usize,
}

impl DataUri {
    const PREFIX: &'static str = "data:";
    const MARKER: &'static str = ";base64,";

    /// Encodes raw bytes under the given MIME type
    pub fn encode(mime: &str, bytes: &[u8]) -> Self {
        let head = format!("{}{}{}", Self::PREFIX, mime, Self::MARKER);
        let payload_start = head.len();
        DataUri {
            uri: head + &STANDARD.encode(bytes),
            payload_start,
        }
    }

    /// Reads an image file, guessing its MIME type from the extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .ok_or_else(|| StickiesError::InvalidImage {
                message: format!("unsupported image type: {}", path.display()),
            })?;

        let bytes = fs::read(path)?;
        debug!(
            "Read {} bytes of {} from {}",
            bytes.len(),
            mime,
            path.display()
        );
        Ok(Self::encode(mime, &bytes))
    }

    pub fn mime(&self) -> &str {
        &self.uri[Self::PREFIX.len()..self.payload_start - Self::MARKER.len()]
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Decodes the payload back into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.uri[self.payload_start..])
            .map_err(|e| StickiesError::InvalidImage {
                message: e.to_string(),
            })
    }

    /// Suggested file extension for the MIME type
    pub fn extension(&self) -> &'static str {
        match self.mime() {
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            "image/bmp" => "bmp",
            "image/x-icon" => "ico",
            "image/avif" => "avif",
            _ => "png",
        }
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    let mime = match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => return None,
    };
    Some(mime)
}

impl FromStr for DataUri {
    type Err = StickiesError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = |message: &str| StickiesError::InvalidImage {
            message: message.to_string(),
        };

        let rest = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| invalid("missing data: prefix"))?;
        let marker = rest
            .find(Self::MARKER)
            .ok_or_else(|| invalid("only base64 data URIs are supported"))?;

        let mime = &rest[..marker];
        if !mime.starts_with("image/") {
            return Err(invalid("not an image MIME type"));
        }

        let payload_start = Self::PREFIX.len() + marker + Self::MARKER.len();
        STANDARD
            .decode(&s[payload_start..])
            .map_err(|e| invalid(&format!("bad base64 payload: {}", e)))?;

        Ok(DataUri {
            uri: s.to_string(),
            payload_start,
        })
    }
}

impl TryFrom<String> for DataUri {
    type Error = StickiesError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataUri> for String {
    fn from(value: DataUri) -> Self {
        value.uri
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
