use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::debug;

pub(crate) const DEFAULT_MIME: &str = "application/octet-stream";

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// A bill image held in memory, convertible to and from the inline
/// `data:<mime>;base64,<payload>` form stored on an expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BillImage {
    mime: String,
    bytes: Vec<u8>,
}

/// Frame header of a baseline or progressive JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct JpegInfo {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) components: u8,
    pub(crate) bits_per_component: u8,
}

impl BillImage {
    pub(crate) fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image file fully. The MIME type comes from the extension, then
    /// from the leading bytes, then falls back to `application/octet-stream`.
    pub(crate) fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image file: {}", path.display()))?;
        let mime = mime_from_extension(path)
            .or_else(|| sniff_mime(&bytes))
            .unwrap_or(DEFAULT_MIME);
        debug!(path = %path.display(), mime, size = bytes.len(), "Read bill image");
        Ok(Self::new(mime, bytes))
    }

    pub(crate) fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .context("Image is not a data URL")?;
        let (header, payload) = rest
            .split_once(',')
            .context("Data URL has no payload")?;
        let mime = header
            .strip_suffix(";base64")
            .context("Data URL is not base64-encoded")?;
        let bytes = STANDARD
            .decode(payload.trim())
            .context("Data URL payload is not valid base64")?;
        let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
        Ok(Self::new(mime, bytes))
    }

    pub(crate) fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub(crate) fn mime(&self) -> &str {
        &self.mime
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn size(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn is_jpeg(&self) -> bool {
        self.bytes.starts_with(&[0xFF, 0xD8, 0xFF])
    }

    /// Pixel dimensions for JPEG and PNG payloads.
    pub(crate) fn dimensions(&self) -> Option<(u32, u32)> {
        if self.is_jpeg() {
            return self.jpeg_info().map(|info| (info.width, info.height));
        }
        png_dimensions(&self.bytes)
    }

    /// Walk the JPEG markers up to the first start-of-frame segment.
    pub(crate) fn jpeg_info(&self) -> Option<JpegInfo> {
        let b = &self.bytes;
        if !self.is_jpeg() {
            return None;
        }
        let mut i = 2;
        while i + 1 < b.len() {
            if b[i] != 0xFF {
                return None;
            }
            let marker = b[i + 1];
            match marker {
                // fill byte
                0xFF => {
                    i += 1;
                    continue;
                }
                0x01 | 0xD0..=0xD8 => {
                    i += 2;
                    continue;
                }
                0xD9 | 0xDA => return None,
                _ => {}
            }
            let len = usize::from(u16::from_be_bytes([*b.get(i + 2)?, *b.get(i + 3)?]));
            let is_sof = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
            if is_sof {
                let seg = b.get(i + 4..i + 10)?;
                return Some(JpegInfo {
                    bits_per_component: seg[0],
                    height: u32::from(u16::from_be_bytes([seg[1], seg[2]])),
                    width: u32::from(u16::from_be_bytes([seg[3], seg[4]])),
                    components: seg[5],
                });
            }
            i += 2 + len;
        }
        None
    }

    /// File extension matching the payload, for default save names.
    pub(crate) fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            _ => "bin",
        }
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("Failed to write image: {}", path.display()))?;
        debug!(path = %path.display(), size = self.bytes.len(), "Saved bill image");
        Ok(())
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

pub(crate) fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(PNG_SIGNATURE) {
        Some("image/png")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else {
        None
    }
}

fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if !bytes.starts_with(PNG_SIGNATURE) || bytes.get(12..16)? != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes.get(16..20)?.try_into().ok()?);
    let height = u32::from_be_bytes(bytes.get(20..24)?.try_into().ok()?);
    Some((width, height))
}
