use crate::error::IngestError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const SUPPORTED: [ImageFormat; 6] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

pub const OPEN_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff"];

/// An immutable encoded bitmap. Cloning shares the byte buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Arc<[u8]>,
    format: ImageFormat,
}

impl EncodedImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, IngestError> {
        let format = image::guess_format(&bytes).map_err(|_| IngestError::UnsupportedFormat)?;
        if !SUPPORTED.contains(&format) { return Err(IngestError::UnsupportedFormat); }
        Ok(Self { bytes: bytes.into(), format })
    }

    pub fn from_file(path: &Path) -> Result<Self, IngestError> {
        let bytes = fs::read(path).map_err(|source| IngestError::Read { path: path.to_path_buf(), source })?;
        let img = Self::from_bytes(bytes)?;
        log::info!("Read {} ({}, {} bytes)", path.display(), img.mime_type(), img.len());
        Ok(img)
    }

    /// Builds an image from a raw base64 payload. The format is sniffed from
    /// the bytes; a declared MIME type is not trusted.
    pub fn from_base64(data: &str) -> Result<Self, IngestError> {
        Self::from_bytes(STANDARD.decode(data.trim())?)
    }

    pub fn from_data_url(url: &str) -> Result<Self, IngestError> {
        let rest = url.strip_prefix("data:").ok_or(IngestError::MalformedDataUrl)?;
        let (_mime, payload) = rest.split_once(";base64,").ok_or(IngestError::MalformedDataUrl)?;
        Self::from_base64(payload)
    }

    pub fn to_base64(&self) -> String { STANDARD.encode(&self.bytes) }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.to_base64())
    }

    pub fn decode(&self) -> Result<DynamicImage, IngestError> {
        Ok(image::load_from_memory_with_format(&self.bytes, self.format)?)
    }

    pub fn mime_type(&self) -> &'static str { self.format.to_mime_type() }
    pub fn bytes(&self) -> &[u8] { &self.bytes }
    pub fn len(&self) -> usize { self.bytes.len() }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
impl EncodedImage {
    pub(crate) fn png_from(img: &DynamicImage) -> Self {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode test png");
        Self::from_bytes(out.into_inner()).expect("sniff test png")
    }

    pub(crate) fn solid(w: u32, h: u32, rgba: [u8; 4]) -> Self {
        let buf = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
        Self::png_from(&DynamicImage::ImageRgba8(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_image_bytes() {
        let err = EncodedImage::from_bytes(b"definitely not an image".to_vec()).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat));
    }

    #[test]
    fn test_data_url_carries_mime_and_payload() {
        let img = EncodedImage::solid(4, 3, [10, 20, 30, 255]);
        let url = img.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let back = EncodedImage::from_data_url(&url).unwrap();
        assert_eq!(back, img);
        assert_eq!(back.decode().unwrap().width(), 4);
    }

    #[test]
    fn test_malformed_data_url() {
        assert!(matches!(EncodedImage::from_data_url("image/png;base64,AAAA"), Err(IngestError::MalformedDataUrl)));
        assert!(matches!(EncodedImage::from_data_url("data:image/png,AAAA"), Err(IngestError::MalformedDataUrl)));
        assert!(matches!(EncodedImage::from_data_url("data:image/png;base64,@@@"), Err(IngestError::Base64(_))));
    }

    #[test]
    fn test_truncated_png_is_sniffed_but_fails_to_decode() {
        let img = EncodedImage::solid(8, 8, [0, 0, 0, 255]);
        let truncated = img.bytes()[..24].to_vec();
        let sniffed = EncodedImage::from_bytes(truncated).unwrap();
        assert!(matches!(sniffed.decode(), Err(IngestError::Decode(_))));
    }

    #[test]
    fn test_clones_share_the_buffer() {
        let a = EncodedImage::solid(2, 2, [1, 2, 3, 4]);
        let b = a.clone();
        assert!(std::ptr::eq(a.bytes().as_ptr(), b.bytes().as_ptr()));
    }
}
