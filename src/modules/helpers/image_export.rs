use crate::error::ExportError;
use crate::modules::helpers::css_filter::{FilterFn, apply_chain};
use crate::modules::helpers::encoded_image::EncodedImage;
use image::{DynamicImage, ImageEncoder};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTier {
    Original,
    Qhd,
    Uhd,
}

impl ExportTier {
    pub fn as_str(&self) -> &str {
        match self {
            ExportTier::Original => "Standard",
            ExportTier::Qhd => "2K",
            ExportTier::Uhd => "4K",
        }
    }

    /// Short tag used in exported file names.
    pub fn tag(&self) -> &str {
        match self {
            ExportTier::Original => "orig",
            ExportTier::Qhd => "2k",
            ExportTier::Uhd => "4k",
        }
    }

    pub fn target_width(&self) -> Option<u32> {
        match self {
            ExportTier::Original => None,
            ExportTier::Qhd => Some(2560),
            ExportTier::Uhd => Some(3840),
        }
    }

    pub fn all() -> Vec<ExportTier> {
        vec![ExportTier::Original, ExportTier::Qhd, ExportTier::Uhd]
    }
}

/// Upper bound for a resampled export, about 400 MB of RGBA.
pub const MAX_EXPORT_PIXELS: u64 = 100_000_000;

/// Width snaps to the tier, height keeps the aspect ratio (rounded, at least 1px).
pub fn target_dimensions(width: u32, height: u32, tier: ExportTier) -> Result<(u32, u32), ExportError> {
    let Some(tw) = tier.target_width() else { return Ok((width, height)) };
    let th = if width == 0 {
        (height as u64).max(1)
    } else {
        ((height as u64 * tw as u64 + width as u64 / 2) / width as u64).max(1)
    };
    if th > u32::MAX as u64 || th * tw as u64 > MAX_EXPORT_PIXELS {
        return Err(ExportError::TooLarge { width: tw as u64, height: th });
    }
    Ok((tw, th as u32))
}

/// Resamples to the tier and applies the on-screen filter chain.
/// Rotation and flips are preview-only and not baked in.
pub fn render(source: &EncodedImage, filter: &[FilterFn], tier: ExportTier, high_precision: bool) -> Result<DynamicImage, ExportError> {
    let img = source.decode().map_err(ExportError::Decode)?;

    let (w, h) = target_dimensions(img.width(), img.height(), tier)?;
    let resized = if (w, h) == (img.width(), img.height()) {
        img
    } else {
        let sampling = if high_precision {
            image::imageops::FilterType::Lanczos3
        } else {
            image::imageops::FilterType::Triangle
        };
        img.resize_exact(w, h, sampling)
    };

    Ok(apply_chain(&resized, filter))
}

pub fn encode_png<W: Write>(img: &DynamicImage, writer: W) -> Result<(), ExportError> {
    let rgba = img.to_rgba8();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        writer,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Adaptive,
    );
    encoder.write_image(
        rgba.as_raw(),
        rgba.width(),
        rgba.height(),
        image::ExtendedColorType::Rgba8,
    ).map_err(ExportError::Encode)
}

pub fn export_file_name(tier: ExportTier, millis: i64) -> String {
    format!("ZEditor_PRO_{}_{}.png", tier.tag(), millis)
}

pub fn export_image(source: &EncodedImage, filter: &[FilterFn], tier: ExportTier, high_precision: bool, dir: &Path) -> Result<PathBuf, ExportError> {
    let rendered = render(source, filter, tier, high_precision)?;

    let path = dir.join(export_file_name(tier, chrono::Utc::now().timestamp_millis()));
    let io_err = |source: std::io::Error| ExportError::Io { path: path.clone(), source };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let file = std::fs::File::create(&path).map_err(io_err)?;
    encode_png(&rendered, std::io::BufWriter::new(file))?;

    log::info!("Exported {}x{} {} to {}", rendered.width(), rendered.height(), tier.tag(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::helpers::css_filter::parse_chain;

    #[test]
    fn test_target_dimensions() {
        assert_eq!(target_dimensions(800, 600, ExportTier::Uhd).unwrap(), (3840, 2880));
        assert_eq!(target_dimensions(800, 600, ExportTier::Qhd).unwrap(), (2560, 1920));
        assert_eq!(target_dimensions(1000, 333, ExportTier::Qhd).unwrap(), (2560, 852));
        assert_eq!(target_dimensions(5000, 1, ExportTier::Qhd).unwrap(), (2560, 1));
        assert_eq!(target_dimensions(123, 457, ExportTier::Original).unwrap(), (123, 457));
    }

    #[test]
    fn test_oversized_targets_are_refused() {
        match target_dimensions(1, 1 << 21, ExportTier::Uhd) {
            Err(ExportError::TooLarge { width, height }) => assert_eq!((width, height), (3840, 8_053_063_680)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(target_dimensions(1, 2000, ExportTier::Uhd), Err(ExportError::TooLarge { .. })));
        assert!(target_dimensions(2000, 1, ExportTier::Original).is_ok());

        let strip = EncodedImage::solid(1, 2000, [5, 5, 5, 255]);
        assert!(matches!(render(&strip, &[], ExportTier::Uhd, false), Err(ExportError::TooLarge { .. })));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name(ExportTier::Qhd, 1_700_000_000_123), "ZEditor_PRO_2k_1700000000123.png");
        assert_eq!(export_file_name(ExportTier::Original, 5), "ZEditor_PRO_orig_5.png");
    }

    #[test]
    fn test_original_tier_passes_pixels_through() {
        let src = EncodedImage::solid(7, 5, [90, 140, 30, 255]);
        let out = render(&src, &[], ExportTier::Original, true).unwrap();
        assert_eq!((out.width(), out.height()), (7, 5));
        assert_eq!(out.to_rgba8().get_pixel(3, 2).0, [90, 140, 30, 255]);
    }

    #[test]
    fn test_vivid_4k_export_is_scaled_and_filtered() {
        let src = EncodedImage::solid(800, 600, [150, 90, 60, 255]);
        let vivid = parse_chain("saturate(1.6) contrast(1.15) brightness(1.05)").unwrap();

        let plain = render(&src, &[], ExportTier::Uhd, false).unwrap();
        let graded = render(&src, &vivid, ExportTier::Uhd, false).unwrap();
        assert_eq!((graded.width(), graded.height()), (3840, 2880));
        assert_ne!(plain.to_rgba8().get_pixel(1920, 1440), graded.to_rgba8().get_pixel(1920, 1440));
    }

    #[test]
    fn test_undecodable_source_is_reported() {
        let src = EncodedImage::solid(8, 8, [0, 0, 0, 255]);
        let broken = EncodedImage::from_bytes(src.bytes()[..30].to_vec()).unwrap();
        assert!(matches!(render(&broken, &[], ExportTier::Original, false), Err(ExportError::Decode(_))));
    }

    #[test]
    fn test_export_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let src = EncodedImage::solid(10, 4, [1, 2, 3, 255]);
        let path = export_image(&src, &[FilterFn::Grayscale(1.0)], ExportTier::Qhd, false, dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ZEditor_PRO_2k_") && name.ends_with(".png"));
        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (2560, 1024));
    }
}
