// 🔳 QR matrix - module grid with quiet zone, PNG export

use anyhow::{anyhow, Context as AnyhowContext, Result};
use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};
use std::path::Path;

/// Light border around the symbol, in modules
pub const QUIET_ZONE: usize = 4;

/// Raster scale for the PNG export
pub const MODULE_PIXELS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    /// Side length in modules, quiet zone included
    size: usize,
    dark: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(text: &str) -> Result<Self> {
        let code = QrCode::new(text.as_bytes())
            .map_err(|e| anyhow!("Failed to encode QR payload ({} bytes): {}", text.len(), e))?;

        let width = code.width();
        let colors = code.to_colors();
        let size = width + 2 * QUIET_ZONE;

        let mut dark = vec![false; size * size];
        for (i, color) in colors.iter().enumerate() {
            if *color == Color::Dark {
                let x = i % width + QUIET_ZONE;
                let y = i / width + QUIET_ZONE;
                dark[y * size + x] = true;
            }
        }

        Ok(QrMatrix { size, dark })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major, origin at the top-left corner
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.dark[y * self.size + x]
    }

    pub fn to_image(&self) -> GrayImage {
        let px = self.size as u32 * MODULE_PIXELS;
        GrayImage::from_fn(px, px, |x, y| {
            let dark = self.is_dark((x / MODULE_PIXELS) as usize, (y / MODULE_PIXELS) as usize);
            Luma([if dark { 0 } else { 255 }])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image()
            .save_with_format(path.as_ref(), image::ImageFormat::Png)
            .with_context(|| format!("Failed to write QR image: {:?}", path.as_ref()))
    }
}

/// Reads a QR raster back as 8-bit greyscale
pub fn load_png<P: AsRef<Path>>(path: P) -> Result<GrayImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read QR image: {:?}", path))?;
    let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
        .with_context(|| format!("Failed to decode QR image: {:?}", path))?;
    Ok(decoded.to_luma8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_zone_is_light() {
        let qr = QrMatrix::encode("Nama: Ani, Usia: 6, Berat: 18.0, Tinggi: 110.0").unwrap();
        for i in 0..qr.size() {
            assert!(!qr.is_dark(i, 0));
            assert!(!qr.is_dark(0, i));
            assert!(!qr.is_dark(i, qr.size() - 1));
        }
    }

    #[test]
    fn test_symbol_size_is_a_qr_version() {
        let qr = QrMatrix::encode("hello").unwrap();
        let symbol = qr.size() - 2 * QUIET_ZONE;
        assert!(symbol >= 21);
        assert_eq!((symbol - 21) % 4, 0);
    }

    #[test]
    fn test_finder_pattern_corner_is_dark() {
        let qr = QrMatrix::encode("hello").unwrap();
        assert!(qr.is_dark(QUIET_ZONE, QUIET_ZONE));
        assert!(qr.is_dark(qr.size() - QUIET_ZONE - 1, QUIET_ZONE));
    }

    #[test]
    fn test_png_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        let qr = QrMatrix::encode("png").unwrap();

        qr.save_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        assert_eq!(qr.to_image().width(), qr.size() as u32 * MODULE_PIXELS);
    }

    #[test]
    fn test_png_reads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        let qr = QrMatrix::encode("Nama: Ani").unwrap();
        qr.save_png(&path).unwrap();

        let raster = load_png(&path).unwrap();
        assert_eq!(raster.dimensions(), qr.to_image().dimensions());
        assert_eq!(raster.as_raw(), qr.to_image().as_raw());

        let corner = (QUIET_ZONE as u32 * MODULE_PIXELS) + 1;
        assert_eq!(raster.get_pixel(corner, corner)[0], 0);
        assert_eq!(raster.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_load_png_rejects_other_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(load_png(&path).is_err());
        assert!(load_png(dir.path().join("missing.png")).is_err());
    }
}
