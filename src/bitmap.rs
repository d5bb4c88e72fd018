use std::path::Path;

use image::{GrayImage, ImageReader};
use imageproc::contrast::{threshold, ThresholdType};

use crate::error::ShapeError;

/// Load a frame as an 8-bit grayscale raster.
pub fn load(path: &Path) -> Result<GrayImage, ShapeError> {
    let img = ImageReader::open(path)
        .map_err(|e| ShapeError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| ShapeError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .into_luma8();
    Ok(img)
}

/// Binarize with a fixed global level.
///
/// Pixels above `level` become 255, everything else 0.
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    threshold(gray, level, ThresholdType::Binary)
}

/// Load and binarize in one step.
pub fn load_mask(path: &Path, level: u8) -> Result<GrayImage, ShapeError> {
    let gray = load(path)?;
    Ok(binarize(&gray, level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn zero_level_keeps_any_nonzero_pixel() {
        let mut img = GrayImage::new(4, 1);
        img.put_pixel(1, 0, Luma([1]));
        img.put_pixel(2, 0, Luma([128]));
        img.put_pixel(3, 0, Luma([255]));
        let mask = binarize(&img, 0);
        let row: Vec<u8> = mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(row, vec![0, 255, 255, 255]);
    }

    #[test]
    fn missing_file_is_image_load_error() {
        let err = load(Path::new("/nonexistent/frame/0000.tif")).unwrap_err();
        assert!(matches!(err, ShapeError::ImageLoad(_)));
    }
}
