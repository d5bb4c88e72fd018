use image::{imageops, GrayImage};
use imageproc::contours::{find_contours, BorderType};
use kurbo::Point;

use crate::error::ShapeError;

/// Outer boundary of the foreground blob, in pixel coordinates
/// (y=0 is the top of the image).
///
/// Closed: the last point is adjacent to the first and is not repeated.
/// Winding follows the border-following order and is not normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<(i32, i32)>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as floating-point geometry.
    pub fn to_points(&self) -> Vec<Point> {
        self.points
            .iter()
            .map(|&(x, y)| Point::new(x as f64, y as f64))
            .collect()
    }
}

/// Trace the outer boundary of a binary mask (nonzero = foreground).
///
/// Every boundary pixel is kept; no polyline simplification.
/// Holes are ignored. With `require_single_blob`, a mask with more than one
/// outer border fails with `MultipleBlobs`; otherwise the first traced
/// border wins and the rest are dropped.
///
/// Blobs touching the image edge are traced like any other: the mask is
/// framed by one background pixel before tracing, and the border follower
/// only reports a blob's boundary as outer when background surrounds it.
pub fn extract(mask: &GrayImage, require_single_blob: bool) -> Result<Contour, ShapeError> {
    let framed = pad(mask);
    let mut outers: Vec<_> = find_contours::<i32>(&framed)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .collect();

    if outers.is_empty() {
        return Err(ShapeError::NoContour);
    }
    if require_single_blob && outers.len() > 1 {
        return Err(ShapeError::MultipleBlobs {
            count: outers.len(),
        });
    }
    if outers.len() > 1 {
        log::debug!("  Trace       {} blobs, keeping the first", outers.len());
    }

    let first = outers.swap_remove(0);
    let points = first.points.iter().map(|p| (p.x - 1, p.y - 1)).collect();
    Ok(Contour { points })
}

/// Copy of `mask` with a one-pixel background border on every side.
fn pad(mask: &GrayImage) -> GrayImage {
    let mut framed = GrayImage::new(mask.width() + 2, mask.height() + 2);
    imageops::replace(&mut framed, mask, 1, 1);
    framed
}
