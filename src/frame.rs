//! Per-frame pipeline: load → trace → measure → resample → align.
//!
//! Measuring (the first three steps) depends only on the frame itself.
//! Alignment needs the sequence's [`ReferenceAngle`], which only the first
//! frame can produce: [`align_first`] returns it, [`align`] consumes it.

use std::path::Path;

use image::GrayImage;
use kurbo::Point;

use crate::align;
use crate::bitmap;
use crate::config::AnalysisConfig;
use crate::contour;
use crate::error::ShapeError;
use crate::geom;
use crate::moments::{self, ShapeMoments, ShapeProperties};
use crate::output;
use crate::resample::{self, EquidistantContour};

/// Fitted angle of frame 0, in degrees. Every frame of a sequence is
/// rotated by this one value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceAngle(f64);

impl ReferenceAngle {
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Rotation in radians applied to contour points.
    pub fn rotation(self) -> f64 {
        align::canonical_rotation(self.0)
    }
}

/// Everything known about a frame before alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMeasurement {
    pub index: usize,
    pub properties: ShapeProperties,
    pub resampled: EquidistantContour,
}

/// Resampled contour rotated about the frame centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedContour {
    pub points: Vec<Point>,
    pub pivot: Point,
    /// Applied rotation, radians.
    pub rotation: f64,
}

/// Result of the full per-frame pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub index: usize,
    pub properties: ShapeProperties,
    pub contour: RotatedContour,
}

/// Measure a binary mask: trace, fit, resample.
pub fn measure_mask(
    index: usize,
    mask: &GrayImage,
    config: &AnalysisConfig,
) -> Result<FrameMeasurement, ShapeError> {
    let traced = contour::extract(mask, config.require_single_blob)?;
    let dense = traced.to_points();
    // Resampling rejects undersized contours before the ellipse fit sees them.
    let resampled = resample::resample(&traced, geom::perimeter(&dense), config)?;
    let properties = moments::analyze_points(&dense)?;
    log::debug!(
        "  Frame {:04}  {} → {} points, angle {:.2}°",
        index,
        traced.len(),
        resampled.points.len(),
        properties.angle,
    );
    Ok(FrameMeasurement {
        index,
        properties,
        resampled,
    })
}

/// Load frame `index` from `outline_dir` and measure it.
pub fn measure(
    outline_dir: &Path,
    index: usize,
    config: &AnalysisConfig,
) -> Result<FrameMeasurement, ShapeError> {
    let path = output::frame_path(outline_dir, index, &config.frame_extension);
    let mask = bitmap::load_mask(&path, config.threshold)?;
    measure_mask(index, &mask, config)
}

/// Align the first frame of a sequence by its own angle, establishing the
/// reference every later frame is rotated by.
pub fn align_first(first: FrameMeasurement) -> (FrameOutput, ReferenceAngle) {
    let reference = ReferenceAngle(first.properties.angle);
    (align(first, reference), reference)
}

/// Align a frame by the sequence reference, ignoring its own angle.
pub fn align(measurement: FrameMeasurement, reference: ReferenceAngle) -> FrameOutput {
    let pivot = measurement.properties.centroid();
    let rotation = reference.rotation();
    let points = align::rotate_points(&measurement.resampled.points, pivot, rotation);
    FrameOutput {
        index: measurement.index,
        properties: measurement.properties,
        contour: RotatedContour {
            points,
            pivot,
            rotation,
        },
    }
}

/// Moments of a mask after rotating the raster upright by its own angle.
///
/// Unlike [`align`], no sequence reference is involved: each frame is
/// stood up independently, then re-traced and re-measured.
pub fn upright_moments_of_mask(
    mask: &GrayImage,
    config: &AnalysisConfig,
) -> Result<ShapeMoments, ShapeError> {
    let traced = contour::extract(mask, config.require_single_blob)?;
    let ellipse = ShapeMoments::from_contour(&traced)?.equivalent_ellipse();
    let upright = align::rotate_mask(
        mask,
        ellipse.center,
        align::canonical_rotation(ellipse.angle),
        config.threshold,
    );
    let retraced = contour::extract(&upright, config.require_single_blob)?;
    ShapeMoments::from_contour(&retraced)
}

/// Load frame `index` and compute its upright moments.
pub fn upright_moments(
    outline_dir: &Path,
    index: usize,
    config: &AnalysisConfig,
) -> Result<ShapeMoments, ShapeError> {
    let path = output::frame_path(outline_dir, index, &config.frame_extension);
    let mask = bitmap::load_mask(&path, config.threshold)?;
    upright_moments_of_mask(&mask, config)
}
