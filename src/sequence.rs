//! Whole-sequence runners.
//!
//! Two independent passes over frames `0..n` of one outline directory:
//!
//! - the coordinate pass rotates every frame's resampled contour by the
//!   angle of frame 0 and writes `Coords_XXXX.txt` plus `Properties.txt`;
//! - the moments pass stands every frame's raster upright by that frame's
//!   own angle and writes `moments.txt`.
//!
//! The passes use different rotation conventions on purpose; consumers of
//! either table rely on its own convention.
//!
//! Nothing is written unless every frame succeeds. Writing itself is not
//! atomic: an I/O error while saving the per-frame coordinate files leaves
//! the files written so far and no `Properties.txt`.

use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::error::ShapeError;
use crate::frame::{self, FrameMeasurement, FrameOutput, ReferenceAngle};
use crate::moments::{ShapeMoments, ShapeProperties};
use crate::output;

/// Aligned frames of one sequence.
#[derive(Debug, Clone)]
pub struct SequenceResult {
    pub reference: ReferenceAngle,
    pub frames: Vec<FrameOutput>,
}

impl SequenceResult {
    /// One property row per frame, ascending frame index.
    pub fn properties(&self) -> Vec<ShapeProperties> {
        self.frames.iter().map(|f| f.properties).collect()
    }
}

/// Align measured frames to the first one.
///
/// `measurements` must be in ascending frame order starting at frame 0.
pub fn align_sequence(measurements: Vec<FrameMeasurement>) -> Result<SequenceResult, ShapeError> {
    let mut iter = measurements.into_iter();
    let first = iter.next().ok_or(ShapeError::EmptySequence)?;
    let (first, reference) = frame::align_first(first);

    let mut frames = Vec::with_capacity(iter.len() + 1);
    frames.push(first);
    frames.extend(iter.map(|m| frame::align(m, reference)));
    Ok(SequenceResult { reference, frames })
}

/// Measure and align frames `0..frame_count` without writing anything.
///
/// Measurement runs in parallel; alignment waits for frame 0.
pub fn analyze_coordinates(
    outline_dir: &Path,
    frame_count: usize,
    config: &AnalysisConfig,
) -> Result<SequenceResult, ShapeError> {
    if frame_count == 0 {
        return Err(ShapeError::EmptySequence);
    }
    let measurements = (0..frame_count)
        .into_par_iter()
        .map(|i| frame::measure(outline_dir, i, config).map_err(|e| e.in_frame(i)))
        .collect::<Result<Vec<_>, _>>()?;
    align_sequence(measurements)
}

/// Coordinate pass: analyze, then write every `Coords_XXXX.txt` and
/// `Properties.txt`.
pub fn run_coordinates(
    outline_dir: &Path,
    frame_count: usize,
    config: &AnalysisConfig,
) -> Result<SequenceResult, ShapeError> {
    let t_start = Instant::now();
    let result = analyze_coordinates(outline_dir, frame_count, config)?;
    write_coordinates(outline_dir, &result, config)?;

    log::info!(
        "  Coords      {} frames · reference {:.2}° · {}ms",
        result.frames.len(),
        result.reference.degrees(),
        t_start.elapsed().as_millis(),
    );
    Ok(result)
}

/// Write `Coords_XXXX.txt` for every frame, then `Properties.txt`.
pub fn write_coordinates(
    outline_dir: &Path,
    result: &SequenceResult,
    config: &AnalysisConfig,
) -> Result<(), ShapeError> {
    for frame in &result.frames {
        let path = output::coords_path(outline_dir, frame.index);
        output::write_coordinates(&path, &frame.contour.points, config.decimals)?;
    }
    let rows: Vec<[f64; 7]> = result.properties().iter().map(|p| p.to_row()).collect();
    output::write_table(
        &outline_dir.join(output::PROPERTIES_FILE),
        &rows,
        config.decimals,
    )
}

/// Upright moments of frames `0..frame_count`, in frame order, without
/// writing anything. Frames are independent and run in parallel.
pub fn analyze_moments(
    outline_dir: &Path,
    frame_count: usize,
    config: &AnalysisConfig,
) -> Result<Vec<ShapeMoments>, ShapeError> {
    if frame_count == 0 {
        return Err(ShapeError::EmptySequence);
    }
    (0..frame_count)
        .into_par_iter()
        .map(|i| frame::upright_moments(outline_dir, i, config).map_err(|e| e.in_frame(i)))
        .collect()
}

/// Moments pass: analyze, then write `moments.txt` with columns
/// `m00 mu20 mu12 mu11 mu21 mu02`.
pub fn run_moments(
    outline_dir: &Path,
    frame_count: usize,
    config: &AnalysisConfig,
) -> Result<Vec<ShapeMoments>, ShapeError> {
    let t_start = Instant::now();
    let moments = analyze_moments(outline_dir, frame_count, config)?;
    write_moments(outline_dir, &moments, config)?;
    log::info!(
        "  Moments     {} frames · {}ms",
        moments.len(),
        t_start.elapsed().as_millis(),
    );
    Ok(moments)
}

/// Write `moments.txt`, one row per frame.
pub fn write_moments(
    outline_dir: &Path,
    moments: &[ShapeMoments],
    config: &AnalysisConfig,
) -> Result<(), ShapeError> {
    let rows: Vec<[f64; 6]> = moments.iter().map(|m| m.selected()).collect();
    output::write_table(&outline_dir.join(output::MOMENTS_FILE), &rows, config.decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_is_an_error() {
        assert!(matches!(align_sequence(vec![]), Err(ShapeError::EmptySequence)));
        let config = AnalysisConfig::default();
        let dir = Path::new("/nonexistent");
        assert!(matches!(
            analyze_moments(dir, 0, &config),
            Err(ShapeError::EmptySequence)
        ));
    }

    #[test]
    fn missing_frame_reports_its_index() {
        let config = AnalysisConfig::default();
        let err = analyze_coordinates(Path::new("/nonexistent/outline"), 1, &config).unwrap_err();
        match err {
            ShapeError::Frame { index, ref source } => {
                assert_eq!(index, 0);
                assert!(matches!(**source, ShapeError::ImageLoad(_)));
            }
            other => panic!("expected frame error, got {:?}", other),
        }
    }
}
