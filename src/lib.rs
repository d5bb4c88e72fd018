//! outline-shape: segmented frame masks → canonical outlines and shape descriptors.
//!
//! For each frame of a sequence the outer contour of the foreground blob is
//! traced, measured (centroid, equivalent ellipse, perimeter, area),
//! thinned to roughly equidistant points and rotated about its centroid by
//! the orientation of frame 0, so every frame of the sequence shares one
//! rotational frame.
//!
//! # Example
//!
//! ```no_run
//! use outline_shape::{run_sequence, AnalysisConfig};
//! use std::path::Path;
//!
//! let config = AnalysisConfig::default();
//! let report = run_sequence(Path::new("worm_seg/Outline_Outside_Coords"), None, &config)?;
//! println!("reference angle {:.2}", report.coordinates.reference.degrees());
//! # Ok::<(), outline_shape::ShapeError>(())
//! ```

#![forbid(unsafe_code)]

pub mod align;
pub mod batch;
pub mod bitmap;
pub mod config;
pub mod contour;
pub mod error;
pub mod frame;
pub mod geom;
pub mod moments;
pub mod output;
pub mod resample;
pub mod segment;
pub mod sequence;

// Re-export kurbo so downstream users get the same `Point` type.
pub use kurbo;

pub use config::{AnalysisConfig, ResamplingMethod, SegmentationConfig};
pub use contour::Contour;
pub use error::ShapeError;
pub use frame::{FrameOutput, ReferenceAngle, RotatedContour};
pub use moments::{ShapeMoments, ShapeProperties};
pub use resample::EquidistantContour;
pub use sequence::SequenceResult;

use std::path::Path;
use std::time::Instant;

/// Both passes over one sequence.
#[derive(Debug, Clone)]
pub struct SequenceReport {
    pub coordinates: SequenceResult,
    pub moments: Vec<ShapeMoments>,
}

/// Full pipeline for one outline directory: coordinate pass, then moments
/// pass, writing every output file.
///
/// Both passes are analyzed before any file is written, so a frame that
/// fails either pass leaves the directory untouched.
///
/// `frame_count` defaults to the number of masks in the directory.
pub fn run_sequence(
    outline_dir: &Path,
    frame_count: Option<usize>,
    config: &AnalysisConfig,
) -> Result<SequenceReport, ShapeError> {
    let t_start = Instant::now();
    let frames = match frame_count {
        Some(n) => n,
        None => output::count_frames(outline_dir, &config.frame_extension)?,
    };
    log::info!("  Load        {} frames in {}", frames, outline_dir.display());

    let coordinates = sequence::analyze_coordinates(outline_dir, frames, config)?;
    let moments = sequence::analyze_moments(outline_dir, frames, config)?;
    sequence::write_coordinates(outline_dir, &coordinates, config)?;
    sequence::write_moments(outline_dir, &moments, config)?;

    log::info!(
        "  Result      {} frames · reference {:.2}° ({}ms)",
        frames,
        coordinates.reference.degrees(),
        t_start.elapsed().as_millis(),
    );
    Ok(SequenceReport {
        coordinates,
        moments,
    })
}
