//! Batch orchestration over a tree of recordings.
//!
//! For each recording: segment it with the external tool (only when its
//! output directory does not exist yet), count the frame masks, run both
//! sequence passes, drop the scratch directory. Finishes with a manifest of
//! every recording and its frame count.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{AnalysisConfig, SegmentationConfig};
use crate::error::ShapeError;
use crate::output;
use crate::segment;

/// Which files count as recordings, and how failures are handled.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Substring a recording's file name must contain.
    pub needle: String,
    /// Recording file extension.
    pub extension: String,
    /// Log and continue when a recording fails instead of aborting.
    pub keep_going: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            needle: "seg".to_string(),
            extension: "avi".to_string(),
            keep_going: false,
        }
    }
}

/// A recording file and the directory its analysis lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub source: PathBuf,
    /// `<dir>/<name>` for `<dir>/<name>.<ext>`; also the path handed to
    /// the segmentation tool.
    pub output_dir: PathBuf,
}

impl Recording {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let output_dir = source.with_extension("");
        Self { source, output_dir }
    }

    pub fn outline_dir(&self) -> PathBuf {
        self.output_dir.join(output::OUTLINE_DIR)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.output_dir.join(output::SCRATCH_DIR)
    }
}

/// All recordings under `root`, sorted by path.
pub fn discover(root: &Path, options: &BatchOptions) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    walk(root, options, &mut found)?;
    found.sort();
    Ok(found)
}

fn walk(dir: &Path, options: &BatchOptions, found: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, options, found)?;
            continue;
        }
        let name_matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(&options.needle));
        let ext_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&options.extension));
        if name_matches && ext_matches {
            found.push(path);
        }
    }
    Ok(())
}

/// Process one recording and return its frame count.
///
/// An existing output directory means the recording was processed before:
/// its frames are only counted.
pub fn process_recording(
    recording: &Recording,
    analysis: &AnalysisConfig,
    segmentation: Option<&SegmentationConfig>,
) -> Result<usize, ShapeError> {
    let outline_dir = recording.outline_dir();
    if recording.output_dir.exists() {
        let frames = count_existing(&outline_dir, &analysis.frame_extension)?;
        log::info!("  Existing    {} frames, skipping", frames);
        return Ok(frames);
    }

    let segmentation = segmentation.ok_or_else(|| {
        ShapeError::ExternalTool(format!(
            "{} needs segmenting but no tool is configured",
            recording.source.display()
        ))
    })?;

    fs::create_dir_all(recording.scratch_dir())?;
    fs::create_dir_all(&outline_dir)?;

    match segment::run(segmentation, &recording.output_dir) {
        Ok(()) => {}
        Err(e @ ShapeError::ExternalToolTimeout { .. }) => {
            log::warn!("  Segment     {}; continuing with partial output", e);
        }
        Err(e) => return Err(e),
    }

    let frames = output::count_frames(&outline_dir, &analysis.frame_extension)?;
    if frames == 0 {
        log::warn!("  Segment     no frames in {}", outline_dir.display());
    } else {
        crate::run_sequence(&outline_dir, Some(frames), analysis)?;
    }

    let scratch = recording.scratch_dir();
    if scratch.exists() {
        fs::remove_dir_all(&scratch)?;
    }
    Ok(frames)
}

fn count_existing(outline_dir: &Path, extension: &str) -> Result<usize, ShapeError> {
    if outline_dir.is_dir() {
        Ok(output::count_frames(outline_dir, extension)?)
    } else {
        Ok(0)
    }
}

/// Process every recording under `root` and write the manifest.
pub fn run(
    root: &Path,
    manifest: &Path,
    analysis: &AnalysisConfig,
    segmentation: Option<&SegmentationConfig>,
    options: &BatchOptions,
) -> Result<Vec<(String, usize)>, ShapeError> {
    let sources = discover(root, options)?;
    let total = sources.len();
    let mut entries = Vec::with_capacity(total);

    for (i, source) in sources.iter().enumerate() {
        log::info!(
            "  Recording   [{}/{}] {:.1}% {}",
            i + 1,
            total,
            100.0 * i as f64 / total as f64,
            source.display()
        );
        let recording = Recording::new(source);
        let frames = match process_recording(&recording, analysis, segmentation) {
            Ok(n) => n,
            Err(e) if options.keep_going => {
                log::warn!("  Failed      {}: {}", source.display(), e);
                count_existing(&recording.outline_dir(), &analysis.frame_extension)?
            }
            Err(e) => return Err(e),
        };
        entries.push((source.display().to_string(), frames));
    }

    output::write_manifest(manifest, &entries)?;
    log::info!("  Manifest    {} recordings → {}", entries.len(), manifest.display());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("outline-shape-batch-{}-{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).unwrap();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn output_dir_drops_the_extension() {
        let rec = Recording::new("/data/day1/worm_seg.avi");
        assert_eq!(rec.output_dir, PathBuf::from("/data/day1/worm_seg"));
        assert_eq!(
            rec.outline_dir(),
            PathBuf::from("/data/day1/worm_seg/Outline_Outside_Coords")
        );
    }

    #[test]
    fn discovery_filters_by_name_and_extension() {
        let root = scratch("discover");
        fs::create_dir_all(root.join("a/b")).unwrap();
        for f in ["a/x_seg.avi", "a/b/y_seg.AVI", "a/raw.avi", "a/notes_seg.txt"] {
            fs::write(root.join(f), b"").unwrap();
        }
        let found = discover(&root, &BatchOptions::default()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a/b/y_seg.AVI"), PathBuf::from("a/x_seg.avi")]
        );
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn processed_recording_is_only_counted() {
        let root = scratch("existing");
        let rec = Recording::new(root.join("run_seg.avi"));
        fs::create_dir_all(rec.outline_dir()).unwrap();
        fs::write(rec.outline_dir().join("0000.tif"), b"").unwrap();
        fs::write(rec.outline_dir().join("0001.tif"), b"").unwrap();
        fs::write(rec.outline_dir().join("Properties.txt"), b"").unwrap();
        let frames = process_recording(&rec, &AnalysisConfig::default(), None).unwrap();
        assert_eq!(frames, 2);
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn unprocessed_recording_without_tool_fails() {
        let root = scratch("no-tool");
        let rec = Recording::new(root.join("run_seg.avi"));
        let err = process_recording(&rec, &AnalysisConfig::default(), None).unwrap_err();
        assert!(matches!(err, ShapeError::ExternalTool(_)));
        fs::remove_dir_all(&root).ok();
    }
}
