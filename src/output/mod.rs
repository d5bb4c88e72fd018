//! On-disk layout and text formats.
//!
//! A recording `<dir>/<name>.avi` owns `<dir>/<name>/`, whose
//! `Outline_Outside_Coords/` holds the per-frame masks (`0000.tif`, ...)
//! and receives every output of the analysis.

mod table;

pub use table::{read_coordinates, write_coordinates, write_manifest, write_table};

use std::path::{Path, PathBuf};

/// Directory holding frame masks and analysis outputs.
pub const OUTLINE_DIR: &str = "Outline_Outside_Coords";
/// Scratch directory the segmentation tool writes into; removed afterwards.
pub const SCRATCH_DIR: &str = "Inside_Shape";
/// Per-sequence shape properties table.
pub const PROPERTIES_FILE: &str = "Properties.txt";
/// Per-sequence upright moments table.
pub const MOMENTS_FILE: &str = "moments.txt";

/// `0007` for frame 7.
pub fn frame_stem(index: usize) -> String {
    format!("{:04}", index)
}

/// Mask of frame `index`.
pub fn frame_path(outline_dir: &Path, index: usize, extension: &str) -> PathBuf {
    outline_dir.join(format!("{}.{}", frame_stem(index), extension))
}

/// Rotated, resampled coordinates of frame `index`.
pub fn coords_path(outline_dir: &Path, index: usize) -> PathBuf {
    outline_dir.join(format!("Coords_{}.txt", frame_stem(index)))
}

/// Number of frame masks with `extension` in `outline_dir`.
///
/// Frames are assumed to be numbered contiguously from 0.
pub fn count_frames(outline_dir: &Path, extension: &str) -> std::io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(outline_dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_zero_padded() {
        let dir = Path::new("/data/run");
        assert_eq!(frame_path(dir, 7, "tif"), PathBuf::from("/data/run/0007.tif"));
        assert_eq!(coords_path(dir, 123), PathBuf::from("/data/run/Coords_0123.txt"));
        assert_eq!(frame_stem(12345), "12345");
    }
}
