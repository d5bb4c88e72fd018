use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

/// Filled ellipse with semi-axes `(a, b)`, major axis at `major_deg`
/// (from +x toward +y, image coordinates).
pub fn ellipse_mask(
    size: u32,
    center: (f64, f64),
    semi: (f64, f64),
    major_deg: f64,
) -> GrayImage {
    let (cx, cy) = center;
    let (a, b) = semi;
    let (s, c) = major_deg.to_radians().sin_cos();
    let mut img = GrayImage::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let u = dx * c + dy * s;
            let v = -dx * s + dy * c;
            if (u / a).powi(2) + (v / b).powi(2) <= 1.0 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }
    img
}

/// Filled disk of radius `r`.
pub fn disk_mask(size: u32, center: (f64, f64), r: f64) -> GrayImage {
    ellipse_mask(size, center, (r, r), 0.0)
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "outline-shape-it-{}-{}",
        name,
        std::process::id()
    ));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Save masks as `0000.tif`, `0001.tif`, ... in `dir`.
pub fn write_frames(dir: &Path, masks: &[GrayImage]) {
    for (i, mask) in masks.iter().enumerate() {
        mask.save(dir.join(format!("{:04}.tif", i))).unwrap();
    }
}

/// Distance between two axis directions, modulo 180 degrees.
pub fn axis_diff(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(180.0);
    d.min(180.0 - d)
}
