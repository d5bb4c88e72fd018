//! Rigid rotation of contours and rasters about a pivot.
//!
//! Both paths use the same matrix: `x' = cos·dx − sin·dy + cx`,
//! `y' = sin·dx + cos·dy + cy` with `(dx, dy) = p − pivot`. In image
//! coordinates (y down) a positive angle turns +x toward +y.

use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{rotate, Interpolation};
use kurbo::{Affine, Point};

use crate::bitmap;

/// Rotation (radians) that undoes a fitted ellipse angle given in degrees.
pub fn canonical_rotation(angle_deg: f64) -> f64 {
    -angle_deg.to_radians()
}

/// Rotate every point about `pivot` by `angle` radians.
pub fn rotate_points(points: &[Point], pivot: Point, angle: f64) -> Vec<Point> {
    let transform = Affine::rotate_about(angle, pivot);
    points.iter().map(|&p| transform * p).collect()
}

/// Rotate a binary mask about `pivot` by `angle` radians.
///
/// Bilinear sampling with zero fill, then re-binarized at `level` so any
/// partially covered pixel above the level stays foreground. Output keeps the
/// input dimensions; content rotated past the border is lost.
pub fn rotate_mask(mask: &GrayImage, pivot: Point, angle: f64, level: u8) -> GrayImage {
    let rotated = rotate(
        mask,
        (pivot.x as f32, pivot.y as f32),
        angle as f32,
        Interpolation::Bilinear,
        Luma([0u8]),
    );
    bitmap::binarize(&rotated, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{contour, moments};

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn rotation_preserves_pairwise_distances() {
        let pts = vec![
            Point::new(3.0, 4.0),
            Point::new(10.0, -2.0),
            Point::new(-7.5, 8.25),
            Point::new(0.0, 0.0),
        ];
        let pivot = Point::new(1.5, 2.5);
        let rotated = rotate_points(&pts, pivot, canonical_rotation(37.0));
        for i in 0..pts.len() {
            for j in 0..pts.len() {
                let before = pts[i].distance(pts[j]);
                let after = rotated[i].distance(rotated[j]);
                assert!(approx(before, after, 1e-9));
            }
        }
    }

    #[test]
    fn pivot_is_fixed() {
        let pivot = Point::new(12.0, -3.0);
        let out = rotate_points(&[pivot], pivot, 1.234);
        assert!(approx(out[0].x, pivot.x, 1e-12) && approx(out[0].y, pivot.y, 1e-12));
    }

    #[test]
    fn positive_angle_turns_x_toward_y() {
        let out = rotate_points(&[Point::new(1.0, 0.0)], Point::ZERO, std::f64::consts::FRAC_PI_2);
        assert!(approx(out[0].x, 0.0, 1e-12) && approx(out[0].y, 1.0, 1e-12));
        // Undoing 90 degrees sends +y back to +x.
        let back = rotate_points(&out, Point::ZERO, canonical_rotation(90.0));
        assert!(approx(back[0].x, 1.0, 1e-12) && approx(back[0].y, 0.0, 1e-12));
    }

    #[test]
    fn mask_rotation_stands_wide_bar_upright() {
        let mut img = GrayImage::new(100, 100);
        for y in 45..55 {
            for x in 30..70 {
                img.put_pixel(x, y, Luma([255]));
            }
        }
        let before = moments::analyze(&contour::extract(&img, true).unwrap()).unwrap();
        assert!(approx(before.angle, 90.0, 1e-6));

        let rotated = rotate_mask(
            &img,
            before.centroid(),
            canonical_rotation(before.angle),
            0,
        );
        let after = moments::analyze(&contour::extract(&rotated, true).unwrap()).unwrap();
        let d = after.angle.rem_euclid(180.0);
        assert!(d.min(180.0 - d) < 2.0, "angle after rotation {}", after.angle);
        assert!(after.height > after.width);
    }
}
