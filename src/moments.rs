//! Contour moments and the equivalent ellipse.
//!
//! Moments are polygon moments of the closed contour (Green's theorem over
//! the boundary), not pixel sums over the mask. They are normalized so that
//! `m00` is the positive enclosed area regardless of winding.
//!
//! Ellipse convention: `height` is the full major axis, `width` the full
//! minor axis, and `angle` is the direction of the width axis in degrees,
//! in `[0, 180)`, measured from +x toward +y in image coordinates (y down).
//! Rotating a shape by `-angle` therefore stands its major axis upright.

use kurbo::Point;

use crate::contour::Contour;
use crate::error::ShapeError;
use crate::geom;

/// Raw moments up to third order plus the derived central moments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeMoments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,
}

impl ShapeMoments {
    /// Moments of the polygon enclosed by `points`.
    ///
    /// Fails with `DegenerateContour` when the enclosed area is zero.
    pub fn from_points(points: &[Point]) -> Result<Self, ShapeError> {
        let n = points.len();
        if n == 0 {
            return Err(ShapeError::DegenerateContour);
        }

        let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
        let (mut a20, mut a11, mut a02) = (0.0, 0.0, 0.0);
        let (mut a30, mut a21, mut a12, mut a03) = (0.0, 0.0, 0.0, 0.0);

        let mut prev = points[n - 1];
        for &cur in points {
            let (x0, y0) = (prev.x, prev.y);
            let (x1, y1) = (cur.x, cur.y);
            let dxy = x0 * y1 - x1 * y0;
            let sx = x0 + x1;
            let sy = y0 + y1;

            a00 += dxy;
            a10 += dxy * sx;
            a01 += dxy * sy;
            a20 += dxy * (x0 * sx + x1 * x1);
            a11 += dxy * (x0 * (sy + y0) + x1 * (sy + y1));
            a02 += dxy * (y0 * sy + y1 * y1);
            a30 += dxy * sx * (x0 * x0 + x1 * x1);
            a03 += dxy * sy * (y0 * y0 + y1 * y1);
            a21 += dxy * (x0 * x0 * (3.0 * y0 + y1) + 2.0 * x1 * x0 * sy + x1 * x1 * (y0 + 3.0 * y1));
            a12 += dxy * (y0 * y0 * (3.0 * x0 + x1) + 2.0 * y1 * y0 * sx + y1 * y1 * (x0 + 3.0 * x1));
            prev = cur;
        }

        if a00.abs() <= f64::EPSILON {
            return Err(ShapeError::DegenerateContour);
        }
        let sign = a00.signum();

        let m00 = sign * a00 / 2.0;
        let m10 = sign * a10 / 6.0;
        let m01 = sign * a01 / 6.0;
        let m20 = sign * a20 / 12.0;
        let m11 = sign * a11 / 24.0;
        let m02 = sign * a02 / 12.0;
        let m30 = sign * a30 / 20.0;
        let m21 = sign * a21 / 60.0;
        let m12 = sign * a12 / 60.0;
        let m03 = sign * a03 / 20.0;

        let cx = m10 / m00;
        let cy = m01 / m00;

        let mu20 = m20 - m10 * cx;
        let mu11 = m11 - m10 * cy;
        let mu02 = m02 - m01 * cy;
        let mu30 = m30 - cx * (3.0 * mu20 + cx * m10);
        let mu21 = m21 - cx * (2.0 * mu11 + cx * m01) - cy * mu20;
        let mu12 = m12 - cy * (2.0 * mu11 + cy * m10) - cx * mu02;
        let mu03 = m03 - cy * (3.0 * mu02 + cy * m01);

        Ok(Self {
            m00,
            m10,
            m01,
            m20,
            m11,
            m02,
            m30,
            m21,
            m12,
            m03,
            mu20,
            mu11,
            mu02,
            mu30,
            mu21,
            mu12,
            mu03,
        })
    }

    pub fn from_contour(contour: &Contour) -> Result<Self, ShapeError> {
        Self::from_points(&contour.to_points())
    }

    /// Center of mass `(m10/m00, m01/m00)`.
    pub fn centroid(&self) -> Point {
        Point::new(self.m10 / self.m00, self.m01 / self.m00)
    }

    /// The subset persisted by the moments pass:
    /// `[m00, mu20, mu12, mu11, mu21, mu02]`.
    pub fn selected(&self) -> [f64; 6] {
        [self.m00, self.mu20, self.mu12, self.mu11, self.mu21, self.mu02]
    }

    /// Ellipse with the same area-normalized second moments.
    pub fn equivalent_ellipse(&self) -> Ellipse {
        let a = self.mu20 / self.m00;
        let b = self.mu11 / self.m00;
        let c = self.mu02 / self.m00;

        let mid = (a + c) / 2.0;
        let spread = (((a - c) / 2.0).powi(2) + b * b).sqrt();
        let major = (mid + spread).max(0.0);
        let minor = (mid - spread).max(0.0);

        // Isotropic: no preferred axis.
        let angle = if spread <= 1e-12 * mid.abs().max(1.0) {
            0.0
        } else {
            let major_dir = 0.5 * (2.0 * b).atan2(a - c);
            let deg = (major_dir.to_degrees() + 90.0).rem_euclid(180.0);
            if deg >= 180.0 { 0.0 } else { deg }
        };

        Ellipse {
            center: self.centroid(),
            width: 4.0 * minor.sqrt(),
            height: 4.0 * major.sqrt(),
            angle,
        }
    }
}

/// Equivalent ellipse of a contour. See the module docs for the convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    /// Full minor axis length.
    pub width: f64,
    /// Full major axis length.
    pub height: f64,
    /// Direction of the width axis, degrees in `[0, 180)`.
    pub angle: f64,
}

/// Per-frame shape descriptor. Field order is the persisted column order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeProperties {
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub perimeter: f64,
    pub area: f64,
}

impl ShapeProperties {
    pub fn centroid(&self) -> Point {
        Point::new(self.centroid_x, self.centroid_y)
    }

    pub fn to_row(&self) -> [f64; 7] {
        [
            self.centroid_x,
            self.centroid_y,
            self.width,
            self.height,
            self.angle,
            self.perimeter,
            self.area,
        ]
    }
}

/// Measure a closed point sequence: centroid, ellipse, perimeter and area.
pub fn analyze_points(points: &[Point]) -> Result<ShapeProperties, ShapeError> {
    let moments = ShapeMoments::from_points(points)?;
    let centroid = moments.centroid();
    let ellipse = moments.equivalent_ellipse();
    Ok(ShapeProperties {
        centroid_x: centroid.x,
        centroid_y: centroid.y,
        width: ellipse.width,
        height: ellipse.height,
        angle: ellipse.angle,
        perimeter: geom::perimeter(points),
        area: geom::area(points),
    })
}

pub fn analyze(contour: &Contour) -> Result<ShapeProperties, ShapeError> {
    analyze_points(&contour.to_points())
}
