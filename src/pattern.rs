//! Moiré patterns from scalar fields.
//!
//! Each pixel of a rectangle of the real plane is given the value of a
//! polynomial field at its upper-left corner, and the low eight bits of
//! that value become the pixel's intensity.  Where the field's contours
//! crowd together faster than the pixel grid can follow them, aliasing
//! paints the familiar circles-within-circles.

use itertools::iproduct;

use crate::error::Result;
use crate::geometry::{Pixel, Point2, SampleRegion};
use crate::normalize::IntensityGrid;

/// The fields a pattern can be drawn from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldFunction {
    /// `x² + y²`
    Circle,
    /// `x² − y²`
    Hyperbolic,
    /// `x³ + y³`
    Cubic,
    /// `x²y + y²x`
    Mixed,
    /// `x² + y² + xy`
    Elliptic,
}

impl FieldFunction {
    /// All the fields, in a fixed order.
    pub const ALL: [FieldFunction; 5] = [
        FieldFunction::Circle,
        FieldFunction::Hyperbolic,
        FieldFunction::Cubic,
        FieldFunction::Mixed,
        FieldFunction::Elliptic,
    ];

    /// A short name for the field.
    pub fn name(self) -> &'static str {
        match self {
            FieldFunction::Circle => "circle",
            FieldFunction::Hyperbolic => "hyperbolic",
            FieldFunction::Cubic => "cubic",
            FieldFunction::Mixed => "mixed",
            FieldFunction::Elliptic => "elliptic",
        }
    }

    /// Looks a field up by name.
    pub fn from_name(name: &str) -> Option<Self> {
        FieldFunction::ALL.iter().cloned().find(|f| f.name() == name)
    }

    /// The value of the field at a point.
    #[inline]
    pub fn evaluate(self, p: Point2) -> f64 {
        let (x, y) = (p.x, p.y);
        match self {
            FieldFunction::Circle => x * x + y * y,
            FieldFunction::Hyperbolic => x * x - y * y,
            FieldFunction::Cubic => x * x * x + y * y * y,
            FieldFunction::Mixed => x * x * y + y * y * x,
            FieldFunction::Elliptic => x * x + y * y + x * y,
        }
    }
}

/// Truncates toward zero and keeps the low byte, two's complement for
/// negative values.
#[inline]
fn low_byte(v: f64) -> u8 {
    ((v as i64) & 0xff) as u8
}

/// A square region centred on the origin, growing with `zoom`: each unit
/// of zoom widens it by 50 in both directions from a base of 64.
pub fn centered_region(width: usize, height: usize, zoom: f64) -> Result<SampleRegion> {
    let half = 64.0 + 50.0 * zoom;
    SampleRegion::new(
        width,
        height,
        Point2::new(-half, -half),
        Point2::new(half, half),
    )
}

/// Samples `field` over `region`.  The result is an index into a
/// palette rather than a brightness.
pub fn render_pattern(region: &SampleRegion, field: FieldFunction) -> Result<IntensityGrid> {
    let (width, height) = (region.width(), region.height());
    let pixels = iproduct!(0..height, 0..width)
        .map(|(top, left)| low_byte(field.evaluate(region.pixel_to_point(Pixel(left, top)))))
        .collect();
    tracing::debug!(field = field.name(), width, height, "pattern sampled");
    IntensityGrid::from_pixels(width, height, pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_evaluate() {
        let p = Point2::new(2.0, 3.0);
        assert_eq!(FieldFunction::Circle.evaluate(p), 13.0);
        assert_eq!(FieldFunction::Hyperbolic.evaluate(p), -5.0);
        assert_eq!(FieldFunction::Cubic.evaluate(p), 35.0);
        assert_eq!(FieldFunction::Mixed.evaluate(p), 30.0);
        assert_eq!(FieldFunction::Elliptic.evaluate(p), 19.0);
    }

    #[test]
    fn keeps_the_low_byte() {
        assert_eq!(low_byte(13.9), 13);
        assert_eq!(low_byte(256.0), 0);
        assert_eq!(low_byte(300.5), 44);
        assert_eq!(low_byte(-1.0), 255);
        assert_eq!(low_byte(-0.5), 0);
    }

    #[test]
    fn names_round_trip() {
        for field in FieldFunction::ALL.iter() {
            assert_eq!(FieldFunction::from_name(field.name()), Some(*field));
        }
        assert_eq!(FieldFunction::from_name("spiral"), None);
    }

    #[test]
    fn samples_the_upper_left_corner_of_each_pixel() {
        let region =
            SampleRegion::new(4, 2, Point2::new(0.0, 0.0), Point2::new(40.0, 20.0)).unwrap();
        let grid = render_pattern(&region, FieldFunction::Circle).unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 2);
        // Row 0 is y = 0, columns step by 10: 0, 100, 400, 900.
        assert_eq!(grid.pixels()[..4], [0u8, 100, 144, 132][..]);
        // (30, 10) -> 1000.
        assert_eq!(grid.get(3, 1), Some((1000 % 256) as u8));
    }

    #[test]
    fn patterns_are_symmetric_about_the_origin() {
        let region = centered_region(64, 64, 0.0).unwrap();
        let grid = render_pattern(&region, FieldFunction::Circle).unwrap();
        // Pixel k samples -64 + 2k, so columns 1 and 63 are ±62.
        assert_eq!(grid.get(1, 10), grid.get(63, 10));
        assert_eq!(grid.get(10, 1), grid.get(10, 63));
    }
}
