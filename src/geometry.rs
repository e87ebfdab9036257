//! Points, and the mappings between the real plane the dynamical
//! systems live on and the integral plane of pixels.
//!
//! There are three mappings here.  A `PlaneMapper` projects a point of
//! a 2D trajectory onto a grid, centred on the middle of the grid and
//! shifted by a viewport.  A `Projection` flattens a 3D point onto two
//! of its axes and places it on a canvas.  A `SampleRegion` goes the
//! other way, from pixels to points, for renderers that sample a
//! rectangle of the plane.

use crate::error::{self, RenderError, Result};

/// A point on the real plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point2 {
    /// Constructor.
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Neither coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A point in real 3-space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point3 {
    /// First coordinate.
    pub x: f64,
    /// Second coordinate.
    pub y: f64,
    /// Third coordinate.
    pub z: f64,
}

impl Point3 {
    /// Constructor.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// No coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The coordinate along one axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Describes the column, row of a pixel on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Truncates toward zero and keeps the result only if it lands in
/// `[0, limit)`.  NaN and the infinities never land anywhere.
#[inline]
fn truncate_into(value: f64, limit: usize) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < 0.0 || truncated >= limit as f64 {
        None
    } else {
        Some(truncated as usize)
    }
}

/// Scale and shift applied to a trajectory before it meets the grid.
/// The origin of the real plane lands on the centre of the grid, and
/// the offsets are in pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Pixels per unit of the real plane.
    pub scale: f64,
    /// Horizontal shift in pixels.
    pub x_offset: f64,
    /// Vertical shift in pixels.
    pub y_offset: f64,
}

impl Viewport {
    /// Constructor.  Every component must be finite.
    pub fn new(scale: f64, x_offset: f64, y_offset: f64) -> Result<Self> {
        Ok(Viewport {
            scale: error::finite("scale", scale)?,
            x_offset: error::finite("x_offset", x_offset)?,
            y_offset: error::finite("y_offset", y_offset)?,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            scale: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

/// Contains the size of an integral plane and the viewport that places
/// the real plane over it.  Maps trajectory points to pixels.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    viewport: Viewport,
}

impl PlaneMapper {
    /// Constructor.  The integral plane must have some area.
    pub fn new(width: usize, height: usize, viewport: Viewport) -> Result<PlaneMapper> {
        error::dimensions(width, height)?;
        Ok(PlaneMapper {
            width,
            height,
            viewport,
        })
    }

    /// Width of the integral plane.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Given a point on the real plane, find the pixel it falls into:
    /// `W/2 + scale·x + x_offset`, truncated toward zero, and likewise
    /// for y.  Points off the grid, or not finite, have no pixel.
    pub fn point_to_pixel(&self, point: Point2) -> Option<Pixel> {
        let v = &self.viewport;
        let left = (self.width as f64) / 2.0 + v.scale * point.x + v.x_offset;
        let top = (self.height as f64) / 2.0 + v.scale * point.y + v.y_offset;
        let left = truncate_into(left, self.width)?;
        let top = truncate_into(top, self.height)?;
        Some(Pixel(left, top))
    }

    /// The linear offset of the point's pixel from the root of a
    /// row-major buffer.
    pub fn point_to_offset(&self, point: Point2) -> Option<usize> {
        self.point_to_pixel(point)
            .map(|Pixel(left, top)| top * self.width + left)
    }
}

/// One of the three coordinate axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// First coordinate.
    X,
    /// Second coordinate.
    Y,
    /// Third coordinate.
    Z,
}

/// An axis-pair view of a 3D trajectory.  The chosen coordinates are
/// scaled and added to a pixel origin, so several projections can
/// share one canvas side by side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Projection {
    horizontal: Axis,
    vertical: Axis,
    origin_x: f64,
    origin_y: f64,
    scale: f64,
}

impl Projection {
    /// Constructor.  Origins and scale must be finite.
    pub fn new(
        horizontal: Axis,
        vertical: Axis,
        origin_x: f64,
        origin_y: f64,
        scale: f64,
    ) -> Result<Self> {
        Ok(Projection {
            horizontal,
            vertical,
            origin_x: error::finite("origin_x", origin_x)?,
            origin_y: error::finite("origin_y", origin_y)?,
            scale: error::finite("scale", scale)?,
        })
    }

    /// Axis drawn left to right, and axis drawn top to bottom.
    pub fn axes(&self) -> (Axis, Axis) {
        (self.horizontal, self.vertical)
    }

    /// Pixels per unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Flattens a point onto a `width`×`height` surface.
    pub fn point_to_pixel(&self, point: Point3, width: usize, height: usize) -> Option<Pixel> {
        let left = self.origin_x + self.scale * point.along(self.horizontal);
        let top = self.origin_y + self.scale * point.along(self.vertical);
        let left = truncate_into(left, width)?;
        let top = truncate_into(top, height)?;
        Some(Pixel(left, top))
    }
}

/// Describes the left-lower and right-upper corners of a rectangle of
/// the real plane, sampled on an integral grid.  Maps pixels to the
/// point at their upper-left corner.
#[derive(Copy, Clone, Debug)]
pub struct SampleRegion {
    width: usize,
    height: usize,
    leftlower: Point2,
    steps: (f64, f64),
}

impl SampleRegion {
    /// Constructor.  Takes the size of the integral plane, and two
    /// points describing the rectangle of the real plane.
    pub fn new(
        width: usize,
        height: usize,
        leftlower: Point2,
        rightupper: Point2,
    ) -> Result<SampleRegion> {
        error::dimensions(width, height)?;
        if !leftlower.is_finite() || !rightupper.is_finite() {
            return Err(RenderError::InvalidParameter {
                name: "region",
                value: std::f64::NAN,
            });
        }
        if rightupper.x < leftlower.x {
            return Err(RenderError::InvalidParameter {
                name: "region_width",
                value: rightupper.x - leftlower.x,
            });
        }
        if rightupper.y < leftlower.y {
            return Err(RenderError::InvalidParameter {
                name: "region_height",
                value: rightupper.y - leftlower.y,
            });
        }

        let steps = (
            (rightupper.x - leftlower.x) / (width as f64),
            (rightupper.y - leftlower.y) / (height as f64),
        );
        Ok(SampleRegion {
            width,
            height,
            leftlower,
            steps,
        })
    }

    /// Width of the integral plane.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Given a pixel on the integral plane, map that to its point on
    /// the real plane.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Point2 {
        Point2::new(
            self.leftlower.x + (pixel.0 as f64) * self.steps.0,
            self.leftlower.y + (pixel.1 as f64) * self.steps.1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(width: usize, height: usize, scale: f64) -> PlaneMapper {
        PlaneMapper::new(width, height, Viewport::new(scale, 0.0, 0.0).unwrap()).unwrap()
    }

    #[test]
    fn planemapper_fails_on_empty_plane() {
        assert!(PlaneMapper::new(0, 4, Viewport::default()).is_err());
    }

    #[test]
    fn origin_lands_in_the_centre() {
        let pm = mapper(800, 600, 180.0);
        assert_eq!(pm.point_to_pixel(Point2::new(0.0, 0.0)), Some(Pixel(400, 300)));
        assert_eq!(pm.point_to_pixel(Point2::new(1.0, -1.0)), Some(Pixel(580, 120)));
    }

    #[test]
    fn offsets_shift_in_pixels() {
        let vp = Viewport::new(10.0, -20.0, 5.0).unwrap();
        let pm = PlaneMapper::new(100, 100, vp).unwrap();
        assert_eq!(pm.point_to_pixel(Point2::new(1.0, 1.0)), Some(Pixel(40, 65)));
    }

    #[test]
    fn truncation_is_toward_zero() {
        let pm = mapper(4, 4, 1.0);
        // 2 - 2.5 = -0.5 truncates to 0, which is on the grid.
        assert_eq!(pm.point_to_pixel(Point2::new(-2.5, 0.0)), Some(Pixel(0, 2)));
        assert_eq!(pm.point_to_pixel(Point2::new(-3.0, 0.0)), None);
        assert_eq!(pm.point_to_pixel(Point2::new(1.99, 1.99)), Some(Pixel(3, 3)));
        assert_eq!(pm.point_to_pixel(Point2::new(2.0, 0.0)), None);
    }

    #[test]
    fn non_finite_points_have_no_pixel() {
        let pm = mapper(10, 10, 1.0);
        assert_eq!(pm.point_to_pixel(Point2::new(std::f64::NAN, 0.0)), None);
        assert_eq!(pm.point_to_pixel(Point2::new(0.0, std::f64::INFINITY)), None);
        assert_eq!(pm.point_to_pixel(Point2::new(std::f64::NEG_INFINITY, 0.0)), None);
        assert_eq!(pm.point_to_pixel(Point2::new(1e300, 0.0)), None);
    }

    #[test]
    fn offsets_are_row_major() {
        let pm = mapper(10, 10, 1.0);
        assert_eq!(pm.point_to_offset(Point2::new(0.0, 0.0)), Some(55));
        assert_eq!(pm.point_to_offset(Point2::new(-5.0, -5.0)), Some(0));
        assert_eq!(pm.point_to_offset(Point2::new(4.5, 4.5)), Some(99));
    }

    #[test]
    fn projection_picks_axes() {
        let p = Projection::new(Axis::Y, Axis::Z, 600.0, 400.0, 8.0).unwrap();
        let point = Point3::new(100.0, 1.0, -2.0);
        assert_eq!(p.point_to_pixel(point, 800, 800), Some(Pixel(608, 384)));
        assert_eq!(p.point_to_pixel(point, 600, 800), None);
        assert_eq!(p.axes(), (Axis::Y, Axis::Z));
        assert_eq!(p.scale(), 8.0);
    }

    #[test]
    fn projection_rejects_non_finite_settings() {
        assert!(Projection::new(Axis::X, Axis::Y, std::f64::NAN, 0.0, 1.0).is_err());
        assert!(Projection::new(Axis::X, Axis::Y, 0.0, std::f64::INFINITY, 1.0).is_err());
        assert!(Projection::new(Axis::X, Axis::Y, 0.0, 0.0, std::f64::NAN).is_err());
    }

    #[test]
    fn sample_region_fails_on_bad_shape() {
        let r = SampleRegion::new(4, 4, Point2::new(1.0, 1.0), Point2::new(-1.0, -1.0));
        assert!(r.is_err());
    }

    #[test]
    fn pixel_to_point_on_mixed_planes() {
        let r = SampleRegion::new(4, 4, Point2::new(-2.0, -2.0), Point2::new(2.0, 2.0)).unwrap();
        assert_eq!(r.pixel_to_point(Pixel(2, 2)), Point2::new(0.0, 0.0));
        assert_eq!(r.pixel_to_point(Pixel(0, 0)), Point2::new(-2.0, -2.0));
        assert_eq!(r.pixel_to_point(Pixel(4, 4)), Point2::new(2.0, 2.0));
    }
}
