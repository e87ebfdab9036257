//! Continuous-time chaotic flows.
//!
//! A flow is a vector field on 3-space.  `FlowIntegrator` follows it
//! with explicit Euler steps and hands back the trajectory, which can be
//! accumulated into a `HistogramGrid` like any other orbit, or drawn
//! straight onto a `Canvas` through several axis-pair projections at
//! once.  The canvas path adds (or, in inverse mode, subtracts) a fixed
//! colour per visit with saturating byte arithmetic, so there is no
//! normalization pass and a redraw is cheap enough to repeat whenever a
//! parameter changes.

use image::RgbImage;

use crate::error::{self, RenderError, Result};
use crate::geometry::{Pixel, Point3, Projection};
use crate::histogram::HistogramGrid;
use crate::map_iter::{DivergencePolicy, PassStats};

/// The vector fields chaosplot can integrate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlowSystem {
    /// `ẋ = s(y − x)`, `ẏ = r·x − y − x·z`, `ż = x·y − b·z`
    #[allow(missing_docs)]
    Lorenz { s: f64, r: f64, b: f64 },
    /// `ẋ = −y − z`, `ẏ = x + a·y`, `ż = b + z(x − c)`
    #[allow(missing_docs)]
    Rossler { a: f64, b: f64, c: f64 },
    /// `ẋ = −α·x + y² − z² + α·γ`, `ẏ = x(y − β·z) + δ`, `ż = −z + x(β·y + z)`
    #[allow(missing_docs)]
    LorenzMod2 {
        alpha: f64,
        beta: f64,
        gamma: f64,
        delta: f64,
    },
    /// `ẋ = α·x + γ·y·z`, `ẏ = β·x + δ·y − x·z`, `ż = ε·z + ζ·x·y`
    #[allow(missing_docs)]
    WangSun {
        alpha: f64,
        beta: f64,
        gamma: f64,
        delta: f64,
        epsilon: f64,
        zeta: f64,
    },
}

impl FlowSystem {
    /// The classic Lorenz parameters.
    pub fn lorenz() -> Self {
        FlowSystem::Lorenz {
            s: 10.0,
            r: 28.0,
            b: 2.667,
        }
    }

    /// A short name for the system.
    pub fn name(&self) -> &'static str {
        match self {
            FlowSystem::Lorenz { .. } => "lorenz",
            FlowSystem::Rossler { .. } => "rossler",
            FlowSystem::LorenzMod2 { .. } => "lorenz-mod-2",
            FlowSystem::WangSun { .. } => "wang-sun",
        }
    }

    /// Checks that every constant is finite.
    pub fn validate(&self) -> Result<()> {
        match *self {
            FlowSystem::Lorenz { s, r, b } => {
                error::finite("s", s)?;
                error::finite("r", r)?;
                error::finite("b", b)?;
            }
            FlowSystem::Rossler { a, b, c } => {
                error::finite("a", a)?;
                error::finite("b", b)?;
                error::finite("c", c)?;
            }
            FlowSystem::LorenzMod2 {
                alpha,
                beta,
                gamma,
                delta,
            } => {
                error::finite("alpha", alpha)?;
                error::finite("beta", beta)?;
                error::finite("gamma", gamma)?;
                error::finite("delta", delta)?;
            }
            FlowSystem::WangSun {
                alpha,
                beta,
                gamma,
                delta,
                epsilon,
                zeta,
            } => {
                error::finite("alpha", alpha)?;
                error::finite("beta", beta)?;
                error::finite("gamma", gamma)?;
                error::finite("delta", delta)?;
                error::finite("epsilon", epsilon)?;
                error::finite("zeta", zeta)?;
            }
        }
        Ok(())
    }

    /// The velocity at a point.
    #[inline]
    pub fn velocity(&self, p: Point3) -> Point3 {
        let (x, y, z) = (p.x, p.y, p.z);
        match *self {
            FlowSystem::Lorenz { s, r, b } => {
                Point3::new(s * (y - x), r * x - y - x * z, x * y - b * z)
            }
            FlowSystem::Rossler { a, b, c } => Point3::new(-y - z, x + a * y, b + z * (x - c)),
            FlowSystem::LorenzMod2 {
                alpha,
                beta,
                gamma,
                delta,
            } => Point3::new(
                -alpha * x + y * y - z * z + alpha * gamma,
                x * (y - beta * z) + delta,
                -z + x * (beta * y + z),
            ),
            FlowSystem::WangSun {
                alpha,
                beta,
                gamma,
                delta,
                epsilon,
                zeta,
            } => Point3::new(
                x * alpha + gamma * y * z,
                x * beta + y * delta - x * z,
                z * epsilon + zeta * x * y,
            ),
        }
    }
}

/// A vector field and the step size used to follow it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowParameters {
    /// The field.
    pub system: FlowSystem,
    /// Integration step.
    pub dt: f64,
}

impl FlowParameters {
    /// Constructor.  The step must be positive and finite.
    pub fn new(system: FlowSystem, dt: f64) -> Result<Self> {
        system.validate()?;
        if !dt.is_finite() || dt <= 0.0 {
            return Err(RenderError::InvalidParameter { name: "dt", value: dt });
        }
        Ok(FlowParameters { system, dt })
    }
}

/// Follows a flow with explicit Euler steps.
#[derive(Copy, Clone, Debug)]
pub struct FlowIntegrator {
    params: FlowParameters,
    seed: Point3,
    steps: usize,
    settle_down: usize,
    divergence: DivergencePolicy,
}

impl FlowIntegrator {
    /// Constructor.  Starts from `(0, 1, 1.05)`, away from the
    /// equilibrium at the origin.
    pub fn new(params: FlowParameters, steps: usize, settle_down: usize) -> Result<Self> {
        FlowParameters::new(params.system, params.dt)?;
        error::settle_down(settle_down, steps)?;
        Ok(FlowIntegrator {
            params,
            seed: Point3::new(0.0, 1.0, 1.05),
            steps,
            settle_down,
            divergence: DivergencePolicy::default(),
        })
    }

    /// Starts from another point.
    pub fn with_seed(mut self, seed: Point3) -> Result<Self> {
        error::finite("seed_x", seed.x)?;
        error::finite("seed_y", seed.y)?;
        error::finite("seed_z", seed.z)?;
        self.seed = seed;
        Ok(self)
    }

    /// Chooses what happens when the trajectory runs away.
    pub fn with_divergence(mut self, divergence: DivergencePolicy) -> Self {
        self.divergence = divergence;
        self
    }

    /// The field and step size.
    pub fn parameters(&self) -> FlowParameters {
        self.params
    }

    /// Replaces the field and step size.
    pub fn set_parameters(&mut self, params: FlowParameters) -> Result<()> {
        self.params = FlowParameters::new(params.system, params.dt)?;
        Ok(())
    }

    /// One Euler step: `p + dt·f(p)`.
    #[inline]
    pub fn step(&self, p: Point3) -> Point3 {
        let v = self.params.system.velocity(p);
        let dt = self.params.dt;
        Point3::new(p.x + v.x * dt, p.y + v.y * dt, p.z + v.z * dt)
    }

    /// The points of the trajectory past the transient.
    pub fn trajectory(&self) -> Trajectory {
        Trajectory {
            integrator: *self,
            point: self.seed,
            index: 0,
            divergences: 0,
            stopped: false,
        }
    }

    /// Accumulates one projection of the trajectory into a grid, for
    /// offline normalization.
    pub fn accumulate(
        &self,
        projection: &Projection,
        grid: &mut HistogramGrid,
    ) -> Result<PassStats> {
        let mut stats = PassStats::default();
        let mut points = self.trajectory();
        for point in &mut points {
            match projection.point_to_pixel(point, grid.width(), grid.height()) {
                Some(pixel) => {
                    grid.deposit(pixel);
                    stats.plotted += 1;
                }
                None => stats.missed += 1,
            }
        }
        stats.steps = points.index;
        stats.divergences = points.divergences;
        stats.log(self.params.system.name());
        Ok(stats)
    }

    /// Draws every projection of the trajectory onto a canvas.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        projections: &[Projection],
        color: [u8; 3],
        mode: DrawMode,
    ) -> PassStats {
        let mut stats = PassStats::default();
        let mut points = self.trajectory();
        for point in &mut points {
            for projection in projections {
                match projection.point_to_pixel(point, canvas.width(), canvas.height()) {
                    Some(pixel) => {
                        match mode {
                            DrawMode::Draw => canvas.add_pixel(pixel, color),
                            DrawMode::Erase => canvas.sub_pixel(pixel, color),
                        };
                        stats.plotted += 1;
                    }
                    None => stats.missed += 1,
                }
            }
        }
        stats.steps = points.index;
        stats.divergences = points.divergences;
        stats.log(self.params.system.name());
        stats
    }
}

/// Iterator over the plotted part of a flow trajectory.
#[derive(Clone, Debug)]
pub struct Trajectory {
    integrator: FlowIntegrator,
    point: Point3,
    index: usize,
    divergences: usize,
    stopped: bool,
}

impl Iterator for Trajectory {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        let it = &self.integrator;
        while !self.stopped && self.index < it.steps {
            let i = self.index;
            self.index += 1;
            let next = it.step(self.point);
            if !next.is_finite() {
                self.divergences += 1;
                match it.divergence {
                    DivergencePolicy::ResetToSeed => self.point = it.seed,
                    DivergencePolicy::Stop => self.stopped = true,
                }
                continue;
            }
            self.point = next;
            if i > it.settle_down {
                return Some(next);
            }
        }
        None
    }
}

/// Adds two channel values, clamping at 255 instead of wrapping.
#[inline]
pub fn add_saturated(a: u8, b: u8) -> u8 {
    match a.checked_add(b) {
        Some(c) => c,
        None => 0xff,
    }
}

/// Subtracts two channel values, clamping at 0 instead of wrapping.
#[inline]
pub fn sub_saturated(a: u8, b: u8) -> u8 {
    match a.checked_sub(b) {
        Some(c) => c,
        None => 0x00,
    }
}

/// Whether visits brighten a dark canvas or darken a light one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawMode {
    /// Black background, visits add.
    Draw,
    /// White background, visits subtract.
    Erase,
}

impl DrawMode {
    /// The grey the canvas is cleared to.
    pub fn background(self) -> u8 {
        match self {
            DrawMode::Draw => 0x00,
            DrawMode::Erase => 0xff,
        }
    }

    /// The other mode.
    pub fn inverse(self) -> Self {
        match self {
            DrawMode::Draw => DrawMode::Erase,
            DrawMode::Erase => DrawMode::Draw,
        }
    }
}

/// A displayable RGB buffer, three bytes per pixel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A black canvas.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = error::surface(width, height, 3)?;
        Ok(Canvas {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw bytes, R G B per pixel.
    pub fn bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Sets every channel of every pixel to `value`.
    pub fn fill(&mut self, value: u8) {
        for b in self.pixels.iter_mut() {
            *b = value;
        }
    }

    fn index(&self, pixel: Pixel) -> Option<usize> {
        if pixel.0 < self.width && pixel.1 < self.height {
            Some((pixel.1 * self.width + pixel.0) * 3)
        } else {
            None
        }
    }

    /// The colour at a pixel.
    pub fn get(&self, pixel: Pixel) -> Option<[u8; 3]> {
        self.index(pixel)
            .map(|i| [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// Brightens a pixel by `color`, channel by channel.
    pub fn add_pixel(&mut self, pixel: Pixel, color: [u8; 3]) {
        if let Some(i) = self.index(pixel) {
            for (channel, &amount) in self.pixels[i..i + 3].iter_mut().zip(color.iter()) {
                *channel = add_saturated(*channel, amount);
            }
        }
    }

    /// Darkens a pixel by `color`, channel by channel.
    pub fn sub_pixel(&mut self, pixel: Pixel, color: [u8; 3]) {
        if let Some(i) = self.index(pixel) {
            for (channel, &amount) in self.pixels[i..i + 3].iter_mut().zip(color.iter()) {
                *channel = sub_saturated(*channel, amount);
            }
        }
    }

    /// As an RGB image.
    pub fn to_rgb_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
    }
}

/// Amount added per visit in the interactive views.
pub const DEFAULT_COLOR: [u8; 3] = [7, 7, 7];

/// A canvas that knows how to redraw itself.
///
/// Changing the parameters or the mode only marks the canvas dirty.
/// `redraw_if_needed` then clears it and replays the whole trajectory
/// once; calling it again without another change does nothing.
#[derive(Clone, Debug)]
pub struct FlowCanvas {
    integrator: FlowIntegrator,
    projections: Vec<Projection>,
    color: [u8; 3],
    mode: DrawMode,
    canvas: Canvas,
    dirty: bool,
}

impl FlowCanvas {
    /// Constructor.  A new canvas starts dirty, so the first
    /// `redraw_if_needed` draws it.
    pub fn new(
        integrator: FlowIntegrator,
        projections: Vec<Projection>,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        Ok(FlowCanvas {
            integrator,
            projections,
            color: DEFAULT_COLOR,
            mode: DrawMode::Draw,
            canvas: Canvas::new(width, height)?,
            dirty: true,
        })
    }

    /// Sets the amount added or subtracted per visit.
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self.dirty = true;
        self
    }

    /// The current field and step.
    pub fn parameters(&self) -> FlowParameters {
        self.integrator.parameters()
    }

    /// Changes the field or step.  Takes effect on the next redraw.
    pub fn set_parameters(&mut self, params: FlowParameters) -> Result<()> {
        self.integrator.set_parameters(params)?;
        self.dirty = true;
        Ok(())
    }

    /// Current mode.
    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    /// Changes the mode.  Takes effect on the next redraw.
    pub fn set_mode(&mut self, mode: DrawMode) {
        if mode != self.mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// Flips between drawing and erasing.
    pub fn toggle_inverse(&mut self) {
        let mode = self.mode.inverse();
        self.set_mode(mode);
    }

    /// Asks for a redraw with unchanged settings.
    pub fn request_redraw(&mut self) {
        self.dirty = true;
    }

    /// Whether the canvas is out of date.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The pixels as last drawn.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Clears the canvas and replays the trajectory.
    pub fn redraw(&mut self) -> PassStats {
        self.canvas.fill(self.mode.background());
        let stats = self
            .integrator
            .draw(&mut self.canvas, &self.projections, self.color, self.mode);
        self.dirty = false;
        stats
    }

    /// Redraws only if something changed since the last redraw.
    pub fn redraw_if_needed(&mut self) -> Option<PassStats> {
        if self.dirty {
            Some(self.redraw())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;

    fn lorenz(steps: usize, settle_down: usize) -> FlowIntegrator {
        let params = FlowParameters::new(FlowSystem::lorenz(), 0.001).unwrap();
        FlowIntegrator::new(params, steps, settle_down).unwrap()
    }

    fn butterfly() -> Vec<Projection> {
        vec![
            Projection::new(Axis::X, Axis::Y, 200.0, 200.0, 8.0).unwrap(),
            Projection::new(Axis::X, Axis::Z, 200.0, 400.0, 8.0).unwrap(),
            Projection::new(Axis::Y, Axis::Z, 600.0, 400.0, 8.0).unwrap(),
        ]
    }

    #[test]
    fn saturating_channels() {
        assert_eq!(add_saturated(10, 7), 17);
        assert_eq!(add_saturated(250, 7), 255);
        assert_eq!(add_saturated(255, 7), 255);
        assert_eq!(sub_saturated(10, 7), 3);
        assert_eq!(sub_saturated(3, 7), 0);
        assert_eq!(sub_saturated(0, 7), 0);
    }

    #[test]
    fn canvas_pixels_saturate() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        canvas.fill(255);
        canvas.add_pixel(Pixel(1, 1), [7, 7, 7]);
        assert_eq!(canvas.get(Pixel(1, 1)), Some([255, 255, 255]));
        canvas.fill(0);
        canvas.sub_pixel(Pixel(0, 1), [7, 7, 7]);
        assert_eq!(canvas.get(Pixel(0, 1)), Some([0, 0, 0]));
        canvas.add_pixel(Pixel(0, 1), [1, 2, 3]);
        assert_eq!(canvas.get(Pixel(0, 1)), Some([1, 2, 3]));
        // Off the canvas is silently ignored.
        canvas.add_pixel(Pixel(2, 0), [7, 7, 7]);
        assert_eq!(canvas.get(Pixel(2, 0)), None);
    }

    #[test]
    fn oversized_canvases_are_refused() {
        let width = usize::max_value() / 2;
        assert_eq!(
            Canvas::new(width, 2),
            Err(RenderError::InvalidDimensions { width, height: 2 })
        );
        // The area fits but three channels of it do not.
        assert!(Canvas::new(usize::max_value() / 3, 2).is_err());
        assert!(Canvas::new(0, 2).is_err());
    }

    #[test]
    fn euler_step_of_lorenz() {
        let it = lorenz(10, 0);
        let p = it.step(Point3::new(0.0, 1.0, 1.05));
        assert!((p.x - 0.01).abs() < 1e-12);
        assert!((p.y - 0.999).abs() < 1e-12);
        assert!((p.z - (1.05 - 0.001 * 2.667 * 1.05)).abs() < 1e-12);
    }

    #[test]
    fn rossler_velocity() {
        let r = FlowSystem::Rossler {
            a: 0.2,
            b: 0.2,
            c: 5.7,
        };
        assert_eq!(
            r.velocity(Point3::new(1.0, 2.0, 3.0)),
            Point3::new(-5.0, 1.4, 0.2 + 3.0 * (1.0 - 5.7))
        );
    }

    #[test]
    fn trajectories_skip_the_transient_and_repeat() {
        let it = lorenz(2000, 1000);
        let first: Vec<Point3> = it.trajectory().collect();
        // Indices 1001..=1999 are plotted.
        assert_eq!(first.len(), 999);
        let second: Vec<Point3> = it.trajectory().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_bad_steps() {
        assert!(FlowParameters::new(FlowSystem::lorenz(), 0.0).is_err());
        assert!(FlowParameters::new(FlowSystem::lorenz(), std::f64::NAN).is_err());
        let params = FlowParameters::new(FlowSystem::lorenz(), 0.01).unwrap();
        assert!(FlowIntegrator::new(params, 10, 10).is_err());
    }

    #[test]
    fn runaway_flows_reset() {
        // A huge step makes Euler explode within a few steps.
        let params = FlowParameters::new(FlowSystem::lorenz(), 10.0).unwrap();
        let it = FlowIntegrator::new(params, 200, 0).unwrap();
        let mut points = it.trajectory();
        let plotted: Vec<Point3> = (&mut points).collect();
        assert!(points.divergences > 0);
        assert!(plotted.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn redraw_is_idempotent() {
        let params = FlowParameters::new(FlowSystem::lorenz(), 0.001).unwrap();
        let it = FlowIntegrator::new(params, 20_000, 1000).unwrap();
        let mut view = FlowCanvas::new(it, butterfly(), 800, 800).unwrap();
        assert!(view.is_dirty());
        let stats = view.redraw_if_needed().unwrap();
        assert!(stats.plotted > 0);
        assert!(!view.is_dirty());
        assert!(view.redraw_if_needed().is_none());

        let first = view.canvas().clone();
        view.request_redraw();
        view.redraw_if_needed().unwrap();
        assert_eq!(view.canvas(), &first);
    }

    #[test]
    fn inverse_mode_darkens_a_white_canvas() {
        let params = FlowParameters::new(FlowSystem::lorenz(), 0.001).unwrap();
        let it = FlowIntegrator::new(params, 20_000, 1000).unwrap();
        let mut view = FlowCanvas::new(it, butterfly(), 800, 800).unwrap();
        view.redraw();
        let drawn = view.canvas().clone();

        view.toggle_inverse();
        assert_eq!(view.mode(), DrawMode::Erase);
        assert!(view.is_dirty());
        view.redraw();
        let erased = view.canvas();

        assert!(erased.bytes().iter().any(|&b| b < 255));
        // Every byte is the mirror image of the additive drawing.
        for (d, e) in drawn.bytes().iter().zip(erased.bytes()) {
            assert_eq!(255 - d, *e);
        }
    }

    #[test]
    fn changing_parameters_marks_dirty() {
        let mut view = FlowCanvas::new(lorenz(200_000, 1000), butterfly(), 800, 800).unwrap();
        view.redraw_if_needed();
        let params = FlowParameters::new(
            FlowSystem::Lorenz {
                s: 10.0,
                r: 28.1,
                b: 2.667,
            },
            0.001,
        )
        .unwrap();
        view.set_parameters(params).unwrap();
        assert!(view.is_dirty());
        assert_eq!(view.parameters(), params);
        view.set_mode(DrawMode::Draw);
        view.redraw_if_needed();
        view.set_mode(DrawMode::Draw);
        assert!(!view.is_dirty());
    }

    #[test]
    fn accumulates_into_a_histogram() {
        let it = lorenz(20_000, 1000);
        let projection = Projection::new(Axis::X, Axis::Z, 200.0, 50.0, 6.0).unwrap();
        let mut grid = HistogramGrid::new(400, 400).unwrap();
        let stats = it.accumulate(&projection, &mut grid).unwrap();
        assert_eq!(stats.steps, 20_000);
        assert_eq!(grid.total(), stats.plotted as f64);
        assert!(stats.plotted > 0);
    }
}
