//! Iterated function systems, drawn with the chaos game.
//!
//! An IFS is a list of affine contractions, each with a probability.
//! The chaos game starts from an arbitrary point, and on every step
//! picks one transform at random (weighted by those probabilities) and
//! applies it.  After a short transient the running point never leaves
//! the attractor, and the histogram of where it lands converges to the
//! invariant measure of the system.  That only looks right if each
//! weight is roughly proportional to its transform's contraction;
//! nothing here checks that.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::{self, RenderError, Result};
use crate::geometry::{PlaneMapper, Point2, Viewport};
use crate::histogram::HistogramGrid;
use crate::map_iter::{plot_orbit, DivergencePolicy, PassStats};

/// How far a weight list may stray from summing to one and still be
/// accepted by `IfsSystem::new`.
pub const WEIGHT_TOLERANCE: f64 = 1e-3;

/// `(x, y) -> (a·x + b·y + e, c·x + d·y + f)`, chosen with weight `p`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub p: f64,
}

impl AffineTransform {
    /// Builds a transform from the seven-column row the classic IFS
    /// tables use: `a b c d e f p`.
    pub fn from_row(row: [f64; 7]) -> Self {
        AffineTransform {
            a: row[0],
            b: row[1],
            c: row[2],
            d: row[3],
            e: row[4],
            f: row[5],
            p: row[6],
        }
    }

    /// Checks that every coefficient is finite and the weight is not
    /// negative.  `index` is only used to label the error.
    pub fn validate(&self, index: usize) -> Result<()> {
        for &(name, value) in &[
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("d", self.d),
            ("e", self.e),
            ("f", self.f),
        ] {
            error::finite(name, value)?;
        }
        if !self.p.is_finite() || self.p < 0.0 {
            return Err(RenderError::InvalidWeight {
                index,
                weight: self.p,
            });
        }
        Ok(())
    }

    /// Applies the transform to a point.
    #[inline]
    pub fn apply(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.a + p.y * self.b + self.e,
            p.x * self.c + p.y * self.d + self.f,
        )
    }
}

/// A validated list of weighted transforms.
#[derive(Clone, Debug, PartialEq)]
pub struct IfsSystem {
    transforms: Vec<AffineTransform>,
    cumulative: Vec<f64>,
}

fn check_weights(transforms: &[AffineTransform]) -> Result<f64> {
    if transforms.is_empty() {
        return Err(RenderError::EmptyTransformList);
    }
    for (index, t) in transforms.iter().enumerate() {
        t.validate(index)?;
    }
    Ok(transforms.iter().map(|t| t.p).sum())
}

impl IfsSystem {
    /// Accepts a list whose weights sum to one, within
    /// `WEIGHT_TOLERANCE`.
    pub fn new(transforms: Vec<AffineTransform>) -> Result<Self> {
        let sum = check_weights(&transforms)?;
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(RenderError::WeightSum { sum });
        }
        Ok(IfsSystem::build(transforms))
    }

    /// Accepts any list with a positive total weight, and rescales the
    /// weights so they sum to one.
    pub fn normalized(mut transforms: Vec<AffineTransform>) -> Result<Self> {
        let sum = check_weights(&transforms)?;
        if sum <= 0.0 || !sum.is_finite() {
            return Err(RenderError::WeightSum { sum });
        }
        for t in transforms.iter_mut() {
            t.p /= sum;
        }
        Ok(IfsSystem::build(transforms))
    }

    fn build(transforms: Vec<AffineTransform>) -> Self {
        let cumulative = transforms
            .iter()
            .scan(0.0, |sum, t| {
                *sum += t.p;
                Some(*sum)
            })
            .collect();
        IfsSystem {
            transforms,
            cumulative,
        }
    }

    /// The transforms, in selection order.
    pub fn transforms(&self) -> &[AffineTransform] {
        &self.transforms
    }

    /// Number of transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Always false; construction refuses empty systems.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Maps a uniform draw `u ∈ [0, 1)` to a transform index: the first
    /// transform whose running weight exceeds `u`.  If rounding leaves
    /// the total short of `u`, the last transform is chosen.
    #[inline]
    pub fn select(&self, u: f64) -> usize {
        let last = self.transforms.len() - 1;
        self.cumulative
            .iter()
            .position(|&sum| sum > u)
            .unwrap_or(last)
    }

    /// Draws a transform index.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.select(Uniform::new(0.0, 1.0).sample(rng))
    }
}

/// Plays the chaos game for one IFS into one grid.
#[derive(Clone, Debug)]
pub struct IfsIterator {
    system: IfsSystem,
    iterations: usize,
    settle_down: usize,
    viewport: Viewport,
    seed: Point2,
    divergence: DivergencePolicy,
}

impl IfsIterator {
    /// Constructor.  The first `settle_down` points are not plotted.
    pub fn new(
        system: IfsSystem,
        iterations: usize,
        settle_down: usize,
        viewport: Viewport,
    ) -> Result<Self> {
        error::settle_down(settle_down, iterations)?;
        Ok(IfsIterator {
            system,
            iterations,
            settle_down,
            viewport,
            seed: Point2::new(1.0, 1.0),
            divergence: DivergencePolicy::default(),
        })
    }

    /// Starts the game from another point.
    pub fn with_seed(mut self, seed: Point2) -> Result<Self> {
        error::finite("seed_x", seed.x)?;
        error::finite("seed_y", seed.y)?;
        self.seed = seed;
        Ok(self)
    }

    /// Chooses what happens when an expanding system runs away.
    pub fn with_divergence(mut self, divergence: DivergencePolicy) -> Self {
        self.divergence = divergence;
        self
    }

    /// The system being drawn.
    pub fn system(&self) -> &IfsSystem {
        &self.system
    }

    /// Runs the game, drawing transform choices from `rng`.  The
    /// generator is the only source of randomness; the same seed gives
    /// the same grid.
    pub fn render<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        grid: &mut HistogramGrid,
    ) -> Result<PassStats> {
        let mapper = PlaneMapper::new(grid.width(), grid.height(), self.viewport)?;
        let uniform = Uniform::new(0.0, 1.0);
        let system = &self.system;

        tracing::debug!(
            transforms = system.len(),
            iterations = self.iterations,
            settle_down = self.settle_down,
            "playing the chaos game"
        );
        let stats = plot_orbit(
            self.seed,
            self.iterations,
            self.settle_down,
            self.divergence,
            &mapper,
            grid,
            |p| system.transforms[system.select(uniform.sample(rng))].apply(p),
        );
        stats.log("ifs");
        Ok(stats)
    }
}
