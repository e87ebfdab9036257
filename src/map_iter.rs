//! Plots the orbit of a single point under a deterministic map.
//!
//! This is the attractor analogue of plotting a Buddhabrot orbit: start
//! somewhere, apply the map over and over, and every time the orbit
//! passes through a pixel, bump that pixel's counter.  The first few
//! points are thrown away while the orbit settles onto the attractor.

use crate::error::{self, Result};
use crate::geometry::{PlaneMapper, Point2, Viewport};
use crate::histogram::HistogramGrid;
use crate::maps::MapFunction;

/// What to do when the running point becomes NaN or infinite.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DivergencePolicy {
    /// Drop the point and restart the orbit from the seed.
    ResetToSeed,
    /// Drop the point and end the pass.
    Stop,
}

impl Default for DivergencePolicy {
    fn default() -> Self {
        DivergencePolicy::ResetToSeed
    }
}

/// Counters from one accumulation pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Steps actually taken.
    pub steps: usize,
    /// Points that landed on the grid.
    pub plotted: usize,
    /// Points past the transient that missed the grid.
    pub missed: usize,
    /// Times the orbit went non-finite.
    pub divergences: usize,
}

impl PassStats {
    pub(crate) fn log(&self, what: &'static str) {
        if self.divergences > 0 {
            tracing::warn!(
                what,
                divergences = self.divergences,
                "trajectory diverged and was reset"
            );
        }
        tracing::debug!(
            what,
            steps = self.steps,
            plotted = self.plotted,
            missed = self.missed,
            "pass complete"
        );
    }
}

/// The shared loop behind every 2D renderer.  `step` produces the next
/// point from the current one.  The point is deposited once the step
/// index passes `settle_down`.
pub(crate) fn plot_orbit<F>(
    seed: Point2,
    iterations: usize,
    settle_down: usize,
    divergence: DivergencePolicy,
    mapper: &PlaneMapper,
    grid: &mut HistogramGrid,
    mut step: F,
) -> PassStats
where
    F: FnMut(Point2) -> Point2,
{
    let mut stats = PassStats::default();
    let mut point = seed;
    for i in 0..iterations {
        stats.steps += 1;
        let next = step(point);
        if !next.is_finite() {
            stats.divergences += 1;
            match divergence {
                DivergencePolicy::ResetToSeed => {
                    point = seed;
                    continue;
                }
                DivergencePolicy::Stop => break,
            }
        }
        if i > settle_down {
            match mapper.point_to_offset(next) {
                Some(offset) => {
                    grid.deposit_offset(offset);
                    stats.plotted += 1;
                }
                None => stats.missed += 1,
            }
        }
        point = next;
    }
    stats
}

/// Iterates a `MapFunction` into a `HistogramGrid`.
#[derive(Copy, Clone, Debug)]
pub struct MapIterator {
    map: MapFunction,
    iterations: usize,
    settle_down: usize,
    viewport: Viewport,
    seed: Point2,
    divergence: DivergencePolicy,
}

impl MapIterator {
    /// Constructor.  Starts from the map's customary seed; the first
    /// `settle_down` points are not plotted.
    pub fn new(
        map: MapFunction,
        iterations: usize,
        settle_down: usize,
        viewport: Viewport,
    ) -> Result<Self> {
        map.validate()?;
        error::settle_down(settle_down, iterations)?;
        Ok(MapIterator {
            map,
            iterations,
            settle_down,
            viewport,
            seed: map.default_seed(),
            divergence: DivergencePolicy::default(),
        })
    }

    /// Starts the orbit from another point.
    pub fn with_seed(mut self, seed: Point2) -> Result<Self> {
        error::finite("seed_x", seed.x)?;
        error::finite("seed_y", seed.y)?;
        self.seed = seed;
        Ok(self)
    }

    /// Chooses what happens when the orbit runs away.
    pub fn with_divergence(mut self, divergence: DivergencePolicy) -> Self {
        self.divergence = divergence;
        self
    }

    /// The map being iterated.
    pub fn map(&self) -> MapFunction {
        self.map
    }

    /// The starting point.
    pub fn seed(&self) -> Point2 {
        self.seed
    }

    /// The raw orbit, one point per iteration, transient included.
    /// Diverging points are skipped according to the policy.
    pub fn orbit(&self) -> Orbit {
        Orbit {
            map: self.map,
            seed: self.seed,
            point: self.seed,
            remaining: self.iterations,
            divergence: self.divergence,
        }
    }

    /// Plots the orbit into `grid`.
    pub fn render(&self, grid: &mut HistogramGrid) -> Result<PassStats> {
        let mapper = PlaneMapper::new(grid.width(), grid.height(), self.viewport)?;
        let map = self.map;

        tracing::debug!(
            map = map.name(),
            iterations = self.iterations,
            settle_down = self.settle_down,
            "iterating map"
        );
        let stats = plot_orbit(
            self.seed,
            self.iterations,
            self.settle_down,
            self.divergence,
            &mapper,
            grid,
            |p| map.apply(p),
        );
        stats.log(map.name());
        Ok(stats)
    }
}

/// Iterator over the successive points of a map's orbit.
#[derive(Clone, Debug)]
pub struct Orbit {
    map: MapFunction,
    seed: Point2,
    point: Point2,
    remaining: usize,
    divergence: DivergencePolicy,
}

impl Iterator for Orbit {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        while self.remaining > 0 {
            self.remaining -= 1;
            let next = self.map.apply(self.point);
            if next.is_finite() {
                self.point = next;
                return Some(next);
            }
            match self.divergence {
                DivergencePolicy::ResetToSeed => self.point = self.seed,
                DivergencePolicy::Stop => self.remaining = 0,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Pixel;

    fn pickover() -> MapFunction {
        MapFunction::Pickover {
            a: -1.7,
            b: 1.8,
            c: -0.9,
            d: -0.4,
        }
    }

    #[test]
    fn deposits_only_after_settle_down() {
        // x -> x/2 + 1 converges on 2; with settle-down 0 the first
        // point (i = 0) is still skipped.
        let map = MapFunction::Affine(crate::ifs::AffineTransform::from_row([
            0.5, 0.0, 0.0, 0.5, 1.0, 0.0, 1.0,
        ]));
        let it = MapIterator::new(map, 10, 0, Viewport::default())
            .unwrap()
            .with_seed(Point2::new(0.0, 0.0))
            .unwrap();
        let mut grid = HistogramGrid::new(8, 8).unwrap();
        let stats = it.render(&mut grid).unwrap();
        assert_eq!(stats.steps, 10);
        assert_eq!(stats.plotted + stats.missed, 9);
        assert_eq!(grid.total(), stats.plotted as f64);
        // Points 1.5, 1.75, ... all truncate to column 4 + 1 = 5.
        assert_eq!(grid.get(Pixel(5, 4)), Some(9.0));
    }

    #[test]
    fn orbits_are_deterministic() {
        let it = MapIterator::new(pickover(), 1000, 10, Viewport::new(100.0, 0.0, 0.0).unwrap())
            .unwrap();
        let first: Vec<Point2> = it.orbit().collect();
        let second: Vec<Point2> = it.orbit().collect();
        assert_eq!(first.len(), 1000);
        assert_eq!(first, second);

        let mut a = HistogramGrid::new(200, 200).unwrap();
        let mut b = HistogramGrid::new(200, 200).unwrap();
        it.render(&mut a).unwrap();
        it.render(&mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn the_orbit_starts_after_the_seed() {
        let it = MapIterator::new(pickover(), 5, 0, Viewport::default()).unwrap();
        let first = it.orbit().next().unwrap();
        assert_eq!(first, pickover().apply(Point2::new(0.1, 0.0)));
    }

    #[test]
    fn divergent_orbits_reset_to_the_seed() {
        // Quadruptwo with b = 1, c = 0 takes ln|0| at the origin.
        let map = MapFunction::Quadruptwo {
            a: 0.0,
            b: 1.0,
            c: 0.0,
        };
        let it = MapIterator::new(map, 100, 0, Viewport::default()).unwrap();
        let mut grid = HistogramGrid::new(10, 10).unwrap();
        let stats = it.render(&mut grid).unwrap();
        assert_eq!(stats.steps, 100);
        assert_eq!(stats.divergences, 100);
        assert_eq!(stats.plotted, 0);
        assert_eq!(grid.total(), 0.0);
        assert_eq!(it.orbit().count(), 0);
    }

    #[test]
    fn stop_policy_ends_the_pass() {
        let map = MapFunction::Quadruptwo {
            a: 0.0,
            b: 1.0,
            c: 0.0,
        };
        let it = MapIterator::new(map, 100, 0, Viewport::default())
            .unwrap()
            .with_divergence(DivergencePolicy::Stop);
        let mut grid = HistogramGrid::new(10, 10).unwrap();
        let stats = it.render(&mut grid).unwrap();
        assert_eq!(stats.steps, 1);
        assert_eq!(stats.divergences, 1);
    }

    #[test]
    fn rejects_bad_configuration() {
        assert!(MapIterator::new(pickover(), 100, 100, Viewport::default()).is_err());
        assert!(MapIterator::new(pickover(), 0, 0, Viewport::default()).is_err());
        assert!(MapIterator::new(pickover(), 10, 0, Viewport::default())
            .unwrap()
            .with_seed(Point2::new(std::f64::NAN, 0.0))
            .is_err());
    }

    #[test]
    fn cells_stay_within_the_cap() {
        let it = MapIterator::new(pickover(), 50_000, 100, Viewport::new(30.0, 0.0, 0.0).unwrap())
            .unwrap();
        let mut grid = HistogramGrid::with_cap(64, 64, 5.0).unwrap();
        it.render(&mut grid).unwrap();
        let (min, max) = grid.min_max();
        assert!(min >= 0.0);
        assert!(max <= 5.0);
        assert_eq!(max, 5.0);
    }
}
