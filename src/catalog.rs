//! Named parameter sets that are known to draw something worth looking
//! at.  The command-line front end starts from one of these and lets
//! flags override individual settings.

use crate::error::Result;
use crate::flow::{FlowCanvas, FlowIntegrator, FlowParameters, FlowSystem};
use crate::geometry::{Axis, Point2, Point3, Projection, Viewport};
use crate::ifs::{AffineTransform, IfsIterator, IfsSystem};
use crate::map_iter::MapIterator;
use crate::maps::MapFunction;
use crate::normalize::{Normalizer, Polarity};

/// Iterations used by every map preset.
pub const MAP_ITERATIONS: usize = 1_000_000;

/// Settle-down used by map presets unless stated otherwise.
pub const MAP_SETTLE_DOWN: usize = 100;

/// A map together with the framing that shows it off.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapPreset {
    /// Lookup name.
    pub name: &'static str,
    /// The recurrence.
    pub map: MapFunction,
    /// Pixels per unit and offset from centre.
    pub viewport: Viewport,
    /// Points discarded before plotting.
    pub settle_down: usize,
    /// Boost applied to the maximum during normalization.
    pub max_factor: f64,
    /// Image width.
    pub width: usize,
    /// Image height.
    pub height: usize,
}

impl MapPreset {
    /// An iterator for this preset, with `iterations` steps.
    pub fn iterator(&self, iterations: usize) -> Result<MapIterator> {
        MapIterator::new(self.map, iterations, self.settle_down, self.viewport)
    }

    /// The normalizer for this preset.
    pub fn normalizer(&self) -> Result<Normalizer> {
        Normalizer::new(self.max_factor, Polarity::Inverted)
    }
}

fn map(
    name: &'static str,
    map: MapFunction,
    scale: f64,
    offset: (f64, f64),
    settle_down: usize,
    max_factor: f64,
) -> MapPreset {
    MapPreset {
        name,
        map,
        viewport: Viewport {
            scale,
            x_offset: offset.0,
            y_offset: offset.1,
        },
        settle_down,
        max_factor,
        width: 800,
        height: 600,
    }
}

/// Every map preset, in display order.
pub fn map_presets() -> Vec<MapPreset> {
    use crate::maps::MapFunction::*;
    let s = MAP_SETTLE_DOWN;
    vec![
        map(
            "pickover",
            Pickover {
                a: -1.7,
                b: 1.8,
                c: -0.9,
                d: -0.4,
            },
            180.0,
            (0.0, 0.0),
            s,
            1.0 / 40.0,
        ),
        map(
            "fractal-dream",
            FractalDream {
                a: -0.97,
                b: 2.88,
                c: 0.77,
                d: 0.74,
            },
            200.0,
            (0.0, 0.0),
            s,
            1.0 / 10.0,
        ),
        map(
            "jason-rampe-1",
            JasonRampe1 {
                a: -2.7918,
                b: 2.1196,
                c: 1.0284,
                d: 0.1384,
            },
            200.0,
            (-20.0, 0.0),
            s,
            1.0 / 10.0,
        ),
        map(
            "jason-rampe-2",
            JasonRampe2 {
                a: -2.9581,
                b: 0.927,
                c: 2.7842,
                d: 0.6267,
            },
            120.0,
            (-70.0, 0.0),
            s,
            1.0 / 50.0,
        ),
        map(
            "svensson",
            Svensson {
                a: -2.337,
                b: -2.337,
                c: 0.533,
                d: 1.378,
            },
            160.0,
            (0.0, 0.0),
            s,
            1.0 / 15.0,
        ),
        map(
            "bedhead-1",
            Bedhead { a: 0.06, b: 0.98 },
            80.0,
            (50.0, 10.0),
            s,
            1.0 / 100.0,
        ),
        map(
            "bedhead-2",
            Bedhead { a: -0.67, b: 0.83 },
            220.0,
            (-100.0, -350.0),
            s,
            1.0 / 100.0,
        ),
        map(
            "bedhead-3",
            Bedhead { a: -0.67, b: 0.68 },
            70.0,
            (0.0, 50.0),
            s,
            1.0 / 50.0,
        ),
        map(
            "hopalong",
            Hopalong {
                a: 3.1,
                b: 1.8,
                c: -0.9,
            },
            10.0,
            (0.0, 0.0),
            10,
            1.0 / 15.0,
        ),
        map(
            "threeply-1",
            Threeply {
                a: 3.1,
                b: 1.8,
                c: -0.9,
            },
            8.0,
            (0.0, 0.0),
            s,
            1.0 / 10.0,
        ),
        map(
            "threeply-2",
            Threeply {
                a: 7.16878197155893,
                b: 8.43659746693447,
                c: 2.55983412731439,
            },
            2.0,
            (0.0, 0.0),
            s,
            1.0 / 10.0,
        ),
        map(
            "quadruptwo",
            Quadruptwo {
                a: 3.1,
                b: 1.8,
                c: -0.9,
            },
            9.0,
            (0.0, 0.0),
            s,
            1.0 / 3.0,
        ),
        map(
            "de-jong-1",
            DeJong {
                a: -2.7,
                b: -0.09,
                c: -0.86,
                d: -2.20,
            },
            130.0,
            (0.0, 0.0),
            1000,
            1.0 / 20.0,
        ),
        map(
            "de-jong-2",
            DeJong {
                a: 1.641,
                b: 1.902,
                c: 0.316,
                d: 1.525,
            },
            130.0,
            (0.0, 0.0),
            1000,
            1.0 / 20.0,
        ),
        map(
            "gumowski-mira",
            GumowskiMira {
                a: 0.01,
                b: 0.5,
                mu: -0.8,
            },
            15.0,
            (0.0, 0.0),
            10,
            1.0 / 20.0,
        ),
        map(
            "icon-1",
            SymmetricIcon {
                lambda: -2.5,
                alpha: 5.0,
                beta: -1.9,
                gamma: 1.0,
                omega: 0.188,
                degree: 5,
            },
            180.0,
            (0.0, 0.0),
            s,
            1.0 / 20.0,
        ),
        map(
            "icon-2",
            SymmetricIcon {
                lambda: 1.56,
                alpha: -1.0,
                beta: 0.1,
                gamma: -0.82,
                omega: 0.12,
                degree: 3,
            },
            180.0,
            (0.0, 0.0),
            s,
            1.0 / 20.0,
        ),
        map(
            "icon-3",
            SymmetricIcon {
                lambda: -1.806,
                alpha: 1.806,
                beta: 0.0,
                gamma: 1.0,
                omega: 0.0,
                degree: 5,
            },
            180.0,
            (0.0, 0.0),
            s,
            1.0 / 20.0,
        ),
    ]
}

/// Looks a map preset up by name.
pub fn find_map(name: &str) -> Option<MapPreset> {
    map_presets().into_iter().find(|p| p.name == name)
}

/// Settle-down used by every IFS preset.
pub const IFS_SETTLE_DOWN: usize = 10;

/// Per-cell cap used by every IFS preset.
pub const IFS_CAP: f64 = 50.0;

/// A named iterated function system.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IfsPreset {
    /// Lookup name.
    pub name: &'static str,
    /// Rows of `a b c d e f p`.
    pub rows: &'static [[f64; 7]],
}

impl IfsPreset {
    /// The transforms as a validated system.
    pub fn system(&self) -> Result<IfsSystem> {
        IfsSystem::new(self.rows.iter().map(|&r| AffineTransform::from_row(r)).collect())
    }

    /// The usual framing: 512×512, 30 pixels per unit, shifted up by 150.
    pub fn viewport(&self) -> Viewport {
        Viewport {
            scale: 30.0,
            x_offset: 0.0,
            y_offset: -150.0,
        }
    }

    /// An iterator for this preset, with `iterations` steps.
    pub fn iterator(&self, iterations: usize) -> Result<IfsIterator> {
        IfsIterator::new(self.system()?, iterations, IFS_SETTLE_DOWN, self.viewport())?
            .with_seed(Point2::new(1.0, 1.0))
    }
}

const BINARY: &[[f64; 7]] = &[
    [0.5, 0.0, 0.0, 0.5, -2.563477, -0.000003, 0.333333],
    [0.5, 0.0, 0.0, 0.5, 2.436544, -0.000003, 0.333333],
    [0.0, -0.5, 0.5, 0.0, 4.873085, 7.563492, 0.333334],
];

const CORAL: &[[f64; 7]] = &[
    [0.307692, -0.531469, -0.461538, -0.293706, 5.401953, 8.655175, 0.4],
    [0.307692, -0.076923, 0.153846, -0.447552, -1.295248, 4.152990, 0.15],
    [0.0, 0.545455, 0.692308, -0.195804, -4.893637, 7.269794, 0.45],
];

const DRAGON: &[[f64; 7]] = &[
    [0.824074, 0.281482, -0.212346, 0.864198, -1.882290, -0.110607, 0.787473],
    [0.088272, 0.520988, -0.463889, -0.377778, 0.785360, 8.095795, 0.212527],
];

const DRAGON2: &[[f64; 7]] = &[
    [0.824074, 0.281481, -0.212346, 0.864197, -1.772710, 0.137795, 0.771268],
    [-0.138580, 0.283951, -0.670062, -0.279012, 2.930991, 7.338924, 0.228732],
];

const FEATHER: &[[f64; 7]] = &[
    [0.870370, 0.074074, -0.115741, 0.851852, -1.278016, 0.070331, 0.798030],
    [-0.162037, -0.407407, 0.495370, 0.074074, 6.835726, 5.799174, 0.201970],
];

const FERN: &[[f64; 7]] = &[
    [0.85, 0.04, -0.04, 0.85, 0.0, 1.6, 0.85],
    [0.2, -0.26, 0.23, 0.22, 0.0, 1.6, 0.07],
    [-0.15, 0.28, 0.26, 0.24, 0.0, 0.44, 0.07],
    [0.0, 0.0, 0.0, 0.16, 0.0, 0.0, 0.01],
];

const KOCH: &[[f64; 7]] = &[
    [0.307692, 0.0, 0.0, 0.294118, 4.119164, 1.604278, 0.151515],
    [0.192308, -0.205882, 0.653846, 0.088235, -0.688840, 5.978916, 0.253788],
    [0.192308, 0.205882, -0.653846, 0.088235, 0.668580, 5.962514, 0.253788],
    [0.307692, 0.0, 0.0, 0.294118, -4.136530, 1.604278, 0.151515],
    [0.384615, 0.0, 0.0, -0.294118, -0.007718, 2.941176, 0.189394],
];

const SPIRAL: &[[f64; 7]] = &[
    [0.787879, -0.424242, 0.242424, 0.859848, 1.758647, 1.408065, 0.895652],
    [-0.121212, 0.257576, 0.151515, 0.053030, -6.721654, 1.377236, 0.052174],
    [0.181818, -0.136364, 0.090909, 0.181818, 6.086107, 1.568035, 0.052174],
];

const TREE: &[[f64; 7]] = &[
    [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.05],
    [0.42, -0.42, 0.42, 0.42, 0.0, 0.2, 0.4],
    [0.42, 0.42, -0.42, 0.42, 0.0, 0.2, 0.4],
    [0.1, 0.0, 0.0, 0.1, 0.0, 0.2, 0.15],
];

const TRIANGLE: &[[f64; 7]] = &[
    [0.5, 0.0, 0.0, 0.5, -0.5, 0.0, 0.333333],
    [0.5, 0.0, 0.0, 0.5, 0.5, 0.0, 0.333333],
    [0.5, 0.0, 0.0, 0.5, 0.0, 0.86, 0.333334],
];

/// Every IFS preset, alphabetically.
pub fn ifs_presets() -> Vec<IfsPreset> {
    let preset = |name, rows| IfsPreset { name, rows };
    vec![
        preset("binary", BINARY),
        preset("coral", CORAL),
        preset("dragon", DRAGON),
        preset("dragon2", DRAGON2),
        preset("feather", FEATHER),
        preset("fern", FERN),
        preset("koch", KOCH),
        preset("spiral", SPIRAL),
        preset("tree", TREE),
        preset("triangle", TRIANGLE),
    ]
}

/// Looks an IFS preset up by name.
pub fn find_ifs(name: &str) -> Option<IfsPreset> {
    ifs_presets().into_iter().find(|p| p.name == name)
}

/// Steps used by every flow preset.
pub const FLOW_STEPS: usize = 200_000;

/// Settle-down used by every flow preset.
pub const FLOW_SETTLE_DOWN: usize = 1000;

/// Step size used by every flow preset.
pub const FLOW_DT: f64 = 0.001;

/// A named flow, with its starting point and drawing scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlowPreset {
    /// Lookup name.
    pub name: &'static str,
    /// The vector field.
    pub system: FlowSystem,
    /// Where the trajectory starts.
    pub seed: Point3,
    /// Pixels per unit in each projection.
    pub scale: f64,
}

impl FlowPreset {
    /// An integrator for this preset.
    pub fn integrator(&self, steps: usize, settle_down: usize) -> Result<FlowIntegrator> {
        let params = FlowParameters::new(self.system, FLOW_DT)?;
        FlowIntegrator::new(params, steps, settle_down)?.with_seed(self.seed)
    }

    /// The three axis-pair views on an 800×800 canvas at this preset's
    /// scale: x/y top left, x/z bottom left, y/z bottom right.
    pub fn projections(&self) -> Result<Vec<Projection>> {
        Ok(vec![
            Projection::new(Axis::X, Axis::Y, 200.0, 200.0, self.scale)?,
            Projection::new(Axis::X, Axis::Z, 200.0, 400.0, self.scale)?,
            Projection::new(Axis::Y, Axis::Z, 600.0, 400.0, self.scale)?,
        ])
    }

    /// A ready-to-draw canvas for this preset.
    pub fn canvas(&self) -> Result<FlowCanvas> {
        FlowCanvas::new(
            self.integrator(FLOW_STEPS, FLOW_SETTLE_DOWN)?,
            self.projections()?,
            800,
            800,
        )
    }
}

/// Every flow preset.
pub fn flow_presets() -> Vec<FlowPreset> {
    vec![
        FlowPreset {
            name: "lorenz",
            system: FlowSystem::lorenz(),
            seed: Point3::new(0.0, 1.0, 1.05),
            scale: 8.0,
        },
        FlowPreset {
            name: "rossler",
            system: FlowSystem::Rossler {
                a: 0.2,
                b: 0.2,
                c: 5.7,
            },
            seed: Point3::new(0.1, 0.1, 6.0),
            scale: 12.0,
        },
        FlowPreset {
            name: "lorenz-mod-2",
            system: FlowSystem::LorenzMod2 {
                alpha: 0.9,
                beta: 5.0,
                gamma: 9.9,
                delta: 1.0,
            },
            seed: Point3::new(0.1, 0.1, 0.0),
            scale: 20.0,
        },
        FlowPreset {
            name: "wang-sun",
            system: FlowSystem::WangSun {
                alpha: 0.2,
                beta: -0.01,
                gamma: 1.0,
                delta: -0.4,
                epsilon: -1.0,
                zeta: -1.0,
            },
            seed: Point3::new(1.05, 1.1, 1.5),
            scale: 100.0,
        },
    ]
}

/// Looks a flow preset up by name.
pub fn find_flow(name: &str) -> Option<FlowPreset> {
    flow_presets().into_iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn every_map_preset_validates() {
        for preset in map_presets() {
            preset
                .iterator(MAP_ITERATIONS)
                .unwrap_or_else(|e| panic!("{}: {}", preset.name, e));
            preset.normalizer().unwrap();
        }
    }

    #[test]
    fn every_ifs_preset_validates() {
        for preset in ifs_presets() {
            let system = preset
                .system()
                .unwrap_or_else(|e| panic!("{}: {}", preset.name, e));
            assert_eq!(system.len(), preset.rows.len());
            preset.iterator(1000).unwrap();
        }
    }

    #[test]
    fn every_flow_preset_validates() {
        for preset in flow_presets() {
            preset.integrator(2000, 100).unwrap();
            let views = preset.projections().unwrap();
            assert_eq!(views.len(), 3);
            assert!(views.iter().all(|v| v.scale() == preset.scale));
        }
    }

    #[test]
    fn flow_views_reject_a_bad_scale() {
        let mut preset = find_flow("lorenz").unwrap();
        preset.scale = std::f64::NAN;
        assert!(preset.projections().is_err());
        assert!(preset.canvas().is_err());
    }

    #[test]
    fn names_are_unique() {
        let maps = map_presets();
        assert_eq!(maps.iter().map(|p| p.name).unique().count(), maps.len());
        let ifs = ifs_presets();
        assert_eq!(ifs.iter().map(|p| p.name).unique().count(), ifs.len());
        let flows = flow_presets();
        assert_eq!(flows.iter().map(|p| p.name).unique().count(), flows.len());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(find_map("pickover").unwrap().viewport.scale, 180.0);
        assert_eq!(find_ifs("fern").unwrap().rows.len(), 4);
        assert_eq!(find_flow("rossler").unwrap().seed, Point3::new(0.1, 0.1, 6.0));
        assert!(find_map("mandelbrot").is_none());
        assert!(find_ifs("mandelbrot").is_none());
        assert!(find_flow("mandelbrot").is_none());
    }
}
