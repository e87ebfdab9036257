extern crate chaosplot;
extern crate clap;
extern crate failure;
extern crate num_cpus;
extern crate tracing_subscriber;

use chaosplot::catalog::{self, FlowPreset, IfsPreset, MapPreset};
use chaosplot::{
    pattern, render_all, DrawMode, HistogramGrid, ImageSink, IntensityGrid, Normalizer, Palette,
    PngSink, Point2, Polarity, RenderJob, Viewport,
};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::{err_msg, Error};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_point(s: &str) -> Option<Point2> {
    parse_pair(s, ',').map(|(x, y)| Point2::new(x, y))
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_name(s: &str, known: &[&str]) -> Result<(), String> {
    if known.contains(&s) {
        Ok(())
    } else {
        Err(format!("Unknown name '{}', expected one of: {}", s, known.join(", ")))
    }
}

const OUTPUT: &str = "output";
const DIR: &str = "dir";
const PRESET: &str = "preset";
const SIZE: &str = "size";
const ITERATIONS: &str = "iterations";
const SETTLE_DOWN: &str = "settle-down";
const SCALE: &str = "scale";
const OFFSET: &str = "offset";
const MAX_FACTOR: &str = "max-factor";
const DIRECT: &str = "direct";
const CAP: &str = "cap";
const SEED: &str = "seed";
const PALETTE: &str = "palette";
const THREADS: &str = "threads";
const INVERSE: &str = "inverse";
const FIELD: &str = "field";
const ZOOM: &str = "zoom";

fn output<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(OUTPUT)
        .required(true)
        .long(OUTPUT)
        .short("o")
        .takes_value(true)
        .validator(|s| {
            if s.ends_with(".png") {
                Ok(())
            } else {
                Err("Output file must end in .png".to_string())
            }
        })
        .help("Output file")
}

fn size<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(SIZE)
        .long(SIZE)
        .short("s")
        .takes_value(true)
        .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
        .help("Size of output image, WIDTHxHEIGHT")
}

fn iterations<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(ITERATIONS)
        .long(ITERATIONS)
        .short("i")
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                1,
                100_000_000usize,
                "Could not parse iteration count",
                "Iteration count must be between 1 and 100000000",
            )
        })
        .help("Number of points to compute")
}

fn settle_down<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(SETTLE_DOWN)
        .long(SETTLE_DOWN)
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                0,
                usize::max_value(),
                "Could not parse settle-down count",
                "Settle-down count is out of range",
            )
        })
        .help("Number of leading points to discard")
}

fn scale<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(SCALE)
        .long(SCALE)
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                std::f64::MIN_POSITIVE,
                std::f64::MAX,
                "Could not parse scale",
                "Scale must be positive",
            )
        })
        .help("Pixels per unit")
}

fn offset<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(OFFSET)
        .long(OFFSET)
        .takes_value(true)
        .allow_hyphen_values(true)
        .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse offset"))
        .help("Pixel offset from the centre, X,Y")
}

fn max_factor<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(MAX_FACTOR)
        .long(MAX_FACTOR)
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                std::f64::MIN_POSITIVE,
                std::f64::MAX,
                "Could not parse max factor",
                "Max factor must be positive",
            )
        })
        .help("Multiplier applied to the densest cell before scaling")
}

fn direct<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(DIRECT)
        .long(DIRECT)
        .help("Draw dense regions bright instead of dark")
}

fn cap<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(CAP)
        .long(CAP)
        .takes_value(true)
        .validator(|s| {
            validate_range(
                &s,
                1.0,
                std::f64::MAX,
                "Could not parse cap",
                "Cap must be at least 1",
            )
        })
        .help("Saturation limit for each cell")
}

fn palette<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name(PALETTE)
        .long(PALETTE)
        .takes_value(true)
        .help("Palette file, one 'R G B' line per colour")
}

fn preset<'a, 'b>(default: &'a str, known: Vec<&'static str>) -> Arg<'a, 'b> {
    Arg::with_name(PRESET)
        .long(PRESET)
        .short("p")
        .takes_value(true)
        .default_value(default)
        .validator(move |s| validate_name(&s, &known))
        .help("Named parameter set; see `list`")
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();
    let map_names: Vec<&'static str> = catalog::map_presets().iter().map(|p| p.name).collect();
    let ifs_names: Vec<&'static str> = catalog::ifs_presets().iter().map(|p| p.name).collect();
    let flow_names: Vec<&'static str> = catalog::flow_presets().iter().map(|p| p.name).collect();

    App::new("chaosplot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Strange attractor, IFS and chaotic flow renderer")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("map")
                .about("Iterate a 2D map")
                .arg(preset("pickover", map_names))
                .arg(output())
                .arg(size())
                .arg(iterations())
                .arg(settle_down())
                .arg(scale())
                .arg(offset())
                .arg(max_factor())
                .arg(direct())
                .arg(cap())
                .arg(palette()),
        )
        .subcommand(
            SubCommand::with_name("ifs")
                .about("Play the chaos game with an iterated function system")
                .arg(preset("fern", ifs_names))
                .arg(output())
                .arg(size())
                .arg(iterations())
                .arg(settle_down())
                .arg(scale())
                .arg(offset())
                .arg(max_factor())
                .arg(direct())
                .arg(cap())
                .arg(palette())
                .arg(
                    Arg::with_name(SEED)
                        .long(SEED)
                        .takes_value(true)
                        .default_value("0")
                        .validator(|s| {
                            validate_range(
                                &s,
                                0,
                                u64::max_value(),
                                "Could not parse seed",
                                "Seed is out of range",
                            )
                        })
                        .help("Seed for the random number generator"),
                ),
        )
        .subcommand(
            SubCommand::with_name("flow")
                .about("Integrate a 3D flow and draw three projections of it")
                .arg(preset("lorenz", flow_names))
                .arg(output())
                .arg(iterations())
                .arg(settle_down())
                .arg(
                    Arg::with_name(INVERSE)
                        .long(INVERSE)
                        .help("Darken a white canvas instead of brightening a black one"),
                ),
        )
        .subcommand(
            SubCommand::with_name("pattern")
                .about("Draw a moire pattern from a polynomial field")
                .arg(output())
                .arg(size())
                .arg(palette())
                .arg(
                    Arg::with_name(FIELD)
                        .long(FIELD)
                        .short("f")
                        .takes_value(true)
                        .default_value("circle")
                        .possible_values(&["circle", "hyperbolic", "cubic", "mixed", "elliptic"])
                        .help("Field to sample"),
                )
                .arg(
                    Arg::with_name(ZOOM)
                        .long(ZOOM)
                        .short("z")
                        .takes_value(true)
                        .default_value("0")
                        .allow_hyphen_values(true)
                        .validator(|s| {
                            validate_range(
                                &s,
                                -1.0,
                                1000.0,
                                "Could not parse zoom",
                                "Zoom must be between -1 and 1000",
                            )
                        })
                        .help("How far to widen the sampled square"),
                ),
        )
        .subcommand(
            SubCommand::with_name("batch")
                .about("Render every map and IFS preset into a directory")
                .arg(
                    Arg::with_name(DIR)
                        .required(true)
                        .long(DIR)
                        .short("d")
                        .takes_value(true)
                        .help("Output directory"),
                )
                .arg(iterations())
                .arg(palette())
                .arg(
                    Arg::with_name(THREADS)
                        .required(false)
                        .long(THREADS)
                        .short("t")
                        .takes_value(true)
                        .default_value("1")
                        .validator(move |s| {
                            validate_range(
                                &s,
                                1,
                                max_threads,
                                "Could not parse thread count",
                                &format!("Thread count must be between 1 and {}", max_threads),
                            )
                        })
                        .help("Number of threads to use"),
                ),
        )
        .subcommand(SubCommand::with_name("list").about("List the named parameter sets"))
        .get_matches()
}

/// Values have already been checked by their validators.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Option<T> {
    matches.value_of(name).and_then(|s| T::from_str(s).ok())
}

fn dimensions(matches: &ArgMatches, default: (usize, usize)) -> (usize, usize) {
    matches
        .value_of(SIZE)
        .and_then(|s| parse_pair::<u16>(s, 'x'))
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or(default)
}

fn viewport(matches: &ArgMatches, default: Viewport) -> Result<Viewport, Error> {
    let scale = value(matches, SCALE).unwrap_or(default.scale);
    let offset = matches
        .value_of(OFFSET)
        .and_then(parse_point)
        .unwrap_or_else(|| Point2::new(default.x_offset, default.y_offset));
    Ok(Viewport::new(scale, offset.x, offset.y)?)
}

fn normalizer(matches: &ArgMatches, default_factor: f64) -> Result<Normalizer, Error> {
    let polarity = if matches.is_present(DIRECT) {
        Polarity::Direct
    } else {
        Polarity::Inverted
    };
    let factor = value(matches, MAX_FACTOR).unwrap_or(default_factor);
    Ok(Normalizer::new(factor, polarity)?)
}

fn grid(
    matches: &ArgMatches,
    size: (usize, usize),
    default_cap: Option<f64>,
) -> Result<HistogramGrid, Error> {
    Ok(match value(matches, CAP).or(default_cap) {
        Some(cap) => HistogramGrid::with_cap(size.0, size.1, cap)?,
        None => HistogramGrid::new(size.0, size.1)?,
    })
}

fn sink_for(outfile: &str, matches: &ArgMatches) -> Result<(PngSink, String), Error> {
    let path = Path::new(outfile);
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| err_msg("Output file has no name"))?
        .to_string();
    let mut sink = PngSink::new(dir);
    if let Some(file) = matches.value_of(PALETTE) {
        sink = sink.with_palette(Palette::load(file)?);
    }
    Ok((sink, name))
}

fn write(matches: &ArgMatches, image: &IntensityGrid) -> Result<(), Error> {
    let outfile = matches.value_of(OUTPUT).ok_or_else(|| err_msg("No output file"))?;
    let (mut sink, name) = sink_for(outfile, matches)?;
    sink.accept(&name, image)?;
    Ok(())
}

fn run_map(matches: &ArgMatches) -> Result<(), Error> {
    let preset: MapPreset = matches
        .value_of(PRESET)
        .and_then(catalog::find_map)
        .ok_or_else(|| err_msg("Unknown map preset"))?;
    let iterations = value(matches, ITERATIONS).unwrap_or(catalog::MAP_ITERATIONS);
    let settle_down = value(matches, SETTLE_DOWN).unwrap_or(preset.settle_down);
    let iterator = chaosplot::MapIterator::new(
        preset.map,
        iterations,
        settle_down,
        viewport(matches, preset.viewport)?,
    )?;
    let mut grid = grid(matches, dimensions(matches, (preset.width, preset.height)), None)?;
    iterator.render(&mut grid)?;
    write(matches, &normalizer(matches, preset.max_factor)?.normalize(&grid))
}

fn run_ifs(matches: &ArgMatches) -> Result<(), Error> {
    let preset: IfsPreset = matches
        .value_of(PRESET)
        .and_then(catalog::find_ifs)
        .ok_or_else(|| err_msg("Unknown IFS preset"))?;
    let iterations = value(matches, ITERATIONS).unwrap_or(300_000);
    let settle_down = value(matches, SETTLE_DOWN).unwrap_or(catalog::IFS_SETTLE_DOWN);
    let seed: u64 = value(matches, SEED).unwrap_or(0);
    let iterator = chaosplot::IfsIterator::new(
        preset.system()?,
        iterations,
        settle_down,
        viewport(matches, preset.viewport())?,
    )?;
    let mut grid = grid(matches, dimensions(matches, (512, 512)), Some(catalog::IFS_CAP))?;
    iterator.render(&mut StdRng::seed_from_u64(seed), &mut grid)?;
    write(matches, &normalizer(matches, 1.0)?.normalize(&grid))
}

fn run_flow(matches: &ArgMatches) -> Result<(), Error> {
    let preset: FlowPreset = matches
        .value_of(PRESET)
        .and_then(catalog::find_flow)
        .ok_or_else(|| err_msg("Unknown flow preset"))?;
    let steps = value(matches, ITERATIONS).unwrap_or(catalog::FLOW_STEPS);
    let settle_down = value(matches, SETTLE_DOWN).unwrap_or(catalog::FLOW_SETTLE_DOWN);
    let mut view = chaosplot::FlowCanvas::new(
        preset.integrator(steps, settle_down)?,
        preset.projections()?,
        800,
        800,
    )?;
    if matches.is_present(INVERSE) {
        view.set_mode(DrawMode::Erase);
    }
    view.redraw_if_needed();

    let outfile = matches.value_of(OUTPUT).ok_or_else(|| err_msg("No output file"))?;
    let (sink, name) = sink_for(outfile, matches)?;
    sink.write_canvas(&name, view.canvas())?;
    Ok(())
}

fn run_pattern(matches: &ArgMatches) -> Result<(), Error> {
    let field = matches
        .value_of(FIELD)
        .and_then(chaosplot::FieldFunction::from_name)
        .ok_or_else(|| err_msg("Unknown field"))?;
    let zoom = value(matches, ZOOM).unwrap_or(0.0);
    let (width, height) = dimensions(matches, (512, 512));
    let region = pattern::centered_region(width, height, zoom)?;
    write(matches, &pattern::render_pattern(&region, field)?)
}

fn run_batch(matches: &ArgMatches) -> Result<(), Error> {
    let dir = matches.value_of(DIR).ok_or_else(|| err_msg("No output directory"))?;
    let threads = value(matches, THREADS).unwrap_or(1);
    let mut jobs = vec![];
    for preset in catalog::map_presets() {
        let iterations = value(matches, ITERATIONS).unwrap_or(catalog::MAP_ITERATIONS);
        jobs.push(
            RenderJob::map(preset.name, preset.iterator(iterations)?, preset.width, preset.height)
                .with_normalizer(preset.normalizer()?),
        );
    }
    for (seed, preset) in catalog::ifs_presets().into_iter().enumerate() {
        let iterations = value(matches, ITERATIONS).unwrap_or(300_000);
        jobs.push(
            RenderJob::ifs(preset.name, preset.iterator(iterations)?, seed as u64, 512, 512)
                .with_cap(catalog::IFS_CAP),
        );
    }

    let mut sink = PngSink::new(dir);
    if let Some(file) = matches.value_of(PALETTE) {
        sink = sink.with_palette(Palette::load(file)?);
    }
    let mut failures = 0;
    for (job, result) in jobs.iter().zip(render_all(&jobs, threads)?) {
        match result {
            Ok(image) => sink.accept(&job.name, &image)?,
            Err(e) => {
                tracing::error!(name = %job.name, error = %e, "render failed");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        return Err(err_msg(format!("{} of {} renders failed", failures, jobs.len())));
    }
    Ok(())
}

fn run_list() {
    println!("maps:");
    for preset in catalog::map_presets() {
        println!("  {}", preset.name);
    }
    println!("ifs:");
    for preset in catalog::ifs_presets() {
        println!("  {}", preset.name);
    }
    println!("flows:");
    for preset in catalog::flow_presets() {
        println!("  {}", preset.name);
    }
}

fn run() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chaosplot=info")),
        )
        .init();

    let matches = args();
    match matches.subcommand() {
        ("map", Some(m)) => run_map(m),
        ("ifs", Some(m)) => run_ifs(m),
        ("flow", Some(m)) => run_flow(m),
        ("pattern", Some(m)) => run_pattern(m),
        ("batch", Some(m)) => run_batch(m),
        ("list", Some(_)) => {
            run_list();
            Ok(())
        }
        _ => Err(err_msg("No subcommand given")),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
