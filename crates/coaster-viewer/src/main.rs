//! Coaster viewer CLI
//!
//! Runs the train around a track for a number of frames without a window,
//! logging its progress, then writes the last frame as an HTML viewer.
//!
//! # Usage
//!
//! ```bash
//! # Default layout, 600 frames at 60 Hz, writes coaster.html
//! coaster_viewer
//!
//! # Custom layout and speed
//! coaster_viewer --config ride.json --speed 12 --frames 1200 ride.html
//!
//! # Print the default configuration as a starting point
//! coaster_viewer --print-config > ride.json
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use coaster_core::Result;
use coaster_render::{RendererConfig, SceneRenderer};
use coaster_track::{status_line, CoasterConfig, Track, Train, TrainControl};

fn print_usage() {
    eprintln!(
        r#"Coaster viewer

USAGE:
    coaster_viewer [OPTIONS] [output.html]
    coaster_viewer --print-config

ARGS:
    [output.html]     Snapshot path (defaults to coaster.html)

OPTIONS:
    --config <file>   JSON configuration for the track and train
    --frames <n>      Frames to simulate (default 600)
    --dt <seconds>    Time step per frame (default 1/60)
    --speed <v>       Initial train speed, clamped to the max speed
    --status <n>      Log a status line every n frames (default 60)
    --print-config    Print the default configuration and exit
    --help            Show this help message
"#
    );
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    config: Option<PathBuf>,
    output: PathBuf,
    frames: u64,
    dt: f64,
    speed: Option<f64>,
    status_every: u64,
    print_config: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            output: PathBuf::from("coaster.html"),
            frames: 600,
            dt: 1.0 / 60.0,
            speed: None,
            status_every: 60,
            print_config: false,
        }
    }
}

fn parse_args(args: &[String]) -> std::result::Result<Option<Options>, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();
    let mut output = None;

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--print-config" => opts.print_config = true,
            "--config" => opts.config = Some(PathBuf::from(value("--config")?)),
            "--frames" => opts.frames = parse_number("--frames", &value("--frames")?)?,
            "--dt" => opts.dt = parse_number("--dt", &value("--dt")?)?,
            "--speed" => opts.speed = Some(parse_number("--speed", &value("--speed")?)?),
            "--status" => opts.status_every = parse_number("--status", &value("--status")?)?,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path => {
                if output.replace(PathBuf::from(path)).is_some() {
                    return Err("only one output path may be given".to_string());
                }
            }
        }
    }

    if let Some(path) = output {
        opts.output = path;
    }
    Ok(Some(opts))
}

fn parse_number<T: std::str::FromStr>(flag: &str, raw: &str) -> std::result::Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{flag}: cannot parse '{raw}'"))
}

fn load_config(opts: &Options) -> Result<CoasterConfig> {
    match &opts.config {
        Some(path) => {
            log::info!("loading configuration from {}", path.display());
            CoasterConfig::from_path(path)
        }
        None => Ok(CoasterConfig::default()),
    }
}

fn run(opts: &Options) -> Result<()> {
    let config = load_config(opts)?;
    if opts.print_config {
        println!("{}", config.to_json_string()?);
        return Ok(());
    }

    let track = Arc::new(Track::new(&config.track)?);
    log::info!("track length {:.2}", track.length());

    let mut train = Train::new(Arc::clone(&track), &config.train)?;
    if let Some(speed) = opts.speed {
        let applied = TrainControl::set_speed(&mut train, speed);
        log::info!("speed set to {applied:.2}");
    }

    let mut renderer = SceneRenderer::new(RendererConfig::default())?;
    renderer.init(&track)?;

    for frame in 0..opts.frames {
        train.update(opts.dt)?;
        renderer.draw(&train)?;
        if opts.status_every > 0 && frame % opts.status_every == 0 {
            log::info!("frame {frame:>5} | {}", status_line(&train));
        }
    }
    log::debug!("spacing error after {} frames: {:.2e}", opts.frames, train.spacing_error());

    renderer.export_html(&opts.output)?;
    renderer.dispose();
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            process::exit(0);
        }
        Err(msg) => {
            eprintln!("Error: {msg}\n");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
