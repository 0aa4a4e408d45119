use std::path::PathBuf;

use argh::FromArgs;
use harris_cli::{init_thread_pool, io, load_detector_config, HarrisPipeline};
use harris_detect::DetectorConfig;
use harris_match::{DescriptorConfig, DistanceMetric, MatchConfig, MatchFilter};

#[derive(FromArgs)]
/// Harris corner detection and patch matching
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Detect(DetectArgs),
    Match(MatchArgs),
}

#[derive(FromArgs)]
/// detect corners and mark them with crosses
#[argh(subcommand, name = "detect")]
struct DetectArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path of the annotated output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// gaussian sigma of the structure tensor
    #[argh(option)]
    sigma: Option<f32>,

    /// minimum corner response
    #[argh(option)]
    thresh: Option<f32>,

    /// non-maximum suppression radius in pixels
    #[argh(option)]
    window: Option<i32>,

    /// preset: sensitive, balanced or strict (default: balanced)
    #[argh(option)]
    preset: Option<String>,

    /// detector configuration file (.json or .toml)
    #[argh(option)]
    config: Option<PathBuf>,

    /// number of worker threads (default: all cores)
    #[argh(option)]
    threads: Option<usize>,
}

#[derive(FromArgs)]
/// match corners between two images and draw the correspondences
#[argh(subcommand, name = "match")]
struct MatchArgs {
    /// path to the first image
    #[argh(option, short = 'a')]
    image_a: PathBuf,

    /// path to the second image
    #[argh(option, short = 'b')]
    image_b: PathBuf,

    /// path of the side-by-side output image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// gaussian sigma of the structure tensor
    #[argh(option)]
    sigma: Option<f32>,

    /// minimum corner response
    #[argh(option)]
    thresh: Option<f32>,

    /// non-maximum suppression radius in pixels
    #[argh(option)]
    window: Option<i32>,

    /// preset: sensitive, balanced or strict (default: balanced)
    #[argh(option)]
    preset: Option<String>,

    /// detector configuration file (.json or .toml)
    #[argh(option)]
    config: Option<PathBuf>,

    /// number of worker threads (default: all cores)
    #[argh(option)]
    threads: Option<usize>,

    /// descriptor patch side length, odd (default: 5)
    #[argh(option, default = "5")]
    patch_size: usize,

    /// store raw patch values instead of differences to the center
    #[argh(switch)]
    raw_patches: bool,

    /// descriptor distance: l1 or l2 (default: l1)
    #[argh(option, default = "DistanceMetric::L1")]
    metric: DistanceMetric,

    /// match filter: best, one-to-one or mutual (default: mutual)
    #[argh(option, default = "MatchFilter::Mutual")]
    filter: MatchFilter,
}

struct DetectionOptions<'a> {
    sigma: Option<f32>,
    thresh: Option<f32>,
    window: Option<i32>,
    preset: Option<&'a str>,
    config: Option<&'a PathBuf>,
    threads: Option<usize>,
}

impl DetectionOptions<'_> {
    fn resolve(&self) -> Result<DetectorConfig, Box<dyn std::error::Error>> {
        let mut cfg = match (self.config, self.preset) {
            (Some(path), _) => load_detector_config(path)?,
            (None, Some("sensitive")) => DetectorConfig::sensitive_preset(),
            (None, Some("strict")) => DetectorConfig::strict_preset(),
            (None, Some("balanced")) | (None, None) => DetectorConfig::balanced_preset(),
            (None, Some(other)) => return Err(format!("unknown preset '{}'", other).into()),
        };
        if let Some(sigma) = self.sigma {
            cfg.core.sigma = sigma;
        }
        if let Some(thresh) = self.thresh {
            cfg.core.threshold = thresh;
        }
        if let Some(window) = self.window {
            cfg.core.window = window;
        }
        if let Some(threads) = self.threads {
            cfg.core.n_threads = threads.max(1);
        }
        Ok(cfg)
    }
}

fn run_detect(args: DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = DetectionOptions {
        sigma: args.sigma,
        thresh: args.thresh,
        window: args.window,
        preset: args.preset.as_deref(),
        config: args.config.as_ref(),
        threads: args.threads,
    }
    .resolve()?;
    init_thread_pool(cfg.core.n_threads)?;
    log::info!("{}", cfg.summary());

    let pipeline = HarrisPipeline::with_detector(cfg)?;
    let img = io::load_image(&args.image_path)?;
    let canvas = pipeline.draw_corners(&img)?;
    canvas.save(&args.output)?;
    log::info!("saved {}", args.output.display());
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = DetectionOptions {
        sigma: args.sigma,
        thresh: args.thresh,
        window: args.window,
        preset: args.preset.as_deref(),
        config: args.config.as_ref(),
        threads: args.threads,
    }
    .resolve()?;
    init_thread_pool(cfg.core.n_threads)?;
    log::info!("{}", cfg.summary());

    let pipeline = HarrisPipeline::new(
        cfg,
        DescriptorConfig {
            patch_size: args.patch_size,
            center_relative: !args.raw_patches,
        },
        MatchConfig {
            metric: args.metric,
            filter: args.filter,
        },
    )?;
    let a = io::load_image(&args.image_a)?;
    let b = io::load_image(&args.image_b)?;
    let canvas = pipeline.draw_matches(&a, &b)?;
    canvas.save(&args.output)?;
    log::info!("saved {}", args.output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    match args.command {
        Command::Detect(args) => run_detect(args),
        Command::Match(args) => run_match(args),
    }
}
