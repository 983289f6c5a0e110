//! ridgepoint CLI: fingerprint core/delta detection and ridge enhancement.

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use ridgepoint::detect::{self, DetectSource};
use ridgepoint::enhance::{EnhanceParams, GaborCombine};
use ridgepoint::io::{RidgeDetectConfig, RidgeDetectReport};
use ridgepoint::singular::SingularParams;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ridgepoint")]
#[command(about = "Detect fingerprint cores and deltas, and enhance ridge images")]
#[command(version)]
struct Cli {
    /// Log per-stage details.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect cores and deltas in an image.
    Detect(DetectArgs),

    /// Enhance and binarize a ridge image.
    Enhance(EnhanceArgs),

    /// Run detection as described by a JSON config file.
    Run {
        /// Path to a `RidgeDetectConfig` JSON file.
        #[arg(long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run detection on the enhanced (binarized) image.
    #[arg(long)]
    enhanced: bool,

    /// JSON file with `SingularParams` overrides.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Override the block size in pixels.
    #[arg(long)]
    block_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CombineArg {
    Max,
    Mean,
}

impl From<CombineArg> for GaborCombine {
    fn from(value: CombineArg) -> Self {
        match value {
            CombineArg::Max => GaborCombine::Max,
            CombineArg::Mean => GaborCombine::Mean,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct EnhanceArgs {
    /// Path to the input image.
    #[arg(long)]
    image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// How Gabor responses are merged across orientations.
    #[arg(long, value_enum, default_value_t = CombineArg::Max)]
    combine: CombineArg,
}

fn init_logging(verbose: bool) {
    #[cfg(feature = "tracing")]
    {
        let level = if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        let _ = tracing_log::LogTracer::init();
        ridgepoint::core::init_tracing(false, level);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = ridgepoint::core::init_from_verbosity(verbose);
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let res = match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Enhance(args) => run_enhance(&args),
        Commands::Run { config } => run_config(&config),
    };
    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_gray(path: &Path) -> CliResult<image::GrayImage> {
    info!("loading image: {}", path.display());
    let bytes =
        std::fs::read(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let img = detect::decode_gray(&bytes)?;
    info!("image size: {}x{}", img.width(), img.height());
    Ok(img)
}

// ── detect ────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let mut params = match &args.params {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            serde_json::from_str::<SingularParams>(&raw)?
        }
        None => SingularParams::default(),
    };
    if let Some(bs) = args.block_size {
        params.block_size = bs;
    }

    let img = load_gray(&args.image)?;
    let source = DetectSource::from_enhance_flag(args.enhanced);
    let res = detect::detect_singular_points_with_source(
        &img,
        source,
        &params,
        &EnhanceParams::default(),
    )?;
    info!("found {} cores, {} deltas", res.cores.len(), res.deltas.len());

    let json = serde_json::to_string_pretty(&res)?;
    match &args.out {
        Some(out) => {
            std::fs::write(out, &json)?;
            info!("results written to {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

// ── enhance ───────────────────────────────────────────────────────────

fn run_enhance(args: &EnhanceArgs) -> CliResult<()> {
    let img = load_gray(&args.image)?;
    let mut params = EnhanceParams::default();
    params.gabor.combine = args.combine.into();

    let out = detect::enhance_image(&img, &params)?;
    std::fs::write(&args.out, detect::encode_png(&out)?)?;
    info!("enhanced image written to {}", args.out.display());
    Ok(())
}

// ── run (config file) ─────────────────────────────────────────────────

fn run_config(config_path: &Path) -> CliResult<()> {
    let cfg = RidgeDetectConfig::load_json(config_path)
        .map_err(|e| format!("failed to load {}: {e}", config_path.display()))?;
    let mut report = RidgeDetectReport::new(&cfg, config_path);

    match detect_for_config(&cfg, &mut report) {
        Ok(()) => {}
        Err(e) => {
            log::warn!("detection failed: {e}");
            report.set_error(&e);
        }
    }

    let out = cfg.output_path();
    report.write_json(&out)?;
    info!("report written to {}", out.display());
    match report.error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn detect_for_config(cfg: &RidgeDetectConfig, report: &mut RidgeDetectReport) -> CliResult<()> {
    let img = load_gray(Path::new(&cfg.image_path))?;

    let target = if cfg.enhance {
        let enhanced = detect::enhance_image(&img, &cfg.enhance_params)?;
        if let Some(path) = &cfg.enhanced_path {
            std::fs::write(path, detect::encode_png(&enhanced)?)?;
            report.enhanced_path = Some(path.clone());
        }
        enhanced
    } else {
        img
    };

    let res = detect::detect_singular_points(&target, &cfg.singular)?;
    info!("found {} cores, {} deltas", res.cores.len(), res.deltas.len());
    report.set_result(res);
    Ok(())
}
