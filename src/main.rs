use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use rawdump::logger;
use rawdump::raw_pipeline::{
    resolve_input, BatchDriver, ExtensionAllowList, ExtractConfig, RenderMode, Reporter, Verbosity,
    DEFAULT_INPUT_PATH,
};

use tracing::{error, info};

/// Exit status for invalid arguments or an unusable input path
const EXIT_CONFIG_ERROR: u8 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RenderArg {
    /// White-balanced, color-corrected sRGB rendering
    Color,
    /// Plain demosaic of the sensor data, no color processing
    Demosaic,
}

impl From<RenderArg> for RenderMode {
    fn from(arg: RenderArg) -> Self {
        match arg {
            RenderArg::Color => RenderMode::Color,
            RenderArg::Demosaic => RenderMode::Demosaic,
        }
    }
}

/// Extract the raw bitplane, a PNG rendering and a metadata report from camera RAW files
#[derive(Parser, Debug)]
#[command(name = "rawdump", version, about)]
struct Args {
    /// RAW file or directory of RAW files to process
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Also write a <name>.txt report next to each source
    #[arg(short, long)]
    info: bool,

    /// Console verbosity: 0 silent, 1 progress, 2 per-file information
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    verbose: u8,

    /// Number of files processed concurrently
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: u16,

    /// How the PNG preview is rendered
    #[arg(short, long, value_enum, default_value_t = RenderArg::Color)]
    render: RenderArg,

    /// Accepted RAW extension, repeatable; replaces the built-in list
    #[arg(short, long = "ext", value_name = "EXT")]
    ext: Vec<String>,
}

fn build_config(args: &Args, verbosity: Verbosity) -> ExtractConfig {
    let mut builder = ExtractConfig::builder()
        .verbosity(verbosity)
        .save_info(args.info)
        .jobs(args.jobs as usize)
        .render_mode(args.render.into());

    if !args.ext.is_empty() {
        builder = builder.extensions(ExtensionAllowList::new(&args.ext));
    }

    builder.build()
}

fn main() -> ExitCode {
    let args = Args::parse();
    let verbosity = Verbosity::from_level(args.verbose).unwrap_or_default();

    logger::init(verbosity);

    let input = match resolve_input(args.file.clone(), DEFAULT_INPUT_PATH)
        .context("Cannot determine what to process")
    {
        Ok(input) => input,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let config = build_config(&args, verbosity);
    info!(
        input = %input.display(),
        jobs = config.jobs,
        render = ?config.render_mode,
        save_info = config.save_info,
        "Starting rawdump"
    );

    let driver = BatchDriver::new(config);
    let reporter = Reporter::stdout(verbosity);
    let report = driver.run(&input, &reporter);

    ExitCode::from(report.exit_code())
}
