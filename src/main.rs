use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Result;
use clap::Parser;
use log::info;

use gazecodec::classify::classify_frame;
use gazecodec::config::VideoConfig;
use gazecodec::dct::{CosineTable, forward_frame};
use gazecodec::display::SdlDisplay;
use gazecodec::loader;
use gazecodec::motion::estimate_frame;
use gazecodec::playback::{PlaybackDriver, PreparedVideo};

/// Foreground/background-aware block DCT video compression simulator.
///
/// Reads a raw planar RGB file, estimates per-macroblock motion,
/// classifies each macroblock as foreground or background, and plays
/// the result back with adaptive quantization in an SDL2 window.
#[derive(Parser, Debug)]
#[command(name = "gazecodec", version, about)]
struct Cli {
    /// Path to a raw planar RGB file (frames of R, G, B planes, no headers).
    input: std::path::PathBuf,

    /// Quantizer step applied to foreground macroblocks.
    fg_quant: usize,

    /// Quantizer step applied to background macroblocks.
    bg_quant: usize,

    /// Whether the gaze window overrides the mask around the pointer (`1` or `0`).
    #[arg(value_parser = parse_bool_flag)]
    gaze_on: bool,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 540)]
    height: usize,
}

const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_LOAD_ERROR: u8 = 3;

/// Parses the `gaze_on` positional arg per §6: `1` enables, `0` disables,
/// anything else is a config error rather than a silent `false`.
fn parse_bool_flag(s: &str) -> Result<bool, String> {
    match s {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(format!("expected 0 or 1, got {other:?}")),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    info!(
        "gazecodec starting: input={} fg_quant={} bg_quant={} gaze_on={}",
        cli.input.display(),
        cli.fg_quant,
        cli.bg_quant,
        cli.gaze_on
    );

    let config = match VideoConfig::new(cli.width, cli.height, cli.fg_quant, cli.bg_quant, cli.gaze_on) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("failed to load {}: {err:#}", cli.input.display());
            ExitCode::from(EXIT_LOAD_ERROR)
        }
    }
}

fn run(cli: &Cli, config: &VideoConfig) -> Result<()> {
    let planes = loader::load(&cli.input, config)?;
    let num_frames = planes.num_frames();
    info!("loaded {num_frames} frames, preparing motion estimation and DCT cache");

    let cos_table = CosineTable::new(config.dct_block_size.get());
    let mut dct_blocks = Vec::with_capacity(num_frames);
    let mut masks = Vec::with_capacity(num_frames);
    for frame in 0..num_frames {
        dct_blocks.push(forward_frame(config, &planes, &cos_table, frame));
        let mut grid = estimate_frame(config, &planes, frame);
        classify_frame(config, &mut grid);
        masks.push(grid);
    }

    let video = PreparedVideo {
        config,
        cos_table: &cos_table,
        dct_blocks: &dct_blocks,
        masks: &masks,
    };

    let paused = Arc::new(AtomicBool::new(false));
    let mut display = SdlDisplay::new(
        config.frame_width.get(),
        config.frame_height.get(),
        config.gaze_enabled,
        paused.clone(),
    )?;
    let mut driver = PlaybackDriver::new(paused);

    info!("starting playback: {num_frames} frames");
    driver.run(&video, &mut display)
}
