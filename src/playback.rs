
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::trace;

use crate::config::VideoConfig;
use crate::dct::CosineTable;
use crate::display::Display;
use crate::motion::Macroblock;
use crate::render::{self, Gaze};

const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(50);
const FRAME_PACING: Duration = Duration::from_millis(33);

/// The preprocessed per-frame artifacts playback consumes: nothing here
/// is mutated once load finishes.
pub struct PreparedVideo<'a> {
    pub config: &'a VideoConfig,
    pub cos_table: &'a CosineTable,
    /// `dct_blocks[frame]` is that frame's cached forward-DCT grid.
    pub dct_blocks: &'a [Vec<crate::dct::DctBlock>],
    /// `masks[frame]` is that frame's classified macroblock grid.
    pub masks: &'a [Vec<Macroblock>],
}

/// Advances the frame index, honors pause, loops, and delegates
/// rendering to [`render::render_frame`] and presentation to an
/// external [`Display`].
pub struct PlaybackDriver {
    paused: Arc<AtomicBool>,
    frame_index: usize,
}

impl PlaybackDriver {
    #[must_use]
    pub fn new(paused: Arc<AtomicBool>) -> Self {
        PlaybackDriver { paused, frame_index: 0 }
    }

    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn toggle_pause(&self) {
        self.paused.fetch_xor(true, Ordering::AcqRel);
    }

    /// Runs one tick: blocks (in 50ms polling increments) while paused,
    /// then renders and presents the current frame and advances the
    /// index, wrapping at the end of the video.
    pub fn tick(&mut self, video: &PreparedVideo, display: &mut impl Display) -> Result<bool> {
        while self.paused.load(Ordering::Acquire) {
            if display.should_close() {
                return Ok(false);
            }
            thread::sleep(PAUSE_POLL_INTERVAL);
            trace!("playback paused, polling");
        }

        if display.should_close() {
            return Ok(false);
        }

        let (gx, gy, gaze_enabled) = display.gaze_point();
        let gaze = if video.config.gaze_enabled && gaze_enabled {
            Gaze { x: gx, y: gy, enabled: true }
        } else {
            Gaze::disabled()
        };

        let image = render::render_frame(
            video.config,
            video.cos_table,
            &video.dct_blocks[self.frame_index],
            &video.masks[self.frame_index],
            gaze,
        );

        let header = format!(
            "FG Quant: {}  BG Quant: {}  Gaze On: {}  Frame: {}/{}",
            video.config.fg_quant,
            video.config.bg_quant,
            video.config.gaze_enabled,
            self.frame_index + 1,
            video.dct_blocks.len(),
        );
        display.present(&image, &header)?;

        self.frame_index = (self.frame_index + 1) % video.dct_blocks.len();
        thread::sleep(FRAME_PACING);
        Ok(true)
    }

    /// Runs playback until the display is closed.
    pub fn run(&mut self, video: &PreparedVideo, display: &mut impl Display) -> Result<()> {
        while self.tick(video, display)? {}
        Ok(())
    }
}
