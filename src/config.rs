use std::num::NonZeroUsize;

use anyhow::{Result, bail};

use crate::error::Error;

/// Video configuration, immutable after construction.
///
/// Mirrors the "video config" of the data model: a handful of tunables
/// plus a set of derived quantities computed once at construction time.
#[derive(Debug, Clone, Copy)]
pub struct VideoConfig {
    pub frame_width: NonZeroUsize,
    pub frame_height: NonZeroUsize,
    pub macroblock_size: NonZeroUsize,
    pub dct_block_size: NonZeroUsize,
    pub search_param: NonZeroUsize,
    pub gaze_size: NonZeroUsize,
    pub fg_quant: NonZeroUsize,
    pub bg_quant: NonZeroUsize,
    pub gaze_enabled: bool,

    pub frame_width_padded: NonZeroUsize,
    pub frame_height_padded: NonZeroUsize,
    pub frame_size_padded: NonZeroUsize,
}

impl VideoConfig {
    pub const DEFAULT_MACROBLOCK_SIZE: usize = 16;
    pub const DEFAULT_DCT_BLOCK_SIZE: usize = 8;
    pub const DEFAULT_SEARCH_PARAM: usize = 16;
    pub const DEFAULT_GAZE_SIZE: usize = 64;

    /// Builds a config from CLI-level inputs, applying the defaults from
    /// the data model and validating everything a config error can catch
    /// before any file I/O is attempted.
    pub fn new(
        frame_width: usize,
        frame_height: usize,
        fg_quant: usize,
        bg_quant: usize,
        gaze_enabled: bool,
    ) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            bail!(Error::config("frame dimensions must be non-zero"));
        }
        if fg_quant == 0 {
            bail!(Error::config("fg_quant must be an integer >= 1"));
        }
        if bg_quant == 0 {
            bail!(Error::config("bg_quant must be an integer >= 1"));
        }

        let macroblock_size = Self::DEFAULT_MACROBLOCK_SIZE;
        let dct_block_size = Self::DEFAULT_DCT_BLOCK_SIZE;
        let search_param = Self::DEFAULT_SEARCH_PARAM;
        let gaze_size = Self::DEFAULT_GAZE_SIZE;

        if !search_param.is_power_of_two() || search_param < 2 {
            bail!(Error::config(
                "search_param must be a power of two >= 2"
            ));
        }

        let frame_width_padded = round_up(frame_width, macroblock_size);
        let frame_height_padded = round_up(frame_height, macroblock_size);
        let frame_size_padded = frame_width_padded * frame_height_padded;

        Ok(VideoConfig {
            frame_width: NonZeroUsize::new(frame_width).expect("checked above"),
            frame_height: NonZeroUsize::new(frame_height).expect("checked above"),
            macroblock_size: NonZeroUsize::new(macroblock_size).expect("constant"),
            dct_block_size: NonZeroUsize::new(dct_block_size).expect("constant"),
            search_param: NonZeroUsize::new(search_param).expect("checked above"),
            gaze_size: NonZeroUsize::new(gaze_size).expect("constant"),
            fg_quant: NonZeroUsize::new(fg_quant).expect("checked above"),
            bg_quant: NonZeroUsize::new(bg_quant).expect("checked above"),
            gaze_enabled,
            frame_width_padded: NonZeroUsize::new(frame_width_padded).expect("derived positive"),
            frame_height_padded: NonZeroUsize::new(frame_height_padded)
                .expect("derived positive"),
            frame_size_padded: NonZeroUsize::new(frame_size_padded).expect("derived positive"),
        })
    }

    /// Number of frames stored in a raw file of the given size, per §3's
    /// `num_frames = file_size / (width * height * 3)`.
    #[must_use]
    pub fn num_frames_in(&self, file_size: u64) -> usize {
        let frame_bytes = self.frame_width.get() * self.frame_height.get() * 3;
        (file_size as usize) / frame_bytes
    }

    #[must_use]
    pub fn frame_bytes(&self) -> usize {
        self.frame_width.get() * self.frame_height.get() * 3
    }

    #[must_use]
    pub fn num_macroblocks_x(&self) -> usize {
        self.frame_width_padded.get() / self.macroblock_size.get()
    }

    #[must_use]
    pub fn num_macroblocks_y(&self) -> usize {
        self.frame_height_padded.get() / self.macroblock_size.get()
    }

    #[must_use]
    pub fn num_macroblocks(&self) -> usize {
        self.num_macroblocks_x() * self.num_macroblocks_y()
    }

    #[must_use]
    pub fn num_dct_blocks_x(&self) -> usize {
        self.frame_width_padded.get() / self.dct_block_size.get()
    }

    #[must_use]
    pub fn num_dct_blocks_y(&self) -> usize {
        self.frame_height_padded.get() / self.dct_block_size.get()
    }
}

fn round_up(value: usize, multiple: usize) -> usize {
    value.div_ceil(multiple) * multiple
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_macroblock_multiple() {
        let cfg = VideoConfig::new(960, 540, 10, 40, false).unwrap();
        assert_eq!(cfg.frame_width_padded.get(), 960);
        assert_eq!(cfg.frame_height_padded.get(), 544);
        assert_eq!(
            cfg.frame_size_padded.get(),
            960 * 544,
            "padded size must be width_padded * height_padded"
        );
    }

    #[test]
    fn exact_multiple_is_unchanged() {
        let cfg = VideoConfig::new(32, 32, 1, 1, false).unwrap();
        assert_eq!(cfg.frame_width_padded.get(), 32);
        assert_eq!(cfg.frame_height_padded.get(), 32);
    }

    #[test]
    fn rejects_zero_quantizer() {
        assert!(VideoConfig::new(16, 16, 0, 10, false).is_err());
        assert!(VideoConfig::new(16, 16, 10, 0, false).is_err());
    }

    #[test]
    fn rejects_zero_dimension() {
        assert!(VideoConfig::new(0, 16, 10, 10, false).is_err());
    }

    #[test]
    fn macroblock_grid_matches_padded_size() {
        let cfg = VideoConfig::new(960, 540, 10, 40, false).unwrap();
        assert_eq!(cfg.num_macroblocks_x(), 60);
        assert_eq!(cfg.num_macroblocks_y(), 34);
        assert_eq!(cfg.num_macroblocks(), 60 * 34);
    }
}
