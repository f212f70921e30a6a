#[cfg(test)]
mod tests;

use crate::config::VideoConfig;
use crate::dct::{self, CosineTable, DctBlock};
use crate::motion::Macroblock;

/// A gaze point mapped into frame coordinates, or "no gaze" when the
/// feature is disabled or the display reports no active pointer.
#[derive(Debug, Clone, Copy)]
pub struct Gaze {
    pub x: usize,
    pub y: usize,
    pub enabled: bool,
}

impl Gaze {
    #[must_use]
    pub fn disabled() -> Self {
        Gaze { x: 0, y: 0, enabled: false }
    }
}

/// Picks the effective quantizer for the DCT block whose center is
/// `(center_x, center_y)`: the gaze window overrides the mask when the
/// center falls inside it, otherwise the containing macroblock's
/// foreground/background flag selects `fg_quant`/`bg_quant`.
fn quantizer_for_block(
    config: &VideoConfig,
    mask: &[Macroblock],
    gaze: Gaze,
    center_x: usize,
    center_y: usize,
) -> usize {
    let half_gaze = config.gaze_size.get() / 2;
    if gaze.enabled
        && center_x.abs_diff(gaze.x) <= half_gaze
        && center_y.abs_diff(gaze.y) <= half_gaze
    {
        return 1;
    }

    let m = config.macroblock_size.get();
    let mbs_x = config.num_macroblocks_x();
    let mb_x = center_x / m;
    let mb_y = center_y / m;
    let mb_idx = mb_y * mbs_x + mb_x;
    if mask[mb_idx].foreground {
        config.fg_quant.get()
    } else {
        config.bg_quant.get()
    }
}

/// Renders one frame: for every cached DCT block, picks a quantizer from
/// the gaze window (if any) or the macroblock mask, then quantizes and
/// inverse-transforms into an unpadded `frame_width x frame_height` RGB
/// image. The padded margin is discarded by clipping writes at the
/// unpadded frame bounds.
pub fn render_frame(
    config: &VideoConfig,
    cos_table: &CosineTable,
    dct_blocks: &[DctBlock],
    mask: &[Macroblock],
    gaze: Gaze,
) -> Vec<u8> {
    let width = config.frame_width.get();
    let height = config.frame_height.get();
    let mut image = vec![0u8; width * height * 3];

    let s = config.dct_block_size.get();
    let blocks_x = config.num_dct_blocks_x();
    let blocks_y = config.num_dct_blocks_y();

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let block = &dct_blocks[by * blocks_x + bx];
            let center_x = bx * s + s / 2;
            let center_y = by * s + s / 2;
            let q = quantizer_for_block(config, mask, gaze, center_x, center_y);

            dct::inverse_block(
                block,
                cos_table,
                s,
                q,
                &mut image,
                width,
                width,
                height,
                by * s,
                bx * s,
            );
        }
    }

    image
}
