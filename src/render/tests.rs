use super::*;
use crate::config::VideoConfig;
use crate::plane_store::{Channel, PlaneStore};

fn uniform_blocks(config: &VideoConfig, value: u8) -> Vec<DctBlock> {
    let mut store = PlaneStore::new(config, 1);
    for row in 0..config.frame_height_padded.get() {
        for col in 0..config.frame_width_padded.get() {
            for &channel in crate::plane_store::Channel::ALL_RGB.iter() {
                store.set(0, channel, row, col, value);
            }
        }
    }
    let cos_table = CosineTable::new(config.dct_block_size.get());
    crate::dct::forward_frame(config, &store, &cos_table, 0)
}

#[test]
fn gaze_override_forces_q1_inside_window_regardless_of_mask() {
    let config = VideoConfig::new(128, 128, 40, 40, true).unwrap();
    let blocks = uniform_blocks(&config, 128);
    let cos_table = CosineTable::new(config.dct_block_size.get());
    let mut mask = vec![Macroblock::default(); config.num_macroblocks()];
    for mb in mask.iter_mut() {
        mb.foreground = false;
    }

    let gaze = Gaze { x: 64, y: 64, enabled: true };
    let center_x = 64;
    let center_y = 64;
    let q = quantizer_for_block(&config, &mask, gaze, center_x, center_y);
    assert_eq!(q, 1, "block centered on the gaze point must use q=1");

    // And well outside the gaze window it must fall back to bg_quant
    // since every macroblock above was marked background.
    let q_far = quantizer_for_block(&config, &mask, gaze, 4, 4);
    assert_eq!(q_far, config.bg_quant.get());
    let _ = blocks;
    let _ = cos_table;
}

#[test]
fn mask_selects_fg_quant_for_foreground_macroblocks() {
    let config = VideoConfig::new(64, 64, 5, 40, false).unwrap();
    let mut mask = vec![Macroblock::default(); config.num_macroblocks()];
    mask[0].foreground = true;
    let gaze = Gaze::disabled();
    let q = quantizer_for_block(&config, &mask, gaze, 2, 2);
    assert_eq!(q, config.fg_quant.get());
}

#[test]
fn render_output_has_unpadded_dimensions() {
    let config = VideoConfig::new(20, 12, 10, 40, false).unwrap();
    let blocks = uniform_blocks(&config, 100);
    let cos_table = CosineTable::new(config.dct_block_size.get());
    let mask = vec![Macroblock::default(); config.num_macroblocks()];
    let image = render_frame(&config, &cos_table, &blocks, &mask, Gaze::disabled());
    assert_eq!(image.len(), 20 * 12 * 3);
}

#[test]
fn uniform_input_round_trips_near_exactly_with_q1() {
    let config = VideoConfig::new(16, 16, 1, 1, false).unwrap();
    let blocks = uniform_blocks(&config, 77);
    let cos_table = CosineTable::new(config.dct_block_size.get());
    let mask = vec![Macroblock::default(); config.num_macroblocks()];
    let image = render_frame(&config, &cos_table, &blocks, &mask, Gaze::disabled());
    for &byte in &image {
        assert!((i32::from(byte) - 77).abs() <= 1);
    }
}
