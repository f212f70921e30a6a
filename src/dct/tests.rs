use super::*;
use crate::config::VideoConfig;
use crate::plane_store::{Channel, PlaneStore};

fn single_block_store(values: &[[u8; 8]; 8]) -> (VideoConfig, PlaneStore) {
    let config = VideoConfig::new(8, 8, 10, 40, false).unwrap();
    let mut store = PlaneStore::new(&config, 1);
    for row in 0..8 {
        for col in 0..8 {
            for &channel in Channel::ALL_RGB.iter() {
                store.set(0, channel, row, col, values[row][col]);
            }
        }
    }
    (config, store)
}

#[test]
fn round_trip_with_q1_reproduces_input_within_one() {
    let mut values = [[0u8; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            values[row][col] = ((row * 37 + col * 11) % 256) as u8;
        }
    }
    let (config, store) = single_block_store(&values);
    let cos_table = CosineTable::new(config.dct_block_size.get());
    let block = forward_block(&store, &cos_table, 0, 0, 0, config.dct_block_size.get());

    let mut out = vec![0u8; 8 * 8 * 3];
    inverse_block(&block, &cos_table, config.dct_block_size.get(), 1, &mut out, 8, 8, 8, 0, 0);

    for row in 0..8 {
        for col in 0..8 {
            let expected = i32::from(values[row][col]);
            let got = i32::from(out[(row * 8 + col) * 3]);
            assert!(
                (expected - got).abs() <= 1,
                "pixel ({row},{col}) expected {expected} got {got}"
            );
        }
    }
}

#[test]
fn quantizer_monotonicity_increases_error() {
    let mut values = [[0u8; 8]; 8];
    for row in 0..8 {
        for col in 0..8 {
            values[row][col] = if (row + col) % 2 == 0 { 10 } else { 240 };
        }
    }
    let (config, store) = single_block_store(&values);
    let s = config.dct_block_size.get();
    let cos_table = CosineTable::new(s);
    let block = forward_block(&store, &cos_table, 0, 0, 0, s);

    let mut out_q1 = vec![0u8; 8 * 8 * 3];
    inverse_block(&block, &cos_table, s, 1, &mut out_q1, 8, 8, 8, 0, 0);
    let mut out_q50 = vec![0u8; 8 * 8 * 3];
    inverse_block(&block, &cos_table, s, 50, &mut out_q50, 8, 8, 8, 0, 0);

    let mut l1_q1 = 0i64;
    let mut l1_q50 = 0i64;
    for row in 0..8 {
        for col in 0..8 {
            let expected = i64::from(values[row][col]);
            l1_q1 += (expected - i64::from(out_q1[(row * 8 + col) * 3])).abs();
            l1_q50 += (expected - i64::from(out_q50[(row * 8 + col) * 3])).abs();
        }
    }
    assert!(l1_q50 >= l1_q1, "coarser quantizer must not reduce error");
}

#[test]
fn round_half_away_from_zero_matches_banker_exception() {
    assert_eq!(round_half_away_from_zero(0.5), 1.0);
    assert_eq!(round_half_away_from_zero(-0.5), -1.0);
    assert_eq!(round_half_away_from_zero(2.5), 3.0);
    assert_eq!(round_half_away_from_zero(-2.5), -3.0);
    assert_eq!(round_half_away_from_zero(2.4), 2.0);
}

#[test]
fn cosine_table_matches_definition() {
    let s = 8;
    let table = CosineTable::new(s);
    for u in 0..s {
        for x in 0..s {
            let expected = (((2 * x + 1) as f64) * (u as f64) * std::f64::consts::PI
                / (2.0 * s as f64))
                .cos();
            assert!((table.get(u, x) - expected).abs() < 1e-12);
        }
    }
}

#[test]
fn dc_only_block_is_uniform_after_round_trip() {
    let values = [[128u8; 8]; 8];
    let (config, store) = single_block_store(&values);
    let s = config.dct_block_size.get();
    let cos_table = CosineTable::new(s);
    let block = forward_block(&store, &cos_table, 0, 0, 0, s);
    // AC coefficients of a flat block should be ~0.
    for u in 0..s {
        for v in 0..s {
            if u == 0 && v == 0 {
                continue;
            }
            assert!(block.get(0, u, v).abs() < 1e-6, "AC coeff ({u},{v}) should vanish on flat input");
        }
    }
}
