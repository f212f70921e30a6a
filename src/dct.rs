#[cfg(test)]
mod tests;

use std::f64::consts::PI;

use rayon::prelude::*;

use crate::config::VideoConfig;
use crate::plane_store::{Channel, PlaneStore};

/// `cos_table[u][x] = cos(((2x+1) * u * pi) / (2S))`, computed once for
/// a given block size `S` and reused by every forward/inverse transform.
#[derive(Debug, Clone)]
pub struct CosineTable {
    s: usize,
    table: Vec<f64>,
}

impl CosineTable {
    #[must_use]
    pub fn new(s: usize) -> Self {
        let mut table = vec![0.0; s * s];
        for u in 0..s {
            for x in 0..s {
                table[u * s + x] = (((2 * x + 1) as f64) * (u as f64) * PI / (2.0 * s as f64)).cos();
            }
        }
        CosineTable { s, table }
    }

    #[inline]
    #[must_use]
    fn get(&self, u: usize, x: usize) -> f64 {
        self.table[u * self.s + x]
    }
}

#[inline]
fn alpha(k: usize) -> f64 {
    if k == 0 { 1.0 / std::f64::consts::SQRT_2 } else { 1.0 }
}

/// One 8x8 (or configured `S x S`) RGB block's forward-DCT coefficients,
/// indexed `[channel][u][v]`.
#[derive(Debug, Clone)]
pub struct DctBlock {
    s: usize,
    /// Flattened as `(channel * S + u) * S + v`.
    coeffs: Vec<f64>,
}

impl DctBlock {
    #[must_use]
    fn new(s: usize) -> Self {
        DctBlock {
            s,
            coeffs: vec![0.0; 3 * s * s],
        }
    }

    #[inline]
    fn idx(&self, channel: usize, u: usize, v: usize) -> usize {
        (channel * self.s + u) * self.s + v
    }

    #[inline]
    #[must_use]
    pub fn get(&self, channel: usize, u: usize, v: usize) -> f64 {
        self.coeffs[self.idx(channel, u, v)]
    }

    #[inline]
    fn set(&mut self, channel: usize, u: usize, v: usize, value: f64) {
        let idx = self.idx(channel, u, v);
        self.coeffs[idx] = value;
    }
}

/// Forward-transforms every RGB block of `frame`, producing the full
/// `num_dct_blocks_x * num_dct_blocks_y` grid in row-major order. This is
/// run once per frame at load time and the result cached.
pub fn forward_frame(
    config: &VideoConfig,
    planes: &PlaneStore,
    cos_table: &CosineTable,
    frame: usize,
) -> Vec<DctBlock> {
    let s = config.dct_block_size.get();
    let blocks_x = config.num_dct_blocks_x();
    let blocks_y = config.num_dct_blocks_y();

    (0..blocks_x * blocks_y)
        .into_par_iter()
        .map(|i| {
            let bx = i % blocks_x;
            let by = i / blocks_x;
            forward_block(planes, cos_table, frame, by * s, bx * s, s)
        })
        .collect()
}

/// Forward DCT of a single `S x S` RGB block with top-left `(r0, c0)`.
fn forward_block(
    planes: &PlaneStore,
    cos_table: &CosineTable,
    frame: usize,
    r0: usize,
    c0: usize,
    s: usize,
) -> DctBlock {
    let mut block = DctBlock::new(s);
    for (ci, &channel) in Channel::ALL_RGB.iter().enumerate() {
        for u in 0..s {
            for v in 0..s {
                let mut sum = 0.0f64;
                for y in 0..s {
                    for x in 0..s {
                        let pixel = f64::from(planes.get(frame, channel, r0 + y, c0 + x));
                        sum += pixel * cos_table.get(u, x) * cos_table.get(v, y);
                    }
                }
                let coeff = (2.0 / s as f64) * alpha(u) * alpha(v) * sum;
                block.set(ci, u, v, coeff);
            }
        }
    }
    block
}

/// Round-half-away-from-zero, as required for bit-exact quantization.
#[inline]
#[must_use]
pub fn round_half_away_from_zero(x: f64) -> f64 {
    if x >= 0.0 { (x + 0.5).floor() } else { (x - 0.5).ceil() }
}

/// Quantizes the cached forward coefficients with divisor `q` and
/// inverse-transforms them, writing the `S x S` RGB result into `out` at
/// `(out_r0, out_c0)`, cropped to `(out_width, out_height)`.
#[allow(clippy::too_many_arguments)]
pub fn inverse_block(
    block: &DctBlock,
    cos_table: &CosineTable,
    s: usize,
    q: usize,
    out: &mut [u8],
    out_stride: usize,
    out_width: usize,
    out_height: usize,
    out_r0: usize,
    out_c0: usize,
) {
    let q = q as f64;
    for ci in 0..3 {
        let mut quantized = vec![0.0f64; s * s];
        for u in 0..s {
            for v in 0..s {
                let f = block.get(ci, u, v);
                quantized[u * s + v] = round_half_away_from_zero(f / q) * q;
            }
        }

        for y in 0..s {
            let out_row = out_r0 + y;
            if out_row >= out_height {
                continue;
            }
            for x in 0..s {
                let out_col = out_c0 + x;
                if out_col >= out_width {
                    continue;
                }
                let mut sum = 0.0f64;
                for u in 0..s {
                    for v in 0..s {
                        sum += alpha(u)
                            * alpha(v)
                            * quantized[u * s + v]
                            * cos_table.get(u, x)
                            * cos_table.get(v, y);
                    }
                }
                let pixel = (2.0 / s as f64) * sum;
                let clamped = pixel.clamp(0.0, 255.0);
                let byte = clamped as u8;
                let pixel_idx = (out_row * out_stride + out_col) * 3 + ci;
                out[pixel_idx] = byte;
            }
        }
    }
}
