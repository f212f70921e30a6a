#[cfg(test)]
mod tests;

use smallvec::SmallVec;

use crate::config::VideoConfig;
use crate::plane_store::{Channel, PlaneStore};

/// Per-(frame, mb_x, mb_y) motion estimation result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Macroblock {
    pub dx: i16,
    pub dy: i16,
    pub sad: i32,
    pub foreground: bool,
}

/// Runs the three-step logarithmic motion search for every macroblock of
/// `frame` against `frame - 1`, returning a row-major grid
/// (`mb_y * num_macroblocks_x() + mb_x`).
///
/// Frame 0 has no predecessor: every macroblock is `(0, 0, 0)` per the
/// data model.
pub fn estimate_frame(config: &VideoConfig, planes: &PlaneStore, frame: usize) -> Vec<Macroblock> {
    let mbs_x = config.num_macroblocks_x();
    let mbs_y = config.num_macroblocks_y();
    let mut grid = vec![Macroblock::default(); mbs_x * mbs_y];

    if frame == 0 {
        return grid;
    }

    let m = config.macroblock_size.get();
    for mb_y in 0..mbs_y {
        for mb_x in 0..mbs_x {
            let r0 = mb_y * m;
            let c0 = mb_x * m;
            grid[mb_y * mbs_x + mb_x] =
                search_block(config, planes, frame, r0, c0, m);
        }
    }
    grid
}

/// Logarithmic (three-step) search for a single macroblock with origin
/// `(r0, c0)`.
fn search_block(
    config: &VideoConfig,
    planes: &PlaneStore,
    frame: usize,
    r0: usize,
    c0: usize,
    m: usize,
) -> Macroblock {
    let width_padded = config.frame_width_padded.get();
    let height_padded = config.frame_height_padded.get();

    let prev_frame = frame - 1;
    let mut best_r = r0 as isize;
    let mut best_c = c0 as isize;
    let mut step = config.search_param.get();
    let mut sad_current = sad(planes, frame, r0, c0, prev_frame, best_r, best_c, m);

    while step > 1 {
        step /= 2;
        // At most 9 candidates per step (3x3 grid around the current best).
        let mut candidates: SmallVec<[(isize, isize, bool); 9]> = SmallVec::new();
        for i in [-1isize, 0, 1] {
            for j in [-1isize, 0, 1] {
                let cand_r = best_r + i * step as isize;
                let cand_c = best_c + j * step as isize;
                if in_bounds(cand_r, cand_c, m, width_padded, height_padded) {
                    candidates.push((cand_r, cand_c, i == 0 && j == 0));
                }
            }
        }

        let mut step_best_r = best_r;
        let mut step_best_c = best_c;
        let mut step_best_sad = sad_current;
        for (idx, &(cand_r, cand_c, is_center)) in candidates.iter().enumerate() {
            let cand_sad = sad(planes, frame, r0, c0, prev_frame, cand_r, cand_c, m);
            let better = if idx == 0 {
                true
            } else if is_center {
                cand_sad <= step_best_sad
            } else {
                cand_sad < step_best_sad
            };
            if better {
                step_best_r = cand_r;
                step_best_c = cand_c;
                step_best_sad = cand_sad;
            }
        }

        best_r = step_best_r;
        best_c = step_best_c;
        sad_current = step_best_sad;
    }

    Macroblock {
        dx: (best_c - c0 as isize) as i16,
        dy: (best_r - r0 as isize) as i16,
        sad: sad_current,
        foreground: false,
    }
}

#[inline]
fn in_bounds(r: isize, c: isize, m: usize, width_padded: usize, height_padded: usize) -> bool {
    r >= 0
        && c >= 0
        && (r as usize) + m <= height_padded
        && (c as usize) + m <= width_padded
}

/// SAD between the `m x m` home block at `(home_r, home_c)` in
/// `home_frame` and the target block at `(target_r, target_c)` in
/// `target_frame`, both read from the Y plane.
#[allow(clippy::too_many_arguments)]
fn sad(
    planes: &PlaneStore,
    home_frame: usize,
    home_r: usize,
    home_c: usize,
    target_frame: usize,
    target_r: isize,
    target_c: isize,
    m: usize,
) -> i32 {
    let target_r = target_r as usize;
    let target_c = target_c as usize;
    let mut sum: i32 = 0;
    for dy in 0..m {
        for dx in 0..m {
            let home_px = planes.get(home_frame, Channel::Y, home_r + dy, home_c + dx) as i32;
            let target_px =
                planes.get(target_frame, Channel::Y, target_r + dy, target_c + dx) as i32;
            sum += (home_px - target_px).abs();
        }
    }
    sum
}
