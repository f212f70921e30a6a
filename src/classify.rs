
use crate::config::VideoConfig;
use crate::motion::Macroblock;

const SAD_LO: i32 = 500;
const SAD_HI: i32 = 8000;
const MV_DIFF_BASE: f64 = 2.2;
const MV_DIFF_STEP: f64 = 0.33;
const MIN_FG_BLOCKS: usize = 7;
const MAX_RUNS: u32 = 5;
const CORNER_BG_T: u32 = 2;
const EDGE_BG_T: u32 = 3;
const EDGE_FG_T: u32 = 1;
const STD_BG_T: u32 = 6;
const STD_FG_T: u32 = 4;

/// Classifies every macroblock of a frame as foreground or background.
///
/// Mutates `grid[i].foreground` in place; `grid` must already carry the
/// `dx`/`dy`/`sad` values produced by the motion estimator.
pub fn classify_frame(config: &VideoConfig, grid: &mut [Macroblock]) {
    let mbs_x = config.num_macroblocks_x();
    let mbs_y = config.num_macroblocks_y();
    debug_assert_eq!(grid.len(), mbs_x * mbs_y);

    initial_assignment(grid);
    neighbor_filter(grid, mbs_x, mbs_y);
    dilate(grid, mbs_x, mbs_y);
}

fn initial_assignment(grid: &mut [Macroblock]) {
    let n = grid.len() as f64;
    let avg_dx = grid.iter().map(|mb| f64::from(mb.dx)).sum::<f64>() / n;
    let avg_dy = grid.iter().map(|mb| f64::from(mb.dy)).sum::<f64>() / n;

    let mut relax = 0.0f64;
    let mut run = 0;
    loop {
        let threshold = MV_DIFF_BASE - relax;
        for mb in grid.iter_mut() {
            let mv_dev = (avg_dx - f64::from(mb.dx)).abs() + (avg_dy - f64::from(mb.dy)).abs();
            mb.foreground = mb.sad > SAD_LO && mb.sad < SAD_HI && mv_dev > threshold;
        }
        run += 1;
        let fg_count = grid.iter().filter(|mb| mb.foreground).count();
        if fg_count >= MIN_FG_BLOCKS || run >= MAX_RUNS {
            break;
        }
        relax += MV_DIFF_STEP;
    }
}

fn is_corner(x: usize, y: usize, mbs_x: usize, mbs_y: usize) -> bool {
    (x == 0 || x == mbs_x - 1) && (y == 0 || y == mbs_y - 1)
}

fn is_edge(x: usize, y: usize, mbs_x: usize, mbs_y: usize) -> bool {
    x == 0 || y == 0 || x == mbs_x - 1 || y == mbs_y - 1
}

/// Single in-place, row-major pass. This reads and writes the same grid:
/// later blocks in the same pass see already-updated neighbors from
/// earlier in the row-major scan, which is intentional and required for
/// bit-exact behavior.
fn neighbor_filter(grid: &mut [Macroblock], mbs_x: usize, mbs_y: usize) {
    for y in 0..mbs_y {
        for x in 0..mbs_x {
            let mut bg_neighbors = 0u32;
            for dy in [-1isize, 0, 1] {
                for dx in [-1isize, 0, 1] {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx >= mbs_x as isize || ny >= mbs_y as isize {
                        continue;
                    }
                    if !grid[ny as usize * mbs_x + nx as usize].foreground {
                        bg_neighbors += 1;
                    }
                }
            }

            let idx = y * mbs_x + x;
            if is_corner(x, y, mbs_x, mbs_y) {
                grid[idx].foreground = bg_neighbors < CORNER_BG_T;
            } else if is_edge(x, y, mbs_x, mbs_y) {
                if bg_neighbors >= EDGE_BG_T {
                    grid[idx].foreground = false;
                } else if bg_neighbors <= EDGE_FG_T {
                    grid[idx].foreground = true;
                }
            } else if bg_neighbors >= STD_BG_T {
                grid[idx].foreground = false;
            } else if bg_neighbors <= STD_FG_T {
                grid[idx].foreground = true;
            }
        }
    }
}

/// A cell is foreground iff it was foreground or any 4-neighbor was
/// foreground. Double-buffered: order-independent by construction.
fn dilate_pass(grid: &[Macroblock], mbs_x: usize, mbs_y: usize) -> Vec<bool> {
    let mut out = vec![false; grid.len()];
    for y in 0..mbs_y {
        for x in 0..mbs_x {
            let idx = y * mbs_x + x;
            if grid[idx].foreground {
                out[idx] = true;
                continue;
            }
            let mut fg = false;
            for (dx, dy) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= mbs_x as isize || ny >= mbs_y as isize {
                    continue;
                }
                if grid[ny as usize * mbs_x + nx as usize].foreground {
                    fg = true;
                    break;
                }
            }
            out[idx] = fg;
        }
    }
    out
}

fn apply_mask(grid: &mut [Macroblock], mask: &[bool]) {
    for (mb, &fg) in grid.iter_mut().zip(mask.iter()) {
        mb.foreground = fg;
    }
}

fn dilate(grid: &mut [Macroblock], mbs_x: usize, mbs_y: usize) {
    let num_macroblocks = grid.len();
    let expand_target = MIN_FG_BLOCKS * 3;

    let fg_count = grid.iter().filter(|mb| mb.foreground).count();
    if fg_count < num_macroblocks / 3 {
        let mask = dilate_pass(grid, mbs_x, mbs_y);
        apply_mask(grid, &mask);
    }

    let mut runs = 0u32;
    while grid.iter().filter(|mb| mb.foreground).count() < expand_target && runs < MAX_RUNS {
        let mask = dilate_pass(grid, mbs_x, mbs_y);
        apply_mask(grid, &mask);
        runs += 1;
    }
}
