
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use log::info;

use crate::config::VideoConfig;
use crate::error::Error;
use crate::plane_store::{Channel, PlaneStore};

/// 3x3 weighted box blur kernel used to smooth the derived luma plane
/// before motion estimation.
const BLUR_KERNEL: [[u32; 3]; 3] = [[1, 2, 1], [2, 4, 2], [1, 2, 1]];

/// Reads a raw planar RGB file into a fully padded, luma-derived
/// [`PlaneStore`].
///
/// The input is a flat concatenation of frames, each three full planes
/// R, G, B of `frame_width * frame_height` bytes with no headers and no
/// inter-plane padding.
pub fn load(path: impl AsRef<Path>, config: &VideoConfig) -> Result<PlaneStore> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| Error::load(path, "could not open file", None))?;
    let file_len = file
        .metadata()
        .with_context(|| Error::load(path, "could not stat file", None))?
        .len();

    let frame_bytes = config.frame_bytes() as u64;
    if file_len % frame_bytes != 0 {
        bail!(Error::load(
            path,
            format!(
                "file size {file_len} is not a multiple of one frame ({frame_bytes} bytes); \
                 a partial trailing frame is a load error"
            ),
            Some((file_len / frame_bytes) * frame_bytes),
        ));
    }
    let num_frames = (file_len / frame_bytes) as usize;
    if num_frames == 0 {
        bail!(Error::load(path, "file contains zero complete frames", Some(0)));
    }

    info!(
        "loading {} frames ({}x{} padded to {}x{}) from {}",
        num_frames,
        config.frame_width,
        config.frame_height,
        config.frame_width_padded,
        config.frame_height_padded,
        path.display()
    );

    let mut reader = BufReader::new(file);
    let mut store = PlaneStore::new(config, num_frames);

    let width = config.frame_width.get();
    let height = config.frame_height.get();

    for frame in 0..num_frames {
        for &channel in Channel::ALL_RGB.iter() {
            read_padded_plane(&mut reader, &mut store, frame, channel, width, height, path)?;
        }
        synthesize_and_blur_luma(&mut store, frame);
    }

    Ok(store)
}

/// Reads one unpadded plane's worth of bytes from `reader` into `store`,
/// then edge-extends it to the padded frame size in place: pad columns
/// replicate the last real column of each row, pad rows replicate the
/// last written real row across the full padded width.
fn read_padded_plane(
    reader: &mut impl Read,
    store: &mut PlaneStore,
    frame: usize,
    channel: Channel,
    width: usize,
    height: usize,
    path: &Path,
) -> Result<()> {
    let width_padded = store.width_padded();
    let height_padded = store.height_padded();

    let mut row_buf = vec![0u8; width];
    {
        let plane = store.plane_mut(frame, channel);
        for row in 0..height {
            reader.read_exact(&mut row_buf).with_context(|| {
                Error::load(
                    path,
                    format!("short read in frame {frame} row {row}"),
                    None,
                )
            })?;
            let dst = &mut plane[row * width_padded..row * width_padded + width_padded];
            dst[..width].copy_from_slice(&row_buf);
            let last = row_buf[width - 1];
            for c in dst[width..].iter_mut() {
                *c = last;
            }
        }

        for row in height..height_padded {
            let (src, dst) = plane.split_at_mut(row * width_padded);
            let src_row = &src[(height - 1) * width_padded..height * width_padded];
            dst[..width_padded].copy_from_slice(src_row);
        }
    }

    Ok(())
}

fn synthesize_and_blur_luma(store: &mut PlaneStore, frame: usize) {
    let width_padded = store.width_padded();
    let height_padded = store.height_padded();

    let mut y_unblurred = vec![0u8; width_padded * height_padded];
    {
        let r = store.plane(frame, Channel::R);
        let g = store.plane(frame, Channel::G);
        let b = store.plane(frame, Channel::B);
        for i in 0..y_unblurred.len() {
            let luma = 0.299 * f64::from(r[i]) + 0.587 * f64::from(g[i]) + 0.114 * f64::from(b[i]);
            y_unblurred[i] = luma.clamp(0.0, 255.0) as u8;
        }
    }

    let y_out = store.plane_mut(frame, Channel::Y);
    for row in 0..height_padded {
        for col in 0..width_padded {
            let mut sum = 0u32;
            let mut weight = 0u32;
            for (dy, krow) in BLUR_KERNEL.iter().enumerate() {
                let ry = row as isize + dy as isize - 1;
                if ry < 0 || ry >= height_padded as isize {
                    continue;
                }
                for (dx, &k) in krow.iter().enumerate() {
                    let rx = col as isize + dx as isize - 1;
                    if rx < 0 || rx >= width_padded as isize {
                        continue;
                    }
                    sum += k * u32::from(y_unblurred[ry as usize * width_padded + rx as usize]);
                    weight += k;
                }
            }
            y_out[row * width_padded + col] = (sum / weight) as u8;
        }
    }
    log::trace!("frame {frame}: luma synthesized and blurred");
}
