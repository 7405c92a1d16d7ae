// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bilinear resize with pixel-centre mapping and edge clamping.

use retouch_core::error::{Result, RetouchError};
use tracing::{debug, instrument};

use crate::buffer::{PixelBuffer, clip_round};

/// Source sample pair and blend weight for one destination index along an
/// axis.
#[derive(Debug, Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    frac: f32,
}

/// Map each destination index to its source taps.
///
/// Destination centre `i + 0.5` lands on source coordinate
/// `(i + 0.5) * src / dst - 0.5`; both neighbours are clamped into range.
fn axis_taps(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let scale = src_len as f32 / dst_len as f32;
    let last = src_len as usize - 1;
    (0..dst_len)
        .map(|i| {
            let pos = (i as f32 + 0.5) * scale - 0.5;
            let base = pos.floor();
            let frac = pos - base;
            let lo = (base as isize).clamp(0, last as isize) as usize;
            let hi = (base as isize + 1).clamp(0, last as isize) as usize;
            Tap { lo, hi, frac }
        })
        .collect()
}

/// Resize `buffer` to exactly `new_width` x `new_height` by bilinear
/// interpolation. The aspect ratio is not preserved.
#[instrument(skip(buffer), fields(from_w = buffer.width(), from_h = buffer.height()))]
pub fn resize(buffer: PixelBuffer, new_width: u32, new_height: u32) -> Result<PixelBuffer> {
    if new_width == 0 {
        return Err(RetouchError::invalid("width", "must be greater than 0"));
    }
    if new_height == 0 {
        return Err(RetouchError::invalid("height", "must be greater than 0"));
    }
    if buffer.dimensions() == (new_width, new_height) {
        debug!("target matches source, returning input unchanged");
        return Ok(buffer);
    }

    let ch = buffer.channel_count();
    let src = buffer.samples();
    let src_stride = buffer.width() as usize * ch;

    // Row taps follow the first (height) axis, column taps the second.
    let row_taps = axis_taps(buffer.height(), new_height);
    let col_taps = axis_taps(buffer.width(), new_width);

    let mut out = vec![0u8; new_width as usize * new_height as usize * ch];
    let dst_stride = new_width as usize * ch;

    for (dst_row, rt) in out.chunks_exact_mut(dst_stride).zip(&row_taps) {
        let top = &src[rt.lo * src_stride..(rt.lo + 1) * src_stride];
        let bottom = &src[rt.hi * src_stride..(rt.hi + 1) * src_stride];
        let fy = rt.frac;

        for (dst_px, ct) in dst_row.chunks_exact_mut(ch).zip(&col_taps) {
            let fx = ct.frac;
            let w00 = (1.0 - fy) * (1.0 - fx);
            let w01 = (1.0 - fy) * fx;
            let w10 = fy * (1.0 - fx);
            let w11 = fy * fx;
            let (l, r) = (ct.lo * ch, ct.hi * ch);
            for c in 0..ch {
                let value = w00 * f32::from(top[l + c])
                    + w01 * f32::from(top[r + c])
                    + w10 * f32::from(bottom[l + c])
                    + w11 * f32::from(bottom[r + c]);
                dst_px[c] = clip_round(value);
            }
        }
    }

    debug!(new_width, new_height, "Resize complete");
    PixelBuffer::new(new_width, new_height, buffer.channels(), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Channels;

    fn ramp(width: u32, height: u32, channels: Channels) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, channels, |x, y, c| {
            (x * 20 + y * 9 + c as u32 * 40) as u8
        })
    }

    #[test]
    fn same_size_is_identity() {
        let buffer = ramp(9, 6, Channels::Rgb);
        assert_eq!(resize(buffer.clone(), 9, 6).unwrap(), buffer);
    }

    #[test]
    fn output_has_exact_sample_count() {
        let buffer = ramp(10, 7, Channels::Rgb);
        for (w, h) in [(1, 1), (3, 17), (20, 14), (5, 7), (31, 2)] {
            let out = resize(buffer.clone(), w, h).unwrap();
            assert_eq!(out.dimensions(), (w, h));
            assert_eq!(out.samples().len(), (w * h * 3) as usize);
        }
    }

    #[test]
    fn upscale_interpolates_between_centres() {
        // 2x1 -> 4x1: source centres sit at x = 0.5 and 1.5 in output
        // coordinates, so the outer pixels clamp and the inner ones blend.
        let buffer = PixelBuffer::new(2, 1, Channels::Luma, vec![0, 100]).unwrap();
        let out = resize(buffer, 4, 1).unwrap();
        assert_eq!(out.samples(), &[0, 25, 75, 100]);
    }

    #[test]
    fn downscale_by_two_averages_blocks() {
        let buffer = PixelBuffer::new(4, 2, Channels::Luma, vec![0, 10, 20, 30, 40, 50, 60, 70])
            .unwrap();
        let out = resize(buffer, 2, 1).unwrap();
        // Each output centre falls in the middle of a 2x2 block.
        assert_eq!(out.samples(), &[25, 45]);
    }

    #[test]
    fn flat_image_stays_flat() {
        let buffer = PixelBuffer::filled(5, 5, Channels::Rgb, 77);
        let out = resize(buffer, 13, 3).unwrap();
        assert!(out.samples().iter().all(|&s| s == 77));
    }

    #[test]
    fn single_pixel_source_is_clamped() {
        let buffer = PixelBuffer::new(1, 1, Channels::Rgb, vec![10, 20, 30]).unwrap();
        let out = resize(buffer, 3, 2).unwrap();
        for px in out.samples().chunks_exact(3) {
            assert_eq!(px, &[10, 20, 30]);
        }
    }

    #[test]
    fn zero_target_is_invalid() {
        let buffer = ramp(4, 4, Channels::Luma);
        assert!(matches!(
            resize(buffer.clone(), 0, 4),
            Err(RetouchError::InvalidParameter { .. })
        ));
        assert!(matches!(
            resize(buffer, 4, 0),
            Err(RetouchError::InvalidParameter { .. })
        ));
    }
}
