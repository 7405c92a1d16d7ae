// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Sobel edge detection on single-channel images.
//
// The source is padded by one pixel of edge replication, convolved with the
// 3x3 Sobel pair, and the gradient magnitude is normalised so the strongest
// edge maps to 255. A field with no gradient at all maps to an all-zero image.

use retouch_core::error::Result;
use tracing::{debug, instrument};

use crate::buffer::{Channels, PixelBuffer};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Horizontal and vertical Sobel responses over a single-channel image.
#[derive(Debug, Clone)]
pub struct GradientField {
    width: u32,
    height: u32,
    /// Response to `SOBEL_X`, row-major.
    gx: Vec<f32>,
    /// Response to `SOBEL_Y`, row-major.
    gy: Vec<f32>,
}

impl GradientField {
    /// Convolve `buffer` with both Sobel kernels.
    pub fn compute(buffer: &PixelBuffer) -> Result<Self> {
        buffer.require_channels("edge detection", Channels::Luma)?;

        let (w, h) = (buffer.width() as usize, buffer.height() as usize);
        let padded = pad_replicate(buffer);
        let pw = w + 2;

        let mut gx = vec![0.0f32; w * h];
        let mut gy = vec![0.0f32; w * h];

        for y in 0..h {
            let rows = [
                &padded[y * pw..(y + 1) * pw],
                &padded[(y + 1) * pw..(y + 2) * pw],
                &padded[(y + 2) * pw..(y + 3) * pw],
            ];
            let out_gx = &mut gx[y * w..(y + 1) * w];
            let out_gy = &mut gy[y * w..(y + 1) * w];
            for x in 0..w {
                let mut sum_x = 0.0;
                let mut sum_y = 0.0;
                for (ky, row) in rows.iter().enumerate() {
                    let kx_row = &SOBEL_X[ky];
                    let ky_row = &SOBEL_Y[ky];
                    sum_x += row[x] * kx_row[0] + row[x + 1] * kx_row[1] + row[x + 2] * kx_row[2];
                    sum_y += row[x] * ky_row[0] + row[x + 1] * ky_row[1] + row[x + 2] * ky_row[2];
                }
                out_gx[x] = sum_x;
                out_gy[x] = sum_y;
            }
        }

        Ok(Self {
            width: buffer.width(),
            height: buffer.height(),
            gx,
            gy,
        })
    }

    pub fn gx(&self) -> &[f32] {
        &self.gx
    }

    pub fn gy(&self) -> &[f32] {
        &self.gy
    }

    /// Per-pixel `sqrt(gx^2 + gy^2)`.
    pub fn magnitude(&self) -> Vec<f32> {
        self.gx
            .iter()
            .zip(&self.gy)
            .map(|(x, y)| (x * x + y * y).sqrt())
            .collect()
    }

    /// Magnitudes scaled so the maximum becomes 255.
    pub fn to_normalized(&self) -> PixelBuffer {
        let mut mag = self.magnitude();
        let max = mag.iter().copied().fold(0.0f32, f32::max);

        if max > 0.0 && max.is_finite() {
            let scale = 255.0 / max;
            for m in mag.iter_mut() {
                *m *= scale;
            }
        } else {
            debug!("flat gradient field, output is all zero");
            mag.fill(0.0);
        }

        PixelBuffer::from_f32(self.width, self.height, Channels::Luma, &mag)
    }
}

/// Copy `buffer` into a float grid one pixel larger on every side, repeating
/// the nearest edge sample into the border.
fn pad_replicate(buffer: &PixelBuffer) -> Vec<f32> {
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let pw = w + 2;
    let src = buffer.samples();
    let mut padded = vec![0.0f32; pw * (h + 2)];

    for py in 0..h + 2 {
        let sy = py.saturating_sub(1).min(h - 1);
        let src_row = &src[sy * w..(sy + 1) * w];
        let dst_row = &mut padded[py * pw..(py + 1) * pw];
        dst_row[0] = f32::from(src_row[0]);
        for (d, &s) in dst_row[1..=w].iter_mut().zip(src_row) {
            *d = f32::from(s);
        }
        dst_row[w + 1] = f32::from(src_row[w - 1]);
    }
    padded
}

/// Normalised Sobel gradient magnitude of a single-channel image.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn sobel_magnitude(buffer: &PixelBuffer) -> Result<PixelBuffer> {
    let field = GradientField::compute(buffer)?;
    let out = field.to_normalized();
    debug!("Edge map computed");
    Ok(out)
}
