// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tonal adjustment: brightness, contrast, gamma, and HSV saturation.
//
// The steps always run in that order on a float copy of the samples, each
// one clipping back to [0, 255] before the next. Reordering them changes the
// output.

use retouch_core::error::Result;
use retouch_core::types::AdjustmentParameters;
use tracing::{debug, instrument};

use crate::buffer::{Channels, PixelBuffer};

/// Apply `params` to `buffer` and return the adjusted image.
///
/// Steps whose parameter equals its identity value are skipped. Saturation
/// needs RGB input; any other parameter works on luminance too.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn apply_adjustments(buffer: PixelBuffer, params: &AdjustmentParameters) -> Result<PixelBuffer> {
    params.validate()?;
    if params.saturation != 1.0 {
        buffer.require_channels("saturation adjustment", Channels::Rgb)?;
    }
    if params.is_identity() {
        debug!("identity parameters, returning input unchanged");
        return Ok(buffer);
    }

    let mut values = buffer.to_f32();

    if params.brightness != 0.0 {
        debug!(brightness = params.brightness, "Applying brightness");
        for v in values.iter_mut() {
            *v = (*v + params.brightness).clamp(0.0, 255.0);
        }
    }

    if params.contrast != 1.0 {
        debug!(contrast = params.contrast, "Applying contrast");
        for v in values.iter_mut() {
            *v = ((*v - 128.0) * params.contrast + 128.0).clamp(0.0, 255.0);
        }
    }

    if params.gamma != 1.0 {
        debug!(gamma = params.gamma, "Applying gamma");
        let exponent = 1.0 / params.gamma;
        for v in values.iter_mut() {
            *v = (255.0 * (*v / 255.0).powf(exponent)).clamp(0.0, 255.0);
        }
    }

    if params.saturation != 1.0 {
        debug!(saturation = params.saturation, "Applying saturation");
        for px in values.chunks_exact_mut(3) {
            let (h, s, v) = rgb_to_hsv(px[0] / 255.0, px[1] / 255.0, px[2] / 255.0);
            let s = (s * params.saturation).clamp(0.0, 1.0);
            let (r, g, b) = hsv_to_rgb(h, s, v);
            px[0] = r * 255.0;
            px[1] = g * 255.0;
            px[2] = b * 255.0;
        }
    }

    Ok(PixelBuffer::from_f32(
        buffer.width(),
        buffer.height(),
        buffer.channels(),
        &values,
    ))
}

/// RGB in `[0, 1]` to HSV with every component in `[0, 1]`.
fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    (h / 6.0, s, v)
}

/// HSV in `[0, 1]` back to RGB in `[0, 1]`.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let scaled = h.rem_euclid(1.0) * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retouch_core::error::RetouchError;

    fn single(r: u8, g: u8, b: u8) -> PixelBuffer {
        PixelBuffer::new(1, 1, Channels::Rgb, vec![r, g, b]).unwrap()
    }

    fn adjust(buffer: PixelBuffer, params: AdjustmentParameters) -> Vec<u8> {
        apply_adjustments(buffer, &params).unwrap().into_samples()
    }

    #[test]
    fn default_parameters_are_identity() {
        let buffer =
            PixelBuffer::from_fn(7, 5, Channels::Rgb, |x, y, c| (x * 31 + y * 17 + c as u32 * 5) as u8);
        let out = apply_adjustments(buffer.clone(), &AdjustmentParameters::default()).unwrap();
        assert_eq!(out, buffer);
    }

    #[test]
    fn brightness_clips_at_white() {
        let params = AdjustmentParameters {
            brightness: 50.0,
            ..Default::default()
        };
        assert_eq!(adjust(single(220, 10, 128), params), vec![255, 60, 178]);
    }

    #[test]
    fn contrast_pivots_on_128() {
        let params = AdjustmentParameters {
            contrast: 2.0,
            ..Default::default()
        };
        assert_eq!(adjust(single(100, 128, 200), params), vec![72, 128, 255]);
    }

    #[test]
    fn gamma_brightens_midtones() {
        let params = AdjustmentParameters {
            gamma: 2.0,
            ..Default::default()
        };
        // 255 * sqrt(64 / 255) = 127.75
        assert_eq!(adjust(single(64, 0, 255), params), vec![128, 0, 255]);
    }

    #[test]
    fn brightness_runs_before_contrast() {
        let params = AdjustmentParameters {
            brightness: 100.0,
            contrast: 0.5,
            ..Default::default()
        };
        // 200 + 100 clips to 255, then (255 - 128) * 0.5 + 128 = 191.5.
        // The other order would give 255.
        assert_eq!(adjust(single(200, 200, 200), params), vec![192, 192, 192]);
    }

    #[test]
    fn zero_saturation_yields_grey_at_value() {
        let params = AdjustmentParameters {
            saturation: 0.0,
            ..Default::default()
        };
        assert_eq!(adjust(single(200, 100, 50), params), vec![200, 200, 200]);
    }

    #[test]
    fn saturation_boost_keeps_hue_and_value() {
        let params = AdjustmentParameters {
            saturation: 2.0,
            ..Default::default()
        };
        let out = adjust(single(200, 100, 50), params);
        assert_eq!(out[0], 200);
        assert_eq!(out[2], 0);
        assert!((i32::from(out[1]) - 67).abs() <= 1, "green was {}", out[1]);
    }

    #[test]
    fn saturation_on_neutral_image_is_stable() {
        let gray =
            PixelBuffer::from_fn(4, 4, Channels::Rgb, |x, y, _| (x * 60 + y * 3) as u8);
        let params = AdjustmentParameters {
            saturation: 1.7,
            ..Default::default()
        };
        let out = apply_adjustments(gray.clone(), &params).unwrap();
        for (a, b) in out.samples().iter().zip(gray.samples()) {
            assert!(a.abs_diff(*b) <= 1);
        }
    }

    #[test]
    fn saturation_requires_rgb() {
        let luma = PixelBuffer::filled(3, 3, Channels::Luma, 90);
        let params = AdjustmentParameters {
            saturation: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            apply_adjustments(luma, &params),
            Err(RetouchError::UnsupportedChannelCount { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn tonal_steps_work_on_luma() {
        let luma = PixelBuffer::filled(2, 2, Channels::Luma, 100);
        let params = AdjustmentParameters {
            brightness: 20.0,
            ..Default::default()
        };
        let out = apply_adjustments(luma, &params).unwrap();
        assert!(out.samples().iter().all(|&s| s == 120));
    }

    #[test]
    fn non_positive_gamma_is_rejected() {
        for gamma in [0.0, -1.0] {
            let params = AdjustmentParameters {
                gamma,
                ..Default::default()
            };
            assert!(matches!(
                apply_adjustments(single(1, 2, 3), &params),
                Err(RetouchError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn hsv_round_trip() {
        for &(r, g, b) in &[(1.0, 0.0, 0.0), (0.2, 0.7, 0.4), (0.5, 0.5, 0.9), (0.9, 0.1, 0.6)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert!((r - r2).abs() < 1e-5 && (g - g2).abs() < 1e-5 && (b - b2).abs() < 1e-5);
        }
    }
}
