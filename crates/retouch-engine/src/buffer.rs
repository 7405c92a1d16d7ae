// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer: 8-bit luminance or RGB samples in row-major order, plus the
// helpers every operation shares: float widening, clip-and-round narrowing,
// colour conversions, and the bridge to `image::DynamicImage`.

use image::{DynamicImage, GrayImage, RgbImage};
use retouch_core::error::{Result, RetouchError};

/// Number of interleaved samples per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    Luma,
    Rgb,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Self::Luma => 1,
            Self::Rgb => 3,
        }
    }

    pub fn from_count(count: usize) -> Result<Self> {
        match count {
            1 => Ok(Self::Luma),
            3 => Ok(Self::Rgb),
            other => Err(RetouchError::InvalidPixelData(format!(
                "unsupported channel count {other}"
            ))),
        }
    }
}

/// A rectangular grid of 8-bit samples.
///
/// Invariant: `samples.len() == width * height * channels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    samples: Vec<u8>,
}

impl PixelBuffer {
    // -- Construction ---------------------------------------------------------

    /// Wrap raw samples, checking the shape.
    pub fn new(width: u32, height: u32, channels: Channels, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RetouchError::InvalidPixelData(format!(
                "zero-sized image ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * channels.count();
        if samples.len() != expected {
            return Err(RetouchError::InvalidPixelData(format!(
                "expected {expected} samples for {width}x{height}x{}, got {}",
                channels.count(),
                samples.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// A buffer with every sample set to `value`.
    pub fn filled(width: u32, height: u32, channels: Channels, value: u8) -> Self {
        let len = width as usize * height as usize * channels.count();
        Self {
            width,
            height,
            channels,
            samples: vec![value; len],
        }
    }

    /// Build a buffer by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn(
        width: u32,
        height: u32,
        channels: Channels,
        mut f: impl FnMut(u32, u32, usize) -> u8,
    ) -> Self {
        let ch = channels.count();
        let mut samples = Vec::with_capacity(width as usize * height as usize * ch);
        for y in 0..height {
            for x in 0..width {
                for c in 0..ch {
                    samples.push(f(x, y, c));
                }
            }
        }
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Assemble a buffer whose shape the caller has already established.
    pub(crate) fn from_parts(width: u32, height: u32, channels: Channels, samples: Vec<u8>) -> Self {
        debug_assert_eq!(
            samples.len(),
            width as usize * height as usize * channels.count()
        );
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Narrow a float working buffer back to 8 bits, clipping to `[0, 255]`
    /// and rounding to the nearest integer.
    pub(crate) fn from_f32(width: u32, height: u32, channels: Channels, values: &[f32]) -> Self {
        Self {
            width,
            height,
            channels,
            samples: values.iter().map(|&v| clip_round(v)).collect(),
        }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.count()
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Samples of row `y`, all channels interleaved.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.channels.count();
        let start = y as usize * stride;
        &self.samples[start..start + stride]
    }

    pub fn sample(&self, x: u32, y: u32, channel: usize) -> u8 {
        let ch = self.channels.count();
        self.samples[(y as usize * self.width as usize + x as usize) * ch + channel]
    }

    /// Fail with `UnsupportedChannelCount` unless the buffer has `expected`
    /// channels.
    pub fn require_channels(&self, operation: &'static str, expected: Channels) -> Result<()> {
        if self.channels == expected {
            Ok(())
        } else {
            Err(RetouchError::UnsupportedChannelCount {
                operation,
                expected: expected.count() as u8,
                actual: self.channels.count() as u8,
            })
        }
    }

    /// Widen every sample to `f32` for computation.
    pub(crate) fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| f32::from(s)).collect()
    }

    // -- Colour conversions ---------------------------------------------------

    /// Single-channel luminance using the ITU-R 601-2 weights
    /// `0.299 R + 0.587 G + 0.114 B`, in 16-bit fixed point.
    pub fn to_luma(&self) -> PixelBuffer {
        match self.channels {
            Channels::Luma => self.clone(),
            Channels::Rgb => {
                let samples = self
                    .samples
                    .chunks_exact(3)
                    .map(|px| {
                        let weighted = u32::from(px[0]) * 19595
                            + u32::from(px[1]) * 38470
                            + u32::from(px[2]) * 7471
                            + 0x8000;
                        (weighted >> 16) as u8
                    })
                    .collect();
                PixelBuffer {
                    width: self.width,
                    height: self.height,
                    channels: Channels::Luma,
                    samples,
                }
            }
        }
    }

    /// Three-channel copy; luminance is replicated into R, G, and B.
    pub fn to_rgb(&self) -> PixelBuffer {
        match self.channels {
            Channels::Rgb => self.clone(),
            Channels::Luma => PixelBuffer {
                width: self.width,
                height: self.height,
                channels: Channels::Rgb,
                samples: self.samples.iter().flat_map(|&l| [l, l, l]).collect(),
            },
        }
    }

    // -- `image` interop ------------------------------------------------------

    /// Convert a decoded image. Grey sources stay single-channel; everything
    /// else becomes RGB with any alpha dropped.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(gray) => Self::new(width, height, Channels::Luma, gray.into_raw()),
            DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLumaA16(_) => {
                Self::new(width, height, Channels::Luma, image.to_luma8().into_raw())
            }
            DynamicImage::ImageRgb8(rgb) => Self::new(width, height, Channels::Rgb, rgb.into_raw()),
            other => Self::new(width, height, Channels::Rgb, other.to_rgb8().into_raw()),
        }
    }

    /// Copy into a `DynamicImage` for encoding.
    pub fn to_dynamic(&self) -> Result<DynamicImage> {
        let shape_error =
            || RetouchError::InvalidPixelData("sample count does not match dimensions".into());
        match self.channels {
            Channels::Luma => GrayImage::from_raw(self.width, self.height, self.samples.clone())
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(shape_error),
            Channels::Rgb => RgbImage::from_raw(self.width, self.height, self.samples.clone())
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(shape_error),
        }
    }
}

/// Clip to `[0, 255]` and round half away from zero.
#[inline]
pub(crate) fn clip_round(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0).round() as u8
}
