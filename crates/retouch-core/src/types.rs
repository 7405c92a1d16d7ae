// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Retouch image engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, RetouchError};

/// Opaque identifier for an uploaded original image.
///
/// Minted fresh on every successful upload; never derived from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(pub Uuid);

impl ImageHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse handle text supplied by a caller.
    ///
    /// Text that is not a valid handle cannot name a stored image, so it is
    /// reported the same way as an expired one.
    pub fn parse(text: &str) -> Result<Self> {
        Uuid::parse_str(text.trim())
            .map(Self)
            .map_err(|_| RetouchError::HandleNotFound)
    }
}

impl Default for ImageHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tonal corrections applied in the fixed order brightness, contrast, gamma,
/// saturation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParameters {
    /// Additive offset on the 0..=255 scale.
    pub brightness: f32,
    /// Multiplier around the midpoint 128.
    pub contrast: f32,
    /// Exponent denominator; must be strictly positive.
    pub gamma: f32,
    /// Multiplier on the HSV saturation channel.
    pub saturation: f32,
}

impl AdjustmentParameters {
    pub const IDENTITY: Self = Self {
        brightness: 0.0,
        contrast: 1.0,
        gamma: 1.0,
        saturation: 1.0,
    };

    /// True when every step would be skipped.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Reject non-finite values and non-positive gamma.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("gamma", self.gamma),
            ("saturation", self.saturation),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(RetouchError::invalid(name, "must be a finite number"));
            }
        }
        if self.gamma <= 0.0 {
            return Err(RetouchError::invalid(
                "gamma",
                format!("must be greater than 0, got {}", self.gamma),
            ));
        }
        Ok(())
    }
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Lossless orientation change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryOp {
    RotateCw90,
    RotateCcw90,
    FlipVertical,
    FlipHorizontal,
}

impl GeometryOp {
    /// Parse a request operation code (`r`, `-r`, `vf`, `hf`).
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim() {
            "r" => Ok(Self::RotateCw90),
            "-r" => Ok(Self::RotateCcw90),
            "vf" => Ok(Self::FlipVertical),
            "hf" => Ok(Self::FlipHorizontal),
            other => Err(RetouchError::UnsupportedOperation(other.to_owned())),
        }
    }

    /// Parse an ordered list of codes, stopping at the first unknown one.
    pub fn parse_all<S: AsRef<str>>(codes: &[S]) -> Result<Vec<Self>> {
        codes.iter().map(|c| Self::from_code(c.as_ref())).collect()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::RotateCw90 => "r",
            Self::RotateCcw90 => "-r",
            Self::FlipVertical => "vf",
            Self::FlipHorizontal => "hf",
        }
    }

    /// Whether the op exchanges width and height.
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Self::RotateCw90 | Self::RotateCcw90)
    }
}

/// Raster container used for transform output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg { quality: u8 },
}

impl OutputFormat {
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    /// Parse a format name (`png`, `jpg`, `jpeg`).
    pub fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg {
                quality: Self::DEFAULT_JPEG_QUALITY,
            }),
            other => Err(RetouchError::invalid(
                "format",
                format!("unsupported output format {other}"),
            )),
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}
