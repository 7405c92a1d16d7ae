// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// retouch-engine — Pixel-processing core for the Retouch image editor.
//
// Every operation is a pure function: it takes its own copy of a buffer plus
// parameters and returns a freshly allocated result. Nothing here knows about
// handles, sessions, or requests.

pub mod buffer;
pub mod codec;
pub mod edges;
pub mod remap;
pub mod resample;
pub mod tonal;

pub use buffer::{Channels, PixelBuffer};
pub use codec::{decode, encode};
pub use edges::{GradientField, sobel_magnitude};
pub use remap::{apply_geometry, apply_geometry_codes, remap};
pub use resample::resize;
pub use tonal::apply_adjustments;
