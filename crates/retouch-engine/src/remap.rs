// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lossless orientation changes: quarter-turn rotations and mirror flips.

use retouch_core::error::Result;
use retouch_core::types::GeometryOp;
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;

/// Apply one orientation change, producing a fresh buffer with the same
/// channel layout.
pub fn remap(buffer: &PixelBuffer, op: GeometryOp) -> Result<PixelBuffer> {
    let image = buffer.to_dynamic()?;
    let remapped = match op {
        GeometryOp::RotateCw90 => image.rotate90(),
        GeometryOp::RotateCcw90 => image.rotate270(),
        GeometryOp::FlipVertical => image.flipv(),
        GeometryOp::FlipHorizontal => image.fliph(),
    };
    PixelBuffer::from_dynamic(remapped)
}

/// Apply `ops` left to right.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn apply_geometry(buffer: PixelBuffer, ops: &[GeometryOp]) -> Result<PixelBuffer> {
    ops.iter().try_fold(buffer, |current, &op| {
        debug!(op = op.code(), "Remapping");
        remap(&current, op)
    })
}

/// Parse request codes and apply them. Every code is checked before any pixel
/// is moved; the first unknown one aborts with `UnsupportedOperation`.
pub fn apply_geometry_codes<S: AsRef<str>>(buffer: PixelBuffer, codes: &[S]) -> Result<PixelBuffer> {
    let ops = GeometryOp::parse_all(codes)?;
    apply_geometry(buffer, &ops)
}
