// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec adapter: raster bytes to `PixelBuffer` and back, via the `image`
// crate. Decoding runs twice: a full validation pass whose result is
// discarded, then the real decode.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};
use retouch_core::error::{Result, RetouchError};
use retouch_core::types::OutputFormat;
use tracing::{debug, instrument, warn};

use crate::buffer::{Channels, PixelBuffer};

/// Decode PNG/JPEG bytes into a pixel buffer.
///
/// Fails with `InvalidEncoding` when the bytes are not a complete, supported
/// raster stream, and with `InvalidPixelData` when decoding yields an empty
/// image.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    if data.is_empty() {
        return Err(RetouchError::InvalidEncoding("empty input".into()));
    }

    // Validation pass: the whole stream must decode, not just the header.
    read_image(data)?;

    let image = read_image(data)?;
    if image.width() == 0 || image.height() == 0 {
        warn!("decoded image has zero dimensions");
        return Err(RetouchError::InvalidPixelData(format!(
            "zero-sized image ({}x{})",
            image.width(),
            image.height()
        )));
    }

    let buffer = PixelBuffer::from_dynamic(image)?;
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        channels = buffer.channel_count(),
        "Image decoded"
    );
    Ok(buffer)
}

fn read_image(data: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| RetouchError::InvalidEncoding(err.to_string()))?;
    if reader.format().is_none() {
        return Err(RetouchError::InvalidEncoding(
            "unrecognised image format".into(),
        ));
    }
    reader
        .decode()
        .map_err(|err| RetouchError::InvalidEncoding(err.to_string()))
}

/// Encode a pixel buffer. The same buffer and format always produce the same
/// bytes: no timestamps or other ancillary metadata are written.
#[instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>> {
    let color = match buffer.channels() {
        Channels::Luma => ExtendedColorType::L8,
        Channels::Rgb => ExtendedColorType::Rgb8,
    };

    let mut out = Vec::new();
    let written = match format {
        OutputFormat::Png => PngEncoder::new(&mut out).write_image(
            buffer.samples(),
            buffer.width(),
            buffer.height(),
            color,
        ),
        OutputFormat::Jpeg { quality } => JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
            .write_image(buffer.samples(), buffer.width(), buffer.height(), color),
    };
    written.map_err(|err| RetouchError::EncodeFailed(err.to_string()))?;

    debug!(bytes = out.len(), format = format.extension(), "Image encoded");
    Ok(out)
}
