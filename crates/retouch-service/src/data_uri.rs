// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data-URI boundary adapter: `data:image/<fmt>;base64,<payload>` text in and
// out. Nothing here touches pixels.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use retouch_core::error::{Result, RetouchError};
use retouch_core::types::OutputFormat;

/// Decode base64 image text, with or without a `data:...;base64,` prefix.
///
/// Everything after the first comma is the payload; ASCII whitespace inside
/// the payload (line wrapping) is ignored.
pub fn decode_payload(text: &str) -> Result<Vec<u8>> {
    let payload = match text.split_once(',') {
        Some((_, payload)) => payload,
        None => text,
    };
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return Err(RetouchError::InvalidEncoding("empty base64 payload".into()));
    }
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| RetouchError::InvalidEncoding(format!("invalid base64 data: {err}")))
}

/// Wrap encoded image bytes as a data URI for `format`.
pub fn to_data_uri(bytes: &[u8], format: OutputFormat) -> String {
    format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes))
}
