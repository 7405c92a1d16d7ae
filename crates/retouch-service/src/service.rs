// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: the entry points a transport adapter calls.
//
// Every transform fetches the stored original, clones it, and routes the
// clone through exactly one engine operation. Results are never written
// back, so each request starts from the original upload.

use std::sync::Arc;

use retouch_core::ServiceConfig;
use retouch_core::error::{Result, RetouchError};
use retouch_core::outcome::outcome_for;
use retouch_core::types::ImageHandle;
use retouch_engine::{
    PixelBuffer, apply_adjustments, apply_geometry, codec, resize, sobel_magnitude,
};
use retouch_session::{MemorySessionStore, SessionStore};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::data_uri;
use crate::request::{Transform, TransformRequest, UploadRequest};

/// Returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResponse {
    pub image_id: ImageHandle,
    pub width: u32,
    pub height: u32,
}

/// Returned by every successful transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformResponse {
    /// `data:image/<fmt>;base64,...`
    pub image: String,
    pub width: u32,
    pub height: u32,
}

/// Status code plus JSON body, ready for any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    /// Fold a service result into a reply. Success uses `success_status`;
    /// errors go through the outcome mapping.
    pub fn from_result<T: Serialize>(result: Result<T>, success_status: u16) -> Self {
        let rendered = result.and_then(|value| Ok(serde_json::to_value(value)?));
        match rendered {
            Ok(body) => Self {
                status: success_status,
                body,
            },
            Err(err) => {
                let outcome = outcome_for(&err);
                warn!(error = %err, status = outcome.status.http_code(), "request failed");
                Self {
                    status: outcome.status.http_code(),
                    body: serde_json::json!(outcome.body()),
                }
            }
        }
    }
}

/// Upload and transform entry points over a shared session store.
///
/// Cheap to clone; the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct ImageService {
    store: Arc<dyn SessionStore>,
    config: ServiceConfig,
}

impl ImageService {
    pub fn new(store: Arc<dyn SessionStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    /// Service backed by a fresh in-process store.
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(Arc::new(MemorySessionStore::new()), config)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // -- Upload --------------------------------------------------------------

    /// Accept `{"image_base64": ...}` and store the decoded original.
    #[instrument(skip_all)]
    pub fn upload(&self, body: &Value) -> Result<UploadResponse> {
        let request = UploadRequest::parse(body)?;
        let bytes = data_uri::decode_payload(request.image_base64)?;
        self.upload_bytes(&bytes)
    }

    /// Decode raw image bytes, convert to RGB, and store under a new handle.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn upload_bytes(&self, data: &[u8]) -> Result<UploadResponse> {
        if data.len() > self.config.max_upload_bytes {
            return Err(RetouchError::PayloadTooLarge {
                size: data.len(),
                limit: self.config.max_upload_bytes,
            });
        }

        let original = codec::decode(data)?.to_rgb();
        let (width, height) = original.dimensions();
        let image_id = ImageHandle::new();
        self.store.put(image_id, original, self.config.session_ttl());

        info!(%image_id, width, height, "original stored");
        Ok(UploadResponse {
            image_id,
            width,
            height,
        })
    }

    // -- Transforms ----------------------------------------------------------

    /// `{"image_id", "brightness"?, "contrast"?, "gamma"?, "saturation"?}`
    pub fn adjust(&self, body: &Value) -> Result<TransformResponse> {
        self.respond(TransformRequest::adjust(body)?)
    }

    /// `{"image_id", "scale"}`
    pub fn resize(&self, body: &Value) -> Result<TransformResponse> {
        self.respond(TransformRequest::resize(body)?)
    }

    /// `{"image_id", "operations": ["r" | "-r" | "vf" | "hf", ...]}`
    pub fn geometry(&self, body: &Value) -> Result<TransformResponse> {
        self.respond(TransformRequest::geometry(body)?)
    }

    /// `{"image_id"}`
    pub fn edges(&self, body: &Value) -> Result<TransformResponse> {
        self.respond(TransformRequest::edges(body)?)
    }

    /// `{"image_id"}`. Currently produces the same Sobel edge map as
    /// [`ImageService::edges`].
    pub fn channel_analysis(&self, body: &Value) -> Result<TransformResponse> {
        self.respond(TransformRequest::channel_analysis(body)?)
    }

    /// Run `transform` against a copy of the original stored under `handle`.
    #[instrument(skip(self, transform), fields(transform = transform.name()))]
    pub fn transform(&self, handle: &ImageHandle, transform: &Transform) -> Result<PixelBuffer> {
        let working = self.original(handle)?;

        let result = match transform {
            Transform::Adjust(params) => apply_adjustments(working, params)?,
            Transform::Resize { scale } => {
                let (width, height) = self.scaled_dimensions(&working, *scale)?;
                resize(working, width, height)?
            }
            Transform::Geometry(ops) => apply_geometry(working, ops)?,
            Transform::Edges | Transform::ChannelAnalysis => sobel_magnitude(&working.to_luma())?,
        };

        debug!(
            width = result.width(),
            height = result.height(),
            "transform complete"
        );
        Ok(result)
    }

    /// A private copy of the stored original.
    fn original(&self, handle: &ImageHandle) -> Result<PixelBuffer> {
        self.store
            .get(handle)
            .map(|shared| (*shared).clone())
            .ok_or(RetouchError::HandleNotFound)
    }

    fn scaled_dimensions(&self, buffer: &PixelBuffer, scale: f64) -> Result<(u32, u32)> {
        let width = (f64::from(buffer.width()) * scale).round();
        let height = (f64::from(buffer.height()) * scale).round();
        if width < 1.0 || height < 1.0 {
            return Err(RetouchError::invalid(
                "scale",
                format!("{scale} would produce an empty image"),
            ));
        }
        let limit = self.config.max_output_pixels;
        if width * height > limit as f64 {
            return Err(RetouchError::invalid(
                "scale",
                format!("{scale} would exceed the {limit} pixel limit"),
            ));
        }
        Ok((width as u32, height as u32))
    }

    fn respond(&self, request: TransformRequest) -> Result<TransformResponse> {
        let result = self.transform(&request.image_id, &request.transform)?;
        let format = self.config.output_format;
        let bytes = codec::encode(&result, format)?;
        Ok(TransformResponse {
            image: data_uri::to_data_uri(&bytes, format),
            width: result.width(),
            height: result.height(),
        })
    }
}
