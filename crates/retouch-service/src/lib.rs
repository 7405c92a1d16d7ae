// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// retouch-service — Request-handling layer over the pixel engine.
//
// Coerces loosely-typed request fields, resolves image handles against the
// session store, routes a copy of the original through exactly one engine
// operation, and wraps the encoded result as a data URI.

pub mod data_uri;
pub mod request;
pub mod service;

pub use request::{RequestFields, Transform, TransformRequest, UploadRequest};
pub use service::{ImageService, Reply, TransformResponse, UploadResponse};
