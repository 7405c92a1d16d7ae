// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request outcomes for the transport layer.
//
// Every error is mapped to a status class and a caller-safe message. Internal
// details (encoder failures, I/O) are logged by the caller, not returned.

use serde::Serialize;

use crate::error::RetouchError;

/// Status class of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    /// The caller sent something unusable; resending it will fail again.
    BadRequest,
    /// The handle is unknown or its time-to-live has passed.
    NotFound,
    /// The upload exceeds the configured limit.
    PayloadTooLarge,
    /// Server-side failure.
    Internal,
}

impl Status {
    /// Conventional HTTP status code for this class.
    pub fn http_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::PayloadTooLarge => 413,
            Self::Internal => 500,
        }
    }
}

/// A failed request as the caller sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub message: String,
}

impl Outcome {
    /// JSON body in the `{"error": ...}` shape.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Convert a `RetouchError` into the outcome reported to the caller.
pub fn outcome_for(err: &RetouchError) -> Outcome {
    match err {
        RetouchError::MissingParameter(_)
        | RetouchError::InvalidParameter { .. }
        | RetouchError::UnsupportedOperation(_)
        | RetouchError::UnsupportedChannelCount { .. }
        | RetouchError::InvalidPixelData(_) => Outcome {
            status: Status::BadRequest,
            message: err.to_string(),
        },

        // The decoder's own message can be long and format-specific.
        RetouchError::InvalidEncoding(_) => Outcome {
            status: Status::BadRequest,
            message: "invalid base64 image".into(),
        },

        RetouchError::HandleNotFound => Outcome {
            status: Status::NotFound,
            message: "image expired or not found".into(),
        },

        RetouchError::PayloadTooLarge { .. } => Outcome {
            status: Status::PayloadTooLarge,
            message: err.to_string(),
        },

        RetouchError::EncodeFailed(_) | RetouchError::Io(_) | RetouchError::Serialization(_) => {
            Outcome {
                status: Status::Internal,
                message: "image processing failed".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_handle_is_not_found() {
        let outcome = outcome_for(&RetouchError::HandleNotFound);
        assert_eq!(outcome.status, Status::NotFound);
        assert_eq!(outcome.status.http_code(), 404);
        assert_eq!(outcome.body().error, "image expired or not found");
    }

    #[test]
    fn gamma_error_names_the_field() {
        let outcome = outcome_for(&RetouchError::invalid("gamma", "must be greater than 0"));
        assert_eq!(outcome.status, Status::BadRequest);
        assert!(outcome.message.contains("gamma"));
    }

    #[test]
    fn unknown_geometry_code_is_reported() {
        let outcome = outcome_for(&RetouchError::UnsupportedOperation("zz".into()));
        assert_eq!(outcome.status.http_code(), 400);
        assert!(outcome.message.contains("zz"));
    }

    #[test]
    fn encoder_details_are_not_leaked() {
        let outcome = outcome_for(&RetouchError::EncodeFailed("png: deflate stream broke".into()));
        assert_eq!(outcome.status, Status::Internal);
        assert!(!outcome.message.contains("deflate"));
    }

    #[test]
    fn body_serializes_with_error_key() {
        let outcome = outcome_for(&RetouchError::MissingParameter("image_id".into()));
        let json = serde_json::to_string(&outcome.body()).unwrap();
        assert_eq!(json, r#"{"error":"image_id is required"}"#);
    }
}
