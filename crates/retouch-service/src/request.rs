// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Request parsing: turns loosely-typed JSON request bodies into typed
// transform requests. Numbers may arrive as JSON numbers or numeric strings;
// absent optional fields take their identity values.

use retouch_core::error::{Result, RetouchError};
use retouch_core::types::{AdjustmentParameters, GeometryOp, ImageHandle};
use serde_json::{Map, Value};

/// Read-only view over the fields of a JSON object body.
#[derive(Debug, Clone, Copy)]
pub struct RequestFields<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RequestFields<'a> {
    pub fn from_value(body: &'a Value) -> Result<Self> {
        body.as_object()
            .map(|fields| Self { fields })
            .ok_or_else(|| RetouchError::invalid("body", "expected a JSON object"))
    }

    /// A field counts as absent when missing or `null`.
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// A non-empty string field.
    pub fn required_str(&self, name: &str) -> Result<&'a str> {
        match self.get(name) {
            None => Err(RetouchError::MissingParameter(name.to_owned())),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(RetouchError::MissingParameter(name.to_owned()))
            }
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(RetouchError::invalid(name, "expected a string")),
        }
    }

    /// A required finite number.
    pub fn required_f64(&self, name: &str) -> Result<f64> {
        let value = self
            .get(name)
            .ok_or_else(|| RetouchError::MissingParameter(name.to_owned()))?;
        coerce_number(name, value)
    }

    /// An optional finite number, `default` when absent.
    pub fn optional_f32(&self, name: &str, default: f32) -> Result<f32> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => {
                let number = coerce_number(name, value)? as f32;
                if number.is_finite() {
                    Ok(number)
                } else {
                    Err(RetouchError::invalid(name, "out of range"))
                }
            }
        }
    }

    /// A required non-empty list of strings.
    pub fn required_str_list(&self, name: &str) -> Result<Vec<&'a str>> {
        let items = match self.get(name) {
            None => return Err(RetouchError::MissingParameter(name.to_owned())),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(RetouchError::invalid(name, "expected a list")),
        };
        if items.is_empty() {
            return Err(RetouchError::MissingParameter(name.to_owned()));
        }
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| RetouchError::invalid(name, "every entry must be a string"))
            })
            .collect()
    }

    /// The `image_id` field as a handle.
    pub fn handle(&self) -> Result<ImageHandle> {
        ImageHandle::parse(self.required_str("image_id")?)
    }
}

fn coerce_number(name: &str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| RetouchError::invalid(name, "expected a number"))?;

    if number.is_finite() {
        Ok(number)
    } else {
        Err(RetouchError::invalid(name, "must be a finite number"))
    }
}

/// Upload body: `{"image_base64": "..."}`.
#[derive(Debug, Clone, Copy)]
pub struct UploadRequest<'a> {
    pub image_base64: &'a str,
}

impl<'a> UploadRequest<'a> {
    pub fn parse(body: &'a Value) -> Result<Self> {
        let fields = RequestFields::from_value(body)?;
        Ok(Self {
            image_base64: fields.required_str("image_base64")?,
        })
    }
}

/// The single engine operation a request asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    Adjust(AdjustmentParameters),
    /// Uniform scale factor, strictly positive.
    Resize {
        scale: f64,
    },
    Geometry(Vec<GeometryOp>),
    Edges,
    /// Shares the edge computation until a distinct analysis is defined.
    ChannelAnalysis,
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Adjust(_) => "adjust",
            Self::Resize { .. } => "resize",
            Self::Geometry(_) => "geometry",
            Self::Edges => "edges",
            Self::ChannelAnalysis => "channel_analysis",
        }
    }
}

/// A parsed transform request against an uploaded original.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformRequest {
    pub image_id: ImageHandle,
    pub transform: Transform,
}

impl TransformRequest {
    /// `image_id` plus optional `brightness`, `contrast`, `gamma`,
    /// `saturation`.
    pub fn adjust(body: &Value) -> Result<Self> {
        let fields = RequestFields::from_value(body)?;
        let image_id = fields.handle()?;
        let identity = AdjustmentParameters::IDENTITY;
        let params = AdjustmentParameters {
            brightness: fields.optional_f32("brightness", identity.brightness)?,
            contrast: fields.optional_f32("contrast", identity.contrast)?,
            gamma: fields.optional_f32("gamma", identity.gamma)?,
            saturation: fields.optional_f32("saturation", identity.saturation)?,
        };
        params.validate()?;
        Ok(Self {
            image_id,
            transform: Transform::Adjust(params),
        })
    }

    /// `image_id` plus a required positive `scale`.
    pub fn resize(body: &Value) -> Result<Self> {
        let fields = RequestFields::from_value(body)?;
        let image_id = fields.handle()?;
        let scale = fields.required_f64("scale")?;
        if scale <= 0.0 {
            return Err(RetouchError::invalid(
                "scale",
                format!("must be greater than 0, got {scale}"),
            ));
        }
        Ok(Self {
            image_id,
            transform: Transform::Resize { scale },
        })
    }

    /// `image_id` plus a non-empty `operations` list of `r`, `-r`, `vf`, `hf`.
    pub fn geometry(body: &Value) -> Result<Self> {
        let fields = RequestFields::from_value(body)?;
        let image_id = fields.handle()?;
        let codes = fields.required_str_list("operations")?;
        let ops = GeometryOp::parse_all(&codes)?;
        Ok(Self {
            image_id,
            transform: Transform::Geometry(ops),
        })
    }

    pub fn edges(body: &Value) -> Result<Self> {
        let fields = RequestFields::from_value(body)?;
        Ok(Self {
            image_id: fields.handle()?,
            transform: Transform::Edges,
        })
    }

    pub fn channel_analysis(body: &Value) -> Result<Self> {
        let fields = RequestFields::from_value(body)?;
        Ok(Self {
            image_id: fields.handle()?,
            transform: Transform::ChannelAnalysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id() -> String {
        ImageHandle::new().to_string()
    }

    #[test]
    fn adjust_defaults_to_identity() {
        let req = TransformRequest::adjust(&json!({ "image_id": id() })).unwrap();
        assert_eq!(req.transform, Transform::Adjust(AdjustmentParameters::IDENTITY));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let req = TransformRequest::adjust(&json!({
            "image_id": id(),
            "brightness": "12.5",
            "gamma": 2,
            "saturation": null,
        }))
        .unwrap();
        let Transform::Adjust(params) = req.transform else {
            panic!("expected an adjust transform");
        };
        assert_eq!(params.brightness, 12.5);
        assert_eq!(params.gamma, 2.0);
        assert_eq!(params.saturation, 1.0);
    }

    #[test]
    fn non_numeric_field_is_invalid() {
        let err = TransformRequest::adjust(&json!({ "image_id": id(), "contrast": "lots" }))
            .unwrap_err();
        assert!(matches!(err, RetouchError::InvalidParameter { ref name, .. } if name == "contrast"));
    }

    #[test]
    fn zero_gamma_is_invalid() {
        let err =
            TransformRequest::adjust(&json!({ "image_id": id(), "gamma": 0 })).unwrap_err();
        assert!(matches!(err, RetouchError::InvalidParameter { ref name, .. } if name == "gamma"));
    }

    #[test]
    fn missing_image_id() {
        let err = TransformRequest::edges(&json!({})).unwrap_err();
        assert!(matches!(err, RetouchError::MissingParameter(ref name) if name == "image_id"));

        let err = TransformRequest::edges(&json!({ "image_id": "  " })).unwrap_err();
        assert!(matches!(err, RetouchError::MissingParameter(_)));
    }

    #[test]
    fn garbage_image_id_is_not_found() {
        let err = TransformRequest::edges(&json!({ "image_id": "abc" })).unwrap_err();
        assert!(matches!(err, RetouchError::HandleNotFound));
    }

    #[test]
    fn resize_requires_positive_scale() {
        let missing = TransformRequest::resize(&json!({ "image_id": id() })).unwrap_err();
        assert!(matches!(missing, RetouchError::MissingParameter(ref name) if name == "scale"));

        for scale in [json!(0), json!(-1.5), json!("0")] {
            let err =
                TransformRequest::resize(&json!({ "image_id": id(), "scale": scale })).unwrap_err();
            assert!(matches!(err, RetouchError::InvalidParameter { .. }));
        }

        let ok = TransformRequest::resize(&json!({ "image_id": id(), "scale": "0.5" })).unwrap();
        assert_eq!(ok.transform, Transform::Resize { scale: 0.5 });
    }

    #[test]
    fn geometry_parses_in_order() {
        let req = TransformRequest::geometry(&json!({
            "image_id": id(),
            "operations": ["r", "hf", "-r", "vf"],
        }))
        .unwrap();
        assert_eq!(
            req.transform,
            Transform::Geometry(vec![
                GeometryOp::RotateCw90,
                GeometryOp::FlipHorizontal,
                GeometryOp::RotateCcw90,
                GeometryOp::FlipVertical,
            ])
        );
    }

    #[test]
    fn geometry_reports_first_unknown_code() {
        let err = TransformRequest::geometry(&json!({
            "image_id": id(),
            "operations": ["r", "zz", "yy"],
        }))
        .unwrap_err();
        assert!(matches!(err, RetouchError::UnsupportedOperation(ref code) if code == "zz"));
    }

    #[test]
    fn geometry_needs_a_non_empty_list() {
        let empty = TransformRequest::geometry(&json!({ "image_id": id(), "operations": [] }))
            .unwrap_err();
        assert!(matches!(empty, RetouchError::MissingParameter(_)));

        let scalar = TransformRequest::geometry(&json!({ "image_id": id(), "operations": "r" }))
            .unwrap_err();
        assert!(matches!(scalar, RetouchError::InvalidParameter { .. }));
    }

    #[test]
    fn upload_requires_payload() {
        let err = UploadRequest::parse(&json!({ "image_base64": "" })).unwrap_err();
        assert!(matches!(err, RetouchError::MissingParameter(ref name) if name == "image_base64"));
    }

    #[test]
    fn non_object_body_is_invalid() {
        assert!(matches!(
            UploadRequest::parse(&json!(["nope"])),
            Err(RetouchError::InvalidParameter { .. })
        ));
    }
}
