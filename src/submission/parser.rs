use axum::http::HeaderMap;
use serde_json::{Map, Value};

use crate::error::AppError;

use super::fields::RawFields;

const INVALID_JSON: &str = "Invalid JSON format";

/// Decode a request body into raw fields based on its Content-Type.
pub async fn parse_request(headers: &HeaderMap, body: bytes::Bytes) -> Result<RawFields, AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let value = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parse_multipart(headers, body).await?
    } else {
        parse_body(content_type, &body)?
    };

    Ok(RawFields::from_value(value))
}

/// Parse a non-multipart body. Empty bodies decode to an empty object.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        parse_json(body)
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        // Try JSON first, then form-urlencoded
        parse_json(body).or_else(|_| parse_form_urlencoded(body))
    }
}

/// JSON bodies may arrive double-encoded as a JSON string holding the object.
fn parse_json(body: &[u8]) -> Result<Value, AppError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("JSON parse error: {e}");
        AppError::Validation(INVALID_JSON.to_string())
    })?;

    match value {
        Value::String(inner) => serde_json::from_str(&inner).map_err(|e| {
            tracing::debug!("JSON string body parse error: {e}");
            AppError::Validation(INVALID_JSON.to_string())
        }),
        other => Ok(other),
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<Value, AppError> {
    let body_str = std::str::from_utf8(body)
        .map_err(|_| AppError::Validation(INVALID_JSON.to_string()))?;

    let map: Map<String, Value> = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();

    Ok(Value::Object(map))
}

/// Parse multipart form data using multer. File parts are read as text.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<Value, AppError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::Validation("Missing multipart boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("unknown").to_string();
        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Field read error: {e}")))?;
        map.insert(name, Value::String(value));
    }

    Ok(Value::Object(map))
}
