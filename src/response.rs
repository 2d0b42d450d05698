//! Response transformation: raw HTTP responses into payloads or errors.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BoxError, Result};

/// Box API error body. Only the message is extracted; the rest of the body
/// is left for the caller via the error display.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// A successfully transformed API response.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Decoded JSON body. No schema validation is applied.
    Json(Value),
    /// Raw bytes of a non-JSON body (file downloads, empty delete responses).
    Binary(Bytes),
}

impl Payload {
    /// Consume the payload as a JSON value. Binary payloads yield `Null`.
    pub fn into_json(self) -> Value {
        match self {
            Payload::Json(value) => value,
            Payload::Binary(_) => Value::Null,
        }
    }

    /// Borrow the decoded JSON value, if this payload is JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Binary(_) => None,
        }
    }

    /// Consume the payload as raw bytes. JSON payloads are re-serialized.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Payload::Json(value) => Bytes::from(value.to_string()),
            Payload::Binary(bytes) => bytes,
        }
    }
}

/// Transform a raw response into a payload or a typed error.
///
/// 2xx responses with a JSON content type decode into [`Payload::Json`];
/// other 2xx responses become [`Payload::Binary`]. Everything else, 3xx
/// included (redirects are never followed), fails with [`BoxError::Api`]
/// carrying the status code and the server's message.
pub async fn transform(response: Response) -> Result<Payload> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);
        return Err(BoxError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("json"));

    if is_json {
        let body = response.text().await?;
        if body.is_empty() {
            return Ok(Payload::Json(Value::Null));
        }
        Ok(Payload::Json(serde_json::from_str(&body)?))
    } else {
        Ok(Payload::Binary(response.bytes().await?))
    }
}
