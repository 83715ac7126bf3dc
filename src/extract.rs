use axum::{
    async_trait,
    extract::{FromRequest, Request},
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;

/// JSON request body bound to an explicit schema.
///
/// A missing body, `null` or `{}` is rejected as a bad request before the
/// schema is applied; a body that does not fit the schema is a validation
/// error.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;
        parse_body(&bytes).map(JsonBody)
    }
}

pub(crate) fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let no_data = || AppError::bad_request("Bad Request ! No Data Provided.");
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(no_data());
    }
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| AppError::bad_request(format!("Malformed JSON body: {e}")))?;
    match &value {
        Value::Null => return Err(no_data()),
        Value::Object(map) if map.is_empty() => return Err(no_data()),
        _ => {}
    }
    serde_json::from_value(value).map_err(|e| AppError::validation(format!("Invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        name: Option<String>,
        price: Option<f64>,
    }

    #[test]
    fn empty_bodies_are_bad_requests() {
        for raw in ["", "  ", "null", "{}"] {
            let err = parse_body::<Body>(raw.as_bytes()).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{raw:?}");
        }
    }

    #[test]
    fn schema_mismatch_is_validation_error() {
        let err = parse_body::<Body>(br#"{"price":"twenty"}"#).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn accepts_partial_body() {
        let body = parse_body::<Body>(br#"{"name":"Plumbing"}"#).unwrap();
        assert_eq!(body.name.as_deref(), Some("Plumbing"));
        assert!(body.price.is_none());
    }
}
