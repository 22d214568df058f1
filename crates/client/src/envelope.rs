use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::ApiResponse;

/// `{status, code, message, data}` wrapper most endpoints answer with.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default, alias = "Status")]
    pub status: Option<bool>,
    #[serde(default, alias = "Code")]
    pub code: Option<i64>,
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
    #[serde(default, alias = "Data")]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// Recognises an envelope by its `status` flag; bare objects are not envelopes.
    pub fn detect(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let flagged = ["status", "Status"]
            .iter()
            .any(|key| object.get(*key).is_some_and(Value::is_boolean));
        if !flagged {
            return None;
        }
        serde_json::from_value(body.clone()).ok()
    }
}

/// Message shown for a failed response: JSON `message`/`Message`, else the
/// raw body text, else `HTTP <status>`.
pub fn error_message(status: u16, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();

    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(text) {
        let message = ["message", "Message"]
            .iter()
            .filter_map(|key| object.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|message| !message.is_empty());
        if let Some(message) = message {
            return message.to_string();
        }
    }

    if text.is_empty() {
        format!("HTTP {status}")
    } else {
        text.to_string()
    }
}

/// Unwraps a response into its payload. Non-2xx and `status: false` become
/// errors; an empty 2xx body is success with no data.
pub fn unwrap_response(response: &ApiResponse) -> Result<Option<Value>, ClientError> {
    if !response.is_success() {
        return Err(ClientError::Http {
            status: response.status,
            message: error_message(response.status, &response.body),
        });
    }
    if response.is_empty() {
        return Ok(None);
    }

    let body: Value = serde_json::from_slice(&response.body)
        .map_err(|error| ClientError::Decode(error.to_string()))?;

    match ApiEnvelope::detect(&body) {
        Some(envelope) if envelope.status == Some(false) => Err(ClientError::Application {
            code: envelope.code,
            message: envelope
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "Request failed".to_string()),
        }),
        Some(envelope) => Ok(envelope.data.filter(|data| !data.is_null())),
        None => Ok(Some(body)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{error_message, unwrap_response};
    use crate::error::ClientError;
    use crate::transport::ApiResponse;

    #[test]
    fn message_prefers_json_then_text_then_status() {
        assert_eq!(error_message(400, br#"{"message":"Remarks are required"}"#), "Remarks are required");
        assert_eq!(error_message(400, br#"{"Message":"Invalid stage"}"#), "Invalid stage");
        assert_eq!(error_message(502, b"Bad gateway from proxy"), "Bad gateway from proxy");
        assert_eq!(error_message(500, b""), "HTTP 500");
    }

    #[test]
    fn failed_envelope_in_2xx_is_an_application_error() {
        let response = ApiResponse::json(
            200,
            &json!({ "Status": false, "Code": 422, "Message": "Document already closed" }),
        );
        let error = unwrap_response(&response).expect_err("status false");
        assert_eq!(
            error,
            ClientError::Application { code: Some(422), message: "Document already closed".to_string() }
        );
    }

    #[test]
    fn successful_envelope_yields_data_and_204_yields_nothing() {
        let response =
            ApiResponse::json(200, &json!({ "status": true, "code": 200, "data": { "id": 7 } }));
        assert_eq!(unwrap_response(&response), Ok(Some(json!({ "id": 7 }))));
        assert_eq!(unwrap_response(&ApiResponse::empty(204)), Ok(None));
        assert_eq!(
            unwrap_response(&ApiResponse::json(200, &json!([1, 2]))),
            Ok(Some(json!([1, 2])))
        );
    }
}
