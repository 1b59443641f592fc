//! Event payloads (`params`) for the DevTools events the aggregator consumes.

use serde::Deserialize;

use crate::model::{Request, Response};

/// `Network.requestWillBeSent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSent {
    pub request_id: String,
    pub request: Request,
    pub timestamp: f64,
    #[serde(default)]
    pub wall_time: f64,
    #[serde(default)]
    pub initiator: serde_json::Value,
    /// Present when this request is the next hop of a redirect.
    pub redirect_response: Option<Response>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

impl RequestWillBeSent {
    /// `initiator.type`, e.g. "parser", "script" or "other".
    pub fn initiator_type(&self) -> Option<&str> {
        self.initiator.get("type").and_then(|t| t.as_str())
    }
}

/// `Network.dataReceived`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataReceived {
    pub request_id: String,
    pub data_length: i64,
}

/// `Network.responseReceived` and `Network.webSocketHandshakeResponseReceived`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceived {
    pub request_id: String,
    pub response: Response,
}

/// `Network.resourceChangedPriority`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityChanged {
    pub request_id: String,
    pub new_priority: String,
}

/// `Network.loadingFinished`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinished {
    pub request_id: String,
    pub timestamp: f64,
    pub encoded_data_length: f64,
}

/// `Network.loadingFailed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailed {
    pub request_id: String,
    pub timestamp: f64,
    #[serde(default)]
    pub error_text: String,
    #[serde(default)]
    pub canceled: bool,
}

/// Result of `Network.getResponseBody`, keyed by the request it was fetched for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRetrieved {
    pub request_id: String,
    pub body: String,
    #[serde(default)]
    pub base64_encoded: bool,
}

/// `Network.webSocketWillSendHandshakeRequest`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketHandshakeSent {
    pub request_id: String,
    pub timestamp: f64,
    #[serde(default)]
    pub wall_time: f64,
    #[serde(default)]
    pub request: Request,
}

/// `Network.webSocketClosed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketClosed {
    pub request_id: String,
    pub timestamp: f64,
}

/// `Network.WebSocketFrame`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FramePayload {
    pub opcode: i64,
    #[serde(default)]
    pub payload_data: String,
}

/// `Network.webSocketFrameSent` / `Network.webSocketFrameReceived`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSocketFrameEvent {
    pub request_id: String,
    pub timestamp: f64,
    pub response: FramePayload,
}

/// `Page.domContentEventFired` / `Page.loadEventFired`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageTimestamp {
    pub timestamp: f64,
}
