//! Typed DevTools `Network` payloads retained in the record model.
//!
//! Only the fields the archive needs are modeled; everything else in the
//! protocol objects is ignored on deserialization.

use serde::Deserialize;

use super::Headers;

/// `Network.Request` (also used for the WebSocket handshake request, which
/// only carries `headers`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub headers: Headers,
    pub post_data: Option<String>,
    pub initial_priority: Option<String>,
}

/// `Network.Response` / `Network.WebSocketResponse`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub status_text: String,
    #[serde(default)]
    pub headers: Headers,
    /// Raw status line plus headers (HTTP/1.x and WebSocket handshakes).
    pub headers_text: Option<String>,
    #[serde(default)]
    pub mime_type: String,
    /// Headers actually sent on the wire, when the browser reports them.
    pub request_headers: Option<Headers>,
    pub request_headers_text: Option<String>,
    pub connection_id: Option<serde_json::Number>,
    #[serde(rename = "remoteIPAddress")]
    pub remote_ip_address: Option<String>,
    pub from_disk_cache: Option<bool>,
    pub encoded_data_length: Option<f64>,
    pub timing: Option<ResourceTiming>,
    pub protocol: Option<String>,
}

/// `Network.ResourceTiming`.
///
/// `request_time` is in seconds (monotonic clock); every other field is in
/// milliseconds relative to it, with `-1` meaning the phase did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTiming {
    pub request_time: f64,
    pub dns_start: f64,
    #[serde(default = "unset")]
    pub dns_end: f64,
    pub connect_start: f64,
    #[serde(default = "unset")]
    pub connect_end: f64,
    pub ssl_start: f64,
    pub ssl_end: f64,
    pub send_start: f64,
    pub send_end: f64,
    pub receive_headers_end: f64,
}

fn unset() -> f64 {
    -1.0
}

impl Default for ResourceTiming {
    fn default() -> Self {
        Self {
            request_time: 0.0,
            dns_start: -1.0,
            dns_end: -1.0,
            connect_start: -1.0,
            connect_end: -1.0,
            ssl_start: -1.0,
            ssl_end: -1.0,
            send_start: 0.0,
            send_end: 0.0,
            receive_headers_end: 0.0,
        }
    }
}
