//! One HTTP transaction or WebSocket session accumulated from events.

use serde::Serialize;

use super::{Request, Response};

/// How an entry ended. Success and failure are mutually exclusive, so an
/// entry holds at most one of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terminal {
    /// `loadingFinished`, a redirect hop completing, or `webSocketClosed`.
    Finished(f64),
    /// `loadingFailed`.
    Failed(f64),
}

impl Terminal {
    /// Protocol timestamp in seconds.
    pub fn timestamp(self) -> f64 {
        match self {
            Terminal::Finished(t) | Terminal::Failed(t) => t,
        }
    }

    pub fn is_failed(self) -> bool {
        matches!(self, Terminal::Failed(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameDirection {
    Send,
    Receive,
}

/// A WebSocket frame as observed by the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSocketFrame {
    pub direction: FrameDirection,
    /// Protocol timestamp in seconds.
    pub time: f64,
    pub opcode: i64,
    pub payload: String,
}

/// Response body delivered by the body-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    pub text: String,
    pub base64: bool,
}

/// Plain HTTP entries may receive a body; WebSocket entries collect frames.
#[derive(Debug, Clone, PartialEq)]
pub enum Transport {
    Http,
    WebSocket(Vec<WebSocketFrame>),
}

/// Details of a `loadingFailed` event, kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureInfo {
    pub error_text: String,
    pub canceled: bool,
}

#[derive(Debug, Clone)]
pub struct RequestEntry {
    pub request: Request,
    /// Protocol (monotonic) timestamp of the request start, in seconds.
    pub timestamp: f64,
    /// Wall-clock time of the request start, in seconds since the epoch.
    pub wall_time: f64,
    /// Raw `Network.Initiator` object; `Null` when the event had none.
    pub initiator: serde_json::Value,
    /// `Network.ResourceType` as reported (e.g. "Document", "XHR").
    pub resource_type: Option<String>,
    pub response: Option<Response>,
    /// Decoded bytes received so far (sum of `dataReceived` chunks).
    pub decoded_length: i64,
    /// Total on-the-wire bytes, set once on completion.
    pub encoded_length: Option<i64>,
    pub terminal: Option<Terminal>,
    pub failure: Option<FailureInfo>,
    pub body: Option<ResponseBody>,
    pub priority_override: Option<String>,
    pub transport: Transport,
}

impl RequestEntry {
    pub fn new(request: Request, timestamp: f64, wall_time: f64, transport: Transport) -> Self {
        Self {
            request,
            timestamp,
            wall_time,
            initiator: serde_json::Value::Null,
            resource_type: None,
            response: None,
            decoded_length: 0,
            encoded_length: None,
            terminal: None,
            failure: None,
            body: None,
            priority_override: None,
            transport,
        }
    }

    pub fn is_websocket(&self) -> bool {
        matches!(self.transport, Transport::WebSocket(_))
    }

    pub fn frames(&self) -> &[WebSocketFrame] {
        match &self.transport {
            Transport::WebSocket(frames) => frames,
            Transport::Http => &[],
        }
    }

    /// Priority override if one arrived, else the request's initial priority.
    pub fn effective_priority(&self) -> Option<&str> {
        self.priority_override
            .as_deref()
            .or(self.request.initial_priority.as_deref())
    }

    /// True once the entry carries enough data to be archived.
    pub fn is_export_eligible(&self) -> bool {
        let Some(response) = &self.response else {
            return false;
        };
        self.is_websocket() || (self.terminal.is_some() && response.timing.is_some())
    }
}
