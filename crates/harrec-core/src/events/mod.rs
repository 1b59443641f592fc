//! Input events: the fixed set of DevTools events the aggregator understands.
//!
//! The wire shape is `{method, params}`. A method outside [`EventKind`] never
//! becomes an [`Event`]; callers treat that as a no-op.

mod params;

pub use params::{
    BodyRetrieved, DataReceived, FramePayload, LoadingFailed, LoadingFinished, PageTimestamp,
    PriorityChanged, RequestWillBeSent, ResponseReceived, WebSocketClosed, WebSocketFrameEvent,
    WebSocketHandshakeSent,
};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Method name used for body-fetch results fed back into the stream.
pub const GET_RESPONSE_BODY: &str = "Network.getResponseBody";

/// Raw event as forwarded by the instrumentation host.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RequestStarted,
    DataReceived,
    ResponseReceived,
    PriorityChanged,
    LoadingFinished,
    LoadingFailed,
    BodyRetrieved,
    WebSocketHandshakeSent,
    WebSocketHandshakeResponseReceived,
    WebSocketClosed,
    WebSocketFrameSent,
    WebSocketFrameReceived,
    PageContentLoaded,
    PageLoadCompleted,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::RequestStarted,
        EventKind::DataReceived,
        EventKind::ResponseReceived,
        EventKind::PriorityChanged,
        EventKind::LoadingFinished,
        EventKind::LoadingFailed,
        EventKind::BodyRetrieved,
        EventKind::WebSocketHandshakeSent,
        EventKind::WebSocketHandshakeResponseReceived,
        EventKind::WebSocketClosed,
        EventKind::WebSocketFrameSent,
        EventKind::WebSocketFrameReceived,
        EventKind::PageContentLoaded,
        EventKind::PageLoadCompleted,
    ];

    pub fn method(self) -> &'static str {
        match self {
            EventKind::RequestStarted => "Network.requestWillBeSent",
            EventKind::DataReceived => "Network.dataReceived",
            EventKind::ResponseReceived => "Network.responseReceived",
            EventKind::PriorityChanged => "Network.resourceChangedPriority",
            EventKind::LoadingFinished => "Network.loadingFinished",
            EventKind::LoadingFailed => "Network.loadingFailed",
            EventKind::BodyRetrieved => GET_RESPONSE_BODY,
            EventKind::WebSocketHandshakeSent => "Network.webSocketWillSendHandshakeRequest",
            EventKind::WebSocketHandshakeResponseReceived => {
                "Network.webSocketHandshakeResponseReceived"
            }
            EventKind::WebSocketClosed => "Network.webSocketClosed",
            EventKind::WebSocketFrameSent => "Network.webSocketFrameSent",
            EventKind::WebSocketFrameReceived => "Network.webSocketFrameReceived",
            EventKind::PageContentLoaded => "Page.domContentEventFired",
            EventKind::PageLoadCompleted => "Page.loadEventFired",
        }
    }

    /// `None` for any method this crate does not handle.
    pub fn from_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.method() == method)
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid params for {method}: {source}")]
    Params {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded event, one variant per [`EventKind`].
#[derive(Debug, Clone)]
pub enum Event {
    RequestStarted(RequestWillBeSent),
    DataReceived(DataReceived),
    ResponseReceived(ResponseReceived),
    PriorityChanged(PriorityChanged),
    LoadingFinished(LoadingFinished),
    LoadingFailed(LoadingFailed),
    BodyRetrieved(BodyRetrieved),
    WebSocketHandshakeSent(WebSocketHandshakeSent),
    WebSocketHandshakeResponseReceived(ResponseReceived),
    WebSocketClosed(WebSocketClosed),
    WebSocketFrameSent(WebSocketFrameEvent),
    WebSocketFrameReceived(WebSocketFrameEvent),
    PageContentLoaded(PageTimestamp),
    PageLoadCompleted(PageTimestamp),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::RequestStarted(_) => EventKind::RequestStarted,
            Event::DataReceived(_) => EventKind::DataReceived,
            Event::ResponseReceived(_) => EventKind::ResponseReceived,
            Event::PriorityChanged(_) => EventKind::PriorityChanged,
            Event::LoadingFinished(_) => EventKind::LoadingFinished,
            Event::LoadingFailed(_) => EventKind::LoadingFailed,
            Event::BodyRetrieved(_) => EventKind::BodyRetrieved,
            Event::WebSocketHandshakeSent(_) => EventKind::WebSocketHandshakeSent,
            Event::WebSocketHandshakeResponseReceived(_) => {
                EventKind::WebSocketHandshakeResponseReceived
            }
            Event::WebSocketClosed(_) => EventKind::WebSocketClosed,
            Event::WebSocketFrameSent(_) => EventKind::WebSocketFrameSent,
            Event::WebSocketFrameReceived(_) => EventKind::WebSocketFrameReceived,
            Event::PageContentLoaded(_) => EventKind::PageContentLoaded,
            Event::PageLoadCompleted(_) => EventKind::PageLoadCompleted,
        }
    }

    /// Decodes `params` for a known kind.
    pub fn decode(kind: EventKind, params: serde_json::Value) -> Result<Self, DecodeError> {
        fn p<T: DeserializeOwned>(
            kind: EventKind,
            params: serde_json::Value,
        ) -> Result<T, DecodeError> {
            serde_json::from_value(params).map_err(|source| DecodeError::Params {
                method: kind.method(),
                source,
            })
        }

        Ok(match kind {
            EventKind::RequestStarted => Event::RequestStarted(p(kind, params)?),
            EventKind::DataReceived => Event::DataReceived(p(kind, params)?),
            EventKind::ResponseReceived => Event::ResponseReceived(p(kind, params)?),
            EventKind::PriorityChanged => Event::PriorityChanged(p(kind, params)?),
            EventKind::LoadingFinished => Event::LoadingFinished(p(kind, params)?),
            EventKind::LoadingFailed => Event::LoadingFailed(p(kind, params)?),
            EventKind::BodyRetrieved => Event::BodyRetrieved(p(kind, params)?),
            EventKind::WebSocketHandshakeSent => Event::WebSocketHandshakeSent(p(kind, params)?),
            EventKind::WebSocketHandshakeResponseReceived => {
                Event::WebSocketHandshakeResponseReceived(p(kind, params)?)
            }
            EventKind::WebSocketClosed => Event::WebSocketClosed(p(kind, params)?),
            EventKind::WebSocketFrameSent => Event::WebSocketFrameSent(p(kind, params)?),
            EventKind::WebSocketFrameReceived => Event::WebSocketFrameReceived(p(kind, params)?),
            EventKind::PageContentLoaded => Event::PageContentLoaded(p(kind, params)?),
            EventKind::PageLoadCompleted => Event::PageLoadCompleted(p(kind, params)?),
        })
    }

    /// Decodes a raw `{method, params}` pair. Unknown methods yield `Ok(None)`.
    pub fn from_raw(method: &str, params: serde_json::Value) -> Result<Option<Self>, DecodeError> {
        match EventKind::from_method(method) {
            Some(kind) => Event::decode(kind, params).map(Some),
            None => Ok(None),
        }
    }
}
