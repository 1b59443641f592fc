//! Event aggregator: folds DevTools events into a [`Session`], one at a time.
//!
//! Events for an identifier that is not in the session are ignored; this is
//! the only defense against foreign or out-of-order events, and no handler
//! ever fails on a well-formed event. The caller serializes events per
//! session; nothing here synchronizes.

use crate::events::{
    BodyRetrieved, DataReceived, Event, LoadingFailed, LoadingFinished, PriorityChanged,
    RequestWillBeSent, ResponseReceived, WebSocketClosed, WebSocketFrameEvent,
    WebSocketHandshakeSent,
};
use crate::model::{
    FailureInfo, FirstRequest, FrameDirection, RequestEntry, ResponseBody, Session, Terminal,
    Transport, WebSocketFrame,
};

/// What applying one event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// Unknown kind, unknown request id, or a skipped data URI.
    Ignored,
    Updated,
    /// The request finished loading; its body can now be fetched.
    BodyExpected(String),
}

/// Applies one decoded event to `session`.
pub fn apply(session: &mut Session, event: Event) -> Applied {
    tracing::trace!(kind = ?event.kind(), "apply event");
    match event {
        Event::RequestStarted(p) => request_started(session, p),
        Event::DataReceived(p) => data_received(session, p),
        Event::ResponseReceived(p) | Event::WebSocketHandshakeResponseReceived(p) => {
            response_received(session, p)
        }
        Event::PriorityChanged(p) => priority_changed(session, p),
        Event::LoadingFinished(p) => loading_finished(session, p),
        Event::LoadingFailed(p) => loading_failed(session, p),
        Event::BodyRetrieved(p) => body_retrieved(session, p),
        Event::WebSocketHandshakeSent(p) => websocket_handshake_sent(session, p),
        Event::WebSocketClosed(p) => websocket_closed(session, p),
        Event::WebSocketFrameSent(p) => websocket_frame(session, p, FrameDirection::Send),
        Event::WebSocketFrameReceived(p) => websocket_frame(session, p, FrameDirection::Receive),
        Event::PageContentLoaded(p) => {
            session.dom_content_event_ms = Some(p.timestamp * 1000.0);
            Applied::Updated
        }
        Event::PageLoadCompleted(p) => {
            session.load_event_ms = Some(p.timestamp * 1000.0);
            Applied::Updated
        }
    }
}

/// Decodes a raw `{method, params}` pair and applies it.
///
/// Unknown methods are ignored. Params that fail to decode are logged and
/// ignored as well: the instrumentation source is trusted, so this only
/// happens with protocol drift.
pub fn apply_raw(session: &mut Session, method: &str, params: serde_json::Value) -> Applied {
    match Event::from_raw(method, params) {
        Ok(Some(event)) => apply(session, event),
        Ok(None) => Applied::Ignored,
        Err(err) => {
            tracing::debug!("ignoring event: {}", err);
            Applied::Ignored
        }
    }
}

/// Key a finished redirect hop is moved to.
///
/// Two redirects of the same request at an identical timestamp would share
/// this key; the later hop replaces the earlier one.
pub fn redirect_key(request_id: &str, timestamp: f64) -> String {
    format!("{request_id}_redirect_{timestamp}")
}

fn entry_mut<'a>(session: &'a mut Session, request_id: &str) -> Option<&'a mut RequestEntry> {
    let entry = session.entries.get_mut(request_id);
    if entry.is_none() {
        tracing::debug!(request_id, "event for unknown request id");
    }
    entry
}

fn request_started(session: &mut Session, p: RequestWillBeSent) -> Applied {
    if p.request.url.starts_with("data:") {
        return Applied::Ignored;
    }

    if session.first_request.is_none() && p.initiator_type() == Some("other") {
        session.first_request = Some(FirstRequest {
            id: p.request_id.clone(),
            timestamp_ms: p.timestamp * 1000.0,
            wall_time: p.wall_time,
            url: p.request.url.clone(),
        });
    }

    // Redirect responses arrive with the next hop's request, under the same id.
    if let Some(redirect) = p.redirect_response {
        if let Some(mut hop) = session.entries.remove(&p.request_id) {
            hop.encoded_length = redirect.encoded_data_length.map(|n| n as i64);
            hop.response = Some(redirect);
            hop.terminal = Some(Terminal::Finished(p.timestamp));
            let key = redirect_key(&p.request_id, p.timestamp);
            tracing::debug!(request_id = %p.request_id, %key, "relocated redirect hop");
            if session.entries.insert(key.clone(), hop).is_some() {
                tracing::debug!(%key, "redirect key collision, earlier hop replaced");
            }
        }
    }

    let mut entry = RequestEntry::new(p.request, p.timestamp, p.wall_time, Transport::Http);
    entry.initiator = p.initiator;
    entry.resource_type = p.resource_type;
    session.entries.insert(p.request_id, entry);
    Applied::Updated
}

fn data_received(session: &mut Session, p: DataReceived) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.decoded_length += p.data_length;
    Applied::Updated
}

fn response_received(session: &mut Session, p: ResponseReceived) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.response = Some(p.response);
    Applied::Updated
}

fn priority_changed(session: &mut Session, p: PriorityChanged) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.priority_override = Some(p.new_priority);
    Applied::Updated
}

fn loading_finished(session: &mut Session, p: LoadingFinished) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.encoded_length = Some(p.encoded_data_length as i64);
    entry.terminal = Some(Terminal::Finished(p.timestamp));
    session.pending_bodies += 1;
    Applied::BodyExpected(p.request_id)
}

fn loading_failed(session: &mut Session, p: LoadingFailed) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.terminal = Some(Terminal::Failed(p.timestamp));
    entry.failure = Some(FailureInfo {
        error_text: p.error_text,
        canceled: p.canceled,
    });
    Applied::Updated
}

fn body_retrieved(session: &mut Session, p: BodyRetrieved) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.body = Some(ResponseBody {
        text: p.body,
        base64: p.base64_encoded,
    });
    session.pending_bodies = session.pending_bodies.saturating_sub(1);
    Applied::Updated
}

fn websocket_handshake_sent(session: &mut Session, p: WebSocketHandshakeSent) -> Applied {
    let entry = RequestEntry::new(
        p.request,
        p.timestamp,
        p.wall_time,
        Transport::WebSocket(Vec::new()),
    );
    session.entries.insert(p.request_id, entry);
    Applied::Updated
}

fn websocket_closed(session: &mut Session, p: WebSocketClosed) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    entry.terminal = Some(Terminal::Finished(p.timestamp));
    Applied::Updated
}

fn websocket_frame(
    session: &mut Session,
    p: WebSocketFrameEvent,
    direction: FrameDirection,
) -> Applied {
    let Some(entry) = entry_mut(session, &p.request_id) else {
        return Applied::Ignored;
    };
    let Transport::WebSocket(frames) = &mut entry.transport else {
        return Applied::Ignored;
    };
    frames.push(WebSocketFrame {
        direction,
        time: p.timestamp,
        opcode: p.response.opcode,
        payload: p.response.payload_data,
    });
    Applied::Updated
}
