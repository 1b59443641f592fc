//! Entry timing synthesis from DevTools `ResourceTiming`.
//!
//! Follows the DevTools frontend's own HAR export: phases are derived from
//! the relative marks in `ResourceTiming`, totals from protocol timestamps.

use crate::model::{ResourceTiming, WebSocketFrame};

use super::document::Timings;

/// Seconds to milliseconds; negative durations become `-1`.
pub fn to_millis(seconds: f64) -> f64 {
    if seconds < 0.0 {
        -1.0
    } else {
        seconds * 1000.0
    }
}

fn first_non_negative(values: &[f64]) -> f64 {
    values.iter().copied().find(|v| *v >= 0.0).unwrap_or(-1.0)
}

/// WebSocket sessions: everything from the handshake to the last frame is
/// reported as `wait`. HAR has no notion of WebSockets, so this is only an
/// approximation.
pub fn websocket(request_start: f64, frames: &[WebSocketFrame]) -> (f64, Timings) {
    let session_time = frames
        .last()
        .map(|f| to_millis(f.time - request_start))
        .unwrap_or(-1.0);
    (
        session_time,
        Timings {
            blocked: -1.0,
            dns: -1.0,
            connect: -1.0,
            send: 0.0,
            wait: session_time,
            receive: -1.0,
            ssl: -1.0,
        },
    )
}

/// Regular requests. `terminal` is the finished or failed timestamp.
pub fn standard(request_start: f64, terminal: f64, timing: &ResourceTiming) -> (f64, Timings) {
    let time = to_millis(terminal - request_start);

    let blocked_base = to_millis(timing.request_time - request_start);
    let blocked_start =
        first_non_negative(&[timing.dns_start, timing.connect_start, timing.send_start]);
    let blocked = blocked_base + if blocked_start == -1.0 { 0.0 } else { blocked_start };

    let dns = if timing.dns_start >= 0.0 {
        first_non_negative(&[timing.connect_start, timing.send_start]) - timing.dns_start
    } else {
        -1.0
    };
    let connect = if timing.connect_start >= 0.0 {
        timing.send_start - timing.connect_start
    } else {
        -1.0
    };
    let send = timing.send_end - timing.send_start;
    let wait = timing.receive_headers_end - timing.send_end;
    let receive =
        to_millis(terminal - (timing.request_time + timing.receive_headers_end / 1000.0));
    let ssl = if timing.ssl_start >= 0.0 && timing.ssl_end >= 0.0 {
        timing.ssl_end - timing.ssl_start
    } else {
        -1.0
    };

    (
        time,
        Timings {
            blocked,
            dns,
            connect,
            send,
            wait,
            receive,
            ssl,
        },
    )
}
