//! Assembles pages and entries from capture sessions.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::{RequestEntry, Session, Transport};

use super::document::{
    Archive, Cache, Content, Creator, Entry, Log, Page, PageTimings, Request, Response,
    WebSocketMessage, HAR_VERSION,
};
use super::headers::{self, StatusLines};
use super::{payload, query, timings};

/// Synthesizer settings (see [`crate::config::HarrecConfig::synth_options`]).
#[derive(Debug, Clone, PartialEq)]
pub struct SynthOptions {
    pub creator: Creator,
    /// Derive page start and `onContentLoad`/`onLoad` from the recorded page
    /// events instead of emitting placeholders.
    pub derive_page_timings: bool,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            creator: Creator {
                name: "HAR Recorder".to_string(),
                version: "1".to_string(),
                comment: Some("Records network request and generates HAR file.".to_string()),
            },
            derive_page_timings: false,
        }
    }
}

/// Builds one archive from a list of sessions, one page per session.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    options: SynthOptions,
}

impl Synthesizer {
    pub fn new(options: SynthOptions) -> Self {
        Self { options }
    }

    pub fn build(&self, sessions: &[Session]) -> Archive {
        let mut pages = Vec::with_capacity(sessions.len());
        let mut entries = Vec::new();
        for (index, session) in sessions.iter().enumerate() {
            let page = self.build_page(&page_id(index), session);
            let before = entries.len();
            let mut captured: Vec<_> = session.entries.iter().collect();
            captured.sort_by(|(a_id, a), (b_id, b)| {
                a.wall_time
                    .total_cmp(&b.wall_time)
                    .then(a.timestamp.total_cmp(&b.timestamp))
                    .then_with(|| a_id.cmp(b_id))
            });
            entries.extend(
                captured
                    .into_iter()
                    .filter_map(|(_, entry)| build_entry(&page.id, entry)),
            );
            tracing::debug!(
                page = %page.id,
                captured = session.entries.len(),
                exported = entries.len() - before,
                pending_bodies = session.pending_bodies,
                "built page"
            );
            pages.push(page);
        }
        Archive {
            log: Log {
                version: HAR_VERSION.to_string(),
                creator: self.options.creator.clone(),
                pages,
                entries,
            },
        }
    }

    fn build_page(&self, id: &str, session: &Session) -> Page {
        let placeholder = PageTimings {
            on_content_load: -1.0,
            on_load: -1.0,
        };
        let derive = self.options.derive_page_timings;
        let (started_date_time, page_timings) = match (&session.first_request, derive) {
            (Some(first), true) => {
                let since_first = |ms: Option<f64>| ms.map_or(-1.0, |ms| ms - first.timestamp_ms);
                (
                    iso_time(first.wall_time),
                    PageTimings {
                        on_content_load: since_first(session.dom_content_event_ms),
                        on_load: since_first(session.load_event_ms),
                    },
                )
            }
            _ => (iso_time(0.0), placeholder),
        };
        Page {
            id: id.to_string(),
            title: session.page_url().unwrap_or_default().to_string(),
            started_date_time,
            page_timings,
            user: session.user.clone(),
        }
    }
}

/// Builds an archive with the default options.
pub fn build(sessions: &[Session]) -> Archive {
    Synthesizer::default().build(sessions)
}

/// `page_<n>_<random digits>`, unique per archive.
fn page_id(index: usize) -> String {
    let (random, _) = uuid::Uuid::new_v4().as_u64_pair();
    format!("page_{}_{}", index + 1, random)
}

/// Seconds since the epoch as ISO-8601, truncated to the millisecond.
fn iso_time(wall_time_secs: f64) -> String {
    DateTime::<Utc>::from_timestamp_millis((wall_time_secs * 1000.0).trunc() as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// First whitespace-separated token of a raw status line, and the one after.
fn status_line_tokens(raw: &str) -> (Option<&str>, Option<&str>) {
    let mut tokens = raw.split(' ');
    (tokens.next(), tokens.next())
}

fn strip_ipv6_brackets(addr: &str) -> &str {
    addr.strip_prefix('[')
        .and_then(|a| a.strip_suffix(']'))
        .unwrap_or(addr)
}

/// Turns one captured entry into a HAR entry, or `None` when it is not
/// export-eligible.
pub(crate) fn build_entry(pageref: &str, entry: &RequestEntry) -> Option<Entry> {
    if !entry.is_export_eligible() {
        return None;
    }
    let response = entry.response.as_ref()?;

    let mut method = entry.request.method.as_str();
    let mut url = entry.request.url.as_str();
    let mut protocol = response.protocol.as_deref();
    // WebSocket handshakes only expose the raw HTTP Upgrade exchange.
    if entry.is_websocket() {
        if let Some(raw) = response.request_headers_text.as_deref() {
            let (m, u) = status_line_tokens(raw);
            method = m.unwrap_or(method);
            url = u.unwrap_or(url);
        }
        if let Some(raw) = response.headers_text.as_deref() {
            protocol = status_line_tokens(raw).0.or(protocol);
        }
    }
    let http_version = protocol.filter(|p| !p.is_empty()).unwrap_or("unknown");

    let (time, timings) = match &entry.transport {
        Transport::WebSocket(frames) => timings::websocket(entry.timestamp, frames),
        Transport::Http => {
            let terminal = entry.terminal?.timestamp();
            timings::standard(entry.timestamp, terminal, response.timing.as_ref()?)
        }
    };

    let request_headers = response
        .request_headers
        .as_ref()
        .unwrap_or(&entry.request.headers);
    let blocks = headers::measure(
        &StatusLines {
            method,
            url,
            protocol: http_version,
            status: response.status,
            status_text: &response.status_text,
        },
        request_headers,
        &response.headers,
    );

    let payload = payload::compute(
        &payload::Sizes {
            response_headers_size: blocks.response_size,
            encoded_length: entry.encoded_length,
            decoded_length: entry.decoded_length,
            failed: entry.terminal.is_some_and(|t| t.is_failed()),
        },
        request_headers,
    );

    let post_data = query::parse_post_data(
        entry.request.post_data.as_deref(),
        request_headers.get_first("content-type"),
    );

    let (mime_type, resource_type, web_socket_messages) = match &entry.transport {
        Transport::WebSocket(frames) => (
            "x-unknown".to_string(),
            Some("websocket".to_string()),
            Some(
                frames
                    .iter()
                    .map(|f| WebSocketMessage {
                        direction: f.direction,
                        time: f.time,
                        opcode: f.opcode,
                        data: f.payload.clone(),
                    })
                    .collect(),
            ),
        ),
        Transport::Http => (
            response.mime_type.clone(),
            entry.resource_type.as_deref().map(str::to_lowercase),
            None,
        ),
    };

    Some(Entry {
        pageref: pageref.to_string(),
        started_date_time: iso_time(entry.wall_time),
        time,
        request: Request {
            method: method.to_string(),
            url: url.to_string(),
            http_version: http_version.to_string(),
            cookies: Vec::new(),
            headers: blocks.request,
            query_string: query::parse_query_string(url),
            headers_size: blocks.request_size,
            body_size: payload.request_body_size,
            post_data,
        },
        response: Response {
            status: response.status,
            status_text: response.status_text.clone(),
            http_version: http_version.to_string(),
            cookies: Vec::new(),
            headers: blocks.response,
            redirect_url: response
                .headers
                .get_first("location")
                .unwrap_or_default()
                .to_string(),
            headers_size: blocks.response_size,
            body_size: payload.response_body_size,
            transfer_size: payload.transfer_size,
            content: Content {
                size: entry.decoded_length,
                mime_type,
                compression: payload.compression,
                text: entry.body.as_ref().map(|b| b.text.clone()),
                encoding: entry
                    .body
                    .as_ref()
                    .filter(|b| b.base64)
                    .map(|_| "base64".to_string()),
            },
        },
        cache: Cache::default(),
        from_disk_cache: response.from_disk_cache,
        timings,
        server_ip_address: response
            .remote_ip_address
            .as_deref()
            .map(|a| strip_ipv6_brackets(a).to_string()),
        connection: response.connection_id.as_ref().map(|n| n.to_string()),
        initiator: Some(entry.initiator.clone()).filter(|i| !i.is_null()),
        priority: entry.effective_priority().map(String::from),
        web_socket_messages,
        resource_type,
    })
}
