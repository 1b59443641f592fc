//! Integration test: replay a captured DevTools event log and check the HAR.
//!
//! The fixture covers a redirect chain, an h2 document with a fetched body, a
//! failed HTTP/1.1 form POST, a WebSocket session, a data URI, a request that
//! never completes, and events for unknown ids.

use std::path::PathBuf;

use harrec_core::aggregator::redirect_key;
use harrec_core::eventlog::{self, ReplayStats};
use harrec_core::export::{self, DirectorySink};
use harrec_core::har::{self, SynthOptions, Synthesizer};
use harrec_core::model::{Session, Terminal};
use serde_json::{json, Value};
use tempfile::tempdir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/news.example.jsonl")
}

fn replayed() -> (Session, ReplayStats) {
    let mut session = Session::default();
    let stats = eventlog::replay_path(&fixture(), &mut session).expect("replay fixture");
    (session, stats)
}

fn archive_json(session: Session) -> Value {
    serde_json::to_value(har::build(&[session])).unwrap()
}

fn entry<'a>(har: &'a Value, url: &str) -> &'a Value {
    har["log"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["request"]["url"] == url)
        .unwrap_or_else(|| panic!("no entry for {url}"))
}

#[test]
fn replay_stats_and_session_state() {
    let (session, stats) = replayed();
    assert_eq!(stats.events, 21);
    assert_eq!(stats.ignored, 3);
    assert_eq!(stats.bodies_expected, 1);
    assert_eq!(session.pending_bodies, 0);

    // Two hops of 100.1, the XHR, the WebSocket and the unfinished fetch.
    assert_eq!(session.entries.len(), 5);
    let hop = session.entry(&redirect_key("100.1", 500.05)).unwrap();
    assert_eq!(hop.terminal, Some(Terminal::Finished(500.05)));
    assert_eq!(hop.request.url, "http://news.example/");
    let doc = session.entry("100.1").unwrap();
    assert_eq!(doc.terminal, Some(Terminal::Finished(500.3)));
    assert_eq!(doc.decoded_length, 6000);

    let first = session.first_request.as_ref().unwrap();
    assert_eq!(first.id, "100.1");
    assert_eq!(session.page_url(), Some("http://news.example/"));
    assert!(session.dom_content_event_ms.is_some());
    assert!(session.load_event_ms.is_some());
}

#[test]
fn only_export_eligible_entries_are_archived() {
    let (session, _) = replayed();
    let har = archive_json(session);
    let urls: Vec<&str> = har["log"]["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["request"]["url"].as_str().unwrap())
        .collect();
    assert_eq!(
        urls,
        [
            "http://news.example/",
            "https://news.example/",
            "https://news.example/api/track?e=view&e=scroll&u=",
            "/live",
        ]
    );
}

#[test]
fn entry_order_is_stable_across_replays() {
    let order = |har: &Value| -> Vec<String> {
        har["log"]["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["startedDateTime"].as_str().unwrap().to_string())
            .collect()
    };
    let first = order(&archive_json(replayed().0));
    let mut sorted = first.clone();
    sorted.sort();
    assert_eq!(first, sorted);
    for _ in 0..10 {
        assert_eq!(order(&archive_json(replayed().0)), first);
    }
}

#[test]
fn redirect_hop_entry() {
    let (session, _) = replayed();
    let har = archive_json(session);
    let hop = entry(&har, "http://news.example/");
    assert_eq!(hop["startedDateTime"], "2023-11-14T22:13:20.000Z");
    assert_eq!(hop["response"]["status"], 301);
    assert_eq!(hop["response"]["redirectURL"], "https://news.example/");
    assert_eq!(hop["request"]["httpVersion"], "http/1.1");

    let expected_headers = "http/1.1 301 Moved Permanently\r\n\
                            Location: https://news.example/\r\n\
                            Content-Length: 0\r\n\r\n";
    assert_eq!(hop["response"]["headersSize"], expected_headers.len() as i64);
    assert_eq!(hop["response"]["bodySize"], 97 - expected_headers.len() as i64);
    assert_eq!(hop["response"]["_transferSize"], 97);
    assert_eq!(hop["serverIPAddress"], "203.0.113.7");
    assert!((hop["time"].as_f64().unwrap() - 50.0).abs() < 1e-6);
}

#[test]
fn h2_document_entry() {
    let (session, _) = replayed();
    let har = archive_json(session);
    let doc = entry(&har, "https://news.example/");
    assert_eq!(doc["request"]["headersSize"], -1);
    assert_eq!(doc["response"]["headersSize"], -1);
    assert_eq!(doc["response"]["bodySize"], -1);
    assert!(doc["response"]["content"].get("compression").is_none());
    assert_eq!(doc["response"]["_transferSize"], 1980);
    assert_eq!(doc["response"]["content"]["size"], 6000);
    assert_eq!(doc["response"]["content"]["encoding"], "base64");
    assert_eq!(doc["response"]["content"]["text"], "PGh0bWw+PC9odG1sPg==");
    assert_eq!(doc["serverIPAddress"], "2001:db8::7");
    assert_eq!(doc["connection"], "9");
    assert_eq!(doc["_priority"], "VeryHigh");
    assert_eq!(doc["_resourceType"], "document");
    assert_eq!(doc["_fromDiskCache"], false);
    assert_eq!(doc["timings"]["ssl"], 22.0);
}

#[test]
fn failed_form_post_entry() {
    let (session, _) = replayed();
    let har = archive_json(session);
    let xhr = entry(&har, "https://news.example/api/track?e=view&e=scroll&u=");
    assert_eq!(
        xhr["request"]["queryString"],
        json!([{"e": "view"}, {"e": "scroll"}, {"u": ""}])
    );
    assert_eq!(xhr["request"]["bodySize"], 11);
    assert_eq!(
        xhr["request"]["postData"]["params"],
        json!([{"name": "id", "value": "7"}, {"name": "tag", "value": "a b"}])
    );
    assert_eq!(xhr["request"]["postData"]["text"], "id=7&tag=a+b");
    assert_eq!(xhr["response"]["bodySize"], 0);
    assert_eq!(xhr["response"]["content"]["compression"], 0);
    assert_eq!(xhr["response"]["_transferSize"], xhr["response"]["headersSize"]);
    assert_eq!(xhr["_priority"], "Low");
    assert_eq!(xhr["_resourceType"], "xhr");
    assert_eq!(xhr["timings"]["dns"], -1.0);
    assert_eq!(xhr["timings"]["connect"], -1.0);
}

#[test]
fn websocket_entry() {
    let (session, _) = replayed();
    let har = archive_json(session);
    let ws = entry(&har, "/live");
    assert_eq!(ws["request"]["method"], "GET");
    assert_eq!(ws["request"]["httpVersion"], "HTTP/1.1");
    assert_eq!(ws["response"]["status"], 101);
    assert_eq!(ws["response"]["content"]["mimeType"], "x-unknown");
    assert_eq!(ws["_resourceType"], "websocket");
    let time = ws["time"].as_f64().unwrap();
    assert!((time - 1000.0).abs() < 1e-6);
    assert_eq!(ws["timings"]["wait"], ws["time"]);
    assert_eq!(ws["timings"]["send"], 0.0);
    assert_eq!(ws["timings"]["receive"], -1.0);
    assert_eq!(
        ws["_webSocketMessages"],
        json!([
            {"type": "send", "time": 500.6, "opcode": 1, "data": "subscribe"},
            {"type": "receive", "time": 501.5, "opcode": 1, "data": "headline"}
        ])
    );
}

#[test]
fn derived_page_timings_and_export() {
    let (session, _) = replayed();
    let page_url = session.page_url().map(String::from);
    let synth = Synthesizer::new(SynthOptions {
        derive_page_timings: true,
        ..SynthOptions::default()
    });
    let archive = synth.build(&[session]);
    let page = &archive.log.pages[0];
    assert_eq!(page.started_date_time, "2023-11-14T22:13:20.000Z");
    assert!((page.page_timings.on_content_load - 400.0).abs() < 1e-6);
    assert!((page.page_timings.on_load - 1000.0).abs() < 1e-6);

    let dir = tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    let name = export::export_archive(&mut sink, &archive, page_url.as_deref(), true).unwrap();
    assert_eq!(name, "news.example.har");
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(name)).unwrap()).unwrap();
    assert_eq!(written["log"]["entries"].as_array().unwrap().len(), 4);
    assert_eq!(written["log"]["pages"][0]["id"], page.id.as_str());
}
