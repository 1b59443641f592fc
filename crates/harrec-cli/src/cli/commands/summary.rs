//! `harrec summary <LOG>` – replay one event log and list its requests.

use anyhow::Result;
use harrec_core::model::{RequestEntry, Terminal};
use std::path::Path;

use super::convert::replay_logs;

fn outcome(entry: &RequestEntry) -> &'static str {
    match entry.terminal {
        Some(Terminal::Finished(_)) => "done",
        Some(Terminal::Failed(_)) => "failed",
        None if entry.is_websocket() => "open",
        None => "pending",
    }
}

pub async fn run_summary(log: &Path) -> Result<()> {
    let Some((session, stats)) = replay_logs(&[log.to_path_buf()]).await?.pop() else {
        return Ok(());
    };

    println!(
        "{}: {} events ({} applied, {} ignored), {} bodies expected",
        log.display(),
        stats.events,
        stats.applied,
        stats.ignored,
        stats.bodies_expected
    );
    println!("Page: {}", session.page_url().unwrap_or("-"));
    if session.entries.is_empty() {
        println!("No requests captured.");
        return Ok(());
    }

    let mut rows: Vec<_> = session.entries.iter().collect();
    rows.sort_by(|a, b| a.1.timestamp.total_cmp(&b.1.timestamp));
    println!(
        "{:<28} {:<7} {:<7} {:<8} {:<6} {}",
        "ID", "METHOD", "STATUS", "STATE", "HAR", "URL"
    );
    for (id, entry) in rows {
        let method = if entry.is_websocket() {
            "WS"
        } else {
            entry.request.method.as_str()
        };
        let status = entry
            .response
            .as_ref()
            .map(|r| r.status.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<28} {:<7} {:<7} {:<8} {:<6} {}",
            id,
            method,
            status,
            outcome(entry),
            if entry.is_export_eligible() { "yes" } else { "no" },
            entry.request.url
        );
    }
    Ok(())
}
