//! Captured event streams stored as JSON Lines.
//!
//! One `{"method": ..., "params": {...}}` object per line, in arrival order,
//! as forwarded by the instrumentation host. Body fetch results are recorded
//! inline with the `Network.getResponseBody` method.

use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

use crate::aggregator::{self, Applied};
use crate::events::RawEvent;
use crate::model::Session;

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("read event log: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Counters from replaying one log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub applied: usize,
    pub ignored: usize,
    /// `loadingFinished` events, i.e. bodies a live collaborator would fetch.
    pub bodies_expected: usize,
}

impl ReplayStats {
    fn record(&mut self, applied: &Applied) {
        self.events += 1;
        match applied {
            Applied::Ignored => self.ignored += 1,
            Applied::Updated => self.applied += 1,
            Applied::BodyExpected(_) => {
                self.applied += 1;
                self.bodies_expected += 1;
            }
        }
    }
}

/// Parses every non-blank line of `reader` into a raw event.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<RawEvent>, EventLogError> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| EventLogError::Line {
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Applies every event of `reader` to `session`, in order.
pub fn replay<R: BufRead>(reader: R, session: &mut Session) -> Result<ReplayStats, EventLogError> {
    let mut stats = ReplayStats::default();
    for event in read_events(reader)? {
        let applied = aggregator::apply_raw(session, &event.method, event.params);
        stats.record(&applied);
    }
    tracing::debug!(?stats, entries = session.entries.len(), "replayed event log");
    Ok(stats)
}

/// Replays the log at `path` into `session`.
pub fn replay_path(path: &Path, session: &mut Session) -> Result<ReplayStats> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open event log: {}", path.display()))?;
    replay(std::io::BufReader::new(file), session)
        .with_context(|| format!("replay event log: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LOG: &str = r#"{"method":"Network.requestWillBeSent","params":{"requestId":"1","timestamp":1.0,"wallTime":1700000000.0,"initiator":{"type":"other"},"request":{"url":"https://example.com/","method":"GET","headers":{}}}}

{"method":"Network.loadingFinished","params":{"requestId":"1","timestamp":1.2,"encodedDataLength":10}}
{"method":"Runtime.executionContextCreated","params":{}}
{"method":"Network.dataReceived","params":{"requestId":"nope","dataLength":3}}
"#;

    #[test]
    fn replay_counts_events() {
        let mut session = Session::default();
        let stats = replay(LOG.as_bytes(), &mut session).unwrap();
        assert_eq!(
            stats,
            ReplayStats {
                events: 4,
                applied: 2,
                ignored: 2,
                bodies_expected: 1,
            }
        );
        assert_eq!(session.entries.len(), 1);
        assert_eq!(session.pending_bodies, 1);
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let input = "{\"method\":\"Page.loadEventFired\",\"params\":{\"timestamp\":1}}\n{oops\n";
        let err = read_events(input.as_bytes()).unwrap_err();
        match err {
            EventLogError::Line { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Line error, got {other:?}"),
        }
    }

    #[test]
    fn replay_path_reads_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(LOG.as_bytes()).unwrap();
        f.flush().unwrap();
        let mut session = Session::default();
        let stats = replay_path(f.path(), &mut session).unwrap();
        assert_eq!(stats.events, 4);
        assert!(replay_path(Path::new("/nonexistent/events.jsonl"), &mut session).is_err());
    }
}
