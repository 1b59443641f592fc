//! Capture session: one monitored page and its request entries.

use std::collections::HashMap;

use super::RequestEntry;

/// The first top-level request of the page (initiator type "other").
#[derive(Debug, Clone, PartialEq)]
pub struct FirstRequest {
    pub id: String,
    /// Protocol timestamp, in milliseconds.
    pub timestamp_ms: f64,
    /// Wall-clock start, in seconds since the epoch.
    pub wall_time: f64,
    pub url: String,
}

/// Everything captured for one page.
///
/// Owned by the caller; [`crate::aggregator::apply`] mutates it in place and
/// [`crate::har::build`] reads it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Page URL, used as the archive page title.
    pub url: Option<String>,
    pub first_request: Option<FirstRequest>,
    /// `Page.domContentEventFired`, in milliseconds.
    pub dom_content_event_ms: Option<f64>,
    /// `Page.loadEventFired`, in milliseconds.
    pub load_event_ms: Option<f64>,
    pub entries: HashMap<String, RequestEntry>,
    /// Bodies expected from the body-fetch collaborator. Advisory only:
    /// nothing waits on it.
    pub pending_bodies: u32,
    /// Opaque caller annotation, exported as the page `_user` field.
    pub user: Option<serde_json::Value>,
}

impl Session {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: serde_json::Value) -> Self {
        self.user = Some(user);
        self
    }

    pub fn entry(&self, request_id: &str) -> Option<&RequestEntry> {
        self.entries.get(request_id)
    }

    /// Page URL, falling back to the first top-level request's URL.
    pub fn page_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or_else(|| self.first_request.as_ref().map(|f| f.url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_prefers_explicit_url() {
        let mut s = Session::default();
        assert!(s.page_url().is_none());
        s.first_request = Some(FirstRequest {
            id: "1".into(),
            timestamp_ms: 0.0,
            wall_time: 0.0,
            url: "https://first.example/".into(),
        });
        assert_eq!(s.page_url(), Some("https://first.example/"));
        s.url = Some("https://page.example/".into());
        assert_eq!(s.page_url(), Some("https://page.example/"));
    }
}
