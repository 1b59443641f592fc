//! HAR (HTTP Archive) synthesizer: turn capture sessions into a HAR 1.2 document.
//!
//! Synthesis is a pure function of the sessions. It never waits for
//! outstanding body fetches; entries whose body has not arrived are archived
//! without one. Entries that lack a response, or (for plain HTTP) a terminal
//! timestamp or timing block, are left out.

mod build;
pub mod document;
mod headers;
mod payload;
mod query;
mod timings;

pub use build::{build, SynthOptions, Synthesizer};
pub use document::Archive;
pub use headers::{header_pairs, is_plain_http};
pub use query::{parse_post_data, parse_query_string};
