//! Record model: the in-memory shape of a capture session.
//!
//! Passive data only. The aggregator writes it, the HAR synthesizer reads it.

mod entry;
mod headers;
mod protocol;
mod session;

pub use entry::{
    FailureInfo, FrameDirection, RequestEntry, ResponseBody, Terminal, Transport, WebSocketFrame,
};
pub use headers::{HeaderValue, Headers};
pub use protocol::{Request, ResourceTiming, Response};
pub use session::{FirstRequest, Session};
