//! harrec core: record DevTools network events and synthesize HAR archives.
//!
//! [`aggregator::apply`] folds events into a [`model::Session`]; when the
//! capture stops, [`har::build`] turns one or more sessions into a HAR 1.2
//! [`har::Archive`] and [`export`] hands it to a sink.

pub mod config;
pub mod logging;

pub mod aggregator;
pub mod eventlog;
pub mod events;
pub mod export;
pub mod har;
pub mod model;
