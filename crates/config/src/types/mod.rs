//! Data model for the service file.
//!
//! Responsibilities:
//! - Define `Section` (one service's ordered settings).
//! - Define `ServiceConfig` (the ordered set of named sections in one file).
//!
//! Does NOT handle:
//! - Parsing or serializing file text (see `persistence::format`).
//! - Locating or writing the file (see `persistence`).
//!
//! Invariants:
//! - Both maps preserve insertion order and reject duplicate keys by replacement.
//! - All setting values are plain strings; nothing is interpolated or coerced.

mod section;
mod service_config;

pub use section::Section;
pub use service_config::ServiceConfig;
