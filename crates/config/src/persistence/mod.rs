//! Service file persistence.
//!
//! Responsibilities:
//! - Resolve the service file location (`path`).
//! - Parse and serialize the file text (`format`).
//! - Write the file atomically with read-only recovery (`write`).
//! - Expose service CRUD through `ServiceStore` (`store`).
//!
//! Does NOT handle:
//! - Presentation or editing UIs; they consume `ServiceStore` only.
//!
//! Invariants:
//! - The file on disk is the only state; each operation loads it fresh.
//! - Writes replace the whole file, never patch it in place.

pub(crate) mod format;
mod path;
mod store;
mod write;

pub use format::{parse_service_file, parse_str, render_service};
pub use path::{Platform, ResolverOptions, ensure_file_exists, resolve_service_file};
pub use store::ServiceStore;
