//! PostgreSQL connection service file management.
//!
//! This crate locates, parses and edits `pg_service.conf` files: named
//! services, each a flat set of `key=value` connection settings.

pub mod constants;
mod env;
mod error;
pub mod persistence;
pub mod settings;
pub mod types;

pub use env::env_var_or_none;
pub use error::{Result, ServiceError};
pub use persistence::{
    Platform, ResolverOptions, ServiceStore, ensure_file_exists, parse_service_file, parse_str,
    render_service, resolve_service_file,
};
pub use settings::{SERVICE_SETTINGS, SettingDefinition, SettingKind, SslMode, settings_template};
pub use types::{Section, ServiceConfig};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
