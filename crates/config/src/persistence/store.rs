//! Service CRUD against the service file.
//!
//! Responsibilities:
//! - List, read, create, rename, remove, duplicate and update services.
//! - Rewrite the whole file after every mutation.
//!
//! Does NOT handle:
//! - Path precedence rules (see `path`).
//! - Text format details (see `format`).
//! - Permission recovery mechanics (see `write`).
//!
//! Invariants:
//! - Every call resolves the path and loads the file fresh; nothing is cached.
//! - A call that fails before saving leaves the file untouched.
//! - Names and keys are validated before loading, so a save never produces a
//!   file the parser rejects.
//! - Calls are not coordinated across processes: concurrent read-modify-write
//!   sequences can lose updates, the last writer wins.

use std::path::{Path, PathBuf};

use super::format::{parse_service_file, validate_key, validate_name, validate_section};
use super::path::{ResolverOptions, ensure_file_exists, resolve_service_file};
use super::write::save_with_permission_recovery;
use crate::error::{Result, ServiceError};
use crate::types::{Section, ServiceConfig};

#[derive(Debug, Clone)]
enum Location {
    Resolved(ResolverOptions),
    Fixed(PathBuf),
}

/// Entry point for reading and editing a service file.
///
/// The store only remembers *where* the file is. The file on disk is the
/// single source of truth between calls.
#[derive(Debug, Clone)]
pub struct ServiceStore {
    location: Location,
}

impl ServiceStore {
    /// Store whose location follows `PGSERVICEFILE`, `PGSYSCONFDIR` and the platform default.
    ///
    /// The environment is read once, here.
    pub fn from_env() -> Self {
        Self::with_options(ResolverOptions::from_env())
    }

    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            location: Location::Resolved(options),
        }
    }

    /// Store bound to an explicit file, bypassing resolution.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::Fixed(path.into()),
        }
    }

    /// Returns the service file path, creating an empty file there if asked to.
    pub fn resolve_path(&self, create_if_missing: bool) -> Result<PathBuf> {
        match &self.location {
            Location::Resolved(options) => resolve_service_file(options, create_if_missing),
            Location::Fixed(path) => {
                if create_if_missing {
                    ensure_file_exists(path)?;
                }
                Ok(path.clone())
            }
        }
    }

    /// Loads the whole file.
    ///
    /// # Errors
    /// `FileNotFound` if the file does not exist.
    pub fn load(&self) -> Result<ServiceConfig> {
        let path = self.resolve_path(false)?;
        load_from(&path)
    }

    /// Service names in file order, or case-insensitively sorted.
    pub fn list_names(&self, sorted: bool) -> Result<Vec<String>> {
        let config = self.load()?;
        Ok(if sorted {
            config.sorted_names()
        } else {
            config.names()
        })
    }

    /// Returns a copy of the settings of `name`.
    pub fn get(&self, name: &str) -> Result<Section> {
        let path = self.resolve_path(false)?;
        let config = load_from(&path)?;
        config
            .get(name)
            .cloned()
            .ok_or_else(|| service_not_found(name, &config, &path))
    }

    /// Adds a new service at the end of the file.
    ///
    /// Returns `false` without touching the file if `name` already exists.
    pub fn create(&self, name: &str, settings: &Section) -> Result<bool> {
        validate_name(name)?;
        validate_section(settings)?;
        let path = self.resolve_path(false)?;
        let mut config = load_from(&path)?;
        if config.contains(name) {
            tracing::debug!(service = %name, "Service already exists, not creating");
            return Ok(false);
        }

        config.insert(name, settings.clone());
        save(&path, &config)?;
        tracing::info!(service = %name, path = %path.display(), "Service created");
        Ok(true)
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.resolve_path(false)?;
        let mut config = load_from(&path)?;
        if config.remove(name).is_none() {
            return Err(service_not_found(name, &config, &path));
        }

        save(&path, &config)?;
        tracing::info!(service = %name, path = %path.display(), "Service removed");
        Ok(())
    }

    /// Moves the settings of `old_name` to `new_name`.
    ///
    /// The renamed service goes to the end of the file. An existing
    /// `new_name` is replaced in place, not merged.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<()> {
        validate_name(new_name)?;
        let path = self.resolve_path(false)?;
        let mut config = load_from(&path)?;
        let Some(settings) = config.remove(old_name) else {
            return Err(service_not_found(old_name, &config, &path));
        };

        config.insert(new_name, settings);
        save(&path, &config)?;
        tracing::info!(
            from = %old_name,
            to = %new_name,
            path = %path.display(),
            "Service renamed"
        );
        Ok(())
    }

    /// Copies all settings of `source` into `target`, creating or replacing it.
    pub fn duplicate(&self, source: &str, target: &str) -> Result<bool> {
        validate_name(target)?;
        let path = self.resolve_path(false)?;
        let mut config = load_from(&path)?;
        let Some(settings) = config.get(source).cloned() else {
            return Err(service_not_found(source, &config, &path));
        };

        config.insert(target, settings);
        save(&path, &config)?;
        tracing::info!(
            from = %source,
            to = %target,
            path = %path.display(),
            "Service duplicated"
        );
        Ok(true)
    }

    /// Sets one setting of an existing service.
    pub fn set_value(&self, name: &str, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.resolve_path(false)?;
        let mut config = load_from(&path)?;
        match config.get_mut(name) {
            Some(section) => {
                section.insert(key, value);
            }
            None => return Err(service_not_found(name, &config, &path)),
        }

        save(&path, &config)?;
        tracing::info!(service = %name, key = %key, path = %path.display(), "Service setting written");
        Ok(())
    }

    /// Replaces all settings of `name` with `settings`.
    ///
    /// With `create_if_not_found`, a missing service is appended and a missing
    /// file is created first.
    ///
    /// # Errors
    /// `InvalidName`/`InvalidKey` before anything is touched on disk.
    pub fn write_full(
        &self,
        name: &str,
        settings: &Section,
        create_if_not_found: bool,
    ) -> Result<Section> {
        validate_name(name)?;
        validate_section(settings)?;
        let path = self.resolve_path(create_if_not_found)?;
        let mut config = load_from(&path)?;
        if !config.contains(name) && !create_if_not_found {
            return Err(service_not_found(name, &config, &path));
        }

        config.insert(name, settings.clone());
        save(&path, &config)?;
        tracing::info!(service = %name, path = %path.display(), "Service written");
        Ok(settings.clone())
    }
}

fn load_from(path: &Path) -> Result<ServiceConfig> {
    let config = parse_service_file(path)?;
    tracing::debug!(
        path = %path.display(),
        services = config.len(),
        "Service file loaded"
    );
    Ok(config)
}

fn save(path: &Path, config: &ServiceConfig) -> Result<()> {
    save_with_permission_recovery(path, &config.to_string())
}

fn service_not_found(name: &str, config: &ServiceConfig, path: &Path) -> ServiceError {
    ServiceError::ServiceNotFound {
        name: name.to_string(),
        available: config.names(),
        path: path.to_path_buf(),
    }
}
