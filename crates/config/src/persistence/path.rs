//! Service file location.
//!
//! Responsibilities:
//! - Determine the service file path from explicit options, environment and platform.
//! - Create the file (and its parent directories) on request.
//!
//! Does NOT handle:
//! - Reading or parsing the file (see `format`).
//! - Writing file content (see `write`).
//!
//! Invariants:
//! - Precedence is `PGSERVICEFILE` > `PGSYSCONFDIR` > platform default.
//! - No existence check unless creation is requested.
//! - Creation is idempotent: an existing file is never touched.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::constants::{
    ENV_APP_DATA, ENV_SERVICE_FILE, ENV_SYSCONF_DIR, SYSCONF_FILE_NAME, USER_FILE_NAME,
    WINDOWS_APP_DIR,
};
use crate::env::env_var_or_none;
use crate::error::{Result, ServiceError};

/// Platform family deciding the default location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    /// Linux, macOS and the other Unix-likes.
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Inputs to service file resolution.
///
/// Built from the process environment with [`ResolverOptions::from_env`], or
/// by hand so callers (and tests) never have to mutate the real environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Service file override (`PGSERVICEFILE`), used verbatim.
    pub service_file: Option<PathBuf>,
    /// Directory containing `pg_service.conf` (`PGSYSCONFDIR`).
    pub sysconf_dir: Option<PathBuf>,
    /// Roaming application data directory (`APPDATA`), Windows only.
    pub app_data: Option<PathBuf>,
    /// Home directory for the Unix default.
    pub home_dir: Option<PathBuf>,
    pub platform: Platform,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            service_file: None,
            sysconf_dir: None,
            app_data: None,
            home_dir: None,
            platform: Platform::current(),
        }
    }
}

impl ResolverOptions {
    /// Reads `PGSERVICEFILE`, `PGSYSCONFDIR` and `APPDATA`, and looks up the home directory.
    ///
    /// Empty or whitespace-only variables count as unset.
    pub fn from_env() -> Self {
        Self {
            service_file: env_var_or_none(ENV_SERVICE_FILE).map(PathBuf::from),
            sysconf_dir: env_var_or_none(ENV_SYSCONF_DIR).map(PathBuf::from),
            app_data: env_var_or_none(ENV_APP_DATA).map(PathBuf::from),
            home_dir: directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
            platform: Platform::current(),
        }
    }

    pub fn with_service_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.service_file = Some(path.into());
        self
    }

    pub fn with_sysconf_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sysconf_dir = Some(dir.into());
        self
    }

    pub fn with_app_data(mut self, dir: impl Into<PathBuf>) -> Self {
        self.app_data = Some(dir.into());
        self
    }

    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Path the options point at, without touching the filesystem.
    pub fn service_file_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.service_file {
            return Ok(path.clone());
        }
        if let Some(dir) = &self.sysconf_dir {
            return Ok(dir.join(SYSCONF_FILE_NAME));
        }
        match self.platform {
            Platform::Windows => self
                .app_data
                .as_ref()
                .map(|dir| dir.join(WINDOWS_APP_DIR).join(USER_FILE_NAME))
                .ok_or_else(|| {
                    ServiceError::LocationUnavailable(format!("{ENV_APP_DATA} is not set"))
                }),
            Platform::Unix => self
                .home_dir
                .as_ref()
                .map(|home| home.join(USER_FILE_NAME))
                .ok_or_else(|| {
                    ServiceError::LocationUnavailable("home directory is unknown".to_string())
                }),
        }
    }
}

/// Resolves the service file path, optionally creating an empty file there.
pub fn resolve_service_file(options: &ResolverOptions, create_if_missing: bool) -> Result<PathBuf> {
    let path = options.service_file_path()?;
    if create_if_missing {
        ensure_file_exists(&path)?;
    }
    Ok(path)
}

/// Creates missing parent directories and an empty file at `path`.
///
/// Does nothing when the file already exists.
pub fn ensure_file_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ServiceError::from_io(parent, e))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ServiceError::from_io(path, e))?;

    tracing::debug!(path = %path.display(), "Created empty service file");
    Ok(())
}
