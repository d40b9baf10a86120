//! Centralized constants for the service file crate.
//!
//! This module contains the environment variable names, file names and
//! permission bits used across modules to avoid string duplication.

// =============================================================================
// Environment Variables
// =============================================================================

/// Absolute override of the service file path, used verbatim.
pub const ENV_SERVICE_FILE: &str = "PGSERVICEFILE";

/// Directory holding the system-wide `pg_service.conf`.
pub const ENV_SYSCONF_DIR: &str = "PGSYSCONFDIR";

/// Windows roaming application data directory.
pub const ENV_APP_DATA: &str = "APPDATA";

// =============================================================================
// File Names
// =============================================================================

/// File name looked up inside `PGSYSCONFDIR`.
pub const SYSCONF_FILE_NAME: &str = "pg_service.conf";

/// Per-user file name (hidden) used by the platform defaults.
pub const USER_FILE_NAME: &str = ".pg_service.conf";

/// Sub-directory of `APPDATA` holding the per-user file on Windows.
pub const WINDOWS_APP_DIR: &str = "postgresql";

/// Suffix appended to the service file name for the atomic-write temp file.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";

// =============================================================================
// Permissions
// =============================================================================

/// Write bits for owner, group and other (`S_IWUSR | S_IWGRP | S_IWOTH`).
pub const WRITE_ALL_MODE: u32 = 0o222;
