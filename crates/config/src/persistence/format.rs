//! Text format of the service file.
//!
//! Responsibilities:
//! - Parse file text into a `ServiceConfig`.
//! - Serialize sections to the canonical `[name]` / `key=value` layout.
//!
//! Does NOT handle:
//! - Locating the file (see `path`).
//! - Writing to disk (see `write`).
//!
//! Invariants:
//! - No interpolation: `%`, `$`, `#` and `;` inside values are literal.
//! - Output never has whitespace around `=`.
//! - Every section is followed by one blank line on disk.
//! - Multi-line values are written as tab-indented continuation lines. Blank
//!   and comment-like lines inside a value survive a round trip; leading and
//!   trailing whitespace of each line does not.
//! - Names and keys accepted by `validate_name` / `validate_key` always parse
//!   back to themselves.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, ServiceError};
use crate::types::{Section, ServiceConfig};

/// Reads and parses the service file at `path`.
///
/// # Errors
/// `FileNotFound` when the file does not exist, `Parse` when it is malformed,
/// `PermissionDenied`/`Io` for other read failures.
pub fn parse_service_file(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ServiceError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ServiceError::from_io(path, e)
        }
    })?;

    parse_str(&content, path)
}

/// Parses service file text. `path` is only used for error reporting.
pub fn parse_str(content: &str, path: &Path) -> Result<ServiceConfig> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let parse_error = |line: usize, message: &str| ServiceError::Parse {
        path: path.to_path_buf(),
        line,
        message: message.to_string(),
    };

    let mut config = ServiceConfig::new();
    let mut current: Option<(String, Section)> = None;
    // Key and indentation of the last setting, for continuation lines.
    let mut last_setting: Option<(String, usize)> = None;
    // Blank lines seen since the last value line. They belong to the value
    // only if another continuation line follows.
    let mut pending_blank_lines = 0;

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            if last_setting.is_some() {
                pending_blank_lines += 1;
            }
            continue;
        }

        // Continuation lines are checked before comments: an indented `#` or
        // `;` under an open setting is part of its value.
        let indent = raw.len() - raw.trim_start().len();
        if let Some((_, section)) = current.as_mut()
            && let Some((key, key_indent)) = &last_setting
            && indent > *key_indent
        {
            let mut value = section.get(key).unwrap_or_default().to_string();
            for _ in 0..=pending_blank_lines {
                value.push('\n');
            }
            value.push_str(trimmed);
            section.insert(key.clone(), value);
            pending_blank_lines = 0;
            continue;
        }
        pending_blank_lines = 0;

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() >= 2 {
            let name = &trimmed[1..trimmed.len() - 1];
            if name.is_empty() {
                return Err(parse_error(line_no, "empty section name"));
            }
            if let Some((done, section)) = current.take() {
                config.insert(done, section);
            }
            if config.contains(name) {
                return Err(parse_error(
                    line_no,
                    &format!("duplicate section '{name}'"),
                ));
            }
            current = Some((name.to_string(), Section::new()));
            last_setting = None;
            continue;
        }

        let Some(delimiter) = trimmed.find(['=', ':']) else {
            return Err(parse_error(
                line_no,
                "expected a [section] header or a key=value setting",
            ));
        };
        let key = trimmed[..delimiter].trim();
        let value = trimmed[delimiter + 1..].trim();

        let Some((name, section)) = current.as_mut() else {
            return Err(parse_error(line_no, "setting found before any [section] header"));
        };
        if key.is_empty() {
            return Err(parse_error(line_no, "empty setting key"));
        }
        if section.contains_key(key) {
            return Err(parse_error(
                line_no,
                &format!("duplicate key '{key}' in section '{name}'"),
            ));
        }
        section.insert(key, value);
        last_setting = Some((key.to_string(), indent));
    }

    if let Some((name, section)) = current {
        config.insert(name, section);
    }

    Ok(config)
}

/// Rejects service names that cannot be written as a `[name]` header.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains(['\n', '\r']) {
        "name contains a line break"
    } else {
        return Ok(());
    };

    Err(ServiceError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Rejects setting keys that would not parse back as the same key.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if key.contains(['\n', '\r']) {
        "key contains a line break"
    } else if key.contains(['=', ':']) {
        "key contains '=' or ':'"
    } else if key.trim() != key {
        "key has leading or trailing whitespace"
    } else if key.starts_with(['#', ';', '[']) {
        "key starts with a comment or section marker"
    } else {
        return Ok(());
    };

    Err(ServiceError::InvalidKey {
        key: key.to_string(),
        reason,
    })
}

pub(crate) fn validate_section(settings: &Section) -> Result<()> {
    settings.keys().try_for_each(validate_key)
}

/// Writes one section followed by its blank separator line.
pub(crate) fn write_section<W: fmt::Write>(
    out: &mut W,
    name: &str,
    section: &Section,
) -> fmt::Result {
    writeln!(out, "[{name}]")?;
    for (key, value) in section.iter() {
        writeln!(out, "{key}={}", value.replace('\n', "\n\t"))?;
    }
    writeln!(out)
}

/// Renders a single service as canonical text without touching the disk.
///
/// Used to preview or export settings, e.g. to a clipboard.
pub fn render_service(name: &str, settings: &Section) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_section(&mut out, name, settings);
    out.trim().to_string()
}
