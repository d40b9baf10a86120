//! Known libpq connection settings.
//!
//! Responsibilities:
//! - Describe the connection keywords editors offer for manual addition.
//! - Provide the default settings for a freshly created service.
//!
//! Does NOT handle:
//! - Validating values written to the file; the store accepts any string.
//!
//! See <https://www.postgresql.org/docs/current/libpq-connect.html#LIBPQ-PARAMKEYWORDS>.

use std::fmt;
use std::str::FromStr;

use crate::types::Section;

/// `sslmode` values accepted by libpq.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    Disable,
    Allow,
    #[default]
    Prefer,
    Require,
    VerifyCa,
    VerifyFull,
}

impl SslMode {
    pub const ALL: [SslMode; 6] = [
        SslMode::Disable,
        SslMode::Allow,
        SslMode::Prefer,
        SslMode::Require,
        SslMode::VerifyCa,
        SslMode::VerifyFull,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sslmode '{0}'")]
pub struct UnknownSslMode(pub String);

impl FromStr for SslMode {
    type Err = UnknownSslMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SslMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownSslMode(s.to_string()))
    }
}

/// How an editor should present a setting's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Plain,
    /// One of a fixed set of values.
    Choice(&'static [&'static str]),
    /// A path, with a file dialog filter and title.
    File {
        filter: &'static str,
        title: &'static str,
    },
    /// Sensitive; should be masked.
    Password,
}

/// Catalogue entry for one connection keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingDefinition {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
    pub kind: SettingKind,
}

const SSL_MODE_VALUES: &[&str] = &[
    "disable",
    "allow",
    "prefer",
    "require",
    "verify-ca",
    "verify-full",
];

/// Settings offered for manual addition, in display order.
pub const SERVICE_SETTINGS: &[SettingDefinition] = &[
    SettingDefinition {
        key: "host",
        default: "localhost",
        description: "Name of host to connect to.",
        kind: SettingKind::Plain,
    },
    SettingDefinition {
        key: "port",
        default: "5432",
        description: "Port number to connect to at the server host.",
        kind: SettingKind::Plain,
    },
    SettingDefinition {
        key: "dbname",
        default: "test",
        description: "The database name.",
        kind: SettingKind::Plain,
    },
    SettingDefinition {
        key: "user",
        default: "",
        description: "PostgreSQL user name to connect as.",
        kind: SettingKind::Plain,
    },
    SettingDefinition {
        key: "password",
        default: "",
        description: "Password to be used if the server demands password authentication.",
        kind: SettingKind::Password,
    },
    SettingDefinition {
        key: "passfile",
        default: "",
        description: "Specifies the name of the file used to store passwords.",
        kind: SettingKind::File {
            filter: "Password file (*.pgpass *.conf)",
            title: "Select a .pgpass or .conf file",
        },
    },
    SettingDefinition {
        key: "sslmode",
        default: "prefer",
        description: "This option determines whether or with what priority a secure SSL \
                      TCP/IP connection will be negotiated with the server.",
        kind: SettingKind::Choice(SSL_MODE_VALUES),
    },
    SettingDefinition {
        key: "sslrootcert",
        default: "",
        description: "Name of a file containing SSL certificate authority (CA) certificate(s).\n\
                      If the file exists, the server's certificate will be verified to be signed \
                      by one of these authorities.",
        kind: SettingKind::File {
            filter: "SSL crt files (*.crt)",
            title: "Select the file pointing to SSL CA certificate(s)",
        },
    },
    SettingDefinition {
        key: "sslcert",
        default: "",
        description: "Specifies the file name of the client SSL certificate, replacing \
                      the default ~/.postgresql/postgresql.crt.",
        kind: SettingKind::File {
            filter: "SSL crt files (*.crt)",
            title: "Select the client SSL certificate file",
        },
    },
    SettingDefinition {
        key: "sslkey",
        default: "",
        description: "Specifies the location for the secret key used for the client certificate.",
        kind: SettingKind::File {
            filter: "SSL secret key files (*.key)",
            title: "Select the secret key file",
        },
    },
];

pub fn setting_definition(key: &str) -> Option<&'static SettingDefinition> {
    SERVICE_SETTINGS.iter().find(|def| def.key == key)
}

/// Settings used to initialize a new service.
pub fn settings_template() -> Section {
    [("host", "localhost"), ("port", "5432"), ("dbname", "test")]
        .into_iter()
        .collect()
}
