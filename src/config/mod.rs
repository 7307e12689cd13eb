//! Configuration: connection parameters and translation policy.
//!
//! Configuration is an explicit immutable value handed to the layer at
//! construction; there is no process-wide state. Connection parameters
//! arrive either through the semicolon `key=value` mini-language (the
//! form embedded in table comments by the host) or from a TOML file.

use crate::models::TableSchema;
use serde::Deserialize;
use std::path::Path;

/// Default contact point when none is configured.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default native-transport port.
pub const DEFAULT_PORT: u16 = 9042;
/// Default keyspace when none is configured.
pub const DEFAULT_KEYSPACE: &str = "default";

/// Connection parameters for the backing cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Contact points.
    pub hosts: Vec<String>,
    /// Native transport port.
    pub port: u16,
    /// Keyspace the table lives in.
    pub keyspace: String,
    /// Remote table name override; `None` means "use the local name".
    pub table: Option<String>,
    /// Verbose statement logging.
    pub verbose: bool,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            hosts: vec![DEFAULT_HOST.to_string()],
            port: DEFAULT_PORT,
            keyspace: DEFAULT_KEYSPACE.to_string(),
            table: None,
            verbose: false,
        }
    }
}

impl ConnectionParams {
    /// Creates parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the semicolon-separated `key=value` mini-language.
    ///
    /// Recognized keys: `hosts` (comma-separated contact points),
    /// `keyspace`, `table`, `port` (integer), `verbose` (accepts `true`,
    /// `1`, `yes`). Whitespace around keys and values is trimmed; tokens
    /// without `=` and unknown keys are silently ignored; an unparseable
    /// `port` keeps the previous value.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let mut params = Self::default();
        params.apply(spec);
        params
    }

    /// Applies mini-language tokens on top of the current values.
    pub fn apply(&mut self, spec: &str) {
        for token in spec.split(';') {
            let Some((key, value)) = token.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "hosts" => {
                    self.hosts = value
                        .split(',')
                        .map(|h| h.trim().to_string())
                        .filter(|h| !h.is_empty())
                        .collect();
                }
                "keyspace" => self.keyspace = value.to_string(),
                "table" => self.table = Some(value.to_string()),
                "port" => {
                    if let Ok(port) = value.parse::<u16>() {
                        self.port = port;
                    }
                }
                "verbose" => {
                    self.verbose = matches!(value, "true" | "1" | "yes");
                }
                other => {
                    tracing::debug!(key = other, "ignoring unknown connection parameter");
                }
            }
        }
    }

    /// Contact points joined for the driver's comma-separated form.
    #[must_use]
    pub fn contact_points(&self) -> String {
        self.hosts.join(",")
    }
}

/// Policy and connection configuration for the translation layer.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Connection parameters.
    pub connection: ConnectionParams,
    /// Append `ALLOW FILTERING` to every SELECT. On by default: the layer
    /// declares no native range or secondary-index scan, so reads degrade
    /// to filtered scans. A caller that would rather fail fast on
    /// unindexed reads turns this off.
    pub allow_filtering: bool,
    /// Fail materialization on the first undecodable cell instead of
    /// null-filling it.
    pub strict_decoding: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslatorConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connection: ConnectionParams::default(),
            allow_filtering: true,
            strict_decoding: false,
        }
    }

    /// Sets the connection parameters.
    #[must_use]
    pub fn with_connection(mut self, connection: ConnectionParams) -> Self {
        self.connection = connection;
        self
    }

    /// Sets the `ALLOW FILTERING` policy.
    #[must_use]
    pub const fn with_allow_filtering(mut self, allow: bool) -> Self {
        self.allow_filtering = allow;
        self
    }

    /// Sets strict decoding.
    #[must_use]
    pub const fn with_strict_decoding(mut self, strict: bool) -> Self {
        self.strict_decoding = strict;
        self
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connection`] if the file cannot be read or
    /// parsed; a missing or unreadable config is a setup problem the
    /// caller must surface before any statement is issued.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| crate::Error::Connection {
            cause: format!("cannot read config file {}: {e}", path.display()),
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| crate::Error::Connection {
            cause: format!("cannot parse config file {}: {e}", path.display()),
        })?;

        Ok(Self::from_config_file(file))
    }

    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::new();

        if let Some(conn) = file.connection {
            if let Some(hosts) = conn.hosts {
                config.connection.hosts = hosts;
            }
            if let Some(port) = conn.port {
                config.connection.port = port;
            }
            if let Some(keyspace) = conn.keyspace {
                config.connection.keyspace = keyspace;
            }
            config.connection.table = conn.table;
            if let Some(verbose) = conn.verbose {
                config.connection.verbose = verbose;
            }
        }
        if let Some(allow) = file.allow_filtering {
            config.allow_filtering = allow;
        }
        if let Some(strict) = file.strict_decoding {
            config.strict_decoding = strict;
        }

        config
    }

    /// Effective remote table name for a schema: the configured override,
    /// falling back to the schema's own name.
    #[must_use]
    pub fn remote_table<'a>(&'a self, schema: &'a TableSchema) -> &'a str {
        self.connection.table.as_deref().unwrap_or(&schema.table)
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    connection: Option<ConfigFileConnection>,
    allow_filtering: Option<bool>,
    strict_decoding: Option<bool>,
}

/// Connection section in the config file.
#[derive(Debug, Deserialize, Default)]
struct ConfigFileConnection {
    hosts: Option<Vec<String>>,
    port: Option<u16>,
    keyspace: Option<String>,
    table: Option<String>,
    verbose: Option<bool>,
}
