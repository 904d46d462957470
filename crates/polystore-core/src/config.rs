//! Connection configuration resolver
//!
//! Classifies a flat key/value configuration into an immutable
//! [`ConnectionDescriptor`] exactly once at startup. The entire driver
//! dispatch is a single prefix check on the graph URI: a recognized
//! remote-protocol prefix selects [`Scheme::RemoteProtocol`], anything else
//! falls back to [`Scheme::Embedded`] with a fixed local storage path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::{io_error, PsError, PsErrorKind, Result};

/// Recognized configuration keys
pub mod keys {
    pub const GRAPH_URI: &str = "graph.uri";
    pub const GRAPH_USERNAME: &str = "graph.username";
    pub const GRAPH_PASSWORD: &str = "graph.password";
    pub const GRAPH_ENCRYPTION_LEVEL: &str = "graph.encryption.level";
    pub const GRAPH_POOL_SIZE: &str = "graph.pool.size";
    pub const GRAPH_VERIFY_CONNECTION: &str = "graph.verify.connection";
    pub const GRAPH_INDEX_DUMP_DIR: &str = "graph.indexes.dump.dir";
    pub const GRAPH_INDEX_DUMP_FILENAME: &str = "graph.indexes.dump.filename";
    pub const PROFILE: &str = "profile";
}

/// URI prefix that selects the remote binary protocol
pub const REMOTE_PROTOCOL_PREFIX: &str = "bolt:";

/// Default connection pool size for the remote driver
pub const DEFAULT_POOL_SIZE: u32 = 50;

/// Default index dump location
pub const DEFAULT_DUMP_DIR: &str = "target";
pub const DEFAULT_DUMP_FILENAME: &str = "generated_indexes.cypher";

/// Flat key/value configuration space
///
/// Values arrive as raw strings (properties file, environment); typing
/// happens at resolve time.
#[derive(Debug, Clone, Default)]
pub struct RawConfig {
    values: BTreeMap<String, String>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw value, replacing any previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Get a raw value; empty strings count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Load from a properties-style file: `key=value` lines, `#` comments
    pub fn from_properties_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| io_error("read_properties", e))?;
        let mut config = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(PsError::new(PsErrorKind::Configuration)
                    .with_op("parse_properties")
                    .with_message(format!("line is not key=value: '{}'", line)));
            };
            config.set(key.trim(), value.trim());
        }
        Ok(config)
    }

    /// Overlay values from process environment
    ///
    /// `POLYSTORE_GRAPH_URI` overrides `graph.uri`, and so on for every
    /// recognized key.
    pub fn overlay_env(&mut self) -> &mut Self {
        for key in [
            keys::GRAPH_URI,
            keys::GRAPH_USERNAME,
            keys::GRAPH_PASSWORD,
            keys::GRAPH_ENCRYPTION_LEVEL,
            keys::GRAPH_POOL_SIZE,
            keys::GRAPH_VERIFY_CONNECTION,
            keys::GRAPH_INDEX_DUMP_DIR,
            keys::GRAPH_INDEX_DUMP_FILENAME,
            keys::PROFILE,
        ] {
            let env_name = format!("POLYSTORE_{}", key.replace('.', "_").to_uppercase());
            if let Ok(value) = std::env::var(&env_name) {
                if !value.is_empty() {
                    self.set(key, value);
                }
            }
        }
        self
    }
}

/// Driver strategy, decided once at resolve time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Graph store runs in-process against local storage
    Embedded,
    /// Graph store is reached over the binary network protocol
    RemoteProtocol,
}

/// Transport encryption requirement for the remote protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncryptionLevel {
    #[default]
    None,
    Required,
}

impl EncryptionLevel {
    fn parse(token: &str) -> Result<Self> {
        match token {
            "NONE" => Ok(Self::None),
            "REQUIRED" => Ok(Self::Required),
            other => Err(PsError::new(PsErrorKind::Configuration)
                .with_op("resolve")
                .with_message(format!(
                    "unrecognized encryption level '{}' (expected NONE or REQUIRED)",
                    other
                ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Required => "REQUIRED",
        }
    }
}

/// Active profile selecting which descriptor defaults apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    fn parse(token: &str) -> Result<Self> {
        match token {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(PsError::new(PsErrorKind::Configuration)
                .with_op("resolve")
                .with_message(format!(
                    "unrecognized profile '{}' (expected development or production)",
                    other
                ))),
        }
    }

    /// Default embedded storage location for this profile
    fn default_storage_dir(&self) -> PathBuf {
        match self {
            Self::Development => PathBuf::from("target/var/graphdb"),
            Self::Production => PathBuf::from("var/graphdb"),
        }
    }
}

/// Remote store credentials
///
/// Debug output reports presence only; the password value never reaches
/// logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<set>")
            .finish()
    }
}

/// Immutable, fully-populated connection descriptor
///
/// Produced once by [`resolve`] at startup; every field absent from the raw
/// configuration takes its documented default, so the descriptor is never
/// partially populated.
#[derive(Debug, Clone)]
pub struct ConnectionDescriptor {
    pub scheme: Scheme,
    pub uri: Option<String>,
    pub credentials: Option<Credentials>,
    pub encryption: EncryptionLevel,
    pub verify_on_connect: bool,
    pub pool_size: u32,
    pub storage_dir: PathBuf,
    pub dump_dir: String,
    pub dump_filename: String,
    pub profile: Profile,
}

impl ConnectionDescriptor {
    /// Emit the effective configuration report
    ///
    /// Advisory only: operators use it to confirm what the process actually
    /// resolved. Credential values are reported as presence flags.
    pub fn log_effective_config(&self) {
        tracing::debug!(
            scheme = ?self.scheme,
            uri = self.uri.as_deref().unwrap_or("<none>"),
            credentials = if self.credentials.is_some() { "set" } else { "unset" },
            encryption = self.encryption.as_str(),
            verify_on_connect = self.verify_on_connect,
            pool_size = self.pool_size,
            storage_dir = %self.storage_dir.display(),
            dump_dir = %self.dump_dir,
            dump_filename = %self.dump_filename,
            profile = ?self.profile,
            "graph driver configuration"
        );
    }
}

/// Resolve a raw configuration into a [`ConnectionDescriptor`]
///
/// A missing or unrecognized URI never raises; it silently resolves to
/// [`Scheme::Embedded`] with the profile's fixed local storage path. Use
/// [`resolve_strict`] to reject unrecognized URIs instead.
pub fn resolve(raw: &RawConfig) -> Result<ConnectionDescriptor> {
    resolve_inner(raw, false)
}

/// Resolve, but treat a present-yet-unrecognized URI as a configuration
/// error rather than silently falling back to the embedded store.
pub fn resolve_strict(raw: &RawConfig) -> Result<ConnectionDescriptor> {
    resolve_inner(raw, true)
}

fn resolve_inner(raw: &RawConfig, strict: bool) -> Result<ConnectionDescriptor> {
    let profile = match raw.get(keys::PROFILE) {
        Some(token) => Profile::parse(token)?,
        None => Profile::default(),
    };

    let encryption = match raw.get(keys::GRAPH_ENCRYPTION_LEVEL) {
        Some(token) => EncryptionLevel::parse(token)?,
        None => EncryptionLevel::default(),
    };

    let pool_size = match raw.get(keys::GRAPH_POOL_SIZE) {
        Some(token) => token.parse::<u32>().map_err(|_| {
            PsError::new(PsErrorKind::Configuration)
                .with_op("resolve")
                .with_message(format!("pool size is not a number: '{}'", token))
        })?,
        None => DEFAULT_POOL_SIZE,
    };

    let verify_on_connect = match raw.get(keys::GRAPH_VERIFY_CONNECTION) {
        Some(token) => match token {
            "true" => true,
            "false" => false,
            other => {
                return Err(PsError::new(PsErrorKind::Configuration)
                    .with_op("resolve")
                    .with_message(format!("verify flag is not a boolean: '{}'", other)))
            }
        },
        None => false,
    };

    let credentials = match (raw.get(keys::GRAPH_USERNAME), raw.get(keys::GRAPH_PASSWORD)) {
        (Some(username), Some(password)) => Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        (None, None) => None,
        // A lone username or password is contradictory: the remote driver
        // needs both and the embedded driver needs neither.
        (Some(_), None) | (None, Some(_)) => {
            return Err(PsError::new(PsErrorKind::Configuration)
                .with_op("resolve")
                .with_message("credentials require both username and password"))
        }
    };

    let uri = raw.get(keys::GRAPH_URI);
    let scheme = match uri {
        Some(u) if u.starts_with(REMOTE_PROTOCOL_PREFIX) => Scheme::RemoteProtocol,
        Some(u) if strict => {
            return Err(PsError::new(PsErrorKind::Configuration)
                .with_op("resolve")
                .with_message(format!(
                    "unrecognized graph URI '{}' (expected '{}' prefix)",
                    u, REMOTE_PROTOCOL_PREFIX
                )))
        }
        // Documented fallback: anything unrecognized resolves to the
        // embedded store rather than raising.
        _ => Scheme::Embedded,
    };

    let preserved_uri = match scheme {
        Scheme::RemoteProtocol => uri.map(String::from),
        Scheme::Embedded => None,
    };

    Ok(ConnectionDescriptor {
        scheme,
        uri: preserved_uri,
        credentials,
        encryption,
        verify_on_connect,
        pool_size,
        storage_dir: profile.default_storage_dir(),
        dump_dir: raw
            .get(keys::GRAPH_INDEX_DUMP_DIR)
            .unwrap_or(DEFAULT_DUMP_DIR)
            .to_string(),
        dump_filename: raw
            .get(keys::GRAPH_INDEX_DUMP_FILENAME)
            .unwrap_or(DEFAULT_DUMP_FILENAME)
            .to_string(),
        profile,
    })
}
