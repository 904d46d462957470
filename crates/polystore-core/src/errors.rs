//! Error facility for PolyStore
//!
//! A single structured error type with a stable kind taxonomy. Resolver and
//! connection errors are fatal to startup; transaction errors abort only the
//! current unit of work.

/// Result type alias using PsError
pub type Result<T> = std::result::Result<T, PsError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and operator-facing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PsErrorKind {
    // Startup
    /// Malformed or contradictory configuration, detected at resolve time
    Configuration,
    /// Store unreachable or storage path unusable
    Connection,

    // Transaction lifecycle
    /// Protocol misuse: double-begin, commit/rollback in the wrong state
    TransactionState,
    /// The native store rejected a commit
    Commit,
    /// A subset of chained resources committed and a subset failed;
    /// the two stores are logically inconsistent until reconciled
    PartialCommit,

    // Data access
    NotFound,
    InvalidInput,
    ConstraintViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    /// A valid surface that is not implemented in this build
    NotImplemented,

    // Internal
    Internal,
}

impl PsErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            PsErrorKind::Configuration => "ERR_CONFIGURATION",
            PsErrorKind::Connection => "ERR_CONNECTION",
            PsErrorKind::TransactionState => "ERR_TRANSACTION_STATE",
            PsErrorKind::Commit => "ERR_COMMIT",
            PsErrorKind::PartialCommit => "ERR_PARTIAL_COMMIT",
            PsErrorKind::NotFound => "ERR_NOT_FOUND",
            PsErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            PsErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            PsErrorKind::Io => "ERR_IO",
            PsErrorKind::Serialization => "ERR_SERIALIZATION",
            PsErrorKind::Persistence => "ERR_PERSISTENCE",
            PsErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            PsErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the kind plus context: the failing operation, the resource
/// (store) involved, and - for partial commits - the status of every
/// chained resource at the failure so an operator can reconcile manually.
#[derive(Debug, Clone)]
pub struct PsError {
    kind: PsErrorKind,
    op: Option<String>,
    resource: Option<String>,
    message: String,
    statuses: Option<Vec<(String, String)>>,
    source: Option<Box<PsError>>,
}

impl PsError {
    /// Create a new error with the specified kind
    pub fn new(kind: PsErrorKind) -> Self {
        Self {
            kind,
            op: None,
            resource: None,
            message: String::new(),
            statuses: None,
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the name of the resource (store) involved
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the per-resource status report
    /// (populated on PartialCommit)
    pub fn with_statuses(mut self, statuses: Vec<(String, String)>) -> Self {
        self.statuses = Some(statuses);
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: PsError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> PsErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the resource context, if any
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the per-resource status report, if any
    pub fn statuses(&self) -> Option<&[(String, String)]> {
        self.statuses.as_deref()
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&PsError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for PsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(resource) = &self.resource {
            write!(f, " (resource: {})", resource)?;
        }
        if let Some(statuses) = &self.statuses {
            let report: Vec<String> = statuses
                .iter()
                .map(|(name, status)| format!("{}={}", name, status))
                .collect();
            write!(f, " [{}]", report.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for PsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> PsError {
    PsError::new(PsErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a serialization error from serde_json::Error
pub fn from_serde_json(err: serde_json::Error) -> PsError {
    PsError::new(PsErrorKind::Serialization)
        .with_op("json")
        .with_message(err.to_string())
}
