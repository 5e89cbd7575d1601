use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure in the change-tracking pipeline maps onto exactly one kind, so
/// callers can choose between retry, abort, and graceful degradation without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Input / construction
    InvalidInput,
    /// Two manifest entries claim the same page path (aborts snapshot construction)
    DuplicatePath,

    // Snapshot store
    /// A snapshot with this id already exists; stored snapshots are never rewritten
    ImmutabilityViolation,
    /// No snapshot with the requested id
    SnapshotNotFound,
    /// A persisted snapshot record failed to parse or validate
    MalformedSnapshot,

    // Archive
    /// Raw page content needed for a diff preview is not archived (non-fatal)
    ArchivedContentUnavailable,

    // Configuration
    InvalidRules,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::DuplicatePath => "ERR_DUPLICATE_PATH",
            ExErrorKind::ImmutabilityViolation => "ERR_IMMUTABILITY_VIOLATION",
            ExErrorKind::SnapshotNotFound => "ERR_SNAPSHOT_NOT_FOUND",
            ExErrorKind::MalformedSnapshot => "ERR_MALFORMED_SNAPSHOT",
            ExErrorKind::ArchivedContentUnavailable => "ERR_ARCHIVED_CONTENT_UNAVAILABLE",
            ExErrorKind::InvalidRules => "ERR_INVALID_RULES",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the pipeline may continue after this error with reduced output
    pub fn is_degradable(&self) -> bool {
        matches!(self, ExErrorKind::ArchivedContentUnavailable)
    }
}

/// Structured error with kind and context
#[derive(Debug, Clone, PartialEq)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    snapshot_id: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the given kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            snapshot_id: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add snapshot id context
    pub fn with_snapshot_id(mut self, id: impl Into<String>) -> Self {
        self.snapshot_id = Some(id.into());
        self
    }

    /// Add page path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn snapshot_id(&self) -> Option<&str> {
        self.snapshot_id.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(snapshot_id) = &self.snapshot_id {
            write!(f, " (snapshot_id: {})", snapshot_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

// ========== End Error Facility ==========

/// Failures while loading or validating a severity rule set
#[derive(Error, Debug)]
pub enum RulesError {
    /// The TOML document could not be parsed
    #[error("failed to parse severity rules: {0}")]
    Parse(#[from] toml::de::Error),

    /// The rules file could not be read
    #[error("failed to read severity rules file: {0}")]
    Read(#[from] std::io::Error),

    /// Cosmetic threshold must be finite and non-negative
    #[error("cosmetic threshold must be a finite, non-negative ratio, got {0}")]
    InvalidThreshold(f64),

    /// A prefix rule with an empty prefix would match every path
    #[error("prefix rule #{index} has an empty prefix")]
    EmptyPrefix { index: usize },

    /// Cosmetic is reserved for small modifications; a path default can't be Cosmetic
    #[error("prefix rule #{index} ({prefix}) cannot default to cosmetic")]
    CosmeticPrefix { index: usize, prefix: String },
}

impl From<RulesError> for ExError {
    fn from(err: RulesError) -> Self {
        ExError::new(ExErrorKind::InvalidRules)
            .with_op("load_severity_rules")
            .with_message(err.to_string())
    }
}
