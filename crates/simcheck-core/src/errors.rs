use thiserror::Error;

/// Result type alias using SimCheckError
pub type Result<T> = std::result::Result<T, SimCheckError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    ConfigParse,
    NoDefaultThreshold,

    // Caller contract
    PreconditionViolation,

    // Run control
    Cancelled,

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
            ExErrorKind::ConfigParse => "ERR_CONFIG_PARSE",
            ExErrorKind::NoDefaultThreshold => "ERR_NO_DEFAULT_THRESHOLD",
            ExErrorKind::PreconditionViolation => "ERR_PRECONDITION_VIOLATION",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind aborts a run before any comparison is judged.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ConfigParse | ExErrorKind::NoDefaultThreshold
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification kind plus the context an operator needs to
/// locate the problem (operation, entity, offending configuration line).
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    line_no: Option<usize>,
    line: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            line_no: None,
            line: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the offending configuration line (1-based number and raw content)
    pub fn with_line(mut self, line_no: usize, line: impl Into<String>) -> Self {
        self.line_no = Some(line_no);
        self.line = Some(line.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
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

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the 1-based configuration line number, if any
    pub fn line_no(&self) -> Option<usize> {
        self.line_no
    }

    /// Get the offending configuration line content, if any
    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
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
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line_no) = self.line_no {
            write!(f, " (line {}", line_no)?;
            if let Some(line) = &self.line {
                write!(f, ": `{}`", line)?;
            }
            write!(f, ")")?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for SimCheck operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimCheckError {
    // ===== Configuration Errors =====
    /// A tolerance rule line could not be parsed
    #[error("Invalid threshold rule on line {line_no} (`{line}`): {reason}")]
    ConfigParse {
        line_no: usize,
        line: String,
        reason: String,
    },

    /// The tolerance table has no `*, *` rule
    #[error("No default threshold: the tolerance table must contain a `*, *` rule (queried {unit}/{aggregation})")]
    NoDefaultThreshold { unit: String, aggregation: String },

    // ===== Caller Contract Errors =====
    /// A finding arrived without its entity identity
    #[error("Finding is missing its entity identity: `{field}` is empty")]
    MissingEntityIdentity { field: String },

    // ===== Run Control =====
    /// A batch was cancelled between comparisons
    #[error("Batch cancelled after {completed} of {total} comparisons")]
    Cancelled { completed: usize, total: usize },

    // ===== Boundary Errors =====
    /// Reading a file failed
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// JSON encoding/decoding failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from SimCheckError to ExError
impl From<SimCheckError> for ExError {
    fn from(err: SimCheckError) -> Self {
        let message = err.to_string();
        match err {
            SimCheckError::ConfigParse {
                line_no,
                line,
                reason,
            } => ExError::new(ExErrorKind::ConfigParse)
                .with_line(line_no, line)
                .with_message(reason),
            SimCheckError::NoDefaultThreshold { .. } => {
                ExError::new(ExErrorKind::NoDefaultThreshold).with_message(message)
            }
            SimCheckError::MissingEntityIdentity { .. } => {
                ExError::new(ExErrorKind::PreconditionViolation).with_message(message)
            }
            SimCheckError::Cancelled { .. } => {
                ExError::new(ExErrorKind::Cancelled).with_message(message)
            }
            SimCheckError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),
            SimCheckError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            SimCheckError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for SimCheckError {
    fn from(err: serde_json::Error) -> Self {
        SimCheckError::Serialization {
            message: err.to_string(),
        }
    }
}
