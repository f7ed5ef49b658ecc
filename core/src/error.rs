use std::fmt;
use thiserror::Error;

/// Failures raised by a record store primitive.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Record {player_id}/{date_key} already exists")]
    Conflict { player_id: String, date_key: String },

    #[error("Record {0} not found")]
    MissingRecord(i64),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The store primitive that was running when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    FindOne,
    FindAll,
    Insert,
    Update,
}

impl StoreOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FindOne => "find_one",
            Self::FindAll => "find_all",
            Self::Insert  => "insert",
            Self::Update  => "update",
        }
    }
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Invalid input: {field} {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Store read failed during {op}: {source}")]
    StoreRead {
        op: StoreOp,
        #[source]
        source: StoreError,
    },

    #[error("Store write failed during {op}: {source}")]
    StoreWrite {
        op: StoreOp,
        #[source]
        source: StoreError,
    },
}

impl ScoreError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// HTTP status the transport boundary renders for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::StoreRead { .. } | Self::StoreWrite { .. } => 500,
        }
    }

    /// Caller-facing message. Never includes store internals.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Missing or invalid fields",
            Self::StoreRead { .. } => "Database fetch error",
            Self::StoreWrite { op: StoreOp::Update, .. } => "Database update error",
            Self::StoreWrite { .. } => "Database insert error",
        }
    }
}

/// Tags a store failure as a read of `op`.
pub(crate) fn read_failure(op: StoreOp) -> impl FnOnce(StoreError) -> ScoreError {
    move |source| ScoreError::StoreRead { op, source }
}

/// Tags a store failure as a write of `op`.
pub(crate) fn write_failure(op: StoreOp) -> impl FnOnce(StoreError) -> ScoreError {
    move |source| ScoreError::StoreWrite { op, source }
}

pub type ScoreResult<T> = Result<T, ScoreError>;
