// ================================================================
// File: carelink-common/src/error.rs
// ================================================================

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Unknown doctor: {0}")]
    UnknownDoctor(Uuid),

    #[error("Unknown requester: {0}")]
    UnknownRequester(Uuid),

    #[error("Doctor {doctor_id} and patient {patient_id} are already linked")]
    AlreadyLinked { doctor_id: Uuid, patient_id: Uuid },

    #[error("A pending request already exists for requester {requester_user_id} and doctor {doctor_id}")]
    DuplicatePending {
        requester_user_id: Uuid,
        doctor_id: Uuid,
    },

    #[error("Request {0} is already resolved")]
    AlreadyResolved(Uuid),

    #[error("Invalid decision: '{0}'")]
    InvalidDecision(String),

    #[error("Link creation failed: {0}")]
    LinkCreationFailed(#[source] Box<Error>),

    /// The accept path failed *and* the compensating revert failed, leaving
    /// request `request_id` resolved without a backing link. Callers surface
    /// this generically; operators reconcile from the log.
    #[error("Compensation failed for request {request_id}: {compensation} (original failure: {cause})")]
    CompensationFailed {
        request_id: Uuid,
        cause: Box<Error>,
        compensation: Box<Error>,
    },

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl Error {
    /// Stable response code for the transport boundary. Every kind maps to a
    /// distinct code; transports key status codes and client handling off it.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::Forbidden(_) => "forbidden",
            Error::InvalidRole(_) => "invalid_role",
            Error::UnknownDoctor(_) => "unknown_doctor",
            Error::UnknownRequester(_) => "unknown_requester",
            Error::AlreadyLinked { .. } => "already_linked",
            Error::DuplicatePending { .. } => "duplicate_pending",
            Error::AlreadyResolved(_) => "already_resolved",
            Error::InvalidDecision(_) => "invalid_decision",
            Error::LinkCreationFailed(_) => "link_creation_failed",
            Error::CompensationFailed { .. } => "compensation_failed",
            Error::Directory(_) => "directory_error",
            Error::Database(_) => "database_error",
            Error::Migration(_) => "migration_error",
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        // Collaborator implementations tend to bubble anyhow; fold those
        // into the directory variant rather than losing them.
        Error::Directory(e.to_string())
    }
}
