// src/repositories/postgres/mod.rs

use carelink_common::error::Error;

pub mod care_links;
pub mod link_requests;

pub use care_links::PostgresCareLinksRepository;
pub use link_requests::PostgresLinkRequestsRepository;

/// Names of the uniqueness constraints the schema uses to enforce the
/// one-pending-request and one-link-per-pair rules.
pub(crate) const ONE_PENDING_IDX: &str = "care_link_requests_one_pending_idx";
pub(crate) const DOCTOR_PATIENT_KEY: &str = "care_links_doctor_patient_key";

/// Rewrites a unique-constraint violation into the matching domain error via
/// `rewrite`. Application-level pre-checks are fast-fail only; this is where
/// the storage layer has the final word when those checks raced.
pub(crate) fn map_constraint_violation(
    err: sqlx::Error,
    constraint: &str,
    rewrite: impl FnOnce() -> Error,
) -> Error {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(constraint) {
            return rewrite();
        }
    }
    Error::Database(err)
}
