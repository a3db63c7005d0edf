// File: carelink-common/src/traits/directory_traits.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::models::user::UserRole;

/// The user/doctor directory the linking core consults but does not own.
/// Real deployments back this with the account service; tests use an
/// in-memory double.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Role of the given user, or `None` if no such user exists.
    async fn user_role(&self, user_id: Uuid) -> Result<Option<UserRole>, Error>;

    async fn doctor_exists(&self, doctor_id: Uuid) -> Result<bool, Error>;

    /// The patient record already associated with `user_id`, if any. Read
    /// only; never provisions.
    async fn patient_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, Error>;

    /// Resolve `user_id` to a patient id, creating the patient record if
    /// needed. Idempotent: repeated calls return the same id. Called only
    /// from the accept path.
    async fn provision_patient(&self, user_id: Uuid) -> Result<Uuid, Error>;
}
