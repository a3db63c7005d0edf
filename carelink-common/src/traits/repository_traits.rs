// File: carelink-common/src/traits/repository_traits.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Error;
use crate::models::care_link::CareLink;
use crate::models::link_request::{LinkRequest, LinkRequestStats, ResolutionDecision};

/// Storage surface for link requests (the request registry).
///
/// Implementations must enforce the one-pending-request-per-pair rule at the
/// storage layer (a partial unique index or equivalent), not only through
/// [`pending_exists`](LinkRequestsRepository::pending_exists) pre-checks.
#[async_trait]
pub trait LinkRequestsRepository: Send + Sync {
    async fn create_link_request(&self, req: &LinkRequest) -> Result<(), Error>;

    async fn get_link_request(&self, link_request_id: Uuid) -> Result<Option<LinkRequest>, Error>;

    /// Pending requests addressed to `doctor_id`, newest first.
    async fn list_pending_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<LinkRequest>, Error>;

    /// Every request `requester_user_id` ever submitted, newest first.
    async fn list_for_requester(&self, requester_user_id: Uuid)
        -> Result<Vec<LinkRequest>, Error>;

    async fn pending_exists(
        &self,
        requester_user_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<bool, Error>;

    /// Compare-and-set resolution: transitions the request out of `pending`
    /// and records who resolved it and when. Never a blind write, so two
    /// racing resolutions produce exactly one winner; the loser gets
    /// `Error::AlreadyResolved`. Returns the updated row.
    async fn mark_resolved(
        &self,
        link_request_id: Uuid,
        decision: ResolutionDecision,
        resolved_by: Uuid,
    ) -> Result<LinkRequest, Error>;

    /// Compensating operation for the accept-failure path in the linking
    /// service: restores `pending` and clears the resolution metadata. Not
    /// part of the public service surface.
    async fn revert_to_pending(&self, link_request_id: Uuid) -> Result<LinkRequest, Error>;

    async fn stats_for_doctor(&self, doctor_id: Uuid) -> Result<LinkRequestStats, Error>;
}

/// Storage surface for accepted doctor-patient links (the link registry).
///
/// `(doctor_id, patient_id)` uniqueness must hold at the storage layer even
/// when the caller's own pre-check raced.
#[async_trait]
pub trait CareLinksRepository: Send + Sync {
    async fn create_link(&self, link: &CareLink) -> Result<(), Error>;

    async fn link_exists(&self, doctor_id: Uuid, patient_id: Uuid) -> Result<bool, Error>;

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<CareLink>, Error>;

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<CareLink>, Error>;
}
