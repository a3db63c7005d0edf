// File: carelink-core/src/services/linking_service.rs

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use carelink_common::models::care_link::CareLink;
use carelink_common::models::link_request::{LinkRequest, LinkRequestStats, ResolutionDecision};
use carelink_common::models::user::UserRole;
use carelink_common::traits::directory_traits::Directory;
use carelink_common::traits::repository_traits::{CareLinksRepository, LinkRequestsRepository};

use crate::db::Database;
use crate::repositories::postgres::{PostgresCareLinksRepository, PostgresLinkRequestsRepository};
use crate::Error;

/// Outcome of a resolution: the request in its final state, plus the created
/// link when the decision was an accept.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ResolveOutcome {
    pub request: LinkRequest,
    pub link: Option<CareLink>,
}

/// Orchestrates the care-relationship linking workflow: users submit
/// requests to become a doctor's patient, doctors accept or reject them, and
/// an accept creates the durable doctor-patient link.
///
/// This is the only component that touches both registries in one operation.
/// The accept path runs two storage writes (resolve the request, create the
/// link) because link creation depends on patient provisioning outside this
/// core; when the second write fails, the first is compensated so the accept
/// is externally a no-op.
pub struct LinkingService {
    link_requests: Arc<dyn LinkRequestsRepository + Send + Sync>,
    care_links: Arc<dyn CareLinksRepository + Send + Sync>,
    directory: Arc<dyn Directory + Send + Sync>,
}

impl LinkingService {
    pub fn new(
        link_requests: Arc<dyn LinkRequestsRepository + Send + Sync>,
        care_links: Arc<dyn CareLinksRepository + Send + Sync>,
        directory: Arc<dyn Directory + Send + Sync>,
    ) -> Self {
        debug!("Initializing LinkingService");
        Self {
            link_requests,
            care_links,
            directory,
        }
    }

    /// Convenience wiring over the Postgres repositories.
    pub fn postgres(db: &Database, directory: Arc<dyn Directory + Send + Sync>) -> Self {
        Self::new(
            Arc::new(PostgresLinkRequestsRepository::new(db.pool().clone())),
            Arc::new(PostgresCareLinksRepository::new(db.pool().clone())),
            directory,
        )
    }

    /// Submits a new link request from `requester_user_id` to `doctor_id`.
    pub async fn submit(
        &self,
        requester_user_id: Uuid,
        doctor_id: Uuid,
        message: Option<&str>,
    ) -> Result<LinkRequest, Error> {
        debug!(
            "submit() requester={} doctor={}",
            requester_user_id, doctor_id
        );

        // 1) the target doctor must exist
        if !self.directory.doctor_exists(doctor_id).await? {
            return Err(Error::UnknownDoctor(doctor_id));
        }

        // 2) the requester must exist and must not itself be a doctor
        match self.directory.user_role(requester_user_id).await? {
            None => return Err(Error::UnknownRequester(requester_user_id)),
            Some(UserRole::Doctor) => {
                return Err(Error::InvalidRole(format!(
                    "user {} is a doctor and cannot request a care link",
                    requester_user_id
                )));
            }
            Some(_) => {}
        }

        // 3) no link may already exist for the pair
        if let Some(patient_id) = self.directory.patient_for_user(requester_user_id).await? {
            if self.care_links.link_exists(doctor_id, patient_id).await? {
                return Err(Error::AlreadyLinked {
                    doctor_id,
                    patient_id,
                });
            }
        }

        // 4) no pending request may already exist for the pair; fast-fail
        //    here, the partial unique index still has the final word
        if self
            .link_requests
            .pending_exists(requester_user_id, doctor_id)
            .await?
        {
            return Err(Error::DuplicatePending {
                requester_user_id,
                doctor_id,
            });
        }

        let req = LinkRequest::new(requester_user_id, doctor_id, message);
        self.link_requests.create_link_request(&req).await?;
        info!(
            "created link request {} ({} -> {})",
            req.link_request_id, requester_user_id, doctor_id
        );
        Ok(req)
    }

    /// Resolves a pending request. `decision` must be `accepted` or
    /// `rejected`; an accept also creates the doctor-patient link.
    pub async fn resolve(
        &self,
        link_request_id: Uuid,
        doctor_id: Uuid,
        decision: &str,
        resolved_by: Uuid,
    ) -> Result<ResolveOutcome, Error> {
        debug!(
            "resolve() request={} doctor={} decision='{}'",
            link_request_id, doctor_id, decision
        );

        // 1) load the request
        let req = self
            .link_requests
            .get_link_request(link_request_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("link request {} not found", link_request_id))
            })?;

        // 2) a doctor may only resolve requests addressed to them
        if req.doctor_id != doctor_id {
            return Err(Error::Forbidden(format!(
                "request {} is not addressed to doctor {}",
                link_request_id, doctor_id
            )));
        }

        // 3) parse the decision
        let decision = ResolutionDecision::from_str(decision)
            .map_err(|_| Error::InvalidDecision(decision.to_string()))?;

        // 4) compare-and-set out of 'pending'; a racing resolution loses
        //    here with AlreadyResolved
        let resolved = self
            .link_requests
            .mark_resolved(link_request_id, decision, resolved_by)
            .await?;

        // 5) reject: done, no link
        if decision == ResolutionDecision::Rejected {
            info!("request {} rejected by {}", link_request_id, resolved_by);
            return Ok(ResolveOutcome {
                request: resolved,
                link: None,
            });
        }

        // 6) accept: provision the patient and create the link; if that
        //    fails the request must come back exactly as it was before 4)
        match self.create_link_for(&resolved).await {
            Ok(link) => {
                info!(
                    "request {} accepted; linked doctor {} to patient {}",
                    link_request_id, link.doctor_id, link.patient_id
                );
                Ok(ResolveOutcome {
                    request: resolved,
                    link: Some(link),
                })
            }
            Err(cause) => {
                warn!(
                    "link creation for request {} failed: {}; reverting to pending",
                    link_request_id, cause
                );
                match self.link_requests.revert_to_pending(link_request_id).await {
                    Ok(_) => Err(Error::LinkCreationFailed(Box::new(cause))),
                    Err(compensation) => {
                        // Open inconsistency: the request is resolved with no
                        // backing link. Always logged for reconciliation.
                        error!(
                            "compensation failed for request {}: {} (original failure: {})",
                            link_request_id, compensation, cause
                        );
                        Err(Error::CompensationFailed {
                            request_id: link_request_id,
                            cause: Box::new(cause),
                            compensation: Box::new(compensation),
                        })
                    }
                }
            }
        }
    }

    pub async fn list_pending_for_doctor(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<LinkRequest>, Error> {
        self.link_requests.list_pending_for_doctor(doctor_id).await
    }

    pub async fn list_for_requester(
        &self,
        requester_user_id: Uuid,
    ) -> Result<Vec<LinkRequest>, Error> {
        self.link_requests.list_for_requester(requester_user_id).await
    }

    /// Per-doctor request counters. Pure read, no side effects.
    pub async fn stats(&self, doctor_id: Uuid) -> Result<LinkRequestStats, Error> {
        self.link_requests.stats_for_doctor(doctor_id).await
    }

    async fn create_link_for(&self, req: &LinkRequest) -> Result<CareLink, Error> {
        let patient_id = self
            .directory
            .provision_patient(req.requester_user_id)
            .await?;
        let link = CareLink::new(req.doctor_id, patient_id);
        self.care_links.create_link(&link).await?;
        Ok(link)
    }
}
