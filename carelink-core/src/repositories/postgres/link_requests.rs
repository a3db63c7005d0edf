// src/repositories/postgres/link_requests.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use carelink_common::models::link_request::{LinkRequest, LinkRequestStats, ResolutionDecision};
pub(crate) use carelink_common::traits::repository_traits::LinkRequestsRepository;

use super::{map_constraint_violation, ONE_PENDING_IDX};
use crate::Error;

#[derive(Clone)]
pub struct PostgresLinkRequestsRepository {
    pool: Pool<Postgres>,
}

impl PostgresLinkRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_request(r: &PgRow) -> Result<LinkRequest, Error> {
    Ok(LinkRequest {
        link_request_id: r.try_get("link_request_id")?,
        requester_user_id: r.try_get("requester_user_id")?,
        doctor_id: r.try_get("doctor_id")?,
        message: r.try_get("message")?,
        status: r.try_get("status")?,
        created_at: r.try_get("created_at")?,
        resolved_at: r.try_get("resolved_at")?,
        resolved_by: r.try_get("resolved_by")?,
    })
}

#[async_trait]
impl LinkRequestsRepository for PostgresLinkRequestsRepository {
    async fn create_link_request(&self, req: &LinkRequest) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO care_link_requests (
                link_request_id,
                requester_user_id,
                doctor_id,
                message,
                status,
                created_at,
                resolved_at,
                resolved_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
            .bind(req.link_request_id)
            .bind(req.requester_user_id)
            .bind(req.doctor_id)
            .bind(&req.message)
            .bind(req.status)
            .bind(req.created_at)
            .bind(req.resolved_at)
            .bind(req.resolved_by)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_violation(e, ONE_PENDING_IDX, || Error::DuplicatePending {
                    requester_user_id: req.requester_user_id,
                    doctor_id: req.doctor_id,
                })
            })?;
        Ok(())
    }

    async fn get_link_request(&self, link_request_id: Uuid) -> Result<Option<LinkRequest>, Error> {
        let row = sqlx::query(
            r#"
            SELECT link_request_id,
                   requester_user_id,
                   doctor_id,
                   message,
                   status,
                   created_at,
                   resolved_at,
                   resolved_by
            FROM care_link_requests
            WHERE link_request_id = $1
            "#,
        )
            .bind(link_request_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(row_to_request(&r)?)),
            None => Ok(None),
        }
    }

    async fn list_pending_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<LinkRequest>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT link_request_id,
                   requester_user_id,
                   doctor_id,
                   message,
                   status,
                   created_at,
                   resolved_at,
                   resolved_by
            FROM care_link_requests
            WHERE doctor_id = $1
              AND status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
            .bind(doctor_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_for_requester(
        &self,
        requester_user_id: Uuid,
    ) -> Result<Vec<LinkRequest>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT link_request_id,
                   requester_user_id,
                   doctor_id,
                   message,
                   status,
                   created_at,
                   resolved_at,
                   resolved_by
            FROM care_link_requests
            WHERE requester_user_id = $1
            ORDER BY created_at DESC
            "#,
        )
            .bind(requester_user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_request).collect()
    }

    async fn pending_exists(
        &self,
        requester_user_id: Uuid,
        doctor_id: Uuid,
    ) -> Result<bool, Error> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS one
            FROM care_link_requests
            WHERE requester_user_id = $1
              AND doctor_id = $2
              AND status = 'pending'
            LIMIT 1
            "#,
        )
            .bind(requester_user_id)
            .bind(doctor_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn mark_resolved(
        &self,
        link_request_id: Uuid,
        decision: ResolutionDecision,
        resolved_by: Uuid,
    ) -> Result<LinkRequest, Error> {
        let now = Utc::now();
        // Compare-and-set on status = 'pending'; a concurrent resolution
        // makes this update zero rows instead of overwriting.
        let row = sqlx::query(
            r#"
            UPDATE care_link_requests
            SET status      = $2,
                resolved_at = $3,
                resolved_by = $4
            WHERE link_request_id = $1
              AND status = 'pending'
            RETURNING link_request_id,
                      requester_user_id,
                      doctor_id,
                      message,
                      status,
                      created_at,
                      resolved_at,
                      resolved_by
            "#,
        )
            .bind(link_request_id)
            .bind(decision.as_status())
            .bind(now)
            .bind(resolved_by)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row {
            return row_to_request(&r);
        }

        // Zero rows: either the request does not exist, or it is no longer
        // pending. One re-read decides which.
        match self.get_link_request(link_request_id).await? {
            Some(_) => Err(Error::AlreadyResolved(link_request_id)),
            None => Err(Error::NotFound(format!(
                "link request {} not found",
                link_request_id
            ))),
        }
    }

    async fn revert_to_pending(&self, link_request_id: Uuid) -> Result<LinkRequest, Error> {
        let row = sqlx::query(
            r#"
            UPDATE care_link_requests
            SET status      = 'pending',
                resolved_at = NULL,
                resolved_by = NULL
            WHERE link_request_id = $1
            RETURNING link_request_id,
                      requester_user_id,
                      doctor_id,
                      message,
                      status,
                      created_at,
                      resolved_at,
                      resolved_by
            "#,
        )
            .bind(link_request_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => row_to_request(&r),
            None => Err(Error::NotFound(format!(
                "link request {} not found",
                link_request_id
            ))),
        }
    }

    async fn stats_for_doctor(&self, doctor_id: Uuid) -> Result<LinkRequestStats, Error> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'pending')  AS pending,
                   COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
                   COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                   COUNT(*)                                    AS total
            FROM care_link_requests
            WHERE doctor_id = $1
            "#,
        )
            .bind(doctor_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(LinkRequestStats {
            pending: row.try_get("pending")?,
            accepted: row.try_get("accepted")?,
            rejected: row.try_get("rejected")?,
            total: row.try_get("total")?,
        })
    }
}
