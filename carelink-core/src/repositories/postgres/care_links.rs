// src/repositories/postgres/care_links.rs

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use carelink_common::models::care_link::CareLink;
pub(crate) use carelink_common::traits::repository_traits::CareLinksRepository;

use super::{map_constraint_violation, DOCTOR_PATIENT_KEY};
use crate::Error;

#[derive(Clone)]
pub struct PostgresCareLinksRepository {
    pool: Pool<Postgres>,
}

impl PostgresCareLinksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_link(r: &PgRow) -> Result<CareLink, Error> {
    Ok(CareLink {
        link_id: r.try_get("link_id")?,
        doctor_id: r.try_get("doctor_id")?,
        patient_id: r.try_get("patient_id")?,
        created_at: r.try_get("created_at")?,
    })
}

#[async_trait]
impl CareLinksRepository for PostgresCareLinksRepository {
    async fn create_link(&self, link: &CareLink) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO care_links (
                link_id,
                doctor_id,
                patient_id,
                created_at
            )
            VALUES ($1, $2, $3, $4)
            "#,
        )
            .bind(link.link_id)
            .bind(link.doctor_id)
            .bind(link.patient_id)
            .bind(link.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_violation(e, DOCTOR_PATIENT_KEY, || Error::AlreadyLinked {
                    doctor_id: link.doctor_id,
                    patient_id: link.patient_id,
                })
            })?;
        Ok(())
    }

    async fn link_exists(&self, doctor_id: Uuid, patient_id: Uuid) -> Result<bool, Error> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS one
            FROM care_links
            WHERE doctor_id = $1
              AND patient_id = $2
            LIMIT 1
            "#,
        )
            .bind(doctor_id)
            .bind(patient_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<CareLink>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT link_id, doctor_id, patient_id, created_at
            FROM care_links
            WHERE doctor_id = $1
            ORDER BY created_at DESC
            "#,
        )
            .bind(doctor_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_link).collect()
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> Result<Vec<CareLink>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT link_id, doctor_id, patient_id, created_at
            FROM care_links
            WHERE patient_id = $1
            ORDER BY created_at DESC
            "#,
        )
            .bind(patient_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_link).collect()
    }
}
