// File: carelink-common/src/models/care_link.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An accepted doctor-patient relationship. Created only by a successful
/// accept, never mutated afterwards. `(doctor_id, patient_id)` is unique.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct CareLink {
    pub link_id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CareLink {
    pub fn new(doctor_id: Uuid, patient_id: Uuid) -> Self {
        Self {
            link_id: Uuid::new_v4(),
            doctor_id,
            patient_id,
            created_at: Utc::now(),
        }
    }
}
