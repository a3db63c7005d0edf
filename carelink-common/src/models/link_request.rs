// File: carelink-common/src/models/link_request.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a link request. `Pending` is the only non-terminal
/// state; once a request is `Accepted` or `Rejected` it never changes again.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LinkRequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl LinkRequestStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LinkRequestStatus::Pending)
    }
}

impl fmt::Display for LinkRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkRequestStatus::Pending => write!(f, "pending"),
            LinkRequestStatus::Accepted => write!(f, "accepted"),
            LinkRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for LinkRequestStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(LinkRequestStatus::Pending),
            "accepted" => Ok(LinkRequestStatus::Accepted),
            "rejected" => Ok(LinkRequestStatus::Rejected),
            _ => Err(format!("Unknown link request status: {}", s)),
        }
    }
}

/// What a doctor may resolve a request *to*. Deliberately narrower than
/// [`LinkRequestStatus`] so "resolve back to pending" is unrepresentable.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResolutionDecision {
    Accepted,
    Rejected,
}

impl ResolutionDecision {
    pub fn as_status(&self) -> LinkRequestStatus {
        match self {
            ResolutionDecision::Accepted => LinkRequestStatus::Accepted,
            ResolutionDecision::Rejected => LinkRequestStatus::Rejected,
        }
    }
}

impl fmt::Display for ResolutionDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_status())
    }
}

impl FromStr for ResolutionDecision {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accepted" => Ok(ResolutionDecision::Accepted),
            "rejected" => Ok(ResolutionDecision::Rejected),
            _ => Err(format!("Unknown resolution decision: {}", s)),
        }
    }
}

/// A user's request to become a doctor's patient.
///
/// `resolved_at`/`resolved_by` are set exactly when the request leaves
/// `Pending`, and cleared again only by the internal compensating revert.
#[derive(Debug, Serialize, Deserialize, Clone, sqlx::FromRow)]
pub struct LinkRequest {
    pub link_request_id: Uuid,
    pub requester_user_id: Uuid,
    pub doctor_id: Uuid,
    pub message: Option<String>,
    pub status: LinkRequestStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<Uuid>,
}

impl LinkRequest {
    pub fn new(requester_user_id: Uuid, doctor_id: Uuid, message: Option<&str>) -> Self {
        Self {
            link_request_id: Uuid::new_v4(),
            requester_user_id,
            doctor_id,
            message: message.map(|s| s.to_string()),
            status: LinkRequestStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
        }
    }
}

/// Per-doctor request counters, computed in one aggregate query.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct LinkRequestStats {
    pub pending: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub total: i64,
}
