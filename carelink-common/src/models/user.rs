// File: carelink-common/src/models/user.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role a directory lookup resolves a user id to. The linking core never
/// stores users; it only needs to know whether a requester is a doctor.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Doctor,
    Patient,
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Doctor => write!(f, "doctor"),
            UserRole::Patient => write!(f, "patient"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "doctor" => Ok(UserRole::Doctor),
            "patient" => Ok(UserRole::Patient),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Unknown user role: {}", s)),
        }
    }
}
