// File: carelink-core/src/test_utils/directory.rs

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use carelink_common::models::user::UserRole;
use carelink_common::traits::directory_traits::Directory;
use crate::Error;

/// In-memory `Directory` double for tests: a role table, a user-to-patient
/// table, and a switch to make provisioning fail.
#[derive(Default)]
pub struct StaticDirectory {
    roles: Mutex<HashMap<Uuid, UserRole>>,
    patients: Mutex<HashMap<Uuid, Uuid>>,
    fail_provisioning: AtomicBool,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_doctor(&self, doctor_id: Uuid) {
        self.roles.lock().unwrap().insert(doctor_id, UserRole::Doctor);
    }

    pub fn add_user(&self, user_id: Uuid) {
        self.roles.lock().unwrap().insert(user_id, UserRole::User);
    }

    /// Registers `user_id` as already holding patient record `patient_id`.
    pub fn add_patient(&self, user_id: Uuid, patient_id: Uuid) {
        self.roles.lock().unwrap().insert(user_id, UserRole::Patient);
        self.patients.lock().unwrap().insert(user_id, patient_id);
    }

    pub fn set_fail_provisioning(&self, fail: bool) {
        self.fail_provisioning.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Directory for StaticDirectory {
    async fn user_role(&self, user_id: Uuid) -> Result<Option<UserRole>, Error> {
        Ok(self.roles.lock().unwrap().get(&user_id).copied())
    }

    async fn doctor_exists(&self, doctor_id: Uuid) -> Result<bool, Error> {
        Ok(self.roles.lock().unwrap().get(&doctor_id) == Some(&UserRole::Doctor))
    }

    async fn patient_for_user(&self, user_id: Uuid) -> Result<Option<Uuid>, Error> {
        Ok(self.patients.lock().unwrap().get(&user_id).copied())
    }

    async fn provision_patient(&self, user_id: Uuid) -> Result<Uuid, Error> {
        if self.fail_provisioning.load(Ordering::SeqCst) {
            return Err(Error::Directory(format!(
                "patient provisioning unavailable for user {}",
                user_id
            )));
        }
        let mut patients = self.patients.lock().unwrap();
        let patient_id = *patients.entry(user_id).or_insert_with(Uuid::new_v4);
        Ok(patient_id)
    }
}
