//! In-process document store implementing the job and user repository ports.
//!
//! Jobs and users live behind a single mutex so that every compare-and-swap,
//! including the two-document approval write, is one critical section. The
//! lock is never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    JobRepository, JobRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, Job, JobFilter, JobId, User, UserId};

#[derive(Default)]
struct StoreState {
    jobs: HashMap<JobId, Job>,
    users: HashMap<UserId, User>,
    emails: HashMap<EmailAddress, UserId>,
}

impl StoreState {
    fn check_job_revision(&self, id: &JobId, expected: u32) -> Result<(), JobRepositoryError> {
        let stored = self
            .jobs
            .get(id)
            .ok_or_else(|| JobRepositoryError::missing(id.to_string()))?;
        if stored.revision() != expected {
            debug!(job_id = %id, expected, actual = stored.revision(), "job revision mismatch");
            return Err(JobRepositoryError::revision_mismatch(expected, stored.revision()));
        }
        Ok(())
    }

    fn check_user_revision(&self, id: &UserId, expected: u32) -> Result<(), JobRepositoryError> {
        let stored = self
            .users
            .get(id)
            .ok_or_else(|| JobRepositoryError::missing(id.to_string()))?;
        if stored.revision() != expected {
            debug!(user_id = %id, expected, actual = stored.revision(), "user revision mismatch");
            return Err(JobRepositoryError::stale_assignee(
                id.to_string(),
                expected,
                stored.revision(),
            ));
        }
        Ok(())
    }
}

/// Volatile store backing both repositories.
///
/// Share one instance (behind an `Arc`) between the job and account services
/// so approvals see the users that registration wrote.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError> {
        let mut state = self.lock().map_err(JobRepositoryError::connection)?;
        if state.jobs.contains_key(&job.id()) {
            return Err(JobRepositoryError::duplicate(job.id().to_string()));
        }
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError> {
        let state = self.lock().map_err(JobRepositoryError::connection)?;
        Ok(state.jobs.get(id).cloned())
    }

    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, JobRepositoryError> {
        let state = self.lock().map_err(JobRepositoryError::connection)?;
        let mut jobs: Vec<Job> = state
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(jobs)
    }

    async fn save(&self, job: &Job, expected_revision: u32) -> Result<(), JobRepositoryError> {
        let mut state = self.lock().map_err(JobRepositoryError::connection)?;
        state.check_job_revision(&job.id(), expected_revision)?;
        state.jobs.insert(job.id(), job.clone());
        Ok(())
    }

    async fn delete(&self, id: &JobId, expected_revision: u32) -> Result<(), JobRepositoryError> {
        let mut state = self.lock().map_err(JobRepositoryError::connection)?;
        state.check_job_revision(id, expected_revision)?;
        state.jobs.remove(id);
        Ok(())
    }

    async fn save_approval(
        &self,
        job: &Job,
        expected_job_revision: u32,
        assignee: &User,
        expected_user_revision: u32,
    ) -> Result<(), JobRepositoryError> {
        let mut state = self.lock().map_err(JobRepositoryError::connection)?;
        state.check_job_revision(&job.id(), expected_job_revision)?;
        state.check_user_revision(assignee.id(), expected_user_revision)?;
        state.jobs.insert(job.id(), job.clone());
        state.users.insert(assignee.id().clone(), assignee.clone());
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::connection)?;
        if state.emails.contains_key(user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.emails.insert(user.email().clone(), user.id().clone());
        state.users.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }
}
