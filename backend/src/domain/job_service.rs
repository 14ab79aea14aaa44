//! Job lifecycle domain service.
//!
//! Implements the job driving ports. Each mutation loads the job, lets the
//! aggregate run its guards against the injected clock, then writes back with
//! a compare-and-swap on the revision it read. Approval additionally folds
//! the rating into the assignee's track record in the same atomic write.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::job::DEFAULT_JOB_LIFETIME;
use crate::domain::ports::{
    JobCommand, JobQuery, JobRepository, JobRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::rating::record_completion;
use crate::domain::{
    Error, Job, JobAction, JobDraft, JobFilter, JobId, JobTransitionError, JobUpdate, UserId,
};

fn map_job_repository_error(error: JobRepositoryError) -> Error {
    match error {
        JobRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobRepositoryError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
        JobRepositoryError::Duplicate { id } => {
            Error::conflict(format!("job {id} already exists"))
        }
        JobRepositoryError::Missing { id } => Error::not_found(format!("record {id} not found")),
        JobRepositoryError::StaleAssignee { id, expected, actual } => {
            warn!(user_id = %id, expected, actual, "approval lost an assignee revision race");
            Error::conflict("assignee was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        JobRepositoryError::RevisionMismatch { expected, actual } => {
            warn!(expected, actual, "job write lost a revision race");
            Error::conflict("job was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
    }
}

fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
    }
}

fn map_transition_error(error: JobTransitionError) -> Error {
    match error {
        JobTransitionError::InvalidState { action, status } => Error::invalid_state(format!(
            "cannot {action} a job that is {status}"
        ))
        .with_details(json!({ "status": status })),
        JobTransitionError::Forbidden { reason, .. } => Error::forbidden(reason),
        JobTransitionError::Validation(err) => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": err.field() })),
        JobTransitionError::MissingAssignee(id) => {
            Error::internal(format!("job {id} is under review without an assignee"))
        }
    }
}

/// Assignee reads per approval before a concurrent rating update is reported
/// as `Conflict`.
const APPROVAL_ASSIGNEE_ATTEMPTS: usize = 3;

fn job_not_found(id: &JobId) -> Error {
    Error::not_found(format!("job {id} not found"))
}

/// Job service implementing the job driving ports.
#[derive(Clone)]
pub struct JobService<J, U> {
    job_repo: Arc<J>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
    job_lifetime: TimeDelta,
}

impl<J, U> JobService<J, U> {
    /// Create a service with the default seven-day job lifetime.
    pub fn new(job_repo: Arc<J>, user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            job_repo,
            user_repo,
            clock,
            job_lifetime: DEFAULT_JOB_LIFETIME,
        }
    }

    /// Override the lifetime applied to jobs created without a deadline.
    #[must_use]
    pub fn with_job_lifetime(mut self, job_lifetime: TimeDelta) -> Self {
        self.job_lifetime = job_lifetime;
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

impl<J, U> JobService<J, U>
where
    J: JobRepository,
    U: UserRepository,
{
    async fn load(&self, id: &JobId) -> Result<Job, Error> {
        self.job_repo
            .find_by_id(id)
            .await
            .map_err(map_job_repository_error)?
            .ok_or_else(|| job_not_found(id))
    }

    /// Run one guarded transition and persist it with compare-and-swap.
    async fn transition<F>(
        &self,
        id: &JobId,
        caller: &UserId,
        action: JobAction,
        apply: F,
    ) -> Result<Job, Error>
    where
        F: FnOnce(&mut Job, DateTime<Utc>) -> Result<(), JobTransitionError> + Send,
    {
        let mut job = self.load(id).await?;
        let expected = job.revision();
        let from = job.status();

        apply(&mut job, self.now()).map_err(map_transition_error)?;

        let job = job.with_revision(expected + 1);
        self.job_repo
            .save(&job, expected)
            .await
            .map_err(map_job_repository_error)?;

        info!(
            job_id = %id,
            actor = %caller,
            %action,
            from = %from,
            to = %job.status(),
            "job transitioned"
        );
        Ok(job)
    }
}

#[async_trait]
impl<J, U> JobQuery for JobService<J, U>
where
    J: JobRepository,
    U: UserRepository,
{
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, Error> {
        let stored = self
            .job_repo
            .list(&filter.without_status())
            .await
            .map_err(map_job_repository_error)?;

        let now = self.now();
        Ok(stored
            .into_iter()
            .map(|mut job| {
                job.refresh_expiry(now);
                job
            })
            .filter(|job| filter.matches(job))
            .collect())
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, Error> {
        let mut job = self.load(id).await?;
        if job.refresh_expiry(self.now()) {
            debug!(job_id = %id, "job observed past its deadline");
        }
        Ok(job)
    }
}

#[async_trait]
impl<J, U> JobCommand for JobService<J, U>
where
    J: JobRepository,
    U: UserRepository,
{
    async fn create_job(&self, creator: &UserId, draft: JobDraft) -> Result<Job, Error> {
        self.user_repo
            .find_by_id(creator)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {creator} not found")))?;

        let job = Job::create(JobId::random(), creator.clone(), draft, self.now(), self.job_lifetime)
            .map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
            })?;

        self.job_repo
            .insert(&job)
            .await
            .map_err(map_job_repository_error)?;

        info!(job_id = %job.id(), actor = %creator, "job created");
        Ok(job)
    }

    async fn update_job(
        &self,
        id: &JobId,
        caller: &UserId,
        update: JobUpdate,
    ) -> Result<Job, Error> {
        self.transition(id, caller, JobAction::Update, |job, now| {
            job.update(caller, update, now)
        })
        .await
    }

    async fn delete_job(&self, id: &JobId, caller: &UserId) -> Result<(), Error> {
        let job = self.load(id).await?;
        job.authorise_delete(caller).map_err(map_transition_error)?;

        self.job_repo
            .delete(id, job.revision())
            .await
            .map_err(map_job_repository_error)?;

        info!(job_id = %id, actor = %caller, "job deleted");
        Ok(())
    }

    async fn apply_for_job(&self, id: &JobId, caller: &UserId) -> Result<Job, Error> {
        self.transition(id, caller, JobAction::Apply, |job, now| job.apply(caller, now))
            .await
    }

    async fn submit_completion(
        &self,
        id: &JobId,
        caller: &UserId,
        comment: String,
    ) -> Result<Job, Error> {
        self.transition(id, caller, JobAction::SubmitCompletion, |job, now| {
            job.submit_completion(caller, comment, now)
        })
        .await
    }

    async fn approve_completion(
        &self,
        id: &JobId,
        caller: &UserId,
        rating: Option<f64>,
    ) -> Result<Job, Error> {
        let mut job = self.load(id).await?;
        let expected_job_revision = job.revision();

        let approved = job
            .approve(caller, rating, self.now())
            .map_err(map_transition_error)?;

        let job = job.with_revision(expected_job_revision + 1);
        let mut attempts = 0;
        let assignee = loop {
            attempts += 1;
            let current = self
                .user_repo
                .find_by_id(&approved.assignee)
                .await
                .map_err(map_user_repository_error)?
                .ok_or_else(|| {
                    Error::internal(format!(
                        "assignee {} of job {id} not found",
                        approved.assignee
                    ))
                })?;
            let expected_user_revision = current.revision();
            let rated = record_completion(current, approved.rating)
                .with_revision(expected_user_revision + 1);

            match self
                .job_repo
                .save_approval(&job, expected_job_revision, &rated, expected_user_revision)
                .await
            {
                Ok(()) => break rated,
                Err(JobRepositoryError::StaleAssignee { .. })
                    if attempts < APPROVAL_ASSIGNEE_ATTEMPTS =>
                {
                    debug!(job_id = %id, attempts, "assignee changed during approval; re-reading");
                }
                Err(error) => return Err(map_job_repository_error(error)),
            }
        };

        info!(
            job_id = %id,
            actor = %caller,
            assignee = %assignee.id(),
            rating = approved.rating.value(),
            average = assignee.rating().value(),
            "job completion approved"
        );
        Ok(job)
    }

    async fn reject_completion(&self, id: &JobId, caller: &UserId) -> Result<Job, Error> {
        self.transition(id, caller, JobAction::Reject, |job, now| job.reject(caller, now))
            .await
    }
}

#[cfg(test)]
#[path = "job_service_tests.rs"]
mod tests;
