//! Driving port for job lifecycle mutations.
//!
//! Inbound adapters call this port with the authenticated caller's id; the
//! implementation owns every guard, so adapters never inspect job state.

use async_trait::async_trait;

use crate::domain::{Error, Job, JobDraft, JobId, JobUpdate, UserId};

/// Driving port for job write operations.
///
/// Every method that targets an existing job reports failures in a fixed
/// order: `not_found`, then `invalid_state` (including expiry), then
/// `forbidden`, then `invalid_request`. A lost compare-and-swap race is
/// reported as `conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobCommand: Send + Sync {
    /// Post a new open job owned by `creator`.
    async fn create_job(&self, creator: &UserId, draft: JobDraft) -> Result<Job, Error>;

    /// Replace fields of an open job. Creator only.
    async fn update_job(
        &self,
        id: &JobId,
        caller: &UserId,
        update: JobUpdate,
    ) -> Result<Job, Error>;

    /// Remove a job. Creator only.
    async fn delete_job(&self, id: &JobId, caller: &UserId) -> Result<(), Error>;

    /// Claim an open job on behalf of `caller`.
    async fn apply_for_job(&self, id: &JobId, caller: &UserId) -> Result<Job, Error>;

    /// Submit the assignee's completion claim for review.
    async fn submit_completion(
        &self,
        id: &JobId,
        caller: &UserId,
        comment: String,
    ) -> Result<Job, Error>;

    /// Accept a completion and fold `rating` into the assignee's average.
    ///
    /// `rating` is `None` when the request carried no numeric rating; it is
    /// reported as a validation error only after the status and creator
    /// checks pass. A concurrent rating update of the same assignee is
    /// absorbed by re-reading the assignee; only sustained contention
    /// surfaces as `Conflict`.
    async fn approve_completion(
        &self,
        id: &JobId,
        caller: &UserId,
        rating: Option<f64>,
    ) -> Result<Job, Error>;

    /// Send a completion back to the assignee.
    async fn reject_completion(&self, id: &JobId, caller: &UserId) -> Result<Job, Error>;
}
