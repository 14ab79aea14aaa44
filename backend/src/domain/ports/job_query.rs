//! Driving port for job read operations.
//!
//! Jobs returned through this port always carry their resolved status, so an
//! overdue job reads as `expired` even if storage still says otherwise.

use async_trait::async_trait;

use crate::domain::{Error, Job, JobFilter, JobId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobQuery: Send + Sync {
    /// List jobs matching `filter`, newest first.
    async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>, Error>;

    /// Fetch one job; `not_found` when it does not exist.
    async fn get_job(&self, id: &JobId) -> Result<Job, Error>;
}
