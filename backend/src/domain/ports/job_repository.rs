//! Port for job persistence.
//!
//! The [`JobRepository`] trait stores job documents and performs the
//! compare-and-swap writes every lifecycle transition relies on. Approval is
//! the one transition that touches two documents; it gets its own method so
//! adapters can commit both writes atomically.

use async_trait::async_trait;

use crate::domain::{Job, JobFilter, JobId, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job repository adapters.
    pub enum JobRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "job repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "job repository query failed: {message}",
        /// A job with the same identifier already exists.
        Duplicate { id: String } =>
            "job {id} already exists",
        /// The document to replace no longer exists.
        Missing { id: String } =>
            "record {id} no longer exists",
        /// Optimistic concurrency check failed.
        RevisionMismatch { expected: u32, actual: u32 } =>
            "revision mismatch: expected {expected}, found {actual}",
        /// The assignee's record moved on while an approval was computed.
        StaleAssignee { id: String, expected: u32, actual: u32 } =>
            "assignee {id} changed: expected revision {expected}, found {actual}",
    }
}

/// Port for job storage and retrieval.
///
/// # Revision Semantics
///
/// - New jobs are inserted at revision 1.
/// - Replacements name the revision they were computed from; a write whose
///   `expected_revision` differs from the stored one fails with
///   [`JobRepositoryError::RevisionMismatch`] and changes nothing.
/// - The caller sets the new revision on the document before saving. The
///   repository does not auto-increment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Store a brand-new job.
    async fn insert(&self, job: &Job) -> Result<(), JobRepositoryError>;

    /// Fetch a job by identifier, as stored.
    async fn find_by_id(&self, id: &JobId) -> Result<Option<Job>, JobRepositoryError>;

    /// Fetch every job matching `filter`, newest first.
    async fn list(&self, filter: &JobFilter) -> Result<Vec<Job>, JobRepositoryError>;

    /// Replace a job if its stored revision equals `expected_revision`.
    async fn save(&self, job: &Job, expected_revision: u32) -> Result<(), JobRepositoryError>;

    /// Remove a job if its stored revision equals `expected_revision`.
    async fn delete(&self, id: &JobId, expected_revision: u32) -> Result<(), JobRepositoryError>;

    /// Persist an approved job together with its assignee's new track record.
    ///
    /// Both compare-and-swap checks run before either write; when one fails
    /// neither document changes. A stale job revision is reported as
    /// [`JobRepositoryError::RevisionMismatch`], a stale assignee revision as
    /// [`JobRepositoryError::StaleAssignee`].
    async fn save_approval(
        &self,
        job: &Job,
        expected_job_revision: u32,
        assignee: &User,
        expected_user_revision: u32,
    ) -> Result<(), JobRepositoryError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn revision_mismatch_error_formats_correctly() {
        let error = JobRepositoryError::revision_mismatch(2_u32, 5_u32);
        let message = error.to_string();

        assert!(message.contains("expected 2"));
        assert!(message.contains("found 5"));
    }

    #[rstest]
    fn stale_assignee_error_names_the_user() {
        let error = JobRepositoryError::stale_assignee("u-1", 4_u32, 6_u32);
        assert_eq!(
            error.to_string(),
            "assignee u-1 changed: expected revision 4, found 6"
        );
    }

    #[rstest]
    fn missing_error_names_the_record() {
        let error = JobRepositoryError::missing("abc");
        assert_eq!(error.to_string(), "record abc no longer exists");
    }
}
