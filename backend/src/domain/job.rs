//! Job aggregate and its lifecycle state machine.
//!
//! A job moves `open → in_progress → pending_review → completed`, may bounce
//! from `pending_review` back to `in_progress` on rejection, and becomes
//! `expired` lazily once its deadline passes while non-terminal.
//!
//! Every transition method follows the same guard order: expiry refresh,
//! status precondition, actor authorisation, payload validation. The first
//! failing guard is reported and the job is left untouched.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::expiry::resolve_status;
use crate::domain::{Rating, UserId};

/// Lifetime applied when a job is created without an explicit deadline.
pub const DEFAULT_JOB_LIFETIME: TimeDelta = TimeDelta::days(7);

/// Validation failures for job payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobValidationError {
    #[error("job id must be a valid UUID")]
    InvalidId,
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("time estimate must not be empty")]
    EmptyTimeEstimate,
    #[error("reward must be a non-negative number")]
    InvalidReward,
    #[error("address must not be empty")]
    EmptyAddress,
    #[error("longitude must be between -180 and 180")]
    LongitudeOutOfRange,
    #[error("latitude must be between -90 and 90")]
    LatitudeOutOfRange,
    #[error("category must be one of Delivery, Shopping, Cleaning, Moving, Assembly, Other")]
    UnknownCategory,
    #[error("status must be one of open, in_progress, pending_review, completed, cancelled, expired")]
    UnknownStatus,
    #[error("rating must be a number between 0 and 5")]
    InvalidRating,
}

impl JobValidationError {
    /// Payload field the error refers to, in wire casing.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyTitle => "title",
            Self::EmptyDescription => "description",
            Self::EmptyTimeEstimate => "timeEstimate",
            Self::InvalidReward => "reward",
            Self::EmptyAddress => "location.address",
            Self::LongitudeOutOfRange | Self::LatitudeOutOfRange => "location.coordinates",
            Self::UnknownCategory => "category",
            Self::UnknownStatus => "status",
            Self::InvalidRating => "rating",
        }
    }
}

/// Server-assigned job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| JobValidationError::InvalidId)
    }
}

/// Kind of errand being posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobCategory {
    Delivery,
    Shopping,
    Cleaning,
    Moving,
    Assembly,
    Other,
}

impl JobCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delivery => "Delivery",
            Self::Shopping => "Shopping",
            Self::Cleaning => "Cleaning",
            Self::Moving => "Moving",
            Self::Assembly => "Assembly",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for JobCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobCategory {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Delivery" => Ok(Self::Delivery),
            "Shopping" => Ok(Self::Shopping),
            "Cleaning" => Ok(Self::Cleaning),
            "Moving" => Ok(Self::Moving),
            "Assembly" => Ok(Self::Assembly),
            "Other" => Ok(Self::Other),
            _ => Err(JobValidationError::UnknownCategory),
        }
    }
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    PendingReview,
    Completed,
    Cancelled,
    Expired,
}

impl JobStatus {
    /// Terminal statuses are never rewritten, not even by expiry.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::PendingReview => "pending_review",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = JobValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "pending_review" => Ok(Self::PendingReview),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "expired" => Ok(Self::Expired),
            _ => Err(JobValidationError::UnknownStatus),
        }
    }
}

/// Monetary reward offered for a job.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Reward(f64);

impl Reward {
    /// Validate a reward; it must be finite and non-negative.
    pub fn new(amount: f64) -> Result<Self, JobValidationError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(JobValidationError::InvalidReward);
        }
        Ok(Self(amount))
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

/// Longitude/latitude pair, in that order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    longitude: f64,
    latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, JobValidationError> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(JobValidationError::LongitudeOutOfRange);
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(JobValidationError::LatitudeOutOfRange);
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(self) -> f64 {
        self.longitude
    }

    pub fn latitude(self) -> f64 {
        self.latitude
    }
}

/// Where the job takes place.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    address: String,
    coordinates: Coordinates,
}

impl Location {
    pub fn new(address: impl Into<String>, coordinates: Coordinates) -> Result<Self, JobValidationError> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(JobValidationError::EmptyAddress);
        }
        Ok(Self {
            address: trimmed.to_owned(),
            coordinates,
        })
    }

    pub fn address(&self) -> &str {
        self.address.as_str()
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }
}

/// The assignee's claim that the work is done, awaiting creator review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    comment: String,
    submitted_at: DateTime<Utc>,
}

impl CompletionRequest {
    pub fn comment(&self) -> &str {
        self.comment.as_str()
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

/// Raw location input before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDraft {
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl TryFrom<LocationDraft> for Location {
    type Error = JobValidationError;

    fn try_from(value: LocationDraft) -> Result<Self, Self::Error> {
        Location::new(
            value.address,
            Coordinates::new(value.longitude, value.latitude)?,
        )
    }
}

/// Creator-supplied fields for a new job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub category: JobCategory,
    pub reward: f64,
    pub location: LocationDraft,
    pub time_estimate: String,
    /// Explicit deadline; defaults to creation time plus the configured lifetime.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Replacement fields for an open job. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Category name as supplied; parsed once the status and creator checks pass.
    pub category: Option<String>,
    pub reward: Option<f64>,
    pub location: Option<LocationDraft>,
    pub time_estimate: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Creator-initiated or assignee-initiated actions on a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Apply,
    SubmitCompletion,
    Approve,
    Reject,
    Update,
    Delete,
}

impl JobAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply for",
            Self::SubmitCompletion => "submit completion for",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JobTransitionError {
    /// The job's resolved status does not allow the action.
    #[error("cannot {action} a job that is {status}")]
    InvalidState { action: JobAction, status: JobStatus },
    /// The caller is not the participant allowed to act.
    #[error("{reason}")]
    Forbidden {
        action: JobAction,
        reason: &'static str,
    },
    /// The payload failed validation.
    #[error(transparent)]
    Validation(#[from] JobValidationError),
    /// A reviewed job lost its assignee; stored data is corrupt.
    #[error("job {0} is under review without an assignee")]
    MissingAssignee(JobId),
}

/// Outcome of an approval, consumed by the rating aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovedCompletion {
    pub assignee: UserId,
    pub rating: Rating,
}

fn required_text(value: String, error: JobValidationError) -> Result<String, JobValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_owned())
}

/// A postable, biddable task with a monetary reward.
///
/// ## Invariants
/// - `assignee` is `Some` once the job has been applied for and is never
///   cleared afterwards.
/// - `completion_request` is `Some` only while `pending_review`.
/// - `completed_at` is `Some` only once `completed`.
/// - Stored `status` may lag the clock; callers observe
///   [`Job::refresh_expiry`]'s result, never the raw stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    id: JobId,
    title: String,
    description: String,
    category: JobCategory,
    reward: Reward,
    location: Location,
    time_estimate: String,
    status: JobStatus,
    created_by: UserId,
    assigned_to: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    completion_request: Option<CompletionRequest>,
    revision: u32,
}

impl Job {
    /// Validate a draft and open a new job owned by `creator`.
    pub fn create(
        id: JobId,
        creator: UserId,
        draft: JobDraft,
        now: DateTime<Utc>,
        lifetime: TimeDelta,
    ) -> Result<Self, JobValidationError> {
        let JobDraft {
            title,
            description,
            category,
            reward,
            location,
            time_estimate,
            expires_at,
        } = draft;

        Ok(Self {
            id,
            title: required_text(title, JobValidationError::EmptyTitle)?,
            description: required_text(description, JobValidationError::EmptyDescription)?,
            category,
            reward: Reward::new(reward)?,
            location: Location::try_from(location)?,
            time_estimate: required_text(time_estimate, JobValidationError::EmptyTimeEstimate)?,
            status: JobStatus::Open,
            created_by: creator,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            expires_at: expires_at.unwrap_or(now + lifetime),
            completed_at: None,
            completion_request: None,
            revision: 1,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn category(&self) -> JobCategory {
        self.category
    }

    pub fn reward(&self) -> Reward {
        self.reward
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn time_estimate(&self) -> &str {
        self.time_estimate.as_str()
    }

    /// Stored status. Call [`Job::refresh_expiry`] before trusting it.
    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn completion_request(&self) -> Option<&CompletionRequest> {
        self.completion_request.as_ref()
    }

    /// Storage revision used for compare-and-swap writes.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Set the storage revision. Intended for services and adapters.
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Whether `user` is the job's creator.
    pub fn is_creator(&self, user: &UserId) -> bool {
        &self.created_by == user
    }

    /// Whether `user` is the job's assignee.
    pub fn is_assignee(&self, user: &UserId) -> bool {
        self.assigned_to.as_ref() == Some(user)
    }

    /// Apply lazy expiry, returning `true` when the status changed.
    pub fn refresh_expiry(&mut self, now: DateTime<Utc>) -> bool {
        let resolved = resolve_status(self, now);
        if resolved == self.status {
            return false;
        }
        self.status = resolved;
        true
    }

    fn require_status(&self, expected: JobStatus, action: JobAction) -> Result<(), JobTransitionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(JobTransitionError::InvalidState {
                action,
                status: self.status,
            })
        }
    }

    fn require_creator(
        &self,
        actor: &UserId,
        action: JobAction,
        reason: &'static str,
    ) -> Result<(), JobTransitionError> {
        if self.is_creator(actor) {
            Ok(())
        } else {
            Err(JobTransitionError::Forbidden { action, reason })
        }
    }

    /// `open → in_progress`, assigning the job to `actor`.
    pub fn apply(&mut self, actor: &UserId, now: DateTime<Utc>) -> Result<(), JobTransitionError> {
        self.refresh_expiry(now);
        self.require_status(JobStatus::Open, JobAction::Apply)?;
        if self.is_creator(actor) {
            return Err(JobTransitionError::Forbidden {
                action: JobAction::Apply,
                reason: "cannot apply for your own job",
            });
        }

        self.assigned_to = Some(actor.clone());
        self.status = JobStatus::InProgress;
        self.updated_at = now;
        Ok(())
    }

    /// `in_progress → pending_review`, recording the assignee's claim.
    pub fn submit_completion(
        &mut self,
        actor: &UserId,
        comment: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), JobTransitionError> {
        self.refresh_expiry(now);
        self.require_status(JobStatus::InProgress, JobAction::SubmitCompletion)?;
        if !self.is_assignee(actor) {
            return Err(JobTransitionError::Forbidden {
                action: JobAction::SubmitCompletion,
                reason: "only the assignee may submit completion",
            });
        }

        self.completion_request = Some(CompletionRequest {
            comment: comment.into().trim().to_owned(),
            submitted_at: now,
        });
        self.status = JobStatus::PendingReview;
        self.updated_at = now;
        Ok(())
    }

    /// `pending_review → completed`, returning the rating to aggregate.
    ///
    /// `rating` is `None` when the caller sent no numeric rating. The rating
    /// is validated after the status and creator checks and before any field
    /// changes, so a rejected rating leaves the job exactly as it was.
    pub fn approve(
        &mut self,
        actor: &UserId,
        rating: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<ApprovedCompletion, JobTransitionError> {
        self.refresh_expiry(now);
        self.require_status(JobStatus::PendingReview, JobAction::Approve)?;
        self.require_creator(
            actor,
            JobAction::Approve,
            "only the creator may approve completion",
        )?;
        let rating = rating
            .and_then(|value| Rating::new(value).ok())
            .ok_or(JobValidationError::InvalidRating)?;
        let assignee = self
            .assigned_to
            .clone()
            .ok_or(JobTransitionError::MissingAssignee(self.id))?;

        self.status = JobStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(ApprovedCompletion { assignee, rating })
    }

    /// `pending_review → in_progress`, discarding the completion claim.
    ///
    /// The assignee is kept so they can resubmit.
    pub fn reject(&mut self, actor: &UserId, now: DateTime<Utc>) -> Result<(), JobTransitionError> {
        self.refresh_expiry(now);
        self.require_status(JobStatus::PendingReview, JobAction::Reject)?;
        self.require_creator(
            actor,
            JobAction::Reject,
            "only the creator may reject completion",
        )?;

        self.completion_request = None;
        self.status = JobStatus::InProgress;
        self.updated_at = now;
        Ok(())
    }

    /// Replace fields of an open job. All replacements are validated before
    /// any is applied.
    pub fn update(
        &mut self,
        actor: &UserId,
        update: JobUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), JobTransitionError> {
        self.refresh_expiry(now);
        self.require_status(JobStatus::Open, JobAction::Update)?;
        self.require_creator(actor, JobAction::Update, "only the creator may update this job")?;

        let JobUpdate {
            title,
            description,
            category,
            reward,
            location,
            time_estimate,
            expires_at,
        } = update;

        let title = title
            .map(|value| required_text(value, JobValidationError::EmptyTitle))
            .transpose()?;
        let description = description
            .map(|value| required_text(value, JobValidationError::EmptyDescription))
            .transpose()?;
        let category = category
            .as_deref()
            .map(JobCategory::from_str)
            .transpose()?;
        let reward = reward.map(Reward::new).transpose()?;
        let location = location.map(Location::try_from).transpose()?;
        let time_estimate = time_estimate
            .map(|value| required_text(value, JobValidationError::EmptyTimeEstimate))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(reward) = reward {
            self.reward = reward;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(time_estimate) = time_estimate {
            self.time_estimate = time_estimate;
        }
        if let Some(expires_at) = expires_at {
            self.expires_at = expires_at;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Check that `actor` may delete the job. Deletion has no status guard.
    pub fn authorise_delete(&self, actor: &UserId) -> Result<(), JobTransitionError> {
        self.require_creator(actor, JobAction::Delete, "only the creator may delete this job")
    }
}

/// Query criteria understood by job repositories.
///
/// `status` compares against the resolved status; repositories may only
/// narrow by the stored fields and leave status filtering to the service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub created_by: Option<UserId>,
    pub assigned_to: Option<UserId>,
    pub expires_before: Option<DateTime<Utc>>,
    pub expires_after: Option<DateTime<Utc>>,
}

impl JobFilter {
    /// Copy of this filter without the status criterion.
    #[must_use]
    pub fn without_status(&self) -> Self {
        Self {
            status: None,
            ..self.clone()
        }
    }

    /// Whether `job` satisfies every criterion, comparing its current status.
    pub fn matches(&self, job: &Job) -> bool {
        self.status.is_none_or(|status| job.status() == status)
            && self
                .created_by
                .as_ref()
                .is_none_or(|creator| job.created_by() == creator)
            && self
                .assigned_to
                .as_ref()
                .is_none_or(|assignee| job.assigned_to() == Some(assignee))
            && self
                .expires_before
                .is_none_or(|before| job.expires_at() < before)
            && self
                .expires_after
                .is_none_or(|after| job.expires_at() > after)
    }
}
