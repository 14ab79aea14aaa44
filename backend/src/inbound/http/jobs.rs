//! Job API handlers.
//!
//! ```text
//! GET    /api/v1/jobs?status=open&createdBy=<uuid>&assignedTo=<uuid>
//! POST   /api/v1/jobs
//! GET    /api/v1/jobs/{id}
//! PUT    /api/v1/jobs/{id}
//! DELETE /api/v1/jobs/{id}
//! PUT    /api/v1/jobs/{id}/apply
//! POST   /api/v1/jobs/{id}/complete {"comment":"done"}
//! POST   /api/v1/jobs/{id}/approve {"rating":4.5}
//! POST   /api/v1/jobs/{id}/reject
//! ```
//!
//! Reads are public; every mutation acts as the session's user. Handlers
//! only translate payloads, all lifecycle guards run in the domain. Fields
//! whose validity depends on the job's state (`rating`, update `category`)
//! are forwarded raw so the domain reports status and creator failures
//! first.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CompletionRequest, Error, Job, JobCategory, JobDraft, JobFilter, JobId, JobStatus,
    JobUpdate, JobValidationError, Location, LocationDraft, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Address plus `[longitude, latitude]`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    #[schema(example = "221B Baker Street, London")]
    pub address: String,
    #[schema(value_type = Vec<f64>, example = json!([-0.1586, 51.5237]))]
    pub coordinates: [f64; 2],
}

impl From<&Location> for LocationDto {
    fn from(value: &Location) -> Self {
        let coordinates = value.coordinates();
        Self {
            address: value.address().to_owned(),
            coordinates: [coordinates.longitude(), coordinates.latitude()],
        }
    }
}

impl From<LocationDto> for LocationDraft {
    fn from(value: LocationDto) -> Self {
        let [longitude, latitude] = value.coordinates;
        Self {
            address: value.address,
            longitude,
            latitude,
        }
    }
}

/// Assignee's pending completion claim.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequestDto {
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<&CompletionRequest> for CompletionRequestDto {
    fn from(value: &CompletionRequest) -> Self {
        Self {
            comment: value.comment().to_owned(),
            submitted_at: value.submitted_at(),
        }
    }
}

/// Job as returned to clients. User references are plain ids.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[schema(example = "Delivery")]
    pub category: String,
    pub reward: f64,
    pub location: LocationDto,
    #[schema(example = "2 hours")]
    pub time_estimate: String,
    #[schema(example = "open")]
    pub status: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completion_request: Option<CompletionRequestDto>,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id().to_string(),
            title: job.title().to_owned(),
            description: job.description().to_owned(),
            category: job.category().to_string(),
            reward: job.reward().amount(),
            location: job.location().into(),
            time_estimate: job.time_estimate().to_owned(),
            status: job.status().to_string(),
            created_by: job.created_by().to_string(),
            assigned_to: job.assigned_to().map(ToString::to_string),
            created_at: job.created_at(),
            updated_at: job.updated_at(),
            expires_at: job.expires_at(),
            completed_at: job.completed_at(),
            completion_request: job.completion_request().map(Into::into),
        }
    }
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self::from(&job)
    }
}

/// Body for `POST /api/v1/jobs`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    #[schema(example = "Delivery")]
    pub category: String,
    pub reward: f64,
    pub location: LocationDto,
    pub time_estimate: String,
    /// Defaults to seven days after creation.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<CreateJobRequest> for JobDraft {
    type Error = JobValidationError;

    fn try_from(value: CreateJobRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            description: value.description,
            category: JobCategory::from_str(&value.category)?,
            reward: value.reward,
            location: value.location.into(),
            time_estimate: value.time_estimate,
            expires_at: value.expires_at,
        })
    }
}

/// Body for `PUT /api/v1/jobs/{id}`. Omitted fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub reward: Option<f64>,
    pub location: Option<LocationDto>,
    pub time_estimate: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<UpdateJobRequest> for JobUpdate {
    fn from(value: UpdateJobRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            category: value.category,
            reward: value.reward,
            location: value.location.map(Into::into),
            time_estimate: value.time_estimate,
            expires_at: value.expires_at,
        }
    }
}

/// Body for `POST /api/v1/jobs/{id}/complete`. The body itself is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CompleteRequest {
    #[serde(default)]
    pub comment: String,
}

/// Body for `POST /api/v1/jobs/{id}/approve`.
///
/// `rating` is kept as raw JSON; anything but a number reaches the domain as
/// a missing rating.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ApproveRequest {
    #[serde(default)]
    #[schema(value_type = f64, minimum = 0.0, maximum = 5.0, example = 4.5)]
    pub rating: Option<Value>,
}

impl ApproveRequest {
    fn numeric_rating(&self) -> Option<f64> {
        self.rating.as_ref().and_then(Value::as_f64)
    }
}

/// Decode a JSON body that may be omitted entirely.
///
/// An empty body yields `T::default()`; a present but malformed body is an
/// `invalid_request` error.
fn optional_json<T>(body: &[u8]) -> ApiResult<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| Error::invalid_request(format!("invalid JSON payload: {err}")))
}

/// Query string for `GET /api/v1/jobs`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListJobsQuery {
    /// Resolved status, e.g. `open` or `expired`.
    pub status: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
}

fn validation_error(err: JobValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
}

fn parse_user_filter(raw: Option<&str>, field: &'static str) -> ApiResult<Option<UserId>> {
    raw.map(|value| {
        UserId::new(value).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
        })
    })
    .transpose()
}

impl TryFrom<ListJobsQuery> for JobFilter {
    type Error = Error;

    fn try_from(value: ListJobsQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            status: value
                .status
                .as_deref()
                .map(JobStatus::from_str)
                .transpose()
                .map_err(validation_error)?,
            created_by: parse_user_filter(value.created_by.as_deref(), "createdBy")?,
            assigned_to: parse_user_filter(value.assigned_to.as_deref(), "assignedTo")?,
            ..Self::default()
        })
    }
}

fn parse_job_id(raw: &str) -> ApiResult<JobId> {
    JobId::from_str(raw).map_err(validation_error)
}

/// List jobs, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(ListJobsQuery),
    responses(
        (status = 200, description = "Matching jobs", body = [JobResponse]),
        (status = 400, description = "Invalid filter", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "listJobs",
    security([])
)]
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    query: web::Query<ListJobsQuery>,
) -> ApiResult<web::Json<Vec<JobResponse>>> {
    let filter = JobFilter::try_from(query.into_inner())?;
    let jobs = state.job_queries.list_jobs(&filter).await?;
    Ok(web::Json(jobs.iter().map(JobResponse::from).collect()))
}

/// Post a new job as the session's user.
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Creator account not found", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "createJob"
)]
#[post("/jobs")]
pub async fn create_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateJobRequest>,
) -> ApiResult<HttpResponse> {
    let creator = session.require_user_id()?;
    let draft = JobDraft::try_from(payload.into_inner()).map_err(validation_error)?;
    let job = state.jobs.create_job(&creator, draft).await?;
    Ok(HttpResponse::Created().json(JobResponse::from(job)))
}

/// Fetch one job with its current status.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job", body = JobResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Job not found", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "getJob",
    security([])
)]
#[get("/jobs/{id}")]
pub async fn get_job(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<JobResponse>> {
    let id = parse_job_id(&path)?;
    let job = state.job_queries.get_job(&id).await?;
    Ok(web::Json(job.into()))
}

/// Replace fields of an open job. Creator only.
#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Updated job", body = JobResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Caller is not the creator", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Job is not open or was modified concurrently", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "updateJob"
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateJobRequest>,
) -> ApiResult<web::Json<JobResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    let job = state
        .jobs
        .update_job(&id, &caller, payload.into_inner().into())
        .await?;
    Ok(web::Json(job.into()))
}

/// Remove a job. Creator only.
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Caller is not the creator", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Job was modified concurrently", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "deleteJob"
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    state.jobs.delete_job(&id, &caller).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Claim an open job.
#[utoipa::path(
    put,
    path = "/api/v1/jobs/{id}/apply",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job now in progress", body = JobResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Creator cannot apply", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Job is not open or was claimed concurrently", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "applyForJob"
)]
#[put("/jobs/{id}/apply")]
pub async fn apply_for_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<JobResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    let job = state.jobs.apply_for_job(&id, &caller).await?;
    Ok(web::Json(job.into()))
}

/// Submit the assignee's completion claim.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/complete",
    params(("id" = String, Path, description = "Job id")),
    request_body = CompleteRequest,
    responses(
        (status = 200, description = "Job awaiting review", body = JobResponse),
        (status = 400, description = "Malformed body", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Caller is not the assignee", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Job is not in progress", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "submitCompletion"
)]
#[post("/jobs/{id}/complete")]
pub async fn submit_completion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<JobResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    let payload: CompleteRequest = optional_json(&body)?;
    let job = state
        .jobs
        .submit_completion(&id, &caller, payload.comment)
        .await?;
    Ok(web::Json(job.into()))
}

/// Approve a pending completion and rate the assignee.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/approve",
    params(("id" = String, Path, description = "Job id")),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Job completed", body = JobResponse),
        (status = 400, description = "Rating missing or out of range", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Caller is not the creator", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Job is not pending review", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "approveCompletion"
)]
#[post("/jobs/{id}/approve")]
pub async fn approve_completion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<JobResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    let payload: ApproveRequest = optional_json(&body)?;
    let job = state
        .jobs
        .approve_completion(&id, &caller, payload.numeric_rating())
        .await?;
    Ok(web::Json(job.into()))
}

/// Send a pending completion back to the assignee.
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/reject",
    params(("id" = String, Path, description = "Job id")),
    responses(
        (status = 200, description = "Job back in progress", body = JobResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Caller is not the creator", body = Error),
        (status = 404, description = "Job not found", body = Error),
        (status = 409, description = "Job is not pending review", body = Error)
    ),
    tags = ["jobs"],
    operation_id = "rejectCompletion"
)]
#[post("/jobs/{id}/reject")]
pub async fn reject_completion(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<JobResponse>> {
    let caller = session.require_user_id()?;
    let id = parse_job_id(&path)?;
    let job = state.jobs.reject_completion(&id, &caller).await?;
    Ok(web::Json(job.into()))
}

/// Register every job handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_jobs)
        .service(create_job)
        .service(get_job)
        .service(update_job)
        .service(delete_job)
        .service(apply_for_job)
        .service(submit_completion)
        .service(approve_completion)
        .service(reject_completion);
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
