//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Keep types immutable outside their own transition methods and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Job (alias to `job::Job`): the job aggregate and its state machine.
//! - User (alias to `user::User`): account identity and track record.
//! - JobService / UserAccountService: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod expiry;
pub mod job;
pub mod job_service;
pub mod ports;
pub mod rating;
pub mod trace_id;
pub mod user;

pub use self::account_service::UserAccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, MIN_PASSWORD_LEN, RegistrationRequest,
    RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::job::{
    ApprovedCompletion, CompletionRequest, Coordinates, DEFAULT_JOB_LIFETIME, Job, JobAction,
    JobCategory, JobDraft, JobFilter, JobId, JobStatus, JobTransitionError, JobUpdate,
    JobValidationError, Location, LocationDraft, Reward,
};
pub use self::job_service::JobService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, NewUser, PasswordHash, PhoneNumber, RATING_MAX, RATING_MIN, Rating, User,
    UserId, UserName, UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
