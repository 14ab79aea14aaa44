//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `inbound::http` together with the
//! request and response DTOs and the shared [`Error`](crate::domain::Error)
//! payload. The document backs Swagger UI in debug builds and is printed by
//! the `openapi-dump` binary for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest, UserResponse};
use crate::inbound::http::jobs::{
    ApproveRequest, CompleteRequest, CompletionRequestDto, CreateJobRequest, JobResponse,
    LocationDto, UpdateJobRequest,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login or /api/v1/auth/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Local task marketplace API",
        description = "Post local errands, claim them, submit completions and rate the work."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::jobs::list_jobs,
        crate::inbound::http::jobs::create_job,
        crate::inbound::http::jobs::get_job,
        crate::inbound::http::jobs::update_job,
        crate::inbound::http::jobs::delete_job,
        crate::inbound::http::jobs::apply_for_job,
        crate::inbound::http::jobs::submit_completion,
        crate::inbound::http::jobs::approve_completion,
        crate::inbound::http::jobs::reject_completion,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        JobResponse,
        LocationDto,
        CompletionRequestDto,
        CreateJobRequest,
        UpdateJobRequest,
        CompleteRequest,
        ApproveRequest,
    )),
    tags(
        (name = "auth", description = "Account registration and sessions"),
        (name = "jobs", description = "Job lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).unwrap_or_else(|| panic!("{name} schema")) {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected {name} to be an object schema"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("JobResponse", &["id", "status", "createdBy", "assignedTo", "expiresAt", "completionRequest"])]
    #[case("UserResponse", &["id", "rating", "completedJobs", "createdJobs"])]
    fn schemas_use_wire_field_names(#[case] schema: &str, #[case] fields: &[&str]) {
        let present = object_fields(schema);
        for field in fields {
            assert!(
                present.iter().any(|name| name == field),
                "{schema} should expose '{field}'"
            );
        }
    }

    #[rstest]
    #[case("/api/v1/jobs")]
    #[case("/api/v1/jobs/{id}/apply")]
    #[case("/api/v1/jobs/{id}/approve")]
    #[case("/api/v1/auth/register")]
    #[case("/health/ready")]
    fn documents_route(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
