//! Backend entry-point: loads configuration, installs logging and serves the
//! REST API.

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::inbound::http::session_config::{BuildMode, SessionSettings};
use marketplace::server::{AppDependencies, ServerSettings, build_http_state, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = SessionSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        key_fingerprint = %session.key_fingerprint(),
        bind_addr = %settings.bind_addr(),
        job_lifetime_days = settings.job_lifetime().num_days(),
        "starting marketplace"
    );

    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: build_http_state(Arc::new(DefaultClock), settings.job_lifetime()),
        session,
    };
    create_server(deps, &settings)?.await
}
