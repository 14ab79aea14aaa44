//! Wiring of adapters into the HTTP handler state.

use std::sync::Arc;

use actix_web::web;
use chrono::TimeDelta;
use mockable::Clock;

use crate::domain::{JobService, UserAccountService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::password::Sha256PasswordHasher;

/// Build handler state over a fresh in-memory store.
///
/// Jobs and accounts share one store so approvals can update the job and the
/// assignee's track record atomically.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use marketplace::domain::DEFAULT_JOB_LIFETIME;
/// use marketplace::server::build_http_state;
/// use mockable::DefaultClock;
///
/// let state = build_http_state(Arc::new(DefaultClock), DEFAULT_JOB_LIFETIME);
/// let _accounts = state.accounts.clone();
/// ```
pub fn build_http_state(clock: Arc<dyn Clock>, job_lifetime: TimeDelta) -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::new());
    let jobs = Arc::new(
        JobService::new(store.clone(), store.clone(), clock).with_job_lifetime(job_lifetime),
    );
    let accounts = Arc::new(UserAccountService::new(
        store,
        Arc::new(Sha256PasswordHasher),
    ));

    web::Data::new(HttpState::new(jobs.clone(), jobs, accounts))
}
