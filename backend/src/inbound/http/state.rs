//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, JobCommand, JobQuery};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use marketplace::domain::{JobService, UserAccountService};
/// use marketplace::inbound::http::state::HttpState;
/// use marketplace::outbound::memory::InMemoryStore;
/// use marketplace::outbound::password::Sha256PasswordHasher;
/// use mockable::DefaultClock;
///
/// let store = Arc::new(InMemoryStore::new());
/// let jobs = Arc::new(JobService::new(
///     store.clone(),
///     store.clone(),
///     Arc::new(DefaultClock),
/// ));
/// let accounts = Arc::new(UserAccountService::new(
///     store,
///     Arc::new(Sha256PasswordHasher),
/// ));
/// let state = HttpState::new(jobs.clone(), jobs, accounts);
/// let _queries = state.job_queries.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub jobs: Arc<dyn JobCommand>,
    pub job_queries: Arc<dyn JobQuery>,
    pub accounts: Arc<dyn AccountService>,
}

impl HttpState {
    /// Bundle the driving ports used by the handlers.
    pub fn new(
        jobs: Arc<dyn JobCommand>,
        job_queries: Arc<dyn JobQuery>,
        accounts: Arc<dyn AccountService>,
    ) -> Self {
        Self {
            jobs,
            job_queries,
            accounts,
        }
    }
}
