//! Server settings loaded via OrthoConfig.

use std::net::{Ipv4Addr, SocketAddr};

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_JOB_LIFETIME;

const DEFAULT_PORT: u16 = 8080;

/// Listener and lifecycle settings, read from `MARKETPLACE_*` variables,
/// configuration files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// Days a job stays open when posted without a deadline.
    pub job_lifetime_days: Option<u32>,
}

impl ServerSettings {
    /// Configured listener address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)))
    }

    /// Configured default job lifetime, falling back to seven days.
    pub fn job_lifetime(&self) -> TimeDelta {
        self.job_lifetime_days
            .map_or(DEFAULT_JOB_LIFETIME, |days| TimeDelta::days(i64::from(days)))
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("marketplace")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("MARKETPLACE_BIND_ADDR", None::<String>),
            ("MARKETPLACE_JOB_LIFETIME_DAYS", None::<String>),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(settings.job_lifetime(), TimeDelta::days(7));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MARKETPLACE_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("MARKETPLACE_JOB_LIFETIME_DAYS", Some("3".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(settings.job_lifetime(), TimeDelta::days(3));
    }
}
