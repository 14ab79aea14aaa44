//! Local task marketplace backend.
//!
//! Hexagonal layout: [`domain`] holds the job lifecycle, rating and expiry
//! rules behind ports; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports; [`server`] wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
