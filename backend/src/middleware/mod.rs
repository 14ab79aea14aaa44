//! Request middleware.
//!
//! Purpose: lifecycle concerns shared by every route, currently request
//! tracing and trace-id propagation.

pub mod trace;

pub use trace::Trace;
