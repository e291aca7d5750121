//! Driving-license category eligibility.
//!
//! The [`eligibility`] module holds the decision logic: the category rule table, the
//! validators, the existing-license resolver, and the orchestrator that sequences them.
//! [`config`], [`error`], and [`telemetry`] carry the service plumbing shared with the API
//! binary.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod telemetry;
