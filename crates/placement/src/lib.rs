//! Core library for the campus placement service.
//!
//! Domain workflows (student directory, company drives, assessments,
//! notifications, interview scheduling) live under [`workflows`]; persistence
//! is expressed as repository traits so the HTTP service and tests can supply
//! their own stores.

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;
