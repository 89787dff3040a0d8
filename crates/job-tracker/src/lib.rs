//! Tracks the status of submitted job applications by visiting each posting
//! in a shared browser session and recording what the portal reports.

pub mod browser;
pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;
pub mod workflows;
