//! Ambient plumbing shared by Tackle services: environment configuration
//! and tracing setup.

pub mod config;
pub mod tracing;
