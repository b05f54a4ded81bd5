//! Domain types shared across all Tackle services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/`.

pub mod event;
pub mod id;
pub mod status;
