//! Library behind the moral-weights survey: repeated forced-choice dilemmas
//! aggregated into per-entity preference scores, plus the storage-side
//! collection surface for submitted outcomes.

pub mod config;
pub mod error;
pub mod survey;
pub mod telemetry;
