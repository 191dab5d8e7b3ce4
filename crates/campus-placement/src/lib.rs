//! Core engine for the campus placement portal: entity model, eligibility
//! evaluation, application lifecycle, and placement reporting.
//!
//! The crate deliberately owns no persistence. Callers hand it entity
//! snapshots through the [`placements::applications::PlacementRepository`]
//! trait and receive plain data records back; the HTTP service in
//! `services/api` wires an in-memory implementation for local runs.

pub mod config;
pub mod error;
pub mod placements;
pub mod telemetry;
