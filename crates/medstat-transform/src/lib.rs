//! Reconciliation and interval-computation pipeline.
//!
//! Loads nothing and stores nothing itself: the ingest crate supplies the
//! source frames, the store crate takes the shaped records. Data flows
//! strictly forward through the stages in [`pipeline::run_transform`].

pub mod classify;
pub mod context;
pub mod data_utils;
pub mod datetime;
pub mod interval;
pub mod keys;
pub mod pipeline;
pub mod shape;
pub mod window;

pub use context::{ReportWindow, RunContext};
pub use interval::THRESHOLD_SECONDS;
pub use pipeline::{TransformOutput, run_transform};
