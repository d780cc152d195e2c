//! Pure data types for tsh: jobs and execution results.
//!
//! This crate is a leaf dependency and does no process control or I/O.
//! It exists so the job listing and result types can be shared between the
//! kernel and any front end without dragging in nix or tokio.

pub mod job;
pub mod result;

pub use job::*;
pub use result::*;
