#![forbid(unsafe_code)]
#![deny(warnings, unused_must_use, dead_code, missing_debug_implementations)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Schema-driven Swift binding generator.
//!
//! Node prototypes from a schema stage are grouped into overload sets,
//! analyzed against the category lattice and synthesized into overloaded
//! Swift bindings with runtime type dispatch.

pub mod artifacts;
pub mod config;
pub mod diagnostics;
pub mod docs;
mod emitter;
pub mod error;
pub mod ir;
pub mod schema;

pub use diagnostics::{DiagnosticLevel, DiagnosticMessage, Diagnostics};
pub use emitter::{GenerateOptions, GeneratedArtifacts, RunSummary, generate};
pub use error::{GenerateError, Result};
pub use schema::DescriptionTable;
