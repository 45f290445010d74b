//! Intermediate representation for schema to Swift binding generation.
//!
//! This module defines a three-layer architecture:
//! 1. Analysis: prototypes, categories, overload sets and their analyses
//! 2. Binding IR: host-agnostic declarations with guards and dispatch
//! 3. Swift AST IR and emission to code strings via the `Emit` trait
//!
//! The separation allows:
//! - All lattice reasoning resolved before any host syntax exists
//! - Code generation builds structured AST (testable)
//! - Emission is purely mechanical string building
//!
//! ## Module Structure
//!
//! - `model`: schema prims -> node prototypes (filters, typed metadata)
//! - `category`: abstraction categories, lattice join, enum registry
//! - `overload`: suffix stripping and overload grouping
//! - `analysis`: per-set generic inference, collapse and default unification
//! - `api`: binding-level IR (BindingDecl, DispatchBranch, ...)
//! - `synth`: overload analysis -> binding IR
//! - `session`: per-run state threaded through the stages above
//! - `types`: Swift AST IR (SwiftType, SwiftExpr, SwiftStmt, SwiftFile)
//! - `codegen`: binding IR -> Swift AST
//! - `emit`: Swift AST -> code strings (via Emit trait)
//! - `utils`: identifier and string helpers shared across modules

pub mod analysis;
pub mod api;
pub mod category;
pub mod codegen;
mod emit;
pub mod model;
pub mod overload;
mod session;
mod synth;
pub mod types;
pub mod utils;

// Re-export the main entry points
pub use codegen::{GENERATED_HEADER, SwiftUnits, codegen_module};
pub use emit::Emit;
pub use session::AnalysisSession;
pub use synth::synthesize;
pub use types::SwiftFile;
