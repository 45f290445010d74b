//! Swift binding emitter for node-definition schemas.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Parse: schema JSON -> SchemaStage
//! 2. Analyze: SchemaStage -> BindingModule (all lattice logic resolved)
//! 3. Codegen: BindingModule -> SwiftUnits (Swift AST)
//! 4. Emit: SwiftUnits -> Strings (via Emit trait)

use tracing::info;

use crate::diagnostics::Diagnostics;
use crate::docs::docs_table;
use crate::error::{GenerateError, Result};
use crate::ir::{AnalysisSession, Emit, codegen_module};
use crate::schema::{DescriptionTable, SchemaStage};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub strict: bool,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub operations: usize,
    pub sources: usize,
    pub enums: usize,
    pub warnings: usize,
}

/// In-memory output of a successful run.
#[derive(Debug, Clone)]
pub struct GeneratedArtifacts {
    pub operations: String,
    pub sources: String,
    /// Binding table for the documentation splice.
    pub docs_table: String,
    /// Warnings only; a run with fatal diagnostics returns an error instead.
    pub diagnostics: Diagnostics,
    pub summary: RunSummary,
}

/// Generate both Swift units from a schema JSON string.
pub fn generate(
    schema_json: &str,
    descriptions: &DescriptionTable,
    options: &GenerateOptions,
) -> Result<GeneratedArtifacts> {
    // Parse schema stage
    let stage = SchemaStage::from_json(schema_json)?;

    // Analyze to binding IR (all lattice logic resolved here)
    let mut session = AnalysisSession::new(options.strict);
    let module = session.run(&stage, descriptions)?;
    let diagnostics = session.into_diagnostics();
    if diagnostics.has_fatal() {
        return Err(GenerateError::Fatal(diagnostics));
    }

    // Generate Swift AST and emit to strings
    let units = codegen_module(&module)?;
    let summary = RunSummary {
        operations: module.operations().count(),
        sources: module.sources().count(),
        enums: module.enums.len(),
        warnings: diagnostics.num_warning(),
    };
    info!(
        operations = summary.operations,
        sources = summary.sources,
        enums = summary.enums,
        warnings = summary.warnings,
        "Generated bindings."
    );

    Ok(GeneratedArtifacts {
        operations: units.operations.emit(),
        sources: units.sources.emit(),
        docs_table: docs_table(&module),
        diagnostics,
        summary,
    })
}
