//! Per-run analysis state.
//!
//! The enum registry and the diagnostics sink are owned by one
//! [`AnalysisSession`] and threaded through every stage. Nothing is global, so
//! two runs over the same schema produce identical output.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use super::analysis::analyze;
use super::api::{BindingDecl, BindingModule};
use super::category::EnumRegistry;
use super::model::{NodePrototype, load};
use super::overload::{OverloadSet, group};
use super::synth::synthesize;
use crate::diagnostics::{DiagnosticMessage, Diagnostics};
use crate::error::Result;
use crate::schema::{DescriptionTable, SchemaStage};

#[derive(Debug, Default)]
pub struct AnalysisSession {
    strict: bool,
    enums: EnumRegistry,
    diagnostics: Diagnostics,
}

impl AnalysisSession {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            ..Self::default()
        }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn enums(&self) -> &EnumRegistry {
        &self.enums
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Normalize every node prim of the stage, in stage order.
    pub fn load_stage(
        &mut self,
        stage: &SchemaStage,
        descriptions: &DescriptionTable,
    ) -> Result<Vec<NodePrototype>> {
        let mut prototypes = Vec::new();
        let mut excluded = 0usize;
        for prim in stage.node_prims() {
            match load(prim, descriptions, &mut self.enums, &mut self.diagnostics)? {
                Some(prototype) => prototypes.push(prototype),
                None => excluded += 1,
            }
        }
        debug!(
            admitted = prototypes.len(),
            excluded,
            enums = self.enums.len(),
            "Loaded node prototypes."
        );
        Ok(prototypes)
    }

    pub fn build_overloads(
        &mut self,
        prototypes: Vec<NodePrototype>,
    ) -> BTreeMap<String, OverloadSet> {
        group(prototypes, &mut self.diagnostics)
    }

    /// Analyze and synthesize every set, in base-name order.
    ///
    /// A set that fails an internal invariant is reported and skipped so the
    /// remaining sets still surface their diagnostics.
    pub fn synthesize_all(&mut self, sets: &BTreeMap<String, OverloadSet>) -> BindingModule {
        let mut bindings: Vec<BindingDecl> = Vec::with_capacity(sets.len());
        let mut owners: HashMap<String, String> = HashMap::new();

        for set in sets.values() {
            let fatal_before = self.diagnostics.num_fatal();
            let decl = analyze(set, &mut self.diagnostics).and_then(|analysis| {
                synthesize(
                    set,
                    &analysis,
                    &self.enums,
                    self.strict,
                    &mut self.diagnostics,
                )
            });
            let decl = match decl {
                Ok(decl) => decl,
                Err(err) => {
                    if self.diagnostics.num_fatal() == fatal_before {
                        self.diagnostics.add(DiagnosticMessage::Internal {
                            context: format!("overload '{}'", set.base_name),
                            message: err.to_string(),
                        });
                    }
                    continue;
                }
            };

            if let Some(first) = owners.get(&decl.name) {
                self.diagnostics.add(DiagnosticMessage::DuplicateBinding {
                    name: decl.name.clone(),
                    first: first.clone(),
                    second: decl.base_name.clone(),
                });
                continue;
            }
            owners.insert(decl.name.clone(), decl.base_name.clone());
            bindings.push(decl);
        }

        BindingModule {
            enums: self.enums.iter().cloned().collect(),
            bindings,
        }
    }

    /// Run every analysis stage over a parsed stage.
    pub fn run(
        &mut self,
        stage: &SchemaStage,
        descriptions: &DescriptionTable,
    ) -> Result<BindingModule> {
        let prototypes = self.load_stage(stage, descriptions)?;
        let sets = self.build_overloads(prototypes);
        let module = self.synthesize_all(&sets);
        info!(
            overload_sets = sets.len(),
            bindings = module.bindings.len(),
            enums = module.enums.len(),
            warnings = self.diagnostics.num_warning(),
            fatal = self.diagnostics.num_fatal(),
            "Analysis complete."
        );
        Ok(module)
    }
}
