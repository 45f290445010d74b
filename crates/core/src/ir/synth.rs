//! Signature and dispatch synthesis.
//!
//! Turns an overload set plus its analysis into one [`BindingDecl`]:
//! parameters, guards on shared inputs, one dispatch branch per member over
//! the varying inputs, and the fallback failure.

use std::collections::HashMap;

use tracing::debug;

use super::analysis::{Collapse, OverloadAnalysis, PositionAnalysis};
use super::api::{
    BindingDecl, BindingKind, DispatchBranch, Fallback, GENERIC_PLACEHOLDER, GenericParam,
    GuardClause, NodeInput, ParamDecl, ParamLabel, ParamType, TypeCheck, Wiring,
};
use super::category::{EnumRegistry, join_categories};
use super::model::Literal;
use super::overload::OverloadSet;
use super::utils::lower_camel_case;
use crate::diagnostics::{DiagnosticMessage, Diagnostics};
use crate::error::{GenerateError, Result};

/// Synthesize the binding for one analyzed overload set.
pub fn synthesize(
    set: &OverloadSet,
    analysis: &OverloadAnalysis,
    enums: &EnumRegistry,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Result<BindingDecl> {
    if analysis.base_name != set.base_name {
        return Err(GenerateError::internal(format!(
            "analysis of '{}' paired with overload set '{}'",
            analysis.base_name, set.base_name
        )));
    }
    let name = lower_camel_case(&set.base_name);

    let params = analysis
        .positions
        .iter()
        .map(|position| param(set, analysis, position, enums, diagnostics))
        .collect::<Result<Vec<_>>>()?;

    let guards = analysis
        .positions
        .iter()
        .filter(|p| p.shared_type && p.collapse.is_none() && !p.interface_only && !p.is_enum())
        .map(|p| GuardClause {
            check: TypeCheck {
                param: p.index,
                data_type: p.runtime_types[0].clone(),
            },
        })
        .collect();

    let discriminating = analysis.discriminating_positions();
    let branches = branches(set, &name, &discriminating, strict, diagnostics);
    let fallback = (!discriminating.is_empty()).then(|| Fallback {
        reported: discriminating.clone(),
    });

    let kind = if set.arity() == 0 && set.is_single() {
        BindingKind::Source
    } else {
        BindingKind::Operation
    };

    let generic = analysis.generic.as_ref().map(|g| GenericParam {
        name: GENERIC_PLACEHOLDER.to_string(),
        bound: g.bound.clone(),
    });
    let return_type = if generic.is_some() {
        ParamType::Generic
    } else {
        ParamType::Category(analysis.return_category.clone())
    };

    debug!(
        binding = %name,
        members = set.members.len(),
        branches = branches.len(),
        generic = generic.is_some(),
        "Synthesized binding."
    );

    Ok(BindingDecl {
        availability: availability(set, &name, diagnostics),
        doc: doc_lines(set),
        name,
        base_name: set.base_name.clone(),
        kind,
        generic,
        params,
        return_type,
        guards,
        branches,
        fallback,
    })
}

fn param(
    set: &OverloadSet,
    analysis: &OverloadAnalysis,
    position: &PositionAnalysis,
    enums: &EnumRegistry,
    diagnostics: &mut Diagnostics,
) -> Result<ParamDecl> {
    let (ty, wiring) = match &position.collapse {
        Some(Collapse::Primitive { data_type }) => (
            ParamType::Primitive {
                data_type: data_type.clone(),
            },
            Wiring::Constant {
                data_type: data_type.clone(),
            },
        ),
        Some(Collapse::Enum(id)) => (ParamType::Enum(*id), Wiring::EnumConstant),
        None if analysis.is_generic_position(position.index) => {
            (ParamType::Generic, Wiring::Connection)
        }
        None => {
            let category = match position.shared() {
                Some(category) => category.clone(),
                None => join_categories(
                    &position.categories,
                    &format!("input '{}' of '{}'", position.name, set.base_name),
                    diagnostics,
                )?,
            };
            (ParamType::Category(category), Wiring::Connection)
        }
    };

    let default = match (&ty, &position.default) {
        (ParamType::Enum(id), Some(Literal::String(value))) => enums
            .get(*id)
            .filter(|identity| identity.members.contains(value))
            .map(|_| Literal::String(value.clone())),
        (_, default) => default.clone(),
    };

    Ok(ParamDecl {
        name: position.name.clone(),
        label: if position.positional {
            ParamLabel::Positional
        } else {
            ParamLabel::Named
        },
        ty,
        data_type: position.data_types.first().cloned().unwrap_or_default(),
        default,
        wiring,
    })
}

fn branches(
    set: &OverloadSet,
    binding: &str,
    discriminating: &[usize],
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<DispatchBranch> {
    if discriminating.is_empty() && set.members.len() > 1 {
        diagnostics.add(DiagnosticMessage::NoDiscriminator {
            binding: binding.to_string(),
            members: set.members.len(),
            strict,
        });
    }

    let mut seen: HashMap<Vec<TypeCheck>, &str> = HashMap::new();
    let mut branches = Vec::with_capacity(set.members.len());
    for prototype in set.prototypes() {
        let conditions: Vec<TypeCheck> = discriminating
            .iter()
            .map(|&param| TypeCheck {
                param,
                data_type: prototype.inputs[param].runtime_type.clone(),
            })
            .collect();

        if let Some(first) = seen.get(&conditions) {
            // The no-discriminator case was already reported for the whole set.
            if !conditions.is_empty() {
                diagnostics.add(DiagnosticMessage::UnreachableBranch {
                    binding: binding.to_string(),
                    node: prototype.id.clone(),
                    shadowed_by: (*first).to_string(),
                });
            }
            continue;
        }
        seen.insert(conditions.clone(), &prototype.id);

        branches.push(DispatchBranch {
            node_id: prototype.id.clone(),
            conditions,
            inputs: prototype
                .inputs
                .iter()
                .enumerate()
                .map(|(param, input)| NodeInput {
                    name: input.name.clone(),
                    param,
                })
                .collect(),
            output_name: prototype.output.name.clone(),
            output_data_type: prototype.output.data_type.clone(),
        });
    }
    branches
}

fn doc_lines(set: &OverloadSet) -> Vec<String> {
    let display_name = set.prototypes().find_map(|p| p.display_name.clone());
    let description = set.prototypes().find_map(|p| p.description.clone());
    display_name.into_iter().chain(description).collect()
}

/// Shared availability, or the greatest declared one with a warning.
fn availability(set: &OverloadSet, binding: &str, diagnostics: &mut Diagnostics) -> Option<String> {
    let mut declared: Vec<&str> = Vec::new();
    for value in set.prototypes().filter_map(|p| p.availability.as_deref()) {
        if !declared.contains(&value) {
            declared.push(value);
        }
    }
    let chosen = declared
        .iter()
        .max_by(|a, b| version_key(a).cmp(&version_key(b)).then_with(|| a.cmp(b)))?
        .to_string();
    if declared.len() > 1 {
        diagnostics.add(DiagnosticMessage::AvailabilityMismatch {
            binding: binding.to_string(),
            declared: declared.iter().map(ToString::to_string).collect(),
            chosen: chosen.clone(),
        });
    }
    Some(chosen)
}

/// Numeric components of an availability string, e.g. `iOS 18.1` → `[18, 1]`.
fn version_key(value: &str) -> Vec<u64> {
    value
        .split(|c: char| !c.is_ascii_digit())
        .filter_map(|part| part.parse().ok())
        .collect()
}
