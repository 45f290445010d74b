//! Overload analysis.
//!
//! Classifies every input position of an overload set (shared or varying
//! type, generic, collapsed to a host literal, unified default, positional
//! label). The result is immutable and feeds the synthesizer.

use std::collections::BTreeSet;

use super::category::{Category, EnumId, join_categories};
use super::model::{Literal, Property, component_count};
use super::overload::OverloadSet;
use crate::diagnostics::{DiagnosticMessage, Diagnostics};
use crate::error::{GenerateError, Result};

/// Input names that read as an unnamed operand.
const PLACEHOLDER_NAMES: &[&str] = &["in"];

/// Comparison nodes take their two operands positionally.
const COMPARISON_PREFIXES: &[&str] = &["ifgreatereq", "ifgreater", "ifequal", "ifless"];

/// How a position is lowered to a host-native parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collapse {
    /// Interface-only port with one shared concrete type.
    Primitive { data_type: String },
    /// Enumerated port with one structural identity in every member.
    Enum(EnumId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionAnalysis {
    pub index: usize,
    /// Name in the first member.
    pub name: String,
    /// Concrete schema type per member.
    pub data_types: Vec<String>,
    /// Runtime data type per member.
    pub runtime_types: Vec<String>,
    /// Category per member.
    pub categories: Vec<Category>,
    pub shared_type: bool,
    pub shared_category: bool,
    /// Every member marks the port interface-only.
    pub interface_only: bool,
    pub collapse: Option<Collapse>,
    pub default: Option<Literal>,
    pub positional: bool,
}

impl PositionAnalysis {
    pub fn is_enum(&self) -> bool {
        self.shared_category && matches!(self.categories.first(), Some(Category::Enum(_)))
    }

    /// Category shared by every member, if any.
    pub fn shared(&self) -> Option<&Category> {
        if self.shared_category {
            self.categories.first()
        } else {
            None
        }
    }

    /// Positions whose type differs between members take part in dispatch.
    pub fn discriminates(&self) -> bool {
        !self.shared_type && self.collapse.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericInfo {
    /// Input positions typed by the generic placeholder.
    pub positions: BTreeSet<usize>,
    pub bound: Category,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverloadAnalysis {
    pub base_name: String,
    pub member_count: usize,
    pub positions: Vec<PositionAnalysis>,
    pub output_categories: Vec<Category>,
    /// Shared output category, or the join of all output categories.
    pub return_category: Category,
    pub generic: Option<GenericInfo>,
}

impl OverloadAnalysis {
    pub fn is_generic_position(&self, index: usize) -> bool {
        self.generic
            .as_ref()
            .is_some_and(|g| g.positions.contains(&index))
    }

    pub fn discriminating_positions(&self) -> Vec<usize> {
        self.positions
            .iter()
            .filter(|p| p.discriminates())
            .map(|p| p.index)
            .collect()
    }
}

/// Analyze one overload set. Running it twice yields equal results.
pub fn analyze(set: &OverloadSet, diagnostics: &mut Diagnostics) -> Result<OverloadAnalysis> {
    let arity = set.arity();
    let output_categories: Vec<Category> =
        set.prototypes().map(|p| p.output.category.clone()).collect();
    let outputs_shared = all_equal(&output_categories);
    let return_category = join_categories(
        &output_categories,
        &format!("outputs of '{}'", set.base_name),
        diagnostics,
    )?;

    let mut positions = Vec::with_capacity(arity);
    let mut eligible = BTreeSet::new();
    for index in 0..arity {
        let ports: Vec<_> = set.prototypes().map(|p| &p.inputs[index]).collect();
        let data_types: Vec<String> = ports.iter().map(|p| p.data_type.clone()).collect();
        let runtime_types: Vec<String> = ports.iter().map(|p| p.runtime_type.clone()).collect();
        let categories: Vec<Category> = ports.iter().map(|p| p.category.clone()).collect();
        let shared_category = all_equal(&categories);

        if !shared_category && categories.iter().any(|c| matches!(c, Category::Enum(_))) {
            let position = ports.first().map_or_else(String::new, |p| p.name.clone());
            diagnostics.add(DiagnosticMessage::RoleMismatch {
                base: set.base_name.clone(),
                position: position.clone(),
                detail: "members declare different enumerations".to_string(),
            });
            return Err(GenerateError::internal(format!(
                "input '{position}' of '{}' has no common enumeration",
                set.base_name
            )));
        }

        if categories
            .iter()
            .zip(&output_categories)
            .all(|(input, output)| input == output)
        {
            eligible.insert(index);
        }

        let shared_type = all_equal(&runtime_types);
        let interface_only = ports.iter().all(|p| p.is_interface_only());
        let collapse = match categories.first() {
            Some(Category::Enum(id)) if shared_category => Some(Collapse::Enum(*id)),
            _ if shared_type
                && interface_only
                && !categories.contains(&Category::Texture) =>
            {
                Some(Collapse::Primitive {
                    data_type: data_types[0].clone(),
                })
            }
            _ => None,
        };

        positions.push(PositionAnalysis {
            index,
            name: ports.first().map_or_else(String::new, |p| p.name.clone()),
            data_types,
            runtime_types,
            categories,
            shared_type,
            shared_category,
            interface_only,
            collapse,
            default: None,
            positional: false,
        });
    }

    let generic_positions: BTreeSet<usize> = if outputs_shared {
        BTreeSet::new()
    } else {
        eligible
            .into_iter()
            .filter(|i| positions[*i].collapse.is_none())
            .collect()
    };
    let generic = if generic_positions.is_empty() {
        None
    } else {
        Some(GenericInfo {
            positions: generic_positions,
            bound: return_category.clone(),
        })
    };

    for position in &mut positions {
        let is_generic = generic
            .as_ref()
            .is_some_and(|g| g.positions.contains(&position.index));
        if !is_generic {
            position.default = unify_default(set, position);
        }
    }

    let positional = positional_prefix(&set.base_name, &positions);
    for position in positions.iter_mut().take(positional) {
        position.positional = true;
    }

    Ok(OverloadAnalysis {
        base_name: set.base_name.clone(),
        member_count: set.members.len(),
        positions,
        output_categories,
        return_category,
        generic,
    })
}

fn all_equal<T: PartialEq>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0] == w[1])
}

/// Merged default for a position, when every member agrees on a representable value.
fn unify_default(set: &OverloadSet, position: &PositionAnalysis) -> Option<Literal> {
    let mut merged: Option<&Literal> = None;
    for prototype in set.prototypes() {
        let port = &prototype.inputs[position.index];
        let literal = port.default.as_ref()?;
        if !is_representable(port, literal) {
            return None;
        }
        match merged {
            Some(previous) if previous != literal => return None,
            _ => merged = Some(literal),
        }
    }
    merged.cloned()
}

fn is_representable(port: &Property, literal: &Literal) -> bool {
    let width = component_count(&port.runtime_type);
    match (&port.category, literal) {
        (Category::Enum(_), Literal::String(s)) => !s.is_empty(),
        (Category::Scalar, Literal::Float(_) | Literal::Int(_))
        | (Category::Value, Literal::Bool(_))
        | (Category::String, Literal::String(_)) => true,
        (Category::Vector | Category::Color, Literal::Tuple(components)) => {
            width == Some(components.len())
        }
        (Category::Matrix, Literal::Matrix(rows)) => {
            width == Some(rows.len()) && rows.iter().all(|row| row.len() == rows.len())
        }
        _ => false,
    }
}

/// Number of leading positions rendered without an argument label.
fn positional_prefix(base_name: &str, positions: &[PositionAnalysis]) -> usize {
    if COMPARISON_PREFIXES
        .iter()
        .any(|prefix| base_name.starts_with(prefix))
    {
        return positions.len().min(2);
    }
    positions
        .iter()
        .take_while(|p| PLACEHOLDER_NAMES.iter().any(|pattern| is_placeholder(&p.name, pattern)))
        .count()
}

/// `in`, `in1`, `in2`, ... match the placeholder `in`.
fn is_placeholder(name: &str, pattern: &str) -> bool {
    name.strip_prefix(pattern)
        .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
}
