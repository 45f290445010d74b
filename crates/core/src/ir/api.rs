//! Binding-level IR: synthesized declarations, independent of the host language.
//!
//! A [`BindingDecl`] is everything the host printer needs: signature,
//! input guards, dispatch branches and the fallback. No schema lookups or
//! lattice reasoning happen after this point.

use super::category::{Category, EnumId, EnumIdentity};
use super::model::Literal;

/// Name of the generic placeholder in synthesized signatures.
pub const GENERIC_PLACEHOLDER: &str = "T";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Zero inputs and a single member: a named value rather than a call.
    Source,
    Operation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLabel {
    /// Passed without an argument label.
    Positional,
    Named,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// Host-native literal of a schema type.
    Primitive { data_type: String },
    Enum(EnumId),
    /// The generic placeholder.
    Generic,
    Category(Category),
}

/// How an argument is wired into the node's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wiring {
    /// The argument is a graph value and is connected directly.
    Connection,
    /// The literal is wrapped as a constant value of `data_type`.
    Constant { data_type: String },
    /// The enum's raw string is wrapped as a constant string.
    EnumConstant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    pub name: String,
    pub label: ParamLabel,
    pub ty: ParamType,
    /// Schema type of the first member, used to render the default.
    pub data_type: String,
    pub default: Option<Literal>,
    pub wiring: Wiring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    pub name: String,
    pub bound: Category,
}

/// Runtime check that parameter `param` reports the runtime type `data_type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeCheck {
    pub param: usize,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardClause {
    pub check: TypeCheck,
}

/// A node input and the parameter that feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInput {
    pub name: String,
    pub param: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchBranch {
    pub node_id: String,
    /// Conjunction of checks; empty means unconditional.
    pub conditions: Vec<TypeCheck>,
    pub inputs: Vec<NodeInput>,
    pub output_name: String,
    pub output_data_type: String,
}

/// Failure returned when no branch matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// Parameters whose runtime types are reported.
    pub reported: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingDecl {
    /// Host identifier, lower camel case.
    pub name: String,
    pub base_name: String,
    pub kind: BindingKind,
    pub doc: Vec<String>,
    pub availability: Option<String>,
    pub generic: Option<GenericParam>,
    pub params: Vec<ParamDecl>,
    pub return_type: ParamType,
    pub guards: Vec<GuardClause>,
    pub branches: Vec<DispatchBranch>,
    pub fallback: Option<Fallback>,
}

impl BindingDecl {
    /// Node ids reachable from this binding, in dispatch order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.branches.iter().map(|b| b.node_id.as_str())
    }
}

/// Complete binding surface for one run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BindingModule {
    pub enums: Vec<EnumIdentity>,
    /// Sorted by base name.
    pub bindings: Vec<BindingDecl>,
}

impl BindingModule {
    pub fn operations(&self) -> impl Iterator<Item = &BindingDecl> {
        self.bindings
            .iter()
            .filter(|b| b.kind == BindingKind::Operation)
    }

    pub fn sources(&self) -> impl Iterator<Item = &BindingDecl> {
        self.bindings
            .iter()
            .filter(|b| b.kind == BindingKind::Source)
    }

    pub fn enum_identity(&self, id: EnumId) -> Option<&EnumIdentity> {
        self.enums.iter().find(|e| e.id == id)
    }
}
