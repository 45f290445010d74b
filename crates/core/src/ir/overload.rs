//! Overload grouping: type-specialized prototypes collected under one base name.

use std::collections::BTreeMap;

use tracing::debug;

use super::model::NodePrototype;
use crate::diagnostics::{DiagnosticMessage, Diagnostics};

/// Recognized type-suffix tokens, tried in order.
///
/// A token never follows one of its own textual suffixes, otherwise the
/// shorter token would match first.
pub const TYPE_SUFFIXES: &[&str] = &[
    "_color3FA",
    "_color4FA",
    "_vector2FA",
    "_vector3FA",
    "_vector4FA",
    "_matrix33FA",
    "_matrix44FA",
    "_color3I",
    "_color4I",
    "_vector2I",
    "_vector3I",
    "_vector4I",
    "_color3",
    "_color4",
    "_vector2",
    "_vector3",
    "_vector4",
    "_integer2",
    "_integer3",
    "_integer4",
    "_matrix22",
    "_matrix33",
    "_matrix44",
    "_float",
    "_half",
    "_integer",
    "_boolean",
    "_filename",
];

/// Split a prototype name into its base and recognized type suffix.
///
/// `base + suffix` always reconstructs `name`.
pub fn suffix_of(name: &str) -> (&str, Option<&'static str>) {
    for &suffix in TYPE_SUFFIXES {
        if let Some(base) = name.strip_suffix(suffix)
            && !base.is_empty()
        {
            return (base, Some(suffix));
        }
    }
    (name, None)
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverloadMember {
    pub suffix: Option<String>,
    pub prototype: NodePrototype,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverloadSet {
    pub base_name: String,
    /// Members in schema order.
    pub members: Vec<OverloadMember>,
}

impl OverloadSet {
    fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            members: Vec::new(),
        }
    }

    /// Input count of the first member.
    pub fn arity(&self) -> usize {
        self.members.first().map_or(0, |m| m.prototype.arity())
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }

    pub fn prototypes(&self) -> impl Iterator<Item = &NodePrototype> {
        self.members.iter().map(|m| &m.prototype)
    }

    /// True when every input position reports the same runtime type in every member.
    fn inputs_indistinguishable(&self) -> bool {
        let Some(first) = self.members.first() else {
            return true;
        };
        self.members.iter().skip(1).all(|member| {
            member
                .prototype
                .inputs
                .iter()
                .zip(&first.prototype.inputs)
                .all(|(a, b)| a.runtime_type == b.runtime_type)
        })
    }
}

/// Partition admitted prototypes into overload sets keyed by base name.
///
/// Sets whose members disagree on arity are reported as fatal and dropped.
/// Sets whose members cannot be told apart by any input are dissolved into
/// one single-member set per prototype, keyed by the full prototype name.
pub fn group(
    prototypes: Vec<NodePrototype>,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, OverloadSet> {
    let mut sets: BTreeMap<String, OverloadSet> = BTreeMap::new();
    for prototype in prototypes {
        let (base, suffix) = suffix_of(&prototype.name);
        let base = base.to_string();
        let member = OverloadMember {
            suffix: suffix.map(str::to_string),
            prototype,
        };
        sets.entry(base.clone())
            .or_insert_with(|| OverloadSet::new(base))
            .members
            .push(member);
    }

    sets.retain(|base, set| {
        let expected = set.arity();
        let mut consistent = true;
        for member in &set.members {
            if member.prototype.arity() != expected {
                diagnostics.add(DiagnosticMessage::ArityMismatch {
                    base: base.clone(),
                    node: member.prototype.id.clone(),
                    expected,
                    found: member.prototype.arity(),
                });
                consistent = false;
            }
        }
        consistent
    });

    let dissolved: Vec<String> = sets
        .iter()
        .filter(|(_, set)| !set.is_single() && set.inputs_indistinguishable())
        .map(|(base, _)| base.clone())
        .collect();
    for base in dissolved {
        let Some(set) = sets.remove(&base) else {
            continue;
        };
        debug!(base = %base, members = set.members.len(), "Dissolving overload set with indistinguishable inputs.");
        for member in set.members {
            let name = member.prototype.name.clone();
            if let Some(existing) = sets.get(&name) {
                diagnostics.add(DiagnosticMessage::DuplicateBinding {
                    name: name.clone(),
                    first: existing
                        .members
                        .first()
                        .map_or_else(String::new, |m| m.prototype.id.clone()),
                    second: member.prototype.id.clone(),
                });
                continue;
            }
            let mut single = OverloadSet::new(name.clone());
            single.members.push(OverloadMember {
                suffix: None,
                prototype: member.prototype,
            });
            sets.insert(name, single);
        }
    }

    sets
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ir::category::Category;
    use crate::ir::model::{Connectability, Property, runtime_type};

    fn property(name: &str, data_type: &str, category: Category) -> Property {
        Property {
            qualified_name: format!("inputs:{name}"),
            name: name.to_string(),
            data_type: data_type.to_string(),
            runtime_type: runtime_type(data_type),
            is_array: false,
            default: None,
            connectability: Connectability::Free,
            enum_members: None,
            display_name: None,
            category,
        }
    }

    fn proto(name: &str, inputs: &[(&str, &str)], output: &str) -> NodePrototype {
        let category = |t: &str| crate::ir::category::intrinsic_category(t).unwrap();
        NodePrototype {
            id: format!("ND_{name}"),
            name: name.to_string(),
            inputs: inputs
                .iter()
                .map(|(n, t)| property(n, t, category(t)))
                .collect(),
            output: property("out", output, category(output)),
            description: None,
            display_name: None,
            availability: None,
        }
    }

    #[test]
    fn test_suffix_order_has_no_shadowing() {
        for (i, later) in TYPE_SUFFIXES.iter().enumerate() {
            for earlier in &TYPE_SUFFIXES[..i] {
                assert!(
                    !later.ends_with(earlier),
                    "{earlier} shadows {later}; reorder TYPE_SUFFIXES"
                );
            }
        }
    }

    #[test]
    fn test_suffix_of_is_reversible() {
        for name in [
            "add_float",
            "add_color3FA",
            "mix_vector3",
            "ifgreater_integer",
            "noise2d_float",
            "frame",
            "_float",
            "geomcolor_color4",
        ] {
            let (base, suffix) = suffix_of(name);
            assert_eq!(format!("{base}{}", suffix.unwrap_or("")), name);
        }
        assert_eq!(suffix_of("add_color3FA"), ("add", Some("_color3FA")));
        assert_eq!(suffix_of("add_color3"), ("add", Some("_color3")));
        assert_eq!(suffix_of("frame"), ("frame", None));
        assert_eq!(suffix_of("_float"), ("_float", None));
    }

    #[test]
    fn test_group_keeps_schema_order() {
        let mut diagnostics = Diagnostics::new();
        let sets = group(
            vec![
                proto("add_float", &[("in1", "float"), ("in2", "float")], "float"),
                proto("frame", &[], "float"),
                proto("add_color3", &[("in1", "color3f"), ("in2", "color3f")], "color3f"),
                proto("add_vector3", &[("in1", "float3"), ("in2", "float3")], "float3"),
            ],
            &mut diagnostics,
        );
        assert_eq!(sets.keys().collect::<Vec<_>>(), vec!["add", "frame"]);
        let add = &sets["add"];
        let ids: Vec<_> = add.prototypes().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["ND_add_float", "ND_add_color3", "ND_add_vector3"]);
        assert_eq!(add.members[1].suffix.as_deref(), Some("_color3"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_indistinguishable_set_is_dissolved() {
        let mut diagnostics = Diagnostics::new();
        let sets = group(
            vec![
                proto("geomcolor_float", &[("index", "int")], "float"),
                proto("geomcolor_color3", &[("index", "int")], "color3f"),
            ],
            &mut diagnostics,
        );
        assert_eq!(
            sets.keys().collect::<Vec<_>>(),
            vec!["geomcolor_color3", "geomcolor_float"]
        );
        assert!(sets.values().all(OverloadSet::is_single));
        assert!(sets.values().all(|s| s.members[0].suffix.is_none()));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_aliased_inputs_are_indistinguishable() {
        let mut diagnostics = Diagnostics::new();
        let sets = group(
            vec![
                proto("shift_vector3", &[("in", "float3")], "float3"),
                proto("shift_vector3FA", &[("in", "normal3f")], "float3"),
            ],
            &mut diagnostics,
        );
        assert_eq!(
            sets.keys().collect::<Vec<_>>(),
            vec!["shift_vector3", "shift_vector3FA"]
        );
        assert!(sets.values().all(OverloadSet::is_single));
    }

    #[test]
    fn test_arity_mismatch_is_fatal() {
        let mut diagnostics = Diagnostics::new();
        let sets = group(
            vec![
                proto("mix_float", &[("fg", "float"), ("bg", "float")], "float"),
                proto(
                    "mix_color3",
                    &[("fg", "color3f"), ("bg", "color3f"), ("mix", "float")],
                    "color3f",
                ),
            ],
            &mut diagnostics,
        );
        assert!(sets.is_empty());
        assert!(diagnostics.has_fatal());
        assert_eq!(diagnostics.count_kind("arity_mismatch"), 1);
    }
}
