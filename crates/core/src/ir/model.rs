//! Node model: raw schema prims normalized into typed prototypes.
//!
//! Loose metadata dictionaries are validated exactly once here. Everything
//! downstream works with the explicit fields of [`Property`] and
//! [`NodePrototype`].

use serde_json::Value;
use tracing::debug;

use super::category::{Category, EnumRegistry, category_of, intrinsic_category};
use super::utils::lower_camel_case;
use crate::diagnostics::Diagnostics;
use crate::error::{GenerateError, Result};
use crate::schema::{DescriptionTable, Metadata, NODE_MARKER, Prim, RawProperty};

const INPUT_NAMESPACE: &str = "inputs:";
const OUTPUT_NAMESPACE: &str = "outputs:";

/// Node names starting with this are implementation details of other nodes.
pub const INTERNAL_PREFIX: &str = "Internal";

/// Nodes whose bindings are written by hand.
pub const MANUAL_OVERRIDE_PREFIXES: &[&str] = &[
    "combine",
    "separate",
    "constant_",
    "convert_",
    "swizzle_",
    "extract_",
    "dot_",
    "realitykit_pbr_surfaceshader",
    "realitykit_unlit_surfaceshader",
    "realitykit_geometrymodifier",
];

/// Whether a port may be wired to another node's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectability {
    #[default]
    Free,
    /// Only a constant (interface) value may be supplied.
    InterfaceOnly,
}

/// A typed default value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Vector or color components.
    Tuple(Vec<f64>),
    /// Matrix rows.
    Matrix(Vec<Vec<f64>>),
}

impl Literal {
    /// Convert a JSON default for a property of `data_type`.
    ///
    /// Numbers become `Int` only for integer types, so `0` and `0.0` compare
    /// equal on a float port.
    pub fn from_json(value: &Value, data_type: &str) -> std::result::Result<Option<Self>, String> {
        let literal = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => Literal::Bool(*b),
            Value::Number(n) if is_integer_type(data_type) => match n.as_i64() {
                Some(i) => Literal::Int(i),
                None => return Err(format!("default {n} is not an integer")),
            },
            Value::Number(n) => Literal::Float(number(n)?),
            Value::String(s) => Literal::String(s.clone()),
            Value::Array(items) if items.iter().all(Value::is_number) => {
                Literal::Tuple(items.iter().map(json_number).collect::<std::result::Result<_, _>>()?)
            }
            Value::Array(rows) if rows.iter().all(Value::is_array) => {
                let rows = rows
                    .iter()
                    .map(|row| match row {
                        Value::Array(items) => items.iter().map(json_number).collect(),
                        _ => Err("matrix rows must be arrays".to_string()),
                    })
                    .collect::<std::result::Result<_, _>>()?;
                Literal::Matrix(rows)
            }
            other => return Err(format!("unsupported default value {other}")),
        };
        Ok(Some(literal))
    }
}

fn is_integer_type(data_type: &str) -> bool {
    matches!(data_type, "int" | "uint" | "int2" | "int3" | "int4")
}

fn number(n: &serde_json::Number) -> std::result::Result<f64, String> {
    n.as_f64().ok_or_else(|| format!("default {n} is not a finite number"))
}

fn json_number(value: &Value) -> std::result::Result<f64, String> {
    match value {
        Value::Number(n) => number(n),
        other => Err(format!("expected a number, got {other}")),
    }
}

/// Vendor flags read from `customData.realitykit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorFlags {
    pub unsupported: bool,
    pub deprecated: bool,
    pub availability: Option<String>,
}

/// Validated view of a metadata dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMeta {
    pub enum_members: Option<Vec<String>>,
    pub connectability: Connectability,
    pub display_name: Option<String>,
    pub vendor: VendorFlags,
}

impl PropertyMeta {
    pub fn parse(metadata: &Metadata) -> std::result::Result<Self, String> {
        let enum_members = match (metadata.get("allowedTokens"), metadata.get("enum")) {
            (Some(tokens), _) => token_list(tokens, "allowedTokens")?,
            (None, Some(Value::String(list))) => Some(
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            (None, Some(tokens)) => token_list(tokens, "enum")?,
            (None, None) => None,
        }
        .filter(|members: &Vec<String>| !members.is_empty());

        let connectability = match metadata.get("connectability") {
            None => Connectability::Free,
            Some(Value::String(s)) => match s.as_str() {
                "interfaceOnly" => Connectability::InterfaceOnly,
                "" | "default" => Connectability::Free,
                other => return Err(format!("unknown connectability '{other}'")),
            },
            Some(other) => return Err(format!("connectability must be a string, got {other}")),
        };

        let display_name = optional_string(metadata.get("displayName"), "displayName")?;

        let vendor = match metadata
            .get("customData")
            .and_then(|custom| custom.get("realitykit"))
        {
            None => VendorFlags::default(),
            Some(Value::Object(realitykit)) => VendorFlags {
                unsupported: flag(realitykit.get("unsupported"), "unsupported")?,
                deprecated: flag(realitykit.get("deprecated"), "deprecated")?,
                availability: optional_string(realitykit.get("availability"), "availability")?,
            },
            Some(other) => {
                return Err(format!("customData.realitykit must be a dictionary, got {other}"));
            }
        };

        Ok(Self {
            enum_members,
            connectability,
            display_name,
            vendor,
        })
    }
}

fn token_list(value: &Value, key: &str) -> std::result::Result<Option<Vec<String>>, String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!("{key} members must be strings, got {other}")),
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Some),
        other => Err(format!("{key} must be a list of strings, got {other}")),
    }
}

fn optional_string(value: Option<&Value>, key: &str) -> std::result::Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(format!("{key} must be a string, got {other}")),
    }
}

fn flag(value: Option<&Value>, key: &str) -> std::result::Result<bool, String> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => Ok(n.as_i64().is_some_and(|i| i != 0)),
        Some(other) => Err(format!("{key} must be a boolean, got {other}")),
    }
}

/// Runtime data type of a schema type, i.e. the `SGDataType` case a value of
/// that type reports. Aliases such as `float3`, `normal3f` and `point3f` all
/// report `vector3f`.
pub fn runtime_type(data_type: &str) -> String {
    let case = match data_type {
        "float" | "double" => "float",
        "half" => "half",
        "int" | "uint" => "int",
        "bool" => "bool",
        "string" => "string",
        "token" => "token",
        "asset" => "asset",
        "float2" | "double2" | "vector2f" | "texCoord2f" => "vector2f",
        "float3" | "double3" | "vector3f" | "vector3d" | "normal3f" | "normal3d" | "point3f"
        | "point3d" | "texCoord3f" => "vector3f",
        "float4" | "double4" | "vector4f" => "vector4f",
        "half2" | "texCoord2h" => "vector2h",
        "half3" | "vector3h" | "normal3h" | "point3h" | "texCoord3h" => "vector3h",
        "half4" => "vector4h",
        "int2" => "vector2i",
        "int3" => "vector3i",
        "int4" => "vector4i",
        "color3f" | "color3h" | "color3d" => "color3f",
        "color4f" | "color4h" | "color4d" => "color4f",
        "matrix2d" | "matrix2f" => "matrix2d",
        "matrix3d" | "matrix3f" => "matrix3d",
        "matrix4d" | "matrix4f" => "matrix4d",
        other => return lower_camel_case(other),
    };
    case.to_string()
}

/// Component count of a vector or color runtime type, or the row count of a
/// square matrix.
pub fn component_count(runtime_type: &str) -> Option<usize> {
    match runtime_type {
        "vector2f" | "vector2h" | "vector2i" | "matrix2d" => Some(2),
        "vector3f" | "vector3h" | "vector3i" | "color3f" | "matrix3d" => Some(3),
        "vector4f" | "vector4h" | "vector4i" | "color4f" | "matrix4d" => Some(4),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Namespaced name, e.g. `inputs:in1`.
    pub qualified_name: String,
    pub name: String,
    /// First alias when present, otherwise the declared type.
    pub data_type: String,
    /// [`runtime_type`] of `data_type`. Dispatch compares this.
    pub runtime_type: String,
    pub is_array: bool,
    pub default: Option<Literal>,
    pub connectability: Connectability,
    pub enum_members: Option<Vec<String>>,
    pub display_name: Option<String>,
    pub category: Category,
}

impl Property {
    pub fn is_interface_only(&self) -> bool {
        self.connectability == Connectability::InterfaceOnly
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodePrototype {
    /// Prim name, e.g. `ND_add_float`.
    pub id: String,
    /// Name without the node marker, e.g. `add_float`.
    pub name: String,
    pub inputs: Vec<Property>,
    /// Admitted prototypes have exactly one output.
    pub output: Property,
    pub description: Option<String>,
    pub display_name: Option<String>,
    pub availability: Option<String>,
}

impl NodePrototype {
    pub fn arity(&self) -> usize {
        self.inputs.len()
    }
}

/// Property before category resolution.
struct PendingProperty {
    qualified_name: String,
    name: String,
    data_type: String,
    is_array: bool,
    default: Option<Literal>,
    meta: PropertyMeta,
}

/// Normalize one prim into a prototype.
///
/// `Ok(None)` means the prim was excluded by a support filter; the reason is
/// logged at debug level. Malformed metadata is an error.
pub fn load(
    prim: &Prim,
    descriptions: &DescriptionTable,
    enums: &mut EnumRegistry,
    diagnostics: &mut Diagnostics,
) -> Result<Option<NodePrototype>> {
    let id = prim.name();
    let name = id.strip_prefix(NODE_MARKER).unwrap_or(id);
    if name.starts_with(INTERNAL_PREFIX) {
        debug!(node = %id, "Skipping node: internal.");
        return Ok(None);
    }
    let node_meta = PropertyMeta::parse(&prim.metadata).map_err(|message| {
        GenerateError::InvalidMetadata {
            node: id.to_string(),
            property: "<prim>".to_string(),
            message,
        }
    })?;
    if node_meta.vendor.deprecated {
        debug!(node = %id, "Skipping node: deprecated.");
        return Ok(None);
    }
    if let Some(prefix) = MANUAL_OVERRIDE_PREFIXES
        .iter()
        .find(|prefix| name.starts_with(**prefix))
    {
        debug!(node = %id, prefix = %prefix, "Skipping node: binding is hand-written.");
        return Ok(None);
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for raw in &prim.properties {
        let (bucket, bare) = if let Some(bare) = raw.name.strip_prefix(INPUT_NAMESPACE) {
            (&mut inputs, bare)
        } else if let Some(bare) = raw.name.strip_prefix(OUTPUT_NAMESPACE) {
            (&mut outputs, bare)
        } else {
            continue;
        };
        let pending = pending_property(id, bare, raw)?;
        if pending.meta.vendor.unsupported {
            debug!(node = %id, property = %raw.name, "Dropping unsupported property.");
            continue;
        }
        bucket.push(pending);
    }

    if outputs.len() != 1 {
        debug!(node = %id, outputs = outputs.len(), "Skipping node: needs exactly one output.");
        return Ok(None);
    }
    if inputs.iter().chain(&outputs).any(|p| p.is_array) {
        debug!(node = %id, "Skipping node: array-typed port.");
        return Ok(None);
    }
    let Some(output) = outputs.pop() else {
        return Ok(None);
    };
    if intrinsic_category(&output.data_type) == Some(Category::String) {
        debug!(node = %id, output_type = %output.data_type, "Skipping node: string output.");
        return Ok(None);
    }

    let inputs = inputs
        .into_iter()
        .map(|p| resolve(id, p, enums, diagnostics))
        .collect();
    let output = resolve(id, output, enums, diagnostics);

    Ok(Some(NodePrototype {
        id: id.to_string(),
        name: name.to_string(),
        inputs,
        output,
        description: descriptions.get(id).and_then(clean_description),
        display_name: node_meta.display_name,
        availability: node_meta.vendor.availability,
    }))
}

fn pending_property(node: &str, bare: &str, raw: &RawProperty) -> Result<PendingProperty> {
    let invalid = |message: String| GenerateError::InvalidMetadata {
        node: node.to_string(),
        property: raw.name.clone(),
        message,
    };
    let meta = PropertyMeta::parse(&raw.metadata).map_err(invalid)?;
    let data_type = raw.aliases.first().unwrap_or(&raw.type_name).clone();
    let default = match &raw.default {
        Some(value) => Literal::from_json(value, &data_type).map_err(invalid)?,
        None => None,
    };
    Ok(PendingProperty {
        qualified_name: raw.name.clone(),
        name: bare.to_string(),
        data_type,
        is_array: raw.is_array,
        default,
        meta,
    })
}

fn resolve(
    node: &str,
    pending: PendingProperty,
    enums: &mut EnumRegistry,
    diagnostics: &mut Diagnostics,
) -> Property {
    let category = match &pending.meta.enum_members {
        Some(members) => enums.enum_category(members, node, diagnostics),
        None => category_of(&pending.data_type, node, &pending.name, diagnostics),
    };
    Property {
        qualified_name: pending.qualified_name,
        name: pending.name,
        runtime_type: runtime_type(&pending.data_type),
        data_type: pending.data_type,
        is_array: pending.is_array,
        default: pending.default,
        connectability: pending.meta.connectability,
        enum_members: pending.meta.enum_members,
        display_name: pending.meta.display_name,
        category,
    }
}

/// Trim a description and drop one trailing parenthetical remark.
pub fn clean_description(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let mut cleaned = trimmed;
    if trimmed.ends_with(')') {
        let mut depth = 0usize;
        for (index, c) in trimmed.char_indices().rev() {
            match c {
                ')' => depth += 1,
                '(' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        cleaned = trimmed[..index].trim_end();
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}
