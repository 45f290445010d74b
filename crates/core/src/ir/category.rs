//! Abstraction categories and the structural enum registry.
//!
//! Every schema type maps to one [`Category`] of the host value model. Enum
//! categories are minted from the member set alone, so two nodes that declare
//! the same tokens in any order share one identity.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::debug;

use crate::diagnostics::{DiagnosticMessage, Diagnostics};
use crate::error::{GenerateError, Result};

/// Sequence id of a structural enum identity. Ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(u32);

impl EnumId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EnumId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of abstraction categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Value,
    Scalar,
    Vector,
    Color,
    Matrix,
    String,
    Texture,
    /// Join of numeric families that include Scalar or Matrix.
    Numeric,
    /// Join of Color and Vector.
    Simd,
    Enum(EnumId),
    /// Identity fallback for a schema type outside the table.
    Opaque(String),
}

impl Category {
    /// Display precedence; lower sorts first.
    pub fn precedence(&self) -> u8 {
        match self {
            Category::Matrix => 0,
            Category::Color => 1,
            Category::Vector => 2,
            Category::Scalar => 3,
            Category::String => 4,
            Category::Value => 5,
            Category::Texture => 6,
            Category::Numeric => 7,
            Category::Simd => 8,
            Category::Enum(_) => 9,
            Category::Opaque(_) => 10,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Category::Scalar
                | Category::Vector
                | Category::Color
                | Category::Matrix
                | Category::Numeric
                | Category::Simd
        )
    }

    pub fn is_simd(&self) -> bool {
        matches!(self, Category::Vector | Category::Color | Category::Simd)
    }

    /// Concrete families that widen to Value without a warning.
    fn is_base_family(&self) -> bool {
        matches!(
            self,
            Category::Scalar
                | Category::Vector
                | Category::Color
                | Category::Matrix
                | Category::String
                | Category::Texture
                | Category::Numeric
                | Category::Simd
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Value => write!(f, "Value"),
            Category::Scalar => write!(f, "Scalar"),
            Category::Vector => write!(f, "Vector"),
            Category::Color => write!(f, "Color"),
            Category::Matrix => write!(f, "Matrix"),
            Category::String => write!(f, "String"),
            Category::Texture => write!(f, "Texture"),
            Category::Numeric => write!(f, "Numeric"),
            Category::Simd => write!(f, "Simd"),
            Category::Enum(id) => write!(f, "Enum#{id}"),
            Category::Opaque(raw) => write!(f, "Opaque({raw})"),
        }
    }
}

/// Intrinsic category of a schema type, `None` when the type is not in the table.
pub fn intrinsic_category(type_name: &str) -> Option<Category> {
    let category = match type_name {
        "bool" => Category::Value,
        "float" | "double" | "half" | "int" | "uint" => Category::Scalar,
        "float2" | "float3" | "float4" | "half2" | "half3" | "half4" | "int2" | "int3" | "int4"
        | "double2" | "double3" | "double4" | "vector2f" | "vector3f" | "vector4f" | "vector3h"
        | "vector3d" | "normal3f" | "normal3h" | "normal3d" | "point3f" | "point3h"
        | "point3d" | "texCoord2f" | "texCoord3f" | "texCoord2h" | "texCoord3h" => {
            Category::Vector
        }
        "color3f" | "color4f" | "color3h" | "color4h" | "color3d" | "color4d" => Category::Color,
        "matrix2d" | "matrix3d" | "matrix4d" | "matrix2f" | "matrix3f" | "matrix4f" => {
            Category::Matrix
        }
        "string" | "token" => Category::String,
        "asset" => Category::Texture,
        _ => return None,
    };
    Some(category)
}

/// Category of a schema type, warning and falling back to `Opaque` for unknown types.
pub fn category_of(
    type_name: &str,
    node: &str,
    property: &str,
    diagnostics: &mut Diagnostics,
) -> Category {
    intrinsic_category(type_name).unwrap_or_else(|| {
        diagnostics.add(DiagnosticMessage::UnknownSchemaType {
            node: node.to_string(),
            property: property.to_string(),
            type_name: type_name.to_string(),
        });
        Category::Opaque(type_name.to_string())
    })
}

/// Join a set of categories into their least common abstraction.
///
/// The empty set has no join and is reported as an internal error.
pub fn join_categories<'a, I>(
    categories: I,
    context: &str,
    diagnostics: &mut Diagnostics,
) -> Result<Category>
where
    I: IntoIterator<Item = &'a Category>,
{
    let set: BTreeSet<&Category> = categories.into_iter().collect();

    if set.is_empty() {
        let message = DiagnosticMessage::Internal {
            context: context.to_string(),
            message: "join of an empty category set".to_string(),
        };
        let rendered = message.message();
        diagnostics.add(message);
        return Err(GenerateError::internal(rendered));
    }
    if set.len() == 1 {
        return Ok(set.into_iter().next().cloned().unwrap_or(Category::Value));
    }
    if set.iter().all(|c| c.is_simd()) {
        return Ok(Category::Simd);
    }
    if set.iter().all(|c| c.is_numeric()) {
        return Ok(Category::Numeric);
    }
    if set.contains(&Category::Value)
        && set
            .iter()
            .all(|c| **c == Category::Value || c.is_base_family())
    {
        return Ok(Category::Value);
    }

    let mut ordered: Vec<&Category> = set.into_iter().collect();
    ordered.sort_by_key(|c| c.precedence());
    diagnostics.add(DiagnosticMessage::UnjoinableCategories {
        context: context.to_string(),
        categories: ordered.iter().map(ToString::to_string).collect(),
    });
    Ok(Category::Value)
}

/// Enum names for member sets the host library already knows, keyed by
/// structural key.
const CANONICAL_ENUM_NAMES: &[(&str, &str)] = &[
    ("model|object|world", "SGSpace"),
    ("object|tangent", "SGNormalSpace"),
    ("clamp|constant|mirror|periodic", "SGAddressMode"),
    ("closest|cubic|linear", "SGFilterType"),
    (
        "clamp_to_border|clamp_to_edge|clamp_to_zero|mirrored_repeat|repeat",
        "SGSamplerAddressMode",
    ),
    ("linear|nearest", "SGSamplerMinMagFilter"),
    ("linear|nearest|not_mipmapped", "SGSamplerMipFilter"),
    (
        "opaque_black|opaque_white|transparent_black",
        "SGSamplerBorderColor",
    ),
    ("auto|manual", "SGProjectionMode"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumIdentity {
    pub id: EnumId,
    /// Sorted, pipe-joined member list.
    pub key: String,
    /// Members in the order of the first declaration.
    pub members: Vec<String>,
    pub name: String,
    /// False when the name was synthesized.
    pub canonical: bool,
}

/// Registry of structural enum identities for one run.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    identities: Vec<EnumIdentity>,
    by_key: HashMap<String, EnumId>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structural_key(members: &[String]) -> String {
        let sorted: BTreeSet<&str> = members.iter().map(String::as_str).collect();
        sorted.into_iter().collect::<Vec<_>>().join("|")
    }

    /// Category for an enumerated property, minting an identity on first sight.
    pub fn enum_category(
        &mut self,
        members: &[String],
        node: &str,
        diagnostics: &mut Diagnostics,
    ) -> Category {
        let key = Self::structural_key(members);
        if let Some(id) = self.by_key.get(&key) {
            return Category::Enum(*id);
        }

        let id = EnumId(self.identities.len() as u32 + 1);
        let (name, canonical) = match CANONICAL_ENUM_NAMES.iter().find(|(k, _)| *k == key) {
            Some((_, name)) => ((*name).to_string(), true),
            None => {
                let name = synthesized_enum_name(id, &key);
                diagnostics.add(DiagnosticMessage::UnnamedEnum {
                    node: node.to_string(),
                    members: members.to_vec(),
                    synthesized: name.clone(),
                });
                (name, false)
            }
        };
        debug!(id = %id, key = %key, name = %name, "Registered enum identity.");

        let mut ordered = Vec::with_capacity(members.len());
        for member in members {
            if !ordered.contains(member) {
                ordered.push(member.clone());
            }
        }
        self.identities.push(EnumIdentity {
            id,
            key: key.clone(),
            members: ordered,
            name,
            canonical,
        });
        self.by_key.insert(key, id);
        Category::Enum(id)
    }

    pub fn get(&self, id: EnumId) -> Option<&EnumIdentity> {
        self.identities.get(id.0.checked_sub(1)? as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumIdentity> {
        self.identities.iter()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

fn synthesized_enum_name(id: EnumId, key: &str) -> String {
    let members: Vec<String> = key
        .split('|')
        .map(|m| {
            m.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect()
        })
        .collect();
    format!("Enum{id}_{}", members.join("_"))
}
