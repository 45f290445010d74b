//! Schema-source records for serde deserialization.
//!
//! This mirrors the subset of a USD node-definition stage the generator
//! needs: prims with namespaced properties, declared types, defaults and
//! free-form metadata. Metadata stays loosely typed here and is validated into
//! explicit fields by the node model.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{GenerateError, Result};

/// Marker that starts the name of every node prototype prim.
pub const NODE_MARKER: &str = "ND_";

/// Free-form metadata dictionary attached to prims and properties.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Root of a schema document.
#[derive(Debug, Deserialize)]
pub struct SchemaStage {
    #[serde(default)]
    pub prims: Vec<Prim>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Prim {
    /// Absolute prim path, e.g. `/ND_add_float`.
    pub path: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub properties: Vec<RawProperty>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    /// Namespaced name, e.g. `inputs:in1` or `outputs:out`.
    pub name: String,
    pub type_name: String,
    /// Alternate type names; the first one wins over `type_name`.
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub is_array: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl SchemaStage {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(GenerateError::SchemaParse)
    }

    /// Prims that describe node prototypes, in document order.
    pub fn node_prims(&self) -> impl Iterator<Item = &Prim> {
        self.prims.iter().filter(|prim| prim.is_node())
    }
}

impl Prim {
    /// Last path component.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// True for root-scoped prims (`/<name>`) whose name carries the node marker.
    pub fn is_node(&self) -> bool {
        let mut parts = self.path.split('/');
        matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(""), Some(name), None) if name.starts_with(NODE_MARKER)
        )
    }
}

/// Human-readable node descriptions keyed by prototype id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct DescriptionTable(BTreeMap<String, String>);

impl DescriptionTable {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(GenerateError::DescriptionParse)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DescriptionTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
