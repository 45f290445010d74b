//! Generator configuration from `opgen.toml`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GenerateError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "opgen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Schema-source JSON document.
    pub schema: PathBuf,
    /// Optional description table JSON.
    pub descriptions: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub operations_file: String,
    pub sources_file: String,
    /// Markdown document carrying the binding table anchors.
    pub docs: Option<PathBuf>,
    /// Treat non-discriminable overloads as fatal.
    pub strict: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from("schemas.json"),
            descriptions: None,
            output_dir: PathBuf::from("."),
            operations_file: "Operations.g.swift".to_string(),
            sources_file: "Sources.g.swift".to_string(),
            docs: None,
            strict: false,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|err| GenerateError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
    }

    /// Read a config file. Relative paths inside it resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| GenerateError::io(path, err))?;
        let config = Self::from_toml(&text, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Resolve every relative path against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        self.schema = join(&self.schema);
        self.output_dir = join(&self.output_dir);
        self.descriptions = self.descriptions.as_deref().map(join);
        self.docs = self.docs.as_deref().map(join);
        self
    }

    pub fn operations_path(&self) -> PathBuf {
        self.output_dir.join(&self.operations_file)
    }

    pub fn sources_path(&self) -> PathBuf {
        self.output_dir.join(&self.sources_file)
    }
}
