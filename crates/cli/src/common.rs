//! Argument handling and rendering shared by `generate` and `check`.

use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use opgen_core::artifacts::Artifact;
use opgen_core::config::{DEFAULT_CONFIG_FILE, GeneratorConfig};
use opgen_core::docs::splice;
use opgen_core::{
    DescriptionTable, DiagnosticLevel, GenerateError, GenerateOptions, RunSummary, generate,
};
use tracing::debug;

#[derive(Args, Debug, Clone, Default)]
pub struct GeneratorArgs {
    #[arg(
        long,
        value_name = "PATH",
        help = "Config file. Defaults to ./opgen.toml when it exists"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Schema-source JSON document")]
    pub schema: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Node description table JSON")]
    pub descriptions: Option<PathBuf>,
    #[arg(long, value_name = "DIR", help = "Directory for the generated Swift files")]
    pub output_dir: Option<PathBuf>,
    #[arg(long, value_name = "PATH", help = "Markdown document to splice the binding table into")]
    pub docs: Option<PathBuf>,
    #[arg(long, help = "Fail on overloads whose members cannot be told apart")]
    pub strict: bool,
}

impl GeneratorArgs {
    /// Config file values with command-line overrides applied.
    pub fn resolve(&self) -> Result<GeneratorConfig, String> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path).map_err(|err| err.to_string())?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                GeneratorConfig::load(Path::new(DEFAULT_CONFIG_FILE)).map_err(|err| err.to_string())?
            }
            None => GeneratorConfig::default(),
        };

        if let Some(schema) = &self.schema {
            config.schema.clone_from(schema);
        }
        if let Some(descriptions) = &self.descriptions {
            config.descriptions = Some(descriptions.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(docs) = &self.docs {
            config.docs = Some(docs.clone());
        }
        config.strict |= self.strict;

        debug!(
            schema = %config.schema.display(),
            output_dir = %config.output_dir.display(),
            strict = config.strict,
            "Resolved generator config."
        );
        Ok(config)
    }
}

/// Everything one run would write.
#[derive(Debug)]
pub struct Rendered {
    pub artifacts: Vec<Artifact>,
    pub summary: RunSummary,
}

fn read(path: &Path, what: &str) -> Result<String, String> {
    fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {what} {}: {err}", path.display()))
}

/// Error text, followed by every fatal diagnostic of an aborted run.
fn describe(err: &GenerateError) -> String {
    let mut message = err.to_string();
    if let Some(diagnostics) = err.diagnostics() {
        for diagnostic in diagnostics.at_level(DiagnosticLevel::Fatal) {
            message.push_str(&format!("\n  {diagnostic}"));
        }
    }
    message
}

/// Run the generator in memory.
pub fn render(config: &GeneratorConfig) -> Result<Rendered, String> {
    let schema_json = read(&config.schema, "schema")?;
    let descriptions = match &config.descriptions {
        Some(path) => DescriptionTable::from_json(&read(path, "descriptions")?)
            .map_err(|err| err.to_string())?,
        None => DescriptionTable::default(),
    };

    let generated = generate(
        &schema_json,
        &descriptions,
        &GenerateOptions {
            strict: config.strict,
        },
    )
    .map_err(|err| describe(&err))?;

    let mut artifacts = vec![
        Artifact::new(config.operations_path(), generated.operations),
        Artifact::new(config.sources_path(), generated.sources),
    ];
    if let Some(docs) = &config.docs {
        let document = read(docs, "docs")?;
        let spliced =
            splice(&document, &generated.docs_table, docs).map_err(|err| err.to_string())?;
        artifacts.push(Artifact::new(docs.clone(), spliced));
    }

    Ok(Rendered {
        artifacts,
        summary: generated.summary,
    })
}
