use clap::Args;
use console::style;

use crate::common::{GeneratorArgs, render};
use crate::run_command;
use opgen_core::artifacts::write_all;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,
}

pub fn run(args: &GenerateArgs) -> i32 {
    run_command(|| run_inner(args))
}

pub fn run_inner(args: &GenerateArgs) -> Result<(), String> {
    let config = args.generator.resolve()?;
    let rendered = render(&config)?;

    let written = write_all(&rendered.artifacts).map_err(|err| err.to_string())?;
    debug!(written = written.len(), total = rendered.artifacts.len(), "Artifacts written.");

    let summary = rendered.summary;
    println!(
        "{} {} operations, {} sources, {} enums ({} warnings)",
        style("Generated").green().bold(),
        summary.operations,
        summary.sources,
        summary.enums,
        summary.warnings
    );
    for artifact in &rendered.artifacts {
        let status = if written.contains(&artifact.path) {
            style("updated").yellow()
        } else {
            style("unchanged").dim()
        };
        println!("  {status} {}", artifact.path.display());
    }
    Ok(())
}
