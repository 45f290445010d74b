use clap::Args;
use console::style;
use similar::{ChangeTag, TextDiff};
use std::fs;

use crate::common::{GeneratorArgs, render};
use crate::run_command;
use opgen_core::artifacts::Artifact;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,
}

pub fn run(args: &CheckArgs) -> i32 {
    run_command(|| run_inner(args))
}

pub fn run_inner(args: &CheckArgs) -> Result<(), String> {
    let config = args.generator.resolve()?;
    let rendered = render(&config)?;

    let mut stale = 0usize;
    for artifact in &rendered.artifacts {
        let existing = fs::read_to_string(&artifact.path).ok();
        if existing.as_deref() == Some(artifact.contents.as_str()) {
            continue;
        }
        stale += 1;
        print!("{}", unified_diff(artifact, existing.as_deref().unwrap_or("")));
    }

    if stale > 0 {
        return Err(format!(
            "{stale} generated file(s) are out of date; run `opgen generate`"
        ));
    }
    println!(
        "{} {} file(s) up to date",
        style("OK").green().bold(),
        rendered.artifacts.len()
    );
    Ok(())
}

/// Unified diff from the file on disk to the freshly generated contents.
pub fn unified_diff(artifact: &Artifact, existing: &str) -> String {
    let path = artifact.path.display();
    let diff = TextDiff::from_lines(existing, &artifact.contents);
    let mut output = String::new();

    output.push_str(&format!("{}\n", style(format!("--- {path} (current)")).bold()));
    output.push_str(&format!("{}\n", style(format!("+++ {path} (generated)")).bold()));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let line = match change.tag() {
                    ChangeTag::Delete => style(format!("-{}", change.value())).red(),
                    ChangeTag::Insert => style(format!("+{}", change.value())).green(),
                    ChangeTag::Equal => style(format!(" {}", change.value())),
                };
                output.push_str(&line.to_string());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }
    output
}
