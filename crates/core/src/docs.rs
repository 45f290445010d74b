//! Binding summary table and anchored splicing into a markdown document.
//!
//! Only the text between the two anchors is replaced. Everything else in the
//! document is kept byte for byte, so splicing the same table twice is a
//! no-op.

use std::path::Path;

use crate::error::{GenerateError, Result};
use crate::ir::api::{BindingKind, BindingModule};

pub const BEGIN_ANCHOR: &str = "<!-- BEGIN OPGEN TABLE -->";
pub const END_ANCHOR: &str = "<!-- END OPGEN TABLE -->";

/// Markdown table with one row per binding, in binding order.
pub fn docs_table(module: &BindingModule) -> String {
    let mut table = String::from("| Binding | Kind | Node types |\n| --- | --- | --- |\n");
    for binding in &module.bindings {
        let kind = match binding.kind {
            BindingKind::Source => "source",
            BindingKind::Operation => "operation",
        };
        let nodes = binding
            .node_ids()
            .map(|id| format!("`{id}`"))
            .collect::<Vec<_>>()
            .join(", ");
        table.push_str(&format!("| `{}` | {kind} | {nodes} |\n", binding.name));
    }
    table
}

/// Replace the content between the anchors of `document` with `table`.
///
/// `path` is only used in error messages.
pub fn splice(document: &str, table: &str, path: &Path) -> Result<String> {
    let anchor_error = |message: &str| GenerateError::DocsAnchor {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let begin = document
        .find(BEGIN_ANCHOR)
        .ok_or_else(|| anchor_error("missing begin anchor"))?;
    let content_start = begin + BEGIN_ANCHOR.len();
    let end = document[content_start..]
        .find(END_ANCHOR)
        .map(|offset| content_start + offset)
        .ok_or_else(|| {
            if document.contains(END_ANCHOR) {
                anchor_error("end anchor precedes begin anchor")
            } else {
                anchor_error("missing end anchor")
            }
        })?;
    if document[end + END_ANCHOR.len()..].contains(BEGIN_ANCHOR) {
        return Err(anchor_error("more than one begin anchor"));
    }

    let mut spliced = String::with_capacity(document.len() + table.len());
    spliced.push_str(&document[..content_start]);
    spliced.push('\n');
    spliced.push_str(table);
    if !table.ends_with('\n') {
        spliced.push('\n');
    }
    spliced.push_str(&document[end..]);
    Ok(spliced)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ir::api::{BindingDecl, DispatchBranch, ParamType};
    use crate::ir::category::Category;

    fn binding(name: &str, kind: BindingKind, nodes: &[&str]) -> BindingDecl {
        BindingDecl {
            name: name.into(),
            base_name: name.into(),
            kind,
            doc: vec![],
            availability: None,
            generic: None,
            params: vec![],
            return_type: ParamType::Category(Category::Scalar),
            guards: vec![],
            branches: nodes
                .iter()
                .map(|id| DispatchBranch {
                    node_id: (*id).to_string(),
                    conditions: vec![],
                    inputs: vec![],
                    output_name: "out".into(),
                    output_data_type: "float".into(),
                })
                .collect(),
            fallback: None,
        }
    }

    fn module() -> BindingModule {
        BindingModule {
            enums: vec![],
            bindings: vec![
                binding(
                    "add",
                    BindingKind::Operation,
                    &["ND_add_float", "ND_add_color3"],
                ),
                binding("time", BindingKind::Source, &["ND_time_float"]),
            ],
        }
    }

    #[test]
    fn test_docs_table_rows() {
        assert_eq!(
            docs_table(&module()),
            "| Binding | Kind | Node types |\n\
             | --- | --- | --- |\n\
             | `add` | operation | `ND_add_float`, `ND_add_color3` |\n\
             | `time` | source | `ND_time_float` |\n"
        );
    }

    #[test]
    fn test_splice_replaces_only_anchored_region() {
        let document = "# Title\n\n<!-- BEGIN OPGEN TABLE -->\nstale\n<!-- END OPGEN TABLE -->\n\nFooter\n";
        let spliced = splice(document, "| new |\n", Path::new("README.md")).unwrap();
        assert_eq!(
            spliced,
            "# Title\n\n<!-- BEGIN OPGEN TABLE -->\n| new |\n<!-- END OPGEN TABLE -->\n\nFooter\n"
        );
    }

    #[test]
    fn test_splice_is_idempotent() {
        let document = "<!-- BEGIN OPGEN TABLE --><!-- END OPGEN TABLE -->";
        let table = docs_table(&module());
        let once = splice(document, &table, Path::new("README.md")).unwrap();
        let twice = splice(&once, &table, Path::new("README.md")).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_splice_rejects_bad_anchors() {
        let path = Path::new("README.md");
        assert!(matches!(
            splice("no anchors", "x", path),
            Err(GenerateError::DocsAnchor { .. })
        ));
        assert!(matches!(
            splice("<!-- BEGIN OPGEN TABLE --> open", "x", path),
            Err(GenerateError::DocsAnchor { .. })
        ));
        let reversed = "<!-- END OPGEN TABLE -->\n<!-- BEGIN OPGEN TABLE -->\n";
        let err = splice(reversed, "x", path).unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }
}
