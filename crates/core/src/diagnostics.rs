//! Run-wide diagnostics.
//!
//! Every stage of the pipeline reports recoverable problems and fatal
//! invariant violations here instead of aborting on the first one. The run
//! inspects [`Diagnostics::has_fatal`] before anything is written.

use std::fmt;

use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticLevel {
    /// Aborts the run before any artifact is written.
    Fatal,
    /// Reported, but generation continues.
    Warning,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Fatal => write!(f, "fatal"),
            DiagnosticLevel::Warning => write!(f, "warning"),
        }
    }
}

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticMessage {
    UnknownSchemaType {
        node: String,
        property: String,
        type_name: String,
    },
    UnnamedEnum {
        node: String,
        members: Vec<String>,
        synthesized: String,
    },
    UnjoinableCategories {
        context: String,
        categories: Vec<String>,
    },
    UnreachableBranch {
        binding: String,
        node: String,
        shadowed_by: String,
    },
    NoDiscriminator {
        binding: String,
        members: usize,
        strict: bool,
    },
    AvailabilityMismatch {
        binding: String,
        declared: Vec<String>,
        chosen: String,
    },
    ArityMismatch {
        base: String,
        node: String,
        expected: usize,
        found: usize,
    },
    DuplicateBinding {
        name: String,
        first: String,
        second: String,
    },
    /// The same input position plays different roles across a group.
    RoleMismatch {
        base: String,
        position: String,
        detail: String,
    },
    Internal {
        context: String,
        message: String,
    },
}

impl DiagnosticMessage {
    pub fn level(&self) -> DiagnosticLevel {
        match self {
            DiagnosticMessage::UnknownSchemaType { .. }
            | DiagnosticMessage::UnnamedEnum { .. }
            | DiagnosticMessage::UnjoinableCategories { .. }
            | DiagnosticMessage::UnreachableBranch { .. }
            | DiagnosticMessage::AvailabilityMismatch { .. } => DiagnosticLevel::Warning,
            DiagnosticMessage::NoDiscriminator { strict, .. } => {
                if *strict {
                    DiagnosticLevel::Fatal
                } else {
                    DiagnosticLevel::Warning
                }
            }
            DiagnosticMessage::ArityMismatch { .. }
            | DiagnosticMessage::DuplicateBinding { .. }
            | DiagnosticMessage::RoleMismatch { .. }
            | DiagnosticMessage::Internal { .. } => DiagnosticLevel::Fatal,
        }
    }

    /// Short machine-friendly kind, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            DiagnosticMessage::UnknownSchemaType { .. } => "unknown_schema_type",
            DiagnosticMessage::UnnamedEnum { .. } => "unnamed_enum",
            DiagnosticMessage::UnjoinableCategories { .. } => "unjoinable_categories",
            DiagnosticMessage::UnreachableBranch { .. } => "unreachable_branch",
            DiagnosticMessage::NoDiscriminator { .. } => "no_discriminator",
            DiagnosticMessage::AvailabilityMismatch { .. } => "availability_mismatch",
            DiagnosticMessage::ArityMismatch { .. } => "arity_mismatch",
            DiagnosticMessage::DuplicateBinding { .. } => "duplicate_binding",
            DiagnosticMessage::RoleMismatch { .. } => "role_mismatch",
            DiagnosticMessage::Internal { .. } => "internal",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DiagnosticMessage::UnknownSchemaType {
                node,
                property,
                type_name,
            } => format!("Unknown schema type '{type_name}' on {node}.{property}; treating it as opaque"),
            DiagnosticMessage::UnnamedEnum {
                node,
                members,
                synthesized,
            } => format!(
                "No canonical name for enum [{}] first declared by {node}; using {synthesized}",
                members.join(", ")
            ),
            DiagnosticMessage::UnjoinableCategories {
                context,
                categories,
            } => format!(
                "Cannot join categories [{}] in {context}; widening to Value",
                categories.join(", ")
            ),
            DiagnosticMessage::UnreachableBranch {
                binding,
                node,
                shadowed_by,
            } => format!(
                "Dispatch branch for {node} in '{binding}' is unreachable; {shadowed_by} matches the same input types first"
            ),
            DiagnosticMessage::NoDiscriminator { binding, members, .. } => format!(
                "Overload '{binding}' has {members} members but no input whose type differs between them; only the first member is reachable"
            ),
            DiagnosticMessage::AvailabilityMismatch {
                binding,
                declared,
                chosen,
            } => format!(
                "Members of '{binding}' declare different availability [{}]; using {chosen}",
                declared.join(", ")
            ),
            DiagnosticMessage::ArityMismatch {
                base,
                node,
                expected,
                found,
            } => format!(
                "Overload group '{base}': {node} has {found} inputs but the group expects {expected}"
            ),
            DiagnosticMessage::DuplicateBinding {
                name,
                first,
                second,
            } => format!("Binding name '{name}' is produced by both '{first}' and '{second}'"),
            DiagnosticMessage::RoleMismatch {
                base,
                position,
                detail,
            } => format!("Overload group '{base}': input '{position}' {detail}; the group is dropped"),
            DiagnosticMessage::Internal { context, message } => {
                format!("Internal invariant violated in {context}: {message}")
            }
        }
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level(), self.message())
    }
}

/// Accumulated diagnostics for one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<DiagnosticMessage>,
    num_fatal: usize,
    num_warning: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn add(&mut self, message: DiagnosticMessage) {
        match message.level() {
            DiagnosticLevel::Fatal => {
                error!(kind = message.kind(), "{}", message.message());
                self.num_fatal += 1;
            }
            DiagnosticLevel::Warning => {
                warn!(kind = message.kind(), "{}", message.message());
                self.num_warning += 1;
            }
        }
        self.diagnostics.push(message);
    }

    pub fn has_fatal(&self) -> bool {
        self.num_fatal > 0
    }

    pub fn num_fatal(&self) -> usize {
        self.num_fatal
    }

    pub fn num_warning(&self) -> usize {
        self.num_warning
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.diagnostics.iter()
    }

    pub fn at_level(&self, level: DiagnosticLevel) -> impl Iterator<Item = &DiagnosticMessage> {
        self.diagnostics.iter().filter(move |d| d.level() == level)
    }

    /// Count diagnostics of the given kind (see [`DiagnosticMessage::kind`]).
    pub fn count_kind(&self, kind: &str) -> usize {
        self.diagnostics.iter().filter(|d| d.kind() == kind).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_level() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add(DiagnosticMessage::UnknownSchemaType {
            node: "ND_foo".into(),
            property: "in".into(),
            type_name: "quatf".into(),
        });
        diagnostics.add(DiagnosticMessage::ArityMismatch {
            base: "foo".into(),
            node: "ND_foo_vector3".into(),
            expected: 1,
            found: 2,
        });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.num_warning(), 1);
        assert_eq!(diagnostics.num_fatal(), 1);
        assert!(diagnostics.has_fatal());
        assert_eq!(diagnostics.at_level(DiagnosticLevel::Fatal).count(), 1);
        assert_eq!(diagnostics.count_kind("arity_mismatch"), 1);
    }

    #[test]
    fn test_no_discriminator_level_follows_strict() {
        let lenient = DiagnosticMessage::NoDiscriminator {
            binding: "foo".into(),
            members: 2,
            strict: false,
        };
        let strict = DiagnosticMessage::NoDiscriminator {
            binding: "foo".into(),
            members: 2,
            strict: true,
        };
        assert_eq!(lenient.level(), DiagnosticLevel::Warning);
        assert_eq!(strict.level(), DiagnosticLevel::Fatal);
    }

    #[test]
    fn test_display_includes_level() {
        let message = DiagnosticMessage::DuplicateBinding {
            name: "mix".into(),
            first: "mix".into(),
            second: "mix_".into(),
        };
        let rendered = message.to_string();
        assert!(rendered.starts_with("fatal: "), "got: {rendered}");
        assert!(rendered.contains("'mix'"));
    }
}
