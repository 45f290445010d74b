//! Swift code emission via the Emit trait.
//!
//! Each AST type implements `Emit`. Statements and declarations also expose
//! `emit_indented`, with 4 spaces per level.

use super::types::{
    BinOp, FunctionKind, InterpolationPart, SwiftArg, SwiftEnum, SwiftEnumCase, SwiftExpr,
    SwiftExtension, SwiftFile, SwiftFunction, SwiftLiteral, SwiftParam, SwiftStmt, SwiftType,
    SwiftTypeParam,
};
use super::utils::{escape_identifier, escape_swift_string};

/// Trait for emitting Swift code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its Swift source representation.
    fn emit(&self) -> String;
}

const INDENT: &str = "    ";

fn indent(level: usize) -> String {
    INDENT.repeat(level)
}

// =============================================================================
// Types
// =============================================================================

impl Emit for SwiftType {
    fn emit(&self) -> String {
        match self {
            SwiftType::Named(name) => name.clone(),
            SwiftType::Applied { base, args } => {
                let args = args.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                format!("{base}<{args}>")
            }
            SwiftType::Array(inner) => format!("[{}]", inner.emit()),
        }
    }
}

impl Emit for SwiftTypeParam {
    fn emit(&self) -> String {
        match &self.bound {
            Some(bound) => format!("{}: {}", self.name, bound),
            None => self.name.clone(),
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for SwiftLiteral {
    fn emit(&self) -> String {
        match self {
            SwiftLiteral::String(s) => format!("\"{}\"", escape_swift_string(s)),
            SwiftLiteral::Float(f) => format_float(*f),
            SwiftLiteral::Int(i) => i.to_string(),
            SwiftLiteral::Bool(b) => b.to_string(),
            SwiftLiteral::Nil => "nil".to_string(),
        }
    }
}

/// Integral values keep a trailing `.0` so they read as floating point.
fn format_float(value: f64) -> String {
    let rendered = value.to_string();
    if value.is_finite() && !rendered.contains('.') {
        format!("{rendered}.0")
    } else {
        rendered
    }
}

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::Equal => "==".to_string(),
            BinOp::And => "&&".to_string(),
        }
    }
}

impl Emit for SwiftArg {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl SwiftArg {
    fn emit_at(&self, level: usize) -> String {
        match &self.label {
            Some(label) => format!("{}: {}", label, self.value.emit_at(level)),
            None => self.value.emit_at(level),
        }
    }
}

impl Emit for SwiftExpr {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl SwiftExpr {
    /// Emit with `level` as the indentation of the enclosing statement.
    /// Only multiline calls use it.
    pub fn emit_at(&self, level: usize) -> String {
        match self {
            SwiftExpr::Ident(name) => escape_identifier(name),
            SwiftExpr::Literal(lit) => lit.emit(),
            SwiftExpr::Member { object, name } => {
                format!("{}.{}", object.emit_at(level), escape_identifier(name))
            }
            SwiftExpr::ImplicitMember(name) => format!(".{name}"),
            SwiftExpr::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|a| a.emit_at(level))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", callee.emit_at(level), args)
            }
            SwiftExpr::MultilineCall { callee, args } => {
                let prefix = indent(level + 1);
                let args = args
                    .iter()
                    .map(|a| format!("{prefix}{}", a.emit_at(level + 1)))
                    .collect::<Vec<_>>()
                    .join(",\n");
                format!("{}(\n{})", callee.emit_at(level), args)
            }
            SwiftExpr::Array(items) => {
                let items = items
                    .iter()
                    .map(|i| i.emit_at(level))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{items}]")
            }
            SwiftExpr::Interpolated(parts) => {
                let content: String = parts
                    .iter()
                    .map(|p| match p {
                        InterpolationPart::Static(s) => escape_swift_string(s),
                        InterpolationPart::Dynamic(e) => format!("\\({})", e.emit_at(level)),
                    })
                    .collect();
                format!("\"{content}\"")
            }
            SwiftExpr::BinOp { left, op, right } => {
                format!(
                    "{} {} {}",
                    left.emit_at(level),
                    op.emit(),
                    right.emit_at(level)
                )
            }
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for SwiftStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl SwiftStmt {
    /// Emit with specified indentation level (4 spaces per level)
    pub fn emit_indented(&self, level: usize) -> String {
        let prefix = indent(level);
        match self {
            SwiftStmt::LetArray { name, ty, items } => {
                let head = format!("{prefix}let {}: {} = ", escape_identifier(name), ty.emit());
                if items.is_empty() {
                    return format!("{head}[]\n");
                }
                let item_prefix = indent(level + 1);
                let mut output = format!("{head}[\n");
                for item in items {
                    output.push_str(&format!("{item_prefix}{},\n", item.emit_at(level + 1)));
                }
                output.push_str(&format!("{prefix}]\n"));
                output
            }
            SwiftStmt::Return(expr) => format!("{prefix}return {}\n", expr.emit_at(level)),
            SwiftStmt::If { cond, then_body } => {
                let mut output = format!("{prefix}if {} {{\n", cond.emit_at(level));
                for stmt in then_body {
                    output.push_str(&stmt.emit_indented(level + 1));
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
            SwiftStmt::Guard { cond, else_body } => {
                let mut output = format!("{prefix}guard {} else {{\n", cond.emit_at(level));
                for stmt in else_body {
                    output.push_str(&stmt.emit_indented(level + 1));
                }
                output.push_str(&format!("{prefix}}}\n"));
                output
            }
        }
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl Emit for SwiftParam {
    fn emit(&self) -> String {
        let name = escape_identifier(&self.name);
        let head = match &self.label {
            None => format!("_ {name}"),
            Some(label) if *label == self.name => name,
            Some(label) => format!("{} {name}", escape_identifier(label)),
        };
        match &self.default {
            Some(default) => format!("{head}: {} = {}", self.ty.emit(), default.emit()),
            None => format!("{head}: {}", self.ty.emit()),
        }
    }
}

impl Emit for SwiftFunction {
    fn emit(&self) -> String {
        self.emit_indented(0)
    }
}

impl SwiftFunction {
    pub fn emit_indented(&self, level: usize) -> String {
        let prefix = indent(level);
        let mut output = String::new();

        for line in &self.doc {
            output.push_str(&format!("{prefix}/// {line}\n"));
        }
        for attribute in &self.attributes {
            output.push_str(&format!("{prefix}{attribute}\n"));
        }

        let name = escape_identifier(&self.name);
        match self.kind {
            FunctionKind::Free => {
                let type_params = if self.type_params.is_empty() {
                    String::new()
                } else {
                    let params = self
                        .type_params
                        .iter()
                        .map(Emit::emit)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("<{params}>")
                };
                let params = self.params.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
                output.push_str(&format!(
                    "{prefix}public func {name}{type_params}({params}) -> {} {{\n",
                    self.return_type.emit()
                ));
            }
            FunctionKind::StaticVar => {
                output.push_str(&format!(
                    "{prefix}static var {name}: {} {{\n",
                    self.return_type.emit()
                ));
            }
        }

        for stmt in &self.body {
            output.push_str(&stmt.emit_indented(level + 1));
        }
        output.push_str(&format!("{prefix}}}\n"));
        output
    }
}

impl Emit for SwiftEnumCase {
    fn emit(&self) -> String {
        format!(
            "case {} = \"{}\"",
            escape_identifier(&self.name),
            escape_swift_string(&self.raw_value)
        )
    }
}

impl Emit for SwiftEnum {
    fn emit(&self) -> String {
        let mut output = String::new();
        for line in &self.doc {
            output.push_str(&format!("/// {line}\n"));
        }
        output.push_str(&format!(
            "public enum {}: {} {{\n",
            self.name,
            self.raw_type.emit()
        ));
        for case in &self.cases {
            output.push_str(&format!("{INDENT}{}\n", case.emit()));
        }
        output.push_str("}\n");
        output
    }
}

impl Emit for SwiftExtension {
    fn emit(&self) -> String {
        let mut output = format!("public extension {} {{\n", self.extended);
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&member.emit_indented(1));
        }
        output.push_str("}\n");
        output
    }
}

// =============================================================================
// File
// =============================================================================

impl Emit for SwiftFile {
    fn emit(&self) -> String {
        let mut output = String::new();

        for line in &self.header {
            output.push_str(&format!("// {line}\n"));
        }
        for import in &self.imports {
            output.push_str(&format!("import {import}\n"));
        }

        let blocks = self
            .enums
            .iter()
            .map(Emit::emit)
            .chain(self.functions.iter().map(Emit::emit))
            .chain(self.extensions.iter().map(Emit::emit));
        for block in blocks {
            output.push('\n');
            output.push_str(&block);
        }

        output
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn simd3_float() -> SwiftType {
        SwiftType::Applied {
            base: "SIMD3".into(),
            args: vec![SwiftType::named("Float")],
        }
    }

    #[test]
    fn test_emit_types() {
        assert_eq!(SwiftType::named("SGScalar").emit(), "SGScalar");
        assert_eq!(simd3_float().emit(), "SIMD3<Float>");
        assert_eq!(
            SwiftType::Array(Box::new(SwiftType::named("SGNode.Input"))).emit(),
            "[SGNode.Input]"
        );
    }

    #[test]
    fn test_emit_literals() {
        assert_eq!(SwiftLiteral::Float(1.0).emit(), "1.0");
        assert_eq!(SwiftLiteral::Float(0.25).emit(), "0.25");
        assert_eq!(SwiftLiteral::Float(-2.0).emit(), "-2.0");
        assert_eq!(SwiftLiteral::Int(3).emit(), "3");
        assert_eq!(SwiftLiteral::Bool(true).emit(), "true");
        assert_eq!(SwiftLiteral::Nil.emit(), "nil");
        assert_eq!(SwiftLiteral::String("a\"b".into()).emit(), "\"a\\\"b\"");
    }

    #[test]
    fn test_emit_keyword_identifiers() {
        let expr = SwiftExpr::ident("in").member("dataType");
        assert_eq!(expr.emit(), "`in`.dataType");
        let param = SwiftParam {
            label: None,
            name: "in".into(),
            ty: SwiftType::named("SGScalar"),
            default: None,
        };
        assert_eq!(param.emit(), "_ `in`: SGScalar");
    }

    #[test]
    fn test_emit_params() {
        let named = SwiftParam {
            label: Some("low".into()),
            name: "low".into(),
            ty: SwiftType::named("SGScalar"),
            default: None,
        };
        assert_eq!(named.emit(), "low: SGScalar");

        let with_default = SwiftParam {
            label: Some("index".into()),
            name: "index".into(),
            ty: SwiftType::named("Int"),
            default: Some(SwiftExpr::Literal(SwiftLiteral::Int(0))),
        };
        assert_eq!(with_default.emit(), "index: Int = 0");
    }

    #[test]
    fn test_emit_interpolation() {
        let expr = SwiftExpr::Interpolated(vec![
            InterpolationPart::Static("got ".into()),
            InterpolationPart::Dynamic(SwiftExpr::ident("low").member("dataType")),
        ]);
        assert_eq!(expr.emit(), "\"got \\(low.dataType)\"");
    }

    #[test]
    fn test_emit_multiline_call() {
        let expr = SwiftExpr::ident("SGVector").call(vec![SwiftArg::labeled(
            "source",
            SwiftExpr::implicit("nodeOutput").call(vec![SwiftArg::unlabeled(
                SwiftExpr::MultilineCall {
                    callee: Box::new(SwiftExpr::ident("SGNode")),
                    args: vec![
                        SwiftArg::labeled("nodeType", SwiftExpr::string("ND_normal_vector3")),
                        SwiftArg::labeled("inputs", SwiftExpr::ident("inputs")),
                    ],
                },
            )]),
        )]);
        let stmt = SwiftStmt::Return(expr);
        assert_eq!(
            stmt.emit_indented(1),
            "    return SGVector(source: .nodeOutput(SGNode(\n        nodeType: \"ND_normal_vector3\",\n        inputs: inputs)))\n"
        );
    }

    #[test]
    fn test_emit_let_array() {
        let stmt = SwiftStmt::LetArray {
            name: "inputs".into(),
            ty: SwiftType::Array(Box::new(SwiftType::named("SGNode.Input"))),
            items: vec![SwiftExpr::implicit("init").call(vec![
                SwiftArg::labeled("name", SwiftExpr::string("in")),
                SwiftArg::labeled("connection", SwiftExpr::ident("in")),
            ])],
        };
        assert_eq!(
            stmt.emit_indented(1),
            "    let inputs: [SGNode.Input] = [\n        .init(name: \"in\", connection: `in`),\n    ]\n"
        );

        let empty = SwiftStmt::LetArray {
            name: "inputs".into(),
            ty: SwiftType::Array(Box::new(SwiftType::named("SGNode.Input"))),
            items: vec![],
        };
        assert_eq!(empty.emit_indented(2), "        let inputs: [SGNode.Input] = []\n");
    }

    #[test]
    fn test_emit_guard_and_if() {
        let cond = SwiftExpr::ident("a")
            .member("dataType")
            .binop(BinOp::Equal, SwiftExpr::ident("SGDataType").member("float"));
        let guard = SwiftStmt::Guard {
            cond: cond.clone(),
            else_body: vec![SwiftStmt::Return(SwiftExpr::ident("a"))],
        };
        assert_eq!(
            guard.emit_indented(1),
            "    guard a.dataType == SGDataType.float else {\n        return a\n    }\n"
        );
        let branch = SwiftStmt::If {
            cond: cond.clone().binop(BinOp::And, cond),
            then_body: vec![],
        };
        assert_eq!(
            branch.emit(),
            "    if a.dataType == SGDataType.float && a.dataType == SGDataType.float {\n    }\n"
        );
    }

    #[test]
    fn test_emit_generic_function() {
        let func = SwiftFunction {
            doc: vec!["Add".into()],
            attributes: vec!["@available(visionOS 2.0, *)".into()],
            kind: FunctionKind::Free,
            name: "add".into(),
            type_params: vec![SwiftTypeParam {
                name: "T".into(),
                bound: Some("SGNumeric".into()),
            }],
            params: vec![
                SwiftParam {
                    label: None,
                    name: "in1".into(),
                    ty: SwiftType::named("T"),
                    default: None,
                },
                SwiftParam {
                    label: None,
                    name: "in2".into(),
                    ty: SwiftType::named("T"),
                    default: None,
                },
            ],
            return_type: SwiftType::named("T"),
            body: vec![SwiftStmt::Return(SwiftExpr::ident("in1"))],
        };
        assert_eq!(
            func.emit(),
            "/// Add\n@available(visionOS 2.0, *)\npublic func add<T: SGNumeric>(_ in1: T, _ in2: T) -> T {\n    return in1\n}\n"
        );
    }

    #[test]
    fn test_emit_static_var_in_extension() {
        let ext = SwiftExtension {
            extended: "SGValue".into(),
            members: vec![SwiftFunction {
                doc: vec![],
                attributes: vec![],
                kind: FunctionKind::StaticVar,
                name: "frame".into(),
                type_params: vec![],
                params: vec![],
                return_type: SwiftType::named("SGScalar"),
                body: vec![SwiftStmt::Return(SwiftExpr::ident("x"))],
            }],
        };
        assert_eq!(
            ext.emit(),
            "public extension SGValue {\n    static var frame: SGScalar {\n        return x\n    }\n}\n"
        );
    }

    #[test]
    fn test_emit_enum() {
        let decl = SwiftEnum {
            doc: vec![],
            name: "SGSpace".into(),
            raw_type: SwiftType::named("String"),
            cases: vec![
                SwiftEnumCase {
                    name: "model".into(),
                    raw_value: "model".into(),
                },
                SwiftEnumCase {
                    name: "default".into(),
                    raw_value: "default".into(),
                },
            ],
        };
        assert_eq!(
            decl.emit(),
            "public enum SGSpace: String {\n    case model = \"model\"\n    case `default` = \"default\"\n}\n"
        );
    }

    #[test]
    fn test_emit_file_layout() {
        let file = SwiftFile {
            header: vec!["Autogenerated by opgen. Do not edit.".into()],
            imports: vec!["Foundation".into(), "simd".into()],
            ..SwiftFile::default()
        };
        assert_eq!(
            file.emit(),
            "// Autogenerated by opgen. Do not edit.\nimport Foundation\nimport simd\n"
        );
    }
}
