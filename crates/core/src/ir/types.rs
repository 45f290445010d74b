//! Swift AST for code generation.
//!
//! Only the constructs the generated bindings use:
//! - SwiftType: named, generic-applied and array types
//! - SwiftExpr: identifiers, literals, member access, calls, arrays
//! - SwiftStmt: array `let`, `return`, `if`, `guard`
//! - SwiftFunction / SwiftEnum / SwiftExtension / SwiftFile: declarations

#[derive(Debug, Clone, PartialEq)]
pub enum SwiftType {
    /// `SGScalar`, `Float`, `T`
    Named(String),
    /// `SIMD3<Float>`
    Applied { base: String, args: Vec<SwiftType> },
    /// `[SGNode.Input]`
    Array(Box<SwiftType>),
}

impl SwiftType {
    pub fn named(name: impl Into<String>) -> Self {
        SwiftType::Named(name.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwiftLiteral {
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    Nil,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Equal,
    And,
}

/// Piece of an interpolated string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationPart {
    Static(String),
    Dynamic(SwiftExpr),
}

/// Call argument with an optional label.
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftArg {
    pub label: Option<String>,
    pub value: SwiftExpr,
}

impl SwiftArg {
    pub fn labeled(label: impl Into<String>, value: SwiftExpr) -> Self {
        Self {
            label: Some(label.into()),
            value,
        }
    }

    pub fn unlabeled(value: SwiftExpr) -> Self {
        Self { label: None, value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwiftExpr {
    /// Identifier, escaped on emit when it is a keyword.
    Ident(String),
    Literal(SwiftLiteral),
    /// `object.name`
    Member { object: Box<SwiftExpr>, name: String },
    /// `.name`, resolved against the contextual type.
    ImplicitMember(String),
    Call {
        callee: Box<SwiftExpr>,
        args: Vec<SwiftArg>,
    },
    /// Call whose arguments are emitted one per line.
    MultilineCall {
        callee: Box<SwiftExpr>,
        args: Vec<SwiftArg>,
    },
    Array(Vec<SwiftExpr>),
    Interpolated(Vec<InterpolationPart>),
    BinOp {
        left: Box<SwiftExpr>,
        op: BinOp,
        right: Box<SwiftExpr>,
    },
}

impl SwiftExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        SwiftExpr::Ident(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        SwiftExpr::Literal(SwiftLiteral::String(value.into()))
    }

    pub fn member(self, name: impl Into<String>) -> Self {
        SwiftExpr::Member {
            object: Box::new(self),
            name: name.into(),
        }
    }

    pub fn implicit(name: impl Into<String>) -> Self {
        SwiftExpr::ImplicitMember(name.into())
    }

    pub fn call(self, args: Vec<SwiftArg>) -> Self {
        SwiftExpr::Call {
            callee: Box::new(self),
            args,
        }
    }

    pub fn binop(self, op: BinOp, right: SwiftExpr) -> Self {
        SwiftExpr::BinOp {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwiftStmt {
    /// `let name: ty = [` one element per line `]`
    LetArray {
        name: String,
        ty: SwiftType,
        items: Vec<SwiftExpr>,
    },
    Return(SwiftExpr),
    If {
        cond: SwiftExpr,
        then_body: Vec<SwiftStmt>,
    },
    Guard {
        cond: SwiftExpr,
        else_body: Vec<SwiftStmt>,
    },
}

/// Function parameter. `label == None` renders as `_ name`.
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftParam {
    pub label: Option<String>,
    pub name: String,
    pub ty: SwiftType,
    pub default: Option<SwiftExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftTypeParam {
    pub name: String,
    pub bound: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `public func name(...) -> T`
    Free,
    /// `static var name: T { ... }`
    StaticVar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftFunction {
    pub doc: Vec<String>,
    pub attributes: Vec<String>,
    pub kind: FunctionKind,
    pub name: String,
    pub type_params: Vec<SwiftTypeParam>,
    pub params: Vec<SwiftParam>,
    pub return_type: SwiftType,
    pub body: Vec<SwiftStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftEnumCase {
    pub name: String,
    pub raw_value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwiftEnum {
    pub doc: Vec<String>,
    pub name: String,
    pub raw_type: SwiftType,
    pub cases: Vec<SwiftEnumCase>,
}

/// `public extension <extended> { members }`
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftExtension {
    pub extended: String,
    pub members: Vec<SwiftFunction>,
}

/// A complete generated source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SwiftFile {
    pub header: Vec<String>,
    pub imports: Vec<String>,
    pub enums: Vec<SwiftEnum>,
    pub functions: Vec<SwiftFunction>,
    pub extensions: Vec<SwiftExtension>,
}
