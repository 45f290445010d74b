//! Code generation from binding IR to the Swift AST.
//!
//! This module maps binding declarations onto the ShaderGraph value model:
//! categories become `SG*` classes, schema types become `SGDataType` cases,
//! and each dispatch branch becomes an `SGNode` construction.
//!
//! The generated AST can then be emitted to strings via the `Emit` trait.

use super::api::{
    BindingDecl, BindingKind, BindingModule, DispatchBranch, ParamDecl, ParamLabel, ParamType,
    TypeCheck, Wiring,
};
use super::category::{Category, EnumId, EnumIdentity, intrinsic_category};
use super::emit::Emit;
use super::model::{Literal, runtime_type};
use super::types::{
    BinOp, FunctionKind, InterpolationPart, SwiftArg, SwiftEnum, SwiftEnumCase, SwiftExpr,
    SwiftExtension, SwiftFile, SwiftFunction, SwiftLiteral, SwiftParam, SwiftStmt, SwiftType,
    SwiftTypeParam,
};
use super::utils::{capitalize_first, lower_camel_case};
use crate::error::{GenerateError, Result};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "Autogenerated by opgen. Do not edit.";

const IMPORTS: &[&str] = &["Foundation", "simd"];

/// Type extended by the sources unit.
const SOURCE_HOST: &str = "SGValue";

/// The two generated source units.
#[derive(Debug, Clone, PartialEq)]
pub struct SwiftUnits {
    /// Enum declarations and all operation bindings.
    pub operations: SwiftFile,
    /// All source bindings as static properties.
    pub sources: SwiftFile,
}

/// Generate both Swift units from the binding module.
pub fn codegen_module(module: &BindingModule) -> Result<SwiftUnits> {
    let enums = module.enums.iter().map(codegen_enum).collect();

    let functions = module
        .operations()
        .map(|decl| codegen_binding(decl, module, FunctionKind::Free))
        .collect::<Result<Vec<_>>>()?;

    let members = module
        .sources()
        .map(|decl| codegen_binding(decl, module, FunctionKind::StaticVar))
        .collect::<Result<Vec<_>>>()?;

    Ok(SwiftUnits {
        operations: SwiftFile {
            header: vec![GENERATED_HEADER.to_string()],
            imports: IMPORTS.iter().map(|s| (*s).to_string()).collect(),
            enums,
            functions,
            extensions: Vec::new(),
        },
        sources: SwiftFile {
            header: vec![GENERATED_HEADER.to_string()],
            imports: IMPORTS.iter().map(|s| (*s).to_string()).collect(),
            enums: Vec::new(),
            functions: Vec::new(),
            extensions: vec![SwiftExtension {
                extended: SOURCE_HOST.to_string(),
                members,
            }],
        },
    })
}

// =============================================================================
// Host naming
// =============================================================================

/// Swift class of a category.
pub fn category_class(category: &Category) -> &'static str {
    match category {
        Category::Value | Category::Opaque(_) => "SGValue",
        Category::Scalar => "SGScalar",
        Category::Vector => "SGVector",
        Category::Color => "SGColor",
        Category::Matrix => "SGMatrix",
        Category::String | Category::Enum(_) => "SGString",
        Category::Texture => "SGTexture",
        Category::Numeric => "SGNumeric",
        Category::Simd => "SGSIMD",
    }
}

fn simd(width: u8, scalar: &str) -> SwiftType {
    SwiftType::Applied {
        base: format!("SIMD{width}"),
        args: vec![SwiftType::named(scalar)],
    }
}

/// Host literal type for a collapsed schema type.
pub fn primitive_type(data_type: &str) -> SwiftType {
    match runtime_type(data_type).as_str() {
        "float" => SwiftType::named("Float"),
        "half" => SwiftType::named("Float16"),
        "int" => SwiftType::named("Int"),
        "bool" => SwiftType::named("Bool"),
        "string" | "token" | "asset" => SwiftType::named("String"),
        "vector2f" => simd(2, "Float"),
        "vector3f" | "color3f" => simd(3, "Float"),
        "vector4f" | "color4f" => simd(4, "Float"),
        "vector2h" => simd(2, "Float16"),
        "vector3h" => simd(3, "Float16"),
        "vector4h" => simd(4, "Float16"),
        "vector2i" => simd(2, "Int"),
        "vector3i" => simd(3, "Int"),
        "vector4i" => simd(4, "Int"),
        "matrix2d" => SwiftType::named("simd_float2x2"),
        "matrix3d" => SwiftType::named("simd_float3x3"),
        "matrix4d" => SwiftType::named("simd_float4x4"),
        other => SwiftType::named(capitalize_first(other)),
    }
}

fn data_type_expr(data_type: &str) -> SwiftExpr {
    SwiftExpr::ident("SGDataType").member(runtime_type(data_type))
}

fn enum_identity(module: &BindingModule, id: EnumId) -> Result<&EnumIdentity> {
    module
        .enum_identity(id)
        .ok_or_else(|| GenerateError::internal(format!("enum #{id} is not registered")))
}

fn param_type(ty: &ParamType, module: &BindingModule) -> Result<SwiftType> {
    Ok(match ty {
        ParamType::Primitive { data_type } => primitive_type(data_type),
        ParamType::Enum(id) => SwiftType::named(enum_identity(module, *id)?.name.clone()),
        ParamType::Generic => SwiftType::named(super::api::GENERIC_PLACEHOLDER),
        ParamType::Category(category) => SwiftType::named(category_class(category)),
    })
}

// =============================================================================
// Enums
// =============================================================================

fn codegen_enum(identity: &EnumIdentity) -> SwiftEnum {
    SwiftEnum {
        doc: Vec::new(),
        name: identity.name.clone(),
        raw_type: SwiftType::named("String"),
        cases: identity
            .members
            .iter()
            .map(|member| SwiftEnumCase {
                name: lower_camel_case(member),
                raw_value: member.clone(),
            })
            .collect(),
    }
}

// =============================================================================
// Literals and defaults
// =============================================================================

fn float_args(values: &[f64]) -> Vec<SwiftArg> {
    values
        .iter()
        .map(|v| SwiftArg::unlabeled(SwiftExpr::Literal(SwiftLiteral::Float(*v))))
        .collect()
}

/// Host literal expression for a value of `data_type`.
fn literal_expr(literal: &Literal, data_type: &str) -> Option<SwiftExpr> {
    let expr = match literal {
        Literal::Bool(b) => SwiftExpr::Literal(SwiftLiteral::Bool(*b)),
        Literal::Int(i) => SwiftExpr::Literal(SwiftLiteral::Int(*i)),
        Literal::Float(f) => SwiftExpr::Literal(SwiftLiteral::Float(*f)),
        Literal::String(s) => SwiftExpr::string(s.clone()),
        Literal::Tuple(components) => {
            let ty = primitive_type(data_type);
            if !matches!(ty, SwiftType::Applied { .. }) {
                return None;
            }
            SwiftExpr::ident(ty.emit()).call(float_args(components))
        }
        Literal::Matrix(rows) => {
            let n = rows.len() as u8;
            let row_exprs = rows
                .iter()
                .map(|row| SwiftExpr::ident(format!("SIMD{n}<Float>")).call(float_args(row)))
                .collect();
            SwiftExpr::ident(format!("simd_float{n}x{n}"))
                .call(vec![SwiftArg::labeled("rows", SwiftExpr::Array(row_exprs))])
        }
    };
    Some(expr)
}

/// Default value expression for a parameter, `None` when the host cannot express it.
fn default_expr(param: &ParamDecl, module: &BindingModule) -> Result<Option<SwiftExpr>> {
    let Some(default) = &param.default else {
        return Ok(None);
    };
    Ok(match (&param.ty, default) {
        (ParamType::Enum(id), Literal::String(value)) => {
            let identity = enum_identity(module, *id)?;
            Some(SwiftExpr::ident(identity.name.clone()).member(lower_camel_case(value)))
        }
        (ParamType::Primitive { data_type }, literal) => literal_expr(literal, data_type),
        (ParamType::Category(_), literal) => value_constructor(literal, &param.data_type),
        _ => None,
    })
}

/// `SGValue.<case>(...)` constructor for a connected parameter's default.
fn value_constructor(literal: &Literal, data_type: &str) -> Option<SwiftExpr> {
    let case = runtime_type(data_type);
    let args = match (case.as_str(), literal) {
        ("float" | "half" | "int" | "string", _) => {
            vec![SwiftArg::unlabeled(literal_expr(literal, data_type)?)]
        }
        (
            "vector2f" | "vector3f" | "vector4f" | "color3f" | "color4f",
            Literal::Tuple(components),
        ) => float_args(components),
        ("matrix2d" | "matrix3d" | "matrix4d", Literal::Matrix(_)) => {
            vec![SwiftArg::unlabeled(literal_expr(literal, data_type)?)]
        }
        _ => return None,
    };
    Some(SwiftExpr::ident("SGValue").member(case).call(args))
}

// =============================================================================
// Bindings
// =============================================================================

fn codegen_binding(
    decl: &BindingDecl,
    module: &BindingModule,
    kind: FunctionKind,
) -> Result<SwiftFunction> {
    let params = decl
        .params
        .iter()
        .map(|param| {
            Ok(SwiftParam {
                label: match param.label {
                    ParamLabel::Positional => None,
                    ParamLabel::Named => Some(param.name.clone()),
                },
                name: param.name.clone(),
                ty: param_type(&param.ty, module)?,
                default: default_expr(param, module)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let return_type = param_type(&decl.return_type, module)?;
    let ctor = return_type.clone();

    let mut body = Vec::new();
    for guard in &decl.guards {
        let param = &decl.params[guard.check.param];
        body.push(SwiftStmt::Guard {
            cond: type_check_expr(&guard.check, decl),
            else_body: vec![SwiftStmt::Return(failure(
                &ctor,
                vec![
                    InterpolationPart::Static(format!(
                        "Invalid {} input. Expected {} data type to be {}, but got ",
                        decl.name,
                        param.name,
                        runtime_type(&guard.check.data_type)
                    )),
                    InterpolationPart::Dynamic(data_type_of(&param.name)),
                ],
                decl,
            ))],
        });
    }

    for branch in &decl.branches {
        let stmts = branch_body(branch, decl, &ctor)?;
        if branch.conditions.is_empty() {
            body.extend(stmts);
            break;
        }
        let cond = branch
            .conditions
            .iter()
            .map(|check| type_check_expr(check, decl))
            .reduce(|acc, next| acc.binop(BinOp::And, next));
        match cond {
            Some(cond) => body.push(SwiftStmt::If {
                cond,
                then_body: stmts,
            }),
            None => body.extend(stmts),
        }
    }

    if let Some(fallback) = &decl.fallback {
        let mut parts = vec![InterpolationPart::Static(format!(
            "Invalid {} input. Unsupported data types:",
            decl.name
        ))];
        for (i, index) in fallback.reported.iter().enumerate() {
            let name = &decl.params[*index].name;
            let separator = if i == 0 { " " } else { ", " };
            parts.push(InterpolationPart::Static(format!("{separator}{name} ")));
            parts.push(InterpolationPart::Dynamic(data_type_of(name)));
        }
        body.push(SwiftStmt::Return(failure(&ctor, parts, decl)));
    }

    Ok(SwiftFunction {
        doc: decl.doc.clone(),
        attributes: decl
            .availability
            .iter()
            .map(|a| format!("@available({a}, *)"))
            .collect(),
        kind: if decl.kind == BindingKind::Source {
            FunctionKind::StaticVar
        } else {
            kind
        },
        name: decl.name.clone(),
        type_params: decl
            .generic
            .iter()
            .map(|g| SwiftTypeParam {
                name: g.name.clone(),
                bound: Some(category_class(&g.bound).to_string()),
            })
            .collect(),
        params,
        return_type,
        body,
    })
}

fn data_type_of(name: &str) -> SwiftExpr {
    SwiftExpr::ident(name).member("dataType")
}

fn type_check_expr(check: &TypeCheck, decl: &BindingDecl) -> SwiftExpr {
    let name = decl
        .params
        .get(check.param)
        .map_or("", |p| p.name.as_str());
    data_type_of(name).binop(BinOp::Equal, data_type_expr(&check.data_type))
}

/// `Ctor(source: .error("...", values: [...]))`
fn failure(ctor: &SwiftType, message: Vec<InterpolationPart>, decl: &BindingDecl) -> SwiftExpr {
    let values = decl
        .params
        .iter()
        .filter(|p| p.wiring == Wiring::Connection)
        .map(|p| SwiftExpr::ident(p.name.clone()))
        .collect();
    let source = SwiftExpr::implicit("error").call(vec![
        SwiftArg::unlabeled(SwiftExpr::Interpolated(message)),
        SwiftArg::labeled("values", SwiftExpr::Array(values)),
    ]);
    construct(ctor, source)
}

fn construct(ctor: &SwiftType, source: SwiftExpr) -> SwiftExpr {
    SwiftExpr::ident(ctor.emit()).call(vec![SwiftArg::labeled("source", source)])
}

/// Statements that build the branch's node and return its output.
fn branch_body(
    branch: &DispatchBranch,
    decl: &BindingDecl,
    ctor: &SwiftType,
) -> Result<Vec<SwiftStmt>> {
    let items = branch
        .inputs
        .iter()
        .map(|input| {
            let param = decl.params.get(input.param).ok_or_else(|| {
                GenerateError::internal(format!(
                    "{} wires input '{}' to missing parameter {}",
                    branch.node_id, input.name, input.param
                ))
            })?;
            Ok(SwiftExpr::implicit("init").call(vec![
                SwiftArg::labeled("name", SwiftExpr::string(input.name.clone())),
                SwiftArg::labeled("connection", connection_expr(param)),
            ]))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut output_args = Vec::new();
    if branch.output_name != "out" {
        output_args.push(SwiftArg::labeled(
            "name",
            SwiftExpr::string(branch.output_name.clone()),
        ));
    }
    output_args.push(SwiftArg::labeled(
        "dataType",
        data_type_expr(&branch.output_data_type),
    ));

    let node = SwiftExpr::MultilineCall {
        callee: Box::new(SwiftExpr::ident("SGNode")),
        args: vec![
            SwiftArg::labeled("nodeType", SwiftExpr::string(branch.node_id.clone())),
            SwiftArg::labeled("inputs", SwiftExpr::ident("inputs")),
            SwiftArg::labeled(
                "outputs",
                SwiftExpr::Array(vec![SwiftExpr::implicit("init").call(output_args)]),
            ),
        ],
    };
    let mut source_args = vec![SwiftArg::unlabeled(node)];
    if branch.output_name != "out" {
        source_args.push(SwiftArg::unlabeled(SwiftExpr::string(
            branch.output_name.clone(),
        )));
    }

    Ok(vec![
        SwiftStmt::LetArray {
            name: "inputs".to_string(),
            ty: SwiftType::Array(Box::new(SwiftType::named("SGNode.Input"))),
            items,
        },
        SwiftStmt::Return(construct(
            ctor,
            SwiftExpr::implicit("nodeOutput").call(source_args),
        )),
    ])
}

/// Value connected to a node input for a parameter.
fn connection_expr(param: &ParamDecl) -> SwiftExpr {
    match &param.wiring {
        Wiring::Connection => SwiftExpr::ident(param.name.clone()),
        Wiring::EnumConstant => constant(
            "SGString",
            "string",
            vec![SwiftArg::unlabeled(
                SwiftExpr::ident(param.name.clone()).member("rawValue"),
            )],
        ),
        Wiring::Constant { data_type } => {
            let class = intrinsic_category(data_type)
                .as_ref()
                .map_or("SGValue", category_class);
            let case = runtime_type(data_type);
            let mut args = vec![SwiftArg::unlabeled(SwiftExpr::ident(param.name.clone()))];
            if case == "color3f" || case == "color4f" {
                args.push(SwiftArg::labeled("colorSpace", SwiftExpr::Literal(SwiftLiteral::Nil)));
            }
            constant(class, &case, args)
        }
    }
}

/// `Class(source: .constant(.case(args)))`
fn constant(class: &str, case: &str, args: Vec<SwiftArg>) -> SwiftExpr {
    let value = SwiftExpr::implicit(case.to_string()).call(args);
    SwiftExpr::ident(class).call(vec![SwiftArg::labeled(
        "source",
        SwiftExpr::implicit("constant").call(vec![SwiftArg::unlabeled(value)]),
    )])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::ir::api::{Fallback, GuardClause, NodeInput};
    use crate::ir::category::EnumRegistry;

    fn param(name: &str, label: ParamLabel, ty: ParamType, data_type: &str) -> ParamDecl {
        let wiring = match &ty {
            ParamType::Primitive { data_type } => Wiring::Constant {
                data_type: data_type.clone(),
            },
            ParamType::Enum(_) => Wiring::EnumConstant,
            _ => Wiring::Connection,
        };
        ParamDecl {
            name: name.to_string(),
            label,
            ty,
            data_type: data_type.to_string(),
            default: None,
            wiring,
        }
    }

    fn branch(node_id: &str, inputs: &[&str], conditions: Vec<TypeCheck>, output: &str) -> DispatchBranch {
        DispatchBranch {
            node_id: node_id.to_string(),
            conditions,
            inputs: inputs
                .iter()
                .enumerate()
                .map(|(param, name)| NodeInput {
                    name: (*name).to_string(),
                    param,
                })
                .collect(),
            output_name: "out".to_string(),
            output_data_type: output.to_string(),
        }
    }

    fn check(param: usize, data_type: &str) -> TypeCheck {
        TypeCheck {
            param,
            data_type: data_type.to_string(),
        }
    }

    #[test]
    fn test_host_names() {
        assert_eq!(category_class(&Category::Numeric), "SGNumeric");
        assert_eq!(category_class(&Category::Simd), "SGSIMD");
        assert_eq!(primitive_type("int").emit(), "Int");
        assert_eq!(primitive_type("float2").emit(), "SIMD2<Float>");
        assert_eq!(primitive_type("matrix4d").emit(), "simd_float4x4");
    }

    #[test]
    fn test_generic_dispatch_function() {
        let decl = BindingDecl {
            name: "add".into(),
            base_name: "add".into(),
            kind: BindingKind::Operation,
            doc: vec![],
            availability: None,
            generic: Some(crate::ir::api::GenericParam {
                name: "T".into(),
                bound: Category::Numeric,
            }),
            params: vec![
                param("in1", ParamLabel::Positional, ParamType::Generic, "float"),
                param("in2", ParamLabel::Positional, ParamType::Generic, "float"),
            ],
            return_type: ParamType::Generic,
            guards: vec![],
            branches: vec![
                branch(
                    "ND_add_float",
                    &["in1", "in2"],
                    vec![check(0, "float"), check(1, "float")],
                    "float",
                ),
                branch(
                    "ND_add_color3",
                    &["in1", "in2"],
                    vec![check(0, "color3f"), check(1, "color3f")],
                    "color3f",
                ),
            ],
            fallback: Some(Fallback {
                reported: vec![0, 1],
            }),
        };
        let module = BindingModule {
            enums: vec![],
            bindings: vec![decl],
        };
        let units = codegen_module(&module).unwrap();
        let text = units.operations.emit();
        let expected = r#"// Autogenerated by opgen. Do not edit.
import Foundation
import simd

public func add<T: SGNumeric>(_ in1: T, _ in2: T) -> T {
    if in1.dataType == SGDataType.float && in2.dataType == SGDataType.float {
        let inputs: [SGNode.Input] = [
            .init(name: "in1", connection: in1),
            .init(name: "in2", connection: in2),
        ]
        return T(source: .nodeOutput(SGNode(
            nodeType: "ND_add_float",
            inputs: inputs,
            outputs: [.init(dataType: SGDataType.float)])))
    }
    if in1.dataType == SGDataType.color3f && in2.dataType == SGDataType.color3f {
        let inputs: [SGNode.Input] = [
            .init(name: "in1", connection: in1),
            .init(name: "in2", connection: in2),
        ]
        return T(source: .nodeOutput(SGNode(
            nodeType: "ND_add_color3",
            inputs: inputs,
            outputs: [.init(dataType: SGDataType.color3f)])))
    }
    return T(source: .error("Invalid add input. Unsupported data types: in1 \(in1.dataType), in2 \(in2.dataType)", values: [in1, in2]))
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_guards_constants_and_enums() {
        let mut registry = EnumRegistry::new();
        let mut diagnostics = Diagnostics::new();
        registry.enum_category(
            &["model".into(), "object".into(), "world".into()],
            "ND_bitangent_vector3",
            &mut diagnostics,
        );
        let space = registry.iter().next().unwrap().clone();
        assert_eq!(space.name, "SGSpace");
        let mut space_param = param(
            "space",
            ParamLabel::Named,
            ParamType::Enum(space.id),
            "string",
        );
        space_param.default = Some(Literal::String("object".into()));
        let mut index_param = param(
            "index",
            ParamLabel::Named,
            ParamType::Primitive {
                data_type: "int".into(),
            },
            "int",
        );
        index_param.default = Some(Literal::Int(0));
        let mut scale_param = param(
            "scale",
            ParamLabel::Named,
            ParamType::Category(Category::Scalar),
            "float",
        );
        scale_param.default = Some(Literal::Float(1.0));

        let decl = BindingDecl {
            name: "bitangent".into(),
            base_name: "bitangent".into(),
            kind: BindingKind::Operation,
            doc: vec!["Bitangent".into()],
            availability: None,
            generic: None,
            params: vec![space_param, index_param, scale_param],
            return_type: ParamType::Category(Category::Vector),
            guards: vec![GuardClause {
                check: check(2, "float"),
            }],
            branches: vec![branch(
                "ND_bitangent_vector3",
                &["space", "index", "scale"],
                vec![],
                "float3",
            )],
            fallback: None,
        };
        let module = BindingModule {
            enums: vec![space],
            bindings: vec![decl],
        };
        let text = codegen_module(&module).unwrap().operations.emit();
        let expected = r#"// Autogenerated by opgen. Do not edit.
import Foundation
import simd

public enum SGSpace: String {
    case model = "model"
    case object = "object"
    case world = "world"
}

/// Bitangent
public func bitangent(space: SGSpace = SGSpace.object, index: Int = 0, scale: SGScalar = SGValue.float(1.0)) -> SGVector {
    guard scale.dataType == SGDataType.float else {
        return SGVector(source: .error("Invalid bitangent input. Expected scale data type to be float, but got \(scale.dataType)", values: [scale]))
    }
    let inputs: [SGNode.Input] = [
        .init(name: "space", connection: SGString(source: .constant(.string(space.rawValue)))),
        .init(name: "index", connection: SGScalar(source: .constant(.int(index)))),
        .init(name: "scale", connection: scale),
    ]
    return SGVector(source: .nodeOutput(SGNode(
        nodeType: "ND_bitangent_vector3",
        inputs: inputs,
        outputs: [.init(dataType: SGDataType.vector3f)])))
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_sources_unit() {
        let decl = BindingDecl {
            name: "frame".into(),
            base_name: "frame".into(),
            kind: BindingKind::Source,
            doc: vec!["Frame".into()],
            availability: Some("visionOS 2.0".into()),
            generic: None,
            params: vec![],
            return_type: ParamType::Category(Category::Scalar),
            guards: vec![],
            branches: vec![branch("ND_frame_float", &[], vec![], "float")],
            fallback: None,
        };
        let module = BindingModule {
            enums: vec![],
            bindings: vec![decl],
        };
        let units = codegen_module(&module).unwrap();
        assert!(units.operations.functions.is_empty());
        let expected = r#"// Autogenerated by opgen. Do not edit.
import Foundation
import simd

public extension SGValue {
    /// Frame
    @available(visionOS 2.0, *)
    static var frame: SGScalar {
        let inputs: [SGNode.Input] = []
        return SGScalar(source: .nodeOutput(SGNode(
            nodeType: "ND_frame_float",
            inputs: inputs,
            outputs: [.init(dataType: SGDataType.float)])))
    }
}
"#;
        assert_eq!(units.sources.emit(), expected);
    }

    #[test]
    fn test_missing_enum_is_internal_error() {
        let mut registry = EnumRegistry::new();
        let mut diagnostics = Diagnostics::new();
        let Category::Enum(id) =
            registry.enum_category(&["a".into(), "b".into()], "ND_pick", &mut diagnostics)
        else {
            unreachable!("enum properties always map to an enum category");
        };
        let decl = BindingDecl {
            name: "pick".into(),
            base_name: "pick".into(),
            kind: BindingKind::Operation,
            doc: vec![],
            availability: None,
            generic: None,
            params: vec![param(
                "mode",
                ParamLabel::Named,
                ParamType::Enum(id),
                "token",
            )],
            return_type: ParamType::Category(Category::Scalar),
            guards: vec![],
            branches: vec![],
            fallback: None,
        };
        let module = BindingModule {
            enums: vec![],
            bindings: vec![decl],
        };
        assert!(matches!(
            codegen_module(&module),
            Err(GenerateError::Internal(_))
        ));
    }

    #[test]
    fn test_default_constructors() {
        assert_eq!(
            value_constructor(&Literal::Tuple(vec![0.0, 0.5, 1.0]), "color3f")
                .unwrap()
                .emit(),
            "SGValue.color3f(0.0, 0.5, 1.0)"
        );
        assert_eq!(
            value_constructor(&Literal::Int(2), "int").unwrap().emit(),
            "SGValue.int(2)"
        );
        assert_eq!(
            value_constructor(
                &Literal::Matrix(vec![vec![1.0, 0.0], vec![0.0, 1.0]]),
                "matrix2d"
            )
            .unwrap()
            .emit(),
            "SGValue.matrix2d(simd_float2x2(rows: [SIMD2<Float>(1.0, 0.0), SIMD2<Float>(0.0, 1.0)]))"
        );
        assert!(value_constructor(&Literal::Bool(true), "bool").is_none());
        assert_eq!(
            literal_expr(&Literal::Tuple(vec![1.0, 2.0]), "float2")
                .unwrap()
                .emit(),
            "SIMD2<Float>(1.0, 2.0)"
        );
    }
}
