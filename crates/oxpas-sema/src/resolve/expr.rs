// resolve/expr.rs
//
// Expression typing: literals, primary chains, operators and array
// constructors. Every typed node is annotated in the node map.

use oxpas_syntax::{BinaryExpr, BinaryOp, Expr, ExprKind, PrimaryExpr, Span, UnaryExpr, UnaryOp};

use crate::errors::SemanticError;
use crate::invocation::{Invocable, InvocationCandidate, InvocationResolver};
use crate::numeric_model::literal_type;
use crate::operators::{OperatorSet, OperatorSynthesizer};
use crate::type_arena::{ParamType, TypeId, TypeIdVec};
use crate::type_display::{display_signature, display_type_id};

use super::{NameResolver, ResolveCx};

/// Type an expression, binding every name in it.
///
/// `expected` is the type the context wants (a parameter type, say); it
/// only steers method references and array constructor elements.
pub(crate) fn resolve_expression(
    cx: &mut ResolveCx<'_>,
    expr: &Expr,
    expected: Option<TypeId>,
) -> Result<TypeId, SemanticError> {
    let ty = match &expr.kind {
        ExprKind::IntLiteral(value) => literal_type(*value),
        ExprKind::RealLiteral(_) => TypeId::EXTENDED,
        ExprKind::StringLiteral(text) if text.chars().count() == 1 => TypeId::CHAR,
        ExprKind::StringLiteral(_) => TypeId::STRING,
        ExprKind::Nil => TypeId::NIL,
        ExprKind::Primary(primary) => resolve_primary(cx, primary, expected)?,
        ExprKind::Binary(binary) => resolve_binary(cx, binary, expr.span)?,
        ExprKind::Unary(unary) => resolve_unary(cx, unary, expected, expr.span)?,
        ExprKind::ArrayConstructor(elements) => {
            let element_expected = expected.and_then(|ty| cx.types.element_type(ty));
            let mut types = TypeIdVec::new();
            for element in elements {
                types.push(resolve_expression(cx, element, element_expected)?);
            }
            cx.types.array_constructor(types)
        }
    };
    if cx.record {
        cx.nodes.set_type(expr.id, ty);
    }
    Ok(ty)
}

fn resolve_primary(
    cx: &mut ResolveCx<'_>,
    primary: &PrimaryExpr,
    expected: Option<TypeId>,
) -> Result<TypeId, SemanticError> {
    let mut resolver = NameResolver::new(cx.site);
    resolver.read_primary(cx, primary)?;
    if resolver.has_pending_routines(cx.symbols) && !resolver.is_explicit_invocation() {
        match expected.filter(|&ty| cx.types.is_procedural(ty)) {
            Some(procedural) => resolver.disambiguate_method_reference(cx, procedural),
            None => resolver.disambiguate_implicit_empty_argument_list(cx)?,
        }
    }
    resolver.commit(cx)?;
    Ok(resolver.approximate_type(cx))
}

fn resolve_binary(
    cx: &mut ResolveCx<'_>,
    binary: &BinaryExpr,
    span: Span,
) -> Result<TypeId, SemanticError> {
    let left = resolve_expression(cx, &binary.left, None)?;
    let right = resolve_expression(cx, &binary.right, None)?;
    match binary.op {
        BinaryOp::Is => Ok(TypeId::BOOLEAN),
        BinaryOp::As => Ok(cx.types.class_of(right).unwrap_or(right)),
        op => {
            let set = OperatorSynthesizer::new(cx.types, cx.symbols).binary(op, left, right);
            choose_operator(cx, op.symbol(), &set, &[left, right], span)
        }
    }
}

fn resolve_unary(
    cx: &mut ResolveCx<'_>,
    unary: &UnaryExpr,
    expected: Option<TypeId>,
    span: Span,
) -> Result<TypeId, SemanticError> {
    if unary.op == UnaryOp::AddressOf {
        return resolve_address_of(cx, &unary.operand, expected);
    }
    let operand = resolve_expression(cx, &unary.operand, None)?;
    let set = OperatorSynthesizer::new(cx.types, cx.symbols).unary(unary.op, operand);
    choose_operator(cx, unary.op.symbol(), &set, &[operand], span)
}

/// `@Name` takes the address of a variable, or references a routine.
fn resolve_address_of(
    cx: &mut ResolveCx<'_>,
    operand: &Expr,
    expected: Option<TypeId>,
) -> Result<TypeId, SemanticError> {
    let Some(primary) = operand.as_primary() else {
        let ty = resolve_expression(cx, operand, None)?;
        return Ok(cx.types.pointer_to(ty));
    };

    let mut resolver = NameResolver::new(cx.site);
    resolver.read_primary(cx, primary)?;
    if resolver.has_pending_routines(cx.symbols) && !resolver.is_explicit_invocation() {
        match expected.filter(|&ty| cx.types.is_procedural(ty)) {
            Some(procedural) => resolver.disambiguate_method_reference(cx, procedural),
            None => resolver.disambiguate_address_of(cx.symbols),
        }
    }
    let routine_signature = resolver
        .declarations()
        .last()
        .filter(|&&d| cx.symbols.decl(d).is_routine())
        .and_then(|&d| cx.symbols.decl(d).ty());
    resolver.commit(cx)?;

    let operand_type = routine_signature.unwrap_or_else(|| resolver.approximate_type(cx));
    if cx.record {
        cx.nodes.set_type(operand.id, operand_type);
    }
    match routine_signature {
        Some(signature) => Ok(signature),
        None => Ok(cx.types.pointer_to(operand_type)),
    }
}

/// Rank the operator set like an overload set. Ties between builtin
/// signatures go to the first synthesized; a tie involving a declared
/// operator is ambiguous.
fn choose_operator(
    cx: &mut ResolveCx<'_>,
    symbol: &str,
    set: &OperatorSet,
    args: &[TypeId],
    span: Span,
) -> Result<TypeId, SemanticError> {
    let mut resolver = InvocationResolver::new();
    for (index, intrinsic) in set.intrinsics.iter().enumerate() {
        resolver.add_candidate(InvocationCandidate::new(
            Invocable::Intrinsic(index),
            intrinsic.params.iter().map(|&ty| ParamType::value(ty)),
            intrinsic.ret,
        ));
    }
    for &decl in &set.overloads {
        resolver.add_candidate(InvocationCandidate::for_declaration(
            cx.types,
            decl,
            cx.symbols.decl(decl),
            args,
            None,
        ));
    }
    resolver.process_candidates(cx.types, args);
    let best = resolver.choose_best();

    let declared = best.iter().any(|c| c.invocable.declaration().is_some());
    match best.as_slice() {
        [] => {
            tracing::debug!(op = symbol, "no operator signature applies");
            Ok(TypeId::UNKNOWN)
        }
        // Intrinsic ties go to the first signature synthesized, which
        // follows operand order: `V + I` types as the Variant signature.
        [single, ..] if best.len() == 1 || !declared => Ok(single.ret),
        tied => {
            let candidates = tied
                .iter()
                .map(|c| match c.invocable {
                    Invocable::Declaration(decl) => {
                        display_signature(decl, &*cx.symbols, &*cx.types)
                    }
                    Invocable::Intrinsic(index) => {
                        let intrinsic = &set.intrinsics[index];
                        let params: Vec<String> = intrinsic
                            .params
                            .iter()
                            .map(|&ty| display_type_id(ty, &*cx.types))
                            .collect();
                        format!(
                            "{}({}): {}",
                            intrinsic.name,
                            params.join(", "),
                            display_type_id(intrinsic.ret, &*cx.types)
                        )
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            Err(SemanticError::AmbiguousReference {
                name: symbol.to_string(),
                candidates,
                span: span.into(),
            })
        }
    }
}
