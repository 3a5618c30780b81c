// resolve/method_names.rs
//
// Binding a routine implementation's name (`TFoo.TBar.Baz<T>`) to the
// declaration it implements.

use oxpas_identity::{DeclId, ScopeId};
use oxpas_syntax::{NameReference, NameSegment};

use crate::errors::SemanticError;
use crate::occurrence::NameOccurrence;
use crate::symbols::{DeclKind, SymbolTable, Visibility};
use crate::type_arena::{TypeId, TypeIdVec};

use super::{NameResolver, ResolveCx};

/// What the implementation header says about the routine.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MethodSignature<'a> {
    pub params: &'a [TypeId],
    /// UNKNOWN for procedures and constructors.
    pub ret: TypeId,
    pub is_class: bool,
}

impl NameResolver {
    /// Each segment is looked up literally in the scope the previous one
    /// led to, starting from the scope enclosing the method scope. Nothing
    /// is inherited and no helper is consulted.
    pub(crate) fn read_method_name_reference(
        &mut self,
        cx: &mut ResolveCx<'_>,
        name: &NameReference,
        method_scope: ScopeId,
        signature: MethodSignature<'_>,
    ) -> Result<(), SemanticError> {
        let parent = cx.symbols.scope(method_scope).parent.unwrap_or(self.site);
        self.current_scope = Some(parent);

        let mut forwards = Vec::new();
        for (index, segment) in name.segments.iter().enumerate() {
            let last = index + 1 == name.segments.len();
            self.add_name(NameOccurrence::new(segment.id, segment.span, &segment.ident, self.site));
            self.declarations = literal_lookup(cx.symbols, self.current_scope, &segment.ident);
            self.retain_type_param_count(cx.symbols, segment);

            if last {
                if segment.is_generic() {
                    forwards = declare_forward_type_params(cx, method_scope, segment);
                }
                self.disambiguate_parameters(cx, signature.params);
                self.disambiguate_return_type(cx, signature.ret);
                self.disambiguate_is_class_invocable(cx.symbols, signature.is_class);
                self.disambiguate_within_unit(cx.symbols, cx.unit);
            } else if let [decl] = self.declarations.as_slice() {
                record_type_param_references(cx, *decl, segment);
            }

            if self.declarations.is_empty() {
                tracing::debug!(name = %segment.ident, "no declaration for method name");
                break;
            }
            if !last {
                self.add_resolved(cx)?;
            }
        }

        if let [routine] = self.declarations.as_slice() {
            complete_forward_type_params(cx, *routine, &forwards);
        }
        Ok(())
    }

    /// `Foo<A, B>` only names declarations with two type parameters; a plain
    /// `Foo` only non-generic ones.
    fn retain_type_param_count(&mut self, symbols: &SymbolTable, segment: &NameSegment) {
        let count = segment.type_args.as_ref().map_or(0, Vec::len);
        self.declarations
            .retain(|&d| symbols.decl(d).type_params().len() == count);
        if count == 0 {
            self.disambiguate_not_generic(symbols);
        }
    }
}

fn literal_lookup(symbols: &SymbolTable, scope: Option<ScopeId>, image: &str) -> Vec<DeclId> {
    let scope = scope.unwrap_or(SymbolTable::UNKNOWN_SCOPE);
    symbols
        .lookup_symbol(image)
        .map(|symbol| symbols.scope(scope).lookup(symbol).to_vec())
        .unwrap_or_default()
}

/// `TFoo<T>.Bar`: the `T` written here refers to the type parameter of
/// the matched type.
fn record_type_param_references(cx: &mut ResolveCx<'_>, decl: DeclId, segment: &NameSegment) {
    let Some(args) = &segment.type_args else {
        return;
    };
    let params = cx.symbols.decl(decl).type_params().to_vec();
    for (arg, param) in args.iter().zip(params) {
        let occurrence = NameOccurrence::new(arg.id, arg.span, &arg.image(), cx.site);
        NameResolver::record_bound(cx, occurrence, param);
    }
}

/// `Bar<T>`: the implementation introduces its own `T` into the method
/// scope before the declaration it matches is known.
fn declare_forward_type_params(
    cx: &mut ResolveCx<'_>,
    method_scope: ScopeId,
    segment: &NameSegment,
) -> Vec<TypeId> {
    let Some(args) = &segment.type_args else {
        return Vec::new();
    };
    let mut forwards = Vec::with_capacity(args.len());
    for arg in args {
        let image = arg.image();
        let ty = cx.types.new_type_parameter(&image, TypeIdVec::new());
        let decl = cx.symbols.declare(
            method_scope,
            &image,
            Visibility::Public,
            arg.span,
            DeclKind::TypeParameter { ty },
        );
        let occurrence = NameOccurrence::new(arg.id, arg.span, &image, cx.site);
        NameResolver::record_bound(cx, occurrence, decl);
        forwards.push(ty);
    }
    forwards
}

/// Copy the constraints of the matched declaration's type parameters onto
/// the forward ones.
fn complete_forward_type_params(cx: &mut ResolveCx<'_>, routine: DeclId, forwards: &[TypeId]) {
    let params = cx.symbols.decl(routine).type_params().to_vec();
    for (&forward, param) in forwards.iter().zip(params) {
        let Some(declared) = cx.symbols.decl(param).ty() else {
            continue;
        };
        let constraints: TypeIdVec = cx.types.constraints(declared).iter().copied().collect();
        cx.types.set_constraints(forward, constraints);
    }
}
