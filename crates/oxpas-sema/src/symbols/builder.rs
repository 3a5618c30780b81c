// symbols/builder.rs
//
// Construction helpers that keep types, scopes and declarations in sync.

use oxpas_identity::{DeclId, ScopeId, Span};

use crate::type_arena::{
    HelperKind, ParamType, ProceduralKind, StructKind, TypeArena, TypeId, TypeIdVec,
};

use super::{
    DeclKind, Parameter, PropertyDecl, ReturnSpec, RoutineDecl, RoutineKind, ScopeKind,
    SymbolTable, VariableKind, Visibility,
};

impl SymbolTable {
    fn add_type_scope(&mut self, parent: ScopeId, ty: TypeId, decl: DeclId) -> ScopeId {
        let scope = self.add_scope(ScopeKind::Type { ty }, parent);
        let qualifier = self.decl(decl).qualified_name.clone();
        self.set_qualifier(scope, qualifier);
        scope
    }

    /// Declare a class, record, object or interface together with its type
    /// scope.
    pub fn declare_struct(
        &mut self,
        arena: &mut TypeArena,
        scope: ScopeId,
        name: &str,
        kind: StructKind,
        super_type: Option<TypeId>,
    ) -> (DeclId, TypeId, ScopeId) {
        let unit = self.scope(scope).unit();
        let ty = arena.new_struct(kind, name, unit, super_type);
        let decl = self.declare(
            scope,
            name,
            Visibility::Public,
            Span::default(),
            DeclKind::Type {
                ty,
                type_params: Vec::new(),
            },
        );
        let type_scope = self.add_type_scope(scope, ty, decl);
        arena.set_scope(ty, type_scope);
        (decl, ty, type_scope)
    }

    /// Declare a class or record helper and register it with the enclosing
    /// scope so lookups on the extended type find it.
    pub fn declare_helper(
        &mut self,
        arena: &mut TypeArena,
        scope: ScopeId,
        name: &str,
        kind: HelperKind,
        extended: TypeId,
        super_type: Option<TypeId>,
    ) -> (DeclId, TypeId, ScopeId) {
        let unit = self.scope(scope).unit();
        let ty = arena.new_helper(kind, name, unit, extended, super_type);
        let decl = self.declare(
            scope,
            name,
            Visibility::Public,
            Span::default(),
            DeclKind::Type {
                ty,
                type_params: Vec::new(),
            },
        );
        let type_scope = self.add_type_scope(scope, ty, decl);
        arena.set_scope(ty, type_scope);
        self.push_helper(scope, ty);
        (decl, ty, type_scope)
    }

    /// Declare a named type for an existing type id (aliases, arrays,
    /// enumerations, procedural types, ...).
    pub fn declare_type(&mut self, scope: ScopeId, name: &str, ty: TypeId) -> DeclId {
        self.declare(
            scope,
            name,
            Visibility::Public,
            Span::default(),
            DeclKind::Type {
                ty,
                type_params: Vec::new(),
            },
        )
    }

    /// Attach type parameters to a generic type declaration.
    pub fn set_type_params(&mut self, decl: DeclId, params: Vec<DeclId>) {
        if let DeclKind::Type { type_params, .. } = &mut self.decl_mut(decl).kind {
            *type_params = params;
        }
    }

    /// A type parameter of a generic signature. The declaration is owned by
    /// `scope` but hidden from its name lookup.
    pub fn declare_type_parameter(
        &mut self,
        arena: &mut TypeArena,
        scope: ScopeId,
        name: &str,
        constraints: &[TypeId],
    ) -> (DeclId, TypeId) {
        let ty = arena.new_type_parameter(name, constraints.iter().copied().collect::<TypeIdVec>());
        let decl = self.declare_detached(
            scope,
            name,
            Visibility::Public,
            Span::default(),
            DeclKind::TypeParameter { ty },
        );
        (decl, ty)
    }

    pub fn declare_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        kind: VariableKind,
        visibility: Visibility,
    ) -> DeclId {
        self.declare(
            scope,
            name,
            visibility,
            Span::default(),
            DeclKind::Variable { ty, kind },
        )
    }

    pub fn declare_property(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        params: Vec<Parameter>,
        is_default: bool,
        visibility: Visibility,
    ) -> DeclId {
        let declaring_type = self.scope(scope).bound_type();
        self.declare(
            scope,
            name,
            visibility,
            Span::default(),
            DeclKind::Property(PropertyDecl {
                ty,
                params,
                is_default,
                is_class: false,
                declaring_type,
            }),
        )
    }
}

/// Builder for routine declarations.
///
/// Defaults: a public, non-generic procedure with no parameters, not a class
/// method, not flagged `overload`.
///
/// ```ignore
/// let foo = RoutineBuilder::function("Foo", TypeId::INTEGER)
///     .param(Parameter::new("S", TypeId::STRING))
///     .overload()
///     .declare(&mut symbols, &mut arena, scope);
/// ```
#[derive(Debug, Clone)]
pub struct RoutineBuilder {
    name: String,
    kind: RoutineKind,
    params: Vec<Parameter>,
    ret: ReturnSpec,
    type_params: Vec<DeclId>,
    is_class_method: bool,
    overload: bool,
    visibility: Visibility,
    span: Span,
}

impl RoutineBuilder {
    pub fn new(name: &str, kind: RoutineKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            params: Vec::new(),
            ret: ReturnSpec::Fixed(TypeId::VOID),
            type_params: Vec::new(),
            is_class_method: false,
            overload: false,
            visibility: Visibility::Public,
            span: Span::default(),
        }
    }

    pub fn procedure(name: &str) -> Self {
        Self::new(name, RoutineKind::Procedure)
    }

    pub fn function(name: &str, ret: TypeId) -> Self {
        Self::new(name, RoutineKind::Function).returns(ret)
    }

    pub fn constructor(name: &str) -> Self {
        Self::new(name, RoutineKind::Constructor)
    }

    /// A `class operator` overload, e.g. `Add` or `Equal`.
    pub fn operator(name: &str, ret: TypeId) -> Self {
        Self::new(name, RoutineKind::Operator)
            .returns(ret)
            .class_method()
    }

    pub fn param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn returns(mut self, ret: TypeId) -> Self {
        self.ret = ReturnSpec::Fixed(ret);
        self
    }

    /// A result computed from the argument types (intrinsic routines).
    pub fn returns_spec(mut self, ret: ReturnSpec) -> Self {
        self.ret = ret;
        self
    }

    pub fn type_params(mut self, type_params: Vec<DeclId>) -> Self {
        self.type_params = type_params;
        self
    }

    pub fn class_method(mut self) -> Self {
        self.is_class_method = true;
        self
    }

    pub fn overload(mut self) -> Self {
        self.overload = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Declare the routine in `scope`. Routines declared in a type scope
    /// record that type as their declaring type.
    pub fn declare(
        self,
        symbols: &mut SymbolTable,
        arena: &mut TypeArena,
        scope: ScopeId,
    ) -> DeclId {
        let signature = arena.procedural(
            ProceduralKind::Routine,
            self.params.iter().map(|p| ParamType {
                ty: p.ty,
                mode: p.mode,
                has_default: p.has_default,
            }),
            self.ret.declared(),
        );
        let declaring_type = symbols.scope(scope).bound_type();
        symbols.declare(
            scope,
            &self.name,
            self.visibility,
            self.span,
            DeclKind::Routine(RoutineDecl {
                kind: self.kind,
                params: self.params,
                ret: self.ret,
                ty: signature,
                type_params: self.type_params,
                is_class_method: self.is_class_method,
                declaring_type,
                overload: self.overload,
            }),
        )
    }
}
