// symbols/declaration.rs
//
// Declarations: named entities owned by scopes.

use oxpas_identity::{DeclId, QualifiedName, ScopeId, Span, Symbol, UnitId};

use crate::type_arena::{ParamMode, TypeArena, TypeId};

/// Member visibility, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Visibility {
    StrictPrivate,
    Private,
    StrictProtected,
    Protected,
    Public,
    Published,
    /// Members with no visibility section default to published.
    ImplicitPublished,
}

impl Visibility {
    pub const ALL: [Visibility; 7] = [
        Visibility::StrictPrivate,
        Visibility::Private,
        Visibility::StrictProtected,
        Visibility::Protected,
        Visibility::Public,
        Visibility::Published,
        Visibility::ImplicitPublished,
    ];

    /// `private` includes `strict private`.
    pub fn is_private(self) -> bool {
        matches!(self, Visibility::Private | Visibility::StrictPrivate)
    }

    pub fn is_strict_private(self) -> bool {
        self == Visibility::StrictPrivate
    }

    pub fn is_strict_protected(self) -> bool {
        self == Visibility::StrictProtected
    }

    pub fn is_public_or_published(self) -> bool {
        matches!(
            self,
            Visibility::Public | Visibility::Published | Visibility::ImplicitPublished
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    Field,
    Parameter,
    Constant,
    Result,
    SelfValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineKind {
    Procedure,
    Function,
    Constructor,
    Destructor,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeId,
    pub mode: ParamMode,
    pub has_default: bool,
}

impl Parameter {
    pub fn new(name: &str, ty: TypeId) -> Self {
        Self {
            name: name.to_string(),
            ty,
            mode: ParamMode::Value,
            has_default: false,
        }
    }

    pub fn with_mode(mut self, mode: ParamMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }
}

/// How a routine's result type is determined.
///
/// Declared routines have a fixed return type; intrinsic routines such as
/// `Abs` or `High` compute it from the concrete argument types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnSpec {
    Fixed(TypeId),
    /// The type of the argument at this index.
    ArgumentType(usize),
    /// `High`/`Low`: Integer for arrays and strings, the ordinal type
    /// itself otherwise (class references of types are unwrapped).
    OrdinalBound(usize),
}

impl ReturnSpec {
    pub fn evaluate(self, arena: &TypeArena, arguments: &[TypeId]) -> TypeId {
        match self {
            ReturnSpec::Fixed(ty) => ty,
            ReturnSpec::ArgumentType(index) => {
                arguments.get(index).copied().unwrap_or(TypeId::UNKNOWN)
            }
            ReturnSpec::OrdinalBound(index) => {
                let Some(&arg) = arguments.get(index) else {
                    return TypeId::UNKNOWN;
                };
                let arg = arena.class_of(arg).unwrap_or(arg);
                if arena.is_array(arg) || arena.is_string(arg) {
                    TypeId::INTEGER
                } else {
                    arg
                }
            }
        }
    }

    /// The fixed type, or UNTYPED for computed results.
    pub fn declared(self) -> TypeId {
        match self {
            ReturnSpec::Fixed(ty) => ty,
            _ => TypeId::UNTYPED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutineDecl {
    pub kind: RoutineKind,
    pub params: Vec<Parameter>,
    pub ret: ReturnSpec,
    /// The routine's own procedural signature type.
    pub ty: TypeId,
    pub type_params: Vec<DeclId>,
    pub is_class_method: bool,
    /// None for free routines.
    pub declaring_type: Option<TypeId>,
    /// Declared with the `overload` directive.
    pub overload: bool,
}

impl RoutineDecl {
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn required_params(&self) -> usize {
        self.params.iter().filter(|p| !p.has_default).count()
    }
}

#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub ty: TypeId,
    /// Index parameters; non-empty for array properties.
    pub params: Vec<Parameter>,
    pub is_default: bool,
    pub is_class: bool,
    pub declaring_type: Option<TypeId>,
}

impl PropertyDecl {
    pub fn is_array_property(&self) -> bool {
        !self.params.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Variable { ty: TypeId, kind: VariableKind },
    Routine(RoutineDecl),
    Type { ty: TypeId, type_params: Vec<DeclId> },
    TypeParameter { ty: TypeId },
    Property(PropertyDecl),
    /// The unit's own name, declared in its file scope.
    Unit { name: QualifiedName, file_scope: ScopeId },
    /// A `uses` clause entry; the target is None when the unit was not found.
    UnitImport { name: QualifiedName, target: Option<ScopeId> },
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: Symbol,
    pub image: String,
    pub qualified_name: String,
    pub scope: ScopeId,
    pub unit: UnitId,
    pub span: Span,
    pub visibility: Visibility,
    pub kind: DeclKind,
}

impl Declaration {
    pub fn routine(&self) -> Option<&RoutineDecl> {
        match &self.kind {
            DeclKind::Routine(routine) => Some(routine),
            _ => None,
        }
    }

    pub fn property(&self) -> Option<&PropertyDecl> {
        match &self.kind {
            DeclKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn is_routine(&self) -> bool {
        matches!(self.kind, DeclKind::Routine(_))
    }

    pub fn is_constructor(&self) -> bool {
        matches!(&self.kind, DeclKind::Routine(r) if r.kind == RoutineKind::Constructor)
    }

    /// Routines and array properties can be invoked with an argument list.
    pub fn is_invocable(&self) -> bool {
        match &self.kind {
            DeclKind::Routine(_) => true,
            DeclKind::Property(property) => property.is_array_property(),
            _ => false,
        }
    }

    /// Operator overloads are invocable but never callable by name.
    pub fn is_callable(&self) -> bool {
        !matches!(&self.kind, DeclKind::Routine(r) if r.kind == RoutineKind::Operator)
    }

    /// Type declarations and type parameters name types, not values.
    pub fn is_type_identifier(&self) -> bool {
        matches!(self.kind, DeclKind::Type { .. } | DeclKind::TypeParameter { .. })
    }

    pub fn is_generic(&self) -> bool {
        match &self.kind {
            DeclKind::Routine(routine) => routine.is_generic(),
            DeclKind::Type { type_params, .. } => !type_params.is_empty(),
            _ => false,
        }
    }

    pub fn type_params(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Routine(routine) => &routine.type_params,
            DeclKind::Type { type_params, .. } => type_params,
            _ => &[],
        }
    }

    /// Routines flagged `overload` merge with same-named routines from
    /// enclosing scopes and ancestors.
    pub fn is_overload(&self) -> bool {
        matches!(&self.kind, DeclKind::Routine(r) if r.overload)
    }

    /// The declared type of a typed declaration. Routines report their
    /// procedural signature; units and imports have none.
    pub fn ty(&self) -> Option<TypeId> {
        match &self.kind {
            DeclKind::Variable { ty, .. }
            | DeclKind::Type { ty, .. }
            | DeclKind::TypeParameter { ty } => Some(*ty),
            DeclKind::Routine(routine) => Some(routine.ty),
            DeclKind::Property(property) => Some(property.ty),
            DeclKind::Unit { .. } | DeclKind::UnitImport { .. } => None,
        }
    }

    /// Formal parameters of an invocable.
    pub fn params(&self) -> &[Parameter] {
        match &self.kind {
            DeclKind::Routine(routine) => &routine.params,
            DeclKind::Property(property) => &property.params,
            _ => &[],
        }
    }

    pub fn required_params(&self) -> usize {
        self.params().iter().filter(|p| !p.has_default).count()
    }

    pub fn is_class_invocable(&self) -> bool {
        match &self.kind {
            DeclKind::Routine(routine) => routine.is_class_method,
            DeclKind::Property(property) => property.is_class,
            _ => false,
        }
    }

    pub fn declaring_type(&self) -> Option<TypeId> {
        match &self.kind {
            DeclKind::Routine(routine) => routine.declaring_type,
            DeclKind::Property(property) => property.declaring_type,
            _ => None,
        }
    }

    pub fn return_spec(&self) -> ReturnSpec {
        match &self.kind {
            DeclKind::Routine(routine) => routine.ret,
            DeclKind::Property(property) => ReturnSpec::Fixed(property.ty),
            _ => ReturnSpec::Fixed(TypeId::UNKNOWN),
        }
    }
}
