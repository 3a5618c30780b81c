// symbols/scope.rs
//
// Scopes: namespace nodes owning declarations by case-folded name.

use oxpas_identity::{DeclId, ScopeId, Symbol, UnitId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::type_arena::TypeId;

#[derive(Debug, Clone)]
pub struct FileScope {
    pub unit: UnitId,
    /// The unit's own name declaration.
    pub unit_decl: Option<DeclId>,
    /// `uses` entries in source order.
    pub imports: Vec<DeclId>,
}

#[derive(Debug, Clone)]
pub enum ScopeKind {
    /// Sentinel for unresolved context: empty and terminal.
    Unknown,
    File(FileScope),
    /// Bound 1:1 to a struct or helper type.
    Type { ty: TypeId },
    /// A routine body. `type_scope` is the declaring type's scope for methods.
    Method {
        routine: Option<DeclId>,
        type_scope: Option<ScopeId>,
    },
    /// Nested blocks with their own declarations.
    Local,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub(super) unit: UnitId,
    /// Prefix for the qualified names of declarations in this scope.
    pub(super) qualifier: String,
    pub(super) names: FxHashMap<Symbol, SmallVec<[DeclId; 2]>>,
    pub(super) declarations: Vec<DeclId>,
    /// Helper types declared directly in this scope, in declaration order.
    pub(super) helpers: SmallVec<[TypeId; 1]>,
}

impl Scope {
    pub(super) fn new(
        kind: ScopeKind,
        parent: Option<ScopeId>,
        unit: UnitId,
        qualifier: String,
    ) -> Self {
        Self {
            kind,
            parent,
            unit,
            qualifier,
            names: FxHashMap::default(),
            declarations: Vec::new(),
            helpers: SmallVec::new(),
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.kind, ScopeKind::Unknown)
    }

    pub fn is_type_scope(&self) -> bool {
        matches!(self.kind, ScopeKind::Type { .. })
    }

    pub fn is_file_scope(&self) -> bool {
        matches!(self.kind, ScopeKind::File(_))
    }

    pub fn as_file(&self) -> Option<&FileScope> {
        match &self.kind {
            ScopeKind::File(file) => Some(file),
            _ => None,
        }
    }

    /// The type a type scope is bound to.
    pub fn bound_type(&self) -> Option<TypeId> {
        match self.kind {
            ScopeKind::Type { ty } => Some(ty),
            _ => None,
        }
    }

    /// Declarations with this name directly in this scope.
    pub fn lookup(&self, name: Symbol) -> &[DeclId] {
        self.names.get(&name).map(|decls| decls.as_slice()).unwrap_or(&[])
    }

    /// Every declaration in declaration order.
    pub fn declarations(&self) -> &[DeclId] {
        &self.declarations
    }

    pub fn helpers(&self) -> &[TypeId] {
        &self.helpers
    }
}
