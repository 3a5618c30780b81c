// symbols/mod.rs
//
// The scope/declaration graph: arenas of scopes and declarations
// cross-referenced by index.

mod builder;
mod declaration;
mod lookup;
mod scope;

use oxpas_identity::{DeclId, Interner, QualifiedName, ScopeId, Span, Symbol, UnitId};

pub use builder::RoutineBuilder;
pub use declaration::*;
pub use scope::{FileScope, Scope, ScopeKind};

#[derive(Debug, Clone)]
pub struct UnitInfo {
    pub name: QualifiedName,
    pub file_scope: ScopeId,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: Interner,
    scopes: Vec<Scope>,
    decls: Vec<Declaration>,
    units: Vec<UnitInfo>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// The sentinel scope for unresolved context.
    pub const UNKNOWN_SCOPE: ScopeId = ScopeId::new(0);

    pub fn new() -> Self {
        let unknown = Scope::new(ScopeKind::Unknown, None, UnitId::new(u32::MAX), String::new());
        Self {
            names: Interner::new(),
            scopes: vec![unknown],
            decls: Vec::new(),
            units: Vec::new(),
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index() as usize]
    }

    pub fn decl(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index() as usize]
    }

    pub(crate) fn decl_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.decls[id.index() as usize]
    }

    pub fn unit(&self, id: UnitId) -> &UnitInfo {
        &self.units[id.index() as usize]
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &UnitInfo)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, info)| (UnitId::new(i as u32), info))
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn decl_count(&self) -> usize {
        self.decls.len()
    }

    pub fn interner(&self) -> &Interner {
        &self.names
    }

    /// The symbol for a name, if any declaration or lookup ever used it.
    pub fn lookup_symbol(&self, image: &str) -> Option<Symbol> {
        self.names.lookup(image)
    }

    pub fn intern(&mut self, image: &str) -> Symbol {
        self.names.intern(image)
    }

    // ========================================================================
    // Graph construction
    // ========================================================================

    /// Create a unit with its file scope and unit-name declaration.
    pub fn add_unit(&mut self, name: &str) -> (UnitId, ScopeId) {
        let unit = UnitId::new(self.units.len() as u32);
        let qualified = QualifiedName::parse(name);
        let scope = self.push_scope(Scope::new(
            ScopeKind::File(FileScope {
                unit,
                unit_decl: None,
                imports: Vec::new(),
            }),
            None,
            unit,
            name.to_string(),
        ));
        self.units.push(UnitInfo {
            name: qualified.clone(),
            file_scope: scope,
        });
        let decl = self.declare(
            scope,
            name,
            Visibility::Public,
            Span::default(),
            DeclKind::Unit {
                name: qualified,
                file_scope: scope,
            },
        );
        if let ScopeKind::File(file) = &mut self.scopes[scope.index() as usize].kind {
            file.unit_decl = Some(decl);
        }
        (unit, scope)
    }

    /// Add a `uses` entry to a file scope.
    pub fn add_import(
        &mut self,
        file_scope: ScopeId,
        name: &str,
        target: Option<ScopeId>,
    ) -> DeclId {
        let decl = self.declare(
            file_scope,
            name,
            Visibility::Public,
            Span::default(),
            DeclKind::UnitImport {
                name: QualifiedName::parse(name),
                target,
            },
        );
        if let ScopeKind::File(file) = &mut self.scopes[file_scope.index() as usize].kind {
            file.imports.push(decl);
        }
        decl
    }

    pub fn add_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let parent_scope = self.scope(parent);
        let unit = parent_scope.unit;
        let qualifier = parent_scope.qualifier.clone();
        self.push_scope(Scope::new(kind, Some(parent), unit, qualifier))
    }

    /// A routine body scope. For methods, `type_scope` is the declaring
    /// type's scope.
    pub fn add_method_scope(
        &mut self,
        parent: ScopeId,
        routine: Option<DeclId>,
        type_scope: Option<ScopeId>,
    ) -> ScopeId {
        let scope = self.add_scope(ScopeKind::Method { routine, type_scope }, parent);
        if let Some(routine) = routine {
            let qualifier = self.decl(routine).qualified_name.clone();
            self.scopes[scope.index() as usize].qualifier = qualifier;
        }
        scope
    }

    pub fn add_local_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.add_scope(ScopeKind::Local, parent)
    }

    fn push_scope(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    /// Add a declaration to a scope, visible to name lookup.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        image: &str,
        visibility: Visibility,
        span: Span,
        kind: DeclKind,
    ) -> DeclId {
        let id = self.declare_detached(scope, image, visibility, span, kind);
        let name = self.decl(id).name;
        let owner = &mut self.scopes[scope.index() as usize];
        owner.names.entry(name).or_default().push(id);
        owner.declarations.push(id);
        id
    }

    /// Create a declaration owned by `scope` but not reachable by name lookup
    /// in it (type parameters of a signature, for instance).
    pub fn declare_detached(
        &mut self,
        scope: ScopeId,
        image: &str,
        visibility: Visibility,
        span: Span,
        kind: DeclKind,
    ) -> DeclId {
        let name = self.names.intern(image);
        let owner = self.scope(scope);
        let unit = owner.unit;
        let qualified_name = if owner.qualifier.is_empty() {
            image.to_string()
        } else {
            format!("{}.{}", owner.qualifier, image)
        };
        let id = DeclId::new(self.decls.len() as u32);
        self.decls.push(Declaration {
            name,
            image: image.to_string(),
            qualified_name,
            scope,
            unit,
            span,
            visibility,
            kind,
        });
        id
    }

    pub(crate) fn set_qualifier(&mut self, scope: ScopeId, qualifier: String) {
        self.scopes[scope.index() as usize].qualifier = qualifier;
    }

    pub(crate) fn push_helper(&mut self, scope: ScopeId, helper: crate::type_arena::TypeId) {
        self.scopes[scope.index() as usize].helpers.push(helper);
    }
}
