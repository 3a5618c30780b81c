// unit_resolver.rs
//
// Entry point for resolving the expressions of one unit against a
// compilation database.

use oxpas_identity::{DeclId, NodeId, ScopeId, UnitId};
use oxpas_syntax::{Expr, NameReference};

use crate::compilation_db::CompilationDb;
use crate::errors::SemanticError;
use crate::node_map::NodeMap;
use crate::occurrence::{NameOccurrence, OccurrenceIndex};
use crate::resolution::Resolution;
use crate::resolve::{self, MethodSignature, NameResolver, ResolveCx};
use crate::type_arena::TypeId;
use crate::type_display::display_type_id;

/// Resolves the expressions of one unit.
///
/// The resolver owns a clone of the database. Whatever it adds (interned
/// types, forward type parameters, completed forwards) lands in its own
/// copy; the caller's database and the graphs of imported units are never
/// touched.
///
/// # Usage
/// ```ignore
/// let mut resolver = UnitResolver::new(&db, file_scope)?;
/// let ty = resolver.resolve_expression(&expr, method_scope)?;
/// let unit = resolver.finish();
/// assert_eq!(unit.type_of(expr.id), ty);
/// ```
#[derive(Debug, Clone)]
pub struct UnitResolver {
    db: CompilationDb,
    unit: UnitId,
    file_scope: ScopeId,
    nodes: NodeMap,
    occurrences: OccurrenceIndex,
}

impl UnitResolver {
    pub fn new(db: &CompilationDb, file_scope: ScopeId) -> Result<Self, SemanticError> {
        let not_a_file = || SemanticError::NotAFileScope {
            scope: file_scope.index(),
        };
        if file_scope.index() as usize >= db.symbols.scope_count() {
            return Err(not_a_file());
        }
        let file = db.symbols.scope(file_scope).as_file().ok_or_else(not_a_file)?;
        Ok(Self {
            db: db.clone(),
            unit: file.unit,
            file_scope,
            nodes: NodeMap::new(),
            occurrences: OccurrenceIndex::new(),
        })
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn file_scope(&self) -> ScopeId {
        self.file_scope
    }

    pub fn db(&self) -> &CompilationDb {
        &self.db
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn occurrences(&self) -> &OccurrenceIndex {
        &self.occurrences
    }

    fn cx(&mut self, site: ScopeId) -> ResolveCx<'_> {
        let (types, symbols) = self.db.parts_mut();
        ResolveCx {
            types,
            symbols,
            nodes: &mut self.nodes,
            occurrences: &mut self.occurrences,
            unit: self.unit,
            site,
            record: true,
        }
    }

    /// Type an expression written in `scope`, binding every name in it.
    ///
    /// Unresolved names leave the unknown type; only an ambiguous reference
    /// is an error.
    #[tracing::instrument(skip(self, expr), fields(node = expr.id.index(), scope = scope.index()))]
    pub fn resolve_expression(
        &mut self,
        expr: &Expr,
        scope: ScopeId,
    ) -> Result<TypeId, SemanticError> {
        self.resolve_expression_as(expr, scope, None)
    }

    /// Like [`resolve_expression`](Self::resolve_expression), for a context
    /// expecting `expected` (an assignment target or parameter type). A
    /// routine name assigned to a procedural type becomes a method
    /// reference instead of a call.
    pub fn resolve_expression_as(
        &mut self,
        expr: &Expr,
        scope: ScopeId,
        expected: Option<TypeId>,
    ) -> Result<TypeId, SemanticError> {
        let mut cx = self.cx(scope);
        let ty = resolve::resolve_expression(&mut cx, expr, expected)?;
        tracing::trace!(ty = %display_type_id(ty, &self.db.types), "resolved expression");
        Ok(ty)
    }

    /// Resolve a name that is not part of an expression (a type reference
    /// in a declaration, say). A tie is reported as an error, like in
    /// expressions.
    pub fn resolve_name(
        &mut self,
        name: &NameReference,
        scope: ScopeId,
    ) -> Result<Resolution, SemanticError> {
        let mut cx = self.cx(scope);
        let mut resolver = NameResolver::new(scope);
        resolver.read_name_reference(&mut cx, name)?;
        if resolver.has_pending_routines(cx.symbols) {
            resolver.disambiguate_implicit_empty_argument_list(&mut cx)?;
        }
        resolver.commit(&mut cx)?;
        let resolution = match resolver.resolved().last() {
            Some(&decl) if !resolver.name_resolution_failed() => Resolution::Resolved(decl),
            _ => Resolution::Unresolved,
        };
        tracing::trace!(name = %name.image(), ?resolution, "resolved name");
        Ok(resolution)
    }

    /// Bind the name of a routine implementation (`TFoo.Bar`) to the
    /// declaration it implements, declaring the implementation's own type
    /// parameters in `method_scope`.
    #[tracing::instrument(skip(self, name, params), fields(name = %name.image()))]
    pub fn resolve_method_name(
        &mut self,
        name: &NameReference,
        method_scope: ScopeId,
        params: &[TypeId],
        ret: TypeId,
        is_class: bool,
    ) -> Result<Resolution, SemanticError> {
        let mut cx = self.cx(method_scope);
        let mut resolver = NameResolver::new(method_scope);
        let signature = MethodSignature {
            params,
            ret,
            is_class,
        };
        resolver.read_method_name_reference(&mut cx, name, method_scope, signature)?;
        let resolution = resolver.resolution();
        resolver.commit(&mut cx)?;
        tracing::debug!(?resolution, "method name");
        Ok(resolution)
    }

    /// Back-patch a forward declaration of this unit with its completed type.
    pub fn complete_forward_type(
        &mut self,
        forward: TypeId,
        completed: TypeId,
    ) -> Result<(), SemanticError> {
        let name = || display_type_id(forward, &self.db.types);
        match self.db.types.owning_unit(forward) {
            Some(owner) if owner != self.unit => {
                return Err(SemanticError::ForeignMutation { name: name() });
            }
            None => return Err(SemanticError::NotAForwardType { name: name() }),
            Some(_) => {}
        }
        if !self.db.types.is_forward(forward) {
            return Err(SemanticError::NotAForwardType { name: name() });
        }
        let patched = self.db.types_mut().complete_forward(forward, completed);
        if !patched {
            return Err(SemanticError::NotAForwardType {
                name: display_type_id(forward, &self.db.types),
            });
        }
        Ok(())
    }

    pub fn finish(self) -> ResolvedUnit {
        tracing::debug!(
            nodes = self.nodes.len(),
            occurrences = self.occurrences.len(),
            "unit resolved"
        );
        ResolvedUnit {
            db: self.db,
            unit: self.unit,
            nodes: self.nodes,
            occurrences: self.occurrences,
        }
    }
}

/// The outcome of resolving a unit: its private database snapshot, node
/// annotations and occurrence index. Read-only.
#[derive(Debug, Clone)]
pub struct ResolvedUnit {
    db: CompilationDb,
    unit: UnitId,
    nodes: NodeMap,
    occurrences: OccurrenceIndex,
}

impl ResolvedUnit {
    pub fn db(&self) -> &CompilationDb {
        &self.db
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.nodes
    }

    pub fn occurrences(&self) -> &OccurrenceIndex {
        &self.occurrences
    }

    /// The resolved type of a node; UNKNOWN when it was never typed.
    pub fn type_of(&self, node: NodeId) -> TypeId {
        self.nodes.type_of(node)
    }

    pub fn decl_of(&self, node: NodeId) -> Option<DeclId> {
        self.nodes.decl_of(node)
    }

    /// Every reference to `decl` in this unit.
    pub fn references(&self, decl: DeclId) -> impl Iterator<Item = &NameOccurrence> + '_ {
        self.occurrences.of_declaration(decl)
    }
}
