// resolve/mod.rs
//
// Name resolution: walks a chain of names, calls, indexers and dereferences,
// binding each name to a declaration and tracking the type reached so far.
//
// The resolver state is split in two. `ResolveCx` borrows everything shared
// by the whole unit (arenas, node annotations, occurrence index); a
// `NameResolver` is the per-chain state and is cheap to clone, so nested
// lookups (type arguments, default array properties, unit-name retries) run
// on a fresh or cloned resolver against the same context.

mod disambiguate;
mod expr;
mod method_names;
mod primary;
mod search;
#[cfg(test)]
mod tests;
mod unit_names;
mod visibility;

pub(crate) use expr::resolve_expression;
pub(crate) use method_names::MethodSignature;
pub use visibility::is_method_visible_from;

use oxpas_identity::{DeclId, ScopeId, UnitId};
use rustc_hash::FxHashMap;

use crate::errors::SemanticError;
use crate::node_map::NodeMap;
use crate::occurrence::{NameOccurrence, OccurrenceIndex};
use crate::resolution::Resolution;
use crate::symbols::{DeclKind, SymbolTable};
use crate::type_arena::{Substitutions, TypeArena, TypeId};
use crate::type_display::display_signature;

/// Everything a resolution pass reads and writes besides the chain state.
pub(crate) struct ResolveCx<'a> {
    pub types: &'a mut TypeArena,
    pub symbols: &'a mut SymbolTable,
    pub nodes: &'a mut NodeMap,
    pub occurrences: &'a mut OccurrenceIndex,
    /// The unit being resolved.
    pub unit: UnitId,
    /// Scope the expression is written in.
    pub site: ScopeId,
    /// False while typing an argument speculatively: nothing is recorded.
    pub record: bool,
}

impl ResolveCx<'_> {
    /// A reborrow that resolves without recording anything.
    pub(crate) fn speculative(&mut self) -> ResolveCx<'_> {
        ResolveCx {
            types: &mut *self.types,
            symbols: &mut *self.symbols,
            nodes: &mut *self.nodes,
            occurrences: &mut *self.occurrences,
            unit: self.unit,
            site: self.site,
            record: false,
        }
    }
}

/// State of one name-chain walk.
#[derive(Debug, Clone)]
pub(crate) struct NameResolver {
    site: ScopeId,
    names: Vec<NameOccurrence>,
    /// Committed declarations, parallel to `names`.
    resolved: Vec<DeclId>,
    /// Candidates for the last name, not yet committed.
    declarations: Vec<DeclId>,
    current_scope: Option<ScopeId>,
    current_type: TypeId,
    /// Explicit generic arguments per candidate (`Foo<Integer>`).
    explicit_subs: FxHashMap<DeclId, Substitutions>,
    /// Arguments of the specialized generic types committed so far
    /// (`TBox<Integer>.Create.Value`), applied to every member after them.
    type_subs: Substitutions,
    /// Member lookups skip helpers (`inherited` calls).
    skip_helpers: bool,
}

impl NameResolver {
    pub(crate) fn new(site: ScopeId) -> Self {
        Self {
            site,
            names: Vec::new(),
            resolved: Vec::new(),
            declarations: Vec::new(),
            current_scope: None,
            current_type: TypeId::UNKNOWN,
            explicit_subs: FxHashMap::default(),
            type_subs: Substitutions::default(),
            skip_helpers: false,
        }
    }

    pub(crate) fn declarations(&self) -> &[DeclId] {
        &self.declarations
    }

    pub(crate) fn resolved(&self) -> &[DeclId] {
        &self.resolved
    }

    pub(crate) fn is_explicit_invocation(&self) -> bool {
        self.names.last().is_some_and(|n| n.explicit_invocation)
    }

    /// The candidate set of the last name as a tagged outcome.
    pub(crate) fn resolution(&self) -> Resolution {
        Resolution::from_candidates(&self.declarations)
    }

    /// True if the pending candidates are all routines (a bare routine name
    /// whose invocation has not been decided yet).
    pub(crate) fn has_pending_routines(&self, symbols: &SymbolTable) -> bool {
        !self.declarations.is_empty()
            && self
                .declarations
                .iter()
                .all(|&d| symbols.decl(d).is_routine())
    }

    /// The type reached so far; unknown once a name failed to resolve.
    pub(crate) fn approximate_type(&self, cx: &mut ResolveCx<'_>) -> TypeId {
        if self.declarations.len() + self.resolved.len() < self.names.len() {
            return TypeId::UNKNOWN;
        }
        match self.declarations.last() {
            Some(&decl) => self.type_of_declaration(cx, decl).unwrap_or(TypeId::UNKNOWN),
            None => self.current_type,
        }
    }

    /// The type a typed declaration contributes to the chain.
    ///
    /// Constructors yield the class being constructed; type identifiers
    /// yield a class reference to the named type.
    fn type_of_declaration(&self, cx: &mut ResolveCx<'_>, id: DeclId) -> Option<TypeId> {
        let decl = cx.symbols.decl(id);
        if decl.is_constructor() {
            let mut result = cx.types.class_of(self.current_type).unwrap_or(self.current_type);
            if result.is_unknown() && self.names.len() == 1 {
                result = cx
                    .symbols
                    .enclosing_method_scope(self.site)
                    .and_then(|scope| cx.symbols.method_scope_type(scope))
                    .unwrap_or(TypeId::UNKNOWN);
            }
            return Some(result);
        }
        let is_type_identifier = decl.is_type_identifier();
        let mut ty = decl.ty()?;
        if let Some(subs) = self.substitutions_for(id) {
            ty = cx.types.substitute(ty, &subs);
        }
        if is_type_identifier {
            ty = cx.types.class_reference(ty);
        }
        Some(ty)
    }

    /// The generic arguments in effect for `decl`: those of the specialized
    /// types the chain went through, then its own explicit ones.
    pub(crate) fn substitutions_for(&self, decl: DeclId) -> Option<Substitutions> {
        let own = self.explicit_subs.get(&decl);
        if self.type_subs.is_empty() {
            return own.cloned();
        }
        let mut subs = self.type_subs.clone();
        if let Some(own) = own {
            subs.extend(own.iter().map(|(&param, &arg)| (param, arg)));
        }
        Some(subs)
    }

    pub(crate) fn update_type(&mut self, cx: &ResolveCx<'_>, ty: TypeId) {
        self.current_type = ty;
        let scope = cx
            .types
            .extract_scoped_type(ty)
            .and_then(|scoped| cx.types.type_scope(scoped))
            .unwrap_or(SymbolTable::UNKNOWN_SCOPE);
        self.current_scope = Some(scope);
    }

    fn add_name(&mut self, occurrence: NameOccurrence) {
        if let Some(previous) = self.names.last_mut() {
            previous.qualifies_next = true;
        }
        self.names.push(occurrence);
    }

    /// A tie after every disambiguation step is fatal.
    fn check_ambiguity(&self, cx: &ResolveCx<'_>) -> Result<(), SemanticError> {
        let Resolution::Ambiguous(tied) = self.resolution() else {
            return Ok(());
        };
        let (name, span) = self
            .names
            .last()
            .map(|n| (n.image.clone(), n.span))
            .unwrap_or_default();
        let candidates = tied
            .iter()
            .map(|&d| display_signature(d, &*cx.symbols, &*cx.types))
            .collect::<Vec<_>>()
            .join(", ");
        tracing::debug!(%name, %candidates, "ambiguous reference");
        Err(SemanticError::AmbiguousReference {
            name,
            candidates,
            span: span.into(),
        })
    }

    /// Commit the pending candidate and move into the scope it leads to.
    ///
    /// Returns the committed declaration, or None when nothing was pending.
    pub(crate) fn add_resolved(
        &mut self,
        cx: &mut ResolveCx<'_>,
    ) -> Result<Option<DeclId>, SemanticError> {
        let Some(&resolved) = self.declarations.last() else {
            return Ok(None);
        };
        self.check_ambiguity(cx)?;
        self.current_scope = Some(SymbolTable::UNKNOWN_SCOPE);
        if cx.symbols.decl(resolved).is_type_identifier()
            && let Some(subs) = self.explicit_subs.get(&resolved)
        {
            self.type_subs.extend(subs.iter().map(|(&param, &arg)| (param, arg)));
        }

        let unit_scope = match &cx.symbols.decl(resolved).kind {
            DeclKind::UnitImport { target, .. } => Some(*target),
            DeclKind::Unit { file_scope, .. } => Some(Some(*file_scope)),
            _ => None,
        };
        match unit_scope {
            Some(Some(scope)) => self.current_scope = Some(scope),
            Some(None) => {}
            None => {
                if let Some(ty) = self.type_of_declaration(cx, resolved) {
                    self.update_type(cx, ty);
                }
            }
        }

        self.resolved.append(&mut self.declarations);
        Ok(Some(resolved))
    }

    /// True once some name in the chain has no candidate left.
    pub(crate) fn name_resolution_failed(&self) -> bool {
        self.names.len() != self.resolved.len() + self.declarations.len().min(1)
    }

    /// Commit the chain: bind each name to its declaration, annotate the
    /// name nodes and record the occurrences.
    pub(crate) fn commit(&mut self, cx: &mut ResolveCx<'_>) -> Result<(), SemanticError> {
        self.add_resolved(cx)?;
        if !cx.record || self.names.is_empty() {
            return Ok(());
        }
        let mut chain = self.names.clone();
        for (occurrence, &decl) in chain.iter_mut().zip(&self.resolved) {
            occurrence.declaration = Some(decl);
            cx.nodes.set_decl(occurrence.node, decl);
        }
        for occurrence in chain.iter().skip(self.resolved.len()) {
            tracing::debug!(name = %occurrence.image, "unresolved name");
        }
        cx.occurrences.record_chain(chain);
        Ok(())
    }

    /// Record a standalone occurrence already bound to a declaration
    /// (type-parameter references, implicit default-property accesses).
    fn record_bound(cx: &mut ResolveCx<'_>, mut occurrence: NameOccurrence, decl: DeclId) {
        if !cx.record {
            return;
        }
        occurrence.declaration = Some(decl);
        cx.nodes.set_decl(occurrence.node, decl);
        cx.occurrences.record_chain(vec![occurrence]);
    }
}
