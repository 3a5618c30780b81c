// resolve/search.rs
//
// Finding the candidate declarations for one name.

use oxpas_identity::{DeclId, ScopeId, Symbol};

use crate::symbols::{DeclKind, ScopeKind, SymbolTable};
use crate::type_arena::{TypeArena, TypeId};

use super::{NameResolver, ResolveCx};

/// Inheritance chains longer than this are treated as cyclic.
const MAX_TYPE_DEPTH: usize = 64;

/// Collects declarations scope by scope. A scope that declares the name
/// ends the search unless everything it declares is an `overload` routine,
/// in which case outer scopes and ancestors keep contributing.
struct Collector<'a> {
    symbols: &'a SymbolTable,
    name: Symbol,
    /// Explicit generic argument count, or None for a plain name.
    type_args: Option<usize>,
    found: Vec<DeclId>,
    done: bool,
}

impl<'a> Collector<'a> {
    fn new(symbols: &'a SymbolTable, name: Symbol, type_args: Option<usize>) -> Self {
        Self {
            symbols,
            name,
            type_args,
            found: Vec::new(),
            done: false,
        }
    }

    fn accepts(&self, decl: DeclId) -> bool {
        let decl = self.symbols.decl(decl);
        match self.type_args {
            Some(count) => decl.type_params().len() == count,
            // A plain name never denotes a generic type
            None => !matches!(
                &decl.kind,
                DeclKind::Type { type_params, .. } if !type_params.is_empty()
            ),
        }
    }

    /// Take the matching declarations of one scope.
    fn visit(&mut self, scope: ScopeId) {
        if self.done {
            return;
        }
        let matches: Vec<DeclId> = self
            .symbols
            .scope(scope)
            .lookup(self.name)
            .iter()
            .copied()
            .filter(|&d| self.accepts(d))
            .collect();
        if matches.is_empty() {
            return;
        }
        let overloads = matches.iter().all(|&d| self.symbols.decl(d).is_overload());
        for decl in matches {
            if !self.found.contains(&decl) {
                self.found.push(decl);
            }
        }
        self.done = !overloads;
    }
}

impl NameResolver {
    /// Populate the candidate set for the last name.
    pub(super) fn search_for_declaration(&mut self, cx: &mut ResolveCx<'_>) {
        if let Some(constraints) = cx
            .types
            .type_parameter(self.current_type)
            .map(|param| param.constraints.clone())
        {
            self.search_constraint_types(cx, &constraints);
            return;
        }

        let scope = *self.current_scope.get_or_insert(self.site);
        self.check_for_helper_scope(cx);
        let scope = self.current_scope.unwrap_or(scope);

        let Some(name) = self.names.last() else {
            return;
        };
        let type_args = name.type_arguments.as_ref().map(Vec::len);
        self.declarations = match cx.symbols.lookup_symbol(&name.image) {
            Some(symbol) => {
                let mut collector = Collector::new(&*cx.symbols, symbol, type_args);
                if scope == self.site {
                    self.search_lexical(&*cx.types, &mut collector, scope);
                } else {
                    self.search_qualified(&*cx.types, &mut collector, scope);
                }
                collector.found
            }
            None => Vec::new(),
        };
        tracing::trace!(
            name = %name.image,
            scope = scope.index(),
            candidates = self.declarations.len(),
            "searched"
        );
    }

    /// Each constraint is searched on its own, in declaration order, and the
    /// first one yielding any candidate wins. The constraints are not merged.
    fn search_constraint_types(&mut self, cx: &mut ResolveCx<'_>, constraints: &[TypeId]) {
        for &constraint in constraints {
            if cx.types.type_scope(constraint).is_none() {
                continue;
            }
            self.update_type(cx, constraint);
            self.search_for_declaration(cx);
            if !self.declarations.is_empty() {
                break;
            }
        }
    }

    /// A value of a type without members of its own (an intrinsic, say)
    /// still reaches the methods of a helper for its type.
    fn check_for_helper_scope(&mut self, cx: &ResolveCx<'_>) {
        if self.current_type.is_unknown() {
            return;
        }
        let in_type_scope = self
            .current_scope
            .is_some_and(|scope| cx.symbols.scope(scope).is_type_scope());
        if in_type_scope {
            return;
        }
        let ty = cx
            .types
            .class_of(self.current_type)
            .unwrap_or(self.current_type);
        if let Some(helper) = cx.symbols.helper_for_type(&*cx.types, self.site, ty)
            && let Some(scope) = cx.types.type_scope(helper)
        {
            self.current_scope = Some(scope);
        }
    }

    /// Unqualified names: walk outward from the reference site.
    ///
    /// A method scope is followed by the members of its type; a file scope
    /// by its imports, last import first.
    fn search_lexical(&self, types: &TypeArena, collector: &mut Collector<'_>, site: ScopeId) {
        let symbols = collector.symbols;
        for scope in symbols.ancestors(site) {
            if collector.done {
                return;
            }
            match &symbols.scope(scope).kind {
                ScopeKind::Type { .. } => self.search_members(types, collector, scope),
                ScopeKind::Method { type_scope, .. } => {
                    collector.visit(scope);
                    if let Some(type_scope) = *type_scope {
                        self.search_members(types, collector, type_scope);
                    }
                }
                ScopeKind::File(file) => {
                    collector.visit(scope);
                    for &import in file.imports.iter().rev() {
                        if let Some(target) = symbols.import_target(import) {
                            collector.visit(target);
                        }
                    }
                }
                ScopeKind::Local => collector.visit(scope),
                ScopeKind::Unknown => return,
            }
        }
    }

    /// Qualified names (`a.b`): only the scope reached through `a`.
    fn search_qualified(&self, types: &TypeArena, collector: &mut Collector<'_>, scope: ScopeId) {
        match collector.symbols.scope(scope).kind {
            ScopeKind::Unknown => {}
            ScopeKind::Type { .. } => self.search_members(types, collector, scope),
            _ => collector.visit(scope),
        }
    }

    /// Members of a type: the helper in effect for it (unless skipped), the
    /// type itself, then its ancestors. A helper's own chain continues into
    /// the members of the type it extends.
    fn search_members(
        &self,
        types: &TypeArena,
        collector: &mut Collector<'_>,
        type_scope: ScopeId,
    ) {
        let symbols = collector.symbols;
        let Some(ty) = symbols.scope(type_scope).bound_type() else {
            collector.visit(type_scope);
            return;
        };

        if let Some(extended) = types.extended_type(ty) {
            self.walk_ancestors(types, collector, ty);
            self.walk_ancestors(types, collector, extended);
            return;
        }

        if !self.skip_helpers
            && let Some(helper) = symbols.helper_for_type(types, self.site, ty)
        {
            self.walk_ancestors(types, collector, helper);
        }
        self.walk_ancestors(types, collector, ty);
    }

    fn walk_ancestors(&self, types: &TypeArena, collector: &mut Collector<'_>, ty: TypeId) {
        let mut next = Some(ty);
        let mut depth = 0;
        while let Some(current) = next {
            if collector.done || depth > MAX_TYPE_DEPTH {
                return;
            }
            if let Some(scope) = types.type_scope(current) {
                collector.visit(scope);
            }
            next = types.super_type(current);
            depth += 1;
        }
    }
}
