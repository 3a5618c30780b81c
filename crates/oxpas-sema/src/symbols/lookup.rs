// symbols/lookup.rs
//
// Structural queries over the scope graph: enclosing scopes, helpers,
// default array properties and operator overloads.

use oxpas_identity::{DeclId, ScopeId, UnitId};

use crate::type_arena::{TypeArena, TypeId};

use super::{DeclKind, RoutineKind, ScopeKind, SymbolTable};

const MAX_DEPTH: usize = 256;

impl SymbolTable {
    /// Walk from `scope` outward through parents.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        let mut next = Some(scope);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.scope(current).parent;
            Some(current)
        })
        .take(MAX_DEPTH)
    }

    pub fn file_scope_of(&self, scope: ScopeId) -> Option<ScopeId> {
        self.ancestors(scope)
            .find(|&s| self.scope(s).is_file_scope())
    }

    pub fn unit_of_scope(&self, scope: ScopeId) -> UnitId {
        self.scope(scope).unit()
    }

    pub fn enclosing_method_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        self.ancestors(scope)
            .find(|&s| matches!(self.scope(s).kind, ScopeKind::Method { .. }))
    }

    /// The type whose member is being implemented by a method scope, looking
    /// through nested routines to the first one that belongs to a type.
    pub fn method_scope_type(&self, method_scope: ScopeId) -> Option<TypeId> {
        let mut current = Some(method_scope);
        while let Some(scope) = current {
            match self.scope(scope).kind {
                ScopeKind::Method {
                    type_scope: Some(type_scope),
                    ..
                } => return self.scope(type_scope).bound_type(),
                ScopeKind::Method { .. } | ScopeKind::Local => current = self.scope(scope).parent,
                _ => return None,
            }
        }
        None
    }

    /// The routine a method scope implements, if any.
    pub fn method_scope_routine(&self, method_scope: ScopeId) -> Option<DeclId> {
        match self.scope(method_scope).kind {
            ScopeKind::Method { routine, .. } => routine,
            _ => None,
        }
    }

    /// The scope of the unit an import points at.
    pub fn import_target(&self, import: DeclId) -> Option<ScopeId> {
        match &self.decl(import).kind {
            DeclKind::UnitImport { target, .. } => *target,
            _ => None,
        }
    }

    /// Find the helper visible from `site` that applies to `ty`.
    ///
    /// Scopes are walked outward; within a scope the latest helper wins, and
    /// a file scope also offers the helpers of its imports, last import first.
    pub fn helper_for_type(&self, arena: &TypeArena, site: ScopeId, ty: TypeId) -> Option<TypeId> {
        let ty = arena.class_of(ty).unwrap_or(ty);
        let applies = |helper: &TypeId| arena.is_helper_of(*helper, ty);
        for scope in self.ancestors(site) {
            if let Some(&helper) = self.scope(scope).helpers().iter().rev().find(|h| applies(h)) {
                return Some(helper);
            }
            if let ScopeKind::File(file) = &self.scope(scope).kind {
                for &import in file.imports.iter().rev() {
                    let Some(target) = self.import_target(import) else {
                        continue;
                    };
                    if let Some(&helper) =
                        self.scope(target).helpers().iter().rev().find(|h| applies(h))
                    {
                        return Some(helper);
                    }
                }
            }
        }
        None
    }

    /// Default array properties of a struct, from the nearest type in its
    /// ancestry that declares any.
    pub fn default_array_properties(&self, arena: &TypeArena, ty: TypeId) -> Vec<DeclId> {
        let mut current = Some(ty);
        let mut depth = 0;
        while let Some(ty) = current {
            let Some(scope) = arena.type_scope(ty) else {
                break;
            };
            let found: Vec<DeclId> = self
                .scope(scope)
                .declarations()
                .iter()
                .copied()
                .filter(|&d| {
                    self.decl(d)
                        .property()
                        .is_some_and(|p| p.is_default && p.is_array_property())
                })
                .collect();
            if !found.is_empty() {
                return found;
            }
            current = arena.super_type(ty);
            depth += 1;
            if depth > MAX_DEPTH {
                break;
            }
        }
        Vec::new()
    }

    /// `class operator` declarations of a struct matching any of `names`.
    pub fn operator_overloads(&self, arena: &TypeArena, ty: TypeId, names: &[&str]) -> Vec<DeclId> {
        let Some(scope) = arena.type_scope(ty) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for name in names {
            let Some(symbol) = self.lookup_symbol(name) else {
                continue;
            };
            found.extend(self.scope(scope).lookup(symbol).iter().copied().filter(|&d| {
                matches!(
                    &self.decl(d).kind,
                    DeclKind::Routine(r) if r.kind == RoutineKind::Operator
                )
            }));
        }
        found
    }
}
