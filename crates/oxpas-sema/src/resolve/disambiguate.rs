// resolve/disambiguate.rs
//
// Narrowing a candidate set: filters that drop candidates outright and the
// tie-breaks applied after overload ranking.

use oxpas_identity::UnitId;

use crate::invocation::{EqualityType, TypeComparer};
use crate::symbols::SymbolTable;
use crate::type_arena::{TypeArena, TypeId};

use super::{NameResolver, ResolveCx};

/// Parameter types of an implementation match a declaration when they are
/// the same type, or type parameters of the same name.
fn same_signature_type(types: &TypeArena, declared: TypeId, written: TypeId) -> bool {
    if types.is_same(declared, written) {
        return true;
    }
    match (types.type_parameter(declared), types.type_parameter(written)) {
        (Some(a), Some(b)) => a.name.eq_ignore_ascii_case(&b.name),
        _ => false,
    }
}

impl NameResolver {
    pub(super) fn disambiguate_invocable(&mut self, symbols: &SymbolTable) {
        self.declarations.retain(|&d| symbols.decl(d).is_invocable());
    }

    /// Keep invocables whose `[required, total]` parameter window admits
    /// `count` arguments.
    pub(super) fn disambiguate_arity(&mut self, symbols: &SymbolTable, count: usize) {
        self.declarations.retain(|&d| {
            let decl = symbols.decl(d);
            decl.params().len() >= count && decl.required_params() <= count
        });
    }

    pub(super) fn disambiguate_is_callable(&mut self, symbols: &SymbolTable) {
        self.declarations.retain(|&d| symbols.decl(d).is_callable());
    }

    pub(super) fn disambiguate_visibility(&mut self, cx: &ResolveCx<'_>) {
        let mut declarations = std::mem::take(&mut self.declarations);
        declarations.retain(|&d| self.is_visible_declaration(cx, d));
        self.declarations = declarations;
    }

    pub(super) fn disambiguate_not_generic(&mut self, symbols: &SymbolTable) {
        self.declarations.retain(|&d| !symbols.decl(d).is_generic());
    }

    pub(super) fn disambiguate_within_unit(&mut self, symbols: &SymbolTable, unit: UnitId) {
        self.declarations.retain(|&d| symbols.decl(d).unit == unit);
    }

    fn all_routines(&self, symbols: &SymbolTable) -> bool {
        self.declarations.len() > 1
            && self
                .declarations
                .iter()
                .all(|&d| symbols.decl(d).is_routine())
    }

    /// A tie between a generic and a non-generic routine goes to the
    /// non-generic one.
    pub(super) fn disambiguate_regular_over_implicit(&mut self, symbols: &SymbolTable) {
        if !self.all_routines(symbols) {
            return;
        }
        let regular: Vec<_> = self
            .declarations
            .iter()
            .copied()
            .filter(|&d| !symbols.decl(d).is_generic())
            .collect();
        if regular.len() == 1 {
            tracing::debug!("tie broken in favour of the non-generic routine");
            self.declarations = regular;
        }
    }

    /// Ties between routines go to those closest to the call site: free
    /// routines of the calling unit, or methods of the most specific
    /// declaring type.
    pub(super) fn disambiguate_distance_from_call_site(&mut self, cx: &ResolveCx<'_>) {
        let symbols = &*cx.symbols;
        if !self.all_routines(symbols) {
            return;
        }
        let declaring: Vec<Option<TypeId>> = self
            .declarations
            .iter()
            .map(|&d| symbols.decl(d).declaring_type())
            .collect();

        if declaring.iter().any(Option::is_none) {
            if self
                .declarations
                .iter()
                .any(|&d| symbols.decl(d).unit == cx.unit)
            {
                self.disambiguate_within_unit(symbols, cx.unit);
            }
            return;
        }

        let types = &*cx.types;
        let mut closest = None;
        for ty in declaring.into_iter().flatten() {
            match closest {
                Some(best) if !types.is_more_specific(ty, best) => {}
                _ => closest = Some(ty),
            }
        }
        if let Some(closest) = closest {
            self.declarations.retain(|&d| {
                symbols
                    .decl(d)
                    .declaring_type()
                    .is_some_and(|ty| types.is_same(ty, closest))
            });
        }
    }

    /// Routine implementations: keep the declaration whose parameter types
    /// are exactly the implementation's.
    pub(super) fn disambiguate_parameters(
        &mut self,
        cx: &ResolveCx<'_>,
        parameter_types: &[TypeId],
    ) {
        let symbols = &*cx.symbols;
        let types = &*cx.types;
        self.disambiguate_invocable(symbols);
        self.disambiguate_arity(symbols, parameter_types.len());
        self.declarations.retain(|&d| {
            let params = symbols.decl(d).params();
            params.len() == parameter_types.len()
                && params
                    .iter()
                    .zip(parameter_types)
                    .all(|(param, &written)| same_signature_type(types, param.ty, written))
        });
    }

    pub(super) fn disambiguate_return_type(&mut self, cx: &ResolveCx<'_>, return_type: TypeId) {
        if return_type.is_unknown() {
            return;
        }
        let symbols = &*cx.symbols;
        let types = &*cx.types;
        self.disambiguate_invocable(symbols);
        self.declarations.retain(|&d| {
            let declared = symbols.decl(d).return_spec().declared();
            same_signature_type(types, declared, return_type)
        });
    }

    pub(super) fn disambiguate_is_class_invocable(
        &mut self,
        symbols: &SymbolTable,
        is_class: bool,
    ) {
        self.disambiguate_invocable(symbols);
        self.declarations
            .retain(|&d| symbols.decl(d).is_class_invocable() == is_class);
    }

    /// A routine name used as a value of a procedural type: pick the
    /// routine whose signature fits the procedural type best. The last
    /// routine wins between equal fits.
    pub(crate) fn disambiguate_method_reference(&mut self, cx: &ResolveCx<'_>, procedural: TypeId) {
        let symbols = &*cx.symbols;
        self.disambiguate_invocable(symbols);
        self.disambiguate_is_callable(symbols);

        let comparer = TypeComparer::new(cx.types);
        let mut best_equality = EqualityType::Incompatible;
        let mut best = None;
        for &decl in &self.declarations {
            let Some(ty) = symbols.decl(decl).ty() else {
                continue;
            };
            let equality = comparer.compare(ty, procedural).equality;
            if equality != EqualityType::Incompatible && equality >= best_equality {
                best_equality = equality;
                best = Some(decl);
            }
        }

        self.declarations.clear();
        if let Some(best) = best {
            self.declarations.push(best);
            if let Some(name) = self.names.last_mut() {
                name.method_reference = true;
            }
        }
    }

    /// `@Routine` with nothing to match against takes the first routine.
    pub(crate) fn disambiguate_address_of(&mut self, symbols: &SymbolTable) {
        self.disambiguate_invocable(symbols);
        self.disambiguate_is_callable(symbols);
        if let Some(&first) = self.declarations.first() {
            self.declarations = vec![first];
            if let Some(name) = self.names.last_mut() {
                name.method_reference = true;
            }
        }
    }
}
