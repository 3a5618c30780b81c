// invocation/candidate.rs
//
// An invocable being evaluated against one concrete argument list.

use oxpas_identity::DeclId;
use smallvec::SmallVec;

use crate::symbols::Declaration;
use crate::type_arena::{ParamType, Substitutions, TypeArena, TypeId};

use super::equality::{EqualityType, ParamRank};

/// What a candidate would invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invocable {
    Declaration(DeclId),
    /// Index into a list of synthesized operator signatures.
    Intrinsic(usize),
}

impl Invocable {
    pub fn declaration(self) -> Option<DeclId> {
        match self {
            Invocable::Declaration(decl) => Some(decl),
            Invocable::Intrinsic(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InvocationCandidate {
    pub invocable: Invocable,
    pub params: SmallVec<[ParamType; 4]>,
    pub ret: TypeId,
    /// Type arguments were inferred from the arguments.
    pub implicitly_specialized: bool,
    /// One rank per supplied argument, filled in by the resolver.
    pub ranks: Vec<ParamRank>,
}

impl InvocationCandidate {
    pub fn new(
        invocable: Invocable,
        params: impl IntoIterator<Item = ParamType>,
        ret: TypeId,
    ) -> Self {
        Self {
            invocable,
            params: params.into_iter().collect(),
            ret,
            implicitly_specialized: false,
            ranks: Vec::new(),
        }
    }

    /// A candidate for a routine or array property. `explicit` holds the
    /// generic arguments written at the reference (on the routine or on its
    /// specialized declaring type); type parameters of a generic routine
    /// left open after that are inferred from the argument types.
    pub fn for_declaration(
        arena: &mut TypeArena,
        id: DeclId,
        decl: &Declaration,
        args: &[TypeId],
        explicit: Option<&Substitutions>,
    ) -> Self {
        let params = decl.params().iter().map(|p| ParamType {
            ty: p.ty,
            mode: p.mode,
            has_default: p.has_default,
        });
        let mut candidate = Self::new(
            Invocable::Declaration(id),
            params,
            decl.return_spec().declared(),
        );
        if let Some(subs) = explicit {
            candidate.substitute(arena, subs);
        }
        if decl.is_generic() && candidate.mentions_type_parameter(arena) {
            let mut bindings = Substitutions::default();
            candidate.infer(arena, args, &mut bindings);
            if !bindings.is_empty() {
                candidate.substitute(arena, &bindings);
                candidate.implicitly_specialized = true;
            }
        }
        candidate
    }

    fn mentions_type_parameter(&self, arena: &TypeArena) -> bool {
        self.params.iter().any(|p| arena.contains_type_parameter(p.ty))
            || arena.contains_type_parameter(self.ret)
    }

    /// Infer type arguments from the argument types. A routine passed
    /// where a value is expected contributes its return type.
    fn infer(&self, arena: &TypeArena, args: &[TypeId], bindings: &mut Substitutions) {
        for (param, &arg) in self.params.iter().zip(args) {
            let arg = if arena.is_procedural(param.ty) {
                arg
            } else {
                match arena.return_type(arg) {
                    Some(ret) if !ret.is_void() => ret,
                    _ => arg,
                }
            };
            arena.infer_bindings(param.ty, arg, bindings);
        }
    }

    fn substitute(&mut self, arena: &mut TypeArena, subs: &Substitutions) {
        for param in self.params.iter_mut() {
            param.ty = arena.substitute(param.ty, subs);
        }
        self.ret = arena.substitute(self.ret, subs);
    }

    pub fn is_compatible(&self) -> bool {
        self.ranks.iter().all(|rank| rank.is_compatible())
    }

    /// True if this candidate is at least as good on every argument and
    /// strictly better on one.
    pub fn dominates(&self, other: &InvocationCandidate) -> bool {
        let mut strictly_better = false;
        for (mine, theirs) in self.ranks.iter().zip(&other.ranks) {
            if mine < theirs {
                return false;
            }
            if mine > theirs {
                strictly_better = true;
            }
        }
        strictly_better
    }

    /// Aggregate key for breaking ties between non-dominated candidates:
    /// fewer conversions, then less total distance, then more exact matches.
    /// Smaller is better.
    pub(super) fn tie_key(&self) -> (usize, u32, isize) {
        let converts = self
            .ranks
            .iter()
            .filter(|r| r.equality == EqualityType::Convert)
            .count();
        let distance = self.ranks.iter().map(|r| r.distance).sum();
        let exact = self
            .ranks
            .iter()
            .filter(|r| r.equality == EqualityType::Exact)
            .count();
        (converts, distance, -(exact as isize))
    }
}
