// invocation/compare.rs
//
// Ranks an argument type against a parameter type.

use crate::numeric_model::{IntegerConversion, integer_conversion, real_widening};
use crate::type_arena::{
    ArrayKind, MatcherKind, ParamMode, ParamType, SemaType, TypeArena, TypeId,
};

use super::equality::{EqualityType, ParamRank};

pub struct TypeComparer<'a> {
    arena: &'a TypeArena,
}

impl<'a> TypeComparer<'a> {
    pub fn new(arena: &'a TypeArena) -> Self {
        Self { arena }
    }

    /// Rank an argument against a formal parameter, honouring `var`/`out`
    /// modes, which accept only identical types.
    pub fn compare_param(&self, arg: TypeId, param: &ParamType) -> ParamRank {
        let rank = self.compare(arg, param.ty);
        let by_reference = matches!(param.mode, ParamMode::Var | ParamMode::Out);
        if by_reference && !param.ty.is_untyped() && rank.equality < EqualityType::Equal {
            return ParamRank::INCOMPATIBLE;
        }
        rank
    }

    pub fn compare(&self, arg: TypeId, param: TypeId) -> ParamRank {
        let arena = self.arena;
        if arg == param {
            return ParamRank::EXACT;
        }
        if arg.is_unknown() || param.is_unknown() || param.is_untyped() {
            return ParamRank::convert(0);
        }
        if arena.is_same(arg, param) {
            return ParamRank::EQUAL;
        }
        if let SemaType::Matcher(matcher) = arena.get(param) {
            return self.compare_matcher(arg, *matcher);
        }

        // A routine or procedural value passed where a value is expected is
        // invoked
        if !arena.is_procedural(param)
            && let Some(ret) = arena.return_type(arg)
            && !ret.is_void()
        {
            return self.compare(ret, param);
        }

        let arg_base = arena.skip_alias(arg);
        let param_base = arena.skip_alias(param);
        if arg_base != arg || param_base != param {
            // Strong aliases convert to and from their base type
            let rank = self.compare(arg_base, param_base);
            return match rank.equality {
                EqualityType::Exact | EqualityType::Equal => ParamRank::widening(0),
                _ => rank,
            };
        }

        match (arena.get(arg), arena.get(param)) {
            (SemaType::Variant, _) | (_, SemaType::Variant) => ParamRank::convert(1),
            (SemaType::Integer(from), SemaType::Integer(to)) => {
                match integer_conversion(*from, *to) {
                    IntegerConversion::Identity => ParamRank::EQUAL,
                    IntegerConversion::Widen { distance } => ParamRank::widening(distance),
                    IntegerConversion::Narrow { distance } => ParamRank::convert(distance),
                }
            }
            (SemaType::Integer(from), SemaType::Real(_)) => ParamRank::convert(from.size as u32),
            (SemaType::Real(from), SemaType::Real(to)) => match real_widening(*from, *to) {
                Some(distance) => ParamRank::widening(distance),
                None => ParamRank::convert(u32::from(from.size.abs_diff(to.size))),
            },
            (SemaType::Boolean(_), SemaType::Boolean(_)) => ParamRank::convert(1),
            (SemaType::Char(_), SemaType::Char(_)) => ParamRank::convert(1),
            (SemaType::Char(_), SemaType::String(_)) => ParamRank::convert(2),
            (SemaType::String(_), SemaType::String(_)) => ParamRank::convert(1),
            (SemaType::String(_), SemaType::Pointer(p)) if p.math => ParamRank::convert(3),
            (SemaType::Nil, _) if arena.is_nilable(param) => ParamRank::convert(0),
            (SemaType::Struct(_), SemaType::Struct(_))
            | (SemaType::ClassReference(_), SemaType::ClassReference(_)) => {
                self.compare_inheritance(arg, param)
            }
            (SemaType::Pointer(a), SemaType::Pointer(p)) => {
                if a.target.is_untyped() || p.target.is_untyped() {
                    ParamRank::convert(1)
                } else if arena.is_same(a.target, p.target) {
                    ParamRank::EQUAL
                } else {
                    ParamRank::INCOMPATIBLE
                }
            }
            (SemaType::Procedural(_), SemaType::Procedural(_)) => {
                self.compare_procedural(arg, param)
            }
            (SemaType::Set(a), SemaType::Set(p)) => self.compare_elements(&[*a], *p),
            (SemaType::ArrayConstructor(elements), SemaType::Set(p)) => {
                self.compare_elements(elements, *p)
            }
            (SemaType::ArrayConstructor(elements), SemaType::Array(array))
                if array.kind != ArrayKind::Static =>
            {
                self.compare_elements(elements, array.element)
            }
            (SemaType::Array(a), SemaType::Array(p)) if p.kind == ArrayKind::Open => {
                if arena.is_same(a.element, p.element) {
                    ParamRank::EQUAL
                } else {
                    ParamRank::INCOMPATIBLE
                }
            }
            (_, SemaType::TypeParameter(_)) | (SemaType::TypeParameter(_), _) => {
                ParamRank::convert(0)
            }
            _ => ParamRank::INCOMPATIBLE,
        }
    }

    fn compare_matcher(&self, arg: TypeId, matcher: MatcherKind) -> ParamRank {
        let arena = self.arena;
        let matched = match matcher {
            MatcherKind::AnyOrdinal => arena.is_ordinal(arg),
            MatcherKind::AnySet => arena.is_set(arg) || arena.is_array_constructor(arg),
            MatcherKind::PointerMathOperand => arena.is_pointer(arg) || arg.is_nil(),
        };
        if matched {
            ParamRank::EQUAL
        } else {
            ParamRank::INCOMPATIBLE
        }
    }

    /// Upcasts rank by inheritance distance. Downcasts are accepted as
    /// conversions so that siblings sharing an ancestor tie.
    fn compare_inheritance(&self, arg: TypeId, param: TypeId) -> ParamRank {
        if let Some(distance) = self.arena.subtype_distance(arg, param) {
            return ParamRank::subtype(distance);
        }
        if self.arena.subtype_distance(param, arg).is_some() {
            return ParamRank::convert(0);
        }
        ParamRank::INCOMPATIBLE
    }

    /// Procedural types match structurally, regardless of their kind.
    fn compare_procedural(&self, arg: TypeId, param: TypeId) -> ParamRank {
        let (Some(a), Some(p)) = (
            self.arena.procedural_type(arg),
            self.arena.procedural_type(param),
        ) else {
            return ParamRank::INCOMPATIBLE;
        };
        let same_shape = a.params.len() == p.params.len()
            && a
                .params
                .iter()
                .zip(&p.params)
                .all(|(x, y)| x.mode == y.mode && self.arena.is_same(x.ty, y.ty))
            && self.arena.is_same(a.ret, p.ret);
        if same_shape {
            ParamRank::EQUAL
        } else {
            ParamRank::INCOMPATIBLE
        }
    }

    /// The worst element rank, capped at Equal.
    fn compare_elements(&self, elements: &[TypeId], target: TypeId) -> ParamRank {
        elements
            .iter()
            .map(|&element| self.compare(element, target))
            .min()
            .map(|rank| rank.min(ParamRank::EQUAL))
            .unwrap_or(ParamRank::EQUAL)
    }
}
