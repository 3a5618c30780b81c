// type_arena/relations.rs
//
// Inheritance relations between struct, helper and class-reference types.

use super::arena::TypeArena;
use super::sema_type::*;
use super::type_id::TypeId;

const MAX_DEPTH: u32 = 64;

impl TypeArena {
    /// The single-inheritance parent of a struct or helper.
    pub fn super_type(&self, id: TypeId) -> Option<TypeId> {
        match self.get(self.skip_alias(id)) {
            SemaType::Struct(s) => s.super_type,
            SemaType::Helper(h) => h.super_type,
            _ => None,
        }
    }

    /// The type a helper extends.
    pub fn extended_type(&self, id: TypeId) -> Option<TypeId> {
        self.helper_type(id).map(|h| h.extended)
    }

    /// Strict, transitive subtyping over super types and implemented
    /// interfaces. Class references are compared by their classes.
    pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
        self.subtype_distance(sub, sup).is_some_and(|d| d > 0)
    }

    /// Inheritance hops from `sub` up to `sup`: 0 when they are the same
    /// type, None when unrelated.
    pub fn subtype_distance(&self, sub: TypeId, sup: TypeId) -> Option<u32> {
        let sub = self.canonical(sub);
        let sup = self.canonical(sup);
        if sub == sup {
            return Some(0);
        }
        if let (Some(a), Some(b)) = (self.class_of(sub), self.class_of(sup)) {
            return self.subtype_distance(a, b);
        }
        self.distance_up(sub, sup, 0)
    }

    fn distance_up(&self, current: TypeId, target: TypeId, depth: u32) -> Option<u32> {
        if depth > MAX_DEPTH {
            return None;
        }
        let current = self.canonical(current);
        if current == target {
            return Some(depth);
        }
        let (parent, interfaces) = match self.get(current) {
            SemaType::Struct(s) => (s.super_type, s.interfaces.as_slice()),
            SemaType::Helper(h) => (h.super_type, &[][..]),
            _ => return None,
        };
        let via_parent = parent.and_then(|p| self.distance_up(p, target, depth + 1));
        let via_interfaces = interfaces
            .iter()
            .filter_map(|&i| self.distance_up(i, target, depth + 1))
            .min();
        match (via_parent, via_interfaces) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// True when `helper` extends `target`, directly or through one of
    /// `target`'s ancestors.
    pub fn is_helper_of(&self, helper: TypeId, target: TypeId) -> bool {
        match self.extended_type(helper) {
            Some(extended) => self.subtype_distance(target, extended).is_some(),
            None => false,
        }
    }

    /// Declaring-type specificity for overload tie-breaks: `a` is more
    /// specific than `b` if it descends from `b`, where a helper sits one step
    /// below the type it extends.
    pub fn is_more_specific(&self, a: TypeId, b: TypeId) -> bool {
        if self.is_same(a, b) {
            return false;
        }
        if self.is_subtype_of(a, b) {
            return true;
        }
        if let Some(extended) = self.extended_type(a)
            && self.subtype_distance(extended, b).is_some()
        {
            return true;
        }
        if let Some(extended) = self.extended_type(b) {
            return self.is_subtype_of(a, extended);
        }
        false
    }
}
