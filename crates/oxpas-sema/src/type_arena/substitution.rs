// type_arena/substitution.rs
//
// Generic substitution and type-argument inference.

use rustc_hash::FxHashMap;

use super::arena::TypeArena;
use super::sema_type::*;
use super::type_id::{TypeId, TypeIdVec};

/// Type parameter -> concrete type.
pub type Substitutions = FxHashMap<TypeId, TypeId>;

impl TypeArena {
    /// Replace type parameters with concrete types.
    ///
    /// Nominal types are left alone; only the structural wrappers around a
    /// parameter (arrays, sets, pointers, procedural and class-reference types)
    /// are rebuilt.
    pub fn substitute(&mut self, ty: TypeId, subs: &Substitutions) -> TypeId {
        if subs.is_empty() {
            return ty;
        }
        if let Some(&concrete) = subs.get(&ty) {
            return concrete;
        }

        // Clone the type to release the borrow
        match self.get(ty).clone() {
            SemaType::Array(ArrayType {
                kind,
                element,
                name: None,
            }) => {
                let element = self.substitute(element, subs);
                self.array_of(kind, element)
            }
            SemaType::Set(element) => {
                let element = self.substitute(element, subs);
                self.set_of(element)
            }
            SemaType::Pointer(PointerType {
                target,
                math,
                name: None,
            }) => {
                let target = self.substitute(target, subs);
                if math {
                    self.math_pointer_to(target)
                } else {
                    self.pointer_to(target)
                }
            }
            SemaType::ClassReference(class) => {
                let class = self.substitute(class, subs);
                self.class_reference(class)
            }
            SemaType::Procedural(proc_type) => {
                let params: Vec<ParamType> = proc_type
                    .params
                    .iter()
                    .map(|p| ParamType {
                        ty: self.substitute(p.ty, subs),
                        ..*p
                    })
                    .collect();
                let ret = self.substitute(proc_type.ret, subs);
                self.procedural(proc_type.kind, params, ret)
            }
            SemaType::ArrayConstructor(elements) => {
                let elements: TypeIdVec =
                    elements.iter().map(|&e| self.substitute(e, subs)).collect();
                self.array_constructor(elements)
            }
            _ => ty,
        }
    }

    /// True if the type mentions a type parameter anywhere in its structure.
    pub fn contains_type_parameter(&self, ty: TypeId) -> bool {
        match self.get(ty) {
            SemaType::TypeParameter(_) => true,
            SemaType::Array(array) => self.contains_type_parameter(array.element),
            SemaType::Set(element) => self.contains_type_parameter(*element),
            SemaType::Pointer(p) => p.name.is_none() && self.contains_type_parameter(p.target),
            SemaType::ClassReference(class) => self.contains_type_parameter(*class),
            SemaType::Procedural(p) => {
                p.params.iter().any(|param| self.contains_type_parameter(param.ty))
                    || self.contains_type_parameter(p.ret)
            }
            _ => false,
        }
    }

    /// Infer type-parameter bindings by matching a parameter type pattern
    /// against an argument type. The first binding of a parameter wins.
    pub fn infer_bindings(&self, pattern: TypeId, arg: TypeId, bindings: &mut Substitutions) {
        if arg.is_unknown() {
            return;
        }
        let arg = self.skip_weak_alias(arg);
        match self.get(pattern) {
            SemaType::TypeParameter(_) => {
                bindings.entry(pattern).or_insert(arg);
            }
            SemaType::Array(array) => match self.get(arg) {
                SemaType::Array(arg_array) => {
                    self.infer_bindings(array.element, arg_array.element, bindings)
                }
                SemaType::ArrayConstructor(elements) => {
                    let widest = self.widest_type(elements);
                    if !widest.is_void() {
                        self.infer_bindings(array.element, widest, bindings);
                    }
                }
                _ => {}
            },
            SemaType::Set(element) => {
                if let SemaType::Set(arg_element) = self.get(arg) {
                    self.infer_bindings(*element, *arg_element, bindings);
                }
            }
            SemaType::Pointer(p) => {
                if let SemaType::Pointer(arg_p) = self.get(arg) {
                    self.infer_bindings(p.target, arg_p.target, bindings);
                }
            }
            SemaType::ClassReference(class) => {
                if let SemaType::ClassReference(arg_class) = self.get(arg) {
                    self.infer_bindings(*class, *arg_class, bindings);
                }
            }
            SemaType::Procedural(p) => {
                if let SemaType::Procedural(arg_p) = self.get(arg)
                    && p.params.len() == arg_p.params.len()
                {
                    for (param, arg_param) in p.params.iter().zip(&arg_p.params) {
                        self.infer_bindings(param.ty, arg_param.ty, bindings);
                    }
                    self.infer_bindings(p.ret, arg_p.ret, bindings);
                }
            }
            _ => {}
        }
    }
}
