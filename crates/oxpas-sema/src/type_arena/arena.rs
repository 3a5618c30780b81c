// type_arena/arena.rs
//
// TypeArena: storage for every type of one compilation, with interning for
// structural types and plain allocation for nominal ones.

use oxpas_identity::{ScopeId, UnitId};
use rustc_hash::FxHashMap;

use crate::platform::Platform;

use super::sema_type::*;
use super::type_id::{TypeId, TypeIdVec};

#[derive(Debug, Clone)]
pub struct TypeArena {
    types: Vec<SemaType>,
    intern_map: FxHashMap<SemaType, TypeId>,
    /// Forward declarations back-patched with their completed type.
    completions: FxHashMap<TypeId, TypeId>,
    next_serial: u32,
    pub(super) pointer_size: u8,
    pub(super) native_int_weak_alias: bool,
}

impl TypeArena {
    pub fn new(platform: &Platform) -> Self {
        let mut arena = Self {
            types: Vec::with_capacity(256),
            intern_map: FxHashMap::default(),
            completions: FxHashMap::default(),
            next_serial: 0,
            pointer_size: platform.pointer_size,
            native_int_weak_alias: platform.native_int_weak_alias,
        };

        let int = |kind, size| SemaType::Integer(IntegerType { kind, size });
        let real = |kind, size| SemaType::Real(RealType { kind, size });
        let ptr = platform.pointer_size;

        // Order must match the reserved constants in type_id.rs
        let reserved = [
            SemaType::Unknown,
            SemaType::Void,
            SemaType::Untyped,
            SemaType::Nil,
            int(IntegerKind::ShortInt, 1),
            int(IntegerKind::SmallInt, 2),
            int(IntegerKind::Integer, 4),
            int(IntegerKind::Int64, 8),
            int(IntegerKind::Byte, 1),
            int(IntegerKind::Word, 2),
            int(IntegerKind::Cardinal, 4),
            int(IntegerKind::UInt64, 8),
            int(IntegerKind::UInt15, 2),
            int(IntegerKind::UInt31, 4),
            int(IntegerKind::NativeInt, ptr),
            int(IntegerKind::NativeUInt, ptr),
            real(RealKind::Single, 4),
            real(RealKind::Double, 8),
            real(RealKind::Extended, platform.extended_size),
            real(RealKind::Currency, 8),
            real(RealKind::Comp, 8),
            SemaType::Boolean(BooleanKind::Boolean),
            SemaType::Boolean(BooleanKind::ByteBool),
            SemaType::Boolean(BooleanKind::WordBool),
            SemaType::Boolean(BooleanKind::LongBool),
            SemaType::Char(CharKind::Ansi),
            SemaType::Char(CharKind::Wide),
            SemaType::String(StringKind::Ansi),
            SemaType::String(StringKind::Unicode),
            SemaType::String(StringKind::Short),
            SemaType::String(StringKind::Wide),
            SemaType::Variant,
            SemaType::Pointer(PointerType {
                target: TypeId::UNTYPED,
                math: false,
                name: Some("Pointer".to_string()),
            }),
            SemaType::Pointer(PointerType {
                target: TypeId::ANSICHAR,
                math: true,
                name: Some("PAnsiChar".to_string()),
            }),
            SemaType::Pointer(PointerType {
                target: TypeId::WIDECHAR,
                math: true,
                name: Some("PWideChar".to_string()),
            }),
            SemaType::Matcher(MatcherKind::AnyOrdinal),
            SemaType::Matcher(MatcherKind::AnySet),
            SemaType::Matcher(MatcherKind::PointerMathOperand),
        ];
        for ty in reserved {
            arena.intern(ty);
        }
        debug_assert_eq!(arena.types.len() as u32, TypeId::FIRST_DYNAMIC);
        arena
    }

    /// Intern a structural type, returning the existing id for an equal type.
    pub fn intern(&mut self, ty: SemaType) -> TypeId {
        let next_id = TypeId::from_raw(self.types.len() as u32);
        *self.intern_map.entry(ty.clone()).or_insert_with(|| {
            self.types.push(ty);
            next_id
        })
    }

    /// Allocate a nominal type. Never deduplicated: two classes with the same
    /// shape are still two classes.
    fn alloc(&mut self, ty: SemaType) -> TypeId {
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn next_serial(&mut self) -> u32 {
        self.next_serial += 1;
        self.next_serial
    }

    /// Get the type for an id, following forward completions.
    pub fn get(&self, id: TypeId) -> &SemaType {
        &self.types[self.completed(id).raw() as usize]
    }

    /// Follow forward-declaration completions to the final type id.
    pub fn completed(&self, mut id: TypeId) -> TypeId {
        while let Some(&next) = self.completions.get(&id) {
            id = next;
        }
        id
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    // ========================================================================
    // Structural constructors
    // ========================================================================

    pub fn pointer_to(&mut self, target: TypeId) -> TypeId {
        self.intern(SemaType::Pointer(PointerType {
            target,
            math: false,
            name: None,
        }))
    }

    /// A pointer type declared under `{$POINTERMATH ON}`.
    pub fn math_pointer_to(&mut self, target: TypeId) -> TypeId {
        self.intern(SemaType::Pointer(PointerType {
            target,
            math: true,
            name: None,
        }))
    }

    pub fn set_of(&mut self, element: TypeId) -> TypeId {
        self.intern(SemaType::Set(element))
    }

    pub fn array_of(&mut self, kind: ArrayKind, element: TypeId) -> TypeId {
        self.intern(SemaType::Array(ArrayType {
            kind,
            element,
            name: None,
        }))
    }

    pub fn dynamic_array(&mut self, element: TypeId) -> TypeId {
        self.array_of(ArrayKind::Dynamic, element)
    }

    pub fn open_array(&mut self, element: TypeId) -> TypeId {
        self.array_of(ArrayKind::Open, element)
    }

    pub fn array_constructor(&mut self, elements: TypeIdVec) -> TypeId {
        self.intern(SemaType::ArrayConstructor(elements))
    }

    pub fn procedural(
        &mut self,
        kind: ProceduralKind,
        params: impl IntoIterator<Item = ParamType>,
        ret: TypeId,
    ) -> TypeId {
        self.intern(SemaType::Procedural(ProceduralType {
            kind,
            params: params.into_iter().collect(),
            ret,
        }))
    }

    pub fn class_reference(&mut self, class: TypeId) -> TypeId {
        self.intern(SemaType::ClassReference(class))
    }

    // ========================================================================
    // Nominal constructors
    // ========================================================================

    /// A new class/record/interface. Its scope is attached once the type
    /// scope exists (see `set_scope`).
    pub fn new_struct(
        &mut self,
        kind: StructKind,
        name: &str,
        unit: UnitId,
        super_type: Option<TypeId>,
    ) -> TypeId {
        self.alloc(SemaType::Struct(StructType {
            kind,
            name: name.to_string(),
            unit,
            scope: ScopeId::new(0),
            super_type,
            interfaces: TypeIdVec::new(),
        }))
    }

    pub fn new_helper(
        &mut self,
        kind: HelperKind,
        name: &str,
        unit: UnitId,
        extended: TypeId,
        super_type: Option<TypeId>,
    ) -> TypeId {
        self.alloc(SemaType::Helper(HelperType {
            kind,
            name: name.to_string(),
            unit,
            scope: ScopeId::new(0),
            extended,
            super_type,
        }))
    }

    pub fn new_type_parameter(&mut self, name: &str, constraints: TypeIdVec) -> TypeId {
        let serial = self.next_serial();
        self.alloc(SemaType::TypeParameter(TypeParamType {
            name: name.to_string(),
            constraints,
            serial,
        }))
    }

    pub fn new_alias(&mut self, name: &str, target: TypeId, weak: bool) -> TypeId {
        self.alloc(SemaType::Alias(AliasType {
            name: name.to_string(),
            target,
            weak,
        }))
    }

    pub fn new_enumeration(&mut self, name: &str, unit: UnitId) -> TypeId {
        let serial = self.next_serial();
        self.alloc(SemaType::Enumeration(EnumType {
            name: name.to_string(),
            unit,
            serial,
        }))
    }

    /// A named array type, distinct from the anonymous array of the same shape.
    pub fn new_named_array(&mut self, name: &str, kind: ArrayKind, element: TypeId) -> TypeId {
        self.alloc(SemaType::Array(ArrayType {
            kind,
            element,
            name: Some(name.to_string()),
        }))
    }

    pub fn new_named_pointer(&mut self, name: &str, target: TypeId, math: bool) -> TypeId {
        self.alloc(SemaType::Pointer(PointerType {
            target,
            math,
            name: Some(name.to_string()),
        }))
    }

    pub fn new_forward(&mut self, name: &str, unit: UnitId) -> TypeId {
        let serial = self.next_serial();
        self.alloc(SemaType::Forward(ForwardType {
            name: name.to_string(),
            unit,
            serial,
        }))
    }

    // ========================================================================
    // Back-patching of nominal types
    // ========================================================================

    /// Attach the type scope to a struct or helper.
    pub fn set_scope(&mut self, id: TypeId, scope: ScopeId) {
        let id = self.completed(id);
        match &mut self.types[id.raw() as usize] {
            SemaType::Struct(s) => s.scope = scope,
            SemaType::Helper(h) => h.scope = scope,
            _ => {}
        }
    }

    pub fn set_super_type(&mut self, id: TypeId, super_type: Option<TypeId>) {
        let id = self.completed(id);
        match &mut self.types[id.raw() as usize] {
            SemaType::Struct(s) => s.super_type = super_type,
            SemaType::Helper(h) => h.super_type = super_type,
            _ => {}
        }
    }

    pub fn add_interface(&mut self, id: TypeId, interface: TypeId) {
        let id = self.completed(id);
        if let SemaType::Struct(s) = &mut self.types[id.raw() as usize] {
            s.interfaces.push(interface);
        }
    }

    pub fn set_constraints(&mut self, id: TypeId, constraints: TypeIdVec) {
        if let SemaType::TypeParameter(p) = &mut self.types[id.raw() as usize] {
            p.constraints = constraints;
        }
    }

    /// Back-patch a forward declaration with its completed type.
    ///
    /// Returns false if `forward` is not a forward type.
    pub fn complete_forward(&mut self, forward: TypeId, completed: TypeId) -> bool {
        let is_forward = matches!(self.types[forward.raw() as usize], SemaType::Forward(_));
        if !is_forward || forward == completed {
            return false;
        }
        self.completions.insert(forward, completed);
        true
    }

    /// The unit owning a nominal type, if it has one.
    pub fn owning_unit(&self, id: TypeId) -> Option<UnitId> {
        match &self.types[id.raw() as usize] {
            SemaType::Struct(s) => Some(s.unit),
            SemaType::Helper(h) => Some(h.unit),
            SemaType::Enumeration(e) => Some(e.unit),
            SemaType::Forward(f) => Some(f.unit),
            _ => None,
        }
    }
}
