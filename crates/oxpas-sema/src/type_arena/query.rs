// type_arena/query.rs
//
// TypeArena query methods: alias skipping, predicates, unwrap helpers and size.

use oxpas_identity::ScopeId;

use super::arena::TypeArena;
use super::sema_type::*;
use super::type_id::TypeId;

/// Alias and pointer chains longer than this are treated as cyclic garbage.
const MAX_CHAIN: usize = 64;

impl TypeArena {
    // ========================================================================
    // Aliases
    // ========================================================================

    /// Follow every alias (weak or strong) to the underlying type.
    pub fn skip_alias(&self, mut id: TypeId) -> TypeId {
        for _ in 0..MAX_CHAIN {
            id = self.completed(id);
            match self.get(id) {
                SemaType::Alias(alias) => id = alias.target,
                _ => return id,
            }
        }
        id
    }

    /// Follow only weak aliases: a weak alias names the same type.
    pub fn skip_weak_alias(&self, mut id: TypeId) -> TypeId {
        for _ in 0..MAX_CHAIN {
            id = self.completed(id);
            match self.get(id) {
                SemaType::Alias(alias) if alias.weak => id = alias.target,
                _ => return id,
            }
        }
        id
    }

    pub fn native_int_is_weak_alias(&self) -> bool {
        self.native_int_weak_alias
    }

    pub fn pointer_size(&self) -> u8 {
        self.pointer_size
    }

    pub fn is_weak_alias(&self, id: TypeId) -> bool {
        match self.get(id) {
            SemaType::Alias(alias) => alias.weak,
            SemaType::Integer(IntegerType {
                kind: IntegerKind::NativeInt | IntegerKind::NativeUInt,
                ..
            }) => self.native_int_weak_alias,
            _ => false,
        }
    }

    /// The identity used by `is`: weak aliases collapse onto their target, and
    /// a weakly-aliased NativeInt collapses onto the fixed-width integer of
    /// the same size.
    pub fn canonical(&self, id: TypeId) -> TypeId {
        let id = self.skip_weak_alias(id);
        if !self.native_int_weak_alias {
            return id;
        }
        let wide = self.pointer_size >= 8;
        match id {
            TypeId::NATIVEINT if wide => TypeId::INT64,
            TypeId::NATIVEINT => TypeId::INTEGER,
            TypeId::NATIVEUINT if wide => TypeId::UINT64,
            TypeId::NATIVEUINT => TypeId::CARDINAL,
            _ => id,
        }
    }

    /// Type identity (`A is B`).
    pub fn is_same(&self, a: TypeId, b: TypeId) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    // ========================================================================
    // Predicates (all look through aliases)
    // ========================================================================

    fn underlying(&self, id: TypeId) -> &SemaType {
        self.get(self.skip_alias(id))
    }

    pub fn is_integer(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Integer(_))
    }

    pub fn is_real(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Real(_))
    }

    pub fn is_numeric(&self, id: TypeId) -> bool {
        self.is_integer(id) || self.is_real(id)
    }

    pub fn is_boolean(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Boolean(_))
    }

    pub fn is_char(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Char(_))
    }

    pub fn is_string(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::String(_))
    }

    pub fn is_enumeration(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Enumeration(_))
    }

    pub fn is_ordinal(&self, id: TypeId) -> bool {
        matches!(
            self.underlying(id),
            SemaType::Integer(_)
                | SemaType::Boolean(_)
                | SemaType::Char(_)
                | SemaType::Enumeration(_)
        )
    }

    pub fn is_variant(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Variant)
    }

    pub fn is_set(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Set(_))
    }

    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Array(_))
    }

    pub fn is_dynamic_array(&self, id: TypeId) -> bool {
        matches!(
            self.underlying(id),
            SemaType::Array(ArrayType {
                kind: ArrayKind::Dynamic,
                ..
            })
        )
    }

    pub fn is_array_constructor(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::ArrayConstructor(_))
    }

    pub fn is_pointer(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Pointer(_))
    }

    /// Pointer types that allow `+`/`-` arithmetic.
    pub fn allows_pointer_math(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Pointer(PointerType { math: true, .. }))
    }

    pub fn is_procedural(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Procedural(_))
    }

    pub fn is_class_reference(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::ClassReference(_))
    }

    pub fn is_struct(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Struct(_))
    }

    pub fn is_struct_kind(&self, id: TypeId, kind: StructKind) -> bool {
        matches!(self.underlying(id), SemaType::Struct(s) if s.kind == kind)
    }

    pub fn is_class(&self, id: TypeId) -> bool {
        self.is_struct_kind(id, StructKind::Class)
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        self.is_struct_kind(id, StructKind::Interface)
    }

    pub fn is_helper(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::Helper(_))
    }

    pub fn is_type_parameter(&self, id: TypeId) -> bool {
        matches!(self.underlying(id), SemaType::TypeParameter(_))
    }

    pub fn is_forward(&self, id: TypeId) -> bool {
        matches!(self.get(id), SemaType::Forward(_))
    }

    /// Types that `nil` converts to.
    pub fn is_nilable(&self, id: TypeId) -> bool {
        match self.underlying(id) {
            SemaType::Pointer(_)
            | SemaType::ClassReference(_)
            | SemaType::Procedural(_)
            | SemaType::String(_)
            | SemaType::Nil
            | SemaType::Variant => true,
            SemaType::Array(array) => array.kind == ArrayKind::Dynamic,
            SemaType::Struct(s) => matches!(s.kind, StructKind::Class | StructKind::Interface),
            _ => false,
        }
    }

    // ========================================================================
    // Unwrap helpers
    // ========================================================================

    pub fn integer_type(&self, id: TypeId) -> Option<IntegerType> {
        match self.underlying(id) {
            SemaType::Integer(int) => Some(*int),
            _ => None,
        }
    }

    pub fn struct_type(&self, id: TypeId) -> Option<&StructType> {
        match self.underlying(id) {
            SemaType::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn helper_type(&self, id: TypeId) -> Option<&HelperType> {
        match self.underlying(id) {
            SemaType::Helper(h) => Some(h),
            _ => None,
        }
    }

    pub fn procedural_type(&self, id: TypeId) -> Option<&ProceduralType> {
        match self.underlying(id) {
            SemaType::Procedural(p) => Some(p),
            _ => None,
        }
    }

    pub fn type_parameter(&self, id: TypeId) -> Option<&TypeParamType> {
        match self.underlying(id) {
            SemaType::TypeParameter(p) => Some(p),
            _ => None,
        }
    }

    /// Return type of a procedural type.
    pub fn return_type(&self, id: TypeId) -> Option<TypeId> {
        self.procedural_type(id).map(|p| p.ret)
    }

    pub fn pointer_target(&self, id: TypeId) -> Option<TypeId> {
        match self.underlying(id) {
            SemaType::Pointer(p) => Some(p.target),
            _ => None,
        }
    }

    /// Element type of arrays and sets.
    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.underlying(id) {
            SemaType::Array(array) => Some(array.element),
            SemaType::Set(element) => Some(*element),
            _ => None,
        }
    }

    /// The instance type of a class reference.
    pub fn class_of(&self, id: TypeId) -> Option<TypeId> {
        match self.underlying(id) {
            SemaType::ClassReference(class) => Some(*class),
            _ => None,
        }
    }

    pub fn constraints(&self, id: TypeId) -> &[TypeId] {
        match self.underlying(id) {
            SemaType::TypeParameter(p) => &p.constraints,
            _ => &[],
        }
    }

    /// The scope owned by a struct or helper type.
    pub fn type_scope(&self, id: TypeId) -> Option<ScopeId> {
        match self.underlying(id) {
            SemaType::Struct(s) => Some(s.scope),
            SemaType::Helper(h) => Some(h.scope),
            _ => None,
        }
    }

    /// Unwrap pointers, procedural return types and class references until a
    /// type owning a scope is found.
    pub fn extract_scoped_type(&self, mut id: TypeId) -> Option<TypeId> {
        for _ in 0..MAX_CHAIN {
            id = self.skip_alias(id);
            match self.get(id) {
                SemaType::Struct(_) | SemaType::Helper(_) => return Some(id),
                SemaType::Pointer(p) => id = p.target,
                SemaType::Procedural(p) if !p.ret.is_void() => id = p.ret,
                SemaType::ClassReference(class) => id = *class,
                _ => return None,
            }
        }
        None
    }

    /// The widest of a list of types by size; the first wins ties.
    /// Void for an empty list.
    pub fn widest_type(&self, types: &[TypeId]) -> TypeId {
        let mut widest = TypeId::VOID;
        let mut widest_size = 0;
        for &ty in types {
            let size = self.size_of(ty);
            if widest.is_void() || size > widest_size {
                widest = ty;
                widest_size = size;
            }
        }
        widest
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Byte size as used by numeric promotion.
    pub fn size_of(&self, id: TypeId) -> u32 {
        let ptr = self.pointer_size as u32;
        match self.underlying(id) {
            SemaType::Integer(int) => int.size as u32,
            SemaType::Real(real) => real.size as u32,
            SemaType::Boolean(BooleanKind::Boolean | BooleanKind::ByteBool) => 1,
            SemaType::Boolean(BooleanKind::WordBool) => 2,
            SemaType::Boolean(BooleanKind::LongBool) => 4,
            SemaType::Char(CharKind::Ansi) => 1,
            SemaType::Char(CharKind::Wide) => 2,
            SemaType::String(StringKind::Short) => 256,
            SemaType::String(_) => ptr,
            SemaType::Variant => if ptr >= 8 { 24 } else { 16 },
            SemaType::Enumeration(_) => 1,
            SemaType::Set(_) => 32,
            SemaType::Procedural(p) if p.kind == ProceduralKind::Method => ptr * 2,
            SemaType::Pointer(_)
            | SemaType::Procedural(_)
            | SemaType::ClassReference(_)
            | SemaType::Array(_)
            | SemaType::Nil => ptr,
            SemaType::Struct(s) if s.kind != StructKind::Record => ptr,
            _ => 0,
        }
    }
}
