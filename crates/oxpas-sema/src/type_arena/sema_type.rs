// type_arena/sema_type.rs
//
// SemaType: the canonical type representation and its payload structs.

use oxpas_identity::{ScopeId, UnitId};
use smallvec::SmallVec;

use super::type_id::{TypeId, TypeIdVec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    ShortInt,
    SmallInt,
    Integer,
    Int64,
    Byte,
    Word,
    Cardinal,
    UInt64,
    /// Anonymous `0..32767` produced by literals.
    UInt15,
    /// Anonymous `0..2147483647` produced by literals.
    UInt31,
    NativeInt,
    NativeUInt,
}

impl IntegerKind {
    pub fn name(self) -> &'static str {
        match self {
            IntegerKind::ShortInt => "ShortInt",
            IntegerKind::SmallInt => "SmallInt",
            IntegerKind::Integer => "Integer",
            IntegerKind::Int64 => "Int64",
            IntegerKind::Byte => "Byte",
            IntegerKind::Word => "Word",
            IntegerKind::Cardinal => "Cardinal",
            IntegerKind::UInt64 => "UInt64",
            IntegerKind::UInt15 => "<UInt15>",
            IntegerKind::UInt31 => "<UInt31>",
            IntegerKind::NativeInt => "NativeInt",
            IntegerKind::NativeUInt => "NativeUInt",
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntegerKind::ShortInt
                | IntegerKind::SmallInt
                | IntegerKind::Integer
                | IntegerKind::Int64
                | IntegerKind::NativeInt
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntegerType {
    pub kind: IntegerKind,
    pub size: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealKind {
    Single,
    Double,
    Extended,
    Currency,
    Comp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RealType {
    pub kind: RealKind,
    pub size: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanKind {
    Boolean,
    ByteBool,
    WordBool,
    LongBool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharKind {
    Ansi,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Ansi,
    Unicode,
    Short,
    Wide,
}

impl StringKind {
    /// The char type produced by indexing a string of this kind.
    pub fn char_type(self) -> TypeId {
        match self {
            StringKind::Ansi | StringKind::Short => TypeId::ANSICHAR,
            StringKind::Unicode | StringKind::Wide => TypeId::WIDECHAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    AnyOrdinal,
    AnySet,
    PointerMathOperand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructKind {
    Class,
    Record,
    Object,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructType {
    pub kind: StructKind,
    pub name: String,
    pub unit: UnitId,
    pub scope: ScopeId,
    pub super_type: Option<TypeId>,
    pub interfaces: TypeIdVec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelperKind {
    Class,
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HelperType {
    pub kind: HelperKind,
    pub name: String,
    pub unit: UnitId,
    pub scope: ScopeId,
    /// The type whose member set this helper extends.
    pub extended: TypeId,
    /// Helpers may inherit from other helpers.
    pub super_type: Option<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayKind {
    Static,
    Dynamic,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    pub kind: ArrayKind,
    pub element: TypeId,
    /// Named array types (`TBytes = array of Byte`) are distinct from the
    /// anonymous `array of Byte`.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointerType {
    pub target: TypeId,
    /// `{$POINTERMATH ON}` pointers (and the PChar family) allow arithmetic.
    pub math: bool,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamMode {
    Value,
    Const,
    Var,
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamType {
    pub ty: TypeId,
    pub mode: ParamMode,
    pub has_default: bool,
}

impl ParamType {
    pub fn value(ty: TypeId) -> Self {
        Self {
            ty,
            mode: ParamMode::Value,
            has_default: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProceduralKind {
    /// `procedure(..)` / `function(..): T` pointer types.
    Procedure,
    /// `procedure(..) of object`.
    Method,
    /// `reference to procedure(..)`.
    Reference,
    /// The signature of a declared routine.
    Routine,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProceduralType {
    pub kind: ProceduralKind,
    pub params: SmallVec<[ParamType; 4]>,
    pub ret: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParamType {
    pub name: String,
    pub constraints: TypeIdVec,
    /// Distinguishes same-named parameters of different generic declarations.
    pub serial: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AliasType {
    pub name: String,
    pub target: TypeId,
    /// `type A = B` is weak (A *is* B); `type A = type B` is a distinct type.
    pub weak: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub unit: UnitId,
    pub serial: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForwardType {
    pub name: String,
    pub unit: UnitId,
    pub serial: u32,
}

/// The canonical type representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SemaType {
    Unknown,
    Void,
    /// Untyped parameters (`const X`) and untyped pointers' targets.
    Untyped,
    Nil,

    Integer(IntegerType),
    Real(RealType),
    Boolean(BooleanKind),
    Char(CharKind),
    String(StringKind),
    Variant,
    Enumeration(EnumType),

    Set(TypeId),
    Array(ArrayType),
    /// `[a, b, c]` before it is known whether it builds a set or an array.
    ArrayConstructor(TypeIdVec),

    Pointer(PointerType),
    Procedural(ProceduralType),
    ClassReference(TypeId),

    Struct(StructType),
    Helper(HelperType),
    TypeParameter(TypeParamType),
    Alias(AliasType),
    Forward(ForwardType),

    Matcher(MatcherKind),
}
