// type_arena/type_id.rs
//
// TypeId: interned type handle with reserved constants for intrinsic types.

use smallvec::SmallVec;

/// Handle to a type in the TypeArena.
///
/// Intrinsic types live at fixed indices so they can be named without an
/// arena; everything else (structs, arrays, pointers, procedural types, ...)
/// is allocated past `FIRST_DYNAMIC`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    // ========================================================================
    // Reserved TypeIds for intrinsic and special types
    // These are guaranteed to be allocated at these indices by TypeArena::new()
    // ========================================================================

    // Special types (UNKNOWN must be 0)
    pub const UNKNOWN: TypeId = TypeId(0);
    pub const VOID: TypeId = TypeId(1);
    pub const UNTYPED: TypeId = TypeId(2);
    pub const NIL: TypeId = TypeId(3);

    // Signed integers
    pub const SHORTINT: TypeId = TypeId(4);
    pub const SMALLINT: TypeId = TypeId(5);
    pub const INTEGER: TypeId = TypeId(6);
    pub const INT64: TypeId = TypeId(7);

    // Unsigned integers
    pub const BYTE: TypeId = TypeId(8);
    pub const WORD: TypeId = TypeId(9);
    pub const CARDINAL: TypeId = TypeId(10);
    pub const UINT64: TypeId = TypeId(11);

    // Anonymous literal sub-ranges
    pub const UINT15: TypeId = TypeId(12);
    pub const UINT31: TypeId = TypeId(13);

    // Platform width
    pub const NATIVEINT: TypeId = TypeId(14);
    pub const NATIVEUINT: TypeId = TypeId(15);

    // Reals
    pub const SINGLE: TypeId = TypeId(16);
    pub const DOUBLE: TypeId = TypeId(17);
    pub const EXTENDED: TypeId = TypeId(18);
    pub const CURRENCY: TypeId = TypeId(19);
    pub const COMP: TypeId = TypeId(20);

    // Booleans
    pub const BOOLEAN: TypeId = TypeId(21);
    pub const BYTEBOOL: TypeId = TypeId(22);
    pub const WORDBOOL: TypeId = TypeId(23);
    pub const LONGBOOL: TypeId = TypeId(24);

    // Chars and strings
    pub const ANSICHAR: TypeId = TypeId(25);
    pub const WIDECHAR: TypeId = TypeId(26);
    pub const ANSISTRING: TypeId = TypeId(27);
    pub const UNICODESTRING: TypeId = TypeId(28);
    pub const SHORTSTRING: TypeId = TypeId(29);
    pub const WIDESTRING: TypeId = TypeId(30);

    pub const VARIANT: TypeId = TypeId(31);

    // Pointers
    pub const POINTER: TypeId = TypeId(32);
    pub const PANSICHAR: TypeId = TypeId(33);
    pub const PWIDECHAR: TypeId = TypeId(34);

    // Argument matchers used by intrinsic operator signatures
    pub const ANY_ORDINAL: TypeId = TypeId(35);
    pub const ANY_SET: TypeId = TypeId(36);
    pub const POINTER_MATH_OPERAND: TypeId = TypeId(37);

    /// First non-reserved TypeId index (for dynamic types)
    pub const FIRST_DYNAMIC: u32 = 38;

    /// The default string type (`string`).
    pub const STRING: TypeId = Self::UNICODESTRING;
    /// The default char type (`Char`).
    pub const CHAR: TypeId = Self::WIDECHAR;

    /// Get the raw index (for debugging)
    pub fn index(self) -> u32 {
        self.0
    }

    pub(super) fn from_raw(index: u32) -> Self {
        TypeId(index)
    }

    pub(super) fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    #[inline]
    pub fn is_void(self) -> bool {
        self == Self::VOID
    }

    #[inline]
    pub fn is_untyped(self) -> bool {
        self == Self::UNTYPED
    }

    #[inline]
    pub fn is_nil(self) -> bool {
        self == Self::NIL
    }

    /// Check if this is one of the argument matcher pseudo-types.
    #[inline]
    pub fn is_matcher(self) -> bool {
        matches!(
            self,
            Self::ANY_ORDINAL | Self::ANY_SET | Self::POINTER_MATH_OPERAND
        )
    }

    /// Check if this is a reserved intrinsic type (no arena needed)
    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

/// Inline storage for the short type lists of signatures.
pub type TypeIdVec = SmallVec<[TypeId; 4]>;
