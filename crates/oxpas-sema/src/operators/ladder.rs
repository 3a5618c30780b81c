// operators/ladder.rs
//
// Fixed integer signature ladders for binary and unary integer operators.

use crate::type_arena::TypeId;

/// Every integer type the ladder covers, narrowest first within each
/// signedness.
pub(super) const LADDER_TYPES: [TypeId; 10] = [
    TypeId::SHORTINT,
    TypeId::SMALLINT,
    TypeId::INTEGER,
    TypeId::INT64,
    TypeId::BYTE,
    TypeId::UINT15,
    TypeId::WORD,
    TypeId::UINT31,
    TypeId::CARDINAL,
    TypeId::UINT64,
];

/// (narrow, wide) neighbours. Each yields (narrow, wide) -> wide and
/// (wide, narrow) -> wide.
pub(super) const ADJACENT: [(TypeId, TypeId); 8] = [
    (TypeId::SHORTINT, TypeId::SMALLINT),
    (TypeId::SMALLINT, TypeId::INTEGER),
    (TypeId::INTEGER, TypeId::INT64),
    (TypeId::BYTE, TypeId::UINT15),
    (TypeId::UINT15, TypeId::WORD),
    (TypeId::WORD, TypeId::UINT31),
    (TypeId::UINT31, TypeId::CARDINAL),
    (TypeId::CARDINAL, TypeId::UINT64),
];

/// Same-width signed/unsigned pairs and the type arithmetic promotes them to.
pub(super) const MIXED_SIGN: [(TypeId, TypeId, TypeId); 4] = [
    (TypeId::SHORTINT, TypeId::BYTE, TypeId::SMALLINT),
    (TypeId::SMALLINT, TypeId::WORD, TypeId::INTEGER),
    (TypeId::INTEGER, TypeId::CARDINAL, TypeId::INT64),
    (TypeId::INT64, TypeId::UINT64, TypeId::UINT64),
];

/// Which operator family a ladder is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LadderKind {
    Arithmetic,
    /// Bitwise results keep the operand width, so mixed signs yield the
    /// unsigned type.
    Bitwise,
}

/// `(left, right) -> result` for arithmetic and bitwise integer operators.
pub(super) fn binary_ladder(kind: LadderKind) -> impl Iterator<Item = (TypeId, TypeId, TypeId)> {
    let same = LADDER_TYPES.into_iter().map(|t| (t, t, t));
    let adjacent = ADJACENT
        .into_iter()
        .flat_map(|(narrow, wide)| [(narrow, wide, wide), (wide, narrow, wide)]);
    let mixed = MIXED_SIGN.into_iter().flat_map(move |(signed, unsigned, promoted)| {
        let result = match kind {
            LadderKind::Arithmetic => promoted,
            LadderKind::Bitwise => unsigned,
        };
        [(signed, unsigned, result), (unsigned, signed, result)]
    });
    same.chain(adjacent).chain(mixed)
}

/// `(value, Integer) -> value` for shifts.
pub(super) const SHIFT_LADDER: [TypeId; 5] = [
    TypeId::INTEGER,
    TypeId::CARDINAL,
    TypeId::UINT31,
    TypeId::INT64,
    TypeId::UINT64,
];

/// Unary minus on operands of at most four bytes.
pub(super) const NEGATE_LADDER: [(TypeId, TypeId); 2] = [
    (TypeId::INTEGER, TypeId::INTEGER),
    (TypeId::CARDINAL, TypeId::INT64),
];

/// Unary plus on operands of at most four bytes.
pub(super) const POSITIVE_LADDER: [(TypeId, TypeId); 2] = [
    (TypeId::INTEGER, TypeId::INTEGER),
    (TypeId::UINT31, TypeId::UINT31),
];
